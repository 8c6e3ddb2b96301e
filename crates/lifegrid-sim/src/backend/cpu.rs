use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::grid::{DEAD, Generation, GridDims};
use crate::rule;

use super::GridBackend;

/// Host backend: rows are computed in parallel on a rayon pool.
///
/// Each row task reads only the source arena and writes only its own row of
/// the target arena, so no synchronization is needed beyond rayon's join.
#[derive(Default)]
pub struct CpuBackend {
    pool: Option<rayon::ThreadPool>,
}

impl CpuBackend {
    /// Uses the global rayon pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a dedicated pool with `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("lifegrid-cpu-{i}"))
            .build()
            .map_err(|e| SimError::InitializationFailure(e.to_string()))?;
        Ok(Self { pool: Some(pool) })
    }

    fn step_into(src: &[u32], dst: &mut [u32], dims: GridDims) {
        let cols = dims.cols() as usize;
        dst.par_chunks_mut(cols).enumerate().for_each(|(r, row)| {
            for (c, out) in row.iter_mut().enumerate() {
                *out = rule::next_cell(src, dims, r as u32, c as u32);
            }
        });
    }
}

impl GridBackend for CpuBackend {
    type Arena = Vec<u32>;

    fn name(&self) -> &'static str {
        "cpu"
    }

    fn allocate(&mut self, initial: &Generation) -> Result<[Vec<u32>; 2]> {
        Ok([
            initial.cells().to_vec(),
            vec![DEAD; initial.dims().cell_count()],
        ])
    }

    fn dispatch(
        &mut self,
        dims: GridDims,
        current: usize,
        arenas: &mut [Vec<u32>; 2],
    ) -> Result<()> {
        let [a, b] = arenas;
        let (src, dst) = if current == 0 { (&*a, b) } else { (&*b, a) };

        if src.len() != dims.cell_count() || dst.len() != dims.cell_count() {
            return Err(SimError::DispatchFailure(format!(
                "arena size mismatch for {}x{}",
                dims.rows(),
                dims.cols()
            )));
        }

        match self.pool.as_ref() {
            Some(pool) => pool.install(|| Self::step_into(src, dst, dims)),
            None => Self::step_into(src, dst, dims),
        }
        Ok(())
    }

    fn read_back(&mut self, dims: GridDims, arena: &Vec<u32>) -> Result<Generation> {
        Generation::from_cells(dims, arena.clone())
    }

    fn free(&mut self, arenas: [Vec<u32>; 2]) -> Result<()> {
        drop(arenas);
        Ok(())
    }
}

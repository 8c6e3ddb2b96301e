//! Update Kernel backends.
//!
//! A backend owns the device-side representation of a generation (its
//! `Arena`) and knows how to compute one transition. Every backend follows the
//! same contract: read `arenas[current]`, write only `arenas[1 - current]`,
//! count the eight neighbors with out-of-range cells dead, apply B3/S23. The
//! facade swaps roles only after `dispatch` succeeds.

mod cpu;
mod gpu;

pub use cpu::CpuBackend;
pub use gpu::{GpuBackend, WORKGROUP_SIZE};

use crate::error::Result;
use crate::grid::{Generation, GridDims};

pub trait GridBackend {
    /// Storage for one generation.
    type Arena;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Allocates the generation pair: `[initial, zeroed]`.
    fn allocate(&mut self, initial: &Generation) -> Result<[Self::Arena; 2]>;

    /// Computes the generation after `arenas[current]` into the other arena.
    ///
    /// On error nothing observable has changed in `arenas[current]`.
    fn dispatch(
        &mut self,
        dims: GridDims,
        current: usize,
        arenas: &mut [Self::Arena; 2],
    ) -> Result<()>;

    /// Copies `arena` to the host, ordered after all dispatched work.
    fn read_back(&mut self, dims: GridDims, arena: &Self::Arena) -> Result<Generation>;

    /// Waits for in-flight work, then frees both arenas.
    fn free(&mut self, arenas: [Self::Arena; 2]) -> Result<()>;
}

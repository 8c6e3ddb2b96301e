use rand::Rng;

use crate::backend::GridBackend;
use crate::config::SimConfig;
use crate::error::Result;
use crate::grid::{Generation, GridDims};
use crate::seed;
use crate::store::GridStore;

/// One Game of Life run: a backend plus the generation pair it owns.
///
/// `advance` computes the next generation into the scratch arena and swaps
/// roles only when the backend reports success, so a failed tick leaves the
/// current generation untouched.
pub struct Simulation<B: GridBackend> {
    backend: B,
    store: GridStore<B::Arena>,
    generation: u64,
}

impl<B: GridBackend> Simulation<B> {
    /// Validates `config`, samples a random initial generation and allocates
    /// the arena pair.
    pub fn initialize<R: Rng + ?Sized>(
        backend: B,
        config: &SimConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let dims = GridDims::new(config.rows, config.cols)?;
        let initial = seed::random_fill(dims, config.live_probability, rng)?;
        Self::initialize_with(backend, initial)
    }

    /// Starts from a known generation.
    pub fn initialize_with(mut backend: B, initial: Generation) -> Result<Self> {
        let dims = initial.dims();
        let arenas = backend.allocate(&initial)?;
        log::info!(
            "simulation started: {}x{} on {} backend, {} live",
            dims.rows(),
            dims.cols(),
            backend.name(),
            initial.live_count()
        );
        Ok(Self {
            backend,
            store: GridStore::new(dims, arenas),
            generation: 0,
        })
    }

    /// Computes one generation.
    pub fn advance(&mut self) -> Result<()> {
        let dims = self.store.dims();
        let (current, arenas) = self.store.step_access()?;

        if let Err(err) = self.backend.dispatch(dims, current, arenas) {
            log::warn!("generation {} not advanced: {err}", self.generation);
            return Err(err);
        }

        self.store.swap()?;
        self.generation += 1;
        log::trace!("generation {}", self.generation);
        Ok(())
    }

    /// Number of completed generations since start.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dims(&self) -> GridDims {
        self.store.dims()
    }

    pub fn current_buffer(&self) -> Result<&B::Arena> {
        self.store.current_buffer()
    }

    pub fn store(&self) -> &GridStore<B::Arena> {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Host copy of the current generation, ordered after every completed
    /// `advance`.
    pub fn snapshot(&mut self) -> Result<Generation> {
        let dims = self.store.dims();
        let arena = self.store.current_buffer()?;
        self.backend.read_back(dims, arena)
    }

    pub fn is_released(&self) -> bool {
        self.store.is_released()
    }

    /// Waits for in-flight work and frees both arenas. A second call fails
    /// with `UseAfterRelease`.
    pub fn release(&mut self) -> Result<()> {
        let arenas = self.store.release()?;
        self.backend.free(arenas)?;
        log::info!(
            "simulation released after {} generations ({} backend)",
            self.generation,
            self.backend.name()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::backend::CpuBackend;
    use crate::error::SimError;
    use crate::rule;

    /// Delegates to the CPU backend but fails every dispatch while `failing`.
    struct Flaky {
        inner: CpuBackend,
        failing: bool,
        freed: bool,
    }

    impl Flaky {
        fn new() -> Self {
            Self {
                inner: CpuBackend::new(),
                failing: false,
                freed: false,
            }
        }
    }

    impl GridBackend for Flaky {
        type Arena = Vec<u32>;

        fn name(&self) -> &'static str {
            "flaky"
        }

        fn allocate(&mut self, initial: &Generation) -> Result<[Vec<u32>; 2]> {
            self.inner.allocate(initial)
        }

        fn dispatch(
            &mut self,
            dims: GridDims,
            current: usize,
            arenas: &mut [Vec<u32>; 2],
        ) -> Result<()> {
            if self.failing {
                // Scribble on the scratch arena; the facade must not expose it.
                arenas[1 - current].fill(1);
                return Err(SimError::DispatchFailure("injected".into()));
            }
            self.inner.dispatch(dims, current, arenas)
        }

        fn read_back(&mut self, dims: GridDims, arena: &Vec<u32>) -> Result<Generation> {
            self.inner.read_back(dims, arena)
        }

        fn free(&mut self, arenas: [Vec<u32>; 2]) -> Result<()> {
            self.freed = true;
            self.inner.free(arenas)
        }
    }

    fn config(rows: u32, cols: u32, p: f64) -> SimConfig {
        SimConfig {
            rows,
            cols,
            live_probability: p,
            ..SimConfig::default()
        }
    }

    fn seeded(rows: u32, cols: u32, p: f64, seed: u64) -> Simulation<CpuBackend> {
        let mut rng = StdRng::seed_from_u64(seed);
        Simulation::initialize(CpuBackend::new(), &config(rows, cols, p), &mut rng).unwrap()
    }

    #[test]
    fn advance_matches_reference_rule() {
        let mut sim = seeded(24, 31, 0.35, 11);

        for _ in 0..5 {
            let before = sim.snapshot().unwrap();
            sim.advance().unwrap();
            assert_eq!(sim.snapshot().unwrap(), rule::step(&before));
        }
        assert_eq!(sim.generation(), 5);
    }

    #[test]
    fn full_probability_fills_grid() {
        let mut sim = seeded(5, 7, 1.0, 1);
        assert_eq!(sim.snapshot().unwrap().live_count(), 35);
    }

    #[test]
    fn zero_probability_stays_dead() {
        let mut sim = seeded(5, 7, 0.0, 1);
        assert!(sim.snapshot().unwrap().is_extinct());
        sim.advance().unwrap();
        assert!(sim.snapshot().unwrap().is_extinct());
    }

    #[test]
    fn invalid_inputs_rejected_before_allocation() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            Simulation::initialize(CpuBackend::new(), &config(0, 4, 0.5), &mut rng).err(),
            Some(SimError::InvalidDimensions { rows: 0, cols: 4 })
        );
        assert_eq!(
            Simulation::initialize(CpuBackend::new(), &config(4, 4, 1.5), &mut rng).err(),
            Some(SimError::InvalidProbability(1.5))
        );
    }

    #[test]
    fn failed_dispatch_keeps_current_generation() {
        let start = Generation::from_rows(&["....", ".##.", ".#..", "...."]).unwrap();
        let mut sim = Simulation::initialize_with(Flaky::new(), start.clone()).unwrap();

        sim.backend.failing = true;
        assert!(matches!(sim.advance(), Err(SimError::DispatchFailure(_))));
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.store().current_index(), Ok(0));
        assert_eq!(sim.snapshot().unwrap(), start);

        sim.backend.failing = false;
        sim.advance().unwrap();
        assert_eq!(sim.snapshot().unwrap(), rule::step(&start));
    }

    #[test]
    fn block_is_still_life() {
        let block = Generation::from_rows(&["....", ".##.", ".##.", "...."]).unwrap();
        let mut sim = Simulation::initialize_with(CpuBackend::new(), block.clone()).unwrap();
        sim.advance().unwrap();
        sim.advance().unwrap();
        assert_eq!(sim.snapshot().unwrap(), block);
    }

    #[test]
    fn single_cell_dies() {
        let lone = Generation::from_rows(&["...", ".#.", "..."]).unwrap();
        let mut sim = Simulation::initialize_with(CpuBackend::new(), lone).unwrap();
        sim.advance().unwrap();
        assert!(sim.snapshot().unwrap().is_extinct());
    }

    #[test]
    fn release_then_use_fails() {
        let one = Generation::from_rows(&["#"]).unwrap();
        let mut sim = Simulation::initialize_with(Flaky::new(), one).unwrap();
        sim.release().unwrap();
        assert!(sim.backend().freed);
        assert!(sim.is_released());

        assert_eq!(sim.release(), Err(SimError::UseAfterRelease));
        assert_eq!(sim.advance(), Err(SimError::UseAfterRelease));
        assert_eq!(sim.snapshot().err(), Some(SimError::UseAfterRelease));
        assert!(sim.current_buffer().is_err());
    }
}

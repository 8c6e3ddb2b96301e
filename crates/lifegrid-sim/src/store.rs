//! Grid State Store: the two generation arenas and which one is current.

use crate::error::{Result, SimError};
use crate::grid::GridDims;

/// Owns the generation pair of one simulation run.
///
/// `current` is authoritative for rendering; the other arena is scratch for
/// one step. Roles flip on [`swap`](Self::swap) without moving data. After
/// [`release`](Self::release) every call fails with
/// [`SimError::UseAfterRelease`].
#[derive(Debug)]
pub struct GridStore<A> {
    dims: GridDims,
    arenas: Option<[A; 2]>,
    current: usize,
}

impl<A> GridStore<A> {
    /// `arenas[0]` starts as the current generation.
    pub fn new(dims: GridDims, arenas: [A; 2]) -> Self {
        Self {
            dims,
            arenas: Some(arenas),
            current: 0,
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn is_released(&self) -> bool {
        self.arenas.is_none()
    }

    /// Index (0 or 1) of the current arena.
    pub fn current_index(&self) -> Result<usize> {
        self.live()?;
        Ok(self.current)
    }

    /// Arena to read for rendering.
    pub fn current_buffer(&self) -> Result<&A> {
        Ok(&self.live()?[self.current])
    }

    /// Both arenas, indexed as by [`current_index`](Self::current_index).
    pub fn arenas(&self) -> Result<&[A; 2]> {
        self.live()
    }

    /// Grants one step its read source and write target: returns the current
    /// index and both arenas. The caller reads `arenas[current]` and writes
    /// only `arenas[1 - current]`.
    pub fn step_access(&mut self) -> Result<(usize, &mut [A; 2])> {
        let current = self.current;
        let arenas = self.arenas.as_mut().ok_or(SimError::UseAfterRelease)?;
        Ok((current, arenas))
    }

    /// Makes the freshly written arena current.
    pub fn swap(&mut self) -> Result<()> {
        self.live()?;
        self.current ^= 1;
        Ok(())
    }

    /// Ends the store's life and hands the arenas back for teardown.
    /// A second call fails with `UseAfterRelease`.
    pub fn release(&mut self) -> Result<[A; 2]> {
        self.arenas.take().ok_or(SimError::UseAfterRelease)
    }

    fn live(&self) -> Result<&[A; 2]> {
        self.arenas.as_ref().ok_or(SimError::UseAfterRelease)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GridStore<&'static str> {
        GridStore::new(GridDims::new(2, 2).unwrap(), ["a", "b"])
    }

    #[test]
    fn starts_on_first_arena() {
        let s = store();
        assert_eq!(s.current_index(), Ok(0));
        assert_eq!(s.current_buffer(), Ok(&"a"));
    }

    #[test]
    fn swap_flips_roles() {
        let mut s = store();
        s.swap().unwrap();
        assert_eq!(s.current_buffer(), Ok(&"b"));
        s.swap().unwrap();
        assert_eq!(s.current_buffer(), Ok(&"a"));
    }

    #[test]
    fn step_access_reports_current() {
        let mut s = store();
        s.swap().unwrap();
        let (current, arenas) = s.step_access().unwrap();
        assert_eq!(current, 1);
        assert_eq!(arenas[1 - current], "a");
    }

    #[test]
    fn release_returns_arenas_once() {
        let mut s = store();
        assert_eq!(s.release(), Ok(["a", "b"]));
        assert!(s.is_released());
        assert_eq!(s.release(), Err(SimError::UseAfterRelease));
    }

    #[test]
    fn every_call_fails_after_release() {
        let mut s = store();
        s.release().unwrap();
        assert_eq!(s.current_buffer(), Err(SimError::UseAfterRelease));
        assert_eq!(s.current_index(), Err(SimError::UseAfterRelease));
        assert_eq!(s.swap(), Err(SimError::UseAfterRelease));
        assert!(s.arenas().is_err());
        assert!(s.step_access().is_err());
    }
}

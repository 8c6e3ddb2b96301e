//! Initial-state sampling.

use rand::Rng;

use crate::error::{Result, SimError};
use crate::grid::{ALIVE, DEAD, Generation, GridDims};

/// Checks that `p` is a usable probability.
pub fn validate_probability(p: f64) -> Result<f64> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(SimError::InvalidProbability(p))
    }
}

/// Samples every cell independently as live with probability `live_probability`.
pub fn random_fill<R: Rng + ?Sized>(
    dims: GridDims,
    live_probability: f64,
    rng: &mut R,
) -> Result<Generation> {
    let p = validate_probability(live_probability)?;
    let cells = (0..dims.cell_count())
        .map(|_| if rng.random_bool(p) { ALIVE } else { DEAD })
        .collect();
    Generation::from_cells(dims, cells)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn dims() -> GridDims {
        GridDims::new(32, 48).unwrap()
    }

    #[test]
    fn probability_one_fills_everything() {
        let g = random_fill(dims(), 1.0, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(g.live_count(), dims().cell_count());
    }

    #[test]
    fn probability_zero_fills_nothing() {
        let g = random_fill(dims(), 0.0, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(g.is_extinct());
    }

    #[test]
    fn same_seed_same_grid() {
        let a = random_fill(dims(), 0.35, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = random_fill(dims(), 0.35, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn density_is_roughly_respected() {
        let d = GridDims::new(200, 200).unwrap();
        let g = random_fill(d, 0.35, &mut StdRng::seed_from_u64(7)).unwrap();
        let density = g.live_count() as f64 / d.cell_count() as f64;
        assert!((density - 0.35).abs() < 0.02, "density {density}");
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let mut rng = StdRng::seed_from_u64(0);
        for p in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                random_fill(dims(), p, &mut rng),
                Err(SimError::InvalidProbability(_))
            ));
        }
    }
}

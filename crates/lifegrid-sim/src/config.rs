use std::time::Duration;

use lifegrid_engine::coords::Viewport;
use lifegrid_engine::paint::Color;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::present::GridStyle;

/// Simulation parameters supplied by the host application.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub rows: u32,
    pub cols: u32,

    /// Edge length of one cell in logical pixels.
    pub cell_size: f32,

    /// Chance that a cell starts live.
    pub live_probability: f64,

    /// Minimum time between two generations. Presentation runs every frame.
    pub tick_interval: Duration,

    /// Fixed seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,

    pub live_color: Color,
    pub dead_color: Color,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 32,
            cell_size: 10.0,
            live_probability: 0.35,
            tick_interval: Duration::from_millis(100),
            seed: None,
            live_color: Color::BLACK,
            dead_color: Color::WHITE,
        }
    }
}

impl SimConfig {
    /// Copy with `rows`/`cols` set to the number of whole cells that fit.
    pub fn sized_to(&self, viewport: Viewport) -> Self {
        let (rows, cols) = viewport.tiles(self.cell_size);
        Self {
            rows,
            cols,
            ..self.clone()
        }
    }

    pub fn style(&self) -> GridStyle {
        GridStyle {
            cell_size: self.cell_size,
            live: self.live_color,
            dead: self.dead_color,
        }
    }

    /// RNG for the initial fill.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_to_viewport() {
        let cfg = SimConfig {
            cell_size: 20.0,
            ..SimConfig::default()
        };
        let sized = cfg.sized_to(Viewport::new(640.0, 410.0));
        assert_eq!((sized.rows, sized.cols), (20, 32));
        assert_eq!(sized.cell_size, 20.0);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;
        let cfg = SimConfig {
            seed: Some(9),
            ..SimConfig::default()
        };
        let a: u64 = cfg.rng().random();
        let b: u64 = cfg.rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_viewport_yields_zero_dims() {
        let sized = SimConfig::default().sized_to(Viewport::new(5.0, 5.0));
        assert_eq!((sized.rows, sized.cols), (0, 0));
    }
}

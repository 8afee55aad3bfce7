use super::Grid;

/// Value returned by the null fallback for every cell.
pub const NULL_VALUE: f64 = 100.0;

/// The field a worker renders and advances, as a closed sum over the
/// supported kinds. Exactly one lives per worker process.
pub enum Equation {
    /// Heat diffusion over an owned tile grid.
    HeatDiffusion(Grid),
    /// Oscillating parity pattern, time-driven, no spatial coupling.
    Checkerboard(Checkerboard),
    /// Static function of the coordinates; never advances.
    Square,
    /// Constant fallback for unrecognized kinds; never advances.
    Null,
}

impl Equation {
    pub fn value(&self, x: usize, y: usize) -> f64 {
        match self {
            Equation::HeatDiffusion(grid) => grid.value(x, y),
            Equation::Checkerboard(c) => c.value(x, y),
            Equation::Square => ((x + y) as f64).min(255.0),
            Equation::Null => NULL_VALUE,
        }
    }

    pub fn advance(&mut self, delta_t: f64) {
        match self {
            Equation::HeatDiffusion(grid) => grid.step(),
            Equation::Checkerboard(c) => c.advance(delta_t),
            Equation::Square | Equation::Null => {}
        }
    }
}

/// Even cells fade out from 255 while odd cells fade in from 0.
#[derive(Debug, Default)]
pub struct Checkerboard {
    time: f64,
}

impl Checkerboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn value(&self, x: usize, y: usize) -> f64 {
        if (x + y) % 2 == 0 {
            (255.0 - self.time).max(0.0)
        } else {
            self.time.min(255.0)
        }
    }

    fn advance(&mut self, delta_t: f64) {
        self.time += 4.0 * delta_t;
    }
}

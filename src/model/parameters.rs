use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct Parameters {
    pub nx: usize, // cells along x
    pub ny: usize, // cells along y
    pub a: f64,    // diffusion constant
    pub dx: f64,
    pub dy: f64,
    pub dx2: f64,
    pub dy2: f64,
    pub dt: f64, // largest stable time step for this grid
}

impl Parameters {
    /// Derive the stencil constants once from the tile dimensions and the
    /// diffusion constant. `dt` sits exactly on the FTCS stability limit
    /// `dx^2 * dy^2 / (2 * a * (dx^2 + dy^2))`.
    pub fn new(nx: usize, ny: usize, a: f64) -> Self {
        let dx = 1.0 / nx as f64;
        let dy = 1.0 / ny as f64;
        let dx2 = dx * dx;
        let dy2 = dy * dy;
        let dt = dx2 * dy2 / (2.0 * a * (dx2 + dy2));
        Self {
            nx,
            ny,
            a,
            dx,
            dy,
            dx2,
            dy2,
            dt,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(Error::InvalidParameters(
                "Grid dimensions must be positive".to_string(),
            ));
        }
        if self.a <= 0.0 {
            return Err(Error::InvalidParameters(
                "Diffusion constant must be > 0".to_string(),
            ));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(Error::InvalidParameters(
                "Derived time step is not positive and finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn warn(&self) {
        if self.nx < 3 || self.ny < 3 {
            warn!(
                nx = self.nx,
                ny = self.ny,
                "grid has no interior cells, the field will never evolve"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn dt_sits_on_the_stability_limit() {
        let p = Parameters::new(50, 40, 0.5);
        assert_abs_diff_eq!(p.dx, 0.02);
        assert_abs_diff_eq!(p.dy, 0.025);
        let expected = p.dx2 * p.dy2 / (2.0 * p.a * (p.dx2 + p.dy2));
        assert_abs_diff_eq!(p.dt, expected);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn validate_rejects_nonpositive_diffusion() {
        assert!(Parameters::new(10, 10, 0.0).validate().is_err());
        assert!(Parameters::new(10, 10, -1.0).validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_grid() {
        assert!(Parameters::new(0, 10, 0.5).validate().is_err());
        assert!(Parameters::new(10, 0, 0.5).validate().is_err());
    }
}

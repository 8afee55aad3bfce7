use ndarray::Array2;
use tracing::warn;

use super::{Checkerboard, Equation, Grid, Parameters};
use crate::error::Result;

/// Equation kind discriminators as they appear in the assignment message.
pub const HEAT: &str = "heat";
pub const CHECKERBOARD: &str = "checkerboard";
pub const SQUARE: &str = "square";

pub struct EquationFactory;

impl EquationFactory {
    /// Build the equation an assignment names, over the worker's tile.
    ///
    /// An unrecognized kind falls back to the constant null equation instead
    /// of failing, so one bad assignment cannot take down the whole wall.
    pub fn create(kind: &str, params: Parameters, initial: Array2<f64>) -> Result<Equation> {
        match kind {
            HEAT => Ok(Equation::HeatDiffusion(Grid::from_field(params, initial)?)),
            CHECKERBOARD => Ok(Equation::Checkerboard(Checkerboard::new())),
            SQUARE => Ok(Equation::Square),
            other => {
                warn!(kind = other, "unrecognized equation kind, falling back to null");
                Ok(Equation::Null)
            }
        }
    }
}

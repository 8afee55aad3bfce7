mod domain;
mod equation;
mod factory;
mod grid;
mod initial;
mod parameters;

pub use domain::{Domain, WallLayout, WorkerId};
pub use equation::{Checkerboard, Equation, NULL_VALUE};
pub use factory::{EquationFactory, CHECKERBOARD, HEAT, SQUARE};
pub use grid::Grid;
pub use initial::{demo_pattern, wall_pattern, HOT};
pub use parameters::Parameters;

use clap::Parser;
use clap::ValueEnum;

use crate::error::{Error, Result};
use crate::model::{WallLayout, WorkerId};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Distributed heat-diffusion simulator for tiled video walls"
)]
pub struct Cli {
    /// Which node this process runs as.
    #[arg(long, value_enum, default_value = "local")]
    pub role: Role,

    // Session settings
    /// Listen address (coordinator) or coordinator address (worker).
    #[arg(long, default_value = "127.0.0.1:9130")]
    pub addr: String,
    #[arg(long, default_value = "5")]
    pub wall_cols: usize,
    #[arg(long, default_value = "3")]
    pub wall_rows: usize,
    #[arg(long, default_value = "500")]
    pub width: usize,
    #[arg(long, default_value = "300")]
    pub height: usize,
    /// Barrier rounds to run; 0 runs until interrupted.
    #[arg(long, default_value = "0")]
    pub steps: usize,

    // Model settings
    #[arg(long, value_enum, default_value = "heat")]
    pub equation: EquationKind,
    #[arg(long, default_value = "0.5")]
    pub diffusion: f64,

    // Worker identity
    /// Worker name whose trailing digits encode the tile position, e.g. tile23.
    #[arg(long)]
    pub name: Option<String>,
    /// Tile column; with --row, overrides --name.
    #[arg(long)]
    pub col: Option<usize>,
    /// Tile row; with --col, overrides --name.
    #[arg(long)]
    pub row: Option<usize>,

    // Output settings
    #[arg(long, value_enum, default_value = "term")]
    pub render: RenderKind,
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn validate_parameters(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_parameters(
                "Grid dimensions must be positive",
            ));
        }
        if self.diffusion <= 0.0 {
            return Err(Error::invalid_parameters(
                "Diffusion constant must be positive",
            ));
        }
        if self.wall_cols == 0 || self.wall_rows == 0 {
            return Err(Error::invalid_parameters(
                "Wall layout must have at least one tile",
            ));
        }
        if self.width < self.wall_cols || self.height < self.wall_rows {
            return Err(Error::invalid_parameters(
                "Grid must have at least one cell per wall tile",
            ));
        }
        if self.role == Role::Worker
            && self.name.is_none()
            && (self.col.is_none() || self.row.is_none())
        {
            return Err(Error::invalid_parameters(
                "Workers need --name or both --col and --row",
            ));
        }
        Ok(())
    }

    pub fn layout(&self) -> WallLayout {
        WallLayout::new(self.wall_cols, self.wall_rows)
    }

    /// Resolve this worker's tile coordinate: explicit flags first, then the
    /// trailing digits of --name.
    pub fn worker_id(&self) -> Result<WorkerId> {
        if let (Some(col), Some(row)) = (self.col, self.row) {
            return Ok(WorkerId::new(col, row));
        }
        match &self.name {
            Some(name) => WorkerId::from_host_name(name),
            None => Err(Error::invalid_parameters(
                "Workers need --name or both --col and --row",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    /// Single-process demo, no networking.
    Local,
    Coordinator,
    Worker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EquationKind {
    Heat,
    Checkerboard,
    Square,
}

impl EquationKind {
    /// Discriminator as it appears in the assignment message.
    pub fn as_wire(&self) -> &'static str {
        match self {
            EquationKind::Heat => crate::model::HEAT,
            EquationKind::Checkerboard => crate::model::CHECKERBOARD,
            EquationKind::Square => crate::model::SQUARE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderKind {
    Term,
    Null,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli::parse_from(["heatwall"])
    }

    #[test]
    fn defaults_validate() {
        assert!(base_cli().validate_parameters().is_ok());
    }

    #[test]
    fn worker_without_identity_is_rejected() {
        let cli = Cli::parse_from(["heatwall", "--role", "worker"]);
        assert!(cli.validate_parameters().is_err());
    }

    #[test]
    fn explicit_coordinates_override_the_name() {
        let cli = Cli::parse_from([
            "heatwall", "--role", "worker", "--name", "tile23", "--col", "4", "--row", "1",
        ]);
        assert_eq!(cli.worker_id().unwrap(), WorkerId::new(4, 1));
    }

    #[test]
    fn name_supplies_the_identity() {
        let cli = Cli::parse_from(["heatwall", "--role", "worker", "--name", "tile23"]);
        assert_eq!(cli.worker_id().unwrap(), WorkerId::new(2, 3));
    }

    #[test]
    fn grid_smaller_than_the_wall_is_rejected() {
        let cli = Cli::parse_from(["heatwall", "--width", "3", "--wall-cols", "5"]);
        assert!(cli.validate_parameters().is_err());
    }
}

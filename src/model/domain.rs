use ndarray::{s, Array2};

use crate::error::{Error, Result};

/// Fixed arrangement of worker tiles on the wall. The worker count is the
/// join quorum for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallLayout {
    pub cols: usize,
    pub rows: usize,
}

impl WallLayout {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    pub fn worker_count(&self) -> usize {
        self.cols * self.rows
    }
}

/// A worker's stable coordinate in the wall layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerId {
    pub col: usize,
    pub row: usize,
}

impl WorkerId {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Derive the coordinate from a hostname-style name whose trailing digits
    /// encode the tile position: the first digit is the column, the last the
    /// row (`tile23` is column 2, row 3; a single digit names both).
    pub fn from_host_name(name: &str) -> Result<Self> {
        // Reversed, so the first element is the name's last digit.
        let digits: Vec<usize> = name
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as usize)
            .collect();
        match (digits.last(), digits.first()) {
            (Some(&col), Some(&row)) => Ok(Self::new(col, row)),
            _ => Err(Error::invalid_identity(
                name,
                "no trailing digits encode a tile position",
            )),
        }
    }
}

/// The sub-rectangle of the global grid owned by one worker.
///
/// Tile size is the global size divided by the layout, so remainder columns
/// and rows (`total_nx % cols`, `total_ny % rows`) are dropped from every
/// tile, not redistributed. The mapping is pure: the same identity and
/// global size always yield the same tile, on the coordinator and on every
/// worker.
#[derive(Debug, Clone, Copy)]
pub struct Domain {
    pub total_nx: usize,
    pub total_ny: usize,
    pub nx: usize,
    pub ny: usize,
    pub start_x: usize,
    pub start_y: usize,
}

impl Domain {
    pub fn new(layout: WallLayout, id: WorkerId, total_nx: usize, total_ny: usize) -> Result<Self> {
        if layout.cols == 0 || layout.rows == 0 {
            return Err(Error::invalid_parameters(
                "Wall layout must have at least one tile",
            ));
        }
        if id.col >= layout.cols || id.row >= layout.rows {
            return Err(Error::InvalidParameters(format!(
                "worker ({}, {}) is outside the {}x{} wall",
                id.col, id.row, layout.cols, layout.rows
            )));
        }
        let nx = total_nx / layout.cols;
        let ny = total_ny / layout.rows;
        if nx == 0 || ny == 0 {
            return Err(Error::InvalidParameters(format!(
                "a {}x{} grid leaves empty tiles on a {}x{} wall",
                total_nx, total_ny, layout.cols, layout.rows
            )));
        }
        Ok(Self {
            total_nx,
            total_ny,
            nx,
            ny,
            start_x: id.col * nx,
            start_y: id.row * ny,
        })
    }

    pub fn size(&self) -> usize {
        self.nx * self.ny
    }

    pub fn total_size(&self) -> usize {
        self.total_nx * self.total_ny
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.start_x
            && x < self.start_x + self.nx
            && y >= self.start_y
            && y < self.start_y + self.ny
    }

    /// Copy this tile's portion out of the full initial condition.
    pub fn slice_initial(&self, global: &Array2<f64>) -> Result<Array2<f64>> {
        if global.dim() != (self.total_nx, self.total_ny) {
            return Err(Error::Protocol(format!(
                "initial condition is {:?}, domain expects ({}, {})",
                global.dim(),
                self.total_nx,
                self.total_ny
            )));
        }
        Ok(global
            .slice(s![
                self.start_x..self.start_x + self.nx,
                self.start_y..self.start_y + self.ny
            ])
            .to_owned())
    }
}

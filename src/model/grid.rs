use ndarray::{s, Array2, Zip};

use super::Parameters;
use crate::error::{Error, Result};

/// One tile's scalar field, double-buffered so a stencil pass reads only the
/// frozen current buffer and writes only the next one.
pub struct Grid {
    params: Parameters,
    cur: Array2<f64>,
    next: Array2<f64>,
}

impl Grid {
    pub fn zeros(params: Parameters) -> Self {
        Self {
            cur: Array2::zeros((params.nx, params.ny)),
            next: Array2::zeros((params.nx, params.ny)),
            params,
        }
    }

    /// Take ownership of an initial field. The field's shape must match the
    /// parameters it was derived from.
    pub fn from_field(params: Parameters, field: Array2<f64>) -> Result<Self> {
        if field.dim() != (params.nx, params.ny) {
            return Err(Error::InvalidParameters(format!(
                "initial field is {:?}, parameters expect ({}, {})",
                field.dim(),
                params.nx,
                params.ny
            )));
        }
        let next = Array2::zeros(field.raw_dim());
        Ok(Self {
            params,
            cur: field,
            next,
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn field(&self) -> &Array2<f64> {
        &self.cur
    }

    /// Cell value, or zero outside the grid. Render probes may run past the
    /// tile edge and must never fail.
    pub fn value(&self, x: usize, y: usize) -> f64 {
        self.cur.get([x, y]).copied().unwrap_or(0.0)
    }

    /// Advance the interior by one time step of
    /// `u' = u + a*dt*(d2u/dx2 + d2u/dy2)` and swap buffers. The one-cell
    /// border is a fixed Dirichlet boundary and is carried over unchanged.
    pub fn step(&mut self) {
        let Parameters { a, dt, dx2, dy2, .. } = self.params;
        self.next.assign(&self.cur);
        if self.params.nx >= 2 && self.params.ny >= 2 {
            let cur = &self.cur;
            let mut interior = self.next.slice_mut(s![1..-1, 1..-1]);
            Zip::from(&mut interior)
                .and(cur.slice(s![1..-1, 1..-1]))
                .and(cur.slice(s![2.., 1..-1]))
                .and(cur.slice(s![..-2, 1..-1]))
                .and(cur.slice(s![1..-1, 2..]))
                .and(cur.slice(s![1..-1, ..-2]))
                .for_each(|next, &c, &xp, &xm, &yp, &ym| {
                    *next = c + a * dt * ((xp - 2.0 * c + xm) / dx2 + (yp - 2.0 * c + ym) / dy2);
                });
        }
        std::mem::swap(&mut self.cur, &mut self.next);
    }
}

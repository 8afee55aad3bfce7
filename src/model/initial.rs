use ndarray::Array2;

/// Temperature painted onto every stroke of the built-in patterns.
pub const HOT: f64 = 200.0;

/// Default initial condition for a wall session: vertical strokes near the
/// left and right edges, rails along the top and bottom, and a center bar.
/// Stroke positions are fractions of the grid so any geometry works; grids
/// too small to hold the strokes come back cold.
pub fn wall_pattern(nx: usize, ny: usize) -> Array2<f64> {
    let mut field = Array2::zeros((nx, ny));
    if nx < 10 || ny < 6 {
        return field;
    }
    let left = nx / 10;
    let right = nx * 9 / 10;
    let top = ny / 6;
    let bottom = ny * 5 / 6;
    for y in top..=bottom {
        field[[left, y]] = HOT;
        field[[right, y]] = HOT;
    }
    for x in left..=right {
        field[[x, top]] = HOT;
        field[[x, bottom]] = HOT;
    }
    let mid = ny / 2;
    for x in nx * 3 / 10..=nx * 7 / 10 {
        field[[x, mid]] = HOT;
    }
    field
}

/// Single-process demo pattern: a hot square outline over the middle of the
/// grid.
pub fn demo_pattern(nx: usize, ny: usize) -> Array2<f64> {
    let mut field = Array2::zeros((nx, ny));
    if nx < 4 || ny < 4 {
        return field;
    }
    let (x0, x1) = (nx / 4, nx * 3 / 4);
    let (y0, y1) = (ny / 4, ny * 3 / 4);
    for x in x0..=x1 {
        field[[x, y0]] = HOT;
        field[[x, y1]] = HOT;
    }
    for y in y0..=y1 {
        field[[x0, y]] = HOT;
        field[[x1, y]] = HOT;
    }
    field
}

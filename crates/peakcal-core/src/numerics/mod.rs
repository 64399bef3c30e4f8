fn kahan_add(sum: &mut f64, correction: &mut f64, value: f64) {
    let corrected = value - *correction;
    let next = *sum + corrected;
    *correction = (next - *sum) - corrected;
    *sum = next;
}

pub fn stable_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;

    for &value in values {
        kahan_add(&mut sum, &mut correction, value);
    }

    sum
}

/// Root of the compensated sum of squares.
pub fn quadrature_sum(terms: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;
    for &term in terms {
        kahan_add(&mut sum, &mut correction, term * term);
    }
    sum.sqrt()
}

/// Piecewise-linear interpolation on a non-decreasing grid that extends the
/// first and last segments instead of clamping.
///
/// A point that coincides with a grid node returns that node's value. Where the
/// end segment is vertical (repeated abscissa) the boundary value is returned.
pub fn interpolate_linear_extrapolated(x: f64, x_grid: &[f64], y_grid: &[f64]) -> Option<f64> {
    if x_grid.len() < 2 || x_grid.len() != y_grid.len() || x.is_nan() {
        return None;
    }

    if !x_grid.windows(2).all(|window| window[0] <= window[1]) {
        return None;
    }

    let last_index = x_grid.len() - 1;
    let upper = x_grid.partition_point(|node| *node < x);
    if upper <= last_index && x_grid[upper] == x {
        return Some(y_grid[upper]);
    }

    let (lower, upper) = match upper {
        0 => (0, 1),
        index if index > last_index => (last_index - 1, last_index),
        index => (index - 1, index),
    };

    let x0 = x_grid[lower];
    let x1 = x_grid[upper];
    if x1 == x0 {
        return Some(if x < x0 { y_grid[lower] } else { y_grid[upper] });
    }

    let interpolation = (x - x0) / (x1 - x0);
    Some(y_grid[lower] + interpolation * (y_grid[upper] - y_grid[lower]))
}

pub fn relative_difference(lhs: f64, rhs: f64, relative_floor: f64) -> f64 {
    let scale = lhs.abs().max(rhs.abs()).max(relative_floor);
    (lhs - rhs).abs() / scale
}

pub fn within_tolerance(
    lhs: f64,
    rhs: f64,
    abs_tol: f64,
    rel_tol: f64,
    relative_floor: f64,
) -> bool {
    let abs_diff = (lhs - rhs).abs();
    abs_diff <= abs_tol || relative_difference(lhs, rhs, relative_floor) <= rel_tol
}

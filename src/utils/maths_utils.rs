use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

/// `None` for an empty slice.
pub fn get_max(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    let max_index: usize = vec.argmax();
    vec.get(max_index).copied()
}

pub fn get_min(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    let min_index: usize = vec.argmin();
    vec.get(min_index).copied()
}

/// (min, max) of the finite values in `vec`, or `None` when there are none.
pub fn finite_min_max(vec: &[f64]) -> Option<(f64, f64)> {
    let finite: Vec<f64> = vec.iter().copied().filter(|v| v.is_finite()).collect();
    Some((get_min(&finite)?, get_max(&finite)?))
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(vec: &[f64]) -> f64 {
    vec.iter().mean()
}

/// Clamp an extent to optional floor / ceiling bounds.
/// A floor above the ceiling is ignored rather than producing an inverted range.
pub fn clamp_extent(extent: (f64, f64), floor: Option<f64>, ceiling: Option<f64>) -> (f64, f64) {
    let (mut low, mut high) = extent;
    if let (Some(f), Some(c)) = (floor, ceiling) {
        if f > c {
            return extent;
        }
    }
    if let Some(f) = floor {
        low = low.max(f);
        high = high.max(f);
    }
    if let Some(c) = ceiling {
        low = low.min(c);
        high = high.min(c);
    }
    (low, high)
}

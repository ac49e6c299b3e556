use nalgebra::Point3;

/// Squared Euclidean distance between two points.
///
/// Distance comparisons against a cutoff are done on squared values so the
/// square root is only taken for atoms that are kept.
#[inline]
pub fn squared_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance_squared(a, b)
}

/// Smallest squared distance from `point` to any of `references`.
///
/// Returns `None` when `references` is empty.
pub fn min_squared_distance<'a, I>(point: &Point3<f64>, references: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Point3<f64>>,
{
    references
        .into_iter()
        .map(|r| squared_distance(point, r))
        .fold(None, |acc, d| match acc {
            Some(min) if min <= d => Some(min),
            _ => Some(d),
        })
}

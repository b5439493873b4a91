//! linemerge: merge connected linework into maximal simple paths (sans-IO).
//!
//! Input geometry is decomposed into its linear components. Each line's
//! endpoints become graph nodes and the line itself an edge. The merge
//! joins lines end to end through every node where exactly two lines
//! meet, and stops at endpoints and branch points:
//!
//! decompose -> build graph -> walk from endpoints/branches ->
//! walk isolated loops -> emit lines.
//!
//! This crate has **no I/O dependencies**. GeoJSON and SVG live in
//! `linemerge-export`; the command-line front end in `linemerge-cli`.

pub mod decompose;
pub mod diagnostics;
pub mod edge_string;
pub mod graph;
pub mod merger;
pub mod types;

pub use diagnostics::MergeStats;
pub use edge_string::EdgeString;
pub use graph::LineMergeGraph;
pub use merger::LineMerger;
pub use types::{Coord, Geometry, LineString, MergeConfig, MergeError};

/// Merge the linework of `geometries` in one call.
///
/// Equivalent to adding every geometry to a fresh [`LineMerger`] and
/// taking its merged lines.
///
/// # Errors
///
/// Returns [`MergeError::NonFiniteCoordinate`] for NaN/infinite input,
/// or an invariant error from [`LineMerger::merge`].
///
/// # Examples
///
/// ```
/// use linemerge::{merge_lines, Geometry, LineString, MergeConfig};
///
/// let input = vec![
///     Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 0.0)])),
///     Geometry::LineString(LineString::from(vec![(1.0, 0.0), (1.0, 1.0)])),
///     Geometry::LineString(LineString::from(vec![(1.0, 0.0), (2.0, 0.0)])),
/// ];
/// // (1, 0) joins three lines, so nothing can be merged.
/// let merged = merge_lines(&input, MergeConfig::default()).unwrap();
/// assert_eq!(merged.len(), 3);
/// ```
pub fn merge_lines<'a, I>(geometries: I, config: MergeConfig) -> Result<Vec<LineString>, MergeError>
where
    I: IntoIterator<Item = &'a Geometry>,
{
    let mut merger = LineMerger::with_config(config);
    merger.add_all(geometries)?;
    merger.into_merged_lines()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> Geometry {
        Geometry::LineString(LineString::from(points.to_vec()))
    }

    #[test]
    fn merge_lines_empty() {
        let merged = merge_lines(std::iter::empty::<&Geometry>(), MergeConfig::default()).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn merge_lines_matches_merger() {
        let input = vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(2.0, 0.0), (1.0, 0.0)]),
            line(&[(2.0, 0.0), (2.0, 5.0)]),
        ];
        let merged = merge_lines(&input, MergeConfig::default()).unwrap();

        let mut merger = LineMerger::new();
        merger.add_all(&input).unwrap();
        assert_eq!(merged.as_slice(), merger.merged_lines().unwrap());
    }

    #[test]
    fn merge_lines_propagates_errors() {
        let input = vec![line(&[(0.0, f64::NEG_INFINITY), (1.0, 0.0)])];
        assert!(matches!(
            merge_lines(&input, MergeConfig::default()),
            Err(MergeError::NonFiniteCoordinate { .. })
        ));
    }
}

//! linemerge-export: Pure format parsers and serializers (sans-IO)
//!
//! Reads input linework from GeoJSON and writes merged lines back out as
//! GeoJSON or SVG. Every function works on strings; file access belongs
//! to the caller.

pub mod geojson;
pub mod svg;

pub use self::geojson::{parse_geometries, to_feature_collection};
pub use self::svg::{SvgMetadata, build_path_data, to_svg};

/// Errors produced while parsing input formats.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The input was not valid GeoJSON, or held a geometry that cannot be
    /// represented as a `geo` geometry.
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[source] Box<::geojson::Error>),
}

impl From<::geojson::Error> for ExportError {
    fn from(e: ::geojson::Error) -> Self {
        Self::GeoJson(Box::new(e))
    }
}

//! GeoJSON input and output.
//!
//! Input may be a bare geometry, a feature, or a feature collection.
//! Features without a geometry are skipped. Output is always a feature
//! collection with one `LineString` feature per merged line.

use geojson::{Feature, FeatureCollection, GeoJson};
use linemerge::{Geometry, LineString};

use crate::ExportError;

/// Parse GeoJSON text into `geo` geometries, in document order.
///
/// # Errors
///
/// Returns [`ExportError::GeoJson`] if the text is not valid GeoJSON or
/// contains a geometry `geo` cannot represent.
///
/// # Examples
///
/// ```
/// use linemerge_export::parse_geometries;
///
/// let geometries = parse_geometries(
///     r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#,
/// )
/// .unwrap();
/// assert_eq!(geometries.len(), 1);
/// ```
pub fn parse_geometries(input: &str) -> Result<Vec<Geometry<f64>>, ExportError> {
    let geojson: GeoJson = input.parse()?;
    let geometries = match geojson {
        GeoJson::Geometry(geometry) => vec![Geometry::try_from(geometry)?],
        GeoJson::Feature(feature) => feature
            .geometry
            .map(Geometry::try_from)
            .transpose()?
            .into_iter()
            .collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .map(Geometry::try_from)
            .collect::<Result<_, _>>()?,
    };
    Ok(geometries)
}

/// Serialize merged lines as a GeoJSON feature collection.
///
/// Each feature carries an `index` property (position in `lines`) and a
/// `closed` property (first coordinate equals the last).
#[must_use]
pub fn to_feature_collection(lines: &[LineString<f64>]) -> String {
    let features = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let mut feature = Feature::from(geojson::Geometry::new(geojson::Value::from(line)));
            feature.set_property("index", index);
            feature.set_property("closed", line.is_closed());
            feature
        })
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
    .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_geometry() {
        let geometries =
            parse_geometries(r#"{"type": "LineString", "coordinates": [[0, 0], [1, 2]]}"#)
                .unwrap();
        assert_eq!(
            geometries,
            vec![Geometry::LineString(LineString::from(vec![
                (0.0, 0.0),
                (1.0, 2.0)
            ]))]
        );
    }

    #[test]
    fn parse_feature() {
        let input = r#"{
            "type": "Feature",
            "properties": {"name": "a"},
            "geometry": {"type": "Point", "coordinates": [3, 4]}
        }"#;
        let geometries = parse_geometries(input).unwrap();
        assert_eq!(geometries.len(), 1);
        assert!(matches!(geometries[0], Geometry::Point(_)));
    }

    #[test]
    fn parse_feature_without_geometry() {
        let input = r#"{"type": "Feature", "properties": null, "geometry": null}"#;
        assert!(parse_geometries(input).unwrap().is_empty());
    }

    #[test]
    fn parse_feature_collection_in_order() {
        let input = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 0]]}},
                {"type": "Feature", "properties": {}, "geometry": null},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Polygon",
                              "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}}
            ]
        }"#;
        let geometries = parse_geometries(input).unwrap();
        assert_eq!(geometries.len(), 2);
        assert!(matches!(geometries[0], Geometry::LineString(_)));
        assert!(matches!(geometries[1], Geometry::Polygon(_)));
    }

    #[test]
    fn parse_invalid_json_is_an_error() {
        let err = parse_geometries("{not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid GeoJSON"));
    }

    #[test]
    fn parse_unknown_type_is_an_error() {
        assert!(parse_geometries(r#"{"type": "Circle", "coordinates": [0, 0]}"#).is_err());
    }

    #[test]
    fn feature_collection_has_one_feature_per_line() {
        let lines = vec![
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
        ];
        let json = to_feature_collection(&lines);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let features = value["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "LineString");
        assert_eq!(features[0]["properties"]["index"], 0);
        assert_eq!(features[0]["properties"]["closed"], false);
        assert_eq!(features[1]["properties"]["index"], 1);
        assert_eq!(features[1]["properties"]["closed"], true);
    }

    #[test]
    fn empty_feature_collection() {
        let value: serde_json::Value = serde_json::from_str(&to_feature_collection(&[])).unwrap();
        assert_eq!(value["features"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn output_parses_back_to_the_same_lines() {
        let lines = vec![LineString::from(vec![(0.5, 1.5), (2.0, 3.0), (4.0, 1.0)])];
        let geometries = parse_geometries(&to_feature_collection(&lines)).unwrap();
        assert_eq!(geometries, vec![Geometry::LineString(lines[0].clone())]);
    }
}

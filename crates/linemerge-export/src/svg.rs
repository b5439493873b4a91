//! SVG export serializer.
//!
//! Each merged line becomes one `<path>` element built with the [`svg`]
//! crate. Closed lines end with a close-path command so the renderer
//! joins the ring without a seam.
//!
//! Geographic coordinates grow upward while SVG grows downward, so paths
//! are wrapped in a `scale(1,-1)` group and the `viewBox` is expressed in
//! the flipped space. Paths are written relative to the lower-left corner
//! of the combined bounding box so large coordinates keep their precision.

use geo::{BoundingRect, Coord, Rect, coord};
use linemerge::LineString;
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Element, Group, Path, Title};
use svg::node::{Node, Text, Value};

/// Namespace for the embedded merge configuration.
const CONFIG_NAMESPACE: &str = "https://linemerge.dev/ns/1";

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped by the `svg`
/// crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized merge configuration, emitted inside `<metadata>` in a
    /// namespaced `<linemerge:config>` element.
    pub config_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a line.
///
/// Uses `M` for the first point and `L` for the rest, then closes the
/// path when the line is closed. Returns an empty string for lines with
/// fewer than 2 points.
///
/// Coordinates are formatted by the [`svg`] crate using `f32` precision.
/// That is too coarse for projected or geographic coordinates far from
/// the origin; [`to_svg`] shifts every line to its bounding-box origin
/// before formatting for that reason.
///
/// # Examples
///
/// ```
/// use linemerge::LineString;
/// use linemerge_export::build_path_data;
///
/// let line = LineString::from(vec![(10.0, 20.0), (30.0, 40.0)]);
/// assert_eq!(build_path_data(&line), "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(line: &LineString<f64>) -> String {
    build_path_data_shifted(line, Coord { x: 0.0, y: 0.0 })
}

/// Like [`build_path_data`] but subtracts `origin` from every coordinate
/// in `f64` before it is narrowed for formatting.
fn build_path_data_shifted(line: &LineString<f64>, origin: Coord<f64>) -> String {
    let points = &line.0;
    if points.len() < 2 {
        return String::new();
    }

    let shift = |p: &Coord<f64>| (p.x - origin.x, p.y - origin.y);
    let closed = line.is_closed() && points.len() > 2;

    let mut data = Data::new().move_to(shift(&points[0]));
    // The closing coordinate is replaced by the close command.
    let body = if closed {
        &points[1..points.len() - 1]
    } else {
        &points[1..]
    };
    for p in body {
        data = data.line_to(shift(p));
    }
    if closed {
        data = data.close();
    }
    String::from(Value::from(data))
}

/// Bounding rectangle of every line, or `None` when there is nothing to
/// draw.
fn combined_bounds(lines: &[LineString<f64>]) -> Option<Rect<f64>> {
    lines
        .iter()
        .filter_map(|line| line.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            )
        })
}

/// The `viewBox` for paths shifted to the bounds origin, in the flipped
/// y space.
///
/// Zero extents are widened to 1 so a single straight line still
/// renders. An empty input yields the unit box.
fn view_box(bounds: Option<Rect<f64>>) -> String {
    match bounds {
        Some(rect) => {
            let width = if rect.width() > 0.0 { rect.width() } else { 1.0 };
            let height = if rect.height() > 0.0 {
                rect.height()
            } else {
                1.0
            };
            format!("0 {} {width} {height}", 0.0 - height)
        }
        None => String::from("0 0 1 1"),
    }
}

/// Serialize merged lines into an SVG document string.
///
/// Lines with fewer than 2 points are skipped. Path coordinates are
/// relative to the lower-left corner of the combined bounding box, which
/// becomes the `viewBox` origin. Strokes use
/// `vector-effect="non-scaling-stroke"` so the line width stays constant
/// regardless of the coordinate range.
///
/// # Examples
///
/// ```
/// use linemerge::LineString;
/// use linemerge_export::{SvgMetadata, to_svg};
///
/// let lines = vec![LineString::from(vec![(10.0, 15.0), (12.5, 18.3)])];
/// let metadata = SvgMetadata {
///     title: Some("roads"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&lines, &metadata);
/// assert!(svg.contains("<title>roads</title>"));
/// assert!(svg.contains("M0,0 L2.5,3.3"));
/// ```
#[must_use]
pub fn to_svg(lines: &[LineString<f64>], metadata: &SvgMetadata<'_>) -> String {
    let bounds = combined_bounds(lines);
    let origin = bounds.map_or(Coord { x: 0.0, y: 0.0 }, |rect| rect.min());
    let mut doc = Document::new().set("viewBox", view_box(bounds));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("linemerge:config");
        config_el.assign("xmlns:linemerge", CONFIG_NAMESPACE);
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    let mut group = Group::new().set("transform", "scale(1,-1)");
    for line in lines {
        let d = build_path_data_shifted(line, origin);
        if d.is_empty() {
            continue;
        }
        group = group.add(
            Path::new()
                .set("d", d)
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-width", 1)
                .set("vector-effect", "non-scaling-stroke"),
        );
    }
    doc = doc.add(group);

    // The svg crate omits the XML declaration.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

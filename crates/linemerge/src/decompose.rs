//! Geometry decomposition: extract the linework of an arbitrary geometry.
//!
//! Visits every atomic component of a [`Geometry`] and hands the
//! line-shaped ones to a callback. Polygons contribute their exterior and
//! interior rings; points contribute nothing.

use std::convert::Infallible;
use std::ops::ControlFlow;

use geo::{Geometry, LineString};

/// Call `visit` once per linear component of `geometry`, in order.
///
/// Multi-geometries and collections are walked recursively. Rectangles
/// and triangles are expanded to their closed outlines. Returning
/// [`ControlFlow::Break`] stops the walk and propagates the value.
pub fn for_each_linear_component<B, F>(geometry: &Geometry<f64>, visit: &mut F) -> ControlFlow<B>
where
    F: FnMut(&LineString<f64>) -> ControlFlow<B>,
{
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => ControlFlow::Continue(()),
        Geometry::Line(line) => visit(&LineString::new(vec![line.start, line.end])),
        Geometry::LineString(line_string) => visit(line_string),
        Geometry::MultiLineString(multi) => multi.iter().try_for_each(|ls| visit(ls)),
        Geometry::Polygon(polygon) => {
            visit(polygon.exterior())?;
            polygon.interiors().iter().try_for_each(|ring| visit(ring))
        }
        Geometry::MultiPolygon(multi) => multi.iter().try_for_each(|polygon| {
            visit(polygon.exterior())?;
            polygon.interiors().iter().try_for_each(|ring| visit(ring))
        }),
        Geometry::Rect(rect) => visit(rect.to_polygon().exterior()),
        Geometry::Triangle(triangle) => visit(triangle.to_polygon().exterior()),
        Geometry::GeometryCollection(collection) => collection
            .iter()
            .try_for_each(|member| for_each_linear_component(member, visit)),
    }
}

/// Collect the linear components of `geometry` into owned line strings.
#[must_use]
pub fn linear_components(geometry: &Geometry<f64>) -> Vec<LineString<f64>> {
    let mut lines = Vec::new();
    let flow = for_each_linear_component::<Infallible, _>(geometry, &mut |line| {
        lines.push(line.clone());
        ControlFlow::Continue(())
    });
    match flow {
        ControlFlow::Continue(()) => lines,
        ControlFlow::Break(never) => match never {},
    }
}

//! Reading drawings into shapes, and writing documents back out.
//!
//! Scanning walks the markup tree in document order. Paint and extrusion
//! metadata cascade from ancestor groups: a shape's own attribute wins,
//! then the nearest `<g>` that sets it, then the [`Options`] default.

use facet_svg::facet_xml::SerializeOptions;
use facet_svg::{Group, InlineStyle, ShapeAttrs, Svg, SvgNode, facet_xml};

use crate::canonical::{
    Circle, Ellipse, Line, PathData, Polygon, Polyline, Primitive, Rect, parse_points,
};
use crate::errors::{DocumentError, ShapeError};
use crate::log::{debug, warn};
use crate::options::Options;
use crate::shape::{Shape, Stroke};
use crate::types::{Color, ViewBox};

/// What a drawing contributes to the pipeline.
#[derive(Debug, Clone)]
pub struct Scanned {
    pub view_box: ViewBox,
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

/// Parse SVG text into the typed tree.
pub fn parse(svg: &str) -> Result<Svg, DocumentError> {
    facet_xml::from_str::<Svg>(svg).map_err(|e| DocumentError::Parse {
        message: e.to_string(),
    })
}

/// Serialize a typed tree to SVG text.
pub fn serialize(svg: &Svg) -> Result<String, DocumentError> {
    facet_xml::to_string_with_options(svg, &SerializeOptions::default()).map_err(|e| {
        DocumentError::Serialize {
            message: e.to_string(),
        }
    })
}

/// Read the viewport and every drawable primitive of a drawing.
///
/// Primitives whose geometry cannot be read are skipped with a warning;
/// only a document that is not SVG at all is an error.
pub fn scan(svg: &str, options: &Options) -> Result<Scanned, DocumentError> {
    let doc = parse(svg)?;

    let view_box = match doc.view_box.as_deref() {
        Some(text) => ViewBox::parse(text).unwrap_or_else(|| {
            warn!(view_box = text, "unreadable viewBox; using the default");
            ViewBox::default()
        }),
        None => ViewBox::default(),
    };
    let width = doc
        .width
        .as_deref()
        .and_then(parse_number)
        .unwrap_or(view_box.size.x);
    let height = doc
        .height
        .as_deref()
        .and_then(parse_number)
        .unwrap_or(view_box.size.y);

    let mut scanner = Scanner {
        options,
        shapes: Vec::new(),
    };
    let root = Cascade {
        elevation: options.elevation,
        height: options.height,
        ..Default::default()
    };
    scanner.walk(&doc.children, &root);

    debug!(shapes = scanner.shapes.len(), "scanned drawing");
    Ok(Scanned {
        view_box,
        width,
        height,
        shapes: scanner.shapes,
    })
}

/// Parse a length attribute: surrounding whitespace and a `px` suffix are
/// tolerated, anything else non-numeric is `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix("px").unwrap_or(text).trim_end();
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Inheritable state from enclosing groups.
#[derive(Debug, Clone, Default)]
struct Cascade {
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: Option<String>,
    elevation: f64,
    height: f64,
}

impl Cascade {
    fn enter(&self, group: &Group) -> Cascade {
        let style = group.style.as_deref().map(InlineStyle::parse);
        let paint = |name: &str, attr: &Option<String>| {
            style
                .as_ref()
                .and_then(|s| s.get(name))
                .map(str::to_string)
                .or_else(|| attr.as_ref().map(|a| a.trim().to_string()))
        };
        Cascade {
            fill: paint("fill", &group.fill).or_else(|| self.fill.clone()),
            stroke: paint("stroke", &group.stroke).or_else(|| self.stroke.clone()),
            stroke_width: paint("stroke-width", &group.stroke_width)
                .or_else(|| self.stroke_width.clone()),
            elevation: metadata(group.data_elevation.as_deref(), "data-elevation", self.elevation),
            height: metadata(group.data_height.as_deref(), "data-height", self.height),
        }
    }
}

/// An extrusion attribute, or `fallback` when absent or unreadable.
fn metadata(value: Option<&str>, name: &str, fallback: f64) -> f64 {
    match value {
        None => fallback,
        Some(text) => parse_number(text).unwrap_or_else(|| {
            warn!(attribute = name, value = text, "unreadable metadata; inheriting");
            fallback
        }),
    }
}

/// A geometric attribute; missing or unreadable values read as 0.
fn coord(value: &Option<String>) -> f64 {
    value.as_deref().and_then(parse_number).unwrap_or(0.0)
}

fn optional(value: &Option<String>) -> Option<f64> {
    value.as_deref().and_then(parse_number)
}

struct Scanner<'a> {
    options: &'a Options,
    shapes: Vec<Shape>,
}

impl Scanner<'_> {
    fn walk(&mut self, nodes: &[SvgNode], cascade: &Cascade) {
        for node in nodes {
            let result = match node {
                SvgNode::G(group) => {
                    self.walk(&group.children, &cascade.enter(group));
                    continue;
                }
                SvgNode::Defs(_)
                | SvgNode::Style(_)
                | SvgNode::Title(_)
                | SvgNode::Desc(_)
                | SvgNode::Text(_) => continue,
                SvgNode::Other(_) => {
                    debug!("skipping unsupported element");
                    continue;
                }
                SvgNode::Rect(el) => self.push(el, cascade, || {
                    Ok(Rect {
                        x: coord(&el.x),
                        y: coord(&el.y),
                        width: coord(&el.width),
                        height: coord(&el.height),
                        rx: optional(&el.rx),
                        ry: optional(&el.ry),
                    }
                    .into())
                }),
                SvgNode::Circle(el) => self.push(el, cascade, || {
                    Ok(Circle {
                        cx: coord(&el.cx),
                        cy: coord(&el.cy),
                        r: coord(&el.r),
                    }
                    .into())
                }),
                SvgNode::Ellipse(el) => self.push(el, cascade, || {
                    Ok(Ellipse {
                        cx: coord(&el.cx),
                        cy: coord(&el.cy),
                        rx: coord(&el.rx),
                        ry: coord(&el.ry),
                    }
                    .into())
                }),
                SvgNode::Line(el) => self.push(el, cascade, || {
                    Ok(Line {
                        x1: coord(&el.x1),
                        y1: coord(&el.y1),
                        x2: coord(&el.x2),
                        y2: coord(&el.y2),
                    }
                    .into())
                }),
                SvgNode::Polygon(el) => self.push(el, cascade, || {
                    let points = parse_points(el.points.as_deref().unwrap_or_default())?;
                    Ok(Polygon { points }.into())
                }),
                SvgNode::Polyline(el) => self.push(el, cascade, || {
                    let points = parse_points(el.points.as_deref().unwrap_or_default())?;
                    Ok(Polyline { points }.into())
                }),
                SvgNode::Path(el) => self.push(el, cascade, || {
                    Ok(PathData {
                        d: el.d.clone().unwrap_or_default(),
                    }
                    .into())
                }),
            };
            if let Err(err) = result {
                warn!(shape = self.shapes.len(), error = %err, "skipping unreadable shape");
            }
        }
    }

    fn push(
        &mut self,
        el: &impl ShapeAttrs,
        cascade: &Cascade,
        primitive: impl FnOnce() -> Result<Primitive, ShapeError>,
    ) -> Result<(), ShapeError> {
        let primitive = primitive()?;

        let fill = el
            .paint("fill")
            .or_else(|| cascade.fill.clone())
            .map(Color::new);
        let has_fill = fill.as_ref().is_some_and(|f| !f.is_none());
        let fill = fill
            .filter(|f| !f.is_none())
            .unwrap_or_else(|| self.options.default_fill.clone());

        let stroke = el
            .paint("stroke")
            .or_else(|| cascade.stroke.clone())
            .map(Color::new)
            .filter(|c| !c.is_none())
            .map(|color| {
                let width = el
                    .paint("stroke-width")
                    .or_else(|| cascade.stroke_width.clone())
                    .as_deref()
                    .and_then(parse_number)
                    .unwrap_or(1.0);
                Stroke { color, width }
            });

        let mut shape = Shape::new(self.shapes.len(), primitive, fill);
        shape.has_fill = has_fill;
        shape.stroke = stroke;
        shape.elevation = metadata(el.data_elevation(), "data-elevation", cascade.elevation);
        shape.height = metadata(el.data_height(), "data-height", cascade.height);
        self.shapes.push(shape);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::ShapeKind;

    fn scan_str(body: &str) -> Scanned {
        let svg = format!(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100">{body}</svg>"#);
        scan(&svg, &Options::default()).unwrap()
    }

    #[test]
    fn reads_primitives_in_document_order() {
        let scanned = scan_str(
            r#"<rect x="1" y="2" width="10" height="5"/>
               <g><circle cx="5" cy="5" r="3"/></g>
               <text x="0" y="0">label</text>
               <polygon points="0,0 10,0 5,5"/>
               <path d="M0,0 L5,5"/>"#,
        );
        let kinds: Vec<ShapeKind> = scanned.shapes.iter().map(Shape::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ShapeKind::Rect,
                ShapeKind::Circle,
                ShapeKind::Polygon,
                ShapeKind::Path
            ]
        );
        assert_eq!(scanned.view_box.size.x, 200.0);
        assert_eq!(scanned.width, 200.0);
        assert_eq!(
            scanned.shapes[0].primitive,
            Primitive::Rect(Rect {
                x: 1.0,
                y: 2.0,
                width: 10.0,
                height: 5.0,
                rx: None,
                ry: None,
            })
        );
    }

    #[test]
    fn metadata_cascades_from_nearest_group() {
        let scanned = scan_str(
            r#"<g data-elevation="5" data-height="40">
                 <g data-height="10">
                   <rect width="1" height="1"/>
                   <rect width="1" height="1" data-elevation="7"/>
                 </g>
                 <rect width="1" height="1"/>
               </g>
               <rect width="1" height="1"/>"#,
        );
        let pairs: Vec<(f64, f64)> = scanned
            .shapes
            .iter()
            .map(|s| (s.elevation, s.height))
            .collect();
        assert_eq!(pairs, vec![(5.0, 10.0), (7.0, 10.0), (5.0, 40.0), (0.0, 20.0)]);
    }

    #[test]
    fn unreadable_metadata_falls_back() {
        let scanned = scan_str(
            r#"<g data-height="30"><rect width="1" height="1" data-height="tall" data-elevation="2px"/></g>"#,
        );
        assert_eq!(scanned.shapes[0].height, 30.0);
        assert_eq!(scanned.shapes[0].elevation, 2.0);
    }

    #[test]
    fn paint_resolution() {
        let scanned = scan_str(
            r#"<g fill="teal" stroke="navy">
                 <rect width="1" height="1"/>
                 <rect width="1" height="1" style="fill: orange"/>
                 <rect width="1" height="1" fill="none" stroke-width="3"/>
               </g>
               <rect width="1" height="1"/>"#,
        );
        let fills: Vec<&str> = scanned.shapes.iter().map(|s| s.fill.as_str()).collect();
        assert_eq!(fills, vec!["teal", "orange", "gray", "gray"]);
        assert!(scanned.shapes[0].has_fill);
        assert!(!scanned.shapes[2].has_fill);
        assert!(!scanned.shapes[3].has_fill);
        let stroke = scanned.shapes[2].stroke.as_ref().unwrap();
        assert_eq!(stroke.color.as_str(), "navy");
        assert_eq!(stroke.width, 3.0);
        assert!(scanned.shapes[3].stroke.is_none());
    }

    #[test]
    fn unreadable_shapes_are_skipped() {
        let scanned = scan_str(
            r#"<polygon points="0,0 10"/><rect width="4" height="4"/>"#,
        );
        assert_eq!(scanned.shapes.len(), 1);
        assert_eq!(scanned.shapes[0].index, 0);
    }

    #[test]
    fn elements_without_geometry_do_not_stop_the_scan() {
        let scanned = scan_str(
            r##"<metadata>exported</metadata>
               <defs><linearGradient id="g"><stop offset="0"/></linearGradient></defs>
               <rect width="4" height="4"/>
               <use href="#g"/>
               <g><image href="x.png" width="5" height="5"/><circle r="2"/></g>"##,
        );
        let kinds: Vec<ShapeKind> = scanned.shapes.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![ShapeKind::Rect, ShapeKind::Circle]);
    }

    #[test]
    fn lenient_numbers() {
        assert_eq!(parse_number(" 12px"), Some(12.0));
        assert_eq!(parse_number("-1.5e1"), Some(-15.0));
        assert_eq!(parse_number("50%"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn rejects_non_svg_documents() {
        assert!(scan("not markup", &Options::default()).is_err());
    }
}

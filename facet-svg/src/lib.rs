//! Facet-derived types for SVG parsing and serialization.
//!
//! This crate provides strongly-typed SVG elements that can be deserialized
//! from XML using `facet-xml`, covering the flat drawing dialect read by
//! `isoextrude` (basic shapes plus `data-elevation` / `data-height`
//! metadata) and the faces it writes back out.
//!
//! Geometric attributes are kept as strings: drawings in the wild carry
//! values like `10px` or `50%`, and rejecting the whole document over one
//! attribute is worse than defaulting that attribute later.
//!
//! # Example
//!
//! ```rust
//! use facet_svg::{Svg, SvgNode};
//!
//! let svg_str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
//!     <rect x="10" y="10" width="80" height="80" fill="blue" data-height="30"/>
//! </svg>"#;
//!
//! let svg: Svg = facet_xml::from_str(svg_str).unwrap();
//! assert!(matches!(svg.children[0], SvgNode::Rect(_)));
//! ```

use facet::Facet;
use facet_xml as xml;

mod style;

pub use style::InlineStyle;

/// SVG namespace URI
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Root SVG element
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Svg {
    #[facet(xml::attribute)]
    pub xmlns: Option<String>,
    #[facet(xml::attribute)]
    pub width: Option<String>,
    #[facet(xml::attribute)]
    pub height: Option<String>,
    #[facet(xml::attribute, rename = "viewBox")]
    pub view_box: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<SvgNode>,
}

impl Svg {
    /// An empty document carrying the SVG namespace and the given viewport.
    pub fn with_viewport(view_box: String, width: String, height: String) -> Self {
        Svg {
            xmlns: Some(SVG_NS.to_string()),
            width: Some(width),
            height: Some(height),
            view_box: Some(view_box),
            children: Vec::new(),
        }
    }
}

/// Any SVG node we care about
#[derive(Facet, Debug, Clone)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
#[repr(u8)]
pub enum SvgNode {
    #[facet(rename = "g")]
    G(Group),
    #[facet(rename = "defs")]
    Defs(Defs),
    #[facet(rename = "style")]
    Style(Style),
    #[facet(rename = "title")]
    Title(Title),
    #[facet(rename = "desc")]
    Desc(Desc),
    #[facet(rename = "rect")]
    Rect(Rect),
    #[facet(rename = "circle")]
    Circle(Circle),
    #[facet(rename = "ellipse")]
    Ellipse(Ellipse),
    #[facet(rename = "line")]
    Line(Line),
    #[facet(rename = "path")]
    Path(Path),
    #[facet(rename = "polygon")]
    Polygon(Polygon),
    #[facet(rename = "polyline")]
    Polyline(Polyline),
    #[facet(rename = "text")]
    Text(Text),
    /// Any element not modelled above (`metadata`, `use`, `image`,
    /// gradients, ...). Its attributes and content are dropped.
    #[facet(other)]
    Other(Other),
}

/// An element of a kind we do not read
#[derive(Facet, Debug, Clone, Default)]
pub struct Other {}

/// SVG group element (`<g>`)
///
/// Groups carry inheritable elevation/height metadata for the shapes inside
/// them; the `data-index`/`data-x`/`data-y` attributes label debug markers.
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Group {
    #[facet(xml::attribute)]
    pub id: Option<String>,
    #[facet(xml::attribute)]
    pub class: Option<String>,
    #[facet(xml::attribute)]
    pub transform: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::attribute, rename = "data-elevation")]
    pub data_elevation: Option<String>,
    #[facet(xml::attribute, rename = "data-height")]
    pub data_height: Option<String>,
    #[facet(xml::attribute, rename = "data-index")]
    pub data_index: Option<String>,
    #[facet(xml::attribute, rename = "data-x")]
    pub data_x: Option<String>,
    #[facet(xml::attribute, rename = "data-y")]
    pub data_y: Option<String>,
    #[facet(xml::elements)]
    pub children: Vec<SvgNode>,
}

/// SVG defs element (`<defs>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Defs {
    #[facet(xml::elements)]
    pub children: Vec<SvgNode>,
}

/// SVG style element (`<style>`)
#[derive(Facet, Debug, Clone, Default)]
pub struct Style {
    #[facet(xml::attribute, rename = "type")]
    pub type_: Option<String>,
    #[facet(xml::text)]
    pub content: String,
}

/// SVG title element (`<title>`)
#[derive(Facet, Debug, Clone, Default)]
pub struct Title {
    #[facet(xml::text)]
    pub content: String,
}

/// SVG desc element (`<desc>`)
#[derive(Facet, Debug, Clone, Default)]
pub struct Desc {
    #[facet(xml::text)]
    pub content: String,
}

/// Attributes shared by every drawable primitive: paint and extrusion metadata.
pub trait ShapeAttrs {
    fn fill(&self) -> Option<&str>;
    fn stroke(&self) -> Option<&str>;
    fn stroke_width(&self) -> Option<&str>;
    fn style(&self) -> Option<&str>;
    fn data_elevation(&self) -> Option<&str>;
    fn data_height(&self) -> Option<&str>;

    /// A paint property, preferring the inline `style` declaration over the
    /// presentation attribute as CSS does.
    fn paint(&self, name: &str) -> Option<String> {
        if let Some(value) = self
            .style()
            .and_then(|s| InlineStyle::parse(s).get(name).map(str::to_string))
        {
            return Some(value);
        }
        let attr = match name {
            "fill" => self.fill(),
            "stroke" => self.stroke(),
            "stroke-width" => self.stroke_width(),
            _ => None,
        };
        attr.map(|s| s.trim().to_string())
    }
}

macro_rules! impl_shape_attrs {
    ($($ty:ty),*) => {
        $(
            impl ShapeAttrs for $ty {
                fn fill(&self) -> Option<&str> { self.fill.as_deref() }
                fn stroke(&self) -> Option<&str> { self.stroke.as_deref() }
                fn stroke_width(&self) -> Option<&str> { self.stroke_width.as_deref() }
                fn style(&self) -> Option<&str> { self.style.as_deref() }
                fn data_elevation(&self) -> Option<&str> { self.data_elevation.as_deref() }
                fn data_height(&self) -> Option<&str> { self.data_height.as_deref() }
            }
        )*
    };
}

/// SVG rect element (`<rect>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Rect {
    #[facet(xml::attribute)]
    pub x: Option<String>,
    #[facet(xml::attribute)]
    pub y: Option<String>,
    #[facet(xml::attribute)]
    pub width: Option<String>,
    #[facet(xml::attribute)]
    pub height: Option<String>,
    #[facet(xml::attribute)]
    pub rx: Option<String>,
    #[facet(xml::attribute)]
    pub ry: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::attribute, rename = "data-elevation")]
    pub data_elevation: Option<String>,
    #[facet(xml::attribute, rename = "data-height")]
    pub data_height: Option<String>,
}

/// SVG circle element (`<circle>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Circle {
    #[facet(xml::attribute)]
    pub cx: Option<String>,
    #[facet(xml::attribute)]
    pub cy: Option<String>,
    #[facet(xml::attribute)]
    pub r: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::attribute, rename = "data-elevation")]
    pub data_elevation: Option<String>,
    #[facet(xml::attribute, rename = "data-height")]
    pub data_height: Option<String>,
}

/// SVG ellipse element (`<ellipse>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Ellipse {
    #[facet(xml::attribute)]
    pub cx: Option<String>,
    #[facet(xml::attribute)]
    pub cy: Option<String>,
    #[facet(xml::attribute)]
    pub rx: Option<String>,
    #[facet(xml::attribute)]
    pub ry: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::attribute, rename = "data-elevation")]
    pub data_elevation: Option<String>,
    #[facet(xml::attribute, rename = "data-height")]
    pub data_height: Option<String>,
}

/// SVG line element (`<line>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Line {
    #[facet(xml::attribute)]
    pub x1: Option<String>,
    #[facet(xml::attribute)]
    pub y1: Option<String>,
    #[facet(xml::attribute)]
    pub x2: Option<String>,
    #[facet(xml::attribute)]
    pub y2: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::attribute, rename = "data-elevation")]
    pub data_elevation: Option<String>,
    #[facet(xml::attribute, rename = "data-height")]
    pub data_height: Option<String>,
}

/// SVG path element (`<path>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Path {
    #[facet(xml::attribute)]
    pub d: Option<String>,
    #[facet(xml::attribute)]
    pub class: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::attribute, rename = "data-elevation")]
    pub data_elevation: Option<String>,
    #[facet(xml::attribute, rename = "data-height")]
    pub data_height: Option<String>,
    #[facet(xml::attribute, rename = "data-depth")]
    pub data_depth: Option<String>,
}

/// SVG polygon element (`<polygon>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Polygon {
    #[facet(xml::attribute)]
    pub points: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::attribute, rename = "data-elevation")]
    pub data_elevation: Option<String>,
    #[facet(xml::attribute, rename = "data-height")]
    pub data_height: Option<String>,
}

/// SVG polyline element (`<polyline>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Polyline {
    #[facet(xml::attribute)]
    pub points: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute)]
    pub stroke: Option<String>,
    #[facet(xml::attribute, rename = "stroke-width")]
    pub stroke_width: Option<String>,
    #[facet(xml::attribute)]
    pub opacity: Option<String>,
    #[facet(xml::attribute)]
    pub style: Option<String>,
    #[facet(xml::attribute, rename = "data-elevation")]
    pub data_elevation: Option<String>,
    #[facet(xml::attribute, rename = "data-height")]
    pub data_height: Option<String>,
}

/// SVG text element (`<text>`)
#[derive(Facet, Debug, Clone, Default)]
#[facet(xml::ns_all = "http://www.w3.org/2000/svg")]
pub struct Text {
    #[facet(xml::attribute)]
    pub x: Option<String>,
    #[facet(xml::attribute)]
    pub y: Option<String>,
    #[facet(xml::attribute)]
    pub fill: Option<String>,
    #[facet(xml::attribute, rename = "font-size")]
    pub font_size: Option<String>,
    #[facet(xml::attribute, rename = "font-family")]
    pub font_family: Option<String>,
    #[facet(xml::attribute, rename = "text-anchor")]
    pub text_anchor: Option<String>,
    #[facet(xml::attribute, rename = "dominant-baseline")]
    pub dominant_baseline: Option<String>,
    #[facet(xml::text)]
    pub content: String,
}

impl_shape_attrs!(Rect, Circle, Ellipse, Line, Path, Polygon, Polyline);

// Re-export facet_xml for convenience
pub use facet_xml;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_metadata_attributes() {
        let svg: Svg = facet_xml::from_str(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g data-elevation="5"><rect x="1" data-height="30"/></g></svg>"#,
        )
        .unwrap();
        let SvgNode::G(group) = &svg.children[0] else {
            panic!("expected a group");
        };
        assert_eq!(group.data_elevation.as_deref(), Some("5"));
        let SvgNode::Rect(rect) = &group.children[0] else {
            panic!("expected a rect");
        };
        assert_eq!(rect.x.as_deref(), Some("1"));
        assert_eq!(rect.data_height(), Some("30"));
    }

    #[test]
    fn unknown_elements_are_kept_as_other() {
        let svg: Svg = facet_xml::from_str(
            r##"<svg xmlns="http://www.w3.org/2000/svg">
                <metadata>drawn by hand</metadata>
                <defs><linearGradient id="fade"><stop offset="0"/></linearGradient></defs>
                <use href="#a"/>
                <image href="photo.png" width="10" height="10"/>
                <rect x="1"/>
            </svg>"##,
        )
        .unwrap();
        assert_eq!(svg.children.len(), 5);
        assert!(matches!(svg.children[0], SvgNode::Other(_)));
        let SvgNode::Defs(defs) = &svg.children[1] else {
            panic!("expected defs");
        };
        assert!(matches!(defs.children[..], [SvgNode::Other(_)]));
        assert!(matches!(svg.children[2], SvgNode::Other(_)));
        assert!(matches!(svg.children[3], SvgNode::Other(_)));
        assert!(matches!(svg.children[4], SvgNode::Rect(_)));
    }

    #[test]
    fn inline_style_wins_over_attribute() {
        let rect = Rect {
            fill: Some("red".to_string()),
            style: Some("fill: blue; stroke-width: 2".to_string()),
            ..Default::default()
        };
        assert_eq!(rect.paint("fill").as_deref(), Some("blue"));
        assert_eq!(rect.paint("stroke-width").as_deref(), Some("2"));
        assert_eq!(rect.paint("stroke"), None);
    }
}

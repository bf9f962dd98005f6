//! Annotations of the debug rendering.

use facet_svg::{Circle, Group, Rect, SvgNode, Text};

use crate::order::{Face, FaceKind};
use crate::path::fmt_num;
use crate::shape::Shape;

/// Numbered markers on every boundary point of a shape, in wall order.
pub fn boundary_markers(shape: &Shape) -> Vec<SvgNode> {
    shape
        .walls
        .iter()
        .flat_map(|wall| wall.boundaries.iter().enumerate())
        .map(|(i, p)| {
            SvgNode::G(Group {
                class: Some("boundary".to_string()),
                data_index: Some(i.to_string()),
                data_x: Some(fmt_num(p.x)),
                data_y: Some(fmt_num(p.y)),
                children: vec![
                    SvgNode::Circle(Circle {
                        cx: Some(fmt_num(p.x)),
                        cy: Some(fmt_num(p.y)),
                        r: Some("1.5".to_string()),
                        fill: Some("red".to_string()),
                        ..Default::default()
                    }),
                    SvgNode::Text(Text {
                        x: Some(fmt_num(p.x)),
                        y: Some(fmt_num(p.y - 3.0)),
                        fill: Some("red".to_string()),
                        font_size: Some("4".to_string()),
                        font_family: Some("Arial".to_string()),
                        text_anchor: Some("middle".to_string()),
                        content: i.to_string(),
                        ..Default::default()
                    }),
                ],
                ..Default::default()
            })
        })
        .collect()
}

/// The bounding box of a face with its depth written below it: red for
/// floors, blue for walls.
pub fn depth_label(face: &Face) -> Vec<SvgNode> {
    let bbox = face.path.bounding_box();
    if bbox.is_empty() {
        return Vec::new();
    }
    let color = match face.kind {
        FaceKind::Floor => "red",
        _ => "blue",
    };
    vec![
        SvgNode::Rect(Rect {
            x: Some(fmt_num(bbox.min.x)),
            y: Some(fmt_num(bbox.min.y)),
            width: Some(fmt_num(bbox.width())),
            height: Some(fmt_num(bbox.height())),
            fill: Some("none".to_string()),
            stroke: Some(color.to_string()),
            stroke_width: Some("0.5".to_string()),
            ..Default::default()
        }),
        SvgNode::Text(Text {
            x: Some(fmt_num(bbox.center().x)),
            y: Some(fmt_num(bbox.max.y + 5.0)),
            fill: Some(color.to_string()),
            font_size: Some("6".to_string()),
            font_family: Some("Arial".to_string()),
            text_anchor: Some("middle".to_string()),
            content: format!("{:.2}", face.depth),
            ..Default::default()
        }),
    ]
}

//! Small value types shared across the pipeline: bounding boxes and paint colours.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use palette::{Clamp, FromColor, LinSrgb, Oklab, Srgb};

// ============================================================================
// Bounding boxes
// ============================================================================

/// Axis-aligned bounding box.
///
/// An empty box has `min = +inf`, `max = -inf` so that including the first
/// point makes it a degenerate box around that point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BBox {
    pub fn new() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut bbox = Self::new();
        for p in points {
            bbox.include(p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

/// The `viewBox` of a document: origin and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub min: DVec2,
    pub size: DVec2,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            min: DVec2::ZERO,
            size: DVec2::splat(100.0),
        }
    }
}

impl ViewBox {
    /// Parse `"min-x min-y width height"`; `None` unless four numbers are present.
    pub fn parse(text: &str) -> Option<ViewBox> {
        let nums: Vec<f64> = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>().ok())
            .collect::<Option<_>>()?;
        match nums[..] {
            [x, y, w, h] => Some(ViewBox {
                min: DVec2::new(x, y),
                size: DVec2::new(w, h),
            }),
            _ => None,
        }
    }

    /// The view box enclosing `bbox` with `padding` on every side, moved to the origin.
    pub fn around(bbox: &BBox, padding: f64) -> ViewBox {
        ViewBox {
            min: DVec2::ZERO,
            size: DVec2::new(bbox.width() + 2.0 * padding, bbox.height() + 2.0 * padding),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.min.y + self.size.y
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::path::fmt_num;
        write!(
            f,
            "{} {} {} {}",
            fmt_num(self.min.x),
            fmt_num(self.min.y),
            fmt_num(self.size.x),
            fmt_num(self.size.y)
        )
    }
}

// ============================================================================
// Colours
// ============================================================================

/// A paint value as written in the document.
///
/// The source text is kept verbatim so that untouched fills round-trip
/// exactly; the sRGB value is only resolved when a colour must be derived.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    pub fn new(text: impl Into<String>) -> Self {
        Color(text.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.eq_ignore_ascii_case("none")
    }

    /// Resolve to 8-bit sRGB. `None` for `none`, `transparent`, paint
    /// servers (`url(#..)`) and anything else we cannot read.
    pub fn to_rgb(&self) -> Option<[u8; 3]> {
        self.srgb().map(|c| [c.red, c.green, c.blue])
    }

    fn srgb(&self) -> Option<Srgb<u8>> {
        let s = self.0.as_str();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = s
            .strip_prefix("rgb(")
            .or_else(|| s.strip_prefix("rgba("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args);
        }
        palette::named::from_str(&s.to_ascii_lowercase())
    }

    /// Darken and desaturate in OKLab: lightness is scaled by `lightness`,
    /// the chromatic axes by `chroma`. Colours we cannot resolve are
    /// returned unchanged.
    pub fn darken(&self, lightness: f64, chroma: f64) -> Color {
        if self.is_none() {
            return self.clone();
        }
        let Some(rgb) = self.srgb() else {
            return self.clone();
        };
        let linear: LinSrgb<f64> = rgb.into_format::<f64>().into_linear();
        let lab: Oklab<f64> = Oklab::from_color(linear);
        let adjusted = Oklab::new((lab.l * lightness).max(0.0), lab.a * chroma, lab.b * chroma);
        let out: Srgb<f64> = Srgb::from_linear(LinSrgb::from_color(adjusted));
        let out: Srgb<u8> = out.clamp().into_format();
        Color(format!("#{:02x}{:02x}{:02x}", out.red, out.green, out.blue))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Color {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Color::new(s))
    }
}

fn parse_hex(hex: &str) -> Option<Srgb<u8>> {
    // alpha digits are ignored
    let opaque = match hex.len() {
        4 => hex.get(..3)?,
        8 => hex.get(..6)?,
        _ => hex,
    };
    opaque.parse().ok()
}

fn parse_rgb_args(args: &str) -> Option<Srgb<u8>> {
    let mut channels = args
        .split(|c: char| c == ',' || c.is_whitespace() || c == '/')
        .filter(|s| !s.is_empty());
    let mut out = [0u8; 3];
    for slot in &mut out {
        let raw = channels.next()?;
        let value = match raw.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 2.55,
            None => raw.parse::<f64>().ok()?,
        };
        *slot = value.round().clamp(0.0, 255.0) as u8;
    }
    let [r, g, b] = out;
    Some(Srgb::new(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_grows_from_empty() {
        let mut bbox = BBox::new();
        assert!(bbox.is_empty());
        assert_eq!(bbox.width(), 0.0);
        bbox.include(DVec2::new(1.0, 2.0));
        bbox.include(DVec2::new(-3.0, 5.0));
        assert_eq!(bbox.min, DVec2::new(-3.0, 2.0));
        assert_eq!(bbox.max, DVec2::new(1.0, 5.0));
        assert_eq!(bbox.width(), 4.0);
        assert_eq!(bbox.height(), 3.0);
    }

    #[test]
    fn view_box_parse_and_display() {
        let vb = ViewBox::parse("0 -10,200 150.5").unwrap();
        assert_eq!(vb.min, DVec2::new(0.0, -10.0));
        assert_eq!(vb.bottom(), 140.5);
        assert_eq!(vb.to_string(), "0 -10 200 150.5");
        assert!(ViewBox::parse("0 0 100").is_none());
        assert!(ViewBox::parse("a b c d").is_none());
    }

    #[test]
    fn color_resolves_common_syntaxes() {
        assert_eq!(Color::new("red").to_rgb(), Some([255, 0, 0]));
        assert_eq!(Color::new("#0f0").to_rgb(), Some([0, 255, 0]));
        assert_eq!(Color::new("#336699").to_rgb(), Some([0x33, 0x66, 0x99]));
        assert_eq!(Color::new("rgb(1, 2, 3)").to_rgb(), Some([1, 2, 3]));
        assert_eq!(Color::new("url(#grad)").to_rgb(), None);
    }

    #[test]
    fn color_resolves_names_and_alpha_hex() {
        assert_eq!(Color::new("SteelBlue").to_rgb(), Some([70, 130, 180]));
        assert_eq!(Color::new("rebeccapurple").to_rgb(), Some([102, 51, 153]));
        assert_eq!(Color::new("#336699cc").to_rgb(), Some([0x33, 0x66, 0x99]));
        assert_eq!(Color::new("#0f08").to_rgb(), Some([0, 255, 0]));
        assert_eq!(Color::new("notacolour").to_rgb(), None);
    }

    #[test]
    fn darken_keeps_hue_of_saturated_colours() {
        let [r, g, b] = Color::new("tomato").darken(0.7, 0.9).to_rgb().unwrap();
        // still reddish, and darker than the source's red channel
        assert!(r > g && r > b);
        assert!(r < 255);
    }

    #[test]
    fn darken_identity_factors_preserve_colour() {
        assert_eq!(Color::new("#336699").darken(1.0, 1.0).as_str(), "#336699");
        assert_eq!(Color::new("white").darken(1.0, 1.0).as_str(), "#ffffff");
    }

    #[test]
    fn darken_reduces_lightness() {
        let original = Color::new("gray").to_rgb().unwrap();
        let darker = Color::new("gray").darken(0.7, 0.9).to_rgb().unwrap();
        assert!(darker[0] < original[0]);
        // gray has no chroma, so the result stays neutral
        assert!(darker[0].abs_diff(darker[1]) <= 1);
        assert!(darker[1].abs_diff(darker[2]) <= 1);
    }

    #[test]
    fn darken_passes_through_unknown_and_none() {
        assert_eq!(Color::new("none").darken(0.5, 0.5).as_str(), "none");
        assert_eq!(
            Color::new("url(#grad)").darken(0.5, 0.5).as_str(),
            "url(#grad)"
        );
        assert_eq!(Color::new("black").darken(0.5, 0.5).as_str(), "#000000");
    }
}

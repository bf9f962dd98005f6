//! Transformation options.

use crate::log::warn;
use crate::types::Color;

/// Floor for [`Options::samples`]
pub const MIN_SAMPLES: usize = 8;

/// Tunables for one transformation run.
///
/// Per-shape `data-elevation` / `data-height` attributes override the
/// elevation and height defaults.
#[derive(Debug, Clone)]
pub struct Options {
    /// Elevation for shapes without `data-elevation`
    pub elevation: f64,
    /// Extrusion height for shapes without `data-height`
    pub height: f64,
    /// Margin around the recentered drawing
    pub padding: f64,
    /// Minimum number of outline samples used when looking for extrema
    pub samples: usize,
    /// Junctions with an interior angle below this (degrees) split walls
    pub corner_angle: f64,
    /// Boundary points closer than this are treated as one
    pub dedup_tolerance: f64,
    /// OKLab lightness factors for even and odd walls
    pub wall_tones: [f64; 2],
    /// OKLab chroma factor applied to wall colours
    pub wall_chroma: f64,
    /// Fill for shapes that specify none
    pub default_fill: Color,
    /// Produce the annotated debug document alongside the clean one
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            elevation: 0.0,
            height: 20.0,
            padding: 20.0,
            samples: 200,
            corner_angle: 130.0,
            dedup_tolerance: 0.01,
            wall_tones: [0.85, 0.7],
            wall_chroma: 0.9,
            default_fill: Color::new("gray"),
            debug: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Minimum number of arc-length samples per outline when looking for
    /// extrema. Values below [`MIN_SAMPLES`] are raised to it.
    pub fn with_samples(mut self, samples: usize) -> Self {
        if samples < MIN_SAMPLES {
            warn!(samples, min = MIN_SAMPLES, "too few outline samples; raising");
        }
        self.samples = samples.max(MIN_SAMPLES);
        self
    }

    pub fn with_corner_angle(mut self, degrees: f64) -> Self {
        self.corner_angle = degrees;
        self
    }

    pub fn with_default_fill(mut self, fill: impl Into<String>) -> Self {
        self.default_fill = Color::new(fill);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Fill colour of the wall at `index` for a floor painted `fill`.
    pub fn wall_fill(&self, fill: &Color, index: usize) -> Color {
        fill.darken(self.wall_tones[index % 2], self.wall_chroma)
    }
}

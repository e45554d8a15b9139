mod dedupe;
pub mod enhance;
mod error;
pub mod metrics;
pub mod report;
mod result;
pub mod squares;
mod util;

use image::DynamicImage;
use tracing::instrument;

pub use dedupe::dedupe_quadrilaterals;
pub use enhance::enhance;
pub use error::{Error, Result};
pub use metrics::compute_label;
pub use result::*;
pub use squares::SquareFinder;

pub use imageproc::point::Point;

pub struct LabelDetectorBuilder {
    options: DetectionOptions,
    enhance: bool,
}

impl LabelDetectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: DetectionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn edge_threshold(mut self, edge_threshold: f32) -> Self {
        self.options.edge_threshold = edge_threshold;
        self
    }

    pub fn level_count(mut self, level_count: u32) -> Self {
        self.options.level_count = level_count;
        self
    }

    pub fn min_area(mut self, min_area: f64) -> Self {
        self.options.min_area = min_area;
        self
    }

    pub fn max_corner_cosine(mut self, max_corner_cosine: f64) -> Self {
        self.options.max_corner_cosine = max_corner_cosine;
        self
    }

    pub fn approx_tolerance(mut self, approx_tolerance: f64) -> Self {
        self.options.approx_tolerance = approx_tolerance;
        self
    }

    pub fn dedupe(mut self, dedupe: bool) -> Self {
        self.options.dedupe = dedupe;
        self
    }

    pub fn dedupe_distance(mut self, distance: f64) -> Self {
        self.options.dedupe_distance = distance;
        self
    }

    /// Skip the contrast/sharpen pass when the input is already clean.
    pub fn enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }

    #[instrument(skip(self))]
    pub fn build(self) -> Result<LabelDetector> {
        let finder = SquareFinder::new(self.options)?;
        log::debug!("Detector options: {:?}", self.options);
        Ok(LabelDetector {
            finder,
            enhance: self.enhance,
        })
    }
}

impl Default for LabelDetectorBuilder {
    fn default() -> Self {
        Self {
            options: DetectionOptions::default(),
            enhance: true,
        }
    }
}

pub struct LabelDetector {
    finder: SquareFinder,
    enhance: bool,
}

impl LabelDetector {
    pub fn options(&self) -> &DetectionOptions {
        self.finder.options()
    }

    #[instrument(skip(self, image))]
    pub fn detect(&self, image: &DynamicImage) -> Result<Vec<PrintedLabel>> {
        Ok(self
            .detect_with_bounds(image)?
            .into_iter()
            .map(|it| it.label)
            .collect())
    }

    #[instrument(skip(self, image))]
    pub fn detect_with_bounds(&self, image: &DynamicImage) -> Result<Vec<DetectedLabel>> {
        let image = image.to_rgb8();
        let image = if self.enhance {
            enhance(&image)?
        } else {
            image
        };
        let quads = self.finder.find_quadrilaterals(&image)?;

        Ok(quads
            .into_iter()
            .map(|bounds| DetectedLabel {
                label: compute_label(&bounds),
                bounds,
            })
            .collect())
    }
}

/// Tuning knobs of the square search. The defaults reproduce the classic
/// OpenCV squares sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionOptions {
    /// High Canny threshold for the edge-map level; the low one is 0.
    pub edge_threshold: f32,
    /// Number of intensity levels per channel, level 0 being the edge map.
    pub level_count: u32,
    pub min_area: f64,
    /// Candidates whose worst corner has a larger |cos| are rejected.
    pub max_corner_cosine: f64,
    /// Polygon simplification tolerance as a fraction of contour perimeter.
    pub approx_tolerance: f64,
    pub dedupe: bool,
    pub dedupe_distance: f64,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            edge_threshold: 50.0,
            level_count: 11,
            min_area: 1000.0,
            max_corner_cosine: 0.3,
            approx_tolerance: 0.02,
            dedupe: false,
            dedupe_distance: 10.0,
        }
    }
}

impl DetectionOptions {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(Error::InvalidConfig(msg)) };
        if !(self.edge_threshold.is_finite() && self.edge_threshold > 0.0) {
            return invalid(format!(
                "edge_threshold must be positive, got {}",
                self.edge_threshold
            ));
        }
        if !(1..=255).contains(&self.level_count) {
            return invalid(format!(
                "level_count must be in 1..=255, got {}",
                self.level_count
            ));
        }
        if !(self.min_area.is_finite() && self.min_area >= 0.0) {
            return invalid(format!("min_area must be >= 0, got {}", self.min_area));
        }
        if !(self.max_corner_cosine > 0.0 && self.max_corner_cosine <= 1.0) {
            return invalid(format!(
                "max_corner_cosine must be in (0, 1], got {}",
                self.max_corner_cosine
            ));
        }
        if !(self.approx_tolerance > 0.0 && self.approx_tolerance < 1.0) {
            return invalid(format!(
                "approx_tolerance must be in (0, 1), got {}",
                self.approx_tolerance
            ));
        }
        if !(self.dedupe_distance.is_finite() && self.dedupe_distance >= 0.0) {
            return invalid(format!(
                "dedupe_distance must be >= 0, got {}",
                self.dedupe_distance
            ));
        }
        Ok(())
    }
}

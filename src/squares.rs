use geo::{Area, IsConvex};
use image::{imageops::FilterType, GrayImage, Luma, RgbImage};
use imageproc::{
    contours::find_contours,
    contrast::{threshold_mut, ThresholdType},
    distance_transform::Norm,
    edges::canny,
    morphology::dilate,
    point::Point,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::instrument;

use crate::{
    dedupe::dedupe_quadrilaterals,
    error::ensure_non_empty,
    util::{approximate_closed_polygon, max_corner_cosine, to_geo_poly},
    DetectionOptions, Quadrilateral, Result,
};

const CHANNELS: usize = 3;
const CANNY_LOW_THRESHOLD: f32 = f32::MIN_POSITIVE;

/// Searches every color channel at every intensity level for convex,
/// near-right-angled quadrilaterals.
#[derive(Debug, Clone)]
pub struct SquareFinder {
    options: DetectionOptions,
}

impl SquareFinder {
    pub fn new(options: DetectionOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Results come in (channel, level, contour) discovery order. The same
    /// rectangle is usually found several times unless `dedupe` is set.
    #[instrument(skip(self, image), level = "debug")]
    pub fn find_quadrilaterals(&self, image: &RgbImage) -> Result<Vec<Quadrilateral>> {
        ensure_non_empty(image.width(), image.height())?;

        let denoised = suppress_noise(image);
        let planes: [GrayImage; CHANNELS] = std::array::from_fn(|c| channel_plane(&denoised, c));
        let scans = (0..CHANNELS)
            .flat_map(|channel| (0..self.options.level_count).map(move |level| (channel, level)))
            .collect::<Vec<_>>();

        #[cfg(feature = "parallel")]
        let scans = scans.par_iter();
        #[cfg(not(feature = "parallel"))]
        let scans = scans.iter();

        let found = scans
            .map(|&(channel, level)| self.scan_level(&planes[channel], channel, level))
            .collect::<Vec<_>>();
        let squares = found.into_iter().flatten().collect::<Vec<_>>();
        log::debug!("Found {} quadrilateral candidates", squares.len());

        if self.options.dedupe {
            let squares = dedupe_quadrilaterals(squares, self.options.dedupe_distance);
            log::debug!("{} candidates left after dedupe", squares.len());
            return Ok(squares);
        }
        Ok(squares)
    }

    #[instrument(skip(self, plane), level = "trace")]
    fn scan_level(&self, plane: &GrayImage, channel: usize, level: u32) -> Vec<Quadrilateral> {
        let map = self.binary_map(plane, level);

        #[cfg(feature = "debug")]
        if let Err(err) = std::fs::create_dir_all("debug_maps")
            .map_err(image::ImageError::IoError)
            .and_then(|_| map.save(format!("debug_maps/c{channel}_l{level}.png")))
        {
            log::warn!("Failed to dump binary map for channel {channel} level {level}: {err}");
        }

        let squares = find_contours::<i32>(&map)
            .into_iter()
            .map(|contour| approximate_closed_polygon(&contour.points, self.options.approx_tolerance))
            .filter_map(|polygon| self.accept(&polygon))
            .collect::<Vec<_>>();
        log::trace!(
            "Channel {channel} level {level}: {} quadrilaterals",
            squares.len()
        );
        squares
    }

    fn binary_map(&self, plane: &GrayImage, level: u32) -> GrayImage {
        if level == 0 {
            // Effectively a low threshold of 0: every non-suppressed edge pixel
            // linked to a strong one is kept, while suppressed (zero) pixels
            // and the zeroed raster border never join the trace.
            let edges = canny(plane, CANNY_LOW_THRESHOLD, self.options.edge_threshold);
            dilate(&edges, Norm::LInf, 1)
        } else {
            let mut map = plane.clone();
            // Binary keeps values strictly above the threshold
            let cutoff = level_cutoff(level, self.options.level_count);
            threshold_mut(&mut map, cutoff - 1, ThresholdType::Binary);
            map
        }
    }

    fn accept(&self, polygon: &[Point<i32>]) -> Option<Quadrilateral> {
        if polygon.len() != 4 {
            return None;
        }
        let poly = to_geo_poly(polygon);
        if poly.unsigned_area() <= self.options.min_area {
            return None;
        }
        if !poly.exterior().is_strictly_convex() {
            return None;
        }
        let quad = Quadrilateral::new(polygon).ok()?;
        if max_corner_cosine(&quad.coords()) >= self.options.max_corner_cosine {
            return None;
        }
        Some(quad)
    }
}

/// Intensity at or above which a pixel is foreground for `level >= 1`.
/// Never below 2 while `level_count <= 255`.
pub(crate) fn level_cutoff(level: u32, level_count: u32) -> u8 {
    ((level + 1) * 255 / level_count).min(255) as u8
}

/// Down- then up-sampling by a factor of two to wash out pixel noise.
fn suppress_noise(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let small = image::imageops::resize(
        image,
        (width / 2).max(1),
        (height / 2).max(1),
        FilterType::Triangle,
    );
    image::imageops::resize(&small, width, height, FilterType::Triangle)
}

fn channel_plane(image: &RgbImage, channel: usize) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y).0[channel]])
    })
}

//! Console and image output for detected labels.

use std::fmt::Write;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::{PrintedLabel, Quadrilateral};

const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const OUTLINE_THICKNESS: i32 = 3;

/// One tab-separated line per label:
/// `n)  (width, height)  orientation  area  perimeter  confidence`.
pub fn render_report(labels: &[PrintedLabel]) -> String {
    let mut report = String::from("The results are as follows:\n");
    if labels.is_empty() {
        report.push_str("No labels detected.\n");
        return report;
    }
    for (i, label) in labels.iter().enumerate() {
        // writing into a String cannot fail
        let _ = writeln!(
            report,
            "{})\t({:.2}, {:.2})\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
            i + 1,
            label.position.width,
            label.position.height,
            label.orientation,
            label.area,
            label.perimeter,
            label.confidence,
        );
    }
    report
}

/// Copy of `image` with every quadrilateral outlined in green.
pub fn draw_quadrilaterals(image: &RgbImage, quads: &[Quadrilateral]) -> RgbImage {
    let mut canvas = image.clone();
    let half = OUTLINE_THICKNESS / 2;
    for quad in quads {
        let points = quad.points();
        for (i, start) in points.iter().enumerate() {
            let end = points[(i + 1) % points.len()];
            for offset in -half..=half {
                for (dx, dy) in [(offset, 0), (0, offset)] {
                    draw_line_segment_mut(
                        &mut canvas,
                        ((start.x + dx) as f32, (start.y + dy) as f32),
                        ((end.x + dx) as f32, (end.y + dy) as f32),
                        OUTLINE_COLOR,
                    );
                }
            }
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use imageproc::point::Point;

    use super::*;
    use crate::Position;

    #[test]
    fn report_lists_labels_in_order() {
        let label = |width: f64| PrintedLabel {
            position: Position {
                width,
                height: 50.0,
            },
            orientation: 12.5,
            area: width * 50.0,
            perimeter: 2.0 * (width + 50.0),
            confidence: 0.987,
        };
        let report = render_report(&[label(100.0), label(20.0)]);
        let lines = report.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "The results are as follows:");
        assert_eq!(
            lines[1],
            "1)\t(100.00, 50.00)\t12.50\t5000.00\t300.00\t0.99"
        );
        assert!(lines[2].starts_with("2)\t(20.00, 50.00)"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_report_says_so() {
        assert_eq!(
            render_report(&[]),
            "The results are as follows:\nNo labels detected.\n"
        );
    }

    #[test]
    fn outlines_are_drawn_on_a_copy() {
        let image = RgbImage::new(50, 50);
        let quad = Quadrilateral::new(&[
            Point::new(10, 10),
            Point::new(40, 10),
            Point::new(40, 40),
            Point::new(10, 40),
        ])
        .unwrap();
        let drawn = draw_quadrilaterals(&image, &[quad]);
        assert_eq!(drawn.get_pixel(25, 10), &OUTLINE_COLOR);
        assert_eq!(drawn.get_pixel(25, 11), &OUTLINE_COLOR);
        assert_eq!(drawn.get_pixel(40, 25), &OUTLINE_COLOR);
        assert_eq!(drawn.get_pixel(25, 25), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(25, 10), &Rgb([0, 0, 0]));
    }
}

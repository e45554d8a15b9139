use std::{path::PathBuf, time::Instant};

use clap::Parser;
use labelscan::{
    report::{draw_quadrilaterals, render_report},
    DetectionOptions, LabelDetectorBuilder,
};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Detect rectangular printed labels in an image.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Image file to scan.
    image: PathBuf,

    /// Save a copy of the image with detected labels outlined.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Merge repeated finds of the same label.
    #[arg(long)]
    dedupe: bool,

    #[arg(long, default_value_t = 10.0)]
    dedupe_distance: f64,

    /// Skip the contrast and sharpening pass.
    #[arg(long)]
    no_enhance: bool,

    #[arg(long, default_value_t = 50.0)]
    edge_threshold: f32,

    #[arg(long, default_value_t = 11)]
    level_count: u32,

    #[arg(long, default_value_t = 1000.0)]
    min_area: f64,

    #[arg(long, default_value_t = 0.3)]
    max_corner_cosine: f64,

    #[arg(long, default_value_t = 0.02)]
    approx_tolerance: f64,
}

fn main() -> labelscan::Result<()> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let image = image::open(&args.image)?;

    let detector = LabelDetectorBuilder::new()
        .options(DetectionOptions {
            edge_threshold: args.edge_threshold,
            level_count: args.level_count,
            min_area: args.min_area,
            max_corner_cosine: args.max_corner_cosine,
            approx_tolerance: args.approx_tolerance,
            dedupe: args.dedupe,
            dedupe_distance: args.dedupe_distance,
        })
        .enhance(!args.no_enhance)
        .build()?;

    println!("Started processing");
    let start = Instant::now();
    let detections = detector.detect_with_bounds(&image)?;
    log::debug!("Detection took {:?}", start.elapsed());

    let labels = detections.iter().map(|it| it.label).collect::<Vec<_>>();
    print!("{}", render_report(&labels));

    if let Some(output) = args.output {
        let quads = detections.iter().map(|it| it.bounds).collect::<Vec<_>>();
        draw_quadrilaterals(&image.to_rgb8(), &quads).save(&output)?;
        log::debug!("Annotated image written to {}", output.display());
    }

    Ok(())
}

use std::env;

use ela_forensics::{AnalysisRequest, QualityRange, QualitySweepAnalyzer, ThumbnailComparison, error::Result};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let Some(image_path) = args.get(1) else {
        println!("Usage: {} <image.jpg> [output_dir]", args[0]);
        return Ok(());
    };
    let output_dir = args.get(2).map(String::as_str).unwrap_or("output");

    let range = QualityRange::new(70, 100, 10)?;
    let request = AnalysisRequest::new(image_path, output_dir, range).with_thumbnail_comparison(true);

    let outcome = QualitySweepAnalyzer::new().analyze(&request)?;

    for (stats, artifact) in outcome.levels.iter().zip(&outcome.artifacts) {
        println!("Quality {}:", stats.quality);
        println!("  Max difference: {}", stats.max_difference);
        println!("  Mean difference: {:.2}", stats.mean_difference);
        println!("  Brightness scale: {:.2}", stats.scale);
        println!("  Output: {}", artifact.path.display());
        println!();
    }

    for quality in &outcome.skipped_levels {
        println!("Quality {}: identical to the source, skipped", quality);
    }

    match outcome.thumbnail {
        Some(ThumbnailComparison::Compared(artifact)) => {
            println!("Thumbnail diff: {}", artifact.path.display())
        }
        Some(ThumbnailComparison::Failed(reason)) => println!("Thumbnail diff failed: {}", reason),
        Some(ThumbnailComparison::Skipped) | None => println!("No embedded thumbnail"),
    }

    Ok(())
}

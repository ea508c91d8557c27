//! Body Measurement Analyzer - headless CLI.
//!
//! Run with: cargo run --bin body-measure -- <image> [eye_distance_cm]

use std::env;
use std::path::PathBuf;

use body_measure::analysis::{analyze_image, AnalysisConfig};
use body_measure::measure::{Category, MeasurementOutcome};
use body_measure::settings::{AppSettings, DEFAULT_EYE_DISTANCE_CM};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let Some(image_path) = args.get(1).map(PathBuf::from) else {
        eprintln!("Usage: body-measure <image> [eye_distance_cm]");
        eprintln!();
        eprintln!("Environment:");
        eprintln!("  ROBOFLOW_API_KEY       API key for the detection workflow");
        eprintln!("  ROBOFLOW_WORKSPACE     Workflow workspace name");
        eprintln!("  ROBOFLOW_WORKFLOW_ID   Workflow id");
        eprintln!("  ROBOFLOW_BASE_URL      Override the serverless endpoint");
        std::process::exit(2);
    };

    // Persisted settings first, environment wins, argv wins over both.
    let mut settings = AppSettings::load();
    settings.apply_env_overrides();

    let eye_distance_cm: f64 = match args.get(2) {
        Some(raw) => raw.parse().ok().filter(|v| *v > 0.0).unwrap_or_else(|| {
            eprintln!("Eye distance must be a positive number, got '{}'", raw);
            std::process::exit(2);
        }),
        None => {
            if settings.eye_distance_cm > 0.0 {
                settings.eye_distance_cm
            } else {
                DEFAULT_EYE_DISTANCE_CM
            }
        }
    };

    println!("📏 Body Measurement Analyzer");
    println!("================================================");
    println!("Image: {}", image_path.display());
    println!("Eye distance: {} cm", eye_distance_cm);
    println!(
        "Workflow: {}/{} @ {}",
        settings.workspace, settings.workflow_id, settings.base_url
    );
    println!("================================================\n");

    let config = AnalysisConfig {
        detector: settings.detector_config(),
        eye_distance_cm,
    };

    let result = analyze_image(&config, &image_path).await?;

    println!(
        "Scale: eye distance {:.1} px, {:.4} cm/px\n",
        result.eye_distance_px,
        result.scale.cm_per_px()
    );

    for category in [Category::Overall, Category::Arms, Category::Legs] {
        println!("{}", category.as_str());
        println!("------------------------------------------------");
        for entry in result.report.by_category(category) {
            match &entry.outcome {
                MeasurementOutcome::Centimeters(v) => {
                    println!("  {:<24} {:>8.1} cm", entry.kind.label(), v);
                }
                MeasurementOutcome::Unavailable(e) => {
                    println!("  {:<24} {:>8}  ({})", entry.kind.label(), "n/a", e);
                }
            }
        }
        println!();
    }

    println!(
        "{}/{} measurements available",
        result.report.available_count(),
        result.report.entries().len()
    );

    if settings.save_processed {
        if let Some(png) = &result.processed_png {
            std::fs::write(&settings.processed_path, png)?;
            println!("Processed image saved to {}", settings.processed_path);
        }
    }

    Ok(())
}

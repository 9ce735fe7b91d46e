//! iscore: compute the Inception Score of a directory of generated
//! images against an exported classifier model.

mod load;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "iscore",
    version,
    about = "Inception Score for a directory of generated images"
)]
struct Cli {
    /// Path to the classifier ONNX model
    #[arg(long)]
    model: PathBuf,

    /// Directory of PNG/JPEG images with uniform dimensions
    #[arg(long)]
    images: PathBuf,

    /// Images per inference batch (upstream guidance recommends 100;
    /// the historical default of 25 is kept)
    #[arg(long, default_value_t = 25)]
    batch_size: usize,

    /// Number of contiguous splits for the variance estimate
    #[arg(long, default_value_t = 10)]
    splits: usize,

    /// Emit the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    run(&cli)
}

#[cfg(feature = "onnx")]
fn run(cli: &Cli) -> anyhow::Result<()> {
    use anyhow::Context;
    use iscore_ai::{inception_score, OnnxClassifier, ScoreConfig};

    let images = load::load_dir(&cli.images)
        .with_context(|| format!("loading images from {}", cli.images.display()))?;
    tracing::info!(
        count = images.len(),
        height = images.height(),
        width = images.width(),
        "loaded images"
    );

    let mut classifier = OnnxClassifier::load(&cli.model)?;
    let config = ScoreConfig {
        batch_size: cli.batch_size,
        splits: cli.splits,
    };

    let score = inception_score(&mut classifier, &images, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        println!("inception score: {:.4} ± {:.4}", score.mean, score.std);
    }
    Ok(())
}

#[cfg(not(feature = "onnx"))]
fn run(cli: &Cli) -> anyhow::Result<()> {
    let _ = load::load_dir(&cli.images)?;
    anyhow::bail!("this build has no classifier backend; rebuild with `--features onnx`")
}

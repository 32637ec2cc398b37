//! Tier Prediction CLI
//!
//! Runs the trained classifier against four manually supplied indices.
//!
//! Usage:
//!   predict-risk --model data/model/classifier.json \
//!                --encoder data/model/label_encoder.json \
//!                --business-activation 12.5 --gentrification 30.0

use anyhow::Result;
use clap::Parser;
use risk_tiers::{description_for, display_label_for, TierClassifier};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "predict-risk",
    about = "Predict a gentrification risk tier from four district indices"
)]
struct Args {
    /// Path to the classifier artifact
    #[arg(short, long, default_value = "data/model/classifier.json")]
    model: PathBuf,

    /// Path to the label encoder artifact
    #[arg(short, long, default_value = "data/model/label_encoder.json")]
    encoder: PathBuf,

    /// 상권활성화지수
    #[arg(long, default_value_t = 0.0)]
    business_activation: f64,

    /// 상권활성화_SNS
    #[arg(long, default_value_t = 0.0)]
    business_activation_sns: f64,

    /// 젠트리피케이션지수
    #[arg(long, default_value_t = 0.0)]
    gentrification: f64,

    /// 젠트리피케이션_SNS
    #[arg(long, default_value_t = 0.0)]
    gentrification_sns: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let classifier = TierClassifier::load(&args.model, &args.encoder)?;

    let features = [
        args.business_activation,
        args.business_activation_sns,
        args.gentrification,
        args.gentrification_sns,
    ];
    let prediction = classifier.predict_tier(&features);

    info!("입력 지수: {:?}", features);
    info!("예측된 위험 단계: {}", display_label_for(&prediction.label));
    info!("{}", description_for(&prediction.label));
    if let Some(caution) = prediction.caution {
        info!("{}", caution);
    }

    Ok(())
}

// RecoLens command line interface
// Detect objects in a photo and ask a remote model for recommendations

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use recolens_app::{load_image, Outcome, Session, SessionError};
use recolens_core::{AppConfig, Category, ConfigError, DetectorConfig};
use recolens_eye::{validate_threshold, ModelManager, YoloDetector};
use recolens_llm::{RecommendationClient, RecommendationService};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recolens")]
#[command(about = "RecoLens - object detection driven recommendations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect objects in an image and generate recommendations
    Recommend {
        /// Image file (jpg, jpeg or png)
        #[arg(long, short)]
        image: PathBuf,

        /// Recommendation category
        #[arg(long, short, default_value = "study_desk")]
        category: String,

        /// Minimum detection confidence (defaults to the configured value)
        #[arg(long)]
        confidence: Option<f32>,

        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured generation endpoint
        #[arg(long)]
        api_url: Option<String>,

        /// Override the configured YOLO weights file
        #[arg(long)]
        weights: Option<PathBuf>,

        /// Print the system and user prompts sent to the model
        #[arg(long)]
        show_prompts: bool,
    },

    /// List available recommendation categories
    Categories,

    /// Download the default YOLOv8 weights
    DownloadModel {
        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory to store the weights in (defaults to the configured model_dir)
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Recommend {
            image,
            category,
            confidence,
            config,
            api_url,
            weights,
            show_prompts,
        } => {
            recommend(RecommendArgs {
                image,
                category,
                confidence,
                config,
                api_url,
                weights,
                show_prompts,
            })
            .await
        }
        Commands::Categories => {
            for category in Category::ALL {
                println!("{:<12} {}", category.as_str(), category.display_name());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::DownloadModel { config, model_dir } => {
            download_model(config.as_deref(), model_dir).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}

struct RecommendArgs {
    image: PathBuf,
    category: String,
    confidence: Option<f32>,
    config: Option<PathBuf>,
    api_url: Option<String>,
    weights: Option<PathBuf>,
    show_prompts: bool,
}

async fn recommend(args: RecommendArgs) -> anyhow::Result<ExitCode> {
    // Fail before loading weights for a category that cannot succeed
    let category: Category = args.category.parse()?;

    let config =
        AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let threshold = args
        .confidence
        .unwrap_or(config.models.detector.confidence_threshold);
    validate_threshold(threshold)?;
    let weights = args
        .weights
        .unwrap_or_else(|| config.models.detector.weights_path());

    let image = load_image(&args.image)?;
    let detector = YoloDetector::new(&weights)
        .with_context(|| format!("Failed to load YOLO weights from {:?}", weights))?;
    let service = RecommendationClient::new(&config.models.llm, args.api_url)?;
    info!(
        "Using endpoint {} with model {}",
        service.name(),
        service.model()
    );

    let mut session = Session::new(detector, service);
    match session.recommend(&image, category.as_str(), threshold).await {
        Ok(Outcome::NoObjects) => {
            println!("No objects detected in the image.");
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::Recommendations {
            summary,
            prompt,
            text,
            ..
        }) => {
            println!("Detected objects: {}", summary);
            if args.show_prompts {
                println!();
                println!("--- Debug: prompts ---");
                println!("System prompt:\n{}\n", prompt.system_prompt);
                println!("User prompt:\n{}", prompt.user_prompt);
                println!("----------------------");
            }
            println!();
            println!("{} recommendations:", category.display_name());
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Err(SessionError::Recommendation(e)) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

async fn download_model(config: Option<&Path>, model_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let model_dir = match model_dir {
        Some(dir) => dir,
        None => match AppConfig::load(config) {
            Ok(config) => config.models.detector.model_dir,
            // Without a config file anywhere, fall back to the default location
            Err(ConfigError::NotFound(_)) if config.is_none() => {
                DetectorConfig::default_model_dir()
            }
            Err(e) => return Err(e).context("Failed to load configuration"),
        },
    };

    let manager = ModelManager::new(model_dir);
    let path = manager
        .get_yolo_model()
        .await
        .context("Failed to download YOLOv8 weights")?;
    println!("YOLOv8 weights ready at {}", path.display());
    Ok(())
}

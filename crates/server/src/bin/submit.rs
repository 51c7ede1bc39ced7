//! lyricreel-submit: send an image and theme to a LyricReel server and
//! follow the job until the video is ready.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use lyricreel_core::{
    load_config_strict, run_submission, validate_config, validate_submission, ClientConfig,
    GenerationClient, ImageUpload, PollOptions, ProgressStep,
};

#[derive(Parser)]
#[command(name = "lyricreel-submit")]
#[command(about = "Submit an image and theme to LyricReel and wait for the video")]
#[command(version)]
struct Args {
    /// Server base URL
    #[arg(long, env = "LYRICREEL_SERVER", default_value = "http://localhost:3001")]
    server: String,

    /// Image file to upload
    #[arg(long)]
    image: PathBuf,

    /// Theme for the song and video
    #[arg(long)]
    theme: String,

    /// Config file whose `[client]` section sets the polling defaults
    #[arg(long, env = "LYRICREEL_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds between status checks (overrides the config)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up after this many status checks (overrides the config)
    #[arg(long)]
    max_polls: Option<u32>,
}

impl Args {
    /// Polling from `[client]` (or its defaults), then command-line overrides.
    fn poll_options(&self) -> Result<PollOptions> {
        let client = match &self.config {
            Some(path) => {
                let config = load_config_strict(path)
                    .with_context(|| format!("Failed to load config from {:?}", path))?;
                validate_config(&config)?;
                config.client
            }
            None => ClientConfig::default(),
        };

        let mut options = PollOptions::from(&client);
        if let Some(secs) = self.poll_interval {
            options.interval = Duration::from_secs(secs);
        }
        if let Some(max) = self.max_polls {
            options.max_attempts = max;
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let options = args.poll_options()?;

    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    validate_submission(Some(&bytes), &args.theme)?;

    let file_name = args
        .image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let image = ImageUpload::new(file_name, bytes);

    let client = GenerationClient::new(&args.server).context("Failed to create HTTP client")?;
    let health = client
        .health()
        .await
        .with_context(|| format!("Server at {} is not reachable", args.server))?;
    if !health.api_key_configured {
        warn!("Server reports no provider API key; the submission will likely fail");
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = run_submission(&client, &image, &args.theme, options, &cancel, log_progress)
        .await
        .context("Submission failed")?;

    if let Some(url) = &outcome.generation.music_url {
        info!("Music: {}", url);
    }
    if let Some(url) = &outcome.generation.image_url {
        info!("Image: {}", url);
    }
    match &outcome.video_url {
        Some(url) => {
            info!("Video ready");
            println!("{}", url);
        }
        None => info!("Finished without a video"),
    }

    Ok(())
}

fn log_progress(steps: &[ProgressStep]) {
    let line = steps
        .iter()
        .map(|s| format!("{}. {} [{}]", s.id, s.label, s.status))
        .collect::<Vec<_>>()
        .join("  ");
    info!("{}", line);
}

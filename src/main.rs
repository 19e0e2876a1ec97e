use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod config;
mod poster;
mod upload;
mod utils;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Process this poster URL directly instead of extracting one
    #[arg(short, long)]
    url: Option<String>,

    /// Path to a metadata API response (JSON); reads stdin when omitted
    metadata: Option<String>,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_dir = format!("{}/posterbed", xdg_config_home);
        let config_path = format!("{}/config.toml", config_dir);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_dir = format!("{}/.config/posterbed", home.display());
        let config_path = format!("{}/config.toml", config_dir);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn read_metadata_response(args: &Args) -> Result<serde_json::Value> {
    let raw = match &args.metadata {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata response from {}", path))?,
        None => std::io::read_to_string(std::io::stdin())
            .context("Failed to read metadata response from stdin")?,
    };

    serde_json::from_str(&raw).context("Failed to parse metadata response as JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let config_path = get_config_path(&args).context(
        "No config file found (pass --config or create ~/.config/posterbed/config.toml)",
    )?;
    let config = config::Config::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    info!("Loaded config from: {}", config_path);

    let uploader = upload::PictureBedUploader::new(
        &config.picture_bed.api_url,
        &config.picture_bed.api_token,
    )?;

    let mut processor = poster::PosterProcessor::new(Box::new(uploader))?;
    if let Some(temp_dir) = &config.temp_dir {
        processor = processor.with_temp_dir(temp_dir);
    }

    let uploaded_url = if let Some(poster_url) = &args.url {
        processor.process_url(poster_url).await?
    } else {
        let data = read_metadata_response(&args)?;
        processor.process_response(&data).await?
    };

    println!("{uploaded_url}");

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;

use crate::backends::google::DEFAULT_ENDPOINT;
use crate::pipeline::compare::DEFAULT_TOLERANCE;

/// Track teeth whitening progress by comparing the shade of photos over time.
#[derive(Parser, Debug)]
#[command(name = "shadelog", version, about)]
pub struct Args {
    /// Directory that selected photos are copied into
    #[arg(long, default_value = "uploaded_images")]
    pub upload_dir: PathBuf,

    /// Google Cloud Vision API key
    #[arg(long, env = "GOOGLE_CLOUD_VISION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OAuth access token, used when no API key is set
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Vision API annotate endpoint
    #[arg(long, env = "SHADELOG_VISION_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Request timeout in seconds (waits indefinitely if omitted)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Brightness changes smaller than this are reported as no change
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, value_parser = parse_tolerance)]
    pub tolerance: f64,

    /// Print a colored swatch next to each recorded shade
    #[arg(long)]
    pub preview: bool,

    /// Check that the analysis client can be created, then exit
    #[arg(long)]
    pub check: bool,
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("must be a finite number >= 0, got {s}"));
    }
    Ok(value)
}

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shadelog::backends::google::{Credentials, GoogleVision, VisionConfig};
use shadelog::cli::Args;
use shadelog::flow::{Flow, FlowOptions};
use shadelog::report::ReportStyle;

const CREDENTIALS_HINT: &str =
    "Make sure you have set up your Google Cloud credentials correctly.";

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shadelog=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();

    let backend = match build_backend(&args) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Error initializing Google Cloud Vision client: {e:#}");
            eprintln!("{CREDENTIALS_HINT}");
            std::process::exit(1);
        }
    };

    if args.check {
        println!("Successfully created client! Your credentials are working.");
        return Ok(());
    }

    let options = FlowOptions {
        upload_dir: args.upload_dir,
        tolerance: args.tolerance,
        style: ReportStyle {
            preview: args.preview,
        },
    };
    std::fs::create_dir_all(&options.upload_dir)
        .with_context(|| format!("failed to create {}", options.upload_dir.display()))?;

    let stdin = io::stdin();
    let session = Flow::new(&backend, stdin.lock(), io::stdout(), options).run()?;
    tracing::info!(images = session.len(), "Session finished");
    Ok(())
}

fn build_backend(args: &Args) -> Result<GoogleVision> {
    let credentials = Credentials::resolve(args.api_key.clone(), args.access_token.clone())?;
    let backend = GoogleVision::new(VisionConfig {
        endpoint: args.endpoint.clone(),
        credentials,
        timeout: args.timeout.map(Duration::from_secs),
    })?;
    Ok(backend)
}

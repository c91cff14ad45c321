use std::fs;
use std::path::Path;

use clap::Parser;
use tracing::{info, warn};

use critic::cli::{Cli, CliCommand};
use critic::client::OllamaClient;
use critic::config::Config;
use critic::discovery::{iter_files, read_text_file};
use critic::error::Result;
use critic::prompts::PromptSet;
use critic::render::{render_report, report_file_name, timestamp};
use critic::reviewer::Reviewer;
use critic::schema::ReviewReport;

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    info!(?config, "config loaded");

    let result = match &cli.command {
        Some(CliCommand::Serve { .. }) => critic::serve::run_server(config).await,
        None => match cli.target.as_deref() {
            Some(target) => run_review(target, &config),
            None => {
                eprintln!("error: specify a file or directory to review, or run `critic serve`");
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Review every discovered file, printing each report and saving it as JSON.
/// A failed review degrades to a zero-score report instead of aborting the
/// remaining files.
fn run_review(target: &str, config: &Config) -> Result<()> {
    let files = iter_files(Path::new(target), config.recursive)?;
    if files.is_empty() {
        eprintln!("No reviewable files found.");
        std::process::exit(2);
    }
    if files.len() > config.max_files {
        eprintln!(
            "Too many files ({}). Use --max-files or point to a smaller folder.",
            files.len()
        );
        std::process::exit(2);
    }

    let out_dir = Path::new(&config.out_dir);
    fs::create_dir_all(out_dir)?;

    let client = OllamaClient::new(
        &config.base_url,
        &config.model,
        config.temperature,
        config.num_ctx,
    );
    let prompts = PromptSet::load(config.prompt_dir.as_deref().map(Path::new))?;
    let reviewer = Reviewer::new(client, prompts, config.max_chars);

    for file in &files {
        let path = file.display().to_string();
        let code = read_text_file(file)?;
        let report = match reviewer.review_code(&path, &code) {
            Ok(report) => report,
            Err(e) => {
                warn!(path = %path, error = %e, "review failed");
                ReviewReport::degraded(&path, &e.to_string())
            }
        };

        println!();
        print!("{}", render_report(&report));

        let out_path = out_dir.join(report_file_name(file, &timestamp()));
        fs::write(&out_path, serde_json::to_string_pretty(&report)?)?;
        println!("Saved: {}", out_path.display());
    }

    Ok(())
}

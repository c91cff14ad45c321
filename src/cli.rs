use clap::{Parser, Subcommand};

/// Local code review backed by an Ollama model
#[derive(Parser, Debug, Clone)]
#[command(name = "critic", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// File or directory to review
    pub target: Option<String>,

    /// Ollama model name (e.g. llama3.1:latest)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Ollama base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Sampling temperature
    #[arg(long, global = true)]
    pub temperature: Option<f64>,

    /// Context window size passed to the model server
    #[arg(long, global = true)]
    pub num_ctx: Option<u32>,

    /// Chunking budget in characters per model request
    #[arg(long, global = true)]
    pub max_chars: Option<usize>,

    /// Output directory for JSON reports
    #[arg(long = "out")]
    pub out_dir: Option<String>,

    /// Safety limit for directory scans
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Do not scan directories recursively
    #[arg(long)]
    pub no_recursive: bool,

    /// Directory with prompt template overrides (system.md, review.md)
    #[arg(long, global = true)]
    pub prompt_dir: Option<String>,

    /// Path to config file (default: critic.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Start the browser upload UI and review API
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,
    },
}

impl Cli {
    /// The --bind override when running `critic serve`.
    pub fn serve_bind(&self) -> Option<String> {
        match &self.command {
            Some(CliCommand::Serve { bind }) => bind.clone(),
            None => None,
        }
    }
}

use std::path::Path;

use serde::Deserialize;

use crate::chunk;
use crate::cli::Cli;
use crate::client;
use crate::error::{Error, Result};
use crate::serve;

pub const DEFAULT_CONFIG_PATH: &str = "critic.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f64>,
    pub num_ctx: Option<u32>,
    pub max_chars: Option<usize>,
    pub out_dir: Option<String>,
    pub max_files: Option<usize>,
    pub recursive: Option<bool>,
    pub prompt_dir: Option<String>,
    pub bind: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub num_ctx: u32,
    pub max_chars: usize,
    pub out_dir: String,
    pub max_files: usize,
    pub recursive: bool,
    pub prompt_dir: Option<String>,
    pub bind: String,
}

impl Config {
    /// Resolve configuration from an explicit --config file, the default
    /// critic.toml if present, and CLI overrides. An explicit path that does
    /// not exist is an error; a missing default file is not.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => {
                let config_path = Path::new(path);
                if !config_path.exists() {
                    return Err(Error::ConfigNotFound(config_path.to_path_buf()));
                }
                let content = std::fs::read_to_string(config_path)?;
                parse_config(&content)?
            }
            None => {
                let config_path = Path::new(DEFAULT_CONFIG_PATH);
                if config_path.exists() {
                    let content = std::fs::read_to_string(config_path)?;
                    parse_config(&content)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        Ok(merge(file_config, cli))
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(temperature) = config.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(Error::ConfigValidation(format!(
            "temperature must be between 0.0 and 2.0, got {temperature}"
        )));
    }
    if let Some(num_ctx) = config.num_ctx
        && num_ctx == 0
    {
        return Err(Error::ConfigValidation("num_ctx must be > 0".to_string()));
    }
    if let Some(max_chars) = config.max_chars
        && max_chars == 0
    {
        return Err(Error::ConfigValidation("max_chars must be > 0".to_string()));
    }
    if let Some(max_files) = config.max_files
        && max_files == 0
    {
        return Err(Error::ConfigValidation("max_files must be > 0".to_string()));
    }
    Ok(())
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Config {
    Config {
        model: cli
            .model
            .clone()
            .or(file.model)
            .unwrap_or_else(|| client::DEFAULT_MODEL.to_string()),
        base_url: cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| client::DEFAULT_BASE_URL.to_string()),
        temperature: cli.temperature.or(file.temperature).unwrap_or(0.2),
        num_ctx: cli.num_ctx.or(file.num_ctx).unwrap_or(4096),
        max_chars: cli
            .max_chars
            .or(file.max_chars)
            .unwrap_or(chunk::DEFAULT_MAX_CHARS),
        out_dir: cli
            .out_dir
            .clone()
            .or(file.out_dir)
            .unwrap_or_else(|| "reports".to_string()),
        max_files: cli.max_files.or(file.max_files).unwrap_or(30),
        recursive: !cli.no_recursive && file.recursive.unwrap_or(true),
        prompt_dir: cli.prompt_dir.clone().or(file.prompt_dir),
        bind: cli
            .serve_bind()
            .or(file.bind)
            .unwrap_or_else(|| serve::DEFAULT_BIND.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
model = "codellama:13b"
base_url = "http://10.0.0.5:11434"
temperature = 0.5
num_ctx = 8192
max_chars = 6000
out_dir = "/tmp/reports"
max_files = 10
recursive = false
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.model.as_deref(), Some("codellama:13b"));
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.max_chars, Some(6000));
        assert_eq!(config.recursive, Some(false));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_parse_temperature_out_of_range() {
        let toml = r#"temperature = 2.5"#;
        let err = parse_config(toml).unwrap_err();
        assert!(err.to_string().contains("temperature must be"));
    }

    #[test]
    fn test_parse_zero_num_ctx() {
        let toml = r#"num_ctx = 0"#;
        let err = parse_config(toml).unwrap_err();
        assert!(err.to_string().contains("num_ctx must be > 0"));
    }

    #[test]
    fn test_parse_zero_max_chars() {
        let toml = r#"max_chars = 0"#;
        let err = parse_config(toml).unwrap_err();
        assert!(err.to_string().contains("max_chars must be > 0"));
    }

    #[test]
    fn test_parse_zero_max_files() {
        let toml = r#"max_files = 0"#;
        let err = parse_config(toml).unwrap_err();
        assert!(err.to_string().contains("max_files must be > 0"));
    }

    #[test]
    fn test_parse_unknown_field() {
        let toml = r#"bogus = "value""#;
        let err = parse_config(toml).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let file = ConfigFile {
            model: Some("file-model".to_string()),
            base_url: Some("http://file:11434".to_string()),
            max_files: Some(50),
            ..Default::default()
        };
        let cli = Cli::parse_from(["critic", "src/", "--model", "cli-model"]);
        let config = merge(file, &cli);
        assert_eq!(config.model, "cli-model"); // CLI wins
        assert_eq!(config.base_url, "http://file:11434"); // file value kept
        assert_eq!(config.max_files, 50); // file value kept
        assert_eq!(config.out_dir, "reports"); // default applied
    }

    #[test]
    fn test_defaults_applied() {
        let file = ConfigFile::default();
        let cli = Cli::parse_from(["critic", "src/"]);
        let config = merge(file, &cli);
        assert_eq!(config.model, client::DEFAULT_MODEL);
        assert_eq!(config.base_url, client::DEFAULT_BASE_URL);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.num_ctx, 4096);
        assert_eq!(config.max_chars, chunk::DEFAULT_MAX_CHARS);
        assert_eq!(config.out_dir, "reports");
        assert_eq!(config.max_files, 30);
        assert!(config.recursive);
        assert_eq!(config.prompt_dir, None);
        assert_eq!(config.bind, serve::DEFAULT_BIND);
    }

    #[test]
    fn test_no_recursive_flag_wins() {
        let file = ConfigFile {
            recursive: Some(true),
            ..Default::default()
        };
        let cli = Cli::parse_from(["critic", "src/", "--no-recursive"]);
        let config = merge(file, &cli);
        assert!(!config.recursive);
    }

    #[test]
    fn test_recursive_from_file() {
        let file = ConfigFile {
            recursive: Some(false),
            ..Default::default()
        };
        let cli = Cli::parse_from(["critic", "src/"]);
        let config = merge(file, &cli);
        assert!(!config.recursive);
    }

    #[test]
    fn test_serve_bind_override() {
        let file = ConfigFile {
            bind: Some("0.0.0.0:8000".to_string()),
            ..Default::default()
        };
        let cli = Cli::parse_from(["critic", "serve", "--bind", "127.0.0.1:9999"]);
        let config = merge(file.clone(), &cli);
        assert_eq!(config.bind, "127.0.0.1:9999");

        let cli = Cli::parse_from(["critic", "serve"]);
        let config = merge(file, &cli);
        assert_eq!(config.bind, "0.0.0.0:8000");
    }

    #[test]
    fn test_load_explicit_config_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let cli = Cli::parse_from(["critic", "src/", "--config", missing.to_str().unwrap()]);
        let err = Config::load(&cli).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("critic.toml");
        std::fs::write(&path, "model = \"mistral\"\nmax_files = 3\n").unwrap();
        let cli = Cli::parse_from(["critic", "src/", "--config", path.to_str().unwrap()]);
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.max_files, 3);
        assert_eq!(config.base_url, client::DEFAULT_BASE_URL);
    }
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("discovery error: {0}")]
    Discovery(String),

    #[error("model request failed: status {status} from {url} (model {model}): {body}")]
    ModelRequest {
        status: u16,
        url: String,
        model: String,
        body: String,
    },

    #[error("model error: {0}")]
    Model(String),

    #[error("model returned invalid JSON: {error}; raw output starts: {raw}")]
    InvalidModelOutput { error: String, raw: String },

    #[error("report schema error: {0}")]
    Schema(String),

    #[error("serve error: {0}")]
    Serve(String),
}

pub type Result<T> = std::result::Result<T, Error>;

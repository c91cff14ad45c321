pub mod chunk;
pub mod cli;
pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod normalize;
pub mod prompts;
pub mod render;
pub mod reviewer;
pub mod schema;
pub mod serve;

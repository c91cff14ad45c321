use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

const DEFAULT_SYSTEM: &str = include_str!("default_prompts/system.md");
const DEFAULT_REVIEW: &str = include_str!("default_prompts/review.md");

/// Known template variable names for validation.
const KNOWN_VARIABLES: &[&str] = &["language", "path", "code"];

fn default_template(name: &str) -> Option<&'static str> {
    match name {
        "system" => Some(DEFAULT_SYSTEM),
        "review" => Some(DEFAULT_REVIEW),
        _ => None,
    }
}

/// The two prompt templates, loaded once at startup and passed into the
/// reviewer. User overrides in a prompt directory take precedence per file
/// over the embedded defaults.
pub struct PromptSet {
    system: String,
    review: String,
}

impl PromptSet {
    pub fn load(override_dir: Option<&Path>) -> Result<Self> {
        Ok(Self {
            system: load_template("system", override_dir)?,
            review: load_template("review", override_dir)?,
        })
    }

    /// The system prompt, sent verbatim with every generation request.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Render the review template for one chunk of code.
    pub fn render_review(&self, language: &str, path: &str, code: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("language".to_string(), language.to_string());
        vars.insert("path".to_string(), path.to_string());
        vars.insert("code".to_string(), code.to_string());
        render_template(&self.review, &vars)
    }
}

/// Load a template by name (`system.md` / `review.md` in the override dir).
fn load_template(name: &str, override_dir: Option<&Path>) -> Result<String> {
    if let Some(dir) = override_dir {
        let path = dir.join(format!("{name}.md"));
        if path.exists() {
            return std::fs::read_to_string(&path).map_err(|e| {
                Error::Prompt(format!(
                    "failed to read override template {}: {e}",
                    path.display()
                ))
            });
        }
    }

    default_template(name)
        .map(|s| s.to_string())
        .ok_or_else(|| Error::Prompt(format!("unknown prompt template: {name}")))
}

/// Render a template string by substituting `{{variable}}` placeholders.
/// Errors on unknown variables (strict mode).
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next(); // consume second {
            let mut var_name = String::new();
            let mut found_close = false;

            while let Some(c2) = chars.next() {
                if c2 == '}' && chars.peek() == Some(&'}') {
                    chars.next(); // consume second }
                    found_close = true;
                    break;
                }
                var_name.push(c2);
            }

            if !found_close {
                return Err(Error::Prompt(format!(
                    "unclosed template variable: {{{{{var_name}"
                )));
            }

            let var_name = var_name.trim();
            if !KNOWN_VARIABLES.contains(&var_name) {
                return Err(Error::Prompt(format!(
                    "unknown template variable: {var_name}"
                )));
            }

            match vars.get(var_name) {
                Some(value) => result.push_str(value),
                None => {
                    return Err(Error::Prompt(format!(
                        "missing value for template variable: {var_name}"
                    )));
                }
            }
        } else {
            result.push(c);
        }
    }

    Ok(result)
}

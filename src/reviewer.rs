use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::chunk::chunk_text;
use crate::client::GenerateClient;
use crate::error::{Error, Result};
use crate::normalize::normalize_report;
use crate::prompts::PromptSet;
use crate::schema::{ReviewReport, validate_report};

/// How much of the model's raw output is echoed into parse errors.
const RAW_PREVIEW_CHARS: usize = 1000;

/// Cap on the merged summary after joining per-chunk summaries.
const SUMMARY_MAX_CHARS: usize = 1200;

/// Map a file extension to the language name handed to the model.
pub fn detect_language(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("py") => "python",
        Some("js") => "javascript",
        Some("ts") => "typescript",
        Some("java") => "java",
        Some("go") => "go",
        Some("rs") => "rust",
        Some("cpp") => "cpp",
        Some("c") => "c",
        Some("cs") => "csharp",
        _ => "unknown",
    }
}

/// Runs the review pipeline for one file at a time: chunk, prompt the model
/// per chunk, normalize and validate each response, merge.
pub struct Reviewer<C> {
    client: C,
    prompts: PromptSet,
    max_chars: usize,
}

impl<C: GenerateClient> Reviewer<C> {
    pub fn new(client: C, prompts: PromptSet, max_chars: usize) -> Self {
        Self {
            client,
            prompts,
            max_chars,
        }
    }

    /// Review one file's source text, producing a single merged report.
    ///
    /// Chunks are reviewed strictly in sequence. Any chunk failure (transport,
    /// HTTP status, unparseable model output) fails the whole file; callers
    /// decide whether to substitute a degraded report.
    pub fn review_code(&self, path: &str, code: &str) -> Result<ReviewReport> {
        let language = detect_language(path);
        let chunks = chunk_text(code, self.max_chars);
        let total = chunks.len();
        debug!(path, language, total, "starting review");

        let mut reports = Vec::with_capacity(total);
        for (idx, chunk) in chunks.iter().enumerate() {
            let chunk_path = if total == 1 {
                path.to_string()
            } else {
                format!("{path} (chunk {}/{total})", idx + 1)
            };
            info!(path, chunk = idx + 1, total, "reviewing chunk");

            let prompt = self.prompts.render_review(language, &chunk_path, chunk)?;
            let raw = self.client.generate(&prompt, self.prompts.system())?;

            let value: serde_json::Value =
                serde_json::from_str(&raw).map_err(|e| Error::InvalidModelOutput {
                    error: e.to_string(),
                    raw: raw.chars().take(RAW_PREVIEW_CHARS).collect(),
                })?;

            let normalized = normalize_report(value, &chunk_path, language);
            reports.push(validate_report(normalized)?);
        }

        Ok(merge_reports(path, language, reports))
    }
}

/// Collapse per-chunk reports into one report for the whole file.
///
/// Findings are concatenated in chunk order. Summaries are trimmed, deduped
/// (first occurrence wins) and joined with `" | "`, capped at 1200 chars. The
/// score is the mean of chunk scores rounded half-to-even, minus a penalty
/// for the worst finding severity present, clamped to 0-100.
pub fn merge_reports(path: &str, language: &str, mut reports: Vec<ReviewReport>) -> ReviewReport {
    if reports.len() == 1 {
        return reports.remove(0);
    }

    let count = reports.len();
    let mut summaries = Vec::with_capacity(count);
    let mut findings = Vec::new();
    let mut score_sum = 0i64;

    for report in reports {
        summaries.push(report.summary.trim().to_string());
        findings.extend(report.findings);
        score_sum += i64::from(report.score);
    }

    let max_penalty = findings
        .iter()
        .map(|f| f.severity.penalty())
        .max()
        .unwrap_or(0);

    let mean = (score_sum as f64 / count as f64).round_ties_even() as i64;
    let score = (mean - max_penalty).clamp(0, 100) as u8;

    let mut seen = HashSet::new();
    let joined = summaries
        .iter()
        .filter(|s| seen.insert(s.as_str()))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ");
    let summary: String = joined.chars().take(SUMMARY_MAX_CHARS).collect();

    ReviewReport {
        path: path.to_string(),
        language: language.to_string(),
        summary,
        score,
        findings,
    }
}

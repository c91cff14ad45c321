use std::path::Path;

use chrono::Local;

use crate::schema::{Finding, ReviewReport};

const HEADERS: [&str; 4] = ["CATEGORY", "SEVERITY", "LINES", "TITLE"];

/// Human label for a 0-100 score.
pub fn score_label(score: u8) -> &'static str {
    if score >= 80 {
        "Good"
    } else if score >= 50 {
        "Needs work"
    } else {
        "Risky"
    }
}

/// Format one report for the console: header lines plus an aligned findings
/// table when there is anything to show.
pub fn render_report(report: &ReviewReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("File: {}\n", report.path));
    out.push_str(&format!(
        "Language: {}   Score: {}/100 ({})\n",
        report.language,
        report.score,
        score_label(report.score)
    ));
    out.push_str(&format!("Summary: {}\n", report.summary));

    if report.findings.is_empty() {
        return out;
    }

    let rows: Vec<[String; 4]> = report
        .findings
        .iter()
        .map(|f| {
            [
                f.category.as_str().to_string(),
                f.severity.as_str().to_string(),
                line_range(f),
                f.title.clone(),
            ]
        })
        .collect();

    let mut widths = [HEADERS[0].len(), HEADERS[1].len(), HEADERS[2].len()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    out.push_str("\nFindings:\n");
    out.push_str(&format_row(
        [HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3]],
        &widths,
    ));
    for row in &rows {
        out.push_str(&format_row(
            [&row[0], &row[1], &row[2], &row[3]],
            &widths,
        ));
    }
    out
}

fn format_row(cells: [&str; 4], widths: &[usize; 3]) -> String {
    format!(
        "  {:<w0$}  {:<w1$}  {:<w2$}  {}\n",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    )
}

fn line_range(finding: &Finding) -> String {
    if finding.line_end == finding.line_start {
        finding.line_start.to_string()
    } else {
        format!("{}-{}", finding.line_start, finding.line_end)
    }
}

/// Timestamped output name for a report file, derived from the reviewed
/// file's name with dots replaced so the stamp and extension stand out.
pub fn report_file_name(path: &Path, stamp: &str) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("report");
    format!("{}_{stamp}.json", name.replace('.', "_"))
}

pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

use std::mem;

/// Upper bound on the characters of source text sent to the model per request.
pub const DEFAULT_MAX_CHARS: usize = 12_000;

/// Split `text` into line-aligned chunks of at most `max_chars` characters.
///
/// Text that already fits comes back as a single chunk. Lines are never split:
/// a single line longer than the budget becomes its own oversized chunk.
/// Concatenating the returned chunks reproduces `text` exactly.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut buf = String::new();
    let mut size = 0usize;
    for line in text.split_inclusive('\n') {
        let len = line.chars().count();
        if size + len > max_chars && !buf.is_empty() {
            chunks.push(mem::take(&mut buf));
            size = 0;
        }
        buf.push_str(line);
        size += len;
    }
    if !buf.is_empty() {
        chunks.push(buf);
    }
    chunks
}

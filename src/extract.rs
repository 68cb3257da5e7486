//! Best-effort JSON extraction from LLM output.
//!
//! Models wrap JSON in prose, markdown fences, or both. A greedy
//! first-`{`-to-last-`}` match breaks when trailing prose contains a
//! brace, so this scans for the first balanced object instead,
//! skipping braces inside string literals.

/// Extract the first balanced `{...}` object from `text`.
///
/// Checks for a ```json fence first and scans inside it; otherwise
/// scans the whole input. Returns `None` when no balanced object
/// exists.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let content = &text[start + 7..];
        let fenced = match content.find("```") {
            Some(end) => &content[..end],
            None => content,
        };
        if let Some(obj) = balanced_object(fenced) {
            return Some(obj);
        }
    }
    if let Some(start) = text.find("```") {
        let content = &text[start + 3..];
        if let Some(end) = content.find("```")
            && let Some(obj) = balanced_object(&content[..end])
        {
            return Some(obj);
        }
    }
    balanced_object(text)
}

/// Scan for the first `{` and walk to its matching close brace,
/// tracking string literals and escapes so embedded braces don't
/// unbalance the count.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

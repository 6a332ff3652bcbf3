//! Recover a balanced JSON value from decorated model output.
//!
//! Models wrap JSON in code fences and surround it with prose despite being
//! told not to. This module strips a leading fence line and a trailing fence
//! if present, then scans for the earliest `{` or `[` and returns the
//! substring up to its matching close character. Braces inside string
//! literals (and escaped quotes inside those strings) never affect nesting
//! depth.

/// Strip a leading fenced-code marker line and a trailing fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let mut out = text.trim();
    if out.starts_with("```") {
        out = match out.find('\n') {
            Some(pos) => &out[pos + 1..],
            None => "",
        };
    }
    if let Some(stripped) = out.trim_end().strip_suffix("```") {
        out = stripped;
    }
    out.trim()
}

/// Extract the first balanced JSON object or array embedded in `text`.
///
/// Returns the text unchanged when no opener is found. When the text ends
/// before the value closes, returns the substring from the opener to the end
/// so that downstream parsing fails explicitly instead of silently
/// succeeding on a truncated value.
pub fn extract_json(text: &str) -> &str {
    let text = strip_code_fences(text);

    let start = match text.find(['{', '[']) {
        Some(pos) => pos,
        None => return text,
    };
    let bytes = text.as_bytes();
    let (open, close) = match bytes[start] {
        b'{' => (b'{', b'}'),
        _ => (b'[', b']'),
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b if b == open => depth += 1,
            b if b == close => {
                depth -= 1;
                if depth == 0 {
                    return &text[start..=i];
                }
            }
            _ => {}
        }
    }

    // Unbalanced: best effort from the opener to the end.
    &text[start..]
}

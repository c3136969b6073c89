//! Query sanitization
//!
//! Queries arrive from the shell and, historically, from pasted web
//! content. Tag markup and null bytes are stripped, whitespace runs
//! collapse to single spaces, and the result is capped at
//! [`MAX_QUERY_LENGTH`] characters.

/// Maximum accepted query length in characters
pub const MAX_QUERY_LENGTH: usize = 300;

/// Remove `<...>` spans, keeping the text between them.
///
/// A `<` with no closing `>` is not markup and is kept verbatim, so
/// comparisons like "5 < 10" survive.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open + 1..].find('>') {
            Some(offset) => rest = &rest[open + 1 + offset + 1..],
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Normalize a raw query into its searchable form.
pub fn sanitize_query(raw: &str) -> String {
    let stripped = strip_tags(raw);
    let cleaned = stripped.replace('\0', "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_QUERY_LENGTH).collect()
}

// ============================================================================
// TESTS
// ============================================================================

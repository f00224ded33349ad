//! Source-code optimization: comment stripping and blank-line removal.
//!
//! This is a textual heuristic, not a parser. Comment markers inside string
//! literals can be mis-handled; that is a documented limitation of the
//! transform, traded for working uniformly across languages.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::OptimizeOptions;

/// Comment syntax family for a language id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentStyle {
    /// `//` line comments and `/* ... */` blocks.
    CLike,
    /// `#` line comments.
    Hash,
    /// No comment stripping (plaintext and unknown language ids).
    None,
}

fn comment_style(language_id: Option<&str>) -> CommentStyle {
    match language_id.map(str::to_ascii_lowercase).as_deref() {
        Some(
            "javascript" | "typescript" | "javascriptreact" | "typescriptreact" | "rust" | "c"
            | "cpp" | "csharp" | "java" | "go" | "kotlin" | "swift" | "scala" | "php" | "css"
            | "scss" | "less" | "jsonc",
        ) => CommentStyle::CLike,
        Some(
            "python" | "ruby" | "shellscript" | "bash" | "sh" | "perl" | "r" | "yaml" | "toml"
            | "makefile" | "dockerfile" | "elixir",
        ) => CommentStyle::Hash,
        _ => CommentStyle::None,
    }
}

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

// A `//` counts as a comment only at line start or after a character that is
// neither a colon nor a backslash, so `http://` URLs and escaped slashes
// survive. The preceding character is captured and written back verbatim.
static LINE_COMMENT_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[^:\\])//.*$").expect("valid regex"));

static LINE_COMMENT_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[^:\\])#.*$").expect("valid regex"));

/// Apply the configured optimization passes to `text`.
///
/// With both flags off this is the identity. The transform is idempotent:
/// optimizing already-optimized text changes nothing.
pub fn optimize(text: &str, language_id: Option<&str>, options: OptimizeOptions) -> String {
    if options.is_identity() {
        return text.to_string();
    }

    let mut output = text.to_string();

    if options.remove_comments {
        output = strip_comments(&output, comment_style(language_id));
    }

    if options.remove_empty_lines {
        output = compact_lines(&output);
    }

    output
}

fn strip_comments(text: &str, style: CommentStyle) -> String {
    match style {
        CommentStyle::CLike => {
            let without_blocks = BLOCK_COMMENT.replace_all(text, "");
            LINE_COMMENT_SLASH.replace_all(&without_blocks, "$1").into_owned()
        }
        CommentStyle::Hash => LINE_COMMENT_HASH.replace_all(text, "$1").into_owned(),
        CommentStyle::None => text.to_string(),
    }
}

/// Drop every whitespace-only line, then trim trailing whitespace from the
/// survivors. Blank-line runs collapse to zero lines, not one.
pub fn compact_lines(text: &str) -> String {
    let had_final_newline = text.ends_with('\n');
    let mut output: String = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    if had_final_newline && !output.is_empty() {
        output.push('\n');
    }
    output
}

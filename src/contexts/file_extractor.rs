//! Extraction of discrete files from a model's free-form text response.
//!
//! Generated responses announce files through several ad-hoc conventions
//! (bold headers, numbered lists, comment annotations, bare paths before a
//! fence, paths embedded in the fence marker itself). The extractor scans
//! the response line by line, pairs each announcement with its following
//! fenced block, and falls back to a single default file when nothing
//! matched.

use regex::Regex;
use std::sync::OnceLock;

/// Default path assigned when a response contains code but no usable
/// file announcement.
pub const DEFAULT_FALLBACK_PATH: &str = "app.js";

/// Minimum raw-response length for the plain-text fallback.
const RAW_FALLBACK_MIN_LEN: usize = 100;

/// One file discovered in a response.
///
/// Paths are relative and slash-delimited. Duplicate paths within one
/// extraction are kept in source order and never merged; when written to
/// disk the last occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub path: String,
    pub content: String,
}

fn header_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\*\*([\w\-./]+\.\w+)\*\*|^([\w\-./]+\.\w+):$|^#\s+([\w\-./]+\.\w+)$")
            .expect("valid regex")
    })
}

fn numbered_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+([\w\-./]+\.\w+)\s*$").expect("valid regex"))
}

fn comment_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//\s*filename:\s*([\w\-./]+\.\w+)\s*$").expect("valid regex"))
}

fn bare_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([\w\-./]+\.\w+)\s*$").expect("valid regex"))
}

fn fence_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```\w*:([\w\-./]+\.\w+)$").expect("valid regex"))
}

/// Matches explicit file headers: `**src/app.js**`, `src/app.js:` alone on
/// the line, or `# src/app.js`. Returns the first capturing group that
/// matched.
fn match_header_path(line: &str) -> Option<String> {
    let caps = header_path_re().captures(line)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_string())
}

/// Matches numbered file references: `1. src/models/user.js`.
fn match_numbered_path(line: &str) -> Option<String> {
    numbered_path_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Matches commented file references: `// filename: src/config/db.js`.
fn match_comment_path(line: &str) -> Option<String> {
    comment_path_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Matches a bare file path alone on the line. Only meaningful when the
/// caller has verified the next line opens a fence.
fn match_bare_path(line: &str) -> Option<String> {
    bare_path_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Matches a path embedded in the fence marker: ```` ```js:src/app.js ````.
fn match_fence_path(line: &str) -> Option<String> {
    fence_path_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Finds the next fence-opening line at or after `from`, skipping any
/// intervening prose. Returns `None` when the input ends first.
fn find_fence_open(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&j| lines[j].trim().starts_with("```"))
}

/// Collects the lines strictly between the fence opened at `open` and its
/// closing marker. Returns the captured content and the cursor position
/// just past the closing fence. An unclosed fence runs to end-of-input.
fn capture_fence_content(lines: &[&str], open: usize) -> (String, usize) {
    let mut j = open + 1;
    let mut content = Vec::new();
    while j < lines.len() && lines[j].trim() != "```" {
        content.push(lines[j]);
        j += 1;
    }
    let next = if j < lines.len() { j + 1 } else { j };
    (content.join("\n"), next)
}

/// Extracts every file announced in `response`, in source order.
///
/// This function is total: any input yields some (possibly empty) sequence
/// of files. Announcements whose fence never appears are abandoned without
/// emitting a file. When no announcement matches at all, degenerate
/// responses are handled by [`fallback_single_block`] and a final
/// plain-text fallback.
pub fn extract_files(response: &str) -> Vec<ExtractedFile> {
    let lines: Vec<&str> = response.split('\n').collect();
    let mut files = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        // Patterns 1-4, first match wins. The bare-path form is only
        // considered when the very next line opens a fence.
        let next_opens_fence = i + 1 < lines.len() && lines[i + 1].trim().starts_with("```");
        let announced = match_header_path(line)
            .or_else(|| match_numbered_path(line))
            .or_else(|| match_comment_path(line))
            .or_else(|| {
                if next_opens_fence {
                    match_bare_path(line)
                } else {
                    None
                }
            });

        if let Some(path) = announced {
            // Skip explanatory prose until the announced block opens.
            if let Some(open) = find_fence_open(&lines, i + 1) {
                let (content, next) = capture_fence_content(&lines, open);
                files.push(ExtractedFile { path, content });
                i = next;
                continue;
            }
            // No fence before end-of-input: abandon this announcement.
        }

        // Pattern 5: path carried by the fence marker itself.
        if let Some(path) = match_fence_path(line) {
            let (content, next) = capture_fence_content(&lines, i);
            files.push(ExtractedFile { path, content });
            i = next;
            continue;
        }

        i += 1;
    }

    if files.is_empty() {
        if let Some(file) = fallback_single_block(response) {
            files.push(file);
        } else if response.len() > RAW_FALLBACK_MIN_LEN && !response.trim().is_empty() {
            files.push(ExtractedFile {
                path: DEFAULT_FALLBACK_PATH.to_string(),
                content: response.trim().to_string(),
            });
        }
    }

    files
}

/// Handles the degenerate case of a response that is a single fenced block
/// with no path hints: takes the first enclosed segment, drops a leading
/// bare language tag line, and assigns the default path.
fn fallback_single_block(response: &str) -> Option<ExtractedFile> {
    let parts: Vec<&str> = response.split("```").collect();
    if parts.len() < 3 {
        return None;
    }

    let mut content = parts[1];
    // The first line of the segment is the language tag (possibly empty);
    // keep everything after it.
    if let Some(newline) = content.find('\n') {
        content = &content[newline + 1..];
    }

    Some(ExtractedFile {
        path: DEFAULT_FALLBACK_PATH.to_string(),
        content: content.to_string(),
    })
}

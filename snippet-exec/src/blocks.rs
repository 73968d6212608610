//! Fenced code blocks in markdown text.

use serde::{Deserialize, Serialize};

use crate::types::ExecutionResult;

/// A fenced block and the info-string language tag it was opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// First word of the info string, empty when the fence has none
    pub language: String,
    pub code: String,
}

/// Result of running one block of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResult {
    pub language: String,
    pub result: ExecutionResult,
}

struct Fence {
    marker: char,
    len: usize,
    language: String,
    lines: Vec<String>,
}

/// Extract every fenced block (```` ``` ```` or `~~~`) in document order.
///
/// Fences may be indented by up to three spaces. A closing fence uses the
/// same character, at least as many times, and nothing else on the line. An
/// unterminated block runs to the end of the text.
pub fn extract_code_blocks(markdown: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<Fence> = None;

    for line in markdown.lines() {
        match open.take() {
            None => open = opening_fence(line),
            Some(mut fence) => {
                if is_closing_fence(line, fence.marker, fence.len) {
                    blocks.push(finish(fence));
                } else {
                    fence.lines.push(line.to_string());
                    open = Some(fence);
                }
            }
        }
    }

    if let Some(fence) = open {
        blocks.push(finish(fence));
    }
    blocks
}

fn fence_prefix(line: &str) -> Option<(&str, char, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.chars().take_while(|c| *c == marker).count();
    if len < 3 {
        return None;
    }
    Some((&rest[len..], marker, len))
}

fn opening_fence(line: &str) -> Option<Fence> {
    let (info, marker, len) = fence_prefix(line)?;
    if marker == '`' && info.contains('`') {
        return None;
    }
    let language = info.split_whitespace().next().unwrap_or_default().to_string();
    Some(Fence {
        marker,
        len,
        language,
        lines: Vec::new(),
    })
}

fn is_closing_fence(line: &str, marker: char, min_len: usize) -> bool {
    match fence_prefix(line) {
        Some((rest, m, len)) => m == marker && len >= min_len && rest.trim().is_empty(),
        None => false,
    }
}

fn finish(fence: Fence) -> CodeBlock {
    let mut code = fence.lines.join("\n");
    if !fence.lines.is_empty() {
        code.push('\n');
    }
    CodeBlock {
        language: fence.language,
        code,
    }
}

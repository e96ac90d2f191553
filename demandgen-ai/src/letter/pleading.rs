//! Pleading paper renderer
//!
//! Plain-text layout with 28 numbered lines per page. Every page is padded
//! to the full line count so numbering always runs 1..=28, and pages are
//! separated by a form feed.

use super::outline::{LetterBlock, LetterOutline};
use super::DocumentRenderer;

pub const LINES_PER_PAGE: usize = 28;
pub const DEFAULT_LINE_WIDTH: usize = 72;

/// Greedy word wrap; words longer than `width` are split
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;

        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split].to_string());
            word = &word[split..];
        }

        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split block text on line breaks, blanking other control characters
///
/// Form feeds belong to pagination only.
fn source_lines(text: &str) -> Vec<String> {
    let pieces: Vec<String> = text
        .lines()
        .map(|line| {
            line.chars()
                .map(|c| if c.is_control() && c != '\t' { ' ' } else { c })
                .collect()
        })
        .collect();

    if pieces.is_empty() {
        vec![String::new()]
    } else {
        pieces
    }
}

/// Plain-text pleading paper output
#[derive(Debug, Clone)]
pub struct PleadingPaperRenderer {
    pub line_width: usize,
    pub lines_per_page: usize,
}

impl Default for PleadingPaperRenderer {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            lines_per_page: LINES_PER_PAGE,
        }
    }
}

impl PleadingPaperRenderer {
    /// Lay out blocks as unnumbered body lines
    ///
    /// Embedded line breaks start new body lines so every output line gets a
    /// number.
    pub fn body_lines(&self, outline: &LetterOutline) -> Vec<String> {
        let mut lines = Vec::new();

        for block in &outline.blocks {
            match block {
                LetterBlock::Heading(title) => {
                    for piece in source_lines(title) {
                        let title = piece.trim().to_uppercase();
                        let pad = self.line_width.saturating_sub(title.chars().count()) / 2;
                        lines.push(format!("{}{}", " ".repeat(pad), title));
                    }
                }
                LetterBlock::Paragraph(text) => {
                    for piece in source_lines(text) {
                        let wrapped = wrap_text(&piece, self.line_width);
                        if wrapped.is_empty() {
                            lines.push(String::new());
                        } else {
                            lines.extend(wrapped);
                        }
                    }
                }
                LetterBlock::Line(text) => {
                    for piece in source_lines(text) {
                        let piece = piece.trim_end();
                        if piece.chars().count() <= self.line_width {
                            lines.push(piece.to_string());
                        } else {
                            lines.extend(wrap_text(piece, self.line_width));
                        }
                    }
                }
                LetterBlock::Blank => lines.push(String::new()),
            }
        }

        lines
    }

    /// Paginate body lines and prefix line numbers
    pub fn paginate(&self, body: &[String]) -> String {
        let per_page = self.lines_per_page.max(1);
        let page_count = body.len().div_ceil(per_page).max(1);

        let pages: Vec<String> = (0..page_count)
            .map(|page| {
                (0..per_page)
                    .map(|n| {
                        let text = body.get(page * per_page + n).map(String::as_str).unwrap_or("");
                        format!("{:>2}  {}", n + 1, text).trim_end().to_string()
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();

        let mut document = pages.join("\n\x0c\n");
        document.push('\n');
        document
    }
}

impl DocumentRenderer for PleadingPaperRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_name(&self) -> &'static str {
        "demand-letter.txt"
    }

    fn render(&self, outline: &LetterOutline) -> Vec<u8> {
        self.paginate(&self.body_lines(outline)).into_bytes()
    }
}

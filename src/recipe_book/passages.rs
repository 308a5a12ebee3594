//! Splits the recipe book into passages small enough to embed and quote.

use std::path::Path;

use anyhow::{Context, Result};

/// Upper bound on a passage, in characters.
pub const DEFAULT_PASSAGE_CHARS: usize = 1200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub id: String,
    pub text: String,
}

/// Reads the recipe book as plain text.
pub async fn load_book(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        anyhow::bail!(
            "{} is a PDF; convert it to plain text first (for example with `pdftotext`)",
            path.display()
        );
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recipe book {}", path.display()))
}

/// Packs paragraphs (blank-line or form-feed separated) into passages of at
/// most `max_chars` characters. A paragraph longer than that is cut at
/// whitespace.
pub fn split_passages(text: &str, max_chars: usize) -> Vec<Passage> {
    let max_chars = max_chars.max(1);
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in paragraphs(text) {
        for piece in cut_long(&paragraph, max_chars) {
            let needed = if current.is_empty() {
                piece.chars().count()
            } else {
                current.chars().count() + 2 + piece.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, text)| Passage {
            id: format!("p{:04}", i + 1),
            text,
        })
        .collect()
}

fn paragraphs(text: &str) -> Vec<String> {
    let text = text.replace('\u{c}', "\n\n");
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}

fn cut_long(paragraph: &str, max_chars: usize) -> Vec<String> {
    if paragraph.chars().count() <= max_chars {
        return vec![paragraph.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if !current.is_empty() && current_len + 1 + word_len > max_chars {
            pieces.push(std::mem::take(&mut current));
        }
        if word_len > max_chars {
            // A single token longer than a passage gets hard-wrapped.
            let chars: Vec<char> = word.chars().collect();
            for slice in chars.chunks(max_chars) {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                current = slice.iter().collect();
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

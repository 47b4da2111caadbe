//! Bold-emphasis markup: `**like this**`.
//!
//! Only one construct is recognised. The scanner walks the text once and
//! alternates between a plain run and an emphasis run; an opening `**`
//! becomes emphasis only if a closing `**` follows on the same line, the
//! shortest such span winning. Anything left unmatched stays plain text,
//! delimiters included.

use serde::{Deserialize, Serialize};

const DELIM: &str = "**";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Plain,
    Emphasis,
}

/// A run of text with one weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub kind: SegmentKind,
    pub content: String,
}

impl TextSegment {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Plain,
            content: content.into(),
        }
    }

    pub fn emphasis(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Emphasis,
            content: content.into(),
        }
    }

    pub fn is_emphasis(&self) -> bool {
        self.kind == SegmentKind::Emphasis
    }
}

enum Scan {
    Plain,
    /// Emphasis opened by the delimiter at `open`.
    Emphasis { open: usize },
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Split `text` into plain and emphasis segments.
///
/// Empty input yields a single empty plain segment. Empty plain runs between
/// adjacent spans are not emitted; empty emphasis (`****`) is.
pub fn format(text: &str) -> Vec<TextSegment> {
    if text.is_empty() {
        return vec![TextSegment::plain("")];
    }

    let mut segments = Vec::new();
    let mut state = Scan::Plain;
    // Start of the plain text not yet emitted.
    let mut plain_from = 0;
    // Byte offset where the next delimiter search starts.
    let mut cursor = 0;

    loop {
        match state {
            Scan::Plain => match text[cursor..].find(DELIM) {
                Some(rel) => state = Scan::Emphasis { open: cursor + rel },
                None => break,
            },
            Scan::Emphasis { open } => {
                let inner = open + DELIM.len();
                let line_end = text[inner..]
                    .find(is_line_break)
                    .map_or(text.len(), |rel| inner + rel);
                match text[inner..line_end].find(DELIM) {
                    Some(rel) => {
                        let close = inner + rel;
                        if open > plain_from {
                            segments.push(TextSegment::plain(&text[plain_from..open]));
                        }
                        segments.push(TextSegment::emphasis(&text[inner..close]));
                        plain_from = close + DELIM.len();
                        cursor = plain_from;
                    }
                    // Unmatched opener stays plain. Retry one byte later so
                    // `***x**` still finds the span opening at offset 1.
                    None => cursor = open + 1,
                }
                state = Scan::Plain;
            }
        }
    }

    if plain_from < text.len() {
        segments.push(TextSegment::plain(&text[plain_from..]));
    }
    segments
}

/// Concatenate segments back into markup, re-wrapping emphasis.
pub fn to_markup(segments: &[TextSegment]) -> String {
    segments
        .iter()
        .map(|s| match s.kind {
            SegmentKind::Plain => s.content.clone(),
            SegmentKind::Emphasis => format!("{DELIM}{}{DELIM}", s.content),
        })
        .collect()
}

//! Font loading and text measurement using `ttf-parser`.
//!
//! Without a loaded face the builtin Helvetica metrics are approximated, which
//! is what the PDF renderer draws with. A TTF passed on the command line only
//! changes measurement, so wrapping can be checked against a real face.

use std::collections::HashMap;
use std::path::Path;

use crate::error::RenderError;
use crate::layout_config::TextRun;
use crate::markup::TextSegment;

/// Appended to the last kept line of truncated text.
pub const ELLIPSIS: &str = "…";

/// A loaded font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
}

impl FontData {
    fn synthetic() -> Self {
        Self {
            bytes: Vec::new(),
            units_per_em: 1000.0,
            ascender: 750.0,
        }
    }
}

/// Manages loaded fonts.
pub struct FontManager {
    fonts: HashMap<FontKey, FontData>,
    /// Fallback metrics if no font is loaded.
    default_key: FontKey,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl FontKey {
    fn new(family: &str, bold: bool, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            bold,
            italic,
        }
    }
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            default_key: FontKey::new("Helvetica", false, false),
        }
    }

    /// Load a TTF/OTF font from bytes.
    pub fn load_font(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        bytes: Vec<u8>,
    ) -> Result<(), RenderError> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| RenderError::Font(format!("failed to parse font: {e}")))?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            bytes,
        };

        log::debug!("loaded font {family} (bold={bold}, italic={italic})");
        let key = FontKey::new(family, bold, italic);
        if self.fonts.is_empty() || !self.has_real_fonts() {
            self.default_key = key.clone();
        }
        self.fonts.insert(key, data);
        Ok(())
    }

    /// Load a font file as the regular face of `family`.
    pub fn load_font_file(&mut self, family: &str, path: &Path) -> Result<(), RenderError> {
        let bytes = std::fs::read(path)?;
        self.load_font(family, false, false, bytes)
    }

    /// Register builtin Helvetica faces with synthetic metrics (for when no
    /// TTF is available).
    pub fn ensure_default(&mut self) {
        if self.fonts.is_empty() {
            for (bold, italic) in [(false, false), (true, false), (false, true), (true, true)] {
                self.fonts
                    .insert(FontKey::new("Helvetica", bold, italic), FontData::synthetic());
            }
            self.default_key = FontKey::new("Helvetica", false, false);
        }
    }

    /// Get font data for a key, falling back to the default.
    pub fn get(&self, key: &FontKey) -> Option<&FontData> {
        self.fonts
            .get(key)
            .or_else(|| self.fonts.get(&self.default_key))
    }

    /// Measure the width of a string at a given font size (in pt).
    /// If we have actual font bytes, we parse glyph advances. Otherwise we
    /// use an average character width heuristic (0.5 × font_size per char).
    pub fn measure_text_width(
        &self,
        text: &str,
        font_size: f32,
        bold: bool,
        italic: bool,
        family: &str,
    ) -> f32 {
        let heuristic = || {
            // Bold is ~10 % wider.
            let avg = if bold { 0.55 } else { 0.5 };
            text.chars().count() as f32 * font_size * avg
        };

        let Some(data) = self.get(&FontKey::new(family, bold, italic)) else {
            return heuristic();
        };
        if data.bytes.is_empty() {
            return heuristic();
        }

        // Parse the font and sum horizontal advances
        match ttf_parser::Face::parse(&data.bytes, 0) {
            Ok(face) => {
                let scale = font_size / data.units_per_em;
                text.chars()
                    .map(|ch| match face.glyph_index(ch) {
                        Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        None => font_size * 0.5,
                    })
                    .sum()
            }
            Err(_) => heuristic(),
        }
    }

    /// Distance from the top of a line to its baseline, in pt.
    pub fn ascender_pt(&self, font_size: f32, bold: bool, italic: bool, family: &str) -> f32 {
        match self.get(&FontKey::new(family, bold, italic)) {
            Some(data) => data.ascender * font_size / data.units_per_em,
            None => font_size * 0.75,
        }
    }

    /// Check if real font bytes are loaded for the default font.
    pub fn has_real_fonts(&self) -> bool {
        self.fonts
            .get(&self.default_key)
            .map(|d| !d.bytes.is_empty())
            .unwrap_or(false)
    }

    /// Family used when a layout does not ask for a specific one.
    pub fn default_family(&self) -> &str {
        &self.default_key.family
    }
}

impl Default for FontManager {
    fn default() -> Self {
        let mut mgr = Self::new();
        mgr.ensure_default();
        mgr
    }
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    bold: bool,
    italic: bool,
    family: &str,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    // Split on existing newlines first
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in &words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            let w = fonts.measure_text_width(&candidate, font_size, bold, italic, family);
            if w > max_width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                current_line = candidate;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Shared inputs of the run-based wrapping helpers.
#[derive(Debug, Clone, Copy)]
pub struct RunStyle<'a> {
    pub font_size: f32,
    pub italic: bool,
    pub family: &'a str,
}

impl RunStyle<'_> {
    fn width(&self, text: &str, bold: bool, fonts: &FontManager) -> f32 {
        fonts.measure_text_width(text, self.font_size, bold, self.italic, self.family)
    }
}

enum Token {
    /// A whitespace-free word, possibly switching weight midway.
    Word(Vec<(String, bool)>),
    Break,
}

fn tokenize(segments: &[TextSegment]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<(String, bool)> = Vec::new();

    for segment in segments {
        let bold = segment.is_emphasis();
        for ch in segment.content.chars() {
            if ch.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                if ch == '\n' {
                    tokens.push(Token::Break);
                }
                continue;
            }
            match word.last_mut() {
                Some((piece, piece_bold)) if *piece_bold == bold => piece.push(ch),
                _ => word.push((ch.to_string(), bold)),
            }
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

/// Append `text` to a line, merging with the last run when the weight
/// matches. Returns the new line width.
fn push_run(
    line: &mut Vec<TextRun>,
    width: f32,
    text: &str,
    bold: bool,
    style: RunStyle<'_>,
    fonts: &FontManager,
) -> f32 {
    match line.last_mut() {
        Some(run) if run.bold == bold => run.text.push_str(text),
        _ => line.push(TextRun {
            text: text.to_string(),
            bold,
            x_offset: width,
        }),
    }
    width + style.width(text, bold, fonts)
}

/// Width of a line of runs.
pub fn runs_width(line: &[TextRun], style: RunStyle<'_>, fonts: &FontManager) -> f32 {
    line.iter()
        .map(|r| style.width(&r.text, r.bold, fonts))
        .sum()
}

/// Greedy word wrap over formatted segments, keeping emphasis as bold runs.
///
/// Always returns at least one line; a blank input gives one empty line.
/// A word wider than `max_width` overflows its own line.
pub fn wrap_segments(
    segments: &[TextSegment],
    style: RunStyle<'_>,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<Vec<TextRun>> {
    let mut lines = Vec::new();
    let mut line: Vec<TextRun> = Vec::new();
    let mut width = 0.0f32;

    for token in tokenize(segments) {
        let pieces = match token {
            Token::Break => {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
                continue;
            }
            Token::Word(pieces) => pieces,
        };

        let word_width: f32 = pieces
            .iter()
            .map(|(text, bold)| style.width(text, *bold, fonts))
            .sum();

        if !line.is_empty() {
            // Separating spaces are never bold.
            let space = style.width(" ", false, fonts);
            if width + space + word_width > max_width {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            } else {
                width = push_run(&mut line, width, " ", false, style, fonts);
            }
        }
        for (text, bold) in &pieces {
            width = push_run(&mut line, width, text, *bold, style, fonts);
        }
    }

    lines.push(line);
    lines
}

/// Keep at most `max_lines` lines. When lines are dropped, the last kept line
/// ends in [`ELLIPSIS`], shortened until it fits in `max_width`.
///
/// Returns the kept lines and whether anything was cut.
pub fn truncate_lines(
    mut lines: Vec<Vec<TextRun>>,
    max_lines: usize,
    style: RunStyle<'_>,
    max_width: f32,
    fonts: &FontManager,
) -> (Vec<Vec<TextRun>>, bool) {
    if lines.len() <= max_lines || max_lines == 0 {
        return (lines, false);
    }
    lines.truncate(max_lines);

    if let Some(last) = lines.last_mut() {
        let ellipsis_bold = last.last().map(|r| r.bold).unwrap_or(false);
        let ellipsis = style.width(ELLIPSIS, ellipsis_bold, fonts);
        while runs_width(last, style, fonts) + ellipsis > max_width {
            let Some(run) = last.last_mut() else { break };
            if run.text.pop().is_none() || run.text.is_empty() {
                last.pop();
            }
        }
        // Drop trailing spaces so the ellipsis hugs the last word.
        if let Some(run) = last.last_mut() {
            let trimmed = run.text.trim_end().len();
            run.text.truncate(trimmed);
        }
        match last.last_mut() {
            Some(run) => run.text.push_str(ELLIPSIS),
            None => last.push(TextRun {
                text: ELLIPSIS.to_string(),
                bold: false,
                x_offset: 0.0,
            }),
        }
    }
    (lines, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::format;

    fn style() -> RunStyle<'static> {
        RunStyle {
            font_size: 10.0,
            italic: false,
            family: "Helvetica",
        }
    }

    fn line_text(line: &[TextRun]) -> String {
        line.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn heuristic_text_width() {
        let mgr = FontManager::default();
        let w = mgr.measure_text_width("Hello", 16.0, false, false, "Helvetica");
        // 5 chars × 16 × 0.5 = 40
        assert!((w - 40.0).abs() < 0.1);
    }

    #[test]
    fn word_wrap_basic() {
        let mgr = FontManager::default();
        let lines = wrap_text("Hello world foo bar", 16.0, false, false, "Helvetica", 60.0, &mgr);
        assert!(lines.len() >= 2, "Expected wrapping, got {:?}", lines);
    }

    #[test]
    fn rejects_garbage_font_bytes() {
        let mut mgr = FontManager::default();
        let err = mgr.load_font("Broken", false, false, vec![0, 1, 2, 3]);
        assert!(matches!(err, Err(RenderError::Font(_))));
        assert!(!mgr.has_real_fonts());
    }

    #[test]
    fn wrap_keeps_bold_runs() {
        let mgr = FontManager::default();
        let lines = wrap_segments(&format("I **run** daily"), style(), 500.0, &mgr);
        assert_eq!(lines.len(), 1);
        let runs = &lines[0];
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "I ");
        assert!(runs[1].bold);
        assert_eq!(runs[1].text, "run");
        assert_eq!(runs[2].text, " daily");
        // "I " at 5pt/char
        assert!((runs[1].x_offset - 10.0).abs() < 0.01);
    }

    #[test]
    fn wrap_breaks_between_words() {
        let mgr = FontManager::default();
        // each 4-letter word is 20pt wide, a space 5pt
        let lines = wrap_segments(&format("abcd efgh ijkl"), style(), 46.0, &mgr);
        let texts: Vec<_> = lines.iter().map(|l| line_text(l)).collect();
        assert_eq!(texts, vec!["abcd efgh", "ijkl"]);
    }

    #[test]
    fn word_spanning_weights_stays_together() {
        let mgr = FontManager::default();
        let lines = wrap_segments(&format("**run**ning"), style(), 500.0, &mgr);
        assert_eq!(line_text(&lines[0]), "running");
        assert_eq!(lines[0].len(), 2);
    }

    #[test]
    fn blank_input_is_one_empty_line() {
        let mgr = FontManager::default();
        let lines = wrap_segments(&format(""), style(), 100.0, &mgr);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
    }

    #[test]
    fn truncation_adds_ellipsis() {
        let mgr = FontManager::default();
        let lines = wrap_segments(&format("aa bb cc dd ee ff"), style(), 25.0, &mgr);
        assert_eq!(lines.len(), 3);
        let (kept, cut) = truncate_lines(lines, 2, style(), 25.0, &mgr);
        assert!(cut);
        assert_eq!(kept.len(), 2);
        let last = line_text(&kept[1]);
        assert!(last.ends_with(ELLIPSIS), "{last}");
        assert!(runs_width(&kept[1], style(), &mgr) <= 25.0 + 0.01);
    }

    #[test]
    fn short_text_is_not_truncated() {
        let mgr = FontManager::default();
        let lines = wrap_segments(&format("short"), style(), 100.0, &mgr);
        let (kept, cut) = truncate_lines(lines.clone(), 3, style(), 100.0, &mgr);
        assert!(!cut);
        assert_eq!(kept, lines);
    }
}

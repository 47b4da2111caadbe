//! Layout config – the intermediate representation between layout computation
//! and PDF rendering. This is the "frozen" structure that encodes exactly what
//! goes on each physical page.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    /// A page break follows this page. False on the final page only.
    pub break_after: bool,
    pub boxes: Vec<LayoutBox>,
    /// Free-standing strokes: dividers, cut guides, table rules.
    #[serde(default)]
    pub rules: Vec<RuleLine>,
}

/// A positioned rectangle with optional content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Position relative to page top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    /// Visual styling
    pub background_color: Option<[f32; 4]>,
    pub border: Option<BorderStyle>,

    pub text: Option<TextContent>,

    /// Children (nested boxes)
    pub children: Vec<LayoutBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub width: f32,
    pub color: [f32; 4],
    /// Dash length in points; solid when `None`.
    #[serde(default)]
    pub dash: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// Pre-wrapped lines of text.
    pub lines: Vec<TextLine>,
    pub font_family: String,
    pub font_size: f32,
    pub italic: bool,
    pub color: [f32; 4],
    pub line_height: f32,
    /// Top of a line to its baseline.
    pub ascent: f32,
    pub text_align: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Runs of uniform weight, left to right.
    pub runs: Vec<TextRun>,
    /// X offset within the layout box (for alignment)
    pub x_offset: f32,
    /// Y offset from the top of the text content area
    pub y_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    /// Offset from the start of the line.
    pub x_offset: f32,
}

/// A straight stroke between two points, page top-left origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub width: f32,
    pub color: [f32; 4],
    /// Dash length in points; solid when `None`.
    #[serde(default)]
    pub dash: Option<f32>,
}

impl LayoutConfig {
    /// Create an A4 layout config.
    pub fn a4() -> Self {
        Self {
            title: Self::default_title(),
            // A4: 210mm × 297mm = 595.28 × 841.89 points
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "vocabulary".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every text line on every page, runs joined. Handy for assertions.
    pub fn all_text(&self) -> Vec<String> {
        self.pages.iter().flat_map(PageLayout::page_text).collect()
    }
}

impl PageLayout {
    pub fn new(page_index: usize, break_after: bool) -> Self {
        Self {
            page_index,
            break_after,
            boxes: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Text lines of this page in box order, runs joined.
    pub fn page_text(&self) -> Vec<String> {
        let mut out = Vec::new();
        for b in &self.boxes {
            b.collect_text(&mut out);
        }
        out
    }
}

impl LayoutBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            background_color: None,
            border: None,
            text: None,
            children: Vec::new(),
        }
    }

    fn collect_text(&self, out: &mut Vec<String>) {
        if let Some(text) = &self.text {
            out.extend(text.lines.iter().map(TextLine::text));
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

impl TextLine {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

impl RuleLine {
    pub fn horizontal(x1: f32, x2: f32, y: f32, width: f32, color: [f32; 4]) -> Self {
        Self {
            x1,
            y1: y,
            x2,
            y2: y,
            width,
            color,
            dash: None,
        }
    }

    pub fn vertical(x: f32, y1: f32, y2: f32, width: f32, color: [f32; 4]) -> Self {
        Self {
            x1: x,
            y1,
            x2: x,
            y2,
            width,
            color,
            dash: None,
        }
    }

    pub fn dashed(mut self, dash: f32) -> Self {
        self.dash = Some(dash);
        self
    }

    /// Split into the drawn pieces of a dashed line, alternating dash and gap
    /// of equal length. A solid line is returned as a single piece.
    pub fn segments(&self) -> Vec<(f32, f32, f32, f32)> {
        let whole = vec![(self.x1, self.y1, self.x2, self.y2)];
        let Some(dash) = self.dash.filter(|d| *d > 0.0) else {
            return whole;
        };
        let (dx, dy) = (self.x2 - self.x1, self.y2 - self.y1);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= dash {
            return whole;
        }
        let (ux, uy) = (dx / length, dy / length);
        let mut pieces = Vec::new();
        let mut start = 0.0;
        while start < length {
            let end = (start + dash).min(length);
            pieces.push((
                self.x1 + ux * start,
                self.y1 + uy * start,
                self.x1 + ux * end,
                self.y1 + uy * end,
            ));
            start += 2.0 * dash;
        }
        pieces
    }
}

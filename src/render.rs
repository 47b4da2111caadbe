//! Renderers – turn a logical [`Document`] into file bytes.
//!
//! [`PdfRenderer`] computes the layout, stages it as `layout.json`, and
//! rasterises it with `printpdf` (v0.8 ops-based API) using the builtin
//! Helvetica faces. [`JsonRenderer`] writes the logical document itself, for
//! previews and debugging.

use std::path::Path;

use printpdf::*;
use unicode_normalization::UnicodeNormalization;

use crate::document::Document;
use crate::error::RenderError;
use crate::fonts::FontManager;
use crate::layout::compute_layout;
use crate::layout_config::{LayoutBox, LayoutConfig, RuleLine};
use crate::pipeline::PipelineConfig;

/// pt → mm
const PT_TO_MM: f32 = 0.352778;

/// Rendered file contents plus the extension they should be saved with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Pluggable sink for a finished document.
///
/// `staging` is a private scratch directory that is removed once the export
/// ends, whatever the outcome.
pub trait Renderer: Send + Sync {
    fn render(&self, document: &Document, staging: &Path) -> Result<Artifact, RenderError>;
}

/// PDF output through the layout engine.
pub struct PdfRenderer {
    config: PipelineConfig,
    fonts: FontManager,
}

impl PdfRenderer {
    pub fn new(config: PipelineConfig, fonts: FontManager) -> Self {
        Self { config, fonts }
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(PipelineConfig::default(), FontManager::default())
    }
}

impl Renderer for PdfRenderer {
    fn render(&self, document: &Document, staging: &Path) -> Result<Artifact, RenderError> {
        let layout = compute_layout(document, &self.config, &self.fonts)?;
        let staged = staging.join("layout.json");
        std::fs::write(&staged, layout.to_json()?)?;
        log::debug!("staged layout at {}", staged.display());

        Ok(Artifact {
            bytes: render_pdf(&layout)?,
            extension: "pdf",
        })
    }
}

/// Pretty-printed JSON of the logical document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, document: &Document, _staging: &Path) -> Result<Artifact, RenderError> {
        Ok(Artifact {
            bytes: serde_json::to_vec_pretty(document)?,
            extension: "json",
        })
    }
}

/// Render a LayoutConfig into PDF bytes.
pub fn render_pdf(config: &LayoutConfig) -> Result<Vec<u8>, RenderError> {
    let page_w = Mm(config.page_width_pt * PT_TO_MM);
    let page_h = Mm(config.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&config.title);
    let mut pages = Vec::new();

    for page_layout in &config.pages {
        let mut ops = Vec::new();

        for lbox in &page_layout.boxes {
            render_box(&mut ops, lbox, config.page_height_pt);
        }
        for rule in &page_layout.rules {
            stroke(&mut ops, rule, config.page_height_pt);
        }

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());
    Ok(bytes)
}

/// Map one char onto WinAnsiEncoding, folding letters the builtin fonts lack
/// onto their base letter (`ş` → `s`, `İ` → `I`, `ı` → `i`).
fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20AC}' => 0x80, // euro
        '\u{201A}' => 0x82, // single low-9 quote
        '\u{201E}' => 0x84, // double low-9 quote
        '\u{2026}' => 0x85, // ellipsis
        '\u{2018}' => 0x91, // left single quote
        '\u{2019}' => 0x92, // right single quote
        '\u{201C}' => 0x93, // left double quote
        '\u{201D}' => 0x94, // right double quote
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96, // en-dash
        '\u{2014}' => 0x97, // em-dash
        '\u{2122}' => 0x99, // trademark
        '\u{00A0}' => 0x20, // non-breaking space -> space
        '\u{0131}' => b'i', // dotless i
        c if (c as u32) < 256 => c as u8,
        c => std::iter::once(c)
            .nfd()
            .next()
            .filter(|base| (*base as u32) < 128)
            .map_or(b'?', |base| base as u8),
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s.chars().map(win_ansi_byte).collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0xFF; printpdf passes these
    // bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

fn rgb(color: [f32; 4]) -> Color {
    Color::Rgb(Rgb {
        r: color[0],
        g: color[1],
        b: color[2],
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn stroke(ops: &mut Vec<Op>, rule: &RuleLine, page_height: f32) {
    ops.push(Op::SetOutlineColor {
        col: rgb(rule.color),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(rule.width),
    });
    for (x1, y1, x2, y2) in rule.segments() {
        ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    point(x1, page_height - y1),
                    point(x2, page_height - y2),
                ],
                is_closed: false,
            },
        });
    }
}

/// Recursively render a LayoutBox and its children into PDF ops.
fn render_box(ops: &mut Vec<Op>, lbox: &LayoutBox, page_height: f32) {
    // PDF coordinate system: origin at bottom-left.
    // Our layout uses origin at top-left. Convert:
    let pdf_y = page_height - lbox.y;
    let x1 = lbox.x;
    let y1 = pdf_y - lbox.height;
    let x2 = lbox.x + lbox.width;
    let y2 = pdf_y;

    // Background
    if let Some(bg) = lbox.background_color {
        ops.push(Op::SetFillColor { col: rgb(bg) });
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![point(x1, y1), point(x2, y1), point(x2, y2), point(x1, y2)],
                }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    // Border
    if let Some(border) = &lbox.border {
        match border.dash {
            // Dashed borders are drawn as four dashed edges in layout space.
            Some(dash) => {
                let (top, bottom) = (lbox.y, lbox.y + lbox.height);
                let edges = [
                    RuleLine::horizontal(x1, x2, top, border.width, border.color),
                    RuleLine::vertical(x2, top, bottom, border.width, border.color),
                    RuleLine::horizontal(x2, x1, bottom, border.width, border.color),
                    RuleLine::vertical(x1, bottom, top, border.width, border.color),
                ];
                for edge in edges {
                    stroke(ops, &edge.dashed(dash), page_height);
                }
            }
            None => {
                ops.push(Op::SetOutlineColor {
                    col: rgb(border.color),
                });
                ops.push(Op::SetOutlineThickness {
                    pt: Pt(border.width),
                });
                ops.push(Op::DrawLine {
                    line: Line {
                        points: vec![point(x1, y2), point(x2, y2), point(x2, y1), point(x1, y1)],
                        is_closed: true,
                    },
                });
            }
        }
    }

    // Text
    if let Some(text) = &lbox.text {
        for tline in &text.lines {
            let text_y = pdf_y - tline.y_offset - text.ascent;
            for run in &tline.runs {
                if run.text.is_empty() {
                    continue;
                }
                let font = match (run.bold, text.italic) {
                    (true, true) => BuiltinFont::HelveticaBoldOblique,
                    (true, false) => BuiltinFont::HelveticaBold,
                    (false, true) => BuiltinFont::HelveticaOblique,
                    (false, false) => BuiltinFont::Helvetica,
                };

                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(lbox.x + tline.x_offset + run.x_offset),
                        y: Pt(text_y),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(text.font_size),
                    font,
                });
                ops.push(Op::SetLineHeight {
                    lh: Pt(text.line_height),
                });
                ops.push(Op::SetFillColor {
                    col: rgb(text.color),
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(to_winlatin(&run.text))],
                    font,
                });
                ops.push(Op::EndTextSection);
            }
        }
    }

    // Children
    for child in &lbox.children {
        render_box(ops, child, page_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::DocumentAssembler;
    use crate::slug::FilenameTimestamp;
    use crate::word::Word;
    use chrono::NaiveDate;

    #[test]
    fn render_empty_page() {
        let config = LayoutConfig::a4();
        let bytes = render_pdf(&config).unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        // PDF magic number
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn turkish_letters_fold_to_win_ansi() {
        assert_eq!(to_winlatin("çöü").as_bytes(), &[0xE7, 0xF6, 0xFC]);
        assert_eq!(to_winlatin("şğıİ").as_bytes(), b"sgiI");
        assert_eq!(to_winlatin("…").as_bytes(), &[0x85]);
        assert_eq!(to_winlatin("✂").as_bytes(), b"?");
    }

    #[test]
    fn pdf_renderer_stages_layout() {
        let staging = tempfile::tempdir().unwrap();
        let config = PipelineConfig::default();
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let words = vec![Word::new("1", "run", "koşmak")];
        let doc = DocumentAssembler::new(&config, &FilenameTimestamp).flashcards(&words, "Set", &at);

        let artifact = PdfRenderer::default().render(&doc, staging.path()).unwrap();
        assert_eq!(artifact.extension, "pdf");
        assert_eq!(&artifact.bytes[0..5], b"%PDF-");

        let staged = std::fs::read_to_string(staging.path().join("layout.json")).unwrap();
        let layout = LayoutConfig::from_json(&staged).unwrap();
        assert_eq!(layout.pages.len(), 2);
    }

    #[test]
    fn json_renderer_writes_document() {
        let staging = tempfile::tempdir().unwrap();
        let config = PipelineConfig::default();
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let words = vec![Word::new("1", "run", "koşmak")];
        let doc = DocumentAssembler::new(&config, &FilenameTimestamp).table(&words, "Set", "Day", &at);

        let artifact = JsonRenderer.render(&doc, staging.path()).unwrap();
        assert_eq!(artifact.extension, "json");
        let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(value["kind"], "table");
        assert_eq!(value["pages"][0]["content"]["body"]["rows"][0]["translation"], "koşmak");
    }
}

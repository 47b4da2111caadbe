//! Pipeline – ties together filtering, chunking, mirroring, formatting,
//! assembly, layout, and rendering into single function calls.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::assembler::DocumentAssembler;
use crate::document::{Document, DocumentKind};
use crate::error::{ConfigError, RenderError};
use crate::font_scale::{FontScaleTable, TwoStepScale};
use crate::fonts::FontManager;
use crate::layout::compute_layout;
use crate::layout_config::LayoutConfig;
use crate::pagination::GridSpec;
use crate::render::render_pdf;
use crate::slug::TimestampFormatter;
use crate::word::Word;

/// Points per millimetre.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    /// Portrait mode: height > width (default).
    #[default]
    Portrait,
    /// Landscape mode: width > height.
    Landscape,
}

/// Grid geometry of one kind of card sheet. Lengths in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub grid: GridSpec,
    /// Inner page padding around the grid.
    pub padding: f32,
    /// Space between cards.
    pub gap: f32,
}

/// Fixed texts of the word table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLabels {
    pub headers: [String; 4],
    /// Shown in the footer as `{brand} — © {year}`.
    pub brand: String,
}

impl Default for TableLabels {
    fn default() -> Self {
        Self {
            headers: [
                "#".to_string(),
                "İngilizce".to_string(),
                "Eş Anlam".to_string(),
                "Türkçe".to_string(),
            ],
            brand: "Kelime Defterim".to_string(),
        }
    }
}

/// Configuration for the print pipeline.
///
/// Deserialises with defaults for every missing field, so a config file only
/// needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Page orientation; swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
    /// Duplex deck sheet (default 3 × 4, 10 mm padding, no gap).
    pub flashcards: SheetLayout,
    /// Academic sheet (default 2 × 2, 10 mm padding, 10 mm gap).
    pub academic: SheetLayout,
    /// Page margin of the word table in points (default 20 mm).
    pub table_margin: f32,
    pub font_scale: FontScaleTable,
    /// Size rule for the academic example sentence.
    pub sentence_scale: TwoStepScale,
    /// Size rule for the translation footer of academic cards.
    pub footer_scale: TwoStepScale,
    /// Display lines kept of the academic sentence before truncation.
    pub sentence_max_lines: usize,
    pub table: TableLabels,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            orientation: PageOrientation::Portrait,
            flashcards: SheetLayout {
                grid: GridSpec::FLASHCARDS,
                padding: 10.0 * MM_TO_PT,
                gap: 0.0,
            },
            academic: SheetLayout {
                grid: GridSpec::ACADEMIC,
                padding: 10.0 * MM_TO_PT,
                gap: 10.0 * MM_TO_PT,
            },
            table_margin: 20.0 * MM_TO_PT,
            font_scale: FontScaleTable::default(),
            sentence_scale: TwoStepScale::academic_sentence(),
            footer_scale: TwoStepScale::academic_footer(),
            sentence_max_lines: 3,
            table: TableLabels::default(),
        }
    }
}

impl PipelineConfig {
    /// Effective page width after applying orientation.
    pub fn effective_width(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_width,
            PageOrientation::Landscape => self.page_height,
        }
    }

    /// Effective page height after applying orientation.
    pub fn effective_height(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_height,
            PageOrientation::Landscape => self.page_width,
        }
    }

    pub fn sheet(&self, kind: DocumentKind) -> Option<&SheetLayout> {
        match kind {
            DocumentKind::Flashcards => Some(&self.flashcards),
            DocumentKind::AcademicPreview => Some(&self.academic),
            DocumentKind::Table => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject geometry the layout stage cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_width <= 0.0 || self.page_height <= 0.0 {
            return Err(ConfigError::Invalid("page size must be positive".into()));
        }
        for (name, sheet) in [("flashcards", &self.flashcards), ("academic", &self.academic)] {
            if sheet.grid.capacity() == 0 {
                return Err(ConfigError::Invalid(format!("{name} grid has no cells")));
            }
            let inner_w = self.effective_width() - 2.0 * sheet.padding;
            let inner_h = self.effective_height() - 2.0 * sheet.padding;
            if inner_w <= 0.0 || inner_h <= 0.0 || sheet.gap < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} padding/gap leave no room for cards"
                )));
            }
        }
        if !self.font_scale.is_monotonic() {
            return Err(ConfigError::Invalid(
                "font scale thresholds must increase".into(),
            ));
        }
        if self.sentence_max_lines == 0 {
            return Err(ConfigError::Invalid(
                "sentence_max_lines must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// What to export.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub kind: DocumentKind,
    pub set_name: String,
    /// Only used by the table export.
    pub day_name: String,
    /// Only used by the academic preview.
    pub include_incomplete: bool,
}

/// Full assembly: word list → logical document.
///
/// The config is validated first, so configs built in code get the same
/// checks as ones loaded from JSON.
pub fn build_document(
    words: &[Word],
    request: &ExportRequest,
    config: &PipelineConfig,
    clock: &dyn TimestampFormatter,
    at: &NaiveDateTime,
) -> Result<Document, ConfigError> {
    config.validate()?;
    let assembler = DocumentAssembler::new(config, clock);
    let document = match request.kind {
        DocumentKind::Flashcards => assembler.flashcards(words, &request.set_name, at),
        DocumentKind::Table => {
            assembler.table(words, &request.set_name, &request.day_name, at)
        }
        DocumentKind::AcademicPreview => assembler.academic_preview(
            words,
            request.include_incomplete,
            &request.set_name,
            at,
        ),
    };
    Ok(document)
}

/// Generate only the layout config (no PDF rendering) – useful for testing.
pub fn compute_layout_config(
    document: &Document,
    config: &PipelineConfig,
    fonts: &FontManager,
) -> Result<LayoutConfig, RenderError> {
    compute_layout(document, config, fonts)
}

/// Logical document → PDF bytes.
///
/// Returns `(pdf_bytes, layout_config)`.
pub fn generate_pdf(
    document: &Document,
    config: &PipelineConfig,
) -> Result<(Vec<u8>, LayoutConfig), RenderError> {
    let fonts = FontManager::default();
    let layout = compute_layout(document, config, &fonts)?;
    let bytes = render_pdf(&layout)?;
    Ok((bytes, layout))
}

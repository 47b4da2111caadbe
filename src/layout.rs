//! Layout engine – uses Taffy to place card grids, then converts a logical
//! [`Document`] into the flat, positioned [`LayoutConfig`].
//!
//! Card sheets share one grid per document. The word table is measured row
//! by row and split into physical pages, with its header group and footer
//! repeated on each.

use taffy::prelude::*;

use crate::assembler::NO_SENTENCE;
use crate::document::{AcademicCard, Card, CardFace, Document, DocumentKind, PageContent, WordTable};
use crate::error::RenderError;
use crate::font_scale::SizeStep;
use crate::fonts::{runs_width, truncate_lines, wrap_segments, wrap_text, FontManager, RunStyle};
use crate::layout_config::{
    BorderStyle, LayoutBox, LayoutConfig, PageLayout, RuleLine, TextContent, TextLine, TextRun,
};
use crate::markup::TextSegment;
use crate::pagination::{paginate_rows, GridSpec};
use crate::pipeline::{PipelineConfig, SheetLayout};

const LINE_HEIGHT: f32 = 1.2;

const INK: [f32; 4] = [0.13, 0.13, 0.13, 1.0];
const MUTED: [f32; 4] = [0.4, 0.4, 0.4, 1.0];
/// #999
const CUT_GREY: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
/// #ccc
const TAG_GREY: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
const RULE_GREY: [f32; 4] = [0.75, 0.75, 0.75, 1.0];
const FILL_GREY: [f32; 4] = [0.93, 0.93, 0.93, 1.0];

const CUT_DASH: f32 = 4.0;
const CARD_PADDING: f32 = 8.0;
const TAG_SIZE: f32 = 6.0;

const ACADEMIC_PADDING: f32 = 12.0;
const TERM_SIZE: f32 = 16.0;
const LABEL_SIZE: f32 = 7.0;
const DEFINITION_SIZE: f32 = 10.0;
const SYNONYM_SIZE: f32 = 9.5;
const SECTION_GAP: f32 = 8.0;

/// Column share of the table width: index, term, synonym, translation.
const TABLE_COLUMNS: [f32; 4] = [0.08, 0.32, 0.30, 0.30];
const TABLE_TEXT_SIZE: f32 = 10.0;
const CELL_PADDING: f32 = 4.0;

// ---------------------------------------------------------------------------
// Grid geometry
// ---------------------------------------------------------------------------

/// A grid cell in page coordinates (top-left origin, points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Lay out the sheet's grid on a page and return its cells in row-major
/// slot order.
pub fn grid_cells(
    page_width: f32,
    page_height: f32,
    sheet: &SheetLayout,
) -> Result<Vec<CellRect>, RenderError> {
    let GridSpec { columns, rows } = sheet.grid;
    let mut taffy: TaffyTree<()> = TaffyTree::new();
    taffy.disable_rounding();

    let leaves = (0..sheet.grid.capacity())
        .map(|_| taffy.new_leaf(Style::default()))
        .collect::<Result<Vec<_>, _>>()?;

    let padding = LengthPercentage::Length(sheet.padding);
    let gap = LengthPercentage::Length(sheet.gap);
    let root_style = Style {
        display: taffy::Display::Grid,
        size: Size {
            width: Dimension::Length(page_width),
            height: Dimension::Length(page_height),
        },
        padding: Rect {
            left: padding,
            right: padding,
            top: padding,
            bottom: padding,
        },
        gap: Size {
            width: gap,
            height: gap,
        },
        grid_template_columns: vec![taffy::TrackSizingFunction::from_flex(1.0); columns],
        grid_template_rows: vec![taffy::TrackSizingFunction::from_flex(1.0); rows],
        ..Default::default()
    };
    let root = taffy.new_with_children(root_style, &leaves)?;

    taffy.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(page_width),
            height: AvailableSpace::Definite(page_height),
        },
    )?;

    leaves
        .iter()
        .map(|&leaf| -> Result<CellRect, RenderError> {
            let layout = taffy.layout(leaf)?;
            Ok(CellRect {
                x: layout.location.x,
                y: layout.location.y,
                width: layout.size.width,
                height: layout.size.height,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Font settings of one text block.
#[derive(Debug, Clone, Copy)]
struct Ink<'a> {
    size: f32,
    italic: bool,
    color: [f32; 4],
    align: Align,
    family: &'a str,
}

impl<'a> Ink<'a> {
    fn new(size: f32, color: [f32; 4], align: Align, family: &'a str) -> Self {
        Self {
            size,
            italic: false,
            color,
            align,
            family,
        }
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn runs(&self) -> RunStyle<'a> {
        RunStyle {
            font_size: self.size,
            italic: self.italic,
            family: self.family,
        }
    }

    fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT
    }
}

/// Wrap a plain string into single-weight lines.
fn plain_lines(
    text: &str,
    bold: bool,
    ink: Ink<'_>,
    width: f32,
    fonts: &FontManager,
) -> Vec<Vec<TextRun>> {
    wrap_text(text, ink.size, bold, ink.italic, ink.family, width, fonts)
        .into_iter()
        .map(|line| {
            if line.is_empty() {
                Vec::new()
            } else {
                vec![TextRun {
                    text: line,
                    bold,
                    x_offset: 0.0,
                }]
            }
        })
        .collect()
}

/// Position wrapped lines inside a box of the given width.
fn text_block(
    x: f32,
    y: f32,
    width: f32,
    lines: Vec<Vec<TextRun>>,
    ink: Ink<'_>,
    fonts: &FontManager,
) -> LayoutBox {
    let line_height = ink.line_height();
    let lines: Vec<TextLine> = lines
        .into_iter()
        .enumerate()
        .map(|(i, runs)| {
            let slack = (width - runs_width(&runs, ink.runs(), fonts)).max(0.0);
            let x_offset = match ink.align {
                Align::Left => 0.0,
                Align::Center => slack / 2.0,
                Align::Right => slack,
            };
            TextLine {
                runs,
                x_offset,
                y_offset: i as f32 * line_height,
            }
        })
        .collect();

    let mut lbox = LayoutBox::new(x, y, width, lines.len() as f32 * line_height);
    lbox.text = Some(TextContent {
        lines,
        font_family: ink.family.to_string(),
        font_size: ink.size,
        italic: ink.italic,
        color: ink.color,
        line_height,
        ascent: fonts.ascender_pt(ink.size, false, ink.italic, ink.family),
        text_align: ink.align.as_str().to_string(),
    });
    lbox
}

// ---------------------------------------------------------------------------
// Flashcards
// ---------------------------------------------------------------------------

fn cut_frame(cell: CellRect) -> LayoutBox {
    let mut frame = LayoutBox::new(cell.x, cell.y, cell.width, cell.height);
    frame.border = Some(BorderStyle {
        width: 0.75,
        color: CUT_GREY,
        dash: Some(CUT_DASH),
    });
    frame
}

/// Centered bold text at the card's tier size, sheet tag bottom-right.
fn flashcard_cell(
    cell: CellRect,
    card: &Card,
    config: &PipelineConfig,
    fonts: &FontManager,
    family: &str,
) -> LayoutBox {
    let mut frame = cut_frame(cell);
    let CardFace::Text(face) = &card.face else {
        return frame;
    };

    let ink = Ink::new(config.font_scale.size_pt(face.tier), INK, Align::Center, family);
    let inner_width = cell.width - 2.0 * CARD_PADDING;
    let lines = plain_lines(&face.text, true, ink, inner_width, fonts);
    let text_height = lines.len() as f32 * ink.line_height();
    if text_height > cell.height - 2.0 * CARD_PADDING {
        log::warn!("card {} overflows its cell at {}pt", face.tag, ink.size);
    }
    let y = cell.y + ((cell.height - text_height) / 2.0).max(CARD_PADDING);
    frame
        .children
        .push(text_block(cell.x + CARD_PADDING, y, inner_width, lines, ink, fonts));

    let tag_ink = Ink::new(TAG_SIZE, TAG_GREY, Align::Right, family);
    let tag = vec![vec![TextRun {
        text: face.tag.clone(),
        bold: false,
        x_offset: 0.0,
    }]];
    frame.children.push(text_block(
        cell.x + 4.0,
        cell.y + cell.height - 4.0 - tag_ink.line_height(),
        cell.width - 8.0,
        tag,
        tag_ink,
        fonts,
    ));
    frame
}

// ---------------------------------------------------------------------------
// Academic cards
// ---------------------------------------------------------------------------

/// Cursor over the content area of one academic card.
struct CardColumn<'a> {
    x: f32,
    y: f32,
    width: f32,
    /// Content must end above this line (the footer).
    bottom: f32,
    family: &'a str,
}

impl CardColumn<'_> {
    /// Labelled section. Lines are cut to `max_lines` and to the room left;
    /// a section with no room for even one line is skipped.
    fn section(
        &mut self,
        frame: &mut LayoutBox,
        label: &str,
        lines: Vec<Vec<TextRun>>,
        ink: Ink<'_>,
        max_lines: usize,
        fonts: &FontManager,
    ) {
        let label_ink = Ink::new(LABEL_SIZE, MUTED, Align::Left, self.family);
        let text_top = self.y + label_ink.line_height() + 2.0;
        let room = ((self.bottom - text_top) / ink.line_height()).floor().max(0.0) as usize;
        let keep = max_lines.min(room);
        if keep == 0 {
            log::warn!("no room left for the {label} section");
            return;
        }

        let (lines, cut) = truncate_lines(lines, keep, ink.runs(), self.width, fonts);
        if cut {
            log::debug!("{label} truncated to {keep} lines");
        }

        let label_line = vec![vec![TextRun {
            text: label.to_string(),
            bold: true,
            x_offset: 0.0,
        }]];
        frame
            .children
            .push(text_block(self.x, self.y, self.width, label_line, label_ink, fonts));
        let body = text_block(self.x, text_top, self.width, lines, ink, fonts);
        self.y = text_top + body.height + SECTION_GAP;
        frame.children.push(body);
    }
}

/// Wrap the sentence in typographic quotes without disturbing its emphasis.
fn quoted(segments: &[TextSegment]) -> Vec<TextSegment> {
    let mut quoted = Vec::with_capacity(segments.len() + 2);
    quoted.push(TextSegment::plain("\u{201C}"));
    quoted.extend(segments.iter().cloned());
    quoted.push(TextSegment::plain("\u{201D}"));
    quoted
}

fn academic_cell(
    page: &mut PageLayout,
    cell: CellRect,
    card: &AcademicCard,
    config: &PipelineConfig,
    fonts: &FontManager,
    family: &str,
) {
    let mut frame = LayoutBox::new(cell.x, cell.y, cell.width, cell.height);
    frame.border = Some(BorderStyle {
        width: 2.0,
        color: INK,
        dash: None,
    });

    let x = cell.x + ACADEMIC_PADDING;
    let width = cell.width - 2.0 * ACADEMIC_PADDING;

    // Footer first, so the sections know where to stop.
    let footer_ink = Ink::new(
        config.footer_scale.size_pt(card.translation_step),
        INK,
        Align::Center,
        family,
    );
    let footer_lines = plain_lines(&card.translation, true, footer_ink, width, fonts);
    let footer_height = footer_lines.len() as f32 * footer_ink.line_height();
    let footer_y = cell.y + cell.height - ACADEMIC_PADDING - footer_height;
    let footer_rule = footer_y - SECTION_GAP / 2.0;

    // Header: term on the left, part-of-speech badge on the right.
    let badge_ink = Ink::new(LABEL_SIZE + 1.0, MUTED, Align::Center, family);
    let badge_width =
        fonts.measure_text_width(&card.part_of_speech, badge_ink.size, true, false, family) + 8.0;
    let term_ink = Ink::new(TERM_SIZE, INK, Align::Left, family);
    let term_width = (width - badge_width - 6.0).max(1.0);
    let term_lines = plain_lines(&card.term, true, term_ink, term_width, fonts);
    let term = text_block(x, cell.y + ACADEMIC_PADDING, term_width, term_lines, term_ink, fonts);

    let badge_line = vec![vec![TextRun {
        text: card.part_of_speech.clone(),
        bold: true,
        x_offset: 0.0,
    }]];
    let mut badge = text_block(
        x + width - badge_width,
        cell.y + ACADEMIC_PADDING + 2.0,
        badge_width,
        badge_line,
        badge_ink,
        fonts,
    );
    badge.background_color = Some(FILL_GREY);

    let divider = cell.y + ACADEMIC_PADDING + term.height.max(badge.height + 2.0) + 6.0;
    frame.children.push(term);
    frame.children.push(badge);
    page.rules
        .push(RuleLine::horizontal(x, x + width, divider, 0.5, RULE_GREY));

    let mut column = CardColumn {
        x,
        y: divider + SECTION_GAP,
        width,
        bottom: footer_rule - SECTION_GAP / 2.0,
        family,
    };

    let definition_ink = Ink::new(DEFINITION_SIZE, INK, Align::Left, family);
    let definition = wrap_segments(&card.definition, definition_ink.runs(), width, fonts);
    column.section(&mut frame, "DEFINITION", definition, definition_ink, usize::MAX, fonts);

    if let Some(synonyms) = &card.synonyms {
        let ink = Ink::new(SYNONYM_SIZE, MUTED, Align::Left, family);
        let lines = plain_lines(synonyms, false, ink, width, fonts);
        column.section(&mut frame, "SYNONYMS", lines, ink, usize::MAX, fonts);
    }

    let (lines, ink) = match &card.sentence {
        Some(sentence) => {
            let ink =
                Ink::new(config.sentence_scale.size_pt(sentence.step), INK, Align::Left, family)
                    .italic();
            let lines = wrap_segments(&quoted(&sentence.segments), ink.runs(), width, fonts);
            (lines, ink)
        }
        None => {
            let size = config.sentence_scale.size_pt(SizeStep::Regular);
            let ink = Ink::new(size, MUTED, Align::Left, family).italic();
            (plain_lines(NO_SENTENCE, false, ink, width, fonts), ink)
        }
    };
    column.section(
        &mut frame,
        "ACADEMIC CONTEXT",
        lines,
        ink,
        config.sentence_max_lines,
        fonts,
    );

    page.rules
        .push(RuleLine::horizontal(x, x + width, footer_rule, 0.5, RULE_GREY));
    frame
        .children
        .push(text_block(x, footer_y, width, footer_lines, footer_ink, fonts));
    page.boxes.push(frame);
}

/// Dashed guides through the page centre for cutting the 2 × 2 sheet.
fn center_cut_lines(page: &mut PageLayout, width: f32, height: f32) {
    page.rules
        .push(RuleLine::vertical(width / 2.0, 0.0, height, 0.5, CUT_GREY).dashed(6.0));
    page.rules
        .push(RuleLine::horizontal(0.0, width, height / 2.0, 0.5, CUT_GREY).dashed(6.0));
}

// ---------------------------------------------------------------------------
// Word table
// ---------------------------------------------------------------------------

type RowLines = Vec<Vec<Vec<TextRun>>>;

fn measure_row(
    cells: &[String],
    bold: bool,
    widths: &[f32],
    ink: Ink<'_>,
    fonts: &FontManager,
) -> (RowLines, f32) {
    let lines: RowLines = cells
        .iter()
        .zip(widths)
        .map(|(text, w)| plain_lines(text, bold, ink, w - 2.0 * CELL_PADDING, fonts))
        .collect();
    let tallest = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
    (lines, tallest as f32 * ink.line_height() + 2.0 * CELL_PADDING)
}

#[allow(clippy::too_many_arguments)]
fn table_row(
    page: &mut PageLayout,
    x: f32,
    y: f32,
    widths: &[f32],
    lines: RowLines,
    height: f32,
    background: Option<[f32; 4]>,
    ink: Ink<'_>,
    fonts: &FontManager,
) {
    let mut cx = x;
    for (cell_lines, &w) in lines.into_iter().zip(widths) {
        let mut cell = LayoutBox::new(cx, y, w, height);
        cell.background_color = background;
        cell.border = Some(BorderStyle {
            width: 0.5,
            color: RULE_GREY,
            dash: None,
        });
        cell.children.push(text_block(
            cx + CELL_PADDING,
            y + CELL_PADDING,
            w - 2.0 * CELL_PADDING,
            cell_lines,
            ink,
            fonts,
        ));
        page.boxes.push(cell);
        cx += w;
    }
}

fn layout_table(
    table: &WordTable,
    config: &PipelineConfig,
    fonts: &FontManager,
    family: &str,
) -> Vec<PageLayout> {
    let margin = config.table_margin;
    let page_height = config.effective_height();
    let width = config.effective_width() - 2.0 * margin;
    let widths: Vec<f32> = TABLE_COLUMNS.iter().map(|share| share * width).collect();

    let title_ink = Ink::new(16.0, INK, Align::Center, family);
    let stamp_ink = Ink::new(9.0, MUTED, Align::Center, family);
    let body_ink = Ink::new(TABLE_TEXT_SIZE, INK, Align::Left, family);
    let footer_ink = Ink::new(8.0, MUTED, Align::Center, family);

    let title_lines = plain_lines(&table.title, true, title_ink, width, fonts);
    let title_height = title_lines.len() as f32 * title_ink.line_height();
    let (header_lines, header_height) =
        measure_row(&table.headers, true, &widths, body_ink, fonts);
    let header_group = title_height + 4.0 + stamp_ink.line_height() + 8.0 + header_height;
    let footer_height = footer_ink.line_height() + 8.0;

    let rows: Vec<(RowLines, f32)> = table
        .rows
        .iter()
        .map(|row| measure_row(&row.cells(), false, &widths, body_ink, fonts))
        .collect();
    let heights: Vec<f32> = rows.iter().map(|(_, h)| *h).collect();
    let budget = page_height - 2.0 * margin - header_group - footer_height;
    let ranges = paginate_rows(&heights, budget);
    log::debug!(
        "table: {} rows over {} pages (budget {budget:.1}pt)",
        rows.len(),
        ranges.len()
    );

    ranges
        .into_iter()
        .map(|range| {
            let mut page = PageLayout::new(0, true);
            let mut y = margin;

            page.boxes.push(text_block(
                margin,
                y,
                width,
                title_lines.clone(),
                title_ink,
                fonts,
            ));
            y += title_height + 4.0;
            let stamp = plain_lines(&table.timestamp, false, stamp_ink, width, fonts);
            page.boxes
                .push(text_block(margin, y, width, stamp, stamp_ink, fonts));
            y += stamp_ink.line_height() + 8.0;

            table_row(
                &mut page,
                margin,
                y,
                &widths,
                header_lines.clone(),
                header_height,
                Some(FILL_GREY),
                body_ink,
                fonts,
            );
            y += header_height;

            for (lines, height) in &rows[range] {
                table_row(
                    &mut page,
                    margin,
                    y,
                    &widths,
                    lines.clone(),
                    *height,
                    None,
                    body_ink,
                    fonts,
                );
                y += height;
            }

            let footer = plain_lines(&table.footer, false, footer_ink, width, fonts);
            page.boxes.push(text_block(
                margin,
                page_height - margin - footer_ink.line_height(),
                width,
                footer,
                footer_ink,
                fonts,
            ));
            page
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the frozen layout for a logical document.
///
/// Card pages map one-to-one onto physical pages; the table may span many.
/// `break_after` is false on the final physical page only.
pub fn compute_layout(
    document: &Document,
    config: &PipelineConfig,
    fonts: &FontManager,
) -> Result<LayoutConfig, RenderError> {
    let page_width = config.effective_width();
    let page_height = config.effective_height();
    let family = fonts.default_family();

    let cells = match config.sheet(document.kind) {
        Some(sheet) => grid_cells(page_width, page_height, sheet)?,
        None => Vec::new(),
    };

    let mut pages = Vec::new();
    for page in &document.pages {
        match &page.content {
            PageContent::Cards(cards) => {
                let mut out = PageLayout::new(0, true);
                for card in cards {
                    let cell = *cells.get(card.slot).ok_or_else(|| {
                        RenderError::Layout(format!(
                            "card slot {} is outside the {} grid",
                            card.slot, document.kind
                        ))
                    })?;
                    match &card.face {
                        CardFace::Empty if document.kind == DocumentKind::Flashcards => {
                            out.boxes.push(cut_frame(cell));
                        }
                        CardFace::Empty => {}
                        CardFace::Text(_) => {
                            out.boxes
                                .push(flashcard_cell(cell, card, config, fonts, family));
                        }
                        CardFace::Academic(academic) => {
                            academic_cell(&mut out, cell, academic, config, fonts, family);
                        }
                    }
                }
                if document.kind == DocumentKind::AcademicPreview {
                    center_cut_lines(&mut out, page_width, page_height);
                }
                pages.push(out);
            }
            PageContent::Table(table) => {
                pages.extend(layout_table(table, config, fonts, family));
            }
        }
    }

    let count = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        page.page_index = i;
        page.break_after = i + 1 < count;
    }
    log::debug!("layout: {} -> {count} physical pages", document.kind);

    Ok(LayoutConfig {
        title: document.meta.title.clone(),
        page_width_pt: page_width,
        page_height_pt: page_height,
        pages,
    })
}

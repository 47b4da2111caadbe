//! Document assembly – turns a word list into a logical [`Document`].
//!
//! Stages run in a fixed order: filter → chunk → mirror (back pages only)
//! → per-card sizing and markup → pages. Every call recomputes the whole
//! document from the words it is given.

use chrono::{Datelike, NaiveDateTime};

use crate::document::{
    AcademicCard, Card, CardFace, Document, DocumentKind, DocumentMeta, Page, PageContent,
    PageSide, Sentence, TableRow, TextFace, WordTable,
};
use crate::duplex::mirror_page;
use crate::filter::filter_words;
use crate::markup;
use crate::pagination::{chunk, pad, GridSpec};
use crate::pipeline::PipelineConfig;
use crate::slug::{slugify, TimestampFormatter};
use crate::word::Word;

/// Shown when a part-of-speech tag is missing.
pub const POS_PLACEHOLDER: &str = "?";
/// Shown when a word has no English definition.
pub const NO_DEFINITION: &str = "No definition available.";
/// Shown in the context section of a word without academic sentences.
pub const NO_SENTENCE: &str = "No academic sentences available.";

pub fn flashcard_filename(set_name: &str, timestamp: &str) -> String {
    format!("flashcards_{}_{timestamp}.pdf", slugify(set_name))
}

pub fn table_filename(set_name: &str, day_name: &str, timestamp: &str) -> String {
    format!("{}_{}_{timestamp}.pdf", slugify(set_name), slugify(day_name))
}

pub fn academic_filename(set_name: &str, timestamp: &str) -> String {
    format!("academic_{}_{timestamp}.pdf", slugify(set_name))
}

pub struct DocumentAssembler<'a> {
    config: &'a PipelineConfig,
    clock: &'a dyn TimestampFormatter,
}

impl<'a> DocumentAssembler<'a> {
    /// `config` must have passed [`PipelineConfig::validate`]; a grid with
    /// no cells cannot be chunked.
    pub fn new(config: &'a PipelineConfig, clock: &'a dyn TimestampFormatter) -> Self {
        Self { config, clock }
    }

    /// Duplex deck: front₁, back₁, front₂, back₂, … one pair per chunk.
    ///
    /// Every word is printed; completeness does not matter for flashcards.
    pub fn flashcards(&self, words: &[Word], set_name: &str, at: &NaiveDateTime) -> Document {
        let grid = self.config.flashcards.grid;
        let timestamp = self.clock.format(at);
        let eligible = filter_words(words, true);
        let chunks = chunk(&eligible, grid.capacity());

        let mut pages = Vec::with_capacity(chunks.len() * 2);
        for (sheet, words) in chunks.iter().enumerate() {
            let front = pad(words, grid.capacity());
            let back = mirror_page(&front, grid.columns);

            pages.push(Page {
                index: pages.len(),
                sheet,
                side: Some(PageSide::Front),
                break_after: true,
                content: PageContent::Cards(self.text_faces(&front, sheet, PageSide::Front)),
            });
            pages.push(Page {
                index: pages.len(),
                sheet,
                side: Some(PageSide::Back),
                break_after: true,
                content: PageContent::Cards(self.text_faces(&back, sheet, PageSide::Back)),
            });
        }
        mark_last(&mut pages);

        log::debug!(
            "flashcards: {} words -> {} sheets, {} pages",
            words.len(),
            chunks.len(),
            pages.len()
        );

        Document {
            kind: DocumentKind::Flashcards,
            meta: DocumentMeta {
                title: set_name.to_string(),
                filename: flashcard_filename(set_name, &timestamp),
                timestamp,
            },
            grid: Some(grid),
            pages,
        }
    }

    fn text_faces(&self, slots: &[Option<&Word>], sheet: usize, side: PageSide) -> Vec<Card> {
        let side_tag = match side {
            PageSide::Front => 'F',
            PageSide::Back => 'B',
        };
        slots
            .iter()
            .enumerate()
            .map(|(slot, word)| {
                let face = match word {
                    Some(word) => {
                        let text = match side {
                            PageSide::Front => &word.eng,
                            PageSide::Back => &word.tr,
                        };
                        CardFace::Text(TextFace {
                            word_id: word.id.clone(),
                            text: text.clone(),
                            tier: self.config.font_scale.classify(text),
                            tag: format!("{}-{side_tag}-{}", sheet + 1, slot + 1),
                        })
                    }
                    None => CardFace::Empty,
                };
                Card { slot, face }
            })
            .collect()
    }

    /// Word table as one logical page; the renderer splits it physically.
    pub fn table(
        &self,
        words: &[Word],
        set_name: &str,
        day_name: &str,
        at: &NaiveDateTime,
    ) -> Document {
        let timestamp = self.clock.format(at);
        let labels = &self.config.table;
        let title = format!("{set_name} — {day_name}");

        let rows = words
            .iter()
            .enumerate()
            .map(|(i, w)| TableRow {
                index: i + 1,
                term: w.eng.clone(),
                synonym: w.synonym_text().unwrap_or_default().to_string(),
                translation: w.tr.clone(),
            })
            .collect();

        let table = WordTable {
            title: title.clone(),
            timestamp: timestamp.clone(),
            headers: labels.headers.clone(),
            rows,
            footer: format!("{} — © {}", labels.brand, at.year()),
        };

        Document {
            kind: DocumentKind::Table,
            meta: DocumentMeta {
                title,
                filename: table_filename(set_name, day_name, &timestamp),
                timestamp,
            },
            grid: None,
            pages: vec![Page {
                index: 0,
                sheet: 0,
                side: None,
                break_after: false,
                content: PageContent::Table(table),
            }],
        }
    }

    /// Academic cards, four per sheet, last page flagged.
    pub fn academic_preview(
        &self,
        words: &[Word],
        include_incomplete: bool,
        set_name: &str,
        at: &NaiveDateTime,
    ) -> Document {
        let grid: GridSpec = self.config.academic.grid;
        let timestamp = self.clock.format(at);
        let eligible = filter_words(words, include_incomplete);
        if eligible.is_empty() {
            log::info!("academic preview: no eligible words out of {}", words.len());
        }

        let mut pages: Vec<Page> = chunk(&eligible, grid.capacity())
            .iter()
            .enumerate()
            .map(|(sheet, words)| {
                let cards = pad(words, grid.capacity())
                    .into_iter()
                    .enumerate()
                    .map(|(slot, word)| Card {
                        slot,
                        face: match word {
                            Some(word) => CardFace::Academic(self.academic_card(word)),
                            None => CardFace::Empty,
                        },
                    })
                    .collect();
                Page {
                    index: sheet,
                    sheet,
                    side: None,
                    break_after: true,
                    content: PageContent::Cards(cards),
                }
            })
            .collect();
        mark_last(&mut pages);

        Document {
            kind: DocumentKind::AcademicPreview,
            meta: DocumentMeta {
                title: set_name.to_string(),
                filename: academic_filename(set_name, &timestamp),
                timestamp,
            },
            grid: Some(grid),
            pages,
        }
    }

    fn academic_card(&self, word: &Word) -> AcademicCard {
        let non_blank = |s: &&str| !s.trim().is_empty();

        let sentence = word.first_sentence().map(|text| Sentence {
            segments: markup::format(text),
            step: self.config.sentence_scale.select(text),
        });

        AcademicCard {
            word_id: word.id.clone(),
            term: word.eng.clone(),
            part_of_speech: word
                .word_type
                .as_deref()
                .filter(non_blank)
                .unwrap_or(POS_PLACEHOLDER)
                .to_string(),
            definition: markup::format(
                word.eng_definition
                    .as_deref()
                    .filter(non_blank)
                    .unwrap_or(NO_DEFINITION),
            ),
            synonyms: word.synonym_text().map(str::to_string),
            sentence,
            translation: word.tr.clone(),
            translation_step: self.config.footer_scale.select(&word.tr),
        }
    }
}

fn mark_last(pages: &mut [Page]) {
    if let Some(last) = pages.last_mut() {
        last.break_after = false;
    }
}

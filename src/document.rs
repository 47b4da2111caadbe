//! Logical document tree: Document → Page → Card → TextSegment.
//!
//! This is what the assembler produces and what every
//! [`Renderer`](crate::render::Renderer) consumes. It carries content and
//! sizing decisions only; positions are computed later by the layout stage.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::font_scale::{FontTier, SizeStep};
use crate::markup::TextSegment;
use crate::pagination::GridSpec;

/// The three printable artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Duplex deck, term on the front and translation on the back.
    Flashcards,
    /// Numbered word table.
    Table,
    /// One academic card per word, four per sheet.
    AcademicPreview,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Flashcards => "flashcards",
            DocumentKind::Table => "table",
            DocumentKind::AcademicPreview => "academic preview",
        };
        f.write_str(name)
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flashcards" | "deck" => Ok(DocumentKind::Flashcards),
            "table" => Ok(DocumentKind::Table),
            "academic" | "academic-preview" => Ok(DocumentKind::AcademicPreview),
            other => Err(format!("unknown document kind `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMeta {
    pub title: String,
    pub timestamp: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub meta: DocumentMeta,
    /// Card grid shared by every page; `None` for the table.
    pub grid: Option<GridSpec>,
    pub pages: Vec<Page>,
}

impl Document {
    /// True when no page carries a word.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|page| match &page.content {
            PageContent::Cards(cards) => cards.iter().all(Card::is_empty),
            PageContent::Table(table) => table.rows.is_empty(),
        })
    }

    /// Pages with the given side, in order.
    pub fn pages_on(&self, side: PageSide) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(move |p| p.side == Some(side))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSide {
    Front,
    Back,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub index: usize,
    /// Physical sheet (chunk) this page belongs to.
    pub sheet: usize,
    pub side: Option<PageSide>,
    /// False only on the final page.
    pub break_after: bool,
    pub content: PageContent,
}

impl Page {
    pub fn cards(&self) -> &[Card] {
        match &self.content {
            PageContent::Cards(cards) => cards,
            PageContent::Table(_) => &[],
        }
    }

    pub fn is_last(&self) -> bool {
        !self.break_after
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "body", rename_all = "snake_case")]
pub enum PageContent {
    Cards(Vec<Card>),
    Table(WordTable),
}

/// One grid cell; `slot` is its row-major position on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub slot: usize,
    pub face: CardFace,
}

impl Card {
    pub fn word_id(&self) -> Option<&str> {
        match &self.face {
            CardFace::Empty => None,
            CardFace::Text(face) => Some(&face.word_id),
            CardFace::Academic(card) => Some(&card.word_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.face, CardFace::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardFace {
    Empty,
    Text(TextFace),
    Academic(AcademicCard),
}

/// A single centred text: the term on a front page, the translation on a
/// back page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFace {
    pub word_id: String,
    pub text: String,
    pub tier: FontTier,
    /// Sheet/side/slot tag such as `2-B-3`, for matching cut cards.
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcademicCard {
    pub word_id: String,
    pub term: String,
    pub part_of_speech: String,
    pub definition: Vec<TextSegment>,
    pub synonyms: Option<String>,
    pub sentence: Option<Sentence>,
    pub translation: String,
    pub translation_step: SizeStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentence {
    pub segments: Vec<TextSegment>,
    pub step: SizeStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordTable {
    pub title: String,
    pub timestamp: String,
    pub headers: [String; 4],
    pub rows: Vec<TableRow>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// 1-based position in the word list.
    pub index: usize,
    pub term: String,
    /// Empty when the word has no synonym.
    pub synonym: String,
    pub translation: String,
}

impl TableRow {
    pub fn cells(&self) -> [String; 4] {
        [
            self.index.to_string(),
            self.term.clone(),
            self.synonym.clone(),
            self.translation.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::TextSegment;

    fn text_card(slot: usize, id: &str) -> Card {
        Card {
            slot,
            face: CardFace::Text(TextFace {
                word_id: id.to_string(),
                text: id.to_string(),
                tier: FontTier::Tier1,
                tag: format!("1-F-{}", slot + 1),
            }),
        }
    }

    fn document(pages: Vec<PageContent>) -> Document {
        Document {
            kind: DocumentKind::Flashcards,
            meta: DocumentMeta {
                title: "t".into(),
                timestamp: "ts".into(),
                filename: "f.pdf".into(),
            },
            grid: None,
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(index, content)| Page {
                    index,
                    sheet: index,
                    side: None,
                    break_after: false,
                    content,
                })
                .collect(),
        }
    }

    #[test]
    fn kind_parses_cli_names() {
        assert_eq!("flashcards".parse::<DocumentKind>(), Ok(DocumentKind::Flashcards));
        assert_eq!("Table".parse::<DocumentKind>(), Ok(DocumentKind::Table));
        assert_eq!("academic".parse::<DocumentKind>(), Ok(DocumentKind::AcademicPreview));
        assert!("poster".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn emptiness_looks_at_words_not_pages() {
        assert!(document(vec![]).is_empty());
        let blank = vec![Card {
            slot: 0,
            face: CardFace::Empty,
        }];
        assert!(document(vec![PageContent::Cards(blank)]).is_empty());
        assert!(!document(vec![PageContent::Cards(vec![text_card(0, "w1")])]).is_empty());
    }

    #[test]
    fn card_word_ids() {
        assert_eq!(text_card(0, "w1").word_id(), Some("w1"));
        let academic = Card {
            slot: 1,
            face: CardFace::Academic(AcademicCard {
                word_id: "w2".into(),
                term: "run".into(),
                part_of_speech: "verb".into(),
                definition: vec![TextSegment::plain("to move")],
                synonyms: None,
                sentence: None,
                translation: "koşmak".into(),
                translation_step: SizeStep::Regular,
            }),
        };
        assert_eq!(academic.word_id(), Some("w2"));
    }
}

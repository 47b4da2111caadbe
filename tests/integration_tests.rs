//! Integration tests for the vocab-print pipeline.
//!
//! These tests validate:
//! - The 13-word duplex deck and the academic `run`/`jog` card end to end
//! - Layout config geometry stays on the page and is deterministic
//! - PDF output exists and has valid format
//! - Table pagination repeats header and footer
//! - The async exporter writes files and reports empty exports

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use sha2::{Digest, Sha256};

use vocab_print::document::{CardFace, Document, DocumentKind, PageSide};
use vocab_print::error::ExportError;
use vocab_print::export::{ExportOutcome, ExportState, Exporter};
use vocab_print::fonts::FontManager;
use vocab_print::layout_config::LayoutConfig;
use vocab_print::markup::TextSegment;
use vocab_print::pipeline::{
    build_document, compute_layout_config, generate_pdf, ExportRequest, PipelineConfig,
};
use vocab_print::render::{render_pdf, JsonRenderer, PdfRenderer};
use vocab_print::samples;
use vocab_print::slug::FilenameTimestamp;
use vocab_print::word::{load_words, Word};

// =====================================================================
// Helper
// =====================================================================

fn default_config() -> PipelineConfig {
    PipelineConfig::default()
}

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(14, 5, 0)
        .unwrap()
}

fn request(kind: DocumentKind) -> ExportRequest {
    ExportRequest {
        kind,
        set_name: "Günlük Set".to_string(),
        day_name: "Gün 3".to_string(),
        include_incomplete: false,
    }
}

fn build(words: &[Word], request: &ExportRequest) -> Document {
    build_document(words, request, &default_config(), &FilenameTimestamp, &at()).unwrap()
}

fn numbered(n: usize) -> Vec<Word> {
    (1..=n)
        .map(|i| Word::new(format!("w{i}"), format!("eng{i}"), format!("tr{i}")))
        .collect()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

fn face_ids(document: &Document, page: usize) -> Vec<Option<String>> {
    document.pages[page]
        .cards()
        .iter()
        .map(|c| c.word_id().map(str::to_string))
        .collect()
}

// =====================================================================
// Document assembly
// =====================================================================

#[test]
fn thirteen_words_make_two_mirrored_sheets() {
    let doc = build(&numbered(13), &request(DocumentKind::Flashcards));
    assert_eq!(doc.pages.len(), 4);
    assert_eq!(doc.pages_on(PageSide::Front).count(), 2);
    assert_eq!(doc.pages_on(PageSide::Back).count(), 2);
    assert_eq!(doc.meta.filename, "flashcards_gunluk_set_19-10-2026_14-05.pdf");

    // back page 1, first row: w3, w2, w1
    let back1 = face_ids(&doc, 1);
    assert_eq!(back1[0].as_deref(), Some("w3"));
    assert_eq!(back1[1].as_deref(), Some("w2"));
    assert_eq!(back1[2].as_deref(), Some("w1"));

    // sheet 2: one word; its back sits in the last column of row 0
    let front2 = face_ids(&doc, 2);
    assert_eq!(front2[0].as_deref(), Some("w13"));
    assert!(front2[1..].iter().all(Option::is_none));
    let back2 = face_ids(&doc, 3);
    assert_eq!(back2[2].as_deref(), Some("w13"));
    assert_eq!(back2.iter().filter(|id| id.is_some()).count(), 1);

    assert!(doc.pages[3].is_last());
    assert!(doc.pages[..3].iter().all(|p| p.break_after));
}

#[test]
fn academic_run_jog_card() {
    let words = vec![Word::new("1", "run", "koşmak")
        .with_synonym("jog")
        .with_sentences(["**Running** is healthy."])];
    let doc = build(&words, &request(DocumentKind::AcademicPreview));
    assert_eq!(doc.pages.len(), 1);
    assert!(doc.pages[0].is_last());

    let cards = doc.pages[0].cards();
    assert_eq!(cards.len(), 4);
    let CardFace::Academic(card) = &cards[0].face else {
        panic!("expected an academic card");
    };
    assert_eq!(card.term, "run");
    assert_eq!(card.part_of_speech, "?");
    assert_eq!(card.definition, vec![TextSegment::plain("No definition available.")]);
    assert_eq!(card.synonyms.as_deref(), Some("jog"));
    let sentence = card.sentence.as_ref().unwrap();
    assert_eq!(
        sentence.segments,
        vec![
            TextSegment::emphasis("Running"),
            TextSegment::plain(" is healthy.")
        ]
    );
    assert_eq!(card.translation, "koşmak");
    assert!(cards[1..].iter().all(|c| c.is_empty()));
}

#[test]
fn incomplete_words_only_with_opt_in() {
    let words = samples::academic_set();
    let strict = build(&words, &request(DocumentKind::AcademicPreview));
    let mut opt_in = request(DocumentKind::AcademicPreview);
    opt_in.include_incomplete = true;
    let relaxed = build(&words, &opt_in);

    let count = |d: &Document| {
        d.pages
            .iter()
            .flat_map(|p| p.cards())
            .filter(|c| !c.is_empty())
            .count()
    };
    assert_eq!(count(&strict), words.len() - 1);
    assert_eq!(count(&relaxed), words.len());
}

#[test]
fn loaded_words_feed_the_table() {
    let json = r#"[
        {"eng": " run ", "tr": "koşmak", "synonym": "jog"},
        {"eng": "book", "tr": "kitap"}
    ]"#;
    let words = load_words(json).unwrap();
    let doc = build(&words, &request(DocumentKind::Table));
    assert_eq!(doc.meta.filename, "gunluk_set_gun_3_19-10-2026_14-05.pdf");
    assert_eq!(doc.meta.title, "Günlük Set — Gün 3");
}

// =====================================================================
// Layout config tests
// =====================================================================

#[test]
fn layout_boxes_stay_on_page() {
    let config = default_config();
    let fonts = FontManager::default();
    for kind in [
        DocumentKind::Flashcards,
        DocumentKind::Table,
        DocumentKind::AcademicPreview,
    ] {
        let mut req = request(kind);
        req.include_incomplete = true;
        let doc = build(&samples::academic_set(), &req);
        let layout = compute_layout_config(&doc, &config, &fonts).unwrap();
        for page in &layout.pages {
            for lbox in &page.boxes {
                assert!(lbox.x >= 0.0 && lbox.x + lbox.width <= layout.page_width_pt + 0.01);
                assert!(lbox.y >= 0.0 && lbox.y + lbox.height <= layout.page_height_pt + 0.01);
                assert!(lbox.width >= 0.0 && lbox.height >= 0.0);
            }
        }
    }
}

#[test]
fn layout_json_roundtrip() {
    let doc = build(&samples::academic_set(), &request(DocumentKind::AcademicPreview));
    let layout =
        compute_layout_config(&doc, &default_config(), &FontManager::default()).unwrap();
    let back = LayoutConfig::from_json(&layout.to_json().unwrap()).unwrap();
    assert_eq!(back, layout);
}

#[test]
fn layout_is_deterministic() {
    let digest = || {
        let doc = build(&samples::large_set(40), &request(DocumentKind::Flashcards));
        let layout =
            compute_layout_config(&doc, &default_config(), &FontManager::default()).unwrap();
        Sha256::digest(layout.to_json().unwrap().as_bytes())
    };
    assert_eq!(digest(), digest());
}

#[test]
fn large_table_spans_pages_with_header_on_each() {
    let doc = build(&numbered(150), &request(DocumentKind::Table));
    assert_eq!(doc.pages.len(), 1, "table is one logical page");

    let layout =
        compute_layout_config(&doc, &default_config(), &FontManager::default()).unwrap();
    assert!(layout.pages.len() >= 3);
    for page in &layout.pages {
        let text = page.page_text();
        assert_eq!(text[0], "Günlük Set — Gün 3");
        assert_eq!(text[1], "19-10-2026_14-05");
        assert_eq!(text.last().unwrap(), "Kelime Defterim — © 2026");
    }
    let rows: usize = layout
        .pages
        .iter()
        .map(|p| p.page_text().iter().filter(|t| t.starts_with("eng")).count())
        .sum();
    assert_eq!(rows, 150);
}

// =====================================================================
// PDF generation tests
// =====================================================================

#[test]
fn generate_pdf_for_every_kind() {
    for kind in [
        DocumentKind::Flashcards,
        DocumentKind::Table,
        DocumentKind::AcademicPreview,
    ] {
        let doc = build(&samples::academic_set(), &request(kind));
        let (bytes, layout) = generate_pdf(&doc, &default_config()).unwrap();
        assert_valid_pdf(&bytes);
        assert!(!layout.pages.is_empty());
    }
}

#[test]
fn render_pdf_from_layout_json() {
    let doc = build(&samples::starter_set(), &request(DocumentKind::Flashcards));
    let (_, layout) = generate_pdf(&doc, &default_config()).unwrap();
    let reloaded = LayoutConfig::from_json(&layout.to_json().unwrap()).unwrap();
    assert_valid_pdf(&render_pdf(&reloaded).unwrap());
}

// =====================================================================
// Export tests
// =====================================================================

#[tokio::test]
async fn exporter_writes_pdf() {
    let out = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(Arc::new(PdfRenderer::default()), out.path());

    let doc = build(&numbered(13), &request(DocumentKind::Flashcards));
    let outcome = exporter.export(doc).await.unwrap();
    let ExportOutcome::Saved { path, bytes } = outcome else {
        panic!("expected a saved file");
    };
    assert_eq!(path, out.path().join("flashcards_gunluk_set_19-10-2026_14-05.pdf"));
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written.len(), bytes);
    assert_valid_pdf(&written);
    assert_eq!(exporter.state(DocumentKind::Flashcards), ExportState::Idle);
}

#[tokio::test]
async fn exporter_reports_nothing_to_export() {
    let out = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(Arc::new(JsonRenderer), out.path());

    // no word carries a sentence, so the strict preview is empty
    let doc = build(&samples::starter_set(), &request(DocumentKind::AcademicPreview));
    let outcome = exporter.export(doc).await.unwrap();
    assert_eq!(outcome, ExportOutcome::NothingToExport);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn exporter_surfaces_output_errors() {
    let out = tempfile::tempdir().unwrap();
    // a regular file where the output directory should be
    let blocker = out.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let exporter = Exporter::new(Arc::new(JsonRenderer), &blocker);

    let doc = build(&numbered(2), &request(DocumentKind::Table));
    let result = exporter.export(doc).await;
    assert!(matches!(result, Err(ExportError::Io(_))));
    assert_eq!(exporter.state(DocumentKind::Table), ExportState::Idle);
}

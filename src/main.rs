//! vocabprint – command-line vocabulary exporter.
//!
//! Usage:
//!   vocabprint <words.json> [--kind flashcards|table|academic] [--set NAME]
//!              [--day NAME] [--out DIR] [--include-incomplete]
//!              [--config FILE] [--font FILE] [--json]
//!   vocabprint --demo [--kind ...]
//!
//! The output file is named after the set (and day, for the table) plus the
//! export time, and written into `--out` (default: current directory).

use std::{env, path::PathBuf, process, sync::Arc};

use vocab_print::document::DocumentKind;
use vocab_print::export::{ExportOutcome, Exporter};
use vocab_print::fonts::FontManager;
use vocab_print::pipeline::{build_document, ExportRequest, PipelineConfig};
use vocab_print::render::{JsonRenderer, PdfRenderer, Renderer};
use vocab_print::samples;
use vocab_print::slug::FilenameTimestamp;
use vocab_print::word::load_words_file;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from(".");
    let mut kind = DocumentKind::Flashcards;
    let mut set_name: Option<String> = None;
    let mut day_name = "Gün 1".to_string();
    let mut include_incomplete = false;
    let mut config_path: Option<PathBuf> = None;
    let mut font_path: Option<PathBuf> = None;
    let mut json = false;
    let mut demo = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--kind" | "-k" => match iter.next().map(|v| v.parse::<DocumentKind>()) {
                Some(Ok(k)) => kind = k,
                Some(Err(e)) => fail(&args[0], &e),
                None => fail(&args[0], "--kind needs a value"),
            },
            "--set" | "-s" => set_name = Some(value(&mut iter, &args[0], arg)),
            "--day" | "-d" => day_name = value(&mut iter, &args[0], arg),
            "--out" | "-o" => out_dir = PathBuf::from(value(&mut iter, &args[0], arg)),
            "--config" | "-c" => config_path = Some(PathBuf::from(value(&mut iter, &args[0], arg))),
            "--font" => font_path = Some(PathBuf::from(value(&mut iter, &args[0], arg))),
            "--include-incomplete" => include_incomplete = true,
            "--json" => json = true,
            "--demo" => demo = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => fail(&args[0], &format!("Unknown flag: {other}")),
            path => {
                if input_path.is_some() {
                    fail(&args[0], &format!("Unexpected argument: {path}"));
                }
                input_path = Some(PathBuf::from(path));
            }
        }
    }

    let words = match (&input_path, demo) {
        (Some(path), _) => match load_words_file(path) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("Error reading '{}': {e}", path.display());
                process::exit(1);
            }
        },
        (None, true) => match kind {
            DocumentKind::AcademicPreview => samples::academic_set(),
            _ => samples::starter_set(),
        },
        (None, false) => fail(&args[0], "Error: no input file specified."),
    };

    // Default set name: stem of the input filename.
    let set_name = set_name.unwrap_or_else(|| {
        input_path
            .as_deref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("demo")
            .to_string()
    });

    let config = match &config_path {
        Some(path) => match PipelineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {e}", path.display());
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    let mut fonts = FontManager::default();
    if let Some(path) = &font_path {
        if let Err(e) = fonts.load_font_file("Custom", path) {
            eprintln!("Error loading font '{}': {e}", path.display());
            process::exit(1);
        }
    }

    let renderer: Arc<dyn Renderer> = if json {
        Arc::new(JsonRenderer)
    } else {
        Arc::new(PdfRenderer::new(config.clone(), fonts))
    };

    let request = ExportRequest {
        kind,
        set_name,
        day_name,
        include_incomplete,
    };
    let now = chrono::Local::now().naive_local();
    let document = match build_document(&words, &request, &config, &FilenameTimestamp, &now) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error in config: {e}");
            process::exit(1);
        }
    };
    let pages = document.pages.len();

    let exporter = Exporter::new(renderer, out_dir);
    match exporter.export(document).await {
        Ok(ExportOutcome::Saved { path, bytes }) => {
            eprintln!(
                "Wrote '{}' ({} bytes, {} logical page{})",
                path.display(),
                bytes,
                pages,
                if pages == 1 { "" } else { "s" }
            );
        }
        Ok(ExportOutcome::NothingToExport) => {
            eprintln!("Nothing to export: no eligible words for the {kind}.");
        }
        Err(e) => {
            eprintln!("Error exporting {kind}: {e}");
            process::exit(1);
        }
    }
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, prog: &str, flag: &str) -> String {
    match iter.next() {
        Some(v) => v.clone(),
        None => fail(prog, &format!("{flag} needs a value")),
    }
}

fn fail(prog: &str, message: &str) -> ! {
    eprintln!("{message}");
    print_usage(prog);
    process::exit(1);
}

fn print_usage(prog: &str) {
    eprintln!("vocabprint – vocabulary flashcards, word tables and academic cards");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <words.json> [--kind flashcards|table|academic] [--set NAME] [--day NAME]");
    eprintln!("  {prog} --demo [--kind flashcards|table|academic]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <words.json>          JSON array of words (eng, tr, synonym, type, engDefinition, academicSentences)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --kind, -k            Document to export (default: flashcards)");
    eprintln!("  --set, -s             Set name for titles and filenames (default: input filename stem)");
    eprintln!("  --day, -d             Day name for the table title (default: \"Gün 1\")");
    eprintln!("  --out, -o             Output directory (default: .)");
    eprintln!("  --include-incomplete  Academic preview: include words without a sentence");
    eprintln!("  --config, -c          Pipeline config JSON (partial configs keep defaults)");
    eprintln!("  --font                TTF used for text measurement");
    eprintln!("  --json                Write the logical document as JSON instead of PDF");
    eprintln!("  --demo                Use a built-in sample word set");
    eprintln!("  --help                Print this message");
}

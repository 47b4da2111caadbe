//! # vocab-print – vocabulary print/export layout engine
//!
//! Turns an ordered word list into printable documents: a duplex flashcard
//! deck, a numbered word table, and an academic card preview. The pipeline
//! stages are:
//!
//! 1. **Filter** – pick the words eligible for a run ([`filter`])
//! 2. **Paginate** – chunk into fixed-capacity sheets ([`pagination`])
//! 3. **Mirror** – align back pages with their fronts ([`duplex`])
//! 4. **Size & format** – font tiers and bold markup ([`font_scale`], [`markup`])
//! 5. **Assemble** – build the logical document tree ([`assembler`], [`document`])
//! 6. **Layout** – place cards and rows with Taffy ([`layout`], [`layout_config`])
//! 7. **Render & export** – PDF or JSON, saved asynchronously ([`render`], [`export`])

pub mod assembler;
pub mod document;
pub mod duplex;
pub mod error;
pub mod export;
pub mod filter;
pub mod font_scale;
pub mod fonts;
pub mod layout;
pub mod layout_config;
pub mod markup;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod samples;
pub mod slug;
pub mod word;

// Re-exports for convenience
pub use document::{Document, DocumentKind};
pub use error::{ConfigError, ExportError, RenderError, ValidationError};
pub use export::{ExportOutcome, Exporter};
pub use pipeline::{build_document, generate_pdf, ExportRequest, PageOrientation, PipelineConfig};
pub use render::{JsonRenderer, PdfRenderer, Renderer};
pub use word::{load_words, Word};

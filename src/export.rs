//! Export lifecycle.
//!
//! Each document kind has its own state machine:
//!
//! ```text
//! idle --start--> exporting --succeed--> succeeded --reset--> idle
//!                           \--fail----> failed ----reset--> idle
//! ```
//!
//! A second start while a kind is exporting is rejected with
//! [`ExportError::Busy`]. The [`Exporter`] renders on a blocking thread,
//! saves with `tokio::fs`, and always returns the machine to idle and
//! removes its staging directory, however the export ends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::TempDir;

use crate::document::{Document, DocumentKind};
use crate::error::ExportError;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportState {
    Idle,
    Exporting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportEvent {
    Start,
    Succeed,
    Fail,
    Reset,
}

/// Guarded transitions for one document kind.
#[derive(Debug, Clone)]
pub struct ExportStateMachine {
    kind: DocumentKind,
    state: ExportState,
}

impl ExportStateMachine {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            state: ExportState::Idle,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Apply `event`, returning the new state. The state is unchanged on
    /// error.
    pub fn transition(&mut self, event: ExportEvent) -> Result<ExportState, ExportError> {
        use ExportEvent::*;
        use ExportState::*;

        let next = match (self.state, event) {
            (Idle, Start) => Exporting,
            (Exporting, Start) => return Err(ExportError::Busy(self.kind)),
            (Exporting, Succeed) => Succeeded,
            (Exporting, Fail) => Failed,
            (Succeeded | Failed, Reset) => Idle,
            (from, event) => return Err(ExportError::InvalidTransition { from, event }),
        };
        log::info!("{} export: {:?} -> {:?}", self.kind, self.state, next);
        self.state = next;
        Ok(next)
    }
}

/// Private scratch directory for one export, removed on drop.
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    pub fn create() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("vocab-print-").tempdir()?;
        log::debug!("staging area at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now, reporting any error instead of ignoring it.
    pub fn close(self) -> std::io::Result<()> {
        self.dir.close()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { path: PathBuf, bytes: usize },
    /// The document had no words; nothing was rendered or written.
    NothingToExport,
}

type Slots = Arc<Mutex<HashMap<DocumentKind, ExportStateMachine>>>;

fn lock(slots: &Slots) -> std::sync::MutexGuard<'_, HashMap<DocumentKind, ExportStateMachine>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds a kind in `Exporting` until settled; returns it to `Idle` on drop,
/// including on panic and future cancellation.
struct SlotGuard {
    slots: Slots,
    kind: DocumentKind,
}

impl SlotGuard {
    fn settle(&self, event: ExportEvent) {
        if let Some(machine) = lock(&self.slots).get_mut(&self.kind) {
            if let Err(e) = machine.transition(event) {
                log::error!("{e}");
            }
        }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let mut slots = lock(&self.slots);
        let Some(machine) = slots.get_mut(&self.kind) else {
            return;
        };
        if machine.state() == ExportState::Exporting {
            log::warn!("{} export abandoned", self.kind);
            let _ = machine.transition(ExportEvent::Fail);
        }
        if let Err(e) = machine.transition(ExportEvent::Reset) {
            log::error!("{e}");
        }
    }
}

/// Drives render → save for any document kind, one export per kind at a time.
pub struct Exporter {
    renderer: Arc<dyn Renderer>,
    output_dir: PathBuf,
    slots: Slots,
}

impl Exporter {
    pub fn new(renderer: Arc<dyn Renderer>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
            slots: Arc::default(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Current state for `kind`; kinds never exported are idle.
    pub fn state(&self, kind: DocumentKind) -> ExportState {
        lock(&self.slots)
            .get(&kind)
            .map_or(ExportState::Idle, ExportStateMachine::state)
    }

    fn begin(&self, kind: DocumentKind) -> Result<SlotGuard, ExportError> {
        lock(&self.slots)
            .entry(kind)
            .or_insert_with(|| ExportStateMachine::new(kind))
            .transition(ExportEvent::Start)?;
        Ok(SlotGuard {
            slots: Arc::clone(&self.slots),
            kind,
        })
    }

    /// Render `document` and save it under the output directory.
    ///
    /// An empty document short-circuits to
    /// [`ExportOutcome::NothingToExport`] without touching the renderer.
    pub async fn export(&self, document: Document) -> Result<ExportOutcome, ExportError> {
        let kind = document.kind;
        if document.is_empty() {
            log::info!("{kind} export: nothing to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        let guard = self.begin(kind)?;
        let result = self.render_and_save(document).await;
        match &result {
            Ok(_) => guard.settle(ExportEvent::Succeed),
            Err(e) => {
                log::error!("{kind} export failed: {e}");
                guard.settle(ExportEvent::Fail);
            }
        }
        result
    }

    async fn render_and_save(&self, document: Document) -> Result<ExportOutcome, ExportError> {
        let staging = StagingArea::create()?;
        let staging_path = staging.path().to_path_buf();
        let renderer = Arc::clone(&self.renderer);
        let filename = PathBuf::from(&document.meta.filename);

        let artifact =
            tokio::task::spawn_blocking(move || renderer.render(&document, &staging_path))
                .await??;

        let path = self
            .output_dir
            .join(filename.with_extension(artifact.extension));
        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::write(&path, &artifact.bytes).await?;
        // The file is saved; a leftover staging dir does not fail the export.
        if let Err(e) = staging.close() {
            log::warn!("could not remove staging area: {e}");
        }

        log::info!("wrote {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(ExportOutcome::Saved {
            path,
            bytes: artifact.bytes.len(),
        })
    }
}

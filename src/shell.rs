//! State and background worker for an interactive front end.
//!
//! The front end owns a [`ShellState`] and mutates it only from its own
//! context. A conversion runs on tokio's blocking pool and talks back
//! exclusively through [`ShellEvent`]s on a channel; the front end drains
//! the channel and feeds each event to [`ShellState::apply`]. Nothing on the
//! worker side ever touches the state directly.
//!
//! ```text
//! front end ── start() ──▶ Worker (spawn_blocking: convert_sync)
//!     ▲                        │
//!     └── apply(event) ◀── mpsc ◀── Log / Progress / Finished
//! ```

use crate::config::ConversionConfig;
use crate::convert::{convert_sync, ConversionRequest};
use crate::error::Pdf2PptxError;
use crate::output::ConversionResult;
use crate::progress::{LogSink, ProgressSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// First line shown in a fresh shell.
pub const READY_MESSAGE: &str = "Ready. Select a PDF to start.";

/// One message from the conversion worker.
#[derive(Debug)]
pub enum ShellEvent {
    Log(String),
    Progress(f64),
    /// Always the last event of a run.
    Finished(Result<ConversionResult, Pdf2PptxError>),
}

/// Why [`ShellState::start`] refused to launch a conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("no PDF selected")]
    NoInput,

    #[error("a conversion is already running")]
    Busy,
}

/// Everything the interactive front end displays.
#[derive(Debug)]
pub struct ShellState {
    input: Option<PathBuf>,
    output_dir: PathBuf,
    processing: bool,
    progress: f64,
    log: Vec<String>,
    last_result: Option<ConversionResult>,
}

impl ShellState {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: None,
            output_dir: output_dir.into(),
            processing: false,
            progress: 0.0,
            log: vec![READY_MESSAGE.to_string()],
            last_result: None,
        }
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// `"Progress: 42%"`.
    pub fn progress_label(&self) -> String {
        format!("Progress: {}%", (self.progress * 100.0).floor() as u32)
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn last_result(&self) -> Option<&ConversionResult> {
        self.last_result.as_ref()
    }

    /// The start action is enabled only with an input and no run in flight.
    pub fn can_start(&self) -> bool {
        self.input.is_some() && !self.processing
    }

    /// The clear action is enabled once something was selected.
    pub fn can_clear(&self) -> bool {
        self.input.is_some() && !self.processing
    }

    /// Record the result of a file picker. `None` means it was cancelled.
    pub fn select_input(&mut self, picked: Option<PathBuf>) {
        match picked {
            Some(path) => {
                self.push_log(format!("PDF selected: {}", path.display()));
                self.input = Some(path);
            }
            None => self.push_log("PDF selection cancelled"),
        }
    }

    /// Record the result of a folder picker. `None` leaves the current one.
    pub fn select_output_dir(&mut self, picked: Option<PathBuf>) {
        if let Some(dir) = picked {
            self.push_log(format!("Output directory: {}", dir.display()));
            self.output_dir = dir;
        }
    }

    /// Forget the selected input, the log and the progress. Ignored while a
    /// conversion is running; returns whether anything was cleared.
    pub fn clear(&mut self) -> bool {
        if self.processing {
            return false;
        }
        self.input = None;
        self.progress = 0.0;
        self.last_result = None;
        self.log.clear();
        self.push_log("State cleared");
        true
    }

    /// Launch a conversion of the selected input into the selected output
    /// directory. `config` supplies everything else (dpi, backend, …).
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, mut config: ConversionConfig) -> Result<Worker, StartError> {
        if self.processing {
            return Err(StartError::Busy);
        }
        let input = self.input.clone().ok_or(StartError::NoInput)?;

        config.output_root = self.output_dir.clone();
        self.processing = true;
        self.progress = 0.0;
        self.last_result = None;
        self.push_log("Starting conversion...");

        Ok(Worker::spawn(ConversionRequest::new(input, config)))
    }

    /// Fold one worker event into the displayed state.
    pub fn apply(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Log(line) => self.push_log(line),
            ShellEvent::Progress(value) => {
                self.progress = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
            }
            ShellEvent::Finished(Ok(result)) => {
                self.push_log("Conversion finished.");
                self.last_result = Some(result);
                self.processing = false;
            }
            ShellEvent::Finished(Err(e)) => {
                self.push_log(format!("ERROR: {e}"));
                self.processing = false;
            }
        }
    }

    /// The worker's channel closed without a `Finished` event.
    pub fn worker_lost(&mut self) {
        if self.processing {
            self.push_log("ERROR: conversion worker stopped unexpectedly");
            self.processing = false;
        }
    }

    /// Drain `worker` into this state until the run ends, calling
    /// `on_event` after each event has been applied.
    pub async fn follow(
        &mut self,
        mut worker: Worker,
        mut on_event: impl FnMut(&ShellState),
    ) -> Option<&ConversionResult> {
        while let Some(event) = worker.next_event().await {
            let finished = matches!(event, ShellEvent::Finished(_));
            self.apply(event);
            on_event(self);
            if finished {
                break;
            }
        }
        if let Err(e) = worker.join().await {
            error!("Conversion worker failed: {}", e);
        }
        self.worker_lost();
        self.last_result.as_ref()
    }

    fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }
}

/// Handle to one running conversion.
pub struct Worker {
    events: mpsc::UnboundedReceiver<ShellEvent>,
    handle: JoinHandle<()>,
}

impl Worker {
    /// Run `request` on the blocking pool, replacing its sinks with the
    /// channel.
    pub fn spawn(request: ConversionRequest) -> Self {
        let (tx, events) = mpsc::unbounded_channel();

        let log_tx = tx.clone();
        let log: Arc<dyn LogSink> = Arc::new(move |line: &str| {
            let _ = log_tx.send(ShellEvent::Log(line.to_string()));
        });
        let progress_tx = tx.clone();
        let progress: Arc<dyn ProgressSink> = Arc::new(move |value: f64| {
            let _ = progress_tx.send(ShellEvent::Progress(value));
        });
        let request = request.with_log(log).with_progress(progress);

        let handle = tokio::task::spawn_blocking(move || {
            debug!("Worker started for {}", request.input.display());
            let result = convert_sync(&request);
            // The receiver may be gone if the front end quit early.
            let _ = tx.send(ShellEvent::Finished(result));
        });

        Self { events, handle }
    }

    /// Next event, or `None` once the worker is done and the channel drained.
    pub async fn next_event(&mut self) -> Option<ShellEvent> {
        self.events.recv().await
    }

    /// Non-blocking poll for a front end with its own event loop.
    pub fn try_next_event(&mut self) -> Option<ShellEvent> {
        self.events.try_recv().ok()
    }

    /// Wait for the worker thread itself to exit.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.handle.await
    }
}

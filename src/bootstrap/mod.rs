//! Bootstrap system for voicerag
//!
//! Builds the configured encoder, loads the knowledge base and installs the
//! retrieval engine into an `EngineHandle`.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::cli::Verbosity;
use crate::config::{Config, EncoderBackend};
use crate::embedding::{HashingEncoder, SentenceEncoder, TextEncoder};
use crate::errors::Result;
use crate::knowledge::KnowledgeBase;
use crate::rag::{EngineBuilder, EngineHandle};
use crate::telemetry::TelemetryCollector;

/// Startup driver that turns a `Config` into a ready engine
pub struct Bootstrap {
    config: Config,
    verbosity: Verbosity,
    telemetry: Option<TelemetryCollector>,
}

/// What a successful bootstrap produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub knowledge_path: PathBuf,
    pub documents: usize,
    pub dimension: usize,
    pub encoder: String,
    pub duration: Duration,
}

impl Bootstrap {
    pub fn new(config: Config, verbosity: Verbosity) -> Self {
        Self {
            config,
            verbosity,
            telemetry: None,
        }
    }

    /// Record the index build on this collector
    pub fn with_telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Construct the encoder selected by `encoder.backend`
    pub fn build_encoder(&self) -> Result<Arc<dyn TextEncoder>> {
        let encoder_config = &self.config.encoder;
        match encoder_config.backend {
            EncoderBackend::Sentence => {
                let encoder = SentenceEncoder::from_options(encoder_config.sentence_options())?;
                Ok(Arc::new(encoder))
            }
            EncoderBackend::Hashing => {
                let encoder = HashingEncoder::new(encoder_config.hashing_dimension)?;
                Ok(Arc::new(encoder))
            }
        }
    }

    /// Read the knowledge base named in `knowledge.path`
    pub fn load_knowledge(&self) -> Result<KnowledgeBase> {
        let path = self.config.knowledge_path();
        debug!("Loading knowledge base from {}", path.display());
        KnowledgeBase::load(&path)
    }

    /// Build the engine and install it into `handle`
    pub fn initialize(&self, handle: &EngineHandle) -> Result<BootstrapReport> {
        let start = Instant::now();
        let spinner = self.spinner();

        spinner.set_message("Loading knowledge base...");
        let knowledge = match self.load_knowledge() {
            Ok(knowledge) => knowledge,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e);
            }
        };

        spinner.set_message(match self.config.encoder.backend {
            EncoderBackend::Sentence => {
                format!("Loading embedding model {}...", self.config.encoder.model_id)
            }
            EncoderBackend::Hashing => "Preparing hashing encoder...".to_string(),
        });
        let encoder = match self.build_encoder() {
            Ok(encoder) => encoder,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e);
            }
        };

        spinner.set_message(format!("Indexing {} documents...", knowledge.len()));
        let mut builder = EngineBuilder::new(encoder);
        if let Some(telemetry) = &self.telemetry {
            builder = builder.telemetry(telemetry.clone());
        }
        let built = builder
            .build(knowledge.into_documents())
            .and_then(|engine| handle.install(engine));
        spinner.finish_and_clear();
        let engine = built?;

        let report = BootstrapReport {
            knowledge_path: self.config.knowledge_path(),
            documents: engine.len(),
            dimension: engine.dimension(),
            encoder: engine.encoder_name().to_string(),
            duration: start.elapsed(),
        };
        info!(
            "Engine ready: {} documents, {} dimensions, encoder {}",
            report.documents, report.dimension, report.encoder
        );
        Ok(report)
    }

    fn spinner(&self) -> ProgressBar {
        if !self.verbosity.show_progress() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

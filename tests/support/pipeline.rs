use std::sync::Arc;

use arbscout::application::fetch::fetcher::DetailFetcher;
use arbscout::application::pipeline::config::PipelineConfig;
use arbscout::application::pipeline::coordinator::{Coordinator, PipelineParts};
use arbscout::application::policy::breaker::CircuitBreaker;
use arbscout::domain::evaluation::Evaluator;
use arbscout::port::outbound::store::RecordStore;
use arbscout::testkit::config;
use arbscout::testkit::source::ScriptedSource;
use arbscout::testkit::store::{RecordingDiscards, RecordingStore};

/// A coordinator over scripted collaborators, with handles to inspect them.
pub struct Harness {
    pub source: Arc<ScriptedSource>,
    pub store: Arc<RecordingStore>,
    pub discards: Arc<RecordingDiscards>,
    pub breaker: Arc<CircuitBreaker>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_parts(ScriptedSource::new(), RecordingStore::new())
    }

    pub fn with_parts(source: ScriptedSource, store: RecordingStore) -> Self {
        Self {
            source: Arc::new(source),
            store: Arc::new(store),
            discards: Arc::new(RecordingDiscards::new()),
            breaker: Arc::new(CircuitBreaker::new(config::breaker())),
        }
    }

    pub fn coordinator(&self, pipeline: PipelineConfig) -> Coordinator {
        self.coordinator_with_store(pipeline, self.store.clone())
    }

    /// Same wiring, persisting into `store` instead of the recording store.
    pub fn coordinator_with_store(
        &self,
        pipeline: PipelineConfig,
        store: Arc<dyn RecordStore>,
    ) -> Coordinator {
        Coordinator::new(
            pipeline,
            PipelineParts {
                fetcher: Arc::new(DetailFetcher::new(
                    self.source.clone(),
                    Arc::clone(&self.breaker),
                    config::fetch_settings(),
                )),
                evaluator: Arc::new(Evaluator::new(config::rules())),
                store,
                discards: self.discards.clone(),
            },
        )
        .with_run_id("test-run")
    }
}

use std::sync::Arc;

use pairsniper::adapter::outbound::memory::MemoryPositionStore;
use pairsniper::infrastructure::bootstrap::{build_engine, Collaborators, Engine};
use pairsniper::infrastructure::config::Config;
use pairsniper::port::outbound::notifier::ClosedEvent;
use pairsniper::port::{Event, NotifierRegistry, PositionStore};
use pairsniper::testkit::clock::ManualClock;
use pairsniper::testkit::domain::QUOTE;
use pairsniper::testkit::exchange::{ScriptedPriceSource, ScriptedSubmitter, StaticScreener};
use pairsniper::testkit::notifier::RecordingNotifier;

/// Defaults with the testkit quote token.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.execution.quote_token = QUOTE.to_string();
    config
}

/// Engine wired to scripted collaborators.
pub struct TestEngine {
    pub engine: Engine,
    pub prices: Arc<ScriptedPriceSource>,
    pub submitter: Arc<ScriptedSubmitter>,
    pub clock: Arc<ManualClock>,
    pub recorder: RecordingNotifier,
}

impl TestEngine {
    pub fn new(config: &Config) -> Self {
        Self::build(
            config,
            Arc::new(MemoryPositionStore::new()),
            ScriptedSubmitter::succeeding(),
            StaticScreener::passing(),
        )
    }

    pub fn build(
        config: &Config,
        store: Arc<dyn PositionStore>,
        submitter: ScriptedSubmitter,
        screener: StaticScreener,
    ) -> Self {
        let prices = Arc::new(ScriptedPriceSource::new());
        let submitter = Arc::new(submitter);
        let clock = Arc::new(ManualClock::default());
        let recorder = RecordingNotifier::new();

        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(recorder.clone()));

        let engine = build_engine(
            config,
            Collaborators {
                prices: prices.clone(),
                screener: Arc::new(screener),
                submitter: submitter.clone(),
                store,
                clock: clock.clone(),
            },
            notifiers,
        )
        .expect("build engine");

        Self {
            engine,
            prices,
            submitter,
            clock,
            recorder,
        }
    }

    pub fn closed_events(&self) -> Vec<ClosedEvent> {
        self.recorder
            .events()
            .into_iter()
            .filter_map(|event| match event {
                Event::PositionClosed(closed) => Some(closed),
                _ => None,
            })
            .collect()
    }

    pub fn blocked_reasons(&self) -> Vec<&'static str> {
        self.recorder
            .events()
            .into_iter()
            .filter_map(|event| match event {
                Event::TradeBlocked(blocked) => Some(blocked.reason),
                _ => None,
            })
            .collect()
    }
}

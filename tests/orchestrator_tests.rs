use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parla::config::{MemoryConfigStore, ProviderKind, VoiceConfig, VoiceConfigPatch};
use parla::error::{ParlaError, Result};
use parla::orchestrator::{SpeakHooks, SpeechOrchestrator};
use parla::playback::AudioSink;
use parla::provider::{AudioClip, SpeechProvider};
use pretty_assertions::assert_eq;

/// What a scripted provider does on each call.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    /// Return audio bytes for the sink.
    Bytes,
    /// Play the audio itself (the local-engine path).
    Played,
    /// Fail, triggering fallback.
    Fail,
}

/// Scripted provider that logs its invocations to a shared event trace.
struct ScriptedProvider {
    name: &'static str,
    kind: ProviderKind,
    outcome: Outcome,
    trace: Arc<Mutex<Vec<String>>>,
    stopped: Arc<AtomicBool>,
}

impl ScriptedProvider {
    fn new(
        name: &'static str,
        kind: ProviderKind,
        outcome: Outcome,
        trace: &Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            name,
            kind,
            outcome,
            trace: Arc::clone(trace),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl SpeechProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn synthesize(&self, _text: &str, _config: &VoiceConfig) -> Result<Option<AudioClip>> {
        self.trace.lock().unwrap().push(self.name.to_string());
        match self.outcome {
            Outcome::Bytes => Ok(Some(AudioClip::mp3(vec![1, 2, 3]))),
            Outcome::Played => Ok(None),
            Outcome::Fail => Err(ParlaError::api(500, "scripted failure")),
        }
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Sink that records plays into the trace; optionally fails every play.
struct TraceSink {
    trace: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

#[async_trait]
impl AudioSink for TraceSink {
    async fn play(&self, _clip: &AudioClip) -> Result<()> {
        self.trace.lock().unwrap().push("play".to_string());
        if self.fail {
            Err(ParlaError::Playback("scripted playback failure".to_string()))
        } else {
            Ok(())
        }
    }
}

fn trace() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn hooks(trace: &Arc<Mutex<Vec<String>>>, end_count: &Arc<AtomicUsize>) -> SpeakHooks {
    let start_trace = Arc::clone(trace);
    let end_trace = Arc::clone(trace);
    let end_count = Arc::clone(end_count);
    SpeakHooks::new()
        .on_start(move || start_trace.lock().unwrap().push("start".to_string()))
        .on_end(move || {
            end_count.fetch_add(1, Ordering::SeqCst);
            end_trace.lock().unwrap().push("end".to_string());
        })
}

#[tokio::test]
async fn cloud_failures_fall_back_to_terminal_before_on_end() {
    let trace = trace();
    let end_count = Arc::new(AtomicUsize::new(0));

    let orchestrator = SpeechOrchestrator::builder()
        .provider(ScriptedProvider::new("google", ProviderKind::Google, Outcome::Fail, &trace))
        .provider(ScriptedProvider::new(
            "elevenlabs",
            ProviderKind::ElevenLabs,
            Outcome::Fail,
            &trace,
        ))
        .provider(ScriptedProvider::new("local", ProviderKind::Local, Outcome::Played, &trace))
        .sink(TraceSink { trace: Arc::clone(&trace), fail: false })
        .store(MemoryConfigStore::new())
        .build()
        .unwrap();

    orchestrator.speak_with_hooks("hello", hooks(&trace, &end_count)).await;

    assert_eq!(
        *trace.lock().unwrap(),
        vec!["start", "google", "elevenlabs", "local", "end"]
    );
    assert_eq!(end_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn on_end_fires_exactly_once_on_total_failure() {
    let trace = trace();
    let end_count = Arc::new(AtomicUsize::new(0));

    let orchestrator = SpeechOrchestrator::builder()
        .provider(ScriptedProvider::new("google", ProviderKind::Google, Outcome::Fail, &trace))
        .provider(ScriptedProvider::new("local", ProviderKind::Local, Outcome::Fail, &trace))
        .sink(TraceSink { trace: Arc::clone(&trace), fail: false })
        .store(MemoryConfigStore::new())
        .build()
        .unwrap();

    orchestrator.speak_with_hooks("hello", hooks(&trace, &end_count)).await;

    assert_eq!(end_count.load(Ordering::SeqCst), 1);
    assert_eq!(trace.lock().unwrap().last().map(String::as_str), Some("end"));
}

#[tokio::test]
async fn first_success_short_circuits_the_chain() {
    let trace = trace();
    let end_count = Arc::new(AtomicUsize::new(0));

    let orchestrator = SpeechOrchestrator::builder()
        .provider(ScriptedProvider::new("google", ProviderKind::Google, Outcome::Bytes, &trace))
        .provider(ScriptedProvider::new(
            "elevenlabs",
            ProviderKind::ElevenLabs,
            Outcome::Bytes,
            &trace,
        ))
        .provider(ScriptedProvider::new("local", ProviderKind::Local, Outcome::Played, &trace))
        .sink(TraceSink { trace: Arc::clone(&trace), fail: false })
        .store(MemoryConfigStore::new())
        .build()
        .unwrap();

    orchestrator.speak_with_hooks("hello", hooks(&trace, &end_count)).await;

    assert_eq!(*trace.lock().unwrap(), vec!["start", "google", "play", "end"]);
}

#[tokio::test]
async fn playback_failure_falls_through_to_the_next_provider() {
    let trace = trace();
    let end_count = Arc::new(AtomicUsize::new(0));

    let orchestrator = SpeechOrchestrator::builder()
        .provider(ScriptedProvider::new("google", ProviderKind::Google, Outcome::Bytes, &trace))
        .provider(ScriptedProvider::new("local", ProviderKind::Local, Outcome::Played, &trace))
        .sink(TraceSink { trace: Arc::clone(&trace), fail: true })
        .store(MemoryConfigStore::new())
        .build()
        .unwrap();

    orchestrator.speak_with_hooks("hello", hooks(&trace, &end_count)).await;

    assert_eq!(
        *trace.lock().unwrap(),
        vec!["start", "google", "play", "local", "end"]
    );
    assert_eq!(end_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn configured_provider_is_tried_first() {
    let trace = trace();
    let end_count = Arc::new(AtomicUsize::new(0));

    let store = MemoryConfigStore::with_config(VoiceConfig {
        provider: ProviderKind::ElevenLabs,
        ..VoiceConfig::default()
    });

    let orchestrator = SpeechOrchestrator::builder()
        .provider(ScriptedProvider::new("google", ProviderKind::Google, Outcome::Fail, &trace))
        .provider(ScriptedProvider::new(
            "elevenlabs",
            ProviderKind::ElevenLabs,
            Outcome::Fail,
            &trace,
        ))
        .provider(ScriptedProvider::new("local", ProviderKind::Local, Outcome::Played, &trace))
        .sink(TraceSink { trace: Arc::clone(&trace), fail: false })
        .store(store)
        .build()
        .unwrap();

    orchestrator.speak_with_hooks("hello", hooks(&trace, &end_count)).await;

    assert_eq!(
        *trace.lock().unwrap(),
        vec!["start", "elevenlabs", "google", "local", "end"]
    );
}

#[tokio::test]
async fn save_config_merge_preserves_unset_fields() {
    let store = MemoryConfigStore::with_config(VoiceConfig {
        provider: ProviderKind::Google,
        pitch: 0.9,
        ..VoiceConfig::default()
    });

    let orchestrator = SpeechOrchestrator::builder()
        .store(store)
        .sink(parla::playback::NullSink)
        .build()
        .unwrap();

    orchestrator.save_config(VoiceConfigPatch::default().rate(1.2)).unwrap();

    let config = orchestrator.config();
    assert_eq!(config.provider, ProviderKind::Google);
    assert_eq!(config.pitch, 0.9);
    assert_eq!(config.rate, 1.2);
}

#[tokio::test]
async fn stop_reaches_provider_hooks_and_never_panics() {
    let trace = trace();
    let provider = ScriptedProvider::new("local", ProviderKind::Local, Outcome::Played, &trace);
    let stopped = Arc::clone(&provider.stopped);

    let orchestrator = SpeechOrchestrator::builder()
        .provider(provider)
        .sink(TraceSink { trace: Arc::clone(&trace), fail: false })
        .store(MemoryConfigStore::new())
        .build()
        .unwrap();

    orchestrator.stop();
    assert!(stopped.load(Ordering::SeqCst));

    // Calling stop with nothing in flight is a no-op.
    orchestrator.stop();
}

#[tokio::test]
async fn voice_catalog_filters_by_provider() {
    let orchestrator = SpeechOrchestrator::builder()
        .sink(parla::playback::NullSink)
        .store(MemoryConfigStore::new())
        .build()
        .unwrap();

    assert!(!orchestrator.voices().is_empty());
    for voice in orchestrator.voices_for(ProviderKind::Google) {
        assert_eq!(voice.provider, ProviderKind::Google);
    }
}

#[tokio::test]
async fn store_failure_degrades_to_defaults() {
    struct BrokenStore;
    impl parla::config::ConfigStore for BrokenStore {
        fn load(&self) -> Result<Option<VoiceConfig>> {
            Err(ParlaError::InvalidArgument("scripted store failure".to_string()))
        }
        fn save(&self, _config: &VoiceConfig) -> Result<()> {
            Ok(())
        }
    }

    let trace = trace();
    let end_count = Arc::new(AtomicUsize::new(0));

    let orchestrator = SpeechOrchestrator::builder()
        .provider(ScriptedProvider::new("local", ProviderKind::Local, Outcome::Played, &trace))
        .sink(TraceSink { trace: Arc::clone(&trace), fail: false })
        .store(BrokenStore)
        .build()
        .unwrap();

    assert_eq!(orchestrator.config(), VoiceConfig::default());

    orchestrator.speak_with_hooks("hello", hooks(&trace, &end_count)).await;
    assert_eq!(end_count.load(Ordering::SeqCst), 1);
}

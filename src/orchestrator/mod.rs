//! The speech orchestrator: ranked provider chain, playback, lifecycle.
//!
//! `speak` walks the registered providers — the configured one first, the
//! rest in registration order — until one yields playable audio or plays it
//! itself. Every failure above the last provider is recovered locally and
//! logged; the completion hook fires exactly once no matter what.

use std::sync::Arc;

use crate::config::{ConfigStore, MemoryConfigStore, ProviderKind, VoiceConfig, VoiceConfigPatch};
use crate::error::Result;
use crate::playback::AudioSink;
#[cfg(not(feature = "playback"))]
use crate::playback::NullSink;
use crate::provider::SpeechProvider;
use crate::voices::{self, VoiceOption};

/// Optional lifecycle hooks for one `speak` call.
///
/// `on_start` runs synchronously before any network or engine call;
/// `on_end` runs exactly once, after playback completes or after every
/// fallback step has been exhausted. `FnOnce` makes double-firing
/// unrepresentable.
#[derive(Default)]
pub struct SpeakHooks {
    on_start: Option<Box<dyn FnOnce() + Send>>,
    on_end: Option<Box<dyn FnOnce() + Send>>,
}

impl SpeakHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    pub fn on_end(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_end = Some(Box::new(hook));
        self
    }
}

/// Orchestrates synthesis across a ranked chain of providers.
pub struct SpeechOrchestrator {
    providers: Vec<Arc<dyn SpeechProvider>>,
    sink: Arc<dyn AudioSink>,
    store: Arc<dyn ConfigStore>,
}

/// Builder for [`SpeechOrchestrator`]. Providers are tried in registration
/// order (after the configured one); register the terminal fallback last.
pub struct SpeechOrchestratorBuilder {
    providers: Vec<Arc<dyn SpeechProvider>>,
    sink: Option<Arc<dyn AudioSink>>,
    store: Option<Arc<dyn ConfigStore>>,
}

impl SpeechOrchestratorBuilder {
    /// Register a provider at the end of the fallback chain.
    pub fn provider(mut self, provider: impl SpeechProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Register an already-shared provider.
    pub fn provider_arc(mut self, provider: Arc<dyn SpeechProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn sink(mut self, sink: impl AudioSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn store(mut self, store: impl ConfigStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Finish the orchestrator. Appends the local engine as the terminal
    /// step when the `local-engine` feature is on and the platform has one;
    /// defaults the sink and store when none were supplied.
    pub fn build(mut self) -> Result<SpeechOrchestrator> {
        #[cfg(feature = "local-engine")]
        {
            let has_local = self
                .providers
                .iter()
                .any(|p| p.kind() == ProviderKind::Local);
            if !has_local {
                match crate::provider::LocalEngine::new() {
                    Ok(engine) => self.providers.push(Arc::new(engine)),
                    Err(e) => {
                        tracing::warn!(error = %e, "Local engine unavailable; chain has no terminal fallback")
                    }
                }
            }
        }

        let sink = self.sink.unwrap_or_else(|| default_sink());
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryConfigStore::new()));

        Ok(SpeechOrchestrator {
            providers: self.providers,
            sink,
            store,
        })
    }
}

#[cfg(feature = "playback")]
fn default_sink() -> Arc<dyn AudioSink> {
    Arc::new(crate::playback::RodioSink::new())
}

#[cfg(not(feature = "playback"))]
fn default_sink() -> Arc<dyn AudioSink> {
    Arc::new(NullSink)
}

impl SpeechOrchestrator {
    pub fn builder() -> SpeechOrchestratorBuilder {
        SpeechOrchestratorBuilder {
            providers: Vec::new(),
            sink: None,
            store: None,
        }
    }

    /// Speak `text` with no lifecycle hooks.
    pub async fn speak(&self, text: &str) {
        self.speak_with_hooks(text, SpeakHooks::new()).await;
    }

    /// Speak `text`, firing `on_start` before the first attempt and
    /// `on_end` exactly once when done — even on total failure. Errors
    /// never reach the caller; absence of audio is the only signal.
    ///
    /// Empty or whitespace text is passed through unvalidated; what happens
    /// is provider-dependent. Concurrent calls are not serialized, so
    /// overlapping playback is the caller's to prevent.
    pub async fn speak_with_hooks(&self, text: &str, hooks: SpeakHooks) {
        if let Some(on_start) = hooks.on_start {
            on_start();
        }

        // Snapshot the config once; a concurrent save does not affect an
        // in-flight call.
        let config = self.config();

        let mut spoken = false;
        for provider in self.chain(config.provider) {
            tracing::debug!(provider = provider.name(), "Attempting synthesis");
            match provider.synthesize(text, &config).await {
                Ok(Some(clip)) => match self.sink.play(&clip).await {
                    Ok(()) => {
                        spoken = true;
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(
                            provider = provider.name(),
                            category = ?e.category(),
                            error = %e,
                            "Playback failed, falling through"
                        );
                    }
                },
                Ok(None) => {
                    // Provider handled playback itself.
                    spoken = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        category = ?e.category(),
                        error = %e,
                        "Synthesis failed, falling through"
                    );
                }
            }
        }

        if !spoken {
            tracing::error!("All providers exhausted; nothing was spoken");
        }

        if let Some(on_end) = hooks.on_end {
            on_end();
        }
    }

    /// Cancel any in-flight local-engine utterance. Has no effect on
    /// in-flight network requests or cloud audio already playing.
    pub fn stop(&self) {
        for provider in &self.providers {
            provider.stop();
        }
    }

    /// Current config: the stored record merged over defaults. A store
    /// failure degrades to defaults.
    pub fn config(&self) -> VoiceConfig {
        match self.store.load() {
            Ok(Some(config)) => config,
            Ok(None) => VoiceConfig::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load voice config, using defaults");
                VoiceConfig::default()
            }
        }
    }

    /// Merge-write a partial update: set fields override, the rest of the
    /// stored record is retained.
    pub fn save_config(&self, patch: VoiceConfigPatch) -> Result<()> {
        let mut config = self.config();
        config.apply(patch);
        self.store.save(&config)
    }

    /// The full static voice catalog.
    pub fn voices(&self) -> &'static [VoiceOption] {
        voices::all()
    }

    /// Catalog entries for one provider.
    pub fn voices_for(&self, kind: ProviderKind) -> Vec<&'static VoiceOption> {
        voices::by_provider(kind)
    }

    /// Attempt order: providers of the configured kind first, then the
    /// remaining registered providers in registration order. Each provider
    /// is tried at most once per call; there is no retry.
    fn chain(&self, selected: ProviderKind) -> impl Iterator<Item = &Arc<dyn SpeechProvider>> + '_ {
        let preferred = self.providers.iter().filter(move |p| p.kind() == selected);
        let rest = self.providers.iter().filter(move |p| p.kind() != selected);
        preferred.chain(rest)
    }
}

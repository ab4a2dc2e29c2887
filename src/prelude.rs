//! Convenience re-exports for the common surface.

pub use crate::config::{
    ConfigStore, FileConfigStore, MemoryConfigStore, ProviderKind, VoiceConfig, VoiceConfigPatch,
};
pub use crate::error::{ParlaError, Result};
pub use crate::orchestrator::{SpeakHooks, SpeechOrchestrator};
pub use crate::playback::{AudioSink, NullSink};
pub use crate::provider::{AudioClip, AudioFormat, ElevenLabsProvider, GoogleTtsProvider, SpeechProvider};
pub use crate::sentiment::{analyze, Sentiment};
pub use crate::voices::{Gender, VoiceOption};

#[cfg(feature = "local-engine")]
pub use crate::provider::LocalEngine;

#[cfg(feature = "playback")]
pub use crate::playback::RodioSink;

//! Speech providers: the polymorphic synthesis capability.
//!
//! Each provider turns text into audio bytes (the cloud services) or plays
//! it directly through the platform engine (the local terminal step). The
//! orchestrator walks an ordered list of these until one succeeds.

pub mod elevenlabs;
pub mod google;
pub mod http;

#[cfg(feature = "local-engine")]
pub mod local;

use async_trait::async_trait;

use crate::config::{ProviderKind, VoiceConfig};
use crate::error::Result;

pub use elevenlabs::ElevenLabsProvider;
pub use google::GoogleTtsProvider;
#[cfg(feature = "local-engine")]
pub use local::LocalEngine;

/// Container format of a synthesized clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }

    /// Recognize a response content-type, ignoring any parameters.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .map(str::trim)
            .unwrap_or_default();
        match mime {
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            _ => None,
        }
    }
}

/// A synthesized audio payload ready for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioClip {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            format: AudioFormat::Mp3,
        }
    }
}

/// Trait for speech synthesis providers.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Human-readable provider name, used in logs.
    fn name(&self) -> &'static str;

    /// Which [`ProviderKind`] this provider serves.
    fn kind(&self) -> ProviderKind;

    /// Synthesize speech for `text` under `config`.
    ///
    /// `Ok(Some(clip))` hands audio bytes back for playback through the
    /// sink; `Ok(None)` means the provider played the audio itself (the
    /// local engine path). Any `Err` makes the orchestrator fall through to
    /// the next provider in the chain.
    async fn synthesize(&self, text: &str, config: &VoiceConfig) -> Result<Option<AudioClip>>;

    /// Cancel any in-flight utterance this provider is producing.
    ///
    /// Only meaningful for engines that own playback; the default is a
    /// no-op, and in-flight network requests are not aborted.
    fn stop(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_mimes_map_to_formats() {
        assert_eq!(AudioFormat::from_mime("audio/mpeg"), Some(AudioFormat::Mp3));
        assert_eq!(
            AudioFormat::from_mime("audio/wav; charset=binary"),
            Some(AudioFormat::Wav)
        );
        assert_eq!(AudioFormat::from_mime("audio/x-wav"), Some(AudioFormat::Wav));
    }

    #[test]
    fn unknown_mimes_are_rejected() {
        assert_eq!(AudioFormat::from_mime("text/plain"), None);
        assert_eq!(AudioFormat::from_mime(""), None);
    }
}

//! Audio playback: the sink the orchestrator pushes cloud audio through.
//!
//! There is deliberately no `stop` on the sink — cancellation only applies
//! to the local engine's own utterances, not to cloud audio that has
//! already started playing.

#[cfg(feature = "playback")]
pub mod rodio;

use async_trait::async_trait;

use crate::error::Result;
use crate::provider::AudioClip;

#[cfg(feature = "playback")]
pub use self::rodio::RodioSink;

/// Plays a synthesized clip to completion.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Begin playback and resolve when it ends; `Err` on device or decode
    /// failure. Implementations release any playback resources on both
    /// paths.
    async fn play(&self, clip: &AudioClip) -> Result<()>;
}

/// Discards audio. For headless environments and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    async fn play(&self, clip: &AudioClip) -> Result<()> {
        tracing::debug!(bytes = clip.bytes.len(), mime = clip.format.mime(), "Discarding audio");
        Ok(())
    }
}

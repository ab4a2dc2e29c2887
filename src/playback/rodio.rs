//! Default-device playback via rodio.

use std::io::Cursor;

use async_trait::async_trait;

use super::AudioSink;
use crate::error::{ParlaError, Result};
use crate::provider::AudioClip;

/// Decodes a clip and plays it on the default output device.
///
/// Decoding and playback block, so both run on the blocking pool. The
/// output stream and sink are scoped to one `play` call and dropped on both
/// the success and error paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct RodioSink;

impl RodioSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioSink for RodioSink {
    async fn play(&self, clip: &AudioClip) -> Result<()> {
        let bytes = clip.bytes.clone();
        tokio::task::spawn_blocking(move || play_blocking(bytes))
            .await
            .map_err(|e| ParlaError::Playback(format!("Playback task failed: {e}")))?
    }
}

fn play_blocking(bytes: Vec<u8>) -> Result<()> {
    let (_stream, handle) = rodio::OutputStream::try_default()
        .map_err(|e| ParlaError::Playback(format!("No output device: {e}")))?;
    let sink = rodio::Sink::try_new(&handle)
        .map_err(|e| ParlaError::Playback(format!("Failed to open sink: {e}")))?;
    let source = rodio::Decoder::new(Cursor::new(bytes))
        .map_err(|e| ParlaError::Playback(format!("Undecodable audio: {e}")))?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

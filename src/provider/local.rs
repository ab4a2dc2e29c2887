//! Local engine: the platform's built-in speech synthesis, used as the
//! terminal fallback step.
//!
//! The `tts` handle is owned by a dedicated worker thread and driven over a
//! command channel, so the provider itself stays `Send + Sync` regardless of
//! the platform backend. Cancellation is a flag the worker polls between
//! progress checks, which keeps `stop` responsive mid-utterance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{AudioClip, SpeechProvider};
use crate::config::{ProviderKind, VoiceConfig};
use crate::error::{ParlaError, Result};

/// The local engine speaks flatter than the cloud voices; compensate with
/// higher defaults when the config still carries the stock 1.0 values.
const LOCAL_DEFAULT_PITCH: f32 = 1.35;
const LOCAL_DEFAULT_RATE: f32 = 1.15;

/// Substrings matched (case-insensitively) against voice names when picking
/// a default voice; first hit wins, else the first available voice.
const PREFERRED_VOICES: &[&str] = &[
    "samantha", "victoria", "karen", "moira", "tessa", "zira", "susan", "fiona", "female",
];

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Grace period for the engine to actually start before progress polling.
const SPIN_UP: Duration = Duration::from_millis(100);

struct SpeakCommand {
    text: String,
    pitch: f32,
    rate: f32,
    done: oneshot::Sender<Result<()>>,
}

/// Speech through the operating system's synthesis capability.
pub struct LocalEngine {
    commands: mpsc::Sender<SpeakCommand>,
    cancel: Arc<AtomicBool>,
}

impl LocalEngine {
    /// Spawn the engine worker. Fails with [`ParlaError::UnsupportedEngine`]
    /// when the platform has no usable synthesis backend.
    pub fn new() -> Result<Self> {
        let (commands, command_rx) = mpsc::channel::<SpeakCommand>();
        let (init_tx, init_rx) = mpsc::channel::<std::result::Result<(), String>>();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        thread::Builder::new()
            .name("parla-local-engine".to_string())
            .spawn(move || worker(command_rx, init_tx, worker_cancel))
            .map_err(|e| ParlaError::Engine(format!("Failed to spawn engine thread: {e}")))?;

        match init_rx.recv() {
            Ok(Ok(())) => Ok(Self { commands, cancel }),
            Ok(Err(message)) => Err(ParlaError::UnsupportedEngine(message)),
            Err(_) => Err(ParlaError::Engine(
                "Engine thread exited during startup".to_string(),
            )),
        }
    }
}

#[async_trait]
impl SpeechProvider for LocalEngine {
    fn name(&self) -> &'static str {
        "local"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    async fn synthesize(&self, text: &str, config: &VoiceConfig) -> Result<Option<AudioClip>> {
        let (done, done_rx) = oneshot::channel();
        self.commands
            .send(SpeakCommand {
                text: text.to_string(),
                pitch: effective(config.pitch, LOCAL_DEFAULT_PITCH),
                rate: effective(config.rate, LOCAL_DEFAULT_RATE),
                done,
            })
            .map_err(|_| ParlaError::Engine("Engine worker is gone".to_string()))?;

        done_rx
            .await
            .map_err(|_| ParlaError::Engine("Engine worker dropped the utterance".to_string()))??;

        // The engine played the audio itself; nothing for the sink.
        Ok(None)
    }

    fn stop(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

/// Stock config values (1.0) count as "unset" for the local engine and are
/// replaced by its own defaults; explicit overrides pass through.
fn effective(configured: f32, local_default: f32) -> f32 {
    if (configured - 1.0).abs() < f32::EPSILON {
        local_default
    } else {
        configured
    }
}

/// Map a user multiplier (neutral 1.0, roughly 0..2) onto an engine's
/// min/normal/max range.
fn scale_to_range(user: f32, min: f32, normal: f32, max: f32) -> f32 {
    let scaled = if user >= 1.0 {
        normal + (user - 1.0) * (max - normal)
    } else {
        normal - (1.0 - user) * (normal - min)
    };
    scaled.clamp(min, max)
}

/// Index of the first voice whose name matches the preferred heuristics.
fn pick_preferred(names: &[String]) -> Option<usize> {
    names.iter().position(|name| {
        let lowered = name.to_lowercase();
        PREFERRED_VOICES.iter().any(|p| lowered.contains(p))
    })
}

fn worker(
    commands: mpsc::Receiver<SpeakCommand>,
    init: mpsc::Sender<std::result::Result<(), String>>,
    cancel: Arc<AtomicBool>,
) {
    let mut engine = match tts::Tts::default() {
        Ok(engine) => engine,
        Err(e) => {
            let _ = init.send(Err(format!("No speech engine available: {e}")));
            return;
        }
    };

    let features = engine.supported_features();
    if features.voice {
        if let Ok(voices) = engine.voices() {
            let names: Vec<String> = voices.iter().map(|v| v.name()).collect();
            let index = pick_preferred(&names).unwrap_or(0);
            if let Some(voice) = voices.get(index) {
                if let Err(e) = engine.set_voice(voice) {
                    tracing::warn!(voice = %voice.name(), error = %e, "Failed to select voice");
                }
            }
        }
    }
    let _ = init.send(Ok(()));

    while let Ok(command) = commands.recv() {
        cancel.store(false, Ordering::SeqCst);
        let result = speak_one(&mut engine, &command, &cancel);
        let _ = command.done.send(result);
    }
}

fn speak_one(engine: &mut tts::Tts, command: &SpeakCommand, cancel: &AtomicBool) -> Result<()> {
    let features = engine.supported_features();

    if features.pitch {
        let pitch = scale_to_range(
            command.pitch,
            engine.min_pitch(),
            engine.normal_pitch(),
            engine.max_pitch(),
        );
        if let Err(e) = engine.set_pitch(pitch) {
            tracing::warn!(error = %e, "Failed to set pitch");
        }
    }
    if features.rate {
        let rate = scale_to_range(
            command.rate,
            engine.min_rate(),
            engine.normal_rate(),
            engine.max_rate(),
        );
        if let Err(e) = engine.set_rate(rate) {
            tracing::warn!(error = %e, "Failed to set rate");
        }
    }

    engine
        .speak(&command.text, true)
        .map_err(|e| ParlaError::Engine(format!("Utterance failed: {e}")))?;

    thread::sleep(SPIN_UP);

    if features.is_speaking {
        loop {
            if cancel.swap(false, Ordering::SeqCst) {
                let _ = engine.stop();
                break;
            }
            match engine.is_speaking() {
                Ok(true) => thread::sleep(POLL_INTERVAL),
                Ok(false) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Lost track of utterance progress");
                    break;
                }
            }
        }
    } else {
        // No progress reporting: wait out a duration estimated from length.
        let estimate = Duration::from_millis((command.text.len() as u64 * 60).clamp(500, 30_000));
        let mut waited = Duration::ZERO;
        while waited < estimate {
            if cancel.swap(false, Ordering::SeqCst) {
                let _ = engine.stop();
                break;
            }
            thread::sleep(POLL_INTERVAL);
            waited += POLL_INTERVAL;
        }
    }

    Ok(())
}

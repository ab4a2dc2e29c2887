//! Google Cloud Text-to-Speech provider (`text:synthesize`).

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::http::{api_key_headers, shared_client, status_to_error, trim_trailing_slash};
use super::{AudioClip, SpeechProvider};
use crate::config::{ProviderKind, VoiceConfig};
use crate::error::{ParlaError, Result};

const DEFAULT_BASE_URL: &str = "https://texttospeech.googleapis.com";
const DEFAULT_VOICE: &str = "en-US-Neural2-F";
const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// Google Cloud TTS. Returns MP3 audio as a base64 payload.
#[derive(Debug, Clone)]
pub struct GoogleTtsProvider {
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisBody<'a> {
    input: TextInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct TextInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisResponse {
    audio_content: String,
}

impl GoogleTtsProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn new_with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: base_url.into(),
        }
    }

    /// Read `GOOGLE_API_KEY` from the environment (after a best-effort
    /// `.env` load). A key stored in [`VoiceConfig`] still works without one.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            api_key: std::env::var("GOOGLE_API_KEY").ok(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    fn resolve_key<'a>(&'a self, config: &'a VoiceConfig) -> Result<&'a str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                config
                    .google_api_key
                    .as_deref()
                    .filter(|key| !key.trim().is_empty())
            })
            .ok_or_else(|| ParlaError::MissingCredential {
                provider: "google".to_string(),
            })
    }
}

/// Map a user pitch multiplier (neutral 1.0) onto Google's −20..20
/// semitone scale: 1.0 → 0, 1.2 → 4.
fn semitone_pitch(pitch: f32) -> f32 {
    ((pitch - 1.0) * 20.0).clamp(-20.0, 20.0)
}

/// `en-US-Neural2-F` → `en-US`; anything unparseable falls back to `en-US`.
fn language_code_of(voice: &str) -> &str {
    let mut dashes = voice.match_indices('-');
    match (dashes.next(), dashes.next()) {
        (Some(_), Some((second, _))) => &voice[..second],
        _ => "en-US",
    }
}

#[async_trait]
impl SpeechProvider for GoogleTtsProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn synthesize(&self, text: &str, config: &VoiceConfig) -> Result<Option<AudioClip>> {
        let api_key = self.resolve_key(config)?;

        let voice = config.voice_id.as_deref().unwrap_or(DEFAULT_VOICE);
        let body = SynthesisBody {
            input: TextInput { text },
            voice: VoiceSelection {
                language_code: language_code_of(voice),
                name: voice,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: config.rate,
                pitch: semitone_pitch(config.pitch),
            },
        };

        let url = format!("{}/v1/text:synthesize", trim_trailing_slash(&self.base_url));
        let response = shared_client()
            .post(url)
            .headers(api_key_headers(API_KEY_HEADER, api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let parsed: SynthesisResponse = serde_json::from_str(&response.text().await?)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(parsed.audio_content.as_bytes())
            .map_err(|e| ParlaError::Decode(format!("Invalid base64 audio payload: {e}")))?;
        if bytes.is_empty() {
            return Err(ParlaError::Decode("Empty audio payload".to_string()));
        }

        Ok(Some(AudioClip::mp3(bytes)))
    }
}

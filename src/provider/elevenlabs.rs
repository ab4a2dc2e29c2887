//! ElevenLabs text-to-speech provider (`text-to-speech/{voice_id}`).

use async_trait::async_trait;
use serde::Serialize;

use super::http::{api_key_headers, shared_client, status_to_error, trim_trailing_slash};
use super::{AudioClip, AudioFormat, SpeechProvider};
use crate::config::{ProviderKind, VoiceConfig};
use crate::error::{ParlaError, Result};

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_VOICE: &str = "21m00Tcm4TlvDq8ikWAM"; // Rachel
const DEFAULT_MODEL: &str = "eleven_multilingual_v2";
const API_KEY_HEADER: &str = "xi-api-key";

/// ElevenLabs TTS. Returns raw binary audio, MP3 unless the response
/// content-type says otherwise.
#[derive(Debug, Clone)]
pub struct ElevenLabsProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

impl ElevenLabsProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn new_with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read `ELEVENLABS_API_KEY` from the environment (after a best-effort
    /// `.env` load). A key stored in [`VoiceConfig`] still works without one.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            api_key: std::env::var("ELEVENLABS_API_KEY").ok(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn resolve_key<'a>(&'a self, config: &'a VoiceConfig) -> Result<&'a str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                config
                    .elevenlabs_api_key
                    .as_deref()
                    .filter(|key| !key.trim().is_empty())
            })
            .ok_or_else(|| ParlaError::MissingCredential {
                provider: "elevenlabs".to_string(),
            })
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::ElevenLabs
    }

    async fn synthesize(&self, text: &str, config: &VoiceConfig) -> Result<Option<AudioClip>> {
        let api_key = self.resolve_key(config)?;

        let voice = config.voice_id.as_deref().unwrap_or(DEFAULT_VOICE);
        let body = SynthesisBody {
            text,
            model_id: &self.model,
            voice_settings: VoiceSettings::default(),
        };

        let url = format!(
            "{}/v1/text-to-speech/{voice}",
            trim_trailing_slash(&self.base_url)
        );
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

        // The container follows the requested output; trust the response
        // content-type when it names one we know.
        let format = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(AudioFormat::from_mime)
            .unwrap_or(AudioFormat::Mp3);

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ParlaError::Decode("Empty audio payload".to_string()));
        }

        Ok(Some(AudioClip {
            bytes: bytes.to_vec(),
            format,
        }))
    }
}

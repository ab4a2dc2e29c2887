//! Voice configuration: the persisted settings record and its store.
//!
//! The config is a single JSON record kept under a fixed storage key and
//! merged with defaults on read. Partial updates are merge-writes: fields
//! present in the patch override, everything else is retained.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{ParlaError, Result};

/// File name of the persisted config record.
const STORAGE_KEY: &str = "voice_config.json";

/// The kind of speech provider a config selects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Google,
    ElevenLabs,
    Local,
}

/// Persisted user-selected synthesis settings.
///
/// `voice_id` should name a catalog entry for the selected provider; that
/// invariant is the caller's to uphold, the orchestrator does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevenlabs_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    #[serde(default = "default_rate")]
    pub rate: f32,
}

fn default_pitch() -> f32 {
    1.0
}

fn default_rate() -> f32 {
    1.0
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            google_api_key: None,
            elevenlabs_api_key: None,
            voice_id: None,
            pitch: default_pitch(),
            rate: default_rate(),
        }
    }
}

impl VoiceConfig {
    /// Load defaults, then API keys from the environment
    /// (`GOOGLE_API_KEY`, `ELEVENLABS_API_KEY`). Reads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            google_api_key: std::env::var("GOOGLE_API_KEY").ok(),
            elevenlabs_api_key: std::env::var("ELEVENLABS_API_KEY").ok(),
            ..Self::default()
        }
    }

    /// Merge a partial update into this config. Fields set in the patch
    /// override; unset fields keep their current value.
    pub fn apply(&mut self, patch: VoiceConfigPatch) {
        if let Some(provider) = patch.provider {
            self.provider = provider;
        }
        if let Some(key) = patch.google_api_key {
            self.google_api_key = Some(key);
        }
        if let Some(key) = patch.elevenlabs_api_key {
            self.elevenlabs_api_key = Some(key);
        }
        if let Some(voice_id) = patch.voice_id {
            self.voice_id = Some(voice_id);
        }
        if let Some(pitch) = patch.pitch {
            self.pitch = pitch;
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
    }
}

/// Partial [`VoiceConfig`] update. Every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevenlabs_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,
}

impl VoiceConfigPatch {
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn rate(mut self, rate: f32) -> Self {
        self.rate = Some(rate);
        self
    }
}

/// Load/save port for the persisted config record.
///
/// An explicit seam instead of an ambient store: the orchestrator reads
/// through this at the start of each `speak` call and merge-writes through
/// it on `save_config`.
pub trait ConfigStore: Send + Sync {
    /// Load the stored record, `Ok(None)` if nothing has been saved yet.
    fn load(&self) -> Result<Option<VoiceConfig>>;

    /// Persist the full record.
    fn save(&self, config: &VoiceConfig) -> Result<()>;
}

/// File-backed store: one JSON record under a fixed key in the platform
/// config directory (or a caller-supplied directory).
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Store under the platform config dir (e.g. `~/.config/parla/`).
    pub fn new_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "parla").ok_or_else(|| {
            ParlaError::InvalidArgument("Could not determine a config directory".to_string())
        })?;
        Ok(Self::new(dirs.config_dir().to_path_buf()))
    }

    /// Store under a specific directory.
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(STORAGE_KEY),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Option<VoiceConfig>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, config: &VoiceConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-process store for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    record: RwLock<Option<VoiceConfig>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VoiceConfig) -> Self {
        Self {
            record: RwLock::new(Some(config)),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Option<VoiceConfig>> {
        Ok(self
            .record
            .read()
            .map_err(|_| ParlaError::InvalidArgument("Config store poisoned".to_string()))?
            .clone())
    }

    fn save(&self, config: &VoiceConfig) -> Result<()> {
        *self
            .record
            .write()
            .map_err(|_| ParlaError::InvalidArgument("Config store poisoned".to_string()))? =
            Some(config.clone());
        Ok(())
    }
}

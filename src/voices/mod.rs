//! Static voice catalog: immutable reference data, not persisted.

use serde::Serialize;

use crate::config::ProviderKind;

/// Gender tag on a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Neutral,
}

/// A selectable voice, keyed by the id the owning provider understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub id: &'static str,
    pub display_name: &'static str,
    pub provider: ProviderKind,
    pub language_code: &'static str,
    pub gender: Gender,
}

const CATALOG: &[VoiceOption] = &[
    VoiceOption {
        id: "en-US-Neural2-F",
        display_name: "Aria (US)",
        provider: ProviderKind::Google,
        language_code: "en-US",
        gender: Gender::Female,
    },
    VoiceOption {
        id: "en-US-Neural2-D",
        display_name: "Miles (US)",
        provider: ProviderKind::Google,
        language_code: "en-US",
        gender: Gender::Male,
    },
    VoiceOption {
        id: "en-GB-Neural2-A",
        display_name: "Imogen (UK)",
        provider: ProviderKind::Google,
        language_code: "en-GB",
        gender: Gender::Female,
    },
    VoiceOption {
        id: "21m00Tcm4TlvDq8ikWAM",
        display_name: "Rachel",
        provider: ProviderKind::ElevenLabs,
        language_code: "en-US",
        gender: Gender::Female,
    },
    VoiceOption {
        id: "EXAVITQu4vr4xnSDxMaL",
        display_name: "Bella",
        provider: ProviderKind::ElevenLabs,
        language_code: "en-US",
        gender: Gender::Female,
    },
    VoiceOption {
        id: "ErXwobaYiN019PkySvjV",
        display_name: "Antoni",
        provider: ProviderKind::ElevenLabs,
        language_code: "en-US",
        gender: Gender::Male,
    },
    VoiceOption {
        id: "system-default",
        display_name: "System voice",
        provider: ProviderKind::Local,
        language_code: "en-US",
        gender: Gender::Neutral,
    },
];

/// Every catalog entry.
pub fn all() -> &'static [VoiceOption] {
    CATALOG
}

/// Catalog entries for one provider.
pub fn by_provider(kind: ProviderKind) -> Vec<&'static VoiceOption> {
    CATALOG.iter().filter(|v| v.provider == kind).collect()
}

/// Look up an entry by id.
pub fn find(id: &str) -> Option<&'static VoiceOption> {
    CATALOG.iter().find(|v| v.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_provider() {
        for kind in [ProviderKind::Google, ProviderKind::ElevenLabs, ProviderKind::Local] {
            assert!(!by_provider(kind).is_empty(), "no voices for {kind}");
        }
    }

    #[test]
    fn find_resolves_known_ids() {
        let voice = find("en-US-Neural2-F").expect("known voice");
        assert_eq!(voice.provider, ProviderKind::Google);
        assert_eq!(voice.gender, Gender::Female);

        assert!(find("no-such-voice").is_none());
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = all().iter().map(|v| v.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all().len());
    }
}

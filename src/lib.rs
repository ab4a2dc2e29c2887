//! Parla — multi-provider text-to-speech with graceful fallback.
//!
//! Given a text string, the orchestrator walks a ranked chain of speech
//! providers (cloud HTTP services first, the operating system's built-in
//! engine as the terminal step) and plays back the first successful result.
//! Every failure above the terminal step is recovered locally; the caller's
//! completion hook fires exactly once no matter how many fallbacks occurred.
//!
//! # Quick Start
//!
//! ```no_run
//! use parla::prelude::*;
//!
//! # async fn example() -> parla::error::Result<()> {
//! let orchestrator = SpeechOrchestrator::builder()
//!     .provider(GoogleTtsProvider::from_env())
//!     .provider(ElevenLabsProvider::from_env())
//!     .build()?;
//!
//! orchestrator.speak("Hello from Parla!").await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod playback;
pub mod prelude;
pub mod provider;
pub mod sentiment;
pub mod voices;

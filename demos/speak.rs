//! End-to-end demo: speak a line through the fallback chain.
//!
//! Reads `GOOGLE_API_KEY` / `ELEVENLABS_API_KEY` from the environment (or a
//! `.env` file). With no keys set, both cloud steps fail over to the local
//! engine.
//!
//! Run with: `cargo run --example speak`

use parla::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let orchestrator = SpeechOrchestrator::builder()
        .provider(GoogleTtsProvider::from_env())
        .provider(ElevenLabsProvider::from_env())
        .store(FileConfigStore::new_default()?)
        .build()?;

    orchestrator
        .speak_with_hooks(
            "Hello from Parla. This sentence survived the fallback chain.",
            SpeakHooks::new()
                .on_start(|| println!("speaking..."))
                .on_end(|| println!("done.")),
        )
        .await;

    let text = "great job, thank you very much";
    println!("sentiment of {text:?}: {}", parla::sentiment::analyze(text));

    Ok(())
}

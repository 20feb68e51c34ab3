//! Generates a quiz for one profile from a fixture file and prints it as JSON.
//!
//! Usage: `preview [path/to/profiles.json] [index]`
//!
//! Reads the same environment as the server; `SERVER_ADDRESS` is not needed.

use anyhow::Context as _;
use trivia_backend::{
    config::Config, dto::question_dto::GenerateQuestionsResponse, models::profile::Profile,
    telemetry, AppState,
};

const DEFAULT_FIXTURE: &str = "fixtures/mock_profiles.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_format);

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_FIXTURE.to_string());
    let index: usize = match args.next() {
        Some(raw) => raw.parse().context("profile index must be a number")?,
        None => 0,
    };

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path))?;
    let profiles: Vec<Profile> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;
    tracing::info!("Loaded {} profiles from {}", profiles.len(), path);
    let profile = profiles
        .get(index)
        .with_context(|| format!("no profile at index {}", index))?;

    let state = AppState::new(&config)?;
    let questions = state.question_service.generate_questions(profile).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&GenerateQuestionsResponse { questions })?
    );
    Ok(())
}

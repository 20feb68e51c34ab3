pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    embed_service::InferenceEncoder, generation_service::InferenceTextGenerator,
    question_service::QuestionService,
};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub question_service: QuestionService,
    pub generation_model: String,
    pub embedding_enabled: bool,
}

impl AppState {
    /// Builds the model clients once; they are shared read-only by every request.
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.generation_timeout_secs))
            .build()?;

        let generator = InferenceTextGenerator::new(
            http_client.clone(),
            config.generation_api_key.clone(),
            &config.generation_api_url,
            &config.generation_model,
        )?;
        let mut question_service = QuestionService::new(Arc::new(generator))
            .with_max_length(config.generation_max_length);

        if config.embedding_enabled {
            let encoder = InferenceEncoder::new(
                http_client,
                config.generation_api_key.clone(),
                &config.embedding_api_url,
                &config.embedding_model,
            )?;
            question_service = question_service.with_encoder(Arc::new(encoder));
        }

        Ok(Self::with_question_service(
            question_service,
            config.generation_model.clone(),
            config.embedding_enabled,
        ))
    }

    pub fn with_question_service(
        question_service: QuestionService,
        generation_model: String,
        embedding_enabled: bool,
    ) -> Self {
        Self {
            question_service,
            generation_model,
            embedding_enabled,
        }
    }
}

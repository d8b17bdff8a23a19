pub mod clients;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;

use crate::clients::llm_client::{CompletionClient, OpenAiClient};
use crate::clients::page_fetcher::{HttpPageFetcher, PageFetcher};
use crate::config::Config;
use crate::services::{
    ai_service::AiService, generation_service::GenerationService, quiz_service::QuizService,
    scrape_service::ScrapeService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub quiz_service: QuizService,
    pub generation_service: GenerationService,
}

impl AppState {
    /// Wires the pipeline from explicit collaborators; the two network
    /// seams are trait objects.
    pub fn new(
        pool: SqlitePool,
        fetcher: Arc<dyn PageFetcher>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        let quiz_service = QuizService::new(pool.clone());
        let scrape_service = ScrapeService::new(fetcher);
        let ai_service = AiService::new(completion);
        let generation_service = GenerationService::new(
            scrape_service,
            ai_service,
            quiz_service.clone(),
        );

        Self {
            pool,
            quiz_service,
            generation_service,
        }
    }

    pub fn from_config(pool: SqlitePool, config: &Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .expect("reqwest client");

        let fetcher = Arc::new(HttpPageFetcher::new(http_client.clone()));
        let completion = Arc::new(OpenAiClient::new(
            http_client,
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.openai_model.clone(),
            Duration::from_secs(config.completion_timeout_secs),
        ));

        Self::new(pool, fetcher, completion)
    }
}

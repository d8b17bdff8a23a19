use url::Url;

use crate::error::{Error, Result};
use crate::models::quiz::{NewQuiz, QuizWithQuestions};
use crate::services::ai_service::AiService;
use crate::services::quiz_service::QuizService;
use crate::services::scrape_service::ScrapeService;

/// Sequences one generation request: validate input, extract the article,
/// synthesize quiz content, persist the result. Linear, single attempt at
/// every stage.
#[derive(Clone)]
pub struct GenerationService {
    scrape_service: ScrapeService,
    ai_service: AiService,
    quiz_service: QuizService,
}

impl GenerationService {
    pub fn new(
        scrape_service: ScrapeService,
        ai_service: AiService,
        quiz_service: QuizService,
    ) -> Self {
        Self {
            scrape_service,
            ai_service,
            quiz_service,
        }
    }

    pub async fn generate(&self, url: &str) -> Result<QuizWithQuestions> {
        let url = validate_url(url)?;

        tracing::info!(url = %url, "starting quiz generation");
        let article = self.scrape_service.fetch_article(url.as_str()).await?;

        tracing::info!(title = %article.title, "article extracted, synthesizing quiz");
        let synthesized = self
            .ai_service
            .synthesize(&article.title, &article.text)
            .await?;

        tracing::info!(
            questions = synthesized.questions.len(),
            "synthesis complete, persisting"
        );
        let saved = self
            .quiz_service
            .create_quiz(
                NewQuiz {
                    url: url.to_string(),
                    title: article.title,
                    summary: synthesized.summary,
                    key_entities: synthesized.key_entities,
                    sections: synthesized.sections,
                    related_topics: synthesized.related_topics,
                },
                synthesized.questions,
            )
            .await?;

        tracing::info!(quiz_id = saved.quiz.id, "quiz generated");
        Ok(saved)
    }
}

/// Rejects malformed URLs before any network call.
fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|_| Error::validation("url must be a valid URL", "url"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::validation("url must use http or https", "url"));
    }
    if url.host_str().is_none() {
        return Err(Error::validation("url must have a host", "url"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wikipedia_urls() {
        assert!(validate_url("https://en.wikipedia.org/wiki/Alan_Turing").is_ok());
        assert!(validate_url("http://en.wikipedia.org/wiki/Rust").is_ok());
    }

    #[test]
    fn rejects_malformed_urls_with_field() {
        let err = validate_url("not-a-url").unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field.as_deref(), Some("url")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(validate_url("ftp://example.com/article").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
    }
}

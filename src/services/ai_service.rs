use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::clients::llm_client::CompletionClient;
use crate::error::{Error, Result};
use crate::models::question::{Difficulty, NewQuestion};
use crate::models::quiz::KeyEntities;

const SYSTEM_PROMPT: &str = "You are a JSON generator. Output only valid JSON.";

#[derive(Debug, Clone)]
pub struct SynthesizedQuiz {
    pub summary: String,
    pub key_entities: KeyEntities,
    pub sections: Vec<String>,
    pub related_topics: Vec<String>,
    pub questions: Vec<NewQuestion>,
}

#[derive(Clone)]
pub struct AiService {
    completion: Arc<dyn CompletionClient>,
}

impl AiService {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    /// One synchronous completion call, one parse. Model failures and
    /// malformed output surface as errors; optional top-level fields are
    /// default-filled instead.
    pub async fn synthesize(&self, title: &str, text: &str) -> Result<SynthesizedQuiz> {
        let prompt = build_prompt(title, text);
        let content = self.completion.complete_json(SYSTEM_PROMPT, &prompt).await?;
        parse_synthesis(&content)
    }
}

fn build_prompt(title: &str, text: &str) -> String {
    format!(
        r#"You are a helpful assistant that generates quizzes from Wikipedia articles.
Based on the following article content about "{title}", generate a quiz.

Article Content (truncated):
{text}

Return a JSON object with the following structure:
{{
  "summary": "A brief summary of the article (2-3 sentences).",
  "key_entities": {{
    "people": ["List of key people"],
    "organizations": ["List of key organizations"],
    "locations": ["List of key locations"]
  }},
  "sections": ["List of main sections extracted from context if possible, or relevant topics"],
  "related_topics": ["List of 3-5 related Wikipedia topics"],
  "quiz": [
    {{
      "question": "Question text",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "answer": "The correct option text (must be one of the options)",
      "difficulty": "easy" | "medium" | "hard",
      "explanation": "Short explanation of the answer."
    }}
  ]
}}
Generate 5-10 questions. Each question must have exactly 4 options.
Make questions factual and grounded in the provided content.
Ensure valid JSON output."#
    )
}

fn parse_synthesis(content: &str) -> Result<SynthesizedQuiz> {
    let raw: JsonValue = serde_json::from_str(strip_code_fences(content))
        .map_err(|e| Error::SynthesisFormat(format!("Model returned unparseable JSON: {}", e)))?;

    let quiz_items = raw
        .get("quiz")
        .and_then(|q| q.as_array())
        .ok_or_else(|| {
            Error::SynthesisSchema("Missing or malformed question list".to_string())
        })?;

    let questions = quiz_items.iter().map(coerce_question).collect::<Vec<_>>();

    let key_entities = raw
        .get("key_entities")
        .cloned()
        .map(|v| serde_json::from_value::<KeyEntities>(v).unwrap_or_default())
        .unwrap_or_default();

    Ok(SynthesizedQuiz {
        summary: raw
            .get("summary")
            .and_then(|s| s.as_str())
            .unwrap_or_default()
            .to_string(),
        key_entities,
        sections: string_list(raw.get("sections")),
        related_topics: string_list(raw.get("related_topics")),
        questions,
    })
}

/// Individual question fields pass through without hard validation; only
/// difficulty and explanation are default-filled. An answer that matches no
/// option is flagged, not rejected.
fn coerce_question(v: &JsonValue) -> NewQuestion {
    let question = v
        .get("question")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_string();
    let options = string_list(v.get("options"));
    let answer = v
        .get("answer")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_string();
    let difficulty = v
        .get("difficulty")
        .and_then(|s| s.as_str())
        .map(Difficulty::parse_lenient)
        .unwrap_or_default();
    let explanation = v
        .get("explanation")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_string();

    if !options.iter().any(|o| o == &answer) {
        tracing::warn!(question = %question, answer = %answer, "answer is not one of the options");
    }

    NewQuestion {
        question,
        options,
        answer,
        difficulty,
        explanation,
    }
}

fn string_list(value: Option<&JsonValue>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|x| x.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Some providers wrap JSON-mode output in Markdown fences anyway.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

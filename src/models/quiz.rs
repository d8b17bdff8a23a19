use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::question::Question;

/// Categorized entity names attached to a quiz. All lists are always
/// present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntities {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub key_entities: Json<KeyEntities>,
    pub sections: Json<Vec<String>>,
    pub related_topics: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// The unit the orchestrator produces and the repository persists: one quiz
/// together with its full ordered question set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizWithQuestions {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

/// Column values for a quiz row before identifiers are assigned.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub key_entities: KeyEntities,
    pub sections: Vec<String>,
    pub related_topics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_serializes_with_camel_case_keys() {
        let quiz = Quiz {
            id: 1,
            url: "https://en.wikipedia.org/wiki/Alan_Turing".to_string(),
            title: "Alan Turing".to_string(),
            summary: "A mathematician.".to_string(),
            key_entities: Json(KeyEntities {
                people: vec!["Alan Turing".to_string()],
                organizations: vec![],
                locations: vec![],
            }),
            sections: Json(vec!["Early life".to_string()]),
            related_topics: Json(vec!["Cryptography".to_string()]),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&quiz).unwrap();
        assert!(value.get("keyEntities").is_some());
        assert!(value.get("relatedTopics").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["keyEntities"]["people"][0], "Alan Turing");
    }

    #[test]
    fn key_entities_default_to_empty_lists() {
        let entities: KeyEntities = serde_json::from_str("{}").unwrap();
        assert!(entities.people.is_empty());
        assert!(entities.organizations.is_empty());
        assert!(entities.locations.is_empty());
    }
}

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::question::{Difficulty, NewQuestion, Question};
use crate::models::quiz::{KeyEntities, NewQuiz, Quiz, QuizWithQuestions};

#[derive(Clone)]
pub struct QuizService {
    pool: SqlitePool,
}

impl QuizService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists the quiz row and all of its questions in one transaction.
    /// Identifiers and the creation timestamp are assigned here; the fully
    /// hydrated unit is returned.
    pub async fn create_quiz(
        &self,
        quiz: NewQuiz,
        questions: Vec<NewQuestion>,
    ) -> Result<QuizWithQuestions> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let res = sqlx::query(
            r#"
            INSERT INTO quizzes (url, title, summary, key_entities, sections, related_topics, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quiz.url)
        .bind(&quiz.title)
        .bind(&quiz.summary)
        .bind(Json(&quiz.key_entities))
        .bind(Json(&quiz.sections))
        .bind(Json(&quiz.related_topics))
        .bind(created_at)
        .execute(&mut *tx)
        .await?;
        let quiz_id = res.last_insert_rowid();

        let mut saved_questions = Vec::with_capacity(questions.len());
        for q in questions {
            let res = sqlx::query(
                r#"
                INSERT INTO questions (quiz_id, question, options, answer, difficulty, explanation)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(quiz_id)
            .bind(&q.question)
            .bind(Json(&q.options))
            .bind(&q.answer)
            .bind(q.difficulty.as_str())
            .bind(&q.explanation)
            .execute(&mut *tx)
            .await?;

            saved_questions.push(Question {
                id: res.last_insert_rowid(),
                quiz_id,
                question: q.question,
                options: Json(q.options),
                answer: q.answer,
                difficulty: q.difficulty,
                explanation: q.explanation,
            });
        }

        tx.commit().await?;

        Ok(QuizWithQuestions {
            quiz: Quiz {
                id: quiz_id,
                url: quiz.url,
                title: quiz.title,
                summary: quiz.summary,
                key_entities: Json(quiz.key_entities),
                sections: Json(quiz.sections),
                related_topics: Json(quiz.related_topics),
                created_at,
            },
            questions: saved_questions,
        })
    }

    /// Quiz summaries without questions, newest first. `id` breaks ties
    /// between rows created within the same timestamp tick.
    pub async fn get_quizzes(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Quiz>> {
        let limit = limit.unwrap_or(-1);
        let offset = offset.unwrap_or(0);
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, url, title, summary, key_entities, sections, related_topics, created_at
            FROM quizzes
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    pub async fn get_quiz(&self, id: i64) -> Result<Option<QuizWithQuestions>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, url, title, summary, key_entities, sections, related_topics, created_at
            FROM quizzes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(quiz) = quiz else {
            return Ok(None);
        };

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, question, options, answer, difficulty, explanation
            FROM questions
            WHERE quiz_id = ?
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuizWithQuestions { quiz, questions }))
    }

    /// Idempotent startup step: seeds one fixed sample quiz when the store
    /// is empty so the history view has content on a fresh deployment.
    /// Never re-triggered once any quiz exists.
    pub async fn ensure_seeded(&self) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        let (quiz, questions) = sample_quiz();
        self.create_quiz(quiz, questions).await?;
        tracing::info!("Seeded sample quiz");
        Ok(())
    }
}

pub fn sample_quiz() -> (NewQuiz, Vec<NewQuestion>) {
    let quiz = NewQuiz {
        url: "https://en.wikipedia.org/wiki/Alan_Turing".to_string(),
        title: "Alan Turing".to_string(),
        summary: "Alan Mathison Turing was an English mathematician, computer scientist, \
                  logician, cryptanalyst, philosopher, and theoretical biologist."
            .to_string(),
        key_entities: KeyEntities {
            people: vec!["Alan Turing".to_string(), "Alonzo Church".to_string()],
            organizations: vec![
                "University of Cambridge".to_string(),
                "Bletchley Park".to_string(),
            ],
            locations: vec!["United Kingdom".to_string()],
        },
        sections: vec![
            "Early life".to_string(),
            "World War II".to_string(),
            "Legacy".to_string(),
        ],
        related_topics: vec![
            "Cryptography".to_string(),
            "Enigma machine".to_string(),
            "Computer science history".to_string(),
        ],
    };

    let questions = vec![
        NewQuestion {
            question: "Where did Alan Turing study?".to_string(),
            options: vec![
                "Harvard University".to_string(),
                "Cambridge University".to_string(),
                "Oxford University".to_string(),
                "Princeton University".to_string(),
            ],
            answer: "Cambridge University".to_string(),
            difficulty: Difficulty::Easy,
            explanation: "He studied at King's College, Cambridge.".to_string(),
        },
        NewQuestion {
            question: "What was his main contribution during WWII?".to_string(),
            options: vec![
                "Atomic research".to_string(),
                "Breaking the Enigma code".to_string(),
                "Inventing radar".to_string(),
                "Developing jet engines".to_string(),
            ],
            answer: "Breaking the Enigma code".to_string(),
            difficulty: Difficulty::Medium,
            explanation: "He worked at Bletchley Park on breaking the Enigma code.".to_string(),
        },
    ];

    (quiz, questions)
}

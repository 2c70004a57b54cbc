use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'cms_faqs' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub position: i32,
    pub published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Public view of a question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl From<Faq> for FaqEntry {
    fn from(faq: Faq) -> Self {
        FaqEntry {
            id: faq.id.to_string(),
            question: faq.question,
            answer: faq.answer,
        }
    }
}

pub fn default_faqs() -> Vec<FaqEntry> {
    vec![
        FaqEntry {
            id: "q1".to_string(),
            question: "Für wen ist Coach Milo geeignet?".to_string(),
            answer: "Für Einsteiger bis Fortgeschrittene. Milo passt Volumen und Intensität an deine Erfahrung an.".to_string(),
        },
        FaqEntry {
            id: "q2".to_string(),
            question: "Brauche ich spezielles Equipment?".to_string(),
            answer: "Nein. Du kannst im Studio, zu Hause oder unterwegs trainieren – Milo berücksichtigt dein Setup.".to_string(),
        },
    ]
}

/// DTO for updating a FAQ entry.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveFaqRequest {
    #[validate(length(max = 500))]
    #[serde(default)]
    pub question: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub published: bool,
}

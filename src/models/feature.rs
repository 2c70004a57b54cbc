use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Icon shown when a feature has none.
pub const DEFAULT_ICON: &str = "✨";

/// Represents the 'cms_features' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Feature {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    pub position: i32,
    pub published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Public view of a feature card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureCard {
    pub id: String,
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl From<Feature> for FeatureCard {
    fn from(feature: Feature) -> Self {
        FeatureCard {
            id: feature.id.to_string(),
            title: feature.title,
            body: feature.body,
            icon: feature.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        }
    }
}

/// Cards shown while the database holds no published features.
pub fn default_features() -> Vec<FeatureCard> {
    [
        (
            "f1",
            "Individuelle Trainingspläne",
            "Milo baut deinen Plan aus Zielen, Equipment und Zeit. Passt Sätze/Wdh. automatisch an.",
            "💪",
        ),
        (
            "f2",
            "Fortschritts-Tracking",
            "Tracke Workouts schnell. Milo erkennt Plateaus und empfiehlt passende Methoden.",
            "📈",
        ),
        (
            "f3",
            "Übungsbibliothek (GIFs)",
            "Saubere Ausführung dank visueller Beispiele. Alternativen für jedes Niveau.",
            "🎞️",
        ),
    ]
    .into_iter()
    .map(|(id, title, body, icon)| FeatureCard {
        id: id.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

/// DTO for updating a feature.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveFeatureRequest {
    #[validate(length(max = 200))]
    #[serde(default)]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub body: String,
    #[validate(length(max = 32))]
    pub icon: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub published: bool,
}

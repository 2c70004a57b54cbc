use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'cms_signups' table (beta waitlist).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Signup {
    pub id: i64,
    pub email: String,
    pub goal: String,
    pub experience: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for the public beta signup form.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSignupRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, max = 50))]
    #[serde(default = "default_goal")]
    pub goal: String,

    #[validate(length(min = 1, max = 50))]
    #[serde(default = "default_experience")]
    pub experience: String,

    /// The visitor must agree to be contacted about the beta.
    #[serde(default)]
    pub consent: bool,
}

impl CreateSignupRequest {
    /// Trims the form input so validation sees what gets stored.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.goal = self.goal.trim().to_string();
        self.experience = self.experience.trim().to_string();
        self
    }
}

fn default_goal() -> String {
    "Hypertrophie".to_string()
}

fn default_experience() -> String {
    "Fortgeschritten".to_string()
}

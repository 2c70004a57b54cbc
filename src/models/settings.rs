use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::post::validate_optional_url;

/// The single settings row always lives at this id.
pub const SETTINGS_ID: i32 = 1;
pub const DEFAULT_VIDEO_RATIO: &str = "16:9";
pub const DEFAULT_POSTER: &str = "/preview.jpg";

/// Represents the 'cms_settings' table. Every column may be NULL.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct SettingsRow {
    pub id: i32,
    pub hero_image_mode: Option<String>,
    pub hero_image_url: Option<String>,
    pub teaser_video_url: Option<String>,
    pub teaser_video_poster_url: Option<String>,
    pub teaser_video_ratio: Option<String>,
}

/// Settings as the admin form edits them, with row defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSettings {
    pub id: i32,
    pub hero_image_mode: String,
    pub hero_image_url: String,
    pub teaser_video_url: String,
    pub teaser_video_poster_url: String,
    pub teaser_video_ratio: String,
}

impl AdminSettings {
    /// Overlays a stored row (if any) on the row defaults.
    pub fn merge(row: Option<SettingsRow>) -> Self {
        let row = row.unwrap_or(SettingsRow {
            id: SETTINGS_ID,
            ..Default::default()
        });
        AdminSettings {
            id: row.id,
            hero_image_mode: row.hero_image_mode.unwrap_or_else(|| "url".to_string()),
            hero_image_url: row.hero_image_url.unwrap_or_default(),
            teaser_video_url: row.teaser_video_url.unwrap_or_default(),
            teaser_video_poster_url: row.teaser_video_poster_url.unwrap_or_default(),
            teaser_video_ratio: row
                .teaser_video_ratio
                .unwrap_or_else(|| DEFAULT_VIDEO_RATIO.to_string()),
        }
    }
}

/// Settings served to the public site: stored values over site defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSettings {
    pub brand: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub release_banner: String,
    pub beta_cta: String,
    pub accent: String,
    pub hero_image_mode: String,
    pub hero_image_url: String,
    pub teaser_video_url: String,
    pub teaser_video_mime: String,
    pub teaser_video_poster_url: String,
    pub teaser_video_poster_fallback: String,
    pub teaser_video_ratio: String,
}

impl SiteSettings {
    pub fn from_row(row: Option<SettingsRow>) -> Self {
        let row = row.unwrap_or_default();
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let teaser_video_url = non_empty(row.teaser_video_url)
            .map(|url| url.trim().to_string())
            .unwrap_or_default();

        SiteSettings {
            brand: "Coach Milo".to_string(),
            hero_title: "Die Fitness-App mit deinem persönlichen KI-Coach".to_string(),
            hero_subtitle: "Individuelle Trainingspläne, die deine Situation, dein Niveau und deine Fortschritte berücksichtigen.".to_string(),
            release_banner: "Ab Oktober 2025 im App Store & Play Store".to_string(),
            beta_cta: "Teste Coach Milo schon vor dem Release".to_string(),
            accent: "#ff9a3e".to_string(),
            hero_image_mode: non_empty(row.hero_image_mode).unwrap_or_else(|| "inline".to_string()),
            hero_image_url: non_empty(row.hero_image_url).unwrap_or_default(),
            teaser_video_mime: guess_video_mime(&teaser_video_url).to_string(),
            teaser_video_url,
            teaser_video_poster_url: non_empty(row.teaser_video_poster_url)
                .map(|url| url.trim().to_string())
                .unwrap_or_else(|| DEFAULT_POSTER.to_string()),
            teaser_video_poster_fallback: DEFAULT_POSTER.to_string(),
            teaser_video_ratio: non_empty(row.teaser_video_ratio)
                .unwrap_or_else(|| DEFAULT_VIDEO_RATIO.to_string()),
        }
    }
}

/// Guesses the `<source type>` for a teaser video from its file extension.
pub fn guess_video_mime(url: &str) -> &'static str {
    let path = url.split('?').next().unwrap_or("").to_lowercase();
    if path.ends_with(".webm") {
        "video/webm"
    } else if path.ends_with(".ogv") || path.ends_with(".ogg") {
        "video/ogg"
    } else if path.ends_with(".mov") {
        "video/quicktime"
    } else {
        "video/mp4"
    }
}

/// DTO for saving settings from the admin form.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveSettingsRequest {
    pub id: Option<i32>,
    #[validate(length(max = 20))]
    pub hero_image_mode: Option<String>,
    #[validate(custom(function = validate_optional_url))]
    pub hero_image_url: Option<String>,
    #[validate(custom(function = validate_optional_url))]
    pub teaser_video_url: Option<String>,
    #[validate(custom(function = validate_optional_url))]
    pub teaser_video_poster_url: Option<String>,
    #[validate(length(max = 20))]
    pub teaser_video_ratio: Option<String>,
}

impl SaveSettingsRequest {
    /// Builds the row to upsert: empty URLs are stored as NULL.
    pub fn into_row(self) -> SettingsRow {
        let url = |value: Option<String>| value.filter(|v| !v.is_empty());
        SettingsRow {
            id: self.id.unwrap_or(SETTINGS_ID),
            hero_image_mode: Some(self.hero_image_mode.unwrap_or_else(|| "url".to_string())),
            hero_image_url: url(self.hero_image_url),
            teaser_video_url: url(self.teaser_video_url),
            teaser_video_poster_url: url(self.teaser_video_poster_url),
            teaser_video_ratio: Some(
                self.teaser_video_ratio
                    .filter(|ratio| !ratio.is_empty())
                    .unwrap_or_else(|| DEFAULT_VIDEO_RATIO.to_string()),
            ),
        }
    }
}

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{
        faq::{Faq, FaqEntry, default_faqs},
        feature::{Feature, FeatureCard, default_features},
        settings::{SETTINGS_ID, SettingsRow, SiteSettings},
    },
};

// The public pages never fail on missing content: load errors and empty
// tables fall back to the built-in copy.

/// Lists published features ordered by position.
pub async fn list_features(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, Feature>(
        r#"
        SELECT id, title, body, icon, position, published, created_at
        FROM cms_features
        WHERE published = TRUE
        ORDER BY position ASC, created_at ASC
        "#,
    )
    .fetch_all(&pool)
    .await
    .unwrap_or_else(|e| {
        tracing::warn!("Failed to load features, using defaults: {:?}", e);
        Vec::new()
    });

    let cards: Vec<FeatureCard> = if rows.is_empty() {
        default_features()
    } else {
        rows.into_iter().map(FeatureCard::from).collect()
    };

    Ok(Json(cards))
}

/// Lists published FAQs ordered by position.
pub async fn list_faqs(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, Faq>(
        r#"
        SELECT id, question, answer, position, published, created_at
        FROM cms_faqs
        WHERE published = TRUE
        ORDER BY position ASC, created_at ASC
        "#,
    )
    .fetch_all(&pool)
    .await
    .unwrap_or_else(|e| {
        tracing::warn!("Failed to load FAQs, using defaults: {:?}", e);
        Vec::new()
    });

    let entries: Vec<FaqEntry> = if rows.is_empty() {
        default_faqs()
    } else {
        rows.into_iter().map(FaqEntry::from).collect()
    };

    Ok(Json(entries))
}

/// Site settings merged over the built-in defaults.
pub async fn get_settings(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let row = sqlx::query_as::<_, SettingsRow>(
        r#"
        SELECT id, hero_image_mode, hero_image_url, teaser_video_url,
               teaser_video_poster_url, teaser_video_ratio
        FROM cms_settings
        WHERE id = $1
        "#,
    )
    .bind(SETTINGS_ID)
    .fetch_optional(&pool)
    .await
    .unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings, using defaults: {:?}", e);
        None
    });

    Ok(Json(SiteSettings::from_row(row)))
}

// src/handlers/admin.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        faq::{Faq, SaveFaqRequest},
        feature::{DEFAULT_ICON, Feature, SaveFeatureRequest},
        post::{Post, SanitizeRequest, SavePostRequest},
        settings::{AdminSettings, SETTINGS_ID, SaveSettingsRequest, SettingsRow},
        signup::Signup,
    },
    utils::{
        export::{PostRecord, export_post},
        html::{EMPTY_FRAGMENT, contains_inline_data_uri, sanitize_with_policy},
        ids::IdGenerator,
        jwt::Claims,
    },
};

const POST_COLUMNS: &str = "id, slug, title, excerpt, content_html, cover_url, tags, author, \
     published, published_at, meta_title, meta_description, meta_image_url, canonical_url, \
     noindex, created_at, updated_at";

/// Lists all posts, drafts included, newest first.
/// Admin only.
pub async fn list_posts(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let sql = format!("SELECT {} FROM cms_posts ORDER BY created_at DESC", POST_COLUMNS);
    let posts = sqlx::query_as::<_, Post>(&sql)
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list posts: {:?}", e);
            AppError::from(e)
        })?;

    Ok(Json(posts))
}

/// Creates an unpublished draft authored by the signed-in admin.
/// Admin only.
pub async fn create_post(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let slug = format!("draft-{}", Utc::now().timestamp_millis());
    let author = claims.email.unwrap_or_default();

    let sql = format!(
        r#"
        INSERT INTO cms_posts (slug, title, excerpt, content_html, cover_url, tags, author, published)
        VALUES ($1, $2, '', $3, '', '{{}}', $4, FALSE)
        RETURNING {}
        "#,
        POST_COLUMNS
    );
    let post = sqlx::query_as::<_, Post>(&sql)
        .bind(&slug)
        .bind("Neuer Artikel")
        .bind(EMPTY_FRAGMENT)
        .bind(&author)
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create post: {:?}", e);
            AppError::from(e)
        })?;

    tracing::info!("Created draft post {} ({})", post.id, post.slug);

    Ok((StatusCode::CREATED, Json(post)))
}

/// Saves a post from the editor.
///
/// The body is sanitized before it is stored; inline `data:` images are
/// rejected so that images always go through uploads.
/// Admin only.
pub async fn update_post(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Path(id): Path<i64>,
    Json(payload): Json<SavePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if contains_inline_data_uri(&payload.content_html) {
        return Err(AppError::BadRequest(
            "Embedded data-URI images are not allowed. Upload images instead.".to_string(),
        ));
    }

    let body = if payload.content_html.is_empty() {
        EMPTY_FRAGMENT
    } else {
        payload.content_html.as_str()
    };
    let clean_html = sanitize_with_policy(Some(body), config.html_policy);
    let tags = payload.tags.map(|t| t.into_tags()).unwrap_or_default();
    let published_at = match (payload.published, payload.published_at) {
        (true, None) => Some(Utc::now()),
        (_, at) => at,
    };

    let sql = format!(
        r#"
        UPDATE cms_posts SET
            title = $1, slug = $2, excerpt = $3, content_html = $4, cover_url = $5,
            tags = $6, author = $7, published = $8, published_at = $9,
            meta_title = $10, meta_description = $11, meta_image_url = $12,
            canonical_url = $13, noindex = $14, updated_at = NOW()
        WHERE id = $15
        RETURNING {}
        "#,
        POST_COLUMNS
    );
    let post = sqlx::query_as::<_, Post>(&sql)
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.excerpt)
        .bind(&clean_html)
        .bind(&payload.cover_url)
        .bind(&tags)
        .bind(&payload.author)
        .bind(payload.published)
        .bind(published_at)
        .bind(&payload.meta_title)
        .bind(&payload.meta_description)
        .bind(&payload.meta_image_url)
        .bind(&payload.canonical_url)
        .bind(payload.noindex)
        .bind(id)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update post {}: {:?}", id, e);
            AppError::from(e)
        })?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Deletes a post by ID.
/// Admin only.
pub async fn delete_post(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM cms_posts WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete post: {:?}", e);
            AppError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Downloads a stored post as a markdown file with frontmatter.
/// Admin only.
pub async fn export_stored_post(
    State(pool): State<PgPool>,
    State(ids): State<Arc<dyn IdGenerator>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let sql = format!("SELECT {} FROM cms_posts WHERE id = $1", POST_COLUMNS);
    let post = sqlx::query_as::<_, Post>(&sql)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let document = export_post(&PostRecord::from(&post), ids.as_ref());
    let disposition = format!("attachment; filename=\"{}\"", document.file_name());

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.content,
    ))
}

/// Converts an editor-side post record into a markdown document.
/// Admin only.
pub async fn export_record(
    State(ids): State<Arc<dyn IdGenerator>>,
    Json(record): Json<PostRecord>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(export_post(&record, ids.as_ref())))
}

/// One-click cleanup: returns the sanitized version of the given HTML.
/// Admin only.
pub async fn sanitize_preview(
    State(config): State<Config>,
    Json(payload): Json<SanitizeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let html = sanitize_with_policy(payload.html.as_deref(), config.html_policy);
    Ok(Json(serde_json::json!({ "html": html })))
}

/// Lists all features by position.
/// Admin only.
pub async fn list_features(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let features = sqlx::query_as::<_, Feature>(
        r#"
        SELECT id, title, body, icon, position, published, created_at
        FROM cms_features
        ORDER BY position ASC, created_at ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(features))
}

/// Creates an unpublished feature at the end of the list.
/// Admin only.
pub async fn create_feature(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cms_features")
        .fetch_one(&pool)
        .await?;

    let feature = sqlx::query_as::<_, Feature>(
        r#"
        INSERT INTO cms_features (title, body, icon, position, published)
        VALUES ($1, '', $2, $3, FALSE)
        RETURNING id, title, body, icon, position, published, created_at
        "#,
    )
    .bind("Neues Feature")
    .bind(DEFAULT_ICON)
    .bind((count + 1) as i32)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create feature: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(feature)))
}

/// Updates a feature by ID.
/// Admin only.
pub async fn update_feature(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<SaveFeatureRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let icon = payload
        .icon
        .filter(|icon| !icon.is_empty())
        .unwrap_or_else(|| DEFAULT_ICON.to_string());

    let feature = sqlx::query_as::<_, Feature>(
        r#"
        UPDATE cms_features
        SET title = $1, body = $2, icon = $3, position = $4, published = $5
        WHERE id = $6
        RETURNING id, title, body, icon, position, published, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.body)
    .bind(&icon)
    .bind(payload.position)
    .bind(payload.published)
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update feature: {:?}", e);
        AppError::from(e)
    })?
    .ok_or(AppError::NotFound("Feature not found".to_string()))?;

    Ok(Json(feature))
}

/// Deletes a feature by ID.
/// Admin only.
pub async fn delete_feature(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM cms_features WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete feature: {:?}", e);
            AppError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Feature not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists all FAQ entries by position.
/// Admin only.
pub async fn list_faqs(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let faqs = sqlx::query_as::<_, Faq>(
        r#"
        SELECT id, question, answer, position, published, created_at
        FROM cms_faqs
        ORDER BY position ASC, created_at ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(faqs))
}

/// Creates an unpublished FAQ entry at the end of the list.
/// Admin only.
pub async fn create_faq(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cms_faqs")
        .fetch_one(&pool)
        .await?;

    let faq = sqlx::query_as::<_, Faq>(
        r#"
        INSERT INTO cms_faqs (question, answer, position, published)
        VALUES ($1, '', $2, FALSE)
        RETURNING id, question, answer, position, published, created_at
        "#,
    )
    .bind("Neue Frage")
    .bind((count + 1) as i32)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create FAQ: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(faq)))
}

/// Updates a FAQ entry by ID.
/// Admin only.
pub async fn update_faq(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<SaveFaqRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let faq = sqlx::query_as::<_, Faq>(
        r#"
        UPDATE cms_faqs
        SET question = $1, answer = $2, position = $3, published = $4
        WHERE id = $5
        RETURNING id, question, answer, position, published, created_at
        "#,
    )
    .bind(&payload.question)
    .bind(&payload.answer)
    .bind(payload.position)
    .bind(payload.published)
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to update FAQ: {:?}", e);
        AppError::from(e)
    })?
    .ok_or(AppError::NotFound("FAQ not found".to_string()))?;

    Ok(Json(faq))
}

/// Deletes a FAQ entry by ID.
/// Admin only.
pub async fn delete_faq(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM cms_faqs WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete FAQ: {:?}", e);
            AppError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("FAQ not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Loads the settings row, falling back to row defaults when it is missing.
/// Admin only.
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
        tracing::warn!("Failed to load settings for admin: {:?}", e);
        None
    });

    Ok(Json(AdminSettings::merge(row)))
}

/// Creates or replaces the settings row.
/// Admin only.
pub async fn save_settings(
    State(pool): State<PgPool>,
    Json(payload): Json<SaveSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let next = payload.into_row();

    let row = sqlx::query_as::<_, SettingsRow>(
        r#"
        INSERT INTO cms_settings
            (id, hero_image_mode, hero_image_url, teaser_video_url,
             teaser_video_poster_url, teaser_video_ratio)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET
            hero_image_mode = EXCLUDED.hero_image_mode,
            hero_image_url = EXCLUDED.hero_image_url,
            teaser_video_url = EXCLUDED.teaser_video_url,
            teaser_video_poster_url = EXCLUDED.teaser_video_poster_url,
            teaser_video_ratio = EXCLUDED.teaser_video_ratio
        RETURNING id, hero_image_mode, hero_image_url, teaser_video_url,
                  teaser_video_poster_url, teaser_video_ratio
        "#,
    )
    .bind(next.id)
    .bind(&next.hero_image_mode)
    .bind(&next.hero_image_url)
    .bind(&next.teaser_video_url)
    .bind(&next.teaser_video_poster_url)
    .bind(&next.teaser_video_ratio)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save settings: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(AdminSettings::merge(Some(row))))
}

/// Lists beta signups, newest first.
/// Admin only.
pub async fn list_signups(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let signups = sqlx::query_as::<_, Signup>(
        r#"
        SELECT id, email, goal, experience, created_at
        FROM cms_signups
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(signups))
}

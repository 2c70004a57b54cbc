use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::post::PublishedPost,
    utils::html::{HtmlPolicy, sanitize_with_policy, to_readable_html},
};

/// Makes a stored body safe to inject into the page as-is.
fn render_body(post: &mut PublishedPost, policy: HtmlPolicy) {
    let readable = to_readable_html(&post.content_html);
    post.content_html = sanitize_with_policy(Some(&readable), policy);
}

/// Lists published posts, newest first.
pub async fn list_posts(
    State(pool): State<PgPool>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let mut posts = sqlx::query_as::<_, PublishedPost>(
        r#"
        SELECT
            id, slug, title, excerpt, cover_url, content_html, author, tags,
            published_at, meta_title, meta_description, meta_image_url,
            canonical_url, noindex
        FROM cms_posts
        WHERE published = TRUE
        ORDER BY published_at DESC NULLS LAST
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list published posts: {:?}", e);
        AppError::from(e)
    })?;

    for post in &mut posts {
        render_body(post, config.html_policy);
    }

    Ok(Json(posts))
}

/// Gets a single published post by slug.
pub async fn get_post(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut post = sqlx::query_as::<_, PublishedPost>(
        r#"
        SELECT
            id, slug, title, excerpt, cover_url, content_html, author, tags,
            published_at, meta_title, meta_description, meta_image_url,
            canonical_url, noindex
        FROM cms_posts
        WHERE slug = $1 AND published = TRUE
        "#,
    )
    .bind(&slug)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Post not found".to_string()))?;

    render_body(&mut post, config.html_policy);

    Ok(Json(post))
}

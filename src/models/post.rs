use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use validator::Validate;

use crate::utils::export::{PostRecord, TagsInput};

/// Represents the 'cms_posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Sanitized rich-text body.
    pub content_html: String,
    pub cover_url: String,
    pub tags: Vec<String>,
    pub author: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,

    // SEO overrides
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_image_url: Option<String>,
    pub canonical_url: Option<String>,
    pub noindex: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        PostRecord {
            id: Some(post.id.to_string()),
            title: Some(post.title.clone()),
            excerpt: Some(post.excerpt.clone()),
            slug: Some(post.slug.clone()),
            published: Some(post.published),
            published_at: post.published_at.map(|at| at.to_rfc3339()),
            tags: Some(TagsInput::List(post.tags.clone())),
            cover_image: Some(post.cover_url.clone()),
            author: Some(post.author.clone()),
            content: Some(post.content_html.clone()),
        }
    }
}

/// Public view of a published post.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublishedPost {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_url: String,
    pub content_html: String,
    pub author: String,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_image_url: Option<String>,
    pub canonical_url: Option<String>,
    pub noindex: bool,
}

/// DTO for saving a post from the admin editor.
///
/// Missing fields fall back to empty values, the way the editor form sends them.
#[derive(Debug, Deserialize, Validate)]
pub struct SavePostRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 chars"))]
    #[serde(default)]
    pub title: String,

    #[validate(length(max = 200, message = "Slug must be at most 200 chars"))]
    #[serde(default)]
    pub slug: String,

    #[validate(length(max = 1000, message = "Excerpt must be at most 1000 chars"))]
    #[serde(default)]
    pub excerpt: String,

    #[validate(length(max = 500000, message = "Content is too large"))]
    #[serde(default)]
    pub content_html: String,

    #[validate(length(max = 500), custom(function = validate_optional_url))]
    #[serde(default)]
    pub cover_url: String,

    pub tags: Option<TagsInput>,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub published: bool,

    pub published_at: Option<DateTime<Utc>>,

    #[validate(length(max = 200))]
    pub meta_title: Option<String>,
    #[validate(length(max = 500))]
    pub meta_description: Option<String>,
    #[validate(custom(function = validate_optional_url))]
    pub meta_image_url: Option<String>,
    #[validate(custom(function = validate_optional_url))]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub noindex: bool,
}

/// DTO for the one-click cleanup endpoint.
#[derive(Debug, Deserialize)]
pub struct SanitizeRequest {
    pub html: Option<String>,
}

/// Empty strings are allowed (field cleared); anything else must be an absolute URL.
pub fn validate_optional_url(url: &str) -> Result<(), validator::ValidationError> {
    if url.is_empty() {
        return Ok(());
    }
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}

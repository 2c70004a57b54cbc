// src/utils/export.rs

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::ids::IdGenerator;

/// Slug body used when nothing usable is left after cleaning.
pub const FALLBACK_SLUG: &str = "post";

/// Body written when a post has no content yet.
pub const EMPTY_BODY: &str = "(Inhalt folgt)";

static DATED_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-").expect("valid date prefix regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("valid slug regex"));

/// Tags as they arrive from the editor: a list, or one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

impl TagsInput {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagsInput::List(tags) => tags,
            TagsInput::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Loosely-typed post as held by the editor. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub published: Option<bool>,
    pub published_at: Option<String>,
    pub tags: Option<TagsInput>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    /// Markdown body.
    #[serde(alias = "body")]
    pub content: Option<String>,
}

/// Frontmatter + body, ready to be saved as `<slug>.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedDocument {
    pub slug: String,
    pub content: String,
}

impl ExportedDocument {
    pub fn file_name(&self) -> String {
        format!("{}.md", self.slug)
    }
}

/// Parses the timestamp shapes the editor produces.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Lower-cases, dashes whitespace, strips anything outside `[a-z0-9-]`
/// and prefixes `YYYY-MM-DD-` unless the slug already carries one.
pub fn normalize_slug(raw: &str, date: NaiveDate) -> String {
    let lowered = raw.trim().to_lowercase();
    let dashed = WHITESPACE_RUN.replace_all(&lowered, "-");
    let cleaned = NON_SLUG_CHARS.replace_all(&dashed, "");

    if DATED_SLUG.is_match(&cleaned) {
        return cleaned.into_owned();
    }

    let body: &str = if cleaned.is_empty() {
        FALLBACK_SLUG
    } else {
        &cleaned
    };
    format!("{}-{}", date.format("%Y-%m-%d"), body)
}

/// Renders a post as a markdown document with frontmatter.
///
/// `now` stands in for missing or unparseable publish dates; `ids` supplies
/// an identifier when the record has none.
pub fn to_markdown_document(
    post: &PostRecord,
    ids: &dyn IdGenerator,
    now: DateTime<Utc>,
) -> ExportedDocument {
    let published_at = post
        .published_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(now);
    let slug = normalize_slug(post.slug.as_deref().unwrap_or(""), published_at.date_naive());

    let id = post
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| ids.next_id());

    let tags = post
        .tags
        .clone()
        .map(TagsInput::into_tags)
        .unwrap_or_default()
        .iter()
        .map(|tag| quote(tag))
        .collect::<Vec<_>>()
        .join(", ");

    let body = post
        .content
        .as_deref()
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .unwrap_or(EMPTY_BODY);

    let frontmatter = [
        format!("id: {}", quote(&id)),
        format!("title: {}", quote(post.title.as_deref().unwrap_or(""))),
        format!("excerpt: {}", quote(post.excerpt.as_deref().unwrap_or(""))),
        format!("slug: {}", quote(&slug)),
        format!("published: {}", post.published.unwrap_or(false)),
        format!(
            "publishedAt: {}",
            quote(&published_at.to_rfc3339_opts(SecondsFormat::Millis, true))
        ),
        format!("tags: [{}]", tags),
        format!("coverImage: {}", quote(post.cover_image.as_deref().unwrap_or(""))),
        format!("author: {}", quote(post.author.as_deref().unwrap_or(""))),
    ]
    .join("\n");

    ExportedDocument {
        content: format!("---\n{}\n---\n\n{}\n", frontmatter, body),
        slug,
    }
}

/// Shorthand for [`to_markdown_document`] at the current time.
pub fn export_post(post: &PostRecord, ids: &dyn IdGenerator) -> ExportedDocument {
    to_markdown_document(post, ids, Utc::now())
}

/// Double-quoted frontmatter scalar on a single line, backslashes and quotes escaped.
fn quote(value: &str) -> String {
    let single_line = value.lines().collect::<Vec<_>>().join(" ");
    let escaped = single_line.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

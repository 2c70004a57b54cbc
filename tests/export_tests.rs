// tests/export_tests.rs

use chrono::{NaiveDate, TimeZone, Utc};
use milo_cms::utils::{
    export::{
        EMPTY_BODY, PostRecord, TagsInput, export_post, normalize_slug, parse_timestamp,
        to_markdown_document,
    },
    ids::{IdGenerator, IdSource, PseudoRandomIds, UuidIds},
};

/// Deterministic ids for assertions.
struct FixedIds(&'static str);

impl IdGenerator for FixedIds {
    fn next_id(&self) -> String {
        self.0.to_string()
    }
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 8, 30, 0).unwrap()
}

fn frontmatter_line<'a>(content: &'a str, key: &str) -> &'a str {
    let prefix = format!("{}: ", key);
    content
        .lines()
        .find(|line| line.starts_with(&prefix))
        .unwrap_or_else(|| panic!("missing frontmatter key {}", key))
}

#[test]
fn slug_gets_publish_date_prefix() {
    let post = PostRecord {
        slug: Some("My Post!".to_string()),
        published_at: Some("2024-03-05T10:00:00Z".to_string()),
        ..Default::default()
    };

    let doc = to_markdown_document(&post, &FixedIds("x"), fixed_now());

    assert_eq!(doc.slug, "2024-03-05-my-post");
    assert_eq!(doc.file_name(), "2024-03-05-my-post.md");
}

#[test]
fn dated_slug_is_kept() {
    let post = PostRecord {
        slug: Some("2023-01-01-already-dated".to_string()),
        ..Default::default()
    };

    let doc = to_markdown_document(&post, &FixedIds("x"), fixed_now());

    assert_eq!(doc.slug, "2023-01-01-already-dated");
}

#[test]
fn empty_slug_falls_back_to_post() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

    assert_eq!(normalize_slug("", date), "2024-01-02-post");
    assert_eq!(normalize_slug("!!!", date), "2024-01-02-post");
    assert_eq!(normalize_slug("  Hello   World  ", date), "2024-01-02-hello-world");
}

#[test]
fn missing_publish_date_uses_now() {
    let doc = to_markdown_document(
        &PostRecord {
            slug: Some("launch".to_string()),
            published_at: Some("not a date".to_string()),
            ..Default::default()
        },
        &FixedIds("x"),
        fixed_now(),
    );

    assert_eq!(doc.slug, "2025-10-01-launch");
    assert_eq!(
        frontmatter_line(&doc.content, "publishedAt"),
        r#"publishedAt: "2025-10-01T08:30:00.000Z""#
    );
}

#[test]
fn comma_separated_tags_are_split_and_trimmed() {
    let post = PostRecord {
        tags: Some(TagsInput::Csv("a, b ,, c".to_string())),
        ..Default::default()
    };

    let doc = to_markdown_document(&post, &FixedIds("x"), fixed_now());

    assert_eq!(frontmatter_line(&doc.content, "tags"), r#"tags: ["a", "b", "c"]"#);
}

#[test]
fn tags_deserialize_from_string_or_list() {
    let from_string: PostRecord = serde_json::from_value(serde_json::json!({ "tags": "x, y" })).unwrap();
    let from_list: PostRecord = serde_json::from_value(serde_json::json!({ "tags": ["x", "y"] })).unwrap();

    assert_eq!(from_string.tags.unwrap().into_tags(), vec!["x", "y"]);
    assert_eq!(from_list.tags.unwrap().into_tags(), vec!["x", "y"]);
}

#[test]
fn missing_tags_render_as_empty_list() {
    let doc = to_markdown_document(&PostRecord::default(), &FixedIds("x"), fixed_now());

    assert_eq!(frontmatter_line(&doc.content, "tags"), "tags: []");
}

#[test]
fn quotes_in_values_are_escaped() {
    let post = PostRecord {
        title: Some(r#"The "best" workout"#.to_string()),
        author: Some("Milo \"Coach\"".to_string()),
        ..Default::default()
    };

    let doc = to_markdown_document(&post, &FixedIds("x"), fixed_now());

    assert_eq!(
        frontmatter_line(&doc.content, "title"),
        r#"title: "The \"best\" workout""#
    );
    assert_eq!(
        frontmatter_line(&doc.content, "author"),
        r#"author: "Milo \"Coach\"""#
    );
}

#[test]
fn trailing_backslash_does_not_escape_closing_quote() {
    let post = PostRecord {
        title: Some(r"C:\Users\".to_string()),
        excerpt: Some(r#"say \"hi\""#.to_string()),
        ..Default::default()
    };

    let doc = to_markdown_document(&post, &FixedIds("x"), fixed_now());

    assert_eq!(frontmatter_line(&doc.content, "title"), r#"title: "C:\\Users\\""#);
    assert_eq!(
        frontmatter_line(&doc.content, "excerpt"),
        r#"excerpt: "say \\\"hi\\\"""#
    );
}

#[test]
fn multiline_values_stay_on_one_line() {
    let post = PostRecord {
        excerpt: Some("first\nsecond".to_string()),
        ..Default::default()
    };

    let doc = to_markdown_document(&post, &FixedIds("x"), fixed_now());

    assert_eq!(frontmatter_line(&doc.content, "excerpt"), r#"excerpt: "first second""#);
}

#[test]
fn full_document_layout() {
    let post = PostRecord {
        id: Some("42".to_string()),
        title: Some("Hello".to_string()),
        excerpt: Some("Short".to_string()),
        slug: Some("hello world".to_string()),
        published: Some(true),
        published_at: Some("2024-03-05T10:00:00Z".to_string()),
        tags: Some(TagsInput::List(vec!["x".to_string()])),
        cover_image: Some("https://cdn.example.com/x.png".to_string()),
        author: Some("Milo".to_string()),
        content: Some("  Body text  ".to_string()),
    };

    let doc = to_markdown_document(&post, &FixedIds("unused"), fixed_now());

    let expected = "---\n\
id: \"42\"\n\
title: \"Hello\"\n\
excerpt: \"Short\"\n\
slug: \"2024-03-05-hello-world\"\n\
published: true\n\
publishedAt: \"2024-03-05T10:00:00.000Z\"\n\
tags: [\"x\"]\n\
coverImage: \"https://cdn.example.com/x.png\"\n\
author: \"Milo\"\n\
---\n\
\n\
Body text\n";
    assert_eq!(doc.content, expected);
}

#[test]
fn empty_body_uses_placeholder() {
    let post = PostRecord {
        content: Some("   ".to_string()),
        ..Default::default()
    };

    let doc = to_markdown_document(&post, &FixedIds("x"), fixed_now());

    assert!(doc.content.ends_with(&format!("---\n\n{}\n", EMPTY_BODY)));
    assert_eq!(frontmatter_line(&doc.content, "published"), "published: false");
}

#[test]
fn missing_id_uses_injected_generator() {
    let doc = to_markdown_document(&PostRecord::default(), &FixedIds("fixed-1"), fixed_now());

    assert_eq!(frontmatter_line(&doc.content, "id"), r#"id: "fixed-1""#);
}

#[test]
fn generated_ids_differ_between_exports() {
    let ids = UuidIds;
    let first = export_post(&PostRecord::default(), &ids);
    let second = export_post(&PostRecord::default(), &ids);

    assert_ne!(
        frontmatter_line(&first.content, "id"),
        frontmatter_line(&second.content, "id")
    );
}

#[test]
fn pseudo_random_ids_have_fallback_shape() {
    let ids = PseudoRandomIds::new();
    let first = ids.next_id();
    let second = ids.next_id();

    assert!(first.starts_with("id-"));
    assert!(first[3..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(first, second);
}

#[test]
fn seeded_pseudo_random_ids_are_reproducible() {
    let a = PseudoRandomIds::with_seed(7);
    let b = PseudoRandomIds::with_seed(7);

    assert_eq!(a.next_id(), b.next_id());
    assert_eq!(a.next_id(), b.next_id());
}

#[test]
fn pseudo_random_id_encodes_the_drawn_number_in_base36() {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    let expected: u64 = StdRng::seed_from_u64(42).r#gen();
    let id = PseudoRandomIds::with_seed(42).next_id();

    assert_eq!(u64::from_str_radix(&id[3..], 36).unwrap(), expected);
}

#[test]
fn id_source_parses_from_config_strings() {
    assert_eq!("pseudo".parse::<IdSource>(), Ok(IdSource::Pseudo));
    assert_eq!("UUID".parse::<IdSource>(), Ok(IdSource::Uuid));
    assert!("sequential".parse::<IdSource>().is_err());
    assert!(IdSource::Pseudo.generator().next_id().starts_with("id-"));
}

#[test]
fn timestamps_parse_in_editor_formats() {
    let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();

    assert_eq!(parse_timestamp("2024-03-05T10:00:00Z"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-05T11:00:00+01:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-05T10:00:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-05T10:00:00.000"), Some(expected));
    assert_eq!(
        parse_timestamp("2024-03-05"),
        Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_timestamp("yesterday"), None);
}

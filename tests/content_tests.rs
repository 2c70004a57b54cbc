// tests/content_tests.rs

use milo_cms::models::{
    faq::default_faqs,
    signup::CreateSignupRequest,
    feature::{DEFAULT_ICON, Feature, FeatureCard, default_features},
    settings::{
        AdminSettings, DEFAULT_POSTER, DEFAULT_VIDEO_RATIO, SaveSettingsRequest, SettingsRow,
        SiteSettings, guess_video_mime,
    },
};
use validator::Validate;

#[test]
fn video_mime_follows_extension() {
    assert_eq!(guess_video_mime("https://cdn.example.com/teaser.webm"), "video/webm");
    assert_eq!(guess_video_mime("https://cdn.example.com/teaser.OGV"), "video/ogg");
    assert_eq!(guess_video_mime("/teaser.ogg?v=2"), "video/ogg");
    assert_eq!(guess_video_mime("/teaser.mov?token=a.webm"), "video/quicktime");
    assert_eq!(guess_video_mime("/teaser.mp4"), "video/mp4");
    assert_eq!(guess_video_mime(""), "video/mp4");
}

#[test]
fn site_settings_fall_back_to_defaults() {
    let settings = SiteSettings::from_row(None);

    assert_eq!(settings.brand, "Coach Milo");
    assert_eq!(settings.hero_image_mode, "inline");
    assert_eq!(settings.teaser_video_url, "");
    assert_eq!(settings.teaser_video_poster_url, DEFAULT_POSTER);
    assert_eq!(settings.teaser_video_ratio, DEFAULT_VIDEO_RATIO);
}

#[test]
fn site_settings_prefer_stored_values() {
    let settings = SiteSettings::from_row(Some(SettingsRow {
        id: 1,
        hero_image_mode: Some("url".to_string()),
        hero_image_url: Some("https://cdn.example.com/hero.png".to_string()),
        teaser_video_url: Some(" https://cdn.example.com/teaser.webm ".to_string()),
        teaser_video_poster_url: Some("   ".to_string()),
        teaser_video_ratio: Some("9:16".to_string()),
    }));

    assert_eq!(settings.hero_image_mode, "url");
    assert_eq!(settings.teaser_video_url, "https://cdn.example.com/teaser.webm");
    assert_eq!(settings.teaser_video_mime, "video/webm");
    assert_eq!(settings.teaser_video_poster_url, DEFAULT_POSTER);
    assert_eq!(settings.teaser_video_ratio, "9:16");
}

#[test]
fn admin_settings_merge_row_defaults() {
    let merged = AdminSettings::merge(None);

    assert_eq!(merged.id, 1);
    assert_eq!(merged.hero_image_mode, "url");
    assert_eq!(merged.hero_image_url, "");
    assert_eq!(merged.teaser_video_ratio, DEFAULT_VIDEO_RATIO);
}

#[test]
fn saved_settings_store_empty_urls_as_null() {
    let request: SaveSettingsRequest = serde_json::from_value(serde_json::json!({
        "hero_image_url": "",
        "teaser_video_url": "https://cdn.example.com/teaser.mp4",
        "teaser_video_ratio": ""
    }))
    .unwrap();
    assert!(request.validate().is_ok());

    let row = request.into_row();

    assert_eq!(row.id, 1);
    assert_eq!(row.hero_image_mode.as_deref(), Some("url"));
    assert_eq!(row.hero_image_url, None);
    assert_eq!(row.teaser_video_url.as_deref(), Some("https://cdn.example.com/teaser.mp4"));
    assert_eq!(row.teaser_video_ratio.as_deref(), Some(DEFAULT_VIDEO_RATIO));
}

#[test]
fn saved_settings_reject_relative_urls() {
    let request: SaveSettingsRequest = serde_json::from_value(serde_json::json!({
        "hero_image_url": "not a url"
    }))
    .unwrap();

    assert!(request.validate().is_err());
}

#[test]
fn feature_without_icon_gets_default() {
    let card = FeatureCard::from(Feature {
        id: 7,
        title: "Coach".to_string(),
        body: "Body".to_string(),
        icon: None,
        position: 1,
        published: true,
        created_at: chrono::Utc::now(),
    });

    assert_eq!(card.id, "7");
    assert_eq!(card.icon, DEFAULT_ICON);
}

#[test]
fn built_in_content_is_available() {
    assert_eq!(default_features().len(), 3);
    assert!(default_features().iter().all(|f| !f.icon.is_empty()));
    assert!(!default_faqs().is_empty());
}

#[test]
fn signup_email_is_trimmed_before_validation() {
    let request: CreateSignupRequest = serde_json::from_value(serde_json::json!({
        "email": "  athlete@example.com ",
        "consent": true
    }))
    .unwrap();

    let request = request.normalized();

    assert!(request.validate().is_ok());
    assert_eq!(request.email, "athlete@example.com");
    assert_eq!(request.goal, "Hypertrophie");
}

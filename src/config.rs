// src/config.rs

use std::env;

use dotenvy::dotenv;

use crate::utils::{html::HtmlPolicy, ids::IdSource};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Expected `aud` claim; skipped when unset.
    pub jwt_audience: Option<String>,
    pub rust_log: String,
    pub bind_addr: String,
    pub cors_origins: Vec<String>,
    /// Token role allowed into the admin surface.
    pub admin_role: String,
    /// Optional allowlist of admin emails. Empty means any `admin_role` token.
    pub admin_emails: Vec<String>,
    pub html_policy: HtmlPolicy,
    pub id_source: IdSource,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_audience = env::var("JWT_AUDIENCE").ok().filter(|aud| !aud.is_empty());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:5173".to_string(),
                    "http://127.0.0.1:5173".to_string(),
                ]
            });

        let admin_role = env::var("ADMIN_ROLE")
            .unwrap_or_else(|_| "authenticated".to_string());

        let admin_emails = env::var("ADMIN_EMAILS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let html_policy = env::var("HTML_POLICY")
            .ok()
            .map(|raw| raw.parse().expect("HTML_POLICY must be 'denylist' or 'strict'"))
            .unwrap_or_default();

        let id_source = env::var("EXPORT_ID_SOURCE")
            .ok()
            .map(|raw| raw.parse().expect("EXPORT_ID_SOURCE must be 'uuid' or 'pseudo'"))
            .unwrap_or_default();

        Self {
            database_url,
            jwt_secret,
            jwt_audience,
            rust_log,
            bind_addr,
            cors_origins,
            admin_role,
            admin_emails,
            html_policy,
            id_source,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

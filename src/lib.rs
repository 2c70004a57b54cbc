// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use utils::export::{ExportedDocument, PostRecord, to_markdown_document};
pub use utils::html::sanitize_html;

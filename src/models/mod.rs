// src/models/mod.rs

pub mod faq;
pub mod feature;
pub mod post;
pub mod settings;
pub mod signup;

// src/utils/mod.rs

pub mod export;
pub mod html;
pub mod ids;
pub mod jwt;

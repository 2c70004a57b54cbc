// src/utils/ids.rs

use std::{
    str::FromStr,
    sync::{Arc, Mutex, PoisonError},
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use uuid::Uuid;

/// Source of identifiers for exported documents.
///
/// Injected through `AppState` so tests can supply deterministic ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs from the OS entropy source.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Process-local `id-<base36>` identifiers.
///
/// Only good enough for naming export files, never for uniqueness in storage.
#[derive(Debug)]
pub struct PseudoRandomIds {
    rng: Mutex<StdRng>,
}

impl PseudoRandomIds {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence, for tests and fixtures.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for PseudoRandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for PseudoRandomIds {
    fn next_id(&self) -> String {
        let fragment: u64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .r#gen();
        format!("id-{}", to_base36(fragment))
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Configured choice of [`IdGenerator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdSource {
    #[default]
    Uuid,
    Pseudo,
}

impl IdSource {
    pub fn generator(self) -> Arc<dyn IdGenerator> {
        match self {
            IdSource::Uuid => Arc::new(UuidIds),
            IdSource::Pseudo => Arc::new(PseudoRandomIds::new()),
        }
    }
}

impl FromStr for IdSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" | "" => Ok(IdSource::Uuid),
            "pseudo" => Ok(IdSource::Pseudo),
            other => Err(format!("unknown id source '{}'", other)),
        }
    }
}

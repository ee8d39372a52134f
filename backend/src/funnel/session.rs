use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FunnelError;

pub const STEP1_KEY: &str = "questionnaireStep1";
pub const STEP2_KEY: &str = "questionnaireStep2";

/// Per-browser string key/value storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

pub fn save_step<S, T>(store: &mut S, key: &str, answers: &T) -> Result<(), FunnelError>
where
    S: SessionStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(answers).map_err(|e| FunnelError::Serialization(e.to_string()))?;
    tracing::debug!("Stored {} ({} bytes)", key, raw.len());
    store.set(key, raw);
    Ok(())
}

/// Reads a stored step as a JSON object. A missing entry reads as `{}`, and
/// so does valid JSON that isn't an object. Text that doesn't parse is an
/// error: the submission must not go out without the step's answers.
pub fn load_step<S>(store: &S, key: &str) -> Result<Map<String, Value>, FunnelError>
where
    S: SessionStore + ?Sized,
{
    let Some(raw) = store.get(key) else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => {
            tracing::debug!("Session entry {} holds a non-object ({}), reading it as empty", key, other);
            Ok(Map::new())
        }
        Err(e) => {
            tracing::warn!("Unreadable session entry {}: {}", key, e);
            Err(FunnelError::CorruptStep { key: key.to_string(), reason: e.to_string() })
        }
    }
}

pub fn clear_steps<S>(store: &mut S)
where
    S: SessionStore + ?Sized,
{
    store.remove(STEP1_KEY);
    store.remove(STEP2_KEY);
}

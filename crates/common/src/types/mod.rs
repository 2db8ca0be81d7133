use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform response wrapper: `{"data": ..., "error": "..."}`.
///
/// Both keys are always serialized; `data` is `null` on failure and `error`
/// is the empty string on success.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: String,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self { data: Some(data), error: String::new() }
    }

    pub fn empty() -> Self {
        Self { data: None, error: String::new() }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { data: None, error: msg.into() }
    }
}

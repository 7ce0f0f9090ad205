use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field carrying the identity of an analyzed record.
pub const PRIMARY_KEY_FIELD: &str = "tx_hash";
/// Consulted when the primary field is absent or empty.
pub const FALLBACK_KEY_FIELD: &str = "transaction_hash";

/// One analyzed unit returned by a job. The payload is opaque apart from its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Record {
    payload: Value,
    key: Option<String>,
}

impl Record {
    pub fn new(payload: Value) -> Self {
        let key = key_field(&payload, PRIMARY_KEY_FIELD)
            .or_else(|| key_field(&payload, FALLBACK_KEY_FIELD));
        Self { payload, key }
    }

    /// Identity used for deduplication: primary field first, then the fallback.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Non-empty strings are used as-is, numbers by their decimal form.
fn key_field(payload: &Value, name: &str) -> Option<String> {
    match payload.get(name)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

impl From<Value> for Record {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.payload
    }
}

/// Records returned by one completed job, with the summary the backend attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    pub records: Vec<Record>,
    pub stats: Option<Value>,
}

impl Batch {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: Value) -> Self {
        self.stats = Some(stats);
        self
    }
}

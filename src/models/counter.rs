use serde::{Deserialize, Serialize};

/// Key of the single global counter record.
pub const DEFAULT_COUNTER_KEY: &str = "0";

/// The persisted counter record.
///
/// There is exactly one of these per deployment, addressed by a fixed key.
/// `views` never decreases through this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CounterRecord {
    /// Fixed record identifier (e.g., "0").
    pub id: String,
    /// Total number of recorded views.
    pub views: u64,
}

impl CounterRecord {
    pub fn new(id: impl Into<String>, views: u64) -> Self {
        CounterRecord {
            id: id.into(),
            views,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_id_and_views() {
        let record = CounterRecord::new(DEFAULT_COUNTER_KEY, 7);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "0", "views": 7 }));
    }
}

//! Pre-generated milestone messages.
//!
//! The pregenerated file is a JSON document of already-phrased messages,
//! one per milestone, produced offline so the bot can run without any
//! text-generation API. Each entry keeps the original milestone text it
//! was derived from, which is what renderers use to look a message up.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::milestone::SelectError;

/// One pre-generated message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregeneratedMilestone {
    /// Identifier assigned by the generation run.
    pub id: i64,

    /// Category the source milestone was filed under.
    pub category: String,

    /// The original milestone text this message was derived from.
    pub original: String,

    /// The ready-to-send message.
    pub message: String,
}

/// The parsed pregenerated file: metadata plus all entries, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PregeneratedSet {
    /// Format version stamped by the generation run.
    #[serde(default)]
    pub version: Option<String>,

    /// When the file was generated.
    #[serde(default)]
    pub generated_date: Option<String>,

    /// Entry count claimed by the file.
    #[serde(default)]
    pub total_count: Option<u64>,

    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// The entries themselves.
    #[serde(default)]
    pub milestones: Vec<PregeneratedMilestone>,
}

impl PregeneratedSet {
    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    /// Whether the set holds no entries.
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// All entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &PregeneratedMilestone> {
        self.milestones.iter()
    }

    /// Looks up the pre-generated message for a milestone's original text.
    pub fn message_for(&self, original: &str) -> Option<&str> {
        self.milestones
            .iter()
            .find(|m| m.original == original)
            .map(|m| m.message.as_str())
    }

    /// Entry count per category, in first-seen order.
    pub fn category_stats(&self) -> Vec<(String, usize)> {
        let mut order: Vec<String> = Vec::new();
        for m in &self.milestones {
            if !order.contains(&m.category) {
                order.push(m.category.clone());
            }
        }
        order
            .into_iter()
            .map(|cat| {
                let count = self.milestones.iter().filter(|m| m.category == cat).count();
                (cat, count)
            })
            .collect()
    }

    /// Picks one entry uniformly at random.
    pub fn pick(&self) -> Result<&PregeneratedMilestone, SelectError> {
        if self.milestones.is_empty() {
            return Err(SelectError::Empty);
        }
        let idx = rand::rng().random_range(0..self.milestones.len());
        Ok(&self.milestones[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "version": "1.0",
            "generated_date": "2025-11-02",
            "total_count": 2,
            "description": "test batch",
            "milestones": [
                {"id": 1, "category": "Work", "original": "Shipped the parser", "message": "☀️ You shipped the parser."},
                {"id": 2, "category": "Health", "original": "Ran a 10k", "message": "You ran a whole 10k. 💪"}
            ]
        }"#
    }

    #[test]
    fn test_deserialize_full_file() {
        let set: PregeneratedSet = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.version.as_deref(), Some("1.0"));
        assert_eq!(set.total_count, Some(2));
    }

    #[test]
    fn test_deserialize_missing_metadata() {
        let set: PregeneratedSet = serde_json::from_str(r#"{"milestones": []}"#).unwrap();
        assert!(set.is_empty());
        assert!(set.version.is_none());
    }

    #[test]
    fn test_message_for() {
        let set: PregeneratedSet = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(
            set.message_for("Ran a 10k"),
            Some("You ran a whole 10k. 💪")
        );
        assert_eq!(set.message_for("Never happened"), None);
    }

    #[test]
    fn test_category_stats() {
        let set: PregeneratedSet = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(
            set.category_stats(),
            vec![("Work".to_string(), 1), ("Health".to_string(), 1)]
        );
    }

    #[test]
    fn test_pick_empty_fails() {
        let set = PregeneratedSet::default();
        assert_eq!(set.pick().unwrap_err(), SelectError::Empty);
    }

    #[test]
    fn test_pick_returns_member() {
        let set: PregeneratedSet = serde_json::from_str(sample_json()).unwrap();
        let picked = set.pick().unwrap();
        assert!(set.iter().any(|m| m == picked));
    }
}

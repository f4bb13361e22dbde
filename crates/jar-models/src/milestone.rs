//! Milestone types.
//!
//! A milestone is a single recorded personal achievement with the category
//! it was filed under in the jar file. The [`MilestoneSet`] holds the whole
//! jar in file order and answers selection and stats queries.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when selecting a milestone.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    /// No milestones are available in the (possibly filtered) set.
    #[error("no milestones available")]
    Empty,

    /// The requested category does not exist.
    #[error("category not found: {0}")]
    UnknownCategory(String),
}

/// A single recorded achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// The achievement text, with markers and surrounding whitespace stripped.
    pub text: String,

    /// Category label, taken from the heading the entry appeared under.
    pub category: String,

    /// Line number in the source file, for diagnostics.
    pub line_number: usize,
}

impl Milestone {
    /// Creates a new milestone.
    pub fn new(text: impl Into<String>, category: impl Into<String>, line_number: usize) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            line_number,
        }
    }
}

/// An ordered collection of milestones grouped by category.
///
/// Invariants: every milestone belongs to exactly one category; empty
/// categories are permitted but contribute no entries to selection; entry
/// and category order are stable within a single load, so stats output is
/// deterministic for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilestoneSet {
    milestones: Vec<Milestone>,
    category_order: Vec<String>,
}

impl MilestoneSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category, preserving first-seen order.
    ///
    /// Categories with no entries stay in the listing with a zero count.
    pub fn note_category(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.category_order.contains(&name) {
            self.category_order.push(name);
        }
    }

    /// Adds a milestone, registering its category if needed.
    pub fn push(&mut self, milestone: Milestone) {
        self.note_category(milestone.category.clone());
        self.milestones.push(milestone);
    }

    /// Total number of milestones.
    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    /// Whether the set holds no milestones.
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// All milestones in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Milestone> {
        self.milestones.iter()
    }

    /// Category names in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.category_order
    }

    /// Milestone count per category, in first-seen category order.
    pub fn category_stats(&self) -> Vec<(String, usize)> {
        self.category_order
            .iter()
            .map(|cat| {
                let count = self.milestones.iter().filter(|m| &m.category == cat).count();
                (cat.clone(), count)
            })
            .collect()
    }

    /// Picks one milestone uniformly at random.
    ///
    /// Repeats across calls are accepted behavior; selection has no memory.
    pub fn pick(&self) -> Result<&Milestone, SelectError> {
        Self::pick_uniform(&self.milestones)
    }

    /// Picks uniformly at random within one category.
    pub fn pick_in(&self, category: &str) -> Result<&Milestone, SelectError> {
        if !self.category_order.iter().any(|c| c == category) {
            return Err(SelectError::UnknownCategory(category.to_string()));
        }
        let pool: Vec<&Milestone> = self
            .milestones
            .iter()
            .filter(|m| m.category == category)
            .collect();
        if pool.is_empty() {
            return Err(SelectError::Empty);
        }
        let idx = rand::rng().random_range(0..pool.len());
        Ok(pool[idx])
    }

    /// Picks at random with weights favoring later entries.
    ///
    /// Entry `i` (zero-based) gets weight `i + 1`, so recently appended
    /// milestones surface more often.
    pub fn pick_weighted(&self) -> Result<&Milestone, SelectError> {
        let n = self.milestones.len();
        if n == 0 {
            return Err(SelectError::Empty);
        }
        let total = n * (n + 1) / 2;
        let mut roll = rand::rng().random_range(0..total);
        for (i, milestone) in self.milestones.iter().enumerate() {
            let weight = i + 1;
            if roll < weight {
                return Ok(milestone);
            }
            roll -= weight;
        }
        // Unreachable: the weights sum to `total`.
        Err(SelectError::Empty)
    }

    fn pick_uniform(pool: &[Milestone]) -> Result<&Milestone, SelectError> {
        if pool.is_empty() {
            return Err(SelectError::Empty);
        }
        let idx = rand::rng().random_range(0..pool.len());
        Ok(&pool[idx])
    }
}

impl FromIterator<Milestone> for MilestoneSet {
    fn from_iter<I: IntoIterator<Item = Milestone>>(iter: I) -> Self {
        let mut set = MilestoneSet::new();
        for milestone in iter {
            set.push(milestone);
        }
        set
    }
}

//! Aggregate relevance scores over a set of points.
//!
//! The search prunes with the score of a block as an upper bound for every
//! block refined from it. That only holds when the score cannot grow as
//! points are removed. `Count` and `DistinctKeywords` always are;
//! `TotalScore` is only when every point score is non-negative, and a
//! [`ScoreFunction::Custom`] function must be too. Otherwise the returned
//! areas are no longer guaranteed to be the top-k.

use loci_types::point::Poi;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// Custom score over the member points of a block.
pub type CustomScore = Arc<dyn Fn(&[&Poi]) -> f64 + Send + Sync>;

/// Serializable selector for the built-in score functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    #[default]
    Count,
    DistinctKeywords,
    TotalScore,
}

/// Relevance score of a point list.
#[derive(Clone, Default)]
pub enum ScoreFunction {
    /// Number of points.
    #[default]
    Count,
    /// Size of the union of the points' keyword sets.
    DistinctKeywords,
    /// Sum of the per-point scores. Point scores must be non-negative.
    TotalScore,
    /// Caller-provided aggregate; must be monotone non-increasing under point removal.
    Custom(CustomScore),
}

impl ScoreFunction {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[&Poi]) -> f64 + Send + Sync + 'static,
    {
        ScoreFunction::Custom(Arc::new(f))
    }

    /// Score the points of `points` selected by `members`.
    ///
    /// Indices must be in bounds; out-of-range members are ignored.
    pub fn score(&self, points: &[Poi], members: &[usize]) -> f64 {
        let selected = members.iter().filter_map(|&idx| points.get(idx));
        match self {
            ScoreFunction::Count => selected.count() as f64,
            ScoreFunction::DistinctKeywords => {
                let mut distinct: FxHashSet<&str> = FxHashSet::default();
                for poi in selected {
                    distinct.extend(poi.keywords().iter().map(String::as_str));
                }
                distinct.len() as f64
            }
            ScoreFunction::TotalScore => selected.map(Poi::score).sum(),
            ScoreFunction::Custom(f) => {
                let refs: Vec<&Poi> = selected.collect();
                f(&refs)
            }
        }
    }
}

impl From<ScoreKind> for ScoreFunction {
    fn from(kind: ScoreKind) -> Self {
        match kind {
            ScoreKind::Count => ScoreFunction::Count,
            ScoreKind::DistinctKeywords => ScoreFunction::DistinctKeywords,
            ScoreKind::TotalScore => ScoreFunction::TotalScore,
        }
    }
}

impl fmt::Debug for ScoreFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreFunction::Count => f.write_str("Count"),
            ScoreFunction::DistinctKeywords => f.write_str("DistinctKeywords"),
            ScoreFunction::TotalScore => f.write_str("TotalScore"),
            ScoreFunction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

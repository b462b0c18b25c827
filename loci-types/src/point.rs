use geo::Point;
use serde::{Deserialize, Serialize};

/// A geotagged point of interest.
///
/// Points are created by a loader and are read-only for the search. Keywords
/// are stored lowercased, in first-seen order, without duplicates.
///
/// # Examples
///
/// ```
/// use loci_types::point::Poi;
///
/// let cafe = Poi::new("p1", 23.72, 37.98)
///     .with_name("Cafe")
///     .with_keywords(["Coffee", "wifi", "coffee"])
///     .with_score(4.5);
///
/// assert_eq!(cafe.keywords(), ["coffee", "wifi"]);
/// assert_eq!(cafe.x(), 23.72);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    id: String,
    name: Option<String>,
    keywords: Vec<String>,
    score: f64,
    point: Point<f64>,
}

impl Poi {
    /// Create a point with no name, no keywords and a score of 1.0.
    ///
    /// An empty `id` is replaced by a random UUID.
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        let id = id.into();
        let id = if id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            id
        };

        Self {
            id,
            name: None,
            keywords: Vec::new(),
            score: 1.0,
            point: Point::new(x, y),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the keyword set. Tags are lowercased and deduplicated.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords.clear();
        for keyword in keywords {
            let keyword = keyword.as_ref().to_lowercase();
            if !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn point(&self) -> &Point<f64> {
        &self.point
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.point.x()
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.point.y()
    }
}

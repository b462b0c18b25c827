//! Search and reader configuration.
//!
//! Both configurations are serde-friendly so they can be kept next to the
//! data they describe, as JSON or (with the `toml` feature) TOML.

use crate::score::ScoreKind;
use serde::de::Error;

/// Parameters of a best catchment area search.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Side length of a catchment area, in the units of the point coordinates.
    #[serde(default = "SearchConfig::default_eps")]
    pub eps: f64,

    /// Number of areas to return.
    #[serde(default = "SearchConfig::default_k")]
    pub k: usize,

    /// Require accepted areas to be pairwise disjoint.
    #[serde(default)]
    pub distinct: bool,

    #[serde(default)]
    pub score: ScoreKind,

    /// Decay constant used by the discounted relevance post-pass.
    #[serde(default = "SearchConfig::default_decay_constant")]
    pub decay_constant: f64,

    /// Wall-clock budget for draining the frontier.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
}

impl SearchConfig {
    const fn default_eps() -> f64 {
        0.01
    }

    const fn default_k() -> usize {
        10
    }

    const fn default_decay_constant() -> f64 {
        1.0
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn with_score(mut self, score: ScoreKind) -> Self {
        self.score = score;
        self
    }

    pub fn with_decay_constant(mut self, decay_constant: f64) -> Self {
        self.decay_constant = decay_constant;
        self
    }

    pub fn with_time_limit_ms(mut self, limit: u64) -> Self {
        self.time_limit_ms = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(format!("eps must be a positive number, got {}", self.eps));
        }

        if self.k == 0 {
            return Err("k must be at least 1".to_string());
        }

        if !self.decay_constant.is_finite() || self.decay_constant < 0.0 {
            return Err(format!(
                "decay constant must be non-negative, got {}",
                self.decay_constant
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: SearchConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: SearchConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            eps: Self::default_eps(),
            k: Self::default_k(),
            distinct: false,
            score: ScoreKind::default(),
            decay_constant: Self::default_decay_constant(),
            time_limit_ms: None,
        }
    }
}

/// Column mapping and delimiters for delimited point files.
///
/// Column indices are 1-based, as they appear to a person reading the file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    #[serde(default)]
    pub column_id: Option<usize>,

    #[serde(default)]
    pub column_name: Option<usize>,

    #[serde(default)]
    pub column_keywords: Option<usize>,

    #[serde(default)]
    pub column_score: Option<usize>,

    #[serde(default)]
    pub column_lon: Option<usize>,

    #[serde(default)]
    pub column_lat: Option<usize>,

    #[serde(default = "ReaderConfig::default_delimiter")]
    pub delimiter: String,

    #[serde(default = "ReaderConfig::default_keyword_delimiter")]
    pub keyword_delimiter: String,

    /// Keep only rows sharing at least one of these keywords. Empty disables the filter.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ReaderConfig {
    fn default_delimiter() -> String {
        ",".to_string()
    }

    fn default_keyword_delimiter() -> String {
        ";".to_string()
    }

    /// Configuration reading longitude and latitude from the given columns.
    pub fn new(column_lon: usize, column_lat: usize) -> Self {
        Self {
            column_lon: Some(column_lon),
            column_lat: Some(column_lat),
            ..Self::default()
        }
    }

    pub fn with_id_column(mut self, column: usize) -> Self {
        self.column_id = Some(column);
        self
    }

    pub fn with_name_column(mut self, column: usize) -> Self {
        self.column_name = Some(column);
        self
    }

    pub fn with_keywords_column(mut self, column: usize) -> Self {
        self.column_keywords = Some(column);
        self
    }

    pub fn with_score_column(mut self, column: usize) -> Self {
        self.column_score = Some(column);
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_keyword_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.keyword_delimiter = delimiter.into();
        self
    }

    pub fn with_keyword_filter<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let columns = [
            ("id", self.column_id),
            ("name", self.column_name),
            ("keywords", self.column_keywords),
            ("score", self.column_score),
            ("lon", self.column_lon),
            ("lat", self.column_lat),
        ];
        for (name, column) in columns {
            if column == Some(0) {
                return Err(format!("column_{} is 1-based, got 0", name));
            }
        }

        if self.column_lon.is_none() || self.column_lat.is_none() {
            return Err("longitude and latitude columns are required".to_string());
        }

        if self.delimiter.is_empty() {
            return Err("delimiter must not be empty".to_string());
        }

        if self.keyword_delimiter.is_empty() {
            return Err("keyword delimiter must not be empty".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: ReaderConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: ReaderConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            column_id: None,
            column_name: None,
            column_keywords: None,
            column_score: None,
            column_lon: None,
            column_lat: None,
            delimiter: Self::default_delimiter(),
            keyword_delimiter: Self::default_keyword_delimiter(),
            keywords: Vec::new(),
        }
    }
}

//! Top-k best catchment area search over geotagged points of interest.
//!
//! A catchment area is a fixed-size `eps x eps` window; the search returns the
//! `k` windows with the highest aggregate score (point count, distinct
//! keywords, or summed point scores), optionally pairwise disjoint.
//!
//! ```rust
//! use loci::{Poi, ScoreFunction, discounted_relevance, search};
//!
//! let points = vec![
//!     Poi::new("a", 0.0, 0.0),
//!     Poi::new("b", 1.0, 0.0),
//!     Poi::new("c", 0.0, 1.0),
//!     Poi::new("d", 10.0, 10.0),
//! ];
//!
//! let areas = search(&points, 2.0, 2, ScoreFunction::Count, true)?;
//! assert_eq!(areas[0].score, 3.0);
//!
//! let relevance = discounted_relevance(&areas, 1.0)?;
//! assert_eq!(relevance[0], 1.0);
//! # Ok::<(), loci::LociError>(())
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod io;
pub mod score;
pub mod search;
pub mod spatial;
pub mod utility;

pub use config::{ReaderConfig, SearchConfig};
pub use error::{LociError, Result};
pub use grid::{CellKey, GridIndex};
pub use io::{PointReader, ResultWriter};
pub use score::{ScoreFunction, ScoreKind};
pub use search::{BcaSearch, SearchOutput, SearchStats, search};
pub use utility::discounted_relevance;

pub use loci_types::point::Poi;
pub use loci_types::region::{CatchmentArea, RegionMetadata};

pub use geo::{Point, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{BcaSearch, LociError, Result, SearchConfig};

    pub use crate::{CatchmentArea, Poi, ScoreFunction, ScoreKind};

    pub use crate::{discounted_relevance, search};

    pub use crate::{PointReader, ReaderConfig, ResultWriter};

    pub use geo::{Point, Rect};
}

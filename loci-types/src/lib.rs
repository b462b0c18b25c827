//! # loci-types
//!
//! Plain data types shared by the loci catchment area search:
//!
//! - **Point type**: `Poi`, a geotagged point of interest with keywords and a score
//! - **Result type**: `CatchmentArea`, a ranked fixed-size window with its
//!   `RegionMetadata`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use loci_types::point::Poi;
//!
//! let poi = Poi::new("acropolis", 23.7257, 37.9715).with_keywords(["museum"]);
//! assert_eq!(poi.keywords(), ["museum"]);
//! ```

pub mod point;
pub mod region;

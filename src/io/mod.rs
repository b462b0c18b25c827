//! Text boundary of the search: points in, ranked areas out.

pub mod reader;
pub mod writer;

pub use reader::PointReader;
pub use writer::{ResultWriter, rect_to_wkt};

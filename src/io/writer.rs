//! Delimited text output of ranked areas.

use crate::error::Result;
use geo::Rect;
use loci_types::region::CatchmentArea;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one `id<d>wkt<d>score` line per area, in rank order.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    delimiter: String,
}

impl ResultWriter {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn write_path(&self, areas: &[CatchmentArea], path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to(areas, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, areas: &[CatchmentArea], writer: &mut W) -> Result<()> {
        for area in areas {
            writeln!(
                writer,
                "{}{d}{}{d}{}",
                area.id,
                rect_to_wkt(&area.envelope),
                area.score,
                d = self.delimiter
            )?;
        }
        log::debug!("Wrote {} areas", areas.len());
        Ok(())
    }
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new(",")
    }
}

/// Well-known text polygon of a box, ring starting at the lower-left corner.
///
/// ```rust
/// use loci::Rect;
/// use loci::io::rect_to_wkt;
///
/// let rect = Rect::new((0.0, 0.0), (2.0, 1.5));
/// assert_eq!(rect_to_wkt(&rect), "POLYGON ((0 0, 0 1.5, 2 1.5, 2 0, 0 0))");
/// ```
pub fn rect_to_wkt(rect: &Rect) -> String {
    let (min, max) = (rect.min(), rect.max());
    format!(
        "POLYGON (({x0} {y0}, {x0} {y1}, {x1} {y1}, {x1} {y0}, {x0} {y0}))",
        x0 = min.x,
        y0 = min.y,
        x1 = max.x,
        y1 = max.y
    )
}

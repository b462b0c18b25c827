//! Delimited text point loader.

use crate::config::ReaderConfig;
use crate::error::{LociError, Result};
use loci_types::point::Poi;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Reads points from delimiter-separated lines.
///
/// Rows that cannot be parsed (missing columns, unparsable numbers, no
/// keyword in the allow-list) are skipped; only I/O failures are errors.
///
/// # Examples
///
/// ```rust
/// use loci::config::ReaderConfig;
/// use loci::io::PointReader;
///
/// let data = "a,Cafe,coffee;wifi,23.72,37.98\nb,Bar,beer,oops,37.99\n";
/// let config = ReaderConfig::new(4, 5)
///     .with_id_column(1)
///     .with_name_column(2)
///     .with_keywords_column(3);
///
/// let points = PointReader::new(config).unwrap().read_from(data.as_bytes()).unwrap();
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].keywords(), ["coffee", "wifi"]);
/// ```
#[derive(Debug, Clone)]
pub struct PointReader {
    config: ReaderConfig,
    filter: Vec<String>,
}

impl PointReader {
    /// # Errors
    ///
    /// - `InvalidInput` if the longitude or latitude column is not configured
    /// - `InvalidParameter` for any other invalid configuration value
    pub fn new(config: ReaderConfig) -> Result<Self> {
        if config.column_lon.is_none() || config.column_lat.is_none() {
            return Err(LociError::InvalidInput(
                "longitude and latitude columns are required".to_string(),
            ));
        }
        config.validate().map_err(LociError::InvalidParameter)?;

        let filter = config
            .keywords
            .iter()
            .flat_map(|entry| entry.split(config.keyword_delimiter.as_str()))
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();

        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<Poi>> {
        let file = File::open(path.as_ref())?;
        self.read_from(BufReader::new(file))
    }

    pub fn read_from<R: BufRead>(&self, reader: R) -> Result<Vec<Poi>> {
        let mut points = Vec::new();
        let mut skipped = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    log::debug!("Skipping line {}: {}", line_no + 1, e);
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match self.parse_row(&line, points.len()) {
                Some(poi) => points.push(poi),
                None => {
                    log::debug!("Skipping line {}: {:?}", line_no + 1, line);
                    skipped += 1;
                }
            }
        }

        log::info!("Read {} points, skipped {} rows", points.len(), skipped);
        Ok(points)
    }

    /// Parse one row; `next_id` names the point when no id column is set.
    fn parse_row(&self, line: &str, next_id: usize) -> Option<Poi> {
        let columns: Vec<&str> = line
            .split(self.config.delimiter.as_str())
            .filter(|column| !column.is_empty())
            .collect();
        let column = |index: Option<usize>| field(&columns, index);

        let id = match column(self.config.column_id)? {
            Some(id) => id.to_string(),
            None => next_id.to_string(),
        };
        let name = column(self.config.column_name)?;
        let score = match column(self.config.column_score)? {
            Some(raw) => raw.trim().parse::<f64>().ok()?,
            None => 1.0,
        };
        let keywords: Vec<&str> = match column(self.config.column_keywords)? {
            Some(raw) => raw
                .split(self.config.keyword_delimiter.as_str())
                .filter(|k| !k.is_empty())
                .collect(),
            None => Vec::new(),
        };
        let x = column(self.config.column_lon)??.trim().parse::<f64>().ok()?;
        let y = column(self.config.column_lat)??.trim().parse::<f64>().ok()?;

        if !self.filter.is_empty()
            && !keywords
                .iter()
                .any(|k| self.filter.contains(&k.to_lowercase()))
        {
            return None;
        }

        let mut poi = Poi::new(id, x, y)
            .with_keywords(keywords)
            .with_score(score);
        if let Some(name) = name {
            poi = poi.with_name(name);
        }
        Some(poi)
    }
}

/// `Some(None)` for an unconfigured column, `None` for a configured column
/// missing from the row.
fn field<'l>(columns: &[&'l str], index: Option<usize>) -> Option<Option<&'l str>> {
    match index {
        None => Some(None),
        Some(i) => columns.get(i.checked_sub(1)?).copied().map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> ReaderConfig {
        ReaderConfig::new(5, 6)
            .with_id_column(1)
            .with_name_column(2)
            .with_keywords_column(3)
            .with_score_column(4)
    }

    #[test]
    fn test_requires_coordinates() {
        let mut config = ReaderConfig::new(1, 2);
        config.column_lat = None;
        assert!(matches!(
            PointReader::new(config),
            Err(LociError::InvalidInput(_))
        ));
        assert!(matches!(
            PointReader::new(ReaderConfig::new(1, 2).with_delimiter("")),
            Err(LociError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_reads_all_columns() {
        let data = "p1,Cafe,Coffee;WiFi,4.5,23.72,37.98\n";
        let points = PointReader::new(full_config())
            .unwrap()
            .read_from(data.as_bytes())
            .unwrap();

        assert_eq!(points.len(), 1);
        let p = &points[0];
        assert_eq!(p.id(), "p1");
        assert_eq!(p.name(), Some("Cafe"));
        assert_eq!(p.keywords(), ["coffee", "wifi"]);
        assert_eq!(p.score(), 4.5);
        assert_eq!((p.x(), p.y()), (23.72, 37.98));
    }

    #[test]
    fn test_defaults_without_optional_columns() {
        let data = "1.0,2.0\n3.0,4.0\n";
        let points = PointReader::new(ReaderConfig::new(1, 2))
            .unwrap()
            .read_from(data.as_bytes())
            .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id(), "0");
        assert_eq!(points[1].id(), "1");
        assert_eq!(points[1].name(), None);
        assert!(points[1].keywords().is_empty());
        assert_eq!(points[1].score(), 1.0);
    }

    #[test]
    fn test_skips_malformed_rows() {
        let data = "lon,lat\n1.0,2.0\n3.0\nx,4.0\n5.0,6.0\n";
        let points = PointReader::new(ReaderConfig::new(1, 2))
            .unwrap()
            .read_from(data.as_bytes())
            .unwrap();

        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x(), p.y())).collect();
        assert_eq!(coords, vec![(1.0, 2.0), (5.0, 6.0)]);
        // Generated ids count accepted rows only.
        assert_eq!(points[1].id(), "1");
    }

    #[test]
    fn test_custom_delimiters() {
        let data = "a|bar,pub|10|20\n";
        let config = ReaderConfig::new(3, 4)
            .with_id_column(1)
            .with_keywords_column(2)
            .with_delimiter("|")
            .with_keyword_delimiter(",");
        let points = PointReader::new(config)
            .unwrap()
            .read_from(data.as_bytes())
            .unwrap();

        assert_eq!(points[0].keywords(), ["bar", "pub"]);
        assert_eq!((points[0].x(), points[0].y()), (10.0, 20.0));
    }

    #[test]
    fn test_keyword_filter_is_any_match_case_insensitive() {
        let data = "a,x,museum;art,0,0\nb,x,cafe,0,0\nc,x,ART,0,0\n";
        let config = ReaderConfig::new(4, 5)
            .with_id_column(1)
            .with_keywords_column(3)
            .with_keyword_filter(["Art; theatre"]);
        let points = PointReader::new(config)
            .unwrap()
            .read_from(data.as_bytes())
            .unwrap();

        let ids: Vec<&str> = points.iter().map(Poi::id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_read_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.csv");
        std::fs::write(&path, "a,1.5,2.5\nb,3.5,4.5\n").unwrap();

        let points = PointReader::new(ReaderConfig::new(2, 3).with_id_column(1))
            .unwrap()
            .read_path(&path)
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].id(), "b");

        let missing = PointReader::new(ReaderConfig::new(2, 3))
            .unwrap()
            .read_path(dir.path().join("missing.csv"));
        assert!(matches!(missing, Err(LociError::Io(_))));
    }
}

//! Diversity-discounted relevance of a ranked result list.
//!
//! For the area at rank `i`, let `overlap(i)` be the largest fraction of its
//! envelope covered by any better-ranked area. Its discounted relevance is
//! `score(i) / score(0) * exp(-decay * overlap(i))`, so the first area always
//! scores 1.0 and an area fully covered by a better one keeps `exp(-decay)`
//! of its relative score.

use crate::error::{LociError, Result};
use crate::spatial::{area, intersection_area};
use loci_types::region::CatchmentArea;

/// Discounted relevance of each area in `areas`, in the same order.
///
/// When the top score is zero every relative score is taken as 1.0.
///
/// # Errors
///
/// Returns `InvalidParameter` if `decay_constant` is negative or not finite.
///
/// # Examples
///
/// ```rust
/// use loci::{Poi, ScoreFunction, discounted_relevance, search};
///
/// let points = vec![Poi::new("a", 0.0, 0.0), Poi::new("b", 9.0, 9.0)];
/// let areas = search(&points, 1.0, 2, ScoreFunction::Count, false).unwrap();
///
/// let relevance = discounted_relevance(&areas, 1.0).unwrap();
/// assert_eq!(relevance, vec![1.0, 1.0]);
/// ```
pub fn discounted_relevance(areas: &[CatchmentArea], decay_constant: f64) -> Result<Vec<f64>> {
    if !decay_constant.is_finite() || decay_constant < 0.0 {
        return Err(LociError::InvalidParameter(format!(
            "decay constant must be non-negative, got {}",
            decay_constant
        )));
    }

    let Some(top) = areas.first() else {
        return Ok(Vec::new());
    };
    let max_score = top.score;

    let mut relevance = Vec::with_capacity(areas.len());
    for (i, current) in areas.iter().enumerate() {
        let own_area = area(&current.envelope);
        let max_overlap = if own_area > 0.0 {
            areas[..i]
                .iter()
                .map(|better| intersection_area(&current.envelope, &better.envelope) / own_area)
                .fold(0.0, f64::max)
        } else {
            0.0
        };

        let relative = if max_score != 0.0 {
            current.score / max_score
        } else {
            1.0
        };
        relevance.push(relative * (-decay_constant * max_overlap).exp());
    }

    Ok(relevance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::square_around;
    use geo::Point;
    use loci_types::region::RegionMetadata;

    fn area_at(x: f64, y: f64, side: f64, score: f64) -> CatchmentArea {
        let center = Point::new(x, y);
        CatchmentArea::new(
            format!("{}:{}", x, y),
            center,
            square_around(center, side),
            score,
            RegionMetadata::default(),
        )
    }

    #[test]
    fn test_identical_envelopes_fully_discounted() {
        let areas = vec![area_at(0.0, 0.0, 2.0, 10.0), area_at(0.0, 0.0, 2.0, 10.0)];
        let relevance = discounted_relevance(&areas, 1.0).unwrap();
        assert_eq!(relevance[0], 1.0);
        assert!((relevance[1] - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap_uses_max_over_better_ranks() {
        let areas = vec![
            area_at(0.0, 0.0, 2.0, 8.0),
            area_at(10.0, 0.0, 2.0, 6.0),
            // Half covered by the first area, clear of the second.
            area_at(1.0, 0.0, 2.0, 4.0),
        ];
        let relevance = discounted_relevance(&areas, 2.0).unwrap();
        assert_eq!(relevance[0], 1.0);
        assert!((relevance[1] - 0.75).abs() < 1e-12);
        assert!((relevance[2] - 0.5 * (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_decay_is_relative_score() {
        let areas = vec![area_at(0.0, 0.0, 1.0, 4.0), area_at(0.0, 0.0, 1.0, 2.0)];
        assert_eq!(discounted_relevance(&areas, 0.0).unwrap(), vec![1.0, 0.5]);
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(discounted_relevance(&[], 1.0).unwrap().is_empty());
        assert!(matches!(
            discounted_relevance(&[], -0.5),
            Err(LociError::InvalidParameter(_))
        ));
        assert!(matches!(
            discounted_relevance(&[], f64::NAN),
            Err(LociError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_top_score() {
        let areas = vec![area_at(0.0, 0.0, 1.0, 0.0), area_at(5.0, 5.0, 1.0, 0.0)];
        assert_eq!(discounted_relevance(&areas, 1.0).unwrap(), vec![1.0, 1.0]);
    }
}

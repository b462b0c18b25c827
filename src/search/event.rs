//! Start/end markers of the eps-wide interval around each point on one axis.

use loci_types::point::Poi;
use std::cmp::Ordering;

/// Axis a block is swept along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Sweep along x.
    Horizontal,
    /// Sweep along y.
    Vertical,
    /// Never swept.
    None,
}

impl Orientation {
    /// Coordinate of `poi` on the swept axis, `None` when there is no axis.
    pub fn coordinate(self, poi: &Poi) -> Option<f64> {
        match self {
            Orientation::Horizontal => Some(poi.x()),
            Orientation::Vertical => Some(poi.y()),
            Orientation::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    // Declared first so ends sort before starts at equal coordinates.
    End,
    Start,
}

/// One side of a point's interval on the swept axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepEvent {
    pub position: f64,
    pub kind: EventKind,
    /// Index of the point in the shared point slice.
    pub member: usize,
}

impl SweepEvent {
    /// Ascending position; at equal positions an end precedes a start.
    pub fn order(&self, other: &Self) -> Ordering {
        self.position
            .total_cmp(&other.position)
            .then(self.kind.cmp(&other.kind))
    }
}

/// The `2n` ordered events of `members` along `orientation`.
///
/// Events that compare equal keep the order of `members`. Returns an empty
/// sequence for [`Orientation::None`].
pub fn ordered_events(
    points: &[Poi],
    members: &[usize],
    orientation: Orientation,
    eps: f64,
) -> Vec<SweepEvent> {
    let half = eps / 2.0;
    let mut events = Vec::with_capacity(members.len() * 2);

    for &member in members {
        let Some(center) = points.get(member).and_then(|p| orientation.coordinate(p)) else {
            continue;
        };
        events.push(SweepEvent {
            position: center - half,
            kind: EventKind::Start,
            member,
        });
        events.push(SweepEvent {
            position: center + half,
            kind: EventKind::End,
            member,
        });
    }

    events.sort_by(SweepEvent::order);
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_sorted_end_before_start() {
        // Intervals [-0.5, 0.5] and [0.5, 1.5] touch at 0.5.
        let points = vec![Poi::new("a", 0.0, 0.0), Poi::new("b", 1.0, 0.0)];
        let events = ordered_events(&points, &[0, 1], Orientation::Horizontal, 1.0);

        let summary: Vec<(f64, EventKind, usize)> =
            events.iter().map(|e| (e.position, e.kind, e.member)).collect();
        assert_eq!(
            summary,
            vec![
                (-0.5, EventKind::Start, 0),
                (0.5, EventKind::End, 0),
                (0.5, EventKind::Start, 1),
                (1.5, EventKind::End, 1),
            ]
        );
    }

    #[test]
    fn test_vertical_uses_y() {
        let points = vec![Poi::new("a", 100.0, 3.0)];
        let events = ordered_events(&points, &[0], Orientation::Vertical, 2.0);
        assert_eq!(events[0].position, 2.0);
        assert_eq!(events[1].position, 4.0);
    }

    #[test]
    fn test_ties_keep_member_order() {
        let points = vec![Poi::new("a", 0.0, 0.0), Poi::new("b", 0.0, 0.0)];
        let events = ordered_events(&points, &[1, 0], Orientation::Horizontal, 1.0);
        let members: Vec<usize> = events.iter().map(|e| e.member).collect();
        assert_eq!(members, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_no_orientation_no_events() {
        let points = vec![Poi::new("a", 0.0, 0.0)];
        assert!(ordered_events(&points, &[0], Orientation::None, 1.0).is_empty());
    }
}

//! Candidate blocks: regions in progress between a grid cell and a finished
//! catchment area.
//!
//! A block refines in two ways:
//! - [`Block::sweep`] splits it along its orientation into the maximal windows
//!   whose points all lie within `eps` of each other on that axis, one
//!   refinement level down (cell to slab, slab to region).
//! - [`Block::sub_blocks`] trims one boundary point off either end, keeping
//!   the refinement level.
//!
//! Both rescore the child from its own points. Scores are never updated
//! incrementally since the score function is an arbitrary aggregate.

use super::event::{EventKind, Orientation, ordered_events};
use crate::score::ScoreFunction;
use crate::spatial::envelope_of;
use geo::{Rect, coord};
use loci_types::point::Poi;
use std::cmp::Ordering;

/// Refinement level of a block. Later levels rank higher on score ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockKind {
    Cell,
    Slab,
    Region,
}

impl BlockKind {
    /// The level produced by sweeping a block of this kind.
    pub fn refined(self) -> Self {
        match self {
            BlockKind::Cell => BlockKind::Slab,
            BlockKind::Slab | BlockKind::Region => BlockKind::Region,
        }
    }
}

/// Which boundary trims produced, or may still produce, a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    None,
    /// Trimmed at the end of the member list.
    Backward,
    /// Trimmed at the start of the member list.
    Forward,
    Both,
}

/// Everything a block needs besides its own members.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub points: &'a [Poi],
    pub score: &'a ScoreFunction,
    pub eps: f64,
}

#[derive(Debug, Clone)]
pub struct Block {
    members: Vec<usize>,
    relevance: f64,
    utility: f64,
    envelope: Rect,
    kind: BlockKind,
    orientation: Orientation,
    expansion: Expansion,
    expand_left: usize,
    expand_right: usize,
}

impl Block {
    /// Score `members` and compute their envelope.
    ///
    /// `members` are indices into `ctx.points` and should not be empty; an
    /// empty block gets a zero-area envelope at the origin.
    pub fn new(
        ctx: &BlockContext<'_>,
        members: Vec<usize>,
        kind: BlockKind,
        orientation: Orientation,
        expansion: Expansion,
    ) -> Self {
        debug_assert!(!members.is_empty(), "blocks are built over at least one point");
        let relevance = ctx.score.score(ctx.points, &members);
        let envelope = envelope_of(ctx.points, &members).unwrap_or_else(|| {
            let origin = coord! { x: 0.0, y: 0.0 };
            Rect::new(origin, origin)
        });

        Self {
            members,
            relevance,
            utility: relevance,
            envelope,
            kind,
            orientation,
            expansion,
            expand_left: 0,
            expand_right: 0,
        }
    }

    /// Set how many boundary points may still be trimmed on each side.
    pub fn with_expand(mut self, left: usize, right: usize) -> Self {
        self.expand_left = left;
        self.expand_right = right;
        self
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn relevance(&self) -> f64 {
        self.relevance
    }

    pub fn utility(&self) -> f64 {
        self.utility
    }

    pub fn envelope(&self) -> &Rect {
        &self.envelope
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    pub fn expand_left(&self) -> usize {
        self.expand_left
    }

    pub fn expand_right(&self) -> usize {
        self.expand_right
    }

    /// Whether [`Block::sub_blocks`] would produce anything.
    pub fn can_trim(&self) -> bool {
        self.members.len() > 1 && (self.expand_left > 0 || self.expand_right > 0)
    }

    /// Split the block into the maximal windows along its orientation.
    ///
    /// Each child holds the points active when the first interval of a run
    /// closes. Its left counter is the number of points that opened since the
    /// previous child, its right counter the number that closed before the
    /// next one opened.
    pub fn sweep(&self, ctx: &BlockContext<'_>) -> Vec<Block> {
        let events = ordered_events(ctx.points, &self.members, self.orientation, ctx.eps);
        let child_kind = self.kind.refined();

        let mut blocks = Vec::new();
        let mut active: Vec<usize> = Vec::with_capacity(self.members.len());
        let mut pending: Option<Block> = None;
        let mut opening = true;
        let (mut expand_left, mut expand_right) = (0, 0);

        for event in events {
            match event.kind {
                EventKind::Start => {
                    if !opening {
                        if let Some(block) = pending.take() {
                            blocks.push(block.with_right(expand_right));
                        }
                        expand_right = 0;
                    }
                    active.push(event.member);
                    expand_left += 1;
                    opening = true;
                }
                EventKind::End => {
                    if opening {
                        let block = Block::new(
                            ctx,
                            active.clone(),
                            child_kind,
                            Orientation::Horizontal,
                            Expansion::Both,
                        )
                        .with_expand(expand_left, 0);
                        pending = Some(block);
                        expand_left = 0;
                    }
                    if let Some(pos) = active.iter().position(|&m| m == event.member) {
                        active.remove(pos);
                    }
                    expand_right += 1;
                    opening = false;
                }
            }
        }

        if let Some(block) = pending {
            blocks.push(block.with_right(expand_right));
        }

        blocks
    }

    fn with_right(mut self, right: usize) -> Self {
        self.expand_right = right;
        self
    }

    /// Children with one boundary point trimmed.
    ///
    /// The left child drops the last member and the right child the first,
    /// each spending one unit of the matching counter.
    pub fn sub_blocks(&self, ctx: &BlockContext<'_>) -> Vec<Block> {
        if self.members.len() < 2 {
            return Vec::new();
        }

        let mut derived = Vec::with_capacity(2);

        if self.expand_left > 0 {
            let members = self.members[..self.members.len() - 1].to_vec();
            derived.push(
                Block::new(ctx, members, self.kind, self.orientation, Expansion::Backward)
                    .with_expand(self.expand_left - 1, 0),
            );
        }

        if self.expand_right > 0 {
            let members = self.members[1..].to_vec();
            derived.push(
                Block::new(ctx, members, self.kind, self.orientation, Expansion::Forward)
                    .with_expand(0, self.expand_right - 1),
            );
        }

        derived
    }

    /// Priority order: higher utility first, then the more refined kind.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        self.utility
            .total_cmp(&other.utility)
            .then(self.kind.cmp(&other.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pois(coords: &[(f64, f64)]) -> Vec<Poi> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Poi::new(format!("p{}", i), x, y))
            .collect()
    }

    fn ctx<'a>(points: &'a [Poi], score: &'a ScoreFunction, eps: f64) -> BlockContext<'a> {
        BlockContext { points, score, eps }
    }

    fn sorted(mut members: Vec<usize>) -> Vec<usize> {
        members.sort_unstable();
        members
    }

    #[test]
    fn test_new_scores_and_envelope() {
        let points = pois(&[(0.0, 0.0), (2.0, 1.0), (1.0, 3.0)]);
        let score = ScoreFunction::Count;
        let c = ctx(&points, &score, 1.0);
        let block = Block::new(
            &c,
            vec![0, 1, 2],
            BlockKind::Cell,
            Orientation::Vertical,
            Expansion::None,
        );

        assert_eq!(block.relevance(), 3.0);
        assert_eq!(block.utility(), 3.0);
        assert_eq!(
            *block.envelope(),
            Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 2.0, y: 3.0 })
        );
        assert_eq!((block.expand_left(), block.expand_right()), (0, 0));
        assert!(!block.can_trim());
    }

    #[test]
    fn test_sweep_separates_disjoint_groups() {
        // Two clusters along x with a gap wider than eps.
        let points = pois(&[(0.0, 0.0), (0.5, 0.0), (5.0, 0.0), (5.2, 0.0)]);
        let score = ScoreFunction::Count;
        let c = ctx(&points, &score, 1.0);
        let slab = Block::new(
            &c,
            vec![0, 1, 2, 3],
            BlockKind::Slab,
            Orientation::Horizontal,
            Expansion::Both,
        );

        let regions = slab.sweep(&c);
        assert_eq!(regions.len(), 2);
        assert_eq!(sorted(regions[0].members().to_vec()), vec![0, 1]);
        assert_eq!(sorted(regions[1].members().to_vec()), vec![2, 3]);
        for region in &regions {
            assert_eq!(region.kind(), BlockKind::Region);
            assert_eq!(region.orientation(), Orientation::Horizontal);
            assert_eq!(region.expansion(), Expansion::Both);
            assert_eq!((region.expand_left(), region.expand_right()), (2, 2));
        }
    }

    #[test]
    fn test_sweep_chain_emits_overlapping_windows() {
        // 0 overlaps 1, 1 overlaps 2, 0 and 2 do not overlap.
        let points = pois(&[(0.0, 0.0), (0.8, 0.0), (1.6, 0.0)]);
        let score = ScoreFunction::Count;
        let c = ctx(&points, &score, 1.0);
        let slab = Block::new(
            &c,
            vec![0, 1, 2],
            BlockKind::Slab,
            Orientation::Horizontal,
            Expansion::Both,
        );

        let regions = slab.sweep(&c);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].members(), &[0, 1]);
        assert_eq!((regions[0].expand_left(), regions[0].expand_right()), (2, 1));
        assert_eq!(regions[1].members(), &[1, 2]);
        assert_eq!((regions[1].expand_left(), regions[1].expand_right()), (1, 2));
    }

    #[test]
    fn test_sweep_covers_every_point() {
        let points = pois(&[(0.0, 0.3), (0.1, 2.0), (0.2, 2.4), (0.0, 7.0), (0.3, 0.9)]);
        let score = ScoreFunction::Count;
        let c = ctx(&points, &score, 1.0);
        let cell = Block::new(
            &c,
            vec![0, 1, 2, 3, 4],
            BlockKind::Cell,
            Orientation::Vertical,
            Expansion::None,
        );

        let slabs = cell.sweep(&c);
        let mut covered: Vec<usize> = slabs.iter().flat_map(|b| b.members().to_vec()).collect();
        covered.sort_unstable();
        covered.dedup();
        assert_eq!(covered, vec![0, 1, 2, 3, 4]);

        for slab in &slabs {
            assert_eq!(slab.kind(), BlockKind::Slab);
            for &a in slab.members() {
                for &b in slab.members() {
                    assert!((points[a].y() - points[b].y()).abs() <= 1.0);
                }
            }
        }
    }

    #[test]
    fn test_sweep_single_point() {
        let points = pois(&[(4.0, 4.0)]);
        let score = ScoreFunction::Count;
        let c = ctx(&points, &score, 2.0);
        let cell = Block::new(&c, vec![0], BlockKind::Cell, Orientation::Vertical, Expansion::None);

        let slabs = cell.sweep(&c);
        assert_eq!(slabs.len(), 1);
        assert_eq!(slabs[0].members(), &[0]);
        assert_eq!((slabs[0].expand_left(), slabs[0].expand_right()), (1, 1));
        assert!(!slabs[0].can_trim());
    }

    #[test]
    fn test_sub_blocks_both_sides() {
        let points = pois(&[(0.0, 0.0), (0.1, 0.0), (0.2, 0.0)]);
        let score = ScoreFunction::Count;
        let c = ctx(&points, &score, 1.0);
        let block = Block::new(
            &c,
            vec![0, 1, 2],
            BlockKind::Region,
            Orientation::Horizontal,
            Expansion::Both,
        )
        .with_expand(2, 3);

        let children = block.sub_blocks(&c);
        assert_eq!(children.len(), 2);

        assert_eq!(children[0].members(), &[0, 1]);
        assert_eq!(children[0].expansion(), Expansion::Backward);
        assert_eq!((children[0].expand_left(), children[0].expand_right()), (1, 0));

        assert_eq!(children[1].members(), &[1, 2]);
        assert_eq!(children[1].expansion(), Expansion::Forward);
        assert_eq!((children[1].expand_left(), children[1].expand_right()), (0, 2));

        for child in &children {
            assert_eq!(child.kind(), BlockKind::Region);
            assert_eq!(child.relevance(), 2.0);
        }
    }

    #[test]
    fn test_sub_blocks_one_side_or_none() {
        let points = pois(&[(0.0, 0.0), (0.1, 0.0)]);
        let score = ScoreFunction::Count;
        let c = ctx(&points, &score, 1.0);
        let base = Block::new(
            &c,
            vec![0, 1],
            BlockKind::Slab,
            Orientation::Horizontal,
            Expansion::Both,
        );

        let left_only = base.clone().with_expand(1, 0).sub_blocks(&c);
        assert_eq!(left_only.len(), 1);
        assert_eq!(left_only[0].members(), &[0]);

        let right_only = base.clone().with_expand(0, 1).sub_blocks(&c);
        assert_eq!(right_only.len(), 1);
        assert_eq!(right_only[0].members(), &[1]);

        assert!(base.sub_blocks(&c).is_empty());
    }

    #[test]
    fn test_sub_blocks_rescore_from_scratch() {
        let points = vec![
            Poi::new("a", 0.0, 0.0).with_keywords(["x", "y"]),
            Poi::new("b", 0.1, 0.0).with_keywords(["x"]),
            Poi::new("c", 0.2, 0.0).with_keywords(["z"]),
        ];
        let score = ScoreFunction::DistinctKeywords;
        let c = ctx(&points, &score, 1.0);
        let block = Block::new(
            &c,
            vec![0, 1, 2],
            BlockKind::Region,
            Orientation::Horizontal,
            Expansion::Both,
        )
        .with_expand(1, 1);
        assert_eq!(block.relevance(), 3.0);

        let children = block.sub_blocks(&c);
        assert_eq!(children[0].relevance(), 2.0);
        assert_eq!(children[1].relevance(), 2.0);
        assert!(children.iter().all(|b| b.relevance() <= block.relevance()));
    }

    #[test]
    fn test_priority_prefers_score_then_kind() {
        let points = pois(&[(0.0, 0.0), (0.1, 0.0)]);
        let score = ScoreFunction::Count;
        let c = ctx(&points, &score, 1.0);
        let cell = Block::new(
            &c,
            vec![0, 1],
            BlockKind::Cell,
            Orientation::Vertical,
            Expansion::None,
        );
        let region = Block::new(
            &c,
            vec![0, 1],
            BlockKind::Region,
            Orientation::Horizontal,
            Expansion::Both,
        );
        let small = Block::new(
            &c,
            vec![0],
            BlockKind::Region,
            Orientation::Horizontal,
            Expansion::Both,
        );

        assert_eq!(region.priority_cmp(&cell), Ordering::Greater);
        assert_eq!(cell.priority_cmp(&small), Ordering::Greater);
        assert_eq!(region.priority_cmp(&region.clone()), Ordering::Equal);
    }
}

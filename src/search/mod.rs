//! Best-first branch-and-bound search for the top-k catchment areas.
//!
//! # Algorithm
//!
//! 1. Index the points in a grid with cells of side `eps`
//! 2. For every occupied cell, bound every window holding one of its points
//!    by the points of the cell footprint grown by `eps`, and queue that block
//! 3. Pop the best block:
//!    - a cell or slab is swept one level down and its children queued
//!    - a finished region is accepted (or rejected in distinct mode)
//!    - slabs and regions additionally queue their boundary-trimmed variants
//! 4. Stop once `k` areas are accepted or the frontier runs dry
//!
//! The score of a block bounds the score of everything refined from it as long
//! as the score function is monotone non-increasing under point removal, so
//! the accepted regions come out in rank order and are the true top-k.

pub mod block;
pub mod event;
pub mod frontier;

use crate::config::SearchConfig;
use crate::error::{LociError, Result};
use crate::grid::GridIndex;
use crate::score::ScoreFunction;
use crate::spatial::{boxes_intersect, square_around};
use block::{Block, BlockContext, BlockKind, Expansion};
use event::Orientation;
use frontier::Frontier;
use geo::Point;
use loci_types::point::Poi;
use loci_types::region::{CatchmentArea, RegionMetadata};
use std::time::{Duration, Instant};

/// Frontier size, per input point, above which a warning is logged once.
const FRONTIER_WARN_FACTOR: usize = 64;

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Non-empty grid cells, i.e. blocks seeded into the frontier.
    pub occupied_cells: usize,
    pub blocks_popped: usize,
    /// Cells and slabs that were swept.
    pub blocks_swept: usize,
    /// Blocks whose boundary-trimmed variants were queued.
    pub blocks_trimmed: usize,
    /// Regions discarded because they overlapped an accepted area.
    pub candidates_rejected: usize,
    pub peak_frontier: usize,
    /// The time limit expired before the search finished.
    pub timed_out: bool,
}

/// Ranked areas plus the statistics of the run that produced them.
#[derive(Debug, Clone)]
pub struct SearchOutput {
    pub areas: Vec<CatchmentArea>,
    pub stats: SearchStats,
}

/// A configured best catchment area search.
///
/// # Examples
///
/// ```rust
/// use loci::{BcaSearch, Poi, ScoreFunction};
///
/// let points = vec![
///     Poi::new("a", 0.0, 0.0),
///     Poi::new("b", 1.0, 0.0),
///     Poi::new("c", 0.0, 1.0),
///     Poi::new("far", 10.0, 10.0),
/// ];
///
/// let output = BcaSearch::new(2.0, 1)
///     .with_score(ScoreFunction::Count)
///     .run(&points)
///     .unwrap();
///
/// assert_eq!(output.areas.len(), 1);
/// assert_eq!(output.areas[0].score, 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct BcaSearch {
    eps: f64,
    k: usize,
    distinct: bool,
    score: ScoreFunction,
    time_limit: Option<Duration>,
}

impl BcaSearch {
    /// Search for the `k` best windows of side `eps`, scored by point count.
    pub fn new(eps: f64, k: usize) -> Self {
        Self {
            eps,
            k,
            distinct: false,
            score: ScoreFunction::Count,
            time_limit: None,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        let mut search = Self::new(config.eps, config.k)
            .with_distinct(config.distinct)
            .with_score(config.score.into());
        if let Some(ms) = config.time_limit_ms {
            search = search.with_time_limit(Duration::from_millis(ms));
        }
        search
    }

    pub fn with_score(mut self, score: ScoreFunction) -> Self {
        self.score = score;
        self
    }

    /// Only accept areas that do not intersect an already accepted one.
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Stop draining the frontier after `limit` and return what was accepted.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn distinct(&self) -> bool {
        self.distinct
    }

    pub fn score_function(&self) -> &ScoreFunction {
        &self.score
    }

    fn validate(&self, points: &[Poi]) -> Result<()> {
        if points.is_empty() {
            return Err(LociError::InvalidInput(
                "cannot search an empty point set".to_string(),
            ));
        }
        if !self.eps.is_finite() || self.eps <= 0.0 {
            return Err(LociError::InvalidParameter(format!(
                "eps must be a positive number, got {}",
                self.eps
            )));
        }
        if self.k == 0 {
            return Err(LociError::InvalidParameter(
                "k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Run the search over `points`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty point set or coordinates the grid cannot index
    /// - `InvalidParameter` if `eps` is not positive or `k` is zero
    pub fn run(&self, points: &[Poi]) -> Result<SearchOutput> {
        self.validate(points)?;
        let started = Instant::now();

        let grid = GridIndex::build(points, self.eps)?;
        log::debug!(
            "Grid with {} cells built in {:?}",
            grid.cell_count(),
            started.elapsed()
        );

        let ctx = BlockContext {
            points,
            score: &self.score,
            eps: self.eps,
        };

        let queue_start = Instant::now();
        let mut frontier = self.init_frontier(&grid, &ctx);
        log::debug!(
            "Frontier initialised with {} blocks in {:?}",
            frontier.len(),
            queue_start.elapsed()
        );

        let mut stats = SearchStats {
            occupied_cells: grid.cell_count(),
            ..SearchStats::default()
        };

        let drain_start = Instant::now();
        let areas = self.drain(&mut frontier, &ctx, started, &mut stats);
        stats.peak_frontier = frontier.peak();

        log::debug!("Frontier drained in {:?}", drain_start.elapsed());
        log::info!(
            "Accepted {} of {} areas: {} popped, {} swept, {} rejected, peak frontier {}",
            areas.len(),
            self.k,
            stats.blocks_popped,
            stats.blocks_swept,
            stats.candidates_rejected,
            stats.peak_frontier
        );

        Ok(SearchOutput { areas, stats })
    }

    /// One vertical cell block per occupied cell, over the points that any
    /// eps-window holding a point of the cell could contain.
    ///
    /// The margin is a full `eps`: with `eps / 2` two points on either side
    /// of an empty cell's corner never share a seed.
    fn init_frontier(&self, grid: &GridIndex<'_>, ctx: &BlockContext<'_>) -> Frontier {
        let mut frontier = Frontier::new();
        for cell in grid.cells() {
            let members = grid.points_near_cell(cell, self.eps);
            if members.is_empty() {
                continue;
            }
            frontier.push(Block::new(
                ctx,
                members,
                BlockKind::Cell,
                Orientation::Vertical,
                Expansion::None,
            ));
        }
        frontier
    }

    fn drain(
        &self,
        frontier: &mut Frontier,
        ctx: &BlockContext<'_>,
        started: Instant,
        stats: &mut SearchStats,
    ) -> Vec<CatchmentArea> {
        let mut areas: Vec<CatchmentArea> = Vec::with_capacity(self.k);
        let warn_size = ctx.points.len().saturating_mul(FRONTIER_WARN_FACTOR);
        let mut warned = false;

        while areas.len() < self.k {
            if let Some(limit) = self.time_limit
                && started.elapsed() >= limit
            {
                log::warn!(
                    "Search time limit of {:?} reached with {} of {} areas accepted",
                    limit,
                    areas.len(),
                    self.k
                );
                stats.timed_out = true;
                break;
            }

            let Some(block) = frontier.pop() else {
                break;
            };
            stats.blocks_popped += 1;

            if block.kind() == BlockKind::Region {
                match self.accept(&block, ctx.points, &areas, started) {
                    Some(area) => areas.push(area),
                    None => stats.candidates_rejected += 1,
                }
            } else {
                frontier.extend(block.sweep(ctx));
                stats.blocks_swept += 1;
            }

            if block.kind() != BlockKind::Cell && block.can_trim() {
                frontier.extend(block.sub_blocks(ctx));
                stats.blocks_trimmed += 1;
            }

            if !warned && frontier.len() > warn_size {
                log::warn!(
                    "Frontier grew to {} blocks for {} points; a smaller eps bounds its growth",
                    frontier.len(),
                    ctx.points.len()
                );
                warned = true;
            }
        }

        areas
    }

    /// Turn a finished region into an area, or `None` if distinct mode rejects it.
    fn accept(
        &self,
        block: &Block,
        points: &[Poi],
        accepted: &[CatchmentArea],
        started: Instant,
    ) -> Option<CatchmentArea> {
        let center = block.envelope().center();
        let square = square_around(Point::from(center), self.eps);

        if self.distinct
            && accepted
                .iter()
                .any(|area| boxes_intersect(&square, &area.envelope))
        {
            return None;
        }

        let covered_points = block
            .members()
            .iter()
            .filter_map(|&idx| points.get(idx).cloned())
            .collect();
        let elapsed_millis = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        Some(CatchmentArea::new(
            format!("{}:{}", center.x, center.y),
            Point::from(center),
            square,
            block.utility(),
            RegionMetadata {
                covered_points,
                elapsed_millis,
            },
        ))
    }
}

/// Find the `k` best catchment areas of side `eps` over `points`.
///
/// Shorthand for [`BcaSearch::run`] that keeps only the ranked areas. Fewer
/// than `k` areas are returned when the frontier is exhausted first.
pub fn search(
    points: &[Poi],
    eps: f64,
    k: usize,
    score: ScoreFunction,
    distinct: bool,
) -> Result<Vec<CatchmentArea>> {
    let output = BcaSearch::new(eps, k)
        .with_score(score)
        .with_distinct(distinct)
        .run(points)?;
    Ok(output.areas)
}

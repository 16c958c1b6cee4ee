//! Composite layout score: overlap penalties, wall proximity and walkability.

use crate::config::FitnessModel;
use crate::error::{LayoutError, Result};
use crate::room::{Arrangement, Obstacle, Rect, RoomBounds};

/// Binary occupancy raster of the room floor
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    resolution: f64,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Empty grid with `floor(width * resolution)` rows and `floor(length * resolution)` columns
    pub fn new(room: &RoomBounds, resolution: f64) -> Self {
        let rows = (room.width * resolution).floor() as usize;
        let cols = (room.length * resolution).floor() as usize;
        Self {
            rows,
            cols,
            resolution,
            cells: vec![false; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell index of a coordinate, clamped to `0..=limit`
    fn index(&self, coordinate: f64, limit: usize) -> usize {
        // float-to-int casts saturate, so negatives land on 0
        ((coordinate * self.resolution).floor() as usize).min(limit)
    }

    /// Mark every cell covered by the rectangle as occupied
    pub fn mark(&mut self, rect: &Rect) {
        let x1 = self.index(rect.x_min, self.cols);
        let x2 = self.index(rect.x_max, self.cols);
        let y1 = self.index(rect.y_min, self.rows);
        let y2 = self.index(rect.y_max, self.rows);
        for row in y1..y2 {
            let start = row * self.cols;
            self.cells[start + x1..start + x2.max(x1)].fill(true);
        }
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Fraction of unoccupied cells; a grid without cells reports 0
    pub fn free_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let free = self.cells.iter().filter(|&&occupied| !occupied).count();
        free as f64 / self.cells.len() as f64
    }
}

/// Fraction of the floor left free by obstacles and items at the given resolution
pub fn walkability(room: &RoomBounds, obstacles: &[Obstacle], arrangement: &Arrangement, resolution: f64) -> f64 {
    let mut grid = OccupancyGrid::new(room, resolution);
    for obstacle in obstacles {
        grid.mark(&obstacle.footprint());
    }
    for item in arrangement.iter() {
        grid.mark(&item.footprint());
    }
    grid.free_fraction()
}

/// Number of unordered item pairs whose footprints overlap
pub fn count_item_overlaps(arrangement: &Arrangement) -> usize {
    let rects: Vec<Rect> = arrangement.iter().map(|item| item.footprint()).collect();
    let mut count = 0;
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].overlaps(&rects[j]) {
                count += 1;
            }
        }
    }
    count
}

/// Per-term view of a score, for display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessBreakdown {
    pub obstacle_overlaps: usize,
    pub item_overlaps: usize,
    pub items_against_wall: usize,
    pub walkability: f64,
    pub score: f64,
}

/// Scores arrangements against a fixed room and obstacle set
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    room: RoomBounds,
    obstacles: Vec<Obstacle>,
    model: FitnessModel,
}

impl FitnessEvaluator {
    pub fn new(room: RoomBounds, obstacles: Vec<Obstacle>, model: FitnessModel) -> Result<Self> {
        room.validate()?;
        if !(model.grid_resolution.is_finite() && model.grid_resolution > 0.0) {
            return Err(LayoutError::InvalidResolution(model.grid_resolution));
        }
        Ok(Self { room, obstacles, model })
    }

    pub fn room(&self) -> &RoomBounds {
        &self.room
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn model(&self) -> &FitnessModel {
        &self.model
    }

    /// Non-negative score of one arrangement; higher is better
    pub fn evaluate(&self, arrangement: &Arrangement) -> f64 {
        self.breakdown(arrangement).score
    }

    pub fn breakdown(&self, arrangement: &Arrangement) -> FitnessBreakdown {
        let model = &self.model;
        let mut score = model.baseline;

        let obstacle_rects: Vec<Rect> = self.obstacles.iter().map(Obstacle::footprint).collect();
        let mut obstacle_overlaps = 0;
        for item in arrangement.iter() {
            let rect = item.footprint();
            obstacle_overlaps += obstacle_rects.iter().filter(|o| rect.overlaps(o)).count();
        }
        score -= obstacle_overlaps as f64 * model.obstacle_penalty;

        let item_overlaps = count_item_overlaps(arrangement);
        score -= item_overlaps as f64 * model.overlap_penalty;

        let items_against_wall = arrangement
            .iter()
            .filter(|item| item.min_wall_distance(&self.room) < model.wall_threshold)
            .count();
        score += items_against_wall as f64 * model.wall_reward;

        let walkability = walkability(&self.room, &self.obstacles, arrangement, model.grid_resolution);
        score += walkability * model.walkability_weight;

        FitnessBreakdown {
            obstacle_overlaps,
            item_overlaps,
            items_against_wall,
            walkability,
            score: score.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{CatalogItem, PlaceableItem};

    fn placed(name: &str, width: f64, length: f64, x: f64, y: f64) -> PlaceableItem {
        let mut item = PlaceableItem::from_catalog(&CatalogItem::new(name, width, length));
        item.set_position(x, y);
        item
    }

    fn evaluator(length: f64, width: f64, obstacles: Vec<Obstacle>, resolution: f64) -> FitnessEvaluator {
        let model = FitnessModel {
            grid_resolution: resolution,
            ..FitnessModel::default()
        };
        FitnessEvaluator::new(RoomBounds::new(length, width), obstacles, model).unwrap()
    }

    #[test]
    fn fully_covered_unit_room() {
        let eval = evaluator(1.0, 1.0, vec![], 1.0);
        let arrangement = Arrangement::new(vec![placed("Box", 1.0, 1.0, 0.0, 0.0)]);
        let breakdown = eval.breakdown(&arrangement);
        assert_eq!(breakdown.walkability, 0.0);
        assert_eq!(breakdown.items_against_wall, 1);
        assert_eq!(breakdown.score, 105.0);
    }

    #[test]
    fn empty_room_scores_baseline_plus_full_walkability() {
        let eval = evaluator(5.0, 4.0, vec![], 20.0);
        assert_eq!(eval.evaluate(&Arrangement::default()), 130.0);
    }

    #[test]
    fn full_overlap_scores_lower_than_separated() {
        let eval = evaluator(5.0, 4.0, vec![], 20.0);
        let apart = Arrangement::new(vec![
            placed("Chair", 0.5, 0.5, 1.0, 1.0),
            placed("Chair", 0.5, 0.5, 3.0, 1.0),
        ]);
        let stacked = Arrangement::new(vec![
            placed("Chair", 0.5, 0.5, 1.0, 1.0),
            placed("Chair", 0.5, 0.5, 1.0, 1.0),
        ]);
        assert_eq!(count_item_overlaps(&stacked), 1);
        assert!(eval.evaluate(&stacked) < eval.evaluate(&apart));
    }

    #[test]
    fn obstacle_penalties_stack_per_pair() {
        let obstacles = vec![
            Obstacle::new("Door", 0.0, 0.0, 1.0, 1.0),
            Obstacle::new("Window", 0.5, 0.5, 1.0, 1.0),
        ];
        let eval = evaluator(5.0, 4.0, obstacles, 20.0);
        let arrangement = Arrangement::new(vec![
            placed("Chair", 1.0, 1.0, 0.5, 0.5),
            placed("Chair", 1.0, 1.0, 0.6, 0.6),
        ]);
        let breakdown = eval.breakdown(&arrangement);
        assert_eq!(breakdown.obstacle_overlaps, 4);
        assert_eq!(breakdown.item_overlaps, 1);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let eval = evaluator(2.0, 2.0, vec![], 20.0);
        let items = (0..8).map(|_| placed("Chair", 0.5, 0.5, 0.7, 0.7)).collect();
        let arrangement = Arrangement::new(items);
        // 28 overlapping pairs outweigh the baseline
        assert_eq!(eval.evaluate(&arrangement), 0.0);
    }

    #[test]
    fn rasterization_clamps_far_edges() {
        let room = RoomBounds::new(1.0, 1.0);
        let mut grid = OccupancyGrid::new(&room, 10.0);
        grid.mark(&Rect::new(0.95, 0.95, 1.5, 1.5));
        grid.mark(&Rect::new(-0.5, -0.5, 0.15, 0.15));
        assert!(grid.is_occupied(9, 9));
        assert!(grid.is_occupied(0, 0));
        assert_eq!(grid.free_fraction(), 0.98);
    }

    #[test]
    fn repeated_marks_are_idempotent() {
        let room = RoomBounds::new(2.0, 2.0);
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        let mut once = OccupancyGrid::new(&room, 4.0);
        once.mark(&rect);
        let mut twice = once.clone();
        twice.mark(&rect);
        assert_eq!(once.free_fraction(), twice.free_fraction());
        assert_eq!(once.free_fraction(), 0.75);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let eval = evaluator(5.0, 4.0, vec![Obstacle::new("Door", 2.0, 0.0, 0.9, 0.2)], 20.0);
        let arrangement = Arrangement::new(vec![
            placed("Sofa", 0.9, 2.2, 0.3, 1.7),
            placed("Bed", 1.5, 2.0, 2.1, 0.13),
        ]);
        assert_eq!(eval.evaluate(&arrangement).to_bits(), eval.evaluate(&arrangement).to_bits());
    }

    #[test]
    fn rejects_zero_resolution() {
        let model = FitnessModel {
            grid_resolution: 0.0,
            ..FitnessModel::default()
        };
        let result = FitnessEvaluator::new(RoomBounds::new(1.0, 1.0), vec![], model);
        assert!(matches!(result, Err(LayoutError::InvalidResolution(_))));
    }
}

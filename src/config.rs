/// Configuration constants for the layout optimizer and viewer

use serde::{Deserialize, Serialize};

// ============================================================================
// GA DEFAULTS
// ============================================================================

/// Number of arrangements in every generation
pub const DEFAULT_POPULATION_SIZE: usize = 50;

/// Number of generations evaluated before the run terminates
pub const DEFAULT_GENERATIONS: usize = 100;

/// Per-item probability of a position redraw, and separately of a rotation
pub const DEFAULT_MUTATION_RATE: f64 = 0.2;

/// Top arrangements copied unchanged into the next generation
pub const DEFAULT_ELITISM_COUNT: usize = 5;

/// Distinct arrangements sampled per tournament
pub const DEFAULT_TOURNAMENT_SIZE: usize = 3;

/// Probability that a freshly initialized item starts rotated by 90 degrees
pub const INITIAL_ROTATION_PROBABILITY: f64 = 0.5;

/// Probability that crossover takes a slot from the first parent
pub const CROSSOVER_PROBABILITY: f64 = 0.5;

/// Log the best-ever fitness every this many generations
pub const PROGRESS_LOG_INTERVAL: usize = 10;

// ============================================================================
// FITNESS MODEL
// ============================================================================

/// Score every arrangement starts from
pub const BASELINE_SCORE: f64 = 100.0;

/// Subtracted once per overlapping (item, obstacle) pair
pub const OBSTACLE_OVERLAP_PENALTY: f64 = 20.0;

/// Subtracted once per overlapping pair of items
pub const ITEM_OVERLAP_PENALTY: f64 = 15.0;

/// An item closer than this to its nearest wall counts as against the wall
pub const WALL_PROXIMITY_THRESHOLD: f64 = 0.1;

/// Added once per item that sits against a wall
pub const WALL_PROXIMITY_REWARD: f64 = 5.0;

/// Multiplier applied to the free-cell fraction of the occupancy grid
pub const WALKABILITY_WEIGHT: f64 = 30.0;

// ============================================================================
// RASTERIZATION
// ============================================================================

/// Occupancy grid cells per length unit used while scoring
pub const FITNESS_GRID_RESOLUTION: f64 = 20.0;

/// Occupancy grid cells per length unit used for the feature vector
pub const FEATURE_GRID_RESOLUTION: f64 = 10.0;

// ============================================================================
// VIEWER
// ============================================================================

/// World units drawn per room length unit
pub const PIXELS_PER_UNIT: f32 = 100.0;

/// Generations advanced per rendered frame while an optimization is running
pub const DEFAULT_GENERATIONS_PER_FRAME: usize = 2;

/// Seed used by the viewer until the user picks another one
pub const DEFAULT_SEED: u64 = 42;

/// Default room length shown in the control panel
pub const DEFAULT_ROOM_LENGTH: f64 = 5.0;

/// Default room width shown in the control panel
pub const DEFAULT_ROOM_WIDTH: f64 = 4.0;

/// Maximum number of copies of one template the panel lets you add
pub const MAX_TEMPLATE_COUNT: usize = 5;

/// Maximum number of fixed elements the panel lets you add
pub const MAX_FIXED_ELEMENTS: usize = 5;

/// Extra margin (world units) drawn around a selected item
pub const OUTLINE_MARGIN: f32 = 6.0;

/// Genetic algorithm parameters for one optimization run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaParams {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub elitism_count: usize,
    pub tournament_size: usize,
    /// Stop early once the best-ever fitness has not improved for this many
    /// consecutive generations. `None` always runs every generation.
    #[serde(default)]
    pub stall_generations: Option<usize>,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            generations: DEFAULT_GENERATIONS,
            mutation_rate: DEFAULT_MUTATION_RATE,
            elitism_count: DEFAULT_ELITISM_COUNT,
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
            stall_generations: None,
        }
    }
}

/// Weights and thresholds of the composite layout score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessModel {
    pub baseline: f64,
    pub obstacle_penalty: f64,
    pub overlap_penalty: f64,
    pub wall_threshold: f64,
    pub wall_reward: f64,
    pub walkability_weight: f64,
    pub grid_resolution: f64,
}

impl Default for FitnessModel {
    fn default() -> Self {
        Self {
            baseline: BASELINE_SCORE,
            obstacle_penalty: OBSTACLE_OVERLAP_PENALTY,
            overlap_penalty: ITEM_OVERLAP_PENALTY,
            wall_threshold: WALL_PROXIMITY_THRESHOLD,
            wall_reward: WALL_PROXIMITY_REWARD,
            walkability_weight: WALKABILITY_WEIGHT,
            grid_resolution: FITNESS_GRID_RESOLUTION,
        }
    }
}

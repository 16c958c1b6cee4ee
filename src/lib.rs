//! Evolutionary furniture layout optimizer.
//!
//! Given room bounds, fixed obstacles and a catalog of furniture footprints,
//! a genetic algorithm searches for item positions and rotations that avoid
//! overlaps, hug the walls and keep the floor walkable. The viewer modules
//! render the best arrangement with bevy and collect run parameters through
//! an egui panel.

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod fitness;
pub mod persistence;
pub mod population;
pub mod room;
pub mod templates;

pub mod camera;
pub mod outline;
pub mod panel;
pub mod plan;
pub mod selection;
pub mod viewer;

pub use config::{FitnessModel, GaParams};
pub use engine::{Evolution, GenerationReport, OptimizationResult, Optimizer, Phase, StopReason};
pub use error::{LayoutError, Result};
pub use fitness::{FitnessBreakdown, FitnessEvaluator};
pub use room::{Arrangement, CatalogItem, LayoutProblem, Obstacle, Orientation, PlaceableItem, RoomBounds, Wall};

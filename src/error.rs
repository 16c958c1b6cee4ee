use thiserror::Error;

/// Errors raised while validating a layout problem or moving layouts to disk
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("room dimensions must be positive, got {length} x {width}")]
    InvalidRoom { length: f64, width: f64 },

    #[error("obstacle '{name}' has an invalid footprint ({width} x {length} at {x}, {y})")]
    InvalidObstacle {
        name: String,
        x: f64,
        y: f64,
        width: f64,
        length: f64,
    },

    #[error(
        "item '{name}' ({width} x {length}) does not fit a {room_length} x {room_width} room in every orientation"
    )]
    ItemDoesNotFit {
        name: String,
        width: f64,
        length: f64,
        room_length: f64,
        room_width: f64,
    },

    #[error("population size must be at least 1")]
    EmptyPopulation,

    #[error("generation count must be at least 1")]
    NoGenerations,

    #[error("elitism count {elitism_count} exceeds population size {population_size}")]
    ElitismTooLarge {
        elitism_count: usize,
        population_size: usize,
    },

    #[error("tournament size {tournament_size} must be between 1 and population size {population_size}")]
    InvalidTournamentSize {
        tournament_size: usize,
        population_size: usize,
    },

    #[error("mutation rate {0} is outside [0, 1]")]
    InvalidMutationRate(f64),

    #[error("grid resolution must be positive, got {0}")]
    InvalidResolution(f64),

    #[error("orientation must be a multiple of 90 degrees, got {0}")]
    InvalidOrientation(u32),

    #[error("layout file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("layout file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

use crate::config::FEATURE_GRID_RESOLUTION;
use crate::fitness::walkability;
use crate::room::{Arrangement, Obstacle, RoomBounds};
use std::collections::HashSet;

/// Column labels of [`extract_features`], in order
pub const FEATURE_NAMES: [&str; 11] = [
    "room_length",
    "room_width",
    "room_area",
    "item_count",
    "obstacle_count",
    "item_density",
    "free_space",
    "avg_wall_distance",
    "walkability",
    "category_count",
    "avg_item_distance",
];

/// Fixed-order feature vector consumed by an externally trained layout scorer
pub fn extract_features(arrangement: &Arrangement, room: &RoomBounds, obstacles: &[Obstacle]) -> [f64; 11] {
    let item_count = arrangement.len();
    let room_area = room.area();

    let item_area: f64 = arrangement.iter().map(|item| item.base_width * item.base_length).sum();
    let item_density = item_area / room_area;

    let avg_wall_distance = if item_count == 0 {
        0.0
    } else {
        arrangement.iter().map(|item| item.min_wall_distance(room)).sum::<f64>() / item_count as f64
    };

    let categories: HashSet<&str> = arrangement.iter().map(|item| item.name.as_str()).collect();

    [
        room.length,
        room.width,
        room_area,
        item_count as f64,
        obstacles.len() as f64,
        item_density,
        1.0 - item_density,
        avg_wall_distance,
        walkability(room, obstacles, arrangement, FEATURE_GRID_RESOLUTION),
        categories.len() as f64,
        average_center_distance(arrangement),
    ]
}

fn average_center_distance(arrangement: &Arrangement) -> f64 {
    let centers: Vec<(f64, f64)> = arrangement.iter().map(|item| item.footprint().center()).collect();
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..centers.len() {
        for j in (i + 1)..centers.len() {
            let (x1, y1) = centers[i];
            let (x2, y2) = centers[j];
            total += (x2 - x1).hypot(y2 - y1);
            pairs += 1;
        }
    }
    if pairs == 0 { 0.0 } else { total / pairs as f64 }
}

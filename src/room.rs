//! Spatial entities: room bounds, fixed obstacles and placeable items.
//!
//! Axis convention: `x` runs along the room length and `y` along the room
//! width. A placed item spans its effective length along `x` and its
//! effective width along `y`; an obstacle spans its width along `x` and its
//! length along `y`.

use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quarter-turn orientation of a placeable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    /// The orientation after one more 90 degree turn
    pub fn rotated(self) -> Self {
        match self {
            Orientation::Deg0 => Orientation::Deg90,
            Orientation::Deg90 => Orientation::Deg180,
            Orientation::Deg180 => Orientation::Deg270,
            Orientation::Deg270 => Orientation::Deg0,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    pub fn from_degrees(degrees: u32) -> Result<Self> {
        match degrees % 360 {
            0 => Ok(Orientation::Deg0),
            90 => Ok(Orientation::Deg90),
            180 => Ok(Orientation::Deg180),
            270 => Ok(Orientation::Deg270),
            _ => Err(LayoutError::InvalidOrientation(degrees)),
        }
    }

    /// True when width and length trade places (90 and 270 degrees)
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Orientation::Deg90 | Orientation::Deg270)
    }
}

impl TryFrom<u32> for Orientation {
    type Error = LayoutError;

    fn try_from(degrees: u32) -> Result<Self> {
        Orientation::from_degrees(degrees)
    }
}

impl From<Orientation> for u32 {
    fn from(orientation: Orientation) -> Self {
        orientation.degrees()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Effective `(width, length)` of a footprint at the given orientation.
pub fn effective_dimensions(base_width: f64, base_length: f64, orientation: Orientation) -> (f64, f64) {
    if orientation.is_quarter_turn() {
        (base_length, base_width)
    } else {
        (base_width, base_length)
    }
}

/// Axis-aligned rectangle in room coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// Half-open intersection test: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x_min < other.x_max
            && self.x_max > other.x_min
            && self.y_min < other.y_max
            && self.y_max > other.y_min
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x < self.x_max && y >= self.y_min && y < self.y_max
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0)
    }
}

/// Rectangular bounds of the room being furnished
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    /// Extent along x
    pub length: f64,
    /// Extent along y
    pub width: f64,
}

impl RoomBounds {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    pub fn validate(&self) -> Result<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.length) && valid(self.width) {
            Ok(())
        } else {
            Err(LayoutError::InvalidRoom {
                length: self.length,
                width: self.width,
            })
        }
    }
}

/// Wall of the room a fixed element can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Top,
    Right,
    Bottom,
    Left,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Right, Wall::Bottom, Wall::Left];
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Wall::Top => "Top",
            Wall::Right => "Right",
            Wall::Bottom => "Bottom",
            Wall::Left => "Left",
        };
        write!(f, "{}", name)
    }
}

/// Immovable wall feature such as a door or a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Extent along x
    pub width: f64,
    /// Extent along y
    pub length: f64,
}

impl Obstacle {
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, length: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            length,
        }
    }

    /// Place a fixed element centered on one wall of the room
    pub fn on_wall(name: impl Into<String>, width: f64, length: f64, wall: Wall, room: &RoomBounds) -> Self {
        let (x, y) = match wall {
            Wall::Top => (room.length / 2.0 - length / 2.0, 0.0),
            Wall::Right => (room.length - width, room.width / 2.0 - length / 2.0),
            Wall::Bottom => (room.length / 2.0 - length / 2.0, room.width - width),
            Wall::Left => (0.0, room.width / 2.0 - length / 2.0),
        };
        Self::new(name, x, y, width, length)
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.length)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.x, self.y, self.width, self.length].iter().all(|v| v.is_finite());
        if finite && self.width >= 0.0 && self.length >= 0.0 {
            Ok(())
        } else {
            Err(LayoutError::InvalidObstacle {
                name: self.name.clone(),
                x: self.x,
                y: self.y,
                width: self.width,
                length: self.length,
            })
        }
    }
}

/// Catalog entry describing one piece of furniture to place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub width: f64,
    pub length: f64,
    #[serde(default = "default_movable")]
    pub movable: bool,
}

fn default_movable() -> bool {
    true
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, width: f64, length: f64) -> Self {
        Self {
            name: name.into(),
            width,
            length,
            movable: true,
        }
    }

    /// Check that the footprint fits inside the room in both orientations
    pub fn validate_fits(&self, room: &RoomBounds) -> Result<()> {
        let positive = self.width.is_finite() && self.length.is_finite() && self.width > 0.0 && self.length > 0.0;
        let fits = [Orientation::Deg0, Orientation::Deg90].iter().all(|&orientation| {
            let (w, l) = effective_dimensions(self.width, self.length, orientation);
            l <= room.length && w <= room.width
        });
        if positive && fits {
            Ok(())
        } else {
            Err(LayoutError::ItemDoesNotFit {
                name: self.name.clone(),
                width: self.width,
                length: self.length,
                room_length: room.length,
                room_width: room.width,
            })
        }
    }
}

/// One furniture instance with its current placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceableItem {
    pub name: String,
    /// Footprint before rotation
    pub base_width: f64,
    pub base_length: f64,
    #[serde(default = "default_movable")]
    pub movable: bool,
    pub x: f64,
    pub y: f64,
    pub orientation: Orientation,
}

impl PlaceableItem {
    pub fn from_catalog(entry: &CatalogItem) -> Self {
        Self {
            name: entry.name.clone(),
            base_width: entry.width,
            base_length: entry.length,
            movable: entry.movable,
            x: 0.0,
            y: 0.0,
            orientation: Orientation::Deg0,
        }
    }

    /// Effective `(width, length)` at the current orientation
    pub fn dimensions(&self) -> (f64, f64) {
        effective_dimensions(self.base_width, self.base_length, self.orientation)
    }

    pub fn width(&self) -> f64 {
        self.dimensions().0
    }

    pub fn length(&self) -> f64 {
        self.dimensions().1
    }

    pub fn rotate(&mut self) {
        self.orientation = self.orientation.rotated();
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn footprint(&self) -> Rect {
        let (w, l) = self.dimensions();
        Rect::new(self.x, self.y, self.x + l, self.y + w)
    }

    /// Largest `(x, y)` that keeps the item inside the room at its current orientation
    pub fn max_position(&self, room: &RoomBounds) -> (f64, f64) {
        let (w, l) = self.dimensions();
        (room.length - l, room.width - w)
    }

    /// Smallest clearance between the item and any of the four walls
    pub fn min_wall_distance(&self, room: &RoomBounds) -> f64 {
        let rect = self.footprint();
        let left = rect.x_min;
        let right = room.length - rect.x_max;
        let top = rect.y_min;
        let bottom = room.width - rect.y_max;
        left.min(right).min(top).min(bottom)
    }
}

/// One candidate placement of every catalog item, index-aligned with the catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Arrangement {
    pub items: Vec<PlaceableItem>,
}

impl Arrangement {
    pub fn new(items: Vec<PlaceableItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaceableItem> {
        self.items.iter()
    }
}

/// Everything that stays fixed for the duration of an optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutProblem {
    pub room: RoomBounds,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub catalog: Vec<CatalogItem>,
}

impl LayoutProblem {
    pub fn new(room: RoomBounds, obstacles: Vec<Obstacle>, catalog: Vec<CatalogItem>) -> Self {
        Self {
            room,
            obstacles,
            catalog,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.room.validate()?;
        for obstacle in &self.obstacles {
            obstacle.validate()?;
        }
        for entry in &self.catalog {
            entry.validate_fits(&self.room)?;
        }
        Ok(())
    }
}

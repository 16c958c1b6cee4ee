//! JSON save/load of a furnished room.

use crate::error::Result;
use crate::room::{Arrangement, Obstacle, PlaceableItem, RoomBounds};
use bevy::log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// A room with its fixed elements and placed furniture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub name: String,
    pub length: f64,
    pub width: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub items: Vec<PlaceableItem>,
}

impl RoomLayout {
    pub fn new(name: impl Into<String>, room: RoomBounds, obstacles: Vec<Obstacle>, arrangement: Arrangement) -> Self {
        Self {
            name: name.into(),
            length: room.length,
            width: room.width,
            obstacles,
            items: arrangement.items,
        }
    }

    pub fn room(&self) -> RoomBounds {
        RoomBounds::new(self.length, self.width)
    }

    pub fn arrangement(&self) -> Arrangement {
        Arrangement::new(self.items.clone())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let layout: RoomLayout = serde_json::from_str(text)?;
        layout.room().validate()?;
        Ok(layout)
    }
}

/// Write the layout as pretty-printed JSON
pub fn save_layout(layout: &RoomLayout, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, layout)?;
    writer.flush()?;
    info!("Saved layout '{}' to {}", layout.name, path.display());
    Ok(())
}

pub fn load_layout(path: impl AsRef<Path>) -> Result<RoomLayout> {
    let reader = BufReader::new(File::open(path)?);
    let layout: RoomLayout = serde_json::from_reader(reader)?;
    layout.room().validate()?;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn orientation_is_written_as_degrees() {
        let json = r#"{
            "name": "Den",
            "length": 3.0,
            "width": 3.0,
            "items": [{
                "name": "Desk", "base_width": 0.7, "base_length": 1.4, "movable": true,
                "x": 0.5, "y": 0.25, "orientation": 270
            }]
        }"#;
        let layout = RoomLayout::from_json(json).unwrap();
        assert!(layout.obstacles.is_empty());
        assert_eq!(layout.items[0].dimensions(), (1.4, 0.7));
        assert!(layout.to_json().unwrap().contains("\"orientation\": 270"));
    }

    #[test]
    fn rejects_bad_orientation_and_bounds() {
        let bad_orientation = r#"{"name":"A","length":3.0,"width":3.0,"items":[{
            "name":"Desk","base_width":0.7,"base_length":1.4,"movable":true,"x":0.0,"y":0.0,"orientation":45}]}"#;
        assert!(matches!(RoomLayout::from_json(bad_orientation), Err(LayoutError::Json(_))));

        let bad_room = r#"{"name":"B","length":-1.0,"width":3.0}"#;
        assert!(matches!(RoomLayout::from_json(bad_room), Err(LayoutError::InvalidRoom { .. })));
    }
}

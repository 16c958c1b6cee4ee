use rand::SeedableRng;
use rand::rngs::StdRng;
use room_layout_evo::persistence::{RoomLayout, load_layout, save_layout};
use room_layout_evo::{CatalogItem, GaParams, LayoutError, LayoutProblem, Obstacle, Optimizer, RoomBounds, Wall};
use std::fs;
use tempfile::tempdir;

/// An optimized layout survives a save/load cycle unchanged
#[test]
fn test_optimized_layout_round_trips_through_disk() {
    let room = RoomBounds::new(6.0, 4.5);
    let obstacles = vec![
        Obstacle::on_wall("Door", 0.2, 0.9, Wall::Top, &room),
        Obstacle::on_wall("Window", 0.1, 1.2, Wall::Right, &room),
    ];
    let catalog = vec![
        CatalogItem::new("Desk", 0.7, 1.4),
        CatalogItem::new("Chair", 0.5, 0.5),
        CatalogItem::new("Bookshelf", 0.4, 0.8),
    ];
    let problem = LayoutProblem::new(room, obstacles.clone(), catalog);
    let params = GaParams {
        population_size: 20,
        generations: 15,
        ..GaParams::default()
    };
    let result = Optimizer::new(problem, params).unwrap().run(&mut StdRng::seed_from_u64(21));

    let dir = tempdir().unwrap();
    let path = dir.path().join("study.json");
    let layout = RoomLayout::new("Study", room, obstacles, result.best.clone());
    save_layout(&layout, &path).unwrap();

    let loaded = load_layout(&path).unwrap();
    assert_eq!(loaded, layout);
    assert_eq!(loaded.room(), room);
    for (saved, original) in loaded.arrangement().iter().zip(result.best.iter()) {
        assert_eq!(saved.x, original.x);
        assert_eq!(saved.y, original.y);
        assert_eq!(saved.orientation, original.orientation);
        assert_eq!(saved.dimensions(), original.dimensions());
    }
}

#[test]
fn test_loading_missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = load_layout(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LayoutError::Io(_)));
}

#[test]
fn test_hand_written_layout_loads_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("minimal.json");
    fs::write(
        &path,
        r#"{
            "name": "Box",
            "length": 3.0,
            "width": 2.0,
            "items": [
                { "name": "Chair", "base_width": 0.5, "base_length": 0.5, "x": 1.0, "y": 0.5, "orientation": 90 }
            ]
        }"#,
    )
    .unwrap();

    let layout = load_layout(&path).unwrap();
    assert!(layout.obstacles.is_empty());
    let arrangement = layout.arrangement();
    assert_eq!(arrangement.len(), 1);
    assert!(arrangement.items[0].movable);
    assert_eq!(arrangement.items[0].orientation.degrees(), 90);
}

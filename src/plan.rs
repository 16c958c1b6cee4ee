use crate::config::PIXELS_PER_UNIT;
use crate::room::Rect as RoomRect;
use crate::viewer::LayoutView;
use bevy::prelude::*;

/// Marker for every entity drawn as part of the floor plan
#[derive(Component)]
pub struct PlanShape;

/// A drawn furniture item, pointing back at its slot in the arrangement
#[derive(Component)]
pub struct PlacedItem {
    pub index: usize,
}

/// Shared unit-square mesh; every shape is this square scaled to size
#[derive(Resource)]
pub struct PlanMesh(pub Handle<Mesh>);

const BORDER_Z: f32 = 0.0;
const FLOOR_Z: f32 = 0.1;
const OBSTACLE_Z: f32 = 0.2;
const ITEM_Z: f32 = 0.3;

/// Room coordinates (y grows toward the bottom wall) to world coordinates
pub fn room_to_world(x: f64, y: f64) -> Vec2 {
    Vec2::new(x as f32 * PIXELS_PER_UNIT, -(y as f32) * PIXELS_PER_UNIT)
}

pub fn world_to_room(world: Vec2) -> (f64, f64) {
    ((world.x / PIXELS_PER_UNIT) as f64, (-world.y / PIXELS_PER_UNIT) as f64)
}

/// Transform that stretches the unit square over a room-space rectangle
pub fn rect_transform(rect: &RoomRect, z: f32) -> Transform {
    let (cx, cy) = rect.center();
    let center = room_to_world(cx, cy);
    Transform::from_xyz(center.x, center.y, z).with_scale(Vec3::new(
        rect.width() as f32 * PIXELS_PER_UNIT,
        rect.height() as f32 * PIXELS_PER_UNIT,
        1.0,
    ))
}

/// Fill color per furniture category, grey for anything unknown
pub fn furniture_color(name: &str) -> Color {
    match name {
        "Bed" => Color::srgb(0.9, 0.2, 0.2),
        "Sofa" => Color::srgb(0.2, 0.8, 0.2),
        "Table" => Color::srgb(0.2, 0.3, 0.9),
        "Chair" => Color::srgb(0.1, 0.8, 0.8),
        "Dresser" => Color::srgb(0.8, 0.2, 0.8),
        "Desk" => Color::srgb(0.9, 0.85, 0.1),
        "Bookshelf" => Color::srgb(0.0, 0.5, 0.5),
        "TV Stand" => Color::srgb(0.5, 0.0, 0.0),
        _ => Color::srgb(0.78, 0.78, 0.78),
    }
}

pub fn obstacle_color(name: &str) -> Color {
    if name == "Door" {
        Color::srgb(0.59, 0.59, 0.59)
    } else {
        Color::srgb(0.78, 0.78, 0.85)
    }
}

pub fn setup_plan_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(PlanMesh(meshes.add(Rectangle::new(1.0, 1.0))));
}

/// System that redraws the floor plan whenever the displayed layout changes
pub fn sync_plan(
    mut commands: Commands,
    view: Res<LayoutView>,
    mesh: Res<PlanMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    shapes: Query<Entity, With<PlanShape>>,
) {
    if !view.is_changed() {
        return;
    }

    for entity in shapes.iter() {
        commands.entity(entity).despawn();
    }

    let room = view.room;
    let floor = RoomRect::new(0.0, 0.0, room.length, room.width);
    let border_width = 4.0 / PIXELS_PER_UNIT as f64;
    let border = RoomRect::new(
        -border_width,
        -border_width,
        room.length + border_width,
        room.width + border_width,
    );

    let mut spawn = |rect: &RoomRect, color: Color, z: f32| {
        commands
            .spawn((
                PlanShape,
                Mesh2d(mesh.0.clone()),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(color))),
                rect_transform(rect, z),
            ))
            .id()
    };

    spawn(&border, Color::BLACK, BORDER_Z);
    spawn(&floor, Color::srgb(0.96, 0.96, 0.94), FLOOR_Z);
    for obstacle in &view.obstacles {
        spawn(&obstacle.footprint(), obstacle_color(&obstacle.name), OBSTACLE_Z);
    }

    let items: Vec<Entity> = view
        .arrangement
        .iter()
        .enumerate()
        // later items draw on top, so overlaps stay visible
        .map(|(i, item)| spawn(&item.footprint(), furniture_color(&item.name), ITEM_Z + i as f32 * 0.001))
        .collect();
    for (index, entity) in items.into_iter().enumerate() {
        commands.entity(entity).insert(PlacedItem { index });
    }
}

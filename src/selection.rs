use crate::plan::world_to_room;
use crate::room::Arrangement;
use crate::viewer::LayoutView;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

/// Resource tracking which arrangement slot is selected
#[derive(Resource, Default)]
pub struct SelectedItem {
    pub index: Option<usize>,
}

/// Topmost item (last drawn) whose footprint contains the room-space point
pub fn item_at(arrangement: &Arrangement, x: f64, y: f64) -> Option<usize> {
    arrangement
        .iter()
        .enumerate()
        .rev()
        .find(|(_, item)| item.footprint().contains_point(x, y))
        .map(|(index, _)| index)
}

/// System to select the item under the cursor on left click
pub fn handle_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut contexts: EguiContexts,
    view: Res<LayoutView>,
    mut selected: ResMut<SelectedItem>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    if contexts.ctx_mut().wants_pointer_input() {
        return;
    }

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };

    if let Some(cursor_pos) = window.cursor_position() {
        if let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_pos) {
            let (x, y) = world_to_room(world_pos);
            selected.index = item_at(&view.arrangement, x, y);
        }
    }
}

/// Drop the selection when the slot no longer exists
pub fn clear_stale_selection(view: Res<LayoutView>, mut selected: ResMut<SelectedItem>) {
    if let Some(index) = selected.index {
        if index >= view.arrangement.len() {
            selected.index = None;
        }
    }
}

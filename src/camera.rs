use crate::plan::room_to_world;
use crate::viewer::LayoutView;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

#[derive(Component)]
pub struct MainCamera;

#[derive(Resource)]
pub struct CameraState {
    pub zoom: f32,
    pub position: Vec2,
    pub is_panning: bool,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            position: Vec2::ZERO,
            is_panning: false,
        }
    }
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MainCamera,
        Transform::from_xyz(0.0, 0.0, 0.0),
        OrthographicProjection {
            scale: 1.0,
            ..OrthographicProjection::default_2d()
        },
    ));
}

/// Zoom that fits a `content` sized region into `viewport` with some margin
pub fn fit_zoom(content: Vec2, viewport: Vec2) -> f32 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return 1.0;
    }
    let ratio = (content.x / viewport.x).max(content.y / viewport.y);
    (ratio * 1.25).clamp(0.1, 10.0)
}

/// Center the camera on the room whenever a different room is displayed
pub fn frame_room(
    view: Res<LayoutView>,
    mut last_room: Local<Option<(f64, f64)>>,
    mut camera_state: ResMut<CameraState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut query: Query<(&mut Transform, &mut OrthographicProjection), With<MainCamera>>,
) {
    let dims = (view.room.length, view.room.width);
    if *last_room == Some(dims) {
        return;
    }
    *last_room = Some(dims);

    let far_corner = room_to_world(view.room.length, view.room.width);
    let center = far_corner / 2.0;
    let viewport = windows
        .get_single()
        .map(|window| Vec2::new(window.width(), window.height()))
        .unwrap_or(Vec2::ZERO);
    camera_state.position = center;
    camera_state.zoom = fit_zoom(far_corner.abs(), viewport);

    if let Ok((mut transform, mut projection)) = query.get_single_mut() {
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        projection.scale = camera_state.zoom;
    }
}

pub fn camera_zoom(
    mut scroll_events: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    mut camera_state: ResMut<CameraState>,
    mut query: Query<&mut OrthographicProjection, With<MainCamera>>,
) {
    // scrolling inside the panel should not zoom the plan
    if contexts.ctx_mut().wants_pointer_input() {
        scroll_events.clear();
        return;
    }

    for event in scroll_events.read() {
        let zoom_delta = -event.y * 0.1 * camera_state.zoom;
        camera_state.zoom = (camera_state.zoom + zoom_delta).clamp(0.1, 10.0);

        if let Ok(mut projection) = query.get_single_mut() {
            projection.scale = camera_state.zoom;
        }
    }
}

pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut motion_events: EventReader<MouseMotion>,
    mut camera_state: ResMut<CameraState>,
    mut query: Query<&mut Transform, With<MainCamera>>,
) {
    if mouse_button.just_pressed(MouseButton::Middle) {
        camera_state.is_panning = true;
    }
    if mouse_button.just_released(MouseButton::Middle) {
        camera_state.is_panning = false;
    }

    if !camera_state.is_panning {
        motion_events.clear();
        return;
    }

    for event in motion_events.read() {
        if let Ok(mut transform) = query.get_single_mut() {
            // screen y grows downward, world y grows upward
            let pan_delta = Vec2::new(-event.delta.x, event.delta.y) * camera_state.zoom;
            camera_state.position += pan_delta;
            transform.translation.x = camera_state.position.x;
            transform.translation.y = camera_state.position.y;
        }
    }
}

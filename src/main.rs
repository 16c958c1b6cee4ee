use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use room_layout_evo::camera::{CameraState, camera_pan, camera_zoom, frame_room, setup_camera};
use room_layout_evo::outline::manage_selection_outline;
use room_layout_evo::panel::ui_system;
use room_layout_evo::plan::{setup_plan_mesh, sync_plan};
use room_layout_evo::selection::{SelectedItem, clear_stale_selection, handle_selection};
use room_layout_evo::viewer::{ActiveRun, LayoutView, PlannerSettings, RunState, StatusMessage, step_optimizer};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Furniture Layout Optimizer".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .init_resource::<CameraState>()
        .init_resource::<PlannerSettings>()
        .init_resource::<ActiveRun>()
        .init_resource::<LayoutView>()
        .init_resource::<RunState>()
        .init_resource::<SelectedItem>()
        .init_resource::<StatusMessage>()
        .add_systems(Startup, (setup_camera, setup_plan_mesh))
        .add_systems(Update, (
            // Always run (even when paused)
            camera_zoom,
            camera_pan,
            frame_room,
            handle_selection,
            ui_system,
        ))
        .add_systems(Update, (
            // Only advances while a run is in progress
            step_optimizer.run_if(|state: Res<RunState>| *state == RunState::Running),
            clear_stale_selection,
            sync_plan,
            manage_selection_outline,
        ).chain())
        .run();
}

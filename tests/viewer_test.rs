use bevy::prelude::*;
use room_layout_evo::selection::{SelectedItem, clear_stale_selection};
use room_layout_evo::viewer::{ActiveRun, LayoutView, PlannerSettings, RunState, start_run, step_optimizer};
use room_layout_evo::{GaParams, StopReason};

fn headless_app(settings: PlannerSettings) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);

    let mut run = ActiveRun::default();
    let mut view = LayoutView::default();
    start_run(&settings, &mut run, &mut view).unwrap();

    app.insert_resource(settings)
        .insert_resource(run)
        .insert_resource(view)
        .insert_resource(RunState::Running)
        .init_resource::<SelectedItem>()
        .add_systems(
            Update,
            (
                step_optimizer.run_if(|state: Res<RunState>| *state == RunState::Running),
                clear_stale_selection,
            )
                .chain(),
        );
    app
}

fn quick_settings() -> PlannerSettings {
    PlannerSettings {
        params: GaParams {
            population_size: 12,
            generations: 6,
            elitism_count: 2,
            tournament_size: 3,
            ..GaParams::default()
        },
        generations_per_frame: 2,
        ..PlannerSettings::default()
    }
}

/// The optimizer advances a few generations per frame and finishes headless
#[test]
fn test_run_advances_per_frame_until_finished() {
    let mut app = headless_app(quick_settings());

    app.update();
    assert_eq!(app.world().resource::<LayoutView>().generation, 2);
    assert_eq!(app.world().resource::<LayoutView>().history.len(), 2);
    assert_eq!(*app.world().resource::<RunState>(), RunState::Running);

    app.update();
    app.update();
    let view = app.world().resource::<LayoutView>();
    assert_eq!(view.generation, 6);
    assert_eq!(view.history.len(), 6);
    assert_eq!(view.stop_reason, Some(StopReason::Completed));
    assert_eq!(view.arrangement.len(), 2);
    assert_eq!(view.breakdown.score, *view.history.last().unwrap());
    assert_eq!(*app.world().resource::<RunState>(), RunState::Finished);

    // finished runs are not stepped again
    app.update();
    assert_eq!(app.world().resource::<LayoutView>().generation, 6);
}

#[test]
fn test_paused_run_does_not_advance() {
    let mut app = headless_app(quick_settings());
    app.update();
    *app.world_mut().resource_mut::<RunState>() = RunState::Paused;
    app.update();
    app.update();
    assert_eq!(app.world().resource::<LayoutView>().generation, 2);
}

#[test]
fn test_selection_past_the_arrangement_is_cleared() {
    let mut app = headless_app(quick_settings());
    app.world_mut().resource_mut::<SelectedItem>().index = Some(7);
    app.update();
    assert_eq!(app.world().resource::<SelectedItem>().index, None);

    app.world_mut().resource_mut::<SelectedItem>().index = Some(1);
    app.update();
    assert_eq!(app.world().resource::<SelectedItem>().index, Some(1));
}

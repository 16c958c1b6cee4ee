//! Viewer state: panel settings, the active run and the arrangement on screen.

use crate::config::*;
use crate::engine::{Evolution, Optimizer, StopReason};
use crate::error::Result;
use crate::fitness::FitnessBreakdown;
use crate::persistence::RoomLayout;
use crate::room::{Arrangement, CatalogItem, LayoutProblem, Obstacle, RoomBounds, Wall};
use crate::templates::{fixed_element_templates, furniture_templates};
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Resource to control the optimization lifecycle
#[derive(Resource, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

/// A fixed element picked in the panel: which template, on which wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedElementChoice {
    pub template: usize,
    pub wall: Wall,
}

/// Everything the control panel lets the user edit before starting a run
#[derive(Resource, Debug, Clone)]
pub struct PlannerSettings {
    pub room_length: f64,
    pub room_width: f64,
    pub fixed_elements: Vec<FixedElementChoice>,
    /// Copies of each furniture template, index-aligned with `furniture_templates()`
    pub furniture_counts: Vec<usize>,
    pub params: GaParams,
    pub seed: u64,
    pub generations_per_frame: usize,
    pub layout_path: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        let furniture_counts = furniture_templates()
            .iter()
            .map(|t| usize::from(t.name == "Bed" || t.name == "Sofa"))
            .collect();
        Self {
            room_length: DEFAULT_ROOM_LENGTH,
            room_width: DEFAULT_ROOM_WIDTH,
            fixed_elements: vec![FixedElementChoice {
                template: 0,
                wall: Wall::Top,
            }],
            furniture_counts,
            params: GaParams::default(),
            seed: DEFAULT_SEED,
            generations_per_frame: DEFAULT_GENERATIONS_PER_FRAME,
            layout_path: "optimized_layout.json".to_string(),
        }
    }
}

impl PlannerSettings {
    pub fn room(&self) -> RoomBounds {
        RoomBounds::new(self.room_length, self.room_width)
    }

    pub fn obstacles(&self) -> Vec<Obstacle> {
        let templates = fixed_element_templates();
        let room = self.room();
        self.fixed_elements
            .iter()
            .filter_map(|choice| {
                let t = templates.get(choice.template)?;
                Some(Obstacle::on_wall(t.name, t.width, t.length, choice.wall, &room))
            })
            .collect()
    }

    pub fn catalog(&self) -> Vec<CatalogItem> {
        furniture_templates()
            .into_iter()
            .zip(&self.furniture_counts)
            .flat_map(|(template, &count)| std::iter::repeat_n(template, count))
            .collect()
    }

    pub fn problem(&self) -> LayoutProblem {
        LayoutProblem::new(self.room(), self.obstacles(), self.catalog())
    }
}

/// The optimization currently being stepped, if any
#[derive(Resource, Default)]
pub struct ActiveRun {
    pub evolution: Option<Evolution<StdRng>>,
}

/// What the plan and the panel display
#[derive(Resource, Debug, Clone)]
pub struct LayoutView {
    pub room: RoomBounds,
    pub obstacles: Vec<Obstacle>,
    pub arrangement: Arrangement,
    pub breakdown: FitnessBreakdown,
    pub history: Vec<f64>,
    pub generation: usize,
    pub stop_reason: Option<StopReason>,
}

impl Default for LayoutView {
    fn default() -> Self {
        let settings = PlannerSettings::default();
        Self {
            room: settings.room(),
            obstacles: settings.obstacles(),
            arrangement: Arrangement::default(),
            breakdown: FitnessBreakdown::default(),
            history: Vec::new(),
            generation: 0,
            stop_reason: None,
        }
    }
}

impl LayoutView {
    /// Show the best-ever arrangement of a run
    pub fn refresh_from<R: rand::Rng>(&mut self, evolution: &Evolution<R>) {
        let optimizer = evolution.optimizer();
        self.room = optimizer.problem().room;
        self.obstacles = optimizer.problem().obstacles.clone();
        if let Some(best) = evolution.best() {
            self.breakdown = optimizer.evaluator().breakdown(best);
            self.arrangement = best.clone();
        }
        self.history = evolution.history().to_vec();
        self.generation = evolution.generation();
        self.stop_reason = evolution.stop_reason();
    }

    /// Show a layout read from disk
    pub fn show_layout(&mut self, layout: &RoomLayout) {
        self.room = layout.room();
        self.obstacles = layout.obstacles.clone();
        self.arrangement = layout.arrangement();
        self.breakdown = FitnessBreakdown::default();
        self.history.clear();
        self.generation = 0;
        self.stop_reason = None;
    }

    pub fn to_layout(&self, name: &str) -> RoomLayout {
        RoomLayout::new(name, self.room, self.obstacles.clone(), self.arrangement.clone())
    }
}

/// Last error or notice shown in the panel
#[derive(Resource, Default)]
pub struct StatusMessage(pub Option<String>);

/// Validate the panel settings and begin a fresh seeded run
pub fn start_run(settings: &PlannerSettings, run: &mut ActiveRun, view: &mut LayoutView) -> Result<()> {
    let problem = settings.problem();
    let optimizer = Optimizer::new(problem, settings.params)?;
    let evolution = optimizer.start(StdRng::seed_from_u64(settings.seed));
    *view = LayoutView {
        room: optimizer.problem().room,
        obstacles: optimizer.problem().obstacles.clone(),
        ..LayoutView::default()
    };
    run.evolution = Some(evolution);
    Ok(())
}

/// Cancel the active run, keeping its best-ever arrangement on screen
pub fn stop_run(run: &mut ActiveRun, view: &mut LayoutView) {
    if let Some(evolution) = run.evolution.as_mut() {
        evolution.cancel();
        view.refresh_from(evolution);
    }
}

/// System advancing the active run a few generations per frame
pub fn step_optimizer(
    settings: Res<PlannerSettings>,
    mut run: ResMut<ActiveRun>,
    mut view: ResMut<LayoutView>,
    mut state: ResMut<RunState>,
) {
    let Some(evolution) = run.evolution.as_mut() else {
        *state = RunState::Idle;
        return;
    };

    let mut advanced = false;
    for _ in 0..settings.generations_per_frame.max(1) {
        if evolution.is_finished() {
            break;
        }
        advanced |= evolution.advance_generation().is_some();
    }

    if advanced || evolution.is_finished() {
        view.refresh_from(evolution);
    }
    if evolution.is_finished() {
        info!(
            "Run finished at generation {} with fitness {:.2}",
            evolution.generation(),
            view.breakdown.score
        );
        *state = RunState::Finished;
    }
}

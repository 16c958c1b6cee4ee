use crate::camera::CameraState;
use crate::config::{MAX_FIXED_ELEMENTS, MAX_TEMPLATE_COUNT};
use crate::persistence::{load_layout, save_layout};
use crate::plan::furniture_color;
use crate::room::Wall;
use crate::selection::SelectedItem;
use crate::templates::{fixed_element_templates, furniture_templates};
use crate::viewer::{ActiveRun, FixedElementChoice, LayoutView, PlannerSettings, RunState, StatusMessage, start_run, stop_run};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

fn to_egui(color: Color) -> egui::Color32 {
    let c = color.to_srgba();
    egui::Color32::from_rgb((c.red * 255.0) as u8, (c.green * 255.0) as u8, (c.blue * 255.0) as u8)
}

/// Best-ever fitness per generation as a line chart
fn draw_history(ui: &mut egui::Ui, history: &[f64]) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 120.0), egui::Sense::hover());
    let painter = ui.painter();
    painter.rect_stroke(rect, 2.0, egui::Stroke::new(1.0, egui::Color32::GRAY));

    if history.len() < 2 {
        return;
    }
    let min = history.iter().copied().fold(f64::INFINITY, f64::min);
    let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(1e-9);
    let last = (history.len() - 1) as f32;

    let points: Vec<egui::Pos2> = history
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let t = i as f32 / last;
            let v = ((value - min) / span) as f32;
            egui::pos2(
                rect.left() + t * rect.width(),
                rect.bottom() - 4.0 - v * (rect.height() - 8.0),
            )
        })
        .collect();
    painter.add(egui::Shape::line(points, egui::Stroke::new(1.5, egui::Color32::from_rgb(100, 150, 255))));
    painter.text(
        rect.left_top() + egui::vec2(4.0, 2.0),
        egui::Align2::LEFT_TOP,
        format!("{:.2}", max),
        egui::FontId::monospace(10.0),
        egui::Color32::GRAY,
    );
}

#[allow(clippy::too_many_arguments)]
pub fn ui_system(
    mut contexts: EguiContexts,
    mut settings: ResMut<PlannerSettings>,
    mut run: ResMut<ActiveRun>,
    mut view: ResMut<LayoutView>,
    mut state: ResMut<RunState>,
    mut status: ResMut<StatusMessage>,
    selected: Res<SelectedItem>,
    camera_state: Res<CameraState>,
) {
    let ctx = contexts.ctx_mut().clone();

    egui::Window::new("Room Configuration")
        .default_pos(egui::pos2(10.0, 10.0))
        .default_width(300.0)
        .show(&ctx, |ui| {
            egui::ScrollArea::vertical().max_height(640.0).show(ui, |ui| {
                ui.heading("Room Dimensions");
                ui.add(egui::Slider::new(&mut settings.room_length, 2.0..=10.0).step_by(0.1).text("Length (m)"));
                ui.add(egui::Slider::new(&mut settings.room_width, 2.0..=8.0).step_by(0.1).text("Width (m)"));

                ui.separator();
                ui.heading("Fixed Elements (Doors/Windows)");
                let templates = fixed_element_templates();
                let mut remove = None;
                for (i, choice) in settings.fixed_elements.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        let current = templates.get(choice.template).map_or("?", |t| t.name);
                        egui::ComboBox::from_label(format!("Type {}", i + 1))
                            .selected_text(current)
                            .show_ui(ui, |ui| {
                                for (index, template) in templates.iter().enumerate() {
                                    ui.selectable_value(&mut choice.template, index, template.name);
                                }
                            });
                        egui::ComboBox::from_label(format!("Wall {}", i + 1))
                            .selected_text(choice.wall.to_string())
                            .show_ui(ui, |ui| {
                                for wall in Wall::ALL {
                                    ui.selectable_value(&mut choice.wall, wall, wall.to_string());
                                }
                            });
                        if ui.small_button("✖").clicked() {
                            remove = Some(i);
                        }
                    });
                }
                if let Some(i) = remove {
                    settings.fixed_elements.remove(i);
                }
                if settings.fixed_elements.len() < MAX_FIXED_ELEMENTS && ui.button("➕ Add fixed element").clicked() {
                    settings.fixed_elements.push(FixedElementChoice {
                        template: 0,
                        wall: Wall::Left,
                    });
                }

                ui.separator();
                ui.heading("Furniture");
                let furniture = furniture_templates();
                settings.furniture_counts.resize(furniture.len(), 0);
                for (template, count) in furniture.iter().zip(settings.furniture_counts.iter_mut()) {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, to_egui(furniture_color(&template.name)));
                        ui.add(egui::Slider::new(count, 0..=MAX_TEMPLATE_COUNT).text(format!(
                            "{} ({:.1}m x {:.1}m)",
                            template.name, template.length, template.width
                        )));
                    });
                }

                ui.separator();
                ui.heading("Optimization Settings");
                let params = &mut settings.params;
                ui.add(egui::Slider::new(&mut params.generations, 10..=500).text("Generations"));
                ui.add(egui::Slider::new(&mut params.population_size, 10..=200).text("Population Size"));
                ui.add(egui::Slider::new(&mut params.mutation_rate, 0.0..=1.0).text("Mutation Rate"));
                let population = params.population_size;
                params.elitism_count = params.elitism_count.min(population);
                params.tournament_size = params.tournament_size.clamp(1, population);
                ui.add(egui::Slider::new(&mut params.elitism_count, 0..=population).text("Elitism"));
                ui.add(egui::Slider::new(&mut params.tournament_size, 1..=population.min(10)).text("Tournament Size"));
                ui.horizontal(|ui| {
                    ui.label("Seed");
                    ui.add(egui::DragValue::new(&mut settings.seed));
                });
                ui.add(egui::Slider::new(&mut settings.generations_per_frame, 1..=20).text("Generations / frame"));
            });
        });

    egui::Window::new("Optimization")
        .default_pos(egui::pos2(960.0, 10.0))
        .default_width(300.0)
        .show(&ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("▶ Optimize Layout").clicked() {
                    match start_run(&settings, &mut run, &mut view) {
                        Ok(()) => {
                            *state = RunState::Running;
                            status.0 = None;
                        }
                        Err(err) => {
                            warn!("Cannot start optimization: {}", err);
                            status.0 = Some(err.to_string());
                        }
                    }
                }

                match *state {
                    RunState::Running => {
                        if ui.button("⏸ Pause").clicked() {
                            *state = RunState::Paused;
                        }
                    }
                    RunState::Paused => {
                        if ui.button("▶ Resume").clicked() {
                            *state = RunState::Running;
                        }
                    }
                    RunState::Idle | RunState::Finished => {}
                }

                if matches!(*state, RunState::Running | RunState::Paused) && ui.button("⏹ Stop").clicked() {
                    stop_run(&mut run, &mut view);
                    *state = RunState::Finished;
                }
            });
            ui.label(format!("State: {:?}", *state));

            let generations = settings.params.generations.max(1);
            let progress = view.generation as f32 / generations as f32;
            ui.add(egui::ProgressBar::new(progress).text(format!("Generation {} / {}", view.generation, generations)));
            if let Some(reason) = view.stop_reason {
                ui.label(format!("Stopped: {:?}", reason));
            }

            ui.separator();
            ui.heading("Fitness");
            let breakdown = view.breakdown;
            ui.label(format!("Score: {:.2}", breakdown.score));
            ui.label(format!("Obstacle overlaps: {}", breakdown.obstacle_overlaps));
            ui.label(format!("Item overlaps: {}", breakdown.item_overlaps));
            ui.label(format!("Items against a wall: {}", breakdown.items_against_wall));
            ui.label(format!("Walkability: {:.1}%", breakdown.walkability * 100.0));
            draw_history(ui, &view.history);

            ui.separator();
            ui.heading("Furniture Positions");
            egui::Grid::new("positions").striped(true).show(ui, |ui| {
                ui.strong("Name");
                ui.strong("X");
                ui.strong("Y");
                ui.strong("Size");
                ui.strong("Rot");
                ui.end_row();
                for item in view.arrangement.iter() {
                    ui.label(&item.name);
                    ui.label(format!("{:.2}m", item.x));
                    ui.label(format!("{:.2}m", item.y));
                    ui.label(format!("{:.2} x {:.2}", item.length(), item.width()));
                    ui.label(item.orientation.to_string());
                    ui.end_row();
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("File");
                ui.text_edit_singleline(&mut settings.layout_path);
            });
            ui.horizontal(|ui| {
                if ui.button("💾 Save layout").clicked() {
                    let layout = view.to_layout("Optimized Room");
                    status.0 = Some(match save_layout(&layout, &settings.layout_path) {
                        Ok(()) => format!("Layout saved to {}", settings.layout_path),
                        Err(err) => {
                            warn!("Saving layout failed: {}", err);
                            format!("Save failed: {}", err)
                        }
                    });
                }
                if ui.button("📂 Load layout").clicked() {
                    match load_layout(&settings.layout_path) {
                        Ok(layout) => {
                            run.evolution = None;
                            view.show_layout(&layout);
                            *state = RunState::Idle;
                            status.0 = Some(format!("Loaded '{}'", layout.name));
                        }
                        Err(err) => {
                            warn!("Loading layout failed: {}", err);
                            status.0 = Some(format!("Load failed: {}", err));
                        }
                    }
                }
            });
            if let Some(message) = &status.0 {
                ui.colored_label(egui::Color32::from_rgb(255, 200, 100), message);
            }

            ui.separator();
            ui.label(format!("Zoom: {:.2}x", camera_state.zoom));
            ui.label("• Mouse Wheel - Zoom in/out");
            ui.label("• Middle Mouse - Pan camera");
            ui.label("• Left Click - Select item");
        });

    if let Some(item) = selected.index.and_then(|index| view.arrangement.items.get(index)) {
        egui::Window::new("Selected Item")
            .default_pos(egui::pos2(330.0, 10.0))
            .show(&ctx, |ui| {
                ui.heading(&item.name);
                ui.separator();
                ui.label(format!("Position: ({:.2}, {:.2})", item.x, item.y));
                ui.label(format!("Orientation: {}", item.orientation));
                ui.label(format!("Footprint: {:.2}m x {:.2}m", item.length(), item.width()));
                ui.label(format!("Base size: {:.2}m x {:.2}m", item.base_length, item.base_width));
                ui.label(format!("Movable: {}", item.movable));
            });
    }
}

use crate::config::OUTLINE_MARGIN;
use crate::plan::{PlanMesh, rect_transform};
use crate::selection::SelectedItem;
use crate::viewer::LayoutView;
use bevy::prelude::*;

/// Component that marks the highlight drawn behind the selected item
#[derive(Component)]
pub struct SelectionOutline {
    pub index: usize,
}

const OUTLINE_Z: f32 = 0.25;

/// System to redraw the outline when the selection or the displayed layout changes
pub fn manage_selection_outline(
    mut commands: Commands,
    mesh: Res<PlanMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    selected: Res<SelectedItem>,
    view: Res<LayoutView>,
    outlines: Query<Entity, With<SelectionOutline>>,
) {
    if !selected.is_changed() && !view.is_changed() {
        return;
    }

    for entity in outlines.iter() {
        commands.entity(entity).despawn();
    }

    let Some(index) = selected.index else {
        return;
    };
    let Some(item) = view.arrangement.items.get(index) else {
        return;
    };

    let mut transform = rect_transform(&item.footprint(), OUTLINE_Z);
    let margin = 2.0 * OUTLINE_MARGIN;
    transform.scale.x += margin;
    transform.scale.y += margin;

    commands.spawn((
        SelectionOutline { index },
        Mesh2d(mesh.0.clone()),
        MeshMaterial2d(materials.add(ColorMaterial::from_color(
            Color::srgba(1.0, 1.0, 0.0, 0.6), // Yellow with transparency
        ))),
        transform,
    ));
}

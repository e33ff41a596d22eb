// ============================================================================
// LAYERS PANEL — z-order listing with select / lock / delete
// ============================================================================

use eframe::egui::{self, Color32, RichText};

use crate::document::{Layer, LayerKind, ReorderDirection};
use crate::project::EditorProject;

/// Actions raised by a row that the panel applies after the list is drawn
/// (mutating the document mid-iteration would invalidate the borrow).
enum RowAction {
    Select(String),
    ToggleLock(String),
    Delete(String),
}

#[derive(Default)]
pub struct LayersPanel;

impl LayersPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, project: &mut EditorProject) {
        ui.heading(t!("layers.title"));
        ui.separator();

        if project.document.layers.is_empty() {
            ui.weak(t!("layers.empty"));
            return;
        }

        let mut action = None;
        egui::ScrollArea::vertical()
            .id_source("layers_panel_scroll")
            .show(ui, |ui| {
                // Topmost layer first, matching visual stacking.
                let selected = project.document.selected_layer_id.clone();
                for layer in project.document.layers.iter().rev() {
                    let is_selected = selected.as_deref() == Some(layer.id.as_str());
                    if let Some(a) = layer_row(ui, layer, is_selected) {
                        action = Some(a);
                    }
                }
            });

        match action {
            Some(RowAction::Select(id)) => {
                let doc = project.document.with_selection(Some(&id));
                project.apply_visual(doc);
            }
            Some(RowAction::ToggleLock(id)) => {
                if let Some(layer) = project.document.layer(&id) {
                    let description = if layer.locked {
                        t!("history.unlock_layer")
                    } else {
                        t!("history.lock_layer")
                    };
                    let patch = crate::document::LayerPatch {
                        locked: Some(!layer.locked),
                        ..Default::default()
                    };
                    let doc = project.document.with_layer_patched(&id, &patch);
                    project.commit(doc, description);
                }
            }
            Some(RowAction::Delete(id)) => {
                let doc = project.document.without_layer(&id);
                project.commit(doc, t!("history.delete_layer"));
            }
            None => {}
        }
    }
}

fn kind_icon(kind: LayerKind) -> &'static str {
    match kind {
        LayerKind::Text => "🅣",
        LayerKind::Image => "🖼",
        LayerKind::Shape => "⬛",
    }
}

fn layer_row(ui: &mut egui::Ui, layer: &Layer, is_selected: bool) -> Option<RowAction> {
    let mut action = None;
    let fill = if is_selected {
        ui.visuals().selection.bg_fill.linear_multiply(0.3)
    } else {
        Color32::TRANSPARENT
    };
    egui::Frame::none()
        .fill(fill)
        .inner_margin(egui::Margin::symmetric(6.0, 4.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(kind_icon(layer.kind));
                let name = if is_selected {
                    RichText::new(&layer.name).strong()
                } else {
                    RichText::new(&layer.name)
                };
                if ui
                    .add(egui::Label::new(name).sense(egui::Sense::click()))
                    .clicked()
                {
                    action = Some(RowAction::Select(layer.id.clone()));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .small_button("🗑")
                        .on_hover_text(t!("layers.delete"))
                        .clicked()
                    {
                        action = Some(RowAction::Delete(layer.id.clone()));
                    }
                    let lock_icon = if layer.locked { "🔒" } else { "🔓" };
                    let lock_hint = if layer.locked {
                        t!("layers.unlock")
                    } else {
                        t!("layers.lock")
                    };
                    if ui.small_button(lock_icon).on_hover_text(lock_hint).clicked() {
                        action = Some(RowAction::ToggleLock(layer.id.clone()));
                    }
                });
            });
        });
    action
}

/// Single-step reorder of the selected layer, committed as one history entry.
/// Boundary moves are pure no-ops: no commit, no history churn.
pub fn reorder_selected(project: &mut EditorProject, direction: ReorderDirection) {
    let Some(id) = project.document.selected_layer_id.clone() else {
        return;
    };
    if let Some(doc) = project.document.with_layer_reordered(&id, direction) {
        let description = match direction {
            ReorderDirection::Forward => t!("history.bring_forward"),
            ReorderDirection::Backward => t!("history.send_backward"),
        };
        project.commit(doc, description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn boundary_reorder_leaves_history_untouched() {
        let doc = Document::blank(100, 100).with_shape_layer();
        let mut project = EditorProject::new(doc);
        let before = project.history.len();
        // Only one layer: both directions hit the boundary.
        reorder_selected(&mut project, ReorderDirection::Forward);
        reorder_selected(&mut project, ReorderDirection::Backward);
        assert_eq!(project.history.len(), before);
    }

    #[test]
    fn reorder_without_selection_is_a_no_op() {
        let doc = Document::blank(100, 100);
        let mut project = EditorProject::new(doc);
        reorder_selected(&mut project, ReorderDirection::Forward);
        assert_eq!(project.history.len(), 1);
    }
}

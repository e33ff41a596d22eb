// ============================================================================
// PROPERTIES PANEL — edits for the selected layer
// ============================================================================
//
// Continuous controls (sliders, drag values, text fields) stream visual-only
// updates while held and commit one history entry when the interaction ends.
// Discrete controls (toggles, swatches, combo picks) commit immediately.

use eframe::egui::{self, Slider};

use crate::document::{Layer, LayerContent, LayerKind, LayerPatch, LayerStyle};
use crate::project::EditorProject;

const FONT_FAMILIES: [&str; 8] = [
    "Inter",
    "Oswald",
    "Playfair Display",
    "Orbitron",
    "Arial",
    "Georgia",
    "Impact",
    "Courier New",
];

const SWATCHES: [&str; 10] = [
    "#ffffff", "#000000", "#ef4444", "#f97316", "#facc15", "#22c55e", "#3b82f6", "#8b5cf6",
    "#ec4899", "#64748b",
];

#[derive(Default)]
pub struct PropertiesPanel {
    /// Pending uncommitted slider/drag edits, flushed on release.
    dirty: bool,
}

impl PropertiesPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, project: &mut EditorProject) {
        ui.heading(t!("properties.title"));
        ui.separator();

        let Some(layer) = project.document.selected_layer().cloned() else {
            ui.weak(t!("properties.none_selected"));
            return;
        };
        if layer.locked {
            ui.weak(t!("properties.locked"));
            return;
        }

        match &layer.content {
            LayerContent::Text(text) => self.text_controls(ui, project, &layer, text),
            _ => {}
        }
        self.geometry_controls(ui, project, &layer);
        self.style_controls(ui, project, &layer);
    }

    fn text_controls(&mut self, ui: &mut egui::Ui, project: &mut EditorProject, layer: &Layer, text: &str) {
        ui.label(t!("properties.text"));
        let mut content = text.to_string();
        let response = ui.text_edit_multiline(&mut content);
        if response.changed() {
            let patch = LayerPatch {
                text: Some(content),
                ..Default::default()
            };
            let doc = project.document.with_layer_patched(&layer.id, &patch);
            project.apply_visual(doc);
            self.dirty = true;
        }
        if response.lost_focus() && self.dirty {
            self.dirty = false;
            project.commit_current(t!("history.edit_text"));
        }
        ui.add_space(6.0);
    }

    fn geometry_controls(&mut self, ui: &mut egui::Ui, project: &mut EditorProject, layer: &Layer) {
        let mut width = layer.width;
        let mut height = layer.height;
        let mut rotation = layer.rotation;
        let mut changed = false;
        let mut finished = false;

        ui.horizontal(|ui| {
            ui.label(t!("properties.width"));
            let r = ui.add(egui::DragValue::new(&mut width).clamp_range(0.0..=8192.0));
            changed |= r.changed();
            finished |= r.drag_released() || r.lost_focus();
            ui.label(t!("properties.height"));
            let r = ui.add(egui::DragValue::new(&mut height).clamp_range(0.0..=8192.0));
            changed |= r.changed();
            finished |= r.drag_released() || r.lost_focus();
        });
        ui.horizontal(|ui| {
            ui.label(t!("properties.rotation"));
            let r = ui.add(Slider::new(&mut rotation, 0.0..=360.0).suffix("°"));
            changed |= r.changed();
            finished |= r.drag_released();
        });

        if changed {
            let patch = LayerPatch {
                width: Some(width),
                height: Some(height),
                rotation: Some(rotation),
                ..Default::default()
            };
            let doc = project.document.with_layer_patched(&layer.id, &patch);
            project.apply_visual(doc);
            self.dirty = true;
        }
        if finished && self.dirty {
            self.dirty = false;
            project.commit_current(t!("history.resize_layer"));
        }
        ui.add_space(6.0);
    }

    fn style_controls(&mut self, ui: &mut egui::Ui, project: &mut EditorProject, layer: &Layer) {
        // Text layers edit the glyph color, everything else the fill.
        let color_is_fill = layer.kind != LayerKind::Text;
        let current = if color_is_fill {
            layer.style.background_color.as_deref()
        } else {
            layer.style.color.as_deref()
        }
        .unwrap_or("#ffffff")
        .to_string();

        ui.label(t!("properties.color"));
        ui.horizontal_wrapped(|ui| {
            for swatch in SWATCHES {
                let color = crate::ops::export::parse_color(swatch)
                    .map(|c| egui::Color32::from_rgb(c[0], c[1], c[2]))
                    .unwrap_or(egui::Color32::WHITE);
                let selected = current.eq_ignore_ascii_case(swatch);
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::click());
                ui.painter().rect_filled(rect, egui::Rounding::same(3.0), color);
                if selected {
                    ui.painter().rect_stroke(
                        rect,
                        egui::Rounding::same(3.0),
                        egui::Stroke::new(2.0, ui.visuals().strong_text_color()),
                    );
                }
                if response.clicked() {
                    self.commit_color(project, layer, color_is_fill, swatch);
                }
            }
        });
        // Free-form picker beside the swatches.
        if let Some(parsed) = crate::ops::export::parse_color(&current) {
            let mut rgb = [parsed[0], parsed[1], parsed[2]];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                let hex = format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]);
                self.commit_color(project, layer, color_is_fill, &hex);
            }
        }
        ui.add_space(6.0);

        if layer.kind == LayerKind::Text {
            self.font_controls(ui, project, layer);
        }
        self.opacity_control(ui, project, layer);
    }

    fn commit_color(&mut self, project: &mut EditorProject, layer: &Layer, is_fill: bool, hex: &str) {
        let patch = if is_fill {
            LayerStyle {
                background_color: Some(hex.to_string()),
                ..Default::default()
            }
        } else {
            LayerStyle {
                color: Some(hex.to_string()),
                ..Default::default()
            }
        };
        let doc = project.document.with_style_merged(&layer.id, &patch);
        project.commit(doc, t!("history.change_color"));
    }

    fn font_controls(&mut self, ui: &mut egui::Ui, project: &mut EditorProject, layer: &Layer) {
        let family = layer.style.font_family.clone().unwrap_or_else(|| "Inter".to_string());
        egui::ComboBox::from_label(t!("properties.font"))
            .selected_text(family.clone())
            .show_ui(ui, |ui| {
                for option in FONT_FAMILIES {
                    if ui.selectable_label(family == option, option).clicked() && family != option {
                        let patch = LayerStyle {
                            font_family: Some(option.to_string()),
                            ..Default::default()
                        };
                        let doc = project.document.with_style_merged(&layer.id, &patch);
                        project.commit(doc, t!("history.change_font"));
                    }
                }
            });

        ui.horizontal(|ui| {
            let bold = layer.style.is_bold();
            if ui.selectable_label(bold, egui::RichText::new("B").strong()).clicked() {
                let patch = LayerStyle {
                    font_weight: Some(if bold { "normal" } else { "bold" }.to_string()),
                    ..Default::default()
                };
                let doc = project.document.with_style_merged(&layer.id, &patch);
                project.commit(doc, t!("history.change_font"));
            }
            let italic = layer.style.is_italic();
            if ui.selectable_label(italic, egui::RichText::new("I").italics()).clicked() {
                let patch = LayerStyle {
                    font_style: Some(if italic { "normal" } else { "italic" }.to_string()),
                    ..Default::default()
                };
                let doc = project.document.with_style_merged(&layer.id, &patch);
                project.commit(doc, t!("history.change_font"));
            }
        });

        let mut font_size = layer.style.font_size.unwrap_or(60.0);
        ui.horizontal(|ui| {
            ui.label(t!("properties.font_size"));
            let r = ui.add(Slider::new(&mut font_size, 12.0..=300.0));
            if r.changed() {
                let patch = LayerStyle {
                    font_size: Some(font_size),
                    ..Default::default()
                };
                let doc = project.document.with_style_merged(&layer.id, &patch);
                project.apply_visual(doc);
                self.dirty = true;
            }
            if r.drag_released() && self.dirty {
                self.dirty = false;
                project.commit_current(t!("history.change_font_size"));
            }
        });
        ui.add_space(6.0);
    }

    fn opacity_control(&mut self, ui: &mut egui::Ui, project: &mut EditorProject, layer: &Layer) {
        let mut opacity = layer.style.opacity.unwrap_or(1.0);
        ui.horizontal(|ui| {
            ui.label(t!("properties.opacity"));
            let r = ui.add(Slider::new(&mut opacity, 0.0..=1.0));
            if r.changed() {
                let patch = LayerStyle {
                    opacity: Some(opacity),
                    ..Default::default()
                };
                let doc = project.document.with_style_merged(&layer.id, &patch);
                project.apply_visual(doc);
                self.dirty = true;
            }
            if r.drag_released() && self.dirty {
                self.dirty = false;
                project.commit_current(t!("history.change_opacity"));
            }
        });
    }
}

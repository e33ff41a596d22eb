// ============================================================================
// EDITOR CANVAS — zoomable, pannable layer preview with direct manipulation
// ============================================================================
//
// The canvas never mutates document state directly. Pointer and keyboard
// input produce either visual-only document replacements (drag in progress)
// or history commits (interaction end), all through `EditorProject`.

use std::collections::HashMap;

use eframe::egui::{
    self, Color32, FontFamily, FontId, Pos2, Rect, Rounding, Sense, Stroke, TextureHandle,
    TextureOptions, Vec2,
};
use eframe::epaint::{Mesh, TextShape, Vertex, WHITE_UV};
use uuid::Uuid;

use crate::document::{Document, Layer, LayerContent, LayerPatch, ShapeKind, TextAlign};
use crate::ops::export;
use crate::project::EditorProject;

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.1;
/// Fit-to-viewport never zooms past this, leaving breathing room around the
/// document.
const FIT_MAX: f32 = 0.65;
const FIT_MIN: f32 = 0.15;

/// Map a document-space point to screen space.
pub fn doc_to_screen(doc_pos: Pos2, origin: Pos2, zoom: f32) -> Pos2 {
    Pos2::new(origin.x + doc_pos.x * zoom, origin.y + doc_pos.y * zoom)
}

/// Map a screen-space point back into document space.
pub fn screen_to_doc(screen_pos: Pos2, origin: Pos2, zoom: f32) -> Pos2 {
    Pos2::new((screen_pos.x - origin.x) / zoom, (screen_pos.y - origin.y) / zoom)
}

/// An in-progress pointer interaction.
enum PointerDrag {
    /// Moving a layer; `grab` is the doc-space offset from the layer origin
    /// to the pointer at drag start, kept so the layer doesn't jump.
    MoveLayer { layer_id: String, grab: Vec2 },
    /// Panning the viewport from an empty-background drag.
    Pan,
}

pub struct EditorView {
    pub zoom: f32,
    pan_offset: Vec2,
    pub last_canvas_rect: Option<Rect>,
    /// (doc w, doc h, viewport size) the current fit was computed for.
    fitted_for: Option<(u32, u32, [i32; 2])>,
    drag: Option<PointerDrag>,
    /// True while arrow-key nudges have moved the selection without a commit.
    nudge_pending: bool,
    /// Image layer textures, keyed by the pixel buffer id.
    textures: HashMap<Uuid, TextureHandle>,
    /// Uploaded background preview, keyed by the descriptor string.
    background_tex: Option<(String, u32, u32, TextureHandle)>,
    /// Screen-space bounds of every painted layer this frame, bottom to top.
    layer_rects: Vec<(String, Rect)>,
    pub selection_stroke: Color32,
}

impl EditorView {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            last_canvas_rect: None,
            fitted_for: None,
            drag: None,
            nudge_pending: false,
            textures: HashMap::new(),
            background_tex: None,
            layer_rects: Vec::new(),
            selection_stroke: Color32::from_rgb(99, 102, 241),
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Force a refit on the next frame (used after loading a template or an
    /// AI layout with different canvas dimensions).
    pub fn request_fit(&mut self) {
        self.fitted_for = None;
    }

    fn fit_to_viewport(&mut self, doc: &Document, viewport: Vec2) {
        let fit = (viewport.x / doc.width as f32)
            .min(viewport.y / doc.height as f32)
            .min(FIT_MAX)
            .max(FIT_MIN);
        self.zoom = fit;
        self.pan_offset = Vec2::ZERO;
    }

    /// Screen position of the document's top-left corner.
    fn doc_origin(&self, canvas_rect: Rect, doc: &Document) -> Pos2 {
        let scaled = Vec2::new(doc.width as f32, doc.height as f32) * self.zoom;
        canvas_rect.center() + self.pan_offset - scaled / 2.0
    }

    pub fn show(&mut self, ui: &mut egui::Ui, project: &mut EditorProject) {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
        let canvas_rect = response.rect;
        self.last_canvas_rect = Some(canvas_rect);

        // Refit when the document dimensions or the viewport change, but not
        // while the user is typing (a text edit resizing the side panel must
        // not yank the zoom level around).
        let doc_dims = (project.document.width, project.document.height);
        let viewport_key = [canvas_rect.width() as i32, canvas_rect.height() as i32];
        let fit_key = (doc_dims.0, doc_dims.1, viewport_key);
        if self.fitted_for != Some(fit_key) && !ui.ctx().wants_keyboard_input() {
            let doc = project.document.clone();
            self.fit_to_viewport(&doc, canvas_rect.size());
            self.fitted_for = Some(fit_key);
        }

        // Ctrl+scroll zooms in the same steps as the toolbar buttons.
        if response.hovered() {
            let scroll = ui.input(|i| {
                if i.modifiers.command {
                    i.scroll_delta.y
                } else {
                    0.0
                }
            });
            if scroll > 0.0 {
                self.zoom_in();
            } else if scroll < 0.0 {
                self.zoom_out();
            }
        }

        let doc = project.document.clone();
        self.paint(ui, &painter, canvas_rect, &doc);
        self.handle_pointer(&response, canvas_rect, project);
        self.handle_keys(ui, project);
    }

    // ------------------------------------------------------------------------
    // input
    // ------------------------------------------------------------------------

    /// Topmost layer under a screen point, using this frame's painted bounds.
    fn hit_layer(&self, pos: Pos2) -> Option<&str> {
        self.layer_rects
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(id, _)| id.as_str())
    }

    fn handle_pointer(&mut self, response: &egui::Response, canvas_rect: Rect, project: &mut EditorProject) {
        let origin = self.doc_origin(canvas_rect, &project.document);
        let zoom = self.zoom;

        if response.drag_started() {
            if let Some(pointer) = response.interact_pointer_pos() {
                match self.hit_layer(pointer) {
                    Some(id) => {
                        let id = id.to_string();
                        let doc = project.document.with_selection(Some(&id));
                        project.apply_visual(doc);
                        let doc_pointer = screen_to_doc(pointer, origin, zoom);
                        if let Some(grab) = grab_for_move(&project.document, &id, doc_pointer) {
                            self.drag = Some(PointerDrag::MoveLayer { layer_id: id, grab });
                        }
                    }
                    None => {
                        let doc = project.document.with_selection(None);
                        project.apply_visual(doc);
                        self.drag = Some(PointerDrag::Pan);
                    }
                }
            }
        } else if response.dragged() {
            match &self.drag {
                Some(PointerDrag::MoveLayer { layer_id, grab }) => {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        let doc_pointer = screen_to_doc(pointer, origin, zoom);
                        let patch =
                            LayerPatch::position(doc_pointer.x - grab.x, doc_pointer.y - grab.y);
                        let doc = project.document.with_layer_patched(layer_id, &patch);
                        project.apply_visual(doc);
                    }
                }
                Some(PointerDrag::Pan) => {
                    // Raw screen delta, independent of zoom.
                    self.pan_offset += response.drag_delta();
                }
                None => {}
            }
        } else if response.drag_released() {
            if let Some(PointerDrag::MoveLayer { .. }) = self.drag.take() {
                project.commit_current(t!("history.move_layer"));
            }
            self.drag = None;
        } else if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let selection = self.hit_layer(pointer).map(str::to_string);
                let doc = project.document.with_selection(selection.as_deref());
                project.apply_visual(doc);
            }
        }
    }

    /// Arrow-key nudging of the selected, unlocked layer. Repeats move the
    /// layer visually; the release of the last arrow key commits once.
    fn handle_keys(&mut self, ui: &egui::Ui, project: &mut EditorProject) {
        if ui.ctx().wants_keyboard_input() {
            // A text field grabbed focus mid-nudge; its key release will
            // never reach us, so flush the pending commit now.
            self.flush_pending_nudge(project);
            return;
        }
        const ARROWS: [(egui::Key, f32, f32); 4] = [
            (egui::Key::ArrowLeft, -1.0, 0.0),
            (egui::Key::ArrowRight, 1.0, 0.0),
            (egui::Key::ArrowUp, 0.0, -1.0),
            (egui::Key::ArrowDown, 0.0, 1.0),
        ];
        let (mut dx, mut dy, mut released) = (0.0f32, 0.0f32, false);
        ui.input(|i| {
            let step = if i.modifiers.shift { 10.0 } else { 1.0 };
            for (key, kx, ky) in ARROWS {
                if i.key_pressed(key) {
                    dx += kx * step;
                    dy += ky * step;
                }
                if i.key_released(key) {
                    released = true;
                }
            }
        });

        if (dx != 0.0 || dy != 0.0) && nudge_selected(project, dx, dy) {
            self.nudge_pending = true;
        }
        if released {
            self.flush_pending_nudge(project);
        }
    }

    /// Commit accumulated nudge motion as one history entry. No-op when no
    /// nudge is pending.
    fn flush_pending_nudge(&mut self, project: &mut EditorProject) {
        if self.nudge_pending {
            self.nudge_pending = false;
            project.commit_current(t!("history.nudge_layer"));
        }
    }

    // ------------------------------------------------------------------------
    // painting
    // ------------------------------------------------------------------------

    fn paint(&mut self, ui: &egui::Ui, painter: &egui::Painter, canvas_rect: Rect, doc: &Document) {
        painter.rect_filled(canvas_rect, Rounding::ZERO, ui.visuals().extreme_bg_color);

        let origin = self.doc_origin(canvas_rect, doc);
        let doc_screen = Rect::from_min_size(
            origin,
            Vec2::new(doc.width as f32, doc.height as f32) * self.zoom,
        );
        self.paint_document_background(ui, painter, doc_screen, doc);

        self.layer_rects.clear();
        let mut selected_rect = None;
        for layer in &doc.layers {
            let rect = self.paint_layer(ui, painter, origin, layer);
            if doc.selected_layer_id.as_deref() == Some(layer.id.as_str()) {
                selected_rect = Some(rect);
            }
            self.layer_rects.push((layer.id.clone(), rect));
        }

        if let Some(rect) = selected_rect {
            let outline = rect.expand(2.0);
            painter.rect_stroke(
                outline,
                Rounding::same(2.0),
                Stroke::new(2.0, self.selection_stroke),
            );
            for corner in [
                outline.left_top(),
                outline.right_top(),
                outline.right_bottom(),
                outline.left_bottom(),
            ] {
                painter.rect_filled(
                    Rect::from_center_size(corner, Vec2::splat(7.0)),
                    Rounding::same(1.0),
                    self.selection_stroke,
                );
            }
        }
        self.prune_textures(doc);
    }

    /// Solid colors paint directly; gradients are rasterized once by the
    /// export renderer and cached as a texture so the preview matches the
    /// exported pixels.
    fn paint_document_background(
        &mut self,
        ui: &egui::Ui,
        painter: &egui::Painter,
        doc_screen: Rect,
        doc: &Document,
    ) {
        if let Some(color) = export::parse_color(&doc.background) {
            painter.rect_filled(doc_screen, Rounding::ZERO, rgba(color));
            return;
        }
        let stale = match &self.background_tex {
            Some((desc, w, h, _)) => {
                desc != &doc.background || *w != doc.width || *h != doc.height
            }
            None => true,
        };
        if stale {
            // Quarter resolution is plenty for a smooth gradient preview.
            let (w, h) = ((doc.width / 4).max(1), (doc.height / 4).max(1));
            let pixels = export::render_background(w, h, &doc.background);
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [pixels.width() as usize, pixels.height() as usize],
                pixels.as_raw(),
            );
            let handle =
                ui.ctx()
                    .load_texture("doc-background", color_image, TextureOptions::LINEAR);
            self.background_tex = Some((doc.background.clone(), doc.width, doc.height, handle));
        }
        if let Some((_, _, _, handle)) = &self.background_tex {
            painter.image(
                handle.id(),
                doc_screen,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    /// Paint one layer; returns its unrotated screen bounds for hit testing
    /// and the selection overlay.
    fn paint_layer(&mut self, ui: &egui::Ui, painter: &egui::Painter, origin: Pos2, layer: &Layer) -> Rect {
        let zoom = self.zoom;
        let top_left = doc_to_screen(Pos2::new(layer.x, layer.y), origin, zoom);
        let opacity = layer.style.opacity.unwrap_or(1.0).clamp(0.0, 1.0);

        match &layer.content {
            LayerContent::Shape(kind) => {
                let rect = Rect::from_min_size(
                    top_left,
                    Vec2::new(layer.width, layer.height) * zoom,
                );
                let fill = style_color(layer, opacity);
                match kind {
                    ShapeKind::Circle => {
                        // Painted as an ellipse via max rounding.
                        paint_quad(painter, rect, layer.rotation, fill, rect.width().min(rect.height()) / 2.0);
                    }
                    ShapeKind::Rect => {
                        let radius = layer.style.border_radius.unwrap_or(0.0) * zoom;
                        paint_quad(painter, rect, layer.rotation, fill, radius);
                    }
                }
                if let Some(border) = layer
                    .style
                    .border_color
                    .as_deref()
                    .and_then(export::parse_color)
                {
                    let width = layer.style.border_width.unwrap_or(1.0) * zoom;
                    painter.rect_stroke(
                        rect,
                        Rounding::same(layer.style.border_radius.unwrap_or(0.0) * zoom),
                        Stroke::new(width, rgba(border)),
                    );
                }
                rect
            }
            LayerContent::Image(image) => {
                let rect = Rect::from_min_size(
                    top_left,
                    Vec2::new(layer.width, layer.height) * zoom,
                );
                let handle = self.textures.entry(image.id).or_insert_with(|| {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.pixels.width() as usize, image.pixels.height() as usize],
                        image.pixels.as_raw(),
                    );
                    ui.ctx().load_texture(
                        format!("layer-{}", image.id),
                        color_image,
                        TextureOptions::LINEAR,
                    )
                });
                let tint = Color32::from_white_alpha((opacity * 255.0) as u8);
                paint_image_quad(painter, handle, rect, layer.rotation, tint);
                rect
            }
            LayerContent::Text(text) => {
                let style = &layer.style;
                let content = style.text_transform.unwrap_or_default().apply(text);
                let size = style.font_size.unwrap_or(60.0) * zoom;
                let color = style
                    .color
                    .as_deref()
                    .and_then(export::parse_color)
                    .unwrap_or([255, 255, 255, 255]);
                let galley = painter.layout_no_wrap(
                    content,
                    FontId::new(size.max(1.0), FontFamily::Proportional),
                    rgba(with_opacity(color, opacity)),
                );
                let galley_size = galley.size();
                // Auto-sized text centers its box on the galley; fixed boxes
                // align the galley inside the declared width.
                let box_w = if layer.width > 0.0 {
                    layer.width * zoom
                } else {
                    galley_size.x
                };
                let align_x = match style.text_align.unwrap_or(TextAlign::Left) {
                    TextAlign::Left => 0.0,
                    TextAlign::Center => (box_w - galley_size.x) / 2.0,
                    TextAlign::Right => box_w - galley_size.x,
                };
                let rect = Rect::from_min_size(top_left, Vec2::new(box_w, galley_size.y));
                let text_pos = Pos2::new(top_left.x + align_x, top_left.y);
                if layer.rotation == 0.0 {
                    painter.galley(text_pos, galley);
                } else {
                    let angle = layer.rotation.to_radians();
                    let center = rect.center();
                    let (sin, cos) = angle.sin_cos();
                    let rel = text_pos - center;
                    let rotated = Pos2::new(
                        center.x + rel.x * cos - rel.y * sin,
                        center.y + rel.x * sin + rel.y * cos,
                    );
                    let mut shape = TextShape::new(rotated, galley);
                    shape.angle = angle;
                    painter.add(shape);
                }
                rect
            }
        }
    }

    /// Drop textures for image buffers no longer referenced by any layer.
    fn prune_textures(&mut self, doc: &Document) {
        if self.textures.is_empty() {
            return;
        }
        let live: std::collections::HashSet<Uuid> = doc
            .layers
            .iter()
            .filter_map(|l| match &l.content {
                LayerContent::Image(img) => Some(img.id),
                _ => None,
            })
            .collect();
        self.textures.retain(|id, _| live.contains(id));
    }
}

/// Doc-space grab offset for starting a move drag. `None` when the layer is
/// locked or missing; locked layers can be selected but never moved.
fn grab_for_move(doc: &Document, id: &str, pointer_doc: Pos2) -> Option<Vec2> {
    let layer = doc.layer(id).filter(|l| !l.locked)?;
    Some(Vec2::new(pointer_doc.x - layer.x, pointer_doc.y - layer.y))
}

/// Move the selected layer by (dx, dy) as a visual-only update. Locked or
/// absent selections stay untouched; returns whether anything moved.
fn nudge_selected(project: &mut EditorProject, dx: f32, dy: f32) -> bool {
    let patch = project
        .document
        .selected_layer()
        .filter(|l| !l.locked)
        .map(|l| (l.id.clone(), LayerPatch::position(l.x + dx, l.y + dy)));
    match patch {
        Some((id, patch)) => {
            let doc = project.document.with_layer_patched(&id, &patch);
            project.apply_visual(doc);
            true
        }
        None => false,
    }
}

fn rgba(c: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

fn with_opacity(mut c: [u8; 4], opacity: f32) -> [u8; 4] {
    c[3] = (c[3] as f32 * opacity).round() as u8;
    c
}

fn style_color(layer: &Layer, opacity: f32) -> Color32 {
    let base = layer
        .style
        .background_color
        .as_deref()
        .and_then(export::parse_color)
        .unwrap_or([0, 0, 0, 0]);
    rgba(with_opacity(base, opacity))
}

/// Filled quad with optional rotation. Unrotated quads keep their corner
/// rounding; rotated ones are drawn as a rotated mesh (egui strokes and
/// roundings don't rotate).
fn paint_quad(painter: &egui::Painter, rect: Rect, rotation_deg: f32, fill: Color32, radius: f32) {
    if rotation_deg == 0.0 {
        painter.rect_filled(rect, Rounding::same(radius), fill);
        return;
    }
    let mut mesh = Mesh::default();
    push_rotated_quad(&mut mesh, rect, rotation_deg, fill, None);
    painter.add(mesh);
}

fn paint_image_quad(
    painter: &egui::Painter,
    handle: &TextureHandle,
    rect: Rect,
    rotation_deg: f32,
    tint: Color32,
) {
    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    if rotation_deg == 0.0 {
        painter.image(handle.id(), rect, uv, tint);
        return;
    }
    let mut mesh = Mesh::with_texture(handle.id());
    push_rotated_quad(&mut mesh, rect, rotation_deg, tint, Some(uv));
    painter.add(mesh);
}

/// `uv = None` means untextured (solid fill via the font atlas white texel).
fn push_rotated_quad(mesh: &mut Mesh, rect: Rect, rotation_deg: f32, color: Color32, uv: Option<Rect>) {
    let angle = rotation_deg.to_radians();
    let (sin, cos) = angle.sin_cos();
    let center = rect.center();
    let rotate = |p: Pos2| {
        let rel = p - center;
        Pos2::new(
            center.x + rel.x * cos - rel.y * sin,
            center.y + rel.x * sin + rel.y * cos,
        )
    };
    let base = mesh.vertices.len() as u32;
    let uvs = match uv {
        Some(uv) => [uv.left_top(), uv.right_top(), uv.right_bottom(), uv.left_bottom()],
        None => [WHITE_UV; 4],
    };
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    for (pos, uv) in corners.into_iter().zip(uvs) {
        mesh.vertices.push(Vertex { pos: rotate(pos), uv, color });
    }
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_doc_round_trip() {
        let origin = Pos2::new(137.0, 42.0);
        let zoom = 0.65;
        let doc_pos = Pos2::new(640.0, 360.0);
        let screen = doc_to_screen(doc_pos, origin, zoom);
        let back = screen_to_doc(screen, origin, zoom);
        assert!((back.x - doc_pos.x).abs() < 1e-3);
        assert!((back.y - doc_pos.y).abs() < 1e-3);
    }

    #[test]
    fn screen_to_doc_divides_by_zoom() {
        let origin = Pos2::new(100.0, 100.0);
        let doc = screen_to_doc(Pos2::new(165.0, 100.0), origin, 0.5);
        assert_eq!(doc, Pos2::new(130.0, 0.0));
    }

    #[test]
    fn zoom_steps_clamp_to_range() {
        let mut view = EditorView::new();
        view.zoom = 1.95;
        view.zoom_in();
        assert_eq!(view.zoom, MAX_ZOOM);
        view.zoom = 0.15;
        view.zoom_out();
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    fn project_with_layer(locked: bool) -> (EditorProject, String) {
        let doc = Document::blank(400, 300).with_shape_layer();
        let id = doc.selected_layer_id.clone().unwrap();
        let doc = doc.with_layer_patched(
            &id,
            &LayerPatch {
                locked: Some(locked),
                ..Default::default()
            },
        );
        (EditorProject::new(doc), id)
    }

    #[test]
    fn locked_layer_geometry_survives_move_attempts() {
        let (mut project, id) = project_with_layer(true);
        let before = project.document.layer(&id).cloned().unwrap();

        // Drag admission: no grab offset for a locked layer.
        let pointer = Pos2::new(before.x + 5.0, before.y + 5.0);
        assert!(grab_for_move(&project.document, &id, pointer).is_none());
        // Keyboard nudge: rejected outright.
        assert!(!nudge_selected(&mut project, 10.0, -10.0));

        let after = project.document.layer(&id).unwrap();
        assert_eq!(
            (after.x, after.y, after.width, after.height),
            (before.x, before.y, before.width, before.height)
        );

        // Lock-toggle and delete still succeed on the same layer.
        let unlocked = project.document.with_layer_patched(
            &id,
            &LayerPatch {
                locked: Some(false),
                ..Default::default()
            },
        );
        assert!(!unlocked.layer(&id).unwrap().locked);
        let deleted = project.document.without_layer(&id);
        assert!(deleted.layer(&id).is_none());
    }

    #[test]
    fn unlocked_layer_nudges_and_grabs() {
        let (mut project, id) = project_with_layer(false);
        let before_x = project.document.layer(&id).unwrap().x;

        assert!(nudge_selected(&mut project, 10.0, 0.0));
        let layer = project.document.layer(&id).unwrap();
        assert_eq!(layer.x, before_x + 10.0);

        let pointer = Pos2::new(layer.x + 3.0, layer.y + 4.0);
        assert_eq!(
            grab_for_move(&project.document, &id, pointer),
            Some(Vec2::new(3.0, 4.0))
        );
    }

    #[test]
    fn pending_nudge_flushes_once() {
        let (mut project, _id) = project_with_layer(false);
        let mut view = EditorView::new();
        assert!(nudge_selected(&mut project, 1.0, 0.0));
        view.nudge_pending = true;

        let before = project.history.len();
        view.flush_pending_nudge(&mut project);
        assert_eq!(project.history.len(), before + 1);
        // Focus changes and key releases may both call this; only the first
        // flush after a nudge commits.
        view.flush_pending_nudge(&mut project);
        assert_eq!(project.history.len(), before + 1);
    }

    #[test]
    fn fit_caps_and_floors() {
        let mut view = EditorView::new();
        let doc = Document::blank(1280, 720);
        // Huge viewport: capped at the fit ceiling.
        view.fit_to_viewport(&doc, Vec2::new(10_000.0, 10_000.0));
        assert_eq!(view.zoom, 0.65);
        // Tiny viewport: floored.
        view.fit_to_viewport(&doc, Vec2::new(50.0, 50.0));
        assert_eq!(view.zoom, 0.15);
        // Normal viewport: limited by the tighter axis.
        view.fit_to_viewport(&doc, Vec2::new(640.0, 720.0));
        assert_eq!(view.zoom, 0.5);
    }
}

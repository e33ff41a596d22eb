use std::sync::Arc;

use image::RgbaImage;
use uuid::Uuid;

/// Default canvas dimensions (YouTube thumbnail size).
pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;

// ============================================================================
// LAYER TYPES
// ============================================================================

/// What a layer renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Text,
    Image,
    Shape,
}

impl LayerKind {
    pub fn label(&self) -> String {
        match self {
            LayerKind::Text => t!("layer.kind.text"),
            LayerKind::Image => t!("layer.kind.image"),
            LayerKind::Shape => t!("layer.kind.shape"),
        }
    }
}

/// Shape primitives supported by shape layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rect,
    Circle,
}

impl ShapeKind {
    /// Wire tag used by templates and the AI design model.
    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("circle") {
            ShapeKind::Circle
        } else {
            ShapeKind::Rect
        }
    }
}

/// Decoded image pixels shared between the live document, history snapshots
/// and the exporter. The id keys the editor's texture cache; cloning a layer
/// only bumps the `Arc` refcount.
#[derive(Clone)]
pub struct ImageRef {
    pub id: Uuid,
    pub pixels: Arc<RgbaImage>,
}

impl ImageRef {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            pixels: Arc::new(pixels),
        }
    }
}

/// Type-specific layer payload.
#[derive(Clone)]
pub enum LayerContent {
    /// Text string (may contain newlines).
    Text(String),
    Shape(ShapeKind),
    Image(ImageRef),
}

// ============================================================================
// LAYER STYLE — optional presentation attributes, unset keys use defaults
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn from_keyword(s: &str) -> Self {
        match s {
            "left" => TextAlign::Left,
            "right" => TextAlign::Right,
            _ => TextAlign::Center,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
}

impl TextTransform {
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
        }
    }
}

/// Optional presentation attributes. Every field is `Option` so a style merge
/// can distinguish "explicitly set" from "renderer default".
#[derive(Clone, Debug, Default)]
pub struct LayerStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    /// CSS-style weight keyword or number ("bold", "800", ...).
    pub font_weight: Option<String>,
    /// "italic" or "normal".
    pub font_style: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub border_radius: Option<f32>,
    pub border_color: Option<String>,
    pub border_width: Option<f32>,
    /// "x y [blur] color", e.g. "10px 10px 0px #000000".
    pub text_shadow: Option<String>,
    pub opacity: Option<f32>,
    pub text_align: Option<TextAlign>,
    pub padding: Option<f32>,
    pub text_transform: Option<TextTransform>,
    pub letter_spacing: Option<f32>,
}

impl LayerStyle {
    /// Merge `patch` over `self`: any key set in `patch` overrides the
    /// existing value, unset keys are preserved.
    pub fn merged(&self, patch: &LayerStyle) -> LayerStyle {
        macro_rules! pick {
            ($field:ident) => {
                patch.$field.clone().or_else(|| self.$field.clone())
            };
        }
        LayerStyle {
            font_family: pick!(font_family),
            font_size: pick!(font_size),
            font_weight: pick!(font_weight),
            font_style: pick!(font_style),
            color: pick!(color),
            background_color: pick!(background_color),
            border_radius: pick!(border_radius),
            border_color: pick!(border_color),
            border_width: pick!(border_width),
            text_shadow: pick!(text_shadow),
            opacity: pick!(opacity),
            text_align: pick!(text_align),
            padding: pick!(padding),
            text_transform: pick!(text_transform),
            letter_spacing: pick!(letter_spacing),
        }
    }

    pub fn is_bold(&self) -> bool {
        match self.font_weight.as_deref() {
            Some(w) => w == "bold" || w.parse::<u32>().map_or(false, |n| n >= 600),
            None => false,
        }
    }

    pub fn is_italic(&self) -> bool {
        self.font_style.as_deref() == Some("italic")
    }
}

// ============================================================================
// LAYER
// ============================================================================

/// One positioned visual element within a document.
///
/// Positions are in document pixel space (unscaled), measured from the
/// document's top-left. They may be negative or exceed the canvas bounds —
/// layers are never clamped. `width == 0` on a text layer means "auto-sized
/// by content", not an error.
#[derive(Clone)]
pub struct Layer {
    /// Unique, immutable, assigned at creation.
    pub id: String,
    pub kind: LayerKind,
    /// Human label for the layers panel; not unique, not an identifier.
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, unnormalized (rendering wraps visually).
    pub rotation: f32,
    pub content: LayerContent,
    pub style: LayerStyle,
    /// Locked layers reject position/size mutation from interactive input but
    /// remain visible and exportable.
    pub locked: bool,
}

impl Layer {
    fn fresh_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Text layer with the default "headline" style. Width/height 0 = auto.
    pub fn new_text(text: impl Into<String>, x: f32, y: f32, style: LayerStyle) -> Self {
        let defaults = LayerStyle {
            font_family: Some("Inter".to_string()),
            font_size: Some(60.0),
            font_weight: Some("bold".to_string()),
            color: Some("#ffffff".to_string()),
            text_align: Some(TextAlign::Center),
            ..Default::default()
        };
        Self {
            id: Self::fresh_id(),
            kind: LayerKind::Text,
            name: "Text Layer".to_string(),
            x,
            y,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            content: LayerContent::Text(text.into()),
            style: defaults.merged(&style),
            locked: false,
        }
    }

    pub fn new_shape(shape: ShapeKind, x: f32, y: f32, width: f32, height: f32, color: &str) -> Self {
        Self {
            id: Self::fresh_id(),
            kind: LayerKind::Shape,
            name: match shape {
                ShapeKind::Rect => "Rectangle".to_string(),
                ShapeKind::Circle => "Circle".to_string(),
            },
            x,
            y,
            width,
            height,
            rotation: 0.0,
            content: LayerContent::Shape(shape),
            style: LayerStyle {
                background_color: Some(color.to_string()),
                border_radius: Some(if shape == ShapeKind::Circle { 9999.0 } else { 0.0 }),
                ..Default::default()
            },
            locked: false,
        }
    }

    pub fn new_image(name: impl Into<String>, image: ImageRef, x: f32, y: f32, size: f32, circular: bool) -> Self {
        Self {
            id: Self::fresh_id(),
            kind: LayerKind::Image,
            name: name.into(),
            x,
            y,
            width: size,
            height: size,
            rotation: 0.0,
            content: LayerContent::Image(image),
            style: LayerStyle {
                background_color: Some("transparent".to_string()),
                border_radius: Some(if circular { 9999.0 } else { 0.0 }),
                ..Default::default()
            },
            locked: false,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            LayerContent::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn shape(&self) -> Option<ShapeKind> {
        match &self.content {
            LayerContent::Shape(s) => Some(*s),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageRef> {
        match &self.content {
            LayerContent::Image(img) => Some(img),
            _ => None,
        }
    }
}

/// Partial update for a layer. Unset fields leave the layer untouched;
/// this is the one mutation shape both the "visual-only" and the
/// "commit" paths share.
#[derive(Clone, Debug, Default)]
pub struct LayerPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub text: Option<String>,
    pub name: Option<String>,
    pub locked: Option<bool>,
}

impl LayerPatch {
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    fn apply_to(&self, layer: &mut Layer) {
        if let Some(x) = self.x {
            layer.x = x;
        }
        if let Some(y) = self.y {
            layer.y = y;
        }
        if let Some(w) = self.width {
            layer.width = w;
        }
        if let Some(h) = self.height {
            layer.height = h;
        }
        if let Some(r) = self.rotation {
            layer.rotation = r;
        }
        if let Some(ref t) = self.text {
            if matches!(layer.content, LayerContent::Text(_)) {
                layer.content = LayerContent::Text(t.clone());
            }
        }
        if let Some(ref n) = self.name {
            layer.name = n.clone();
        }
        if let Some(l) = self.locked {
            layer.locked = l;
        }
    }
}

// ============================================================================
// DOCUMENT — the root editable unit
// ============================================================================

/// Direction for single-step layer reordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReorderDirection {
    /// Towards the top of the stack (higher z).
    Forward,
    /// Towards the bottom of the stack (lower z).
    Backward,
}

/// The complete editable thumbnail state.
///
/// All update operations produce a NEW `Document` value; nothing mutates in
/// place. That keeps history snapshots trivially correct — a snapshot is just
/// a clone of the value at commit time.
#[derive(Clone)]
pub struct Document {
    /// Color or gradient descriptor (opaque CSS-like string).
    pub background: String,
    pub width: u32,
    pub height: u32,
    /// Z-order: index 0 = bottom.
    pub layers: Vec<Layer>,
    pub selected_layer_id: Option<String>,
}

impl Document {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            background: "#ffffff".to_string(),
            width,
            height,
            layers: Vec::new(),
            selected_layer_id: None,
        }
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected_layer_id
            .as_deref()
            .and_then(|id| self.layer(id))
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    // ---- add operations -----------------------------------------------------

    /// Add a text layer centered on the document and select it.
    pub fn with_text_layer(&self, text: &str) -> Document {
        let (cx, cy) = self.center();
        let layer = Layer::new_text(
            if text.is_empty() { "New Text" } else { text },
            cx - 120.0,
            cy - 30.0,
            LayerStyle::default(),
        );
        self.with_layer_appended(layer)
    }

    /// Add a default 200×200 blue rectangle centered on the document.
    pub fn with_shape_layer(&self) -> Document {
        let (cx, cy) = self.center();
        let layer = Layer::new_shape(ShapeKind::Rect, cx - 100.0, cy - 100.0, 200.0, 200.0, "#3b82f6");
        self.with_layer_appended(layer)
    }

    /// Add an image layer of `size`×`size` centered on the document.
    pub fn with_image_layer(&self, name: &str, image: ImageRef, size: f32, circular: bool) -> Document {
        let (cx, cy) = self.center();
        let layer = Layer::new_image(name, image, cx - size / 2.0, cy - size / 2.0, size, circular);
        self.with_layer_appended(layer)
    }

    /// Append an already-built layer on top of the stack and select it.
    pub fn with_layer_appended(&self, layer: Layer) -> Document {
        let mut doc = self.clone();
        doc.selected_layer_id = Some(layer.id.clone());
        doc.layers.push(layer);
        doc
    }

    // ---- update operations --------------------------------------------------

    /// Apply a partial field update to the layer with `id`.
    /// No-op (returns an identical clone) if the id is absent.
    pub fn with_layer_patched(&self, id: &str, patch: &LayerPatch) -> Document {
        let mut doc = self.clone();
        if let Some(layer) = doc.layers.iter_mut().find(|l| l.id == id) {
            patch.apply_to(layer);
        }
        doc
    }

    /// Merge style keys over the existing style of the layer with `id`.
    pub fn with_style_merged(&self, id: &str, patch: &LayerStyle) -> Document {
        let mut doc = self.clone();
        if let Some(layer) = doc.layers.iter_mut().find(|l| l.id == id) {
            layer.style = layer.style.merged(patch);
        }
        doc
    }

    pub fn with_background(&self, background: &str) -> Document {
        let mut doc = self.clone();
        doc.background = background.to_string();
        doc
    }

    // ---- delete / reorder / select -----------------------------------------

    /// Delete the layer with `id`. Clears the selection if it pointed at the
    /// deleted layer.
    pub fn without_layer(&self, id: &str) -> Document {
        let mut doc = self.clone();
        doc.layers.retain(|l| l.id != id);
        if doc.selected_layer_id.as_deref() == Some(id) {
            doc.selected_layer_id = None;
        }
        doc
    }

    /// Swap the layer with its immediate z-order neighbor. Returns `None`
    /// at either boundary (topmost can't move forward, bottommost can't
    /// move backward) so callers don't commit a spurious history entry.
    pub fn with_layer_reordered(&self, id: &str, dir: ReorderDirection) -> Option<Document> {
        let index = self.layer_index(id)?;
        let swap_index = match dir {
            ReorderDirection::Forward => {
                if index + 1 >= self.layers.len() {
                    return None;
                }
                index + 1
            }
            ReorderDirection::Backward => {
                if index == 0 {
                    return None;
                }
                index - 1
            }
        };
        let mut doc = self.clone();
        doc.layers.swap(index, swap_index);
        Some(doc)
    }

    /// Select (or deselect with `None`). Selecting an id that doesn't exist
    /// is tolerated — the properties panel simply shows nothing.
    pub fn with_selection(&self, id: Option<&str>) -> Document {
        let mut doc = self.clone();
        doc.selected_layer_id = id.map(|s| s.to_string());
        doc
    }

    /// Deep copy with freshly generated layer ids. Used when instantiating a
    /// template so repeated loads never alias each other's layers.
    pub fn instantiated(&self) -> Document {
        let mut doc = self.clone();
        doc.selected_layer_id = None;
        for layer in &mut doc.layers {
            layer.id = Layer::fresh_id();
        }
        doc
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_layers(n: usize) -> Document {
        let mut doc = Document::blank(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        for _ in 0..n {
            doc = doc.with_shape_layer();
        }
        doc
    }

    #[test]
    fn add_layer_centers_and_selects() {
        let doc = Document::blank(1280, 720).with_shape_layer();
        assert_eq!(doc.layers.len(), 1);
        let layer = &doc.layers[0];
        assert_eq!(layer.x, 640.0 - 100.0);
        assert_eq!(layer.y, 360.0 - 100.0);
        assert_eq!(doc.selected_layer_id.as_deref(), Some(layer.id.as_str()));
    }

    #[test]
    fn text_layer_is_auto_sized() {
        let doc = Document::blank(1280, 720).with_text_layer("Hello");
        let layer = &doc.layers[0];
        assert_eq!(layer.width, 0.0);
        assert_eq!(layer.height, 0.0);
        assert_eq!(layer.text(), Some("Hello"));
    }

    #[test]
    fn patch_unknown_id_is_noop() {
        let doc = doc_with_layers(1);
        let patched = doc.with_layer_patched("nope", &LayerPatch::position(5.0, 5.0));
        assert_eq!(patched.layers[0].x, doc.layers[0].x);
        assert_eq!(patched.layers[0].y, doc.layers[0].y);
    }

    #[test]
    fn style_merge_overrides_later_keys() {
        let doc = doc_with_layers(1);
        let id = doc.layers[0].id.clone();
        let doc = doc.with_style_merged(
            &id,
            &LayerStyle {
                background_color: Some("#ff0000".to_string()),
                ..Default::default()
            },
        );
        let layer = &doc.layers[0];
        // background overridden, border_radius from the constructor preserved
        assert_eq!(layer.style.background_color.as_deref(), Some("#ff0000"));
        assert_eq!(layer.style.border_radius, Some(0.0));
    }

    #[test]
    fn delete_clears_matching_selection() {
        let doc = doc_with_layers(2);
        let selected = doc.selected_layer_id.clone().unwrap();
        let doc = doc.without_layer(&selected);
        assert_eq!(doc.layers.len(), 1);
        assert!(doc.selected_layer_id.is_none());
    }

    #[test]
    fn delete_other_layer_keeps_selection() {
        let doc = doc_with_layers(2);
        let other = doc.layers[0].id.clone();
        let selected = doc.selected_layer_id.clone().unwrap();
        assert_ne!(other, selected);
        let doc = doc.without_layer(&other);
        assert_eq!(doc.selected_layer_id.as_deref(), Some(selected.as_str()));
    }

    #[test]
    fn reorder_boundaries_are_noops() {
        let doc = doc_with_layers(3);
        let bottom = doc.layers[0].id.clone();
        let top = doc.layers[2].id.clone();
        assert!(doc.with_layer_reordered(&bottom, ReorderDirection::Backward).is_none());
        assert!(doc.with_layer_reordered(&top, ReorderDirection::Forward).is_none());
    }

    #[test]
    fn reorder_swaps_neighbors() {
        let doc = doc_with_layers(3);
        let bottom = doc.layers[0].id.clone();
        let middle = doc.layers[1].id.clone();
        let doc = doc
            .with_layer_reordered(&bottom, ReorderDirection::Forward)
            .expect("not at boundary");
        assert_eq!(doc.layers[0].id, middle);
        assert_eq!(doc.layers[1].id, bottom);
    }

    #[test]
    fn selecting_unknown_id_is_tolerated() {
        let doc = doc_with_layers(1).with_selection(Some("ghost"));
        assert_eq!(doc.selected_layer_id.as_deref(), Some("ghost"));
        assert!(doc.selected_layer().is_none());
    }

    #[test]
    fn instantiated_regenerates_ids() {
        let doc = doc_with_layers(2);
        let copy = doc.instantiated();
        assert!(copy.selected_layer_id.is_none());
        for (a, b) in doc.layers.iter().zip(copy.layers.iter()) {
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn ops_do_not_mutate_the_source() {
        let doc = doc_with_layers(1);
        let id = doc.layers[0].id.clone();
        let before_x = doc.layers[0].x;
        let _ = doc.with_layer_patched(&id, &LayerPatch::position(1.0, 2.0));
        assert_eq!(doc.layers[0].x, before_x);
    }
}

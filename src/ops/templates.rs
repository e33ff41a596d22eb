// ============================================================================
// TEMPLATE CATALOG — fixed set of starting documents
// ============================================================================

use crate::document::{
    Document, Layer, LayerStyle, ShapeKind, TextTransform, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};

/// A named starting document. The catalog itself is immutable; loading a
/// template instantiates a deep copy with fresh layer ids (see
/// `Document::instantiated`) so edits never bleed back into the catalog.
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Swatch color for the picker card.
    pub preview_color: &'static str,
    pub document: Document,
}

fn text_layer(text: &str, x: f32, y: f32, style: LayerStyle) -> Layer {
    Layer::new_text(text, x, y, style)
}

fn shape_layer(kind: ShapeKind, x: f32, y: f32, w: f32, h: f32, color: &str) -> Layer {
    Layer::new_shape(kind, x, y, w, h, color)
}

fn document(background: &str, width: u32, height: u32, layers: Vec<Layer>) -> Document {
    let mut doc = Document::blank(width, height);
    doc.background = background.to_string();
    doc.layers = layers;
    doc
}

/// Build the full catalog. Called once at startup; the result is stored and
/// only ever read from.
pub fn catalog() -> Vec<Template> {
    vec![
        Template {
            id: "A",
            name: "Red Bold Reaction",
            description: "High impact for YouTube",
            preview_color: "#dc2626",
            document: document(
                "linear-gradient(135deg, #dc2626 0%, #991b1b 100%)",
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT,
                vec![
                    shape_layer(ShapeKind::Circle, 700.0, 60.0, 500.0, 500.0, "#ffffff20"),
                    text_layer(
                        "OMG!!!",
                        50.0,
                        150.0,
                        LayerStyle {
                            font_size: Some(180.0),
                            font_family: Some("Oswald".to_string()),
                            text_transform: Some(TextTransform::Uppercase),
                            color: Some("#ffffff".to_string()),
                            text_shadow: Some("10px 10px 0px #000000".to_string()),
                            ..Default::default()
                        },
                    ),
                    text_layer(
                        "IT HAPPENED",
                        60.0,
                        400.0,
                        LayerStyle {
                            font_size: Some(80.0),
                            font_family: Some("Inter".to_string()),
                            font_weight: Some("800".to_string()),
                            background_color: Some("#facc15".to_string()),
                            color: Some("#000000".to_string()),
                            padding: Some(20.0),
                            ..Default::default()
                        },
                    ),
                ],
            ),
        },
        Template {
            id: "B",
            name: "Clean Minimal",
            description: "Modern & Aesthetic",
            preview_color: "#f1f5f9",
            document: document(
                "#ffffff",
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT,
                vec![
                    shape_layer(ShapeKind::Circle, -50.0, -50.0, 500.0, 500.0, "#fce7f3"),
                    shape_layer(ShapeKind::Circle, 850.0, 350.0, 400.0, 400.0, "#e0f2fe"),
                    text_layer(
                        "Minimalist",
                        390.0,
                        260.0,
                        LayerStyle {
                            font_size: Some(100.0),
                            font_family: Some("Playfair Display".to_string()),
                            color: Some("#334155".to_string()),
                            font_weight: Some("600".to_string()),
                            ..Default::default()
                        },
                    ),
                    text_layer(
                        "Design Guide",
                        460.0,
                        400.0,
                        LayerStyle {
                            font_size: Some(40.0),
                            font_family: Some("Inter".to_string()),
                            color: Some("#94a3b8".to_string()),
                            font_weight: Some("400".to_string()),
                            letter_spacing: Some(4.0),
                            ..Default::default()
                        },
                    ),
                ],
            ),
        },
        Template {
            id: "C",
            name: "Gaming Neon",
            description: "Glow & Energy",
            preview_color: "#0f172a",
            document: document(
                "linear-gradient(45deg, #0f172a 0%, #1e1b4b 100%)",
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT,
                vec![
                    text_layer(
                        "GAMER",
                        380.0,
                        200.0,
                        LayerStyle {
                            font_size: Some(150.0),
                            font_family: Some("Orbitron".to_string()),
                            color: Some("#4ade80".to_string()),
                            text_shadow: Some("0 0 20px #4ade80".to_string()),
                            ..Default::default()
                        },
                    ),
                    text_layer(
                        "UNLEASHED",
                        400.0,
                        380.0,
                        LayerStyle {
                            font_size: Some(80.0),
                            font_family: Some("Orbitron".to_string()),
                            color: Some("#22d3ee".to_string()),
                            text_shadow: Some("0 0 15px #22d3ee".to_string()),
                            ..Default::default()
                        },
                    ),
                ],
            ),
        },
        Template {
            id: "D",
            name: "Elegant Gold",
            description: "Luxury & Finance",
            preview_color: "#000000",
            document: document(
                "#000000",
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT,
                vec![
                    {
                        let mut border = shape_layer(ShapeKind::Rect, 40.0, 40.0, 1200.0, 640.0, "transparent");
                        border.style.border_color = Some("#fbbf24".to_string());
                        border.style.border_width = Some(4.0);
                        border
                    },
                    text_layer(
                        "The Luxury",
                        410.0,
                        240.0,
                        LayerStyle {
                            font_size: Some(90.0),
                            font_family: Some("Playfair Display".to_string()),
                            font_style: Some("italic".to_string()),
                            color: Some("#fbbf24".to_string()),
                            ..Default::default()
                        },
                    ),
                    text_layer(
                        "Lifestyle",
                        440.0,
                        380.0,
                        LayerStyle {
                            font_size: Some(110.0),
                            font_family: Some("Oswald".to_string()),
                            color: Some("#ffffff".to_string()),
                            letter_spacing: Some(2.0),
                            ..Default::default()
                        },
                    ),
                ],
            ),
        },
        Template {
            id: "E",
            name: "Insta Reel",
            description: "Trendy Gradient",
            preview_color: "#c084fc",
            document: document(
                "linear-gradient(to top right, #c084fc, #f472b6, #fbbf24)",
                1080,
                1920,
                vec![
                    shape_layer(ShapeKind::Rect, 140.0, 800.0, 800.0, 320.0, "#ffffff"),
                    text_layer(
                        "AESTHETIC",
                        290.0,
                        860.0,
                        LayerStyle {
                            font_size: Some(90.0),
                            font_family: Some("Inter".to_string()),
                            font_weight: Some("900".to_string()),
                            color: Some("#000000".to_string()),
                            ..Default::default()
                        },
                    ),
                    text_layer(
                        "VLOG",
                        415.0,
                        980.0,
                        LayerStyle {
                            font_size: Some(90.0),
                            font_family: Some("Inter".to_string()),
                            font_weight: Some("900".to_string()),
                            color: Some("#db2777".to_string()),
                            ..Default::default()
                        },
                    ),
                ],
            ),
        },
    ]
}

/// Look up a template by its id (used by the headless CLI).
pub fn by_id<'a>(templates: &'a [Template], id: &str) -> Option<&'a Template> {
    templates.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_templates() {
        let templates = catalog();
        assert_eq!(templates.len(), 5);
        assert!(by_id(&templates, "a").is_some());
        assert!(by_id(&templates, "Z").is_none());
    }

    #[test]
    fn insta_reel_is_portrait() {
        let templates = catalog();
        let reel = by_id(&templates, "E").unwrap();
        assert_eq!(reel.document.width, 1080);
        assert_eq!(reel.document.height, 1920);
    }

    #[test]
    fn loading_instantiates_an_independent_copy() {
        let templates = catalog();
        let first = &templates[0];
        let loaded = first.document.instantiated();
        assert!(loaded.selected_layer_id.is_none());
        assert_eq!(loaded.layers.len(), first.document.layers.len());
        // Fresh ids: editing the loaded copy can never address catalog layers.
        for (a, b) in loaded.layers.iter().zip(first.document.layers.iter()) {
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn elegant_gold_border_style_applied() {
        let templates = catalog();
        let gold = by_id(&templates, "D").unwrap();
        let border = &gold.document.layers[0];
        assert_eq!(border.style.border_color.as_deref(), Some("#fbbf24"));
        assert_eq!(border.style.border_width, Some(4.0));
    }
}

// ============================================================================
// AI OPERATIONS — Gemini API boundary + design-model adapter
// ============================================================================
//
// All network calls run on worker threads with std::sync::mpsc channels back
// to the UI thread; the GUI never blocks on a request. The design-model
// adapter is the trust boundary for untyped AI JSON: nothing loosely-typed
// flows past it into the layer model.

use std::io::{BufRead, BufReader};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use base64::Engine;
use image::RgbaImage;
use serde_json::{json, Value};

use crate::document::{Document, Layer, LayerStyle, ShapeKind, TextAlign, TextTransform};

/// Chat/completion model.
pub const MODEL_NAME: &str = "gemini-2.5-flash";
/// Image-output model used for logo generation.
pub const LOGO_MODEL_NAME: &str = "gemini-2.5-flash-image";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// System instruction for the strategy chat surface.
pub const SYSTEM_INSTRUCTION: &str = "You are a professional Social Media Strategist AI. \
Your job is to answer ONLY questions related to: social media content ideas, captions, \
scripts, hashtag strategies, content calendars, branding, TikTok, Instagram, Facebook, \
YouTube, growth strategies, post ideas, audience engagement, marketing advice, and photo \
and video editing apps (e.g., CapCut, InShot, Premiere Rush, Canva).\n\n\
If a user asks something unrelated to social media, politely say: \
\"Sorry, I can only help with social media topics.\"\n\n\
Do NOT answer in JSON unless the user specifically asks for JSON. Always give clear, \
friendly, creative text responses. Use markdown formatting (bolding, lists) to make \
your advice easy to read.";

/// System instruction for the layout generator. The response contract is raw
/// JSON (no markdown fencing) with a `canvas` object and a `layers` array —
/// see `design_from_json` for the defensive parse of that contract.
pub const DESIGNER_INSTRUCTION: &str = "You are the Design Model Generator for a \
Canva-style thumbnail editor. Your ONLY job is to generate a structured JSON design \
model that the UI renders visually. You do NOT create images yourself.\n\n\
Always output the design as JSON with this structure:\n\
{\n\
  \"canvas\": {\"width\": 1280, \"height\": 720, \"background\": {\"type\": \"color | gradient\", \"value\": \"HEX color or gradient config\"}},\n\
  \"layers\": [{\"id\": \"unique-layer-id\", \"type\": \"text | shape\", \"content\": \"text content or shape type (rect/circle)\", \
\"position\": {\"x\": 0, \"y\": 0}, \"size\": {\"width\": 300, \"height\": 200}, \"rotation\": 0, \
\"style\": {\"fontFamily\": \"Inter\", \"fontSize\": 60, \"fontWeight\": \"bold\", \"color\": \"#ffffff\", \
\"backgroundColor\": \"transparent\", \"borderRadius\": 0, \"opacity\": 1, \"textShadow\": \"none\"}}]\n\
}\n\n\
Create balanced, visually appealing compositions with harmonious color palettes and \
legible text. For shapes, type is 'shape' and content is 'rect' or 'circle'. For text, \
type is 'text' and content is the actual text. If the user asks for a specific style \
(e.g. \"Gaming\", \"Minimal\"), generate a matching layout with 3-5 layers.\n\n\
IMPORTANT: Output RAW JSON only. Do NOT use markdown code blocks. Ensure all keys are \
properly quoted.";

/// Prompt template for logo generation; `{BRAND}` is substituted.
pub const LOGO_PROMPT: &str = "Create a clean, modern, high-quality logo design.\n\n\
Brand request: {BRAND}\n\n\
Important:\n\
- Do NOT copy or recreate any real copyrighted or trademarked logos.\n\
- Create an original logo inspired by the theme.\n\
- Use modern design, sharp shapes, and professional styling.\n\
- High contrast colors and smooth gradients. Resolution: 1024x1024.\n\
- Logo should be centered, minimal, and visually strong.";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug)]
pub enum ServiceError {
    /// No API key configured (settings file or GEMINI_API_KEY).
    MissingApiKey,
    Http(String),
    BadStatus(u16, String),
    EmptyResponse,
    /// The design response was missing the top-level `canvas`/`layers`
    /// structure (or wasn't JSON at all). Surfaced to the user — never a
    /// silent no-op.
    MalformedDesign(String),
    ImageDecode(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::MissingApiKey => {
                write!(f, "No API key configured. Set GEMINI_API_KEY or edit Settings.")
            }
            ServiceError::Http(e) => write!(f, "Request failed: {}", e),
            ServiceError::BadStatus(code, body) => {
                write!(f, "API returned HTTP {}: {}", code, body)
            }
            ServiceError::EmptyResponse => write!(f, "API returned an empty response"),
            ServiceError::MalformedDesign(e) => write!(f, "Design model was malformed: {}", e),
            ServiceError::ImageDecode(e) => write!(f, "Could not decode generated image: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

// ============================================================================
// SERVICE BOUNDARY
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    fn wire_name(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One prior conversation turn sent with a chat request.
#[derive(Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Streaming chat events delivered to the UI thread.
pub enum ChatEvent {
    Chunk(String),
    Done,
    Failed(String),
}

/// The external generative service, as seen by the rest of the app.
/// Production impl is `GeminiClient`; tests substitute their own.
pub trait DesignService: Send + Sync {
    /// Stream a chat completion for the given conversation. Chunks, then a
    /// final `Done` (or `Failed`), are delivered through `tx`.
    fn stream_chat(&self, turns: &[ChatTurn], tx: Sender<ChatEvent>);

    /// One-shot design-model generation. Returns the raw response text,
    /// which the caller feeds through `design_from_json`.
    fn generate_design(&self, prompt: &str) -> Result<String, ServiceError>;

    /// One-shot logo generation. Returns decoded pixels.
    fn generate_logo(&self, brand: &str) -> Result<RgbaImage, ServiceError>;
}

// ============================================================================
// GEMINI CLIENT — blocking reqwest, called from worker threads only
// ============================================================================

pub struct GeminiClient {
    api_key: String,
    model: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            http: reqwest::blocking::Client::new(),
        }
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/{}:{}?key={}", API_BASE, model, method, self.api_key)
    }

    /// Shared one-shot request: returns the concatenated text parts of the
    /// first candidate.
    fn generate_text(&self, system: &str, prompt: &str) -> Result<String, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::MissingApiKey);
        }
        let body = json!({
            "system_instruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });
        let resp = self
            .http
            .post(self.url(&self.model, "generateContent"))
            .json(&body)
            .send()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        let status = resp.status();
        let value: Value = if status.is_success() {
            resp.json().map_err(|e| ServiceError::Http(e.to_string()))?
        } else {
            let text = resp.text().unwrap_or_default();
            return Err(ServiceError::BadStatus(status.as_u16(), text));
        };
        let text = collect_text_parts(&value);
        if text.is_empty() {
            Err(ServiceError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

/// Concatenate `candidates[0].content.parts[*].text` from a response value.
fn collect_text_parts(value: &Value) -> String {
    let mut out = String::new();
    if let Some(parts) = value
        .pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
    {
        for part in parts {
            if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                out.push_str(text);
            }
        }
    }
    out
}

impl DesignService for GeminiClient {
    fn stream_chat(&self, turns: &[ChatTurn], tx: Sender<ChatEvent>) {
        if self.api_key.is_empty() {
            let _ = tx.send(ChatEvent::Failed(ServiceError::MissingApiKey.to_string()));
            return;
        }
        let contents: Vec<Value> = turns
            .iter()
            .map(|t| {
                json!({
                    "role": t.role.wire_name(),
                    "parts": [{ "text": t.text }],
                })
            })
            .collect();
        let body = json!({
            "system_instruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": contents,
        });

        let url = format!(
            "{}/{}:streamGenerateContent?alt=sse&key={}",
            API_BASE, self.model, self.api_key
        );
        let resp = match self.http.post(&url).json(&body).send() {
            Ok(r) => r,
            Err(e) => {
                let _ = tx.send(ChatEvent::Failed(ServiceError::Http(e.to_string()).to_string()));
                return;
            }
        };
        if !resp.status().is_success() {
            let code = resp.status().as_u16();
            let text = resp.text().unwrap_or_default();
            let _ = tx.send(ChatEvent::Failed(ServiceError::BadStatus(code, text).to_string()));
            return;
        }

        // Server-sent events: one `data: {json}` line per chunk.
        let reader = BufReader::new(resp);
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    let _ = tx.send(ChatEvent::Failed(ServiceError::Http(e.to_string()).to_string()));
                    return;
                }
            };
            let Some(payload) = line.strip_prefix("data: ") else {
                continue;
            };
            if payload == "[DONE]" {
                break;
            }
            if let Ok(value) = serde_json::from_str::<Value>(payload) {
                let text = collect_text_parts(&value);
                if !text.is_empty() && tx.send(ChatEvent::Chunk(text)).is_err() {
                    // UI side went away (screen closed) — stop reading.
                    return;
                }
            }
        }
        let _ = tx.send(ChatEvent::Done);
    }

    fn generate_design(&self, prompt: &str) -> Result<String, ServiceError> {
        self.generate_text(DESIGNER_INSTRUCTION, prompt)
    }

    fn generate_logo(&self, brand: &str) -> Result<RgbaImage, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::MissingApiKey);
        }
        let prompt = LOGO_PROMPT.replace("{BRAND}", brand);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] },
        });
        let resp = self
            .http
            .post(self.url(LOGO_MODEL_NAME, "generateContent"))
            .json(&body)
            .send()
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(ServiceError::BadStatus(status.as_u16(), text));
        }
        let value: Value = resp.json().map_err(|e| ServiceError::Http(e.to_string()))?;

        let parts = value
            .pointer("/candidates/0/content/parts")
            .and_then(|p| p.as_array())
            .ok_or(ServiceError::EmptyResponse)?;
        for part in parts {
            if let Some(data) = part.pointer("/inlineData/data").and_then(|d| d.as_str()) {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(data)
                    .map_err(|e| ServiceError::ImageDecode(e.to_string()))?;
                let img = image::load_from_memory(&bytes)
                    .map_err(|e| ServiceError::ImageDecode(e.to_string()))?;
                return Ok(img.to_rgba8());
            }
        }
        Err(ServiceError::EmptyResponse)
    }
}

// ============================================================================
// WORKER THREADS — one in-flight request per surface
// ============================================================================

/// Result of a one-shot generation job, delivered back to the UI thread.
pub enum GenerationResult {
    Layout(Result<Document, ServiceError>),
    Logo(Result<RgbaImage, ServiceError>),
}

pub fn spawn_layout_job(
    service: Arc<dyn DesignService>,
    prompt: String,
) -> Receiver<GenerationResult> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = service
            .generate_design(&prompt)
            .and_then(|raw| design_from_json(&raw));
        let _ = tx.send(GenerationResult::Layout(result));
    });
    rx
}

pub fn spawn_logo_job(
    service: Arc<dyn DesignService>,
    brand: String,
) -> Receiver<GenerationResult> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = service.generate_logo(&brand);
        let _ = tx.send(GenerationResult::Logo(result));
    });
    rx
}

pub fn spawn_chat_job(service: Arc<dyn DesignService>, turns: Vec<ChatTurn>) -> Receiver<ChatEvent> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        service.stream_chat(&turns, tx);
    });
    rx
}

// ============================================================================
// DESIGN-MODEL ADAPTER — untrusted JSON → validated Document
// ============================================================================

/// Fallback canvas size when the model omits or garbles dimensions.
const FALLBACK_CANVAS: (f64, f64) = (1280.0, 720.0);
/// Default box size for shape layers with missing/invalid size.
const FALLBACK_SHAPE_SIZE: f64 = 100.0;
/// Default font size for text layers.
const FALLBACK_FONT_SIZE: f64 = 40.0;
/// Positions this close to the origin on BOTH axes are treated as
/// "not really positioned" and auto-centered instead.
const ORIGIN_SNAP_THRESHOLD: f64 = 5.0;
/// Vertical offset per layer index when auto-centering, so stacked
/// unpositioned layers don't overlap exactly.
const CENTER_STAGGER_STEP: f64 = 50.0;

/// Parse a number from a JSON value, accepting real numbers or numeric
/// strings with trailing junk ("60px" → 60). Returns `None` for anything
/// else — callers supply the defensive default.
fn loose_number(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    let s = value.as_str()?.trim();
    // Leading signed digits, parseInt-style.
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')) || *c == '.')
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    s[..end].parse::<f64>().ok()
}

fn number_or(value: Option<&Value>, default: f64) -> f64 {
    loose_number(value).unwrap_or(default)
}

fn string_or<'a>(value: Option<&'a Value>, default: &'a str) -> &'a str {
    value.and_then(|v| v.as_str()).unwrap_or(default)
}

/// Extract the validated style for one AI layer descriptor.
fn style_from_descriptor(style: Option<&Value>, is_text: bool) -> LayerStyle {
    let get = |key: &str| style.and_then(|s| s.get(key));
    LayerStyle {
        font_family: get("fontFamily").and_then(|v| v.as_str()).map(String::from),
        font_size: Some(number_or(get("fontSize"), FALLBACK_FONT_SIZE) as f32),
        font_weight: get("fontWeight").and_then(|v| v.as_str()).map(String::from),
        font_style: get("fontStyle").and_then(|v| v.as_str()).map(String::from),
        color: Some(string_or(get("color"), "#000").to_string()),
        background_color: Some(string_or(get("backgroundColor"), "transparent").to_string()),
        border_radius: loose_number(get("borderRadius")).map(|n| n as f32),
        border_color: get("borderColor").and_then(|v| v.as_str()).map(String::from),
        border_width: loose_number(get("borderWidth")).map(|n| n as f32),
        text_shadow: get("textShadow")
            .and_then(|v| v.as_str())
            .filter(|s| *s != "none")
            .map(String::from),
        opacity: loose_number(get("opacity")).map(|n| n as f32),
        text_align: if is_text {
            get("textAlign").and_then(|v| v.as_str()).map(TextAlign::from_keyword)
        } else {
            None
        },
        padding: loose_number(get("padding")).map(|n| n as f32),
        text_transform: get("textTransform").and_then(|v| v.as_str()).map(|t| match t {
            "uppercase" => TextTransform::Uppercase,
            "lowercase" => TextTransform::Lowercase,
            _ => TextTransform::None,
        }),
        letter_spacing: loose_number(get("letterSpacing")).map(|n| n as f32),
    }
}

/// Convert a raw design-model response into a complete `Document`.
///
/// Every numeric field is parsed defensively with fixed fallbacks; a missing
/// top-level `canvas` or `layers` is an error (the one failure the user must
/// hear about). The result replaces the whole document in a single commit.
pub fn design_from_json(raw: &str) -> Result<Document, ServiceError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ServiceError::MalformedDesign(format!("response was not JSON: {}", e)))?;

    let canvas = value
        .get("canvas")
        .filter(|c| c.is_object())
        .ok_or_else(|| ServiceError::MalformedDesign("missing `canvas` object".to_string()))?;
    let descriptors = value
        .get("layers")
        .and_then(|l| l.as_array())
        .ok_or_else(|| ServiceError::MalformedDesign("missing `layers` array".to_string()))?;

    let canvas_w = number_or(canvas.get("width"), FALLBACK_CANVAS.0).max(1.0);
    let canvas_h = number_or(canvas.get("height"), FALLBACK_CANVAS.1).max(1.0);
    let center_x = canvas_w / 2.0;
    let center_y = canvas_h / 2.0;

    // background may be {"type": ..., "value": ...} or a bare string
    let background = canvas
        .pointer("/background/value")
        .and_then(|v| v.as_str())
        .or_else(|| canvas.get("background").and_then(|v| v.as_str()))
        .unwrap_or("#ffffff")
        .to_string();

    let mut doc = Document::blank(canvas_w as u32, canvas_h as u32);
    doc.background = background;

    for (idx, descriptor) in descriptors.iter().enumerate() {
        let is_shape = descriptor.get("type").and_then(|t| t.as_str()) == Some("shape");
        let content = string_or(
            descriptor.get("content"),
            if is_shape { "rect" } else { "Text" },
        )
        .to_string();

        let size_default = if is_shape { FALLBACK_SHAPE_SIZE } else { 0.0 };
        let w = number_or(descriptor.pointer("/size/width"), size_default);
        let h = number_or(descriptor.pointer("/size/height"), size_default);
        let mut x = number_or(descriptor.pointer("/position/x"), 0.0);
        let mut y = number_or(descriptor.pointer("/position/y"), 0.0);

        // Models frequently emit (0,0) for every layer; treat near-origin
        // positions as unplaced and stagger them down the center line.
        if x < ORIGIN_SNAP_THRESHOLD && y < ORIGIN_SNAP_THRESHOLD {
            x = center_x - w / 2.0;
            y = center_y - h / 2.0 + idx as f64 * CENTER_STAGGER_STEP;
        }

        let style = style_from_descriptor(descriptor.get("style"), !is_shape);
        let mut layer = if is_shape {
            let kind = ShapeKind::from_tag(&content);
            let bg = style.background_color.clone().unwrap_or_else(|| "transparent".to_string());
            let mut l = Layer::new_shape(kind, x as f32, y as f32, w as f32, h as f32, &bg);
            l.name = "Shape".to_string();
            l.style = l.style.merged(&style);
            l
        } else {
            let mut l = Layer::new_text(content, x as f32, y as f32, style);
            l.name = "Text".to_string();
            l.width = w as f32;
            l.height = h as f32;
            l
        };
        layer.rotation = number_or(descriptor.get("rotation"), 0.0) as f32;
        doc.layers.push(layer);
    }

    Ok(doc)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LayerContent;

    fn design(layers: &str) -> String {
        format!(
            r##"{{"canvas": {{"width": 1280, "height": 720, "background": {{"type": "color", "value": "#123456"}}}}, "layers": [{}]}}"##,
            layers
        )
    }

    #[test]
    fn origin_positions_are_centered_and_staggered() {
        let raw = design(
            r#"{"type": "shape", "content": "rect", "position": {"x": 0, "y": 0}, "size": {"width": 100, "height": 100}},
               {"type": "text", "content": "Hi", "position": {"x": 0, "y": 0}}"#,
        );
        let doc = design_from_json(&raw).unwrap();
        // Shape at index 0: centered, no stagger.
        assert_eq!(doc.layers[0].x, 640.0 - 50.0);
        assert_eq!(doc.layers[0].y, 360.0 - 50.0);
        // Text at index 1: auto width 0, staggered by 50.
        assert_eq!(doc.layers[1].x, 640.0);
        assert_eq!(doc.layers[1].y, 360.0 + 50.0);
    }

    #[test]
    fn explicit_positions_are_used_as_is() {
        let raw = design(r#"{"type": "text", "content": "Hi", "position": {"x": 500, "y": 10}}"#);
        let doc = design_from_json(&raw).unwrap();
        assert_eq!(doc.layers[0].x, 500.0);
        assert_eq!(doc.layers[0].y, 10.0);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let raw = design(
            r#"{"type": "shape", "content": "circle", "position": {"x": "junk", "y": null},
                "size": {"width": "wat"}, "rotation": "sideways",
                "style": {"fontSize": "huge", "opacity": "0.5ish"}}"#,
        );
        let doc = design_from_json(&raw).unwrap();
        let layer = &doc.layers[0];
        assert_eq!(layer.width, 100.0, "shape size default");
        assert_eq!(layer.rotation, 0.0);
        assert_eq!(layer.style.font_size, Some(40.0));
        // "0.5ish" parses its leading digits
        assert_eq!(layer.style.opacity, Some(0.5));
    }

    #[test]
    fn numeric_strings_parse_leading_digits() {
        let raw = design(
            r#"{"type": "text", "content": "Hi", "position": {"x": "500px", "y": "10"},
                "style": {"fontSize": "72px"}}"#,
        );
        let doc = design_from_json(&raw).unwrap();
        assert_eq!(doc.layers[0].x, 500.0);
        assert_eq!(doc.layers[0].y, 10.0);
        assert_eq!(doc.layers[0].style.font_size, Some(72.0));
    }

    #[test]
    fn canvas_defaults_applied_when_garbled() {
        let raw = r#"{"canvas": {"width": "???"}, "layers": []}"#;
        let doc = design_from_json(raw).unwrap();
        assert_eq!(doc.width, 1280);
        assert_eq!(doc.height, 720);
        assert_eq!(doc.background, "#ffffff");
    }

    #[test]
    fn missing_top_level_structure_is_an_error() {
        assert!(matches!(
            design_from_json("not json at all"),
            Err(ServiceError::MalformedDesign(_))
        ));
        assert!(matches!(
            design_from_json(r#"{"layers": []}"#),
            Err(ServiceError::MalformedDesign(_))
        ));
        assert!(matches!(
            design_from_json(r#"{"canvas": {"width": 100}}"#),
            Err(ServiceError::MalformedDesign(_))
        ));
    }

    #[test]
    fn background_value_is_extracted() {
        let doc = design_from_json(&design("")).unwrap();
        assert_eq!(doc.background, "#123456");
        assert!(doc.selected_layer_id.is_none());
    }

    #[test]
    fn shape_tag_selects_kind() {
        let raw = design(
            r#"{"type": "shape", "content": "circle", "position": {"x": 100, "y": 100}}"#,
        );
        let doc = design_from_json(&raw).unwrap();
        assert_eq!(doc.layers[0].shape(), Some(ShapeKind::Circle));
        match &doc.layers[0].content {
            LayerContent::Shape(ShapeKind::Circle) => {}
            _ => panic!("expected circle shape content"),
        }
    }
}

// ============================================================================
// EXPORT — CPU rasterizer for documents
// ============================================================================
//
// Renders a document to an RGBA buffer at its exact logical size, independent
// of the on-screen zoom level. The same renderer backs the Export button and
// headless CLI rendering, so a thumbnail exported from either path is
// pixel-identical.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use image::{imageops, Rgba, RgbaImage};
use rayon::prelude::*;

use crate::document::{Document, Layer, LayerContent, TextAlign};

#[derive(Debug)]
pub enum ExportError {
    EmptyDocument,
    Encode(String),
    Io(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::EmptyDocument => write!(f, "document has zero size"),
            ExportError::Encode(e) => write!(f, "could not encode PNG: {}", e),
            ExportError::Io(e) => write!(f, "could not write file: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

/// Timestamped default filename for exports.
pub fn default_export_filename() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("creo-thumbnail-{}.png", millis)
}

/// Render `doc` and write it as PNG to `path`.
pub fn export_png(doc: &Document, path: &std::path::Path) -> Result<(), ExportError> {
    let image = render_document(doc)?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => ExportError::Io(io.to_string()),
            other => ExportError::Encode(other.to_string()),
        })
}

/// Rasterize the whole document at logical size.
pub fn render_document(doc: &Document) -> Result<RgbaImage, ExportError> {
    if doc.width == 0 || doc.height == 0 {
        return Err(ExportError::EmptyDocument);
    }
    let mut out = RgbaImage::new(doc.width, doc.height);
    fill_background(&mut out, &doc.background);

    // Bottom to top; z-order is stack order.
    for layer in &doc.layers {
        draw_layer(&mut out, layer);
    }
    Ok(out)
}

// ============================================================================
// BACKGROUND
// ============================================================================

/// Render just the background into a standalone buffer. The on-screen canvas
/// uploads this as a texture so the preview matches the export exactly.
pub fn render_background(width: u32, height: u32, descriptor: &str) -> RgbaImage {
    let mut out = RgbaImage::new(width.max(1), height.max(1));
    fill_background(&mut out, descriptor);
    out
}

/// Parsed document background.
enum Background {
    Solid([u8; 4]),
    /// CSS-style linear gradient: angle in degrees clockwise from "up",
    /// stops as (position 0..=1, color).
    Linear { angle_deg: f32, stops: Vec<(f32, [u8; 4])> },
}

fn fill_background(out: &mut RgbaImage, descriptor: &str) {
    let (w, h) = (out.width(), out.height());
    match parse_background(descriptor) {
        Background::Solid(color) => {
            for px in out.pixels_mut() {
                *px = Rgba(color);
            }
        }
        Background::Linear { angle_deg, stops } => {
            let rad = angle_deg.to_radians();
            // Gradient axis unit vector (y grows downward).
            let (dx, dy) = (rad.sin(), -rad.cos());
            let line_len = (w as f32 * dx).abs() + (h as f32 * dy).abs();
            let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
            let row_bytes = w as usize * 4;
            let buf: &mut [u8] = out;
            buf.par_chunks_exact_mut(row_bytes)
                .enumerate()
                .for_each(|(y, row)| {
                    for x in 0..w as usize {
                        let proj = (x as f32 + 0.5 - cx) * dx + (y as f32 + 0.5 - cy) * dy;
                        let t = if line_len > 0.0 { proj / line_len + 0.5 } else { 0.5 };
                        let color = gradient_color(&stops, t.clamp(0.0, 1.0));
                        row[x * 4..x * 4 + 4].copy_from_slice(&color);
                    }
                });
        }
    }
}

fn gradient_color(stops: &[(f32, [u8; 4])], t: f32) -> [u8; 4] {
    match stops {
        [] => [255, 255, 255, 255],
        [only] => only.1,
        _ => {
            if t <= stops[0].0 {
                return stops[0].1;
            }
            for pair in stops.windows(2) {
                let (p0, c0) = pair[0];
                let (p1, c1) = pair[1];
                if t <= p1 {
                    let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 1.0 };
                    return blend_lerp(c0, c1, f);
                }
            }
            stops[stops.len() - 1].1
        }
    }
}

fn blend_lerp(a: [u8; 4], b: [u8; 4], f: f32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = (a[i] as f32 + (b[i] as f32 - a[i] as f32) * f).round() as u8;
    }
    out
}

fn parse_background(descriptor: &str) -> Background {
    let s = descriptor.trim();
    if let Some(inner) = s
        .strip_prefix("linear-gradient(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        if let Some(bg) = parse_linear_gradient(inner) {
            return bg;
        }
    }
    Background::Solid(parse_color(s).unwrap_or([255, 255, 255, 255]))
}

/// Parse the argument list of a CSS `linear-gradient(...)`.
fn parse_linear_gradient(inner: &str) -> Option<Background> {
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.is_empty() {
        return None;
    }

    let (angle_deg, stop_parts) = if let Some(deg) = parts[0].strip_suffix("deg") {
        (deg.trim().parse::<f32>().ok()?, &parts[1..])
    } else if let Some(dir) = parts[0].strip_prefix("to ") {
        let angle = match dir.trim() {
            "top" => 0.0,
            "top right" | "right top" => 45.0,
            "right" => 90.0,
            "bottom right" | "right bottom" => 135.0,
            "bottom" => 180.0,
            "bottom left" | "left bottom" => 225.0,
            "left" => 270.0,
            "top left" | "left top" => 315.0,
            _ => return None,
        };
        (angle, &parts[1..])
    } else {
        // No direction given; CSS default is "to bottom".
        (180.0, &parts[..])
    };

    let mut stops = Vec::with_capacity(stop_parts.len());
    for (idx, part) in stop_parts.iter().enumerate() {
        let mut tokens = part.split_whitespace();
        let color = parse_color(tokens.next()?)?;
        let position = match tokens.next().and_then(|p| p.strip_suffix('%')) {
            Some(pct) => pct.parse::<f32>().ok()? / 100.0,
            None => {
                // Unpositioned stops distribute evenly.
                if stop_parts.len() > 1 {
                    idx as f32 / (stop_parts.len() - 1) as f32
                } else {
                    0.0
                }
            }
        };
        stops.push((position.clamp(0.0, 1.0), color));
    }
    if stops.is_empty() {
        return None;
    }
    Some(Background::Linear { angle_deg, stops })
}

/// Parse a color string: `#rgb`, `#rrggbb`, `#rrggbbaa`, `transparent`, or a
/// handful of CSS keywords the AI likes to emit.
pub fn parse_color(s: &str) -> Option<[u8; 4]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        let full = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 | 8 => hex.to_string(),
            _ => return None,
        };
        let r = u8::from_str_radix(&full[0..2], 16).ok()?;
        let g = u8::from_str_radix(&full[2..4], 16).ok()?;
        let b = u8::from_str_radix(&full[4..6], 16).ok()?;
        let a = if full.len() == 8 {
            u8::from_str_radix(&full[6..8], 16).ok()?
        } else {
            255
        };
        return Some([r, g, b, a]);
    }
    match s.to_ascii_lowercase().as_str() {
        "transparent" | "none" => Some([0, 0, 0, 0]),
        "white" => Some([255, 255, 255, 255]),
        "black" => Some([0, 0, 0, 255]),
        "red" => Some([255, 0, 0, 255]),
        "gold" => Some([255, 215, 0, 255]),
        _ => None,
    }
}

// ============================================================================
// LAYER COMPOSITING
// ============================================================================

fn draw_layer(out: &mut RgbaImage, layer: &Layer) {
    let opacity = layer.style.opacity.unwrap_or(1.0).clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    // Text sprites carry an internal offset (shadow padding); shapes and
    // images sit exactly at the layer position.
    let placed = match &layer.content {
        LayerContent::Text(text) => text_sprite(layer, text),
        LayerContent::Shape(_) => shape_sprite(layer).map(|s| (s, 0.0f32, 0.0f32)),
        LayerContent::Image(_) => image_sprite(layer).map(|s| (s, 0.0f32, 0.0f32)),
    };
    let Some((sprite, off_x, off_y)) = placed else {
        return;
    };
    composite(out, &sprite, layer.x + off_x, layer.y + off_y, layer.rotation, opacity);
}

/// Alpha-over blend `sprite` onto `out`, rotated by `rotation_deg` around the
/// sprite center, at document position (x, y), scaled by `opacity`.
fn composite(out: &mut RgbaImage, sprite: &RgbaImage, x: f32, y: f32, rotation_deg: f32, opacity: f32) {
    let (sw, sh) = (sprite.width() as f32, sprite.height() as f32);
    if sw == 0.0 || sh == 0.0 {
        return;
    }
    let rad = rotation_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let (cx, cy) = (x + sw / 2.0, y + sh / 2.0);

    // Destination bounding box of the rotated sprite.
    let half_w = (sw / 2.0 * cos.abs()) + (sh / 2.0 * sin.abs());
    let half_h = (sw / 2.0 * sin.abs()) + (sh / 2.0 * cos.abs());
    let x0 = ((cx - half_w).floor() as i64).max(0);
    let y0 = ((cy - half_h).floor() as i64).max(0);
    let x1 = ((cx + half_w).ceil() as i64).min(out.width() as i64);
    let y1 = ((cy + half_h).ceil() as i64).min(out.height() as i64);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let row_bytes = out.width() as usize * 4;
    let buf: &mut [u8] = out;
    buf.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .skip(y0 as usize)
        .take((y1 - y0) as usize)
        .for_each(|(dy, row)| {
            for dx in x0..x1 {
                // Inverse-rotate into sprite space.
                let rel_x = dx as f32 + 0.5 - cx;
                let rel_y = dy as f32 + 0.5 - cy;
                let sx = rel_x * cos + rel_y * sin + sw / 2.0;
                let sy = -rel_x * sin + rel_y * cos + sh / 2.0;
                if sx < 0.0 || sy < 0.0 || sx >= sw || sy >= sh {
                    continue;
                }
                let src = sprite.get_pixel(sx as u32, sy as u32).0;
                let src_a = src[3] as f32 / 255.0 * opacity;
                if src_a <= 0.0 {
                    continue;
                }
                let off = dx as usize * 4;
                let dst = &mut row[off..off + 4];
                let dst_a = dst[3] as f32 / 255.0;
                let out_a = src_a + dst_a * (1.0 - src_a);
                if out_a > 0.0 {
                    for i in 0..3 {
                        let blended = (src[i] as f32 * src_a
                            + dst[i] as f32 * dst_a * (1.0 - src_a))
                            / out_a;
                        dst[i] = blended.round().clamp(0.0, 255.0) as u8;
                    }
                }
                dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        });
}

// ============================================================================
// SHAPE / IMAGE SPRITES
// ============================================================================

/// Antialiased coverage of a rounded rect at pixel center (px, py).
fn rounded_rect_coverage(px: f32, py: f32, w: f32, h: f32, radius: f32) -> f32 {
    let r = radius.clamp(0.0, w.min(h) / 2.0);
    if px < 0.0 || py < 0.0 || px > w || py > h {
        return 0.0;
    }
    if r <= 0.0 {
        return 1.0;
    }
    // Distance from the nearest corner circle center, where applicable.
    let qx = if px < r {
        r - px
    } else if px > w - r {
        px - (w - r)
    } else {
        0.0
    };
    let qy = if py < r {
        r - py
    } else if py > h - r {
        py - (h - r)
    } else {
        0.0
    };
    let dist = (qx * qx + qy * qy).sqrt();
    (r - dist + 0.5).clamp(0.0, 1.0)
}

fn shape_sprite(layer: &Layer) -> Option<RgbaImage> {
    let (w, h) = (layer.width.max(0.0), layer.height.max(0.0));
    if w < 1.0 || h < 1.0 {
        return None;
    }
    let fill = layer
        .style
        .background_color
        .as_deref()
        .and_then(parse_color)
        .unwrap_or([0, 0, 0, 0]);
    let radius = layer.style.border_radius.unwrap_or(0.0);
    let border_w = layer.style.border_width.unwrap_or(0.0).max(0.0);
    let border = layer.style.border_color.as_deref().and_then(parse_color);

    let mut sprite = RgbaImage::new(w.ceil() as u32, h.ceil() as u32);
    for (px, py, out) in sprite.enumerate_pixels_mut() {
        let fx = px as f32 + 0.5;
        let fy = py as f32 + 0.5;
        let cov = rounded_rect_coverage(fx, fy, w, h, radius);
        if cov <= 0.0 {
            continue;
        }
        let inner_cov = if border_w > 0.0 && border.is_some() {
            rounded_rect_coverage(
                fx - border_w,
                fy - border_w,
                w - border_w * 2.0,
                h - border_w * 2.0,
                (radius - border_w).max(0.0),
            )
        } else {
            cov
        };
        let color = if inner_cov < cov {
            // In the border ring.
            let ring = border.unwrap_or(fill);
            blend_lerp(ring, fill, inner_cov / cov.max(f32::EPSILON))
        } else {
            fill
        };
        let mut color = color;
        color[3] = (color[3] as f32 * cov).round() as u8;
        *out = Rgba(color);
    }
    Some(sprite)
}

fn image_sprite(layer: &Layer) -> Option<RgbaImage> {
    let LayerContent::Image(image) = &layer.content else {
        return None;
    };
    let (w, h) = (layer.width.max(1.0) as u32, layer.height.max(1.0) as u32);
    let mut sprite = if image.pixels.width() == w && image.pixels.height() == h {
        (*image.pixels).clone()
    } else {
        imageops::resize(&*image.pixels, w, h, imageops::FilterType::Triangle)
    };
    let radius = layer.style.border_radius.unwrap_or(0.0);
    if radius > 0.0 {
        let (fw, fh) = (w as f32, h as f32);
        for (px, py, out) in sprite.enumerate_pixels_mut() {
            let cov = rounded_rect_coverage(px as f32 + 0.5, py as f32 + 0.5, fw, fh, radius);
            out.0[3] = (out.0[3] as f32 * cov).round() as u8;
        }
    }
    Some(sprite)
}

// ============================================================================
// TEXT SPRITES
// ============================================================================

struct PlacedGlyph {
    id: GlyphId,
    x: f32,
    y: f32,
}

/// Lay out one line left-aligned at x=0; returns glyphs and total advance.
fn layout_line(font: &FontArc, line: &str, size: f32, letter_spacing: f32) -> (Vec<PlacedGlyph>, f32) {
    let scaled = font.as_scaled(size);
    let mut glyphs = Vec::new();
    let mut cursor = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for ch in line.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            cursor += scaled.kern(p, id);
        }
        glyphs.push(PlacedGlyph { id, x: cursor, y: 0.0 });
        cursor += scaled.h_advance(id) + letter_spacing;
        prev = Some(id);
    }
    if !glyphs.is_empty() {
        cursor -= letter_spacing;
    }
    (glyphs, cursor.max(0.0))
}

/// Rasterize a text layer into a sprite plus the offset of the sprite
/// relative to the layer position. Auto-width layers (width == 0) size the
/// sprite to content; fixed-width layers align lines within the box.
fn text_sprite(layer: &Layer, text: &str) -> Option<(RgbaImage, f32, f32)> {
    let style = &layer.style;
    let content = style
        .text_transform
        .unwrap_or_default()
        .apply(text);
    if content.is_empty() {
        return None;
    }
    let size = style.font_size.unwrap_or(60.0).max(1.0);
    let family = style.font_family.as_deref().unwrap_or("Inter");
    let font = resolve_font(family, css_weight(style), style.is_italic())?;
    let scaled = font.as_scaled(size);
    let (ascent, line_height) = (scaled.ascent(), scaled.height());
    let letter_spacing = style.letter_spacing.unwrap_or(0.0);
    let padding = style.padding.unwrap_or(0.0).max(0.0);
    let align = style.text_align.unwrap_or(TextAlign::Left);

    let lines: Vec<&str> = content.split('\n').collect();
    let mut laid_out: Vec<(Vec<PlacedGlyph>, f32)> = lines
        .iter()
        .map(|l| layout_line(&font, l, size, letter_spacing))
        .collect();
    let content_w = laid_out
        .iter()
        .map(|(_, w)| *w)
        .fold(0.0f32, f32::max);
    let content_h = line_height * lines.len() as f32;

    // Auto layers size to content; fixed layers use the declared box.
    let box_w = if layer.width > 0.0 { layer.width } else { content_w + padding * 2.0 };
    let box_h = if layer.height > 0.0 { layer.height } else { content_h + padding * 2.0 };
    let shadow = style
        .text_shadow
        .as_deref()
        .and_then(parse_text_shadow);
    let shadow_pad = shadow.map(|(dx, dy, _)| dx.abs().max(dy.abs()).ceil()).unwrap_or(0.0);
    let sprite_w = (box_w + shadow_pad * 2.0).ceil().max(1.0) as u32;
    let sprite_h = (box_h + shadow_pad * 2.0).ceil().max(1.0) as u32;
    let mut sprite = RgbaImage::new(sprite_w, sprite_h);

    // Background box behind the text, if any.
    if let Some(bg) = style.background_color.as_deref().and_then(parse_color) {
        if bg[3] > 0 {
            let radius = style.border_radius.unwrap_or(0.0);
            for (px, py, out) in sprite.enumerate_pixels_mut() {
                let cov = rounded_rect_coverage(
                    px as f32 + 0.5 - shadow_pad,
                    py as f32 + 0.5 - shadow_pad,
                    box_w,
                    box_h,
                    radius,
                );
                let mut c = bg;
                c[3] = (c[3] as f32 * cov).round() as u8;
                *out = Rgba(c);
            }
        }
    }

    // Align each line within the box.
    for (line_idx, (glyphs, line_w)) in laid_out.iter_mut().enumerate() {
        let x_off = match align {
            TextAlign::Left => padding,
            TextAlign::Center => (box_w - *line_w) / 2.0,
            TextAlign::Right => box_w - *line_w - padding,
        };
        let y_off = padding + ascent + line_idx as f32 * line_height;
        for g in glyphs.iter_mut() {
            g.x += x_off + shadow_pad;
            g.y = y_off + shadow_pad;
        }
    }

    let color = style.color.as_deref().and_then(parse_color).unwrap_or([255, 255, 255, 255]);
    if let Some((sdx, sdy, scolor)) = shadow {
        for (glyphs, _) in &laid_out {
            draw_glyphs(&mut sprite, &font, glyphs, size, sdx, sdy, scolor);
        }
    }
    for (glyphs, _) in &laid_out {
        draw_glyphs(&mut sprite, &font, glyphs, size, 0.0, 0.0, color);
    }

    Some((sprite, -shadow_pad, -shadow_pad))
}

fn draw_glyphs(
    sprite: &mut RgbaImage,
    font: &FontArc,
    glyphs: &[PlacedGlyph],
    size: f32,
    offset_x: f32,
    offset_y: f32,
    color: [u8; 4],
) {
    let (sw, sh) = (sprite.width() as i32, sprite.height() as i32);
    for g in glyphs {
        let glyph = g
            .id
            .with_scale_and_position(size, point(g.x + offset_x, g.y + offset_y));
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, cov| {
            let px = bounds.min.x as i32 + gx as i32;
            let py = bounds.min.y as i32 + gy as i32;
            if px < 0 || py < 0 || px >= sw || py >= sh {
                return;
            }
            let a = (color[3] as f32 / 255.0) * cov;
            if a <= 0.0 {
                return;
            }
            let dst = sprite.get_pixel_mut(px as u32, py as u32);
            let dst_a = dst.0[3] as f32 / 255.0;
            let out_a = a + dst_a * (1.0 - a);
            for i in 0..3 {
                let blended =
                    (color[i] as f32 * a + dst.0[i] as f32 * dst_a * (1.0 - a)) / out_a.max(f32::EPSILON);
                dst.0[i] = blended.round().clamp(0.0, 255.0) as u8;
            }
            dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        });
    }
}

/// Parse `"2px 2px 4px #00000088"`-style shadows into (dx, dy, color). Blur
/// is ignored; the offset copy reads close enough at thumbnail sizes.
fn parse_text_shadow(s: &str) -> Option<(f32, f32, [u8; 4])> {
    let mut dx = None;
    let mut dy = None;
    let mut color = None;
    for token in s.split_whitespace() {
        if let Some(c) = parse_color(token) {
            color = Some(c);
        } else if let Ok(n) = token.trim_end_matches("px").parse::<f32>() {
            if dx.is_none() {
                dx = Some(n);
            } else if dy.is_none() {
                dy = Some(n);
            }
            // Third length is blur radius, dropped.
        }
    }
    Some((dx?, dy?, color.unwrap_or([0, 0, 0, 128])))
}

fn css_weight(style: &crate::document::LayerStyle) -> u16 {
    match style.font_weight.as_deref() {
        Some("bold") => 700,
        Some("normal") | None => 400,
        Some(other) => other.parse().unwrap_or(400),
    }
}

// ============================================================================
// FONT RESOLUTION
// ============================================================================

type FontCache = Mutex<HashMap<(String, u16, bool), Option<FontArc>>>;

fn font_cache() -> &'static FontCache {
    static CACHE: OnceLock<FontCache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Load a font by family/weight/style from the system, with fallbacks for
/// families that only exist as web fonts. Results (including misses) are
/// cached for the process lifetime.
pub fn resolve_font(family: &str, weight: u16, italic: bool) -> Option<FontArc> {
    let key = (family.to_string(), weight, italic);
    if let Ok(cache) = font_cache().lock() {
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }
    }
    let mut found = load_system_font(family, weight, italic);
    if found.is_none() {
        for fallback in ["DejaVu Sans", "Liberation Sans", "Arial", "Helvetica"] {
            found = load_system_font(fallback, weight, italic);
            if found.is_some() {
                break;
            }
        }
    }
    if let Ok(mut cache) = font_cache().lock() {
        cache.insert(key, found.clone());
    }
    found
}

fn load_system_font(family: &str, weight: u16, italic: bool) -> Option<FontArc> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::{Properties, Style, Weight};
    use font_kit::source::SystemSource;

    let mut props = Properties::new();
    props.weight = Weight(weight as f32);
    if italic {
        props.style = Style::Italic;
    }

    let handle = SystemSource::new()
        .select_best_match(&[FamilyName::Title(family.to_string())], &props)
        .ok()?;
    let font = handle.load().ok()?;
    let bytes: Vec<u8> = (*font.copy_font_data()?).clone();
    FontArc::try_from_vec(bytes).ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{LayerStyle, ShapeKind};

    #[test]
    fn color_forms_parse() {
        assert_eq!(parse_color("#fff"), Some([255, 255, 255, 255]));
        assert_eq!(parse_color("#3b82f6"), Some([0x3b, 0x82, 0xf6, 255]));
        assert_eq!(parse_color("#00000088"), Some([0, 0, 0, 0x88]));
        assert_eq!(parse_color("transparent"), Some([0, 0, 0, 0]));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn gradient_descriptor_parses() {
        let bg = parse_background("linear-gradient(135deg, #dc2626 0%, #991b1b 100%)");
        match bg {
            Background::Linear { angle_deg, stops } => {
                assert_eq!(angle_deg, 135.0);
                assert_eq!(stops.len(), 2);
                assert_eq!(stops[0], (0.0, [0xdc, 0x26, 0x26, 255]));
            }
            _ => panic!("expected gradient"),
        }
    }

    #[test]
    fn corner_keyword_and_bare_stops_parse() {
        let bg = parse_background("linear-gradient(to top right, #c084fc, #f472b6, #fbbf24)");
        match bg {
            Background::Linear { angle_deg, stops } => {
                assert_eq!(angle_deg, 45.0);
                assert_eq!(stops[0].0, 0.0);
                assert_eq!(stops[1].0, 0.5);
                assert_eq!(stops[2].0, 1.0);
            }
            _ => panic!("expected gradient"),
        }
    }

    #[test]
    fn unknown_background_falls_back_to_white() {
        match parse_background("blurple") {
            Background::Solid(c) => assert_eq!(c, [255, 255, 255, 255]),
            _ => panic!("expected solid"),
        }
    }

    #[test]
    fn render_uses_logical_size_and_background() {
        let mut doc = Document::blank(320, 180);
        doc.background = "#112233".to_string();
        let img = render_document(&doc).unwrap();
        assert_eq!((img.width(), img.height()), (320, 180));
        assert_eq!(img.get_pixel(10, 10).0, [0x11, 0x22, 0x33, 255]);
    }

    #[test]
    fn shape_layer_is_drawn_at_position() {
        let mut doc = Document::blank(200, 200);
        doc.background = "#000000".to_string();
        doc.layers.push(crate::document::Layer::new_shape(
            ShapeKind::Rect,
            50.0,
            50.0,
            100.0,
            100.0,
            "#ff0000",
        ));
        let img = render_document(&doc).unwrap();
        assert_eq!(img.get_pixel(100, 100).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(10, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn circle_corners_stay_background() {
        let mut doc = Document::blank(200, 200);
        doc.background = "#000000".to_string();
        doc.layers.push(crate::document::Layer::new_shape(
            ShapeKind::Circle,
            50.0,
            50.0,
            100.0,
            100.0,
            "#ffffff",
        ));
        let img = render_document(&doc).unwrap();
        // Center is filled, the box corner is outside the circle.
        assert_eq!(img.get_pixel(100, 100).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(52, 52).0, [0, 0, 0, 255]);
    }

    #[test]
    fn opacity_blends_with_background() {
        let mut doc = Document::blank(100, 100);
        doc.background = "#000000".to_string();
        let mut layer = crate::document::Layer::new_shape(
            ShapeKind::Rect,
            0.0,
            0.0,
            100.0,
            100.0,
            "#ffffff",
        );
        layer.style = layer.style.merged(&LayerStyle {
            opacity: Some(0.5),
            ..Default::default()
        });
        doc.layers.push(layer);
        let img = render_document(&doc).unwrap();
        let px = img.get_pixel(50, 50).0;
        assert!((px[0] as i32 - 128).abs() <= 2, "half-opacity white over black: {:?}", px);
    }

    #[test]
    fn rotation_moves_pixels() {
        let mut doc = Document::blank(200, 200);
        doc.background = "#000000".to_string();
        let mut layer = crate::document::Layer::new_shape(
            ShapeKind::Rect,
            80.0,
            20.0,
            40.0,
            160.0,
            "#ffffff",
        );
        layer.rotation = 90.0;
        doc.layers.push(layer);
        let img = render_document(&doc).unwrap();
        // A 40x160 bar rotated 90 degrees around its center covers a wide
        // horizontal band instead of a tall vertical one.
        assert_eq!(img.get_pixel(30, 100).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(100, 30).0, [0, 0, 0, 255]);
    }

    #[test]
    fn export_filename_shape() {
        let name = default_export_filename();
        assert!(name.starts_with("creo-thumbnail-"));
        assert!(name.ends_with(".png"));
        let stamp = &name["creo-thumbnail-".len()..name.len() - 4];
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn zero_size_document_is_rejected() {
        let doc = Document::blank(0, 100);
        assert!(matches!(render_document(&doc), Err(ExportError::EmptyDocument)));
    }

    #[test]
    fn text_shadow_parses_offsets_and_color() {
        assert_eq!(
            parse_text_shadow("2px 2px 4px #00000088"),
            Some((2.0, 2.0, [0, 0, 0, 0x88]))
        );
        assert_eq!(parse_text_shadow("none"), None);
    }
}

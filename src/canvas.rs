//! Software rasteriser for [`Scene`]s into an RGBA8 frame.

use std::fmt;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::ScaleError;
use crate::scene::{DrawCommand, Point, Scene, Shadow};

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// `frame` holds `width * height` RGBA pixels; extra bytes are ignored.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let height = if width == 0 { 0 } else { height.min(frame.len() / (width * 4)) };
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let len = self.width * self.height * 4;
        for chunk in self.frame[..len].chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    /// Source-over blend of `color` scaled by `coverage`. Off-frame pixels are dropped.
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = (coverage * color.opacity()).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (i, s) in src.iter().enumerate() {
            let d = self.frame[idx + i] as f32;
            self.frame[idx + i] = (s * a + d * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Splats a sub-pixel sample over the four nearest pixels.
    fn blend_subpixel(&mut self, x: f64, y: f64, color: Color, coverage: f32) {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let x_frac = x - x_floor;
        let y_frac = y - y_floor;
        let (xi, yi) = (x_floor as i32, y_floor as i32);

        let samples = [
            (xi, yi, (1.0 - x_frac) * (1.0 - y_frac)),
            (xi + 1, yi, x_frac * (1.0 - y_frac)),
            (xi, yi + 1, (1.0 - x_frac) * y_frac),
            (xi + 1, yi + 1, x_frac * y_frac),
        ];
        for (px, py, weight) in samples {
            let alpha = coverage * weight as f32;
            if alpha > 0.001 {
                self.blend(px, py, color, alpha);
            }
        }
    }

    /// Pixel bounds of `[min, max]` clipped to the frame, or `None` when empty.
    fn clip(&self, min: Point, max: Point) -> Option<(i32, i32, i32, i32)> {
        let x0 = (min.x.floor() as i32).max(0);
        let y0 = (min.y.floor() as i32).max(0);
        let x1 = (max.x.ceil() as i32).min(self.width as i32 - 1);
        let y1 = (max.y.ceil() as i32).min(self.height as i32 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }
}

/// Fonts tried, in order, when the host does not supply one.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Replays scenes onto a [`Canvas`]. Holds the label font.
#[derive(Default)]
pub struct Rasterizer {
    font: Option<Font<'static>>,
    warned_missing_font: bool,
}

impl fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rasterizer")
            .field("has_font", &self.has_font())
            .finish()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_data(data: Vec<u8>) -> Result<Self, ScaleError> {
        let font = Font::try_from_vec(data).ok_or(ScaleError::InvalidFont)?;
        Ok(Self {
            font: Some(font),
            warned_missing_font: false,
        })
    }

    /// First parsable font from the usual system locations. Falls back to a
    /// font-less rasteriser, which skips labels.
    pub fn with_system_font() -> Self {
        for path in SYSTEM_FONT_PATHS {
            let Ok(data) = std::fs::read(path) else {
                continue;
            };
            match Self::with_font_data(data) {
                Ok(rasterizer) => {
                    log::debug!("using system font {path}");
                    return rasterizer;
                }
                Err(err) => log::debug!("skipping {path}: {err}"),
            }
        }
        log::warn!("no system font found, scale labels are not drawn");
        Self::new()
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn render(&mut self, canvas: &mut Canvas, scene: &Scene) {
        for command in scene.commands() {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Ring {
                    center,
                    radius,
                    width,
                    color,
                    shadow,
                } => draw_ring(canvas, *center, *radius, *width, *color, *shadow),
                DrawCommand::Line {
                    start,
                    end,
                    width,
                    color,
                } => draw_thick_line_aa(canvas, *start, *end, *width, *color),
                DrawCommand::Label {
                    anchor,
                    text,
                    size,
                    rotation,
                    color,
                } => match &self.font {
                    Some(font) => draw_rotated_text(
                        canvas,
                        font,
                        *anchor,
                        text,
                        Scale::uniform(*size),
                        rotation.to_radians(),
                        *color,
                    ),
                    None if !self.warned_missing_font => {
                        log::warn!("no font loaded, scale labels are not drawn");
                        self.warned_missing_font = true;
                    }
                    None => {}
                },
                DrawCommand::Triangle { points, color } => fill_triangle(canvas, *points, *color),
            }
        }
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_thick_line_aa(canvas: &mut Canvas, p0: Point, p1: Point, thickness: f32, color: Color) {
    let pad = thickness.ceil() as f64 + 1.0;
    let Some((min_x, min_y, max_x, max_y)) = canvas.clip(
        Point::new(p0.x.min(p1.x) - pad, p0.y.min(p1.y) - pad),
        Point::new(p0.x.max(p1.x) + pad, p0.y.max(p1.y) + pad),
    ) else {
        return;
    };
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let len_sq = dx * dx + dy * dy;
    let half = thickness as f64 / 2.0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 + 0.5 - p0.x;
            let py = y as f64 + 0.5 - p0.y;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = ((t * dx - px).powi(2) + (t * dy - py).powi(2)).sqrt();
            let aa = (1.0 - (dist - half).clamp(0.0, 1.0)) as f32;
            if aa > 0.01 {
                canvas.blend(x, y, color, aa);
            }
        }
    }
}

/// Stroked full circle of `width` centered on `radius`, with an optional
/// soft shadow fading out on both sides of the band.
fn draw_ring(
    canvas: &mut Canvas,
    center: Point,
    radius: f64,
    width: f64,
    color: Color,
    shadow: Option<Shadow>,
) {
    let inner = (radius - width / 2.0).max(0.0);
    let outer = radius + width / 2.0;
    let blur = shadow.map_or(0.0, |s| s.radius.max(0.0));
    let reach = outer + blur + 1.0;
    let Some((min_x, min_y, max_x, max_y)) = canvas.clip(
        Point::new(center.x - reach, center.y - reach),
        Point::new(center.x + reach, center.y + reach),
    ) else {
        return;
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            let dist = (dx * dx + dy * dy).sqrt();
            // Distance outside the band; negative inside it.
            let outside = (inner - dist).max(dist - outer);

            if let Some(shadow) = shadow {
                if blur > 0.0 && outside > 0.0 && outside < blur {
                    let falloff = 1.0 - outside / blur;
                    canvas.blend(x, y, shadow.color, (falloff * falloff) as f32);
                }
            }

            let aa = (0.5 - outside).clamp(0.0, 1.0) as f32;
            if aa > 0.0 {
                canvas.blend(x, y, color, aa);
            }
        }
    }
}

fn fill_triangle(canvas: &mut Canvas, points: [Point; 3], color: Color) {
    let [a, b, c] = points;
    let Some((min_x, min_y, max_x, max_y)) = canvas.clip(
        Point::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)),
        Point::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)),
    ) else {
        return;
    };
    let edge = |p: Point, q: Point, s: Point| (q.x - p.x) * (s.y - p.y) - (q.y - p.y) * (s.x - p.x);
    let area = edge(a, b, c);
    if area == 0.0 {
        return;
    }
    const OFFSETS: [f64; 2] = [0.25, 0.75];

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let mut hits = 0;
            for oy in OFFSETS {
                for ox in OFFSETS {
                    let s = Point::new(x as f64 + ox, y as f64 + oy);
                    let (w0, w1, w2) = (edge(b, c, s), edge(c, a, s), edge(a, b, s));
                    let inside = if area > 0.0 {
                        w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                    } else {
                        w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                    };
                    if inside {
                        hits += 1;
                    }
                }
            }
            if hits > 0 {
                canvas.blend(x, y, color, hits as f32 / 4.0);
            }
        }
    }
}

/// Draws `text` centered on `anchor` (baseline), rotated by `rotation` radians
/// clockwise about the anchor.
fn draw_rotated_text(
    canvas: &mut Canvas,
    font: &Font<'static>,
    anchor: Point,
    text: &str,
    scale: Scale,
    rotation: f64,
    color: Color,
) {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    let total_width = match (glyphs.first(), glyphs.last()) {
        (Some(first), Some(last)) => {
            (last.position().x - first.position().x + last.unpositioned().h_metrics().advance_width)
                as f64
        }
        _ => return,
    };
    let cos_r = rotation.cos();
    let sin_r = rotation.sin();

    for glyph in &glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            if v > 0.001 {
                let local_x = (bb.min.x + gx as i32) as f64 + 0.5 - total_width / 2.0;
                let local_y = (bb.min.y + gy as i32) as f64 + 0.5;
                let x = anchor.x + local_x * cos_r - local_y * sin_r;
                let y = anchor.y + local_x * sin_r + local_y * cos_r;
                canvas.blend_subpixel(x, y, color, v);
            }
        });
    }
}

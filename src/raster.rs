use std::path::{Path, PathBuf};

use rusttype::{point, Font, PositionedGlyph, Scale};
use tracing::{info, warn};

use crate::config::Color;
use crate::error::{ClockError, Result};
use crate::geometry::{Point, Rect};
use crate::scene::{Dash, LineCap, Primitive, Scene, Stroke};

const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

// ============================================================================
// FONT LOADING
// ============================================================================

/// Loads the face font once.
///
/// An explicitly configured path must load. Without one, common system
/// locations are tried and text is skipped if none of them works.
pub fn load_font(configured: Option<&Path>) -> Result<Option<Font<'static>>> {
    if let Some(path) = configured {
        let font = read_font(path).ok_or_else(|| ClockError::Font {
            path: path.to_path_buf(),
        })?;
        info!(path = %path.display(), "font loaded");
        return Ok(Some(font));
    }

    let found = FONT_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find_map(|path| read_font(&path).map(|font| (path, font)));
    match found {
        Some((path, font)) => {
            info!(path = %path.display(), "font loaded");
            Ok(Some(font))
        }
        None => {
            warn!("no system font found, face text will not be drawn");
            Ok(None)
        }
    }
}

fn read_font(path: &Path) -> Option<Font<'static>> {
    let bytes = std::fs::read(path).ok()?;
    Font::try_from_vec(bytes)
}

// ============================================================================
// CANVAS
// ============================================================================

/// An RGBA8 frame buffer view.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert_eq!(frame.len(), width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Color::new(
            self.frame[idx],
            self.frame[idx + 1],
            self.frame[idx + 2],
        ))
    }

    /// Alpha-blends `color` over the pixel at (x, y); out-of-bounds is a no-op.
    fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        let out = [
            mix(color.r, self.frame[idx]),
            mix(color.g, self.frame[idx + 1]),
            mix(color.b, self.frame[idx + 2]),
            0xff,
        ];
        self.frame[idx..idx + 4].copy_from_slice(&out);
    }
}

// ============================================================================
// RASTERIZER
// ============================================================================

/// Turns a retained [`Scene`] into pixels.
pub struct Rasterizer {
    font: Option<Font<'static>>,
}

impl Rasterizer {
    pub fn new(font: Option<Font<'static>>) -> Self {
        Self { font }
    }

    pub fn render(&self, scene: &Scene, canvas: &mut Canvas) {
        canvas.clear(scene.background());
        for (_, primitive) in scene.iter() {
            self.draw(canvas, primitive);
        }
    }

    fn draw(&self, canvas: &mut Canvas, primitive: &Primitive) {
        match primitive {
            Primitive::Line {
                from,
                to,
                width,
                cap,
                dash,
                color,
            } => draw_line(canvas, *from, *to, *width, *cap, *dash, *color),
            Primitive::Oval {
                bounds,
                fill,
                outline,
            } => draw_oval(canvas, bounds, *fill, *outline),
            Primitive::Rectangle {
                bounds,
                fill,
                outline,
            } => draw_rectangle(canvas, bounds, *fill, *outline),
            Primitive::Polygon { points, fill } => fill_polygon(canvas, points, *fill),
            Primitive::Text {
                at,
                text,
                size,
                color,
            } => {
                if let Some(font) = &self.font {
                    draw_text(canvas, *at, text, font, Scale::uniform(*size), *color);
                }
            }
        }
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_line(
    canvas: &mut Canvas,
    from: Point,
    to: Point,
    width: f32,
    cap: LineCap,
    dash: Option<Dash>,
    color: Color,
) {
    let half = f64::from(width) / 2.0;
    let pad = half.ceil() + 1.0;
    let min_x = (from.x.min(to.x) - pad).floor() as i32;
    let max_x = (from.x.max(to.x) + pad).ceil() as i32;
    let min_y = (from.y.min(to.y) - pad).floor() as i32;
    let max_y = (from.y.max(to.y) + pad).ceil() as i32;
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len_sq = dx * dx + dy * dy;
    let len = len_sq.sqrt();

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = f64::from(x) - from.x;
            let py = f64::from(y) - from.y;
            let raw_t = if len_sq > 0.0 {
                (px * dx + py * dy) / len_sq
            } else {
                0.0
            };
            if cap == LineCap::Butt && !(0.0..=1.0).contains(&raw_t) {
                continue;
            }
            let t = raw_t.clamp(0.0, 1.0);
            if let Some(dash) = dash {
                if (t * len).rem_euclid(dash.on + dash.off) >= dash.on {
                    continue;
                }
            }
            let lx = from.x + t * dx;
            let ly = from.y + t * dy;
            let dist = (lx - f64::from(x)).hypot(ly - f64::from(y));
            let aa = (1.0 - (dist - half).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

/// Signed distance in pixels from (x, y) to the ellipse edge, negative inside.
fn ellipse_distance(bounds: &Rect, x: f64, y: f64) -> f64 {
    let c = bounds.center();
    let rx = (bounds.width() / 2.0).max(f64::EPSILON);
    let ry = (bounds.height() / 2.0).max(f64::EPSILON);
    let nx = (x - c.x) / rx;
    let ny = (y - c.y) / ry;
    (nx.hypot(ny) - 1.0) * rx.min(ry)
}

fn draw_oval(canvas: &mut Canvas, bounds: &Rect, fill: Option<Color>, outline: Option<Stroke>) {
    let stroke_half = outline.map_or(0.0, |s| f64::from(s.width) / 2.0);
    let pad = stroke_half + 1.0;
    let (x0, y0) = ((bounds.min.x - pad).floor() as i32, (bounds.min.y - pad).floor() as i32);
    let (x1, y1) = ((bounds.max.x + pad).ceil() as i32, (bounds.max.y + pad).ceil() as i32);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = ellipse_distance(bounds, f64::from(x), f64::from(y));
            if let Some(color) = fill {
                let aa = if d > 0.0 { 1.0 - d.min(1.0) } else { 1.0 };
                if aa > 0.0 {
                    canvas.blend(x, y, color, aa as f32);
                }
            }
            if let Some(stroke) = outline {
                let aa = 1.0 - (d.abs() - stroke_half).clamp(0.0, 1.0);
                if aa > 0.01 {
                    canvas.blend(x, y, stroke.color, aa as f32);
                }
            }
        }
    }
}

fn draw_rectangle(canvas: &mut Canvas, bounds: &Rect, fill: Option<Color>, outline: Option<Stroke>) {
    let x0 = bounds.min.x.round() as i32;
    let y0 = bounds.min.y.round() as i32;
    let x1 = bounds.max.x.round() as i32;
    let y1 = bounds.max.y.round() as i32;

    if let Some(color) = fill {
        for y in y0..y1 {
            for x in x0..x1 {
                canvas.blend(x, y, color, 1.0);
            }
        }
    }

    if let Some(stroke) = outline {
        let half = (f64::from(stroke.width) / 2.0).round() as i32;
        for y in (y0 - half)..(y1 + half) {
            for x in (x0 - half)..(x1 + half) {
                let inside = x >= x0 + half && x < x1 - half && y >= y0 + half && y < y1 - half;
                if !inside {
                    canvas.blend(x, y, stroke.color, 1.0);
                }
            }
        }
    }
}

/// Even-odd scanline fill sampled at pixel centers.
fn fill_polygon(canvas: &mut Canvas, points: &[Point], color: Color) {
    if points.len() < 3 {
        return;
    }
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).floor() as i32;
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max).ceil() as i32;
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor() as i32;
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil() as i32;

    for y in min_y..=max_y {
        let sy = f64::from(y) + 0.5;
        for x in min_x..=max_x {
            let sx = f64::from(x) + 0.5;
            let mut inside = false;
            let mut j = points.len() - 1;
            for i in 0..points.len() {
                let (a, b) = (points[i], points[j]);
                if (a.y > sy) != (b.y > sy) && sx < (b.x - a.x) * (sy - a.y) / (b.y - a.y) + a.x {
                    inside = !inside;
                }
                j = i;
            }
            if inside {
                canvas.blend(x, y, color, 1.0);
            }
        }
    }
}

/// Draws `text` centered on `at`.
fn draw_text(canvas: &mut Canvas, at: Point, text: &str, font: &Font, scale: Scale, color: Color) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = at.x.round() as i32 - width_px / 2;
    let offset_y = at.y.round() as i32 - height_px / 2;

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.blend(px, py, color, v);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Surface;

    const W: usize = 64;
    const H: usize = 64;
    const RED: Color = Color::new(0xff, 0x00, 0x00);
    const BLUE: Color = Color::new(0x00, 0x00, 0xff);
    const GREY: Color = Color::new(0x10, 0x10, 0x10);

    fn render(scene: &Scene) -> Vec<u8> {
        let mut frame = vec![0u8; W * H * 4];
        let mut canvas = Canvas::new(&mut frame, W, H);
        Rasterizer::new(None).render(scene, &mut canvas);
        frame
    }

    fn at(frame: &mut [u8], x: usize, y: usize) -> Option<Color> {
        Canvas::new(frame, W, H).pixel(x, y)
    }

    #[test]
    fn background_fills_frame() {
        let scene = Scene::new(GREY);
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 0, 0), Some(GREY));
        assert_eq!(at(&mut frame, W - 1, H - 1), Some(GREY));
        assert_eq!(at(&mut frame, W, 0), None);
    }

    #[test]
    fn thick_line_covers_its_axis() {
        let mut scene = Scene::new(GREY);
        scene.line(Point::new(10.0, 32.0), Point::new(50.0, 32.0), 4.0, LineCap::Butt, RED);
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 30, 32), Some(RED));
        assert_eq!(at(&mut frame, 30, 40), Some(GREY));
        // butt caps stop at the endpoint
        assert_eq!(at(&mut frame, 7, 32), Some(GREY));
    }

    #[test]
    fn round_cap_extends_past_endpoint() {
        let mut scene = Scene::new(GREY);
        scene.line(Point::new(10.0, 32.0), Point::new(50.0, 32.0), 8.0, LineCap::Round, RED);
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 8, 32), Some(RED));
    }

    #[test]
    fn dashed_line_leaves_gaps() {
        let mut scene = Scene::new(GREY);
        scene.dashed_line(
            Point::new(0.0, 10.0),
            Point::new(60.0, 10.0),
            3.0,
            Dash { on: 3.0, off: 4.0 },
            BLUE,
        );
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 1, 10), Some(BLUE));
        assert_eq!(at(&mut frame, 5, 10), Some(GREY));
        assert_eq!(at(&mut frame, 8, 10), Some(BLUE));
    }

    #[test]
    fn filled_oval_and_outline() {
        let mut scene = Scene::new(GREY);
        scene.oval(
            Rect::square(Point::new(32.0, 32.0), 20.0),
            Some(RED),
            Some(Stroke {
                color: BLUE,
                width: 2.0,
            }),
        );
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 32, 32), Some(RED));
        assert_eq!(at(&mut frame, 52, 32), Some(BLUE));
        assert_eq!(at(&mut frame, 2, 2), Some(GREY));
    }

    #[test]
    fn rectangle_with_frame() {
        let mut scene = Scene::new(GREY);
        scene.rectangle(
            Rect::new(10.0, 10.0, 30.0, 30.0),
            Some(RED),
            Some(Stroke {
                color: BLUE,
                width: 2.0,
            }),
        );
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 20, 20), Some(RED));
        assert_eq!(at(&mut frame, 10, 20), Some(BLUE));
        assert_eq!(at(&mut frame, 9, 20), Some(BLUE));
        assert_eq!(at(&mut frame, 40, 40), Some(GREY));
    }

    #[test]
    fn triangle_fill() {
        let mut scene = Scene::new(GREY);
        scene.polygon(
            vec![Point::new(32.0, 4.0), Point::new(10.0, 50.0), Point::new(54.0, 50.0)],
            RED,
        );
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 32, 40), Some(RED));
        assert_eq!(at(&mut frame, 5, 5), Some(GREY));
        assert_eq!(at(&mut frame, 32, 55), Some(GREY));
    }

    #[test]
    fn later_primitives_draw_on_top() {
        let mut scene = Scene::new(GREY);
        scene.rectangle(Rect::new(0.0, 0.0, 64.0, 64.0), Some(RED), None);
        scene.rectangle(Rect::new(20.0, 20.0, 40.0, 40.0), Some(BLUE), None);
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 30, 30), Some(BLUE));
        assert_eq!(at(&mut frame, 5, 5), Some(RED));
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut scene = Scene::new(GREY);
        scene.text(Point::new(32.0, 32.0), "12".to_string(), 20.0, RED);
        let mut frame = render(&scene);
        assert_eq!(at(&mut frame, 32, 32), Some(GREY));
    }

    #[test]
    fn missing_configured_font_is_an_error() {
        let err = load_font(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        assert!(err.is_configuration());
    }
}

//! RGBA raster with the handful of 2D painting operations the texture
//! synthesizer needs: solid rectangles, vertical gradients, outlines and
//! straight lines. Coordinates are fractional pixels; a pixel is covered when
//! its center falls inside the shape. Everything outside the raster is clipped.

/// Row-major RGBA8 pixel buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Axis-aligned rectangle in pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Gradient color stop, `offset` in 0..=1
#[derive(Clone, Copy, Debug)]
pub struct Stop {
    pub offset: f32,
    pub color: [u8; 4],
}

pub const fn stop(offset: f32, color: [u8; 4]) -> Stop {
    Stop { offset, color }
}

pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

impl Raster {
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
        Self { width, height, pixels }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    // source-over compositing, the raster itself stays opaque
    #[inline]
    fn blend_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let idx = ((y * self.width + x) * 4) as usize;
        let alpha = color[3] as f32 / 255.0;
        if alpha >= 1.0 {
            self.pixels[idx..idx + 4].copy_from_slice(&color);
            return;
        }
        for c in 0..3 {
            let dst = self.pixels[idx + c] as f32;
            let src = color[c] as f32;
            self.pixels[idx + c] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
        }
        self.pixels[idx + 3] = 255;
    }

    // pixel index span whose centers lie in [start, end)
    fn span(start: f32, end: f32, limit: u32) -> std::ops::Range<u32> {
        let first = (start - 0.5).ceil().max(0.0) as u32;
        let last = ((end - 0.5).ceil().max(0.0) as u32).min(limit);
        first.min(last)..last
    }

    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        for y in Self::span(rect.y, rect.y + rect.h, self.height) {
            for x in Self::span(rect.x, rect.x + rect.w, self.width) {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Fill `rect` with a vertical gradient running from `y0` to `y1`.
    /// Rows outside that range take the nearest end stop.
    pub fn fill_gradient_v(&mut self, rect: Rect, y0: f32, y1: f32, stops: &[Stop]) {
        let extent = y1 - y0;
        for y in Self::span(rect.y, rect.y + rect.h, self.height) {
            let t = if extent.abs() < f32::EPSILON {
                0.0
            } else {
                ((y as f32 + 0.5 - y0) / extent).clamp(0.0, 1.0)
            };
            let color = sample_stops(stops, t);
            for x in Self::span(rect.x, rect.x + rect.w, self.width) {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Outline of `rect` with the stroke centered on its edges
    pub fn stroke_rect(&mut self, rect: Rect, line_width: f32, color: [u8; 4]) {
        let half = line_width / 2.0;
        let Rect { x, y, w, h } = rect;
        // top and bottom run the full width including the corners
        self.fill_rect(Rect::new(x - half, y - half, w + line_width, line_width), color);
        self.fill_rect(Rect::new(x - half, y + h - half, w + line_width, line_width), color);
        // sides fill between them so translucent strokes don't double up
        self.fill_rect(Rect::new(x - half, y + half, line_width, h - line_width), color);
        self.fill_rect(Rect::new(x + w - half, y + half, line_width, h - line_width), color);
    }

    pub fn line_h(&mut self, y: f32, x0: f32, x1: f32, line_width: f32, color: [u8; 4]) {
        self.fill_rect(Rect::new(x0, y - line_width / 2.0, x1 - x0, line_width), color);
    }

    pub fn line_v(&mut self, x: f32, y0: f32, y1: f32, line_width: f32, color: [u8; 4]) {
        self.fill_rect(Rect::new(x - line_width / 2.0, y0, line_width, y1 - y0), color);
    }
}

// interpolates in premultiplied space so fades to TRANSPARENT don't pick up black
fn sample_stops(stops: &[Stop], t: f32) -> [u8; 4] {
    let Some(first) = stops.first() else {
        return TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            return lerp_premultiplied(a.color, b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

fn lerp_premultiplied(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let alpha_a = a[3] as f32 / 255.0;
    let alpha_b = b[3] as f32 / 255.0;
    let alpha = alpha_a + (alpha_b - alpha_a) * t;
    if alpha <= f32::EPSILON {
        return TRANSPARENT;
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let pa = a[c] as f32 * alpha_a;
        let pb = b[c] as f32 * alpha_b;
        out[c] = ((pa + (pb - pa) * t) / alpha).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (alpha * 255.0).round() as u8;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn fill_rect_covers_pixel_centers_and_clips() {
        let mut raster = Raster::filled(8, 8, BLACK);
        raster.fill_rect(Rect::new(6.0, -2.0, 10.0, 4.0), RED);

        assert_eq!(raster.get_pixel(6, 0), RED);
        assert_eq!(raster.get_pixel(7, 1), RED);
        assert_eq!(raster.get_pixel(5, 0), BLACK);
        assert_eq!(raster.get_pixel(6, 2), BLACK);
    }

    #[test]
    fn fractional_edges_round_by_center() {
        let mut raster = Raster::filled(4, 1, BLACK);
        // spans 1.4..2.9, so only the centers 1.5 and 2.5 are inside
        raster.fill_rect(Rect::new(1.4, 0.0, 1.5, 1.0), RED);
        assert_eq!(raster.get_pixel(0, 0), BLACK);
        assert_eq!(raster.get_pixel(1, 0), RED);
        assert_eq!(raster.get_pixel(2, 0), RED);
        assert_eq!(raster.get_pixel(3, 0), BLACK);
    }

    #[test]
    fn gradient_runs_between_stops() {
        let mut raster = Raster::filled(1, 10, BLACK);
        let stops = [stop(0.0, [0, 0, 0, 255]), stop(1.0, [200, 200, 200, 255])];
        raster.fill_gradient_v(Rect::new(0.0, 0.0, 1.0, 10.0), 0.0, 10.0, &stops);

        let top = raster.get_pixel(0, 0)[0];
        let mid = raster.get_pixel(0, 5)[0];
        let bottom = raster.get_pixel(0, 9)[0];
        assert!(top < mid && mid < bottom);
        assert_eq!(bottom, 190);
    }

    #[test]
    fn fade_to_transparent_keeps_hue() {
        let mut raster = Raster::filled(1, 4, [100, 100, 100, 255]);
        let stops = [stop(0.0, [200, 100, 50, 255]), stop(1.0, TRANSPARENT)];
        raster.fill_gradient_v(Rect::new(0.0, 0.0, 1.0, 4.0), 0.0, 4.0, &stops);

        // half way the source keeps 50% of its hue, not darkened toward black
        let px = raster.get_pixel(0, 1);
        assert_eq!(px[3], 255);
        assert!(px[0] > 100, "red channel should rise over the grey background");
        // bottom row is almost fully transparent source
        let last = raster.get_pixel(0, 3);
        assert!((last[0] as i32 - 100).abs() < 30);
    }

    #[test]
    fn stroke_rect_leaves_interior() {
        let mut raster = Raster::filled(10, 10, BLACK);
        raster.stroke_rect(Rect::new(2.0, 2.0, 6.0, 6.0), 2.0, RED);

        assert_eq!(raster.get_pixel(1, 1), RED);
        assert_eq!(raster.get_pixel(2, 5), RED);
        assert_eq!(raster.get_pixel(7, 5), RED);
        assert_eq!(raster.get_pixel(5, 8), RED);
        assert_eq!(raster.get_pixel(5, 5), BLACK);
        assert_eq!(raster.get_pixel(5, 9), BLACK);
    }
}

//! CPU raster output into an RGBA image.
//!
//! There is no font rasterizer here: text commands are counted and skipped,
//! so PNG output carries geometry only.

use image::{Rgba, RgbaImage};
use rmsk_core::{Color, DrawCommand, PrimitiveSink};

pub struct RasterSink {
    img: RgbaImage,
    /// `(x, y, width, height)` outside which nothing is painted
    clip: Option<(i32, i32, i32, i32)>,
    skipped_text: usize,
}

impl RasterSink {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, rgba(background)),
            clip: None,
            skipped_text: 0,
        }
    }

    pub fn set_clip(&mut self, clip: Option<(i32, i32, i32, i32)>) {
        self.clip = clip;
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn into_image(self) -> RgbaImage {
        if self.skipped_text > 0 {
            log::debug!("PNG output skipped {} text labels", self.skipped_text);
        }
        self.img
    }

    /// Paintable `[x0, x1) x [y0, y1)`: the image narrowed by the clip.
    fn bounds(&self) -> (i32, i32, i32, i32) {
        let (w, h) = (self.img.width() as i32, self.img.height() as i32);
        match self.clip {
            Some((x, y, cw, ch)) => (x.max(0), y.max(0), (x + cw).min(w), (y + ch).min(h)),
            None => (0, 0, w, h),
        }
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        let (x0, y0, x1, y1) = self.bounds();
        if x >= x0 && y >= y0 && x < x1 && y < y1 {
            self.img.put_pixel(x as u32, y as u32, color);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgba<u8>) {
        let (bx0, by0, bx1, by1) = self.bounds();
        let x0 = x.max(bx0);
        let y0 = y.max(by0);
        let x1 = (x + width).min(bx1);
        let y1 = (y + height).min(by1);
        for py in y0..y1 {
            for px in x0..x1 {
                self.img.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
        // Bresenham line drawing
        let (mut x0, mut y0) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Even-odd scanline fill, sampling pixel centers.
    fn fill_polygon(&mut self, points: &[(i32, i32)], color: Rgba<u8>) {
        if points.len() < 3 {
            return;
        }
        let y_min = points.iter().map(|p| p.1).min().unwrap_or(0).max(0);
        let y_max = points
            .iter()
            .map(|p| p.1)
            .max()
            .unwrap_or(0)
            .min(self.img.height() as i32 - 1);

        let mut crossings: Vec<f64> = Vec::with_capacity(points.len());
        for y in y_min..=y_max {
            let sy = y as f64 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let (ax, ay) = points[i];
                let (bx, by) = points[(i + 1) % points.len()];
                let (ay, by) = (ay as f64, by as f64);
                if (ay <= sy && by > sy) || (by <= sy && ay > sy) {
                    let t = (sy - ay) / (by - ay);
                    crossings.push(ax as f64 + t * (bx - ax) as f64);
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil() as i32;
                let end = (pair[1] - 0.5).floor() as i32;
                for x in start..=end {
                    self.put(x, y, color);
                }
            }
        }
    }
}

impl PrimitiveSink for RasterSink {
    fn push(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::FilledRect { x, y, width, height, color } => {
                self.fill_rect(x, y, width, height, rgba(color))
            }
            DrawCommand::Line { x1, y1, x2, y2, color } => self.draw_line(x1, y1, x2, y2, rgba(color)),
            DrawCommand::Polygon { points, fill, outline } => {
                if let Some(fill) = fill {
                    self.fill_polygon(&points, rgba(fill));
                }
                if let Some(outline) = outline {
                    let n = points.len();
                    for i in 0..n {
                        let (ax, ay) = points[i];
                        let (bx, by) = points[(i + 1) % n];
                        self.draw_line(ax, ay, bx, by, rgba(outline));
                    }
                }
            }
            DrawCommand::Text { .. } => self.skipped_text += 1,
            DrawCommand::MapItem(_) => {}
        }
    }
}

fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_rect_is_clipped() {
        let mut sink = RasterSink::new(10, 10, Color::WHITE);
        sink.filled_rect(-5, 8, 20, 5, Color::BLACK);
        let img = sink.into_image();
        assert_eq!(img.get_pixel(0, 9), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(9, 8), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(0, 7), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_clip_rect_masks_everything_outside() {
        let black = Rgba([0, 0, 0, 255]);
        let white = Rgba([255, 255, 255, 255]);
        let mut sink = RasterSink::new(20, 10, Color::WHITE);
        sink.set_clip(Some((5, 0, 10, 10)));
        sink.filled_rect(0, 0, 8, 4, Color::BLACK);
        sink.line(0, 6, 19, 6, Color::BLACK);
        sink.polygon(vec![(12, 0), (19, 0), (19, 3), (12, 3)], Some(Color::BLACK), None);

        let img = sink.image();
        assert_eq!(img.get_pixel(4, 1), &white);
        assert_eq!(img.get_pixel(5, 1), &black);
        assert_eq!(img.get_pixel(4, 6), &white);
        assert_eq!(img.get_pixel(14, 6), &black);
        assert_eq!(img.get_pixel(15, 6), &white);
        assert_eq!(img.get_pixel(14, 1), &black);
        assert_eq!(img.get_pixel(16, 1), &white);

        sink.set_clip(None);
        sink.filled_rect(0, 9, 2, 1, Color::BLACK);
        assert_eq!(sink.image().get_pixel(0, 9), &black);
    }

    #[test]
    fn test_line_endpoints_are_drawn() {
        let mut sink = RasterSink::new(20, 20, Color::WHITE);
        sink.line(2, 3, 15, 11, Color::BLACK);
        assert_eq!(sink.image().get_pixel(2, 3), &Rgba([0, 0, 0, 255]));
        assert_eq!(sink.image().get_pixel(15, 11), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_polygon_fill_covers_interior() {
        let mut sink = RasterSink::new(20, 20, Color::WHITE);
        let red = Color::rgb(255, 0, 0);
        sink.polygon(vec![(2, 2), (16, 2), (16, 12), (2, 12)], Some(red), None);
        let img = sink.into_image();
        assert_eq!(img.get_pixel(9, 7), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(18, 7), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_text_is_skipped() {
        let mut sink = RasterSink::new(4, 4, Color::WHITE);
        sink.text(0, 0, 4, 4, "x", Color::BLACK, rmsk_core::TextAlign::Left);
        assert!(sink.image().pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }
}

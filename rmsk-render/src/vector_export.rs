/*!
# Track Export

Lays out and draws a repeat track, then writes it as SVG (with class
legend, left-margin labels, title and footer) or as a PNG raster.
*/

use crate::raster::RasterSink;
use crate::svg::{SvgBuilder, SvgSink};
use anyhow::{Context, Result};
use rmsk_core::{
    AnnotationRecord, ClassColorTable, Color, FixedWidthFont, Layout, LayoutEngine, LayoutPolicy,
    PrimitiveSink, TrackConfig, TrackDrawing, TrackPainter,
};
use serde::Serialize;
use std::path::Path;

const PADDING: u32 = 10;
const LEGEND_WIDTH: u32 = 150;
const FOOTER_HEIGHT: u32 = 20;
const DATA_CLIP_ID: &str = "rmsk-data-area";

/// Export configuration
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub show_legend: bool,
    pub show_footer: bool,
    pub show_left_labels: bool,
    /// Width reserved left of the data area for margin labels
    pub left_margin: u32,
    pub title: Option<String>,
    pub background_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub provenance_comment: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_footer: true,
            show_left_labels: true,
            left_margin: 120,
            title: None,
            background_color: "#ffffff".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            font_size: 12,
            provenance_comment: None,
        }
    }
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub width: u32,
    pub height: u32,
    pub policy: String,
    pub row_count: usize,
    pub records: usize,
    pub left_labels: usize,
}

/// Positions of the parts of the image.
struct Frame {
    width: u32,
    height: u32,
    data_x: i32,
    data_y: i32,
    data_width: i32,
    data_height: i32,
    legend_x: u32,
}

impl Frame {
    /// `(x, y, width, height)` of the area the track is drawn in.
    fn data_area(&self) -> (i32, i32, i32, i32) {
        (self.data_x, self.data_y, self.data_width, self.data_height)
    }
}

/// Output of one paint pass. Commands past `track_len` are margin labels.
struct Painted {
    layout: Layout,
    drawing: TrackDrawing,
    frame: Frame,
    sink: Box<dyn PaintTarget>,
    track_len: usize,
}

pub struct TrackExporter {
    config: ExportConfig,
    font: FixedWidthFont,
}

impl TrackExporter {
    pub fn new(config: ExportConfig) -> Self {
        // Width of the fixed-pitch font scales with its size (7 px at 12 px).
        let size = config.font_size.max(6) as i32;
        let font = FixedWidthFont::new((size * 7 + 6) / 12, size);
        Self { config, font }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    fn frame(&self, track: &TrackConfig, classes: &ClassColorTable, track_height: i32) -> Frame {
        let title_h = if self.config.title.is_some() { self.config.font_size + 16 } else { 0 };
        let left = if self.config.show_left_labels { self.config.left_margin } else { 0 };
        let legend_w = if self.config.show_legend { LEGEND_WIDTH } else { 0 };
        let footer_h = if self.config.show_footer { FOOTER_HEIGHT } else { 0 };
        let legend_h = if self.config.show_legend {
            (self.config.font_size + 6) * classes.len() as u32 + 10
        } else {
            0
        };

        let data_y = PADDING + title_h;
        let body_h = (track_height.max(0) as u32).max(legend_h);
        Frame {
            width: left + track.image_width + legend_w + PADDING,
            height: data_y + body_h + PADDING + footer_h,
            data_x: left as i32,
            data_y: data_y as i32,
            data_width: track.image_width as i32,
            data_height: track_height.max(0),
            legend_x: left + track.image_width + PADDING,
        }
    }

    /// Lay out and draw into `sink`, margin labels included. The track is
    /// clipped to the data area; margin labels are drawn after it, unclipped.
    fn paint(
        &self,
        engine: &LayoutEngine,
        track: &TrackConfig,
        records: &[AnnotationRecord],
        frame_for: impl FnOnce(i32) -> Frame,
        make_sink: impl FnOnce(&Frame) -> Box<dyn PaintTarget>,
    ) -> Result<Painted> {
        let layout = engine
            .compute_layout(records, track, &self.font)
            .context("Failed to lay out records")?;
        let painter = TrackPainter::new(engine, track, &self.font);
        let frame = frame_for(painter.total_height(&layout));
        let painter = painter.with_offset(frame.data_x, frame.data_y);
        let mut sink = make_sink(&frame);
        sink.set_clip(Some(frame.data_area()));
        let drawing = painter
            .draw(records, &layout, sink.as_sink())
            .context("Failed to draw track")?;
        sink.set_clip(None);
        let track_len = sink.len();
        if self.config.show_left_labels {
            let margin = self.config.left_margin as i32;
            painter.draw_left_labels(&layout, &drawing, 0, margin - PADDING as i32, sink.as_sink());
        }
        Ok(Painted {
            layout,
            drawing,
            frame,
            sink,
            track_len,
        })
    }

    fn summary(&self, layout: &Layout, drawing: &TrackDrawing, frame: &Frame, records: usize) -> ExportSummary {
        ExportSummary {
            width: frame.width,
            height: frame.height,
            policy: layout.policy.to_string(),
            row_count: layout.row_count,
            records,
            left_labels: drawing.left_labels.len(),
        }
    }

    fn footer_text(&self, track: &TrackConfig, policy: LayoutPolicy, rows: usize) -> String {
        format!(
            "RmskView v{} | Window: {}-{} | Mode: {} | Layout: {} ({} rows) | Generated: {}",
            rmsk_core::VERSION,
            track.window_start,
            track.window_end,
            track.visibility,
            policy,
            rows,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )
    }

    /// Render the SVG document as a string.
    pub fn render_svg(
        &self,
        engine: &LayoutEngine,
        track: &TrackConfig,
        records: &[AnnotationRecord],
    ) -> Result<(String, ExportSummary)> {
        let classes = engine.classes();
        let Painted {
            layout,
            drawing,
            frame,
            sink,
            track_len,
        } = self.paint(
            engine,
            track,
            records,
            |h| self.frame(track, classes, h),
            |_| Box::new(SvgSink::new(&self.config.font_family, self.config.font_size)),
        )?;

        let mut svg = SvgBuilder::new(
            frame.width,
            frame.height,
            &self.config.background_color,
            &self.config.font_family,
            self.config.font_size,
        );
        svg.add_background();
        if let Some(comment) = &self.config.provenance_comment {
            svg.add_comment(comment);
        }
        if let Some(title) = &self.config.title {
            svg.add_title(title);
        }
        let mut track_elements = sink.into_svg_elements();
        let margin_labels = track_elements.split_off(track_len.min(track_elements.len()));
        let (x, y, width, height) = frame.data_area();
        svg.add_clip_rect(DATA_CLIP_ID, x, y, width, height);
        svg.extend_clipped(DATA_CLIP_ID, track_elements);
        svg.extend(margin_labels);
        if self.config.show_legend {
            svg.add_legend(classes, frame.legend_x, frame.data_y as u32);
        }
        if self.config.show_footer {
            svg.add_footer(&self.footer_text(track, layout.policy, layout.row_count));
        }

        let summary = self.summary(&layout, &drawing, &frame, records.len());
        Ok((svg.render(), summary))
    }

    /// Export to SVG format
    pub fn export_svg<P: AsRef<Path>>(
        &self,
        path: P,
        engine: &LayoutEngine,
        track: &TrackConfig,
        records: &[AnnotationRecord],
    ) -> Result<ExportSummary> {
        let (document, summary) = self.render_svg(engine, track, records)?;
        std::fs::write(&path, document)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        log::info!(
            "Wrote {}x{} SVG with {} rows to {}",
            summary.width,
            summary.height,
            summary.row_count,
            path.as_ref().display()
        );
        Ok(summary)
    }

    /// Export to PNG. Geometry only; labels are not rasterized.
    pub fn export_png<P: AsRef<Path>>(
        &self,
        path: P,
        engine: &LayoutEngine,
        track: &TrackConfig,
        records: &[AnnotationRecord],
    ) -> Result<ExportSummary> {
        let classes = engine.classes();
        let background = parse_hex_rgb(&self.config.background_color).unwrap_or(Color::WHITE);
        let Painted {
            layout,
            drawing,
            frame,
            sink,
            ..
        } = self.paint(
            engine,
            track,
            records,
            |h| self.frame(track, classes, h),
            |f| Box::new(RasterSink::new(f.width, f.height, background)),
        )?;

        let mut raster = sink.into_raster().context("Raster target expected")?;
        if self.config.show_legend {
            let row_h = (self.config.font_size + 6) as i32;
            for class in classes.iter() {
                let y = frame.data_y + 5 + class.row as i32 * row_h + (row_h - 10) / 2;
                raster.filled_rect(frame.legend_x as i32 + 8, y, 10, 10, class.color);
            }
        }

        raster
            .into_image()
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        let summary = self.summary(&layout, &drawing, &frame, records.len());
        log::info!(
            "Wrote {}x{} PNG with {} rows to {}",
            summary.width,
            summary.height,
            summary.row_count,
            path.as_ref().display()
        );
        Ok(summary)
    }
}

/// A sink that can be handed back to the exporter after drawing.
trait PaintTarget {
    fn as_sink(&mut self) -> &mut dyn PrimitiveSink;
    /// Commands recorded so far, for targets that keep them.
    fn len(&self) -> usize {
        0
    }
    fn set_clip(&mut self, _area: Option<(i32, i32, i32, i32)>) {}
    fn into_svg_elements(self: Box<Self>) -> Vec<String> {
        Vec::new()
    }
    fn into_raster(self: Box<Self>) -> Option<RasterSink> {
        None
    }
}

impl PaintTarget for SvgSink {
    fn as_sink(&mut self) -> &mut dyn PrimitiveSink {
        self
    }
    fn len(&self) -> usize {
        SvgSink::len(self)
    }
    fn into_svg_elements(self: Box<Self>) -> Vec<String> {
        (*self).into_elements()
    }
}

impl PaintTarget for RasterSink {
    fn as_sink(&mut self) -> &mut dyn PrimitiveSink {
        self
    }
    fn set_clip(&mut self, area: Option<(i32, i32, i32, i32)>) {
        RasterSink::set_clip(self, area);
    }
    fn into_raster(self: Box<Self>) -> Option<RasterSink> {
        Some(*self)
    }
}

// Parse a hex color like "#RRGGBB"
fn parse_hex_rgb(s: &str) -> Option<Color> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::rgb(r, g, b))
}

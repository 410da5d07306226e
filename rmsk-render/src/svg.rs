//! SVG output: a [`PrimitiveSink`] that turns draw commands into SVG
//! elements, and the document builder that wraps them.

use anyhow::Result;
use rmsk_core::{ClassColorTable, Color, DrawCommand, PrimitiveSink, TextAlign};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Collects draw commands as SVG element strings.
pub struct SvgSink {
    elements: Vec<String>,
    font_family: String,
    font_size: u32,
}

impl SvgSink {
    pub fn new(font_family: &str, font_size: u32) -> Self {
        Self {
            elements: Vec::new(),
            font_family: font_family.to_string(),
            font_size,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_elements(self) -> Vec<String> {
        self.elements
    }
}

impl PrimitiveSink for SvgSink {
    fn push(&mut self, command: DrawCommand) {
        let element = match command {
            DrawCommand::FilledRect { x, y, width, height, color } => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                x,
                y,
                width,
                height,
                color.to_hex()
            ),
            DrawCommand::Line { x1, y1, x2, y2, color } => format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
                x1,
                y1,
                x2,
                y2,
                color.to_hex()
            ),
            DrawCommand::Text { x, y, width, height, text, color, align } => {
                let (tx, anchor) = match align {
                    TextAlign::Left => (x, "start"),
                    TextAlign::Center => (x + width / 2, "middle"),
                    TextAlign::Right => (x + width, "end"),
                };
                format!(
                    r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" fill="{}" text-anchor="{}" dominant-baseline="middle">{}</text>"#,
                    tx,
                    y + height / 2,
                    self.font_family,
                    self.font_size,
                    color.to_hex(),
                    anchor,
                    escape_xml(&text)
                )
            }
            DrawCommand::Polygon { points, fill, outline } => {
                let mut pts = String::new();
                for (i, (px, py)) in points.iter().enumerate() {
                    if i > 0 {
                        pts.push(' ');
                    }
                    let _ = write!(pts, "{},{}", px, py);
                }
                format!(
                    r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="1"/>"#,
                    pts,
                    paint(fill),
                    paint(outline)
                )
            }
            DrawCommand::MapItem(item) => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="transparent" data-id="{}"><title>{}</title></rect>"#,
                item.x,
                item.y,
                item.width,
                item.height,
                item.id,
                escape_xml(&item.status)
            ),
        };
        self.elements.push(element);
    }
}

fn paint(color: Option<Color>) -> String {
    color.map(|c| c.to_hex()).unwrap_or_else(|| "none".to_string())
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// SVG document assembled from element strings.
pub struct SvgBuilder {
    width: u32,
    height: u32,
    background_color: String,
    font_family: String,
    font_size: u32,
    elements: Vec<String>,
    top_comments: Vec<String>,
}

impl SvgBuilder {
    pub fn new(width: u32, height: u32, background_color: &str, font_family: &str, font_size: u32) -> Self {
        Self {
            width,
            height,
            background_color: background_color.to_string(),
            font_family: font_family.to_string(),
            font_size,
            elements: Vec::new(),
            top_comments: Vec::new(),
        }
    }

    pub fn add_background(&mut self) {
        self.elements.push(format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            self.width, self.height, self.background_color
        ));
    }

    pub fn add_comment(&mut self, text: &str) {
        self.top_comments.push(text.to_string());
    }

    pub fn add_title(&mut self, title: &str) {
        let title_y = self.font_size + 10;
        self.elements.push(format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" text-anchor="middle" font-weight="bold">{}</text>"#,
            self.width / 2,
            title_y,
            self.font_family,
            self.font_size + 4,
            escape_xml(title)
        ));
    }

    /// Swatch and label for every repeat class, top-down in row order.
    pub fn add_legend(&mut self, classes: &ClassColorTable, x: u32, y: u32) {
        let row_h = self.font_size + 6;
        self.elements.push(format!(
            r#"<rect x="{}" y="{}" width="130" height="{}" fill="white" stroke="black" stroke-width="1" fill-opacity="0.9"/>"#,
            x,
            y,
            row_h * classes.len() as u32 + 10
        ));
        for class in classes.iter() {
            let cy = y + 5 + class.row as u32 * row_h;
            self.elements.push(format!(
                r#"<rect x="{}" y="{}" width="10" height="10" fill="{}"/>"#,
                x + 8,
                cy + (row_h - 10) / 2,
                class.color.to_hex()
            ));
            self.elements.push(format!(
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}px" dominant-baseline="middle">{}</text>"#,
                x + 24,
                cy + row_h / 2,
                self.font_family,
                self.font_size,
                escape_xml(class.label)
            ));
        }
    }

    pub fn add_footer(&mut self, text: &str) {
        self.elements.push(format!(
            r#"<text x="10" y="{}" font-family="{}" font-size="{}px" fill="gray">{}</text>"#,
            self.height.saturating_sub(6),
            self.font_family,
            self.font_size.saturating_sub(2),
            escape_xml(text)
        ));
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, elements: I) {
        self.elements.extend(elements);
    }

    /// Define a rectangular clip region for [`SvgBuilder::extend_clipped`].
    pub fn add_clip_rect(&mut self, id: &str, x: i32, y: i32, width: i32, height: i32) {
        self.elements.push(format!(
            r#"<defs><clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
            id,
            x,
            y,
            width.max(0),
            height.max(0)
        ));
    }

    /// Add `elements` inside a group clipped to region `clip_id`.
    pub fn extend_clipped<I: IntoIterator<Item = String>>(&mut self, clip_id: &str, elements: I) {
        self.elements.push(format!(r#"<g clip-path="url(#{})">"#, clip_id));
        self.elements.extend(elements.into_iter().map(|e| format!("  {}", e)));
        self.elements.push("</g>".to_string());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            r#"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"#,
            self.width, self.height, self.width, self.height
        );
        for c in &self.top_comments {
            for line in c.lines() {
                let _ = writeln!(out, "  <!-- {} -->", line.replace("--", "- -"));
            }
        }
        for element in &self.elements {
            let _ = writeln!(out, "  {}", element);
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

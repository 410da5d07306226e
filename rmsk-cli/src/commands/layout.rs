//! Layout command implementation - print the row assigned to each record

use anyhow::{Context, Result};
use rmsk_core::{AnnotationRecord, FixedWidthFont, Layout, LayoutEngine, TrackConfig};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use super::{load_records, name_filter, parse_window, track_config, VisibilityArg};
use crate::config::Config;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
pub enum ReportFormat {
    #[default]
    Tsv,
    Json,
}

#[derive(Debug, Serialize)]
pub struct LayoutReport {
    pub window: String,
    pub visibility: String,
    pub policy: String,
    pub row_count: usize,
    pub placements: Vec<PlacementRow>,
}

#[derive(Debug, Serialize)]
pub struct PlacementRow {
    pub id: u64,
    pub name: String,
    pub strand: char,
    pub level: usize,
    pub align_start: u64,
    pub align_end: u64,
    pub visual_start: i64,
    pub visual_end: i64,
}

impl LayoutReport {
    pub fn new(window: String, track: &TrackConfig, records: &[AnnotationRecord], layout: &Layout) -> Self {
        let placements = records
            .iter()
            .zip(layout.placements())
            .map(|(record, placement)| PlacementRow {
                id: record.id,
                name: record.name.clone(),
                strand: record.strand.into(),
                level: placement.level,
                align_start: record.align_start,
                align_end: record.align_end,
                visual_start: placement.visual.start,
                visual_end: placement.visual.end,
            })
            .collect();

        Self {
            window,
            visibility: track.visibility.to_string(),
            policy: layout.policy.to_string(),
            row_count: layout.row_count,
            placements,
        }
    }

    pub fn write_tsv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "# {} {} policy={} rows={}",
            self.window, self.visibility, self.policy, self.row_count
        )?;
        writeln!(out, "#id\tname\tstrand\tlevel\talign_start\talign_end\tvisual_start\tvisual_end")?;
        for p in &self.placements {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                p.id, p.name, p.strand, p.level, p.align_start, p.align_end, p.visual_start, p.visual_end
            )?;
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    input: PathBuf,
    window: String,
    visibility: Option<VisibilityArg>,
    filter: Option<String>,
    regex: bool,
    width: Option<u32>,
    pixels_per_base: Option<f64>,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    log::info!("Computing layout for {}", window);
    let window = parse_window(&window)?;
    let filter = name_filter(config, filter.as_deref(), regex)?;
    let track = track_config(config, &window, visibility, width, pixels_per_base)?;
    let records = load_records(&input, &filter, &window)?;

    let engine = LayoutEngine::new();
    let font = FixedWidthFont::default();
    let layout = engine
        .compute_layout(&records, &track, &font)
        .context("Failed to compute layout")?;
    log::info!(
        "Placed {} records on {} rows ({} layout)",
        layout.len(),
        layout.row_count,
        layout.policy
    );

    let report = LayoutReport::new(window.to_string(), &track, &records, &layout);
    let mut buffer = Vec::new();
    match format {
        ReportFormat::Tsv => report.write_tsv(&mut buffer)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut buffer, &report).context("Failed to serialize layout")?;
            buffer.push(b'\n');
        }
    }

    match output {
        Some(path) => {
            std::fs::write(&path, &buffer).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote layout to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&buffer)?;
            handle.flush()?;
        }
    }

    Ok(())
}

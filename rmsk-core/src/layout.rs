//! Row assignment for joined repeat records.
//!
//! In detail view records are placed by greedy coloring of the graph whose
//! edges join overlapping visual extents, widest alignments first. Coarser
//! views use one row per repeat class, a first-fit clustered pack, or a
//! single collapsed row.

use crate::class::ClassColorTable;
use crate::config::{TrackConfig, Visibility};
use crate::error::{RmskError, RmskResult};
use crate::extent::{visual_extent, Extent, GlyphContext};
use crate::font::TextMeasure;
use crate::types::{AnnotationRecord, RecordId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseStyle {
    /// Row = repeat class
    ClassRows,
    /// First-fit pack by alignment start
    Clustered,
    /// Everything on one row
    SingleRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPolicy {
    Detail,
    Coarse(CoarseStyle),
}

impl std::fmt::Display for LayoutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutPolicy::Detail => write!(f, "detail"),
            LayoutPolicy::Coarse(CoarseStyle::ClassRows) => write!(f, "class-rows"),
            LayoutPolicy::Coarse(CoarseStyle::Clustered) => write!(f, "clustered"),
            LayoutPolicy::Coarse(CoarseStyle::SingleRow) => write!(f, "single-row"),
        }
    }
}

/// Row and visual extent assigned to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: RecordId,
    pub level: usize,
    pub visual: Extent,
}

/// Result of a layout request, parallel to the input records.
#[derive(Debug, Clone)]
pub struct Layout {
    pub policy: LayoutPolicy,
    pub row_count: usize,
    placements: Vec<Placement>,
    by_id: HashMap<RecordId, usize>,
}

impl Layout {
    fn new(policy: LayoutPolicy, row_count: usize, placements: Vec<Placement>) -> Self {
        let by_id = placements.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        Self {
            policy,
            row_count,
            placements,
            by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements in input order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn get(&self, id: RecordId) -> Option<&Placement> {
        self.by_id.get(&id).map(|&i| &self.placements[i])
    }

    pub fn level_of(&self, id: RecordId) -> Option<usize> {
        self.get(id).map(|p| p.level)
    }

    /// Placements on a given row.
    pub fn row(&self, level: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.level == level)
    }
}

/// Undirected graph over record indices; an edge joins two records whose
/// extents overlap.
#[derive(Debug, Clone, Default)]
pub struct OverlapGraph {
    neighbors: Vec<Vec<usize>>,
}

impl OverlapGraph {
    pub fn build(extents: &[Extent], tolerance: i64) -> Self {
        let n = extents.len();
        let mut neighbors = vec![Vec::new(); n];
        for i in 0..n {
            for j in (i + 1)..n {
                if extents[i].overlaps(&extents[j], tolerance) {
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }
        Self { neighbors }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Color nodes pass by pass. Each pass walks the still-uncolored nodes
    /// in `priority` order and takes every node not adjacent to one already
    /// taken in this pass. Returns per-node colors and the number of passes.
    pub fn greedy_color(&self, priority: &[usize]) -> (Vec<usize>, usize) {
        let n = self.len();
        let mut colors = vec![0usize; n];
        let mut colored = vec![false; n];
        let mut available = vec![false; n];
        let mut remaining: Vec<usize> = priority.to_vec();
        let mut color = 0;

        while !remaining.is_empty() {
            for &node in &remaining {
                available[node] = true;
            }
            for &node in &remaining {
                if !available[node] {
                    continue;
                }
                colors[node] = color;
                colored[node] = true;
                available[node] = false;
                for &other in &self.neighbors[node] {
                    available[other] = false;
                }
            }
            remaining.retain(|&node| !colored[node]);
            color += 1;
        }

        (colors, color)
    }
}

/// Stateless apart from the class table; build one per process and share
/// it across requests.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    classes: ClassColorTable,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::with_classes(ClassColorTable::new())
    }

    pub fn with_classes(classes: ClassColorTable) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &ClassColorTable {
        &self.classes
    }

    /// Pick the layout policy for a request.
    pub fn select_policy(&self, record_count: usize, config: &TrackConfig) -> LayoutPolicy {
        if config.visibility == Visibility::Dense {
            return LayoutPolicy::Coarse(CoarseStyle::SingleRow);
        }
        if record_count > config.max_pack_items {
            log::warn!(
                "{} records exceed max_pack_items ({}), collapsing to a single row",
                record_count,
                config.max_pack_items
            );
            return LayoutPolicy::Coarse(CoarseStyle::SingleRow);
        }
        if config.is_detail_view() {
            LayoutPolicy::Detail
        } else if config.use_class_row_layout {
            LayoutPolicy::Coarse(CoarseStyle::ClassRows)
        } else {
            LayoutPolicy::Coarse(CoarseStyle::Clustered)
        }
    }

    /// Extent and glyph settings used under `policy`.
    pub fn glyph_context<'a>(
        &self,
        policy: LayoutPolicy,
        config: &'a TrackConfig,
        font: &'a dyn TextMeasure,
    ) -> GlyphContext<'a> {
        let ctx = GlyphContext::new(config.scale(), &config.glyph, font);
        match policy {
            LayoutPolicy::Detail => ctx
                .with_labels(config.labels_enabled())
                .with_arms(config.show_unaligned_arms),
            LayoutPolicy::Coarse(CoarseStyle::Clustered) => {
                ctx.with_labels(config.labels_enabled()).with_arms(false)
            }
            LayoutPolicy::Coarse(_) => ctx.with_labels(false).with_arms(false),
        }
    }

    /// Assign a row to every record.
    ///
    /// Fails on the first malformed record, a repeated record id or an
    /// invalid configuration.
    pub fn compute_layout(
        &self,
        records: &[AnnotationRecord],
        config: &TrackConfig,
        font: &dyn TextMeasure,
    ) -> RmskResult<Layout> {
        config.validate()?;
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            record.validate()?;
            if !seen.insert(record.id) {
                return Err(RmskError::malformed(record.id, "duplicate record id"));
            }
        }

        let policy = self.select_policy(records.len(), config);
        let ctx = self.glyph_context(policy, config, font);
        let extents: Vec<Extent> = records.iter().map(|r| visual_extent(r, &ctx)).collect();

        let (levels, row_count) = match policy {
            LayoutPolicy::Detail => self.detail_levels(records, &extents, config.overlap_tolerance),
            LayoutPolicy::Coarse(CoarseStyle::ClassRows) => self.class_row_levels(records),
            LayoutPolicy::Coarse(CoarseStyle::Clustered) => clustered_levels(records, &extents),
            LayoutPolicy::Coarse(CoarseStyle::SingleRow) => {
                (vec![0; records.len()], usize::from(!records.is_empty()))
            }
        };

        log::debug!(
            "{} layout: {} records on {} rows (window {}-{}, {:.4} px/bp)",
            policy,
            records.len(),
            row_count,
            config.window_start,
            config.window_end,
            ctx.scale.pixels_per_base
        );

        let placements = records
            .iter()
            .zip(levels)
            .zip(extents)
            .map(|((record, level), visual)| Placement {
                id: record.id,
                level,
                visual,
            })
            .collect();

        Ok(Layout::new(policy, row_count, placements))
    }

    fn detail_levels(
        &self,
        records: &[AnnotationRecord],
        extents: &[Extent],
        tolerance: i64,
    ) -> (Vec<usize>, usize) {
        let graph = OverlapGraph::build(extents, tolerance);
        log::trace!("overlap graph: {} nodes, {} edges", graph.len(), graph.edge_count());

        // Stable: equal widths keep input order.
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by_key(|&i| Reverse(records[i].align_width()));

        graph.greedy_color(&order)
    }

    fn class_row_levels(&self, records: &[AnnotationRecord]) -> (Vec<usize>, usize) {
        let levels = records.iter().map(|r| self.classes.row_of(&r.name)).collect();
        (levels, self.classes.len())
    }
}

/// First-fit pack: walk records by start (ties: longer first) and fill each
/// row left to right with records starting past the row's current end.
fn clustered_levels(records: &[AnnotationRecord], extents: &[Extent]) -> (Vec<usize>, usize) {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| (records[i].align_start, Reverse(records[i].align_end)));

    let mut levels = vec![0usize; records.len()];
    let mut placed = vec![false; records.len()];
    let mut level = 0;

    for (pos, &first) in order.iter().enumerate() {
        if placed[first] {
            continue;
        }
        levels[first] = level;
        placed[first] = true;
        let mut row_end = extents[first].end;

        for &next in &order[pos + 1..] {
            if !placed[next] && extents[next].start > row_end {
                levels[next] = level;
                placed[next] = true;
                row_end = extents[next].end;
            }
        }
        level += 1;
    }

    (levels, level)
}

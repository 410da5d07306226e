use crate::error::{RmskError, RmskResult};
use serde::{Deserialize, Serialize};

pub type GenomicPos = u64;
pub type RecordId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// Parse a strand column, accepting only `+` and `-`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Forward),
            '-' => Some(Strand::Reverse),
            _ => None,
        }
    }

    /// Chevron direction: +1 on the forward strand, -1 otherwise.
    pub fn direction(self) -> i32 {
        match self {
            Strand::Forward => 1,
            Strand::Reverse => -1,
        }
    }
}

impl From<Strand> for char {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

/// Whether a block of a joined record is part of the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Aligned,
    Unaligned,
}

/// One joined RepeatMasker annotation.
///
/// Block arrays are relative to `chrom_start`; a negative relative start
/// marks an unaligned block. The first and last blocks of a multi-block
/// record are the unaligned 5' and 3' arms of the consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: RecordId,
    pub chrom: String,
    pub chrom_start: GenomicPos,
    pub chrom_end: GenomicPos,
    /// `family#class/subclass`
    pub name: String,
    /// 0..=10000, where 10000 is the most diverged
    pub score: u32,
    pub strand: Strand,
    pub align_start: GenomicPos,
    pub align_end: GenomicPos,
    pub block_count: usize,
    pub block_sizes: Vec<i64>,
    pub block_rel_starts: Vec<i64>,
    pub description: String,
}

impl AnnotationRecord {
    /// A single-block record aligned over `[align_start, align_end)`.
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        strand: Strand,
        align_start: GenomicPos,
        align_end: GenomicPos,
    ) -> Self {
        Self {
            id,
            chrom: String::from("chr1"),
            chrom_start: align_start,
            chrom_end: align_end,
            name: name.into(),
            score: 0,
            strand,
            align_start,
            align_end,
            block_count: 1,
            block_sizes: vec![align_end as i64 - align_start as i64],
            block_rel_starts: vec![0],
            description: String::new(),
        }
    }

    pub fn with_chrom(mut self, chrom: impl Into<String>) -> Self {
        self.chrom = chrom.into();
        self
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the block arrays. `chrom_start`/`chrom_end` follow the arms.
    pub fn with_blocks(mut self, sizes: Vec<i64>, rel_starts: Vec<i64>) -> Self {
        self.block_count = sizes.len();
        self.block_sizes = sizes;
        self.block_rel_starts = rel_starts;
        self
    }

    /// Set chromosome span explicitly.
    pub fn with_chrom_span(mut self, chrom_start: GenomicPos, chrom_end: GenomicPos) -> Self {
        self.chrom_start = chrom_start;
        self.chrom_end = chrom_end;
        self
    }

    /// Build a joined record from its 5' arm, aligned blocks given as
    /// absolute `(start, size)` pairs, and 3' arm.
    pub fn joined(
        id: RecordId,
        name: impl Into<String>,
        strand: Strand,
        leading_arm: i64,
        aligned: &[(GenomicPos, i64)],
        trailing_arm: i64,
    ) -> Self {
        let align_start = aligned.first().map(|(s, _)| *s).unwrap_or(0);
        let align_end = aligned
            .iter()
            .map(|(s, len)| (*s as i64 + len) as GenomicPos)
            .max()
            .unwrap_or(align_start);
        let chrom_start = (align_start as i64 - leading_arm).max(0) as GenomicPos;
        let chrom_end = align_end + trailing_arm.max(0) as GenomicPos;

        let mut sizes = Vec::with_capacity(aligned.len() + 2);
        let mut rel_starts = Vec::with_capacity(aligned.len() + 2);
        sizes.push(leading_arm);
        rel_starts.push(-1);
        for (start, len) in aligned {
            sizes.push(*len);
            rel_starts.push(*start as i64 - chrom_start as i64);
        }
        sizes.push(trailing_arm);
        rel_starts.push(-1);

        Self::new(id, name, strand, align_start, align_end)
            .with_chrom_span(chrom_start, chrom_end)
            .with_blocks(sizes, rel_starts)
    }

    pub fn block_kind(&self, index: usize) -> BlockKind {
        match self.block_rel_starts.get(index) {
            Some(rel) if *rel >= 0 => BlockKind::Aligned,
            _ => BlockKind::Unaligned,
        }
    }

    pub fn is_aligned(&self, index: usize) -> bool {
        self.block_kind(index) == BlockKind::Aligned
    }

    /// Width of the aligned span, used to rank records during layout.
    pub fn align_width(&self) -> u64 {
        self.align_end.saturating_sub(self.align_start)
    }

    /// Length of the unaligned 5' arm, if the record has one.
    pub fn leading_arm(&self) -> Option<i64> {
        if self.block_count > 1 && !self.is_aligned(0) {
            self.block_sizes.first().copied()
        } else {
            None
        }
    }

    /// Length of the unaligned 3' arm, if the record has one.
    pub fn trailing_arm(&self) -> Option<i64> {
        let last = self.block_count.checked_sub(1)?;
        if self.block_count > 1 && !self.is_aligned(last) {
            self.block_sizes.get(last).copied()
        } else {
            None
        }
    }

    /// Genomic `[start, end)` of an aligned block.
    pub fn aligned_span(&self, index: usize) -> Option<(i64, i64)> {
        let rel = *self.block_rel_starts.get(index)?;
        let size = *self.block_sizes.get(index)?;
        if rel < 0 {
            return None;
        }
        let start = self.chrom_start as i64 + rel;
        Some((start, start + size))
    }

    /// Repeat family: the part of the name before `#`.
    pub fn family(&self) -> &str {
        self.name.split('#').next().unwrap_or(&self.name)
    }

    /// Check the structural invariants layout and rendering rely on.
    pub fn validate(&self) -> RmskResult<()> {
        let n = self.block_count;
        if n == 0 {
            return Err(RmskError::malformed(self.id, "blockCount is zero"));
        }
        if self.block_sizes.len() != n || self.block_rel_starts.len() != n {
            return Err(RmskError::malformed(
                self.id,
                format!(
                    "blockCount {} does not match {} sizes and {} relative starts",
                    n,
                    self.block_sizes.len(),
                    self.block_rel_starts.len()
                ),
            ));
        }
        if self.align_start > self.align_end {
            return Err(RmskError::malformed(
                self.id,
                format!("alignStart {} is past alignEnd {}", self.align_start, self.align_end),
            ));
        }
        if self.chrom_start > self.chrom_end {
            return Err(RmskError::malformed(
                self.id,
                format!("chromStart {} is past chromEnd {}", self.chrom_start, self.chrom_end),
            ));
        }

        if n == 1 {
            if !self.is_aligned(0) {
                return Err(RmskError::malformed(self.id, "single block must be aligned"));
            }
        } else {
            if self.is_aligned(0) || self.is_aligned(n - 1) {
                return Err(RmskError::malformed(
                    self.id,
                    "multi-block record must start and end with unaligned arms",
                ));
            }
            if n < 3 {
                return Err(RmskError::malformed(self.id, "multi-block record has no aligned block"));
            }
            if self.block_sizes[0] < 0 || self.block_sizes[n - 1] < 0 {
                return Err(RmskError::malformed(self.id, "unaligned arm has negative length"));
            }
            for i in 1..n - 1 {
                if !self.is_aligned(i) && (!self.is_aligned(i - 1) || !self.is_aligned(i + 1)) {
                    return Err(RmskError::malformed(
                        self.id,
                        format!("unaligned block {} is not flanked by aligned blocks", i),
                    ));
                }
            }
        }

        for i in 0..n {
            if self.is_aligned(i) && self.block_sizes[i] < 0 {
                return Err(RmskError::malformed(
                    self.id,
                    format!("aligned block {} has negative size", i),
                ));
            }
        }

        Ok(())
    }

    /// Check before drawing. Same rules as [`AnnotationRecord::validate`],
    /// reported as [`RmskError::InvalidRecord`].
    pub fn check_renderable(&self) -> RmskResult<()> {
        self.validate().map_err(|err| match err {
            RmskError::MalformedRecord { id, reason } => RmskError::InvalidRecord { id, reason },
            other => other,
        })
    }
}

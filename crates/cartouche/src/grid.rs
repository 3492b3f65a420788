//! Grid arrangement of panels into rows or columns.
//!
//! A [`GridSpec`] fixes either the number of rows or the number of columns.
//! Panels fill the lines in input order; each line is partitioned along its
//! major axis (width for rows, height for columns) proportionally to the
//! weights of the panels in it, while the cross axis is divided equally
//! between lines.
//!
//! ```text
//!  rows(2), weights [2, 1, 1, 1]
//!  ┌──────────────┬───────┐
//!  │      a       │   b   │   row 0 (top)
//!  ├──────────┬───┴───────┤
//!  │    c     │     d     │   row 1
//!  └──────────┴───────────┘
//! ```
//!
//! With [`Alignment`] matching the major axis, slot boundaries are shared by
//! every line instead (slot `k` takes the largest weight found in slot `k`).
//!
//! The cross axis always splits into as many bands as the spec has lines.
//! Lines left without panels stay empty and keep their band.

use std::fmt;

use log::debug;
use serde::Deserialize;

use cartouche_core::{geometry::Bounds, identifier::Id};

use crate::{canvas::Canvas, error::LayoutError, placement::Placement};

/// Which axis of the grid has a fixed number of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLines {
    /// `n` rows, filled left to right, top row first.
    Rows(usize),
    /// `n` columns, filled top to bottom, left column first.
    Columns(usize),
}

/// Cross-line alignment of panel edges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Each line is partitioned by its own weights.
    #[default]
    None,
    /// Vertical edges line up across rows.
    Vertical,
    /// Horizontal edges line up across columns.
    Horizontal,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// An ordered set of panels to lay out on a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    panels: Vec<Id>,
    lines: GridLines,
    relative_sizes: Option<Vec<f32>>,
    alignment: Alignment,
}

impl GridSpec {
    pub fn new(panels: impl IntoIterator<Item = Id>, lines: GridLines) -> Self {
        Self {
            panels: panels.into_iter().collect(),
            lines,
            relative_sizes: None,
            alignment: Alignment::default(),
        }
    }

    /// Lays `panels` out on `count` rows.
    pub fn rows(panels: impl IntoIterator<Item = Id>, count: usize) -> Self {
        Self::new(panels, GridLines::Rows(count))
    }

    /// Lays `panels` out on `count` columns.
    pub fn columns(panels: impl IntoIterator<Item = Id>, count: usize) -> Self {
        Self::new(panels, GridLines::Columns(count))
    }

    /// Sets one weight per panel. Uniform weights are used when unset.
    pub fn with_relative_sizes(mut self, sizes: Vec<f32>) -> Self {
        self.relative_sizes = Some(sizes);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn panels(&self) -> &[Id] {
        &self.panels
    }

    pub fn lines(&self) -> GridLines {
        self.lines
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Weight of every panel, defaulting to 1.
    pub fn relative_sizes(&self) -> Vec<f32> {
        self.relative_sizes
            .clone()
            .unwrap_or_else(|| vec![1.0; self.panels.len()])
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if self.panels.is_empty() {
            return Err(LayoutError::invalid_grid("panels", "must not be empty"));
        }

        let (field, count) = match self.lines {
            GridLines::Rows(count) => ("rows", count),
            GridLines::Columns(count) => ("columns", count),
        };
        if count == 0 {
            return Err(LayoutError::invalid_grid(field, "must be at least 1"));
        }

        if let Some(sizes) = &self.relative_sizes {
            if sizes.len() != self.panels.len() {
                return Err(LayoutError::invalid_grid(
                    "relative_sizes",
                    format!(
                        "has {} weights for {} panels",
                        sizes.len(),
                        self.panels.len()
                    ),
                ));
            }
            if let Some((idx, weight)) = sizes
                .iter()
                .enumerate()
                .find(|(_, weight)| !(weight.is_finite() && **weight > 0.0))
            {
                return Err(LayoutError::invalid_grid(
                    "relative_sizes",
                    format!("weight {idx} must be positive, got {weight}"),
                ));
            }
        }

        Ok(())
    }
}

/// Computes one absolute placement per panel, in input order.
///
/// The placements tile the canvas bounds, except for the bands of lines that
/// receive no panels. `arrange` is pure: identical inputs give identical
/// outputs.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidGridSpec`] if the grid has no panels, zero
/// lines, a non-positive weight, or a weight count that differs from the
/// panel count.
pub fn arrange(spec: &GridSpec, canvas: &Canvas) -> Result<Vec<Placement>, LayoutError> {
    spec.validate()?;

    let weights = spec.relative_sizes();
    let (line_count, row_major) = match spec.lines {
        GridLines::Rows(count) => (count, true),
        GridLines::Columns(count) => (count, false),
    };
    let per_line = spec.panels.len().div_ceil(line_count);
    let lines: Vec<&[f32]> = weights.chunks(per_line).collect();

    let shared_slots = match (spec.alignment, row_major) {
        (Alignment::Vertical, true) | (Alignment::Horizontal, false) => {
            Some(slot_weights(&lines, per_line))
        }
        _ => None,
    };

    let extent = canvas.bounds();
    let (major_min, major_len, cross_len) = if row_major {
        (extent.min_x(), extent.width(), extent.height() / line_count as f32)
    } else {
        (extent.max_y(), extent.height(), extent.width() / line_count as f32)
    };

    let mut placements = Vec::with_capacity(spec.panels.len());
    for (line_idx, line) in lines.iter().copied().enumerate() {
        let line_weights = shared_slots.as_deref().unwrap_or(line);
        let offsets = cumulative_offsets(line_weights, major_len);

        for slot in 0..line.len() {
            let (start, end) = (offsets[slot], offsets[slot + 1]);
            let bounds = if row_major {
                // Rows are stacked from the top of the canvas
                let top = extent.max_y() - line_idx as f32 * cross_len;
                Bounds::from_extents(major_min + start, major_min + end, top - cross_len, top)
            } else {
                let left = extent.min_x() + line_idx as f32 * cross_len;
                Bounds::from_extents(left, left + cross_len, major_min - end, major_min - start)
            };
            placements.push(Placement::absolute(
                bounds.min_x(),
                bounds.max_x(),
                bounds.min_y(),
                bounds.max_y(),
            ));
        }
    }

    debug!(
        panels = spec.panels.len(),
        lines = line_count,
        alignment = spec.alignment.to_string();
        "Grid arranged"
    );

    Ok(placements)
}

/// Largest weight found in each slot across all lines.
fn slot_weights(lines: &[&[f32]], slots: usize) -> Vec<f32> {
    (0..slots)
        .map(|slot| {
            lines
                .iter()
                .filter_map(|line| line.get(slot).copied())
                .fold(0.0, f32::max)
        })
        .collect()
}

/// Boundaries `0 = o_0 <= ... <= o_n = length` proportional to `weights`.
///
/// The last boundary is pinned to `length` so the partition never leaves a
/// floating-point gap at the far edge.
fn cumulative_offsets(weights: &[f32], length: f32) -> Vec<f32> {
    let total: f32 = weights.iter().sum();
    let mut offsets = Vec::with_capacity(weights.len() + 1);
    let mut acc = 0.0;
    offsets.push(0.0);
    for (idx, weight) in weights.iter().enumerate() {
        acc += weight;
        if idx + 1 == weights.len() {
            offsets.push(length);
        } else {
            offsets.push(length * acc / total);
        }
    }
    offsets
}

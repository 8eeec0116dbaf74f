//! Window projection: fills the nine region grids from the data matrix.
//!
//! Header rows always show the first data rows, footer rows the last ones (but
//! never before the end of the middle window), and the middle rows follow the
//! vertical scroll offset. Columns work the same way with the left, center and
//! right groups. Every cell goes through [`crate::overlay::resolve`].

use serde::Serialize;

use crate::cell_ref::column_name;
use crate::layout::GridPartition;
use crate::overlay::{resolve, ResolveContext};
use crate::types::{Cell, ColumnBand, Range, Region, RowBand, ScrollPosition};

/// First data row/column of each group for one projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOrigin {
    pub middle_row: usize,
    pub footer_row: usize,
    pub center_column: usize,
    pub right_column: usize,
}

impl WindowOrigin {
    pub fn compute(
        partition: &GridPartition,
        total_rows: usize,
        total_columns: usize,
        scroll: ScrollPosition,
    ) -> Self {
        let header = partition.row_count(RowBand::Header);
        let middle = partition.row_count(RowBand::Middle);
        let footer = partition.row_count(RowBand::Footer);
        let left = partition.column_count(ColumnBand::Left);
        let center = partition.column_count(ColumnBand::Center);
        let right = partition.column_count(ColumnBand::Right);

        Self {
            middle_row: header.saturating_add(scroll.top),
            footer_row: total_rows.saturating_sub(footer).max(header + middle),
            center_column: left.saturating_add(scroll.left),
            right_column: total_columns.saturating_sub(right).max(left + center),
        }
    }

    /// First data row of a row group.
    pub fn row(&self, band: RowBand) -> usize {
        match band {
            RowBand::Header => 0,
            RowBand::Middle => self.middle_row,
            RowBand::Footer => self.footer_row,
        }
    }

    /// First data column of a column group.
    pub fn column(&self, band: ColumnBand) -> usize {
        match band {
            ColumnBand::Left => 0,
            ColumnBand::Center => self.center_column,
            ColumnBand::Right => self.right_column,
        }
    }
}

/// The resolved cells of one region, row-major.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegionGrid {
    rows: Vec<Vec<Cell>>,
}

impl RegionGrid {
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// Clear and refill in place, keeping allocations.
    fn fill(
        &mut self,
        ctx: &ResolveContext<'_>,
        ranges: &[Range],
        (first_row, row_count): (usize, usize),
        (first_col, col_count): (usize, usize),
    ) {
        self.rows.truncate(row_count);
        self.rows.resize_with(row_count, Vec::new);
        for (offset, row) in self.rows.iter_mut().enumerate() {
            let r = first_row.saturating_add(offset);
            row.clear();
            row.extend((0..col_count).map(|c| resolve(ctx, r, first_col.saturating_add(c), ranges)));
        }
    }
}

/// Regions of one row group, by column group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowRegions {
    pub left: RegionGrid,
    pub center: RegionGrid,
    pub right: RegionGrid,
}

impl RowRegions {
    fn get(&self, band: ColumnBand) -> &RegionGrid {
        match band {
            ColumnBand::Left => &self.left,
            ColumnBand::Center => &self.center,
            ColumnBand::Right => &self.right,
        }
    }

    fn get_mut(&mut self, band: ColumnBand) -> &mut RegionGrid {
        match band {
            ColumnBand::Left => &mut self.left,
            ColumnBand::Center => &mut self.center,
            ColumnBand::Right => &mut self.right,
        }
    }
}

/// Column names of the three column groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnNames {
    pub left: Vec<String>,
    pub center: Vec<String>,
    pub right: Vec<String>,
}

/// Row numbers (1-based) shown in the row-header column, per row group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowNumbers {
    pub header: Vec<usize>,
    pub middle: Vec<usize>,
    pub footer: Vec<usize>,
}

/// Output of a projection: nine region grids, column names and row numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub header: RowRegions,
    pub middle: RowRegions,
    pub footer: RowRegions,
    pub column_names: ColumnNames,
    /// Empty when row numbers are disabled.
    pub row_numbers: RowNumbers,
    pub origin: WindowOrigin,
}

impl Projection {
    pub fn region(&self, region: Region) -> &RegionGrid {
        self.row_regions(region.rows).get(region.columns)
    }

    fn row_regions(&self, band: RowBand) -> &RowRegions {
        match band {
            RowBand::Header => &self.header,
            RowBand::Middle => &self.middle,
            RowBand::Footer => &self.footer,
        }
    }

    fn row_regions_mut(&mut self, band: RowBand) -> &mut RowRegions {
        match band {
            RowBand::Header => &mut self.header,
            RowBand::Middle => &mut self.middle,
            RowBand::Footer => &mut self.footer,
        }
    }

    pub fn column_names(&self, band: ColumnBand) -> &[String] {
        match band {
            ColumnBand::Left => &self.column_names.left,
            ColumnBand::Center => &self.column_names.center,
            ColumnBand::Right => &self.column_names.right,
        }
    }

    pub fn row_numbers(&self, band: RowBand) -> &[usize] {
        match band {
            RowBand::Header => &self.row_numbers.header,
            RowBand::Middle => &self.row_numbers.middle,
            RowBand::Footer => &self.row_numbers.footer,
        }
    }

    fn row_numbers_mut(&mut self, band: RowBand) -> &mut Vec<usize> {
        match band {
            RowBand::Header => &mut self.row_numbers.header,
            RowBand::Middle => &mut self.row_numbers.middle,
            RowBand::Footer => &mut self.row_numbers.footer,
        }
    }

    /// Recompute every region for the scroll position in `ctx`.
    ///
    /// Recomputation is total: nothing from the previous projection survives
    /// except container allocations.
    pub fn project(&mut self, partition: &GridPartition, ctx: &ResolveContext<'_>, ranges: &[Range]) {
        let origin = WindowOrigin::compute(
            partition,
            ctx.data.row_count(),
            ctx.data.column_count(),
            ctx.scroll,
        );
        self.origin = origin;

        for rows in RowBand::ALL {
            let first_row = origin.row(rows);
            let row_count = partition.row_count(rows);

            let numbers = self.row_numbers_mut(rows);
            numbers.clear();
            if partition.has_row_numbers() {
                numbers.extend((0..row_count).map(|r| first_row.saturating_add(r) + 1));
            }

            for columns in ColumnBand::ALL {
                let first_col = origin.column(columns);
                let col_count = partition.column_count(columns);
                self.row_regions_mut(rows).get_mut(columns).fill(
                    ctx,
                    ranges,
                    (first_row, row_count),
                    (first_col, col_count),
                );
            }
        }

        for columns in ColumnBand::ALL {
            let first_col = origin.column(columns);
            let names = match columns {
                ColumnBand::Left => &mut self.column_names.left,
                ColumnBand::Center => &mut self.column_names.center,
                ColumnBand::Right => &mut self.column_names.right,
            };
            names.clear();
            names.extend(
                (0..partition.column_count(columns)).map(|c| column_name(first_col.saturating_add(c))),
            );
        }

        log::trace!(
            "projected window at rows {}..{} cols {}..{}",
            origin.middle_row,
            origin.footer_row,
            origin.center_column,
            origin.right_column
        );
    }

    /// Total cells across all nine regions.
    pub fn cell_count(&self) -> usize {
        Region::all().map(|r| self.region(r).cell_count()).sum()
    }
}

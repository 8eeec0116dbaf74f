//! Column and row groups of the grid.
//!
//! The grid is split into three column groups (left fixed, center scrollable,
//! right fixed) and three row groups (header, middle scrollable, footer). Each
//! group is a list of descriptors carrying the CSS size declarations the
//! rendering layer applies to its columns/rows.

use serde::Serialize;

use crate::types::{
    ColumnBand, RowBand, SizeSpec, TableConfig, DEFAULT_CENTER_COLUMNS, DEFAULT_FOOTER_ROWS,
    DEFAULT_HEADER_ROWS, DEFAULT_LEFT_COLUMNS, DEFAULT_MIDDLE_ROWS, DEFAULT_RIGHT_COLUMNS,
};

/// CSS class of the row-number column.
pub const ROW_NUMBER_CLASS: &str = "row-number";

/// A rendered column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// `width:X;max-width:X`, or empty when no width is configured.
    pub style: String,
}

/// A rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDescriptor {
    /// Position of the row within its group.
    pub index: usize,
    /// `height:X;max-height:X`, or empty when no height is configured.
    pub height: String,
}

/// The row-header column carrying row numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowHeaderColumn {
    pub clazz: String,
}

/// Configuration of one column group.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup {
    pub count: usize,
    pub widths: Option<SizeSpec>,
}

impl ColumnGroup {
    pub fn descriptors(&self) -> Vec<ColumnDescriptor> {
        (0..self.count)
            .map(|i| ColumnDescriptor {
                style: size_decl("width", self.widths.as_ref(), i),
            })
            .collect()
    }
}

/// Configuration of one row group.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub count: usize,
    pub heights: Option<SizeSpec>,
}

impl RowGroup {
    pub fn descriptors(&self) -> Vec<RowDescriptor> {
        (0..self.count)
            .map(|index| RowDescriptor {
                index,
                height: size_decl("height", self.heights.as_ref(), index),
            })
            .collect()
    }
}

/// `attr:X;max-attr:X` for the member at `index`.
fn size_decl(attr: &str, spec: Option<&SizeSpec>, index: usize) -> String {
    match spec.and_then(|s| s.at(index)) {
        Some(length) => format!("{attr}:{length};max-{attr}:{length}"),
        None => String::new(),
    }
}

/// The partition of the grid into column and row groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPartition {
    left: Vec<ColumnDescriptor>,
    center: Vec<ColumnDescriptor>,
    right: Vec<ColumnDescriptor>,
    header: Vec<RowDescriptor>,
    middle: Vec<RowDescriptor>,
    footer: Vec<RowDescriptor>,
    row_header_columns: Vec<RowHeaderColumn>,
    show_column_names: bool,
    show_filter: bool,
}

impl GridPartition {
    /// Build the partition from configuration, applying defaults for missing
    /// counts. A hidden header or footer yields an empty row group.
    pub fn from_config(config: &TableConfig) -> Self {
        let column_group = |count: Option<usize>, default: usize, widths: &Option<SizeSpec>| {
            ColumnGroup {
                count: count.unwrap_or(default),
                widths: widths.clone(),
            }
            .descriptors()
        };
        let row_group =
            |shown: bool, count: Option<usize>, default: usize, heights: &Option<SizeSpec>| {
                if !shown {
                    return Vec::new();
                }
                RowGroup {
                    count: count.unwrap_or(default),
                    heights: heights.clone(),
                }
                .descriptors()
            };

        let row_header_columns = if config.show_row_numbers() {
            vec![RowHeaderColumn {
                clazz: ROW_NUMBER_CLASS.to_string(),
            }]
        } else {
            Vec::new()
        };

        Self {
            left: column_group(
                config.left_column_number,
                DEFAULT_LEFT_COLUMNS,
                &config.left_column_widths,
            ),
            center: column_group(
                config.center_column_number,
                DEFAULT_CENTER_COLUMNS,
                &config.center_column_widths,
            ),
            right: column_group(
                config.right_column_number,
                DEFAULT_RIGHT_COLUMNS,
                &config.right_column_widths,
            ),
            header: row_group(
                config.show_header(),
                config.header_row_number,
                DEFAULT_HEADER_ROWS,
                &config.header_row_heights,
            ),
            middle: row_group(
                true,
                config.row_number,
                DEFAULT_MIDDLE_ROWS,
                &config.row_heights,
            ),
            footer: row_group(
                config.show_footer(),
                config.footer_row_number,
                DEFAULT_FOOTER_ROWS,
                &config.footer_row_heights,
            ),
            row_header_columns,
            show_column_names: config.show_column_names(),
            show_filter: config.show_filter(),
        }
    }

    pub fn columns(&self, band: ColumnBand) -> &[ColumnDescriptor] {
        match band {
            ColumnBand::Left => &self.left,
            ColumnBand::Center => &self.center,
            ColumnBand::Right => &self.right,
        }
    }

    pub fn rows(&self, band: RowBand) -> &[RowDescriptor] {
        match band {
            RowBand::Header => &self.header,
            RowBand::Middle => &self.middle,
            RowBand::Footer => &self.footer,
        }
    }

    pub fn column_count(&self, band: ColumnBand) -> usize {
        self.columns(band).len()
    }

    pub fn row_count(&self, band: RowBand) -> usize {
        self.rows(band).len()
    }

    /// Row-header columns; at most one, the row-number column.
    pub fn row_header_columns(&self) -> &[RowHeaderColumn] {
        &self.row_header_columns
    }

    pub fn has_row_numbers(&self) -> bool {
        !self.row_header_columns.is_empty()
    }

    pub fn show_column_names(&self) -> bool {
        self.show_column_names
    }

    pub fn show_filter(&self) -> bool {
        self.show_filter
    }

    /// Header + footer rows, which never scroll.
    pub fn fixed_rows(&self) -> usize {
        self.header.len() + self.footer.len()
    }

    /// Left + right columns, which never scroll.
    pub fn fixed_columns(&self) -> usize {
        self.left.len() + self.right.len()
    }
}

impl Default for GridPartition {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts() {
        let p = GridPartition::default();
        assert_eq!(p.column_count(ColumnBand::Left), 1);
        assert_eq!(p.column_count(ColumnBand::Center), 10);
        assert_eq!(p.column_count(ColumnBand::Right), 1);
        assert_eq!(p.row_count(RowBand::Header), 1);
        assert_eq!(p.row_count(RowBand::Middle), 10);
        assert_eq!(p.row_count(RowBand::Footer), 1);
        assert!(p.has_row_numbers());
        assert_eq!(p.row_header_columns()[0].clazz, "row-number");
        assert_eq!(p.fixed_rows(), 2);
        assert_eq!(p.fixed_columns(), 2);
    }

    #[test]
    fn test_hidden_header_and_footer_are_empty() {
        let config = TableConfig {
            show_header: Some(false),
            show_footer: Some(false),
            header_row_number: Some(3),
            ..TableConfig::default()
        };
        let p = GridPartition::from_config(&config);
        assert!(p.rows(RowBand::Header).is_empty());
        assert!(p.rows(RowBand::Footer).is_empty());
        assert_eq!(p.row_count(RowBand::Middle), 10);
    }

    #[test]
    fn test_width_list_repeats_last_entry() {
        let config = TableConfig {
            center_column_number: Some(4),
            center_column_widths: Some(SizeSpec::from(vec!["50px", "80px"])),
            ..TableConfig::default()
        };
        let p = GridPartition::from_config(&config);
        let styles: Vec<_> = p
            .columns(ColumnBand::Center)
            .iter()
            .map(|c| c.style.as_str())
            .collect();
        assert_eq!(
            styles,
            [
                "width:50px;max-width:50px",
                "width:80px;max-width:80px",
                "width:80px;max-width:80px",
                "width:80px;max-width:80px",
            ]
        );
        assert_eq!(p.columns(ColumnBand::Left)[0].style, "");
    }

    #[test]
    fn test_single_height_applies_to_every_row() {
        let config = TableConfig {
            row_number: Some(3),
            row_heights: Some(SizeSpec::from(24.0)),
            ..TableConfig::default()
        };
        let p = GridPartition::from_config(&config);
        let rows = p.rows(RowBand::Middle);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].index, 2);
        assert_eq!(rows[2].height, "height:24;max-height:24");
    }

    #[test]
    fn test_row_numbers_disabled() {
        let config = TableConfig {
            show_row_numbers: Some(false),
            ..TableConfig::default()
        };
        assert!(!GridPartition::from_config(&config).has_row_numbers());
    }

    #[test]
    fn test_zero_counts() {
        let config = TableConfig {
            left_column_number: Some(0),
            right_column_number: Some(0),
            row_number: Some(0),
            ..TableConfig::default()
        };
        let p = GridPartition::from_config(&config);
        assert_eq!(p.fixed_columns(), 0);
        assert_eq!(p.row_count(RowBand::Middle), 0);
    }
}

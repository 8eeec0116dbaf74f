use serde::{Deserialize, Serialize};

/// Row group of the grid, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowBand {
    Header,
    Middle,
    Footer,
}

impl RowBand {
    pub const ALL: [RowBand; 3] = [Self::Header, Self::Middle, Self::Footer];
}

/// Column group of the grid, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnBand {
    Left,
    Center,
    Right,
}

impl ColumnBand {
    pub const ALL: [ColumnBand; 3] = [Self::Left, Self::Center, Self::Right];
}

/// One of the nine row-band × column-band rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub rows: RowBand,
    pub columns: ColumnBand,
}

impl Region {
    pub const fn new(rows: RowBand, columns: ColumnBand) -> Self {
        Self { rows, columns }
    }

    /// All nine regions, row-major.
    pub fn all() -> impl Iterator<Item = Region> {
        RowBand::ALL
            .into_iter()
            .flat_map(|rows| ColumnBand::ALL.into_iter().map(move |columns| Self::new(rows, columns)))
    }
}

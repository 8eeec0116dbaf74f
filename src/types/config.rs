use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Default number of left fixed columns.
pub const DEFAULT_LEFT_COLUMNS: usize = 1;
/// Default number of center (scrollable) columns.
pub const DEFAULT_CENTER_COLUMNS: usize = 10;
/// Default number of right fixed columns.
pub const DEFAULT_RIGHT_COLUMNS: usize = 1;
/// Default number of header rows (when shown).
pub const DEFAULT_HEADER_ROWS: usize = 1;
/// Default number of middle (scrollable) rows.
pub const DEFAULT_MIDDLE_ROWS: usize = 10;
/// Default number of footer rows (when shown).
pub const DEFAULT_FOOTER_ROWS: usize = 1;
/// Default delay (ms) before a raw scroll event is processed.
pub const DEFAULT_SCROLL_DELAY_MS: f64 = 120.0;
/// Default delay (ms) used while the mouse wheel is active.
pub const DEFAULT_WHEEL_SCROLL_DELAY_MS: f64 = 500.0;
/// Delay (ms) for coalescing content and scrollbar refreshes.
pub const REFRESH_DELAY_MS: f64 = 10.0;

/// A CSS length as given in configuration: `120`, `"120px"`, `"10%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssLength {
    Number(f64),
    Text(String),
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Width or height of the members of a column/row group.
///
/// A single value applies to every member; a list applies positionally and
/// its last entry repeats past the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSpec {
    One(CssLength),
    Many(Vec<CssLength>),
}

impl SizeSpec {
    /// Size of the member at `index`, `None` for an empty list.
    pub fn at(&self, index: usize) -> Option<&CssLength> {
        match self {
            Self::One(length) => Some(length),
            Self::Many(lengths) => lengths.get(index).or_else(|| lengths.last()),
        }
    }
}

impl From<&str> for SizeSpec {
    fn from(s: &str) -> Self {
        Self::One(CssLength::Text(s.to_string()))
    }
}

impl From<f64> for SizeSpec {
    fn from(n: f64) -> Self {
        Self::One(CssLength::Number(n))
    }
}

impl From<Vec<&str>> for SizeSpec {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(|s| CssLength::Text(s.to_string())).collect())
    }
}

/// Table configuration.
///
/// Every field is optional; missing or unusable values fall back to the
/// documented defaults instead of failing. Field names follow the host
/// attribute names (`leftColumnNumber`, `rowHeights`, ...) in JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub show_column_names: Option<bool>,
    pub show_row_numbers: Option<bool>,
    pub show_header: Option<bool>,
    /// Reserved; stored but has no effect.
    pub show_filter: Option<bool>,
    pub show_footer: Option<bool>,

    #[serde(deserialize_with = "lenient_count")]
    pub left_column_number: Option<usize>,
    pub left_column_widths: Option<SizeSpec>,
    #[serde(deserialize_with = "lenient_count")]
    pub center_column_number: Option<usize>,
    pub center_column_widths: Option<SizeSpec>,
    #[serde(deserialize_with = "lenient_count")]
    pub right_column_number: Option<usize>,
    pub right_column_widths: Option<SizeSpec>,

    #[serde(deserialize_with = "lenient_count")]
    pub header_row_number: Option<usize>,
    pub header_row_heights: Option<SizeSpec>,
    #[serde(deserialize_with = "lenient_count")]
    pub row_number: Option<usize>,
    pub row_heights: Option<SizeSpec>,
    #[serde(deserialize_with = "lenient_count")]
    pub footer_row_number: Option<usize>,
    pub footer_row_heights: Option<SizeSpec>,

    #[serde(deserialize_with = "lenient_count")]
    pub scroll_top_position: Option<usize>,
    #[serde(deserialize_with = "lenient_count")]
    pub scroll_left_position: Option<usize>,

    #[serde(deserialize_with = "lenient_delay")]
    pub scroll_delay: Option<f64>,
    #[serde(deserialize_with = "lenient_delay")]
    pub wheel_scroll_delay: Option<f64>,
    pub vertical_scrollbar_auto_resize: Option<bool>,
}

impl TableConfig {
    /// Parse a JSON configuration object.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn show_column_names(&self) -> bool {
        self.show_column_names.unwrap_or(true)
    }

    pub fn show_row_numbers(&self) -> bool {
        self.show_row_numbers.unwrap_or(true)
    }

    pub fn show_header(&self) -> bool {
        self.show_header.unwrap_or(true)
    }

    pub fn show_filter(&self) -> bool {
        self.show_filter.unwrap_or(false)
    }

    pub fn show_footer(&self) -> bool {
        self.show_footer.unwrap_or(true)
    }

    pub fn scroll_delay_ms(&self) -> f64 {
        self.scroll_delay.unwrap_or(DEFAULT_SCROLL_DELAY_MS)
    }

    pub fn wheel_scroll_delay_ms(&self) -> f64 {
        self.wheel_scroll_delay
            .unwrap_or(DEFAULT_WHEEL_SCROLL_DELAY_MS)
    }

    pub fn vertical_scrollbar_auto_resize(&self) -> bool {
        self.vertical_scrollbar_auto_resize.unwrap_or(true)
    }
}

/// Accept any JSON value for a count: finite numbers are rounded and clamped
/// at zero, anything else reads as unset.
fn lenient_count<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<usize>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_f64)
        .and_then(crate::layout::round_to_index))
}

/// Accept any JSON value for a delay: finite non-negative numbers are kept,
/// anything else reads as unset.
fn lenient_delay<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_f64)
        .filter(|d| d.is_finite())
        .map(|d| d.max(0.0)))
}

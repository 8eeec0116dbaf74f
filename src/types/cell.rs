use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::{Callback, CellValue, EventHandlerFn, EventName};

/// Marker rendered for a cell with no value.
pub const BLANK_CELL: &str = "&nbsp;";

/// A cell event handler as resolved from the enclosing ranges.
pub type EventHandler = Callback<EventHandlerFn>;

/// Generated HTML content for a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "html", rename_all = "camelCase")]
pub enum CellHtml {
    /// Must be sanitized by the rendering layer before injection.
    Plain(String),
    /// Produced by a trusted HTML function; injected as-is.
    Trusted(String),
}

impl CellHtml {
    /// The HTML text, regardless of trust.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(s) | Self::Trusted(s) => s,
        }
    }

    /// True when the content bypasses sanitization.
    pub fn is_trusted(&self) -> bool {
        matches!(self, Self::Trusted(_))
    }
}

/// A rendered cell, derived from the data matrix and the registered ranges.
///
/// Recomputed on every projection; never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Row in data space.
    pub row: usize,
    /// Column in data space.
    pub col: usize,
    /// Raw value read through the data accessor (`None` = undefined).
    pub data: Option<CellValue>,
    /// Formatted value.
    pub value: CellValue,
    /// Additional CSS class(es).
    pub clazz: String,
    /// CSS declarations.
    pub style: String,
    /// Event handlers, by event name. Serialized as the list of bound names.
    #[serde(serialize_with = "serialize_event_names")]
    pub event_callbacks: BTreeMap<EventName, EventHandler>,
    /// Registration indices of every range containing the cell.
    pub enclosing_ranges: Vec<usize>,
    /// Template URL replacing the generated content.
    #[serde(rename = "customCellTemplate")]
    pub custom_cell_template: Option<String>,
    /// Generated content; `None` when a template is in effect.
    #[serde(rename = "customHTML")]
    pub custom_html: Option<CellHtml>,
}

impl Cell {
    /// Handler bound to `event`, if any.
    pub fn handler(&self, event: EventName) -> Option<&EventHandler> {
        self.event_callbacks.get(&event)
    }
}

fn serialize_event_names<S: Serializer>(
    callbacks: &BTreeMap<EventName, EventHandler>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(callbacks.keys())
}

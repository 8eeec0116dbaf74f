//! wingrid - windowed data grid for the web
//!
//! Renders a small, fixed set of cells over an arbitrarily large data matrix:
//! - Nine regions (header/middle/footer rows × left/center/right columns)
//! - Range overlays for formatting, styles, classes, HTML, templates and events
//! - Virtual scrollbars mapped to logical row/column offsets
//! - Debounced scroll processing and refresh scheduling
//!
//! # Usage (Rust)
//!
//! ```
//! use std::rc::Rc;
//! use wingrid::{CellValue, ColumnBand, DataMatrix, Range, Region, RowBand, Table, TableConfig};
//!
//! let data = DataMatrix::from_fn(200, 200, |r, c| CellValue::from(format!("{r}:{c}")));
//! let mut table = Table::builder(TableConfig::default(), Rc::new(data))
//!     .range(Range::new(0, 1, 0, 200).with_class("title"))
//!     .build();
//! table.set_scroll_top(10);
//! let middle = table.region(Region::new(RowBand::Middle, ColumnBand::Center));
//! assert_eq!(middle.row_count(), 10);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'wingrid';
//! await init();
//! const view = new GridView(config, rows, ranges, body, vScroll, hScroll, onScroll);
//! view.onContentUpdated(() => render(view.region('middle', 'center')));
//! ```

pub mod cell_ref;
pub mod csv;
pub mod error;
pub mod overlay;
pub mod projector;
pub mod schedule;
pub mod table;
pub mod types;

// Layout and browser boundary
pub mod layout;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{Result, WingridError};
pub use projector::{Projection, RegionGrid};
pub use table::{Table, TableBuilder, TickOutcome, WheelTarget};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;

/// Parse CSV bytes and return the data matrix as a `JsValue`.
///
/// # Errors
/// Returns an error if the matrix cannot be serialized.
#[wasm_bindgen(js_name = parseCsv)]
pub fn parse_csv_to_js(data: &[u8]) -> std::result::Result<JsValue, JsValue> {
    let matrix = csv::parse_delimited(data, csv::Delimiter::Comma);
    serde_wasm_bindgen::to_value(&matrix)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Spreadsheet-style name of a zero-based column index (`0` → `"A"`).
#[must_use]
#[wasm_bindgen(js_name = columnName)]
pub fn column_name(index: usize) -> String {
    cell_ref::column_name(index)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

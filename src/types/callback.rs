use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::{Cell, CellValue, DataMatrix, ScrollPosition};

/// Shared, reference-counted callback.
///
/// Two callbacks are equal only when they point at the same closure, which is
/// what lets resolved cells be compared for equality.
pub struct Callback<F: ?Sized>(Rc<F>);

impl<F: ?Sized> Callback<F> {
    /// Wrap an already type-erased closure.
    pub fn from_rc(f: Rc<F>) -> Self {
        Self(f)
    }
}

impl<F: ?Sized> Clone for Callback<F> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<F: ?Sized> PartialEq for Callback<F> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<F: ?Sized> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

impl<F: ?Sized> Deref for Callback<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.0
    }
}

/// `(raw, row, col) -> formatted value`
pub type FormatFn = dyn Fn(Option<&CellValue>, usize, usize) -> CellValue;

/// `(raw, row, col) -> CSS declarations`
pub type StyleFn = dyn Fn(Option<&CellValue>, usize, usize) -> String;

/// `(raw, row, col, formatted) -> HTML`
pub type HtmlFn = dyn Fn(Option<&CellValue>, usize, usize, &CellValue) -> String;

/// Resolves a cell template URL from the cell and its table.
pub type TemplateFn = dyn Fn(&TemplateArgs<'_>) -> Option<String>;

/// Handles a DOM-level event raised on a rendered cell.
pub type EventHandlerFn = dyn Fn(&CellEvent<'_>, &Cell);

/// Reads one value from the data matrix: `(data, row, col)`.
pub type DataValueFn = dyn Fn(&DataMatrix, usize, usize) -> Option<CellValue>;

/// Arguments handed to a template resolver.
pub struct TemplateArgs<'a> {
    pub raw: Option<&'a CellValue>,
    pub row: usize,
    pub col: usize,
    pub formatted: &'a CellValue,
    /// The table's data matrix.
    pub data: &'a DataMatrix,
    /// The table's scroll position at projection time.
    pub scroll: ScrollPosition,
}

/// An event forwarded to a cell handler.
///
/// `detail` carries the boundary's native event object, if any; handlers
/// downcast it to the type their boundary produces.
pub struct CellEvent<'a> {
    pub name: super::EventName,
    pub detail: Option<&'a (dyn std::any::Any + 'static)>,
}

impl<'a> CellEvent<'a> {
    /// An event without a native payload.
    pub fn new(name: super::EventName) -> Self {
        Self { name, detail: None }
    }

    /// An event carrying the boundary's native event object.
    pub fn with_detail(name: super::EventName, detail: &'a (dyn std::any::Any + 'static)) -> Self {
        Self {
            name,
            detail: Some(detail),
        }
    }
}

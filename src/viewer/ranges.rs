//! Conversion of JS range objects into [`Range`]s.
//!
//! A range object carries its bounds (`top`/`bottom`/`left`/`right`, or an A1
//! rectangle in `cells`), the optional `style`, `clazz` and
//! `customCellTemplate` values, the optional `formatFn`, `styleFn`,
//! `customHtmlFn` and `customTrustedHtmlFn` functions, and one function per
//! bound DOM event under the event's name (`click`, `dblclick`, ...).
//!
//! The table configuration may carry a `customDataValueFn(data, row, col)`
//! accessor, called with the host's own data array.

#[cfg(target_arch = "wasm32")]
use js_sys::{Function, Reflect};
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::layout::round_to_index;
#[cfg(target_arch = "wasm32")]
use crate::types::{CellValue, DataMatrix, EventName, Range};

#[cfg(target_arch = "wasm32")]
pub(crate) fn range_from_js(value: &JsValue) -> Result<Range, JsValue> {
    if !value.is_object() {
        return Err(JsValue::from_str("range must be an object"));
    }

    let mut range = match get(value, "cells").as_string() {
        Some(cells) => Range::from_a1(&cells)?,
        None => Range::new(
            index(value, "top"),
            index(value, "bottom"),
            index(value, "left"),
            index(value, "right"),
        ),
    };

    range.style = get(value, "style").as_string();
    range.clazz = get(value, "clazz").as_string();

    if let Some(f) = function(value, "formatFn") {
        range = range.with_format(move |raw, row, col| {
            let result = f.call3(&JsValue::NULL, &to_js(raw), &js_index(row), &js_index(col));
            result.map_or(CellValue::Null, |v| from_js(&v))
        });
    }
    if let Some(f) = function(value, "styleFn") {
        range = range.with_style_fn(move |raw, row, col| {
            f.call3(&JsValue::NULL, &to_js(raw), &js_index(row), &js_index(col))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default()
        });
    }
    if let Some(f) = function(value, "customHtmlFn") {
        range = range.with_html(move |raw, row, col, formatted| {
            call_html(&f, raw, row, col, formatted)
        });
    }
    if let Some(f) = function(value, "customTrustedHtmlFn") {
        range = range.with_trusted_html(move |raw, row, col, formatted| {
            call_html(&f, raw, row, col, formatted)
        });
    }

    let template = get(value, "customCellTemplate");
    if let Some(url) = template.as_string() {
        range = range.with_template_url(url);
    } else if let Some(f) = template.dyn_ref::<Function>().cloned() {
        range = range.with_template_fn(move |args| {
            let call_args = js_sys::Array::of5(
                &to_js(args.raw),
                &js_index(args.row),
                &js_index(args.col),
                &to_js(Some(args.formatted)),
                &serde_wasm_bindgen::to_value(&args.scroll).unwrap_or(JsValue::UNDEFINED),
            );
            f.apply(&JsValue::NULL, &call_args)
                .ok()
                .and_then(|v| v.as_string())
        });
    }

    for event in EventName::ALL {
        if let Some(f) = function(value, event.as_str()) {
            range = range.on(event, move |cell_event, cell| {
                let native = cell_event
                    .detail
                    .and_then(|d| d.downcast_ref::<JsValue>())
                    .cloned()
                    .unwrap_or(JsValue::UNDEFINED);
                let cell = serde_wasm_bindgen::to_value(cell).unwrap_or(JsValue::UNDEFINED);
                if let Err(err) = f.call2(&JsValue::NULL, &native, &cell) {
                    log::warn!("{} handler threw: {err:?}", cell_event.name.as_str());
                }
            });
        }
    }

    Ok(range)
}

/// The host's current data array, as handed to `customDataValueFn`.
#[cfg(target_arch = "wasm32")]
pub(crate) type JsData = Rc<RefCell<JsValue>>;

/// Wrap the config's `customDataValueFn` as a data accessor. The accessor
/// ignores the deserialized matrix and passes the host array instead;
/// `undefined` and `null` results read as missing cells.
#[cfg(target_arch = "wasm32")]
pub(crate) fn data_value_fn_from_js(
    config: &JsValue,
    data: &JsData,
) -> Option<impl Fn(&DataMatrix, usize, usize) -> Option<CellValue> + 'static> {
    let f = function(config, "customDataValueFn")?;
    let data = Rc::clone(data);
    Some(move |_: &DataMatrix, row: usize, col: usize| {
        let value = f
            .call3(&JsValue::NULL, &data.borrow(), &js_index(row), &js_index(col))
            .ok()?;
        if value.is_undefined() || value.is_null() {
            None
        } else {
            Some(from_js(&value))
        }
    })
}

#[cfg(target_arch = "wasm32")]
fn get(object: &JsValue, key: &str) -> JsValue {
    Reflect::get(object, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

#[cfg(target_arch = "wasm32")]
fn function(object: &JsValue, key: &str) -> Option<Function> {
    get(object, key).dyn_into::<Function>().ok()
}

#[cfg(target_arch = "wasm32")]
fn index(object: &JsValue, key: &str) -> usize {
    get(object, key)
        .as_f64()
        .and_then(round_to_index)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
#[allow(clippy::cast_precision_loss)]
fn js_index(i: usize) -> JsValue {
    JsValue::from_f64(i as f64)
}

#[cfg(target_arch = "wasm32")]
fn to_js(value: Option<&CellValue>) -> JsValue {
    value
        .and_then(|v| serde_wasm_bindgen::to_value(v).ok())
        .unwrap_or(JsValue::UNDEFINED)
}

#[cfg(target_arch = "wasm32")]
fn from_js(value: &JsValue) -> CellValue {
    serde_wasm_bindgen::from_value(value.clone()).unwrap_or_else(|_| {
        value
            .as_string()
            .map_or(CellValue::Null, CellValue::Text)
    })
}

#[cfg(target_arch = "wasm32")]
fn call_html(
    f: &Function,
    raw: Option<&CellValue>,
    row: usize,
    col: usize,
    formatted: &CellValue,
) -> String {
    let args = js_sys::Array::of4(
        &to_js(raw),
        &js_index(row),
        &js_index(col),
        &to_js(Some(formatted)),
    );
    f.apply(&JsValue::NULL, &args)
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

#[cfg(all(test, target_arch = "wasm32"))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn config_with_accessor() -> JsValue {
        let config = js_sys::Object::new();
        let accessor = Function::new_with_args(
            "data, row, col",
            "return row === 0 ? undefined : data[row - 1][col] + '!';",
        );
        Reflect::set(&config, &JsValue::from_str("customDataValueFn"), &accessor).unwrap();
        config.into()
    }

    fn js_rows(rows: &[&[&str]]) -> JsValue {
        let outer = js_sys::Array::new();
        for row in rows {
            let inner = js_sys::Array::new();
            for cell in *row {
                inner.push(&JsValue::from_str(cell));
            }
            outer.push(&inner);
        }
        outer.into()
    }

    #[wasm_bindgen_test]
    fn test_custom_accessor_reads_host_array() {
        let data: JsData = Rc::new(RefCell::new(js_rows(&[&["a", "b"]])));
        let accessor = data_value_fn_from_js(&config_with_accessor(), &data).unwrap();
        let matrix = DataMatrix::default();
        assert_eq!(accessor(&matrix, 1, 1), Some(CellValue::from("b!")));
        assert_eq!(accessor(&matrix, 0, 0), None);

        *data.borrow_mut() = js_rows(&[&["c"]]);
        assert_eq!(accessor(&matrix, 1, 0), Some(CellValue::from("c!")));
    }

    #[wasm_bindgen_test]
    fn test_config_without_accessor() {
        let data: JsData = Rc::new(RefCell::new(JsValue::UNDEFINED));
        assert!(data_value_fn_from_js(&js_sys::Object::new().into(), &data).is_none());
        assert!(data_value_fn_from_js(&JsValue::UNDEFINED, &data).is_none());
    }
}

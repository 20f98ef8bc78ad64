//! WASM bindings for the invoice widget.
//!
//! The page owns rendering; this crate owns the state. The host glue forwards
//! record and connection events to an [`InvoiceWidget`] and re-renders from
//! its state snapshot.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Promise, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use rinv_core::normalize::rules::normalize_url as normalize_website;
use rinv_core::{
    ConnectionMessage, Formatter, RawRow, RinvError, Scalar, StartupFlags, TableProbe,
    UpdateController,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Format a money cell (`1234.5` -> `"$1,234.50"`).
#[wasm_bindgen(js_name = formatCurrency)]
pub fn format_currency(value: JsValue) -> String {
    Formatter::new().currency(&Scalar::amount_from_field(js_field(value).as_ref()))
}

/// Format a date cell given as unix seconds or an ISO string.
#[wasm_bindgen(js_name = formatDate)]
pub fn format_date(value: JsValue) -> String {
    Formatter::new().date(&Scalar::from_field(js_field(value).as_ref()))
}

/// Ensure a website carries a scheme.
#[wasm_bindgen(js_name = normalizeUrl)]
pub fn normalize_url(url: Option<String>) -> Option<String> {
    normalize_website(url.as_deref())
}

/// The invoice widget: one update controller shared with in-flight probes.
#[wasm_bindgen]
pub struct InvoiceWidget {
    inner: Rc<RefCell<UpdateController>>,
}

#[wasm_bindgen]
impl InvoiceWidget {
    /// Create the widget, applying `?demo` / `?labels` from the page query.
    #[wasm_bindgen(constructor)]
    pub fn new(search: Option<String>) -> Self {
        let flags = search
            .as_deref()
            .map(StartupFlags::from_query)
            .unwrap_or_default();
        let widget = Self {
            inner: Rc::new(RefCell::new(UpdateController::init(flags))),
        };
        widget.mirror_last_row();
        widget
    }

    /// Handle a record-changed event. `null` or `undefined` means no row is
    /// selected. Returns the new state snapshot.
    #[wasm_bindgen(js_name = onRecord)]
    pub fn on_record(&self, record: JsValue) -> Result<JsValue, JsValue> {
        {
            let mut controller = self.inner.borrow_mut();
            if record.is_null() || record.is_undefined() {
                controller.on_record_changed(None);
            } else {
                match serde_wasm_bindgen::from_value::<serde_json::Value>(record) {
                    Ok(value) => {
                        let row = RawRow::from_value(value);
                        controller.on_record_changed(row.as_ref());
                    }
                    Err(e) => controller.fail(&e),
                }
            }
        }
        self.mirror_last_row();
        self.state()
    }

    /// Handle a connection message.
    ///
    /// When a have-rows probe is due and `fetch_selected_table` is given, it
    /// is called in the background and its result recorded. Returns whether
    /// a probe was due.
    #[wasm_bindgen(js_name = onMessage)]
    pub fn on_message(&self, msg: JsValue, fetch_selected_table: Option<Function>) -> bool {
        let message: ConnectionMessage = serde_wasm_bindgen::from_value(msg).unwrap_or_default();
        let start_probe = self.inner.borrow_mut().on_connection_message(&message);

        if let (true, Some(fetch)) = (start_probe, fetch_selected_table) {
            let inner = Rc::clone(&self.inner);
            spawn_local(async move {
                let result = JsTableProbe { fetch }.has_rows().await;
                if let Err(e) = &result {
                    web_sys::console::warn_1(&format!("Table probe failed: {}", e).into());
                }
                inner.borrow_mut().record_probe(result);
            });
        }
        start_probe
    }

    /// Full state snapshot (`phase`, `invoice`, `status`, connection flags).
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.borrow().state())
    }

    /// The invoice to render, or `null`.
    #[wasm_bindgen]
    pub fn invoice(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().state().invoice())
    }

    /// User-facing status text; empty while an invoice is shown.
    #[wasm_bindgen]
    pub fn status(&self) -> String {
        self.inner.borrow().state().status().to_string()
    }

    /// The last successfully normalized raw row, or `null`.
    #[wasm_bindgen(js_name = lastRow)]
    pub fn last_row(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().last_row())
    }

    /// Report an error raised by the page (e.g. while rendering).
    #[wasm_bindgen(js_name = reportError)]
    pub fn report_error(&self, message: String) {
        self.inner.borrow_mut().fail(&message);
    }
}

impl InvoiceWidget {
    /// Expose the last normalized row as `globalThis.invoice` for debugging.
    fn mirror_last_row(&self) {
        let Ok(row) = self.last_row() else {
            return;
        };
        if row.is_null() {
            return;
        }
        let _ = Reflect::set(&js_sys::global(), &JsValue::from_str("invoice"), &row);
    }
}

/// Calls the host's `fetchSelectedTable` and checks for at least one row.
struct JsTableProbe {
    fetch: Function,
}

impl TableProbe for JsTableProbe {
    async fn has_rows(&self) -> rinv_core::Result<bool> {
        let returned = self.fetch.call0(&JsValue::NULL).map_err(probe_error)?;
        let table = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(probe_error)?;
        Ok(table_has_rows(&table))
    }
}

/// Tables arrive column-oriented (`{id: [...], ...}`); plain row arrays are
/// accepted too.
fn table_has_rows(table: &JsValue) -> bool {
    if Array::is_array(table) {
        return Array::from(table).length() > 0;
    }
    if !table.is_object() {
        return false;
    }
    match Reflect::get(table, &JsValue::from_str("id")) {
        Ok(ids) if Array::is_array(&ids) => Array::from(&ids).length() > 0,
        _ => false,
    }
}

fn probe_error(err: JsValue) -> RinvError {
    RinvError::Probe(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

fn js_field(value: JsValue) -> Option<serde_json::Value> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    serde_wasm_bindgen::from_value(value).ok()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_format_currency() {
        assert_eq!(format_currency(JsValue::from_f64(1234.5)), "$1,234.50");
        assert_eq!(format_currency(JsValue::from_str("Taxes")), "Taxes");
    }

    #[wasm_bindgen_test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url(Some("example.com".to_string())).as_deref(),
            Some("https://example.com")
        );
        assert_eq!(normalize_url(None), None);
    }

    #[wasm_bindgen_test]
    fn test_demo_widget() {
        let widget = InvoiceWidget::new(Some("?demo".to_string()));
        assert_eq!(widget.status(), "");
        assert!(!widget.invoice().unwrap().is_null());
        assert!(!widget.last_row().unwrap().is_null());
    }

    #[wasm_bindgen_test]
    fn test_no_row_selected() {
        let widget = InvoiceWidget::new(None);
        assert_eq!(widget.status(), "waiting");

        widget.on_record(JsValue::NULL).unwrap();
        assert_eq!(widget.status(), "no row selected");
        assert!(widget.invoice().unwrap().is_null());
    }

    #[wasm_bindgen_test]
    fn test_report_error() {
        let widget = InvoiceWidget::new(Some("?demo".to_string()));
        widget.report_error("Error: render failed".to_string());
        assert_eq!(widget.status(), "render failed");
        assert!(widget.invoice().unwrap().is_null());
    }

    #[wasm_bindgen_test]
    fn test_message_without_table_starts_no_probe() {
        let widget = InvoiceWidget::new(None);
        assert!(!widget.on_message(JsValue::from_str("hello"), None));
    }

    #[wasm_bindgen_test]
    fn test_table_has_rows() {
        let ids = Array::of2(&JsValue::from_f64(1.0), &JsValue::from_f64(2.0));
        let table = js_sys::Object::new();
        Reflect::set(&table, &JsValue::from_str("id"), &ids).unwrap();
        assert!(table_has_rows(&table));
        assert!(!table_has_rows(&Array::new()));
        assert!(!table_has_rows(&JsValue::UNDEFINED));
    }
}

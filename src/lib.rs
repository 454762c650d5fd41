pub mod cli;
pub mod config;
pub mod description;
pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod layout;
pub mod measure;
pub mod status;

use wasm_bindgen::prelude::*;

use description::Description;
use error::SwimflowError;
use layout::{Layout, LayoutEngine};

/// Lay out a process description with the default configuration and any
/// overrides from its `layout` block.
pub fn layout_process(desc: &Description) -> Layout {
    LayoutEngine::default().layout_description(desc)
}

/// Parse a JSON description and return the layout as JSON.
pub fn layout_json(source: &str, pretty: bool) -> Result<String, SwimflowError> {
    let desc = Description::from_json(source)?;
    let layout = layout_process(&desc);
    let json = if pretty {
        serde_json::to_string_pretty(&layout)?
    } else {
        serde_json::to_string(&layout)?
    };
    Ok(json)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Lay out a JSON process description, returning the layout as JSON
#[wasm_bindgen(js_name = "layoutProcess")]
pub fn layout_process_json(source: &str) -> Result<String, String> {
    layout_json(source, false).map_err(|e| e.to_string())
}

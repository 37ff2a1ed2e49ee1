//! Serializers for converted assets.
//!
//! - `c` - GBDK C source and header
//! - `json` - a JSON dump of the whole asset
//! - `preview` - a PNG preview of the quantized image

mod c;
mod json;
mod preview;

pub use c::{data_name, render_header, render_source, write_c, ExportOptions};
pub use json::{render_json, write_json};
pub use preview::{render_preview, write_preview};

//! The core structures of `minify_lit_html`: the loader options and the
//! source map exchanged with the host.

mod error;
mod options;
mod source_map;

pub use error::OptionsError;
pub use options::*;
pub use source_map::RawSourceMap;

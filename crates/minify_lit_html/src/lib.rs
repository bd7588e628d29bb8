//! A loader which minifies the HTML of lit-html templates in JavaScript and
//! TypeScript modules and keeps the source map chain intact.
//!
//! ```
//! use minify_lit_html::{load, LoaderContext, LoaderOptions};
//!
//! let ctx = LoaderContext {
//!     resource_path: "src/app.js".into(),
//!     source_map: false,
//! };
//! let output = load(&ctx, "const t = html`<p>  hi  </p>`;", None, &LoaderOptions::default()).unwrap();
//! assert_eq!(1, output.templates);
//! assert!(!output.code.contains("  hi  "));
//! ```

use minify_lit_html_transform::minify_templates;

pub mod errors;
pub mod merge;

pub use errors::LoaderError;
pub use merge::{merge_source_maps, reconcile_source_maps, MergeError};
pub use minify_lit_html_core::{
    LoaderOptions, MinifierOptions, OptionsError, ParserOptions, PartialLoaderOptions,
    RawSourceMap,
};
pub use minify_lit_html_transform::{HtmlMinifier, MinifyErrorKind, MinifyHtml, TransformError};

/// What the host knows about the file being loaded
#[derive(Debug, Clone, Default)]
pub struct LoaderContext {
    /// Path of the resource, as the host sees it
    pub resource_path: String,
    /// Whether the host wants a source map back
    pub source_map: bool,
}

#[derive(Debug, Clone)]
pub struct LoaderOutput {
    /// The rewritten code
    pub code: String,
    pub map: Option<RawSourceMap>,
    /// How many templates were minified
    pub templates: usize,
}

/// Minifies the templates of `contents` with [`MinifyHtml`]
pub fn load(
    ctx: &LoaderContext,
    contents: &str,
    input_map: Option<RawSourceMap>,
    options: &LoaderOptions,
) -> Result<LoaderOutput, LoaderError> {
    load_with(ctx, contents, input_map, options, &MinifyHtml)
}

/// Minifies the templates of `contents` with a custom [`HtmlMinifier`].
///
/// The map of the rewritten code is merged with `input_map` when both exist,
/// see [`reconcile_source_maps`].
pub fn load_with(
    ctx: &LoaderContext,
    contents: &str,
    input_map: Option<RawSourceMap>,
    options: &LoaderOptions,
    minifier: &dyn HtmlMinifier,
) -> Result<LoaderOutput, LoaderError> {
    let display_name = normalize_path(&ctx.resource_path);

    let result = minify_templates(contents, options, &display_name, ctx.source_map, minifier)?;

    let output_map = match result.map {
        Some(json) => Some(RawSourceMap::from_json(&json).map_err(LoaderError::OutputMap)?),
        None => None,
    };

    Ok(LoaderOutput {
        code: result.code,
        map: reconcile_source_maps(input_map, output_map),
        templates: result.templates,
    })
}

/// Drops `.` components and repeated `/` separators and resolves `..` against
/// the component before it. `\` is kept as is.
pub fn normalize_path(path: &str) -> String {
    let is_absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                // Nothing to go up from at the root
                _ if is_absolute => {}
                _ => parts.push(part),
            },
            _ => parts.push(part),
        }
    }

    let normalized = parts.join("/");
    match (is_absolute, normalized.is_empty()) {
        (true, _) => format!("/{normalized}"),
        (false, true) => ".".to_owned(),
        (false, false) => normalized,
    }
}

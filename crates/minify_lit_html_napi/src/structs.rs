use napi_derive::napi;

/// What the bundler knows about the module being loaded
#[napi(object)]
#[derive(Clone, Default)]
pub struct LoaderJsContext {
    /// Path of the module, used as the source name in the source map
    pub resource_path: String,
    /// Produce a source map. Default: false
    pub source_map: Option<bool>,
}

#[napi(object)]
pub struct LoaderResult {
    pub code: String,
    /// Source map JSON
    pub map: Option<String>,
    /// Number of minified templates
    pub templates: u32,
}

impl From<LoaderJsContext> for minify_lit_html::LoaderContext {
    fn from(value: LoaderJsContext) -> Self {
        minify_lit_html::LoaderContext {
            resource_path: value.resource_path,
            source_map: value.source_map.unwrap_or(false),
        }
    }
}

//! Loader configuration.
//!
//! The configuration surface is [`PartialLoaderOptions`]: every field is optional and
//! uses the camelCase names hosts pass in (`parserOptions`, `minifierOptions`, ...).
//! It is resolved into [`LoaderOptions`] by filling in the defaults.
//! Resolution is a pure function, nothing is cached between files.

use serde::Deserialize;
use smallvec::{smallvec, SmallVec};

use crate::error::OptionsError;

/// Tag name recognized when no `tags` are configured
pub const DEFAULT_MARKER_TAG: &str = "html";

/// Fully resolved options of a single loader invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Suppress all the logging output
    pub silent: bool,
    /// Maximum level of the logging output
    pub log_level: LogLevel,
    /// Write the logging output to stdout instead of stderr
    pub log_info_to_std_out: bool,
    pub parser: ParserOptions,
    pub minifier: MinifierOptions,
    /// Marker tag names, e.g. `html` matches both `html` and `lit.html`
    pub tags: SmallVec<[String; 1]>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[serde(alias = "INFO")]
    Info,
    #[default]
    #[serde(alias = "WARN")]
    Warn,
    #[serde(alias = "ERROR")]
    Error,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Module,
    Script,
}

/// Options of the ECMAScript parser.
///
/// Spans (positions and ranges) are always tracked, the code generator needs them
/// to produce the output source map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    pub source_type: SourceType,
    /// Parse TypeScript syntax
    pub typescript: bool,
    /// Parse JSX (or TSX when `typescript` is set)
    pub jsx: bool,
    /// Parse decorators
    pub decorators: bool,
}

/// HTML minifier toggles. The names follow `html-minifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifierOptions {
    pub case_sensitive: bool,
    pub collapse_whitespace: bool,
    pub minify_css: bool,
    pub minify_js: bool,
    pub prevent_attributes_escaping: bool,
    pub remove_comments: bool,
    pub remove_optional_tags: bool,
    /// Reject malformed markup (e.g. mismatched closing tags) instead of minifying it
    pub strict: bool,
}

impl Default for MinifierOptions {
    fn default() -> Self {
        MinifierOptions {
            case_sensitive: true,
            collapse_whitespace: true,
            minify_css: true,
            minify_js: false,
            prevent_attributes_escaping: true,
            remove_comments: true,
            remove_optional_tags: false,
            strict: false,
        }
    }
}

/// User-supplied configuration, as received from the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialLoaderOptions {
    pub silent: Option<bool>,
    pub log_level: Option<LogLevel>,
    pub log_info_to_std_out: Option<bool>,
    #[serde(alias = "esprima")]
    pub parser_options: Option<PartialParserOptions>,
    #[serde(alias = "htmlMinifier")]
    pub minifier_options: Option<PartialMinifierOptions>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialParserOptions {
    pub source_type: Option<SourceType>,
    pub typescript: Option<bool>,
    pub jsx: Option<bool>,
    pub decorators: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialMinifierOptions {
    pub case_sensitive: Option<bool>,
    pub collapse_whitespace: Option<bool>,
    #[serde(rename = "minifyCSS", alias = "minifyCss")]
    pub minify_css: Option<bool>,
    #[serde(rename = "minifyJS", alias = "minifyJs")]
    pub minify_js: Option<bool>,
    pub prevent_attributes_escaping: Option<bool>,
    pub remove_comments: Option<bool>,
    pub remove_optional_tags: Option<bool>,
    pub strict: Option<bool>,
}

impl LoaderOptions {
    /// Fills the defaults in for everything `partial` leaves out
    pub fn resolve(partial: PartialLoaderOptions) -> LoaderOptions {
        let parser = partial.parser_options.unwrap_or_default();
        let minifier = partial.minifier_options.unwrap_or_default();
        let default_minifier = MinifierOptions::default();

        let tags: SmallVec<[String; 1]> = match partial.tags {
            Some(tags) if !tags.is_empty() => tags.into_iter().collect(),
            _ => smallvec![DEFAULT_MARKER_TAG.to_owned()],
        };

        LoaderOptions {
            silent: partial.silent.unwrap_or(false),
            log_level: partial.log_level.unwrap_or_default(),
            log_info_to_std_out: partial.log_info_to_std_out.unwrap_or(false),
            parser: ParserOptions {
                source_type: parser.source_type.unwrap_or_default(),
                typescript: parser.typescript.unwrap_or(false),
                jsx: parser.jsx.unwrap_or(false),
                decorators: parser.decorators.unwrap_or(false),
            },
            minifier: MinifierOptions {
                case_sensitive: minifier
                    .case_sensitive
                    .unwrap_or(default_minifier.case_sensitive),
                collapse_whitespace: minifier
                    .collapse_whitespace
                    .unwrap_or(default_minifier.collapse_whitespace),
                minify_css: minifier.minify_css.unwrap_or(default_minifier.minify_css),
                minify_js: minifier.minify_js.unwrap_or(default_minifier.minify_js),
                prevent_attributes_escaping: minifier
                    .prevent_attributes_escaping
                    .unwrap_or(default_minifier.prevent_attributes_escaping),
                remove_comments: minifier
                    .remove_comments
                    .unwrap_or(default_minifier.remove_comments),
                remove_optional_tags: minifier
                    .remove_optional_tags
                    .unwrap_or(default_minifier.remove_optional_tags),
                strict: minifier.strict.unwrap_or(default_minifier.strict),
            },
            tags,
        }
    }

    /// Decodes and resolves a configuration object. `null` is an empty configuration.
    pub fn from_value(value: serde_json::Value) -> Result<LoaderOptions, OptionsError> {
        Ok(LoaderOptions::resolve(PartialLoaderOptions::from_value(value)?))
    }

    pub fn from_json(json: &str) -> Result<LoaderOptions, OptionsError> {
        Ok(LoaderOptions::resolve(PartialLoaderOptions::from_json(json)?))
    }
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions::resolve(PartialLoaderOptions::default())
    }
}

impl From<PartialLoaderOptions> for LoaderOptions {
    fn from(value: PartialLoaderOptions) -> Self {
        LoaderOptions::resolve(value)
    }
}

impl PartialLoaderOptions {
    pub fn from_value(value: serde_json::Value) -> Result<PartialLoaderOptions, OptionsError> {
        if value.is_null() {
            return Ok(PartialLoaderOptions::default());
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(json: &str) -> Result<PartialLoaderOptions, OptionsError> {
        if json.trim().is_empty() {
            return Ok(PartialLoaderOptions::default());
        }

        PartialLoaderOptions::from_value(serde_json::from_str(json)?)
    }

    /// Layers `other` on top of `self`: every field `other` sets wins
    pub fn merge(self, other: PartialLoaderOptions) -> PartialLoaderOptions {
        PartialLoaderOptions {
            silent: other.silent.or(self.silent),
            log_level: other.log_level.or(self.log_level),
            log_info_to_std_out: other.log_info_to_std_out.or(self.log_info_to_std_out),
            parser_options: merge_nested(self.parser_options, other.parser_options, |a, b| {
                PartialParserOptions {
                    source_type: b.source_type.or(a.source_type),
                    typescript: b.typescript.or(a.typescript),
                    jsx: b.jsx.or(a.jsx),
                    decorators: b.decorators.or(a.decorators),
                }
            }),
            minifier_options: merge_nested(
                self.minifier_options,
                other.minifier_options,
                |a, b| PartialMinifierOptions {
                    case_sensitive: b.case_sensitive.or(a.case_sensitive),
                    collapse_whitespace: b.collapse_whitespace.or(a.collapse_whitespace),
                    minify_css: b.minify_css.or(a.minify_css),
                    minify_js: b.minify_js.or(a.minify_js),
                    prevent_attributes_escaping: b
                        .prevent_attributes_escaping
                        .or(a.prevent_attributes_escaping),
                    remove_comments: b.remove_comments.or(a.remove_comments),
                    remove_optional_tags: b.remove_optional_tags.or(a.remove_optional_tags),
                    strict: b.strict.or(a.strict),
                },
            ),
            tags: other.tags.or(self.tags),
        }
    }
}

fn merge_nested<T>(base: Option<T>, over: Option<T>, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    match (base, over) {
        (Some(base), Some(over)) => Some(merge(base, over)),
        (base, over) => over.or(base),
    }
}

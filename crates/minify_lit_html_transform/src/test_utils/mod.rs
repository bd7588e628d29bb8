use minify_lit_html_core::{LoaderOptions, MinifierOptions, ParserOptions};
use swc_core::{
    common::{sync::Lrc, FileName, SourceMap},
    ecma::ast::Program,
};

use crate::{
    codegen::{emit_program, EmitOptions},
    error::{MinifyErrorKind, TransformError},
    html::{HtmlMinifier, MinifyHtml},
    minify_templates,
    parse::parse_program,
};

pub fn parse_js(source: &str) -> Program {
    parse_js_with_map(source).1
}

/// Parses the source, keeping the map its positions resolve against
pub fn parse_js_with_map(source: &str) -> (Lrc<SourceMap>, Program) {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Custom("test.js".into())),
        source.to_owned(),
    );
    let program = parse_program(&fm, &ParserOptions::default()).unwrap().0;
    (cm, program)
}

/// Parses and prints the source without touching it
pub fn regenerate(source: &str) -> String {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Custom("test.js".into())),
        source.to_owned(),
    );
    let (program, comments) = parse_program(&fm, &ParserOptions::default()).unwrap();

    emit_program(
        cm,
        &program,
        &comments,
        EmitOptions {
            source_map: false,
            display_name: "test.js",
        },
    )
    .unwrap()
    .code
}

pub fn transform(source: &str) -> Result<String, TransformError> {
    transform_with(source, &LoaderOptions::default(), &MinifyHtml)
}

pub fn transform_with(
    source: &str,
    options: &LoaderOptions,
    minifier: &dyn HtmlMinifier,
) -> Result<String, TransformError> {
    minify_templates(source, options, "test.js", false, minifier).map(|result| result.code)
}

/// Collapses every whitespace run into a single space and trims the ends.
/// Predictable, unlike a real minifier.
pub struct CollapsingMinifier;

impl HtmlMinifier for CollapsingMinifier {
    fn minify(&self, html: &str, _options: &MinifierOptions) -> Result<String, MinifyErrorKind> {
        let mut out = String::with_capacity(html.len());
        for word in html.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        Ok(out)
    }
}

/// Fails on every template
pub struct FailingMinifier;

impl HtmlMinifier for FailingMinifier {
    fn minify(&self, _html: &str, _options: &MinifierOptions) -> Result<String, MinifyErrorKind> {
        Err(MinifyErrorKind::Custom("minifier failed".into()))
    }
}

/// Keeps the first 20 characters only
pub struct TruncatingMinifier;

impl HtmlMinifier for TruncatingMinifier {
    fn minify(&self, html: &str, _options: &MinifierOptions) -> Result<String, MinifyErrorKind> {
        Ok(html.chars().take(20).collect())
    }
}

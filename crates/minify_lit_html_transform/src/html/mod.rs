//! The HTML minifier behind the template rewriting.

use minify_lit_html_core::MinifierOptions;
use swc_cached::regex::CachedRegex;
use swc_core::common::{BytePos, DUMMY_SP};
use swc_ecma_parser::StringInput;
use swc_html_ast::{Attribute, DocumentFragment, DocumentMode, Element, Namespace};
use swc_html_codegen::{
    writer::basic::{BasicHtmlWriter, BasicHtmlWriterConfig},
    CodeGenerator, CodegenConfig, Emit,
};
use swc_html_minifier::{
    minify_document_fragment,
    option::{
        CollapseWhitespaces, CssOptions, MinifyCssOption, MinifyJsOption, MinifyJsonOption,
        MinifyOptions, RemoveRedundantAttributes,
    },
};
use swc_html_parser::{
    error::Error,
    lexer::Lexer,
    parser::{Parser, ParserConfig},
};
use swc_html_visit::{VisitMut, VisitMutWith};

use crate::{error::MinifyErrorKind, placeholder::PLACEHOLDER_BASE};

mod guard;

/// Minifies an HTML fragment.
///
/// Implementations receive the markup with expressions already replaced by
/// placeholder tokens and must keep every token intact.
pub trait HtmlMinifier {
    fn minify(&self, html: &str, options: &MinifierOptions) -> Result<String, MinifyErrorKind>;
}

/// Default minifier backed by `swc_html_minifier`.
///
/// The fragment is parsed as the content of a `<template>`, the way lit parses
/// it. Attribute order and attribute values are never touched, as lit binds
/// expressions by position.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinifyHtml;

impl HtmlMinifier for MinifyHtml {
    fn minify(&self, html: &str, options: &MinifierOptions) -> Result<String, MinifyErrorKind> {
        let guarded = guard::guard_table_placeholders(html);
        let (mut fragment, errors) = parse_fragment(&guarded)?;

        if options.strict {
            if let Some(e) = errors.into_iter().next() {
                return Err(MinifyErrorKind::InvalidMarkup(Box::new(e.into_inner().1)));
            }
        }

        let context = template_element();
        minify_document_fragment(&mut fragment, &context, &minify_options(options)?);

        if options.case_sensitive {
            fragment.visit_mut_with(&mut AttributeCaseRestorer);
        }

        let printed = print_fragment(&fragment, &context, options)?;
        Ok(guard::unguard_placeholders(&printed).into_owned())
    }
}

/// Maps the loader toggles onto `swc_html_minifier`.
///
/// Everything which could reorder, drop or rewrite an attribute is off.
/// `prevent_attributes_escaping` has no counterpart: values are printed with
/// whichever quote they contain less of.
pub fn minify_options(
    options: &MinifierOptions,
) -> Result<MinifyOptions<CssOptions>, MinifyErrorKind> {
    let collapse_whitespaces = if options.collapse_whitespace {
        CollapseWhitespaces::Smart
    } else {
        CollapseWhitespaces::None
    };

    let mut defaults = MinifyOptions::<CssOptions>::default();
    let mut preserve_comments = defaults.preserve_comments.take().unwrap_or_default();
    preserve_comments.push(
        CachedRegex::new(&format!("^{PLACEHOLDER_BASE}"))
            .map_err(|e| MinifyErrorKind::Custom(e.to_string()))?,
    );

    Ok(MinifyOptions {
        collapse_whitespaces,
        remove_comments: options.remove_comments,
        preserve_comments: Some(preserve_comments),
        minify_css: MinifyCssOption::Bool(options.minify_css),
        minify_js: MinifyJsOption::Bool(options.minify_js),
        minify_json: MinifyJsonOption::Bool(false),
        remove_empty_metadata_elements: false,
        minify_conditional_comments: false,
        remove_empty_attributes: false,
        remove_redundant_attributes: RemoveRedundantAttributes::None,
        collapse_boolean_attributes: false,
        merge_metadata_elements: false,
        normalize_attributes: false,
        sort_space_separated_attribute_values: false,
        sort_attributes: false,
        ..defaults
    })
}

/// Parses the fragment as the content of a `<template>` and rejects it on the first parse error
pub fn validate_markup(html: &str) -> Result<(), MinifyErrorKind> {
    let (_, errors) = parse_fragment(html)?;

    match errors.into_iter().next() {
        Some(e) => Err(MinifyErrorKind::InvalidMarkup(Box::new(e.into_inner().1))),
        None => Ok(()),
    }
}

/// Parses `html` in `<template>` context, returning the recovered errors alongside the tree
fn parse_fragment(html: &str) -> Result<(DocumentFragment, Vec<Error>), MinifyErrorKind> {
    let lexer = Lexer::new(StringInput::new(
        html,
        BytePos(1),
        BytePos(html.len() as u32 + 1),
    ));

    let parser_config = ParserConfig {
        scripting_enabled: false,
        iframe_srcdoc: false,
        allow_self_closing: false,
    };
    let mut parser = Parser::new(lexer, parser_config);

    let fragment = parser
        .parse_document_fragment(template_element(), DocumentMode::NoQuirks, None)
        .map_err(|e| MinifyErrorKind::InvalidMarkup(Box::new(e.into_inner().1)))?;

    Ok((fragment, parser.take_errors()))
}

fn print_fragment(
    fragment: &DocumentFragment,
    context: &Element,
    options: &MinifierOptions,
) -> Result<String, MinifyErrorKind> {
    let mut printed = String::with_capacity(256);

    {
        let writer = BasicHtmlWriter::new(&mut printed, None, BasicHtmlWriterConfig::default());
        let mut generator = CodeGenerator::new(
            writer,
            CodegenConfig {
                minify: true,
                scripting_enabled: false,
                context_element: Some(context),
                tag_omission: Some(options.remove_optional_tags),
                self_closing_void_elements: None,
                quotes: Some(true),
            },
        );

        Emit::emit(&mut generator, fragment)
            .map_err(|_| MinifyErrorKind::Custom("failed to print the minified markup".into()))?;
    }

    Ok(printed)
}

fn template_element() -> Element {
    Element {
        span: DUMMY_SP,
        tag_name: "template".into(),
        namespace: Namespace::HTML,
        attributes: vec![],
        children: vec![],
        content: None,
        is_self_closing: false,
    }
}

/// The parser lowercases attribute names, lit property bindings (`.someProp`) need them as written
struct AttributeCaseRestorer;

impl VisitMut for AttributeCaseRestorer {
    fn visit_mut_attribute(&mut self, n: &mut Attribute) {
        let Some(raw_name) = &n.raw_name else {
            return;
        };

        if n.prefix.is_none() && raw_name.eq_ignore_ascii_case(&n.name) {
            n.name = raw_name.clone();
        }
    }
}

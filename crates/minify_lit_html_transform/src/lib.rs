//! Minifies the HTML inside lit-html tagged templates (html`...`, lit.html`...`)
//! while leaving the rest of the module intact.
//!
//! The work is done in three steps over a single parsed tree:
//! 1. marker-tagged templates are collected with their raw literal segments;
//! 2. the segments of each template are joined with placeholder tokens, minified as
//!    one HTML fragment and split back;
//! 3. the new segments are put into the tree, which is printed with a source map.

use fxhash::FxHashMap;
use log::{debug, info};
use minify_lit_html_core::LoaderOptions;
use swc_core::common::{sync::Lrc, FileName, SourceMap};

use codegen::{emit_program, EmitOptions};
use error::{MinifyError, ParseError};
use parse::parse_program;
use rewrite::{apply_replacements, minify_site};
use sites::{collect_sites, MarkerTags};

pub mod codegen;
pub mod error;
pub mod html;
pub mod parse;
pub mod placeholder;
pub mod rewrite;
pub mod sites;

#[cfg(test)]
mod test_utils;

pub use error::{MinifyErrorKind, TransformError};
pub use html::{HtmlMinifier, MinifyHtml};

#[derive(Debug, Clone)]
pub struct TemplateRewriteResult {
    pub code: String,
    /// Source map JSON, present when it was asked for
    pub map: Option<String>,
    /// How many templates were minified
    pub templates: usize,
}

/// Rewrites every marker-tagged template of `source`.
///
/// `display_name` names the file in errors, logs and the source map.
/// A template which fails to minify fails the whole file.
pub fn minify_templates(
    source: &str,
    options: &LoaderOptions,
    display_name: &str,
    source_map: bool,
    minifier: &dyn HtmlMinifier,
) -> Result<TemplateRewriteResult, TransformError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Custom(display_name.to_owned())),
        source.to_owned(),
    );

    let (mut program, comments) =
        parse_program(&fm, &options.parser).map_err(|e| ParseError::new(e, &cm))?;

    // Sites are recorded on the untouched tree
    let markers = MarkerTags::new(&options.tags);
    let sites = collect_sites(&program, &markers);

    let mut replacements = FxHashMap::default();
    replacements.reserve(sites.len());

    for site in sites.iter() {
        let segments = minify_site(site, &options.minifier, minifier)
            .map_err(|kind| MinifyError::new(kind, site.span, &cm))?;

        debug!(
            "{}: minified {:?} template at {}..{} with {} expression(s)",
            display_name,
            site.shape,
            site.span.lo.0,
            site.span.hi.0,
            site.expression_count()
        );

        replacements.insert(site.span, segments);
    }

    let templates = apply_replacements(&mut program, replacements, &cm)?;

    let output = emit_program(
        cm,
        &program,
        &comments,
        EmitOptions {
            source_map,
            display_name,
        },
    )?;

    info!("{}: minified {} template(s)", display_name, templates);

    Ok(TemplateRewriteResult {
        code: output.code,
        map: output.map,
        templates,
    })
}

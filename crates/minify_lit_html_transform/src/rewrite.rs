use std::borrow::Cow;

use fxhash::FxHashMap;
use minify_lit_html_core::MinifierOptions;
use swc_core::{
    common::{SourceMap, Span},
    ecma::{
        ast::{Program, TaggedTpl},
        atoms::Atom,
        visit::{VisitMut, VisitMutWith},
    },
};

use crate::{
    error::{MinifyError, MinifyErrorKind},
    html::HtmlMinifier,
    placeholder::Placeholders,
    sites::TaggedTemplateSite,
};

/// Minifies the markup of a single template, producing its new raw literal segments
pub fn minify_site(
    site: &TaggedTemplateSite,
    options: &MinifierOptions,
    minifier: &dyn HtmlMinifier,
) -> Result<Vec<Atom>, MinifyErrorKind> {
    let expressions = site.expression_count();

    let segments = if expressions == 0 {
        let markup = site.segments.first().map_or("", |s| &**s);
        vec![minifier.minify(markup, options)?]
    } else {
        let placeholders = Placeholders::for_segments(&site.segments);
        let minified = minifier.minify(&placeholders.join(&site.segments), options)?;
        placeholders.split(&minified, expressions)?
    };

    segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| escape_template_raw(segment, idx).map(|raw| Atom::from(&*raw)))
        .collect()
}

/// Escapes what would end the template or start an expression in a raw segment.
/// Escape sequences already in the segment are kept as is.
pub fn escape_template_raw(raw: &str, segment: usize) -> Result<Cow<'_, str>, MinifyErrorKind> {
    let needs_escaping = raw.contains('`') || raw.contains("${");
    if !needs_escaping && !ends_with_dangling_backslash(raw) {
        return Ok(Cow::Borrowed(raw));
    }

    let mut out = String::with_capacity(raw.len() + 4);
    let mut escaped = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if escaped {
            out.push(c);
            escaped = false;
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }

    if escaped {
        return Err(MinifyErrorKind::DanglingEscape { segment });
    }

    Ok(Cow::Owned(out))
}

fn ends_with_dangling_backslash(raw: &str) -> bool {
    raw.bytes().rev().take_while(|b| *b == b'\\').count() % 2 == 1
}

/// Puts the minified segments in place, returning how many templates were rewritten.
///
/// Only the literal segments are replaced. Expressions stay in the tree, so
/// templates nested in them are rewritten by the same pass.
pub fn apply_replacements(
    program: &mut Program,
    replacements: FxHashMap<Span, Vec<Atom>>,
    cm: &SourceMap,
) -> Result<usize, MinifyError> {
    let mut replacer = TemplateReplacer {
        replacements,
        applied: 0,
        mismatch: None,
    };
    program.visit_mut_with(&mut replacer);

    match replacer.mismatch {
        Some((span, kind)) => Err(MinifyError::new(kind, span, cm)),
        None => Ok(replacer.applied),
    }
}

struct TemplateReplacer {
    replacements: FxHashMap<Span, Vec<Atom>>,
    applied: usize,
    /// First template whose segments did not fit
    mismatch: Option<(Span, MinifyErrorKind)>,
}

impl VisitMut for TemplateReplacer {
    fn visit_mut_tagged_tpl(&mut self, n: &mut TaggedTpl) {
        n.visit_mut_children_with(self);

        let Some(segments) = self.replacements.remove(&n.span) else {
            return;
        };

        if segments.len() != n.tpl.quasis.len() {
            if self.mismatch.is_none() {
                let kind = MinifyErrorKind::SegmentCount {
                    expected: n.tpl.quasis.len(),
                    found: segments.len(),
                };
                self.mismatch = Some((n.span, kind));
            }
            return;
        }

        for (quasi, raw) in n.tpl.quasis.iter_mut().zip(segments) {
            // Segments with escapes get their cooked value from the printed raw text
            quasi.cooked = if raw.contains('\\') {
                None
            } else {
                Some(raw.clone())
            };
            quasi.raw = raw;
        }

        self.applied += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        sites::{collect_sites, MarkerTags, TagShape},
        test_utils::{parse_js_with_map, CollapsingMinifier},
    };

    use super::*;

    fn site(segments: &[&str]) -> TaggedTemplateSite {
        TaggedTemplateSite {
            span: Default::default(),
            shape: TagShape::Identifier,
            segments: segments.iter().map(|s| Atom::from(*s)).collect(),
        }
    }

    fn only_site_span(program: &Program) -> Span {
        let names = ["html".to_owned()];
        let sites = collect_sites(program, &MarkerTags::new(&names));
        assert_eq!(1, sites.len());
        sites[0].span
    }

    fn minified(segments: &[&str]) -> Result<Vec<String>, MinifyErrorKind> {
        minify_site(
            &site(segments),
            &MinifierOptions::default(),
            &CollapsingMinifier,
        )
        .map(|atoms| atoms.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn it_minifies_templates_without_expressions() {
        assert_eq!(vec!["<p> a </p>"], minified(&["  <p>   a   </p>  "]).unwrap());
    }

    #[test]
    fn it_restores_segments_around_expressions() {
        assert_eq!(
            vec!["<a href=\"", "\"> ", " </a>"],
            minified(&["<a   href=\"", "\">   ", "   </a>"]).unwrap()
        );
    }

    #[test]
    fn it_escapes_template_syntax_in_segments() {
        assert_eq!(Cow::Borrowed("plain"), escape_template_raw("plain", 0).unwrap());
        assert_eq!("a\\`b", escape_template_raw("a`b", 0).unwrap());
        assert_eq!("\\${x}", escape_template_raw("${x}", 0).unwrap());
        assert_eq!("$ {x} $", escape_template_raw("$ {x} $", 0).unwrap());
    }

    #[test]
    fn it_keeps_existing_escapes() {
        assert_eq!("a\\`b\\${c}", escape_template_raw("a\\`b\\${c}", 0).unwrap());
        assert_eq!("\\\\\\`", escape_template_raw("\\\\`", 0).unwrap());
    }

    #[test]
    fn it_rejects_dangling_backslashes() {
        assert!(matches!(
            escape_template_raw("a\\", 2),
            Err(MinifyErrorKind::DanglingEscape { segment: 2 })
        ));
        assert!(escape_template_raw("a\\\\", 0).is_ok());
    }

    #[test]
    fn it_applies_segments_by_template_span() {
        let (cm, mut program) = parse_js_with_map("const t = html`<p>  ${a}  </p>`;");
        let span = only_site_span(&program);

        let mut replacements = FxHashMap::default();
        replacements.insert(span, vec![Atom::from("<p>"), Atom::from("</p>")]);

        assert_eq!(1, apply_replacements(&mut program, replacements, &cm).unwrap());
    }

    #[test]
    fn it_rejects_segments_which_do_not_fit_the_template() {
        let (cm, mut program) = parse_js_with_map("const a = 1;\nconst t = html`<p>${a}</p>`;");
        let span = only_site_span(&program);

        let mut replacements = FxHashMap::default();
        replacements.insert(span, vec![Atom::from("<p></p>")]);

        let e = apply_replacements(&mut program, replacements, &cm).unwrap_err();
        assert!(matches!(
            e.kind,
            MinifyErrorKind::SegmentCount {
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(2, e.line);
    }
}

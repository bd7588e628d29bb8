//! Finding the tagged templates which hold lit-html markup.

use swc_core::{
    common::Span,
    ecma::{
        ast::{Expr, MemberExpr, MemberProp, Program, TaggedTpl},
        atoms::Atom,
        visit::{Visit, VisitWith},
    },
};

/// How the marker tag is written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagShape {
    /// html`...`
    Identifier,
    /// lit.html`...`
    MemberProperty,
}

/// Marker tag names a tagged template must use to be minified
pub struct MarkerTags<'t> {
    names: &'t [String],
}

impl<'t> MarkerTags<'t> {
    pub fn new(names: &'t [String]) -> MarkerTags<'t> {
        MarkerTags { names }
    }

    pub fn match_tag(&self, tag: &Expr) -> Option<TagShape> {
        match tag {
            Expr::Ident(ident) if self.is_marker(&ident.sym) => Some(TagShape::Identifier),
            Expr::Member(MemberExpr {
                prop: MemberProp::Ident(prop),
                ..
            }) if self.is_marker(&prop.sym) => Some(TagShape::MemberProperty),
            _ => None,
        }
    }

    fn is_marker(&self, sym: &Atom) -> bool {
        self.names.iter().any(|name| &**sym == name.as_str())
    }
}

/// A marker-tagged template, as it was found in the parsed source
#[derive(Debug, Clone)]
pub struct TaggedTemplateSite {
    /// Span of the whole tagged template, used as its identity
    pub span: Span,
    pub shape: TagShape,
    /// Raw literal segments, one more than there are expressions
    pub segments: Vec<Atom>,
}

impl TaggedTemplateSite {
    pub fn expression_count(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}

/// Collects the marker-tagged templates in source order, outer templates first
pub fn collect_sites(program: &Program, markers: &MarkerTags) -> Vec<TaggedTemplateSite> {
    let mut collector = SiteCollector {
        markers,
        sites: Vec::new(),
    };
    program.visit_with(&mut collector);
    collector.sites
}

struct SiteCollector<'m, 't> {
    markers: &'m MarkerTags<'t>,
    sites: Vec<TaggedTemplateSite>,
}

impl Visit for SiteCollector<'_, '_> {
    fn visit_tagged_tpl(&mut self, n: &TaggedTpl) {
        if let Some(shape) = self.markers.match_tag(&n.tag) {
            self.sites.push(TaggedTemplateSite {
                span: n.span,
                shape,
                segments: n.tpl.quasis.iter().map(|quasi| quasi.raw.clone()).collect(),
            });
        }

        // Templates nested in the expressions
        n.visit_children_with(self);
    }
}

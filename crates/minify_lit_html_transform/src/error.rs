use swc_core::common::{BytePos, SourceMap, Span, Spanned, DUMMY_SP};
use swc_ecma_parser::error::SyntaxError;

#[derive(Debug)]
pub enum TransformError {
    /// The source is not valid ECMAScript/TypeScript
    Parse(ParseError),
    /// A template body could not be minified. The whole file fails.
    Minify(MinifyError),
    /// Writing the generated code or source map failed
    Emit(std::io::Error),
}

#[derive(Debug)]
pub struct ParseError {
    pub kind: SyntaxError,
    pub span: Span,
    /// 1-based, 0 when the position is unknown
    pub line: usize,
    /// 1-based, 0 when the position is unknown
    pub column: usize,
}

#[derive(Debug)]
pub struct MinifyError {
    pub kind: MinifyErrorKind,
    /// Span of the whole tagged template
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug)]
pub enum MinifyErrorKind {
    /// Markup rejected by the HTML parser in strict mode
    InvalidMarkup(Box<swc_html_parser::error::ErrorKind>),
    /// A placeholder went missing or got duplicated during minification
    PlaceholderMismatch { expected: usize, found: usize },
    /// Placeholders came back in a different order
    PlaceholderOrder { expected: usize, found: usize },
    /// A literal segment ends with a backslash which would escape the template syntax after it
    DanglingEscape { segment: usize },
    /// The tree holds a different number of literal segments than were produced
    SegmentCount { expected: usize, found: usize },
    /// Reported by a custom [`crate::HtmlMinifier`]
    Custom(String),
}

impl ParseError {
    pub fn new(error: swc_ecma_parser::error::Error, cm: &SourceMap) -> ParseError {
        let span = error.span();
        let (line, column) = locate(cm, span.lo);

        ParseError {
            kind: error.into_kind(),
            span,
            line,
            column,
        }
    }
}

impl MinifyError {
    pub fn new(kind: MinifyErrorKind, span: Span, cm: &SourceMap) -> MinifyError {
        let (line, column) = locate(cm, span.lo);

        MinifyError {
            kind,
            span,
            line,
            column,
        }
    }
}

fn locate(cm: &SourceMap, pos: BytePos) -> (usize, usize) {
    if pos.is_dummy() {
        return (0, 0);
    }

    let loc = cm.lookup_char_pos(pos);
    (loc.line, loc.col.0 + 1)
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}:{})", self.kind.msg(), self.line, self.column)
    }
}

impl std::fmt::Display for MinifyErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MinifyErrorKind::InvalidMarkup(kind) => write!(f, "invalid markup: {:?}", kind),
            MinifyErrorKind::PlaceholderMismatch { expected, found } => write!(
                f,
                "expected {expected} expression placeholder(s) after minification, found {found}"
            ),
            MinifyErrorKind::PlaceholderOrder { expected, found } => write!(
                f,
                "expression placeholder {found} was found where placeholder {expected} was expected"
            ),
            MinifyErrorKind::DanglingEscape { segment } => {
                write!(f, "literal segment {segment} ends with a dangling backslash")
            }
            MinifyErrorKind::SegmentCount { expected, found } => write!(
                f,
                "template has {expected} literal segment(s), {found} were produced"
            ),
            MinifyErrorKind::Custom(message) => write!(f, "{message}"),
        }
    }
}

impl std::fmt::Display for MinifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to minify template ({}:{}): {}",
            self.line, self.column, self.kind
        )
    }
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::Parse(e) => write!(f, "parse error: {e}"),
            TransformError::Minify(e) => write!(f, "{e}"),
            TransformError::Emit(e) => write!(f, "failed to emit code: {e}"),
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::Emit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for TransformError {
    fn from(value: ParseError) -> Self {
        TransformError::Parse(value)
    }
}

impl From<MinifyError> for TransformError {
    fn from(value: MinifyError) -> Self {
        TransformError::Minify(value)
    }
}

impl From<std::io::Error> for TransformError {
    fn from(value: std::io::Error) -> Self {
        TransformError::Emit(value)
    }
}

impl Spanned for TransformError {
    fn span(&self) -> Span {
        match self {
            TransformError::Parse(e) => e.span,
            TransformError::Minify(e) => e.span,
            TransformError::Emit(_) => DUMMY_SP,
        }
    }
}

use minify_lit_html_core::{ParserOptions, SourceType};
use swc_core::{
    common::{comments::SingleThreadedComments, SourceFile},
    ecma::ast::{EsVersion, Program},
};
use swc_ecma_parser::{lexer::Lexer, EsConfig, PResult, Parser, StringInput, Syntax, TsConfig};

pub fn syntax_for(options: &ParserOptions) -> Syntax {
    if options.typescript {
        Syntax::Typescript(TsConfig {
            tsx: options.jsx,
            decorators: options.decorators,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsConfig {
            jsx: options.jsx,
            decorators: options.decorators,
            ..Default::default()
        })
    }
}

/// Parses the whole file, keeping comments so that they survive code generation.
/// Errors the parser recovered from are still reported.
pub fn parse_program(
    fm: &SourceFile,
    options: &ParserOptions,
) -> PResult<(Program, SingleThreadedComments)> {
    let comments = SingleThreadedComments::default();

    let program = {
        let lexer = Lexer::new(
            syntax_for(options),
            EsVersion::EsNext,
            StringInput::from(fm),
            Some(&comments),
        );
        let mut parser = Parser::new_from(lexer);

        let program = match options.source_type {
            SourceType::Module => parser.parse_module().map(Program::Module)?,
            SourceType::Script => parser.parse_script().map(Program::Script)?,
        };

        if let Some(error) = parser.take_errors().into_iter().next() {
            return Err(error);
        }

        program
    };

    Ok((program, comments))
}

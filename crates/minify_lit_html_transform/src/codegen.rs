use std::io;

use swc_core::{
    common::{
        comments::SingleThreadedComments, source_map::SourceMapGenConfig, sync::Lrc, FileName,
        SourceMap,
    },
    ecma::ast::Program,
};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

pub struct EmitOptions<'n> {
    /// Produce a source map of the generated code
    pub source_map: bool,
    /// Name of the source file in the source map
    pub display_name: &'n str,
}

pub struct EmitOutput {
    pub code: String,
    /// JSON of the source map
    pub map: Option<String>,
}

/// Prints the program with its comments. The generated map embeds the source content.
pub fn emit_program(
    cm: Lrc<SourceMap>,
    program: &Program,
    comments: &SingleThreadedComments,
    options: EmitOptions,
) -> io::Result<EmitOutput> {
    let mut buff: Vec<u8> = Vec::with_capacity(1024);
    let mut mappings = Vec::new();

    {
        let writer = JsWriter::new(
            cm.clone(),
            "\n",
            &mut buff,
            options.source_map.then_some(&mut mappings),
        );

        let mut emitter_cfg = swc_ecma_codegen::Config::default();
        emitter_cfg.minify = false;

        let mut emitter = Emitter {
            cfg: emitter_cfg,
            comments: Some(comments),
            wr: writer,
            cm: cm.clone(),
        };

        program.emit_with(&mut emitter)?;
    }

    let code = String::from_utf8(buff).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if !options.source_map {
        return Ok(EmitOutput { code, map: None });
    }

    let source_map = cm.build_source_map_with_config(
        &mut mappings,
        None,
        DisplayNameConfig {
            display_name: options.display_name,
        },
    );

    let mut map_buff: Vec<u8> = Vec::new();
    source_map
        .to_writer(&mut map_buff)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let map = String::from_utf8(map_buff).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(EmitOutput {
        code,
        map: Some(map),
    })
}

/// Every mapping points at the single loaded file, listed under its display name
struct DisplayNameConfig<'n> {
    display_name: &'n str,
}

impl SourceMapGenConfig for DisplayNameConfig<'_> {
    fn file_name_to_source(&self, _f: &FileName) -> String {
        self.display_name.to_owned()
    }

    fn inline_sources_content(&self, _f: &FileName) -> bool {
        true
    }
}

//! Composition of the map received from the previous build step with the map of
//! the rewritten code.

use log::warn;
use minify_lit_html_core::RawSourceMap;
use sourcemap::SourceMap;

#[derive(Debug)]
pub enum MergeError {
    /// A map could not be turned into JSON
    Json(serde_json::Error),
    /// A map is not a valid revision 3 source map
    Decode(sourcemap::Error),
    /// The input map names no source to point at
    NoSources,
    /// The output map carries no mappings
    EmptyMappings,
    /// No generated position resolves to an original one
    NoOverlap,
    /// The merged map could not be written
    Encode(sourcemap::Error),
}

/// Composes `input` (intermediate code -> original sources) with
/// `output` (rewritten code -> intermediate code).
///
/// The result points from the rewritten code to the original sources, keeps the
/// sources and contents of `input` and takes `file` from `output`.
pub fn merge_source_maps(
    input: &RawSourceMap,
    output: &RawSourceMap,
) -> Result<RawSourceMap, MergeError> {
    if input.sources.is_empty() {
        return Err(MergeError::NoSources);
    }
    if !output.has_mappings() {
        return Err(MergeError::EmptyMappings);
    }

    let mut merged = decode(input)?;
    let adjustment = decode(output)?;
    merged.adjust_mappings(&adjustment);

    if merged.get_token_count() == 0 {
        return Err(MergeError::NoOverlap);
    }

    let mut buff: Vec<u8> = Vec::new();
    merged.to_writer(&mut buff).map_err(MergeError::Encode)?;

    let mut result = RawSourceMap::from_slice(&buff).map_err(MergeError::Json)?;
    result.file = output.file.clone();
    if result.sources_content.is_none() {
        result.sources_content = input.sources_content.clone();
    }

    Ok(result)
}

fn decode(map: &RawSourceMap) -> Result<SourceMap, MergeError> {
    let json = map.to_json().map_err(MergeError::Json)?;
    SourceMap::from_slice(json.as_bytes()).map_err(MergeError::Decode)
}

/// Picks the map to hand back to the host.
///
/// Both maps present and the output map non-empty: the merged map, or the output
/// map when merging fails. Otherwise whichever map is available, verbatim.
pub fn reconcile_source_maps(
    input: Option<RawSourceMap>,
    output: Option<RawSourceMap>,
) -> Option<RawSourceMap> {
    match (input, output) {
        (Some(input), Some(output)) if output.has_mappings() => {
            match merge_source_maps(&input, &output) {
                Ok(merged) => Some(merged),
                Err(e) => {
                    warn!("failed to merge source maps, using the generated map: {e}");
                    Some(output)
                }
            }
        }
        (Some(input), Some(_)) => Some(input),
        (None, Some(output)) => Some(output),
        (input, None) => input,
    }
}

impl std::fmt::Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeError::Json(e) => write!(f, "source map is not serializable: {e}"),
            MergeError::Decode(e) => write!(f, "invalid source map: {e}"),
            MergeError::NoSources => write!(f, "input source map has no sources"),
            MergeError::EmptyMappings => write!(f, "generated source map has no mappings"),
            MergeError::NoOverlap => write!(f, "source maps have no position in common"),
            MergeError::Encode(e) => write!(f, "failed to encode merged source map: {e}"),
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MergeError::Json(e) => Some(e),
            MergeError::Decode(e) | MergeError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Target;
use log::LevelFilter;
use minify_lit_html::{load, LoaderContext, LoaderOptions, PartialLoaderOptions, RawSourceMap};

/// minify_lit_html: minifies the HTML of lit-html templates in a JavaScript or TypeScript module
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the input module
    pub input: PathBuf,

    /// Path to the output file. The code is written to stdout when omitted
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Path to the source map of the input module
    #[clap(long)]
    pub input_source_map: Option<PathBuf>,

    /// Write a source map next to the output file
    #[clap(short, long, requires = "output")]
    pub source_map: bool,

    /// Path to a JSON configuration file
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Inline JSON configuration, applied over the configuration file
    #[clap(long)]
    pub options: Option<String>,
}

fn main() -> Result<()> {
    let args: Args = Args::parse();

    let options = read_options(&args)?;
    init_logger(&options);

    let contents = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;

    let input_map = match &args.input_source_map {
        Some(path) => Some(read_source_map(path)?),
        None => None,
    };

    let ctx = LoaderContext {
        resource_path: args.input.to_string_lossy().into_owned(),
        source_map: args.source_map,
    };
    let output = load(&ctx, &contents, input_map, &options)
        .with_context(|| format!("Failed to minify {}", args.input.display()))?;

    let Some(output_path) = &args.output else {
        io::stdout().write_all(output.code.as_bytes())?;
        return Ok(());
    };

    let mut code = output.code;
    if let (true, Some(map)) = (args.source_map, output.map) {
        let map_path = map_path_for(output_path);
        fs::write(&map_path, map.to_json()?)
            .with_context(|| format!("Failed to write source map: {}", map_path.display()))?;

        if !code.ends_with('\n') {
            code.push('\n');
        }
        let map_name = map_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        code.push_str(&format!("//# sourceMappingURL={map_name}\n"));
    }

    fs::write(output_path, code)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    Ok(())
}

/// Inline options win over the configuration file
fn read_options(args: &Args) -> Result<LoaderOptions> {
    let from_file = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read configuration: {}", path.display()))?;
            PartialLoaderOptions::from_json(&json)
                .with_context(|| format!("Invalid configuration: {}", path.display()))?
        }
        None => PartialLoaderOptions::default(),
    };

    let inline = match &args.options {
        Some(json) => PartialLoaderOptions::from_json(json).context("Invalid --options")?,
        None => PartialLoaderOptions::default(),
    };

    Ok(LoaderOptions::resolve(from_file.merge(inline)))
}

fn read_source_map(path: &Path) -> Result<RawSourceMap> {
    let json = fs::read(path)
        .with_context(|| format!("Failed to read source map: {}", path.display()))?;
    RawSourceMap::from_slice(&json)
        .with_context(|| format!("Invalid source map: {}", path.display()))
}

fn init_logger(options: &LoaderOptions) {
    let level = if options.silent {
        LevelFilter::Off
    } else {
        options.log_level.to_level_filter()
    };
    let target = if options.log_info_to_std_out {
        Target::Stdout
    } else {
        Target::Stderr
    };

    env_logger::Builder::new()
        .filter_level(level)
        .target(target)
        .parse_default_env()
        .init();
}

fn map_path_for(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".map");
    PathBuf::from(path)
}

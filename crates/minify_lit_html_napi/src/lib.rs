#![deny(clippy::all)]

#[cfg(not(all(target_os = "linux", target_env = "musl", target_arch = "aarch64")))]
#[global_allocator]
static ALLOC: mimalloc_rust::GlobalMiMalloc = mimalloc_rust::GlobalMiMalloc;

use minify_lit_html::{load, LoaderContext, LoaderOptions, RawSourceMap};
use napi::bindgen_prelude::*;
use napi_derive::napi;

mod structs;

pub use structs::*;

/// Minifies the lit-html templates of `source` on the calling thread
#[napi]
pub fn transform_sync(
    source: String,
    context: LoaderJsContext,
    input_map: Option<String>,
    options: Option<serde_json::Value>,
) -> Result<LoaderResult> {
    TransformTask {
        source,
        context,
        input_map,
        options,
    }
    .run()
}

/// Minifies the lit-html templates of `source` on the libuv thread pool
#[napi(ts_return_type = "Promise<LoaderResult>")]
pub fn transform(
    source: String,
    context: LoaderJsContext,
    input_map: Option<String>,
    options: Option<serde_json::Value>,
) -> AsyncTask<TransformTask> {
    AsyncTask::new(TransformTask {
        source,
        context,
        input_map,
        options,
    })
}

pub struct TransformTask {
    source: String,
    context: LoaderJsContext,
    input_map: Option<String>,
    options: Option<serde_json::Value>,
}

impl TransformTask {
    fn run(&self) -> Result<LoaderResult> {
        let options = match &self.options {
            Some(value) => LoaderOptions::from_value(value.clone()).map_err(to_napi_error)?,
            None => LoaderOptions::default(),
        };

        let input_map = match &self.input_map {
            Some(json) => Some(RawSourceMap::from_json(json).map_err(to_napi_error)?),
            None => None,
        };

        let ctx: LoaderContext = self.context.clone().into();
        let output = load(&ctx, &self.source, input_map, &options).map_err(to_napi_error)?;

        let map = match output.map {
            Some(map) => Some(map.to_json().map_err(to_napi_error)?),
            None => None,
        };

        Ok(LoaderResult {
            code: output.code,
            map,
            templates: output.templates as u32,
        })
    }
}

impl Task for TransformTask {
    type Output = LoaderResult;
    type JsValue = LoaderResult;

    fn compute(&mut self) -> Result<Self::Output> {
        self.run()
    }

    fn resolve(&mut self, _env: Env, output: Self::Output) -> Result<Self::JsValue> {
        Ok(output)
    }
}

fn to_napi_error(e: impl std::fmt::Display) -> Error {
    Error::from_reason(e.to_string())
}

// `Command::cargo_bin` is deprecated in newer assert_cmd releases but still works
#![allow(deprecated)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const APP: &str = "import { html } from 'lit';\n\nexport const view = (name) => html`\n  <p   class=\"greeting\"  >\n    Hello, ${name}!\n  </p>\n`;\n";

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app.js"), APP).unwrap();
    dir
}

fn cli() -> Command {
    Command::cargo_bin("minify_lit_html").unwrap()
}

#[test]
fn it_writes_to_stdout() {
    let dir = workspace();

    cli()
        .arg(dir.path().join("app.js"))
        .assert()
        .success()
        .stdout(predicate::str::contains("${name}"))
        .stdout(predicate::str::contains(
            "html`<p class=\"greeting\">Hello, ${name}!</p>`",
        ))
        .stdout(predicate::str::contains("\n    Hello").not());
}

#[test]
fn it_requires_an_output_file_for_source_maps() {
    let dir = workspace();

    cli()
        .arg(dir.path().join("app.js"))
        .arg("--source-map")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn it_writes_output_and_source_map() {
    let dir = workspace();
    let output = dir.path().join("app.min.js");

    cli()
        .arg(dir.path().join("app.js"))
        .arg("-o")
        .arg(&output)
        .arg("--source-map")
        .assert()
        .success();

    let code = fs::read_to_string(&output).unwrap();
    assert!(code.contains("${name}"));
    assert!(code.ends_with("//# sourceMappingURL=app.min.js.map\n"));

    let map = fs::read_to_string(dir.path().join("app.min.js.map")).unwrap();
    assert!(map.contains("\"mappings\""));
    assert!(map.contains("app.js"));
}

#[test]
fn it_merges_the_input_source_map() {
    let dir = workspace();
    let output = dir.path().join("app.min.js");
    fs::write(
        dir.path().join("app.js.map"),
        r#"{"version":3,"sources":["app.ts"],"names":[],"mappings":"AAAA;AACA;AACA"}"#,
    )
    .unwrap();

    cli()
        .arg(dir.path().join("app.js"))
        .arg("-o")
        .arg(&output)
        .arg("-s")
        .arg("--input-source-map")
        .arg(dir.path().join("app.js.map"))
        .assert()
        .success();

    let map = fs::read_to_string(dir.path().join("app.min.js.map")).unwrap();
    assert!(map.contains("\"sources\":[\"app.ts\"]"));
}

#[test]
fn it_skips_the_map_without_source_map_flag() {
    let dir = workspace();
    let output = dir.path().join("app.min.js");

    cli()
        .arg(dir.path().join("app.js"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(!dir.path().join("app.min.js.map").exists());
    assert!(!fs::read_to_string(&output)
        .unwrap()
        .contains("sourceMappingURL"));
}

#[test]
fn it_applies_inline_options_over_the_config_file() {
    let dir = workspace();
    fs::write(
        dir.path().join("tags.js"),
        "const a = html`  <b>  </b>  `;\nconst b = svg`  <g>  </g>  `;\n",
    )
    .unwrap();
    fs::write(dir.path().join("config.json"), r#"{ "tags": ["html"] }"#).unwrap();

    cli()
        .arg(dir.path().join("tags.js"))
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("--options")
        .arg(r#"{ "tags": ["svg"] }"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("html`  <b>  </b>  `"))
        .stdout(predicate::str::contains("svg`  <g>").not());
}

#[test]
fn it_fails_on_syntax_errors() {
    let dir = workspace();
    fs::write(dir.path().join("broken.js"), "const = html`<p></p>`;").unwrap();

    cli()
        .arg(dir.path().join("broken.js"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("parse error"));
}

#[test]
fn it_fails_on_malformed_markup_in_strict_mode() {
    let dir = workspace();
    fs::write(dir.path().join("strict.js"), "html`<div><span>${x}</div>`;").unwrap();

    cli()
        .arg(dir.path().join("strict.js"))
        .assert()
        .success();

    cli()
        .arg(dir.path().join("strict.js"))
        .arg("--options")
        .arg(r#"{ "minifierOptions": { "strict": true } }"#)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid markup"));
}

#[test]
fn it_rejects_invalid_options() {
    let dir = workspace();

    cli()
        .arg(dir.path().join("app.js"))
        .arg("--options")
        .arg(r#"{ "silent": "yes" }"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --options"));
}

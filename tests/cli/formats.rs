use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

fn project() -> Result<CliTest> {
    let test = CliTest::with_file(
        "lib/util.js",
        "import Def, { a, b as c } from './x.js';\nimport * as ns from 'ns';\nexport { Def };\n",
    )?;
    test.write_file("lib/x.js", "export const a = 1, b = 2;\nexport default a;\n")?;
    Ok(test)
}

#[test]
fn test_es6_format() -> Result<()> {
    let test = project()?;
    let out = test.run(&["--format", "es6"])?;

    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stdout,
        "\
// lib/util.js
import { default as Def, a, b as c } from './x.js';
import * as ns from 'ns';
// lib/x.js
"
    );
    Ok(())
}

#[test]
fn test_cjs_format() -> Result<()> {
    let test = project()?;
    let out = test.run(&["--format", "cjs", "--no-follow"])?;

    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stdout,
        "\
// lib/util.js
const { default: Def, a, b: c } = require('./x.js');
const ns = require('ns');
"
    );
    Ok(())
}

#[test]
fn test_json_format() -> Result<()> {
    let test = project()?;
    let out = test.run(&["--format", "json"])?;

    assert_eq!(out.code, Some(0));
    let json: Value = serde_json::from_str(&out.stdout)?;
    let modules = json["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 2);

    let util = &modules[0];
    assert_eq!(util["path"], "lib/util.js");
    assert_eq!(util["status"], "done");
    assert_eq!(util["imports"][0]["kind"], "named");
    assert_eq!(util["imports"][0]["specifier"], "./x.js");
    assert_eq!(util["imports"][1]["bindings"], "ns");
    assert_eq!(util["exports"][0]["kind"], "named");
    assert_eq!(util["offsets"], serde_json::json!([0, 40, 41, 66]));
    assert_eq!(util["lengths"], serde_json::json!([40, 1, 25, 17]));
    assert!(json["issues"].as_array().unwrap().is_empty());
    Ok(())
}

#[test]
fn test_json_reports_issues() -> Result<()> {
    let test = CliTest::with_file("a.js", "import x from './missing.js';\n")?;
    let out = test.run(&["--format", "json", "a.js"])?;

    assert_eq!(out.code, Some(0));
    let json: Value = serde_json::from_str(&out.stdout)?;
    let issue = &json["issues"][0];
    assert_eq!(issue["severity"], "warning");
    assert_eq!(issue["rule"], "unresolved-specifier");
    assert_eq!(issue["file"], "a.js");
    assert_eq!(issue["line"], 1);
    Ok(())
}

use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

const UTIL: &str = "\
import * as std from 'std';
import { helper, other as alias } from './helper.js';

export function run() {
  return helper(std, alias);
}
";

const HELPER: &str = "\
import { run } from './util.js';
export const helper = (x) => `${x}`;
export const other = 1;
";

fn project() -> Result<CliTest> {
    let test = CliTest::with_file("lib/util.js", UTIL)?;
    test.write_file("lib/helper.js", HELPER)?;
    Ok(test)
}

#[test]
fn test_default_entry_follows_imports() -> Result<()> {
    let test = project()?;
    let out = test.run(&[])?;

    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stdout,
        "\
lib/util.js done  2 imports, 1 export, 4 segments
lib/helper.js done  1 import, 2 exports, 2 segments
\u{2713} Processed 2 files - no issues found
"
    );
    Ok(())
}

#[test]
fn test_no_follow_processes_only_entries() -> Result<()> {
    let test = project()?;
    let out = test.run(&["--no-follow", "lib/util.js"])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("lib/util.js done"));
    assert!(!out.stdout.contains("lib/helper.js"));
    Ok(())
}

#[test]
fn test_verbose_lists_records_and_segments() -> Result<()> {
    let test = project()?;
    let out = test.run(&["-v", "--no-follow", "lib/util.js"])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("import 1:1"));
    assert!(out.stdout.contains("namespace"));
    assert!(out.stdout.contains("[helper, alias]"));
    assert!(out.stdout.contains("export 4:1"));
    assert!(out.stdout.contains("segment import      0..27"));
    assert!(!out.stdout.contains("took"));
    Ok(())
}

#[test]
fn test_missing_entry_fails() -> Result<()> {
    let test = CliTest::new()?;
    let out = test.run(&[])?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("FAIL: Failed to process lib/util.js"));
    assert!(out.stdout.contains("caused by: Failed to read file: lib/util.js"));
    Ok(())
}

#[test]
fn test_balance_mismatch_aborts_the_run() -> Result<()> {
    let test = CliTest::with_file(
        "a.js",
        "import b from './b.js';\nimport c from './c.js';\n",
    )?;
    test.write_file("b.js", "const list = [1, 2);\n")?;
    test.write_file("c.js", "export default 3;\n")?;

    let out = test.run(&["a.js"])?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("c.js pending"));
    assert!(out.stdout.contains("error: found ')' where ']' was expected  balance-mismatch"));
    assert!(out.stdout.contains("  --> b.js:1:19"));
    assert!(out.stdout.contains("FAIL: Failed to process b.js"));
    assert!(out.stdout.contains("caused by: unbalanced ')' at 1:19: expected ']' [ '[' ]"));
    Ok(())
}

#[test]
fn test_keep_going_skips_the_file() -> Result<()> {
    let test = CliTest::with_file(
        "a.js",
        "import b from './b.js';\nimport c from './c.js';\n",
    )?;
    test.write_file("b.js", "const list = [1, 2);\n")?;
    test.write_file("c.js", "export default 3;\n")?;

    let out = test.run(&["--keep-going", "a.js"])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("b.js failed"));
    assert!(out.stdout.contains("c.js done"));
    assert!(out.stdout.contains("1 problems (1 error, 0 warnings)"));
    assert!(!out.stdout.contains("FAIL"));
    Ok(())
}

#[test]
fn test_config_policy_skip_file() -> Result<()> {
    let test = CliTest::with_file("main.js", "import b from './b.js';\n")?;
    test.write_file("b.js", "}\n")?;
    test.write_file(
        ".modsplitrc.json",
        r#"{ "entry": "main.js", "onBalanceMismatch": "skipFile" }"#,
    )?;

    let out = test.run(&[])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("main.js done"));
    assert!(out.stdout.contains("b.js failed"));
    Ok(())
}

#[test]
fn test_unresolved_specifier_is_a_warning() -> Result<()> {
    let test = CliTest::with_file("a.js", "import gone from './gone.js';\n")?;
    let out = test.run(&["a.js"])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("warning: cannot resolve './gone.js'  unresolved-specifier"));
    assert!(out.stdout.contains("= note: no file at gone.js"));
    Ok(())
}

#[test]
fn test_lex_error_does_not_change_exit_status() -> Result<()> {
    let test = CliTest::with_file("a.js", "const s = 'open\n")?;
    let out = test.run(&["a.js"])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("a.js failed"));
    assert!(out.stdout.contains("error: unterminated string literal  lex-error"));
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let test = CliTest::with_file(".modsplitrc.json", r#"{ "extractable": "(" }"#)?;
    let out = test.run(&[])?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("FAIL: Invalid regular expression in 'extractable'"));
    Ok(())
}

#[test]
fn test_trace_goes_to_stderr() -> Result<()> {
    let test = CliTest::with_file("a.js", "let t = `x${1}`;\n")?;
    let out = test.run(&["-x", "a.js"])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stderr.contains("a.js: JS(0)"));
    assert!(out.stderr.contains("TEMPLATE(1)"));
    assert!(out.stderr.contains("JS(2)"));
    assert!(!out.stdout.contains("tok["));
    Ok(())
}

#[test]
fn test_c_sources() -> Result<()> {
    let test = CliTest::with_file(
        "src/main.c",
        "#include <stdio.h>\nint main(void) {\n  return 0;\n}\n",
    )?;
    let out = test.run(&["src/main.c"])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("src/main.c done  0 imports, 0 exports, 1 segment"));
    Ok(())
}

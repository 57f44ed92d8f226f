use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;
    let out = test.run(&["--init"])?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Created .modsplitrc.json"));
    assert!(test.root().join(".modsplitrc.json").exists());

    let content = test.read_file(".modsplitrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["entry"], "lib/util.js");
    assert_eq!(parsed["followImports"], true);
    assert_eq!(parsed["onBalanceMismatch"], "abortRun");
    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".modsplitrc.json", "{}")?;
    let out = test.run(&["--init"])?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("FAIL: .modsplitrc.json already exists"));
    assert_eq!(test.read_file(".modsplitrc.json")?, "{}");
    Ok(())
}

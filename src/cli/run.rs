use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};

use super::{args::Arguments, trace::TokenTracer};
use crate::config::{CONFIG_FILE_NAME, ConfigLoadResult, default_config_json, load_config};
use crate::core::{
    BalancePolicy, FileModule, FsProvider, NoTrace, RunContext, RunOptions, SourceProvider,
};
use crate::issues::Issue;

/// Everything a finished (or aborted) run produced.
pub struct RunReport {
    /// Modules in worklist order, including those never reached.
    pub modules: Vec<FileModule>,
    pub issues: Vec<Issue>,
    /// Error that stopped the run early.
    pub error: Option<anyhow::Error>,
    pub elapsed: Duration,
}

pub enum RunOutcome {
    /// `--init` wrote a configuration file.
    Init,
    Run(RunReport),
}

pub fn run(args: &Arguments) -> Result<RunOutcome> {
    if args.init {
        init()?;
        return Ok(RunOutcome::Init);
    }

    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let ConfigLoadResult { config, .. } = load_config(&cwd)?;
    let options = apply_overrides(RunOptions::from_config(&config)?, args);

    let entries = if args.files.is_empty() {
        vec![PathBuf::from(&config.entry)]
    } else {
        args.files.clone()
    };

    Ok(RunOutcome::Run(process(&FsProvider, options, &entries, args.trace)))
}

fn apply_overrides(mut options: RunOptions, args: &Arguments) -> RunOptions {
    if let Some(lang) = args.lang {
        options.language = Some(lang);
    }
    if args.keep_going {
        options.balance_policy = BalancePolicy::SkipFile;
    }
    if args.no_follow {
        options.follow_imports = false;
    }
    options
}

fn process(
    provider: &dyn SourceProvider,
    options: RunOptions,
    entries: &[PathBuf],
    trace: bool,
) -> RunReport {
    let started = Instant::now();
    let mut ctx = RunContext::new(provider, options);
    for entry in entries {
        ctx.add_entry(entry);
    }

    let result = if trace {
        let mut tracer = TokenTracer::new(io::stderr().lock());
        ctx.run(&mut tracer)
    } else {
        ctx.run(&mut NoTrace)
    };

    let (modules, issues) = ctx.into_parts();
    RunReport {
        modules,
        issues,
        error: result.err(),
        elapsed: started.elapsed(),
    }
}

fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
    Ok(())
}

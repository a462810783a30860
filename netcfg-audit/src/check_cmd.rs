use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use netcfg_audit::inventory::{Inventory, TerminalPrompt};
use netcfg_audit::provider::{list_config_files, DeviceProvider, FileProvider};
use netcfg_audit::report::render_run;
use netcfg_audit::sink::TracingSink;
use netcfg_audit::ssh::SshConnector;
use netcfg_audit_core::{
    evaluate_run, format_json, load_file, summarize, CompiledBaseline, EvalOptions, RunResult,
    TargetSource,
};
use tracing::info;

use crate::cli::{CheckArgs, OfflineArgs, OnlineArgs, OutputFormat};

fn load_baseline(path: &Path) -> Result<CompiledBaseline> {
    load_file(path).with_context(|| format!("failed to load baseline {}", path.display()))
}

pub fn run_offline(args: OfflineArgs) -> Result<()> {
    let baseline = load_baseline(&args.check.baseline)?;
    let targets = list_config_files(&args.directory)?;
    if let Some(report) = &args.check.report {
        check_report_target(
            report,
            &[("baseline", &args.check.baseline)],
            Some(args.directory.as_path()),
        )?;
    }
    info!(
        "Checking {} configuration file(s) in {}",
        targets.len(),
        args.directory.display()
    );

    let mut provider = FileProvider::new(&args.directory);
    let run = evaluate_run(
        TargetSource::File,
        targets,
        &mut provider,
        &baseline,
        eval_options(&args.check),
        &mut TracingSink,
    );
    finish(&run, &args.check)
}

pub fn run_online(args: OnlineArgs) -> Result<()> {
    let baseline = load_baseline(&args.check.baseline)?;
    let mut inventory = Inventory::load(&args.connections)
        .with_context(|| format!("failed to load inventory {}", args.connections.display()))?;
    if let Some(report) = &args.check.report {
        check_report_target(
            report,
            &[
                ("baseline", &args.check.baseline),
                ("inventory", &args.connections),
            ],
            None,
        )?;
    }
    inventory
        .resolve_prompts(&mut TerminalPrompt)
        .context("failed to read credentials")?;

    for (name, _) in inventory.disabled_devices() {
        info!("Skipping {name}: disabled in inventory");
    }
    let targets: Vec<String> = inventory
        .enabled_devices()
        .map(|(name, _)| name.to_string())
        .collect();

    let mut provider = DeviceProvider::new(&inventory, SshConnector::default());
    let run = evaluate_run(
        TargetSource::Device,
        targets,
        &mut provider,
        &baseline,
        eval_options(&args.check),
        &mut TracingSink,
    );
    finish(&run, &args.check)
}

fn eval_options(args: &CheckArgs) -> EvalOptions {
    EvalOptions {
        failed_only: args.failed_only,
    }
}

/// Absolute location the report would land on. The directory must exist;
/// the file itself may not.
fn resolve_report_path(report: &Path) -> Result<PathBuf> {
    if report.exists() {
        return report
            .canonicalize()
            .with_context(|| format!("failed to resolve report path {}", report.display()));
    }
    let file_name = report
        .file_name()
        .with_context(|| format!("report path {} has no file name", report.display()))?;
    let dir = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = dir
        .canonicalize()
        .with_context(|| format!("report directory {} does not exist", dir.display()))?;
    Ok(dir.join(file_name))
}

/// Reject a report path that would clobber an input file, or that sits in
/// the offline config directory where the next run would treat it as a
/// device configuration.
fn check_report_target(
    report: &Path,
    inputs: &[(&str, &PathBuf)],
    config_dir: Option<&Path>,
) -> Result<()> {
    let target = resolve_report_path(report)?;

    for (role, input) in inputs {
        let input = input
            .canonicalize()
            .with_context(|| format!("failed to resolve {role} path {}", input.display()))?;
        if target == input {
            bail!(
                "refusing to overwrite {role} file {} with the report",
                input.display()
            );
        }
    }

    if let Some(dir) = config_dir {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("failed to resolve config directory {}", dir.display()))?;
        if target.parent() == Some(dir.as_path()) {
            bail!(
                "refusing to write report {} into config directory {}: it would be checked as a device on the next run",
                report.display(),
                dir.display()
            );
        }
    }
    Ok(())
}

fn finish(run: &RunResult, args: &CheckArgs) -> Result<()> {
    if let Some(report) = &args.report {
        fs::write(report, format_json(run))
            .with_context(|| format!("failed to write report {}", report.display()))?;
        info!("Report written to {}", report.display());
    }

    if args.print {
        match args.format {
            OutputFormat::Text => {
                println!("{}", render_run(run, std::io::stdout().is_terminal()))
            }
            OutputFormat::Json => println!("{}", format_json(run)),
        }
    }

    let summary = summarize(run);
    info!(
        targets = summary.targets,
        evaluated = summary.evaluated,
        errors = summary.errors,
        passed = summary.passed,
        failed = summary.failed,
        "run finished"
    );

    if args.strict && !summary.is_clean() {
        bail!(
            "strict mode failed: {} failed checks, {} targets not evaluated",
            summary.failed,
            summary.errors
        );
    }
    Ok(())
}

//! QA smoke-check CLI.
//!
//! Verifies `project.json` / `events.json` pairs against the core's
//! invariants. Exit code 1 on any critical finding, 0 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use neuroscreencaster::qa::{discover_projects, run_smoke_check, Severity, SmokeReport};

#[derive(Parser, Debug)]
#[command(name = "nsc-check", about = "Smoke-check NeuroScreenCaster projects")]
struct Args {
    /// Path to a project.json or a project folder.
    #[arg(long)]
    project: Option<PathBuf>,

    /// Root folder containing project folders; every project under it is
    /// checked.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Also verify the export settings.
    #[arg(long)]
    check_export: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let targets: Vec<PathBuf> = match (&args.project, &args.root) {
        (Some(project), _) => vec![project.clone()],
        (None, Some(root)) => match discover_projects(root) {
            Ok(found) if found.is_empty() => {
                eprintln!("no projects under {}", root.display());
                return ExitCode::FAILURE;
            }
            Ok(found) => found,
            Err(err) => {
                eprintln!("cannot scan {}: {err}", root.display());
                return ExitCode::FAILURE;
            }
        },
        (None, None) => {
            eprintln!("pass --project <path> or --root <projectsRoot>");
            return ExitCode::FAILURE;
        }
    };

    let mut all_passed = true;
    for target in targets {
        match run_smoke_check(&target, args.check_export) {
            Ok(report) => {
                print_report(&report);
                all_passed &= report.passed();
            }
            Err(err) => {
                eprintln!("FAIL {}: {err}", target.display());
                all_passed = false;
            }
        }
    }

    if all_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_report(report: &SmokeReport) {
    let verdict = if report.passed() { "OK" } else { "FAIL" };
    println!("{verdict} {}", report.project_file.display());
    for finding in &report.findings {
        let tag = match finding.severity {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
        };
        println!("  [{tag}] {}: {}", finding.check, finding.message);
    }
}

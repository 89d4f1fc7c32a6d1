//! scenario-cli: run the signal classification or findings pipeline over JSON snapshots.
//!
//! Usage:
//!   scenario-cli classify <current.json> <baseline.json>
//!   scenario-cli findings <analysis.json> [--baseline <analysis.json>]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use narrative_client::{NarrativeConfig, NarrativeEnhancer};
use scenario_core::{MetricSnapshot, NarrativeBlock, SystemAnalysisSnapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use signal_engine::{classify, extract_findings, render_findings, render_report, ClassificationReport};

const USAGE: &str = "Usage:
  scenario-cli classify <current.json> <baseline.json>
  scenario-cli findings <analysis.json> [--baseline <analysis.json>]";

#[derive(Debug, PartialEq)]
enum Command {
    Classify { current: PathBuf, baseline: PathBuf },
    Findings { analysis: PathBuf, baseline: Option<PathBuf> },
}

fn parse_args(args: &[String]) -> Option<Command> {
    let (name, rest) = args.split_first()?;
    match name.as_str() {
        "classify" => match rest {
            [current, baseline] => Some(Command::Classify {
                current: PathBuf::from(current),
                baseline: PathBuf::from(baseline),
            }),
            _ => None,
        },
        "findings" => match rest {
            [analysis] => Some(Command::Findings {
                analysis: PathBuf::from(analysis),
                baseline: None,
            }),
            [analysis, flag, baseline] if flag == "--baseline" => Some(Command::Findings {
                analysis: PathBuf::from(analysis),
                baseline: Some(PathBuf::from(baseline)),
            }),
            _ => None,
        },
        _ => None,
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[derive(Serialize)]
struct ClassifyOutput {
    report: ClassificationReport,
    narrative: Vec<NarrativeBlock>,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("scenario_cli=info,signal_engine=info,narrative_client=info")
    });
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout carries the JSON result
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };

    match command {
        Command::Classify { current, baseline } => {
            let current: MetricSnapshot = load_json(&current)?;
            let baseline: MetricSnapshot = load_json(&baseline)?;

            let report = classify(&current, &baseline);
            tracing::info!(
                state = ?report.system_state,
                risks = report.risks.len(),
                questions = report.strategic_questions.len(),
                "Classification complete"
            );
            let narrative = render_report(&report);
            println!("{}", serde_json::to_string_pretty(&ClassifyOutput { report, narrative })?);
        }
        Command::Findings { analysis, baseline } => {
            let current: SystemAnalysisSnapshot = load_json(&analysis)?;
            let baseline: Option<SystemAnalysisSnapshot> =
                baseline.as_deref().map(load_json::<SystemAnalysisSnapshot>).transpose()?;

            let findings = extract_findings(&current);
            tracing::info!(findings = findings.len(), "Findings extracted");

            let enhancer = NarrativeEnhancer::from_config(&NarrativeConfig::from_env());
            let output = enhancer
                .enhance(render_findings(&findings), &current, baseline.as_ref())
                .await;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

//! CLI entry point for cuiscope.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `cuiscope-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use cuiscope_app::{
    AssessInput, AssessmentReport, CatalogSource, ChainProvider, EXIT_ERROR, ExplainOutput,
    InteractiveProvider, ReplayProvider, describe_catalog, error_exit_code, export_answers,
    load_catalog, parse_answers_json, parse_report_json, prompt_subject, render_markdown,
    render_summary, resolve_settings, run_assess, run_explain, serialize_answer_file,
    serialize_report,
};
use cuiscope_domain::Catalog;
use cuiscope_settings::Overrides;
use cuiscope_types::Subject;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(
    name = "cuiscope",
    version,
    about = "CMMC / NIST SP 800-171 scoping questionnaire and control mapping"
)]
struct Cli {
    /// Path to cuiscope config TOML (missing file = defaults).
    #[arg(long, default_value = "cuiscope.toml")]
    config: Utf8PathBuf,

    /// Override boundary profile (catalog|conservative|lenient).
    #[arg(long)]
    profile: Option<String>,

    /// Use a catalog TOML file instead of the built-in catalog.
    #[arg(long)]
    catalog: Option<Utf8PathBuf>,

    /// Log debug events to stderr.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

/// Assessment subject overrides.
#[derive(Args, Clone, Debug, Default)]
struct SubjectArgs {
    /// Organization being assessed.
    #[arg(long)]
    organization: Option<String>,
    /// Person completing the assessment.
    #[arg(long)]
    assessor: Option<String>,
    /// CAGE code of the organization.
    #[arg(long)]
    cage_code: Option<String>,
    /// Primary DoD contract reference.
    #[arg(long)]
    contract: Option<String>,
}

impl SubjectArgs {
    fn into_subject(self) -> Subject {
        Subject {
            organization: self.organization,
            assessor: self.assessor,
            cage_code: self.cage_code,
            contract_ref: self.contract,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scoping questionnaire and write the assessment report.
    Assess {
        /// Replay an answer file (or saved report) without prompting.
        #[arg(long, conflicts_with = "resume")]
        answers: Option<Utf8PathBuf>,

        /// Replay an answer file, then continue interactively.
        #[arg(long)]
        resume: Option<Utf8PathBuf>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/cuiscope/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/cuiscope/report.md")]
        markdown_out: Utf8PathBuf,

        #[command(flatten)]
        subject: SubjectArgs,
    },

    /// Render Markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/cuiscope/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Print the terminal summary of an existing JSON report.
    Summary {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/cuiscope/report.json")]
        report: Utf8PathBuf,
    },

    /// Explain a control with remediation guidance.
    Explain {
        /// The control id to explain (e.g. "IA.3.083").
        control_id: String,
    },

    /// Load and validate the active catalog.
    Catalog {
        /// Also list every question.
        #[arg(long)]
        list: bool,
    },

    /// Export the answers of a saved report as an answer file.
    Answers {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/cuiscope/report.json")]
        report: Utf8PathBuf,

        /// Where to write the answer file (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.cmd {
        Commands::Assess {
            ref answers,
            ref resume,
            ref report_out,
            write_markdown,
            ref markdown_out,
            ref subject,
        } => cmd_assess(
            &cli,
            answers.clone(),
            resume.clone(),
            report_out.clone(),
            write_markdown,
            markdown_out.clone(),
            subject.clone().into_subject(),
        ),
        Commands::Md { ref report, ref output } => cmd_md(report, output.as_deref()),
        Commands::Summary { ref report } => cmd_summary(report),
        Commands::Explain { ref control_id } => cmd_explain(&cli, control_id),
        Commands::Catalog { list } => cmd_catalog(&cli, list),
        Commands::Answers { ref report, ref output } => cmd_answers(report, output.as_deref()),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CUISCOPE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries the prompt and rendered output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Resolve config and CLI overrides, then load the active catalog.
fn load_settings(cli: &Cli, subject: Subject) -> anyhow::Result<(Catalog, CatalogSource, Subject)> {
    // Missing config file is allowed (defaults apply).
    let cfg_text = if cli.config.exists() {
        std::fs::read_to_string(&cli.config)
            .with_context(|| format!("read config: {}", cli.config))?
    } else {
        String::new()
    };

    // A config catalog path is relative to the config file; a CLI one to the
    // working directory.
    let catalog = match &cli.catalog {
        Some(path) if path.is_relative() => Some(current_dir()?.join(path).into_string()),
        Some(path) => Some(path.to_string()),
        None => None,
    };

    let overrides = Overrides {
        profile: cli.profile.clone(),
        catalog,
        subject,
    };
    let resolved = resolve_settings(&cfg_text, overrides)?;

    let base_dir = match cli.config.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };
    let (catalog, source) = load_catalog(&resolved, &base_dir)?;
    Ok((catalog, source, resolved.subject))
}

fn current_dir() -> anyhow::Result<Utf8PathBuf> {
    let dir = std::env::current_dir().context("read working directory")?;
    Utf8PathBuf::try_from(dir).context("working directory is not UTF-8")
}

fn cmd_assess(
    cli: &Cli,
    answers: Option<Utf8PathBuf>,
    resume: Option<Utf8PathBuf>,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
    subject: Subject,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<AssessmentReport> {
        let (catalog, _source, subject) = load_settings(cli, subject)?;

        let output = if let Some(path) = &answers {
            let mut provider = ReplayProvider::new(read_answer_file(path)?);
            let output = run_assess(
                AssessInput {
                    catalog: &catalog,
                    subject,
                },
                &mut provider,
            )?;
            warn_unused(&catalog, &provider);
            output
        } else {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut stdout = io::stdout();
            let subject =
                prompt_subject(&mut input, &mut stdout, subject).context("read subject")?;
            let interactive = InteractiveProvider::new(input, stdout);

            let input = AssessInput {
                catalog: &catalog,
                subject,
            };
            match &resume {
                Some(path) => {
                    let saved = ReplayProvider::new(read_answer_file(path)?);
                    run_assess(input, ChainProvider::new(saved, interactive))?
                }
                None => run_assess(input, interactive)?,
            }
        };

        write_bytes_file(&report_out, &serialize_report(&output.report)?)
            .context("write report json")?;
        if write_markdown {
            let md = render_markdown(&output.report);
            write_bytes_file(&markdown_out, md.as_bytes()).context("write markdown")?;
        }
        Ok(output.report)
    })();

    match result {
        Ok(report) => {
            let mut stdout = io::stdout();
            writeln!(stdout)?;
            write!(stdout, "{}", render_summary(&report))?;
            eprintln!("cuiscope: report written to {report_out}");
            Ok(())
        }
        Err(err) => {
            eprintln!("cuiscope error: {err:#}");
            std::process::exit(error_exit_code(&err));
        }
    }
}

fn read_answer_file(path: &Utf8Path) -> anyhow::Result<cuiscope_app::AnswerFile> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read answers: {path}"))?;
    parse_answers_json(&text).with_context(|| format!("parse answers: {path}"))
}

fn warn_unused(catalog: &Catalog, provider: &ReplayProvider) {
    for id in provider.unused() {
        if catalog.questions().question(id).is_none() {
            tracing::warn!(question = id, "answer file names an unknown question");
        } else {
            tracing::debug!(question = id, "answer not used (question skipped)");
        }
    }
}

fn read_report(path: &Utf8Path) -> anyhow::Result<AssessmentReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn write_bytes_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write file: {path}"))?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_bytes_file(out_path, md.as_bytes()).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_summary(report_path: &Utf8Path) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    print!("{}", render_summary(&report));
    Ok(())
}

fn cmd_answers(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let data = serialize_answer_file(&export_answers(&report))?;

    if let Some(out_path) = output {
        write_bytes_file(out_path, &data).context("write answer file")?;
    } else {
        io::stdout().write_all(&data)?;
    }

    Ok(())
}

fn cmd_explain(cli: &Cli, control_id: &str) -> anyhow::Result<()> {
    let (catalog, _, _) = load_settings(cli, Subject::default())?;
    match run_explain(control_id, &catalog) {
        ExplainOutput::Found {
            explanation,
            questions,
        } => {
            print!(
                "{}",
                cuiscope_app::format_explanation(&explanation, &questions)
            );
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_control_ids,
        } => {
            eprint!(
                "{}",
                cuiscope_app::format_not_found(&identifier, available_control_ids)
            );
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn cmd_catalog(cli: &Cli, list: bool) -> anyhow::Result<()> {
    let (catalog, source, _) = load_settings(cli, Subject::default())?;
    print!("{}", describe_catalog(&catalog, &source, list));
    Ok(())
}

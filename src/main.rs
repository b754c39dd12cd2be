//! packstat command-line entry point.

mod cli;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Command, ConvertArgs, GenerateArgs};
use packstat::analysis::Analyzer;
use packstat::config::AnalysisConfig;
use packstat::generator::TaskGenerator;
use packstat::series::JsonFigureWriter;
use packstat::task::write_task_stream;
use packstat::trace::TraceParser;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Convert(args) => convert(&args),
        Command::Analyze(args) => analyze(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries task streams and reports.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn emit(tasks: impl IntoIterator<Item = packstat::Task>) -> anyhow::Result<usize> {
    let stdout = io::stdout();
    let written = write_task_stream(BufWriter::new(stdout.lock()), tasks)
        .context("failed to write task stream")?;
    Ok(written)
}

fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let mut generator = TaskGenerator::new(args.count, args.universe)?;
    if let Some(seed) = args.seed {
        generator = generator.with_seed(seed);
    }
    emit(generator.stream())?;
    Ok(())
}

fn convert(args: &ConvertArgs) -> anyhow::Result<()> {
    if let Some(values) = &args.synthetic {
        let (count, universe, seed) = match values.as_slice() {
            [m, n] => (*m, *n, None),
            [m, n, seed] => (*m, *n, Some(*seed)),
            _ => bail!("--synthetic takes M N [SEED]"),
        };
        let count = usize::try_from(count).context("M does not fit in memory")?;
        let universe = u32::try_from(universe).context("N must fit in 32 bits")?;
        let mut generator = TaskGenerator::new(count, universe)?;
        if let Some(seed) = seed {
            generator = generator.with_seed(seed);
        }
        emit(generator.stream())?;
        return Ok(());
    }

    let Some(path) = &args.path else {
        bail!("a log file or --synthetic M N [SEED] is required");
    };
    let parser = TraceParser::new().with_duration_cap(args.max_duration)?;
    let conversion = parser
        .convert_file(path, args.max_count)
        .with_context(|| format!("failed to convert {}", path.display()))?;
    emit(conversion.into_tasks())?;
    Ok(())
}

fn analyze(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = &args.results_dir {
        config.results_dir.clone_from(dir);
    }
    if let Some(dir) = &args.plots_dir {
        config.plots_dir.clone_from(dir);
    }
    config.pool_workloads |= args.pool;
    config.validate()?;

    let analyzer = Analyzer::new(config);
    let report = analyzer.run()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write!(out, "{report}")?;
    }

    if !args.no_plots {
        let mut writer = JsonFigureWriter::new(&analyzer.config().plots_dir);
        let rendered = analyzer.render(&report, &mut writer)?;
        if !args.json {
            for path in writer.written() {
                writeln!(out, "Figure saved: {}", path.display())?;
            }
        }
        tracing::debug!(rendered, "figures rendered");
    }
    Ok(())
}

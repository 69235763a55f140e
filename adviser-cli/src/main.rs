mod cache;
mod config;

use adviser_catalog::{Catalog, Filter, LoadedAdvice, Registry};
use adviser_core::{RunSettings, Runner, ShellGit};
use adviser_render::{render_list, render_results, render_selftest, render_show};
use adviser_selftest::run_selftest;
use adviser_types::{Confidence, Mode, RunReport, ToolInfo, exit};
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand};
use config::{CliOverrides, ConfigMerger, MergedConfig};
use fs_err as fs;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "adviser",
    version,
    about = "Applies named, confidence-rated automated fixes to Python codebases, \
             one git branch per fix."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, clap::Args)]
struct GlobalArgs {
    /// Directory holding the advice collection.
    #[arg(long, global = true, env = "ADVICE_DIR", value_name = "DIR")]
    advice_dir: Option<Utf8PathBuf>,

    /// Git URL of an advice repository, cached under the user cache dir.
    #[arg(long, global = true, env = "ADVICE_URL", value_name = "URL")]
    advice_url: Option<String>,

    /// Use the cached advice checkout without pulling.
    #[arg(long, global = true)]
    skip_update: bool,

    /// Minimum confidence: unset, red, yellow or green.
    #[arg(long, global = true, value_name = "LEVEL")]
    confidence: Option<Confidence>,

    /// Include preview advice.
    #[arg(long, global = true)]
    preview: bool,

    /// Repository to work on.
    #[arg(long, global = true, default_value = ".")]
    target: Utf8PathBuf,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// More logging (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the advice the current filter admits.
    List,
    /// Report which advice would change the target.
    Check(SelectArgs),
    /// Show the changes each advice would make.
    Diff(SelectArgs),
    /// Commit each advice's changes to its own branch and push it.
    Apply(ApplyArgs),
    /// Run advice against their before/after fixtures.
    SelfTest(SelfTestArgs),
    /// Describe one advice.
    Show(ShowArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, clap::Args)]
#[group(required = true, multiple = false)]
struct SelectArgs {
    /// Advice to run. A name also selects everything nested under it.
    names: Vec<String>,

    /// Run every advice the filter admits.
    #[arg(short, long)]
    all: bool,
}

#[derive(Debug, clap::Args)]
struct ApplyArgs {
    #[command(flatten)]
    select: SelectArgs,

    /// Edit the target's own working tree instead of pushing branches.
    #[arg(long, conflicts_with = "dry_run")]
    inplace: bool,

    /// Show the diff instead of committing.
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[derive(Debug, clap::Args)]
struct SelfTestArgs {
    /// Advice to test (default: every advice with a fixture).
    names: Vec<String>,
}

#[derive(Debug, clap::Args)]
struct ShowArgs {
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match real_main(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(exit::FAILURE)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolved per-invocation state shared by the subcommands.
struct App {
    target: Utf8PathBuf,
    format: OutputFormat,
    config: MergedConfig,
}

impl App {
    fn new(global: GlobalArgs) -> anyhow::Result<Self> {
        let target = canonical(&global.target)?;
        let (file_config, config_file) = config::load_or_default(&target)?;
        let config = ConfigMerger::new(file_config)
            .with_config_file(config_file)
            .merge(CliOverrides {
                advice_dir: global.advice_dir,
                advice_url: global.advice_url,
                skip_update: global.skip_update,
                confidence: global.confidence,
                preview: global.preview,
            });
        debug!(?config, "effective configuration");
        Ok(Self {
            target,
            format: global.format,
            config,
        })
    }

    fn advice_root(&self) -> anyhow::Result<Utf8PathBuf> {
        if let Some(dir) = &self.config.advice_dir {
            return Ok(dir.clone());
        }
        if let Some(url) = &self.config.advice_url {
            return cache::update_checkout(url, self.config.skip_update);
        }
        bail!(
            "no advice source configured: pass --advice-dir or --advice-url, \
             set ADVICE_DIR or ADVICE_URL, or add [advice] to {}",
            config::CONFIG_FILE_NAME
        )
    }

    fn load_catalog(&self) -> anyhow::Result<Catalog> {
        let root = self.advice_root()?;
        let catalog = Catalog::load(&root, &Registry::builtin())
            .with_context(|| format!("load advice from {}", root))?;
        info!(root = %root, count = catalog.len(), "loaded advice");
        Ok(catalog)
    }

    fn base_filter(&self) -> Filter {
        Filter::new(self.config.confidence, self.config.preview)
    }

    fn settings(&self, mode: Mode) -> RunSettings {
        RunSettings {
            remote: self.config.remote.clone(),
            branch_prefix: self.config.branch_prefix.clone(),
            ..RunSettings::new(mode)
        }
    }
}

fn canonical(path: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
    let abs = fs::canonicalize(path).with_context(|| format!("resolve target {}", path))?;
    Utf8PathBuf::from_path_buf(abs)
        .map_err(|p| anyhow::anyhow!("target path is not UTF-8: {}", p.display()))
}

fn real_main(cli: Cli) -> anyhow::Result<u8> {
    let app = App::new(cli.global)?;
    match cli.cmd {
        Command::List => cmd_list(&app),
        Command::Check(select) => cmd_run(&app, &select, Mode::Check, false),
        Command::Diff(select) => cmd_run(&app, &select, Mode::Diff, false),
        Command::Apply(args) => {
            let mode = if args.dry_run { Mode::Diff } else { Mode::Apply };
            cmd_run(&app, &args.select, mode, args.inplace)
        }
        Command::SelfTest(args) => cmd_self_test(&app, args),
        Command::Show(args) => cmd_show(&app, args),
        Command::Config => cmd_config(&app),
    }
}

fn cmd_list(app: &App) -> anyhow::Result<u8> {
    let catalog = app.load_catalog()?;
    let mut filter = app.base_filter();
    filter.include_manual = true;
    let advices = catalog.order(&filter);

    match app.format {
        OutputFormat::Text => print!("{}", render_list(&advices)),
        OutputFormat::Json => {
            let list: Vec<_> = advices.iter().map(|a| advice_json(a)).collect();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }
    Ok(exit::OK)
}

fn cmd_run(app: &App, select: &SelectArgs, mode: Mode, inplace: bool) -> anyhow::Result<u8> {
    let catalog = app.load_catalog()?;
    let filter = app
        .base_filter()
        .with_names(&select.names)
        .context("invalid advice name")?;

    let tool = ToolInfo {
        name: "adviser".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };
    let report = RunReport::new(tool, mode, app.target.as_str());

    let results = if catalog.order(&filter).is_empty() {
        info!("no advice matched the filter");
        Default::default()
    } else {
        let settings = if inplace {
            app.settings(mode).in_place()
        } else {
            app.settings(mode)
        };
        let git = ShellGit::new();
        let runner = Runner::new(&catalog, settings, &git)?;
        runner.run(&app.target, &filter)?
    };
    let report = report.finish(results);

    match app.format {
        OutputFormat::Text => print!("{}", render_results(&report.results, mode)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.is_failure() {
        exit::FAILURE
    } else {
        exit::OK
    })
}

fn cmd_self_test(app: &App, args: SelfTestArgs) -> anyhow::Result<u8> {
    let catalog = app.load_catalog()?;
    let filter = Filter::all()
        .with_names(&args.names)
        .context("invalid advice name")?;
    let summary = run_selftest(&catalog, &filter);

    match app.format {
        OutputFormat::Text => print!("{}", render_selftest(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(summary.exit_status())
}

fn cmd_show(app: &App, args: ShowArgs) -> anyhow::Result<u8> {
    let catalog = app.load_catalog()?;
    let Some(advice) = catalog.get(&args.name) else {
        bail!("no advice named '{}' in {}", args.name, catalog.root());
    };

    match app.format {
        OutputFormat::Text => print!("{}", render_show(advice)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&advice_json(advice))?),
    }
    Ok(exit::OK)
}

fn cmd_config(app: &App) -> anyhow::Result<u8> {
    // Reports where advice would come from without cloning or pulling.
    let advice_path = match (&app.config.advice_dir, &app.config.advice_url) {
        (Some(dir), _) => Some(dir.clone()),
        (None, Some(url)) => Some(cache::checkout_path(url)?),
        (None, None) => None,
    };
    let value = serde_json::json!({
        "target": app.target,
        "advice_path": advice_path,
        "config": app.config,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(exit::OK)
}

fn advice_json(advice: &LoadedAdvice) -> serde_json::Value {
    let meta = advice.meta();
    serde_json::json!({
        "name": advice.name(),
        "kind": advice.kind(),
        "confidence": meta.confidence,
        "preview": meta.preview,
        "manual": meta.manual,
        "order": meta.order,
        "description": meta.description,
        "directory": advice.dir(),
        "has_fixture": advice.has_fixture(),
    })
}

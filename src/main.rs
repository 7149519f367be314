//! Codecatcher CLI - HTML and CSS Code Quality Analyzer
//!
//! Analyzes one markup file and one stylesheet and reports accessibility,
//! correctness and style issues.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codecatcher::config::{CliOverrides, ColorMode, Config, OutputFormat};
use codecatcher::engine::Engine;
use codecatcher::output::{formatter_for, OutputFormatter};
use codecatcher::rule::{all_rules, find_rule, RuleInfo, RuleScope};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "codecatcher",
    version,
    about = "HTML and CSS code quality analyzer",
    long_about = "Checks a markup document and a stylesheet for accessibility, correctness and style issues."
)]
struct Cli {
    /// Markup file to analyze
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Stylesheet file to analyze
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Run the markup and stylesheet analyzers one after the other
    #[arg(long)]
    sequential: bool,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Select rules by prefix (e.g., 'html-' selects all markup rules)
    #[arg(long, value_delimiter = ',')]
    extend: Option<Vec<String>>,

    /// Ignore rules by prefix (e.g., 'css-' ignores all stylesheet rules)
    #[arg(long, value_delimiter = ',')]
    ignore: Option<Vec<String>>,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show detailed information about a rule
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Print a rule in a consistent format
fn print_rule(rule: &RuleInfo) {
    println!("    {} ({})", rule.id.cyan(), rule.category);
    println!("      {}", rule.summary);
}

fn list_rules() {
    for scope in [RuleScope::Markup, RuleScope::Stylesheet] {
        let rules: Vec<_> = all_rules().into_iter().filter(|r| r.scope == scope).collect();
        println!("{} ({} rules)", scope.to_string().bold(), rules.len());
        for rule in &rules {
            print_rule(rule);
        }
        println!();
    }
}

/// Print detailed rule explanation
fn explain_rule(rule: &RuleInfo) {
    println!("{}", "Rule Details".bold());
    println!();
    println!("  {}: {}", "ID".bold(), rule.id.cyan());
    println!("  {}: {}", "Scope".bold(), rule.scope);
    println!("  {}: {}", "Category".bold(), rule.category);
    println!("  {}: {}", "Problem".bold(), rule.summary);
    println!("  {}: {}", "Trigger".bold(), rule.trigger);
    println!("  {}: {}", "Fix".bold(), rule.solution.green());
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(String::new()),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().unwrap_or_else(|e| {
            log::warn!("ignoring default configuration: {}", e);
            Config::default()
        }),
    };

    config.apply_cli(CliOverrides {
        format: cli.format.map(OutputFormat::from),
        pretty: cli.pretty,
        verbose: cli.verbose,
        no_color: cli.no_color,
        sequential: cli.sequential,
        disable: cli.disable.clone().unwrap_or_default(),
        select: cli.select.clone(),
        extend: cli.extend.clone().unwrap_or_default(),
        ignore: cli.ignore.clone().unwrap_or_default(),
    });

    Ok(config)
}

fn run(cli: Cli) -> Result<i32> {
    if let Some(Commands::Explain { rule_id }) = &cli.command {
        let Some(rule) = find_rule(rule_id) else {
            bail!("Rule '{}' not found (use --list-rules to see all rules)", rule_id);
        };
        explain_rule(&rule);
        return Ok(0);
    }

    if cli.list_rules {
        list_rules();
        return Ok(0);
    }

    if cli.html.is_none() && cli.css.is_none() {
        bail!("Nothing to analyze: pass --html <FILE> and/or --css <FILE>");
    }

    let config = load_config(&cli)?;
    match config.output.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    let markup = read_input(cli.html.as_deref())?;
    let stylesheet = read_input(cli.css.as_deref())?;

    let engine = Engine::new(config);
    if engine.config().output.verbose {
        eprintln!("Active rules: {}", engine.rule_ids().join(", "));
    }

    let report = engine.analyze(&markup, &stylesheet);
    let output = formatter_for(engine.config()).format(&report);
    println!("{}", output.trim_end());

    Ok(report.exit_code())
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}

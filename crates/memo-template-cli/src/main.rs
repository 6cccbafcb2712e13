//! clean-template - turn a sample legal memo into a Carbone template
//!
//! With no arguments, reads `legal-memo-template.dotx` from the working
//! directory and writes `legal-memo-carbone.dotx` next to it.

#![allow(clippy::needless_pass_by_value)] // clap hands over owned values

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use memo_template_core::{
    load_input, CleanReport, CleanerConfig, EditStage, Placeholder, RuleSet, TemplateCleaner,
    TemplateDocument,
};
use std::path::PathBuf;
use std::process::ExitCode;

const RULE_WIDTH: usize = 60;

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Per-paragraph progress
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "clean-template",
    version,
    about = "Strip example content from a legal memo template and insert Carbone placeholders",
    long_about = "Strip example content from a legal memo template and insert Carbone placeholders.\n\n\
                  Without arguments, reads legal-memo-template.dotx from the current directory and\n\
                  writes legal-memo-carbone.dotx, overwriting it if present.\n\
                  Defaults can be set in .memo-template.toml (current directory, then home)."
)]
struct Cli {
    /// Sample document to clean
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Where to write the template
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Configuration file (default: ./.memo-template.toml, then ~/.memo-template.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show what would change without writing the output
    #[arg(long)]
    dry_run: bool,

    /// Fail if a section or the signature block is not found
    #[arg(long)]
    strict: bool,

    /// Print the cleaning report as JSON
    #[arg(long)]
    json: bool,

    /// Suppress progress output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show every paragraph as it is processed
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let config = CleanerConfig::resolve(cli.config.as_deref(), &cwd)?;
    let input = cli.input.clone().unwrap_or_else(|| config.input.clone());
    let output = cli.output.clone().unwrap_or_else(|| config.output.clone());
    let strict = cli.strict || config.strict;
    log::debug!("Input {}, output {}", input.display(), output.display());
    let verbosity = if cli.json {
        Verbosity::Quiet
    } else {
        Verbosity::from_flags(cli.quiet, cli.verbose)
    };

    if !input.exists() {
        println!(
            "{} 错误: 找不到模板文件 {}",
            "❌".red(),
            input.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    let cleaner = TemplateCleaner::new(&config)?;

    if verbosity.should_show_output() {
        print_rule();
        println!("{}", "法律备忘录模板自动清理工具".bold());
        print_rule();
        println!("正在读取模板: {}", input.display());
    }

    if verbosity.is_verbose() {
        print_active_rules(cleaner.rules());
    }

    let document = load_input(&input)
        .with_context(|| format!("Failed to load template {}", input.display()))?;

    if verbosity.is_verbose() {
        print_paragraphs(&document);
    }

    let (document, report) = cleaner
        .clean_document(document)
        .context("Failed to clean template")?;

    if verbosity.should_show_output() {
        print_edits(&report);
        print_sections(&report);
    }

    if strict && !report.sections.is_complete() {
        bail!(
            "Template is incomplete, not found: {}",
            report.sections.missing().join(", ")
        );
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
    }

    if cli.dry_run {
        if verbosity.should_show_output() {
            println!(
                "\n{} {} ({} edits)",
                "Would write".yellow(),
                output.display(),
                report.edits.len()
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    if verbosity.should_show_output() {
        println!("\n保存清理后的模板到: {}", output.display());
    }
    document
        .save(&output)
        .with_context(|| format!("Failed to write template {}", output.display()))?;

    if verbosity.should_show_output() {
        println!("\n{}", "✅ 模板清理完成！".green());
        print_placeholder_summary();
        println!();
        print_rule();
        println!("{} 新模板已保存为: {}", "✅ 完成！".green(), output.display());
        print_rule();
    }

    Ok(ExitCode::SUCCESS)
}

fn print_rule() {
    println!("{}", "=".repeat(RULE_WIDTH));
}

/// First `max` characters of `text`
fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn print_active_rules(rules: &RuleSet) {
    println!("替换规则 ({}):", rules.rules().len());
    for rule in rules.rules() {
        println!("  {} => {}", rule.pattern().dimmed(), rule.replacement().cyan());
    }
}

/// Console label for a section-stage edit
fn section_edit_label(after: &str) -> &'static str {
    if after == Placeholder::LawFirm.token() {
        "替换律所名称"
    } else if after == Placeholder::Date.token() {
        "替换日期"
    } else {
        "添加占位符"
    }
}

fn print_paragraphs(document: &TemplateDocument) {
    for paragraph in document.paragraphs() {
        let text = paragraph.text.trim();
        if !text.is_empty() {
            println!("处理段落: {}...", preview(text, 50).dimmed());
        }
    }
}

fn print_edits(report: &CleanReport) {
    for edit in report.edits_for(EditStage::Pattern) {
        println!(
            "  替换: {} -> {}",
            preview(edit.before.trim(), 40),
            preview(&edit.after, 40).cyan()
        );
    }
    for edit in report.edits_for(EditStage::Section) {
        if edit.after.is_empty() {
            continue;
        }
        println!(
            "  {}: {} (段落 {})",
            section_edit_label(&edit.after),
            edit.after.cyan(),
            edit.index
        );
    }
    let cleared = report
        .edits_for(EditStage::Section)
        .filter(|edit| edit.after.is_empty())
        .count();
    if cleared > 0 {
        println!("  清空段落: {cleared}");
    }
}

fn print_sections(report: &CleanReport) {
    let found = &report.sections;
    let status = [
        ("基本事实", found.basic_facts),
        ("法律分析", found.legal_analysis),
        ("后续建议", found.recommendations),
        ("落款", found.signature),
    ];
    println!();
    for (label, seen) in status {
        if seen {
            println!("{} 找到'{label}'", "✓".green());
        } else {
            println!("{} 未找到'{label}'", "!".yellow());
        }
    }
}

fn print_placeholder_summary() {
    println!("\n已添加的 Carbone 占位符:");
    for placeholder in Placeholder::ALL {
        println!(
            "  - {:<24} {}",
            placeholder.token(),
            placeholder.description()
        );
    }
}

//! Tern CLI
//!
//! Loads an element tree from JSON, applies stylesheets to it and prints
//! the computed style of every element.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use serde::Serialize;
use tern_common::WarningLog;
use tern_css::{
    Origin, RuleSet, SelectorRegistry, StyleManager, StyleableMap, Stylesheet,
    parse_stylesheet_with,
};
use tern_dom::{DomTree, ElementData, ElementSpec, NodeId};

type Style = StyleableMap<String, String>;

/// Tern: compute styles for an element tree
#[derive(Parser, Debug)]
#[command(name = "tern")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r"EXAMPLES:
    # Style a tree with one author stylesheet
    tern drawing.json --author drawing.css

    # Defaults from a user-agent sheet, plus inline CSS
    tern drawing.json --user-agent defaults.css --css 'rect { fill: red }'

    # Warn about pseudo-classes the host does not support
    tern drawing.json --author drawing.css --known-pseudo hover,focus

    # Machine-readable output
    tern drawing.json --author drawing.css --json
")]
struct Cli {
    /// JSON element tree: {"tag": ..., "attrs": {...}, "states": [...], "children": [...]}
    #[arg(value_name = "TREE")]
    tree: PathBuf,

    /// User-agent stylesheet
    #[arg(long, value_name = "FILE")]
    user_agent: Option<PathBuf>,

    /// Author stylesheet (repeatable, applied in order)
    #[arg(short, long, value_name = "FILE")]
    author: Vec<PathBuf>,

    /// Author CSS given directly, applied after the --author files
    #[arg(long, value_name = "CSS")]
    css: Option<String>,

    /// Attribute holding inline declarations
    #[arg(long, value_name = "NAME", default_value = "style")]
    style_attribute: String,

    /// Comma-separated pseudo-classes the host supports; others are reported
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    known_pseudo: Option<Vec<String>>,

    /// Print styles as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let spec_text = fs::read_to_string(&cli.tree)
        .with_context(|| format!("failed to read {}", cli.tree.display()))?;
    let spec: ElementSpec = serde_json::from_str(&spec_text)
        .with_context(|| format!("{} is not a valid element tree", cli.tree.display()))?;
    let (tree, root) = DomTree::from_spec(&spec);

    let registry = cli
        .known_pseudo
        .as_ref()
        .map_or_else(SelectorRegistry::permissive, SelectorRegistry::with_pseudo_classes);
    let warnings = WarningLog::new();
    let sheets = load_stylesheets(&cli, &registry, &warnings)?;

    let rules = RuleSet::new(sheets);
    log::info!("{} rule(s) from {} origin(s)", rules.len(), rules.origins().len());

    let manager =
        StyleManager::new(rules).with_inline_style_attribute(cli.style_attribute.as_str());
    let mut styles = HashMap::new();
    let styled = manager.style_subtree(&tree, &root, &mut styles)?;
    log::info!("styled {styled} element(s)");

    if cli.json {
        print_json(&tree, root, &styles)?;
    } else {
        print_styles(&tree, root, 0, &styles);
        print_warnings(&warnings);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Parse every stylesheet named on the command line, earliest first.
/// Parse errors are reported on stderr and do not stop the run.
fn load_stylesheets(
    cli: &Cli,
    registry: &SelectorRegistry,
    warnings: &WarningLog,
) -> Result<Vec<Stylesheet>> {
    let mut sheets = Vec::new();
    if let Some(path) = &cli.user_agent {
        sheets.push(load_stylesheet(path, Origin::UserAgent, registry, warnings)?);
    }
    for path in &cli.author {
        sheets.push(load_stylesheet(path, Origin::Author, registry, warnings)?);
    }
    if let Some(css) = &cli.css {
        let sheet = parse_stylesheet_with(css, Origin::Author, registry, warnings);
        report_errors("--css", &sheet);
        sheets.push(sheet);
    }
    Ok(sheets)
}

fn load_stylesheet(
    path: &Path,
    origin: Origin,
    registry: &SelectorRegistry,
    warnings: &WarningLog,
) -> Result<Stylesheet> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let sheet = parse_stylesheet_with(&text, origin, registry, warnings);
    report_errors(&path.display().to_string(), &sheet);
    Ok(sheet)
}

fn report_errors(source: &str, sheet: &Stylesheet) {
    for error in &sheet.errors {
        eprintln!(
            "{}: {source}: rule {}: {}",
            "error".red().bold(),
            error.rule_index,
            error.error
        );
    }
}

fn print_warnings(warnings: &WarningLog) {
    let unique = warnings.unique_warnings();
    if unique.is_empty() {
        return;
    }
    println!("\n=== Warnings ===");
    for warning in unique {
        println!("  - {}", warning.yellow());
    }
}

/// Print `node` and its descendants with their computed properties.
fn print_styles(tree: &DomTree, node: NodeId, depth: usize, styles: &HashMap<NodeId, Style>) {
    let Some(data) = tree.as_element(node) else {
        return;
    };
    let indent = "  ".repeat(depth);
    println!("{indent}{}", describe(data).bold());

    if let Some(style) = styles.get(&node) {
        for (name, value) in style.iter() {
            let origin = style.effective_origin(name.as_str()).unwrap_or(Origin::Author);
            let value = value.map_or_else(|| "unset".italic().to_string(), Clone::clone);
            println!("{indent}  {name}: {} {}", value, paint_origin(origin));
        }
    }

    for &child in tree.children(node) {
        print_styles(tree, child, depth + 1, styles);
    }
}

/// `<rect#id.a.b>`
fn describe(data: &ElementData) -> String {
    let mut out = format!("<{}", data.tag_name);
    if let Some(id) = data.id() {
        out.push('#');
        out.push_str(id);
    }
    for class in data.classes() {
        out.push('.');
        out.push_str(class);
    }
    out.push('>');
    out
}

fn paint_origin(origin: Origin) -> String {
    let label = format!("({origin})");
    match origin {
        Origin::UserAgent => label.dimmed().to_string(),
        Origin::Author => label.green().to_string(),
        Origin::Inline => label.cyan().to_string(),
        Origin::Override => label.magenta().to_string(),
    }
}

#[derive(Serialize)]
struct ElementStyle<'a> {
    node: usize,
    tag: &'a str,
    style: &'a Style,
}

fn print_json(tree: &DomTree, root: NodeId, styles: &HashMap<NodeId, Style>) -> Result<()> {
    let empty = Style::new();
    let mut stack = vec![root];
    let mut out = Vec::new();
    while let Some(node) = stack.pop() {
        if let Some(data) = tree.as_element(node) {
            out.push(ElementStyle {
                node: node.0,
                tag: &data.tag_name,
                style: styles.get(&node).unwrap_or(&empty),
            });
        }
        stack.extend(tree.children(node).iter().rev());
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

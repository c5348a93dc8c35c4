//! CLI: JSON/CSV in → transformed JSON, literal text, XML or CSV out.
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};

use structkit::csv_text;
use structkit::decorate::AffixMode;
use structkit::dedupe::dedupe;
use structkit::export::{export_pretty, ExportStyle};
use structkit::node::{Node, Scalar};
use structkit::xml::encode_xml;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// transform nested JSON data: decorate keys, pretty-export, encode XML, dedupe rows, convert CSV
#[derive(Parser, Debug)]
#[command(name = "structkit", version)]
pub struct CommandLineInterface {
    /// more log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// prefix every mapping key
    Prefix(AffixOut),
    /// postfix every mapping key
    Postfix(AffixOut),
    /// render each document as indented literal text
    Export(ExportOut),
    /// encode each document (an array of flat records) as XML
    Xml(PlainOut),
    /// drop repeated records from each document (an array)
    Dedupe(PlainOut),
    /// parse CSV (or TSV) text files into JSON rows
    Csv(CsvIn),
    /// write a JSON array of rows to a CSV file
    WriteCsv(CsvOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct AffixOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// text added to each key
    #[arg(long)]
    affix: String,

    /// only decorate top-level keys
    #[arg(long, default_value_t = false)]
    shallow: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// use `[` `]` instead of `array (` `)`
    #[arg(long, default_value_t = false)]
    bracketed: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlainOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CsvIn {
    /// one or more CSV files (paths or quoted globs)
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// first row is a header and is skipped
    #[arg(long, default_value_t = false)]
    header: bool,

    /// tab-delimited, no quoting or number coercion
    #[arg(long, default_value_t = false)]
    tab: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CsvOut {
    /// JSON file holding an array of rows, e.g. [["John", "Doe"], [1, 2]]
    #[arg(long, short)]
    input: PathBuf,

    /// target .csv file; parent directories are created
    #[arg(long)]
    to: PathBuf,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(Value) -> Result<()>) -> Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            for json_value in self.parse_documents(&source, &source_path_str)? {
                let json_value = self.select(json_value, &source_path_str)?;
                match self.jq_expr.as_ref() {
                    None => apply(json_value)?,
                    Some(jq_expr) => {
                        let outputs = structkit::jq_exec::apply_filter(jq_expr, &json_value)
                            .with_context(|| format!("failed to apply jq expression to source file ({source_path_str})"))?;
                        for json_value in outputs {
                            apply(json_value)?;
                        }
                    }
                }
            }
            debug!(path = %source_path_str, "processed input");
        }
        Ok(())
    }

    fn parse_documents(&self, source: &str, source_path_str: &str) -> Result<Vec<Value>> {
        if !self.ndjson {
            let value = serde_json::from_str::<Value>(source)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
            return Ok(vec![value]);
        }
        source
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(ix, line)| {
                serde_json::from_str::<Value>(line).with_context(|| {
                    format!("failed to parse NDJSON line {} of ({source_path_str})", ix + 1)
                })
            })
            .collect()
    }

    fn select(&self, value: Value, source_path_str: &str) -> Result<Value> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(value);
        };
        match value.pointer(pointer) {
            Some(selected) => Ok(selected.clone()),
            None => bail!("JSON pointer {pointer} matched nothing in ({source_path_str})"),
        }
    }

    fn load_nodes(&self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        self.load_process(|value| {
            nodes.push(Node::from(value));
            Ok(())
        })?;
        Ok(nodes)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Prefix(target) => run_affix(target, AffixMode::Prefix),
            Command::Postfix(target) => run_affix(target, AffixMode::Postfix),
            Command::Export(target) => {
                let style = if target.bracketed { ExportStyle::Bracketed } else { ExportStyle::Classic };
                let nodes = target.input_settings.load_nodes()?;
                let rendered = nodes
                    .iter()
                    .map(|node| export_pretty(node, style))
                    .collect::<Vec<_>>();
                emit(target.out.as_ref(), &rendered.join("\n"))
            }
            Command::Xml(target) => {
                let nodes = target.input_settings.load_nodes()?;
                let mut docs = Vec::with_capacity(nodes.len());
                for node in &nodes {
                    let records = expect_sequence(node, "xml")?;
                    docs.push(encode_xml(records)?);
                }
                emit(target.out.as_ref(), &docs.concat())
            }
            Command::Dedupe(target) => {
                let nodes = target.input_settings.load_nodes()?;
                let mut docs = Vec::with_capacity(nodes.len());
                for node in &nodes {
                    let records = expect_sequence(node, "dedupe")?;
                    let kept = dedupe(records);
                    info!(before = records.len(), after = kept.len(), "deduplicated records");
                    docs.push(Node::Sequence(kept));
                }
                emit_json(target.out.as_ref(), &docs)
            }
            Command::Csv(target) => {
                let source_paths = resolve_file_path_patterns(&target.input)
                    .context("failed to resolve input file paths")?;
                let mut tables = Vec::new();
                for source_path in source_paths {
                    let source = std::fs::read_to_string(&source_path)
                        .with_context(|| format!("failed to read source file ({})", source_path.display()))?;
                    let rows: Vec<Vec<Scalar>> = if target.tab {
                        csv_text::parse_tab_delimited(&source)
                            .into_iter()
                            .map(|row| row.into_iter().map(Scalar::Str).collect())
                            .collect()
                    } else {
                        csv_text::parse_csv(&source, target.header)
                    };
                    tables.push(serde_json::to_value(rows)?);
                }
                let out = if tables.len() == 1 { tables.remove(0) } else { Value::Array(tables) };
                emit(target.out.as_ref(), &serde_json::to_string_pretty(&out)?)
            }
            Command::WriteCsv(target) => {
                let source = std::fs::read_to_string(&target.input)
                    .with_context(|| format!("failed to read source file ({})", target.input.display()))?;
                let rows = structkit::path_de::from_str_with_path::<Vec<Vec<Scalar>>>(&source)
                    .with_context(|| format!("expected an array of rows in ({})", target.input.display()))?;
                csv_text::write_csv_file(&target.to, &rows)?;
                info!(to = %target.to.display(), rows = rows.len(), "wrote csv");
                Ok(())
            }
        }
    }
}

fn run_affix(target: &AffixOut, mode: AffixMode) -> Result<()> {
    let nodes = target.input_settings.load_nodes()?;
    let decorated = nodes
        .iter()
        .map(|node| node.decorate_keys(&target.affix, !target.shallow, mode))
        .collect::<Vec<_>>();
    emit_json(target.out.as_ref(), &decorated)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn expect_sequence<'a>(node: &'a Node, command: &str) -> Result<&'a [Node]> {
    match node.as_sequence() {
        Some(records) => Ok(records),
        None => bail!("`{command}` expects each input document to be a JSON array"),
    }
}

fn emit_json(out: Option<&PathBuf>, nodes: &[Node]) -> Result<()> {
    let mut chunks = Vec::with_capacity(nodes.len());
    for node in nodes {
        chunks.push(serde_json::to_string_pretty(&node.to_json())?);
    }
    emit(out, &chunks.join("\n"))
}

fn emit(out: Option<&PathBuf>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))?;
            debug!(path = %out.display(), bytes = text.len(), "wrote output");
        }
        // documents that already end a line (xml) are printed as is
        None if text.ends_with('\n') => print!("{text}"),
        None => println!("{text}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                // an explicit glob that matched nothing is almost always a typo
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

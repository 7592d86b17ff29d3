#![forbid(unsafe_code)]

//! Flowify CLI - extract, validate, and classify Mermaid diagrams.
//!
//! # Commands
//!
//! - `extract`: List the diagram blocks (and sidecar annotations) in a transcript
//! - `validate`: Check a diagram, or every block of a transcript, for a known type header
//! - `classify`: Show the canonical diagram type of a source
//! - `suggest`: Turn the first diagram of an assistant response into a suggestion
//! - `replace`: Splice new text over one extracted block
//! - `template`: Print starter content for a diagram type
//! - `context`: Collect code context from local files or a GitHub repository
//! - `watch`: Re-validate on file change (requires `watch` feature)

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use fy_context::{ContextFile, GitHubFetcher, ReqwestTransport, collect_local, parse_repo_spec};
use fy_core::{
    AssistantConfig, DiagramBlock, DiagramType, MERMAID_FILE_EXTENSION, STARTER_TEMPLATES,
    ValidationError, blank_content, default_content, parse_config_value, starter_template,
    template,
};
use fy_parser::{
    Detection, classify, detect, extract_blocks, extract_suggestion, has_diagram_blocks,
    render_block, replace_block, validate,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Flowify CLI - extract, validate, and classify Mermaid diagrams.
#[derive(Debug, Parser)]
#[command(
    name = "fy",
    version,
    about = "Flowify CLI - extract, validate, and classify Mermaid diagrams",
    long_about = "Tooling for the Flowify diagram assistant.\n\n\
        Finds Mermaid diagram fences (with optional `Diagram: <name> (<type>)`\n\
        annotations) in assistant transcripts, checks diagram headers, and\n\
        gathers code context for prompts."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Assistant configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the diagram blocks found in a transcript.
    Extract {
        /// Input file path, "-" for stdin, or inline text.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a diagram source and report the first problem.
    Validate {
        /// Input file path, "-" for stdin, or inline text.
        #[arg(default_value = "-")]
        input: String,

        /// Treat the input as a transcript and validate every diagram block
        #[arg(long)]
        blocks: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the canonical diagram type named on the first line.
    Classify {
        /// Input file path, "-" for stdin, or inline text.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract a diagram suggestion from an assistant response.
    Suggest {
        /// Input file path, "-" for stdin, or inline text.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace one diagram block of a transcript with new text.
    Replace {
        /// Transcript file path, "-" for stdin, or inline text.
        input: String,

        /// Block id as reported by `extract` (e.g. diagram-0)
        #[arg(long)]
        id: String,

        /// Replacement: file path or inline text. Bare diagram source is
        /// fenced and keeps the block's annotation.
        #[arg(long = "with")]
        replacement: String,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print starter content for a diagram type.
    Template {
        /// Diagram type (classDiagram, sequence, er, gitGraph, ...)
        kind: Option<String>,

        /// Template variant for the type; out-of-range values use the first one
        #[arg(long)]
        index: Option<usize>,

        /// Minimal skeleton instead of the full example
        #[arg(long, conflicts_with = "index")]
        blank: bool,

        /// Starter gallery entry by id (e.g. sequence-basic)
        #[arg(long, conflicts_with_all = ["kind", "index", "blank"])]
        starter: Option<String>,

        /// List the starter gallery
        #[arg(long, conflicts_with_all = ["kind", "index", "blank", "starter"])]
        list: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Write the diagram source to a file; `.mmd` is added when the path
        /// has no extension.
        #[arg(short, long, conflicts_with_all = ["list", "json"])]
        output: Option<String>,
    },

    /// Collect code context for the assistant.
    Context {
        #[command(subcommand)]
        source: ContextCommand,
    },

    /// Watch a transcript and re-validate its blocks on changes (requires `watch` feature).
    #[cfg(feature = "watch")]
    Watch {
        /// Input file path to watch.
        input: String,

        /// Clear screen before each report
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ContextCommand {
    /// Read files and directories from disk (directories honor .gitignore).
    Local {
        /// Files or directories to read
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON (full file contents)
        #[arg(long)]
        json: bool,
    },

    /// Fetch text files from a GitHub repository.
    Github {
        /// owner/repo[@branch][:path] or a github.com URL
        repo: String,

        /// Environment variable holding an API token
        #[arg(long, default_value = "GITHUB_TOKEN")]
        token_env: String,

        /// API base URL (for GitHub Enterprise)
        #[arg(long)]
        api_base: Option<String>,

        /// Output as JSON (full file contents)
        #[arg(long)]
        json: bool,
    },
}

/// Validation outcome for one diagram source.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    valid: bool,
    diagram_type: Option<DiagramType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ValidationError>,
}

impl ValidateResult {
    fn check(id: Option<String>, source: &str) -> Self {
        let outcome = validate(source);
        Self {
            id,
            valid: outcome.is_ok(),
            diagram_type: classify(source),
            error: outcome.err(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyResult {
    diagram_type: Option<DiagramType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'static str>,
    first_line: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet, cli.log_json);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Extract {
            input,
            json,
            pretty,
        } => cmd_extract(&input, json, pretty),

        Command::Validate {
            input,
            blocks,
            json,
        } => cmd_validate(&input, blocks, json),

        Command::Classify { input, json } => cmd_classify(&input, json),

        Command::Suggest { input, json } => cmd_suggest(&input, json),

        Command::Replace {
            input,
            id,
            replacement,
            output,
        } => cmd_replace(&input, &id, &replacement, output.as_deref()),

        Command::Template {
            kind,
            index,
            blank,
            starter,
            list,
            json,
            output,
        } => cmd_template(
            kind.as_deref(),
            index,
            blank,
            starter.as_deref(),
            list,
            json,
            output.as_deref(),
        ),

        Command::Context { source } => match source {
            ContextCommand::Local { paths, json } => cmd_context_local(&paths, &config, json),
            ContextCommand::Github {
                repo,
                token_env,
                api_base,
                json,
            } => cmd_context_github(&repo, &token_env, api_base.as_deref(), &config, json),
        },

        #[cfg(feature = "watch")]
        Command::Watch { input, clear } => cmd_watch(&input, clear),
    }
}

fn init_tracing(verbose: u8, quiet: bool, json: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time();
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn load_config(path: Option<&Path>) -> Result<AssistantConfig> {
    let Some(path) = path else {
        return Ok(AssistantConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let value: serde_json::Value = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON config: {}", path.display()))?
    } else {
        toml::from_str(&text).with_context(|| format!("Invalid TOML config: {}", path.display()))?
    };

    let parsed = parse_config_value(&value, &AssistantConfig::default());
    for warning in &parsed.warnings {
        warn!("Config warning: {warning}");
    }
    if let Some(first) = parsed.errors.first() {
        bail!(
            "Invalid config value for '{}' ({}): {}",
            first.field,
            first.value,
            first.message
        );
    }
    debug!(config = ?parsed.config, "loaded assistant config");
    Ok(parsed.config)
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline text
        Ok(input.to_string())
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(encoded)
}

fn first_line(source: &str) -> String {
    source
        .trim()
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(100)
        .collect()
}

// =============================================================================
// Command: extract
// =============================================================================

fn cmd_extract(input: &str, json_output: bool, pretty: bool) -> Result<()> {
    let source = load_input(input)?;
    let blocks = extract_blocks(&source);
    info!(blocks = blocks.len(), "extracted diagram blocks");

    if json_output {
        println!("{}", to_json(&blocks, pretty)?);
        return Ok(());
    }

    if blocks.is_empty() {
        println!("No diagram blocks found");
        return Ok(());
    }
    for block in &blocks {
        print_block(block);
    }
    Ok(())
}

fn print_block(block: &DiagramBlock) {
    let kind = classify(&block.mermaid_content).map_or("unknown", DiagramType::as_str);
    println!(
        "{} [{}..{}] {kind}",
        block.id, block.start_index, block.end_index
    );
    if let Some(sidecar) = &block.sidecar {
        match (&sidecar.name, &sidecar.kind) {
            (Some(name), Some(declared)) => println!("  Name: {name} ({declared})"),
            (Some(name), None) => println!("  Name: {name}"),
            _ => println!("  Note: {}", first_line(&sidecar.content)),
        }
    }
    for line in block.mermaid_content.lines() {
        println!("  | {line}");
    }
}

// =============================================================================
// Command: validate
// =============================================================================

fn cmd_validate(input: &str, blocks: bool, json_output: bool) -> Result<()> {
    let source = load_input(input)?;

    let results: Vec<ValidateResult> = if blocks {
        let found = extract_blocks(&source);
        if found.is_empty() {
            warn!("No diagram blocks found in input");
        }
        found
            .iter()
            .map(|block| ValidateResult::check(Some(block.id.clone()), &block.mermaid_content))
            .collect()
    } else {
        vec![ValidateResult::check(None, &source)]
    };
    let all_valid = results.iter().all(|result| result.valid);

    if json_output {
        let output = if blocks {
            serde_json::to_string_pretty(&results)?
        } else {
            serde_json::to_string_pretty(&results[0])?
        };
        println!("{output}");
    } else {
        for result in &results {
            let prefix = result
                .id
                .as_deref()
                .map(|id| format!("{id}: "))
                .unwrap_or_default();
            match (&result.error, result.diagram_type) {
                (None, Some(kind)) => println!("✓ {prefix}Valid {} ({})", kind.label(), kind),
                (None, None) => println!("✓ {prefix}Valid diagram"),
                (Some(error), _) => {
                    let location = error
                        .line
                        .map(|line| format!(" (line {line})"))
                        .unwrap_or_default();
                    println!("✗ {prefix}{}{location}", error.message);
                }
            }
        }
    }

    if !all_valid {
        std::process::exit(1);
    }

    Ok(())
}

// =============================================================================
// Command: classify
// =============================================================================

fn cmd_classify(input: &str, json_output: bool) -> Result<()> {
    let source = load_input(input)?;
    let detection: Option<Detection> = detect(&source);

    if json_output {
        let result = ClassifyResult {
            diagram_type: detection.map(|found| found.diagram_type),
            keyword: detection.map(|found| found.keyword),
            label: detection.map(|found| found.diagram_type.label()),
            first_line: first_line(&source),
        };
        println!("{}", to_json(&result, true)?);
    } else {
        match detection {
            Some(found) => {
                println!("Diagram type: {}", found.diagram_type);
                println!("Label:        {}", found.diagram_type.label());
                println!("Keyword:      {}", found.keyword);
            }
            None => println!("Diagram type: unknown"),
        }
    }

    Ok(())
}

// =============================================================================
// Command: suggest
// =============================================================================

fn cmd_suggest(input: &str, json_output: bool) -> Result<()> {
    let response = load_input(input)?;
    let suggestion = extract_suggestion(&response);

    if json_output {
        println!("{}", to_json(&suggestion, true)?);
        return Ok(());
    }
    match suggestion {
        Some(suggestion) => {
            println!("{} ({})", suggestion.description, suggestion.kind.as_str());
            println!("{}", suggestion.content);
        }
        None => println!("No diagram suggestion found"),
    }
    Ok(())
}

// =============================================================================
// Command: replace
// =============================================================================

fn cmd_replace(input: &str, id: &str, replacement: &str, output: Option<&str>) -> Result<()> {
    let source = load_input(input)?;
    let replacement = load_input(replacement)?;

    let blocks = extract_blocks(&source);
    let Some(block) = blocks.iter().find(|block| block.id == id) else {
        let known: Vec<&str> = blocks.iter().map(|block| block.id.as_str()).collect();
        bail!(
            "No block '{id}' in input (found: {})",
            if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            }
        );
    };

    // Bare diagram source is fenced again, keeping the block's annotation.
    let replacement = if has_diagram_blocks(&replacement) {
        replacement
    } else {
        let note = block.sidecar.as_ref().map(|sidecar| sidecar.content.as_str());
        render_block(&replacement, note)
    };
    let spliced = replace_block(&source, block, &replacement)
        .with_context(|| format!("Failed to replace {id}"))?;
    write_output(output, &spliced)
}

// =============================================================================
// Command: template
// =============================================================================

/// `path`, or `path` with the diagram file extension when it has none.
fn diagram_output_path(path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.extension().is_some() {
        return path;
    }
    path.with_extension(MERMAID_FILE_EXTENSION.trim_start_matches('.'))
}

fn cmd_template(
    kind: Option<&str>,
    index: Option<usize>,
    blank: bool,
    starter: Option<&str>,
    list: bool,
    json_output: bool,
    output: Option<&str>,
) -> Result<()> {
    if list {
        if json_output {
            println!("{}", to_json(&STARTER_TEMPLATES, true)?);
        } else {
            for entry in STARTER_TEMPLATES {
                println!(
                    "{:<22} {:<9} {:<16} {}",
                    entry.id,
                    entry.category.as_str(),
                    entry.diagram_type.as_str(),
                    entry.name
                );
            }
        }
        return Ok(());
    }

    if let Some(id) = starter {
        let Some(entry) = starter_template(id) else {
            bail!("Unknown starter template: {id} (see `fy template --list`)");
        };
        if let Some(path) = output {
            let path = diagram_output_path(path);
            return write_output(
                Some(&path.display().to_string()),
                &format!("{}\n", entry.code.trim_end()),
            );
        }
        if json_output {
            println!("{}", to_json(entry, true)?);
        } else {
            println!("{}", entry.code);
        }
        return Ok(());
    }

    let kind: DiagramType = match kind {
        Some(raw) => raw.parse()?,
        None => DiagramType::Flowchart,
    };
    let content = match index {
        Some(index) => template(kind, index),
        None if blank => blank_content(kind),
        None => default_content(kind),
    };

    if let Some(path) = output {
        let path = diagram_output_path(path);
        return write_output(
            Some(&path.display().to_string()),
            &format!("{}\n", content.trim_end()),
        );
    }
    if json_output {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct TemplateOutput<'a> {
            diagram_type: DiagramType,
            label: &'a str,
            content: &'a str,
        }
        let result = TemplateOutput {
            diagram_type: kind,
            label: kind.label(),
            content,
        };
        println!("{}", to_json(&result, true)?);
    } else {
        println!("{}", content.trim_end());
    }
    Ok(())
}

// =============================================================================
// Command: context
// =============================================================================

fn print_context(files: &[ContextFile], json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", to_json(&files, true)?);
        return Ok(());
    }
    let total: u64 = files.iter().map(|file| file.size).sum();
    for file in files {
        println!("{:<48} {:<12} {:>8} B", file.path, file.language, file.size);
    }
    println!("{} files, {total} bytes", files.len());
    Ok(())
}

fn cmd_context_local(paths: &[PathBuf], config: &AssistantConfig, json_output: bool) -> Result<()> {
    let files = collect_local(paths, &config.fetch)?;
    print_context(&files, json_output)
}

fn cmd_context_github(
    spec: &str,
    token_env: &str,
    api_base: Option<&str>,
    config: &AssistantConfig,
    json_output: bool,
) -> Result<()> {
    let repo = parse_repo_spec(spec)?;
    let token = std::env::var(token_env).ok();
    if token.is_none() {
        info!("{token_env} not set; using anonymous GitHub API access");
    }

    let mut fetcher = GitHubFetcher::new(ReqwestTransport::new(token)?).with_limits(config.fetch);
    if let Some(api_base) = api_base {
        fetcher = fetcher.with_api_base(api_base);
    }
    let files = fetcher
        .fetch(&repo)
        .with_context(|| format!("Failed to fetch {}/{}@{}", repo.owner, repo.repo, repo.branch))?;
    print_context(&files, json_output)
}

// =============================================================================
// Command: watch (optional feature)
// =============================================================================

#[cfg(feature = "watch")]
fn cmd_watch(input: &str, clear: bool) -> Result<()> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::sync::mpsc::channel;
    use std::time::Duration;

    let path = Path::new(input);
    if !path.exists() {
        anyhow::bail!("File not found: {input}");
    }

    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
    watcher.watch(path, RecursiveMode::NonRecursive)?;

    println!("Watching {input} for changes... (Ctrl+C to stop)");

    if let Err(e) = report_blocks(input, clear) {
        eprintln!("Initial check failed: {e}");
    }

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(Ok(_event)) => {
                // Debounce rapid events
                std::thread::sleep(Duration::from_millis(100));
                while rx.try_recv().is_ok() {}

                if let Err(e) = report_blocks(input, clear) {
                    eprintln!("Check error: {e}");
                }
            }
            Ok(Err(e)) => {
                eprintln!("Watch error: {e}");
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "watch")]
fn report_blocks(input: &str, clear: bool) -> Result<()> {
    let source = std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))?;
    if clear {
        print!("\x1B[2J\x1B[H");
    }
    let blocks = extract_blocks(&source);
    println!("{input}: {} diagram block(s)", blocks.len());
    for block in &blocks {
        let result = ValidateResult::check(Some(block.id.clone()), &block.mermaid_content);
        match (result.error, result.diagram_type) {
            (None, Some(kind)) => println!("  ✓ {} {}", block.id, kind),
            (None, None) => println!("  ✓ {}", block.id),
            (Some(error), _) => println!("  ✗ {} {}", block.id, error.message),
        }
    }
    io::stdout().flush().context("Failed to write to stdout")
}

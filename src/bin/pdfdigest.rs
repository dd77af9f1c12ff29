//! CLI binary for pdfdigest.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `DigestConfig`, drives the store, and prints results.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfdigest::{
    extract_only, summarize, summarize_many, DigestConfig, DigestError, NewSummary,
    ProgressCallback, ProviderFailure, ProviderSpec, SectionPager, Store, SummaryOutput,
    SummaryProgress, SummaryRecord,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a single spinner whose message tracks the pipeline
/// stage, with per-event log lines above it.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Working");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl SummaryProgress for CliProgress {
    fn on_extract_start(&self, source: &str) {
        self.bar.set_message(format!("extracting text from {source}…"));
    }

    fn on_extract_complete(&self, word_count: usize) {
        self.bar.println(format!(
            "  {} {} extracted",
            green("✓"),
            bold(&format!("{word_count} words"))
        ));
    }

    fn on_provider_start(&self, provider: &str) {
        self.bar.set_message(format!("summarising via {provider}…"));
    }

    fn on_provider_retry(&self, provider: &str, attempt: u32, max_retries: u32) {
        self.bar
            .set_message(format!("{provider}: retry {attempt}/{max_retries}…"));
    }

    fn on_provider_failed(&self, failure: &ProviderFailure) {
        self.bar.println(format!("  {} {}", red("✗"), failure));
    }

    fn on_summary_complete(&self, provider: &str, markdown_len: usize) {
        self.bar.println(format!(
            "  {} summary from {}  {}",
            green("✓"),
            bold(provider),
            dim(&format!("{markdown_len} bytes")),
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise to stdout (provider auto-detected from API keys)
  pdfdigest summarize report.pdf

  # Summarise a URL to a file, with an explicit fallback chain
  pdfdigest summarize https://arxiv.org/pdf/1706.03762 \
      --provider openai:gpt-4o --fallback gemini:gemini-2.0-flash \
      -o attention.md

  # Persist the summary and read it back section by section
  pdfdigest summarize report.pdf --store digests.db --user jo
  pdfdigest show 1 --db digests.db --toc
  pdfdigest show 1 --db digests.db --section 2

  # Batch: summarise a directory's PDFs into one store
  pdfdigest summarize docs/*.pdf --store digests.db --concurrency 4

  # Extract text only (no API key needed)
  pdfdigest extract report.pdf --json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key (primary provider when set)
  GEMINI_API_KEY          Google Gemini API key (fallback when set)
  PDFDIGEST_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  PDFDIGEST_MODEL         Override model ID
"#;

/// Summarise PDF documents into navigable Markdown digests using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "pdfdigest",
    version,
    about = "Summarise PDF documents into navigable Markdown digests using LLMs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFDIGEST_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, global = true, env = "PDFDIGEST_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise one or more PDF files or URLs.
    Summarize(SummarizeArgs),

    /// Extract a PDF's text without summarising (no API key needed).
    Extract {
        /// Local PDF file path or HTTP/HTTPS URL.
        input: String,

        /// Output structured JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// List stored summaries for a user.
    List {
        /// Path to the summary store.
        #[arg(long, env = "PDFDIGEST_DB")]
        db: PathBuf,

        /// User whose summaries to list.
        #[arg(long, default_value = "local")]
        user: String,

        /// Output structured JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show a stored summary, whole or one section at a time.
    Show {
        /// Summary id (as printed by `summarize --store` or `list`).
        id: i64,

        /// Path to the summary store.
        #[arg(long, env = "PDFDIGEST_DB")]
        db: PathBuf,

        /// Print the table of contents (section titles + progress contract).
        #[arg(long, conflicts_with = "section")]
        toc: bool,

        /// Print one section by index. Out-of-range values clamp.
        #[arg(long)]
        section: Option<i64>,

        /// Output structured JSON instead of rendered text.
        #[arg(long)]
        json: bool,
    },

    /// Delete a stored summary.
    Delete {
        /// Summary id.
        id: i64,

        /// Path to the summary store.
        #[arg(long, env = "PDFDIGEST_DB")]
        db: PathBuf,

        /// Owning user (deletion is refused for anyone else).
        #[arg(long, default_value = "local")]
        user: String,
    },
}

#[derive(clap::Args, Debug)]
struct SummarizeArgs {
    /// Local PDF file path(s) or HTTP/HTTPS URL(s).
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write Markdown to this file instead of stdout (single input only).
    #[arg(short, long, env = "PDFDIGEST_OUTPUT")]
    output: Option<PathBuf>,

    /// Concurrent documents when several inputs are given.
    #[arg(long, env = "PDFDIGEST_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Primary provider, as `provider` or `provider:model`
    /// (e.g. openai:gpt-4o).
    #[arg(long, env = "PDFDIGEST_PROVIDER")]
    provider: Option<String>,

    /// Fallback provider(s), same syntax as --provider. Repeatable;
    /// tried in the order given.
    #[arg(long)]
    fallback: Vec<String>,

    /// Reject documents above this word count.
    #[arg(long, env = "PDFDIGEST_MAX_WORDS", default_value_t = 50_000)]
    max_words: usize,

    /// Max LLM output tokens.
    #[arg(long, env = "PDFDIGEST_MAX_TOKENS", default_value_t = 1500)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDFDIGEST_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Retries per provider on transient failure.
    #[arg(long, env = "PDFDIGEST_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFDIGEST_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Per-provider-call timeout in seconds.
    #[arg(long, env = "PDFDIGEST_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Persist the summary into this store and print its id.
    #[arg(long, env = "PDFDIGEST_DB")]
    store: Option<PathBuf>,

    /// User the stored summary belongs to.
    #[arg(long, default_value = "local")]
    user: String,

    /// Output the full SummaryOutput as JSON instead of Markdown.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDFDIGEST_NO_PROGRESS")]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        // The spinner is the feedback channel for interactive runs; keep
        // library INFO logs out of its way.
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Summarize(args) => run_summarize(args, cli.quiet).await,
        Command::Extract { input, json } => run_extract(&input, json).await,
        Command::List { db, user, json } => run_list(&db, &user, json),
        Command::Show {
            id,
            db,
            toc,
            section,
            json,
        } => run_show(id, &db, toc, section, json),
        Command::Delete { id, db, user } => run_delete(id, &db, &user),
    }
}

async fn run_summarize(args: SummarizeArgs, quiet: bool) -> Result<()> {
    let show_progress = !quiet && !args.no_progress && !args.json;
    let progress = show_progress.then(CliProgress::new);

    let config = build_config(&args, progress.clone().map(|p| p as ProgressCallback))?;

    if args.inputs.len() > 1 {
        if args.output.is_some() {
            bail!("--output only applies to a single input; use --store for batches");
        }
        let results = summarize_many(&args.inputs, args.concurrency, &config).await;
        if let Some(ref p) = progress {
            p.finish();
        }
        return emit_batch(&args, results, quiet);
    }

    let result = summarize(&args.inputs[0], &config).await;
    if let Some(ref p) = progress {
        p.finish();
    }
    let output = result.context("Summarisation failed")?;

    // ── Persist ──────────────────────────────────────────────────────────
    let stored_id = match &args.store {
        Some(db_path) => {
            let store = Store::open(db_path)
                .with_context(|| format!("Failed to open store at {}", db_path.display()))?;
            let id = store
                .save_summary(&NewSummary::from_output(&args.user, &output))
                .context("Failed to save summary")?;
            Some(id)
        }
        None => None,
    };

    // ── Emit ─────────────────────────────────────────────────────────────
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if let Some(ref path) = args.output {
        tokio::fs::write(path, &output.markdown)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !quiet {
            eprintln!(
                "{}  {}  →  {}",
                green("✔"),
                bold(&output.title),
                bold(&path.display().to_string())
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(output.markdown.as_bytes())?;
    }

    if !quiet && !args.json {
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms via {}",
            dim(&output.stats.input_tokens.to_string()),
            dim(&output.stats.output_tokens.to_string()),
            output.stats.total_duration_ms,
            output.stats.provider,
        );
        if let Some(id) = stored_id {
            eprintln!("   stored as id {}", bold(&id.to_string()));
        }
    } else if let Some(id) = stored_id {
        if args.json {
            eprintln!("stored as id {id}");
        }
    }

    Ok(())
}

/// Print/store a batch of results, keeping going past per-input failures.
fn emit_batch(
    args: &SummarizeArgs,
    results: Vec<Result<SummaryOutput, DigestError>>,
    quiet: bool,
) -> Result<()> {
    let store = match &args.store {
        Some(db) => Some(open_store(db)?),
        None => None,
    };

    let mut succeeded = Vec::new();
    let mut failed = 0usize;

    for (source, result) in args.inputs.iter().zip(results) {
        match result {
            Ok(output) => {
                let stored_id = match &store {
                    Some(s) => Some(
                        s.save_summary(&NewSummary::from_output(&args.user, &output))
                            .context("Failed to save summary")?,
                    ),
                    None => None,
                };
                if !args.json {
                    println!("{}", output.markdown);
                }
                if !quiet {
                    let stored = stored_id
                        .map(|id| format!("  stored as id {id}"))
                        .unwrap_or_default();
                    eprintln!("{} {}  {}{stored}", green("✔"), bold(&output.title), dim(source));
                }
                succeeded.push(output);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {source}: {e}", red("✗"));
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&succeeded)?);
    }
    if failed == args.inputs.len() {
        bail!("all {failed} inputs failed");
    }
    Ok(())
}

async fn run_extract(input: &str, json: bool) -> Result<()> {
    let doc = extract_only(input).await.context("Extraction failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{}", doc.text);
        eprintln!("   {} words from {}", dim(&doc.word_count.to_string()), doc.file_name);
    }
    Ok(())
}

fn run_list(db: &PathBuf, user: &str, json: bool) -> Result<()> {
    let store = open_store(db)?;
    let records = store.list_summaries(user).context("Failed to list summaries")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No summaries stored for user '{user}'.");
        return Ok(());
    }

    for r in &records {
        println!(
            "{:>5}  {}  {}  {}",
            bold(&r.id.to_string()),
            r.created_at.format("%Y-%m-%d %H:%M"),
            cyan(&r.title),
            dim(&format!("{} words · {} min read", r.word_count, r.reading_time_minutes())),
        );
    }
    Ok(())
}

fn run_show(id: i64, db: &PathBuf, toc: bool, section: Option<i64>, json: bool) -> Result<()> {
    let store = open_store(db)?;
    let record = store
        .get_summary(id)
        .context("Failed to read summary")?
        .with_context(|| format!("No summary with id {id}"))?;

    let mut pager = SectionPager::from_markdown(&record.summary_text);

    if pager.is_empty() {
        // Empty section list means "nothing to display", not an error.
        println!("{}", dim("(this summary has no content)"));
        return Ok(());
    }

    if toc {
        let view = pager.view();
        if json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            println!("{}", bold(&record.title));
            for (i, title) in view.section_titles.iter().enumerate() {
                let title = if title.is_empty() { "(untitled)" } else { title };
                println!("  {:>3}. {}", i, title);
            }
        }
        return Ok(());
    }

    if let Some(index) = section {
        pager.select(index);
        let view = pager.view();
        let current = pager.current();

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "section": current,
                    "view": view,
                }))?
            );
        } else {
            println!("{}", bold(&format!("# {}", current.title)));
            for point in &current.points {
                println!("{point}");
            }
            println!();
            println!(
                "{}",
                dim(&format!(
                    "section {}/{} · {:.0}%{}{}",
                    view.current_index + 1,
                    view.section_count,
                    view.progress_ratio * 100.0,
                    if view.is_first { " · first" } else { "" },
                    if view.is_last { " · last" } else { "" },
                ))
            );
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record_header(&record);
        println!("{}", record.summary_text);
    }
    Ok(())
}

fn run_delete(id: i64, db: &PathBuf, user: &str) -> Result<()> {
    let store = open_store(db)?;
    let deleted = store
        .delete_summary(id, user)
        .context("Failed to delete summary")?;
    if !deleted {
        bail!("No summary with id {id} owned by '{user}'");
    }
    eprintln!("{} deleted summary {id}", green("✔"));
    Ok(())
}

fn open_store(db: &PathBuf) -> Result<Store> {
    Store::open(db).with_context(|| format!("Failed to open store at {}", db.display()))
}

fn print_record_header(record: &SummaryRecord) {
    println!("{}", bold(&record.title));
    println!(
        "{}",
        dim(&format!(
            "{} · {} · {} min read",
            record.file_name,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.reading_time_minutes(),
        ))
    );
    println!();
}

/// Map CLI args to `DigestConfig`.
fn build_config(args: &SummarizeArgs, progress: Option<ProgressCallback>) -> Result<DigestConfig> {
    let mut builder = DigestConfig::builder()
        .temperature(args.temperature)
        .max_tokens(args.max_tokens)
        .max_retries(args.max_retries)
        .max_input_words(args.max_words)
        .download_timeout_secs(args.download_timeout)
        .api_timeout_secs(args.api_timeout);

    if let Some(ref primary) = args.provider {
        builder = builder.provider_spec(ProviderSpec::parse(primary));
    }
    for fallback in &args.fallback {
        builder = builder.fallback(ProviderSpec::parse(fallback));
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

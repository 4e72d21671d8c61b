//! unfiling CLI - SEC filing structure extraction tool

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unfiling::render::{self, grid_to_markdown};
use unfiling::{
    is_text_document, DocumentContent, JsonFormat, Line, MatchMode, PageWindow, ParseOptions,
    RenderOptions, ResponseShape, RowFilter, SearchQuery, StatementKind,
};

#[derive(Parser)]
#[command(name = "unfiling")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Extract lines, tables and financial statements from SEC filings",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a filing into lines
    Lines {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the reconstructed tables of a filing
    Tables {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search a filing for regex terms
    Search {
        #[command(flatten)]
        input: InputArgs,

        /// Search terms (regular expressions, case-insensitive)
        #[arg(value_name = "TERM", required = true)]
        terms: Vec<String>,

        /// Require every term to match
        #[arg(long)]
        all: bool,

        /// Which lines to search
        #[arg(long, value_enum, default_value = "all")]
        rows: Rows,

        /// Item sections to search (e.g., "7A,8")
        #[arg(long, value_delimiter = ',')]
        items: Vec<String>,

        /// Intra-page positions to search (e.g., "0-8", "0,1,2")
        #[arg(long)]
        window: Option<String>,

        /// Return every line of each matching page
        #[arg(long)]
        by_page: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Extract the tables of a financial statement
    #[command(alias = "fs")]
    Statement {
        #[command(flatten)]
        input: InputArgs,

        /// Statement kind (balance_sheet, income_statement,
        /// comprehensive_income_statement, cash_flow_statement, equity_statement)
        #[arg(value_name = "KIND")]
        kind: StatementKind,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Segment many filings, writing one JSON file per input
    Batch {
        /// Input filings
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "unfiling_output")]
        output: PathBuf,

        /// Text encoding of the inputs (WHATWG label)
        #[arg(long, env = "UNFILING_ENCODING")]
        encoding: Option<String>,

        /// Clean HTML table cell text
        #[arg(long)]
        clean_cells: bool,

        /// Parse one file at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Show document information
    Info {
        #[command(flatten)]
        input: InputArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct InputArgs {
    /// Input filing
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Treat the input as a text filing
    #[arg(long, conflicts_with = "html")]
    text: bool,

    /// Treat the input as an HTML filing
    #[arg(long)]
    html: bool,

    /// Text encoding of the input (WHATWG label)
    #[arg(long, env = "UNFILING_ENCODING")]
    encoding: Option<String>,

    /// Clean HTML table cell text
    #[arg(long)]
    clean_cells: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// JSON lines with grids
    Json,
    /// Plain text
    Text,
    /// Markdown with tables
    Markdown,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Rows {
    /// Every line
    All,
    /// Table lines only
    Tables,
    /// Lines outside tables
    NonTable,
}

impl From<Rows> for RowFilter {
    fn from(rows: Rows) -> Self {
        match rows {
            Rows::All => RowFilter::All,
            Rows::Tables => RowFilter::Tables,
            Rows::NonTable => RowFilter::NonTable,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lines {
            input,
            format,
            output,
        } => cmd_lines(&input, format, &output),
        Commands::Tables {
            input,
            format,
            output,
        } => cmd_tables(&input, format, &output),
        Commands::Search {
            input,
            terms,
            all,
            rows,
            items,
            window,
            by_page,
            format,
            output,
        } => {
            let mode = if all { MatchMode::All } else { MatchMode::Any };
            let response = if by_page {
                ResponseShape::Pages
            } else {
                ResponseShape::Lines
            };
            PageWindow::parse(window.as_deref().unwrap_or("all"))
                .map_err(Into::into)
                .and_then(|window| {
                    let query = SearchQuery::new(terms)
                        .with_mode(mode)
                        .with_rows(rows.into())
                        .with_item_sections(items)
                        .with_page_window(window)
                        .with_response(response);
                    cmd_search(&input, &query, format, &output)
                })
        }
        Commands::Statement {
            input,
            kind,
            format,
            output,
        } => cmd_statement(&input, kind, format, &output),
        Commands::Batch {
            inputs,
            output,
            encoding,
            clean_cells,
            sequential,
        } => cmd_batch(&inputs, &output, encoding.as_deref(), clean_cells, sequential),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn parse_options(encoding: Option<&str>, clean_cells: bool) -> unfiling::Result<ParseOptions> {
    let mut options = ParseOptions::new();
    if let Some(label) = encoding {
        options = options.with_encoding_label(label)?;
    }
    if clean_cells {
        options = options.clean_cells();
    }
    Ok(options)
}

fn load(input: &InputArgs) -> Result<DocumentContent, Box<dyn std::error::Error>> {
    let options = parse_options(input.encoding.as_deref(), input.clean_cells)?;
    let data = fs::read(&input.file)?;
    let is_text_file = if input.text {
        true
    } else if input.html {
        false
    } else {
        let name = input.file.file_name().and_then(|n| n.to_str());
        is_text_document(name, &data)
    };
    log::info!(
        "Parsing {} as {} filing",
        input.file.display(),
        if is_text_file { "text" } else { "HTML" }
    );
    Ok(DocumentContent::parse_with_options(&data, is_text_file, &options)?)
}

fn json_format(output: &OutputArgs) -> JsonFormat {
    if output.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn render_lines(
    lines: &[&Line],
    format: OutputFormat,
    output: &OutputArgs,
) -> unfiling::Result<String> {
    let options = RenderOptions::new().with_page_headers(true);
    match format {
        OutputFormat::Json => render::to_json(lines, json_format(output)),
        OutputFormat::Text => Ok(render::to_text(lines.iter().copied(), &options)),
        OutputFormat::Markdown => Ok(render::to_markdown(lines.iter().copied(), &options)),
    }
}

fn write_output(content: &str, output: &OutputArgs) -> CliResult {
    if let Some(path) = &output.output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_lines(input: &InputArgs, format: OutputFormat, output: &OutputArgs) -> CliResult {
    let content = load(input)?;
    let lines: Vec<&Line> = content.lines().iter().collect();
    write_output(&render_lines(&lines, format, output)?, output)
}

fn cmd_tables(input: &InputArgs, format: OutputFormat, output: &OutputArgs) -> CliResult {
    let content = load(input)?;
    let tables = content.tables();

    let rendered = match format {
        OutputFormat::Markdown => tables
            .iter()
            .map(|line| table_markdown(line))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => render_lines(&tables, format, output)?,
    };
    write_output(&rendered, output)
}

fn cmd_search(
    input: &InputArgs,
    query: &SearchQuery,
    format: OutputFormat,
    output: &OutputArgs,
) -> CliResult {
    let content = load(input)?;
    let results = content.search(query)?;

    if results.is_empty() {
        eprintln!("{}", "No matches".yellow());
    }

    let rendered = match format {
        OutputFormat::Json => render::to_json(&results, json_format(output))?,
        _ => render_lines(&results.lines(), format, output)?,
    };
    write_output(&rendered, output)
}

fn cmd_statement(
    input: &InputArgs,
    kind: StatementKind,
    format: OutputFormat,
    output: &OutputArgs,
) -> CliResult {
    let content = load(input)?;
    let tables = content.financial_statements(kind)?;

    if tables.is_empty() {
        eprintln!("{} {}", "No tables found for".yellow(), kind);
    }

    let rendered = match format {
        OutputFormat::Markdown => tables
            .iter()
            .map(|line| table_markdown(line))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => render_lines(&tables, format, output)?,
    };
    write_output(&rendered, output)
}

fn table_markdown(line: &Line) -> String {
    let heading = format!(
        "### Table {} (page {})\n\n",
        line.table_index().unwrap_or_default(),
        line.page_number
    );
    match line.grid() {
        Some(grid) => heading + &grid_to_markdown(grid),
        None => heading,
    }
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    encoding: Option<&str>,
    clean_cells: bool,
    sequential: bool,
) -> CliResult {
    let options = parse_options(encoding, clean_cells)?.with_parallel(!sequential);
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading filings...");
    let names = output_names(inputs);
    let mut failed = 0;
    let mut loaded = Vec::with_capacity(inputs.len());
    for (path, name) in inputs.iter().zip(&names) {
        match fs::read(path) {
            Ok(data) => loaded.push((path, name, data)),
            Err(e) => {
                failed += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), path.display(), e));
                pb.inc(1);
            }
        }
        pb.inc(1);
    }

    pb.set_message("Segmenting...");
    let documents: Vec<unfiling::RawDocument<'_>> = loaded
        .iter()
        .map(|(path, _, data)| {
            let file_name = path.file_name().and_then(|n| n.to_str());
            unfiling::RawDocument::new(data, is_text_document(file_name, data))
        })
        .collect();
    let results = unfiling::parse_batch(&documents, &options);

    for ((path, name, _), result) in loaded.iter().zip(results) {
        let written = result.and_then(|content| {
            let json = render::to_json(content.lines(), JsonFormat::Compact)?;
            fs::write(output_dir.join(name), json)?;
            Ok(())
        });
        if let Err(e) = written {
            failed += 1;
            pb.println(format!("{} {}: {}", "Failed".red(), path.display(), e));
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} parsed, {} failed -> {}",
        "Batch:".green().bold(),
        inputs.len() - failed,
        failed,
        output_dir.display()
    );
    Ok(())
}

/// Output file name per input, suffixing repeated stems with `-2`, `-3`, ...
fn output_names(inputs: &[PathBuf]) -> Vec<String> {
    let mut used = HashSet::new();
    inputs
        .iter()
        .map(|path| {
            let stem = path.file_stem().unwrap_or_default().to_string_lossy();
            let mut name = format!("{}.json", stem);
            let mut n = 1;
            while !used.insert(name.clone()) {
                n += 1;
                name = format!("{}-{}.json", stem, n);
            }
            name
        })
        .collect()
}

struct Summary {
    lines: usize,
    tables: usize,
    pages: u32,
    items: Vec<String>,
    statements: Vec<(StatementKind, Vec<u32>)>,
}

fn summarize(content: &DocumentContent) -> unfiling::Result<Summary> {
    let mut items: Vec<String> = content
        .lines()
        .iter()
        .filter_map(|l| l.item_number.clone())
        .collect();
    items.dedup();

    let mut statements = Vec::with_capacity(StatementKind::ALL.len());
    for kind in StatementKind::ALL {
        let pages = content
            .financial_statements(kind)?
            .iter()
            .map(|l| l.page_number)
            .collect();
        statements.push((kind, pages));
    }

    Ok(Summary {
        lines: content.len(),
        tables: content.tables().len(),
        pages: content.page_count(),
        items,
        statements,
    })
}

fn cmd_info(input: &InputArgs, json: bool) -> CliResult {
    let content = load(input)?;
    let summary = summarize(&content)?;

    if json {
        let statements: serde_json::Map<String, serde_json::Value> = summary
            .statements
            .iter()
            .map(|(kind, pages)| (kind.to_string(), serde_json::json!(pages)))
            .collect();
        let value = serde_json::json!({
            "file": input.file.display().to_string(),
            "lines": summary.lines,
            "tables": summary.tables,
            "pages": summary.pages,
            "items": summary.items,
            "statements": statements,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.file.display());
    println!("{}: {}", "Lines".bold(), summary.lines);
    println!("{}: {}", "Tables".bold(), summary.tables);
    println!("{}: {}", "Pages".bold(), summary.pages);
    if !summary.items.is_empty() {
        println!("{}: {}", "Items".bold(), summary.items.join(", "));
    }

    println!();
    println!("{}", "Financial Statements".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (kind, pages) in &summary.statements {
        let found = if pages.is_empty() {
            "not found".dimmed().to_string()
        } else {
            let pages: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
            format!("page {}", pages.join(", "))
        };
        println!("{}: {}", kind.to_string().bold(), found);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unfiling".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("SEC filing structure extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn input_args(file: PathBuf) -> InputArgs {
        InputArgs {
            file,
            text: false,
            html: false,
            encoding: None,
            clean_cells: false,
        }
    }

    #[test]
    fn test_load_detects_text_filing() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "ITEM 7. MANAGEMENT'S DISCUSSION").unwrap();
        writeln!(file, "<PAGE>").unwrap();
        writeln!(file, "Revenue grew.").unwrap();

        let content = load(&input_args(file.path().to_path_buf())).unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content.page_count(), 2);
    }

    #[test]
    fn test_load_html_override() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "<p>ITEM 8. FINANCIAL STATEMENTS</p>").unwrap();

        let mut args = input_args(file.path().to_path_buf());
        args.html = true;
        let content = load(&args).unwrap();
        let line = content.lines().iter().find(|l| l.has_content()).unwrap();
        assert_eq!(line.content_text(), Some("ITEM 8. FINANCIAL STATEMENTS"));
    }

    #[test]
    fn test_summary_collects_items() {
        let content =
            DocumentContent::parse(b"ITEM 1. BUSINESS\nWidgets\nITEM 2. PROPERTIES", true).unwrap();
        let summary = summarize(&content).unwrap();
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.items, vec!["1", "2"]);
        assert_eq!(summary.statements.len(), 5);
        assert!(summary.statements.iter().all(|(_, pages)| pages.is_empty()));
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        assert!(parse_options(Some("klingon"), false).is_err());
        assert!(parse_options(Some("latin1"), true).is_ok());
    }

    #[test]
    fn test_output_names_are_unique() {
        let inputs: Vec<PathBuf> = ["a/10k.txt", "b/10k.htm", "10k-2.txt", "c/10k.txt", "q.txt"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(
            output_names(&inputs),
            vec!["10k.json", "10k-2.json", "10k-2-2.json", "10k-3.json", "q.json"]
        );
    }

    #[test]
    fn test_batch_continues_past_unreadable_file() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        let good = input_dir.path().join("good.txt");
        fs::write(&good, "ITEM 1. BUSINESS\nWidgets").unwrap();
        let missing = input_dir.path().join("missing.txt");

        cmd_batch(&[missing, good], output_dir.path(), None, false, true).unwrap();

        let json = fs::read_to_string(output_dir.path().join("good.json")).unwrap();
        let lines: Vec<Line> = serde_json::from_str(&json).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(!output_dir.path().join("missing.json").exists());
    }
}

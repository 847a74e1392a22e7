//! CLI tool to run the roster pipeline over a JSON records file.
//!
//! Usage:
//!   roster-run <records.json> --preset staff --filter status=Active --sort salary:desc
//!   roster-run <records.json> --schema table.yaml --search payroll --output export
//!
//! Output goes to stdout as JSON; diagnostics go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use roster_pipeline::{
    DateRange, ExportSink, FilterCriteria, JsonExportSink, JsonFileSource, PipelineError,
    QueryState, Record, SortSpec, TableSchema, TableView, execute_stages_debug, page_stages,
};
use serde_json::json;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// What to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    /// The requested page and its window.
    Page,
    /// Summary statistics over the full result.
    Summary,
    /// Export payload over the full sorted result.
    Export,
    /// Ids in the full result.
    Ids,
}

/// Filter, search, sort and paginate roster records.
#[derive(Parser)]
#[command(name = "roster-run")]
struct Cli {
    /// Records file (JSON array of objects with an `id`)
    records: PathBuf,

    /// Schema file (YAML, or JSON with a .json extension)
    #[arg(long, conflicts_with = "preset")]
    schema: Option<PathBuf>,

    /// Built-in schema: hr-managers, company-hr-managers or staff
    #[arg(long, default_value = "hr-managers")]
    preset: String,

    /// Equality filter as field=value; repeatable
    #[arg(short, long = "filter", value_name = "FIELD=VALUE")]
    filters: Vec<String>,

    /// Start of the date range (inclusive)
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// End of the date range (inclusive)
    #[arg(long, value_name = "DATE")]
    to: Option<String>,

    /// Search text
    #[arg(short, long)]
    search: Option<String>,

    /// Sort as field, field:asc or field:desc
    #[arg(long)]
    sort: Option<String>,

    /// Page number (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Page size (defaults to the schema's)
    #[arg(long)]
    page_size: Option<usize>,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = OutputKind::Page)]
    output: OutputKind,

    /// Print record counts between stages on stderr
    #[arg(long)]
    trace: bool,

    /// Log pipeline activity on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_schema(cli: &Cli) -> Result<TableSchema, PipelineError> {
    match &cli.schema {
        Some(path) => TableSchema::load(path),
        None => TableSchema::preset(&cli.preset),
    }
}

fn build_state(cli: &Cli, schema: &TableSchema) -> Result<QueryState, PipelineError> {
    let mut criteria = FilterCriteria::new();
    for arg in &cli.filters {
        let (field, value) = FilterCriteria::parse_arg(arg)?;
        criteria = criteria.with(field, value);
    }
    match (&cli.from, &cli.to) {
        (Some(from), Some(to)) => {
            criteria = criteria.with_date_range(DateRange::new(from.as_str(), to.as_str()));
        }
        (Some(bound), None) | (None, Some(bound)) => {
            warn!(bound = %bound, "date range needs both --from and --to, ignoring it");
        }
        (None, None) => {}
    }

    let sort = cli.sort.as_deref().map(SortSpec::parse).transpose()?;
    let page_size = cli.page_size.unwrap_or(schema.page_size);

    QueryState::new(page_size)?
        .with_criteria(criteria)
        .with_search(cli.search.clone().unwrap_or_default())
        .with_sort(sort)
        .with_page(cli.page)
}

fn write_json(value: &serde_json::Value) -> Result<(), PipelineError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(PipelineError::from_json_write)?;
    writeln!(stdout).map_err(PipelineError::Export)
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    let schema = load_schema(cli)?;
    let mut state = build_state(cli, &schema)?;
    let source = JsonFileSource::new(&cli.records);
    let mut view: TableView<Record> = TableView::from_source(&source, schema)?;

    if cli.trace {
        let stages = page_stages(&state, view.schema());
        let input: Vec<&Record> = view.records().iter().collect();
        let (_, info) = execute_stages_debug(input, &stages, view.schema());
        for step in info {
            eprintln!(
                "{:<9} {:>6} -> {:<6}",
                step.stage_name, step.input_count, step.output_count
            );
        }
    }

    match cli.output {
        OutputKind::Page => {
            let mut window = view.page_window(&state);
            if window.is_out_of_range() {
                warn!(
                    page = window.number,
                    page_count = window.page_count,
                    "page out of range, showing page 1"
                );
                state = state.first_page();
                window = view.page_window(&state);
            }
            let records = view.page(&state);
            write_json(&json!({ "window": window, "records": records }))
        }
        OutputKind::Summary => {
            let summary = view.summary(&state);
            write_json(&serde_json::to_value(summary)?)
        }
        OutputKind::Export => {
            let request = view.export_request(&state);
            JsonExportSink::new(io::stdout().lock()).export(&request)
        }
        OutputKind::Ids => {
            let ids = view.result_ids(&state);
            write_json(&json!(ids))
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.verbose {
        eprintln!("Records: {}", cli.records.display());
        match &cli.schema {
            Some(path) => eprintln!("Schema:  {}", path.display()),
            None => eprintln!("Schema:  {} (preset)", cli.preset),
        }
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

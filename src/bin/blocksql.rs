//! blocksql CLI: render, explain and run statements from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL for a statement
//! blocksql render select users --fields id,email --where "active = true" --limit 10
//!
//! # Parameterized, for a specific database
//! blocksql render update users --set name=Ann --where "id = 7" --dialect postgres --params
//!
//! # Run it
//! blocksql exec select users --database-url sqlite://app.db
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use blocksql::config::{Config, LogConfig};
use blocksql::prelude::*;

#[derive(Parser)]
#[command(name = "blocksql")]
#[command(version)]
#[command(about = "Build SQL statements from the command line", long_about = None)]
#[command(after_help = "EXAMPLES:
    blocksql render select users --fields id,name --where 'id = 1'
    blocksql render insert users --fields id,name --values 1,Ann --values 2,Bob
    blocksql explain update users --set verified=true --where 'id = $1'
    blocksql exec delete sessions --where 'expired_at < now()' --database-url sqlite://app.db")]
struct Cli {
    /// Config file (defaults to ./blocksql.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL for a statement
    Render {
        #[command(flatten)]
        statement: StatementArgs,

        /// Lift literals into placeholders and list the parameters
        #[arg(short, long)]
        params: bool,
    },
    /// Show how a statement is structured, then its SQL
    Explain {
        #[command(flatten)]
        statement: StatementArgs,
    },
    /// Run a statement against a database
    Exec {
        #[command(flatten)]
        statement: StatementArgs,

        /// Database connection URL
        #[arg(long, env = "BLOCKSQL_DATABASE_URL")]
        database_url: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// List supported dialects
    Dialects,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Args)]
struct StatementArgs {
    /// Statement kind
    #[arg(value_enum)]
    kind: KindArg,

    /// Target table
    table: String,

    /// Columns to select / insert into
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// One row of comma-separated values (repeatable)
    #[arg(long = "values")]
    rows: Vec<String>,

    /// Assignment col=value (repeatable)
    #[arg(long = "set")]
    assignments: Vec<String>,

    /// Where expression (repeatable, groups are AND-ed)
    #[arg(short = 'w', long = "where")]
    predicates: Vec<String>,

    /// Sort column, `col` or `col:desc` (repeatable)
    #[arg(long)]
    order: Vec<String>,

    #[arg(long)]
    limit: Option<u64>,

    #[arg(long)]
    offset: Option<u64>,

    /// Columns to return from INSERT/UPDATE/DELETE
    #[arg(long, value_delimiter = ',')]
    returning: Vec<String>,

    /// Target dialect (generic, postgres, mysql, sqlite)
    #[arg(short, long)]
    dialect: Option<Dialect>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => Config::load()?,
    };
    init_logging(&config.log, cli.verbose);

    match cli.command {
        Commands::Render { statement, params } => {
            let dialect = statement.dialect.or(config.database.dialect).unwrap_or_default();
            render(&statement, dialect, params)
        }
        Commands::Explain { statement } => {
            let dialect = statement.dialect.or(config.database.dialect).unwrap_or_default();
            explain(&statement, dialect)
        }
        Commands::Exec {
            statement,
            database_url,
            format,
        } => {
            let config = config.with_database_url(database_url);
            exec(&statement, config, &format).await
        }
        Commands::Dialects => {
            show_dialects();
            Ok(())
        }
    }
}

fn init_logging(log: &LogConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("blocksql=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Interpret a command-line literal: integer, float, bool, null, else string.
fn parse_cli_value(raw: &str) -> Value {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        Value::Int(n)
    } else if let Some(f) = raw.parse::<f64>().ok().filter(|f| f.is_finite()) {
        Value::Float(f)
    } else if raw.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else if raw.eq_ignore_ascii_case("null") {
        Value::Null
    } else {
        let unquoted = raw
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(raw);
        Value::String(unquoted.to_string())
    }
}

fn build_statement(args: &StatementArgs) -> anyhow::Result<Statement> {
    let model = if args.fields.is_empty() {
        Model::new(&args.table)
    } else {
        Model::with_fields(&args.table, args.fields.iter().cloned())
    };

    let mut stmt = match args.kind {
        KindArg::Select => select(&model),
        KindArg::Insert => insert(&model),
        KindArg::Update => update(&model),
        KindArg::Delete => delete(&model),
    };

    for row in &args.rows {
        stmt = stmt.values(row.split(',').map(parse_cli_value));
    }

    if !args.assignments.is_empty() {
        let mut assignments = Vec::with_capacity(args.assignments.len());
        for pair in &args.assignments {
            let Some((col, value)) = pair.split_once('=') else {
                bail!("--set expects col=value, got '{}'", pair);
            };
            assignments.push((col.trim().to_string(), parse_cli_value(value)));
        }
        stmt = stmt.set(assignments);
    }

    for predicate in &args.predicates {
        stmt = stmt.where_clause(predicate.as_str());
    }

    for order in &args.order {
        let (col, dir) = match order.split_once(':') {
            Some((col, dir)) if dir.eq_ignore_ascii_case("desc") => (col, SortOrder::Desc),
            Some((col, dir)) if dir.eq_ignore_ascii_case("asc") => (col, SortOrder::Asc),
            Some((_, dir)) => bail!("unknown sort direction '{}'", dir),
            None => (order.as_str(), SortOrder::Asc),
        };
        stmt = stmt.order_by(col, dir);
    }

    if let Some(n) = args.limit {
        stmt = stmt.limit(n);
    }
    if let Some(n) = args.offset {
        stmt = stmt.offset(n);
    }
    if !args.returning.is_empty() {
        stmt = stmt.returning(args.returning.iter().cloned());
    }

    Ok(stmt)
}

fn render(args: &StatementArgs, dialect: Dialect, params: bool) -> anyhow::Result<()> {
    let stmt = build_statement(args)?;

    if params {
        let compiled = stmt.compile(dialect)?;
        println!("{}", compiled.sql);
        if !compiled.params.is_empty() {
            println!();
            println!("{}", "Parameters:".cyan());
            for (i, p) in compiled.params.iter().enumerate() {
                println!("  {} = {}", format!("#{}", i + 1).dimmed(), p.to_string().yellow());
            }
        }
    } else {
        println!("{}", stmt.to_sql_with_dialect(dialect)?);
    }
    Ok(())
}

fn explain(args: &StatementArgs, dialect: Dialect) -> anyhow::Result<()> {
    let stmt = build_statement(args)?;

    println!("{}", "Statement Structure:".green().bold());
    println!("  {} {}", "Kind:".dimmed(), stmt.kind.to_string().cyan());
    println!("  {} {}", "Table:".dimmed(), stmt.table.white());
    println!("  {} {}", "Dialect:".dimmed(), dialect.to_string().white());

    if let Some(fields) = &stmt.fields {
        println!("  {}", "Fields:".dimmed());
        for field in fields {
            println!("    • {}", field.white());
        }
    }

    if !stmt.clauses.is_empty() {
        println!("  {}", "Clauses:".dimmed());
        for clause in &stmt.clauses {
            println!("    [{}] {}", clause.name().cyan(), describe_clause(clause));
        }
    }

    println!();
    println!("{}", "Generated SQL:".green().bold());
    println!("  {}", stmt.to_sql_with_dialect(dialect)?.white());
    Ok(())
}

fn describe_clause(clause: &Clause) -> String {
    let join = |values: &[Value]| {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    match clause {
        Clause::Values(row) => format!("({})", join(row)),
        Clause::Set(assignments) => assignments
            .iter()
            .map(|(col, v)| format!("{} = {}", col, v))
            .collect::<Vec<_>>()
            .join(", "),
        Clause::Where(Predicate::Text(text)) => text.yellow().to_string(),
        Clause::Where(Predicate::Typed(filter)) => {
            let sep = match filter.logical_op {
                LogicalOp::And => " AND ",
                LogicalOp::Or => " OR ",
            };
            filter
                .conditions
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(sep)
        }
        Clause::Join(join) => format!("{} {}", join.kind.as_sql(), join.table),
        Clause::OrderBy(col, SortOrder::Asc) => format!("{} ↑", col),
        Clause::OrderBy(col, SortOrder::Desc) => format!("{} ↓", col),
        Clause::Limit(n) | Clause::Offset(n) => n.to_string(),
        Clause::Returning(cols) if cols.is_empty() => "*".to_string(),
        Clause::Returning(cols) => cols.join(", "),
    }
}

async fn exec(args: &StatementArgs, config: Config, format: &OutputFormat) -> anyhow::Result<()> {
    let stmt = build_statement(args)?;

    let mut db_config = config.database;
    if args.dialect.is_some() {
        db_config.dialect = args.dialect;
    }
    if db_config.url.is_none() {
        bail!("No database URL. Use --database-url or set BLOCKSQL_DATABASE_URL");
    }

    let db = Database::connect_with(&db_config).await?;
    let query = db.query(&stmt);

    let returns_rows = stmt.kind == StatementKind::Select
        || stmt.clauses.iter().any(|c| matches!(c, Clause::Returning(_)));

    if returns_rows {
        let rows = query.fetch_all().await?;
        format_output(&rows, stmt.fields.as_deref(), format);
    } else {
        let affected = query.execute().await?;
        println!("{} {} rows affected", "✓".green(), affected);
    }

    Ok(())
}

fn format_output(results: &[Row], fields: Option<&[String]>, format: &OutputFormat) {
    if results.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(results).unwrap_or_default());
        }
        OutputFormat::Table => {
            // Model order when known, otherwise alphabetical
            let columns: Vec<String> = match fields {
                Some(fields) if !fields.is_empty() => fields.to_vec(),
                _ => {
                    let mut keys: Vec<String> = results[0].keys().cloned().collect();
                    keys.sort();
                    keys
                }
            };

            let mut widths: HashMap<&str, usize> =
                columns.iter().map(|c| (c.as_str(), c.len())).collect();
            for row in results {
                for col in &columns {
                    let len = row.get(col).map(val_to_string).unwrap_or_default().len();
                    if let Some(w) = widths.get_mut(col.as_str()) {
                        *w = (*w).max(len);
                    }
                }
            }

            let header: Vec<String> = columns
                .iter()
                .map(|c| format!("{:width$}", c, width = widths[c.as_str()]))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = columns
                .iter()
                .map(|c| "─".repeat(widths[c.as_str()]))
                .collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in results {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|c| {
                        let val = row.get(c).map(val_to_string).unwrap_or_default();
                        format!("{:width$}", val, width = widths[c.as_str()])
                    })
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", results.len().to_string().cyan());
        }
    }
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

fn show_dialects() {
    println!("{}", "Supported Dialects".cyan().bold());
    println!();
    println!(
        "{:10} {:14} {:12} {:8} {}",
        "Dialect".white().bold(),
        "Identifier".white().bold(),
        "Placeholder".white().bold(),
        "Bool".white().bold(),
        "RETURNING".white().bold()
    );
    println!("{}", "─".repeat(60).dimmed());

    for dialect in Dialect::ALL {
        let generator = dialect.generator();
        println!(
            "{:10} {:14} {:12} {:8} {}",
            dialect.name().cyan().bold(),
            generator.quote_identifier("users.id"),
            generator.placeholder(1),
            generator.bool_literal(true),
            if generator.supports_returning() { "yes".green() } else { "no".red() }
        );
    }
}

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use passbook_core::{AccountType, Classifier, DocumentError, RuleTable};
use passbook_finance::Report;
use passbook_ingest::{PdfDocument, StatementOutcome, StatementParser, parse_source};
use std::path::PathBuf;
use tracing::error;

mod config;

#[derive(Parser, Debug)]
#[command(name = "passbook", version, about = "ICICI statement parser and spending summary")]
struct Cli {
    /// Config file (defaults to ~/.passbook/config.toml)
    #[arg(long = "config", global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse debit and/or credit statements, print a summary, write a CSV report
    Parse {
        /// Savings account statement PDF
        #[arg(long)]
        debit: Option<PathBuf>,

        /// Credit card statement PDF
        #[arg(long)]
        credit: Option<PathBuf>,

        /// PDF password
        #[arg(long, env = "PASSBOOK_PASSWORD", hide_env_values = true)]
        password: String,

        /// CSV report path (overrides config)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print records as JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file
    Init,
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::from_default_env().add_directive("passbook=info".parse()?);
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let config_path = match cli.config_file {
        Some(p) => p,
        None => config::config_path()?,
    };

    match cli.command {
        Command::Parse {
            debit,
            credit,
            password,
            report,
            json,
        } => {
            let cfg = config::load_config(&config_path)?;
            let report_path = report.unwrap_or_else(|| cfg.report.path.clone());
            run_parse(debit, credit, password, &cfg, report_path, json).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&config_path)?,
        },
    }

    Ok(())
}

/// Outcome of one document, in the order the documents were given
struct DocumentResult {
    path: PathBuf,
    account_type: AccountType,
    outcome: std::result::Result<StatementOutcome, DocumentError>,
}

/// Parse each document on its own blocking task. A document-level failure
/// is kept in its result and does not affect the others.
async fn parse_documents(
    documents: Vec<(PathBuf, AccountType)>,
    password: &str,
    cfg: &config::Config,
) -> Result<Vec<DocumentResult>> {
    let mut jobs = Vec::new();
    for (path, account_type) in documents {
        let parser = StatementParser::new(Classifier::new(
            RuleTable::standard(),
            cfg.direction.policy_for(account_type),
        ));
        let password = password.to_string();
        let job_path = path.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let pdf = PdfDocument::open_path(&job_path, &password)?;
            Ok::<_, DocumentError>(parse_source(&pdf, account_type, &parser))
        });
        jobs.push((path, account_type, handle));
    }

    let mut results = Vec::new();
    for (path, account_type, handle) in jobs {
        let outcome = handle
            .await
            .with_context(|| format!("parsing {}", path.display()))?;
        results.push(DocumentResult {
            path,
            account_type,
            outcome,
        });
    }
    Ok(results)
}

async fn run_parse(
    debit: Option<PathBuf>,
    credit: Option<PathBuf>,
    password: String,
    cfg: &config::Config,
    report_path: PathBuf,
    json: bool,
) -> Result<()> {
    // Debit results come first
    let documents: Vec<(PathBuf, AccountType)> = [
        (debit, AccountType::Debit),
        (credit, AccountType::Credit),
    ]
    .into_iter()
    .filter_map(|(path, account_type)| path.map(|p| (p, account_type)))
    .collect();
    if documents.is_empty() {
        bail!("nothing to parse (pass --debit <pdf> and/or --credit <pdf>)");
    }

    let mut combined = Report::default();
    let mut failures = 0;

    for doc in parse_documents(documents, &password, cfg).await? {
        match doc.outcome {
            Ok(outcome) => {
                if !json {
                    println!(
                        "{} statement {}: {} records, {} discarded lines, {} unreadable pages",
                        doc.account_type,
                        doc.path.display(),
                        outcome.parsed.records.len(),
                        outcome.parsed.discard_count(),
                        outcome.unreadable_pages.len()
                    );
                }
                combined.extend(outcome.into_records());
            }
            Err(e) => {
                failures += 1;
                error!(path = %doc.path.display(), account_type = %doc.account_type, "{}", e);
                eprintln!("{} statement {}: {}", doc.account_type, doc.path.display(), e);
            }
        }
    }

    if failures > 0 && combined.is_empty() {
        bail!("no statement could be read");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(combined.records())?);
    } else {
        print_summary(&combined);
    }

    combined
        .write_csv_path(&report_path)
        .with_context(|| format!("writing {}", report_path.display()))?;
    if !json {
        println!("\nReport: {}", report_path.display());
    }

    Ok(())
}

fn print_summary(report: &Report) {
    let summary = report.summary();

    println!("\n# Summary\n");
    println!("Transactions:   {}", summary.record_count);
    println!("Total income:   ₹{:.2}", summary.total_income);
    println!("Total expenses: ₹{:.2}", summary.total_expenses);

    if summary.expenses_by_category.is_empty() {
        return;
    }

    println!("\n## Expenses by category\n");
    for c in &summary.expenses_by_category {
        println!(
            "- {:<14} ₹{:>12.2}  ({} txns)",
            c.category.label(),
            c.total,
            c.transaction_count
        );
    }
}

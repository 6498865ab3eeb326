// matchbook CLI - headless two-sided transfer reconciliation

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use matchbook_recon::layout::{self, Layout};
use matchbook_recon::{reconcile, RunConfig};

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_LOAD, EXIT_SUCCESS, EXIT_UNMATCHED};

#[derive(Parser)]
#[command(name = "matchbook")]
#[command(about = "Reconcile two-sided transfer ledgers from a spreadsheet")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a spreadsheet, reconcile both sides, write the partitioned outputs
    #[command(after_help = "\
Examples:
  matchbook run ledger.xlsx
  matchbook run ledger.csv --sort --out-dir buckets/
  matchbook run ledger.xlsx --sheet Transfers --report closing.xlsx
  matchbook run ledger.xlsx --config july.toml --json
  matchbook run ledger.xlsx --layout 5 --skip-rows 1 --output result.json

Exits 0 when every row matched, 3 when unmatched rows remain.")]
    Run {
        /// Spreadsheet to reconcile (.xlsx/.xls/.xlsb/.ods, or delimited text)
        file: PathBuf,

        /// TOML run config; flags below override its fields
        #[arg(long)]
        config: Option<PathBuf>,

        /// Force the column layout (4, 5 or 6); default is auto-detect
        #[arg(long)]
        layout: Option<Layout>,

        /// Excel sheet name (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Leading rows to ignore
        #[arg(long, value_name = "N")]
        skip_rows: Option<usize>,

        /// Sort matched/unmatched outputs ascending by amount
        #[arg(long)]
        sort: bool,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the full result as JSON to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the six buckets as CSV files into a directory
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Write a six-sheet Excel report
        #[arg(long, value_name = "XLSX")]
        report: Option<PathBuf>,
    },

    /// Parse and validate a run config without running
    #[command(after_help = "\
Examples:
  matchbook validate july.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },

    /// Load and split a spreadsheet, print what the run would see
    #[command(after_help = "\
Examples:
  matchbook inspect ledger.xlsx
  matchbook inspect ledger.csv --layout 5 --json")]
    Inspect {
        /// Spreadsheet to inspect
        file: PathBuf,

        /// Excel sheet name (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Leading rows to ignore
        #[arg(long, value_name = "N", default_value_t = 0)]
        skip_rows: usize,

        /// Force the column layout (4, 5 or 6); default is auto-detect
        #[arg(long)]
        layout: Option<Layout>,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  matchbook-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  matchbook-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            config,
            layout,
            sheet,
            skip_rows,
            sort,
            json,
            output,
            out_dir,
            report,
        } => cmd_run(RunArgs {
            file,
            config,
            layout,
            sheet,
            skip_rows,
            sort,
            json,
            output,
            out_dir,
            report,
        }),
        Commands::Validate { config } => cmd_validate(config),
        Commands::Inspect {
            file,
            sheet,
            skip_rows,
            layout,
            json,
        } => cmd_inspect(file, sheet, skip_rows, layout, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn cli_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError {
        code,
        message: msg.into(),
        hint: None,
    }
}

struct RunArgs {
    file: PathBuf,
    config: Option<PathBuf>,
    layout: Option<Layout>,
    sheet: Option<String>,
    skip_rows: Option<usize>,
    sort: bool,
    json: bool,
    output: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    report: Option<PathBuf>,
}

fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(
        &mut config,
        args.layout,
        args.sheet.clone(),
        args.skip_rows,
        args.sort,
    );

    let table = matchbook_io::load_table(&args.file, config.input.sheet.as_deref())
        .map_err(|e| cli_err(EXIT_LOAD, format!("{}: {}", args.file.display(), e)))?;

    let result = reconcile(&table, &config).map_err(|e| cli_err(recon_exit_code(&e), e.to_string()))?;

    let sort = config.output.sort_by_amount;
    if let Some(ref dir) = args.out_dir {
        matchbook_io::report::write_csv_dir(&result, dir, sort)
            .map_err(|e| cli_err(EXIT_ERROR, e))?;
        eprintln!("wrote {}", dir.display());
    }
    if let Some(ref path) = args.report {
        matchbook_io::report::write_xlsx_report(&result, path, sort)
            .map_err(|e| cli_err(EXIT_ERROR, e))?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(ref path) = args.output {
        matchbook_io::report::write_json_file(&result, path)
            .map_err(|e| cli_err(EXIT_ERROR, e))?;
        eprintln!("wrote {}", path.display());
    }
    if args.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| cli_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} ({}): {} left / {} right — {} matched, {} potential, {} unmatched",
        result.meta.name,
        result.meta.layout,
        s.left_total,
        s.right_total,
        s.matched,
        s.potential,
        s.unmatched_left + s.unmatched_right,
    );
    eprintln!(
        "stats: {} strict pairs, {} fuzzy token hits, {} token-wise, {} whole-string",
        result.stats.strict_pairs,
        result.stats.fuzzy_token_hits,
        result.stats.fuzzy_token_pairs,
        result.stats.fuzzy_joined_pairs,
    );

    let unmatched = s.unmatched_left + s.unmatched_right;
    if unmatched > 0 {
        return Err(cli_err(
            EXIT_UNMATCHED,
            format!("{unmatched} unmatched row(s) remain"),
        ));
    }

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_ERROR, format!("cannot read config: {e}")))?;

    let config = RunConfig::from_toml(&config_str)
        .map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))?;

    let layout = match config.input.layout {
        Some(layout) => layout.to_string(),
        None => "auto".to_string(),
    };
    eprintln!(
        "valid: '{}', layout {}, skip_rows {}, sheet {}, sort_by_amount {}",
        config.name.as_deref().unwrap_or("reconciliation"),
        layout,
        config.input.skip_rows,
        config.input.sheet.as_deref().unwrap_or("(first)"),
        config.output.sort_by_amount,
    );
    Ok(())
}

fn cmd_inspect(
    file: PathBuf,
    sheet: Option<String>,
    skip_rows: usize,
    forced: Option<Layout>,
    json: bool,
) -> Result<(), CliError> {
    let table = matchbook_io::load_table(&file, sheet.as_deref())
        .map_err(|e| cli_err(EXIT_LOAD, format!("{}: {}", file.display(), e)))?;

    let split = layout::split(&table, forced, skip_rows)
        .map_err(|e| cli_err(recon_exit_code(&e), e.to_string()))?;

    if json {
        #[derive(serde::Serialize)]
        struct InspectReport {
            layout: Layout,
            left_rows: usize,
            right_rows: usize,
        }
        let report = InspectReport {
            layout: split.layout,
            left_rows: split.left.len(),
            right_rows: split.right.len(),
        };
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| cli_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    println!(
        "{}: {} layout, {} left row(s), {} right row(s)",
        file.display(),
        split.layout,
        split.left.len(),
        split.right.len(),
    );
    for (side, entries) in [("left", &split.left), ("right", &split.right)] {
        for entry in entries.iter().take(5) {
            println!(
                "  {} row {:>4}: {} | {}",
                side,
                entry.row,
                entry.name.display(),
                entry.amount.display(),
            );
        }
        if entries.len() > 5 {
            println!("  {} … {} more", side, entries.len() - 5);
        }
    }
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<RunConfig, CliError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| cli_err(EXIT_ERROR, format!("cannot read config: {e}")))?;
            RunConfig::from_toml(&text).map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))
        }
        None => Ok(RunConfig::default()),
    }
}

/// CLI flags win over whatever the config file says.
fn apply_overrides(
    config: &mut RunConfig,
    layout: Option<Layout>,
    sheet: Option<String>,
    skip_rows: Option<usize>,
    sort: bool,
) {
    if layout.is_some() {
        config.input.layout = layout;
    }
    if sheet.is_some() {
        config.input.sheet = sheet;
    }
    if let Some(n) = skip_rows {
        config.input.skip_rows = n;
    }
    if sort {
        config.output.sort_by_amount = true;
    }
}

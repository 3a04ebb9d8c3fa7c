// feascheck CLI - feasibility checks and master data ingestion, headless.

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use feascheck_engine::config::{CheckConfig, Mode};
use feascheck_engine::error::FeasError;
use feascheck_engine::normalize::normalize_headers;
use feascheck_store::{L2Store, MasterRepository};

use exit_codes::{feas_exit_code, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

/// Record store shared by the master and L2 datasets.
const DB_FILE: &str = "feascheck.db";
/// Flat-file mirror of the master dataset.
const MASTER_CACHE_FILE: &str = "master_data.xlsx";

#[derive(Parser)]
#[command(name = "feascheck")]
#[command(about = "Service feasibility checks against a master reference dataset")]
#[command(version)]
struct Cli {
    /// Directory holding the record store and master cache
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Optional TOML config (column aliases, default mode, output dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Master dataset operations
    Master {
        #[command(subcommand)]
        command: MasterCommands,
    },

    /// Run a feasibility check over an input file
    #[command(after_help = "\
Examples:
  feascheck check circuits.xlsx
  feascheck check circuits.csv --mode simple
  feascheck check circuits.xlsx --output result.xlsx --json")]
    Check {
        /// Input file (csv, tsv, xls, xlsx)
        input: PathBuf,

        /// Matching mode: simple (existence check) or advanced (status
        /// lookup with tiered fallback). Unrecognized values fall back to
        /// advanced.
        #[arg(long)]
        mode: Option<String>,

        /// Result file path (default: Feasibility_<mode>_<timestamp>.xlsx)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the full check result as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// L2 master list operations
    L2 {
        #[command(subcommand)]
        command: L2Commands,
    },
}

#[derive(Subcommand)]
enum MasterCommands {
    /// Replace the master dataset from an uploaded file
    #[command(after_help = "\
Examples:
  feascheck master upload master.xlsx
  feascheck master upload master.csv --config feascheck.toml")]
    Upload {
        /// Master file (csv, tsv, xls, xlsx)
        file: PathBuf,
    },

    /// Show master dataset status
    Status,
}

#[derive(Subcommand)]
enum L2Commands {
    /// Replace the L2 master list from an uploaded file
    Upload {
        /// L2 master file (csv, tsv, xls, xlsx)
        file: PathBuf,
    },

    /// Free-text search across the L2 master list (max 200 rows)
    Search {
        /// Query matched as a case-insensitive substring
        query: String,

        /// Print results as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let repo = MasterRepository::new(
        cli.data_dir.join(DB_FILE),
        cli.data_dir.join(MASTER_CACHE_FILE),
    );
    let l2 = L2Store::new(cli.data_dir.join(DB_FILE));

    let result = match cli.command {
        Commands::Master { command } => match command {
            MasterCommands::Upload { file } => cmd_master_upload(&repo, &config, &file),
            MasterCommands::Status => cmd_master_status(&repo),
        },
        Commands::Check {
            input,
            mode,
            output,
            json,
        } => cmd_check(&repo, &config, &input, mode.as_deref(), output, json),
        Commands::L2 { command } => match command {
            L2Commands::Upload { file } => cmd_l2_upload(&l2, &file),
            L2Commands::Search { query, json } => cmd_l2_search(&l2, &query, json),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
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

impl CliError {
    fn runtime(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_RUNTIME,
            message: msg.into(),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<FeasError> for CliError {
    fn from(err: FeasError) -> Self {
        let hint = match err {
            FeasError::NoMasterData | FeasError::EmptyMasterData => {
                Some("run 'feascheck master upload <file>' first".to_string())
            }
            _ => None,
        };
        Self {
            code: feas_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CheckConfig, FeasError> {
    match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| FeasError::Io(e.to_string()))?;
            CheckConfig::from_toml(&content)
        }
        None => Ok(CheckConfig::default()),
    }
}

// ============================================================================
// master
// ============================================================================

fn cmd_master_upload(
    repo: &MasterRepository,
    config: &CheckConfig,
    file: &Path,
) -> Result<(), CliError> {
    let mut table = feascheck_io::load_table(file)?;
    normalize_headers(&mut table);

    let projected = config.project_master(&table);
    let stored = repo.replace(&projected)?;

    eprintln!("master uploaded ({stored} rows)");
    Ok(())
}

fn cmd_master_status(repo: &MasterRepository) -> Result<(), CliError> {
    match repo.replaced_at()? {
        Some(ts) => {
            let table = repo.resolve()?;
            eprintln!("master: {} rows, replaced at {}", table.row_count(), ts);
        }
        None => eprintln!("master: no data uploaded"),
    }
    Ok(())
}

// ============================================================================
// check
// ============================================================================

fn cmd_check(
    repo: &MasterRepository,
    config: &CheckConfig,
    input_path: &Path,
    mode: Option<&str>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let mode = match mode {
        Some(value) => Mode::parse(Some(value)),
        None => config.default_mode,
    };

    let mut input = feascheck_io::load_table(input_path)?;
    feascheck_engine::prepare_input(&mut input);

    // An absent master reports per mode, same as an empty master table
    // inside the engine: simple keeps NoMasterData, advanced surfaces
    // EmptyMasterData so the exit codes stay distinct.
    let master = repo.resolve().map_err(|e| match (mode, e) {
        (Mode::Advanced, FeasError::NoMasterData) => FeasError::EmptyMasterData,
        (_, e) => e,
    })?;
    let result = feascheck_engine::run(mode, &input, &master)?;

    let output_path = output.unwrap_or_else(|| default_output_path(config, mode));
    feascheck_io::xlsx::export_result(&result.table, &output_path)
        .map_err(|e| CliError::runtime(e).with_hint("is the output file open elsewhere?"))?;

    if json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    let s = &result.summary;
    eprintln!(
        "{} check: {} rows ({} feasible, {} not feasible, {} wip, {} no match)",
        mode, s.total_rows, s.feasible, s.not_feasible, s.wip, s.no_match,
    );
    eprintln!("wrote {}", output_path.display());

    Ok(())
}

/// `Feasibility_<mode>_<timestamp>.xlsx` in the configured output dir.
fn default_output_path(config: &CheckConfig, mode: Mode) -> PathBuf {
    let filename = result_filename(mode, chrono::Local::now().naive_local());
    match &config.output_dir {
        Some(dir) => Path::new(dir).join(filename),
        None => PathBuf::from(filename),
    }
}

fn result_filename(mode: Mode, now: chrono::NaiveDateTime) -> String {
    format!("Feasibility_{}_{}.xlsx", mode, now.format("%Y%m%d%H%M%S"))
}

// ============================================================================
// l2
// ============================================================================

fn cmd_l2_upload(store: &L2Store, file: &Path) -> Result<(), CliError> {
    let table = feascheck_io::load_table(file)?;
    let stored = store.replace(&table)?;
    eprintln!("L2 master uploaded ({stored} rows)");
    Ok(())
}

fn cmd_l2_search(store: &L2Store, query: &str, json: bool) -> Result<(), CliError> {
    let results = store.search(query)?;

    if json {
        let data: Vec<serde_json::Value> = results
            .rows
            .iter()
            .map(|row| {
                results
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(col, val)| (col.clone(), serde_json::Value::String(val.clone())))
                    .collect::<serde_json::Map<_, _>>()
                    .into()
            })
            .collect();
        let payload = serde_json::json!({ "data": data });
        println!("{}", serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?);
    } else {
        println!("{}", results.columns.join("\t"));
        for row in &results.rows {
            println!("{}", row.join("\t"));
        }
    }

    eprintln!("{} row(s)", results.row_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_in(dir: &tempfile::TempDir) -> MasterRepository {
        MasterRepository::new(dir.path().join(DB_FILE), dir.path().join(MASTER_CACHE_FILE))
    }

    #[test]
    fn upload_then_check_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = CheckConfig::default();
        let repo = repo_in(&dir);

        let master_path = dir.path().join("master.csv");
        std::fs::write(&master_path, "City,Pincode,Status\nPUNE,411001,Feasible\n").unwrap();
        cmd_master_upload(&repo, &config, &master_path).unwrap();

        let input_path = dir.path().join("input.csv");
        std::fs::write(&input_path, "city,pincode\npune,411-001\nDELHI,110001\n").unwrap();

        let output = dir.path().join("result.xlsx");
        cmd_check(
            &repo,
            &config,
            &input_path,
            Some("simple"),
            Some(output.clone()),
            false,
        )
        .unwrap();

        let table = feascheck_io::xlsx::import_table(&output).unwrap();
        let col = table.column_index("Status").unwrap();
        assert_eq!(table.cell(0, col), "Feasible");
        assert_eq!(table.cell(1, col), "Not Feasible");
    }

    #[test]
    fn check_without_master_reports_per_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = CheckConfig::default();
        let repo = repo_in(&dir);

        let input_path = dir.path().join("input.csv");
        std::fs::write(&input_path, "city,pincode\nPUNE,411001\n").unwrap();

        let err = cmd_check(&repo, &config, &input_path, Some("simple"), None, false)
            .unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_NO_MASTER);

        let err = cmd_check(&repo, &config, &input_path, Some("advanced"), None, false)
            .unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_EMPTY_MASTER);
    }

    #[test]
    fn result_filename_format() {
        let ts = chrono::NaiveDate::from_ymd_opt(2026, 8, 25)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        assert_eq!(
            result_filename(Mode::Simple, ts),
            "Feasibility_simple_20260825143005.xlsx"
        );
        assert_eq!(
            result_filename(Mode::Advanced, ts),
            "Feasibility_advanced_20260825143005.xlsx"
        );
    }
}

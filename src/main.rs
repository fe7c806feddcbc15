use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use savings_dashboard::{
    detect_sheet, format_rupiah, format_short_rupiah, init_logging, is_valid_drive_id,
    parse_rupiah, write_log_csv, DashboardConfig, SheetPipeline,
};

/// Convert savings-tracker sheet exports into dashboard JSON
#[derive(Parser, Debug)]
#[command(name = "savings-dashboard", version, about)]
struct Cli {
    /// JSON settings file (default avatar id, default target, ...)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse any sheet, detecting its kind from the file name
    Sheet { file: PathBuf },

    /// Parse the config sheet
    Config { file: PathBuf },

    /// Parse the log sheet (newest first)
    Log {
        file: PathBuf,

        /// Write CSV instead of JSON
        #[arg(long)]
        csv: bool,
    },

    /// Parse the yearly series sheet (oldest first)
    Yearly { file: PathBuf },

    /// Build the full dashboard from config.csv, log.csv, yearly.csv in a directory
    Snapshot {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Validate an avatar id / Drive link and print the resolved URL
    Avatar {
        id: String,

        /// Display name used for placeholder initials
        #[arg(long)]
        name: Option<String>,
    },

    /// Parse an amount and print it in Rupiah format
    Format {
        amount: String,

        /// Abbreviated K/M/B form
        #[arg(long)]
        short: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = load_config(cli.settings.as_deref())?;
    let pipeline = SheetPipeline::new(config);

    match cli.command {
        Command::Sheet { file } => {
            let kind = detect_sheet(&file)?;
            eprintln!("📄 {} ({})", file.display(), kind.name());
            let rows = pipeline.read_rows(&file)?;
            print_json(&pipeline.extract_json(kind, &rows)?)?;
        }
        Command::Config { file } => {
            let rows = pipeline.read_rows(&file)?;
            print_json(&pipeline.config_record(&rows))?;
        }
        Command::Log { file, csv } => {
            let rows = pipeline.read_rows(&file)?;
            let entries = pipeline.log_entries(&rows);
            if csv {
                write_log_csv(&entries, std::io::stdout().lock())?;
            } else {
                print_json(&entries)?;
            }
        }
        Command::Yearly { file } => {
            let rows = pipeline.read_rows(&file)?;
            print_json(&pipeline.yearly_points(&rows))?;
        }
        Command::Snapshot { dir } => {
            let snapshot = pipeline.load_snapshot(&dir)?;
            eprintln!(
                "✓ {} | net {} / target {} ({:.1}%)",
                snapshot.config.dashboard_name,
                format_short_rupiah(snapshot.config.net_assets),
                format_short_rupiah(snapshot.config.target_asset),
                snapshot.progress_percent
            );
            print_json(&snapshot)?;
        }
        Command::Avatar { id, name } => {
            let valid = is_valid_drive_id(&id);
            println!("valid: {}", valid);
            if valid {
                println!("id:    {}", pipeline.resolver().extract_drive_id(&id));
            }
            println!("url:   {}", pipeline.avatar_url(&id, name.as_deref()));
        }
        Command::Format { amount, short } => {
            let value = parse_rupiah(&amount);
            let formatted = if short {
                format_short_rupiah(value)
            } else {
                format_rupiah(value)
            };
            println!("{}", formatted);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    let config = match path {
        Some(p) => DashboardConfig::from_file(p)?,
        None => DashboardConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

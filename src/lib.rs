// Savings Dashboard - Core Library
// Spreadsheet CSV exports → typed dashboard records, for the CLI, API server, and tests

pub mod tokenizer;  // Quote-aware CSV scanner
pub mod currency;   // Rupiah parse/format
pub mod dates;      // Sheet timestamps + id-ID display dates
pub mod avatar;     // Drive avatar lookup and URLs
pub mod config;     // Read-only dashboard constants
pub mod sheets;     // Config / log / yearly extractors
pub mod pipeline;   // Wiring + snapshot

// Re-export commonly used types
pub use tokenizer::{parse_csv, parse_line, Row};
pub use currency::{format_rupiah, format_short_rupiah, parse_amount, parse_rupiah};
pub use dates::{format_display_date, parse_date_safe};
pub use avatar::{is_valid_drive_id, AvatarResolver};
pub use config::DashboardConfig;
pub use sheets::{
    detect_sheet, ConfigRecord, ConfigSheet, LogEntry, LogSheet, SheetExtractor, SheetKind,
    YearlyPoint, YearlySheet,
};
pub use pipeline::{write_log_csv, DashboardSnapshot, SheetPipeline};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the tracing subscriber used by both binaries (RUST_LOG, default "info")
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

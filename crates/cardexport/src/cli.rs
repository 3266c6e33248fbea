//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// cardexport - vCard exporter for contacts and call history
#[derive(Parser, Debug, Default)]
#[command(name = "cardexport")]
#[command(version)]
#[command(about = "Export contacts or call history to vCard 2.1/3.0 files")]
#[command(long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// JSON record file to export
    #[arg(short, long, conflicts_with = "db")]
    pub input: Option<PathBuf>,

    /// SQLite address book to export
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Path to output vCard file [default: contacts.vcf]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// vCard dialect (default, v21_generic, v30_generic, docomo, ...)
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Output charset override (UTF-8 or SHIFT_JIS)
    #[arg(long)]
    pub charset: Option<String>,

    /// Export call history instead of contacts
    #[arg(long)]
    pub call_log: bool,

    /// Only export these record ids (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<i64>,

    /// Only export calls at or after this time (milliseconds since the epoch)
    #[arg(long)]
    pub since: Option<i64>,

    /// Keep going when an output handler fails
    #[arg(long)]
    pub lenient: bool,

    /// Skip contacts whose photos exceed this many bytes
    #[arg(long)]
    pub max_photo_bytes: Option<usize>,

    /// Configuration file [default: <config dir>/cardexport/config.json]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

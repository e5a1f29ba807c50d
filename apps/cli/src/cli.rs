//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tether_log::Format;

/// Convert single values to and from their canonical string form
#[derive(Parser, Debug)]
#[command(name = "tether", version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./tether.toml if present)
    #[arg(long, global = true, env = "TETHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directives, e.g. `debug` or `tether_convert=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true)]
    pub log_format: Option<Format>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode text and print the resulting value
    Decode {
        /// Canonical type name (see `tether types`)
        type_name: String,
        /// Text to decode; may start with `-` (`-5`, `-0043-03-15T00:00:00Z`)
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    /// Decode text and print its canonical encoding
    Encode {
        /// Canonical type name (see `tether types`)
        type_name: String,
        /// Text to normalize; may start with `-`
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    /// List every known type name
    Types,
}

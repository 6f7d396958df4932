//! Command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::ruler;

#[derive(Debug, Parser)]
#[command(name = "task-receipt")]
#[command(about = "Print task receipts on an ESC/POS thermal printer", version)]
pub struct Cli {
    /// Printer target: driver name, IP[:port], tcp://host:port or device path
    #[arg(long, global = true)]
    pub printer: Option<String>,

    /// Printer profile (NT-80-V-UL, default, 58mm, gbk-80)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one task receipt
    Print {
        /// Task title
        #[arg(short, long, required_unless_present = "sample", conflicts_with = "sample")]
        title: Option<String>,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority: 0 future/breakdown, 1 low, 2 medium, 3 high
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=3))]
        priority: i64,

        /// Print a built-in sample instead (1-based)
        #[arg(short, long)]
        sample: Option<usize>,
    },

    /// Print every sample and a ruler, or all tasks from a JSON file
    PrintAll {
        /// JSON array of {title, description, priority}
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print an image (PNG, JPEG, ...) scaled to the paper width
    PrintImage { path: PathBuf },

    /// Print plain text followed by a cut
    Text { text: String },

    /// Write text and HTML previews without printing
    Preview {
        #[arg(short, long, default_value = "Buy Groceries")]
        title: String,

        #[arg(
            short,
            long,
            default_value = "Pick up milk, eggs, bread, and coffee from the store before 6pm."
        )]
        description: String,

        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(i64).range(0..=3))]
        priority: i64,

        /// Preview a character ruler of this length instead
        #[arg(long, conflicts_with_all = ["title", "description"])]
        ruler: Option<usize>,
    },

    /// Show a character-limit ruler
    Ruler {
        #[arg(default_value_t = ruler::DEFAULT_LIMIT)]
        limit: usize,

        /// Characters between [N] markers, 0 for none
        #[arg(short, long, default_value_t = ruler::DEFAULT_INTERVAL)]
        interval: usize,
    },

    /// Print numbered lines to measure paper used on 80mm rolls
    Grid {
        /// Total lines including the title and rules
        #[arg(default_value_t = ruler::LENGTH_TEST_LINES)]
        lines: usize,
    },

    /// List the built-in samples
    Samples,

    /// Check whether the printer is reachable
    Status,
}

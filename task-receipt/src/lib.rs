//! # task-receipt
//!
//! Prints one-task receipts on an 80mm ESC/POS thermal printer.
//!
//! A receipt is a bordered header with the upper-cased title and priority,
//! the word-wrapped description, and a timestamp footer. Text and HTML
//! previews can be produced without a printer.
//!
//! Printing itself (ESC/POS, code pages, transports) lives in
//! `ticket-printer`.

pub mod cli;
pub mod config;
pub mod error;
pub mod html;
pub mod logger;
pub mod receipt;
pub mod render;
pub mod ruler;
pub mod service;
pub mod tasks;

pub use config::Config;
pub use error::{ReceiptError, ReceiptResult};
pub use receipt::{Priority, Receipt, ReceiptLayout};
pub use render::{ImageReceiptRenderer, TextReceiptRenderer};
pub use service::{BatchReport, PrintService};
pub use tasks::Task;

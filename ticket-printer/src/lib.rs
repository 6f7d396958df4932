//! # ticket-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Code page handling (Windows-1252, GBK)
//! - Printer capability profiles (paper width, dots, encoding)
//! - Monochrome images (raster and column bit-image modes)
//! - Network printing (TCP port 9100)
//! - Raw device / serial port printing
//! - Windows driver printing (raw spooler jobs)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Task receipt layout → task-receipt
//!
//! ## Example
//!
//! ```ignore
//! use ticket_printer::{AnyPrinter, EscPosBuilder, Printer, PrinterProfile, PrinterTarget};
//!
//! let profile = PrinterProfile::lookup("NT-80-V-UL")?;
//! let target: PrinterTarget = "192.168.1.100".parse()?;
//!
//! let mut builder = EscPosBuilder::for_profile(&profile);
//! builder.line("BUY GROCERIES");
//! builder.feed(6);
//! builder.cut();
//!
//! let printer = AnyPrinter::connect(&target)?;
//! printer.print(&builder.build()).await?;
//! ```

mod bitmap;
mod encoding;
mod error;
mod escpos;
mod profile;
mod transport;

// Re-exports
pub use bitmap::{MAX_RASTER_ROWS, MonoImage};
pub use encoding::{TextEncoding, encode_text};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use profile::PrinterProfile;
pub use transport::{
    AnyPrinter, DEFAULT_NETWORK_PORT, DevicePrinter, NetworkPrinter, Printer, PrinterTarget,
};

#[cfg(windows)]
pub use transport::WindowsPrinter;

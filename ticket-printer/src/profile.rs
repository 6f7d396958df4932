//! Printer capability profiles
//!
//! A profile describes what a printer model can do: how many characters fit
//! on a line in font A, how many dots the head can print, which code page
//! text is sent in, and whether the cutter supports partial cuts.

use crate::encoding::TextEncoding;
use crate::error::{PrintError, PrintResult};

/// Capability profile of a printer model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterProfile {
    /// Profile name, as passed on the command line / config
    pub name: &'static str,
    /// Characters per line in font A
    pub columns: usize,
    /// Printable width in dots
    pub dots: u32,
    /// Code page used for text
    pub encoding: TextEncoding,
    /// Cutter supports partial cuts (`GS V 66 n`)
    pub partial_cut: bool,
}

const PROFILES: &[PrinterProfile] = &[
    // Generic 80mm USB printer shipped with the "POS-80" virtual port driver
    PrinterProfile {
        name: "NT-80-V-UL",
        columns: 48,
        dots: 576,
        encoding: TextEncoding::Windows1252,
        partial_cut: true,
    },
    PrinterProfile {
        name: "default",
        columns: 48,
        dots: 512,
        encoding: TextEncoding::Windows1252,
        partial_cut: false,
    },
    PrinterProfile {
        name: "58mm",
        columns: 32,
        dots: 384,
        encoding: TextEncoding::Windows1252,
        partial_cut: false,
    },
    PrinterProfile {
        name: "gbk-80",
        columns: 48,
        dots: 576,
        encoding: TextEncoding::Gbk,
        partial_cut: true,
    },
];

impl PrinterProfile {
    /// Find a built-in profile by name (case-insensitive)
    pub fn lookup(name: &str) -> PrintResult<Self> {
        PROFILES
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .copied()
            .ok_or_else(|| {
                PrintError::InvalidConfig(format!(
                    "Unknown printer profile: {} (known: {})",
                    name,
                    Self::names().join(", ")
                ))
            })
    }

    /// Names of all built-in profiles
    pub fn names() -> Vec<&'static str> {
        PROFILES.iter().map(|p| p.name).collect()
    }
}

impl Default for PrinterProfile {
    fn default() -> Self {
        PROFILES[0].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let p = PrinterProfile::lookup("nt-80-v-ul").unwrap();
        assert_eq!(p.name, "NT-80-V-UL");
        assert_eq!(p.columns, 48);
        assert_eq!(p.dots, 576);
        assert!(p.partial_cut);
    }

    #[test]
    fn test_lookup_unknown() {
        let err = PrinterProfile::lookup("TM-T88").unwrap_err();
        assert!(matches!(err, PrintError::InvalidConfig(_)));
        assert!(err.to_string().contains("58mm"));
    }

    #[test]
    fn test_default_profile() {
        assert_eq!(PrinterProfile::default().name, "NT-80-V-UL");
    }
}

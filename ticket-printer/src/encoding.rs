//! Text encoding for thermal printer code pages
//!
//! ESC/POS printers do not speak UTF-8. Text has to be converted to the
//! code page the printer was switched into, one byte (or two, for GBK)
//! per printed cell. This module provides:
//! - Selecting/releasing a code page on the printer
//! - Converting UTF-8 text into that code page

use tracing::instrument;

/// Code page used for printed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Western European code page (WPC1252, `ESC t 16`)
    #[default]
    Windows1252,
    /// Simplified Chinese double-byte mode on Chinese firmware
    Gbk,
}

/// Euro sign on GBK firmware: leave Chinese mode, PC858 0xD5, re-enter.
const GBK_EURO: [u8; 8] = [0x1C, 0x2E, 0x1B, 0x74, 19, 0xD5, 0x1C, 0x26];

impl TextEncoding {
    fn codec(self) -> &'static encoding_rs::Encoding {
        match self {
            TextEncoding::Windows1252 => encoding_rs::WINDOWS_1252,
            TextEncoding::Gbk => encoding_rs::GBK,
        }
    }

    /// Short name used in profiles and logs
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Gbk => "gbk",
        }
    }

    /// Commands switching the printer into this encoding
    ///
    /// Must be re-sent after every `ESC @`, which resets the code page.
    pub fn select_command(self) -> &'static [u8] {
        match self {
            // ESC t 16 - Select WPC1252
            TextEncoding::Windows1252 => &[0x1B, 0x74, 16],
            // FS & - Enable Chinese mode, FS C 1 - Select GBK
            TextEncoding::Gbk => &[0x1C, 0x26, 0x1C, 0x43, 0x01],
        }
    }

    /// Commands leaving this encoding at the end of a job
    pub fn release_command(self) -> &'static [u8] {
        match self {
            TextEncoding::Windows1252 => &[],
            // FS . - Cancel Chinese mode
            TextEncoding::Gbk => &[0x1C, 0x2E],
        }
    }

    /// Encode a single character, `None` if the code page has no mapping
    fn encode_char(self, c: char) -> Option<Vec<u8>> {
        let mut utf8 = [0u8; 4];
        let (bytes, _, had_errors) = self.codec().encode(c.encode_utf8(&mut utf8));
        if had_errors {
            None
        } else {
            Some(bytes.into_owned())
        }
    }
}

/// Convert UTF-8 text into printer bytes for the given code page
///
/// ASCII passes through untouched. Unmappable characters become `?`.
#[instrument(skip(s), fields(len = s.len(), encoding = encoding.name()))]
pub fn encode_text(s: &str, encoding: TextEncoding) -> Vec<u8> {
    if s.is_ascii() {
        return s.as_bytes().to_vec();
    }

    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c as u8);
        } else if encoding == TextEncoding::Gbk && c == '€' {
            out.extend_from_slice(&GBK_EURO);
        } else {
            match encoding.encode_char(c) {
                Some(bytes) => out.extend_from_slice(&bytes),
                None => out.push(b'?'),
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_windows_1252() {
        assert_eq!(encode_text("café", TextEncoding::Windows1252), b"caf\xE9");
        assert_eq!(encode_text("5€", TextEncoding::Windows1252), b"5\x80");
        assert_eq!(encode_text("ok ✓", TextEncoding::Windows1252), b"ok ?");
    }

    #[test]
    fn test_encode_gbk() {
        assert_eq!(
            encode_text("你好", TextEncoding::Gbk),
            vec![0xC4, 0xE3, 0xBA, 0xC3]
        );

        let euro = encode_text("1€", TextEncoding::Gbk);
        assert_eq!(euro[0], b'1');
        assert_eq!(&euro[1..], &GBK_EURO);
    }

    #[test]
    fn test_select_and_release() {
        assert_eq!(TextEncoding::Windows1252.select_command(), &[0x1B, 0x74, 16]);
        assert!(TextEncoding::Windows1252.release_command().is_empty());
        assert_eq!(TextEncoding::Gbk.release_command(), &[0x1C, 0x2E]);
    }
}

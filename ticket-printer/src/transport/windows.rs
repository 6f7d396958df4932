//! Windows driver printer
//!
//! Sends RAW spooler jobs through an installed driver, e.g. the "POS-80"
//! virtual USB port registered by the vendor driver. The spooler passes the
//! bytes through untouched.

use core::ffi::c_void;

use tracing::{info, instrument, warn};
use windows::Win32::Graphics::Printing::{
    ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, EnumPrintersW, GetPrinterW,
    OpenPrinterW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_HANDLE, PRINTER_INFO_5W,
    PRINTER_INFO_6, PRINTER_STATUS_OFFLINE, StartDocPrinterW, StartPagePrinter, WritePrinter,
};
use windows::core::{PCWSTR, PWSTR};

use super::Printer;
use crate::error::{PrintError, PrintResult};

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Open spooler handle, closed on drop
struct SpoolerHandle(PRINTER_HANDLE);

impl SpoolerHandle {
    fn open(name: &str) -> PrintResult<Self> {
        let name_w = to_wide(name);
        let mut handle = PRINTER_HANDLE::default();
        unsafe { OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None) }
            .map_err(|e| PrintError::WindowsPrinter(format!("OpenPrinterW({}): {}", name, e)))?;
        Ok(Self(handle))
    }

    /// Fetch a PRINTER_INFO_* structure into an owned buffer
    fn info(&self, level: u32) -> Option<Vec<u8>> {
        let mut needed: u32 = 0;
        unsafe {
            let _ = GetPrinterW(self.0, level, None, &mut needed);
        }
        if needed == 0 {
            return None;
        }
        let mut buf = vec![0u8; needed as usize];
        unsafe { GetPrinterW(self.0, level, Some(buf.as_mut_slice()), &mut needed) }
            .ok()
            .map(|_| buf)
    }

    fn is_marked_offline(&self) -> bool {
        self.info(6).is_some_and(|buf| {
            let info = unsafe { &*(buf.as_ptr() as *const PRINTER_INFO_6) };
            info.dwStatus & PRINTER_STATUS_OFFLINE != 0
        })
    }

    fn port_name(&self) -> String {
        self.info(5)
            .and_then(|buf| {
                let info = unsafe { &*(buf.as_ptr() as *const PRINTER_INFO_5W) };
                if info.pPortName.is_null() {
                    None
                } else {
                    unsafe { PWSTR(info.pPortName.0).to_string().ok() }
                }
            })
            .unwrap_or_default()
    }
}

impl Drop for SpoolerHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = ClosePrinter(self.0);
        }
    }
}

/// Printer installed through a Windows driver
#[derive(Debug, Clone)]
pub struct WindowsPrinter {
    name: String,
}

impl WindowsPrinter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// List installed printers, skipping file/XPS/OneNote style virtual ports
    pub fn list() -> PrintResult<Vec<String>> {
        let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
        let mut needed: u32 = 0;
        let mut returned: u32 = 0;

        unsafe {
            let _ = EnumPrintersW(flags, None, 5, None, &mut needed, &mut returned);
        }
        if needed == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; needed as usize];
        unsafe {
            EnumPrintersW(
                flags,
                None,
                5,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
        }
        .map_err(|e| PrintError::WindowsPrinter(format!("EnumPrintersW: {}", e)))?;

        let infos = unsafe {
            std::slice::from_raw_parts(buf.as_ptr() as *const PRINTER_INFO_5W, returned as usize)
        };

        Ok(infos
            .iter()
            .filter(|info| !info.pPrinterName.is_null())
            .filter_map(|info| {
                let name = unsafe { PWSTR(info.pPrinterName.0).to_string().ok()? };
                let port = if info.pPortName.is_null() {
                    String::new()
                } else {
                    unsafe { PWSTR(info.pPortName.0).to_string().unwrap_or_default() }
                };
                (!is_virtual_port(&port)).then_some(name)
            })
            .collect())
    }

    /// Check the spooler status; IP ports (`IP_x.x.x.x`) are checked with a TCP connect on 9100
    pub fn check_online(name: &str) -> PrintResult<bool> {
        use std::net::{TcpStream, ToSocketAddrs};
        use std::time::Duration;

        let handle = SpoolerHandle::open(name)?;
        if handle.is_marked_offline() {
            return Ok(false);
        }
        let port = handle.port_name().to_lowercase();
        drop(handle);

        if let Some(host) = port.strip_prefix("ip_") {
            let host = host.split(',').next().unwrap_or(host);
            let reachable = format!("{}:9100", host)
                .to_socket_addrs()
                .ok()
                .and_then(|mut addrs| addrs.next())
                .is_some_and(|addr| {
                    TcpStream::connect_timeout(&addr, Duration::from_millis(400)).is_ok()
                });
            return Ok(reachable);
        }

        Ok(true)
    }

    /// Send raw ESC/POS data synchronously
    #[instrument(skip(self, data), fields(printer = %self.name, data_len = data.len()))]
    pub fn print_sync(&self, data: &[u8]) -> PrintResult<()> {
        if !Self::check_online(&self.name).unwrap_or(true) {
            return Err(PrintError::Offline(self.name.clone()));
        }

        let handle = SpoolerHandle::open(&self.name)?;

        let doc_name = to_wide("Task Receipt");
        let datatype = to_wide("RAW");
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name.as_ptr() as *mut _),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype.as_ptr() as *mut _),
        };

        unsafe {
            if StartDocPrinterW(handle.0, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                return Err(PrintError::WindowsPrinter(
                    "StartDocPrinter failed".to_string(),
                ));
            }

            if !StartPagePrinter(handle.0).as_bool() {
                let _ = EndDocPrinter(handle.0);
                return Err(PrintError::WindowsPrinter(
                    "StartPagePrinter failed".to_string(),
                ));
            }

            let mut written: u32 = 0;
            let ok = WritePrinter(
                handle.0,
                data.as_ptr() as *const c_void,
                data.len() as u32,
                &mut written,
            );

            let _ = EndPagePrinter(handle.0);
            let _ = EndDocPrinter(handle.0);

            if !ok.as_bool() {
                return Err(PrintError::WindowsPrinter("WritePrinter failed".to_string()));
            }
            if written as usize != data.len() {
                warn!(written, "incomplete spooler write");
                return Err(PrintError::WindowsPrinter("Incomplete write".to_string()));
            }
        }

        info!("print job spooled");
        Ok(())
    }
}

fn is_virtual_port(port: &str) -> bool {
    let p = port.to_lowercase();
    matches!(p.as_str(), "file:" | "portprompt:" | "xpsport:" | "nul:")
        || p.starts_with("onenote")
        || p.starts_with("wfsport:")
}

impl Printer for WindowsPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        // Spooler calls block, keep them off the runtime threads
        let printer = self.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || printer.print_sync(&data))
            .await
            .map_err(|e| PrintError::WindowsPrinter(format!("Task join failed: {}", e)))?
    }

    async fn is_online(&self) -> bool {
        let name = self.name.clone();
        tokio::task::spawn_blocking(move || Self::check_online(&name).unwrap_or(false))
            .await
            .unwrap_or(false)
    }
}

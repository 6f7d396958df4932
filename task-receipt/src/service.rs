//! Print service
//!
//! Renders receipts for the configured profile and hands them to a printer,
//! retrying failed sends.

use std::path::Path;
use std::time::Duration;

use ticket_printer::{PrintResult, Printer, PrinterProfile};
use tracing::{error, info, instrument, warn};

use crate::error::{ReceiptError, ReceiptResult};
use crate::receipt::Receipt;
use crate::render::{ImageReceiptRenderer, TextReceiptRenderer, render_text};
use crate::tasks::Task;

/// Outcome of printing several tasks
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Titles printed successfully, in order
    pub printed: Vec<String>,
    /// (title, error) for every task that failed
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.printed.len() + self.failed.len()
    }
}

pub struct PrintService<P: Printer> {
    printer: P,
    profile: PrinterProfile,
    retries: u32,
    retry_delay: Duration,
}

impl<P: Printer> PrintService<P> {
    /// Service that sends each job once
    pub fn new(printer: P, profile: PrinterProfile) -> Self {
        Self {
            printer,
            profile,
            retries: 0,
            retry_delay: Duration::from_secs(1),
        }
    }

    /// Retry failed sends `retries` more times
    ///
    /// The delay doubles after every failed attempt.
    pub fn with_retry(mut self, retries: u32, delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = delay;
        self
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    pub fn profile(&self) -> &PrinterProfile {
        &self.profile
    }

    /// Send raw bytes with retries
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn send(&self, data: &[u8]) -> PrintResult<()> {
        let mut delay = self.retry_delay;
        let mut attempt = 0;

        loop {
            match self.printer.print(data).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        retries = self.retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "print failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Print one task receipt
    #[instrument(skip(self, receipt), fields(title = receipt.title(), priority = %receipt.priority()))]
    pub async fn print_receipt(&self, receipt: &Receipt) -> ReceiptResult<()> {
        let data = TextReceiptRenderer::new(self.profile).render(receipt);
        self.send(&data).await?;
        info!("receipt printed");
        Ok(())
    }

    /// Print plain text followed by a cut
    pub async fn print_text(&self, text: &str) -> ReceiptResult<()> {
        if text.trim().is_empty() {
            return Err(ReceiptError::EmptyJob("text is empty".into()));
        }
        self.send(&render_text(&self.profile, text)).await?;
        info!(chars = text.chars().count(), "text printed");
        Ok(())
    }

    /// Print an image file scaled to the paper width
    #[instrument(skip(self))]
    pub async fn print_image(&self, path: &Path) -> ReceiptResult<()> {
        let data = ImageReceiptRenderer::new(self.profile).render_file(path)?;
        self.send(&data).await?;
        info!("image printed");
        Ok(())
    }

    /// Print tasks one after another
    ///
    /// A failed task is recorded and the batch carries on.
    pub async fn print_batch(&self, tasks: &[Task]) -> ReceiptResult<BatchReport> {
        if tasks.is_empty() {
            return Err(ReceiptError::EmptyJob("no tasks".into()));
        }

        let mut report = BatchReport::default();
        for (i, task) in tasks.iter().enumerate() {
            info!(index = i + 1, total = tasks.len(), title = %task.title, "printing task");
            match self.print_receipt(&task.receipt()).await {
                Ok(()) => report.printed.push(task.title.clone()),
                Err(e) => {
                    error!(title = %task.title, error = %e, "task failed");
                    report.failed.push((task.title.clone(), e.to_string()));
                }
            }
        }

        info!(
            printed = report.printed.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        Ok(report)
    }

    pub async fn is_online(&self) -> bool {
        self.printer.is_online().await
    }
}

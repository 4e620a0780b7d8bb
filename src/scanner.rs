//! Mailbox scanner — the one-shot orchestration loop.
//!
//! Lists unread messages, then drives each one through
//! extract → normalize → analyze → report → mark-read. Messages are
//! processed sequentially and independently: any per-message failure is
//! logged and the scan moves on. Only an authentication failure aborts,
//! since it would repeat for every remaining message.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::analysis::Analyzer;
use crate::error::{AnalysisError, Error, MailboxError};
use crate::extract::extract_body;
use crate::mailbox::MailboxProvider;
use crate::normalize::normalize;
use crate::report::render_report;

/// Counts for one completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Unread messages the provider listed.
    pub listed: usize,
    /// Messages analyzed, reported, and marked read.
    pub analyzed: usize,
    /// Messages skipped before analysis (no readable body).
    pub skipped: usize,
    /// Messages that failed at any stage and were left unread.
    pub failed: usize,
}

enum Outcome {
    Analyzed,
    Skipped(&'static str),
}

/// One-shot scanner over a mailbox provider.
pub struct MailboxScanner {
    mailbox: Arc<dyn MailboxProvider>,
    analyzer: Analyzer,
}

impl MailboxScanner {
    pub fn new(mailbox: Arc<dyn MailboxProvider>, analyzer: Analyzer) -> Self {
        Self { mailbox, analyzer }
    }

    /// Scan every unread message once.
    pub async fn scan(&self) -> Result<ScanSummary, MailboxError> {
        let ids = self.mailbox.list_unread().await?;

        if ids.is_empty() {
            println!("No new messages.");
            return Ok(ScanSummary::default());
        }

        info!(count = ids.len(), "Processing unread messages");

        let mut summary = ScanSummary {
            listed: ids.len(),
            ..Default::default()
        };

        for id in &ids {
            match self.process_message(id).await {
                Ok(Outcome::Analyzed) => summary.analyzed += 1,
                Ok(Outcome::Skipped(reason)) => {
                    summary.skipped += 1;
                    debug!(id = %id, reason, "Skipped message");
                }
                Err(Error::Mailbox(e @ MailboxError::Auth { .. })) => {
                    error!(id = %id, error = %e, "Authentication failed; aborting scan");
                    return Err(e);
                }
                Err(e) => {
                    summary.failed += 1;
                    report_failure(id, &e);
                }
            }
        }

        info!(
            listed = summary.listed,
            analyzed = summary.analyzed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Scan finished"
        );

        Ok(summary)
    }

    /// Process a single message start to finish.
    ///
    /// Mark-read happens last, only after the report has been produced,
    /// so a failed analysis leaves the message unread.
    async fn process_message(&self, id: &str) -> Result<Outcome, Error> {
        let message = self.mailbox.get(id).await?;
        let sender = message.header("From").unwrap_or("(unknown sender)").to_string();

        let body = extract_body(&message)?;
        if body.trim().is_empty() {
            return Ok(Outcome::Skipped("no readable body"));
        }

        let cleaned = normalize(&body);
        let analysis = self.analyzer.analyze(&cleaned).await?;

        print!("{}", render_report(&sender, &analysis));

        self.mailbox.mark_read(id).await?;
        Ok(Outcome::Analyzed)
    }
}

/// Log a per-message failure, keeping the failure classes distinct.
fn report_failure(id: &str, error: &Error) {
    match error {
        Error::Mailbox(e) => {
            warn!(id, error = %e, "Mailbox provider error; message skipped");
        }
        Error::Extract(e) => {
            warn!(id, error = %e, "Could not decode message body; message skipped");
        }
        Error::Analysis(AnalysisError::MalformedResponse { reason, raw }) => {
            warn!(
                id,
                reason = %reason,
                raw = %raw,
                "Model reply was not parseable; message left unread"
            );
        }
        Error::Analysis(e) => {
            warn!(id, error = %e, "Analysis failed; message left unread");
        }
        Error::Config(e) => {
            // Config errors cannot originate mid-scan; logged for completeness.
            warn!(id, error = %e, "Unexpected configuration error");
        }
    }
}

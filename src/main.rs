use std::sync::Arc;

use inbox_digest::analysis::Analyzer;
use inbox_digest::analysis::gemini::GeminiModel;
use inbox_digest::config::Config;
use inbox_digest::mailbox::gmail::GmailMailbox;
use inbox_digest::scanner::MailboxScanner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  required: GMAIL_CLIENT_ID, GMAIL_CLIENT_SECRET, GMAIL_REFRESH_TOKEN,");
        eprintln!("            GEMINI_API_KEY");
        eprintln!("  optional: GMAIL_SCOPES, GEMINI_MODEL, GEMINI_TIMEOUT_SECS");
        std::process::exit(1);
    });

    eprintln!("📬 Inbox Digest v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model.model);
    eprintln!("   Scopes: {}\n", config.gmail.scopes.join(" "));

    let mailbox = Arc::new(GmailMailbox::new(&config.gmail));
    let model = Arc::new(GeminiModel::new(&config.model)?);
    let scanner = MailboxScanner::new(mailbox, Analyzer::new(model));

    let summary = scanner.scan().await?;
    if summary.listed > 0 {
        eprintln!(
            "Done: {} analyzed, {} skipped, {} failed (of {} unread).",
            summary.analyzed, summary.skipped, summary.failed, summary.listed
        );
    }

    Ok(())
}

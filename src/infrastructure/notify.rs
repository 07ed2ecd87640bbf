//! Log-backed notifier
//!
//! Renders each notice as one JSON line through `tracing`. Useful as the
//! default sink in development and in deployments where a log shipper is
//! the delivery channel.

use anyhow::Context;

use crate::domain::ports::{Notice, Notifier};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, notice: &Notice) -> anyhow::Result<()> {
        let payload = serde_json::to_string(notice).context("failed to render notice")?;
        tracing::info!(
            loan = %notice.loan_id,
            recipient = %notice.recipient,
            %payload,
            "notice delivered"
        );
        Ok(())
    }
}

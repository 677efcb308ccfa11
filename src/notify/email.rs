//! SMTP mail notifier
//!
//! Sends plain-text warning, critical, and daily-summary mails to the
//! configured recipient list over lettre's async SMTP transport
//! (STARTTLS relay). Credentials come from the environment
//! (`SMTP_USER`/`SMTP_PASSWORD`); host, port, and sender address from
//! the config file.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::config::SmtpConfig;
use crate::util::{get_smtp_password, get_smtp_user};
use crate::{DriveReport, DriveStatus};

use super::{Notifier, NotifyError, NotifyResult};

/// SMTP-backed notifier
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl SmtpNotifier {
    /// Build a notifier from the SMTP config section and recipient list.
    ///
    /// Addresses are parsed eagerly so a typo in the config fails at
    /// startup, not on the first alert.
    pub fn new(config: &SmtpConfig, recipients: &[String]) -> NotifyResult<Self> {
        let from: Mailbox = config.from.parse()?;
        let recipients = recipients
            .iter()
            .map(|r| r.parse())
            .collect::<Result<Vec<Mailbox>, _>>()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port);

        if let (Some(user), Some(password)) = (get_smtp_user(), get_smtp_password()) {
            builder = builder.credentials(Credentials::new(user, password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            recipients,
        })
    }

    #[instrument(skip(self, text))]
    async fn send(&self, subject: &str, text: String) -> NotifyResult<()> {
        let mut message = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);

        for recipient in &self.recipients {
            message = message.to(recipient.clone());
        }

        let mail = message
            .body(text)
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        // send() returning Ok is the SMTP server's acceptance; the engine
        // treats exactly that as confirmed delivery.
        self.transport.send(mail).await?;

        info!("sent notification mail: {subject}");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_warning(&self, machine: &str, report: &DriveReport) -> NotifyResult<()> {
        self.send(
            "Drive Space Warning",
            format!(
                "Low drive space warning for {machine}:\nC: {}GB\nD: {}GB",
                report.c_drive_space_gb, report.d_drive_space_gb
            ),
        )
        .await
    }

    async fn send_critical(&self, machine: &str, report: &DriveReport) -> NotifyResult<()> {
        self.send(
            "Drive Space Critical",
            format!(
                "Critical drive space for {machine}:\nC: {}GB\nD: {}GB",
                report.c_drive_space_gb, report.d_drive_space_gb
            ),
        )
        .await
    }

    async fn send_daily_summary(&self, statuses: &[DriveStatus]) -> NotifyResult<()> {
        let mut body = String::from("Latest reported status for all machines:\n");
        for status in statuses {
            body.push_str(&format!(
                "{}: C: {}GB, D: {}GB\n",
                status.machine, status.c_drive_space_gb, status.d_drive_space_gb
            ));
        }

        self.send("Daily Drive Status Report", body).await
    }
}

//! Email delivery tool.

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde_json::{json, Value};

use super::{Tool, ToolContext};

const DEFAULT_SUBJECT: &str = "ASCII Calculation Result";
const DEFAULT_BODY: &str = "Attached is the requested visualization.";

/// Send the saved image as an email attachment.
pub struct SendEmail;

#[async_trait]
impl Tool for SendEmail {
    fn name(&self) -> &str {
        "send_email"
    }

    fn description(&self) -> &str {
        "Send an email with the saved image attached. Use the exact path returned by save_image as the attachment path."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "to": {
                    "type": "string",
                    "description": "Recipient email address"
                },
                "attachment_path": {
                    "type": "string",
                    "description": "Path of the saved image to attach"
                }
            },
            "required": ["to", "attachment_path"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> anyhow::Result<String> {
        let to = args["to"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'to' argument"))?;
        let attachment_path = args["attachment_path"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'attachment_path' argument"))?;
        let subject = args["subject"].as_str().unwrap_or(DEFAULT_SUBJECT);
        let body = args["body"].as_str().unwrap_or(DEFAULT_BODY);

        let mail = &ctx.config.mail;
        let from: Mailbox = mail
            .address
            .parse()
            .with_context(|| format!("invalid sender address '{}'", mail.address))?;
        let recipient: Mailbox = to
            .parse()
            .with_context(|| format!("invalid recipient address '{}'", to))?;

        let resolved = ctx.config.artifact_dir.join(attachment_path);
        let bytes = tokio::fs::read(&resolved)
            .await
            .with_context(|| format!("failed to read attachment '{}'", resolved.display()))?;
        let filename = resolved
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment.png".to_string());

        let message = Message::builder()
            .from(from)
            .to(recipient.clone())
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        Attachment::new(filename).body(bytes, ContentType::parse("image/png")?),
                    ),
            )
            .context("failed to build email message")?;

        let creds = Credentials::new(mail.address.clone(), mail.app_password.clone());
        let transport = SmtpTransport::starttls_relay(&mail.smtp_host)
            .context("failed to create STARTTLS relay")?
            .port(mail.smtp_port)
            .credentials(creds)
            .build();

        tracing::info!("Sending email to {} via {}", recipient, mail.smtp_host);

        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .context("email send task panicked")?
            .context("SMTP send failed")?;

        Ok(format!(
            "Email sent to {}. Server response code: {}",
            recipient,
            response.code()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::tools::ToolContext;
    use std::path::PathBuf;

    fn test_context() -> ToolContext {
        ToolContext::new(Config::new(
            "test-key".to_string(),
            "test-model".to_string(),
            PathBuf::from("."),
        ))
    }

    #[tokio::test]
    async fn invalid_recipient_fails_before_any_io() {
        let ctx = test_context();
        let err = SendEmail
            .execute(
                json!({"to": "not-an-address", "attachment_path": "out.png"}),
                &ctx,
            )
            .await
            .expect_err("invalid recipient should fail");
        assert!(err.to_string().contains("invalid recipient"));
    }

    #[tokio::test]
    async fn missing_attachment_argument_fails() {
        let ctx = test_context();
        let err = SendEmail
            .execute(json!({"to": "user@example.com"}), &ctx)
            .await
            .expect_err("missing attachment path");
        assert!(err.to_string().contains("Missing 'attachment_path'"));
    }

    #[tokio::test]
    async fn missing_attachment_file_fails() {
        let ctx = test_context();
        let err = SendEmail
            .execute(
                json!({"to": "user@example.com", "attachment_path": "no-such-file.png"}),
                &ctx,
            )
            .await
            .expect_err("attachment does not exist");
        assert!(err.to_string().contains("failed to read attachment"));
    }
}

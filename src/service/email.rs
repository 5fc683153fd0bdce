use crate::config::EmailConfig;
use crate::error::app_error::AppError;
use crate::i18n::ContactStrings;
use crate::models::contact::SanitizedSubmission;
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

/// Transactional email client for the contact form.
///
/// Talks to a Brevo-shaped HTTP API: `POST {base}/v3/smtp/email` with the API
/// key in an `api-key` header and a JSON payload of sender, recipients,
/// subject, HTML/text bodies, and an optional reply-to.
pub struct EmailService {
    config: EmailConfig,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<EmailAddress>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Verify the three deployment secrets before attempting any send.
    ///
    /// Each missing secret produces its own server-side log line; the client
    /// always gets the same generic message, never which secret is absent.
    pub fn ensure_configured(&self, strings: &ContactStrings) -> Result<(), AppError> {
        for (value, detail) in [
            (&self.config.api_key, "email api key not configured"),
            (&self.config.admin_email, "admin email not configured"),
            (&self.config.sender_email, "sender email not configured"),
        ] {
            if value.trim().is_empty() {
                error!("{detail}");
                return Err(AppError::ServiceUnavailable {
                    message: strings.service_unavailable.to_string(),
                    detail,
                });
            }
        }
        Ok(())
    }

    /// Deliver the two notifications for one submission: the acknowledgement
    /// to the submitter, then the admin alert with reply-to pointing back at
    /// the submitter.
    ///
    /// Sends are sequential and not transactional; if the second fails after
    /// the first succeeded, the request still reports failure and the first
    /// send is not compensated.
    pub async fn send_contact_notifications(&self, submission: &SanitizedSubmission, client_ip: &str, strings: &ContactStrings) -> Result<(), AppError> {
        if !self.config.enabled {
            warn!("email service is disabled, skipping contact notifications");
            return Ok(());
        }

        let acknowledgement = SendEmailRequest {
            sender: self.sender(),
            to: vec![EmailAddress {
                name: Some(submission.name.clone()),
                email: submission.email.clone(),
            }],
            subject: "Mensagem Recebida com Sucesso!".to_string(),
            html_content: acknowledgement_html(submission),
            text_content: acknowledgement_text(submission),
            reply_to: None,
        };

        let admin_alert = SendEmailRequest {
            sender: self.sender(),
            to: vec![EmailAddress {
                name: None,
                email: self.config.admin_email.clone(),
            }],
            subject: format!("Novo Contato: {}", submission.subject),
            html_content: admin_alert_html(submission, client_ip),
            text_content: admin_alert_text(submission, client_ip),
            reply_to: Some(EmailAddress {
                name: Some(submission.name.clone()),
                email: submission.email.clone(),
            }),
        };

        self.send(&acknowledgement, strings).await?;
        self.send(&admin_alert, strings).await?;

        info!(to = %self.config.admin_email, "contact notifications delivered");
        Ok(())
    }

    fn sender(&self) -> EmailAddress {
        EmailAddress {
            name: Some(self.config.sender_name.clone()),
            email: self.config.sender_email.clone(),
        }
    }

    async fn send(&self, request: &SendEmailRequest, strings: &ContactStrings) -> Result<(), AppError> {
        let url = format!("{}/v3/smtp/email", self.config.api_base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Dispatch {
                message: strings.dispatch_failed.to_string(),
                detail: format!("email provider unreachable: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Dispatch {
                message: strings.dispatch_failed.to_string(),
                detail: format!("email provider error ({status}): {body}"),
            });
        }

        Ok(())
    }
}

fn acknowledgement_html(submission: &SanitizedSubmission) -> String {
    format!(
        r#"<html>
  <body>
    <h1>Mensagem Recebida!</h1>
    <p>Olá, {name}!</p>
    <p>Obrigado por entrar em contato! Recebemos sua mensagem e retornaremos em breve.</p>
    <p><strong>Assunto:</strong> {subject}</p>
    <blockquote>{message}</blockquote>
    <p>Recebido em: {timestamp}</p>
  </body>
</html>"#,
        name = submission.name,
        subject = submission.subject,
        message = submission.message,
        timestamp = Utc::now().format("%d/%m/%Y %H:%M UTC"),
    )
}

fn acknowledgement_text(submission: &SanitizedSubmission) -> String {
    format!(
        "Olá, {}!\n\nObrigado por entrar em contato! Recebemos sua mensagem e retornaremos em breve.\n\nAssunto: {}\n\n{}\n",
        submission.name, submission.subject, submission.message
    )
}

fn admin_alert_html(submission: &SanitizedSubmission, client_ip: &str) -> String {
    format!(
        r#"<html>
  <body>
    <h1>Novo Contato Recebido</h1>
    <p><strong>Visitante:</strong> {name}</p>
    <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
    <p><strong>Assunto:</strong> {subject}</p>
    <blockquote>{message}</blockquote>
    <p>Recebido em: {timestamp} | IP: {ip}</p>
    <p>Responda diretamente para {email}.</p>
  </body>
</html>"#,
        name = submission.name,
        email = submission.email,
        subject = submission.subject,
        message = submission.message,
        timestamp = Utc::now().format("%d/%m/%Y %H:%M UTC"),
        ip = client_ip,
    )
}

fn admin_alert_text(submission: &SanitizedSubmission, client_ip: &str) -> String {
    format!(
        "Novo contato recebido\n\nVisitante: {}\nEmail: {}\nAssunto: {}\n\n{}\n\nIP: {}\n",
        submission.name, submission.email, submission.subject, submission.message, client_ip
    )
}

use latchkey_core::{Email, EmailClient, Notification};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

use super::templates::render;
use crate::config::defaults::VERIFICATION_TTL_HOURS;

#[derive(Clone)]
pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
    token_ttl_hours: i64,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
            token_ttl_hours: VERIFICATION_TTL_HOURS,
        }
    }

    /// Lifetime quoted in the message body; should match the token store's.
    pub fn with_token_ttl_hours(mut self, token_ttl_hours: i64) -> Self {
        self.token_ttl_hours = token_ttl_hours;
        self
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(
        name = "Sending email",
        skip_all,
        fields(template = notification.template_name())
    )]
    async fn send_email(
        &self,
        recipient: &Email,
        notification: &Notification,
    ) -> Result<(), String> {
        let base = Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        let url = base.join("/email").map_err(|e| e.to_string())?;
        let content = render(notification, self.token_ttl_hours).map_err(|e| e.to_string())?;

        let request_body = SendEmailRequest {
            from: self.sender.as_ref().expose_secret(),
            to: recipient.as_ref().expose_secret(),
            subject: content.subject,
            html_body: &content.html_body,
            text_body: &content.text_body,
            message_stream: MESSAGE_STREAM,
        };

        let request = self
            .http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body);

        request
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

use askama::Template;
use latchkey_core::Notification;
use secrecy::ExposeSecret;

const REGISTRATION_SUBJECT: &str = "Finish creating your account";
const CHANGE_EMAIL_SUBJECT: &str = "Confirm your new email address";

#[derive(Template)]
#[template(path = "registration.html")]
struct RegistrationHtml<'a> {
    token: &'a str,
    ttl_hours: i64,
}

#[derive(Template)]
#[template(path = "registration.txt")]
struct RegistrationText<'a> {
    token: &'a str,
    ttl_hours: i64,
}

#[derive(Template)]
#[template(path = "change_email.html")]
struct ChangeEmailHtml<'a> {
    token: &'a str,
    ttl_hours: i64,
}

#[derive(Template)]
#[template(path = "change_email.txt")]
struct ChangeEmailText<'a> {
    token: &'a str,
    ttl_hours: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: &'static str,
    pub html_body: String,
    pub text_body: String,
}

/// Render `notification` into a subject plus HTML and plain-text bodies.
pub fn render(notification: &Notification, ttl_hours: i64) -> Result<RenderedEmail, askama::Error> {
    let token = notification.token().expose_secret().as_str();

    match notification {
        Notification::Registration { .. } => Ok(RenderedEmail {
            subject: REGISTRATION_SUBJECT,
            html_body: RegistrationHtml { token, ttl_hours }.render()?,
            text_body: RegistrationText { token, ttl_hours }.render()?,
        }),
        Notification::ChangeEmail { .. } => Ok(RenderedEmail {
            subject: CHANGE_EMAIL_SUBJECT,
            html_body: ChangeEmailHtml { token, ttl_hours }.render()?,
            text_body: ChangeEmailText { token, ttl_hours }.render()?,
        }),
    }
}

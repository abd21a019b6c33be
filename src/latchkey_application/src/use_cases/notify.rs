use color_eyre::eyre::eyre;
use latchkey_core::{Email, EmailClient, Notification};

use crate::background::BackgroundTasks;

/// Hand `notification` to the email client without waiting for delivery.
pub(crate) fn dispatch<E>(
    background: &BackgroundTasks,
    email_client: &E,
    recipient: Email,
    notification: Notification,
) where
    E: EmailClient + Clone + 'static,
{
    let email_client = email_client.clone();
    background.spawn(notification.template_name(), async move {
        email_client
            .send_email(&recipient, &notification)
            .await
            .map_err(|e| eyre!("failed to send {} email: {e}", notification.template_name()))
    });
}

pub mod mock_email_client;
pub mod postmark_email_client;
pub mod templates;

pub use mock_email_client::RecordingEmailClient;
pub use postmark_email_client::PostmarkEmailClient;
pub use templates::{RenderedEmail, render};

pub mod authenticate;
pub mod change_email;
pub mod logout;
mod notify;
pub mod register;
pub mod request_email_change;
pub mod request_registration;
pub mod verify_authentication;


pub use authenticate::{AuthenticateError, AuthenticateUseCase};
pub use change_email::{ChangeEmailError, ChangeEmailUseCase};
pub use logout::{LogoutError, LogoutUseCase};
pub use register::{RegisterError, RegisterUseCase};
pub use request_email_change::RequestEmailChangeUseCase;
pub use request_registration::{
    RequestRegistrationUseCase, RequestVerificationError, VerificationOutcome,
};
pub use verify_authentication::{VerifyAuthenticationError, VerifyAuthenticationUseCase};

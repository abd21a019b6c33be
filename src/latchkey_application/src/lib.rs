pub mod background;
pub mod use_cases;

pub use background::BackgroundTasks;
pub use use_cases::{
    AuthenticateError, AuthenticateUseCase, ChangeEmailError, ChangeEmailUseCase, LogoutError,
    LogoutUseCase, RegisterError, RegisterUseCase, RequestEmailChangeUseCase,
    RequestRegistrationUseCase, RequestVerificationError, VerificationOutcome,
    VerifyAuthenticationError, VerifyAuthenticationUseCase,
};

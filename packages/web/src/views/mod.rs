use api::{ApiError, ErrorClass};

mod home;
pub use home::Home;

mod login;
pub use login::Login;

mod join;
pub use join::Join;

mod find_password;
pub use find_password::FindPassword;

mod reset_password;
pub use reset_password::ResetPassword;

mod my_page;
pub use my_page::MyPage;

mod profile;
pub use profile::Profile;

/// User-facing text for a failed call.
pub(crate) fn describe(error: &ApiError) -> String {
    match error.class() {
        ErrorClass::Validation => error.to_string(),
        ErrorClass::NotFound => "The requested page could not be found.".to_string(),
        // The client has already signed the user out and redirected.
        ErrorClass::SessionFatal => "Your session has ended. Please sign in again.".to_string(),
        ErrorClass::Unclassified => match error {
            ApiError::Network(_) => "The server could not be reached. Try again.".to_string(),
            other => format!("Something went wrong: {other}"),
        },
    }
}

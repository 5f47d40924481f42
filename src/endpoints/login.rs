use crate::{
    gateway::{ApiError, Gateway},
    request::Request,
    session::SessionError,
    types::LoginResponse,
};
use serde_derive::Serialize;

/// Authenticate with the help-desk server and remember the new session.
pub async fn login(
    gateway: &Gateway,
    email: &str,
    password: &str,
) -> Result<LoginResponse, LoginError> {
    let email = email.trim().to_lowercase();
    let data = Data {
        email: &email,
        password,
    };
    let request = Request::post("/api/auth/login").json(&data)?;

    let response: LoginResponse = gateway.fetch(request).await?;
    gateway.session().set_auth(&response.token, &response.user)?;

    log::info!("Logged in as {} ({})", response.user.email, response.user.role);

    Ok(response)
}

#[derive(Serialize)]
struct Data<'a> {
    email: &'a str,
    password: &'a str,
}

/// Possible errors that may be returned by [`login()`].
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// The server rejected the credentials or couldn't be reached.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// We logged in but couldn't save the session.
    #[error("Unable to save the new session")]
    Session(#[from] SessionError),
}

impl LoginError {
    pub fn is_rejected(&self) -> bool {
        matches!(self, LoginError::Api(ApiError::Rejected { .. }))
    }
}

use crate::{
    gateway::{ApiError, Gateway},
    request::Request,
    types::{Registration, Role},
};
use serde_derive::Serialize;

/// Create a new account. This doesn't log the new user in.
pub async fn register(
    gateway: &Gateway,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Registration, ApiError> {
    let data = Data {
        name,
        email,
        password,
        role,
    };
    let request = Request::post("/api/auth/register").json(&data)?;

    gateway.fetch(request).await
}

#[derive(Serialize)]
struct Data<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role: Role,
}

use crate::{
    gateway::{ApiError, Gateway},
    request::Request,
    types::Comment,
};
use serde_derive::Serialize;

pub async fn list_comments(
    gateway: &Gateway,
    ticket_id: u64,
) -> Result<Vec<Comment>, ApiError> {
    let path = format!("/api/tickets/{}/comments", ticket_id);

    gateway.fetch(Request::get(path)).await
}

/// Post a comment on a ticket as the logged-in user.
pub async fn add_comment(
    gateway: &Gateway,
    ticket_id: u64,
    content: &str,
) -> Result<Comment, ApiError> {
    let path = format!("/api/tickets/{}/comments", ticket_id);
    let request = Request::post(path).json(&Data { content })?;

    gateway.fetch(request).await
}

#[derive(Serialize)]
struct Data<'a> {
    content: &'a str,
}

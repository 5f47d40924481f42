use crate::{
    gateway::{ApiError, Gateway},
    request::Request,
    types::Attachment,
};
use reqwest::multipart::{Form, Part};

/// Attach a file to a ticket.
///
/// The server only accepts a handful of extensions (images, PDFs, text,
/// logs and zip archives).
pub async fn upload_attachment(
    gateway: &Gateway,
    ticket_id: u64,
    filename: &str,
    contents: Vec<u8>,
) -> Result<Attachment, ApiError> {
    log::debug!(
        "Uploading {} ({} bytes) to ticket #{}",
        filename,
        contents.len(),
        ticket_id
    );

    let part = Part::bytes(contents).file_name(filename.to_string());
    let form = Form::new().part("file", part);
    let path = format!("/api/tickets/{}/attachments", ticket_id);

    gateway.fetch(Request::post(path).multipart(form)).await
}

/// Fetch the contents of an attached file.
pub async fn download_attachment(
    gateway: &Gateway,
    attachment_id: u64,
) -> Result<Vec<u8>, ApiError> {
    let path = format!("/api/attachments/{}/download", attachment_id);

    let response = gateway.send(Request::get(path)).await?.into_raw()?;
    let body = response.bytes().await?;
    log::debug!("Downloaded {} bytes", body.len());

    Ok(body.to_vec())
}

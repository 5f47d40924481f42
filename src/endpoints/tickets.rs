use crate::{
    gateway::{ApiError, Gateway},
    request::Request,
    types::{Ticket, TicketDetail, TicketStatus},
};
use serde_derive::Serialize;

/// Which tickets [`list_tickets()`] should return.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    /// Only tickets created by the logged-in user.
    pub mine: bool,
}

impl TicketFilter {
    fn path(&self) -> String {
        super::with_query(
            "/api/tickets",
            vec![
                ("status", self.status.map(TicketStatus::as_str)),
                ("my", if self.mine { Some("1") } else { None }),
            ],
        )
    }
}

pub async fn list_tickets(
    gateway: &Gateway,
    filter: TicketFilter,
) -> Result<Vec<Ticket>, ApiError> {
    gateway.fetch(Request::get(filter.path())).await
}

/// Fetch a ticket with its comments and attachments.
pub async fn get_ticket(
    gateway: &Gateway,
    id: u64,
) -> Result<TicketDetail, ApiError> {
    gateway.fetch(Request::get(format!("/api/tickets/{}", id))).await
}

/// Open a new ticket as the logged-in user.
pub async fn create_ticket(
    gateway: &Gateway,
    title: &str,
    description: &str,
) -> Result<Ticket, ApiError> {
    let data = NewTicket { title, description };
    let request = Request::post("/api/tickets").json(&data)?;

    gateway.fetch(request).await
}

/// Changes to apply to a ticket. Fields left as `None` are untouched.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct TicketUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
}

/// Change a ticket's status or assignee (technicians and admins only).
pub async fn update_ticket(
    gateway: &Gateway,
    id: u64,
    update: TicketUpdate,
) -> Result<Ticket, ApiError> {
    let request =
        Request::patch(format!("/api/tickets/{}", id)).json(&update)?;

    gateway.fetch(request).await
}

/// Hand a ticket to someone (technicians and admins only).
pub async fn assign_ticket(
    gateway: &Gateway,
    id: u64,
    assignee_id: u64,
) -> Result<Ticket, ApiError> {
    let data = Assignment { assignee_id };
    let request =
        Request::post(format!("/api/tickets/{}/assign", id)).json(&data)?;

    gateway.fetch(request).await
}

#[derive(Serialize)]
struct NewTicket<'a> {
    title: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct Assignment {
    assignee_id: u64,
}

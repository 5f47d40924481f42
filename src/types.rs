//! Records exchanged with the help-desk API.

use crate::badge::render_status_badge;
use serde_derive::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Someone with an account on the help desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Faculty,
    Tech,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] =
        [Role::Student, Role::Faculty, Role::Tech, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Faculty => "FACULTY",
            Role::Tech => "TECH",
            Role::Admin => "ADMIN",
        }
    }
}

/// Where a ticket is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Resolved => "RESOLVED",
        }
    }

    /// Render this status with [`render_status_badge()`].
    pub fn badge(self) -> String { render_status_badge(self.as_str()) }
}

macro_rules! string_enum {
    ($name:ident, $what:literal) => {
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|item| item.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownVariant {
                        kind: $what,
                        value: s.to_string(),
                    })
            }
        }
    };
}

string_enum!(Role, "role");
string_enum!(TicketStatus, "ticket status");

/// A string which doesn't name a known [`Role`] or [`TicketStatus`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("\"{}\" isn't a valid {}", value, kind)]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub creator_id: u64,
    pub assignee_id: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A ticket along with its discussion and files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub ticket_id: u64,
    pub user_id: u64,
    pub content: String,
    pub created_at: String,
    /// The author, when the server includes it.
    pub user: Option<User>,
}

/// Metadata about a file attached to a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub ticket_id: u64,
    pub filename: String,
    /// The download route, relative to the API base.
    pub path: String,
    pub uploaded_at: String,
}

/// What the server sends back after a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// What the server sends back after creating an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: u64,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ticket_detail() {
        let src = r#"{
            "id": 3,
            "title": "Projector broken",
            "description": "Room 101",
            "status": "IN_PROGRESS",
            "creator_id": 1,
            "assignee_id": null,
            "created_at": "2024-01-01T10:00:00",
            "updated_at": "2024-01-02T10:00:00",
            "comments": [{
                "id": 9,
                "ticket_id": 3,
                "user_id": 2,
                "content": "On my way",
                "created_at": "2024-01-01T11:00:00",
                "user": {"id": 2, "name": "Theresia", "email": "t@it.test", "role": "TECH"}
            }],
            "attachments": []
        }"#;

        let got: TicketDetail = serde_json::from_str(src).unwrap();

        assert_eq!(got.ticket.status, TicketStatus::InProgress);
        assert_eq!(got.ticket.assignee_id, None);
        assert_eq!(got.comments.len(), 1);
        assert_eq!(got.comments[0].user.as_ref().unwrap().role, Role::Tech);
        assert!(got.attachments.is_empty());
    }

    #[test]
    fn statuses_use_the_wire_names() {
        for status in TicketStatus::ALL.iter().copied() {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn parse_statuses_and_roles_from_strings() {
        assert_eq!("in_progress".parse(), Ok(TicketStatus::InProgress));
        assert_eq!("ADMIN".parse(), Ok(Role::Admin));
        assert!("CLOSED".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn status_badges() {
        assert_eq!(
            TicketStatus::InProgress.badge(),
            r#"<span class="badge IN_PROGRESS">IN PROGRESS</span>"#
        );
    }
}

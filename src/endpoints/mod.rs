//! The help-desk API's endpoints.

mod attachments;
mod comments;
mod login;
mod logout;
mod register;
mod tickets;
mod users;

pub use attachments::{download_attachment, upload_attachment};
pub use comments::{add_comment, list_comments};
pub use login::{login, LoginError};
pub use logout::logout;
pub use register::register;
pub use tickets::{
    assign_ticket, create_ticket, get_ticket, list_tickets, update_ticket,
    TicketFilter, TicketUpdate,
};
pub use users::list_users;

use url::form_urlencoded::Serializer;

/// Append a query string built from the `Some` parameters to `path`.
fn with_query<'a, I>(path: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut query = Serializer::new(String::new());
    let mut empty = true;

    for (key, value) in params {
        if let Some(value) = value {
            query.append_pair(key, value);
            empty = false;
        }
    }

    if empty {
        path.to_string()
    } else {
        format!("{}?{}", path, query.finish())
    }
}

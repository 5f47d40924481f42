use crate::{
    gateway::{ApiError, Gateway},
    request::Request,
    types::{Role, User},
};

/// List accounts, optionally only those with a particular role
/// (technicians and admins only).
pub async fn list_users(
    gateway: &Gateway,
    role: Option<Role>,
) -> Result<Vec<User>, ApiError> {
    let path = super::with_query("/api/users", vec![("role", role.map(Role::as_str))]);

    gateway.fetch(Request::get(path)).await
}

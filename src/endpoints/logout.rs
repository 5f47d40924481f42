use crate::{gateway::Gateway, session::SessionError};

/// Forget the current session.
///
/// Tokens are stateless on the server, so logging out never touches the
/// network.
pub fn logout(gateway: &Gateway) -> Result<(), SessionError> {
    log::debug!("Clearing the stored session");
    gateway.session().clear()?;
    log::info!("Logged out");

    Ok(())
}

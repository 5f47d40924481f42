use crate::session::SessionStore;

/// Where people are sent when they need to log in.
pub const LOGIN_PAGE: &str = "login.html";

/// Something which can take the user somewhere else.
pub trait Navigator {
    fn navigate(&self, location: &str);
}

/// Send the user to the [`LOGIN_PAGE`] unless they already have a token.
///
/// Call this before showing anything that needs an authenticated session.
pub fn require_login<N>(session: &SessionStore, navigator: &N)
where
    N: Navigator + ?Sized,
{
    if session.token().is_none() {
        log::info!("No session token, redirecting to {}", LOGIN_PAGE);
        navigator.navigate(LOGIN_PAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::Value;
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    struct Recorder {
        visited: RefCell<Vec<String>>,
    }

    impl Navigator for Recorder {
        fn navigate(&self, location: &str) {
            self.visited.borrow_mut().push(location.to_string());
        }
    }

    #[test]
    fn anonymous_users_are_sent_to_the_login_page() {
        let session = SessionStore::new(MemoryStorage::new());
        let recorder = Recorder::default();

        require_login(&session, &recorder);

        assert_eq!(recorder.visited.into_inner(), vec![LOGIN_PAGE]);
    }

    #[test]
    fn logged_in_users_stay_put() {
        let session = SessionStore::new(MemoryStorage::new());
        session.set_auth("abc", &Value::Null).unwrap();
        let recorder = Recorder::default();

        require_login(&session, &recorder);

        assert!(recorder.visited.into_inner().is_empty());
    }

    #[test]
    fn a_user_without_a_token_still_counts_as_anonymous() {
        let storage = MemoryStorage::new();
        crate::Storage::set(&storage, "user", r#"{"id": 1}"#).unwrap();
        let session = SessionStore::new(storage);
        let recorder = Recorder::default();

        require_login(&session, &recorder);

        assert_eq!(recorder.visited.into_inner().len(), 1);
    }
}

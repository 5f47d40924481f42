use crate::{
    gateway::Gateway,
    session::SessionStore,
    storage::FileStorage,
};
use reqwest::Client;
use std::path::PathBuf;
use structopt::StructOpt;
use url::Url;

/// Where to find the server and where to keep the session.
#[derive(Debug, Clone, PartialEq, StructOpt)]
pub struct Config {
    #[structopt(
        long = "api-base",
        env = "HELPDESK_API_BASE",
        default_value = "http://127.0.0.1:5000",
        help = "The help-desk server's base URL"
    )]
    pub api_base: Url,
    #[structopt(
        long = "session-file",
        env = "HELPDESK_SESSION_FILE",
        parse(from_os_str),
        help = "Where to store the login session"
    )]
    pub session_file: Option<PathBuf>,
    #[structopt(
        long = "user-agent",
        help = "The User-Agent header to send, if not the crate's own"
    )]
    pub user_agent: Option<String>,
}

impl Config {
    pub fn new(api_base: Url) -> Self {
        Config {
            api_base,
            session_file: None,
            user_agent: None,
        }
    }

    /// The session file, defaulting to one in the user's config directory.
    pub fn session_path(&self) -> PathBuf {
        match self.session_file {
            Some(ref path) => path.clone(),
            None => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(env!("CARGO_PKG_NAME"))
                .join("session.json"),
        }
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(crate::DEFAULT_USER_AGENT)
    }

    /// Create a HTTP client, making sure it remembers cookies between
    /// requests.
    pub fn client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .user_agent(self.user_agent())
            .cookie_store(true)
            .gzip(true)
            .build()
    }

    /// Wire up a [`Gateway`] whose session lives in [`Config::session_path()`].
    pub fn gateway(&self) -> Result<Gateway, reqwest::Error> {
        let path = self.session_path();
        log::debug!("Using the session stored at {}", path.display());

        let session = SessionStore::new(FileStorage::new(path));

        Ok(Gateway::new(self.client()?, self.api_base.as_str(), session))
    }
}

impl Default for Config {
    fn default() -> Self {
        let api_base = Url::parse(crate::DEFAULT_API_BASE)
            .expect("The default API base is a valid URL");

        Config::new(api_base)
    }
}

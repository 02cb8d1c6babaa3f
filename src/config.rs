use std::env;
use std::path::PathBuf;

use crate::errors::Error;

/// Process settings, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub token: String,
    /// OAuth2 client credentials; unused until an OAuth flow exists.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub proxy: Option<String>,
    pub timezone_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            token: var("BOT_TOKEN").ok_or(Error::Config("BOT_TOKEN"))?,
            client_id: var("CLIENT_ID"),
            client_secret: var("CLIENT_SECRET"),
            proxy: var("PROXY_URL"),
            timezone_file: var("TIMEZONE_FILE")
                .map_or_else(|| PathBuf::from("timezone.txt"), PathBuf::from),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

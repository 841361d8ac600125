use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;

use crate::{
    api::Client,
    prelude::*,
    session::{FileStore, SessionManager},
};

#[derive(Parser)]
pub struct ApiArgs {
    /// EnerTrack backend base URL.
    #[clap(
        long = "api-base-url",
        env = "ENERTRACK_API_BASE_URL",
        default_value = "http://localhost:8081"
    )]
    base_url: Url,

    /// Where the signed-in user and the session cookies are kept.
    #[clap(long, env = "ENERTRACK_SESSION_FILE", default_value = "session.toml")]
    session_file: PathBuf,

    /// Request timeout.
    #[clap(long, env = "ENERTRACK_TIMEOUT", default_value = "10s")]
    timeout: humantime::Duration,
}

impl ApiArgs {
    pub fn new_client(&self) -> Result<Client> {
        let session = SessionManager::init(FileStore::new(&self.session_file))?;
        Client::new(&self.base_url, self.timeout.into(), session)
    }
}

use crate::models::error::SError;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

const DETAILS_URL: &str =
    "https://api.steampowered.com/ISteamRemoteStorage/GetPublishedFileDetails/v1/";
const USER_AGENT: &str = concat!("herbarium/", env!("CARGO_PKG_VERSION"));
const MAX_COVER_BYTES: u64 = 16 * 1024 * 1024;

/// Remote lookup keyed by the workshop folder name. `Ok(None)` means the
/// service answered but has nothing for that id.
pub trait RemoteMetadata: Sync {
    fn fetch_title(&self, id: &str) -> Result<Option<String>, SError>;
    fn fetch_cover_url(&self, id: &str) -> Result<Option<String>, SError>;
    fn download(&self, url: &str) -> Result<Vec<u8>, SError>;
}

/// Never reaches the network; every lookup comes back empty.
pub struct Offline;

impl RemoteMetadata for Offline {
    fn fetch_title(&self, _id: &str) -> Result<Option<String>, SError> {
        Ok(None)
    }

    fn fetch_cover_url(&self, _id: &str) -> Result<Option<String>, SError> {
        Ok(None)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, SError> {
        Err(SError::NetworkError(format!("offline, not fetching {url}")))
    }
}

#[derive(Deserialize)]
struct DetailsResponse {
    response: DetailsBody,
}

#[derive(Deserialize)]
struct DetailsBody {
    #[serde(default)]
    publishedfiledetails: Vec<FileDetails>,
}

#[derive(Deserialize)]
struct FileDetails {
    #[serde(default)]
    title: String,
    #[serde(default)]
    preview_url: String,
}

pub struct SteamWorkshop {
    agent: ureq::Agent,
}

impl SteamWorkshop {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(10))
            .timeout_write(Duration::from_secs(10))
            .build();
        Self { agent }
    }

    fn details(&self, id: &str) -> Result<Option<FileDetails>, SError> {
        let response = self
            .agent
            .post(DETAILS_URL)
            .set("User-Agent", USER_AGENT)
            .send_form(&[("itemcount", "1"), ("publishedfileids[0]", id)])?;

        let parsed: DetailsResponse = serde_json::from_reader(response.into_reader())?;
        Ok(parsed.response.publishedfiledetails.into_iter().next())
    }
}

impl Default for SteamWorkshop {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteMetadata for SteamWorkshop {
    fn fetch_title(&self, id: &str) -> Result<Option<String>, SError> {
        Ok(self
            .details(id)?
            .map(|d| d.title)
            .filter(|t| !t.trim().is_empty()))
    }

    fn fetch_cover_url(&self, id: &str) -> Result<Option<String>, SError> {
        Ok(self
            .details(id)?
            .map(|d| d.preview_url)
            .filter(|u| !u.is_empty()))
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, SError> {
        let response = self.agent.get(url).set("User-Agent", USER_AGENT).call()?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_COVER_BYTES)
            .read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

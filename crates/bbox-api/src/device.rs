// Router information endpoint

use reqwest::Method;
use tracing::debug;

use crate::client::BboxClient;
use crate::error::Error;
use crate::models::{Record, Router, take_path};

pub const DEVICE_ENDPOINT: &str = "device";

impl BboxClient {
    /// Router identity, firmware and status.
    ///
    /// `GET device`, body `[{"device": {...}}]`
    pub async fn get_router_info(&mut self) -> Result<Router, Error> {
        debug!("fetching router info");
        let data = self.request(Method::GET, DEVICE_ENDPOINT).await?;
        let device = take_path(data, &["device"], "Router")?;
        Router::from_json(device).map_err(|e| e.prefixed("device").into())
    }
}

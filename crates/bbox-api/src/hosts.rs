// Connected hosts endpoint

use reqwest::Method;
use tracing::debug;

use crate::client::BboxClient;
use crate::error::Error;
use crate::models::{Host, parse_list, take_path};

pub const HOSTS_ENDPOINT: &str = "hosts";

impl BboxClient {
    /// Every host the router knows about, in the order it reports them.
    ///
    /// `GET hosts`, body `[{"hosts": {"list": [...]}}]`
    pub async fn get_hosts(&mut self) -> Result<Vec<Host>, Error> {
        debug!("fetching hosts");
        let data = self.request(Method::GET, HOSTS_ENDPOINT).await?;
        let list = take_path(data, &["hosts", "list"], "Host")?;
        let hosts = parse_list(list, "hosts.list")?;
        debug!(count = hosts.len(), "hosts fetched");
        Ok(hosts)
    }
}

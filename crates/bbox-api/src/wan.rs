// WAN statistics endpoint

use reqwest::Method;
use tracing::debug;

use crate::client::BboxClient;
use crate::error::Error;
use crate::models::{Record, WanIpStats, take_path};

pub const WAN_IP_STATS_ENDPOINT: &str = "wan/ip/stats";

impl BboxClient {
    /// Receive/transmit counters of the WAN IP interface.
    ///
    /// `GET wan/ip/stats`, body `[{"wan": {"ip": {"stats": {"rx": ..., "tx": ...}}}}]`
    pub async fn get_wan_ip_stats(&mut self) -> Result<WanIpStats, Error> {
        debug!("fetching WAN IP stats");
        let data = self.request(Method::GET, WAN_IP_STATS_ENDPOINT).await?;
        let stats = take_path(data, &["wan", "ip", "stats"], "WANIPStats")?;
        WanIpStats::from_json(stats).map_err(|e| e.prefixed("wan.ip.stats").into())
    }
}

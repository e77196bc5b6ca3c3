// WAN IP counters from `GET wan/ip/stats`.

use serde::{Deserialize, Serialize};

use crate::models::Record;
use crate::schema::{Field, Kind, Schema};

pub static WAN_STATS: Schema = Schema {
    name: "WANStats",
    fields: &[
        Field::required("packets", Kind::COUNTER),
        Field::required("bytes", Kind::COUNTER),
        Field::required("packetserrors", Kind::COUNTER),
        Field::required("packetsdiscards", Kind::COUNTER),
        Field::required("occupation", Kind::PERCENT),
        Field::required("bandwidth", Kind::COUNTER),
        Field::required("maxBandwidth", Kind::COUNTER),
        Field::required("contractualBandwidth", Kind::COUNTER),
    ],
};

pub static WAN_IP_STATS: Schema = Schema {
    name: "WANIPStats",
    fields: &[
        Field::required("rx", Kind::Object(&WAN_STATS)),
        Field::required("tx", Kind::Object(&WAN_STATS)),
    ],
};

/// Counters for one direction of the WAN link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WanStats {
    pub packets: u64,
    pub bytes: u64,
    #[serde(rename = "packetserrors")]
    pub packets_errors: u64,
    #[serde(rename = "packetsdiscards")]
    pub packets_discards: u64,
    /// Link occupation in percent, `0..=100`.
    pub occupation: u8,
    pub bandwidth: u64,
    #[serde(rename = "maxBandwidth")]
    pub max_bandwidth: u64,
    #[serde(rename = "contractualBandwidth")]
    pub contractual_bandwidth: u64,
}

impl Record for WanStats {
    fn schema() -> &'static Schema {
        &WAN_STATS
    }
}

/// Receive and transmit counters of the WAN IP interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WanIpStats {
    pub rx: WanStats,
    pub tx: WanStats,
}

impl Record for WanIpStats {
    fn schema() -> &'static Schema {
        &WAN_IP_STATS
    }
}

// Connected network devices from `GET hosts`.
//
// Sub-records (ethernet, wireless, plc, ...) are only present when the
// router reports them for that host; absence means "not applicable".

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::Record;
use crate::schema::{Field, Kind, Schema};

pub static IP6_ADDRESS: Schema = Schema {
    name: "IP6Address",
    fields: &[
        Field::required("ipaddress", Kind::Str),
        Field::required("status", Kind::Str),
        Field::required("lastseen", Kind::DateTime),
        Field::required("lastscan", Kind::DateTime),
    ],
};

pub static ETHERNET_INFO: Schema = Schema {
    name: "EthernetInfo",
    fields: &[
        Field::required("physicalport", Kind::INT),
        Field::required("logicalport", Kind::INT),
        Field::required("speed", Kind::COUNTER),
        Field::optional("mode", Kind::Str),
    ],
};

pub static WIRELESS_INFO: Schema = Schema {
    name: "WirelessInfo",
    fields: &[
        Field::required("wexindex", Kind::INT),
        Field::required("static", Kind::INT),
        Field::optional("band", Kind::Str),
        Field::required("txUsage", Kind::COUNTER),
        Field::required("rxUsage", Kind::COUNTER),
        Field::required("estimatedRate", Kind::COUNTER),
        Field::required("rssi0", Kind::INT),
        Field::required("mcs", Kind::INT),
        Field::required("rate", Kind::COUNTER),
    ],
};

pub static WIRELESS_BY_BAND: Schema = Schema {
    name: "WirelessByBand",
    fields: &[
        Field::required("band", Kind::Str),
        Field::required("txUsage", Kind::COUNTER),
        Field::required("rxUsage", Kind::COUNTER),
        Field::required("estimatedRate", Kind::COUNTER),
        Field::required("rssi0", Kind::INT),
        Field::required("mcs", Kind::INT),
        Field::required("rate", Kind::COUNTER),
    ],
};

pub static PLC_INFO: Schema = Schema {
    name: "PLCInfo",
    fields: &[
        Field::optional("rxphyrate", Kind::Str),
        Field::optional("txphyrate", Kind::Str),
        Field::required("associateddevice", Kind::INT),
        Field::required("interface", Kind::INT),
        Field::required("ethernetspeed", Kind::COUNTER),
    ],
};

pub static DEVICE_INFO: Schema = Schema {
    name: "DeviceInfo",
    fields: &[
        Field::required("type", Kind::Str).repaired(),
        Field::optional("manufacturer", Kind::Str),
        Field::optional("model", Kind::Str),
        Field::required("icon", Kind::Str),
        Field::optional("operatingSystem", Kind::Str),
        Field::optional("version", Kind::Str),
    ],
};

pub static PARENTAL_CONTROL: Schema = Schema {
    name: "ParentalControl",
    fields: &[
        Field::required("enable", Kind::Bool),
        Field::required("status", Kind::Str),
        Field::required("statusRemaining", Kind::INT),
        Field::optional("statusUntil", Kind::INT),
    ],
};

pub static PING_INFO: Schema = Schema {
    name: "PingInfo",
    fields: &[Field::required("average", Kind::COUNTER)],
};

pub static SCAN_INFO: Schema = Schema {
    name: "ScanInfo",
    fields: &[Field::optional("services", Kind::List(&Kind::Str))],
};

static IP6_ADDRESS_ITEM: Kind = Kind::Object(&IP6_ADDRESS);
static WIRELESS_BY_BAND_ITEM: Kind = Kind::Object(&WIRELESS_BY_BAND);

pub static HOST: Schema = Schema {
    name: "Host",
    fields: &[
        Field::required("id", Kind::COUNTER),
        Field::required("active", Kind::Bool),
        Field::required("devicetype", Kind::Str),
        Field::optional("duid", Kind::Str),
        Field::required("guest", Kind::Bool),
        Field::optional("hostname", Kind::Str),
        Field::required("ipaddress", Kind::Str),
        Field::required("lease", Kind::COUNTER),
        Field::required("link", Kind::Str),
        Field::required("macaddress", Kind::Str),
        Field::required("type", Kind::Str),
        Field::required("firstseen", Kind::DateTime),
        Field::required("lastseen", Kind::INT),
        Field::optional("serialNumber", Kind::Str),
        Field::optional("ip6address", Kind::List(&IP6_ADDRESS_ITEM)),
        Field::optional("ethernet", Kind::Object(&ETHERNET_INFO)),
        Field::optional("wireless", Kind::Object(&WIRELESS_INFO)),
        Field::optional("wirelessByBand", Kind::List(&WIRELESS_BY_BAND_ITEM)),
        Field::optional("plc", Kind::Object(&PLC_INFO)),
        Field::optional("informations", Kind::Object(&DEVICE_INFO)),
        Field::optional("parentalcontrol", Kind::Object(&PARENTAL_CONTROL)),
        Field::optional("ping", Kind::Object(&PING_INFO)),
        Field::optional("scan", Kind::Object(&SCAN_INFO)),
    ],
};

/// One IPv6 address assigned to a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ip6Address {
    #[serde(rename = "ipaddress")]
    pub ip_address: String,
    pub status: String,
    #[serde(rename = "lastseen")]
    pub last_seen: DateTime<FixedOffset>,
    #[serde(rename = "lastscan")]
    pub last_scan: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetInfo {
    #[serde(rename = "physicalport")]
    pub physical_port: i64,
    #[serde(rename = "logicalport")]
    pub logical_port: i64,
    /// Link speed in Mbit/s, 0 when not wired.
    pub speed: u64,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessInfo {
    #[serde(rename = "wexindex")]
    pub wex_index: i64,
    #[serde(rename = "static")]
    pub is_static: i64,
    /// Band label such as `"2.4"` or `"5"`; absent for wired hosts.
    pub band: Option<String>,
    #[serde(rename = "txUsage")]
    pub tx_usage: u64,
    #[serde(rename = "rxUsage")]
    pub rx_usage: u64,
    #[serde(rename = "estimatedRate")]
    pub estimated_rate: u64,
    /// Signal strength in dBm.
    pub rssi0: i64,
    pub mcs: i64,
    pub rate: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessByBand {
    pub band: String,
    #[serde(rename = "txUsage")]
    pub tx_usage: u64,
    #[serde(rename = "rxUsage")]
    pub rx_usage: u64,
    #[serde(rename = "estimatedRate")]
    pub estimated_rate: u64,
    pub rssi0: i64,
    pub mcs: i64,
    pub rate: u64,
}

/// Powerline adapter details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlcInfo {
    #[serde(rename = "rxphyrate")]
    pub rx_phy_rate: Option<String>,
    #[serde(rename = "txphyrate")]
    pub tx_phy_rate: Option<String>,
    #[serde(rename = "associateddevice")]
    pub associated_device: i64,
    pub interface: i64,
    #[serde(rename = "ethernetspeed")]
    pub ethernet_speed: u64,
}

/// Device classification as guessed by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "type")]
    pub device_type: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub icon: String,
    #[serde(rename = "operatingSystem")]
    pub operating_system: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentalControl {
    pub enable: bool,
    pub status: String,
    #[serde(rename = "statusRemaining")]
    pub status_remaining: i64,
    #[serde(rename = "statusUntil")]
    pub status_until: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingInfo {
    pub average: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInfo {
    pub services: Vec<String>,
}

/// One device known to the router, active or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub id: u64,
    pub active: bool,
    #[serde(rename = "devicetype")]
    pub device_type: String,
    pub duid: Option<String>,
    pub guest: bool,
    pub hostname: Option<String>,
    #[serde(rename = "ipaddress")]
    pub ip_address: String,
    /// Remaining DHCP lease in seconds.
    pub lease: u64,
    pub link: String,
    #[serde(rename = "macaddress")]
    pub mac_address: String,
    /// Address assignment: `"DHCP"` or `"Static"`.
    #[serde(rename = "type")]
    pub host_type: String,
    #[serde(rename = "firstseen")]
    pub first_seen: DateTime<FixedOffset>,
    /// Seconds since the host was last seen; 0 while active.
    #[serde(rename = "lastseen")]
    pub last_seen: i64,
    #[serde(rename = "serialNumber")]
    pub serial_number: Option<String>,
    #[serde(rename = "ip6address")]
    pub ip6_addresses: Vec<Ip6Address>,
    pub ethernet: Option<EthernetInfo>,
    pub wireless: Option<WirelessInfo>,
    #[serde(rename = "wirelessByBand")]
    pub wireless_by_band: Vec<WirelessByBand>,
    pub plc: Option<PlcInfo>,
    pub informations: Option<DeviceInfo>,
    #[serde(rename = "parentalcontrol")]
    pub parental_control: Option<ParentalControl>,
    pub ping: Option<PingInfo>,
    pub scan: Option<ScanInfo>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Host {
    /// Hostname when the router knows one, MAC address otherwise.
    pub fn display_name(&self) -> &str {
        self.hostname.as_deref().unwrap_or(&self.mac_address)
    }
}

impl Record for Host {
    fn schema() -> &'static Schema {
        &HOST
    }
}

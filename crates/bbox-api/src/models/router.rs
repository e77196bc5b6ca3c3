// Router identity and status from `GET device`.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::Record;
use crate::schema::{Field, Kind, Schema};

pub static ROUTER_DISPLAY: Schema = Schema {
    name: "RouterDisplay",
    fields: &[
        Field::required("luminosity", Kind::INT),
        Field::required("luminosity_extender", Kind::INT),
        Field::required("state", Kind::Str),
    ],
};

pub static ROUTER_VERSION: Schema = Schema {
    name: "RouterVersion",
    fields: &[
        Field::optional("version", Kind::Str),
        Field::optional("date", Kind::DateTime),
    ],
};

pub static ROUTER_USING: Schema = Schema {
    name: "RouterUsing",
    fields: &[
        Field::required("ipv4", Kind::Bool),
        Field::required("ipv6", Kind::Bool),
        Field::required("ftth", Kind::Bool),
        Field::required("adsl", Kind::Bool),
        Field::required("vdsl", Kind::Bool),
    ],
};

pub static ROUTER: Schema = Schema {
    name: "Router",
    fields: &[
        Field::required("now", Kind::DateTime),
        Field::required("status", Kind::INT),
        Field::required("numberofboots", Kind::COUNTER),
        Field::required("modelname", Kind::Str),
        Field::required("modelclass", Kind::Str),
        Field::required("optimisation", Kind::Bool),
        Field::required("user_configured", Kind::Bool),
        Field::required("serialnumber", Kind::Str),
        Field::optional("display", Kind::Object(&ROUTER_DISPLAY)),
        Field::required("main", Kind::Object(&ROUTER_VERSION)),
        Field::required("reco", Kind::Object(&ROUTER_VERSION)),
        Field::required("running", Kind::Object(&ROUTER_VERSION)),
        Field::required("spl", Kind::Object(&ROUTER_VERSION)),
        Field::required("tpl", Kind::Object(&ROUTER_VERSION)),
        Field::required("ldr1", Kind::Object(&ROUTER_VERSION)),
        Field::required("ldr2", Kind::Object(&ROUTER_VERSION)),
        Field::required("firstusedate", Kind::DateTime),
        Field::required("uptime", Kind::COUNTER),
        Field::required("lastFactoryReset", Kind::COUNTER),
        Field::required("using", Kind::Object(&ROUTER_USING)),
        Field::optional("isCellularEnable", Kind::Bool),
        Field::optional("newihm", Kind::Bool),
        Field::optional("newihmCdc", Kind::Bool),
    ],
};

/// Front-panel display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterDisplay {
    pub luminosity: i64,
    pub luminosity_extender: i64,
    pub state: String,
}

/// Firmware version of one flash partition. Unused partitions report
/// neither a version nor a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterVersion {
    pub version: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
}

/// Which access technologies are in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct RouterUsing {
    pub ipv4: bool,
    pub ipv6: bool,
    pub ftth: bool,
    pub adsl: bool,
    pub vdsl: bool,
}

/// Router identity and status from `GET device`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Router {
    /// Router clock at the time of the request.
    pub now: DateTime<FixedOffset>,
    pub status: i64,
    #[serde(rename = "numberofboots")]
    pub number_of_boots: u64,
    #[serde(rename = "modelname")]
    pub model_name: String,
    #[serde(rename = "modelclass")]
    pub model_class: String,
    pub optimisation: bool,
    pub user_configured: bool,
    #[serde(rename = "serialnumber")]
    pub serial_number: String,
    pub display: Option<RouterDisplay>,
    pub main: RouterVersion,
    pub reco: RouterVersion,
    pub running: RouterVersion,
    pub spl: RouterVersion,
    pub tpl: RouterVersion,
    pub ldr1: RouterVersion,
    pub ldr2: RouterVersion,
    #[serde(rename = "firstusedate")]
    pub first_use_date: DateTime<FixedOffset>,
    /// Seconds since the last boot.
    pub uptime: u64,
    #[serde(rename = "lastFactoryReset")]
    pub last_factory_reset: u64,
    pub using: RouterUsing,
    #[serde(rename = "isCellularEnable")]
    pub is_cellular_enable: Option<bool>,
    #[serde(rename = "newihm")]
    pub new_ihm: Option<bool>,
    #[serde(rename = "newihmCdc")]
    pub new_ihm_cdc: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record for Router {
    fn schema() -> &'static Schema {
        &ROUTER
    }
}

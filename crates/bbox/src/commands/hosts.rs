//! `bbox hosts`: devices known to the router.

use tabled::Tabled;

use bbox_api::{BboxClient, Host};

use crate::cli::{GlobalOpts, HostsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Lease")]
    lease: String,
    #[tabled(rename = "First seen")]
    first_seen: String,
}

impl From<&Host> for HostRow {
    fn from(h: &Host) -> Self {
        Self {
            name: h.display_name().to_owned(),
            ip: h.ip_address.clone(),
            mac: h.mac_address.clone(),
            link: h.link.clone(),
            kind: h.host_type.clone(),
            active: output::yes_no(h.active),
            lease: output::format_duration(h.lease),
            first_seen: h.first_seen.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn handle(
    client: &mut BboxClient,
    args: &HostsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut hosts = client.get_hosts().await?;
    if args.active {
        hosts.retain(|h| h.active);
    }

    let out = output::render_list(
        global.output,
        &hosts,
        |h| HostRow::from(h),
        |h| h.display_name().to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

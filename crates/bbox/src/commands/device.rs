//! `bbox device`: router identity and status.

use bbox_api::{BboxClient, Router};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn access_type(r: &Router) -> &'static str {
    if r.using.ftth {
        "FTTH"
    } else if r.using.vdsl {
        "VDSL"
    } else if r.using.adsl {
        "ADSL"
    } else {
        "-"
    }
}

fn detail(r: &Router) -> String {
    [
        format!("Model:      {} ({})", r.model_name, r.model_class),
        format!("Serial:     {}", r.serial_number),
        format!(
            "Firmware:   {} (running {})",
            r.main.version.as_deref().unwrap_or("-"),
            r.running.version.as_deref().unwrap_or("-")
        ),
        format!("Uptime:     {}", output::format_duration(r.uptime)),
        format!("Boots:      {}", r.number_of_boots),
        format!("First use:  {}", r.first_use_date.format("%Y-%m-%d")),
        format!("Access:     {}", access_type(r)),
        format!(
            "IP stack:   ipv4={} ipv6={}",
            output::yes_no(r.using.ipv4),
            output::yes_no(r.using.ipv6)
        ),
        format!("Clock:      {}", r.now.to_rfc3339()),
    ]
    .join("\n")
}

pub async fn handle(client: &mut BboxClient, global: &GlobalOpts) -> Result<(), CliError> {
    let router = client.get_router_info().await?;
    let out = output::render_single(global.output, &router, detail, |r| r.serial_number.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

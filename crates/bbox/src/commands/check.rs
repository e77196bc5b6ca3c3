//! `bbox check`: every read under one login, summarized.

use serde::Serialize;

use bbox_api::BboxClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct CheckReport {
    model: String,
    firmware: Option<String>,
    uptime_secs: u64,
    hosts_total: usize,
    hosts_active: usize,
    rx_bandwidth: u64,
    tx_bandwidth: u64,
    rx_occupation: u8,
    tx_occupation: u8,
}

fn detail(r: &CheckReport) -> String {
    [
        format!("Router:  {} ({})", r.model, r.firmware.as_deref().unwrap_or("-")),
        format!("Uptime:  {}", output::format_duration(r.uptime_secs)),
        format!("Hosts:   {} active / {} known", r.hosts_active, r.hosts_total),
        format!(
            "WAN:     rx {} ({}%)  tx {} ({}%)",
            r.rx_bandwidth, r.rx_occupation, r.tx_bandwidth, r.tx_occupation
        ),
    ]
    .join("\n")
}

pub async fn handle(client: &mut BboxClient, global: &GlobalOpts) -> Result<(), CliError> {
    let router = client.get_router_info().await?;
    let hosts = client.get_hosts().await?;
    let wan = client.get_wan_ip_stats().await?;

    let report = CheckReport {
        model: router.model_name,
        firmware: router.main.version,
        uptime_secs: router.uptime,
        hosts_total: hosts.len(),
        hosts_active: hosts.iter().filter(|h| h.active).count(),
        rx_bandwidth: wan.rx.bandwidth,
        tx_bandwidth: wan.tx.bandwidth,
        rx_occupation: wan.rx.occupation,
        tx_occupation: wan.tx.occupation,
    };
    tracing::info!(hosts = report.hosts_total, "check complete");

    let out = output::render_single(global.output, &report, detail, |_| "ok".into());
    output::print_output(&out, global.quiet);
    Ok(())
}

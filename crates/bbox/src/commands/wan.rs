//! `bbox wan-stats`: WAN IP counters.

use tabled::Tabled;

use bbox_api::{BboxClient, WanIpStats, WanStats};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DirectionRow {
    #[tabled(rename = "Direction")]
    direction: &'static str,
    #[tabled(rename = "Bandwidth")]
    bandwidth: u64,
    #[tabled(rename = "Max")]
    max_bandwidth: u64,
    #[tabled(rename = "Contract")]
    contractual: u64,
    #[tabled(rename = "Occupation")]
    occupation: String,
    #[tabled(rename = "Traffic")]
    traffic: String,
    #[tabled(rename = "Packets")]
    packets: u64,
    #[tabled(rename = "Errors")]
    errors: u64,
    #[tabled(rename = "Discards")]
    discards: u64,
}

fn row(direction: &'static str, s: &WanStats) -> DirectionRow {
    DirectionRow {
        direction,
        bandwidth: s.bandwidth,
        max_bandwidth: s.max_bandwidth,
        contractual: s.contractual_bandwidth,
        occupation: format!("{}%", s.occupation),
        traffic: output::format_bytes(s.bytes),
        packets: s.packets,
        errors: s.packets_errors,
        discards: s.packets_discards,
    }
}

fn detail(stats: &WanIpStats) -> String {
    output::render_table(&[row("rx", &stats.rx), row("tx", &stats.tx)])
}

pub async fn handle(client: &mut BboxClient, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = client.get_wan_ip_stats().await?;
    let out = output::render_single(global.output, &stats, detail, |s| {
        format!("{} {}", s.rx.bandwidth, s.tx.bandwidth)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

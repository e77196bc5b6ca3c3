//! Command handlers.
//!
//! Every read runs inside one scoped session: login first, logout when the
//! handler returns, whatever the outcome.

pub mod check;
pub mod config_cmd;
pub mod device;
pub mod hosts;
pub mod wan;

use bbox_api::BboxClient;

use crate::cli::{GlobalOpts, ReadCommand};
use crate::error::CliError;

pub async fn dispatch(
    cmd: ReadCommand,
    client: &mut BboxClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut session = client.session().await?;
    tracing::debug!(command = ?cmd, "session open");

    match cmd {
        ReadCommand::Device => device::handle(&mut session, global).await,
        ReadCommand::Hosts(args) => hosts::handle(&mut session, &args, global).await,
        ReadCommand::WanStats => wan::handle(&mut session, global).await,
        ReadCommand::Check => check::handle(&mut session, global).await,
    }
}

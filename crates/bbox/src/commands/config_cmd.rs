//! Config subcommand handlers.

use std::io::BufRead;

use bbox_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Format config for display, masking the password.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    let _ = writeln!(out, "base_url = \"{}\"", cfg.base_url);
    let _ = writeln!(out, "timeout = {}", cfg.timeout);
    let _ = writeln!(out, "tls = \"{}\"", tls_name(cfg));
    if let Some(ref ca) = cfg.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }
    if let Some(ref env) = cfg.password_env {
        let _ = writeln!(out, "password_env = \"{env}\"");
    }
    if cfg.password.is_some() {
        let _ = write!(out, "password = \"****\"");
    }

    out.trim_end().to_owned()
}

fn tls_name(cfg: &Config) -> &'static str {
    match cfg.tls {
        config::TlsSetting::System => "system",
        config::TlsSetting::Insecure => "insecure",
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();

    match args.command {
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists (use --force to overwrite)", path.display()),
                });
            }
            config::save_config(&Config::default(), &path)?;
            output::print_output(&format!("Wrote {}", path.display()), global.quiet);
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
        }

        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            if cfg.password.is_some() {
                cfg.password = Some("****".into());
            }
            let out = output::render_single(global.output, &cfg, format_config_redacted, |c| {
                c.base_url.clone()
            });
            output::print_output(&out, global.quiet);
        }

        ConfigCommand::SetPassword => {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            let password = line.trim_end_matches(['\r', '\n']);
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "empty password on stdin".into(),
                });
            }
            config::store_password(password)?;
            output::print_output("Password stored in the system keyring", global.quiet);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn redacts_password() {
        let cfg = Config {
            password: Some("hunter2".into()),
            password_env: Some("ROUTER_PW".into()),
            tls: config::TlsSetting::Insecure,
            ..Config::default()
        };
        let out = format_config_redacted(&cfg);
        assert!(!out.contains("hunter2"));
        assert_eq!(
            out,
            "base_url = \"https://mabbox.bytel.fr/api/v1/\"\n\
             timeout = 10\n\
             tls = \"insecure\"\n\
             password_env = \"ROUTER_PW\"\n\
             password = \"****\""
        );
    }
}

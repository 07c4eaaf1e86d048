//! Config subcommand handlers.

use hermie_core::{DEFAULT_BASE_URL, normalize_base_url};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

/// Config written by `init`: the current one with the active profile
/// (re)pointed at `--base-url` and made the default.
fn init_config(global: &GlobalOpts, current: &Config) -> Result<Config, CliError> {
    let name = config::active_profile_name(global, current);
    let base_url = match global.base_url.as_deref() {
        Some(raw) => normalize_base_url(raw).ok_or_else(|| CliError::Validation {
            field: "base-url".into(),
            reason: "must not be empty".into(),
        })?,
        None => DEFAULT_BASE_URL.into(),
    };

    let mut cfg = current.clone();
    cfg.profiles.insert(
        name.clone(),
        Profile {
            base_url,
            timeout: global.timeout,
        },
    );
    cfg.default_profile = Some(name);
    Ok(cfg)
}

fn profile_names(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join("\n")
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let new_cfg = init_config(global, cfg)?;
            let written = config::save_config(&new_cfg)?;
            if !global.quiet {
                eprintln!("Wrote {}", written.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let out = match global.output {
                OutputFormat::Table => output::render_toml(cfg)?,
                _ => output::render_single(
                    &global.output,
                    cfg,
                    |_| String::new(),
                    profile_names,
                )?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["hermie"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "init"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn init_adds_profile_and_makes_it_default() {
        let cfg = init_config(
            &global(&["-p", "greenhouse", "-u", "http://10.0.0.5:5000/", "--timeout", "3"]),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("greenhouse"));
        let profile = &cfg.profiles["greenhouse"];
        assert_eq!(profile.base_url, "http://10.0.0.5:5000");
        assert_eq!(profile.timeout, Some(3));
    }

    #[test]
    fn init_without_url_uses_default_origin() {
        let cfg = init_config(&global(&[]), &Config::default()).unwrap();
        assert_eq!(cfg.profiles["default"].base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.profiles["default"].timeout, None);
    }
}

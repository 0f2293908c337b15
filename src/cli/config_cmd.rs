//! The `config` command.

use std::path::Path;

use console::style;

use dirscrape::config::Settings;

use super::helpers::arrow;

/// Print where settings come from and their effective values.
pub fn cmd_config(settings: &Settings, explicit: Option<&Path>) -> anyhow::Result<()> {
    let source = match explicit {
        Some(path) => path.display().to_string(),
        None => match Settings::default_path() {
            Some(path) if path.exists() => path.display().to_string(),
            Some(path) => format!("defaults ({} not found)", path.display()),
            None => "defaults".to_string(),
        },
    };

    eprintln!("{} Source: {}", arrow(), source);
    eprintln!("{} Environment overrides applied\n", arrow());
    println!("{}", style("# Effective configuration").dim());
    print!("{}", settings.to_toml_redacted()?);
    Ok(())
}

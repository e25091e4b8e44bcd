//! Config command - show or update stored discovery defaults

use crate::cli::context::DiscoveryArgs;
use crate::cli::style::{Stylize, check};
use anstream::println;
use integration_branch_builder::config::{
    Config, config_path, load_config, load_config_file, save_config,
};
use integration_branch_builder::error::Result;
use std::path::Path;

/// Run the config command
///
/// Without flags, prints the effective settings. With flags, merges them into
/// the repository file and saves it.
pub fn run_config(path: &Path, args: &DiscoveryArgs) -> Result<()> {
    let updates = args.to_config();

    if updates.is_empty() {
        let config = load_config(path)?;
        print_config(&config);
        return Ok(());
    }

    let repo_path = config_path(path)?;
    let existing = load_config_file(&repo_path)?.unwrap_or_default();
    let config = Config {
        discovery: updates.or(existing.discovery),
    };
    let saved = save_config(path, &config)?;

    println!("{} Saved {}", check(), saved.display().to_string().emphasis());
    print_config(&config);
    Ok(())
}

fn print_config(config: &Config) {
    let d = &config.discovery;
    let unset = || "(detect)".muted();
    let show = |value: Option<&str>| value.map_or_else(unset, |v| v.accent());

    let platform = d.platform.map(|p| p.to_string());
    println!("platform = {}", show(platform.as_deref()));
    println!("owner    = {}", show(d.owner.as_deref()));
    println!("repo     = {}", show(d.repo.as_deref()));
    println!("host     = {}", show(d.host.as_deref()));
    println!("remote   = {}", d.remote_or_default().accent());
}

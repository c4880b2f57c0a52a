//! Config command - configuration management.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use console::{Style, style};
use rendercloud_config::{RenderCloudConfig, resolve_api_key};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration and where it came from
    Show,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./rendercloud.toml) instead of user config
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Init { local, force } => cmd_init(ctx, local, force),
        ConfigCommand::Path => cmd_path(ctx),
    }
}

/// Copy of `config` safe to print.
fn redacted(config: &RenderCloudConfig) -> RenderCloudConfig {
    let mut out = config.clone();
    if let Some(api) = out.api.as_mut()
        && api.api_key.is_some()
    {
        api.api_key = Some("********".to_string());
    }
    if let Some(webhook) = out.webhook.as_mut()
        && webhook.secret.is_some()
    {
        webhook.secret = Some("********".to_string());
    }
    out
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    let config = redacted(&loaded.config);

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("{}\n", style("# Render Cloud Configuration").bold());

    println!("Config files (later overrides earlier):");
    for source in &loaded.sources {
        let status = if source.loaded {
            "✓ loaded"
        } else {
            "· not found"
        };
        println!("  {} {:<8} {}", status, source.layer, source.path.display());
    }
    println!();

    let api = loaded.config.api();
    println!("API:");
    println!(
        "  base_url: {}",
        ctx.api_url
            .as_deref()
            .or(api.base_url.as_deref())
            .unwrap_or(rendercloud_client::DEFAULT_BASE_URL)
    );
    match resolve_api_key(api.api_key.as_deref()) {
        Some(key) => println!("  api_key:  set ({})", key.source),
        None => println!("  api_key:  {}", dim.apply_to("not set")),
    }
    if let Some(secs) = api.timeout_secs {
        println!("  timeout:  {}s", secs);
    }
    println!();

    let webhook = loaded.config.webhook();
    println!("Webhook:");
    println!("  listen:   {}{}", webhook.bind_address, webhook.path);
    if let Some(url) = &webhook.public_url {
        println!("  callback: {}", url);
    }
    if let Some(owner) = &webhook.owner_id {
        println!("  owner:    {}", owner);
    }
    if !webhook.events.is_empty() {
        println!("  events:   {}", webhook.events.join(", "));
    }
    println!();

    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        println!("---\nRaw config:\n");
        println!("{}", config.to_toml()?);
    }

    Ok(())
}

fn user_config_path(ctx: &Context) -> Result<PathBuf> {
    ctx.config_dir()
        .map(|d| d.join("config.toml"))
        .ok_or_else(|| anyhow!("Could not determine config directory"))
}

fn cmd_init(ctx: &Context, local: bool, force: bool) -> Result<()> {
    let path = if local {
        PathBuf::from("rendercloud.toml")
    } else {
        user_config_path(ctx)?
    };

    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    rendercloud_config::save_config(&RenderCloudConfig::template(), &path)?;
    println!("✓ Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  export RENDER_API_KEY=rnd_...    # API key from the Render dashboard");
    println!("  rendercloud verify               # check the key");
    println!("  rendercloud config show          # verify configuration");

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    println!("{}", user_config_path(ctx)?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendercloud_config::{ApiConfig, WebhookConfig};

    #[test]
    fn test_redacted_hides_secrets() {
        let config = RenderCloudConfig {
            api: Some(ApiConfig {
                api_key: Some("rnd_real".to_string()),
                ..Default::default()
            }),
            webhook: Some(WebhookConfig {
                secret: Some("shh".to_string()),
                ..Default::default()
            }),
        };
        let out = redacted(&config);
        assert_eq!(out.api.unwrap().api_key.as_deref(), Some("********"));
        assert_eq!(out.webhook.unwrap().secret.as_deref(), Some("********"));
    }
}

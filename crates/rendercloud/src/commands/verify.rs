//! Verify command - check the API key against `GET /owners`.

use anyhow::Result;
use clap::Args;
use console::Style;
use serde::Serialize;

use super::Context;

/// Arguments for the verify command.
#[derive(Args, Debug)]
pub struct VerifyArgs {}

#[derive(Debug, Serialize)]
struct VerifyOutput {
    valid: bool,
    base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the verify command.
pub async fn run(_args: VerifyArgs, ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    let client = ctx.client(&loaded.config)?;
    let result = client.owners().check_credentials().await;

    let output = VerifyOutput {
        valid: result.is_ok(),
        base_url: client.base_url().to_string(),
        error: result.as_ref().err().map(ToString::to_string),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let dim = Style::new().dim();
        match &output.error {
            None => println!("{} Credentials accepted", Style::new().green().apply_to("✓")),
            Some(e) => println!("{} {}", Style::new().red().apply_to("✗"), e),
        }
        println!("  {} {}", dim.apply_to("API:"), output.base_url);
    }

    result.map_err(Into::into)
}

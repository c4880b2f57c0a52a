//! Trigger command - webhook subscription lifecycle and delivery receiver.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use console::Style;
use rendercloud_client::split_ids;
use rendercloud_config::WebhookConfig;
use rendercloud_webhook::{
    FileStore, ReceiverConfig, StateStore, Subscription, TriggerSettings, WebhookServer,
};
use serde_json::{Value, json};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::Context;

/// Arguments for the trigger command.
#[derive(Args, Debug)]
pub struct TriggerArgs {
    /// State key identifying this trigger
    #[arg(long, default_value = "default", global = true)]
    pub key: String,

    #[command(subcommand)]
    pub command: TriggerCommand,
}

/// Settings that override the `[webhook]` config section.
#[derive(Args, Debug)]
pub struct SubscriptionOverrides {
    /// Callback URL registered with Render
    #[arg(long)]
    pub url: Option<String>,

    /// Workspace owner id (usr-... or tea-...)
    #[arg(long)]
    pub owner_id: Option<String>,

    /// Comma-separated events (e.g. deploy_succeeded,deploy_failed)
    #[arg(long)]
    pub events: Option<String>,

    /// Comma-separated service ids to filter on
    #[arg(long)]
    pub service_ids: Option<String>,

    /// Signing secret (generated when unset)
    #[arg(long)]
    pub secret: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TriggerCommand {
    /// Register the webhook subscription
    Create(SubscriptionOverrides),

    /// Check that the stored subscription exists and targets the callback URL
    Check {
        /// Callback URL (default: webhook.public_url)
        #[arg(long)]
        url: Option<String>,
    },

    /// Delete the subscription and forget its state
    Delete,

    /// Run the receiver and print forwarded deliveries
    Listen {
        /// Address to bind (default: webhook.bind_address)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Skip signature verification
        #[arg(long)]
        no_verify: bool,
    },
}

/// Run the trigger command.
pub async fn run(args: TriggerArgs, ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    let mut webhook = loaded.config.webhook();
    let store: Arc<dyn StateStore> = Arc::new(store(ctx)?);

    match args.command {
        TriggerCommand::Create(overrides) => {
            overrides.apply(&mut webhook);
            let url = callback_url(&webhook, None)?;
            let settings = TriggerSettings::from_config(&webhook)?;
            let subscription =
                Subscription::new(ctx.client(&loaded.config)?, store, args.key, settings);

            if subscription.check_exists(&url).await {
                print_status(ctx, "exists", &subscription, &url).await?;
                return Ok(());
            }
            if !subscription.create(&url).await? {
                return Err(anyhow!("Render did not return a webhook id"));
            }
            print_status(ctx, "created", &subscription, &url).await
        }
        TriggerCommand::Check { url } => {
            let url = callback_url(&webhook, url)?;
            let subscription = lifecycle_only(ctx, &loaded.config, store, args.key)?;
            let exists = subscription.check_exists(&url).await;
            let status = if exists { "exists" } else { "missing" };
            print_status(ctx, status, &subscription, &url).await
        }
        TriggerCommand::Delete => {
            let subscription = lifecycle_only(ctx, &loaded.config, store, args.key)?;
            let before = subscription.state().await?;
            subscription.delete().await?;
            if ctx.json_output {
                println!("{}", json!({"deleted": before.webhook_id}));
            } else if let Some(id) = before.webhook_id {
                println!("✓ Deleted webhook {}", id);
            } else {
                println!("No webhook subscription stored");
            }
            Ok(())
        }
        TriggerCommand::Listen { bind, no_verify } => {
            let mut config = ReceiverConfig::from_config(&webhook)?.with_state_key(args.key);
            if let Some(addr) = bind {
                config.bind_address = addr;
            }
            if no_verify {
                config = config.with_verify_signature(false);
            }
            listen(store, config).await
        }
    }
}

impl SubscriptionOverrides {
    fn apply(self, webhook: &mut WebhookConfig) {
        if let Some(url) = self.url {
            webhook.public_url = Some(url);
        }
        if let Some(owner) = self.owner_id {
            webhook.owner_id = Some(owner);
        }
        if let Some(events) = self.events {
            webhook.events = split_ids(&events);
        }
        if let Some(ids) = self.service_ids {
            webhook.service_ids = split_ids(&ids);
        }
        if let Some(secret) = self.secret {
            webhook.secret = Some(secret);
        }
    }
}

fn store(ctx: &Context) -> Result<FileStore> {
    let dir = ctx
        .config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(FileStore::new(rendercloud_config::state_dir(&dir)))
}

fn callback_url(webhook: &WebhookConfig, explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| webhook.public_url.clone())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| anyhow!("No callback URL. Pass --url or set webhook.public_url"))
}

/// Subscription handle for check/delete, which never read event settings.
fn lifecycle_only(
    ctx: &Context,
    config: &rendercloud_config::RenderCloudConfig,
    store: Arc<dyn StateStore>,
    key: String,
) -> Result<Subscription> {
    let settings = TriggerSettings::new(
        config.webhook().owner_id.unwrap_or_default(),
        Vec::new(),
    );
    Ok(Subscription::new(ctx.client(config)?, store, key, settings))
}

async fn print_status(
    ctx: &Context,
    status: &str,
    subscription: &Subscription,
    url: &str,
) -> Result<()> {
    let state = subscription.state().await?;
    if ctx.json_output {
        let out = json!({
            "status": status,
            "key": subscription.key(),
            "webhookId": state.webhook_id,
            "url": url,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let dim = Style::new().dim();
        let marker = match status {
            "missing" => Style::new().red().apply_to("●"),
            _ => Style::new().green().apply_to("●"),
        };
        println!("{} Subscription {}", marker, status);
        println!("  {} {}", dim.apply_to("Key:"), subscription.key());
        if let Some(id) = &state.webhook_id {
            println!("  {} {}", dim.apply_to("Webhook:"), id);
        }
        println!("  {} {}", dim.apply_to("URL:"), url);
    }
    Ok(())
}

async fn listen(store: Arc<dyn StateStore>, config: ReceiverConfig) -> Result<()> {
    let server = WebhookServer::new(store, config);
    let deliveries = server.subscribe();
    let server_task = tokio::spawn(server.run());
    relay(server_task, deliveries, tokio::signal::ctrl_c(), |envelope| {
        println!("{}", envelope);
    })
    .await
}

/// Hand deliveries to `emit` until `shutdown` resolves or the server stops.
async fn relay<S, F>(
    mut server_task: JoinHandle<rendercloud_webhook::Result<()>>,
    mut deliveries: broadcast::Receiver<Value>,
    shutdown: S,
    mut emit: F,
) -> Result<()>
where
    S: Future,
    F: FnMut(&Value),
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut server_task => {
                return match result {
                    Ok(outcome) => outcome.map_err(Into::into),
                    Err(e) => Err(anyhow!("receiver task failed: {}", e)),
                };
            }
            delivery = deliveries.recv() => match delivery {
                Ok(envelope) => emit(&envelope),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "output fell behind, deliveries dropped"),
                Err(RecvError::Closed) => break,
            },
            _ = &mut shutdown => {
                info!("shutting down receiver");
                break;
            }
        }
    }

    if server_task.is_finished() {
        if let Ok(Err(e)) = server_task.await {
            return Err(e.into());
        }
    } else {
        server_task.abort();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rendercloud_webhook::WebhookError;
    use tokio::sync::oneshot;

    fn idle_server() -> JoinHandle<rendercloud_webhook::Result<()>> {
        tokio::spawn(std::future::pending())
    }

    #[tokio::test]
    async fn test_relay_stops_on_shutdown_while_deliveries_flow() {
        let (tx, rx) = broadcast::channel(16);
        for i in 0..5 {
            tx.send(json!({ "id": i })).unwrap();
        }
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut stop_tx = Some(stop_tx);
        let mut seen = Vec::new();

        relay(idle_server(), rx, stop_rx, |envelope| {
            seen.push(envelope.clone());
            if seen.len() == 2
                && let Some(stop) = stop_tx.take()
            {
                stop.send(()).unwrap();
            }
        })
        .await
        .unwrap();

        assert!(seen.len() >= 2);
        for (i, envelope) in seen.iter().enumerate() {
            assert_eq!(envelope, &json!({ "id": i }));
        }
    }

    #[tokio::test]
    async fn test_relay_ends_when_channel_closes() {
        let (tx, rx) = broadcast::channel(4);
        tx.send(json!({"id": "evt-1"})).unwrap();
        drop(tx);

        let mut seen = Vec::new();
        relay(idle_server(), rx, std::future::pending::<()>(), |e| {
            seen.push(e.clone())
        })
        .await
        .unwrap();
        assert_eq!(seen, vec![json!({"id": "evt-1"})]);
    }

    #[tokio::test]
    async fn test_relay_surfaces_server_error() {
        let (_tx, rx) = broadcast::channel::<Value>(4);
        let server = tokio::spawn(async {
            Err(WebhookError::Server("address in use".to_string()))
        });

        let err = relay(server, rx, std::future::pending::<()>(), |_| {})
            .await
            .unwrap_err();
        assert!(err.to_string().contains("address in use"));
    }
}

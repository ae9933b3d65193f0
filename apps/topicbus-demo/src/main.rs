use anyhow::Context;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use topicbus_core::logging::init_logging;
use topicbus_core::{format_error_chain, AsyncEventBus, BusConfig, HandlerResult, Token};
use topicbus_json::{subscribe_typed, EventScript, JsonBus};
use tracing::{error, info};

const USAGE: &str = "usage: topicbus-demo [CONFIG_JSON] [SCRIPT_JSON]";

#[derive(Debug, Deserialize)]
struct LoginPayload {
    username: String,
}

fn login_handler(name: &'static str) -> impl Fn(&str, LoginPayload) -> HandlerResult {
    move |topic, login| {
        info!(subscriber = name, topic, username = %login.username, "login received");
        Ok(())
    }
}

fn run_login_scenario(bus: &JsonBus, first: Token) -> anyhow::Result<()> {
    let payload = json!({ "username": "test" });

    let delivered = bus.publish("/login", &payload)?;
    info!(delivered, "published /login to A and B");

    bus.unsubscribe(first);
    info!(token = %first, "unsubscribed A");

    let delivered = bus.publish("/login", &payload)?;
    info!(delivered, "published /login to B only");

    let delivered = bus.publish("/nonexistent", &payload)?;
    info!(delivered, "published /nonexistent");
    Ok(())
}

async fn slow_report(topic: String, body: Arc<String>) -> HandlerResult {
    tokio::time::sleep(Duration::from_millis(50)).await;
    info!(subscriber = "slow", topic = %topic, body = %body, "report handled");
    Ok(())
}

async fn fast_report(topic: String, body: Arc<String>) -> HandlerResult {
    info!(subscriber = "fast", topic = %topic, body = %body, "report handled");
    Ok(())
}

/// The slow subscriber registered first still finishes first.
async fn run_async_demo(config: BusConfig) -> anyhow::Result<()> {
    let bus: AsyncEventBus<String> = AsyncEventBus::with_config(config);
    bus.subscribe("/report", slow_report)?;
    bus.subscribe("/report", fast_report)?;

    let delivered = bus.publish("/report", "nightly totals".to_string()).await?;
    info!(delivered, "published /report");
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);

    let config = match args.next() {
        Some(path) if path.as_os_str() == "-h" || path.as_os_str() == "--help" => {
            println!("{USAGE}");
            return Ok(());
        }
        Some(path) => BusConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BusConfig::default(),
    };
    info!(?config, "bus configured");

    let bus = JsonBus::with_config(config.clone());
    let first = subscribe_typed(&bus, "/login", login_handler("A"))?;
    subscribe_typed(&bus, "/login", login_handler("B"))?;

    match args.next() {
        Some(path) => {
            let script = EventScript::load(&path)
                .with_context(|| format!("loading script {}", path.display()))?;
            let report = script.play(&bus)?;
            info!(
                delivered = report.delivered,
                undelivered = ?report.undelivered,
                "script finished"
            );
        }
        None => run_login_scenario(&bus, first)?,
    }

    run_async_demo(config).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    if let Err(e) = run().await {
        error!(error = %format_error_chain(&e), "demo failed");
        return Err(e);
    }
    Ok(())
}

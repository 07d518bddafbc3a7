// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use the_conduit::backends::memory::InMemoryQueue;
use the_conduit::config::load_and_validate_config;
use the_conduit::observability::metrics::InMemoryMetrics;
use the_conduit::queue::{QueueClient, QueueOptions};
use the_conduit::streaming::{generate, log_errors, Done};
use tracing_subscriber::EnvFilter;

/// How long the demo waits for each message to come back.
const RECEIVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Demo payload carried through the queue.
#[derive(Debug, Serialize, Deserialize)]
struct Note {
    seq: usize,
    text: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.yaml> [item ...]", args[0]);
        eprintln!("Example: {} conduit.yaml \"hello\" \"world\"", args[0]);
        std::process::exit(1);
    }

    let config_file = &args[1];
    let texts = &args[2..];

    let cfg = load_and_validate_config(config_file)
        .with_context(|| format!("loading {}", config_file))?;
    let options = QueueOptions::try_from(&cfg)?;

    println!("🚚 Conduit Queue Demo");
    println!("═════════════════════");
    println!("Config: {}", config_file);
    println!("Items:  {}", texts.len());
    println!();

    let done = Done::new();
    let queue = Arc::new(InMemoryQueue::new());
    let metrics = Arc::new(InMemoryMetrics::new());
    let client: QueueClient<Note> =
        QueueClient::json(done.clone(), queue.clone(), options, metrics.clone())?;

    let notes = texts
        .iter()
        .enumerate()
        .map(|(seq, text)| Note {
            seq,
            text: text.clone(),
        })
        .collect::<Vec<_>>();
    let send_errors = client.start_batch_sending(cfg.workers.send, generate(&done, notes))?;
    let failed_sends = log_errors(send_errors, "send").await?;
    println!("📤 Sent {} items ({} send errors retried)", texts.len(), failed_sends);

    let (messages, receive_errors) = client.start_polling(cfg.workers.receive)?;
    let receive_log = log_errors(receive_errors, "receive");

    for _ in 0..texts.len() {
        let message = tokio::time::timeout(RECEIVE_TIMEOUT, messages.recv_async())
            .await
            .context("timed out waiting for a message")??;
        println!(
            "📥 {} (delivery {}): #{} {}",
            message.id(),
            message.raw.receive_count,
            message.item.seq,
            message.item.text
        );
        client.delete_message(&message).await?;
    }

    done.set();
    let failed_receives = receive_log.await?;

    println!();
    println!("📊 Metrics ({} receive errors)", failed_receives);
    for (key, value) in metrics.counters() {
        println!("  {:<28} {}", key, value);
    }
    println!("  {:<28} {}", "in flight", queue.in_flight());

    Ok(())
}

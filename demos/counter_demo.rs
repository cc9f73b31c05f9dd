//! Counter broadcast demo
//!
//! Run with: cargo run --example counter_demo [TICK_MS]
//!
//! Starts a service, binds two clients that print the updates they receive,
//! bumps the increment step to 10, then unregisters one client and stops the
//! service. Ctrl+C stops early.

use std::time::Duration;

use tickcast::{BroadcastService, ClientId, ControlMessage, ServiceConfig, Update};
use tokio::sync::mpsc;

fn print_usage() {
    println!("Usage: counter_demo [TICK_MS]");
    println!();
    println!("  TICK_MS  Tick interval in milliseconds (default: 1000)");
}

/// Presentation side of one client: render every update it receives
fn spawn_printer(
    name: &'static str,
    mut updates: mpsc::Receiver<Update>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            match update {
                Update::Int(value) => println!("[{}] int value: {}", name, value),
                Update::Str(text) => println!("[{}] str value: {}", name, text),
            }
        }
        println!("[{}] disconnected", name);
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    let tick_ms = match args.get(1) {
        Some(value) => match value.parse::<u64>() {
            Ok(ms) => ms,
            Err(e) => {
                eprintln!("Error: invalid TICK_MS '{}': {}", value, e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => 1000,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tickcast=debug".parse()?)
                .add_directive("counter_demo=debug".parse()?),
        )
        .init();

    let tick = Duration::from_millis(tick_ms);
    let service = BroadcastService::new(ServiceConfig::default().tick_interval(tick));
    service.start().await;

    let control = service.bind().await.ok_or("service is not running")?;

    let (first, first_rx) = service.client_channel(ClientId::new(1));
    let (second, second_rx) = service.client_channel(ClientId::new(2));
    let first_printer = spawn_printer("first", first_rx);
    let second_printer = spawn_printer("second", second_rx);

    control.send(ControlMessage::Register(first)).await?;
    control.send(ControlMessage::Register(second)).await?;

    let script = async {
        tokio::time::sleep(tick * 3).await;
        println!("-- increment by 10");
        control.send(ControlMessage::SetIncrement(10)).await?;

        tokio::time::sleep(tick * 3).await;
        println!("-- unregister first");
        control.send(ControlMessage::Unregister(ClientId::new(1))).await?;

        tokio::time::sleep(tick * 3).await;
        Ok::<_, mpsc::error::SendError<ControlMessage>>(())
    };

    tokio::select! {
        result = script => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    service.stop().await;
    let _ = first_printer.await;
    let _ = second_printer.await;

    let stats = service.stats();
    println!(
        "Stats: ticks={} delivered={} failed={} messages={}",
        stats.ticks, stats.updates_delivered, stats.delivery_failures, stats.messages_handled
    );

    Ok(())
}

//! Feed host commands to the adapter from stdin, one JSON object per line.
//!
//! Usage:
//!   cargo run --example dispatch
//!   MCP_SERVER_URL=http://localhost:8080/mcp cargo run --example dispatch
//!   PIPEDREAM_API_KEY=... PIPEDREAM_PROJECT_ID=... cargo run --example dispatch -- --timeout-ms 5000
//!
//! Then type e.g.
//!   {"name":"list_mcp_tools"}
//!   {"name":"execute_mcp_tool","tool_name":"example_tool","tool_args":"{}"}
//!
//! Every input line gets exactly one JSON result on stdout; a line that is
//! not JSON answers with a `parse_error` result.
//!
//! Ctrl-D or "exit" / "quit" to leave. Ctrl-C cancels the command in flight.

use std::time::Duration;

use clap::Parser;
use mcp_bridge::{
    AdapterConfig, AdapterEvent, BridgeError, ClientConfig, CommandAdapter, CommandResult,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "dispatch", about = "Send commands to the MCP bridge adapter")]
struct Cli {
    /// MCP server URL (overrides MCP_SERVER_URL)
    #[arg(long)]
    server_url: Option<String>,

    /// Per-call timeout in milliseconds
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,

    /// Retries on transient failures
    #[arg(long, default_value_t = 1)]
    retries: u32,

    /// Extension name reported in logs and health
    #[arg(long, default_value = "mcp_integration")]
    name: String,

    /// Print adapter events to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut client_config = ClientConfig::from_env();
    if cli.server_url.is_some() {
        client_config.server_url = cli.server_url.clone();
    }

    let (tx, mut rx) = tokio::sync::mpsc::channel::<AdapterEvent>(64);
    let verbose = cli.verbose;
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if !verbose {
                continue;
            }
            match event {
                AdapterEvent::Initialized { transport } => {
                    eprintln!("\x1b[2m  [connected: {transport}]\x1b[0m");
                }
                AdapterEvent::ToolCall { name, args } => {
                    eprintln!("\x1b[33m  [tool: {name}]\x1b[0m {args}");
                }
                AdapterEvent::Error { message } => {
                    eprintln!("\x1b[1;31m  [error]\x1b[0m {message}");
                }
                AdapterEvent::CommandFinished { name, status } => {
                    eprintln!("\x1b[2m  [{name}: {status:?}]\x1b[0m");
                }
                AdapterEvent::CommandReceived { .. } => {}
            }
        }
    });

    let adapter = CommandAdapter::new(
        client_config.build_client(),
        AdapterConfig {
            name: cli.name.clone(),
            call_timeout: Duration::from_millis(cli.timeout_ms),
            max_retries: cli.retries,
        },
    )
    .with_events(tx);

    if let Err(e) = adapter.initialize().await {
        eprintln!("\x1b[1;31merror:\x1b[0m {e}");
        std::process::exit(1);
    }

    let health = adapter.health();
    eprintln!("{} ({})", health.service, health.transport);
    eprintln!("---");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            _ => break,
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed, "exit" | "quit") {
            break;
        }

        let raw: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                let err = BridgeError::Parse(format!("line is not JSON: {e}"));
                println!("{}", CommandResult::failed(&err).to_json());
                continue;
            }
        };

        let cancel = CancellationToken::new();
        let on_ctrl_c = cancel.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_ctrl_c.cancel();
            }
        });

        let result = adapter.dispatch_with_cancel(&raw, cancel).await;
        watcher.abort();
        println!("{}", result.to_json());
    }

    drop(adapter);
    printer.await.ok();
    eprintln!("bye.");
}

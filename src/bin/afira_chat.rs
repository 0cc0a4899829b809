//! afira-chat — terminal front-end for the Afira inference server
//!
//! Usage:
//!   afira-chat [--url <base>]      Start an interactive chat session
//!   afira-chat --version           Show version information
//!   afira-chat --help              Show usage

use afira_client::{ChatClient, Message};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_STATE_FILE: &str = ".afira_state.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut base_url: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--url" => match args.get(i + 1) {
                Some(url) => {
                    base_url = Some(url.clone());
                    i += 1;
                }
                None => {
                    eprintln!("Error: --url requires a value");
                    std::process::exit(1);
                }
            },
            "version" | "--version" | "-V" => {
                println!("afira-chat {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if let Err(e) = run(base_url).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"afira-chat — chat with the Afira inference server

USAGE:
    afira-chat [--url <base>]

COMMANDS (inside the session):
    /reset      Reset the conversation on the server
    /health     Re-check server readiness
    /id         Show your user id
    /quit       Exit

ENVIRONMENT:
    AFIRA_API_URL               Server base URL (default http://localhost:5000)
    AFIRA_STATE_FILE            Where the user id is kept (default ./.afira_state.json)
    AFIRA_HTTP_TIMEOUT_SECS     Per-request timeout, unset for none
    AFIRA_PROXY_URL             HTTP proxy for all requests
    RUST_LOG                    Log filter (default warn)"#
    );
}

fn state_file() -> PathBuf {
    std::env::var("AFIRA_STATE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE))
}

fn render(message: &Message) -> String {
    let label = if message.is_from_bot() { "Afira" } else { "You" };
    format!("{label}: {}", message.text)
}

async fn run(base_url: Option<String>) -> afira_client::Result<()> {
    let mut builder = ChatClient::builder().file_store(state_file());
    if let Some(url) = base_url {
        builder = builder.base_url(url);
    }
    let client = builder.build()?;

    if let Err(e) = client.load_chat_data().await {
        eprintln!("Warning: {e} (is the server running at {}?)", client.base_url());
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render(&Message::bot(client.get_greeting())));
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" | "/exit" => break,
            "/reset" => {
                client.reset_conversation().await;
                println!("Conversation reset.");
            }
            "/health" => {
                let ready = client.check_server_health().await;
                println!("Server ready: {ready}");
            }
            "/id" => println!("{}", client.get_current_user_id().await),
            text => {
                let reply = client.process_user_message(text).await;
                println!("{}", render(&Message::bot(reply)));
            }
        }
    }
    Ok(())
}

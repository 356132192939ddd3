//! pantry: interactive client for pantryd.

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use pantry::PantryError;
use pantry::client::{DEFAULT_ZBAR_PROGRAM, ServiceClient, ZbarDecoder, prepare_message};
use pantry::server::EXIT_COMMAND;

const EXAMPLES: &str = "Examples: get-food beef noodle soup
          get-food-report 415269
          get-food-by-barcode --code=009800146130
          get-food-by-barcode --img=/path/to/barcode.jpg";

/// Pantry CLI client
#[derive(Parser)]
#[command(name = "pantry")]
#[command(version = pantry::PKG_VERSION)]
#[command(about = "Pantry food data client")]
struct Args {
    /// Server address
    #[arg(short, long, env = "PANTRY_ADDRESS", default_value = "127.0.0.1:5000")]
    address: String,

    /// Barcode scanner used for `--img=` requests
    #[arg(long, default_value = DEFAULT_ZBAR_PROGRAM)]
    zbar: std::path::PathBuf,

    /// Send a single command and exit (interactive mode if omitted)
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let decoder = ZbarDecoder::new(&args.zbar);

    let mut client = ServiceClient::connect(&args.address).await.map_err(|e| {
        eprintln!("Unable to connect to the server at {}", args.address);
        e
    })?;

    if !args.command.is_empty() {
        let message = prepare_message(&args.command.join(" "), &decoder).await?;
        for line in client.request(&message).await? {
            println!("{line}");
        }
        client.close().await?;
        return Ok(());
    }

    println!("Connected to pantry at {}", args.address);
    println!("Enter commands (type '{EXIT_COMMAND}' to quit):");
    println!("{EXAMPLES}");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(input) = stdin.next_line().await? else {
            break;
        };
        if input.trim().eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        let message = match prepare_message(&input, &decoder).await {
            Ok(message) => message,
            Err(PantryError::InvalidMessage(_)) => {
                println!("Invalid command format, please check input and try again.");
                continue;
            }
            Err(e @ PantryError::BarcodeDecode { .. }) => {
                warn!(error = %e, "barcode decoding failed");
                println!("Error parsing barcode, check image path");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        for line in client.request(&message).await? {
            println!("{line}");
        }
    }

    println!("Disconnecting from server...");
    client.close().await?;
    Ok(())
}

//! Per-connection request/response loop.
//!
//! Each request line gets zero or more response lines followed by
//! [`END_MARKER`]. Domain errors become exactly one line and never end the
//! connection; only socket I/O errors do. [`EXIT_COMMAND`] closes the
//! connection with [`CLOSING_LINE`] and no marker.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use crate::command::Command;
use crate::{FoodRetriever, PantryError};

/// Line terminating every response.
pub const END_MARKER: &str = "END";
/// Client line that closes the connection (case-insensitive).
pub const EXIT_COMMAND: &str = "exit";
/// Reply to [`EXIT_COMMAND`].
pub const CLOSING_LINE: &str = "Connection closed";

const TRY_LATER: &str = "Try again later or contact administrator";
const NOT_UTF8: &str = "message is not valid UTF-8";

/// Serve one client until it sends `exit` or closes the stream.
///
/// `peer` is only used for log context.
pub async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    retriever: &FoodRetriever,
    peer: &str,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(strip_line_ending(&buf)) {
            Ok(line) if line.trim().eq_ignore_ascii_case(EXIT_COMMAND) => {
                write_line(&mut writer, CLOSING_LINE).await?;
                writer.flush().await?;
                break;
            }
            Ok(line) => respond(retriever, line, peer).await,
            Err(e) => {
                debug!(peer, error = %e, "client message is not valid UTF-8");
                vec![format!("Invalid command: {NOT_UTF8}")]
            }
        };

        for response_line in response {
            write_line(&mut writer, &response_line).await?;
        }
        write_line(&mut writer, END_MARKER).await?;
        writer.flush().await?;
    }
    Ok(())
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Response lines for one request line, without the end marker.
pub async fn respond(retriever: &FoodRetriever, line: &str, peer: &str) -> Vec<String> {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(e) => {
            debug!(peer, error = %e, "invalid client message");
            return vec![format!("Invalid command: {e}")];
        }
    };

    match &command {
        Command::SearchByKeywords(keywords) => match retriever.get_food_by_keywords(keywords).await {
            Ok(items) if items.is_empty() => {
                vec!["No foods found for the given keywords".to_string()]
            }
            Ok(items) => items.iter().map(ToString::to_string).collect(),
            Err(e) => vec![error_line(
                &command,
                peer,
                e,
                || format!("No foods found for keywords: {}", keywords.join(" ")),
                "food",
            )],
        },
        Command::GetReportById(id) => match retriever.get_food_report(*id).await {
            Ok(report) => report.lines(),
            Err(e) => vec![error_line(
                &command,
                peer,
                e,
                || format!("No food found with ID {id}"),
                "food report",
            )],
        },
        Command::GetByBarcode(barcode) => match retriever.get_food_by_barcode(barcode).await {
            Ok(summary) => vec![summary.to_string()],
            Err(e) => vec![error_line(
                &command,
                peer,
                e,
                || format!("Product with barcode {barcode} not found in cache"),
                "food by barcode",
            )],
        },
    }
}

/// Turn a retriever error into the single line shown to the client.
///
/// Misses and bad arguments are expected outcomes and only logged at debug
/// level; everything else is logged as an error with its context.
fn error_line(
    command: &Command,
    peer: &str,
    err: PantryError,
    not_found: impl FnOnce() -> String,
    subject: &str,
) -> String {
    match err {
        e if e.is_not_found() => {
            debug!(peer, command = command.name(), error = %e, "no results");
            not_found()
        }
        PantryError::InvalidArgument(reason) => {
            debug!(peer, command = command.name(), %reason, "invalid argument");
            format!("Invalid argument: {reason}")
        }
        e => {
            error!(peer, command = ?command, error = %e, "unable to retrieve {subject}");
            format!("Error while retrieving {subject}. {TRY_LATER}")
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await
}

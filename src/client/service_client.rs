//! [`ServiceClient`]: line-protocol client for a running pantryd.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::server::{END_MARKER, EXIT_COMMAND};
use crate::{PantryError, Result};

/// A connection to a pantryd server.
///
/// Requests are answered strictly in order, so one client handles one
/// request at a time.
pub struct ServiceClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl ServiceClient {
    /// Connect to a pantryd server at the given address.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut client = ServiceClient::connect("127.0.0.1:5000").await?;
    /// let lines = client.request("get-food-report 2494378").await?;
    /// ```
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            PantryError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to connect to {addr}: {e}"),
            ))
        })?;
        let (read, writer) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(read).lines(),
            writer,
        })
    }

    /// Send one request line and collect the response lines up to (not
    /// including) the end marker.
    pub async fn request(&mut self, line: &str) -> Result<Vec<String>> {
        self.send(line).await?;

        let mut response = Vec::new();
        loop {
            match self.lines.next_line().await? {
                Some(l) if l == END_MARKER => return Ok(response),
                Some(l) => response.push(l),
                None => {
                    return Err(PantryError::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "server closed the connection mid-response",
                    )));
                }
            }
        }
    }

    /// Send `exit` and return the server's closing line, if any.
    pub async fn close(mut self) -> Result<Option<String>> {
        self.send(EXIT_COMMAND).await?;
        let closing = self.lines.next_line().await?;
        self.writer.shutdown().await?;
        Ok(closing)
    }

    async fn send(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.trim_end().as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

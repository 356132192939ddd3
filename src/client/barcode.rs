//! Barcode-image decoding for `get-food-by-barcode --img=<path>`.
//!
//! The server only understands `--code=<barcode>`. Before sending, the client
//! rewrites an `--img=` request into a `--code=` request using a
//! [`BarcodeDecoder`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::command::{BARCODE_PREFIX, GET_FOOD_BY_BARCODE};
use crate::{PantryError, Result};

/// Marker carrying an image path in a barcode request.
pub const IMAGE_PREFIX: &str = "--img=";

/// Default barcode scanner program used by [`ZbarDecoder`].
pub const DEFAULT_ZBAR_PROGRAM: &str = "zbarimg";

/// Reads a barcode from an image file.
#[async_trait]
pub trait BarcodeDecoder: Send + Sync {
    /// Decode the first barcode in the image at `path`.
    ///
    /// Fails with [`PantryError::BarcodeDecode`] when the file cannot be
    /// read or holds no barcode.
    async fn decode(&self, path: &Path) -> Result<String>;
}

/// [`BarcodeDecoder`] backed by the `zbarimg` command-line scanner.
#[derive(Debug, Clone)]
pub struct ZbarDecoder {
    program: PathBuf,
}

impl ZbarDecoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ZbarDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_ZBAR_PROGRAM)
    }
}

#[async_trait]
impl BarcodeDecoder for ZbarDecoder {
    async fn decode(&self, path: &Path) -> Result<String> {
        let decode_error = |reason: String| PantryError::BarcodeDecode {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(decode_error("file does not exist or is not readable".into()));
        }

        let output = tokio::process::Command::new(&self.program)
            .arg("--quiet")
            .arg("--raw")
            .arg(path)
            .output()
            .await
            .map_err(|e| decode_error(format!("failed to run {}: {e}", self.program.display())))?;

        if !output.status.success() {
            return Err(decode_error(format!(
                "no barcode found ({})",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let barcode = stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| decode_error("no barcode found".into()))?;
        debug!(path = %path.display(), barcode, "decoded barcode image");
        Ok(barcode.to_string())
    }
}

/// Prepare a user message for the wire.
///
/// Only `get-food-by-barcode` requests are touched: one that already has a
/// `--code=` token is sent as-is, one with `--img=<path>` is decoded and
/// rewritten to `get-food-by-barcode --code=<barcode>`. The image path runs
/// to the end of the line and may contain spaces.
pub async fn prepare_message(message: &str, decoder: &dyn BarcodeDecoder) -> Result<String> {
    let message = message.trim();
    if message.is_empty() {
        return Err(PantryError::InvalidMessage(
            "message cannot be blank".to_string(),
        ));
    }

    let mut tokens = message.split_whitespace();
    if tokens.next() != Some(GET_FOOD_BY_BARCODE) {
        return Ok(message.to_string());
    }
    if message
        .split_whitespace()
        .any(|t| t.starts_with(BARCODE_PREFIX))
    {
        return Ok(message.to_string());
    }

    let image_path = message
        .find(IMAGE_PREFIX)
        .map(|start| message[start + IMAGE_PREFIX.len()..].trim())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            PantryError::InvalidMessage("image path and code are missing".to_string())
        })?;

    let barcode = decoder.decode(Path::new(image_path)).await?;
    Ok(format!("{GET_FOOD_BY_BARCODE} {BARCODE_PREFIX}{barcode}"))
}

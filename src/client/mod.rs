//! Client library for connecting to pantryd.
//!
//! Provides [`ServiceClient`], which speaks the line protocol to a running
//! server, and [`prepare_message`], which turns image-based barcode requests
//! into code-based ones before they are sent.

mod barcode;
mod service_client;

pub use barcode::{
    BarcodeDecoder, DEFAULT_ZBAR_PROGRAM, IMAGE_PREFIX, ZbarDecoder, prepare_message,
};
pub use service_client::ServiceClient;

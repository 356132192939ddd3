//! Remote food data providers.
//!
//! The [`FoodDataProvider`] trait is the seam between the retriever and the
//! network; [`FdcClient`] is the production implementation.

pub mod fdc;
pub mod traits;

pub use fdc::FdcClient;
pub use traits::{FoodDataProvider, RawResponse};

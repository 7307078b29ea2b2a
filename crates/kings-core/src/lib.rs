#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Kings core: protocol constants, chain parameters and the read-only block
//! snapshot types shared by the consensus rules.
//!
//! Nothing in this crate touches the block index itself. The chain is only
//! seen through the [`ChainView`] trait, which the embedding node implements.

pub mod chain;
pub mod compact;
pub mod constants;
pub mod params;
pub mod types;

pub use chain::*;
pub use compact::*;
pub use constants::*;
pub use params::*;
pub use types::*;

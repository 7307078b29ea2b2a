#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Kings consensus rules for difficulty and proof of work.
//!
//! This crate is responsible for:
//! - compact difficulty target encoding/decoding (Bitcoin-style `bits`)
//! - retargeting (Dark Gravity Wave v3, exponential PoS retarget,
//!   Terminal-Velocity-RateX) and the height-based choice between them
//! - proof-of-work validation against the target
//! - per-block and cumulative chain work
//!
//! It does **not** maintain the block index, hash headers, or handle
//! reorganizations. Ancestry is read through [`kings_core::ChainView`].

pub mod ancestry;
pub mod compact;
pub mod difficulty;
pub mod error;
pub mod events;
pub mod pow;
pub mod validate;
pub mod work;

pub use ancestry::*;
pub use compact::*;
pub use difficulty::*;
pub use error::*;
pub use events::*;
pub use pow::*;
pub use validate::*;
pub use work::*;

//! Plan share links
//!
//! A plan is made reconstructible from a URL alone: [`encode`] turns a
//! response into an opaque URL-safe string, [`decode`] reverses it and lifts
//! legacy payloads to the current protocol version. Nothing is stored on a
//! server.

mod codec;
mod error;
mod link;
mod upgrade;

pub use codec::{decode, encode, try_decode};
pub use error::ShareError;
pub use link::{DATA_PARAM, extract_data_param, share_url};
pub use upgrade::{LEGACY_RATIONALE, upgrade_v2};

//! Resolution of free-form channel handles into canonical channel ids.
//!
//! Inputs arrive as handles (`@SomeCreator`), bare names, or pasted channel
//! URLs. Resolution normalizes the input, fetches the channel page, and runs
//! a prioritized list of extraction strategies against the HTML. Batches run
//! through a bounded worker pool where one dead handle never sinks the rest.

mod client;
mod error;
mod normalize;
mod patterns;

pub use client::{BatchResolution, ResolvedChannel, ResolverClient};
pub use error::ResolverError;
pub use normalize::{is_channel_id, normalize, NormalizedInput};
pub use patterns::extract_channel_id;

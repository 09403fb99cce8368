//! Entity authoring and reading.
//!
//! # Data Flow
//! ```text
//! document + content type → payload.rs (canonical bytes)
//! retention period        → expiration.rs (absolute instant)
//! attributes              → types.rs (validation, order kept)
//!     → writer.rs (WriteRequest, signed by the account, submitted once)
//!     → reader.rs (fetch by key, expired entities are not found)
//! ```

pub mod expiration;
mod finite;
pub mod payload;
pub mod reader;
pub mod types;
pub mod writer;

pub use expiration::{from_duration, ExpiresIn, TimeUnit};
pub use payload::{ContentType, Payload};
pub use reader::EntityReader;
pub use types::{Attribute, Entity};
pub use writer::EntityWriter;

//! Field value dispatch and emission
//!
//! Dispatch decomposes an arbitrarily shaped input value into typed,
//! storage-flagged emissions destined for the index engine, fanning values
//! out to copy destinations along the way.

pub mod codec;
pub mod emission;
pub mod instance;
pub mod mapper;

pub use emission::{DocumentBuilder, EmissionConsumer, EmissionKind, FieldEmission};
pub use instance::FieldInstance;
pub use mapper::RecordMapper;

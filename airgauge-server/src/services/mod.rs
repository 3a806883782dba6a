pub mod ack;
pub mod broker;
pub mod liveness;
pub mod metrics;
pub mod router;

#[cfg(test)]
mod testing;

pub use ack::*;
pub use broker::*;
pub use liveness::*;
pub use metrics::*;
pub use router::*;

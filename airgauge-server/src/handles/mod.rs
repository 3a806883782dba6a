pub mod health_handle;
pub mod metrics_handle;

pub use health_handle::*;
pub use metrics_handle::*;

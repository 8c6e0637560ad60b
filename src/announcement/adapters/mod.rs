//! Adapter implementations for announcement ports.

pub mod dispatch;
pub mod function;
pub mod memory;

pub use dispatch::{DispatchMode, DispatchReport, ListenerDispatcher};
pub use function::{FnListener, FnSignalHandler};
pub use memory::RecordingListener;

//! Vidyo bridge core.
//!
//! Command gateway and event relay between a web application shell and the
//! VidyoClient conferencing SDK. The SDK itself, the host view system and the
//! web shell are abstracted as traits; this crate owns session lifecycle,
//! call-state bookkeeping and callback normalization only.

pub mod connector;
pub mod errors;
pub mod events;
pub mod options;
pub mod session;

mod relay;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use connector::{Connector, ConnectorEvent, ConnectorMode, ConnectorState, VideoSdk, ViewRect};
pub use errors::BridgeError;
pub use events::{BridgeEvent, BridgeEventListener, EventEmitter, ListenerId};
pub use options::ConnectOptions;
pub use session::{CallState, Device, SessionManager};

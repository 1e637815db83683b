use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

/// Pixel rectangle of the native render surface, relative to the host view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// SDK operating mode, switched on app-lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorMode {
    Foreground,
    Background,
}

/// Connector state as reported by the SDK's state query.
///
/// Anything other than `Idle`/`Ready` counts as an active call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorState {
    Idle,
    Ready,
    Connecting,
    Connected,
    Disconnecting,
}

impl ConnectorState {
    pub fn is_in_call(self) -> bool {
        !matches!(self, ConnectorState::Idle | ConnectorState::Ready)
    }
}

/// Callbacks the SDK delivers for one connector instance.
///
/// Delivered at least once, in invocation order, on an unspecified SDK
/// thread; consumers must marshal onto their own serialized context before
/// touching shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorEvent {
    ConnectSuccess,
    ConnectFailure { reason: String },
    Disconnected { reason: String },
    ParticipantJoined { name: String },
    ParticipantLeft { name: String },
    DynamicParticipantsChanged { count: usize },
    LoudestParticipantChanged { name: String },
    Log { message: String },
}

/// One live SDK connector instance.
///
/// Boolean returns mirror the SDK's synchronous accept/reject: `true` only
/// means the request was accepted for processing, the outcome arrives later
/// as a [`ConnectorEvent`].
pub trait Connector: Send + Sync {
    fn connect(&self, portal: &str, display_name: &str, room_key: &str, room_pin: &str) -> bool;
    fn disconnect(&self) -> bool;

    fn set_camera_privacy(&self, privacy: bool);
    fn set_microphone_privacy(&self, privacy: bool);
    fn cycle_camera(&self);

    /// Select the default camera, microphone and speaker.
    fn select_default_devices(&self);
    /// Deselect all devices, freeing the hardware for other apps.
    fn release_devices(&self);

    fn set_mode(&self, mode: ConnectorMode);

    fn show_view_at(&self, rect: ViewRect);
    fn hide_view(&self);

    fn state(&self) -> ConnectorState;

    fn register_log_listener(&self, filter: &str);
    fn unregister_log_listener(&self);
    fn unregister_participant_events(&self);

    /// Ask the SDK to report the local participant in join/leave callbacks.
    fn report_local_participant(&self, on_joined: bool);

    /// Disable the connector; no calls are valid afterwards.
    fn disable(&self);
}

/// Entry point into the vendor SDK.
pub trait VideoSdk: Send + Sync {
    /// One-time runtime initialization. Returns whether the SDK came up.
    fn initialize(&self) -> bool;

    /// Create a connector bound to a render surface.
    ///
    /// Creating a connector subscribes exactly once to its callbacks; the
    /// returned receiver yields them until the connector is disabled.
    fn create_connector(
        &self,
        rect: ViewRect,
        max_participants: u32,
        log_filter: &str,
    ) -> (Arc<dyn Connector>, UnboundedReceiver<ConnectorEvent>);
}

//! Web-facing command surface for the Vidyo bridge.
//!
//! Parses JSON command arguments from the web shell, dispatches them into
//! [`vidyo_core`], and pushes normalized bridge events back to the shell as
//! structured payloads on a single named event channel.

use std::sync::{Arc, Mutex as StdMutex};

use serde::{Deserialize, Serialize};

use vidyo_core::{
    BridgeError, BridgeEvent, BridgeEventListener, ConnectOptions, Device, ListenerId,
    SessionManager, VideoSdk, ViewRect,
};

/// The single event channel the web shell subscribes to.
pub const EVENT_CHANNEL: &str = "VidyoEventCallback";

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

// ── Wire payloads ────────────────────────────────────────────────────

/// Event payload as delivered to the web layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventPayload {
    Init { status: bool },
    Connected,
    Disconnected { reason: String },
    Failed { reason: String },
    Participant { action: ParticipantAction, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantAction {
    Joined,
    Left,
}

impl From<BridgeEvent> for EventPayload {
    fn from(event: BridgeEvent) -> Self {
        match event {
            BridgeEvent::Initialized { status } => Self::Init { status },
            BridgeEvent::Connected => Self::Connected,
            BridgeEvent::Disconnected { reason } => Self::Disconnected { reason },
            BridgeEvent::Failed { reason } => Self::Failed { reason },
            BridgeEvent::ParticipantJoined { name } => Self::Participant {
                action: ParticipantAction::Joined,
                name,
            },
            BridgeEvent::ParticipantLeft { name } => Self::Participant {
                action: ParticipantAction::Left,
                name,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PrivacyArgs {
    device: Device,
    #[serde(default)]
    privacy: bool,
}

// ── Host collaborator interfaces ─────────────────────────────────────

/// Capability to push an event payload to the web layer.
///
/// Non-owning: the plugin revokes its use of the sink on teardown, it never
/// manages the sink's lifetime.
pub trait PluginEventSink: Send + Sync {
    fn notify(&self, channel: &str, payload: serde_json::Value);
}

/// The host's view hierarchy, which places the native render surface
/// beneath the web view.
pub trait ViewHost: Send + Sync {
    /// Insert the render surface and report its pixel rectangle.
    fn attach(&self) -> ViewRect;
    /// Remove the render surface.
    fn detach(&self);
    /// Current surface rectangle, recomputed on orientation changes.
    fn bounds(&self) -> ViewRect;
}

// ── Event forwarding ─────────────────────────────────────────────────

struct SinkForwarder {
    sink: Arc<dyn PluginEventSink>,
}

impl BridgeEventListener for SinkForwarder {
    fn on_event(&self, event: BridgeEvent) {
        let payload = EventPayload::from(event);
        match serde_json::to_value(&payload) {
            Ok(value) => self.sink.notify(EVENT_CHANNEL, value),
            Err(e) => tracing::error!("failed to serialize bridge event: {e}"),
        }
    }
}

// ── Plugin object ────────────────────────────────────────────────────

/// Command entry points exposed to the web shell, one per plugin method.
pub struct VidyoPlugin {
    manager: SessionManager,
    host: Arc<dyn ViewHost>,
    sink: Arc<dyn PluginEventSink>,
    forwarder: StdMutex<Option<ListenerId>>,
}

impl VidyoPlugin {
    pub fn new(
        sdk: Arc<dyn VideoSdk>,
        host: Arc<dyn ViewHost>,
        sink: Arc<dyn PluginEventSink>,
    ) -> Self {
        Self {
            manager: SessionManager::new(sdk),
            host,
            sink,
            forwarder: StdMutex::new(None),
        }
    }

    /// `openConference`: attach the render surface and open a session.
    pub async fn open_conference(&self, args: serde_json::Value) -> Result<(), PluginError> {
        let options: ConnectOptions =
            serde_json::from_value(args).map_err(|e| PluginError::InvalidArgs(e.to_string()))?;

        // Reject before touching the view hierarchy, so a double open never
        // disturbs the live session's render surface.
        if self.manager.is_open().await {
            return Err(BridgeError::SessionOpen.into());
        }

        {
            let mut forwarder = self.forwarder.lock().unwrap();
            if forwarder.is_none() {
                *forwarder = Some(self.manager.add_listener(Arc::new(SinkForwarder {
                    sink: self.sink.clone(),
                })));
            }
        }

        let rect = self.host.attach();
        match self.manager.open(options, rect).await {
            Ok(()) => {
                // Runtime init failure opens no session; take the surface
                // back out.
                if !self.manager.is_open().await {
                    self.host.detach();
                }
                Ok(())
            }
            Err(e) => {
                self.host.detach();
                Err(e.into())
            }
        }
    }

    /// `closeConference`: tear the session down, revoke the event
    /// registration and remove the render surface. Always succeeds.
    pub async fn close_conference(&self) {
        self.manager.close().await;
        if let Some(id) = self.forwarder.lock().unwrap().take() {
            self.manager.remove_listener(id);
        }
        self.host.detach();
    }

    /// `connect`: request a connection with the options stored at open time.
    pub async fn connect(&self) -> Result<(), PluginError> {
        self.manager.connect().await.map_err(PluginError::from)
    }

    /// `disconnect`: request a disconnect, also aborting a pending connect.
    pub async fn disconnect(&self) -> Result<(), PluginError> {
        self.manager.disconnect().await.map_err(PluginError::from)
    }

    /// `setPrivacy`: mute or unmute the camera or microphone.
    pub async fn set_privacy(&self, args: serde_json::Value) -> Result<(), PluginError> {
        let args: PrivacyArgs =
            serde_json::from_value(args).map_err(|e| PluginError::InvalidArgs(e.to_string()))?;
        self.manager
            .set_privacy(args.device, args.privacy)
            .await
            .map_err(PluginError::from)
    }

    /// `cycleCamera`: switch to the next camera device.
    pub async fn cycle_camera(&self) -> Result<(), PluginError> {
        self.manager.cycle_camera().await.map_err(PluginError::from)
    }

    // App-lifecycle signals, invoked by the host environment.

    pub async fn handle_foreground(&self) {
        self.manager.on_foreground().await;
    }

    pub async fn handle_background(&self) {
        self.manager.on_background().await;
    }

    /// Orientation or window-geometry change: re-read the host bounds and
    /// re-issue the render rectangle.
    pub async fn handle_orientation_change(&self) {
        self.manager.update_view(self.host.bounds()).await;
    }
}

// ── Logging ──────────────────────────────────────────────────────────

/// Initialize tracing. Call once from the host before using the plugin.
pub fn init_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "vidyo_core=debug,vidyo_plugin=debug".parse().unwrap()),
            )
            .with_ansi(false)
            .init();
    });
}

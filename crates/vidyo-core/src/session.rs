use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::connector::{Connector, ConnectorMode, VideoSdk, ViewRect};
use crate::errors::BridgeError;
use crate::events::{BridgeEvent, BridgeEventListener, EventEmitter, ListenerId};
use crate::options::ConnectOptions;
use crate::relay;

/// Mutable per-session snapshot of the flags the UI cares about.
///
/// Recreated for every session, never persisted. `connected` is additionally
/// written by the relay when connection outcomes arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallState {
    pub devices_selected: bool,
    pub camera_muted: bool,
    pub connected: bool,
}

impl Default for CallState {
    fn default() -> Self {
        Self {
            devices_selected: true,
            camera_muted: false,
            connected: false,
        }
    }
}

/// Device addressed by a privacy command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Camera,
    Microphone,
}

/// One open conference session: the connector handle plus everything scoped
/// to it. Constructed by `open`, consumed destructively by `close`.
struct Session {
    connector: Arc<dyn Connector>,
    options: ConnectOptions,
    call_state: Arc<Mutex<CallState>>,
    view_rect: ViewRect,
    relay: JoinHandle<()>,
}

/// The command gateway.
///
/// Translates web-layer commands into SDK calls and owns the single session
/// handle. At most one session exists at a time; every command except `open`
/// requires it. Commands and the relay serialize on the session mutex and
/// the call-state mutex respectively, so a command in flight never races an
/// SDK callback.
pub struct SessionManager {
    sdk: Arc<dyn VideoSdk>,
    session: Mutex<Option<Session>>,
    emitter: EventEmitter,
    sdk_initialized: Mutex<bool>,
}

impl SessionManager {
    pub fn new(sdk: Arc<dyn VideoSdk>) -> Self {
        Self {
            sdk,
            session: Mutex::new(None),
            emitter: EventEmitter::new(),
            sdk_initialized: Mutex::new(false),
        }
    }

    /// Register a listener for bridge events.
    pub fn add_listener(&self, listener: Arc<dyn BridgeEventListener>) -> ListenerId {
        self.emitter.add_listener(listener)
    }

    /// Revoke a previously registered listener.
    pub fn remove_listener(&self, id: ListenerId) {
        self.emitter.remove_listener(id)
    }

    /// Open a session bound to the given render surface.
    ///
    /// Lazily initializes the SDK runtime on first use; an init failure is
    /// reported through `Initialized { status: false }` rather than an error,
    /// and no session is created. Emits exactly one `Initialized` event,
    /// always before any connection outcome of this session.
    pub async fn open(&self, options: ConnectOptions, rect: ViewRect) -> Result<(), BridgeError> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Err(BridgeError::SessionOpen);
        }

        {
            let mut initialized = self.sdk_initialized.lock().await;
            if !*initialized {
                *initialized = self.sdk.initialize();
            }
            if !*initialized {
                tracing::error!("conferencing runtime failed to initialize");
                self.emitter.emit(BridgeEvent::Initialized { status: false });
                return Ok(());
            }
        }

        tracing::info!(
            "opening session for {}:{} ({} participants max)",
            options.portal,
            options.room_key,
            options.max_participants
        );

        let (connector, events) =
            self.sdk
                .create_connector(rect, options.max_participants, &options.log_level);

        if options.debug {
            connector.register_log_listener(&options.log_level);
        }
        connector.report_local_participant(true);
        connector.show_view_at(rect);

        let call_state = Arc::new(Mutex::new(CallState::default()));
        let relay = tokio::spawn(relay::run(
            events,
            self.emitter.clone(),
            call_state.clone(),
        ));

        *session = Some(Session {
            connector,
            options,
            call_state,
            view_rect: rect,
            relay,
        });

        self.emitter.emit(BridgeEvent::Initialized { status: true });
        Ok(())
    }

    /// Request a connection to the room from the stored options.
    ///
    /// Fire and forget: `Ok` means the request was accepted, the outcome
    /// arrives later as a `Connected`/`Failed` event.
    pub async fn connect(&self) -> Result<(), BridgeError> {
        let session = self.session.lock().await;
        let session = session.as_ref().ok_or(BridgeError::NoActiveSession)?;
        let opts = &session.options;

        tracing::info!("connecting to {}:{} as '{}'", opts.portal, opts.room_key, opts.name);

        if session
            .connector
            .connect(&opts.portal, &opts.name, &opts.room_key, &opts.pin)
        {
            Ok(())
        } else {
            Err(BridgeError::ConnectionRejected(
                "connect refused by the conferencing runtime".to_string(),
            ))
        }
    }

    /// Request a disconnect. Accepted whether or not a connect is still
    /// pending; this is also the only way to abort a pending connect.
    pub async fn disconnect(&self) -> Result<(), BridgeError> {
        let session = self.session.lock().await;
        let session = session.as_ref().ok_or(BridgeError::NoActiveSession)?;

        if session.connector.disconnect() {
            Ok(())
        } else {
            Err(BridgeError::ConnectionRejected(
                "disconnect refused by the conferencing runtime".to_string(),
            ))
        }
    }

    /// Mute or unmute a device. Camera mute is cached so it survives
    /// background/foreground transitions.
    pub async fn set_privacy(&self, device: Device, privacy: bool) -> Result<(), BridgeError> {
        let session = self.session.lock().await;
        let session = session.as_ref().ok_or(BridgeError::NoActiveSession)?;

        match device {
            Device::Camera => {
                session.connector.set_camera_privacy(privacy);
                session.call_state.lock().await.camera_muted = privacy;
            }
            Device::Microphone => session.connector.set_microphone_privacy(privacy),
        }
        Ok(())
    }

    /// Switch to the next camera device.
    pub async fn cycle_camera(&self) -> Result<(), BridgeError> {
        let session = self.session.lock().await;
        let session = session.as_ref().ok_or(BridgeError::NoActiveSession)?;
        session.connector.cycle_camera();
        Ok(())
    }

    /// Tear the session down. Idempotent; a close with no session is a no-op.
    pub async fn close(&self) {
        let session = self.session.lock().await.take();
        let Some(session) = session else { return };

        let connector = &session.connector;
        connector.release_devices();
        if session.options.debug {
            connector.unregister_log_listener();
        }
        connector.unregister_participant_events();
        connector.hide_view();
        connector.disable();

        session.relay.abort();
        tracing::info!("session closed");
    }

    /// App returned to the foreground: reselect devices if the background
    /// transition released them, then reapply the cached camera mute.
    pub async fn on_foreground(&self) {
        let session = self.session.lock().await;
        let Some(session) = session.as_ref() else { return };

        let mut state = session.call_state.lock().await;
        if !state.devices_selected {
            state.devices_selected = true;
            session.connector.select_default_devices();
        }

        session.connector.set_mode(ConnectorMode::Foreground);
        session.connector.set_camera_privacy(state.camera_muted);
    }

    /// App moved to the background. In an active call the camera is muted
    /// instead of released, so video resumes without renegotiating devices;
    /// outside a call the devices are released to free the hardware.
    pub async fn on_background(&self) {
        let session = self.session.lock().await;
        let Some(session) = session.as_ref() else { return };

        if session.connector.state().is_in_call() {
            session.connector.set_camera_privacy(true);
        } else {
            session.call_state.lock().await.devices_selected = false;
            session.connector.release_devices();
        }

        session.connector.set_mode(ConnectorMode::Background);
    }

    /// The host view geometry changed (orientation, resize): re-issue the
    /// render rectangle. May run concurrently with a connect/disconnect in
    /// flight.
    pub async fn update_view(&self, rect: ViewRect) {
        let mut session = self.session.lock().await;
        let Some(session) = session.as_mut() else { return };

        tracing::debug!(
            "render surface now {}x{} at ({}, {})",
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
        session.view_rect = rect;
        session.connector.show_view_at(rect);
    }

    pub async fn is_open(&self) -> bool {
        self.session.lock().await.is_some()
    }

    pub async fn is_connected(&self) -> bool {
        match self.session.lock().await.as_ref() {
            Some(session) => session.call_state.lock().await.connected,
            None => false,
        }
    }

    /// Snapshot of the current call state, if a session is open.
    pub async fn call_state(&self) -> Option<CallState> {
        match self.session.lock().await.as_ref() {
            Some(session) => Some(*session.call_state.lock().await),
            None => None,
        }
    }

    /// Current render rectangle, if a session is open.
    pub async fn view_rect(&self) -> Option<ViewRect> {
        self.session.lock().await.as_ref().map(|s| s.view_rect)
    }
}

//! Test double for the vendor SDK.
//!
//! Records every connector call and lets tests simulate SDK callbacks
//! through [`MockHandle::emit`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::connector::{
    Connector, ConnectorEvent, ConnectorMode, ConnectorState, VideoSdk, ViewRect,
};

/// One recorded call against a [`MockConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Connect {
        portal: String,
        display_name: String,
        room_key: String,
        room_pin: String,
    },
    Disconnect,
    SetCameraPrivacy(bool),
    SetMicrophonePrivacy(bool),
    CycleCamera,
    SelectDefaultDevices,
    ReleaseDevices,
    SetMode(ConnectorMode),
    ShowViewAt(ViewRect),
    HideView,
    RegisterLogListener(String),
    UnregisterLogListener,
    UnregisterParticipantEvents,
    ReportLocalParticipant(bool),
    Disable,
}

pub struct MockConnector {
    calls: Arc<Mutex<Vec<MockCall>>>,
    state: Arc<Mutex<ConnectorState>>,
    accept_connect: bool,
    accept_disconnect: bool,
}

impl MockConnector {
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Connector for MockConnector {
    fn connect(&self, portal: &str, display_name: &str, room_key: &str, room_pin: &str) -> bool {
        self.record(MockCall::Connect {
            portal: portal.to_string(),
            display_name: display_name.to_string(),
            room_key: room_key.to_string(),
            room_pin: room_pin.to_string(),
        });
        self.accept_connect
    }

    fn disconnect(&self) -> bool {
        self.record(MockCall::Disconnect);
        self.accept_disconnect
    }

    fn set_camera_privacy(&self, privacy: bool) {
        self.record(MockCall::SetCameraPrivacy(privacy));
    }

    fn set_microphone_privacy(&self, privacy: bool) {
        self.record(MockCall::SetMicrophonePrivacy(privacy));
    }

    fn cycle_camera(&self) {
        self.record(MockCall::CycleCamera);
    }

    fn select_default_devices(&self) {
        self.record(MockCall::SelectDefaultDevices);
    }

    fn release_devices(&self) {
        self.record(MockCall::ReleaseDevices);
    }

    fn set_mode(&self, mode: ConnectorMode) {
        self.record(MockCall::SetMode(mode));
    }

    fn show_view_at(&self, rect: ViewRect) {
        self.record(MockCall::ShowViewAt(rect));
    }

    fn hide_view(&self) {
        self.record(MockCall::HideView);
    }

    fn state(&self) -> ConnectorState {
        *self.state.lock().unwrap()
    }

    fn register_log_listener(&self, filter: &str) {
        self.record(MockCall::RegisterLogListener(filter.to_string()));
    }

    fn unregister_log_listener(&self) {
        self.record(MockCall::UnregisterLogListener);
    }

    fn unregister_participant_events(&self) {
        self.record(MockCall::UnregisterParticipantEvents);
    }

    fn report_local_participant(&self, on_joined: bool) {
        self.record(MockCall::ReportLocalParticipant(on_joined));
    }

    fn disable(&self) {
        self.record(MockCall::Disable);
    }
}

/// Test-side handle to the most recently created connector.
#[derive(Clone)]
pub struct MockHandle {
    calls: Arc<Mutex<Vec<MockCall>>>,
    state: Arc<Mutex<ConnectorState>>,
    events: UnboundedSender<ConnectorEvent>,
}

impl MockHandle {
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_state(&self, state: ConnectorState) {
        *self.state.lock().unwrap() = state;
    }

    /// Simulate an SDK callback.
    pub fn emit(&self, event: ConnectorEvent) {
        let _ = self.events.send(event);
    }
}

pub struct MockSdk {
    initialize_result: bool,
    accept_connect: bool,
    accept_disconnect: bool,
    initialize_calls: AtomicUsize,
    created: Mutex<Vec<MockHandle>>,
}

impl MockSdk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            initialize_result: true,
            accept_connect: true,
            accept_disconnect: true,
            initialize_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
        })
    }

    /// SDK whose runtime fails to come up.
    pub fn with_init_failure() -> Arc<Self> {
        Arc::new(Self {
            initialize_result: false,
            accept_connect: true,
            accept_disconnect: true,
            initialize_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
        })
    }

    /// SDK that rejects connect/disconnect requests synchronously.
    pub fn refusing_requests() -> Arc<Self> {
        Arc::new(Self {
            initialize_result: true,
            accept_connect: false,
            accept_disconnect: false,
            initialize_calls: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    pub fn connectors_created(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    /// Handle to the most recently created connector. Panics if none exists.
    pub fn handle(&self) -> MockHandle {
        self.created
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no connector created yet")
    }
}

impl VideoSdk for MockSdk {
    fn initialize(&self) -> bool {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        self.initialize_result
    }

    fn create_connector(
        &self,
        _rect: ViewRect,
        _max_participants: u32,
        _log_filter: &str,
    ) -> (Arc<dyn Connector>, UnboundedReceiver<ConnectorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(Mutex::new(ConnectorState::Idle));

        let connector = Arc::new(MockConnector {
            calls: calls.clone(),
            state: state.clone(),
            accept_connect: self.accept_connect,
            accept_disconnect: self.accept_disconnect,
        });

        self.created.lock().unwrap().push(MockHandle {
            calls,
            state,
            events: tx,
        });

        (connector, rx)
    }
}

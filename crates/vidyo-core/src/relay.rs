use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::connector::ConnectorEvent;
use crate::events::{BridgeEvent, EventEmitter};
use crate::session::CallState;

/// Relays SDK callbacks to the web layer as normalized bridge events.
///
/// Runs as one task per session and is the only place besides the gateway
/// that touches call state; both serialize on the same mutex, so a command
/// in flight and a callback cannot race on the `connected` flag. Events are
/// forwarded in the order the SDK delivered them.
pub(crate) async fn run(
    mut events: UnboundedReceiver<ConnectorEvent>,
    emitter: EventEmitter,
    call_state: Arc<Mutex<CallState>>,
) {
    while let Some(event) = events.recv().await {
        match event {
            ConnectorEvent::ConnectSuccess => {
                tracing::info!("connection established");
                call_state.lock().await.connected = true;
                emitter.emit(BridgeEvent::Connected);
            }

            ConnectorEvent::ConnectFailure { reason } => {
                tracing::warn!("connection failed: {reason}");
                call_state.lock().await.connected = false;
                emitter.emit(BridgeEvent::Failed { reason });
            }

            ConnectorEvent::Disconnected { reason } => {
                tracing::info!("disconnected: {reason}");
                call_state.lock().await.connected = false;
                emitter.emit(BridgeEvent::Disconnected { reason });
            }

            ConnectorEvent::ParticipantJoined { name } => {
                emitter.emit(BridgeEvent::ParticipantJoined { name });
            }

            ConnectorEvent::ParticipantLeft { name } => {
                emitter.emit(BridgeEvent::ParticipantLeft { name });
            }

            // Roster and loudest-speaker churn is not part of the web
            // contract; dropped here.
            ConnectorEvent::DynamicParticipantsChanged { count } => {
                tracing::debug!("dynamic participant list changed: {count} participants");
            }
            ConnectorEvent::LoudestParticipantChanged { name } => {
                tracing::debug!("loudest participant changed: {name}");
            }

            // Log records are registered for host-side debug capture only.
            ConnectorEvent::Log { message } => {
                tracing::debug!(target: "vidyo_sdk", "{message}");
            }
        }
    }

    tracing::debug!("connector event relay ended");
}

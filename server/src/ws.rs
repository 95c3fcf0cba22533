//! WebSocket-Anbindung – Verdrahtet eine Verbindung mit dem Switchboard
//!
//! Pro Verbindung laeuft ein Task: eingehende Text-Frames gehen direkt an
//! die Peer-Session, ein Schreiber-Task pumpt die Send-Queue zurueck auf
//! den Socket. Beim Verbindungsende wird die Session synchron abgebaut,
//! bevor der Task endet – Raeume behalten nie ein totes Mitglied.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use switchboard_relay::Switchboard;

/// Verarbeitet eine aufgewertete WebSocket-Verbindung bis zu ihrem Ende
pub(crate) async fn verbindung_verarbeiten(socket: WebSocket, board: Switchboard) {
    let (peer, mut ausgang) = board.verbinden();
    let session_id = peer.session_id();
    let (mut schreiber, mut leser) = socket.split();

    // Schreiber-Task: Send-Queue -> Socket. Endet von selbst sobald die
    // Session aus dem Versand entfernt ist und die Queue leerlaeuft.
    let schreib_task = tokio::spawn(async move {
        while let Some(frame) = ausgang.recv().await {
            if let Err(e) = schreiber.send(Message::Text(frame)).await {
                tracing::debug!(session_id = %session_id, fehler = %e, "Senden fehlgeschlagen");
                break;
            }
        }
    });

    // Lese-Schleife: ein Frame nach dem anderen, jede Verarbeitung laeuft
    // vollstaendig durch bevor der naechste Frame gelesen wird
    while let Some(nachricht) = leser.next().await {
        match nachricht {
            Ok(Message::Text(text)) => peer.verarbeiten(&text),
            Ok(Message::Binary(_)) => {
                // Textprotokoll; binaere Frames werden ignoriert
                tracing::debug!(session_id = %session_id, "Binaerframe ignoriert");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Pings beantwortet die WebSocket-Schicht selbst
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(session_id = %session_id, "Close-Frame empfangen");
                break;
            }
            Err(e) => {
                tracing::debug!(session_id = %session_id, fehler = %e, "WebSocket-Lesefehler");
                break;
            }
        }
    }

    // Synchroner Abbau: Leave-Uebergang und Abmeldung aus dem Versand,
    // erst danach darf der Task enden
    peer.trennen();
    schreib_task.abort();
}

//! Frame-Versand – Send-Queues aller verbundenen Sessions
//!
//! Haelt pro Session eine begrenzte Send-Queue. Die Zustellung ist
//! nicht-blockierend: eine volle oder geschlossene Queue verwirft den
//! Frame still, ein langsamer Empfaenger bremst das Routing nie aus.

use dashmap::DashMap;
use switchboard_core::SessionId;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Groesse der Send-Queue pro Session
const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// PeerSink
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer verbundenen Session
#[derive(Clone, Debug)]
pub(crate) struct PeerSink {
    pub session_id: SessionId,
    pub tx: mpsc::Sender<String>,
}

impl PeerSink {
    /// Reiht einen Frame nicht-blockierend ein
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, frame: String) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(session_id = %self.session_id, "Send-Queue voll – Frame verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(session_id = %self.session_id, "Send-Queue geschlossen (Client getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FrameVersand
// ---------------------------------------------------------------------------

/// Zentrale Send-Queue-Verwaltung fuer alle Sessions
///
/// Die Raum-Logik entscheidet wer beliefert wird, der Versand nur wie.
/// Thread-safe via DashMap; liegt bewusst ausserhalb des Registry-Schlosses.
#[derive(Debug, Default)]
pub(crate) struct FrameVersand {
    sinks: DashMap<SessionId, PeerSink>,
}

impl FrameVersand {
    /// Erstellt einen leeren Versand
    pub fn neu() -> Self {
        Self {
            sinks: DashMap::new(),
        }
    }

    /// Registriert eine Session und gibt ihre Empfangs-Queue zurueck
    ///
    /// Die Transportanbindung liest aus dieser Queue und schreibt auf den
    /// Socket.
    pub fn registrieren(&self, session_id: SessionId) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        self.sinks.insert(session_id, PeerSink { session_id, tx });
        tracing::debug!(session_id = %session_id, "Session im Versand registriert");
        rx
    }

    /// Entfernt eine Session aus dem Versand
    pub fn entfernen(&self, session_id: &SessionId) {
        self.sinks.remove(session_id);
        tracing::debug!(session_id = %session_id, "Session aus Versand entfernt");
    }

    /// Stellt einen Frame an eine einzelne Session zu
    ///
    /// Gibt `true` zurueck wenn die Session gefunden und der Frame
    /// eingereiht wurde.
    pub fn an_session_senden(&self, session_id: &SessionId, frame: &str) -> bool {
        match self.sinks.get(session_id) {
            Some(sink) => sink.senden(frame.to_string()),
            None => {
                tracing::debug!(session_id = %session_id, "Zustellung an unbekannte Session");
                false
            }
        }
    }

    /// Anzahl registrierter Sessions
    pub fn anzahl(&self) -> usize {
        self.sinks.len()
    }

    /// Prueft ob eine Session registriert ist
    pub fn ist_registriert(&self, session_id: &SessionId) -> bool {
        self.sinks.contains_key(session_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

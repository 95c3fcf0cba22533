//! Switchboard – Prozessweiter Koordinator
//!
//! Das Switchboard besitzt das Raum-Register, verdrahtet Sessions mit dem
//! Router und meldet Lebenszyklus-Ereignisse an Beobachter. Netzwerk macht
//! es selbst keines.
//!
//! ## Nebenlaeufigkeit
//! Ein einziges Mutex schuetzt Raeume und Session-Zustand zusammen: jede
//! Frame-Verarbeitung laeuft als ein Schritt durch, die Invarianten
//! (hoechstens ein Raum pro Peer, keine leeren Raeume) koennen zwischen
//! zwei Frames nicht verletzt sein. Die Send-Queues liegen ausserhalb des
//! Schlosses; Zustellung ist nicht-blockierend und darf deshalb unter
//! gehaltenem Schloss passieren.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use switchboard_core::{SessionId, SwitchboardEvent};

use crate::peer::{Peer, PeerZustand};
use crate::raum::{RaumRegister, RaumUebersicht};
use crate::router;
use crate::versand::FrameVersand;

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Groesse des Broadcast-Kanals fuer Lebenszyklus-Ereignisse
const EVENT_KANAL_GROESSE: usize = 256;

// ---------------------------------------------------------------------------
// BoardZustand
// ---------------------------------------------------------------------------

/// Gesamter veraenderlicher Zustand hinter dem einen Schloss
#[derive(Default)]
pub(crate) struct BoardZustand {
    pub register: RaumRegister,
    pub peers: HashMap<SessionId, PeerZustand>,
}

// ---------------------------------------------------------------------------
// Switchboard
// ---------------------------------------------------------------------------

/// Prozessweiter Koordinator fuer Raeume, Sessions und Routing
///
/// Thread-safe via Arc; Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct Switchboard {
    inner: Arc<SwitchboardInner>,
}

pub(crate) struct SwitchboardInner {
    /// Raeume und Session-Zustand, als Einheit verriegelt
    pub zustand: Mutex<BoardZustand>,
    /// Send-Queues aller Sessions
    pub versand: FrameVersand,
    /// Broadcast-Sender fuer Lebenszyklus-Ereignisse
    pub event_tx: broadcast::Sender<SwitchboardEvent>,
}

impl SwitchboardInner {
    /// Meldet ein Ereignis an alle Beobachter; ohne Beobachter verpufft es
    pub fn ereignis(&self, event: SwitchboardEvent) {
        let _ = self.event_tx.send(event);
    }
}

impl Switchboard {
    /// Erstellt ein neues, leeres Switchboard
    pub fn neu() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_KANAL_GROESSE);
        Self {
            inner: Arc::new(SwitchboardInner {
                zustand: Mutex::new(BoardZustand::default()),
                versand: FrameVersand::neu(),
                event_tx,
            }),
        }
    }

    /// Nimmt eine neue Transportverbindung an
    ///
    /// Gibt das Peer-Handle und die Empfangs-Queue zurueck. Die
    /// Transportschicht pumpt eingehende Frames in `Peer::verarbeiten`
    /// und schreibt die Queue auf den Socket.
    pub fn verbinden(&self) -> (Peer, mpsc::Receiver<String>) {
        let session_id = SessionId::new();
        let rx = self.inner.versand.registrieren(session_id);
        self.inner
            .zustand
            .lock()
            .peers
            .insert(session_id, PeerZustand::default());

        tracing::info!(session_id = %session_id, "Peer verbunden");
        self.inner
            .ereignis(SwitchboardEvent::PeerVerbunden { session_id });

        (Peer::neu(session_id, self.clone()), rx)
    }

    /// Entfernt alle Raeume auf einen Schlag (z.B. Test-Teardown)
    ///
    /// Bewusst ohne Einzel-Ereignisse. Bestehende Sessions bleiben
    /// verbunden und verlieren nur ihre Raum-Mitgliedschaft.
    pub fn zerstoeren(&self) {
        let mut zustand = self.inner.zustand.lock();
        zustand.register.leeren();
        for peer in zustand.peers.values_mut() {
            peer.raum = None;
        }
        tracing::info!("Alle Raeume entfernt");
    }

    /// Konsistente Momentaufnahme aller Raeume, Mitgliederzahl absteigend
    pub fn raum_uebersicht(&self) -> Vec<RaumUebersicht> {
        self.inner.zustand.lock().register.uebersicht()
    }

    /// Anzahl verbundener Sessions
    pub fn peer_anzahl(&self) -> usize {
        self.inner.zustand.lock().peers.len()
    }

    /// Anzahl aktiver Raeume
    pub fn raum_anzahl(&self) -> usize {
        self.inner.zustand.lock().register.anzahl()
    }

    /// Abonniert Lebenszyklus-Ereignisse
    pub fn events_abonnieren(&self) -> broadcast::Receiver<SwitchboardEvent> {
        self.inner.event_tx.subscribe()
    }

    // -----------------------------------------------------------------------
    // Interne Einstiege fuer das Peer-Handle
    // -----------------------------------------------------------------------

    pub(crate) fn frame_verarbeiten(&self, session_id: SessionId, roh: &str) {
        router::frame_verarbeiten(&self.inner, session_id, roh);
    }

    pub(crate) fn raum_verlassen(&self, session_id: SessionId) {
        let mut zustand = self.inner.zustand.lock();
        router::verlassen(&self.inner, &mut zustand, session_id);
    }

    pub(crate) fn session_trennen(&self, session_id: SessionId) {
        {
            let mut zustand = self.inner.zustand.lock();
            router::verlassen(&self.inner, &mut zustand, session_id);
            zustand.peers.remove(&session_id);
        }
        self.inner.versand.entfernen(&session_id);
        tracing::info!(session_id = %session_id, "Peer getrennt");
    }
}

impl Default for Switchboard {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

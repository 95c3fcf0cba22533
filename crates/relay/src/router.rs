//! Frame-Router – Wendet die Protokollsemantik auf den Registry-Zustand an
//!
//! Der Router ist die einzige Stelle die Raeume und Session-Zustand
//! veraendert. Jeder eingehende Frame laeuft vollstaendig unter dem einen
//! Schloss durch; zwei Frames koennen ihre Wirkung auf denselben Raum
//! deshalb nie verschraenken.
//!
//! ## Routing-Entscheidung
//! - `announce`: Kennung setzen, Raum wechseln (Leave zuerst), `roominfo`
//!   nur an den Beitretenden
//! - `leave`: Raum raeumen, leeren Raum zerstoeren
//! - `to`: roher Frame an genau ein Raummitglied
//! - unbekanntes Kommando: roher Frame an alle anderen Raummitglieder
//! - opake Daten: nur beobachtet, nie geroutet

use switchboard_core::{PeerId, SessionId, SwitchboardEvent};
use switchboard_protocol::{roominfo_frame, AnnounceDaten, Frame, Kommando};

use crate::board::{BoardZustand, SwitchboardInner};

// ---------------------------------------------------------------------------
// Einstieg
// ---------------------------------------------------------------------------

/// Verarbeitet einen rohen Frame einer Session
///
/// Meldet zuerst das Beobachtungs-Ereignis, dann faellt die
/// Routing-Entscheidung. Schlaegt nie fehl.
pub(crate) fn frame_verarbeiten(inner: &SwitchboardInner, session_id: SessionId, roh: &str) {
    let frame = Frame::parsen(roh);
    let mut zustand = inner.zustand.lock();

    let Some(peer) = zustand.peers.get(&session_id) else {
        tracing::debug!(session_id = %session_id, "Frame von unbekannter Session verworfen");
        return;
    };

    inner.ereignis(SwitchboardEvent::Daten {
        frame: roh.to_string(),
        peer_id: peer.kennung.clone(),
        session_id,
    });

    let Some(kommando) = Kommando::aus_frame(&frame) else {
        // Opake Daten werden nur beobachtet
        return;
    };

    match kommando {
        Kommando::Announce { daten } => announce(inner, &mut zustand, session_id, daten),
        Kommando::Leave => verlassen(inner, &mut zustand, session_id),
        Kommando::To { ziel } => zustellen(inner, &zustand, session_id, ziel, roh),
        Kommando::Unbekannt { name } => rundsenden(inner, &zustand, session_id, &name, roh),
    }
}

// ---------------------------------------------------------------------------
// Uebergaenge
// ---------------------------------------------------------------------------

/// Announce: Kennung anmelden und optional den Raum wechseln
fn announce(
    inner: &SwitchboardInner,
    zustand: &mut BoardZustand,
    session_id: SessionId,
    daten: Option<AnnounceDaten>,
) {
    let Some(daten) = daten else {
        tracing::warn!(session_id = %session_id, "Announce ohne brauchbares Payload ignoriert");
        return;
    };

    // Raumwechsel laeuft immer ueber den Leave, damit dessen Seiteneffekte
    // (Raum-Zerstoerung, Getrennt-Ereignis) nie uebersprungen werden
    let aktueller_raum = zustand
        .peers
        .get(&session_id)
        .and_then(|peer| peer.raum.clone());
    if let Some(alter) = aktueller_raum {
        if daten.room.as_deref() != Some(alter.as_str()) {
            verlassen(inner, zustand, session_id);
        }
    }

    // Kennung setzen, auch wenn kein Zielraum folgt
    if let Some(peer) = zustand.peers.get_mut(&session_id) {
        peer.kennung = Some(daten.id.clone());
    }

    let kennung = daten.id;
    let Some(raum_name) = daten.room else {
        tracing::debug!(session_id = %session_id, kennung = %kennung, "Announce ohne Raum – nur Kennung gesetzt");
        return;
    };

    let (raum, neu) = zustand.register.holen_oder_erstellen(&raum_name);
    if neu {
        inner.ereignis(SwitchboardEvent::RaumErstellt {
            name: raum_name.clone(),
        });
        tracing::info!(raum = %raum_name, "Raum erstellt");
    }

    // Mitglieder mit derselben Kennung fliegen raus: erneutes Announce
    // ersetzt den alten Eintrag statt ihn zu verdoppeln, eine fremde
    // Session mit gleicher Kennung wird verdraengt
    let verdraengt: Vec<SessionId> = raum
        .mitglieder
        .iter()
        .copied()
        .filter(|sid| zustand.peers.get(sid).and_then(|p| p.kennung.as_ref()) == Some(&kennung))
        .collect();
    raum.mitglieder.retain(|sid| !verdraengt.contains(sid));
    raum.mitglieder.push(session_id);
    let anzahl = raum.mitglieder_anzahl();

    for sid in verdraengt.iter().filter(|sid| **sid != session_id) {
        // Die Mitgliedschaft ist weg, die Rueckreferenz darf nicht haengen
        // bleiben
        if let Some(peer) = zustand.peers.get_mut(sid) {
            peer.raum = None;
        }
        tracing::debug!(
            session_id = %sid,
            kennung = %kennung,
            raum = %raum_name,
            "Mitglied mit gleicher Kennung verdraengt"
        );
    }

    if let Some(peer) = zustand.peers.get_mut(&session_id) {
        peer.raum = Some(raum_name.clone());
    }

    tracing::debug!(
        session_id = %session_id,
        kennung = %kennung,
        raum = %raum_name,
        anzahl,
        "Peer Raum beigetreten"
    );

    // Nur der Beitretende selbst bekommt die neue Mitgliederzahl
    inner
        .versand
        .an_session_senden(&session_id, &roominfo_frame(anzahl));
}

/// Leave: Raum raeumen, ggf. zerstoeren, immer das Getrennt-Ereignis
///
/// Das Getrennt-Ereignis kommt auch wenn die Session keinem Raum
/// angehoert; Beobachter sehen damit jeden Leave-artigen Uebergang.
pub(crate) fn verlassen(
    inner: &SwitchboardInner,
    zustand: &mut BoardZustand,
    session_id: SessionId,
) {
    let Some(peer) = zustand.peers.get_mut(&session_id) else {
        return; // Session bereits abgebaut
    };
    let kennung = peer.kennung.clone();
    let raum_name = peer.raum.take();

    if let Some(raum_name) = raum_name {
        if let Some(raum) = zustand.register.holen_mut(&raum_name) {
            raum.mitglieder.retain(|sid| *sid != session_id);
            let verbleibend = raum.mitglieder_anzahl();
            if verbleibend == 0 {
                zustand.register.entfernen(&raum_name);
                inner.ereignis(SwitchboardEvent::RaumZerstoert {
                    name: raum_name.clone(),
                });
                tracing::info!(raum = %raum_name, "Raum zerstoert (letztes Mitglied weg)");
            } else {
                tracing::debug!(
                    session_id = %session_id,
                    raum = %raum_name,
                    verbleibend,
                    "Peer Raum verlassen"
                );
            }
        }
    }

    inner.ereignis(SwitchboardEvent::PeerGetrennt {
        session_id,
        peer_id: kennung,
    });
}

// ---------------------------------------------------------------------------
// Zustellung
// ---------------------------------------------------------------------------

/// To: der rohe Frame geht an genau ein Mitglied des aktuellen Raums
fn zustellen(
    inner: &SwitchboardInner,
    zustand: &BoardZustand,
    session_id: SessionId,
    ziel: Option<PeerId>,
    roh: &str,
) {
    let Some(ziel) = ziel else {
        tracing::warn!(session_id = %session_id, "To ohne brauchbares Ziel – nichts zugestellt");
        return;
    };

    let raum = zustand
        .peers
        .get(&session_id)
        .and_then(|peer| peer.raum.as_deref())
        .and_then(|name| zustand.register.holen(name));
    let Some(raum) = raum else {
        tracing::warn!(session_id = %session_id, ziel = %ziel, "To ausserhalb eines Raums – nichts zugestellt");
        return;
    };

    let treffer = raum
        .mitglieder
        .iter()
        .find(|sid| zustand.peers.get(sid).and_then(|p| p.kennung.as_ref()) == Some(&ziel));

    match treffer {
        Some(sid) => {
            inner.versand.an_session_senden(sid, roh);
            tracing::debug!(session_id = %session_id, ziel = %ziel, "Frame gezielt zugestellt");
        }
        None => {
            // Routing-Miss ist kein Fehler; der Sender erfaehrt nichts
            tracing::warn!(
                session_id = %session_id,
                ziel = %ziel,
                raum = %raum.name,
                "To-Ziel nicht im Raum – nichts zugestellt"
            );
        }
    }
}

/// Broadcast: der rohe Frame geht an alle anderen Raummitglieder
fn rundsenden(
    inner: &SwitchboardInner,
    zustand: &BoardZustand,
    session_id: SessionId,
    kommando: &str,
    roh: &str,
) {
    let raum = zustand
        .peers
        .get(&session_id)
        .and_then(|peer| peer.raum.as_deref())
        .and_then(|name| zustand.register.holen(name));
    let Some(raum) = raum else {
        tracing::debug!(session_id = %session_id, kommando, "Broadcast ohne Raum verworfen");
        return;
    };

    let mut zugestellt = 0usize;
    for sid in &raum.mitglieder {
        if *sid == session_id {
            continue;
        }
        if inner.versand.an_session_senden(sid, roh) {
            zugestellt += 1;
        }
    }
    tracing::debug!(
        session_id = %session_id,
        kommando,
        raum = %raum.name,
        zugestellt,
        "Frame an Raum verteilt"
    );
}

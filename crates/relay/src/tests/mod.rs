//! Verhaltens-Tests fuer das Switchboard
//!
//! Deckt die Routing-Tabelle, die Registry-Invarianten und die kompletten
//! Ablaeufe (Beitritt, Wechsel, Trennung) ueber die oeffentliche API ab.


use tokio::sync::mpsc;

use crate::{Peer, Switchboard};

/// Baut den Announce-Frame wie ihn ein Client senden wuerde
fn announce_frame(kennung: &str, raum: &str) -> String {
    format!("/announce|_|{{\"id\":\"{}\",\"room\":\"{}\"}}", kennung, raum)
}

/// Verbindet einen Test-Peer und laesst ihn direkt in einen Raum announcen
///
/// Der roominfo-Frame des Beitritts wird abgeraeumt, damit die Tests nur
/// die eigentliche Nutzlast sehen.
fn peer_in_raum(board: &Switchboard, kennung: &str, raum: &str) -> (Peer, mpsc::Receiver<String>) {
    let (peer, mut rx) = board.verbinden();
    peer.verarbeiten(&announce_frame(kennung, raum));
    let roominfo = rx.try_recv().expect("Beitritt muss roominfo liefern");
    assert!(
        roominfo.starts_with("/roominfo|"),
        "Unerwarteter Frame beim Beitritt: {}",
        roominfo
    );
    (peer, rx)
}

/// Liest alle derzeit anstehenden Frames aus einer Empfangs-Queue
fn alle_frames(rx: &mut mpsc::Receiver<String>) -> Vec<String> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

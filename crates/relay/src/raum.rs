//! Raum-Register – Verwaltet benannte Raeume und ihre Mitglieder
//!
//! Raeume entstehen beim ersten Announce auf ihren Namen und verschwinden
//! sobald das letzte Mitglied geht; leere Raeume gibt es nie. Die
//! Mitgliederliste haelt die Beitrittsreihenfolge fest.

use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use switchboard_core::SessionId;

// ---------------------------------------------------------------------------
// Raum
// ---------------------------------------------------------------------------

/// Ein benannter Raum mit seinen Mitgliedern in Beitrittsreihenfolge
#[derive(Debug, Clone)]
pub(crate) struct Raum {
    pub name: String,
    pub mitglieder: Vec<SessionId>,
}

impl Raum {
    fn neu(name: String) -> Self {
        Self {
            name,
            mitglieder: Vec::new(),
        }
    }

    /// Mitgliederzahl; es gibt keinen gespeicherten Zaehler der
    /// auseinanderlaufen koennte
    pub fn mitglieder_anzahl(&self) -> usize {
        self.mitglieder.len()
    }
}

// ---------------------------------------------------------------------------
// RaumUebersicht
// ---------------------------------------------------------------------------

/// Zeile der Status-Auflistung, Feldnamen wie auf der Leitung
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaumUebersicht {
    pub name: String,
    #[serde(rename = "memberCount")]
    pub member_count: usize,
}

// ---------------------------------------------------------------------------
// RaumRegister
// ---------------------------------------------------------------------------

/// Alle aktiven Raeume, indiziert nach Namen
///
/// Reine Datenhaltung ohne eigene Synchronisation: der Aufrufer haelt das
/// Schloss und meldet Lebenszyklus-Ereignisse selbst.
#[derive(Debug, Default)]
pub(crate) struct RaumRegister {
    raeume: HashMap<String, Raum>,
}

impl RaumRegister {
    pub fn neu() -> Self {
        Self {
            raeume: HashMap::new(),
        }
    }

    /// Exakte Namenssuche
    pub fn holen(&self, name: &str) -> Option<&Raum> {
        self.raeume.get(name)
    }

    pub fn holen_mut(&mut self, name: &str) -> Option<&mut Raum> {
        self.raeume.get_mut(name)
    }

    /// Liefert den Raum oder legt ihn leer an
    ///
    /// `true` im zweiten Feld heisst: der Raum ist neu und der Aufrufer
    /// muss das Erstellt-Ereignis melden.
    pub fn holen_oder_erstellen(&mut self, name: &str) -> (&mut Raum, bool) {
        match self.raeume.entry(name.to_string()) {
            Entry::Occupied(eintrag) => (eintrag.into_mut(), false),
            Entry::Vacant(eintrag) => (eintrag.insert(Raum::neu(name.to_string())), true),
        }
    }

    /// Entfernt einen Raum; der Aufrufer meldet das Zerstoert-Ereignis
    pub fn entfernen(&mut self, name: &str) -> Option<Raum> {
        self.raeume.remove(name)
    }

    /// Anzahl aktiver Raeume
    pub fn anzahl(&self) -> usize {
        self.raeume.len()
    }

    /// Entfernt alle Raeume auf einen Schlag
    pub fn leeren(&mut self) {
        self.raeume.clear();
    }

    /// Konsistente Momentaufnahme aller Raeume fuer die Status-Auflistung
    ///
    /// Sortiert nach Mitgliederzahl absteigend, bei Gleichstand nach Name,
    /// damit die Ausgabe deterministisch bleibt.
    pub fn uebersicht(&self) -> Vec<RaumUebersicht> {
        let mut liste: Vec<RaumUebersicht> = self
            .raeume
            .values()
            .map(|raum| RaumUebersicht {
                name: raum.name.clone(),
                member_count: raum.mitglieder_anzahl(),
            })
            .collect();
        liste.sort_by(|a, b| {
            b.member_count
                .cmp(&a.member_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        liste
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! switchboard-server – HTTP/WebSocket-Front-End
//!
//! Bindet das Switchboard an die Aussenwelt: ein axum-Router nimmt auf
//! `GET /` wahlweise WebSocket-Upgrades (Signalling-Verbindungen) oder
//! normale HTTP-Anfragen (Raum-Auflistung als JSON) entgegen. Dazu kommen
//! Health-Check, CORS und Request-Tracing. Die Bibliotheks-Form existiert
//! damit Integrationstests den Router ohne laufenden Prozess fahren koennen.

pub mod config;

mod ws;

use anyhow::Result;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use switchboard_core::SwitchboardEvent;
use switchboard_relay::Switchboard;

use config::ServerConfig;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Axum-State: das Switchboard plus die Verbindungsobergrenze
#[derive(Clone)]
pub(crate) struct AppState {
    pub board: Switchboard,
    pub max_clients: u32,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
    board: Switchboard,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self {
            config,
            board: Switchboard::neu(),
        }
    }

    /// Zugriff auf das Switchboard (fuer Tests und Instrumentierung)
    pub fn board(&self) -> &Switchboard {
        &self.board
    }

    /// Baut den axum-Router mit allen Routen und Layern
    ///
    /// `GET /` ist doppelt belegt: mit Upgrade-Header wird die Verbindung
    /// zum WebSocket, ohne liefert sie die Raum-Auflistung. `GET /health`
    /// ist der Liveness-Check.
    pub fn router(&self) -> Router {
        let state = AppState {
            board: self.board.clone(),
            max_clients: self.config.server.max_clients,
        };

        Router::new()
            .route("/", get(index))
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&self.config.netzwerk.cors_origins))
            .with_state(state)
    }

    /// Startet den HTTP/WebSocket-Server und laeuft bis zum Shutdown-Signal
    pub async fn starten(self) -> Result<()> {
        let adresse = self.config.bind_adresse();

        tracing::info!(
            server_name = %self.config.server.name,
            adresse = %adresse,
            max_clients = self.config.server.max_clients,
            "Server startet"
        );

        // Beobachter-Task: protokolliert Lebenszyklus-Ereignisse, nimmt am
        // Routing selbst nicht teil
        let beobachter = ereignisse_beobachten(&self.board);

        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&adresse).await?;
        tracing::info!(adresse = %adresse, "HTTP/WebSocket-Listener bereit");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        beobachter.abort();
        tracing::info!("Server beendet");
        Ok(())
    }
}

/// Wartet auf Ctrl-C
///
/// Ist der Signal-Handler nicht verfuegbar, laeuft der Server einfach
/// weiter statt sich sofort zu beenden.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown-Signal empfangen, Server wird beendet"),
        Err(e) => {
            tracing::error!(fehler = %e, "Ctrl-C-Handler nicht verfuegbar");
            std::future::pending::<()>().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// GET / – WebSocket-Upgrade oder Raum-Auflistung
///
/// Mit Upgrade-Header wird die Verbindung an das Switchboard verdrahtet,
/// sofern das Client-Limit noch Luft hat. Ohne Upgrade-Header antwortet
/// die Route mit der Momentaufnahme aller Raeume, Mitgliederzahl
/// absteigend.
async fn index(State(state): State<AppState>, ws: Option<WebSocketUpgrade>) -> Response {
    let Some(upgrade) = ws else {
        return Json(state.board.raum_uebersicht()).into_response();
    };

    if state.board.peer_anzahl() >= state.max_clients as usize {
        tracing::warn!(
            max = state.max_clients,
            "Server voll – Verbindung abgelehnt"
        );
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": { "code": 503, "message": "Server voll" } })),
        )
            .into_response();
    }

    let board = state.board.clone();
    upgrade.on_upgrade(move |socket| ws::verbindung_verarbeiten(socket, board))
}

/// GET /health – Health-Check-Endpunkt
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// CORS konfigurieren: entweder spezifische Origins oder Any
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(tower_http::cors::Any)
    }
}

// ---------------------------------------------------------------------------
// Ereignis-Beobachter
// ---------------------------------------------------------------------------

/// Protokolliert Lebenszyklus-Ereignisse des Switchboards
///
/// Externe Beobachtung im Sinne der Ereignis-Schnittstelle: der Task
/// liest den Broadcast-Kanal mit und loggt, ohne Routing-Entscheidungen
/// zu beeinflussen. Verpasste Ereignisse (Lag) sind unkritisch.
fn ereignisse_beobachten(board: &Switchboard) -> tokio::task::JoinHandle<()> {
    let mut events = board.events_abonnieren();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SwitchboardEvent::PeerVerbunden { session_id }) => {
                    tracing::debug!(session_id = %session_id, "Ereignis: Peer verbunden");
                }
                Ok(SwitchboardEvent::PeerGetrennt { session_id, peer_id }) => {
                    tracing::debug!(
                        session_id = %session_id,
                        kennung = peer_id.map(|k| k.to_string()).as_deref().unwrap_or("-"),
                        "Ereignis: Peer getrennt"
                    );
                }
                Ok(SwitchboardEvent::RaumErstellt { name }) => {
                    tracing::debug!(raum = %name, "Ereignis: Raum erstellt");
                }
                Ok(SwitchboardEvent::RaumZerstoert { name }) => {
                    tracing::debug!(raum = %name, "Ereignis: Raum zerstoert");
                }
                Ok(SwitchboardEvent::Daten { frame, session_id, .. }) => {
                    tracing::trace!(
                        session_id = %session_id,
                        laenge = frame.len(),
                        "Ereignis: Frame beobachtet"
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(verpasst = n, "Ereignis-Beobachter hinkt hinterher");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

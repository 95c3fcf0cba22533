//! Integration-Tests fuer das HTTP/WebSocket-Front-End
//!
//! Faehrt den kompletten Pfad: echter Listener, echte WebSocket-Clients
//! (tokio-tungstenite), Frames wie sie Clients auf die Leitung legen.
//! Die reinen HTTP-Routen laufen ohne Netz direkt gegen den Router.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use switchboard_relay::Switchboard;
use switchboard_server::{config::ServerConfig, Server};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Startet den Server auf einem freien Port und gibt Adresse + Board zurueck
async fn server_starten(config: ServerConfig) -> (SocketAddr, Switchboard) {
    let server = Server::neu(config);
    let board = server.board().clone();
    let router = server.router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Listener konnte nicht gebunden werden");
    let addr = listener.local_addr().expect("Lokale Adresse unbekannt");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Server beendet sich unerwartet");
    });

    (addr, board)
}

async fn ws_verbinden(addr: SocketAddr) -> WsClient {
    let (client, _) = connect_async(format!("ws://{}/", addr))
        .await
        .expect("WebSocket-Verbindung fehlgeschlagen");
    client
}

/// Liest den naechsten Text-Frame, mit Timeout gegen haengende Tests
async fn naechster_frame(client: &mut WsClient) -> String {
    timeout(Duration::from_secs(5), client.next())
        .await
        .expect("Zeitueberschreitung beim Warten auf einen Frame")
        .expect("Verbindung vorzeitig geschlossen")
        .expect("WebSocket-Fehler")
        .into_text()
        .expect("Text-Frame erwartet")
}

/// Stellt sicher dass innerhalb eines kurzen Fensters nichts ankommt
async fn erwarte_stille(client: &mut WsClient) {
    if let Ok(frame) = timeout(Duration::from_millis(300), client.next()).await {
        panic!("Unerwarteter Frame: {:?}", frame);
    }
}

/// Announce in einen Raum; gibt den roominfo-Frame zurueck
async fn beitreten(client: &mut WsClient, kennung: &str, raum: &str) -> String {
    let frame = format!("/announce|_|{{\"id\":\"{}\",\"room\":\"{}\"}}", kennung, raum);
    client
        .send(Message::Text(frame))
        .await
        .expect("Senden fehlgeschlagen");
    naechster_frame(client).await
}

/// Wartet bis die Bedingung eintritt (Verbindungsabbau ist asynchron)
async fn warte_bis(bedingung: impl Fn() -> bool, was: &str) {
    for _ in 0..50 {
        if bedingung() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("Bedingung nicht erreicht: {}", was);
}

// ---------------------------------------------------------------------------
// WebSocket-Pfad
// ---------------------------------------------------------------------------

#[tokio::test]
async fn announce_liefert_roominfo_ueber_websocket() {
    let (addr, _board) = server_starten(ServerConfig::default()).await;

    let mut a = ws_verbinden(addr).await;
    let info = beitreten(&mut a, "a1", "lobby").await;
    assert_eq!(info, "/roominfo|{\"memberCount\":1}");

    let mut b = ws_verbinden(addr).await;
    let info = beitreten(&mut b, "b1", "lobby").await;
    assert_eq!(info, "/roominfo|{\"memberCount\":2}");

    // Das Bestandsmitglied erfaehrt vom Beitritt nichts
    erwarte_stille(&mut a).await;
}

#[tokio::test]
async fn broadcast_und_gezielte_zustellung_ueber_websocket() {
    let (addr, _board) = server_starten(ServerConfig::default()).await;

    let mut a = ws_verbinden(addr).await;
    beitreten(&mut a, "a1", "lobby").await;
    let mut b = ws_verbinden(addr).await;
    beitreten(&mut b, "b1", "lobby").await;
    let mut c = ws_verbinden(addr).await;
    beitreten(&mut c, "c1", "lobby").await;

    // Unbekanntes Kommando: alle anderen bekommen den rohen Frame
    a.send(Message::Text("/ping|1".into())).await.unwrap();
    assert_eq!(naechster_frame(&mut b).await, "/ping|1");
    assert_eq!(naechster_frame(&mut c).await, "/ping|1");
    erwarte_stille(&mut a).await;

    // Gezielte Zustellung: nur das adressierte Mitglied
    a.send(Message::Text("/to|\"b1\"|\"geheim\"".into()))
        .await
        .unwrap();
    assert_eq!(naechster_frame(&mut b).await, "/to|\"b1\"|\"geheim\"");
    erwarte_stille(&mut c).await;
}

#[tokio::test]
async fn verbindungsabbau_raeumt_den_raum() {
    let (addr, board) = server_starten(ServerConfig::default()).await;

    let mut a = ws_verbinden(addr).await;
    beitreten(&mut a, "a1", "lobby").await;
    let mut b = ws_verbinden(addr).await;
    beitreten(&mut b, "b1", "lobby").await;

    b.close(None).await.expect("Close fehlgeschlagen");
    warte_bis(
        || board.raum_uebersicht().first().map(|r| r.member_count) == Some(1),
        "lobby muss auf ein Mitglied schrumpfen",
    )
    .await;

    drop(a);
    warte_bis(
        || board.raum_anzahl() == 0,
        "lobby muss mit dem letzten Mitglied verschwinden",
    )
    .await;
}

#[tokio::test]
async fn binaerframes_werden_ignoriert() {
    let (addr, _board) = server_starten(ServerConfig::default()).await;

    let mut a = ws_verbinden(addr).await;
    a.send(Message::Binary(vec![1, 2, 3])).await.unwrap();

    // Die Session lebt weiter und kann normal beitreten
    let info = beitreten(&mut a, "a1", "lobby").await;
    assert_eq!(info, "/roominfo|{\"memberCount\":1}");
}

#[tokio::test]
async fn verbindungslimit_lehnt_ueberzaehlige_ab() {
    let mut config = ServerConfig::default();
    config.server.max_clients = 1;
    let (addr, board) = server_starten(config).await;

    let _a = ws_verbinden(addr).await;
    warte_bis(|| board.peer_anzahl() == 1, "Erste Verbindung muss stehen").await;

    let abgelehnt = connect_async(format!("ws://{}/", addr)).await;
    assert!(
        abgelehnt.is_err(),
        "Zweite Verbindung muss am Limit scheitern"
    );
}

// ---------------------------------------------------------------------------
// HTTP-Pfad
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_endpunkt_antwortet() {
    let server = Server::neu(ServerConfig::default());
    let app = server.router();

    let antwort = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(antwort.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(antwort.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"{\"status\":\"ok\"}");
}

#[tokio::test]
async fn raum_auflistung_ohne_upgrade() {
    let server = Server::neu(ServerConfig::default());

    // Raeume direkt ueber das Board fuellen; die Queues muessen offen
    // bleiben damit die Sessions als verbunden gelten
    let (a, _a_rx) = server.board().verbinden();
    a.verarbeiten("/announce|_|{\"id\":\"a1\",\"room\":\"lobby\"}");
    let (b, _b_rx) = server.board().verbinden();
    b.verarbeiten("/announce|_|{\"id\":\"b1\",\"room\":\"lobby\"}");
    let (c, _c_rx) = server.board().verbinden();
    c.verarbeiten("/announce|_|{\"id\":\"c1\",\"room\":\"solo\"}");

    let antwort = server
        .router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(antwort.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(antwort.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(
        text,
        "[{\"name\":\"lobby\",\"memberCount\":2},{\"name\":\"solo\",\"memberCount\":1}]"
    );
}

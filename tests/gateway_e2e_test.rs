//! Gateway end-to-end tests against a local HTTP fixture on port 0

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use wordboard::adapter::{
    encode_frame, event_payload, ChannelStream, GatewayConfig, GatewayError, GatewayRuntime,
    HttpGateway, PuzzleDto,
};
use wordboard::core::{
    Clock, MonotonicClock, Notice, PlacedTile, PlacementEvent, PlaybackConfig,
    PlaybackController, PuzzleSnapshot, SessionStatus, StreamEvent, StreamItem, TransportError,
};
use wordboard::types::{Direction, Tile};

#[derive(Debug, Clone)]
enum Reply {
    Json(String),
    Text(String),
    Sse(Vec<String>),
    Status(u16),
}

type Routes = Vec<(&'static str, Reply)>;

async fn serve(routes: Routes) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let _ = respond(socket, &routes).await;
            });
        }
    });
    addr
}

/// Serve routes from a dedicated thread, for tests that own no runtime.
fn serve_on_thread(routes: Routes) -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            tx.send(serve(routes).await).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

async fn respond(mut socket: TcpStream, routes: &[(&'static str, Reply)]) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        head.extend_from_slice(&buf[..n]);
    }
    let request = String::from_utf8_lossy(&head);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    let reply = routes
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, r)| r.clone())
        .unwrap_or(Reply::Status(404));

    match reply {
        Reply::Json(body) => write_body(&mut socket, 200, "application/json", &body).await,
        Reply::Text(body) => write_body(&mut socket, 200, "text/plain", &body).await,
        Reply::Status(code) => write_body(&mut socket, code, "text/plain", "").await,
        Reply::Sse(chunks) => {
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n",
                )
                .await?;
            for chunk in chunks {
                socket.write_all(chunk.as_bytes()).await?;
                socket.flush().await?;
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            socket.shutdown().await
        }
    }
}

async fn write_body(socket: &mut TcpStream, code: u16, content_type: &str, body: &str) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {code} Fixture\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    socket.write_all(head.as_bytes()).await?;
    socket.write_all(body.as_bytes()).await?;
    socket.shutdown().await
}

fn cat_snapshot() -> PuzzleSnapshot {
    let mut snapshot = PuzzleSnapshot::default();
    snapshot.cells[7][7] = Some(PlacedTile::new('C', 3, 1, 2));
    snapshot.cells[7][8] = Some(PlacedTile::new('A', 1, 1, 1));
    snapshot.cells[7][9] = Some(PlacedTile::new('T', 1, 1, 1));
    snapshot.remaining_tiles = vec![Tile::new('E', 1), Tile::blank()];
    snapshot.placed_tile_count = 3;
    snapshot.remaining_tile_count = 2;
    snapshot
}

fn puzzle_json(snapshot: &PuzzleSnapshot) -> String {
    serde_json::to_string(&PuzzleDto::from(snapshot)).unwrap()
}

fn frame(event: &StreamEvent) -> String {
    let (name, data) = event_payload(event).unwrap();
    encode_frame(name, &data)
}

fn cat_events() -> Vec<StreamEvent> {
    let mut events = vec![StreamEvent::GenerationStarted {
        message: "Puzzle generation started".to_string(),
    }];
    for (pos, letter) in "CAT".chars().enumerate() {
        events.push(StreamEvent::TilePlaced(PlacementEvent {
            row: 7,
            col: 7 + pos as i64,
            letter,
            point_value: 1,
            word: "CAT".to_string(),
            direction: Direction::Horizontal,
            position_in_word: pos as u32,
            total_tiles_in_word: 3,
            letter_multiplier: 1,
            word_multiplier: 1,
        }));
    }
    events.push(StreamEvent::WordComplete {
        word: "CAT".to_string(),
        direction: Some(Direction::Horizontal),
    });
    events
}

/// The full animated stream, with one frame split across two writes and an
/// event the client does not know.
fn cat_stream_chunks(complete: bool) -> Vec<String> {
    let mut chunks: Vec<String> = cat_events().iter().map(frame).collect();
    let split = chunks.remove(2);
    let (a, b) = split.split_at(split.len() / 2);
    chunks.insert(2, b.to_string());
    chunks.insert(2, a.to_string());
    chunks.push(": keep-alive\n\nevent: heartbeat\ndata: {}\n\n".to_string());
    if complete {
        chunks.push(frame(&StreamEvent::GenerationComplete(Box::new(cat_snapshot()))));
    }
    chunks
}

fn gateway_for(addr: SocketAddr) -> HttpGateway {
    let config = GatewayConfig::default().with_base_url(format!("http://{addr}"));
    HttpGateway::new(config).unwrap()
}

#[tokio::test]
async fn plain_generation_returns_the_snapshot() {
    let snapshot = cat_snapshot();
    let addr = serve(vec![
        ("/api/puzzle/generate", Reply::Json(puzzle_json(&snapshot))),
        ("/api/puzzle/current", Reply::Json(puzzle_json(&snapshot))),
        ("/health", Reply::Text("OK".to_string())),
    ])
    .await;
    let gateway = gateway_for(addr);

    let fetched = tokio::time::timeout(Duration::from_secs(5), gateway.generate_plain())
        .await
        .expect("generate timed out")
        .unwrap();
    assert_eq!(fetched, snapshot);

    let current = tokio::time::timeout(Duration::from_secs(5), gateway.current())
        .await
        .expect("current timed out")
        .unwrap();
    assert_eq!(current.remaining_tiles[1], Tile::blank());

    let health = gateway.health().await.unwrap();
    assert_eq!(health, "OK");
}

#[tokio::test]
async fn error_status_is_reported() {
    let addr = serve(vec![("/api/puzzle/generate", Reply::Status(503))]).await;
    let gateway = gateway_for(addr);

    let err = gateway.generate_plain().await.unwrap_err();
    assert!(matches!(err, GatewayError::Status(503)), "{err}");

    // unknown route
    let err = gateway.current().await.unwrap_err();
    assert!(matches!(err, GatewayError::Status(404)), "{err}");
}

#[tokio::test]
async fn malformed_body_is_a_json_error() {
    let addr = serve(vec![("/api/puzzle/generate", Reply::Json("{\"board\":".to_string()))]).await;
    let err = gateway_for(addr).generate_plain().await.unwrap_err();
    assert!(matches!(err, GatewayError::Json(_)), "{err}");
}

#[tokio::test]
async fn animated_stream_decodes_events_in_order() {
    let addr = serve(vec![(
        "/api/puzzle/generate-animated",
        Reply::Sse(cat_stream_chunks(true)),
    )])
    .await;
    let mut stream = gateway_for(addr).open_animated().await.unwrap();

    let mut items = Vec::new();
    while let Some(item) = tokio::time::timeout(Duration::from_secs(5), stream.next_item())
        .await
        .expect("stream stalled")
    {
        items.push(item);
    }

    let mut expected: Vec<StreamItem> = cat_events().into_iter().map(StreamItem::Event).collect();
    expected.push(StreamItem::Event(StreamEvent::GenerationComplete(Box::new(
        cat_snapshot(),
    ))));
    assert_eq!(items, expected);
}

#[tokio::test]
async fn stream_ending_early_is_a_transport_failure() {
    let addr = serve(vec![(
        "/api/puzzle/generate-animated",
        Reply::Sse(cat_stream_chunks(false)),
    )])
    .await;
    let mut stream = gateway_for(addr).open_animated().await.unwrap();

    let mut last = None;
    while let Some(item) = tokio::time::timeout(Duration::from_secs(5), stream.next_item())
        .await
        .expect("stream stalled")
    {
        last = Some(item);
    }
    assert_eq!(last, Some(StreamItem::Failed(TransportError::ClosedEarly)));
}

#[tokio::test]
async fn unterminated_line_interrupts_the_stream() {
    let mut chunks = vec!["data: ".to_string()];
    chunks.extend(std::iter::repeat("x".repeat(64 * 1024)).take(17));
    let addr = serve(vec![("/api/puzzle/generate-animated", Reply::Sse(chunks))]).await;
    let mut stream = gateway_for(addr).open_animated().await.unwrap();

    let item = tokio::time::timeout(Duration::from_secs(5), stream.next_item())
        .await
        .expect("stream stalled");
    assert!(
        matches!(item, Some(StreamItem::Failed(TransportError::Interrupted(ref msg))) if msg.contains("exceeds")),
        "{item:?}"
    );
    assert_eq!(stream.next_item().await, None);
}

#[test]
fn health_check_on_a_test_runtime() {
    tokio_test::block_on(async {
        let addr = serve(vec![("/health", Reply::Text("UP".to_string()))]).await;
        assert_eq!(gateway_for(addr).health().await.unwrap(), "UP");
    });
}

fn drive(playback: &mut PlaybackController<ChannelStream>, clock: &MonotonicClock) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while playback.status().is_in_flight() && Instant::now() < deadline {
        playback.pump(clock.now_ms());
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn fast_playback() -> PlaybackController<ChannelStream> {
    PlaybackController::new(PlaybackConfig {
        inter_tile_delay_ms: 5,
        settle_delay_ms: 5,
        stream_idle_timeout_ms: 5_000,
    })
}

#[test]
fn runtime_drives_controller_to_completion() {
    let addr = serve_on_thread(vec![(
        "/api/puzzle/generate-animated",
        Reply::Sse(cat_stream_chunks(true)),
    )]);
    let rt = GatewayRuntime::new(GatewayConfig::default().with_base_url(format!("http://{addr}")))
        .unwrap();
    let clock = MonotonicClock::new();
    let mut playback = fast_playback();

    playback.start_animated(clock.now_ms(), || Ok(rt.open_stream()));
    drive(&mut playback, &clock);

    assert_eq!(playback.status(), SessionStatus::Idle);
    assert_eq!(playback.last_outcome(), Some(SessionStatus::Completed));
    assert_eq!(playback.words_completed(), 1);
    let snapshot = cat_snapshot();
    for cell in playback.board().cells() {
        assert_eq!(cell.tile, snapshot.cells[cell.row as usize][cell.col as usize]);
    }
    assert_eq!(playback.rack().len(), 2);
}

#[test]
fn runtime_reports_early_close_as_failure() {
    let addr = serve_on_thread(vec![(
        "/api/puzzle/generate-animated",
        Reply::Sse(cat_stream_chunks(false)),
    )]);
    let rt = GatewayRuntime::new(GatewayConfig::default().with_base_url(format!("http://{addr}")))
        .unwrap();
    let clock = MonotonicClock::new();
    let mut playback = fast_playback();

    playback.start_animated(clock.now_ms(), || Ok(rt.open_stream()));
    drive(&mut playback, &clock);

    assert_eq!(playback.status(), SessionStatus::Failed);
    assert!(!playback.has_stream());
    assert_eq!(playback.stats(), None);
    assert_eq!(
        playback.take_notice(),
        Some(Notice::Failed(
            "event stream ended before generation completed".to_string()
        ))
    );
}

#[test]
fn runtime_connect_failure_fails_session() {
    // bind and release a port so nothing listens on it
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = GatewayConfig {
        request_timeout_ms: 2_000,
        ..GatewayConfig::default().with_base_url(format!("http://127.0.0.1:{port}"))
    };
    let rt = GatewayRuntime::new(config).unwrap();
    let clock = MonotonicClock::new();
    let mut playback = fast_playback();

    playback.start_animated(clock.now_ms(), || Ok(rt.open_stream()));
    drive(&mut playback, &clock);
    assert_eq!(playback.status(), SessionStatus::Failed);

    let err = rt.generate_plain_blocking().unwrap_err();
    playback.fail_request(err.into());
    assert_eq!(playback.status(), SessionStatus::Failed);
}

#[test]
fn runtime_plain_fetch_feeds_controller() {
    let addr = serve_on_thread(vec![
        ("/api/puzzle/generate", Reply::Json(puzzle_json(&cat_snapshot()))),
        ("/health", Reply::Text("OK".to_string())),
    ]);
    let rt = GatewayRuntime::new(GatewayConfig::default().with_base_url(format!("http://{addr}")))
        .unwrap();
    let mut playback = fast_playback();
    assert_eq!(rt.health_blocking().unwrap(), "OK");

    let snapshot = rt.generate_plain_blocking().unwrap();
    playback.apply_plain(0, &snapshot);
    assert_eq!(playback.last_outcome(), Some(SessionStatus::Completed));
    assert_eq!(playback.board().occupied_count(), 3);
    assert_eq!(playback.rack().listing(), "E BLANK");
}

// End-to-end tests: the real HTTP client talking to a mock analysis service,
// driven through the orchestrator exactly as the TUI would drive it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lexiview::api::{NlpBackend, NlpClient};
use lexiview::app::{self, AppState};
use lexiview::config::Config;
use lexiview::db::Database;
use lexiview::protocol::*;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

// ===========================================================================
// Mock service
// ===========================================================================

/// Canned response for a request line such as `POST /pos`.
fn route(method: &str, path: &str) -> (&'static str, &'static str) {
    match (method, path) {
        ("GET", "/") => ("200 OK", r#"{"message":"NLP API is running"}"#),
        ("GET", "/languages") => (
            "200 OK",
            r#"{"es":"spanish","fr":"french","de":"german"}"#,
        ),
        ("POST", "/pos") => (
            "200 OK",
            r#"{"tokens":[{"text":"Dogs","pos":"NOUN","tag":"NNS","lemma":"dog","dep":"nsubj","start":0,"end":4},{"text":"bark","pos":"VERB","tag":"VBP","lemma":"bark","dep":"ROOT","start":5,"end":9}]}"#,
        ),
        ("POST", "/ner") => (
            "200 OK",
            r#"{"entities":[{"text":"Paris","label":"GPE","start":0,"end":5}]}"#,
        ),
        ("POST", "/translate") => (
            "200 OK",
            r#"{"original_text":"Hello","translated_text":"Bonjour","source_language":"en","target_language":"fr","confidence":0.97}"#,
        ),
        ("POST", "/dependency") => (
            "200 OK",
            r#"{"svg":"<svg width=\"1200\" height=\"800\"></svg>","dependencies":[{"token":"Dogs","pos":"NOUN","dep":"nsubj","head":"bark","children":[]}]}"#,
        ),
        ("POST", "/cfg-gemini") => (
            "422 Unprocessable Entity",
            r#"{"detail":[{"loc":["body","text"],"msg":"field required","type":"value_error.missing"}]}"#,
        ),
        ("POST", "/semantic") => (
            "500 Internal Server Error",
            r#"{"detail":"Gemini quota exceeded"}"#,
        ),
        _ => ("404 Not Found", r#"{"detail":"Not Found"}"#),
    }
}

/// Serve canned responses forever. Each request line (`POST /pos` plus the
/// body) is reported on the returned channel.
async fn spawn_service() -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let seen_tx = seen_tx.clone();
            tokio::spawn(async move {
                handle_connection(socket, seen_tx).await;
            });
        }
    });

    (format!("http://{addr}"), seen_rx)
}

async fn handle_connection(mut socket: TcpStream, seen_tx: mpsc::UnboundedSender<String>) {
    let request = read_request(&mut socket).await;
    let mut first = request.lines().next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("").to_string();
    let body = request
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    let _ = seen_tx.send(format!("{method} {path} {body}"));

    let (status_line, payload) = route(&method, &path);
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.flush().await;
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        raw.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&raw);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

// ===========================================================================
// Harness
// ===========================================================================

struct Harness {
    state: AppState,
    api_rx: mpsc::Receiver<ApiEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    seen: mpsc::UnboundedReceiver<String>,
    dir: PathBuf,
}

impl Harness {
    async fn new(name: &str) -> Self {
        let (base_url, seen) = spawn_service().await;
        let dir = std::env::temp_dir().join(format!("lexiview_e2e_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let mut config = Config::default();
        config.backend.base_url = base_url.clone();
        config.backend.timeout_secs = 5;
        config.storage.db_path = dir.join("state.db").to_string_lossy().into_owned();
        config.storage.export_dir = dir.join("exports").to_string_lossy().into_owned();

        let db = Database::open(&config.storage.db_path).unwrap();
        let client = NlpClient::new(&base_url, Duration::from_secs(5)).unwrap();
        let backend: Arc<dyn NlpBackend> = Arc::new(client);
        let (api_tx, api_rx) = mpsc::channel(16);
        let (ui_tx, ui_rx) = mpsc::channel(64);

        Harness {
            state: AppState::new(config, db, backend, api_tx),
            api_rx,
            ui_tx,
            ui_rx,
            seen,
            dir,
        }
    }

    async fn command(&mut self, cmd: UserCommand) {
        app::handle_user_command(&mut self.state, cmd, &self.ui_tx).await;
    }

    /// Wait for the next request result and apply it.
    async fn deliver_next(&mut self) {
        let event = tokio::time::timeout(Duration::from_secs(10), self.api_rx.recv())
            .await
            .expect("request did not complete")
            .expect("api channel closed");
        app::handle_api_event(&mut self.state, event, &self.ui_tx).await;
    }

    fn drain_ui(&mut self) -> Vec<UiUpdate> {
        let mut out = Vec::new();
        while let Ok(update) = self.ui_rx.try_recv() {
            out.push(update);
        }
        out
    }

    fn last_panel(&mut self, tab: TabId) -> PanelSnapshot {
        self.drain_ui()
            .into_iter()
            .rev()
            .find_map(|u| match u {
                UiUpdate::Panel(p) if p.tab == tab => Some(*p),
                _ => None,
            })
            .expect("no panel update")
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn pos_analysis_round_trip() {
    let mut h = Harness::new("pos").await;
    h.command(UserCommand::Analyze {
        tab: TabId::Pos,
        text: "  Dogs bark  ".into(),
    })
    .await;
    assert_eq!(h.last_panel(TabId::Pos).status, RequestStatus::Loading);

    h.deliver_next().await;
    let panel = h.last_panel(TabId::Pos);
    assert_eq!(panel.status, RequestStatus::Complete);
    match panel.result {
        Some(AnalysisResult::Pos(analysis)) => {
            assert_eq!(analysis.tokens.len(), 2);
            assert_eq!(analysis.tokens[1].lemma, "bark");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let seen = h.seen.recv().await.unwrap();
    assert!(seen.starts_with("POST /pos "), "{seen}");
    assert!(seen.ends_with(r#"{"text":"Dogs bark"}"#), "{seen}");
}

#[tokio::test]
async fn empty_text_never_reaches_the_service() {
    let mut h = Harness::new("empty").await;
    h.command(UserCommand::Analyze {
        tab: TabId::Ner,
        text: "   ".into(),
    })
    .await;
    let panel = h.last_panel(TabId::Ner);
    assert_eq!(panel.status, RequestStatus::Error);
    assert_eq!(
        panel.error.as_deref(),
        Some("Please enter some text to analyze")
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.seen.try_recv().is_err());
}

#[tokio::test]
async fn ner_result_keeps_submitted_text() {
    let mut h = Harness::new("ner").await;
    h.command(UserCommand::Analyze {
        tab: TabId::Ner,
        text: "Paris in spring\n".into(),
    })
    .await;
    h.deliver_next().await;
    match h.last_panel(TabId::Ner).result {
        Some(AnalysisResult::Ner { text, analysis }) => {
            assert_eq!(text, "Paris in spring");
            assert_eq!(analysis.entities[0].label, "GPE");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn translate_uses_selected_target() {
    let mut h = Harness::new("translate").await;
    h.command(UserCommand::SetTargetLanguage("fr".into())).await;
    h.command(UserCommand::Analyze {
        tab: TabId::Translate,
        text: "Hello".into(),
    })
    .await;
    h.deliver_next().await;

    let panel = h.last_panel(TabId::Translate);
    match panel.result {
        Some(AnalysisResult::Translation(t)) => assert_eq!(t.translated_text, "Bonjour"),
        other => panic!("unexpected result: {other:?}"),
    }
    let seen = h.seen.recv().await.unwrap();
    assert!(seen.starts_with("POST /translate "), "{seen}");
    assert!(seen.contains(r#""target_language":"fr""#), "{seen}");
}

#[tokio::test]
async fn cfg_422_shows_invalid_request_hint() {
    let mut h = Harness::new("cfg").await;
    h.command(UserCommand::Analyze {
        tab: TabId::Cfg,
        text: "The dog barked.".into(),
    })
    .await;
    h.deliver_next().await;
    let panel = h.last_panel(TabId::Cfg);
    assert_eq!(panel.status, RequestStatus::Error);
    assert_eq!(
        panel.error.as_deref(),
        Some(r#"Invalid request. Ensure JSON body contains "text"."#)
    );
    assert!(panel.result.is_none());
}

#[tokio::test]
async fn semantic_error_detail_is_surfaced() {
    let mut h = Harness::new("semantic").await;
    h.command(UserCommand::Analyze {
        tab: TabId::Semantic,
        text: "John gave Mary a book.".into(),
    })
    .await;
    h.deliver_next().await;
    let panel = h.last_panel(TabId::Semantic);
    assert_eq!(panel.error.as_deref(), Some("Gemini quota exceeded"));
}

#[tokio::test]
async fn language_list_loads_on_refresh() {
    let mut h = Harness::new("languages").await;
    h.command(UserCommand::RefreshLanguages).await;
    h.deliver_next().await;
    let update = h
        .drain_ui()
        .into_iter()
        .rev()
        .find(|u| matches!(u, UiUpdate::Languages { .. }))
        .unwrap();
    match update {
        UiUpdate::Languages {
            status, languages, ..
        } => {
            assert_eq!(status, RequestStatus::Complete);
            assert_eq!(
                languages.keys().cloned().collect::<Vec<_>>(),
                vec!["de", "es", "fr"]
            );
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn health_check_marks_backend_online() {
    let mut h = Harness::new("health").await;
    h.command(UserCommand::CheckHealth).await;
    h.deliver_next().await;
    assert_eq!(h.state.connection_status, ConnectionStatus::Connected);
    assert!(h.state.last_health_check.is_some());
}

#[tokio::test]
async fn unreachable_service_marks_backend_offline() {
    // Bind and drop to get a port nothing listens on.
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let mut h = Harness::new("offline").await;
    let client = NlpClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2)).unwrap();
    h.state.backend = Arc::new(client);

    h.command(UserCommand::CheckHealth).await;
    h.deliver_next().await;
    assert_eq!(h.state.connection_status, ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn dependency_result_persists_and_exports() {
    let mut h = Harness::new("dependency").await;
    h.command(UserCommand::Analyze {
        tab: TabId::Dependency,
        text: "Dogs bark".into(),
    })
    .await;
    h.deliver_next().await;
    h.drain_ui();

    h.command(UserCommand::ExportDiagram {
        tab: TabId::Dependency,
    })
    .await;
    let notice = h
        .drain_ui()
        .into_iter()
        .find_map(|u| match u {
            UiUpdate::Notice(n) => Some(n),
            _ => None,
        })
        .unwrap();
    assert!(notice.starts_with("Saved "), "{notice}");
    let path = notice.trim_start_matches("Saved ");
    let svg = std::fs::read_to_string(path).unwrap();
    assert!(svg.contains(r#"width="600" height="400""#), "{svg}");

    // A second app instance over the same database sees the cached panel.
    let db = Database::open(&h.state.config.storage.db_path).unwrap();
    let (api_tx, _api_rx) = mpsc::channel(1);
    let mut restored = AppState::new(h.state.config.clone(), db, h.state.backend.clone(), api_tx);
    assert_eq!(restored.restore_from_db(), 1);
    let panel = restored.panel(TabId::Dependency).unwrap();
    assert_eq!(panel.text, "Dogs bark");
    assert_eq!(panel.status, RequestStatus::Complete);
}

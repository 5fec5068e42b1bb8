use chrono::{TimeZone, Utc};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use taskpad_core::db::open_db_in_memory;
use taskpad_core::{
    EditError, EditOp, FixedClock, GatewayConfig, NoteService, NoteServiceError, OpenAiGateway,
    RefactorScope, RewriteGateway, SqliteNoteRepository, FALLBACK_SENTINEL,
};

/// Serves exactly one HTTP response on a local port.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let header = line.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = reader.into_inner();
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });
    (endpoint, handle)
}

fn gateway_for(endpoint: String) -> OpenAiGateway {
    OpenAiGateway::new(GatewayConfig {
        api_key: Some("sk-local".to_string()),
        endpoint,
        ..GatewayConfig::default()
    })
}

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap())
}

#[test]
fn blank_service_answer_leaves_note_untouched() {
    let (endpoint, server) = serve_once("HTTP/1.1 200 OK", r#"{"choices":[{"message":{"content":""}}]}"#);
    let gateway = gateway_for(endpoint);

    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note("t", &["keep me", "b"]).unwrap();

    let op = EditOp::Refactor {
        scope: RefactorScope::Line(1),
    };
    let err = service.apply_edit(note.id, &op, &gateway).unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, NoteServiceError::Edit(EditError::EmptyRewrite)));
    let stored = service.require_note(note.id).unwrap();
    assert_eq!(stored.content, "keep me\nb");
    assert_eq!(stored.updated_at, note.updated_at);
}

#[test]
fn service_answer_is_trimmed_and_spliced() {
    let (endpoint, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"  Keep me.\n"}}]}"#,
    );
    let gateway = gateway_for(endpoint);

    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note("t", &["keep me", "b"]).unwrap();

    let op = EditOp::Refactor {
        scope: RefactorScope::Line(1),
    };
    let edited = service.apply_edit(note.id, &op, &gateway).unwrap();
    server.join().unwrap();

    assert_eq!(edited.content, "Keep me.\nb");
}

#[test]
fn null_content_maps_to_sentinel() {
    let (endpoint, server) = serve_once("HTTP/1.1 200 OK", r#"{"choices":[{"message":{"content":null}}]}"#);
    let gateway = gateway_for(endpoint);
    let reply = gateway.rewrite("hello", None);
    server.join().unwrap();
    assert_eq!(reply, FALLBACK_SENTINEL);
}

#[test]
fn error_status_maps_to_sentinel() {
    let (endpoint, server) = serve_once(
        "HTTP/1.1 500 Internal Server Error",
        r#"{"error":{"message":"boom"}}"#,
    );
    let gateway = gateway_for(endpoint);
    let reply = gateway.rewrite("hello", Some("rules"));
    server.join().unwrap();
    assert_eq!(reply, FALLBACK_SENTINEL);
}

//! `HttpPennyApi` against a throwaway local HTTP server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use pennydash_core::api::{ApiError, ErrorKind, HttpPennyApi, PennyApi};

/// Serve one canned response per entry, returning the request lines seen.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request = String::from_utf8_lossy(&buf);
            seen.push(request.lines().next().unwrap_or_default().to_string());
            let reply = format!(
                "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
        }
        seen
    });
    (base, handle)
}

const SUMMARY: &str = r#"{"totalStocks":47,"newStocksToday":5,"topGainers":[{"reddit_ticker":"ABCD","current_price":0.5,"change_pct":21.0}],"trends":{"ABCD":[{"last_updated":"2024-05-02 10:00:00","current_price":0.5},{"last_updated":"2024-05-01 10:00:00","current_price":0.4}]}}"#;

#[test]
fn summary_is_decoded_and_canonicalized() {
    let (base, server) = serve(vec![(200, SUMMARY)]);
    let api = HttpPennyApi::new(base, None).unwrap();
    let summary = api.fetch_summary().unwrap();
    assert_eq!(summary.total_stocks, 47);
    assert_eq!(summary.new_stocks_today, 5);
    let trend = summary.trend("ABCD").unwrap();
    assert_eq!(trend[0].current_price, Some(0.4));
    let seen = server.join().unwrap();
    assert_eq!(seen, vec!["GET /api/pennystocks/summary HTTP/1.1".to_string()]);
}

#[test]
fn details_sends_limit_and_include_comments() {
    let body = r#"{"totalStocks":1,"data":[{"row_id":1,"reddit_ticker":"ABCD","current_price":null}]}"#;
    let (base, server) = serve(vec![(200, body), (200, body)]);
    let api = HttpPennyApi::new(base, None).unwrap();

    let page = api.fetch_details(Some(50), false).unwrap();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].current_price, None);
    api.fetch_details(None, true).unwrap();

    let seen = server.join().unwrap();
    assert_eq!(
        seen[0],
        "GET /api/pennystocks/details?limit=50&include_comments=false HTTP/1.1"
    );
    assert_eq!(
        seen[1],
        "GET /api/pennystocks/details?include_comments=true HTTP/1.1"
    );
}

#[test]
fn count_endpoint() {
    let (base, server) = serve(vec![(200, r#"{"totalStocks":12}"#)]);
    let api = HttpPennyApi::new(base, None).unwrap();
    assert_eq!(api.fetch_count().unwrap().total_stocks, 12);
    server.join().unwrap();
}

#[test]
fn non_success_status_is_http_error() {
    let (base, server) = serve(vec![(500, r#"{"detail":"boom"}"#)]);
    let api = HttpPennyApi::new(base, None).unwrap();
    let err = api.fetch_summary().unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            endpoint: "/api/pennystocks/summary".into(),
            status: 500
        }
    );
    server.join().unwrap();
}

#[test]
fn malformed_body_is_parse_error() {
    let (base, server) = serve(vec![(200, "not json")]);
    let api = HttpPennyApi::new(base, None).unwrap();
    let err = api.fetch_count().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    server.join().unwrap();
}

#[test]
fn unreachable_host_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let api = HttpPennyApi::new(format!("http://127.0.0.1:{port}"), None).unwrap();
    let err = api.fetch_summary().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use enroll_app::Column;
use enroll_feed::Client;
use enroll_testkit::{ApplicationFaker, records_json};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn serve_once(status: u16, body: String) -> Result<(String, thread::JoinHandle<()>)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let url = format!("http://{}/applications", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/applications");
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
        request.respond(response).expect("response should succeed");
    });

    Ok((url, handle))
}

#[test]
fn fetch_returns_records_from_mock_server() -> Result<()> {
    let expected = ApplicationFaker::new(7).records(25);
    let (url, handle) = serve_once(200, records_json(&expected)?)?;

    let client = Client::new(&url, Duration::from_secs(2))?;
    let records = client.fetch_applications()?;
    assert_eq!(records, expected);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_keeps_records_with_missing_fields() -> Result<()> {
    let body = r#"[{"applicantName":"Ali Hassan","paidAmount":1200},{"studentID":"S42"}]"#;
    let (url, handle) = serve_once(200, body.to_owned())?;

    let client = Client::new(&url, Duration::from_secs(2))?;
    let records = client.fetch_applications()?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].cell_text(Column::PaidAmount), "1200");
    assert_eq!(records[1].cell_text(Column::ApplicantName), "");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn http_500_is_an_error() -> Result<()> {
    let (url, handle) = serve_once(500, "boom".to_owned())?;

    let client = Client::new(&url, Duration::from_secs(2))?;
    let error = client
        .fetch_applications()
        .expect_err("500 should fail the fetch");
    assert!(error.to_string().contains("500"), "got {error}");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_body_is_an_error() -> Result<()> {
    let (url, handle) = serve_once(200, "{not json".to_owned())?;

    let client = Client::new(&url, Duration::from_secs(2))?;
    let error = client
        .fetch_applications()
        .expect_err("malformed body should fail the fetch");
    assert!(error.to_string().contains("decode applications response"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn unreachable_host_reports_connection_error() -> Result<()> {
    let client = Client::new(
        "http://127.0.0.1:1/applications",
        Duration::from_millis(200),
    )?;
    let error = client
        .fetch_applications()
        .expect_err("fetch should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(
        message.contains("cannot reach") || message.contains("timed out"),
        "unexpected message: {message}"
    );
    Ok(())
}

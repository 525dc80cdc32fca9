//! Native client and reporter against a live server.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::{web, App, HttpResponse, HttpServer};
use ethereum_adapter::{
    AdapterClient, AdapterError, DeploySignState, EthAddress, HttpReporter, PollOptions, Report,
    ReportConfig, Reporter, Signature,
};
use ethereum_adapter_server::{configure, AdapterState};

fn spawn_server() -> SocketAddr {
    let state = web::Data::new(AdapterState::new());
    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    addr
}

fn reporter_for(addr: SocketAddr) -> HttpReporter {
    HttpReporter::new(ReportConfig {
        base_url: format!("http://{addr}"),
        ..Default::default()
    })
}

fn fast_poll() -> PollOptions {
    PollOptions {
        interval: Duration::from_millis(20),
        timeout: Duration::from_secs(5),
    }
}

#[actix_rt::test]
async fn test_login_flow() {
    let addr = spawn_server();
    let client = AdapterClient::new(&format!("http://{addr}"));

    let url = client.login().await.unwrap();
    assert_eq!(url, format!("http://{addr}/login"));
    assert_eq!(client.address().await.unwrap(), None);

    let reporter = reporter_for(addr);
    actix_rt::spawn(async move {
        actix_rt::time::sleep(Duration::from_millis(100)).await;
        reporter
            .deliver(&Report::Address(EthAddress::new("0x1")))
            .await
            .unwrap();
    });

    let address = client.wait_for_address(fast_poll()).await.unwrap();
    assert_eq!(address, EthAddress::new("0x1"));
}

#[actix_rt::test]
async fn test_sign_flow_clears_stale_signature() {
    let addr = spawn_server();
    let reporter = reporter_for(addr);
    let stale = Signature {
        by: EthAddress::new("0x1"),
        signature: "0xold".to_string(),
    };
    reporter.deliver(&Report::Signature(stale)).await.unwrap();

    let mut client = AdapterClient::new(&format!("http://{addr}"));
    let url = client.request_signature("hello\nworld").await.unwrap();
    assert!(url.ends_with("/sign?payload=hello%0Aworld"));
    assert_eq!(client.sign_state(), DeploySignState::WaitingForSignature);
    assert_eq!(client.signature().await.unwrap(), None);

    let fresh = Signature {
        by: EthAddress::new("0x1"),
        signature: "0xnew".to_string(),
    };
    reporter.deliver(&Report::Signature(fresh.clone())).await.unwrap();

    let signature = client.wait_for_signature(fast_poll()).await.unwrap();
    assert_eq!(signature, fresh);
    assert_eq!(client.sign_state(), DeploySignState::Signed);
}

#[actix_rt::test]
async fn test_wait_times_out() {
    let addr = spawn_server();
    let mut client = AdapterClient::new(&format!("http://{addr}"));
    let poll = PollOptions {
        interval: Duration::from_millis(10),
        timeout: Duration::from_millis(30),
    };

    assert!(matches!(
        client.wait_for_signature(poll).await,
        Err(AdapterError::Timeout("signature"))
    ));
    assert_eq!(client.sign_state(), DeploySignState::NotSigning);
}

#[actix_rt::test]
async fn test_wait_timeout_includes_request_time() {
    async fn slow_signature() -> HttpResponse {
        actix_rt::time::sleep(Duration::from_millis(300)).await;
        HttpResponse::Ok().json(serde_json::Value::Null)
    }

    let server =
        HttpServer::new(|| App::new().route("/signature", web::get().to(slow_signature)))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();
    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());

    let mut client = AdapterClient::new(&format!("http://{addr}"));
    let poll = PollOptions {
        interval: Duration::from_millis(10),
        timeout: Duration::from_millis(100),
    };
    let started = std::time::Instant::now();

    assert!(matches!(
        client.wait_for_signature(poll).await,
        Err(AdapterError::Timeout("signature"))
    ));
    // One slow request overruns the deadline; no further polls are made.
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[actix_rt::test]
async fn test_rejected_report_is_a_delivery_failure() {
    let addr = spawn_server();
    let reporter = reporter_for(addr);

    match reporter
        .deliver(&Report::Address(EthAddress::new("")))
        .await
    {
        Err(AdapterError::ReportDeliveryFailure { path, reason }) => {
            assert_eq!(path, "/address");
            assert!(reason.contains("400"));
        }
        other => panic!("expected ReportDeliveryFailure, got {other:?}"),
    }
}

#[actix_rt::test]
async fn test_unreachable_server_is_a_delivery_failure() {
    let reporter = HttpReporter::new(ReportConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    });

    assert!(matches!(
        reporter.deliver(&Report::Address(EthAddress::new("0x1"))).await,
        Err(AdapterError::ReportDeliveryFailure { .. })
    ));
}

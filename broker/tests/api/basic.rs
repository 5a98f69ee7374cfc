use futures_util::{SinkExt as _, StreamExt as _};

use crate::helper::TestApp;
use signaling::{ws, Connection};

#[actix_web::test]
async fn health_check_works_on_both_endpoints() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    for port in [app.robot_port, app.client_port] {
        let response = client
            .get(format!("http://{}:{}/health_check", &app.address, port))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(response.status(), 200);
    }
}

#[actix_web::test]
async fn robot_channel_answers_ping_with_pong() -> anyhow::Result<()> {
    let app = TestApp::spawn().await;
    let (_res, mut ws) = Connection::connect_raw(&app.robot_url()).await?;

    ws.send(ws::Message::Ping(actix_web::web::Bytes::new()))
        .await
        .unwrap();

    let mut got_pong = false;
    if let Some(msg) = ws.next().await {
        if let Ok(ws::Frame::Pong(_)) = msg {
            got_pong = true;
        }
    }
    assert!(got_pong);
    Ok(())
}

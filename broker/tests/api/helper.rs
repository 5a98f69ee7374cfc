use std::time::Duration;

use once_cell::sync::Lazy;

use broker::{
    application::Application,
    settings::{EndpointSettings, Settings},
};
use signaling::{ClientLink, RobotLink};

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "debug")
    }
    tracing_subscriber::fmt::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
});

pub struct TestApp {
    pub address: String,
    pub robot_port: u16,
    pub client_port: u16,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Lazy::force(&TRACING);

        let settings = Settings {
            robot: EndpointSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            client: EndpointSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
        };
        let app = Application::build(settings)
            .await
            .expect("Failed to build application");
        let robot_port = app.robot_port();
        let client_port = app.client_port();
        let _ = tokio::spawn(app.run_until_stopped());
        Self {
            address: "127.0.0.1".to_string(),
            robot_port,
            client_port,
        }
    }

    pub fn robot_url(&self) -> String {
        format!("ws://{}:{}/", &self.address, self.robot_port)
    }

    pub fn client_url(&self) -> String {
        format!("ws://{}:{}/", &self.address, self.client_port)
    }

    pub async fn robot(&self) -> RobotLink {
        RobotLink::connect(&self.robot_url())
            .await
            .expect("Failed to connect robot channel")
    }

    pub async fn client(&self) -> ClientLink {
        let mut link = ClientLink::connect(&self.client_url())
            .await
            .expect("Failed to connect client channel");
        // One round trip so the broker has attached this connection
        // before the test triggers any robot-originated events.
        link.robots().await.expect("Failed initial getRobots");
        link
    }
}

/// Asserts that no message arrives on the given future within a grace
/// period. Used for the "no notification, no fault" properties.
pub async fn assert_silent<T: std::fmt::Debug>(
    future: impl std::future::Future<Output = anyhow::Result<T>>,
) {
    match tokio::time::timeout(Duration::from_millis(250), future).await {
        Err(_elapsed) => {}
        Ok(msg) => panic!("Expected silence, got {msg:?}"),
    }
}

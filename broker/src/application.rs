use std::net::TcpListener;

use actix::{Actor, Addr};
use actix_web::{dev::Server, web, App, HttpServer};
use anyhow::Context as _;
use tracing::info;

use crate::settings::Settings;

use self::broker::Broker;

mod broker;
mod client;
mod registry;
mod robot;
mod services;
use services::{client_channel, health_check, robot_channel};

/// The two role-specific websocket endpoints, sharing one broker actor.
pub struct Application {
    robot_port: u16,
    client_port: u16,
    robot_server: Server,
    client_server: Server,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, anyhow::Error> {
        let robot_listener = TcpListener::bind(format!(
            "{}:{}",
            settings.robot.host, settings.robot.port
        ))
        .context("Failed to bind robot endpoint")?;
        let client_listener = TcpListener::bind(format!(
            "{}:{}",
            settings.client.host, settings.client.port
        ))
        .context("Failed to bind client endpoint")?;
        let robot_port = robot_listener.local_addr()?.port();
        let client_port = client_listener.local_addr()?.port();
        info!("Robot endpoint on port {robot_port}, client endpoint on port {client_port}");

        let broker = Broker::default().start();
        let (robot_server, client_server) =
            create_servers(robot_listener, client_listener, broker)?;
        Ok(Self {
            robot_port,
            client_port,
            robot_server,
            client_server,
        })
    }

    pub fn robot_port(&self) -> u16 {
        self.robot_port
    }

    pub fn client_port(&self) -> u16 {
        self.client_port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tokio::try_join!(self.robot_server, self.client_server)?;
        Ok(())
    }
}

pub fn create_servers(
    robot_listener: TcpListener,
    client_listener: TcpListener,
    broker: Addr<Broker>,
) -> Result<(Server, Server), anyhow::Error> {
    let broker = web::Data::new(broker);
    let robot_server = {
        let broker = broker.clone();
        HttpServer::new(move || {
            App::new()
                .app_data(broker.clone())
                .service(health_check)
                .service(robot_channel)
        })
        .listen(robot_listener)?
        .run()
    };
    let client_server = HttpServer::new(move || {
        App::new()
            .app_data(broker.clone())
            .service(health_check)
            .service(client_channel)
    })
    .listen(client_listener)?
    .run();
    Ok((robot_server, client_server))
}

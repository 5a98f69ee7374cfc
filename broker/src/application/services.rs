use actix::Addr;
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;

use super::{broker::Broker, client::WsClient, robot::WsRobot};

#[get("/health_check")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[get("/")]
async fn robot_channel(
    req: HttpRequest,
    stream: web::Payload,
    broker: web::Data<Addr<Broker>>,
) -> Result<HttpResponse, Error> {
    ws::start(WsRobot::new(broker.get_ref().clone()), &req, stream)
}

#[get("/")]
async fn client_channel(
    req: HttpRequest,
    stream: web::Payload,
    broker: web::Data<Addr<Broker>>,
) -> Result<HttpResponse, Error> {
    ws::start(WsClient::new(broker.get_ref().clone()), &req, stream)
}

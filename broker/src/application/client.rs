use actix::prelude::*;
use actix_web_actors::ws;
use tracing::{error, warn};

use signaling::message::{ClientEvent, ClientRequest};

use super::broker::{AttachClient, Broker, ClientCandidate, ClientPush, ListRobots, SetAnswer};

/// Websocket actor for the client controller. The broker tracks only
/// the most recently attached client; on disconnect the stale reference
/// stays in place (pushes to it are dropped) until a new client
/// attaches. No robot state is torn down when the client goes away.
pub struct WsClient {
    broker: Addr<Broker>,
}

impl WsClient {
    pub fn new(broker: Addr<Broker>) -> Self {
        Self { broker }
    }

    fn handle_request(&mut self, request: ClientRequest, ctx: &mut ws::WebsocketContext<Self>) {
        match request {
            ClientRequest::GetRobots => {
                self.broker
                    .send(ListRobots)
                    .into_actor(self)
                    .then(|res, _, ctx| {
                        match res {
                            Ok(robots) => ctx.text(
                                serde_json::to_string(&ClientEvent::Robots { robots }).unwrap(),
                            ),
                            Err(e) => {
                                error!(?e);
                                ctx.stop();
                            }
                        }
                        fut::ready(())
                    })
                    .wait(ctx);
            }
            ClientRequest::Answer {
                robot_id,
                sdp_answer,
            } => self.broker.do_send(SetAnswer {
                robot_id,
                sdp_answer,
            }),
            ClientRequest::Candidate {
                robot_id,
                candidate,
            } => self.broker.do_send(ClientCandidate {
                robot_id,
                candidate,
            }),
            ClientRequest::Unrecognized => {
                warn!("Received non-compliant message type on client channel")
            }
        }
    }
}

impl Actor for WsClient {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.broker.do_send(AttachClient {
            addr: ctx.address().recipient(),
        });
    }
}

impl Handler<ClientPush> for WsClient {
    type Result = ();

    fn handle(&mut self, msg: ClientPush, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(serde_json::to_string(&msg.0).unwrap());
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsClient {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<ClientRequest>(&text) {
                Ok(request) => self.handle_request(request, ctx),
                Err(e) => warn!("Dropping malformed client message: {e}"),
            },
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Binary(_)) => warn!("Ignoring binary frame on client channel"),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {}
            Err(e) => {
                error!(?e);
                ctx.stop();
            }
        }
    }
}

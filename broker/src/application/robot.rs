use actix::prelude::*;
use actix_web_actors::ws;
use tracing::{error, warn};

use signaling::message::{RobotEvent, RobotId, RobotRequest};

use super::broker::{
    Broker, DeregisterRobot, RegisterRobot, RobotCandidate, RobotDisconnected, RobotPush,
    UpdateOffer,
};

/// Websocket actor for one robot channel. Holds the channel's side of
/// the id binding; the broker holds the id-to-channel side.
pub struct WsRobot {
    robot_id: Option<RobotId>,
    broker: Addr<Broker>,
}

impl WsRobot {
    pub fn new(broker: Addr<Broker>) -> Self {
        Self {
            robot_id: None,
            broker,
        }
    }

    fn handle_request(&mut self, request: RobotRequest, ctx: &mut ws::WebsocketContext<Self>) {
        match request {
            RobotRequest::Register { name, sdp_offer } => {
                // Wait for the assigned id before touching the next
                // inbound frame: the registered reply must reach the
                // robot before anything referencing the id is handled.
                self.broker
                    .send(RegisterRobot {
                        name,
                        sdp_offer,
                        addr: ctx.address().recipient(),
                    })
                    .into_actor(self)
                    .then(|res, act, ctx| {
                        match res {
                            Ok(robot_id) => {
                                act.robot_id = Some(robot_id);
                                ctx.text(
                                    serde_json::to_string(&RobotEvent::Registered { robot_id })
                                        .unwrap(),
                                );
                            }
                            Err(e) => {
                                error!(?e);
                                ctx.stop();
                            }
                        }
                        fut::ready(())
                    })
                    .wait(ctx);
            }
            RobotRequest::Offer {
                robot_id,
                sdp_offer,
            } => self.broker.do_send(UpdateOffer {
                robot_id,
                sdp_offer,
            }),
            RobotRequest::Candidate {
                robot_id,
                candidate,
            } => self.broker.do_send(RobotCandidate {
                robot_id,
                candidate,
            }),
            RobotRequest::Deregister { robot_id } => {
                if self.robot_id == Some(robot_id) {
                    self.robot_id = None;
                }
                self.broker.do_send(DeregisterRobot { robot_id });
            }
            RobotRequest::Unrecognized => {
                warn!("Received non-compliant message type on robot channel")
            }
        }
    }
}

impl Actor for WsRobot {
    type Context = ws::WebsocketContext<Self>;

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        if let Some(robot_id) = self.robot_id {
            self.broker.do_send(RobotDisconnected { robot_id });
        }
        Running::Stop
    }
}

impl Handler<RobotPush> for WsRobot {
    type Result = ();

    fn handle(&mut self, msg: RobotPush, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(serde_json::to_string(&msg.0).unwrap());
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsRobot {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<RobotRequest>(&text) {
                Ok(request) => self.handle_request(request, ctx),
                Err(e) => warn!("Dropping malformed robot message: {e}"),
            },
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Binary(_)) => warn!("Ignoring binary frame on robot channel"),
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

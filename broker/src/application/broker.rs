use std::collections::HashMap;

use actix::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use signaling::message::{ClientEvent, Robot, RobotEvent, RobotId};

use super::registry::Registry;

/// Server-to-robot push, delivered to that robot's websocket actor.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RobotPush(pub RobotEvent);

/// Server-to-client push, delivered to the current client's websocket actor.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientPush(pub ClientEvent);

#[derive(Message)]
#[rtype(result = "RobotId")]
pub struct RegisterRobot {
    pub name: String,
    pub sdp_offer: Option<Value>,
    pub addr: Recipient<RobotPush>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct UpdateOffer {
    pub robot_id: RobotId,
    pub sdp_offer: Value,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RobotCandidate {
    pub robot_id: RobotId,
    pub candidate: Value,
}

/// Explicit deregistration requested on the robot channel.
#[derive(Message)]
#[rtype(result = "()")]
pub struct DeregisterRobot {
    pub robot_id: RobotId,
}

/// A bound robot channel closed without deregistering first.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RobotDisconnected {
    pub robot_id: RobotId,
}

/// Makes the sender the sole target of client-bound notifications,
/// replacing any previous client connection.
#[derive(Message)]
#[rtype(result = "()")]
pub struct AttachClient {
    pub addr: Recipient<ClientPush>,
}

#[derive(Message)]
#[rtype(result = "Vec<Robot>")]
pub struct ListRobots;

#[derive(Message)]
#[rtype(result = "()")]
pub struct SetAnswer {
    pub robot_id: RobotId,
    pub sdp_answer: Value,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientCandidate {
    pub robot_id: RobotId,
    pub candidate: Value,
}

/// Live channel bindings and the fan-out rules. A robot binding exists
/// exactly as long as its registry entry; both are updated in the same
/// broker handler. Pushes are fire-and-forget: an absent or dead target
/// drops the event without retry or buffering.
#[derive(Default)]
struct Links {
    robots: HashMap<RobotId, Recipient<RobotPush>>,
    client: Option<Recipient<ClientPush>>,
}

impl Links {
    fn bind(&mut self, id: RobotId, addr: Recipient<RobotPush>) {
        self.robots.insert(id, addr);
    }

    fn unbind(&mut self, id: RobotId) {
        self.robots.remove(&id);
    }

    fn attach_client(&mut self, addr: Recipient<ClientPush>) {
        self.client = Some(addr);
    }

    fn notify_robot(&self, id: RobotId, event: RobotEvent) {
        match self.robots.get(&id) {
            Some(addr) => {
                let _ = addr.do_send(RobotPush(event));
            }
            None => debug!("No live channel for robot {id}, dropping notification"),
        }
    }

    fn notify_client(&self, event: ClientEvent) {
        match &self.client {
            Some(client) => {
                let _ = client.do_send(ClientPush(event));
            }
            None => debug!("No client connected, dropping notification"),
        }
    }
}

/// The single actor through which every registry and binding mutation
/// flows. Its mailbox serializes events from both endpoints, so each
/// message is handled to completion before the next one.
#[derive(Default)]
pub struct Broker {
    registry: Registry,
    links: Links,
}

impl Actor for Broker {
    type Context = Context<Self>;
}

impl Handler<RegisterRobot> for Broker {
    type Result = MessageResult<RegisterRobot>;

    fn handle(&mut self, msg: RegisterRobot, _: &mut Self::Context) -> Self::Result {
        let robot = self.registry.register(msg.name, msg.sdp_offer);
        let robot_id = robot.id;
        self.links.bind(robot_id, msg.addr);
        self.links.notify_client(ClientEvent::Register { robot });
        info!("Robot {robot_id} registered");
        MessageResult(robot_id)
    }
}

impl Handler<UpdateOffer> for Broker {
    type Result = ();

    fn handle(&mut self, msg: UpdateOffer, _: &mut Self::Context) -> Self::Result {
        if self.registry.set_offer(msg.robot_id, msg.sdp_offer.clone()) {
            self.links.notify_client(ClientEvent::Offer {
                robot_id: msg.robot_id,
                sdp_offer: msg.sdp_offer,
            });
            info!("Robot {} updated its SDP offer", msg.robot_id);
        }
    }
}

impl Handler<RobotCandidate> for Broker {
    type Result = ();

    fn handle(&mut self, msg: RobotCandidate, _: &mut Self::Context) -> Self::Result {
        if self.registry.push_robot_candidate(msg.robot_id, msg.candidate.clone()) {
            self.links.notify_client(ClientEvent::Candidate {
                robot_id: msg.robot_id,
                candidate: msg.candidate,
            });
            debug!("Stored ICE candidate from robot {}", msg.robot_id);
        }
    }
}

impl Handler<DeregisterRobot> for Broker {
    type Result = ();

    fn handle(&mut self, msg: DeregisterRobot, _: &mut Self::Context) -> Self::Result {
        if self.registry.remove(msg.robot_id).is_some() {
            self.links.unbind(msg.robot_id);
            self.links.notify_client(ClientEvent::Deregister {
                robot_id: msg.robot_id,
            });
            info!("Robot {} deregistered", msg.robot_id);
        }
    }
}

impl Handler<RobotDisconnected> for Broker {
    type Result = ();

    fn handle(&mut self, msg: RobotDisconnected, _: &mut Self::Context) -> Self::Result {
        // No-op when the robot already deregistered explicitly, so the
        // client sees exactly one removal notification per id.
        if self.registry.remove(msg.robot_id).is_some() {
            self.links.unbind(msg.robot_id);
            self.links.notify_client(ClientEvent::Deregistered {
                robot_id: msg.robot_id,
            });
            info!("Robot {} disconnected and removed", msg.robot_id);
        }
    }
}

impl Handler<AttachClient> for Broker {
    type Result = ();

    fn handle(&mut self, msg: AttachClient, _: &mut Self::Context) -> Self::Result {
        self.links.attach_client(msg.addr);
        info!("Client connected");
    }
}

impl Handler<ListRobots> for Broker {
    type Result = MessageResult<ListRobots>;

    fn handle(&mut self, _: ListRobots, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.registry.list())
    }
}

impl Handler<SetAnswer> for Broker {
    type Result = ();

    fn handle(&mut self, msg: SetAnswer, _: &mut Self::Context) -> Self::Result {
        if self.registry.set_answer(msg.robot_id, msg.sdp_answer.clone()) {
            self.links.notify_robot(
                msg.robot_id,
                RobotEvent::SdpAnswer {
                    sdp_answer: msg.sdp_answer,
                },
            );
            info!("Received SDP answer for robot {}", msg.robot_id);
        }
    }
}

impl Handler<ClientCandidate> for Broker {
    type Result = ();

    fn handle(&mut self, msg: ClientCandidate, _: &mut Self::Context) -> Self::Result {
        if self.registry.push_client_candidate(msg.robot_id, msg.candidate.clone()) {
            self.links.notify_robot(
                msg.robot_id,
                RobotEvent::Candidate {
                    candidate: msg.candidate,
                },
            );
            debug!("Stored ICE candidate for robot {}", msg.robot_id);
        }
    }
}

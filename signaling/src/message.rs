use std::fmt;

use serde_json::Value;

/// Identifier assigned to a robot at registration. Monotonically
/// increasing within a broker process, never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RobotId(pub u64);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One negotiable robot endpoint as tracked by the broker. SDP and
/// candidate payloads are routed verbatim and never inspected, hence
/// `serde_json::Value`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Robot {
    pub id: RobotId,
    pub name: String,
    pub sdp_offer: Option<Value>,
    pub sdp_answer: Option<Value>,
    pub robot_candidates: Vec<Value>,
    pub client_candidates: Vec<Value>,
}

/// Messages a robot may send on its channel.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RobotRequest {
    Register {
        name: String,
        #[serde(default)]
        sdp_offer: Option<Value>,
    },
    Offer {
        robot_id: RobotId,
        sdp_offer: Value,
    },
    Candidate {
        robot_id: RobotId,
        candidate: Value,
    },
    Deregister {
        robot_id: RobotId,
    },
    #[serde(other)]
    Unrecognized,
}

/// Messages the broker sends to a robot. `SdpAnswer` and `Candidate`
/// carry no robot id: they only ever travel on that robot's own channel.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RobotEvent {
    Registered { robot_id: RobotId },
    SdpAnswer { sdp_answer: Value },
    Candidate { candidate: Value },
}

/// Messages the client controller may send on its channel.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientRequest {
    GetRobots,
    Answer {
        robot_id: RobotId,
        sdp_answer: Value,
    },
    Candidate {
        robot_id: RobotId,
        candidate: Value,
    },
    #[serde(other)]
    Unrecognized,
}

/// Messages the broker sends to the client. `Deregister` acknowledges
/// an explicit robot deregistration, `Deregistered` reports a robot
/// channel closing; both mean the same removal.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    Robots { robots: Vec<Robot> },
    Register { robot: Robot },
    Offer { robot_id: RobotId, sdp_offer: Value },
    Candidate { robot_id: RobotId, candidate: Value },
    Deregister { robot_id: RobotId },
    Deregistered { robot_id: RobotId },
}

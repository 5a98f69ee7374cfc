use serde_json::Value;

use signaling::message::{Robot, RobotId};

/// In-memory registry of currently-connectable robots, in registration
/// order. Ids come from a counter seeded at process start and are never
/// reused, even after removal. Mutations for unknown ids are silent
/// no-ops; callers use the returned flag to decide whether to fan out.
#[derive(Debug, Default)]
pub struct Registry {
    robots: Vec<Robot>,
    next_id: u64,
}

impl Registry {
    /// Allocates the next id and inserts a fresh record. Never fails.
    pub fn register(&mut self, name: String, sdp_offer: Option<Value>) -> Robot {
        let id = RobotId(self.next_id);
        self.next_id += 1;
        let robot = Robot {
            id,
            name,
            sdp_offer,
            sdp_answer: None,
            robot_candidates: Vec::new(),
            client_candidates: Vec::new(),
        };
        self.robots.push(robot.clone());
        robot
    }

    fn find_mut(&mut self, id: RobotId) -> Option<&mut Robot> {
        self.robots.iter_mut().find(|robot| robot.id == id)
    }

    pub fn set_offer(&mut self, id: RobotId, sdp_offer: Value) -> bool {
        match self.find_mut(id) {
            Some(robot) => {
                robot.sdp_offer = Some(sdp_offer);
                true
            }
            None => false,
        }
    }

    pub fn set_answer(&mut self, id: RobotId, sdp_answer: Value) -> bool {
        match self.find_mut(id) {
            Some(robot) => {
                robot.sdp_answer = Some(sdp_answer);
                true
            }
            None => false,
        }
    }

    pub fn push_robot_candidate(&mut self, id: RobotId, candidate: Value) -> bool {
        match self.find_mut(id) {
            Some(robot) => {
                robot.robot_candidates.push(candidate);
                true
            }
            None => false,
        }
    }

    pub fn push_client_candidate(&mut self, id: RobotId, candidate: Value) -> bool {
        match self.find_mut(id) {
            Some(robot) => {
                robot.client_candidates.push(candidate);
                true
            }
            None => false,
        }
    }

    /// Removes the robot and returns its record, or `None` if it was
    /// already gone. Removal drops all accumulated negotiation state.
    pub fn remove(&mut self, id: RobotId) -> Option<Robot> {
        let index = self.robots.iter().position(|robot| robot.id == id)?;
        Some(self.robots.remove(index))
    }

    /// Snapshot of all current robots in registration order.
    pub fn list(&self) -> Vec<Robot> {
        self.robots.clone()
    }
}

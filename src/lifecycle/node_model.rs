// Startup model of the managed node's lifecycle
//
// Replays scheduled requests against the states the driver goes through so
// the launcher can warn about sequences the node will reject. The launcher
// never blocks on the outcome; the driver remains the authority.

use serde::Serialize;
use statig::prelude::*;

use super::orchestrator::{LifecycleState, TransitionKind, TransitionRequest};

/// A request the node would refuse from its current state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedTransition {
    pub kind: TransitionKind,
    pub from: LifecycleState,
}

/// Outcome of replaying a request sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub final_state: LifecycleState,
    pub accepted: Vec<TransitionKind>,
    pub rejected: Vec<RejectedTransition>,
}

impl SimulationReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug)]
pub struct NodeModel {
    current: LifecycleState,
    accepted: Vec<TransitionKind>,
    rejected: Vec<RejectedTransition>,
}

impl Default for NodeModel {
    fn default() -> Self {
        Self {
            current: LifecycleState::Unconfigured,
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl NodeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> LifecycleState {
        self.current
    }

    fn accept(&mut self, kind: TransitionKind) {
        self.current = kind.goal_state();
        self.accepted.push(kind);
    }

    fn reject(&mut self, kind: TransitionKind) {
        tracing::debug!(transition = %kind, state = %self.current, "Node would reject transition");
        self.rejected.push(RejectedTransition {
            kind,
            from: self.current,
        });
    }

    fn report(&self) -> SimulationReport {
        SimulationReport {
            final_state: self.current,
            accepted: self.accepted.clone(),
            rejected: self.rejected.clone(),
        }
    }
}

#[state_machine(initial = "State::unconfigured()")]
impl NodeModel {
    #[state]
    fn unconfigured(&mut self, event: &TransitionKind) -> Outcome<State> {
        match event {
            TransitionKind::Configure => {
                self.accept(*event);
                Transition(State::inactive())
            }
            TransitionKind::Activate => {
                self.reject(*event);
                Handled
            }
        }
    }

    #[state]
    fn inactive(&mut self, event: &TransitionKind) -> Outcome<State> {
        match event {
            TransitionKind::Activate => {
                self.accept(*event);
                Transition(State::active())
            }
            TransitionKind::Configure => {
                self.reject(*event);
                Handled
            }
        }
    }

    #[state]
    fn active(&mut self, event: &TransitionKind) -> Outcome<State> {
        self.reject(*event);
        Handled
    }
}

/// Replay requests, in order, against a freshly declared node.
pub fn simulate(requests: &[TransitionRequest]) -> SimulationReport {
    let mut sm = NodeModel::new().state_machine();
    for request in requests {
        sm.handle(&request.kind);
    }
    sm.report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{schedule_transitions, NodeHandle, TransitionIntent};

    fn requests(configure: bool, activate: bool) -> Vec<TransitionRequest> {
        schedule_transitions(
            &NodeHandle::new("microstrain_inertial_driver", "/"),
            TransitionIntent::new(configure, activate),
        )
    }

    #[test]
    fn test_configure_then_activate_reaches_active() {
        let report = simulate(&requests(true, true));
        assert!(report.is_clean());
        assert_eq!(report.final_state, LifecycleState::Active);
        assert_eq!(
            report.accepted,
            vec![TransitionKind::Configure, TransitionKind::Activate]
        );
    }

    #[test]
    fn test_configure_only_stops_inactive() {
        let report = simulate(&requests(true, false));
        assert!(report.is_clean());
        assert_eq!(report.final_state, LifecycleState::Inactive);
    }

    #[test]
    fn test_activate_without_configure_rejected() {
        let report = simulate(&requests(false, true));
        assert_eq!(report.final_state, LifecycleState::Unconfigured);
        assert_eq!(
            report.rejected,
            vec![RejectedTransition {
                kind: TransitionKind::Activate,
                from: LifecycleState::Unconfigured,
            }]
        );
    }

    #[test]
    fn test_no_requests_stays_unconfigured() {
        let report = simulate(&[]);
        assert!(report.is_clean());
        assert_eq!(report.final_state, LifecycleState::Unconfigured);
        assert!(report.accepted.is_empty());
    }

    #[test]
    fn test_repeated_configure_rejected() {
        let handle = NodeHandle::new("imu", "/");
        let configure = TransitionRequest {
            target: handle,
            kind: TransitionKind::Configure,
        };
        let report = simulate(&[configure.clone(), configure]);
        assert_eq!(report.final_state, LifecycleState::Inactive);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].from, LifecycleState::Inactive);
    }
}

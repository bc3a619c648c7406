// Lifecycle Transition Orchestrator
//
// Decides which startup transitions to request against the declared node.
// Pure decision logic; realizing the requests belongs to the host engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Startup states of a managed lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Unconfigured,
    Inactive,
    Active,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleState::Unconfigured => "unconfigured",
            LifecycleState::Inactive => "inactive",
            LifecycleState::Active => "active",
        };
        f.write_str(label)
    }
}

/// Transitions the orchestrator may request. Deactivate, cleanup and shutdown
/// are never part of startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Configure,
    Activate,
}

impl TransitionKind {
    /// Numeric id of the transition in the ROS lifecycle message set
    pub fn transition_id(&self) -> u8 {
        match self {
            TransitionKind::Configure => 1,
            TransitionKind::Activate => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransitionKind::Configure => "configure",
            TransitionKind::Activate => "activate",
        }
    }

    /// State the node must be in for the transition to be accepted
    pub fn start_state(&self) -> LifecycleState {
        match self {
            TransitionKind::Configure => LifecycleState::Unconfigured,
            TransitionKind::Activate => LifecycleState::Inactive,
        }
    }

    pub fn goal_state(&self) -> LifecycleState {
        match self {
            TransitionKind::Configure => LifecycleState::Inactive,
            TransitionKind::Activate => LifecycleState::Active,
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether to configure and/or activate the node right after it is declared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionIntent {
    pub configure: bool,
    pub activate: bool,
}

impl TransitionIntent {
    pub fn new(configure: bool, activate: bool) -> Self {
        Self { configure, activate }
    }

    /// Resolve the intent from textual launch flags. A flag is set only when
    /// it equals the literal `true`.
    pub fn from_launch_flags(configure: &str, activate: &str) -> Self {
        Self {
            configure: configure == "true",
            activate: activate == "true",
        }
    }
}

/// Opaque reference to the declared node, used only to address requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(String);

impl NodeHandle {
    pub fn new(name: &str, namespace: &str) -> Self {
        let namespace = namespace.trim_end_matches('/');
        let qualified = if namespace.is_empty() {
            format!("/{name}")
        } else if namespace.starts_with('/') {
            format!("{namespace}/{name}")
        } else {
            format!("/{namespace}/{name}")
        };
        Self(qualified)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request to move the target node through one lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub target: NodeHandle,
    pub kind: TransitionKind,
}

/// Decide the ordered transitions for an intent.
///
/// Configure is emitted iff `configure`, Activate iff `activate`, and
/// Configure always comes first. Activate without Configure is passed through
/// unchanged; the node rejects it if it was never configured.
pub fn plan_transitions(intent: TransitionIntent) -> Vec<TransitionKind> {
    let mut plan = Vec::with_capacity(2);
    if intent.configure {
        plan.push(TransitionKind::Configure);
    }
    if intent.activate {
        plan.push(TransitionKind::Activate);
    }
    plan
}

/// Bind the planned transitions to the declared node.
pub fn schedule_transitions(target: &NodeHandle, intent: TransitionIntent) -> Vec<TransitionRequest> {
    let requests: Vec<TransitionRequest> = plan_transitions(intent)
        .into_iter()
        .map(|kind| TransitionRequest {
            target: target.clone(),
            kind,
        })
        .collect();

    tracing::debug!(
        node = %target,
        configure = intent.configure,
        activate = intent.activate,
        scheduled = requests.len(),
        "Scheduled startup transitions"
    );
    requests
}

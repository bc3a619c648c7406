// Lifecycle Module - startup transitions for the managed driver node
//
// The orchestrator plans Configure/Activate requests; the node model replays
// them to flag sequences the driver will refuse.

pub mod node_model;
pub mod orchestrator;

pub use node_model::{simulate, NodeModel, RejectedTransition, SimulationReport};
pub use orchestrator::{
    plan_transitions, schedule_transitions, LifecycleState, NodeHandle, TransitionIntent,
    TransitionKind, TransitionRequest,
};

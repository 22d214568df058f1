pub mod engine;
pub mod states;

pub use engine::{FlowDefinition, StagedFlow, TransitionError, TransitionGraph, WorkflowEngine};
pub use states::{ApprovalAction, TransitionOutcome};

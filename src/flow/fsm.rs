use crate::{Error, Result};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Pending,
    Validating,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    ModelResponded,
    ModelFailed,
    ReplyAccepted,
    ReplyRejected,
}

/// Single-shot lifecycle of one flow invocation. Terminal states never
/// transition again.
pub struct FlowStateMachine {
    flow: &'static str,
    state: FlowState,
}

impl FlowStateMachine {
    pub fn new(flow: &'static str) -> Self {
        debug!("🚀 Starting flow '{}'", flow);
        Self {
            flow,
            state: FlowState::Pending,
        }
    }

    pub fn current_state(&self) -> FlowState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, FlowState::Done | FlowState::Failed)
    }

    pub fn transition(&mut self, event: FlowEvent) -> Result<()> {
        let new_state = match (self.state, event) {
            (FlowState::Pending, FlowEvent::ModelResponded) => FlowState::Validating,
            (FlowState::Pending, FlowEvent::ModelFailed) => FlowState::Failed,
            (FlowState::Validating, FlowEvent::ReplyAccepted) => FlowState::Done,
            (FlowState::Validating, FlowEvent::ReplyRejected) => FlowState::Failed,
            _ => {
                warn!(
                    "❌ Invalid transition in flow '{}' from {:?} with event {:?}",
                    self.flow, self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        info!(
            "🎯 Flow '{}': {:?} -> {:?} (event: {:?})",
            self.flow, self.state, new_state, event
        );
        self.state = new_state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_happy_path() {
        let mut fsm = FlowStateMachine::new("test");
        assert_eq!(fsm.current_state(), FlowState::Pending);
        assert!(!fsm.is_terminal());

        fsm.transition(FlowEvent::ModelResponded).unwrap();
        assert_eq!(fsm.current_state(), FlowState::Validating);

        fsm.transition(FlowEvent::ReplyAccepted).unwrap();
        assert_eq!(fsm.current_state(), FlowState::Done);
        assert!(fsm.is_terminal());
    }

    #[rstest]
    #[case(&[FlowEvent::ModelFailed])]
    #[case(&[FlowEvent::ModelResponded, FlowEvent::ReplyRejected])]
    fn test_failure_paths(#[case] events: &[FlowEvent]) {
        let mut fsm = FlowStateMachine::new("test");
        for event in events {
            fsm.transition(*event).unwrap();
        }
        assert_eq!(fsm.current_state(), FlowState::Failed);
        assert!(fsm.is_terminal());
    }

    #[rstest]
    #[case(&[FlowEvent::ReplyAccepted])]
    #[case(&[FlowEvent::ModelResponded, FlowEvent::ModelResponded])]
    #[case(&[FlowEvent::ModelFailed, FlowEvent::ModelResponded])]
    fn test_invalid_transitions(#[case] events: &[FlowEvent]) {
        let mut fsm = FlowStateMachine::new("test");
        let (last, prefix) = events.split_last().unwrap();
        for event in prefix {
            fsm.transition(*event).unwrap();
        }
        let before = fsm.current_state();
        let err = fsm.transition(*last).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert_eq!(fsm.current_state(), before);
    }
}

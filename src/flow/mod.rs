//! Single-shot flows: render a prompt, call the model once, validate the
//! reply against the output contract. No retries and no partial results.

pub mod fsm;
mod generate;
mod improve;

pub use fsm::{FlowEvent, FlowState, FlowStateMachine};
pub use generate::GenerationFlow;
pub use improve::RefinementFlow;

use crate::{
    Error, Result,
    llm::{ModelClient, ModelRequest},
    recipe::{Contract, RenderedPrompt},
};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{error, info};

async fn run_flow<T: DeserializeOwned>(
    model: &dyn ModelClient,
    flow: &'static str,
    output: &Contract,
    prompt: RenderedPrompt,
) -> Result<T> {
    let mut fsm = FlowStateMachine::new(flow);
    let request = ModelRequest {
        prompt,
        output: output.into(),
    };

    let started = Instant::now();
    let reply = match model.generate(request).await {
        Ok(reply) => {
            info!("✅ Model replied to '{}' in {:?}", flow, started.elapsed());
            fsm.transition(FlowEvent::ModelResponded)?;
            reply
        }
        Err(e) => {
            error!("❌ Model call for '{}' failed: {}", flow, e);
            fsm.transition(FlowEvent::ModelFailed)?;
            return Err(match e {
                Error::ModelUnavailable(_) => e,
                other => Error::model_unavailable(other.to_string()),
            });
        }
    };

    match output.decode::<T>(&reply.raw_output) {
        Ok(value) => {
            fsm.transition(FlowEvent::ReplyAccepted)?;
            Ok(value)
        }
        Err(e) => {
            fsm.transition(FlowEvent::ReplyRejected)?;
            Err(e)
        }
    }
}

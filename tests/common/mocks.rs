use async_trait::async_trait;
use snap_recipe::{
    Error, Result,
    llm::{ModelClient, ModelReply, ModelRequest},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock model for testing. Replies are handed out in order; an optional gate
/// holds every call until the test releases it.
#[derive(Debug, Default)]
pub struct MockModelClient {
    pub replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    pub requests: Mutex<Vec<ModelRequest>>,
    pub gate: Option<Arc<Notify>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, raw_output: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(raw_output.to_string()));
        self
    }

    pub fn with_error(self, error: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(error.to_string()));
        self
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, request: ModelRequest) -> Result<ModelReply> {
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(raw_output)) => Ok(ModelReply::new(raw_output)),
            Some(Err(error)) => Err(Error::model_unavailable(error)),
            None => Err(Error::model_unavailable("No more mock replies available")),
        }
    }
}

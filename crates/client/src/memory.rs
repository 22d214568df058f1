use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{ApiRequest, ApiResponse, ApiTransport, TransportError};

/// Scripted transport: replays queued responses in order and records every
/// request it receives. Used by tests and dry runs; no network involved.
#[derive(Default)]
pub struct InMemoryTransport {
    state: Mutex<ScriptedState>,
}

#[derive(Default)]
struct ScriptedState {
    responses: VecDeque<Result<ApiResponse, TransportError>>,
    requests: Vec<ApiRequest>,
}

impl InMemoryTransport {
    pub fn with_script(responses: Vec<Result<ApiResponse, TransportError>>) -> Self {
        Self { state: Mutex::new(ScriptedState { responses: responses.into(), requests: Vec::new() }) }
    }

    pub fn push(&self, response: Result<ApiResponse, TransportError>) {
        self.with_state(|state| state.responses.push_back(response));
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push(Ok(ApiResponse::json(status, &body)));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.with_state(|state| state.requests.clone())
    }

    pub fn remaining(&self) -> usize {
        self.with_state(|state| state.responses.len())
    }

    fn with_state<T>(&self, apply: impl FnOnce(&mut ScriptedState) -> T) -> T {
        match self.state.lock() {
            Ok(mut state) => apply(&mut state),
            Err(poisoned) => apply(&mut poisoned.into_inner()),
        }
    }
}

#[async_trait]
impl ApiTransport for InMemoryTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.with_state(|state| {
            let description = format!("{} {}", request.method, request.path);
            state.requests.push(request);
            state.responses.pop_front().unwrap_or_else(|| {
                Err(TransportError::Connect(format!("no scripted response for {description}")))
            })
        })
    }
}

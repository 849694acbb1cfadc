//! Scripted test doubles shared by the use case tests.

use crate::ports::completion::{
    CompletionClient, CompletionRequest, GatewayError, RequestKind, StreamHandle,
};
use async_trait::async_trait;
use council_domain::CompletionEvent;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// One scripted completion outcome, consumed in call order.
pub(crate) enum Reply {
    /// Whole text, delivered as a single `Completed` event.
    Text(String),
    /// Text delivered as deltas.
    Chunks(Vec<String>),
    Fail(String),
    Empty,
    /// Never answers.
    Hang,
}

pub(crate) fn text(s: &str) -> Reply {
    Reply::Text(s.to_string())
}

pub(crate) fn chunks(parts: &[&str]) -> Reply {
    Reply::Chunks(parts.iter().map(|p| p.to_string()).collect())
}

pub(crate) fn fail(message: &str) -> Reply {
    Reply::Fail(message.to_string())
}

/// A well-formed moderator verdict.
pub(crate) fn verdict(reached: bool, level: u8) -> Reply {
    text(&format!(
        "CONSENSUS: {}\nAGREEMENT_LEVEL: {}\nAGREEMENT_POINTS:\n- Start small\n\
DISAGREEMENT_POINTS:\n- Timing\nMAJORITY_VIEW: Go ahead carefully\nMINORITY_VIEW: NONE",
        if reached { "YES" } else { "NO" },
        level
    ))
}

pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from(replies)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self, kind: RequestKind) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    fn next(&self, request: &CompletionRequest) -> Result<Reply, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GatewayError::Other("No more responses".to_string()))
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        match self.next(request)? {
            Reply::Text(t) => Ok(t),
            Reply::Chunks(parts) => Ok(parts.concat()),
            Reply::Fail(m) => Err(GatewayError::RequestFailed(m)),
            Reply::Empty => Ok(String::new()),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(GatewayError::Timeout)
            }
        }
    }

    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let events = match self.next(request)? {
            Reply::Text(t) => vec![CompletionEvent::Completed(t)],
            Reply::Chunks(parts) => {
                let full = parts.concat();
                let mut events: Vec<_> = parts.into_iter().map(CompletionEvent::Delta).collect();
                events.push(CompletionEvent::Completed(full));
                events
            }
            Reply::Fail(m) => return Err(GatewayError::RequestFailed(m)),
            Reply::Empty => vec![CompletionEvent::Completed(String::new())],
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                return Err(GatewayError::Timeout);
            }
        };
        let (tx, rx) = mpsc::channel(events.len());
        for event in events {
            let _ = tx.try_send(event);
        }
        Ok(StreamHandle::new(rx))
    }
}

//! In-memory retriever for tests.

use crate::error::RetrievalError;
use crate::retrievers::{ContentCheck, PageRetriever};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Hands out canned responses in call order and records every URL asked for
pub(crate) struct FakeRetriever {
    responses: Mutex<VecDeque<Result<String, RetrievalError>>>,
    requested: Mutex<Vec<String>>,
    delays: HashMap<usize, Duration>,
    check: Option<ContentCheck>,
    closed: AtomicBool,
}

impl FakeRetriever {
    pub(crate) fn new(responses: Vec<Result<String, RetrievalError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requested: Mutex::new(Vec::new()),
            delays: HashMap::new(),
            check: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Sleep before answering the `call`-th request (0-based)
    pub(crate) fn with_delay_on_call(mut self, call: usize, delay: Duration) -> Self {
        self.delays.insert(call, delay);
        self
    }

    /// Run successful bodies through the soft-failure rules
    pub(crate) fn with_content_check(mut self, check: ContentCheck) -> Self {
        self.check = Some(check);
        self
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRetriever for FakeRetriever {
    async fn retrieve(&self, url: &str) -> Result<String, RetrievalError> {
        let call = {
            let mut requested = self.requested.lock().unwrap();
            requested.push(url.to_string());
            requested.len() - 1
        };

        // Taken before sleeping so a cancelled call still consumes its page
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RetrievalError::Transport("no canned page left".into())));

        if let Some(delay) = self.delays.get(&call) {
            tokio::time::sleep(*delay).await;
        }

        match (&self.check, response) {
            (Some(check), Ok(body)) => check.validate(body),
            (_, response) => response,
        }
    }

    async fn close(&self) -> Result<(), RetrievalError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A results page carrying one `meta[itemprop=name]` per title
pub(crate) fn titles_page(titles: &[&str]) -> String {
    let metas: String = titles
        .iter()
        .map(|t| format!(r#"<div itemscope><meta itemprop="name" content="{}"></div>"#, t))
        .collect();
    format!(
        "<html><head><title>Results</title></head><body>{}</body></html>",
        metas
    )
}

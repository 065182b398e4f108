#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use groupme::error::BoxError;
use groupme::{ApiClient, Config, HttpSend, Request, Response};
use reqwest::StatusCode;

/// Records every request and answers from a queue of canned replies.
#[derive(Clone, Default)]
pub struct FakeHttp {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    requests: Vec<Request>,
    replies: VecDeque<(u16, String)>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, status: u16, body: impl Into<String>) -> &Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .push_back((status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::with_http(Config::new("test-token"), self.clone())
    }
}

impl HttpSend for FakeHttp {
    fn send(&self, request: Request) -> Result<Response, BoxError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        let (status, body) = state.replies.pop_front().ok_or("no reply queued")?;
        Ok(Response {
            status: StatusCode::from_u16(status)?,
            body: body.into_bytes(),
        })
    }
}

/// Query pairs of a request, minus the injected token.
pub fn params(request: &Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .into_owned()
        .filter(|(k, _)| k != "token")
        .collect()
}

pub fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

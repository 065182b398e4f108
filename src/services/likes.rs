use reqwest::Method;

use crate::api::{ApiClient, Request};
use crate::error::Result;

/// Like and unlike a message in a group or direct conversation.
#[derive(Debug, Clone, Copy)]
pub struct LikesService<'a> {
    client: &'a ApiClient,
}

impl<'a> LikesService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        LikesService { client }
    }

    pub fn create(&self, conversation_id: &str, message_id: &str) -> Result<()> {
        self.post(conversation_id, message_id, "like")
    }

    pub fn destroy(&self, conversation_id: &str, message_id: &str) -> Result<()> {
        self.post(conversation_id, message_id, "unlike")
    }

    fn post(&self, conversation_id: &str, message_id: &str, action: &str) -> Result<()> {
        let url = self
            .client
            .endpoint(&["messages", conversation_id, message_id, action]);
        self.client.execute(Request::new(Method::POST, url))?;
        Ok(())
    }
}

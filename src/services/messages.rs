use reqwest::Method;
use serde::Deserialize;

use crate::api::{clear_empty_query, ApiClient, Request};
use crate::error::{Result, ValidationError};
use crate::types::{null_as_default, Message};

/// Largest page the messages endpoint accepts.
pub const MESSAGES_LIMIT_MAX: u32 = 100;

/// Cursor and page-size options for listing messages. The cursors are
/// independent; each one is sent only when non-empty.
#[derive(Debug, Clone, Default)]
pub struct MessagesIndexOptions {
    /// Messages created before this message ID.
    pub before_id: String,
    /// Most recent messages created after this message ID.
    pub since_id: String,
    /// Messages created immediately after this message ID.
    pub after_id: String,
    /// Page size. Zero leaves the server default (20).
    pub limit: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct MessagesService<'a> {
    client: &'a ApiClient,
}

/// `{"count": n, "messages": [...]}`; only the list is kept.
#[derive(Default, Deserialize)]
struct MessagePage {
    #[serde(deserialize_with = "null_as_default")]
    messages: Vec<Message>,
}

impl<'a> MessagesService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        MessagesService { client }
    }

    /// List messages in a group, in the order the server returns them.
    pub fn index(&self, group_id: &str, options: &MessagesIndexOptions) -> Result<Vec<Message>> {
        if options.limit > MESSAGES_LIMIT_MAX {
            return Err(ValidationError::LimitTooLarge {
                max: MESSAGES_LIMIT_MAX,
            }
            .into());
        }

        let mut url = self.client.endpoint(&["groups", group_id, "messages"]);
        {
            let mut params = url.query_pairs_mut();
            for (key, value) in [
                ("before_id", &options.before_id),
                ("since_id", &options.since_id),
                ("after_id", &options.after_id),
            ] {
                if !value.is_empty() {
                    params.append_pair(key, value);
                }
            }
            if options.limit != 0 {
                params.append_pair("limit", &options.limit.to_string());
            }
        }
        clear_empty_query(&mut url);

        let page: MessagePage = self.client.fetch(Request::new(Method::GET, url))?;
        Ok(page.messages)
    }
}

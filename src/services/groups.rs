use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{clear_empty_query, ApiClient, Request};
use crate::error::{Result, ValidationError};
use crate::types::{null_as_default, Group};

/// Limits are counted in UTF-8 bytes.
pub const NAME_MAX_LEN: usize = 140;
pub const DESCRIPTION_MAX_LEN: usize = 255;

/// Options for listing groups. Zero and empty values are left off the
/// request so the server defaults apply.
#[derive(Debug, Clone, Default)]
pub struct GroupsIndexOptions {
    /// Zero-based page offset, sent as the one-based `page`.
    pub offset: u32,
    /// Sent as `per_page`.
    pub limit: u32,
    /// Fields to leave out of the reply, sent comma-joined as `omit`.
    pub omit: Vec<String>,
}

/// Group endpoints.
#[derive(Debug, Clone, Copy)]
pub struct GroupsService<'a> {
    client: &'a ApiClient,
}

/// Body of a create or update request.
#[derive(Serialize)]
struct GroupBody<'g> {
    name: &'g str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'g str,
    #[serde(skip_serializing_if = "str::is_empty")]
    image_url: &'g str,
}

/// Join and rejoin nest the group one level deeper.
#[derive(Default, Deserialize)]
struct Joined {
    #[serde(deserialize_with = "null_as_default")]
    group: Group,
}

impl<'a> GroupsService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        GroupsService { client }
    }

    /// List the authenticated user's active groups, in server order.
    pub fn index(&self, options: &GroupsIndexOptions) -> Result<Vec<Group>> {
        let mut url = self.client.endpoint(&["groups"]);
        {
            let mut params = url.query_pairs_mut();
            if options.offset != 0 {
                params.append_pair("page", &(u64::from(options.offset) + 1).to_string());
            }
            if options.limit != 0 {
                params.append_pair("per_page", &options.limit.to_string());
            }
            if !options.omit.is_empty() {
                params.append_pair("omit", &options.omit.join(","));
            }
        }
        clear_empty_query(&mut url);
        self.client.fetch(Request::new(Method::GET, url))
    }

    /// List groups the user has left but can rejoin.
    pub fn former(&self) -> Result<Vec<Group>> {
        let url = self.client.endpoint(&["groups", "former"]);
        self.client.fetch(Request::new(Method::GET, url))
    }

    pub fn show(&self, id: &str) -> Result<Group> {
        let url = self.client.endpoint(&["groups", id]);
        self.client.fetch(Request::new(Method::GET, url))
    }

    /// Create a group from the name, description and image URL of `group`.
    pub fn create(&self, group: &Group) -> Result<Group> {
        let body = encode_body(group)?;
        let url = self.client.endpoint(&["groups"]);
        self.client.fetch(Request::new(Method::POST, url).with_body(body))
    }

    pub fn update(&self, id: &str, group: &Group) -> Result<Group> {
        let body = encode_body(group)?;
        let url = self.client.endpoint(&["groups", id, "update"]);
        self.client.fetch(Request::new(Method::POST, url).with_body(body))
    }

    /// Disband a group. Only the creator may do this.
    pub fn destroy(&self, id: &str) -> Result<()> {
        let url = self.client.endpoint(&["groups", id, "destroy"]);
        self.client.execute(Request::new(Method::POST, url))?;
        Ok(())
    }

    /// Join a shared group using the token from its share URL.
    pub fn join(&self, id: &str, share_token: &str) -> Result<Group> {
        let url = self.client.endpoint(&["groups", id, "join", share_token]);
        let joined: Joined = self.client.fetch(Request::new(Method::POST, url))?;
        Ok(joined.group)
    }

    /// Rejoin a group the user previously left.
    pub fn rejoin(&self, id: &str) -> Result<Group> {
        let mut url = self.client.endpoint(&["groups", "join"]);
        url.query_pairs_mut().append_pair("group_id", id);
        let joined: Joined = self.client.fetch(Request::new(Method::POST, url))?;
        Ok(joined.group)
    }
}

/// Check the local limits on a group.
pub fn validate_group(group: &Group) -> std::result::Result<(), ValidationError> {
    if group.name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if group.name.len() > NAME_MAX_LEN {
        return Err(ValidationError::NameTooLong { max: NAME_MAX_LEN });
    }
    if group.description.len() > DESCRIPTION_MAX_LEN {
        return Err(ValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX_LEN,
        });
    }
    Ok(())
}

fn encode_body(group: &Group) -> Result<Vec<u8>> {
    validate_group(group)?;
    let body = GroupBody {
        name: &group.name,
        description: &group.description,
        image_url: &group.image_url,
    };
    debug!(name = %group.name, "encoding group body");
    Ok(serde_json::to_vec(&body)?)
}

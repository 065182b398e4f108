// Library root
// ------------
// Client for the GroupMe public HTTP API, plus the modules the `groupme`
// binary is built from.
//
// Module responsibilities:
// - `api`: the transport. One blocking round trip per call, token and
//   content-type injection, error envelope decoding.
// - `services`: one façade per resource family (groups, messages, likes,
//   and handles for families with no operations yet).
// - `types` / `time`: the records responses decode into.
// - `config` / `error`: construction settings and the error taxonomy.
// - `ui`: the command-line front end.
pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod time;
pub mod types;
pub mod ui;

pub use api::{ApiClient, HttpSend, Request, Response};
pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use services::{GroupsIndexOptions, MessagesIndexOptions};
pub use time::{FormatError, UnixTime};
pub use types::{Attachment, Group, Member, Message, Messages, Preview};

// CLI layer: parses the command line with `clap`, runs one service call and
// prints the result as JSON on stdout. Progress and prompts go to stderr.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::api::ApiClient;
use crate::config::{Config, BASE_URL_VAR, TIMEOUT_VAR, TOKEN_VAR};
use crate::services::{GroupsIndexOptions, MessagesIndexOptions};

#[derive(Debug, Parser)]
#[command(name = "groupme", version, about = "Query the GroupMe API")]
pub struct Cli {
    /// Output compact JSON instead of indented JSON.
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query groups that the authenticated user belongs to.
    Groups {
        /// The page offset to start at.
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Limit the number of groups returned.
        #[arg(long, default_value_t = 0)]
        limit: u32,
        /// Comma separated fields to omit from each group.
        #[arg(long, value_delimiter = ',')]
        omit: Vec<String>,
    },
    /// List groups you have left but can rejoin.
    Former,
    /// Show a single group.
    Show { group_id: String },
    /// Query messages from a particular group.
    Messages {
        group_id: String,
        /// Returns messages created before the given message ID.
        #[arg(long)]
        before: Option<String>,
        /// Returns most recent messages created after the given message ID.
        #[arg(long)]
        since: Option<String>,
        /// Returns messages created immediately after the given message ID.
        #[arg(long)]
        after: Option<String>,
        /// Limit the number of messages returned, the maximum is 100.
        #[arg(long, default_value_t = 0)]
        limit: u32,
    },
    /// Like a message.
    Like {
        conversation_id: String,
        message_id: String,
    },
    /// Unlike a message.
    Unlike {
        conversation_id: String,
        message_id: String,
    },
}

/// Parse arguments, build the client and run the chosen command against
/// stdout.
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let client = ApiClient::new(config).context("Failed to build API client")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &client, &mut out)
}

/// Run one command and write its JSON result, if any, to `out`.
pub fn execute<W: Write>(cli: &Cli, client: &ApiClient, out: &mut W) -> Result<()> {
    match &cli.command {
        Command::Groups {
            offset,
            limit,
            omit,
        } => {
            let options = GroupsIndexOptions {
                offset: *offset,
                limit: *limit,
                omit: omit.clone(),
            };
            let groups = with_spinner("Fetching groups...", || client.groups().index(&options))
                .context("Error indexing groups")?;
            write_json(out, &groups, cli.compact)
        }
        Command::Former => {
            let groups = with_spinner("Fetching former groups...", || client.groups().former())
                .context("Error listing former groups")?;
            write_json(out, &groups, cli.compact)
        }
        Command::Show { group_id } => {
            let group = with_spinner("Fetching group...", || client.groups().show(group_id))
                .context("Error showing group")?;
            write_json(out, &group, cli.compact)
        }
        Command::Messages {
            group_id,
            before,
            since,
            after,
            limit,
        } => {
            let options = MessagesIndexOptions {
                before_id: before.clone().unwrap_or_default(),
                since_id: since.clone().unwrap_or_default(),
                after_id: after.clone().unwrap_or_default(),
                limit: *limit,
            };
            let messages = with_spinner("Fetching messages...", || {
                client.messages().index(group_id, &options)
            })
            .context("Error indexing messages")?;
            write_json(out, &messages, cli.compact)
        }
        Command::Like {
            conversation_id,
            message_id,
        } => with_spinner("Liking...", || {
            client.likes().create(conversation_id, message_id)
        })
        .context("Error liking message"),
        Command::Unlike {
            conversation_id,
            message_id,
        } => with_spinner("Unliking...", || {
            client.likes().destroy(conversation_id, message_id)
        })
        .context("Error unliking message"),
    }
}

/// Serialize `value` followed by a newline, indented unless `compact`.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T, compact: bool) -> Result<()> {
    let encoded = if compact {
        serde_json::to_writer(&mut *out, value)
    } else {
        serde_json::to_writer_pretty(&mut *out, value)
    };
    encoded.context("Error encoding output")?;
    writeln!(out)?;
    Ok(())
}

/// Read config from the environment. When the token is missing and a user
/// is at the terminal, ask for it instead of failing.
fn load_config() -> Result<Config> {
    let token_set = std::env::var(TOKEN_VAR).is_ok_and(|t| !t.is_empty());
    if token_set || !(io::stdin().is_terminal() && io::stderr().is_terminal()) {
        return Config::from_env().context("Invalid configuration");
    }
    let token = Password::new()
        .with_prompt("GroupMe access token")
        .interact()
        .context("Failed to read access token")?;
    Config::from_parts(
        token,
        std::env::var(BASE_URL_VAR).ok().as_deref(),
        std::env::var(TIMEOUT_VAR).ok().as_deref(),
    )
    .context("Invalid configuration")
}

/// Show a spinner on stderr while `f` runs, if stderr is a terminal.
fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    if !io::stderr().is_terminal() {
        return f();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpSend, Request, Response};
    use crate::error::BoxError;
    use reqwest::StatusCode;
    use std::sync::{Arc, Mutex};

    struct Reply {
        body: &'static str,
        urls: Arc<Mutex<Vec<String>>>,
    }

    impl HttpSend for Reply {
        fn send(&self, request: Request) -> std::result::Result<Response, BoxError> {
            self.urls.lock().unwrap().push(request.url.to_string());
            Ok(Response {
                status: StatusCode::OK,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn run_with(args: &[&str], body: &'static str) -> (Result<String>, Vec<String>) {
        let urls = Arc::new(Mutex::new(Vec::new()));
        let client = ApiClient::with_http(
            Config::new("tok"),
            Reply {
                body,
                urls: urls.clone(),
            },
        );
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        let result = execute(&cli, &client, &mut out).map(|_| String::from_utf8(out).unwrap());
        let urls = urls.lock().unwrap().clone();
        (result, urls)
    }

    #[test]
    fn groups_prints_indented_json() {
        let (out, urls) = run_with(
            &["groupme", "groups", "--offset", "1", "--limit", "5"],
            r#"{"response":[{"id":"g1","name":"Hike"}]}"#,
        );
        let out = out.unwrap();
        assert!(out.starts_with("[\n  {"));
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v[0]["id"], "g1");
        assert_eq!(
            urls,
            vec!["https://api.groupme.com/v3/groups?page=2&per_page=5&token=tok"]
        );
    }

    #[test]
    fn compact_flag_prints_one_line() {
        let (out, _) = run_with(
            &["groupme", "--compact", "show", "g1"],
            r#"{"response":{"id":"g1"}}"#,
        );
        let out = out.unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("{\"id\":\"g1\""));
    }

    #[test]
    fn messages_maps_cursor_flags() {
        let (out, urls) = run_with(
            &["groupme", "messages", "g1", "--since", "m5", "--limit", "20"],
            r#"{"response":{"count":1,"messages":[{"id":"m6"}]}}"#,
        );
        assert!(out.unwrap().contains("\"m6\""));
        assert_eq!(
            urls,
            vec!["https://api.groupme.com/v3/groups/g1/messages?since_id=m5&limit=20&token=tok"]
        );
    }

    #[test]
    fn messages_requires_a_group_id() {
        assert!(Cli::try_parse_from(["groupme", "messages"]).is_err());
    }

    #[test]
    fn like_prints_nothing() {
        let (out, urls) = run_with(&["groupme", "like", "g1", "m1"], "");
        assert_eq!(out.unwrap(), "");
        assert_eq!(urls, vec!["https://api.groupme.com/v3/messages/g1/m1/like?token=tok"]);
    }

    #[test]
    fn validation_error_is_reported_with_context() {
        let (out, urls) = run_with(&["groupme", "messages", "g1", "--limit", "150"], "");
        let err = out.unwrap_err();
        assert_eq!(err.to_string(), "Error indexing messages");
        assert!(format!("{err:#}").contains("page limit maximum is 100"));
        assert!(urls.is_empty());
    }
}

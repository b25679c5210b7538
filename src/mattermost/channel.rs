//! Resolve message destinations to Mattermost channel IDs, opening direct
//! channels with users on demand.

use super::{api::Api, error::MattermostError, json::get_kv};
use crate::config::Options;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Channels are referred to by their underlying ID. This can be found in the
/// UI under "View Info".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelId(pub String);

/// Format without the surrounding newtype wrapper.
impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a message should go: either a channel ID as-is, or `@username` for
/// the direct channel between the logged user and that user.
#[derive(Debug, PartialEq, Eq)]
pub enum ChannelTarget {
    Channel(ChannelId),
    User(String),
}

impl ChannelTarget {
    pub fn parse(target: &str) -> Self {
        if target.starts_with('@') {
            ChannelTarget::User(target.trim_start_matches('@').to_owned())
        } else {
            ChannelTarget::Channel(ChannelId(target.to_owned()))
        }
    }
}

/// Get the channel ID a message to `target` should be posted in.
///
/// Channel IDs are returned without touching the network. Usernames cost four
/// ordered requests, stopping at the first that fails.
pub async fn resolve_channel<A: Api>(
    api: &A,
    target: &str,
    opts: &Options,
) -> Result<ChannelId, MattermostError> {
    match ChannelTarget::parse(target) {
        ChannelTarget::Channel(id) => Ok(id),
        ChannelTarget::User(username) => {
            let from = get_logged_user_id(api, opts).await?;
            let to = get_user_id(api, &username, opts).await?;

            get_direct_channel_id(api, &from, &to, opts).await
        }
    }
}

/// Get the username of the owner of the access token.
pub async fn get_logged_username<A: Api>(
    api: &A,
    opts: &Options,
) -> Result<String, MattermostError> {
    let res = api.get("/users/me", opts).await?;

    get_kv(&res, "username").map(str::to_owned)
}

/// Get the Mattermost ID of the owner of the access token.
pub async fn get_logged_user_id<A: Api>(
    api: &A,
    opts: &Options,
) -> Result<String, MattermostError> {
    let username = get_logged_username(api, opts).await?;

    get_user_id(api, &username, opts).await
}

/// Get the Mattermost ID associated with a username.
pub async fn get_user_id<A: Api>(
    api: &A,
    username: &str,
    opts: &Options,
) -> Result<String, MattermostError> {
    let res = api
        .get(&format!("/users/username/{}", username), opts)
        .await?;

    let id = get_kv(&res, "id").map_err(|e| MattermostError::UnknownUserId {
        username: username.to_owned(),
        cause: Box::new(e),
    })?;
    debug!(username, id, "Resolved user");

    Ok(id.to_owned())
}

/// Get, creating it if need be, the direct channel between two users.
pub async fn get_direct_channel_id<A: Api>(
    api: &A,
    from: &str,
    to: &str,
    opts: &Options,
) -> Result<ChannelId, MattermostError> {
    let payload = serde_json::to_vec(&[from, to]).map_err(MattermostError::Serialize)?;

    let res = api.post("/channels/direct", payload, opts).await?;

    get_kv(&res, "id")
        .map(|id| ChannelId(id.to_owned()))
        .map_err(|_| MattermostError::MissingDirectChannelId)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mattermost::auth::AccessToken;
    use serde_json::{json, Value};
    use std::{cell::RefCell, collections::VecDeque, time::Duration};

    /// A request as seen by [FakeApi].
    #[derive(Debug, PartialEq)]
    pub enum Call {
        Get(String),
        Post(String, Value),
    }

    /// Replays canned responses in order and records every request made.
    #[derive(Default)]
    pub struct FakeApi {
        responses: RefCell<VecDeque<Result<Value, MattermostError>>>,
        pub calls: RefCell<Vec<Call>>,
    }

    impl FakeApi {
        pub fn new(responses: Vec<Result<Value, MattermostError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: RefCell::default(),
            }
        }

        fn next(&self) -> Result<Value, MattermostError> {
            self.responses
                .borrow_mut()
                .pop_front()
                .expect("unexpected request")
        }
    }

    impl Api for FakeApi {
        async fn get(&self, endpoint: &str, _: &Options) -> Result<Value, MattermostError> {
            self.calls.borrow_mut().push(Call::Get(endpoint.to_owned()));
            self.next()
        }

        async fn post(
            &self,
            endpoint: &str,
            payload: Vec<u8>,
            _: &Options,
        ) -> Result<Value, MattermostError> {
            let body = serde_json::from_slice(&payload).unwrap();
            self.calls
                .borrow_mut()
                .push(Call::Post(endpoint.to_owned(), body));
            self.next()
        }
    }

    pub fn opts() -> Options {
        Options {
            base_url: "http://h/mm".into(),
            access_token: AccessToken("foobar".into()),
            connection_timeout: Duration::from_secs(10),
            skip_tls_verify: false,
        }
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(
            ChannelTarget::parse("rybfbdi9ojy8xxxjjxc88kh3me"),
            ChannelTarget::Channel(ChannelId("rybfbdi9ojy8xxxjjxc88kh3me".into()))
        );
        assert_eq!(
            ChannelTarget::parse("@alice"),
            ChannelTarget::User("alice".into())
        );
    }

    #[tokio::test]
    async fn test_channel_id_needs_no_requests() {
        let api = FakeApi::default();

        let id = resolve_channel(&api, "rybfbdi9ojy8xxxjjxc88kh3me", &opts())
            .await
            .unwrap();

        assert_eq!(id, ChannelId("rybfbdi9ojy8xxxjjxc88kh3me".into()));
        assert!(api.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_username_resolves_direct_channel() {
        let api = FakeApi::new(vec![
            Ok(json!({"id": "ci-id", "username": "ci"})),
            Ok(json!({"id": "ci-id", "username": "ci"})),
            Ok(json!({"id": "alice-id", "username": "alice"})),
            Ok(json!({"id": "direct-id", "type": "D"})),
        ]);

        let id = resolve_channel(&api, "@alice", &opts()).await.unwrap();

        assert_eq!(id, ChannelId("direct-id".into()));
        assert_eq!(
            *api.calls.borrow(),
            vec![
                Call::Get("/users/me".into()),
                Call::Get("/users/username/ci".into()),
                Call::Get("/users/username/alice".into()),
                Call::Post("/channels/direct".into(), json!(["ci-id", "alice-id"])),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_username_fails_fast() {
        let api = FakeApi::new(vec![Ok(json!({"id": "ci-id"}))]);

        let e = resolve_channel(&api, "@alice", &opts()).await.unwrap_err();

        assert!(matches!(e, MattermostError::MissingKey(ref k) if k == "username"));
        assert_eq!(api.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_format_fails_fast() {
        let api = FakeApi::new(vec![Ok(json!([]))]);

        let e = resolve_channel(&api, "@alice", &opts()).await.unwrap_err();

        assert!(matches!(e, MattermostError::UnexpectedFormat));
        assert_eq!(api.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_self_id_fails_fast() {
        let api = FakeApi::new(vec![
            Ok(json!({"username": "ci"})),
            Ok(json!({"username": "ci"})),
        ]);

        let e = resolve_channel(&api, "@alice", &opts()).await.unwrap_err();

        assert_eq!(
            e.to_string(),
            "cannot get the Mattermost ID of the user ci: no such key: \"id\""
        );
        assert_eq!(
            *api.calls.borrow(),
            vec![
                Call::Get("/users/me".into()),
                Call::Get("/users/username/ci".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_target_id_fails_fast() {
        let api = FakeApi::new(vec![
            Ok(json!({"username": "ci"})),
            Ok(json!({"id": "ci-id"})),
            Ok(json!({"username": "alice"})),
        ]);

        let e = resolve_channel(&api, "@alice", &opts()).await.unwrap_err();

        assert_eq!(
            e.to_string(),
            "cannot get the Mattermost ID of the user alice: no such key: \"id\""
        );
        assert_eq!(api.calls.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_direct_channel_id() {
        let api = FakeApi::new(vec![
            Ok(json!({"username": "ci"})),
            Ok(json!({"id": "ci-id"})),
            Ok(json!({"id": "alice-id"})),
            Ok(json!({"status": "OK"})),
        ]);

        let e = resolve_channel(&api, "@alice", &opts()).await.unwrap_err();

        assert!(matches!(e, MattermostError::MissingDirectChannelId));
        assert_eq!(api.calls.borrow().len(), 4);
    }

    #[tokio::test]
    async fn test_request_failure_propagates() {
        let api = FakeApi::new(vec![Err(MattermostError::Status {
            url: "http://h/mm/api/v4/users/me".into(),
            status: reqwest::StatusCode::UNAUTHORIZED,
        })]);

        let e = resolve_channel(&api, "@alice", &opts()).await.unwrap_err();

        assert_eq!(e.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
        assert_eq!(api.calls.borrow().len(), 1);
    }
}

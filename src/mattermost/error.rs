use std::{error, fmt};

/// Sum type representing every possible unexceptional fail state.
#[derive(Debug)]
pub enum MattermostError {
    MissingUrl,
    MissingAccessToken,
    InvalidConfig(String),
    RequestFailed(reqwest::Error),
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    MalformedBody(serde_json::Error),
    Serialize(serde_json::Error),
    MissingKey(String),
    UnexpectedFormat,
    UnknownUserId {
        username: String,
        cause: Box<MattermostError>,
    },
    MissingDirectChannelId,
}

impl MattermostError {
    /// The HTTP status code of a non-2xx response, if that's what went wrong.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            MattermostError::Status { status, .. } => Some(*status),
            MattermostError::UnknownUserId { cause, .. } => cause.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MattermostError {
    fn from(e: reqwest::Error) -> Self {
        MattermostError::RequestFailed(e)
    }
}

impl fmt::Display for MattermostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            MattermostError::MissingUrl => "the Mattermost URL has not been set".into(),
            MattermostError::MissingAccessToken => {
                "the Mattermost Access Token has not been set".into()
            }
            MattermostError::InvalidConfig(e) => format!("invalid configuration: {}", e),
            MattermostError::RequestFailed(e) => format!("Mattermost API request failed: {}", e),
            MattermostError::Status { url, status } => format!(
                "the HTTP query to {} has ended with a {} (\"{}\") code",
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
            MattermostError::MalformedBody(e) => format!("malformed response body: {}", e),
            MattermostError::Serialize(e) => format!("cannot serialize the payload: {}", e),
            MattermostError::MissingKey(k) => format!("no such key: \"{}\"", k),
            MattermostError::UnexpectedFormat => {
                "unexpected response format from Mattermost".into()
            }
            MattermostError::UnknownUserId { username, cause } => format!(
                "cannot get the Mattermost ID of the user {}: {}",
                username, cause
            ),
            MattermostError::MissingDirectChannelId => {
                "cannot get the Mattermost direct channel ID".into()
            }
        };

        write!(f, "{}", x)
    }
}

impl error::Error for MattermostError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MattermostError::RequestFailed(e) => Some(e),
            MattermostError::MalformedBody(e) | MattermostError::Serialize(e) => Some(e),
            MattermostError::UnknownUserId { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_display_distinguishes_codes() {
        let not_found = MattermostError::Status {
            url: "http://h/mm/api/v4/users/me".into(),
            status: StatusCode::NOT_FOUND,
        };
        let internal = MattermostError::Status {
            url: "http://h/mm/api/v4/users/me".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };

        assert_eq!(
            not_found.to_string(),
            "the HTTP query to http://h/mm/api/v4/users/me has ended with a 404 (\"Not Found\") code"
        );
        assert_eq!(
            internal.to_string(),
            "the HTTP query to http://h/mm/api/v4/users/me has ended with a 500 (\"Internal Server Error\") code"
        );
        assert_eq!(not_found.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(internal.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_user_id_context() {
        let e = MattermostError::UnknownUserId {
            username: "alice".into(),
            cause: Box::new(MattermostError::MissingKey("id".into())),
        };

        assert_eq!(
            e.to_string(),
            "cannot get the Mattermost ID of the user alice: no such key: \"id\""
        );
        assert!(error::Error::source(&e).is_some());
    }
}

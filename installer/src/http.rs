//! Shared HTTP plumbing for catalog lookups and archive downloads.

use std::sync::OnceLock;
use ureq::Body;
use ureq::http::Response;

/// Why an HTTP GET did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RequestFailure {
    /// The server answered with a status other than 200.
    Status(u16),
    /// The request never produced a response.
    Transport(String),
}

/// Issue a GET request and require a `200 OK` response.
pub(crate) fn get(url: &str) -> Result<Response<Body>, RequestFailure> {
    let response = agent().get(url).call().map_err(|e| classify(&e))?;
    let status = response.status().as_u16();
    if status != 200 {
        return Err(RequestFailure::Status(status));
    }
    Ok(response)
}

/// Shared `ureq` agent using the client's default timeouts.
fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(ureq::Agent::new_with_defaults)
}

/// Map a ureq error to a [`RequestFailure`].
fn classify(err: &ureq::Error) -> RequestFailure {
    match err {
        ureq::Error::StatusCode(code) => RequestFailure::Status(*code),
        other => RequestFailure::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_found(404)]
    #[case::server_error(503)]
    fn status_errors_keep_their_code(#[case] code: u16) {
        assert_eq!(
            classify(&ureq::Error::StatusCode(code)),
            RequestFailure::Status(code)
        );
    }

    #[test]
    fn other_errors_are_transport_failures() {
        let failure = classify(&ureq::Error::Io(std::io::Error::other("connection reset")));
        assert!(matches!(failure, RequestFailure::Transport(_)));
    }
}

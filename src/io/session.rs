use reqwest::blocking::RequestBuilder;

/// Opaque credential holder for authenticated requests
///
/// The stacking core never inspects the token; it is forwarded unchanged to
/// the collaborators that issue HTTP requests. Obtain tokens from the EDL
/// user-token page.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// An unauthenticated session
    pub fn new() -> Self {
        Session { token: None }
    }

    /// Attach a bearer token
    pub fn auth_with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Apply the credentials to an outgoing request
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_authentication_state() {
        let session = Session::new();
        assert!(!session.is_authenticated());

        let session = session.auth_with_token("EDL-token");
        assert!(session.is_authenticated());
    }
}

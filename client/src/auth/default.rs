use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use super::{AuthMode, AuthTransport, BoxFuture};
use crate::error::{ApiError, ConfigError};

/// Transport for unauthenticated traffic; ensures a user agent is present.
#[derive(Debug, Clone)]
pub struct DefaultTransport {
    user_agent: HeaderValue,
}

impl DefaultTransport {
    /// Creates a transport that sends `user_agent`.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if `user_agent` is not a valid
    /// header value.
    pub fn new(user_agent: &str) -> Result<Self, ConfigError> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|e| ConfigError::invalid_header(format!("user agent: {e}")))?;
        Ok(Self { user_agent })
    }
}

impl AuthTransport for DefaultTransport {
    fn mode(&self) -> AuthMode {
        AuthMode::None
    }

    fn authorize<'a>(
        &'a self,
        request: &'a mut reqwest::Request,
    ) -> BoxFuture<'a, Result<(), ApiError>> {
        Box::pin(async move {
            request
                .headers_mut()
                .entry(USER_AGENT)
                .or_insert_with(|| self.user_agent.clone());
            Ok(())
        })
    }

    fn credential_headers(&self) -> BoxFuture<'_, Result<HeaderMap, ApiError>> {
        Box::pin(async { Ok(HeaderMap::new()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sets_missing_user_agent() {
        let transport = DefaultTransport::new("mealplan-client/test").unwrap();
        let mut request = reqwest::Client::new()
            .get("https://example.test/_meta_/ready")
            .build()
            .unwrap();

        transport.authorize(&mut request).await.unwrap();
        assert_eq!(
            request.headers().get(USER_AGENT).unwrap(),
            "mealplan-client/test"
        );
    }

    #[tokio::test]
    async fn test_keeps_existing_user_agent() {
        let transport = DefaultTransport::new("mealplan-client/test").unwrap();
        let mut request = reqwest::Client::new()
            .get("https://example.test/_meta_/ready")
            .header(USER_AGENT, "custom/1.0")
            .build()
            .unwrap();

        transport.authorize(&mut request).await.unwrap();
        assert_eq!(request.headers().get(USER_AGENT).unwrap(), "custom/1.0");
        assert!(transport.credential_headers().await.unwrap().is_empty());
    }
}

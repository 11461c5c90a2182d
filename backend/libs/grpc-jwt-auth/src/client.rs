//! Client-side bearer interceptor
//!
//! Injects the access token obtained from `Login` into outgoing gRPC requests.

use crate::error::AuthError;
use tonic::metadata::AsciiMetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Client-side interceptor that adds `authorization: Bearer {token}` to every call
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_auth::BearerInterceptor;
/// use tonic::transport::Channel;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let interceptor = BearerInterceptor::new("eyJhbGc...")?;
///
/// let channel = Channel::from_static("http://[::1]:8080")
///     .connect()
///     .await?;
///
/// // let mut client = LaptopServiceClient::with_interceptor(channel, interceptor);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BearerInterceptor {
    /// Pre-formatted "Bearer {token}" value, parsed once
    auth_header: AsciiMetadataValue,
}

impl BearerInterceptor {
    pub fn new(token: impl Into<String>) -> Result<Self, AuthError> {
        let value = format!("Bearer {}", token.into());
        let auth_header =
            AsciiMetadataValue::try_from(value).map_err(|_| AuthError::MalformedHeader)?;

        Ok(Self { auth_header })
    }
}

impl Interceptor for BearerInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert("authorization", self.auth_header.clone());
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injects_authorization_header() {
        let mut interceptor = BearerInterceptor::new("abc.def.ghi").unwrap();
        let request = interceptor.call(Request::new(())).unwrap();

        let header = request.metadata().get("authorization").unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer abc.def.ghi");
    }

    #[test]
    fn test_rejects_non_ascii_token() {
        let result = BearerInterceptor::new("tök\nen");
        assert!(matches!(result, Err(AuthError::MalformedHeader)));
    }
}

//! Request extension trait for reading the caller's claims
//!
//! The authorization gate inserts `Claims` into the HTTP request extensions;
//! tonic carries them over into `tonic::Request::extensions()`.

use crate::claims::Claims;
use tonic::Request;

pub trait ClaimsExt {
    /// Claims of the authenticated caller, if the method required a token
    fn claims(&self) -> Option<&Claims>;

    /// Username of the caller, or `"anonymous"` for open methods
    fn caller(&self) -> &str {
        self.claims().map(Claims::username).unwrap_or("anonymous")
    }
}

impl<T> ClaimsExt for Request<T> {
    fn claims(&self) -> Option<&Claims> {
        self.extensions().get::<Claims>()
    }
}

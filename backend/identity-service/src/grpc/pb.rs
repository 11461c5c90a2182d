//! Wire messages for `techschool.pcbook.AuthService`
//!
//! Standard protobuf wire format via prost derives; the service stubs are
//! generated by build.rs.

#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginRequest {
    #[prost(string, tag = "1")]
    pub username: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginResponse {
    #[prost(string, tag = "1")]
    pub access_token: String,
}

include!(concat!(env!("OUT_DIR"), "/techschool.pcbook.AuthService.rs"));

// Shared harness: an in-process catalog server on an ephemeral port
#![allow(dead_code)]

use catalog_service::pb::upload_image_request::Data;
use catalog_service::pb::{ImageInfo, UploadImageRequest};
use catalog_service::{serve, AppState, LaptopServiceClient, Settings};
use grpc_jwt_auth::BearerInterceptor;
use identity_service::grpc::pb::LoginRequest;
use identity_service::grpc::AuthServiceClient;
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;

pub const SECRET: &str = "integration-test-secret";

pub type AuthedClient = LaptopServiceClient<InterceptedService<Channel, BearerInterceptor>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub image_dir: TempDir,
    // Dropping the sender stops the server
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    /// Start with extra settings on top of the test defaults
    pub async fn start_with(vars: &[(&str, &str)]) -> Self {
        let image_dir = TempDir::new().unwrap();
        let folder = image_dir.path().join("img").to_string_lossy().into_owned();
        let mut vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vars.push(("JWT_SECRET".to_string(), SECRET.to_string()));
        vars.push(("IMAGE_FOLDER".to_string(), folder));

        let settings = Settings::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap();

        let state = AppState::from_settings(&settings).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let server_state = state.clone();
        tokio::spawn(async move {
            serve(server_state, listener, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });

        TestServer {
            addr,
            state,
            image_dir,
            _shutdown: tx,
        }
    }

    pub async fn channel(&self) -> Channel {
        Channel::from_shared(format!("http://{}", self.addr))
            .unwrap()
            .connect()
            .await
            .unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, tonic::Status> {
        let mut client = AuthServiceClient::new(self.channel().await);
        let response = client
            .login(LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(response.into_inner().access_token)
    }

    pub async fn client_with_token(&self, token: &str) -> AuthedClient {
        LaptopServiceClient::with_interceptor(self.channel().await, BearerInterceptor::new(token).unwrap())
    }

    /// Client logged in as one of the seeded identities
    pub async fn client_as(&self, username: &str) -> AuthedClient {
        let token = self.login(username, "secret").await.unwrap();
        self.client_with_token(&token).await
    }

    pub async fn anonymous_client(&self) -> LaptopServiceClient<Channel> {
        LaptopServiceClient::new(self.channel().await)
    }
}

pub fn image_info(laptop_id: &str, image_type: &str) -> UploadImageRequest {
    UploadImageRequest {
        data: Some(Data::Info(ImageInfo {
            laptop_id: laptop_id.to_string(),
            image_type: image_type.to_string(),
        })),
    }
}

pub fn image_chunk(len: usize) -> UploadImageRequest {
    UploadImageRequest {
        data: Some(Data::ChunkData(vec![0x5A; len])),
    }
}

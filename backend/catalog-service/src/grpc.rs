// gRPC service implementation for the laptop catalog
use crate::context::{CallContext, ContextError};
use crate::error::{CatalogError, Result};
use crate::handlers::{rate_laptops, receive_image};
use crate::pb::laptop_service_server::LaptopService;
use crate::pb::*;
use crate::store::{ImageStore, LaptopStore, RatingStore, StoreError};
use grpc_jwt_auth::{AccessPolicy, ClaimsExt, Role};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info, warn};

pub use crate::pb::laptop_service_client::LaptopServiceClient;
pub use crate::pb::laptop_service_server::LaptopServiceServer;

pub const SERVICE_NAME: &str = "techschool.pcbook.LaptopService";

/// Buffered responses per streaming call before the producer waits
const STREAM_BUFFER: usize = 16;

/// Roles allowed on each restricted method; search stays open
pub fn default_access_policy() -> AccessPolicy {
    AccessPolicy::new()
        .allow(method_path("CreateLaptop"), [Role::Admin])
        .allow(method_path("UploadImage"), [Role::Admin])
        .allow(method_path("RateLaptop"), [Role::Admin, Role::User])
}

pub fn method_path(method: &str) -> String {
    format!("/{}/{}", SERVICE_NAME, method)
}

#[derive(Clone)]
pub struct LaptopServiceImpl {
    laptops: Arc<dyn LaptopStore>,
    images: Arc<dyn ImageStore>,
    ratings: Arc<dyn RatingStore>,
    max_image_size: usize,
}

impl LaptopServiceImpl {
    pub fn new(
        laptops: Arc<dyn LaptopStore>,
        images: Arc<dyn ImageStore>,
        ratings: Arc<dyn RatingStore>,
        max_image_size: usize,
    ) -> Self {
        Self {
            laptops,
            images,
            ratings,
            max_image_size,
        }
    }

    fn save_laptop(&self, ctx: &CallContext, laptop: Laptop) -> Result<String> {
        // Bail out before touching the store if the client already gave up
        ctx.check()?;

        self.laptops
            .save(laptop)
            .map_err(|err| CatalogError::from_store("cannot save laptop to the store", err))
    }
}

#[tonic::async_trait]
impl LaptopService for LaptopServiceImpl {
    async fn create_laptop(
        &self,
        request: Request<CreateLaptopRequest>,
    ) -> std::result::Result<Response<CreateLaptopResponse>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        let caller = request.caller().to_string();

        let laptop = request
            .into_inner()
            .laptop
            .ok_or_else(|| CatalogError::InvalidArgument("laptop is required".to_string()))?;

        info!(laptop_id = %laptop.id, caller = %caller, "Received a create-laptop request");

        let id = self.save_laptop(&ctx, laptop)?;

        info!(laptop_id = %id, "Saved laptop");
        Ok(Response::new(CreateLaptopResponse { id }))
    }

    type SearchLaptopStream = ReceiverStream<std::result::Result<SearchLaptopResponse, Status>>;

    async fn search_laptop(
        &self,
        request: Request<SearchLaptopRequest>,
    ) -> std::result::Result<Response<Self::SearchLaptopStream>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        let filter = request.into_inner().filter.unwrap_or_default();
        info!(?filter, "Received a search-laptop request");

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let ctx = ctx.cancel_on_closed(&tx);
        let laptops = self.laptops.clone();

        // Sends are synchronous, so the walk runs on a blocking worker where
        // back-pressure may park it
        tokio::task::spawn_blocking(move || {
            let mut found = 0usize;

            let result = laptops.search(&ctx, &filter, &mut |laptop| {
                tx.blocking_send(Ok(SearchLaptopResponse {
                    laptop: Some(laptop),
                }))
                .map_err(|_| StoreError::Context(ContextError::Canceled))?;
                found += 1;
                Ok(())
            });

            match result {
                Ok(()) => info!(found, "Search completed"),
                Err(err) => {
                    let status = Status::from(CatalogError::from_store("cannot search laptop", err));
                    if tx.blocking_send(Err(status)).is_err() {
                        debug!("Search client already gone");
                    }
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn upload_image(
        &self,
        request: Request<Streaming<UploadImageRequest>>,
    ) -> std::result::Result<Response<UploadImageResponse>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        let caller = request.caller().to_string();
        info!(caller = %caller, "Received an upload-image request");

        let response = receive_image(
            &ctx,
            self.laptops.as_ref(),
            self.images.as_ref(),
            self.max_image_size,
            request.into_inner(),
        )
        .await?;

        info!(image_id = %response.id, size = response.size, "Saved image");
        Ok(Response::new(response))
    }

    type RateLaptopStream = ReceiverStream<std::result::Result<RateLaptopResponse, Status>>;

    async fn rate_laptop(
        &self,
        request: Request<Streaming<RateLaptopRequest>>,
    ) -> std::result::Result<Response<Self::RateLaptopStream>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        let caller = request.caller().to_string();
        info!(caller = %caller, "Received a rate-laptop stream");

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let ctx = ctx.cancel_on_closed(&tx);
        let laptops = self.laptops.clone();
        let ratings = self.ratings.clone();
        let stream = request.into_inner();

        tokio::spawn(async move {
            let result = rate_laptops(&ctx, laptops.as_ref(), ratings.as_ref(), stream, &tx).await;

            match result {
                Ok(()) => debug!(caller = %caller, "Rating stream finished"),
                Err(CatalogError::Canceled) if tx.is_closed() => {
                    warn!(caller = %caller, "Rating stream canceled by client")
                }
                Err(err) => {
                    if tx.send(Err(err.into())).await.is_err() {
                        debug!(caller = %caller, "Rating client already gone");
                    }
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

//! Bidirectional rating stream
use crate::context::CallContext;
use crate::error::{CatalogError, Result};
use crate::pb::{RateLaptopRequest, RateLaptopResponse};
use crate::store::{LaptopStore, RatingStore};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tonic::Status;
use tracing::debug;

/// Answer every rating with the laptop's updated aggregate, in order, until
/// the client closes its side
///
/// Each response is handed to `tx` before the next request is read.
pub async fn rate_laptops<S>(
    ctx: &CallContext,
    laptops: &dyn LaptopStore,
    ratings: &dyn RatingStore,
    mut stream: S,
    tx: &mpsc::Sender<std::result::Result<RateLaptopResponse, Status>>,
) -> Result<()>
where
    S: Stream<Item = std::result::Result<RateLaptopRequest, Status>> + Unpin,
{
    loop {
        ctx.check()?;

        let request = match stream.next().await {
            None => {
                debug!("No more data");
                return Ok(());
            }
            Some(Err(status)) => {
                return Err(CatalogError::Unknown(format!(
                    "cannot receive stream request: {}",
                    status.message()
                )))
            }
            Some(Ok(request)) => request,
        };

        let RateLaptopRequest { laptop_id, score } = request;
        debug!(laptop_id = %laptop_id, score, "Received a rate-laptop request");

        match laptops.find(&laptop_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(CatalogError::NotFound(format!(
                    "laptop {} is not found",
                    laptop_id
                )))
            }
            Err(err) => return Err(CatalogError::Internal(format!("cannot find laptop: {}", err))),
        }

        let rating = ratings
            .add(&laptop_id, score)
            .map_err(|err| CatalogError::Internal(format!("cannot save rating to the store: {}", err)))?;

        let response = RateLaptopResponse {
            laptop_id,
            rated_count: rating.count,
            average_score: rating.average(),
        };

        if tx.send(Ok(response)).await.is_err() {
            debug!("Response stream closed by client");
            return Err(CatalogError::Canceled);
        }
    }
}

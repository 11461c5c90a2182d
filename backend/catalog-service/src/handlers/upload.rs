//! Chunked image upload
use crate::context::CallContext;
use crate::error::{CatalogError, Result};
use crate::pb::upload_image_request::Data;
use crate::pb::{ImageInfo, UploadImageRequest, UploadImageResponse};
use crate::store::{is_valid_image_type, ImageStore, LaptopStore};
use futures::{Stream, StreamExt};
use tonic::Status;
use tracing::debug;

/// Default cap on an uploaded image: 1 MiB
pub const DEFAULT_MAX_IMAGE_SIZE: usize = 1 << 20;

/// Receive one image: an `info` message, then raw chunks until the client
/// closes its side. Nothing is written unless the whole image arrived within
/// `max_size` bytes.
pub async fn receive_image<S>(
    ctx: &CallContext,
    laptops: &dyn LaptopStore,
    images: &dyn ImageStore,
    max_size: usize,
    mut stream: S,
) -> Result<UploadImageResponse>
where
    S: Stream<Item = std::result::Result<UploadImageRequest, Status>> + Unpin,
{
    let info = receive_info(&mut stream).await?;
    debug!(laptop_id = %info.laptop_id, image_type = %info.image_type, "Received image info");

    if !is_valid_image_type(&info.image_type) {
        return Err(CatalogError::InvalidArgument(format!(
            "invalid image type: {:?}",
            info.image_type
        )));
    }

    match laptops.find(&info.laptop_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(CatalogError::InvalidArgument(format!(
                "laptop {} doesn't exist",
                info.laptop_id
            )))
        }
        Err(err) => return Err(CatalogError::Internal(format!("cannot find laptop: {}", err))),
    }

    let mut data = Vec::new();

    loop {
        ctx.check()?;

        let chunk = match stream.next().await {
            None => {
                debug!("No more data");
                break;
            }
            Some(Err(status)) => {
                return Err(CatalogError::Unknown(format!(
                    "cannot receive chunk data: {}",
                    status.message()
                )))
            }
            Some(Ok(UploadImageRequest {
                data: Some(Data::ChunkData(chunk)),
            })) => chunk,
            Some(Ok(_)) => {
                return Err(CatalogError::InvalidArgument(
                    "expected chunk data after image info".to_string(),
                ))
            }
        };

        let size = data.len() + chunk.len();
        debug!(chunk = chunk.len(), total = size, "Received a chunk");

        if size > max_size {
            return Err(CatalogError::InvalidArgument(format!(
                "image is too large: {} > {}",
                size, max_size
            )));
        }

        data.extend_from_slice(&chunk);
    }

    let size = u32::try_from(data.len())
        .map_err(|_| CatalogError::Internal(format!("image size {} overflows", data.len())))?;

    let id = images
        .save(&info.laptop_id, &info.image_type, data)
        .await
        .map_err(|err| CatalogError::from_store("cannot save image to the store", err))?;

    Ok(UploadImageResponse { id, size })
}

async fn receive_info<S>(stream: &mut S) -> Result<ImageInfo>
where
    S: Stream<Item = std::result::Result<UploadImageRequest, Status>> + Unpin,
{
    match stream.next().await {
        Some(Ok(UploadImageRequest {
            data: Some(Data::Info(info)),
        })) => Ok(info),
        Some(Err(status)) => Err(CatalogError::Unknown(format!(
            "cannot receive image info: {}",
            status.message()
        ))),
        _ => Err(CatalogError::Unknown("cannot receive image info".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;
    use crate::store::{DiskImageStore, InMemoryLaptopStore};
    use futures::stream;
    use tempfile::TempDir;
    use tonic::Code;

    struct Fixture {
        _dir: TempDir,
        laptops: InMemoryLaptopStore,
        images: DiskImageStore,
        laptop_id: String,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let images = DiskImageStore::new(dir.path().join("img"));
        let laptops = InMemoryLaptopStore::new();
        let laptop_id = laptops.save(sample::new_laptop()).unwrap();

        Fixture {
            _dir: dir,
            laptops,
            images,
            laptop_id,
        }
    }

    fn info(laptop_id: &str, image_type: &str) -> std::result::Result<UploadImageRequest, Status> {
        Ok(UploadImageRequest {
            data: Some(Data::Info(ImageInfo {
                laptop_id: laptop_id.to_string(),
                image_type: image_type.to_string(),
            })),
        })
    }

    fn chunk(len: usize) -> std::result::Result<UploadImageRequest, Status> {
        Ok(UploadImageRequest {
            data: Some(Data::ChunkData(vec![0xAB; len])),
        })
    }

    async fn upload(
        f: &Fixture,
        messages: Vec<std::result::Result<UploadImageRequest, Status>>,
    ) -> Result<UploadImageResponse> {
        receive_image(
            &CallContext::new(),
            &f.laptops,
            &f.images,
            DEFAULT_MAX_IMAGE_SIZE,
            stream::iter(messages),
        )
        .await
    }

    #[tokio::test]
    async fn test_upload_reports_exact_size() {
        let f = fixture();
        let messages = vec![info(&f.laptop_id, ".jpg"), chunk(1024), chunk(1024), chunk(17)];

        let response = upload(&f, messages).await.unwrap();

        assert_eq!(response.size, 2065);
        let stored = f.images.find(&response.id).unwrap();
        assert_eq!(std::fs::metadata(&stored.path).unwrap().len(), 2065);
    }

    #[tokio::test]
    async fn test_upload_exactly_at_limit() {
        let f = fixture();
        let messages = vec![info(&f.laptop_id, ".png"), chunk(DEFAULT_MAX_IMAGE_SIZE)];

        let response = upload(&f, messages).await.unwrap();

        assert_eq!(response.size as usize, DEFAULT_MAX_IMAGE_SIZE);
    }

    #[tokio::test]
    async fn test_upload_too_large_writes_nothing() {
        let f = fixture();
        let messages = vec![
            info(&f.laptop_id, ".jpg"),
            chunk(DEFAULT_MAX_IMAGE_SIZE / 2),
            chunk(DEFAULT_MAX_IMAGE_SIZE / 2),
            chunk(1),
        ];

        let err = upload(&f, messages).await.unwrap_err();

        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(err.to_string(), "image is too large: 1048577 > 1048576");
        assert!(f.images.is_empty());
        assert!(!f.images.folder().exists());
    }

    #[tokio::test]
    async fn test_upload_unknown_laptop() {
        let f = fixture();
        let missing = uuid::Uuid::new_v4().to_string();

        let err = upload(&f, vec![info(&missing, ".jpg"), chunk(10)]).await.unwrap_err();

        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(err.to_string(), format!("laptop {} doesn't exist", missing));
    }

    #[tokio::test]
    async fn test_upload_without_info() {
        let f = fixture();

        let err = upload(&f, vec![chunk(10)]).await.unwrap_err();
        assert_eq!(err.code(), Code::Unknown);

        let err = upload(&f, vec![]).await.unwrap_err();
        assert_eq!(err.code(), Code::Unknown);
        assert_eq!(err.to_string(), "cannot receive image info");
    }

    #[tokio::test]
    async fn test_upload_second_info_rejected() {
        let f = fixture();
        let messages = vec![info(&f.laptop_id, ".jpg"), chunk(10), info(&f.laptop_id, ".jpg")];

        let err = upload(&f, messages).await.unwrap_err();

        assert_eq!(err.code(), Code::InvalidArgument);
        assert!(f.images.is_empty());
    }

    #[tokio::test]
    async fn test_upload_receive_error() {
        let f = fixture();
        let messages = vec![
            info(&f.laptop_id, ".jpg"),
            chunk(10),
            Err(Status::aborted("connection reset")),
        ];

        let err = upload(&f, messages).await.unwrap_err();

        assert_eq!(err.code(), Code::Unknown);
        assert!(f.images.is_empty());
    }

    #[tokio::test]
    async fn test_upload_bad_image_type() {
        let f = fixture();

        let err = upload(&f, vec![info(&f.laptop_id, "/../../x"), chunk(10)])
            .await
            .unwrap_err();

        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_upload_canceled() {
        let f = fixture();
        let ctx = CallContext::new();
        ctx.cancel();

        let err = receive_image(
            &ctx,
            &f.laptops,
            &f.images,
            DEFAULT_MAX_IMAGE_SIZE,
            stream::iter(vec![info(&f.laptop_id, ".jpg"), chunk(10)]),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code(), Code::Cancelled);
        assert!(f.images.is_empty());
    }
}

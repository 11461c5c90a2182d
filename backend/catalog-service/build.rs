// Build script for catalog-service
// Generates LaptopService server and client stubs with tonic's manual
// builder. Message types are hand-written prost structs in src/pb.rs.
use tonic_build::manual::{Builder, Method, Service};

fn method(name: &str, route: &str, input: &str, output: &str) -> tonic_build::manual::MethodBuilder {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::pb::{}", input))
        .output_type(format!("crate::pb::{}", output))
        .codec_path("tonic::codec::ProstCodec")
}

fn main() {
    let service = Service::builder()
        .name("LaptopService")
        .package("techschool.pcbook")
        .method(method("create_laptop", "CreateLaptop", "CreateLaptopRequest", "CreateLaptopResponse").build())
        .method(
            method("search_laptop", "SearchLaptop", "SearchLaptopRequest", "SearchLaptopResponse")
                .server_streaming()
                .build(),
        )
        .method(
            method("upload_image", "UploadImage", "UploadImageRequest", "UploadImageResponse")
                .client_streaming()
                .build(),
        )
        .method(
            method("rate_laptop", "RateLaptop", "RateLaptopRequest", "RateLaptopResponse")
                .client_streaming()
                .server_streaming()
                .build(),
        )
        .build();

    Builder::new().compile(&[service]);
}

// Build script for identity-service
// Generates the AuthService server and client stubs. Message types are
// hand-written prost structs in src/grpc/pb.rs, so no .proto file or protoc
// is involved.
fn main() {
    let login = tonic_build::manual::Method::builder()
        .name("login")
        .route_name("Login")
        .input_type("crate::grpc::pb::LoginRequest")
        .output_type("crate::grpc::pb::LoginResponse")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    let service = tonic_build::manual::Service::builder()
        .name("AuthService")
        .package("techschool.pcbook")
        .method(login)
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}

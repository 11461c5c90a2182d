//! Laptop export files
//!
//! Binary files hold the raw protobuf encoding; JSON files are pretty-printed
//! with the enum fields kept as their numeric values.
use crate::pb::Laptop;
use prost::Message;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializerError {
    #[error("cannot access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode binary laptop: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("cannot convert laptop to JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn write_binary_file(laptop: &Laptop, path: impl AsRef<Path>) -> Result<(), SerializerError> {
    std::fs::write(path, laptop.encode_to_vec())?;
    Ok(())
}

pub fn read_binary_file(path: impl AsRef<Path>) -> Result<Laptop, SerializerError> {
    let data = std::fs::read(path)?;
    Ok(Laptop::decode(data.as_slice())?)
}

pub fn to_json(laptop: &Laptop) -> Result<String, SerializerError> {
    Ok(serde_json::to_string_pretty(laptop)?)
}

pub fn write_json_file(laptop: &Laptop, path: impl AsRef<Path>) -> Result<(), SerializerError> {
    std::fs::write(path, to_json(laptop)?)?;
    Ok(())
}

pub fn read_json_file(path: impl AsRef<Path>) -> Result<Laptop, SerializerError> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

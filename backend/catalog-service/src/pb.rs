//! Wire messages for `techschool.pcbook.LaptopService`
//!
//! Standard protobuf wire format via prost derives (no `.proto` file). The
//! same structs double as the catalog's record model and are serde-enabled
//! for the JSON file export in `serializer`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum MemoryUnit {
    Unknown = 0,
    Bit = 1,
    Byte = 2,
    Kilobyte = 3,
    Megabyte = 4,
    Gigabyte = 5,
    Terabyte = 6,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum StorageDriver {
    Unknown = 0,
    Hdd = 1,
    Ssd = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum PanelType {
    Unknown = 0,
    Ips = 1,
    Oled = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum KeyboardLayout {
    Unknown = 0,
    Qwerty = 1,
    Qwertz = 2,
    Azerty = 3,
}

// ---------------------------------------------------------------------------
// Laptop record
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Memory {
    #[prost(uint64, tag = "1")]
    pub value: u64,
    #[prost(enumeration = "MemoryUnit", tag = "2")]
    pub unit: i32,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Cpu {
    #[prost(string, tag = "1")]
    pub brand: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(uint32, tag = "3")]
    pub number_cores: u32,
    #[prost(uint32, tag = "4")]
    pub number_threads: u32,
    #[prost(double, tag = "5")]
    pub min_ghz: f64,
    #[prost(double, tag = "6")]
    pub max_ghz: f64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Gpu {
    #[prost(string, tag = "1")]
    pub brand: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(double, tag = "3")]
    pub min_ghz: f64,
    #[prost(double, tag = "4")]
    pub max_ghz: f64,
    #[prost(message, optional, tag = "5")]
    pub memory: Option<Memory>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Storage {
    #[prost(enumeration = "StorageDriver", tag = "1")]
    pub driver: i32,
    #[prost(message, optional, tag = "2")]
    pub memory: Option<Memory>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Resolution {
    #[prost(uint32, tag = "1")]
    pub width: u32,
    #[prost(uint32, tag = "2")]
    pub height: u32,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Screen {
    #[prost(float, tag = "1")]
    pub size_inch: f32,
    #[prost(message, optional, tag = "2")]
    pub resolution: Option<Resolution>,
    #[prost(enumeration = "PanelType", tag = "3")]
    pub panel: i32,
    #[prost(bool, tag = "4")]
    pub multitouch: bool,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Keyboard {
    #[prost(enumeration = "KeyboardLayout", tag = "1")]
    pub layout: i32,
    #[prost(bool, tag = "2")]
    pub backlit: bool,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Laptop {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub brand: String,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(message, optional, tag = "4")]
    pub cpu: Option<Cpu>,
    #[prost(message, optional, tag = "5")]
    pub ram: Option<Memory>,
    #[prost(message, repeated, tag = "6")]
    pub gpus: Vec<Gpu>,
    #[prost(message, repeated, tag = "7")]
    pub storages: Vec<Storage>,
    #[prost(message, optional, tag = "8")]
    pub screen: Option<Screen>,
    #[prost(message, optional, tag = "9")]
    pub keyboard: Option<Keyboard>,
    #[prost(oneof = "laptop::Weight", tags = "10, 11")]
    pub weight: Option<laptop::Weight>,
    #[prost(double, tag = "12")]
    pub price_usd: f64,
    #[prost(uint32, tag = "13")]
    pub release_year: u32,
    #[prost(message, optional, tag = "14")]
    #[serde(with = "timestamp_format", default)]
    pub updated_at: Option<prost_types::Timestamp>,
}

pub mod laptop {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, prost::Oneof, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Weight {
        #[prost(double, tag = "10")]
        WeightKg(f64),
        #[prost(double, tag = "11")]
        WeightLb(f64),
    }
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Filter {
    #[prost(double, tag = "1")]
    pub max_price_usd: f64,
    #[prost(uint32, tag = "2")]
    pub min_cpu_cores: u32,
    #[prost(double, tag = "3")]
    pub min_cpu_ghz: f64,
    #[prost(message, optional, tag = "4")]
    pub min_ram: Option<Memory>,
}

/// RFC 3339 strings for the protobuf timestamp in JSON exports
mod timestamp_format {
    use chrono::{DateTime, Utc};
    use prost_types::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = ts
            .as_ref()
            .and_then(|t| DateTime::<Utc>::from_timestamp(t.seconds, t.nanos.max(0) as u32))
            .map(|dt| dt.to_rfc3339());

        match formatted {
            Some(s) => serializer.serialize_some(&s),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Timestamp>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| Timestamp {
                    seconds: dt.timestamp(),
                    nanos: dt.timestamp_subsec_nanos() as i32,
                })
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

// ---------------------------------------------------------------------------
// RPC messages
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateLaptopRequest {
    #[prost(message, optional, tag = "1")]
    pub laptop: Option<Laptop>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateLaptopResponse {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SearchLaptopRequest {
    #[prost(message, optional, tag = "1")]
    pub filter: Option<Filter>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SearchLaptopResponse {
    #[prost(message, optional, tag = "1")]
    pub laptop: Option<Laptop>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageInfo {
    #[prost(string, tag = "1")]
    pub laptop_id: String,
    #[prost(string, tag = "2")]
    pub image_type: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UploadImageRequest {
    #[prost(oneof = "upload_image_request::Data", tags = "1, 2")]
    pub data: Option<upload_image_request::Data>,
}

pub mod upload_image_request {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "1")]
        Info(super::ImageInfo),
        #[prost(bytes = "vec", tag = "2")]
        ChunkData(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UploadImageResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(uint32, tag = "2")]
    pub size: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RateLaptopRequest {
    #[prost(string, tag = "1")]
    pub laptop_id: String,
    #[prost(double, tag = "2")]
    pub score: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RateLaptopResponse {
    #[prost(string, tag = "1")]
    pub laptop_id: String,
    #[prost(uint32, tag = "2")]
    pub rated_count: u32,
    #[prost(double, tag = "3")]
    pub average_score: f64,
}

// ---------------------------------------------------------------------------
// Generated service trait + server/client
// ---------------------------------------------------------------------------

include!(concat!(env!("OUT_DIR"), "/techschool.pcbook.LaptopService.rs"));

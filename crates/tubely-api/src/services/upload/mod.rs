//! Asset upload service: multipart decoding and the upload pipeline.

pub mod decoder;
pub mod service;

pub use decoder::UploadDecoder;
pub use service::AssetUploadService;

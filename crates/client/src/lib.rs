//! Cover resolution for coverfind.
//!
//! This crate provides the outbound HTTP transport, the source clients
//! (catalog, volumes API, image search), title normalization, the strategy
//! cascade, and the download/batch pipeline shared by the server and CLI.

pub mod batch;
pub mod catalog;
pub mod download;
pub mod http;
pub mod pipeline;
pub mod resolver;
pub mod scrape;
pub mod strategy;
pub mod text;
pub mod volumes;

pub use batch::{BatchProcessor, BatchReport};
pub use catalog::{CatalogClient, CatalogConfig, CatalogQuery};
pub use download::CoverDownloader;
pub use http::{HttpTransport, ReqwestTransport, TransportConfig};
pub use pipeline::CoverPipeline;
pub use resolver::CoverResolver;
pub use scrape::ImageSearch;
pub use strategy::{CASCADE, Sources, Strategy};
pub use volumes::{VolumesClient, VolumesConfig};

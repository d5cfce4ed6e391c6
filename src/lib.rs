//! Core entry point for the eventiq_certificates crate.

pub mod builder;
pub mod config;
pub mod decoration;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod record;
pub mod repository;
pub mod richtext;
pub mod service;

pub use builder::{CertificateRenderer, RenderCertificate, RendererBuilder, PDF_MEDIA_TYPE};
pub use config::Config;
pub use error::{CertificateError, RenderError, RosterError};
pub use record::{CertificateDetails, CertificateRequest, VolunteerId, VolunteerRecord};
pub use repository::{InMemoryVolunteerStore, VolunteerRepository};
pub use service::{BulkMode, CertificateService, Clock, FixedClock, SystemClock};

pub mod contact_service;
pub mod conversion_service;
pub mod lead_service;
pub mod tenant_service;
pub mod user_service;

pub use contact_service::ContactService;
pub use conversion_service::{ConversionFilters, ConversionService};
pub use lead_service::{CreateLead, LeadFilters, LeadService, UpdateLead};
pub use tenant_service::TenantService;
pub use user_service::UserService;

use thiserror::Error;

/// Errors raised by the service layer. Handlers convert these to API
/// errors; raw database failures are classified internal at that boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

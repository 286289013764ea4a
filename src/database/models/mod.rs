pub mod contact;
pub mod conversion;
pub mod lead;
pub mod tenant;
pub mod user;

pub use contact::Contact;
pub use conversion::{ConversionRecord, LeadConversion};
pub use lead::{conversion_triggered, Lead, LeadStatus};
pub use tenant::Tenant;
pub use user::{User, UserRole};

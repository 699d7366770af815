//! Faktura Service — aggregate services orchestrating validation,
//! existence checks, uniqueness checks, and persistence.
//!
//! Every service is generic over the repository traits it consumes, so
//! this crate has no dependency on the database crate. Operations
//! validate fail-fast: presence and format first, then referential
//! existence, then uniqueness, then construction and persistence. The
//! first failing check aborts the operation with no partial writes.

pub mod client;
pub mod company;
pub mod invoice;
pub mod membership;
pub mod user;

pub use client::ClientService;
pub use company::CompanyService;
pub use invoice::InvoiceService;
pub use membership::MembershipService;
pub use user::UserService;

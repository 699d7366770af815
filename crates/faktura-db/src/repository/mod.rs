//! SurrealDB implementations of the `faktura-core` repository traits.

mod client;
mod company;
mod company_member;
mod invoice;
mod user;

pub use client::SurrealClientRepository;
pub use company::SurrealCompanyRepository;
pub use company_member::SurrealCompanyMemberRepository;
pub use invoice::SurrealInvoiceRepository;
pub use user::SurrealUserRepository;

/// Database models for Makerfolio
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `creator`: Creator accounts and public profiles (one entity; credentials
///   are optional so directory-created profiles exist without a login)
/// - `product`: Digital products with the draft/submitted/approved/rejected
///   moderation lifecycle
/// - `resource`: Free/premium downloadable assets
/// - `tag`: Lookup taxonomy for products and resources
/// - `email_submission`: Append-only lead capture records

pub mod creator;
pub mod email_submission;
pub mod product;
pub mod resource;
pub mod tag;

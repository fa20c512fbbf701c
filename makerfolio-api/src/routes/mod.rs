/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, current creator
/// - `creators`: Creator directory and public profiles
/// - `products`: Product CRUD and moderation lifecycle
/// - `resources`: Resource library CRUD
/// - `tags`: Tag taxonomy
/// - `email_submissions`: Lead capture

pub mod auth;
pub mod creators;
pub mod email_submissions;
pub mod health;
pub mod products;
pub mod resources;
pub mod tags;

//! Backend operations, grouped by collection.

pub mod auth;
pub mod booking;
pub mod guest;
pub mod room;

pub use auth::*;
pub use booking::*;
pub use guest::*;
pub use room::*;

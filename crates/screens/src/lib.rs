//! # Frontdesk Screens Crate
//!
//! State and actions behind each screen of the client. A screen owns its
//! fetched data, form errors, loading flags and notice banner; the front end
//! only renders what a screen exposes and forwards user input to it.
//!
//! ## Screens
//!
//! - **resource**: the generic list/edit/delete screen (`GuestsScreen`, `RoomsScreen`)
//! - **bookings**: the bookings screen, which also loads guest and room choices
//! - **dashboard**: the day's figures and the most recent bookings
//! - **login**: sign-in and registration
//!
//! Data requests go straight to the gateway client. Only session changes flow
//! through the auth controller; a screen hands it every API error first so
//! an expired session signs out instead of showing a banner.

pub mod bookings;
pub mod dashboard;
pub mod form;
pub mod login;
pub mod mount;
pub mod notice;
pub mod resource;

pub use bookings::BookingsScreen;
pub use dashboard::{DashboardScreen, DashboardStats};
pub use form::{BookingForm, FieldErrors, GuestForm, ResourceForm, RoomForm};
pub use login::{LoginScreen, RegisterScreen, REGISTERED};
pub use mount::MountHandle;
pub use notice::{Notice, NoticeKind};
pub use resource::{GuestsScreen, Loading, ResourceScreen, RoomsScreen, ScreenResource};

//! Summary of the day's activity.

use std::sync::Arc;

use chrono::NaiveDate;
use frontdesk_auth::{AuthController, SERVER_UNREACHABLE};
use frontdesk_gateway::{Booking, Guest, Room};
use tracing::warn;

use crate::mount::MountHandle;
use crate::notice::Notice;

const RECENT_BOOKINGS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_guests: usize,
    pub available_rooms: usize,
    pub todays_check_ins: usize,
    pub todays_revenue: f64,
    /// Latest check-in first.
    pub recent_bookings: Vec<Booking>,
}

impl DashboardStats {
    pub fn compute(guests: &[Guest], rooms: &[Room], bookings: &[Booking], today: NaiveDate) -> Self {
        let occupied = |room: &Room| {
            bookings
                .iter()
                .any(|booking| booking.room_id == room.id && booking.occupies(today))
        };
        let nightly_rate = |booking: &Booking| {
            rooms
                .iter()
                .find(|room| room.id == booking.room_id)
                .or(booking.room.as_ref())
                .map_or(0.0, |room| room.price)
        };

        let arriving: Vec<&Booking> = bookings
            .iter()
            .filter(|booking| booking.check_in == today)
            .collect();

        let mut recent = bookings.to_vec();
        recent.sort_by(|a, b| b.check_in.cmp(&a.check_in));
        recent.truncate(RECENT_BOOKINGS);

        Self {
            total_guests: guests.len(),
            available_rooms: rooms.iter().filter(|room| !occupied(room)).count(),
            todays_check_ins: arriving.len(),
            todays_revenue: arriving
                .iter()
                .map(|booking| nightly_rate(booking) * f64::from(booking.nights()))
                .sum(),
            recent_bookings: recent,
        }
    }
}

pub struct DashboardScreen {
    auth: Arc<AuthController>,
    mount: MountHandle,
    stats: Option<DashboardStats>,
    notice: Option<Notice>,
    loading: bool,
}

impl DashboardScreen {
    pub fn new(auth: Arc<AuthController>) -> Self {
        Self {
            auth,
            mount: MountHandle::new(),
            stats: None,
            notice: None,
            loading: false,
        }
    }

    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Fetch all three collections at once and recompute the figures for `today`.
    pub async fn load(&mut self, today: NaiveDate) -> bool {
        self.loading = true;
        let client = self.auth.client();
        let (guests, rooms, bookings) =
            tokio::join!(client.guests(), client.rooms(), client.bookings());
        if !self.mount.is_mounted() {
            return false;
        }
        self.loading = false;

        let error = match (guests, rooms, bookings) {
            (Ok(guests), Ok(rooms), Ok(bookings)) => {
                self.stats = Some(DashboardStats::compute(&guests, &rooms, &bookings, today));
                self.notice = None;
                return true;
            }
            (Err(error), _, _) | (_, Err(error), _) | (_, _, Err(error)) => error,
        };

        if self.auth.handle_api_error(&error) {
            return false;
        }
        warn!(%error, "dashboard data unavailable");
        self.notice = Some(Notice::error(if error.is_transport() {
            SERVER_UNREACHABLE
        } else {
            "Failed to load dashboard data. Please try again."
        }));
        false
    }
}

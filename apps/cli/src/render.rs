use colored::*;
use frontdesk_gateway::{Booking, Guest, Room};
use frontdesk_screens::{DashboardStats, FieldErrors, Notice};

/// A record that can be printed as one table row.
pub trait Tabular {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

impl Tabular for Guest {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Email", "Phone", "Address"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.address.clone().unwrap_or_default(),
        ]
    }
}

impl Tabular for Room {
    const HEADERS: &'static [&'static str] =
        &["ID", "Number", "Type", "Price", "Capacity", "Description"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.room_number.clone(),
            self.room_type.to_string(),
            format!("{:.2}", self.price),
            self.capacity.to_string(),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

impl Tabular for Booking {
    const HEADERS: &'static [&'static str] =
        &["ID", "Guest", "Room", "Check-in", "Check-out", "Nights", "Total", "Requests"];

    fn row(&self) -> Vec<String> {
        let guest = self
            .guest
            .as_ref()
            .map(|guest| guest.name.clone())
            .unwrap_or_else(|| self.guest_id.to_string());
        let room = self
            .room
            .as_ref()
            .map(|room| room.room_number.clone())
            .unwrap_or_else(|| self.room_id.to_string());

        vec![
            self.id.to_string(),
            guest,
            room,
            self.check_in.to_string(),
            self.check_out.to_string(),
            self.nights().to_string(),
            self.total_price()
                .map(|total| format!("{total:.2}"))
                .unwrap_or_default(),
            self.special_requests.clone().unwrap_or_default(),
        ]
    }
}

pub fn table<T: Tabular>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "Nothing to show".dimmed());
        return;
    }

    let rows: Vec<Vec<String>> = items.iter().map(Tabular::row).collect();
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|header| header.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = T::HEADERS
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{header:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header.bold());
    println!("{}", "-".repeat(header.len()));

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{line}");
    }
}

/// One record as `Header: value` lines.
pub fn details<T: Tabular>(item: &T) {
    let width = T::HEADERS.iter().map(|header| header.len()).max().unwrap_or(0);
    for (header, value) in T::HEADERS.iter().zip(item.row()) {
        println!("{:>width$}  {}", header.bold(), value);
    }
}

pub fn notice(notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    if notice.is_error() {
        eprintln!("{}", notice.message.red());
    } else {
        println!("{}", notice.message.green());
    }
}

pub fn field_errors(errors: &FieldErrors) {
    for (field, message) in errors {
        eprintln!("  {} {}", format!("{field}:").yellow(), message);
    }
}

pub fn dashboard(stats: &DashboardStats) {
    println!("{:>18}  {}", "Total guests".bold(), stats.total_guests);
    println!("{:>18}  {}", "Available rooms".bold(), stats.available_rooms);
    println!("{:>18}  {}", "Today's check-ins".bold(), stats.todays_check_ins);
    println!(
        "{:>18}  {}",
        "Today's revenue".bold(),
        format!("{:.2}", stats.todays_revenue).green()
    );
    println!();
    println!("{}", "Recent bookings".bold().underline());
    table(&stats.recent_bookings);
}

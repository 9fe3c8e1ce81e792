//! Appointment commands: `appointments list/book/status`.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};

use agency_desk::models::{Appointment, AppointmentStatus, NewAppointment};
use agency_desk::notify::Toast;
use agency_desk::store::{Mutation, ResourceTag};
use agency_desk::ui::icons::CALENDAR;

use super::super::AppointmentCommands;
use super::{Desk, print_json, print_page};

fn line(a: &Appointment) -> String {
    let time = a
        .time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    format!(
        "  #{:<5} {}{} {}  {:<24} {:<30} {}",
        a.id,
        CALENDAR,
        a.date,
        time,
        a.name,
        a.email,
        a.status.as_str()
    )
}

pub async fn cmd_appointments(desk: &mut Desk, command: AppointmentCommands) -> Result<()> {
    match command {
        AppointmentCommands::List { status, page } => {
            desk.require_admin().await?;
            let status = status
                .map(|s| s.parse::<AppointmentStatus>().map_err(|e| anyhow::anyhow!(e)))
                .transpose()?;
            let mut appointments = desk
                .fetch("Loading appointments...", desk.client.list_appointments())
                .await?;
            desk.store
                .write(ResourceTag::Appointments, appointments.clone());
            appointments.retain(|a| status.is_none_or(|s| a.status == s));
            appointments.sort_by_key(|a| (a.date, a.time));

            if desk.is_json() {
                return print_json(&appointments);
            }
            println!();
            if appointments.is_empty() {
                println!("No appointments.");
                return Ok(());
            }
            print_page(&appointments, page, desk.page_size(None), line);
            println!();
        }
        AppointmentCommands::Book {
            name,
            email,
            date,
            time,
            notes,
        } => {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?;
            let time = time
                .map(|t| {
                    NaiveTime::parse_from_str(&t, "%H:%M")
                        .with_context(|| format!("Invalid time '{}', expected HH:MM", t))
                })
                .transpose()?;
            let appointment = NewAppointment {
                name,
                email,
                date,
                time,
                notes,
            };
            let today = Local::now().date_naive();
            let booked = desk
                .fetch(
                    "Booking...",
                    desk.client.book_appointment(&appointment, today),
                )
                .await?;
            desk.mutated(Mutation::AppointmentChanged);
            desk.notifier.notify(Toast::success(format!(
                "Appointment booked for {}",
                booked.date
            )));
            if desk.is_json() {
                print_json(&booked)?;
            }
        }
        AppointmentCommands::Status { id, status } => {
            desk.require_admin().await?;
            let status = status
                .parse::<AppointmentStatus>()
                .map_err(|e| anyhow::anyhow!(e))?;
            let updated = desk
                .fetch(
                    "Updating appointment...",
                    desk.client.set_appointment_status(id, status),
                )
                .await?;
            desk.mutated(Mutation::AppointmentChanged);
            desk.notifier.notify(Toast::success(format!(
                "Appointment #{} is now {}",
                id,
                updated.status.as_str()
            )));
        }
    }
    Ok(())
}

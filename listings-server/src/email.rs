//! Notification emails (AWS SES v2)
//!
//! All messages are bilingual plain text (Spanish first). Delivery failures
//! are logged and never surface to the HTTP caller. With `EMAIL_ENABLED=false`
//! the service only logs what it would have sent.

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use shared::models::{Booking, BookingStatus};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("failed to build email: {0}")]
    Build(#[from] aws_sdk_sesv2::error::BuildError),
    #[error("SES send failed: {0}")]
    Send(String),
}

/// Rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

#[derive(Clone)]
pub struct EmailService {
    ses: Option<SesClient>,
    from: String,
    notify_email: Option<String>,
}

impl EmailService {
    /// SES-backed service when email is enabled, log-only otherwise
    pub async fn from_config(config: &Config) -> Self {
        if !config.email_enabled {
            tracing::info!("Email delivery disabled, notifications will only be logged");
            return Self::log_only(&config.ses_from_email, config.notify_email.clone());
        }

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        Self {
            ses: Some(ses),
            from: config.ses_from_email.clone(),
            notify_email: config.notify_email.clone(),
        }
    }

    pub fn log_only(from: &str, notify_email: Option<String>) -> Self {
        Self {
            ses: None,
            from: from.to_string(),
            notify_email,
        }
    }

    /// Admin inbox for notifications
    pub fn notify_email(&self) -> Option<&str> {
        self.notify_email.as_deref()
    }

    async fn send(&self, to: &str, message: &EmailMessage) -> Result<(), EmailError> {
        let Some(ses) = &self.ses else {
            tracing::info!(to = to, subject = %message.subject, "Email (log only)");
            return Ok(());
        };

        let subject = Content::builder().data(&message.subject).build()?;
        let body = Body::builder()
            .text(Content::builder().data(&message.body).build()?)
            .build();
        let email = Message::builder().subject(subject).body(body).build();

        ses.send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(email).build())
            .send()
            .await
            .map_err(|e| {
                EmailError::Send(aws_sdk_sesv2::error::DisplayErrorContext(&e).to_string())
            })?;

        tracing::info!(to = to, subject = %message.subject, "Email sent");
        Ok(())
    }

    async fn deliver(&self, to: &str, message: EmailMessage) {
        if let Err(e) = self.send(to, &message).await {
            tracing::error!(to = to, subject = %message.subject, error = %e, "Email delivery failed");
        }
    }

    /// Acknowledge a new booking to the guest
    pub async fn send_booking_received(&self, booking: &Booking, venue_name: &str) {
        self.deliver(
            &booking.guest_email,
            booking_received_message(booking, venue_name),
        )
        .await;
    }

    /// Tell the venue (or the admin inbox) about a new booking
    pub async fn send_booking_notification(&self, to: &str, booking: &Booking, venue_name: &str) {
        self.deliver(to, booking_notification_message(booking, venue_name))
            .await;
    }

    /// Tell the guest their booking was confirmed or cancelled
    pub async fn send_booking_status(&self, booking: &Booking, venue_name: &str) {
        let Some(message) = booking_status_message(booking, venue_name) else {
            return;
        };
        self.deliver(&booking.guest_email, message).await;
    }

    /// Tell the admin inbox a daily menu was uploaded
    pub async fn send_menu_uploaded(&self, eatery_name: &str, menu_date: &str, url: &str) {
        let Some(to) = self.notify_email.clone() else {
            tracing::debug!("NOTIFY_EMAIL not set, skipping menu notification");
            return;
        };
        self.deliver(&to, menu_uploaded_message(eatery_name, menu_date, url))
            .await;
    }
}

fn when(booking: &Booking) -> String {
    match &booking.booking_time {
        Some(time) => format!("{} {}", booking.booking_date, time),
        None => booking.booking_date.clone(),
    }
}

pub fn booking_received_message(booking: &Booking, venue_name: &str) -> EmailMessage {
    let when = when(booking);
    let party = booking.party_size;
    EmailMessage {
        subject: format!("Reserva recibida / Booking received: {venue_name}"),
        body: format!(
            "Hola {name},\n\
             Hemos recibido tu reserva en {venue_name} para {party} persona(s) el {when}.\n\
             Te avisaremos cuando sea confirmada.\n\n\
             Hello {name},\n\
             We have received your booking at {venue_name} for {party} guest(s) on {when}.\n\
             We will let you know once it is confirmed.",
            name = booking.guest_name,
        ),
    }
}

pub fn booking_notification_message(booking: &Booking, venue_name: &str) -> EmailMessage {
    let when = when(booking);
    let phone = booking.guest_phone.as_deref().unwrap_or("-");
    let notes = booking.notes.as_deref().unwrap_or("-");
    EmailMessage {
        subject: format!("Nueva reserva / New booking: {venue_name}"),
        body: format!(
            "Nueva reserva #{id} / New booking #{id}\n\n\
             Lugar / Venue: {venue_name}\n\
             Fecha / Date: {when}\n\
             Personas / Guests: {party}\n\
             Nombre / Name: {name}\n\
             Email: {email}\n\
             Teléfono / Phone: {phone}\n\
             Notas / Notes: {notes}",
            id = booking.id,
            party = booking.party_size,
            name = booking.guest_name,
            email = booking.guest_email,
        ),
    }
}

/// `None` for statuses the guest is not told about
pub fn booking_status_message(booking: &Booking, venue_name: &str) -> Option<EmailMessage> {
    let when = when(booking);
    let name = &booking.guest_name;
    match booking.status {
        BookingStatus::Confirmed => Some(EmailMessage {
            subject: format!("Reserva confirmada / Booking confirmed: {venue_name}"),
            body: format!(
                "Hola {name},\n\
                 Tu reserva en {venue_name} el {when} ha sido confirmada.\n\n\
                 Hello {name},\n\
                 Your booking at {venue_name} on {when} has been confirmed."
            ),
        }),
        BookingStatus::Cancelled => Some(EmailMessage {
            subject: format!("Reserva cancelada / Booking cancelled: {venue_name}"),
            body: format!(
                "Hola {name},\n\
                 Tu reserva en {venue_name} el {when} ha sido cancelada.\n\n\
                 Hello {name},\n\
                 Your booking at {venue_name} on {when} has been cancelled."
            ),
        }),
        BookingStatus::Pending => None,
    }
}

pub fn menu_uploaded_message(eatery_name: &str, menu_date: &str, url: &str) -> EmailMessage {
    EmailMessage {
        subject: format!("Menú del día / Daily menu: {eatery_name} {menu_date}"),
        body: format!(
            "{eatery_name} ha subido el menú del {menu_date}: {url}\n\n\
             {eatery_name} uploaded the menu for {menu_date}: {url}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::VenueKind;

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: 12,
            venue_kind: VenueKind::Restaurant,
            venue_id: 3,
            guest_name: "Lucía".into(),
            guest_email: "lucia@example.com".into(),
            guest_phone: None,
            booking_date: "2030-05-01".into(),
            booking_time: Some("21:30".into()),
            party_size: 4,
            notes: Some("Terraza".into()),
            status,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_booking_received_is_bilingual() {
        let msg = booking_received_message(&booking(BookingStatus::Pending), "El Faro");
        assert!(msg.subject.contains("El Faro"));
        assert!(msg.body.contains("Hola Lucía"));
        assert!(msg.body.contains("Hello Lucía"));
        assert!(msg.body.contains("2030-05-01 21:30"));
        assert!(msg.body.contains("4 guest(s)"));
    }

    #[test]
    fn test_notification_lists_guest_details() {
        let msg = booking_notification_message(&booking(BookingStatus::Pending), "El Faro");
        assert!(msg.body.contains("#12"));
        assert!(msg.body.contains("lucia@example.com"));
        assert!(msg.body.contains("Notas / Notes: Terraza"));
        assert!(msg.body.contains("Teléfono / Phone: -"));
    }

    #[test]
    fn test_status_messages() {
        assert!(booking_status_message(&booking(BookingStatus::Pending), "X").is_none());
        let confirmed = booking_status_message(&booking(BookingStatus::Confirmed), "X").unwrap();
        assert!(confirmed.subject.contains("confirmed"));
        let cancelled = booking_status_message(&booking(BookingStatus::Cancelled), "X").unwrap();
        assert!(cancelled.body.contains("cancelada"));
    }

    #[tokio::test]
    async fn test_log_only_service_never_fails() {
        let service = EmailService::log_only("noreply@example.com", None);
        assert!(service.notify_email().is_none());
        service
            .send_booking_received(&booking(BookingStatus::Pending), "El Faro")
            .await;
        service.send_menu_uploaded("Casa Pepa", "2030-05-01", "http://x/menu.pdf").await;
    }
}

//! Staffly outbound notification delivery.
//!
//! - [`Mailer`] — async SMTP delivery via lettre. Construction is gated on
//!   configuration: no `SMTP_HOST`, no mailer, and callers skip dispatch.
//! - [`Notification`] — the typed email templates (account confirmation,
//!   password reset).
//!
//! Delivery is a fire-and-forget boundary: callers dispatch after their
//! transaction commits, and a failed send never rolls anything back.

pub mod mailer;
pub mod template;

pub use mailer::{EmailConfig, EmailError, Mailer};
pub use template::Notification;

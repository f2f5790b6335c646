//! HTTP handlers, one module per resource.

pub mod auth;
pub mod employees;
pub mod import;

use staffly_events::Notification;

use crate::state::AppState;

/// Dispatch one notification email in the background.
///
/// This is a deliberate at-least-once, best-effort boundary: dispatch
/// happens after the caller's transaction has committed, and a failed (or
/// unconfigured) send is logged but never propagated.
pub(crate) fn dispatch_notification(state: &AppState, to_email: String, notification: Notification) {
    let Some(mailer) = state.mailer.clone() else {
        tracing::warn!(to = %to_email, "SMTP not configured, skipping notification email");
        return;
    };

    tokio::spawn(async move {
        if let Err(error) = mailer.send(&to_email, &notification).await {
            tracing::error!(to = %to_email, %error, "Failed to send notification email");
        }
    });
}

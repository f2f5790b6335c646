//! Typed email templates.
//!
//! Plain-text messages with the recipient's first name and the one-time
//! code. The code in the message is the only plaintext copy that ever
//! leaves the system; the database stores a hash.

/// A notification to deliver to one employee.
#[derive(Debug, Clone)]
pub enum Notification {
    /// Sent after registration or an email change; carries the
    /// account-confirmation code.
    ConfirmAccount { name: String, code: String },
    /// Sent on a forgot-password request; carries the reset code.
    ResetPassword { name: String, code: String },
}

impl Notification {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::ConfirmAccount { .. } => "[Staffly] Confirm your account",
            Self::ResetPassword { .. } => "[Staffly] Reset your password",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::ConfirmAccount { name, code } => format!(
                "Hello {name},\n\n\
                 Welcome to Staffly. Use the following code to confirm your account:\n\n\
                 {code}\n\n\
                 The code expires in one hour. If you did not expect this email, you can\n\
                 safely ignore it.\n"
            ),
            Self::ResetPassword { name, code } => format!(
                "Hello {name},\n\n\
                 A password reset was requested for your account. Use the following code\n\
                 to choose a new password:\n\n\
                 {code}\n\n\
                 The code expires in one hour. If you did not request a reset, you can\n\
                 safely ignore this email.\n"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_carry_name_and_code() {
        let notification = Notification::ConfirmAccount {
            name: "Amel".to_string(),
            code: "abc-123".to_string(),
        };
        let body = notification.body();
        assert!(body.contains("Amel"));
        assert!(body.contains("abc-123"));
        assert_eq!(notification.subject(), "[Staffly] Confirm your account");
    }

    #[test]
    fn reset_template_mentions_the_reset() {
        let notification = Notification::ResetPassword {
            name: "Sami".to_string(),
            code: "xyz".to_string(),
        };
        assert!(notification.body().contains("password reset"));
        assert_eq!(notification.subject(), "[Staffly] Reset your password");
    }
}

//! Closed domain value sets.
//!
//! Every enum stores a canonical token (the exact string persisted in the
//! database and returned by the API) and accepts case-insensitive input via
//! [`from_input`](Gender::from_input), because spreadsheet cells arrive as
//! `"male"`, `"MALE"`, `" Male "` and all must match.

use serde::{Deserialize, Serialize};

macro_rules! domain_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $token:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// The canonical token stored in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $token),+
                }
            }

            /// All canonical tokens, in declaration order.
            pub fn possible_values() -> &'static [&'static str] {
                &[$($token),+]
            }

            /// Case-insensitive, whitespace-trimming match against the
            /// closed set. Returns `None` for anything outside it.
            pub fn from_input(input: &str) -> Option<Self> {
                let token = input.trim();
                $(
                    if token.eq_ignore_ascii_case($token) {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

domain_enum! {
    /// Employee gender.
    Gender { Male => "Male", Female => "Female" }
}

domain_enum! {
    /// Employment contract type. Cnss registration is mandatory for `Cdi`
    /// and `Cdd` contracts only.
    ContractType {
        Cdi => "Cdi",
        Cdd => "Cdd",
        Sivp => "Sivp",
        Apprenti => "Apprenti",
    }
}

domain_enum! {
    /// Application role granted to an employee. An employee holds one or
    /// more roles; they are persisted separately from the employee row.
    RoleType {
        Admin => "Admin",
        Vendor => "Vendor",
        User => "User",
    }
}

domain_enum! {
    /// Whether the employee has confirmed their account via the emailed
    /// code. `Inactive` accounts cannot log in.
    AccountStatus { Active => "Active", Inactive => "Inactive" }
}

domain_enum! {
    /// Lifecycle of an emailed one-time code.
    TokenStatus { Pending => "Pending", Used => "Used" }
}

//! Value vocabularies for the free-text columns.
//!
//! The schema stores these as plain text and does not reject other values;
//! the enums give callers the canonical spellings.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Exact match on the stored spelling.
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_str().to_string()
            }
        }
    };
}

text_enum!(
    #[derive(Default)]
    Role {
        #[default]
        Customer => "customer",
        Admin => "admin",
    }
);

text_enum!(
    #[derive(Default)]
    AdminLevel {
        #[default]
        Staff => "staff",
        Manager => "manager",
        Superadmin => "superadmin",
    }
);

text_enum!(BookingType {
    Consultation => "consultation",
    Installation => "installation",
});

text_enum!(ServiceType {
    Solar => "solar",
    Ev => "ev",
    SmartHome => "smart_home",
});

text_enum!(
    #[derive(Default)]
    BookingStatus {
        #[default]
        Pending => "pending",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

text_enum!(
    #[derive(Default)]
    Language {
        #[default]
        En => "en",
        Fr => "fr",
        Es => "es",
    }
);

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raised when a stored string does not match any enum variant.
/// Rows are written through the typed API, so hitting this means the
/// database was edited out-of-band.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum!(Role, "role", {
    Admin => "admin",
    Superadmin => "superadmin",
    Seller => "seller",
    Buyer => "buyer",
});

string_enum!(ListingCategory, "listing category", {
    Cattle => "cattle",
    Goat => "goat",
    Sheep => "sheep",
    Poultry => "poultry",
    Other => "other",
});

// Listing lifecycle. New listings start as `pending` and stay off the
// public marketplace until an admin moves them to `active`.
string_enum!(ListingStatus, "listing status", {
    Pending => "pending",
    Active => "active",
    Inactive => "inactive",
});

string_enum!(CommissionStatus, "commission status", {
    Pending => "pending",
    Completed => "completed",
    Cancelled => "cancelled",
});

string_enum!(QuestionCategory, "question category", {
    Health => "health",
    Feeding => "feeding",
    Breeding => "breeding",
    Marketing => "marketing",
    General => "general",
});

string_enum!(ResourceKind, "resource kind", {
    Video => "video",
    Article => "article",
    Course => "course",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips() {
        for role in [Role::Admin, Role::Superadmin, Role::Seller, Role::Buyer] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_an_error() {
        let err = "moderator".parse::<Role>().unwrap_err();
        assert_eq!(err.kind, "role");
        assert_eq!(err.value, "moderator");
    }

    #[test]
    fn listing_status_defaults_are_distinct() {
        assert_eq!("pending".parse::<ListingStatus>().unwrap(), ListingStatus::Pending);
        assert_eq!("active".parse::<ListingStatus>().unwrap(), ListingStatus::Active);
        assert_eq!("inactive".parse::<ListingStatus>().unwrap(), ListingStatus::Inactive);
    }

    #[test]
    fn serde_uses_lowercase_wire_form() {
        assert_eq!(serde_json::to_string(&Role::Superadmin).unwrap(), "\"superadmin\"");
        assert_eq!(
            serde_json::from_str::<ListingCategory>("\"cattle\"").unwrap(),
            ListingCategory::Cattle
        );
    }
}

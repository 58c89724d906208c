//! String-backed status columns.
//!
//! Columns are stored as plain `varchar`; these enums are the only values
//! the application writes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name { $($variant),+ }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self { $($name::$variant => $text),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ModelError::Validation(format!(
                        "unknown {} `{}`", stringify!($name), other
                    ))),
                }
            }
        }
    };
}

string_enum!(
    /// Mirrors the review state held by the KYC provider.
    KycStatus {
        NotStarted => "not_started",
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        ActionRequired => "action_required",
    }
);

string_enum!(SubscriberStatus { Active => "active", Unsubscribed => "unsubscribed" });

string_enum!(DealStatus { Draft => "draft", Open => "open", Closed => "closed", Funded => "funded" });

string_enum!(
    InvestorType {
        Individual => "individual",
        Accredited => "accredited",
        Institutional => "institutional",
        FamilyOffice => "family_office",
    }
);

string_enum!(TransferDirection { Deposit => "deposit", Withdrawal => "withdrawal" });

string_enum!(TransferStatus { Pending => "pending", Completed => "completed", Failed => "failed" });

string_enum!(PaymentMethodKind { BankAccount => "bank_account", Card => "card", Crypto => "crypto" });

string_enum!(DocumentStatus { Uploaded => "uploaded", Verified => "verified", Rejected => "rejected" });

string_enum!(InvestmentStatus { Pending => "pending", Confirmed => "confirmed", Cancelled => "cancelled" });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for s in KycStatus::ALL {
            assert_eq!(s.as_str().parse::<KycStatus>().unwrap(), *s);
        }
        assert_eq!("family_office".parse::<InvestorType>().unwrap(), InvestorType::FamilyOffice);
    }

    #[test]
    fn unknown_value_is_validation_error() {
        let err = "archived".parse::<DealStatus>().unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn serde_matches_column_text() {
        let v = serde_json::to_value(KycStatus::ActionRequired).unwrap();
        assert_eq!(v, "action_required");
    }
}

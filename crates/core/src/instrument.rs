//! Payment instrument kinds.

use serde::{Deserialize, Serialize};

/// How a purchase was paid.
///
/// Credit purchases may be split into monthly installments; debit purchases
/// are settled on the spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Credit card, payable in installments.
    Credit,
    /// Debit or cash, paid at purchase time.
    Debit,
}

impl PaymentKind {
    /// Returns true for credit purchases.
    #[must_use]
    pub fn is_credit(self) -> bool {
        matches!(self, Self::Credit)
    }
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credit => write!(f, "credit"),
            Self::Debit => write!(f, "debit"),
        }
    }
}

impl std::str::FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "credit" | "credito" | "crédito" => Ok(Self::Credit),
            "debit" | "debito" | "débito" => Ok(Self::Debit),
            _ => Err(format!("Unknown payment kind: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_payment_kind_from_str() {
        assert_eq!(PaymentKind::from_str("credit").unwrap(), PaymentKind::Credit);
        assert_eq!(PaymentKind::from_str("DEBIT").unwrap(), PaymentKind::Debit);
        assert_eq!(PaymentKind::from_str("crédito").unwrap(), PaymentKind::Credit);
        assert!(PaymentKind::from_str("pix").is_err());
    }

    #[test]
    fn test_payment_kind_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentKind::Credit).unwrap(),
            "\"credit\""
        );
        assert_eq!(PaymentKind::Debit.to_string(), "debit");
    }
}

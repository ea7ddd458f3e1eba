//! Prices in whole Chilean pesos.
//!
//! The backend sends prices as plain integers with no minor unit, so the
//! amount is kept as an `i64` and only formatted on display.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A price in whole pesos (CLP has no minor unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Amount in pesos.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Format for display the way es-CL renders CLP (e.g., "$12.990").
    #[must_use]
    pub fn display(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if self.0 < 0 {
            format!("-${grouped}")
        } else {
            format!("${grouped}")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

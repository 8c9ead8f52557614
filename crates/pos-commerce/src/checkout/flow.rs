//! Checkout state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a checkout session is in its lifecycle.
///
/// ```text
/// Empty -> Building -> Validating -> Committing -> Settled
///             ^            |             |           |
///             +------------+-------------+-----------+ (error / reset)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// No lines.
    #[default]
    Empty,
    /// Lines are being added or changed.
    Building,
    /// Commit started; re-fetching stock.
    Validating,
    /// Stock confirmed; sales are being created.
    Committing,
    /// Every sale was created; the receipt is showing.
    Settled,
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Empty => "empty",
            CheckoutState::Building => "building",
            CheckoutState::Validating => "validating",
            CheckoutState::Committing => "committing",
            CheckoutState::Settled => "settled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutState::Empty => "Empty",
            CheckoutState::Building => "Building",
            CheckoutState::Validating => "Validating",
            CheckoutState::Committing => "Committing",
            CheckoutState::Settled => "Settled",
        }
    }

    /// Whether cart lines may be changed.
    pub fn accepts_cart_changes(&self) -> bool {
        matches!(self, CheckoutState::Empty | CheckoutState::Building)
    }

    /// Check if a transition is allowed.
    pub fn can_transition_to(&self, next: CheckoutState) -> bool {
        use CheckoutState::*;

        matches!(
            (self, next),
            (Empty, Building)
                | (Building, Empty)
                | (Building, Building)
                | (Building, Validating)
                | (Validating, Building)
                | (Validating, Committing)
                | (Committing, Building)
                | (Committing, Settled)
                | (Settled, Empty)
                | (Empty, Empty)
        )
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }

    /// Position in the fulfilment sequence; terminal states have none.
    fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Processing => Some(2),
            OrderStatus::Shipped => Some(3),
            OrderStatus::Delivered => Some(4),
            OrderStatus::Cancelled | OrderStatus::Refunded => None,
        }
    }

    /// Whether moving from `self` to `to` follows the fulfilment sequence.
    /// Cancellation and refund count as forward from any live state. Status
    /// updates are not rejected on a non-forward move, only flagged.
    pub fn is_forward_transition(&self, to: OrderStatus) -> bool {
        match (self.rank(), to.rank()) {
            (Some(from), Some(to)) => to > from,
            // cancelling or refunding a live order
            (Some(_), None) => true,
            // leaving a terminal state is never a forward move
            (None, _) => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            "REFUNDED" => Ok(OrderStatus::Refunded),
            other => Err(DomainError::Validation(format!(
                "Unknown order status '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for s in [
            "PENDING",
            "CONFIRMED",
            "PROCESSING",
            "SHIPPED",
            "DELIVERED",
            "CANCELLED",
            "REFUNDED",
        ] {
            let status: OrderStatus = s.parse().expect("valid status");
            assert_eq!(status.as_str(), s);
        }
    }

    #[test]
    fn unknown_status_is_validation_error() {
        let err = "SHIPPING".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn fulfilment_sequence_is_forward() {
        assert!(OrderStatus::Pending.is_forward_transition(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.is_forward_transition(OrderStatus::Shipped));
        assert!(OrderStatus::Pending.is_forward_transition(OrderStatus::Delivered));
    }

    #[test]
    fn cancel_and_refund_are_forward_from_live_states() {
        assert!(OrderStatus::Pending.is_forward_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.is_forward_transition(OrderStatus::Refunded));
    }

    #[test]
    fn backwards_and_out_of_terminal_are_flagged() {
        assert!(!OrderStatus::Delivered.is_forward_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Confirmed.is_forward_transition(OrderStatus::Confirmed));
        assert!(!OrderStatus::Cancelled.is_forward_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Refunded.is_forward_transition(OrderStatus::Cancelled));
    }
}

//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Order fulfilment status.
///
/// Statuses form a fixed chain and only ever move forward:
///
/// `confirmed -> processing -> shipped -> out_for_delivery -> delivered`
///
/// The wire tokens are snake_case, matching what the platform documents
/// store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Confirmed,
    Processing,
    Shipped,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// All statuses in fulfilment order.
    pub const SEQUENCE: [Self; 5] = [
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Position of this status in the fulfilment chain.
    #[must_use]
    pub const fn stage(self) -> u8 {
        match self {
            Self::Confirmed => 0,
            Self::Processing => 1,
            Self::Shipped => 2,
            Self::OutForDelivery => 3,
            Self::Delivered => 4,
        }
    }

    /// Whether an update from `self` to `next` keeps the chain monotonic.
    ///
    /// Forward moves and same-status writes are allowed; backward moves
    /// never are.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        next.stage() >= self.stage()
    }

    /// The next status in the chain, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Confirmed => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::OutForDelivery => write!(f, "out_for_delivery"),
            Self::Delivered => write!(f, "delivered"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Account role stored on a user profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular shopper.
    #[default]
    User,
    /// Back-office access: catalog, orders, users, shipping settings.
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

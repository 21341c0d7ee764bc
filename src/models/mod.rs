use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order lifecycle status, stored as a single-letter code.
///
/// Statuses are advisory only; any transition between them is allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Pending,
    InProgress,
    Confirmed,
}

impl OrderStatus {
    /// Single-letter code used in the database.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Draft => "D",
            Self::Pending => "P",
            Self::InProgress => "I",
            Self::Confirmed => "C",
        }
    }

    /// Parses either a storage code or a spelled-out status name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "d" | "draft" => Some(Self::Draft),
            "p" | "pending" => Some(Self::Pending),
            "i" | "in_progress" | "in-progress" => Some(Self::InProgress),
            "c" | "confirmed" => Some(Self::Confirmed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Confirmed => "confirmed",
        };
        write!(f, "{}", name)
    }
}

/// Serving vessel a food item is presented in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CutleryType {
    ChafingDish,
    Platter,
    Salver,
}

impl CutleryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChafingDish => "chafing_dish",
            Self::Platter => "platter",
            Self::Salver => "salver",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chafing_dish" => Some(Self::ChafingDish),
            "platter" => Some(Self::Platter),
            "salver" => Some(Self::Salver),
            _ => None,
        }
    }
}

/// Utensil served alongside a food item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServingSpoon {
    ServingSpoonRound,
    ServingSpoonFlat,
    ServingSpoonSmall,
    ServingSpoonLarge,
    Tong,
    None,
}

impl ServingSpoon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServingSpoonRound => "serving_spoon_round",
            Self::ServingSpoonFlat => "serving_spoon_flat",
            Self::ServingSpoonSmall => "serving_spoon_small",
            Self::ServingSpoonLarge => "serving_spoon_large",
            Self::Tong => "tong",
            Self::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "serving_spoon_round" => Some(Self::ServingSpoonRound),
            "serving_spoon_flat" => Some(Self::ServingSpoonFlat),
            "serving_spoon_small" => Some(Self::ServingSpoonSmall),
            "serving_spoon_large" => Some(Self::ServingSpoonLarge),
            "tong" => Some(Self::Tong),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Menu categories recognized by the catalog.
pub const MENU_CATEGORIES: &[&str] = &[
    "Rice and Bread",
    "Greavy",
    "Starters",
    "Desserts",
    "Beverages",
    "Chaat (Street Food)",
    "Snacks",
    "Accompaniments",
];

/// Returns true when the supplied category matches a known menu category.
pub fn is_known_category(category: &str) -> bool {
    MENU_CATEGORIES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(category.trim()))
}

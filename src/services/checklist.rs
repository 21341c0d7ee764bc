use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CutleryType, ServingSpoon};
use crate::services::food_items::FoodItemResponse;

/// One supply line on the packing checklist.
///
/// `count` is None for supplies that are packed without a fixed
/// quantity (name tags).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChecklistEntry {
    pub name: String,
    pub count: Option<u32>,
}

impl ChecklistEntry {
    fn counted(name: &str, count: u32) -> Self {
        Self {
            name: name.to_string(),
            count: Some(count),
        }
    }

    fn uncounted(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: None,
        }
    }
}

/// Supply checklist derived from an order's headcount and menu.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Checklist {
    pub entries: Vec<ChecklistEntry>,
}

/// Derives the supply checklist for `people_count` guests and the
/// given menu items.
///
/// Quantities follow the business's packing rules: tableware scales
/// with headcount, serving hardware with the menu, and bulk supplies
/// in fixed bands (one water station per 100 guests, one table per
/// four dishes).
pub fn build_checklist(people_count: i32, items: &[FoodItemResponse]) -> Checklist {
    let p = people_count.max(0) as u32;
    let item_count = items.len() as u32;

    let count_cutlery = |wanted: CutleryType| -> u32 {
        items.iter().filter(|i| i.cutlery_type == wanted).count() as u32
    };
    let count_spoon = |wanted: ServingSpoon| -> u32 {
        items.iter().filter(|i| i.serving_spoon == wanted).count() as u32
    };

    let water_stations = p / 100;
    let tables = (item_count + 1) / 4;
    let tissue_packs = (p + 120) / 60;

    let entries = vec![
        ChecklistEntry::counted("Plates", p),
        ChecklistEntry::counted("Spoons", p),
        ChecklistEntry::counted("Bowls", p),
        ChecklistEntry::counted("Chafing Dishes", count_cutlery(CutleryType::ChafingDish)),
        ChecklistEntry::counted("Platters", count_cutlery(CutleryType::Platter)),
        ChecklistEntry::counted("Tongs", count_spoon(ServingSpoon::Tong)),
        ChecklistEntry::counted(
            "Serving Spoons (Round)",
            count_spoon(ServingSpoon::ServingSpoonRound),
        ),
        ChecklistEntry::counted(
            "Serving Spoons (Flat)",
            count_spoon(ServingSpoon::ServingSpoonFlat),
        ),
        ChecklistEntry::counted(
            "Serving Spoons (Small)",
            count_spoon(ServingSpoon::ServingSpoonSmall),
        ),
        ChecklistEntry::counted(
            "Serving Spoons (Large)",
            count_spoon(ServingSpoon::ServingSpoonLarge),
        ),
        ChecklistEntry::counted("Water Bottles", water_stations),
        ChecklistEntry::counted("Water Dispensers", water_stations),
        ChecklistEntry::counted("Water Bottle Stands", water_stations),
        ChecklistEntry::counted("Tables", tables),
        ChecklistEntry::counted("Table Cloths", tables),
        ChecklistEntry::counted("Tissue Packs", tissue_packs),
        ChecklistEntry::uncounted("Name Tags"),
    ];

    Checklist { entries }
}

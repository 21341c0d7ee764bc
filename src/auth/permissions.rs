/*!
 * # Permissions Module
 *
 * This module defines permissions for resources in the system.
 * Permissions are organized by resource type and action.
 */

/// Common permission string constants for compile-time safety
pub mod consts {
    // Orders
    pub const ORDERS_READ: &str = "orders:read";
    pub const ORDERS_CREATE: &str = "orders:create";
    pub const ORDERS_UPDATE: &str = "orders:update";
    pub const ORDERS_DELETE: &str = "orders:delete";

    // Food catalog
    pub const FOOD_ITEMS_READ: &str = "food-items:read";
    pub const FOOD_ITEMS_CREATE: &str = "food-items:create";
    pub const FOOD_ITEMS_DELETE: &str = "food-items:delete";

    // Exports (checklist, name tags, invoice)
    pub const EXPORTS_READ: &str = "exports:read";

    // Dashboards
    pub const DASHBOARD_READ: &str = "dashboard:read";
}

/// Permissions granted to every active staff account.
///
/// The app is single-tenant and every staff member runs the whole
/// back office, so accounts receive the full set at login.
pub fn staff_permissions() -> Vec<String> {
    vec![
        consts::ORDERS_READ.to_string(),
        consts::ORDERS_CREATE.to_string(),
        consts::ORDERS_UPDATE.to_string(),
        consts::ORDERS_DELETE.to_string(),
        consts::FOOD_ITEMS_READ.to_string(),
        consts::FOOD_ITEMS_CREATE.to_string(),
        consts::FOOD_ITEMS_DELETE.to_string(),
        consts::EXPORTS_READ.to_string(),
        consts::DASHBOARD_READ.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_set_covers_every_resource() {
        let perms = staff_permissions();
        for required in [
            consts::ORDERS_READ,
            consts::FOOD_ITEMS_CREATE,
            consts::EXPORTS_READ,
            consts::DASHBOARD_READ,
        ] {
            assert!(perms.iter().any(|p| p == required), "missing {}", required);
        }
    }
}

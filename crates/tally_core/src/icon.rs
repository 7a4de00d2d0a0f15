//! Category icon resolution.
//!
//! Icons are looked up by category name. The editor re-resolves the icon after
//! every save; unknown names map to a generic icon.

use crate::model::category::IconRef;

/// Icon used for categories without a built-in mapping.
pub const FALLBACK_ICON: &str = "ic_category_other";

/// Resolves the icon resource for a category name.
pub trait IconResolver: Send + Sync + 'static {
    fn resolve(&self, category_name: &str) -> IconRef;
}

impl<F> IconResolver for F
where
    F: Fn(&str) -> IconRef + Send + Sync + 'static,
{
    fn resolve(&self, category_name: &str) -> IconRef {
        self(category_name)
    }
}

pub(crate) struct BuiltinCategory {
    pub name: &'static str,
    pub icon: &'static str,
    pub order: i64,
}

// Listed in default display order; `order` descends with the list.
pub(crate) const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory { name: "Food", icon: "ic_category_food", order: 10 },
    BuiltinCategory { name: "Transport", icon: "ic_category_transport", order: 9 },
    BuiltinCategory { name: "Shopping", icon: "ic_category_shopping", order: 8 },
    BuiltinCategory { name: "Fuel", icon: "ic_category_fuel", order: 7 },
    BuiltinCategory { name: "Housing", icon: "ic_category_housing", order: 6 },
    BuiltinCategory { name: "Communication", icon: "ic_category_communication", order: 5 },
    BuiltinCategory { name: "Entertainment", icon: "ic_category_entertainment", order: 4 },
    BuiltinCategory { name: "Medical", icon: "ic_category_medical", order: 3 },
    BuiltinCategory { name: "Education", icon: "ic_category_education", order: 2 },
    BuiltinCategory { name: "Other", icon: FALLBACK_ICON, order: 1 },
];

/// Resolver backed by the built-in category table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinIconResolver;

impl IconResolver for BuiltinIconResolver {
    fn resolve(&self, category_name: &str) -> IconRef {
        let name = category_name.trim();
        let icon = BUILTIN_CATEGORIES
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(name))
            .map_or(FALLBACK_ICON, |category| category.icon);
        IconRef::new(icon)
    }
}

#[cfg(test)]
mod tests {
    use super::{BuiltinIconResolver, IconResolver, BUILTIN_CATEGORIES, FALLBACK_ICON};
    use crate::model::category::IconRef;
    use std::collections::HashSet;

    #[test]
    fn builtin_names_resolve_case_insensitively() {
        let resolver = BuiltinIconResolver;
        assert_eq!(resolver.resolve("food").as_str(), "ic_category_food");
        assert_eq!(resolver.resolve(" Fuel ").as_str(), "ic_category_fuel");
    }

    #[test]
    fn unknown_name_falls_back() {
        assert_eq!(BuiltinIconResolver.resolve("Yacht").as_str(), FALLBACK_ICON);
        assert_eq!(BuiltinIconResolver.resolve("").as_str(), FALLBACK_ICON);
    }

    #[test]
    fn builtin_orders_are_unique_and_descending() {
        let orders: Vec<i64> = BUILTIN_CATEGORIES.iter().map(|c| c.order).collect();
        let unique: HashSet<i64> = orders.iter().copied().collect();
        assert_eq!(unique.len(), orders.len());
        assert!(orders.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn closures_act_as_resolvers() {
        let resolver = |name: &str| IconRef::new(format!("icon:{name}"));
        assert_eq!(resolver.resolve("Food").as_str(), "icon:Food");
    }
}

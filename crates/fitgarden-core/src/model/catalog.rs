// ── Menu catalog types ──

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{OptionId, SizeId};

/// A size/price tier of a menu option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeVariant {
    pub id: SizeId,
    pub label: String,
    pub price: Decimal,
}

/// A purchasable menu option with its size tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuOption {
    pub id: OptionId,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub sizes: Vec<SizeVariant>,
}

impl MenuOption {
    /// Look up a size tier by id.
    pub fn size(&self, id: SizeId) -> Option<&SizeVariant> {
        self.sizes.iter().find(|s| s.id == id)
    }
}

/// Catalog lookup used by the line-item composer.
///
/// Preserves the backend's menu order for pickers and tallies.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    options: IndexMap<OptionId, MenuOption>,
}

impl CatalogIndex {
    pub fn new(options: Vec<MenuOption>) -> Self {
        Self {
            options: options.into_iter().map(|o| (o.id, o)).collect(),
        }
    }

    pub fn option(&self, id: OptionId) -> Option<&MenuOption> {
        self.options.get(&id)
    }

    /// Resolve an option + size pair in one step.
    pub fn size(&self, option_id: OptionId, size_id: SizeId) -> Option<(&MenuOption, &SizeVariant)> {
        let option = self.option(option_id)?;
        let size = option.size(size_id)?;
        Some((option, size))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuOption> {
        self.options.values()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> CatalogIndex {
        CatalogIndex::new(vec![MenuOption {
            id: OptionId::new(7),
            name: "Fit".into(),
            description: None,
            active: true,
            sizes: vec![SizeVariant {
                id: SizeId::new(2),
                label: "350g".into(),
                price: "19.90".parse().unwrap(),
            }],
        }])
    }

    #[test]
    fn resolves_option_and_size() {
        let catalog = catalog();
        let (option, size) = catalog.size(OptionId::new(7), SizeId::new(2)).unwrap();
        assert_eq!(option.name, "Fit");
        assert_eq!(size.label, "350g");
    }

    #[test]
    fn unknown_size_is_none() {
        let catalog = catalog();
        assert!(catalog.size(OptionId::new(7), SizeId::new(99)).is_none());
        assert!(catalog.size(OptionId::new(99), SizeId::new(2)).is_none());
    }
}

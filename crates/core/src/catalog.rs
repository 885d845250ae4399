//! Product catalog and bundle relationships.
//!
//! The catalog is loaded once and never changes afterwards. Loading validates
//! every bundle reference and precomputes the inverse index from a component
//! product to the bundles that consume it, so the derivation engine never has
//! to rescan the catalog per product.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Category, ProductId};

/// Catalog shipped with the planner, one YAML list entry per product.
const STANDARD_CATALOG: &str = include_str!("../catalog.yaml");

const fn default_multiplier() -> u32 {
    1
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_default_multiplier(value: &u32) -> bool {
    *value == 1
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, positive product ID.
    pub id: ProductId,
    /// Display label.
    pub name: String,
    /// Grouping used for display.
    pub category: Category,
    /// Units per sellable pack. Ignored by the engine for bundles.
    #[serde(default = "default_multiplier", skip_serializing_if = "is_default_multiplier")]
    pub pack_size: u32,
    /// Whether this product is a bundle of other products.
    #[serde(default)]
    pub is_bundle: bool,
    /// Components consumed by each bundle sold, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundle_contents: Vec<ProductId>,
    /// Units of each component consumed per bundle sold.
    #[serde(default = "default_multiplier", skip_serializing_if = "is_default_multiplier")]
    pub units_per_item: u32,
}

/// A single reason a product list can't be used as a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogProblem {
    #[error("product ID {0} must be positive")]
    NonPositiveId(ProductId),
    #[error("product ID {0} is used more than once")]
    DuplicateId(ProductId),
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    #[error("product {0} has a pack size of zero")]
    ZeroPackSize(ProductId),
    #[error("bundle {0} consumes zero units per item")]
    ZeroUnitsPerItem(ProductId),
    #[error("bundle {0} has no contents")]
    EmptyBundle(ProductId),
    #[error("product {0} is not a bundle but lists bundle contents")]
    ContentsOnNonBundle(ProductId),
    #[error("bundle {bundle} references unknown product {component}")]
    UnknownComponent {
        bundle: ProductId,
        component: ProductId,
    },
    #[error("bundle {bundle} references bundle {component}; bundles cannot be nested")]
    NestedBundle {
        bundle: ProductId,
        component: ProductId,
    },
}

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product list is empty.
    #[error("catalog contains no products")]
    Empty,

    /// One or more products failed validation.
    #[error("catalog failed validation with {} problem(s)", .0.len())]
    Invalid(Vec<CatalogProblem>),

    /// The catalog file is not a valid YAML product list.
    #[error("catalog YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CatalogError {
    /// Every validation problem carried by this error, if any.
    #[must_use]
    pub fn problems(&self) -> &[CatalogProblem] {
        match self {
            Self::Invalid(problems) => problems,
            Self::Empty | Self::Yaml(_) => &[],
        }
    }
}

/// Components of a bundle and how many units of each it consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleRecipe<'a> {
    /// Component products, in catalog file order.
    pub components: &'a [ProductId],
    /// Units of each component consumed per bundle sold.
    pub units_per_item: u32,
}

/// Immutable product registry.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: IndexMap<ProductId, Product>,
    bundles_by_component: HashMap<ProductId, Vec<ProductId>>,
}

impl Catalog {
    /// Build a catalog from a product list, preserving its order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`] for an empty list and
    /// [`CatalogError::Invalid`] with every problem found otherwise.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let problems = validate_products(&products);
        if !problems.is_empty() {
            return Err(CatalogError::Invalid(problems));
        }

        let mut bundles_by_component: HashMap<ProductId, Vec<ProductId>> = HashMap::new();
        for bundle in products.iter().filter(|p| p.is_bundle) {
            for component in &bundle.bundle_contents {
                let bundles = bundles_by_component.entry(*component).or_default();
                // A component listed twice in one bundle still counts once.
                if !bundles.contains(&bundle.id) {
                    bundles.push(bundle.id);
                }
            }
        }

        let products: IndexMap<ProductId, Product> =
            products.into_iter().map(|p| (p.id, p)).collect();

        tracing::info!(
            products = products.len(),
            bundles = products.values().filter(|p| p.is_bundle).count(),
            "Catalog loaded"
        );

        Ok(Self {
            products,
            bundles_by_component,
        })
    }

    /// Parse and validate a YAML product list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] if the document doesn't parse, or any
    /// error from [`Catalog::new`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_yaml::from_str(yaml)?;
        Self::new(products)
    }

    /// The catalog bundled with the planner.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded catalog file is itself invalid.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_yaml_str(STANDARD_CATALOG)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Returns true if the catalog has a product with this ID.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    /// All products in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Always false; an empty catalog is rejected at load time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Components and multiplier of a bundle. `None` if `id` isn't a bundle.
    #[must_use]
    pub fn bundle_components(&self, id: ProductId) -> Option<BundleRecipe<'_>> {
        self.get(id).filter(|p| p.is_bundle).map(|p| BundleRecipe {
            components: &p.bundle_contents,
            units_per_item: p.units_per_item,
        })
    }

    /// Bundles that list `id` as a component, in catalog order.
    #[must_use]
    pub fn bundles_containing(&self, id: ProductId) -> &[ProductId] {
        self.bundles_by_component
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Check a product list against every catalog rule.
///
/// Returns all problems found rather than stopping at the first, so a
/// catalog file can be fixed in one pass.
#[must_use]
pub fn validate_products(products: &[Product]) -> Vec<CatalogProblem> {
    let mut problems = Vec::new();
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let mut seen = std::collections::HashSet::new();

    for product in products {
        let id = product.id;

        if id.as_i32() <= 0 {
            problems.push(CatalogProblem::NonPositiveId(id));
        }
        if !seen.insert(id) {
            problems.push(CatalogProblem::DuplicateId(id));
        }
        if product.name.trim().is_empty() {
            problems.push(CatalogProblem::EmptyName(id));
        }
        if product.pack_size == 0 {
            problems.push(CatalogProblem::ZeroPackSize(id));
        }

        if !product.is_bundle {
            if !product.bundle_contents.is_empty() {
                problems.push(CatalogProblem::ContentsOnNonBundle(id));
            }
            continue;
        }

        if product.units_per_item == 0 {
            problems.push(CatalogProblem::ZeroUnitsPerItem(id));
        }
        if product.bundle_contents.is_empty() {
            problems.push(CatalogProblem::EmptyBundle(id));
        }
        for &component in &product.bundle_contents {
            match by_id.get(&component) {
                None => problems.push(CatalogProblem::UnknownComponent {
                    bundle: id,
                    component,
                }),
                Some(c) if c.is_bundle => problems.push(CatalogProblem::NestedBundle {
                    bundle: id,
                    component,
                }),
                Some(_) => {}
            }
        }
    }

    problems
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(id: i32, pack_size: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            category: Category::Individual,
            pack_size,
            is_bundle: false,
            bundle_contents: Vec::new(),
            units_per_item: 1,
        }
    }

    pub(crate) fn bundle(id: i32, contents: &[i32], units_per_item: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Bundle {id}"),
            category: Category::Bundles,
            pack_size: 1,
            is_bundle: true,
            bundle_contents: contents.iter().copied().map(ProductId::new).collect(),
            units_per_item,
        }
    }

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.len(), 47);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_standard_catalog_inverse_index() {
        let catalog = Catalog::standard().unwrap();
        // Fish pie and cottage pie purée go into both classic bundles.
        assert_eq!(
            catalog.bundles_containing(ProductId::new(17)),
            &[ProductId::new(8), ProductId::new(9)]
        );
        assert_eq!(
            catalog.bundles_containing(ProductId::new(46)),
            &[ProductId::new(8), ProductId::new(9)]
        );
        assert!(catalog.bundles_containing(ProductId::new(1)).is_empty());
    }

    #[test]
    fn test_bundle_components() {
        let catalog = Catalog::standard().unwrap();
        let recipe = catalog.bundle_components(ProductId::new(12)).unwrap();
        assert_eq!(recipe.components.len(), 8);
        assert_eq!(recipe.units_per_item, 1);
        assert!(catalog.bundle_components(ProductId::new(13)).is_none());
        assert!(catalog.bundle_components(ProductId::new(999)).is_none());
    }

    #[test]
    fn test_preserves_order() {
        let catalog = Catalog::new(vec![item(5, 1), item(2, 6), bundle(9, &[5, 2], 1)]).unwrap();
        let ids: Vec<i32> = catalog.products().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(Catalog::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_unknown_component_rejected() {
        let err = Catalog::new(vec![item(1, 1), bundle(2, &[1, 3], 1)]).unwrap_err();
        assert_eq!(
            err.problems(),
            &[CatalogProblem::UnknownComponent {
                bundle: ProductId::new(2),
                component: ProductId::new(3),
            }]
        );
    }

    #[test]
    fn test_nested_bundle_rejected() {
        let err = Catalog::new(vec![item(1, 1), bundle(2, &[1], 1), bundle(3, &[2], 1)])
            .unwrap_err();
        assert_eq!(
            err.problems(),
            &[CatalogProblem::NestedBundle {
                bundle: ProductId::new(3),
                component: ProductId::new(2),
            }]
        );
    }

    #[test]
    fn test_collects_every_problem() {
        let mut nameless = item(4, 0);
        nameless.name = "  ".to_owned();
        let mut stray = item(5, 1);
        stray.bundle_contents = vec![ProductId::new(4)];

        let problems = validate_products(&[
            item(0, 1),
            item(1, 1),
            item(1, 1),
            nameless,
            stray,
            bundle(6, &[], 0),
        ]);

        assert!(problems.contains(&CatalogProblem::NonPositiveId(ProductId::new(0))));
        assert!(problems.contains(&CatalogProblem::DuplicateId(ProductId::new(1))));
        assert!(problems.contains(&CatalogProblem::EmptyName(ProductId::new(4))));
        assert!(problems.contains(&CatalogProblem::ZeroPackSize(ProductId::new(4))));
        assert!(problems.contains(&CatalogProblem::ContentsOnNonBundle(ProductId::new(5))));
        assert!(problems.contains(&CatalogProblem::EmptyBundle(ProductId::new(6))));
        assert!(problems.contains(&CatalogProblem::ZeroUnitsPerItem(ProductId::new(6))));
        assert_eq!(problems.len(), 7);
    }

    #[test]
    fn test_duplicate_component_indexed_once() {
        let catalog = Catalog::new(vec![item(1, 1), bundle(2, &[1, 1], 3)]).unwrap();
        assert_eq!(catalog.bundles_containing(ProductId::new(1)), &[ProductId::new(2)]);
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
- id: 1
  name: "Carrot"
  category: "vegetables"
- id: 2
  name: "Weaning Box"
  category: "bundles"
  is_bundle: true
  bundle_contents: [1]
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        let carrot = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(carrot.pack_size, 1);
        assert!(!carrot.is_bundle);
        let recipe = catalog.bundle_components(ProductId::new(2)).unwrap();
        assert_eq!(recipe.units_per_item, 1);
    }

    #[test]
    fn test_yaml_unknown_category_rejected() {
        let yaml = r#"
- id: 1
  name: "Mystery"
  category: "desserts"
"#;
        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::Yaml(_))
        ));
    }
}

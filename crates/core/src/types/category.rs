//! Product categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of catalog categories.
///
/// Declaration order is the display order used when grouping a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "muffins")]
    Muffins,
    #[serde(rename = "bundles")]
    Bundles,
    #[serde(rename = "individual")]
    Individual,
    #[serde(rename = "6month")]
    SixMonth,
    #[serde(rename = "9month")]
    NineMonth,
    #[serde(rename = "adult")]
    Adult,
    #[serde(rename = "vegetables")]
    Vegetables,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 7] = [
        Self::Muffins,
        Self::Bundles,
        Self::Individual,
        Self::SixMonth,
        Self::NineMonth,
        Self::Adult,
        Self::Vegetables,
    ];

    /// Tag used in catalog files.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Muffins => "muffins",
            Self::Bundles => "bundles",
            Self::Individual => "individual",
            Self::SixMonth => "6month",
            Self::NineMonth => "9month",
            Self::Adult => "adult",
            Self::Vegetables => "vegetables",
        }
    }

    /// Heading shown above the category's table.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Muffins => "Muffins & Snacks (x8)",
            Self::Bundles => "Bundles",
            Self::Individual => "Individual Recipes (x6)",
            Self::SixMonth => "6 Month Recipes (x6)",
            Self::NineMonth => "9 Month Recipes (x6)",
            Self::Adult => "Adult Meals",
            Self::Vegetables => "Vegetables (First Taste)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.tag() == s)
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

//! Category totals and the selected chart variant: the state every other component reads.

mod store;

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub use store::{ChartDataModel, SharedModel};

/// Expense category tracked by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Clothes,
    Travel,
    Medical,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Clothes,
        Category::Travel,
        Category::Medical,
    ];

    /// Key used by the summary endpoint and shown as the axis/slice label
    pub fn name(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Clothes => "Clothes",
            Category::Travel => "Travel",
            Category::Medical => "Medical",
        }
    }

    /// Fixed pie slice color
    pub fn color(self) -> &'static str {
        match self {
            Category::Food => "#e74c3c",
            Category::Clothes => "#f39c12",
            Category::Travel => "#236693ff",
            Category::Medical => "#2ecc71",
        }
    }

    fn index(self) -> usize {
        match self {
            Category::Food => 0,
            Category::Clothes => 1,
            Category::Travel => 2,
            Category::Medical => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error produced when a summary body cannot be normalized
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    /// The body was not a JSON object
    #[error("summary must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    /// A tracked category carried something other than a non-negative number
    #[error("invalid amount for {category}: {value}")]
    InvalidAmount { category: Category, value: String },
}

/// Amount per category. Every category is always present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryTotals {
    amounts: [f64; 4],
}

impl CategoryTotals {
    /// Build totals from explicit amounts (Food, Clothes, Travel, Medical)
    pub fn new(food: f64, clothes: f64, travel: f64, medical: f64) -> Self {
        Self {
            amounts: [food, clothes, travel, medical],
        }
    }

    /// Normalize a summary response body.
    ///
    /// Missing or `null` categories become 0, unknown keys are ignored.
    pub fn from_summary(body: &Value) -> Result<Self, NormalizeError> {
        let object = body.as_object().ok_or(NormalizeError::NotAnObject {
            kind: json_kind(body),
        })?;

        let mut totals = Self::default();
        for category in Category::ALL {
            let amount = match object.get(category.name()) {
                None | Some(Value::Null) => 0.0,
                Some(value) => value
                    .as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| NormalizeError::InvalidAmount {
                        category,
                        value: value.to_string(),
                    })?,
            };
            totals.amounts[category.index()] = amount;
        }
        Ok(totals)
    }

    /// Amount for a single category
    pub fn get(&self, category: Category) -> f64 {
        self.amounts[category.index()]
    }

    /// `(category, amount)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Amounts in display order
    pub fn amounts(&self) -> [f64; 4] {
        self.amounts
    }

    /// Sum over all categories
    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, amount) in self.iter() {
            map.serialize_entry(category.name(), &amount)?;
        }
        map.end()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Chart presentation selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartVariant {
    #[default]
    Radar,
    Pie,
}

impl ChartVariant {
    /// Lowercase identifier (`radar` / `pie`)
    pub fn as_str(self) -> &'static str {
        match self {
            ChartVariant::Radar => "radar",
            ChartVariant::Pie => "pie",
        }
    }

    /// Get display name for the variant
    pub fn display_name(self) -> &'static str {
        match self {
            ChartVariant::Radar => "Radar",
            ChartVariant::Pie => "Pie",
        }
    }
}

impl fmt::Display for ChartVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "radar" => Ok(ChartVariant::Radar),
            "pie" => Ok(ChartVariant::Pie),
            other => Err(format!("unknown chart variant: {other} (expected radar or pie)")),
        }
    }
}

//! Static product catalog: the read-only assembly definition every flow renders from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog identifier of a product (e.g. `SMB-CLST-001`)
pub type ProductId = String;

/// 1-based position of a step inside a product's assembly guide
pub type StepNumber = u32;

const BUILTIN_PRODUCT_JSON: &str = include_str!("../data/product.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("product {0} has no assembly steps")]
    NoSteps(ProductId),
    #[error("step at index {index} is numbered {found}, expected {expected}")]
    NonContiguousSteps {
        index: usize,
        found: StepNumber,
        expected: StepNumber,
    },
}

/// 3D view configuration for one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ThreeDView {
    /// Names of the model parts highlighted in this step
    #[serde(default)]
    pub highlight: Vec<String>,
    /// Whether the step is best shown as an exploded view
    #[serde(default)]
    pub exploded: bool,
}

/// One ordered unit of the assembly instructions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step: StepNumber,
    pub title: String,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default)]
    pub three_d: ThreeDView,
}

impl Step {
    /// Tips for this step; empty when the catalog has none.
    pub fn tips(&self) -> &[String] {
        self.tips.as_deref().unwrap_or_default()
    }

    /// Safety warnings for this step; empty when the catalog has none.
    pub fn safety(&self) -> &[String] {
        self.safety.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementPart {
    pub sku: String,
    pub name: String,
}

/// A related product offered on the completion screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsellItem {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub estimated_time_min: u32,
    pub complexity: String,
    pub people_needed: u32,
    pub tools: Vec<String>,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub care_tips: Vec<String>,
    #[serde(default)]
    pub replacement_parts: Vec<ReplacementPart>,
    #[serde(default)]
    pub upsell: Vec<UpsellItem>,
}

impl Product {
    /// Number of steps (N)
    pub fn total_steps(&self) -> StepNumber {
        self.steps.len() as StepNumber
    }

    /// Step at a 1-based position
    pub fn step(&self, number: StepNumber) -> Option<&Step> {
        let index = number.checked_sub(1)? as usize;
        self.steps.get(index)
    }

    pub fn contains_step(&self, number: StepNumber) -> bool {
        (1..=self.total_steps()).contains(&number)
    }

    /// Check that steps are numbered 1..N with no gaps.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.steps.is_empty() {
            return Err(CatalogError::NoSteps(self.id.clone()));
        }
        for (index, step) in self.steps.iter().enumerate() {
            let expected = index as StepNumber + 1;
            if step.step != expected {
                return Err(CatalogError::NonContiguousSteps {
                    index,
                    found: step.step,
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// The read-only catalog. The guide is built around a single product.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    product: Product,
}

impl Catalog {
    /// Wrap an already-built product, validating its step numbering.
    pub fn new(product: Product) -> Result<Self, CatalogError> {
        product.validate()?;
        Ok(Self { product })
    }

    /// Parse and validate a product document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let product: Product = serde_json::from_str(json)?;
        Self::new(product)
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_PRODUCT_JSON)
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Resolve a product id, ignoring surrounding whitespace and case.
    pub fn find(&self, id: &str) -> Option<&Product> {
        let wanted = id.trim();
        self.product
            .id
            .eq_ignore_ascii_case(wanted)
            .then_some(&self.product)
    }
}

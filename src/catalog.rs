use std::collections::BTreeMap;

use crate::foundation::error::{ScrublineError, ScrublineResult};

/// One entry of the static product list backing the detail page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u32,
    pub stock: u32,
    pub images: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

/// Static product catalog with lookup by identifier.
///
/// A missing id is a terminal "not found" outcome for the page layer; nothing
/// partial is ever returned.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> ScrublineResult<Self> {
        let catalog = Self { products };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> ScrublineResult<Self> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| ScrublineError::serde(format!("parse product catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The stock demo catalog shipped with the landing page.
    pub fn demo() -> Self {
        let headphone_specs = BTreeMap::from([
            ("driver_size".to_string(), "40mm".to_string()),
            ("battery".to_string(), "30h".to_string()),
        ]);
        let speaker_specs = BTreeMap::from([
            ("driver_size".to_string(), "Woofer + Tweeter".to_string()),
            ("battery".to_string(), "Wired".to_string()),
        ]);

        Self {
            products: vec![
                Product {
                    id: "headphone-01".to_string(),
                    name: "Sonic One".to_string(),
                    description: "Wireless Noise Cancelling Headphones".to_string(),
                    price: 349,
                    stock: 50,
                    images: vec!["/headphones/ezgif-frame-050.jpg".to_string()],
                    category: "headphone".to_string(),
                    specs: headphone_specs,
                },
                Product {
                    id: "speaker-01".to_string(),
                    name: "Aura Home".to_string(),
                    description: "High-Fidelity Smart Speaker".to_string(),
                    price: 499,
                    stock: 20,
                    images: vec!["/speaker/ezgif-frame-050.jpg".to_string()],
                    category: "speaker".to_string(),
                    specs: speaker_specs,
                },
            ],
        }
    }

    pub fn validate(&self) -> ScrublineResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for product in &self.products {
            if product.id.trim().is_empty() {
                return Err(ScrublineError::validation("product id must be non-empty"));
            }
            if !seen.insert(product.id.as_str()) {
                return Err(ScrublineError::validation(format!(
                    "duplicate product id '{}'",
                    product.id
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Lookup that surfaces a missing id as a [`ScrublineError::NotFound`],
    /// for callers that must fail rather than fall through.
    pub fn require(&self, id: &str) -> ScrublineResult<&Product> {
        self.get(id)
            .ok_or_else(|| ScrublineError::not_found(format!("product '{id}'")))
    }
}

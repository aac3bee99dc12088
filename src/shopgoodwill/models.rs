//! Data models for ShopGoodwill categories, sellers, and shipping costs.

use serde::{Deserialize, Deserializer, Serialize};

/// A listing category. The first child of a top-level category is an "all"
/// placeholder, not a real subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "categoryId")]
    pub id: i64,
    #[serde(rename = "shortName", default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<Category>,
}

impl Category {
    /// Real subcategories, skipping the leading placeholder.
    pub fn subcategories(&self) -> impl Iterator<Item = &Category> {
        self.children.iter().skip(1)
    }
}

/// A participating seller location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    #[serde(rename = "sellerId")]
    pub id: i64,
    #[serde(rename = "searchFilterName", default)]
    pub name: String,
}

/// Categories and sellers scraped from the category page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    pub categories: Vec<Category>,
    pub sellers: Vec<Seller>,
}

/// Shipping cost of an item; every field is unset until computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingCost {
    pub shipping: Option<f64>,
    pub handling: Option<f64>,
    pub total: Option<f64>,
}

impl ShippingCost {
    /// Builds a computed cost; `total` is always `shipping + handling`.
    pub fn new(shipping: f64, handling: f64) -> Self {
        Self { shipping: Some(shipping), handling: Some(handling), total: Some(shipping + handling) }
    }

    /// Returns true once a total has been computed.
    pub fn is_computed(&self) -> bool {
        self.total.is_some()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_deserialize() {
        let category: Category = serde_json::from_value(json!({
            "categoryId": 2,
            "shortName": "Books",
            "children": [
                {"categoryId": 2, "shortName": "All Books", "children": null},
                {"categoryId": 19, "shortName": "Fiction"},
                {"categoryId": 20, "shortName": "Non-Fiction", "children": []}
            ],
            "extra": true
        }))
        .unwrap();

        assert_eq!(category.id, 2);
        assert_eq!(category.name, "Books");
        assert_eq!(category.children.len(), 3);
        assert!(category.children[0].children.is_empty());

        let subcategories: Vec<i64> = category.subcategories().map(|c| c.id).collect();
        assert_eq!(subcategories, vec![19, 20]);
    }

    #[test]
    fn test_category_without_children() {
        let category: Category =
            serde_json::from_value(json!({"categoryId": 5, "shortName": "Art"})).unwrap();
        assert_eq!(category.subcategories().count(), 0);
    }

    #[test]
    fn test_seller_deserialize() {
        let seller: Seller =
            serde_json::from_value(json!({"sellerId": 15, "searchFilterName": "Seattle, WA"}))
                .unwrap();
        assert_eq!(seller, Seller { id: 15, name: "Seattle, WA".to_string() });
    }

    #[test]
    fn test_shipping_cost_total_is_sum() {
        let cost = ShippingCost::new(0.01, 7.49);
        assert_eq!(cost.total, Some(0.01 + 7.49));
        assert!(cost.is_computed());
        assert!(!ShippingCost::default().is_computed());
    }
}

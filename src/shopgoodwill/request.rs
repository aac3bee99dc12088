//! Search request construction: the bundled template, filter validation, and
//! category resolution.

use crate::shopgoodwill::error::{Error, Result};
use crate::shopgoodwill::models::Category;
use chrono::NaiveDate;
use serde_json::{Map, Number, Value};
use tracing::debug;

const TEMPLATE_JSON: &str = include_str!("../../resources/search_request.json");

/// Template field holding the closed-auction cutoff date.
pub const CLOSED_AUCTION_DATE: &str = "closedAuctionEndingDate";

/// Caller-supplied overrides of template fields.
pub type Filters = Map<String, Value>;

/// Every recognized search field with its default value.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTemplate {
    fields: Map<String, Value>,
}

impl SearchTemplate {
    /// Loads the bundled template with the cutoff date set to today.
    pub fn bundled() -> Result<Self> {
        let fields: Map<String, Value> = serde_json::from_str(TEMPLATE_JSON)?;
        Ok(Self { fields }.with_date(chrono::Local::now().date_naive()))
    }

    /// Wraps an arbitrary set of template fields.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Sets the closed-auction cutoff date (`MM/DD/YYYY`).
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.fields
            .insert(CLOSED_AUCTION_DATE.to_string(), Value::String(date.format("%m/%d/%Y").to_string()));
        self
    }

    /// Template fields in declaration order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns true if `key` is a recognized filter.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Fails on the first filter key the template does not know.
    pub fn validate(&self, filters: &Filters) -> Result<()> {
        match filters.keys().find(|key| !self.contains(key)) {
            Some(key) => Err(Error::InvalidFilter(key.clone())),
            None => Ok(()),
        }
    }

    /// Converts a textual filter value to the JSON type of the template default.
    pub fn coerce(&self, key: &str, raw: &str) -> Result<Value> {
        let default = self.fields.get(key).ok_or_else(|| Error::InvalidFilter(key.to_string()))?;

        let invalid = |reason: &str| Error::InvalidFilterValue {
            key: key.to_string(),
            reason: format!("{} (got '{}')", reason, raw),
        };

        match default {
            Value::String(_) => Ok(Value::String(raw.to_string())),
            Value::Bool(_) => match raw.to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(invalid("expected true or false")),
            },
            Value::Number(_) => {
                if let Ok(n) = raw.parse::<i64>() {
                    Ok(Value::Number(n.into()))
                } else {
                    raw.parse::<f64>()
                        .ok()
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .ok_or_else(|| invalid("expected a number"))
                }
            }
            _ => Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))),
        }
    }

    /// Builds the request body: template, then filters, then category fields.
    pub fn build(&self, filters: &Filters, category: Option<&CategoryFields>) -> Result<Map<String, Value>> {
        self.validate(filters)?;

        let mut body = self.fields.clone();
        body.extend(filters.iter().map(|(k, v)| (k.clone(), v.clone())));

        if let Some(category) = category {
            debug!(
                "Applying category {} (level {}, parent {})",
                category.id, category.level, category.parent
            );
            body.extend(category.to_fields());
        }

        Ok(body)
    }
}

/// Where a category id sits in the category tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch {
    NotFound,
    Top(i64),
    Child { parent: i64, id: i64 },
}

/// Finds a category among top-level categories and their real subcategories.
///
/// Top-level categories are visited in order; each is checked before its own
/// subcategories.
pub fn resolve_category(categories: &[Category], id: i64) -> CategoryMatch {
    for top in categories {
        if top.id == id {
            return CategoryMatch::Top(id);
        }

        if top.subcategories().any(|child| child.id == id) {
            return CategoryMatch::Child { parent: top.id, id };
        }
    }

    CategoryMatch::NotFound
}

/// Request fields derived from a resolved category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFields {
    pub id: i64,
    pub parent: i64,
    pub level: u8,
}

impl CategoryFields {
    /// Derives the fields for a match; `None` when the category was not found.
    pub fn from_match(found: CategoryMatch) -> Option<Self> {
        match found {
            CategoryMatch::NotFound => None,
            CategoryMatch::Top(id) => Some(Self { id, parent: 0, level: 1 }),
            CategoryMatch::Child { parent, id } => Some(Self { id, parent, level: 2 }),
        }
    }

    /// The request fields that select this category.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("categoryId".to_string(), Value::from(self.id));
        fields.insert("categoryLevel".to_string(), Value::from(self.level));
        fields.insert("categoryLevelNo".to_string(), Value::String(self.level.to_string()));
        fields.insert("catIds".to_string(), Value::String(format!("-1,{},{}", self.parent, self.id)));
        fields.insert("selectedCategoryIds".to_string(), Value::String(self.id.to_string()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category(id: i64, name: &str, children: Vec<Category>) -> Category {
        Category { id, name: name.to_string(), children }
    }

    fn make_categories() -> Vec<Category> {
        vec![
            category(
                1,
                "Antiques",
                vec![
                    category(1, "All Antiques", vec![]),
                    category(101, "Furniture", vec![]),
                    category(102, "Pottery", vec![]),
                ],
            ),
            category(2, "Books", vec![category(2, "All Books", vec![]), category(201, "Fiction", vec![])]),
            category(3, "Art", vec![]),
        ]
    }

    fn make_template() -> SearchTemplate {
        SearchTemplate::from_fields(
            json!({
                "searchText": "",
                "lowPrice": "0",
                "savedSearchId": 0,
                "isSize": false,
                "categoryId": 0,
                "categoryLevel": 1,
                "categoryLevelNo": "1",
                "catIds": "",
                "selectedCategoryIds": ""
            })
            .as_object()
            .unwrap()
            .clone(),
        )
    }

    fn filters(value: Value) -> Filters {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_bundled_template() {
        let template = SearchTemplate::bundled().unwrap();
        assert!(template.contains("searchText"));
        assert!(template.contains("catIds"));
        assert!(template.contains("pageSize"));

        let date = template.fields()[CLOSED_AUCTION_DATE].as_str().unwrap();
        let today = chrono::Local::now().date_naive().format("%m/%d/%Y").to_string();
        assert_eq!(date, today);
    }

    #[test]
    fn test_with_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let template = make_template().with_date(date);
        assert_eq!(template.fields()[CLOSED_AUCTION_DATE], "03/07/2024");
    }

    #[test]
    fn test_build_without_filters_equals_template() {
        let template = make_template();
        let body = template.build(&Filters::new(), None).unwrap();
        assert_eq!(&body, template.fields());
    }

    #[test]
    fn test_build_overrides_template() {
        let template = make_template();
        let body = template.build(&filters(json!({"searchText": "pyrex", "lowPrice": "5"})), None).unwrap();

        assert_eq!(body["searchText"], "pyrex");
        assert_eq!(body["lowPrice"], "5");
        assert_eq!(body["savedSearchId"], 0);
        assert_eq!(body.len(), template.fields().len());
    }

    #[test]
    fn test_build_rejects_unknown_filter() {
        let err = make_template()
            .build(&filters(json!({"searchText": "lamp", "colour": "red"})), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(ref key) if key == "colour"));
    }

    #[test]
    fn test_resolve_top_level() {
        assert_eq!(resolve_category(&make_categories(), 3), CategoryMatch::Top(3));
        assert_eq!(resolve_category(&make_categories(), 1), CategoryMatch::Top(1));
    }

    #[test]
    fn test_resolve_child() {
        assert_eq!(
            resolve_category(&make_categories(), 102),
            CategoryMatch::Child { parent: 1, id: 102 }
        );
        assert_eq!(
            resolve_category(&make_categories(), 201),
            CategoryMatch::Child { parent: 2, id: 201 }
        );
    }

    #[test]
    fn test_resolve_not_found() {
        assert_eq!(resolve_category(&make_categories(), 999), CategoryMatch::NotFound);
        assert_eq!(resolve_category(&[], 1), CategoryMatch::NotFound);
    }

    #[test]
    fn test_resolve_skips_placeholder_child() {
        let categories = vec![category(10, "Toys", vec![category(55, "All", vec![]), category(56, "Dolls", vec![])])];
        assert_eq!(resolve_category(&categories, 55), CategoryMatch::NotFound);
        assert_eq!(resolve_category(&categories, 56), CategoryMatch::Child { parent: 10, id: 56 });
    }

    #[test]
    fn test_category_fields_top_level() {
        let fields = CategoryFields::from_match(CategoryMatch::Top(3)).unwrap();
        let body = make_template().build(&Filters::new(), Some(&fields)).unwrap();

        assert_eq!(body["categoryId"], 3);
        assert_eq!(body["categoryLevel"], 1);
        assert_eq!(body["categoryLevelNo"], "1");
        assert_eq!(body["catIds"], "-1,0,3");
        assert_eq!(body["selectedCategoryIds"], "3");
    }

    #[test]
    fn test_category_fields_child() {
        let fields = CategoryFields::from_match(CategoryMatch::Child { parent: 1, id: 101 }).unwrap();
        let body = make_template().build(&Filters::new(), Some(&fields)).unwrap();

        assert_eq!(body["categoryId"], 101);
        assert_eq!(body["categoryLevel"], 2);
        assert_eq!(body["categoryLevelNo"], "2");
        assert_eq!(body["catIds"], "-1,1,101");
        assert_eq!(body["selectedCategoryIds"], "101");
    }

    #[test]
    fn test_category_fields_override_filters() {
        let fields = CategoryFields::from_match(CategoryMatch::Top(2)).unwrap();
        let body = make_template()
            .build(&filters(json!({"catIds": "manual"})), Some(&fields))
            .unwrap();
        assert_eq!(body["catIds"], "-1,0,2");
    }

    #[test]
    fn test_category_fields_not_found() {
        assert!(CategoryFields::from_match(CategoryMatch::NotFound).is_none());
    }

    #[test]
    fn test_coerce_follows_template_types() {
        let template = make_template();
        assert_eq!(template.coerce("searchText", "42").unwrap(), json!("42"));
        assert_eq!(template.coerce("savedSearchId", "42").unwrap(), json!(42));
        assert_eq!(template.coerce("savedSearchId", "1.5").unwrap(), json!(1.5));
        assert_eq!(template.coerce("isSize", "TRUE").unwrap(), json!(true));
    }

    #[test]
    fn test_coerce_rejects_bad_values() {
        let template = make_template();

        let err = template.coerce("isSize", "maybe").unwrap_err();
        assert!(matches!(err, Error::InvalidFilterValue { ref key, .. } if key == "isSize"));

        let err = template.coerce("savedSearchId", "abc").unwrap_err();
        assert!(err.to_string().contains("expected a number"));

        let err = template.coerce("nope", "1").unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(_)));
    }
}

//! Integration tests for page parsing using fixture files.

use shopgoodwill::shopgoodwill::directory::parse_directory;
use shopgoodwill::shopgoodwill::parser::{extract_state, item_payload, parse_shipping_fragment};
use shopgoodwill::shopgoodwill::request::{resolve_category, CategoryFields, CategoryMatch};
use shopgoodwill::shopgoodwill::{Item, SearchTemplate};

const CATEGORY_FIXTURE: &str = include_str!("fixtures/category_page.html");
const ITEM_FIXTURE: &str = include_str!("fixtures/item_page.html");
const SHIPPING_FIXTURE: &str = include_str!("fixtures/shipping.html");

#[test]
fn test_parse_category_page() {
    let directory = parse_directory(CATEGORY_FIXTURE).unwrap();

    assert_eq!(directory.categories.len(), 3);
    assert_eq!(directory.sellers.len(), 3);
    assert_eq!(directory.sellers[2].name, "St. Louis, MO");

    let antiques = &directory.categories[0];
    assert_eq!(antiques.name, "Antiques");
    let names: Vec<&str> = antiques.subcategories().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Furniture", "Glass & Pottery"]);

    // null children parse as empty
    assert_eq!(directory.categories[2].subcategories().count(), 0);
    assert_eq!(directory.categories[1].children[2].name, "Men's");
}

#[test]
fn test_category_request_fields() {
    let directory = parse_directory(CATEGORY_FIXTURE).unwrap();

    assert_eq!(resolve_category(&directory.categories, 27), CategoryMatch::Top(27));
    assert_eq!(resolve_category(&directory.categories, 999), CategoryMatch::NotFound);

    let found = resolve_category(&directory.categories, 8);
    assert_eq!(found, CategoryMatch::Child { parent: 1, id: 8 });

    let fields = CategoryFields::from_match(found).unwrap();
    let template = SearchTemplate::bundled().unwrap();
    let body = template.build(&Default::default(), Some(&fields)).unwrap();

    assert_eq!(body["categoryId"], 8);
    assert_eq!(body["categoryLevel"], 2);
    assert_eq!(body["catIds"], "-1,1,8");
}

#[test]
fn test_parse_item_page() {
    let state = extract_state(ITEM_FIXTURE).unwrap();
    let details = item_payload(&state).unwrap();

    assert_eq!(details["title"], "Pots & Pans <Set of 5> 'Revere Ware'");
    assert_eq!(details["description"], "<p>Copper bottom.</p>");

    let mut item = Item::new("178234501");
    item.merge_details(details.clone());

    assert_eq!(item.seller_id(), Some(6));
    assert_eq!(item.num_bids(), Some(3));
    assert_eq!(item.shipping.shipping, Some(0.01));
    assert_eq!(item.shipping.handling, Some(4.5));
    assert_eq!(item.shipping.total, Some(4.51));
}

#[test]
fn test_item_payload_absent_on_category_page() {
    let state = extract_state(CATEGORY_FIXTURE).unwrap();
    assert!(item_payload(&state).is_none());
}

#[test]
fn test_parse_shipping_fragment() {
    let (shipping, handling) = parse_shipping_fragment(SHIPPING_FIXTURE).unwrap();
    assert_eq!(shipping, 1009.15);
    assert_eq!(handling, 3.0);
}

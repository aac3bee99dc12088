//! Test doubles shared by the unit tests.

use crate::shopgoodwill::client::{ApiResponse, PostOptions, Transport};
use crate::shopgoodwill::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Mock transport with canned pages and POST responses.
#[derive(Default)]
pub struct MockTransport {
    pages: HashMap<String, String>,
    posts: HashMap<String, ApiResponse>,
    page_calls: AtomicU32,
    post_calls: AtomicU32,
    posted: Mutex<Vec<(String, Value, PostOptions)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, path: &str, html: impl Into<String>) -> Self {
        self.pages.insert(path.to_string(), html.into());
        self
    }

    pub fn with_post(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.posts.insert(path.to_string(), ApiResponse { status, body: body.into() });
        self
    }

    pub fn page_calls(&self) -> u32 {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn post_calls(&self) -> u32 {
        self.post_calls.load(Ordering::SeqCst)
    }

    /// Recorded POSTs as `(path, body, options)`.
    pub fn posted(&self) -> Vec<(String, Value, PostOptions)> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, path: &str, body: &Value, options: &PostOptions) -> Result<ApiResponse> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        self.posted.lock().unwrap().push((path.to_string(), body.clone(), options.clone()));

        Ok(self
            .posts
            .get(path)
            .cloned()
            .unwrap_or(ApiResponse { status: 404, body: String::new() }))
    }

    async fn get_page(&self, path: &str) -> Result<String> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(path)
            .cloned()
            .ok_or(Error::Status { status: 404, url: path.to_string() })
    }
}

/// Wraps a state object the way the site embeds it.
pub fn state_page(state: &Value) -> String {
    let escaped = serde_json::to_string(state).unwrap().replace('"', "&q;");
    format!(
        r#"<html><body><app-root></app-root><script id="serverApp-state" type="application/json">{}</script></body></html>"#,
        escaped
    )
}

/// Embedded state of the category page: two top-level categories and two sellers.
pub fn directory_state() -> Value {
    json!({
        "G.https://buyerapi.shopgoodwill.com/api/Master/GetMenuItems": {
            "body": {"menu": []}
        },
        "G.https://buyerapi.shopgoodwill.com/api/Master/GetAllSellers": {
            "body": [
                {"sellerId": 6, "searchFilterName": "Portland, OR"},
                {"sellerId": 22, "searchFilterName": "Tacoma, WA"}
            ]
        },
        "G.https://buyerapi.shopgoodwill.com/api/Category/GetCategoryList": {
            "body": {
                "categoryListModel": {
                    "categoryModel": [
                        {
                            "categoryId": 1,
                            "shortName": "Antiques",
                            "children": [
                                {"categoryId": 1, "shortName": "All Antiques", "children": []},
                                {"categoryId": 5, "shortName": "Furniture", "children": []}
                            ]
                        },
                        {
                            "categoryId": 12,
                            "shortName": "Clothing",
                            "children": [
                                {"categoryId": 12, "shortName": "All Clothing", "children": []},
                                {"categoryId": 34, "shortName": "Baby", "children": []},
                                {"categoryId": 35, "shortName": "Men", "children": []}
                            ]
                        }
                    ]
                }
            }
        }
    })
}

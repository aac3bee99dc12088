//! Output formatting for items, categories, sellers and filters (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::shopgoodwill::{Category, Item, SearchResults, Seller};
use serde_json::{json, Map, Value};

/// Formats results for output.
pub struct Formatter {
    format: OutputFormat,
    site_url: String,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format, site_url: crate::config::DEFAULT_SITE_URL.to_string() }
    }

    /// Uses a different site URL for item links.
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Formats search results with the total match count.
    pub fn format_results(&self, results: &SearchResults) -> String {
        let items = self.format_items(&results.items);
        match self.format {
            OutputFormat::Table if !results.items.is_empty() => format!(
                "{}\nShowing {} of {} matches",
                items,
                results.items.len(),
                results.result_count
            ),
            _ => items,
        }
    }

    /// Formats a single item.
    pub fn format_item(&self, item: &Item) -> String {
        match self.format {
            OutputFormat::Json => json_pretty(item),
            OutputFormat::Table => self.table_single(item),
            OutputFormat::Markdown => self.markdown_single(item),
            OutputFormat::Csv => self.csv_items(std::slice::from_ref(item)),
        }
    }

    /// Formats multiple items.
    pub fn format_items(&self, items: &[Item]) -> String {
        if items.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => CSV_HEADER.to_string(),
                _ => "No items found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => json_pretty(&items),
            OutputFormat::Table => self.table_items(items),
            OutputFormat::Markdown => self.markdown_items(items),
            OutputFormat::Csv => self.csv_items(items),
        }
    }

    /// Formats categories, optionally with their subcategories.
    pub fn format_categories(&self, categories: &[Category], show_children: bool) -> String {
        let rows: Vec<(bool, &Category)> = categories
            .iter()
            .flat_map(|top| {
                let children: Vec<&Category> =
                    if show_children { top.subcategories().collect() } else { Vec::new() };
                std::iter::once((false, top)).chain(children.into_iter().map(|c| (true, c)))
            })
            .collect();

        match self.format {
            OutputFormat::Json => {
                let values: Vec<Value> = categories
                    .iter()
                    .map(|top| {
                        let mut value = json!({"id": top.id, "name": top.name});
                        if show_children {
                            value["children"] = top
                                .subcategories()
                                .map(|c| json!({"id": c.id, "name": c.name}))
                                .collect();
                        }
                        value
                    })
                    .collect();
                json_pretty(&values)
            }
            OutputFormat::Table => rows
                .iter()
                .map(|(child, c)| {
                    if *child {
                        format!("* {} {}", c.id, c.name)
                    } else {
                        format!("{} {}", c.id, c.name)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Markdown => {
                let mut lines = vec!["| ID | Category |".to_string(), "|----|----------|".to_string()];
                for (child, c) in &rows {
                    let name = if *child { format!("↳ {}", c.name) } else { c.name.clone() };
                    lines.push(format!("| {} | {} |", c.id, name));
                }
                lines.join("\n")
            }
            OutputFormat::Csv => {
                let mut lines = vec!["id,name,parent_id".to_string()];
                for top in categories {
                    lines.push(format!("{},{},", top.id, csv_escape(&top.name)));
                    if show_children {
                        for c in top.subcategories() {
                            lines.push(format!("{},{},{}", c.id, csv_escape(&c.name), top.id));
                        }
                    }
                }
                lines.join("\n")
            }
        }
    }

    /// Formats seller locations.
    pub fn format_sellers(&self, sellers: &[Seller]) -> String {
        match self.format {
            OutputFormat::Json => json_pretty(&sellers),
            OutputFormat::Table => {
                sellers.iter().map(|s| format!("{} {}", s.id, s.name)).collect::<Vec<_>>().join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines = vec!["| ID | Location |".to_string(), "|----|----------|".to_string()];
                lines.extend(sellers.iter().map(|s| format!("| {} | {} |", s.id, s.name)));
                lines.join("\n")
            }
            OutputFormat::Csv => {
                let mut lines = vec!["id,name".to_string()];
                lines.extend(sellers.iter().map(|s| format!("{},{}", s.id, csv_escape(&s.name))));
                lines.join("\n")
            }
        }
    }

    /// Formats the search filters and their default values.
    pub fn format_filters(&self, filters: &Map<String, Value>) -> String {
        match self.format {
            OutputFormat::Json => json_pretty(filters),
            OutputFormat::Csv => {
                let mut lines = vec!["filter,default".to_string()];
                lines.extend(filters.iter().map(|(k, v)| format!("{},{}", k, csv_escape(&v.to_string()))));
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines = vec!["| Filter | Default |".to_string(), "|--------|---------|".to_string()];
                lines.extend(filters.iter().map(|(k, v)| format!("| {} | `{}` |", k, v)));
                lines.join("\n")
            }
            OutputFormat::Table => {
                let mut lines = vec!["Search filters and default value:".to_string()];
                // JSON rendering quotes strings and leaves other values bare
                lines.extend(filters.iter().map(|(k, v)| format!("{} = {}", k, v)));
                lines.join("\n")
            }
        }
    }

    fn item_url(&self, item: &Item) -> String {
        match &item.id {
            Some(id) => format!("{}/item/{}", self.site_url, id),
            None => String::new(),
        }
    }

    // Table formatting

    fn table_single(&self, item: &Item) -> String {
        let mut lines = Vec::new();

        lines.push(format!("ID:       {}", item.id.as_deref().unwrap_or("N/A")));
        lines.push(format!("Title:    {}", item.title().unwrap_or("Unknown")));
        lines.push(format!("URL:      {}", self.item_url(item)));
        lines.push(format!("Price:    {}", money(item.current_price())));

        if let Some(bids) = item.num_bids() {
            lines.push(format!("Bids:     {}", bids));
        }
        if let Some(end) = item.end_time() {
            lines.push(format!("Ends:     {}", end));
        }

        if item.shipping.is_computed() {
            lines.push(format!(
                "Shipping: {} + {} handling = {}",
                money(item.shipping.shipping),
                money(item.shipping.handling),
                money(item.shipping.total)
            ));
        }

        lines.join("\n")
    }

    fn table_items(&self, items: &[Item]) -> String {
        let id_width = 10;
        let price_width = 10;
        let bids_width = 5;
        let ship_width = 10;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<id_width$}  {:<price_width$}  {:<bids_width$}  {:<ship_width$}  {}",
            "ID", "Price", "Bids", "Shipping", "Title"
        ));
        lines.push(format!(
            "{:-<id_width$}  {:-<price_width$}  {:-<bids_width$}  {:-<ship_width$}  {:-<title_width$}",
            "", "", "", "", ""
        ));

        for item in items {
            let bids = item.num_bids().map(|b| b.to_string()).unwrap_or_else(|| "-".to_string());

            lines.push(format!(
                "{:<id_width$}  {:>price_width$}  {:>bids_width$}  {:>ship_width$}  {}",
                item.id.as_deref().unwrap_or("N/A"),
                money(item.current_price()),
                bids,
                money(item.shipping.total),
                truncate(item.title().unwrap_or("Unknown"), title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} items", items.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_single(&self, item: &Item) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", item.title().unwrap_or("Unknown")));
        lines.push(String::new());
        lines.push(format!("- **ID:** {}", item.id.as_deref().unwrap_or("N/A")));
        lines.push(format!("- **URL:** [View on ShopGoodwill]({})", self.item_url(item)));
        lines.push(format!("- **Price:** {}", money(item.current_price())));

        if let Some(end) = item.end_time() {
            lines.push(format!("- **Ends:** {}", end));
        }
        if item.shipping.is_computed() {
            lines.push(format!("- **Shipping total:** {}", money(item.shipping.total)));
        }

        lines.join("\n")
    }

    fn markdown_items(&self, items: &[Item]) -> String {
        let mut lines = Vec::new();

        lines.push("| ID | Price | Bids | Shipping | Title |".to_string());
        lines.push("|----|-------|------|----------|-------|".to_string());

        for item in items {
            lines.push(format!(
                "| {} | {} | {} | {} | [{}]({}) |",
                item.id.as_deref().unwrap_or("N/A"),
                money(item.current_price()),
                item.num_bids().map(|b| b.to_string()).unwrap_or_default(),
                money(item.shipping.total),
                truncate(item.title().unwrap_or("Unknown"), 40),
                self.item_url(item)
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} items found*", items.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_items(&self, items: &[Item]) -> String {
        let mut lines = vec![CSV_HEADER.to_string()];

        for item in items {
            let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();

            lines.push(format!(
                "{},{},{},{},{},{},{},{},{}",
                item.id.as_deref().unwrap_or_default(),
                csv_escape(item.title().unwrap_or_default()),
                opt(item.current_price()),
                item.num_bids().map(|b| b.to_string()).unwrap_or_default(),
                csv_escape(item.end_time().unwrap_or_default()),
                opt(item.shipping.shipping),
                opt(item.shipping.handling),
                opt(item.shipping.total),
                self.item_url(item)
            ));
        }

        lines.join("\n")
    }
}

const CSV_HEADER: &str = "id,title,price,bids,end_time,shipping,handling,shipping_total,url";

fn json_pretty<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("${:.2}", v)).unwrap_or_else(|| "N/A".to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

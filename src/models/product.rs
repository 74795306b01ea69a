use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Catalog record. Fields beyond the five known ones are carried in `extra`
/// and serialized back at the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Any JSON number, kept as sent (no rounding through f64).
    pub price: Number,
    pub category: String,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Builds a record with a fresh v4 id.
    pub fn create(fields: NewProduct) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            category: fields.category,
            in_stock: fields.in_stock,
            extra: fields.extra,
        }
    }

    /// Shallow merge: every field in `fields` overwrites the current value,
    /// extra keys not mentioned keep their previous value. `id` never changes.
    pub fn merge(&mut self, fields: NewProduct) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.category = fields.category;
        self.in_stock = fields.in_stock;
        self.extra.extend(fields.extra);
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// A body that passed the product field check.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Number,
    pub category: String,
    pub in_stock: bool,
    pub extra: Map<String, Value>,
}

impl NewProduct {
    /// Checks the five required fields against their schema:
    ///
    /// - `name`, `description`, `category`: non-empty strings
    /// - `price`: any number, zero and negatives included
    /// - `inStock`: a boolean, `false` included
    ///
    /// Any other key is passed through, except `id` which is dropped.
    pub fn from_body(body: Value) -> AppResult<Self> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::ValidationFailed);
        };

        let name = take_text(&mut fields, "name")?;
        let description = take_text(&mut fields, "description")?;
        let category = take_text(&mut fields, "category")?;

        let price = match fields.remove("price") {
            Some(Value::Number(n)) => n,
            _ => return Err(AppError::ValidationFailed),
        };
        let in_stock = match fields.remove("inStock") {
            Some(Value::Bool(b)) => b,
            _ => return Err(AppError::ValidationFailed),
        };

        fields.remove("id");

        Ok(Self {
            name,
            description,
            price,
            category,
            in_stock,
            extra: fields,
        })
    }
}

fn take_text(fields: &mut Map<String, Value>, key: &str) -> AppResult<String> {
    match fields.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(AppError::ValidationFailed),
    }
}

// ── Query parameters ──────────────────────────────────────────────────────────

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 1_000;

/// `page` and `limit` stay strings so a non-numeric value falls back to the
/// default instead of rejecting the whole query.
#[derive(Debug, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub name: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ProductQuery {
    /// Builds the query from decoded `key=value` pairs. A repeated key keeps
    /// its first value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "category" => &mut query.category,
                "name" => &mut query.name,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// 1-based page, never below 1.
    pub fn page(&self) -> usize {
        parse_count(self.page.as_deref())
            .unwrap_or(DEFAULT_PAGE)
            .max(1)
    }

    pub fn limit(&self) -> usize {
        parse_count(self.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT)
    }

    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// Negative numbers parse to 0 so they hit the lower clamp.
fn parse_count(raw: Option<&str>) -> Option<usize> {
    let n: i64 = raw?.trim().parse().ok()?;
    Some(usize::try_from(n).unwrap_or(0))
}

// ── Responses ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProductPage {
    /// Matches after filtering, before pagination.
    pub total: usize,
    pub data: Vec<Product>,
}

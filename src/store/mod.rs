use indexmap::IndexMap;

use crate::models::{NewProduct, Product, ProductPage, ProductQuery};

/// Category name → number of products, in first-seen order.
pub type CategoryCounts = IndexMap<String, usize>;

/// Ordered in-memory product collection.
///
/// Lookups are linear scans by id; records keep insertion order. The store is
/// owned by [`crate::AppState`] behind a single `RwLock`, so each method runs
/// its find-then-mutate without interleaving with other requests.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: Vec<Product>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Exact category match, then case-insensitive name substring, then the
    /// `[(page-1)*limit, page*limit)` window of what is left.
    pub fn list(&self, query: &ProductQuery) -> ProductPage {
        let category = query.category_filter();
        let needle = query.name_filter().map(str::to_lowercase);

        let matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| {
                needle
                    .as_deref()
                    .map_or(true, |n| p.name.to_lowercase().contains(n))
            })
            .collect();

        let limit = query.limit();
        let start = (query.page() - 1).saturating_mul(limit);

        ProductPage {
            total: matches.len(),
            data: matches
                .into_iter()
                .skip(start)
                .take(limit)
                .cloned()
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Appends a new record and returns a copy of it.
    pub fn insert(&mut self, fields: NewProduct) -> Product {
        let product = Product::create(fields);
        self.products.push(product.clone());
        product
    }

    /// Merges `fields` into the record with `id`, in place.
    pub fn replace(&mut self, id: &str, fields: NewProduct) -> Option<Product> {
        let product = self.products.iter_mut().find(|p| p.id == id)?;
        product.merge(fields);
        Some(product.clone())
    }

    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(index))
    }

    pub fn category_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::new();
        for p in &self.products {
            *counts.entry(p.category.clone()).or_default() += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(name: &str, category: &str) -> NewProduct {
        NewProduct::from_body(json!({
            "name": name,
            "description": "test item",
            "price": 10,
            "category": category,
            "inStock": true,
        }))
        .unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> ProductQuery {
        let mut q = ProductQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "category" => q.category = v,
                "name" => q.name = v,
                "page" => q.page = v,
                "limit" => q.limit = v,
                _ => unreachable!(),
            }
        }
        q
    }

    fn names(page: &ProductPage) -> Vec<&str> {
        page.data.iter().map(|p| p.name.as_str()).collect()
    }

    // ── Insert / get ───────────────────────────────────────────────────────────

    #[test]
    fn insert_grows_by_one_and_is_retrievable() {
        let mut store = ProductStore::new();
        let product = store.insert(fields("Pen", "Stationery"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&product.id).map(|p| p.name.as_str()), Some("Pen"));
    }

    #[test]
    fn get_unknown_id_is_none() {
        let mut store = ProductStore::new();
        store.insert(fields("Pen", "Stationery"));
        assert!(store.get("missing").is_none());
    }

    // ── Replace ────────────────────────────────────────────────────────────────

    #[test]
    fn replace_merges_in_place_and_keeps_position() {
        let mut store = ProductStore::new();
        let first = store.insert(fields("Pen", "Stationery"));
        store.insert(fields("Cup", "Kitchen"));

        let updated = store.replace(&first.id, fields("Marker", "Stationery")).unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.name, "Marker");

        let all = store.list(&query(&[]));
        assert_eq!(names(&all), vec!["Marker", "Cup"]);
    }

    #[test]
    fn replace_unknown_id_leaves_store_untouched() {
        let mut store = ProductStore::new();
        store.insert(fields("Pen", "Stationery"));
        assert!(store.replace("missing", fields("Marker", "Stationery")).is_none());
        assert_eq!(names(&store.list(&query(&[]))), vec!["Pen"]);
    }

    // ── Remove ─────────────────────────────────────────────────────────────────

    #[test]
    fn remove_takes_exactly_the_target() {
        let mut store = ProductStore::new();
        store.insert(fields("Pen", "Stationery"));
        let cup = store.insert(fields("Cup", "Kitchen"));
        store.insert(fields("Bowl", "Kitchen"));

        let removed = store.remove(&cup.id).unwrap();
        assert_eq!(removed.id, cup.id);
        assert_eq!(store.len(), 2);
        assert!(store.get(&cup.id).is_none());
        assert!(store.remove(&cup.id).is_none());
    }

    // ── List ───────────────────────────────────────────────────────────────────

    #[test]
    fn list_paginates_filtered_set() {
        let mut store = ProductStore::new();
        for i in 0..12 {
            store.insert(fields(&format!("Book {i}"), "Books"));
            store.insert(fields(&format!("Toy {i}"), "Toys"));
        }

        let page = store.list(&query(&[("category", "Books"), ("page", "2"), ("limit", "5")]));
        assert_eq!(page.total, 12);
        assert_eq!(
            names(&page),
            vec!["Book 5", "Book 6", "Book 7", "Book 8", "Book 9"]
        );
    }

    #[test]
    fn list_defaults_to_first_five() {
        let mut store = ProductStore::new();
        for i in 0..7 {
            store.insert(fields(&format!("Item {i}"), "Misc"));
        }
        let page = store.list(&query(&[]));
        assert_eq!(page.total, 7);
        assert_eq!(page.data.len(), 5);
    }

    #[test]
    fn list_name_filter_is_case_insensitive_substring() {
        let mut store = ProductStore::new();
        store.insert(fields("Blue Pen", "Stationery"));
        store.insert(fields("PENCIL", "Stationery"));
        store.insert(fields("Pen", "Gifts"));
        store.insert(fields("Eraser", "Stationery"));

        let page = store.list(&query(&[("name", "pEn")]));
        assert_eq!(page.total, 3);

        let page = store.list(&query(&[("name", "pen"), ("category", "Stationery")]));
        assert_eq!(names(&page), vec!["Blue Pen", "PENCIL"]);
    }

    #[test]
    fn list_category_is_exact_match() {
        let mut store = ProductStore::new();
        store.insert(fields("A", "Books"));
        store.insert(fields("B", "books"));
        assert_eq!(store.list(&query(&[("category", "Books")])).total, 1);
    }

    #[test]
    fn list_page_past_the_end_is_empty_with_full_total() {
        let mut store = ProductStore::new();
        for i in 0..3 {
            store.insert(fields(&format!("Item {i}"), "Misc"));
        }
        let page = store.list(&query(&[("page", "9")]));
        assert_eq!(page.total, 3);
        assert!(page.data.is_empty());
    }

    #[test]
    fn list_huge_page_does_not_overflow() {
        let mut store = ProductStore::new();
        store.insert(fields("Item", "Misc"));
        let page = store.list(&query(&[("page", "9223372036854775807"), ("limit", "1000")]));
        assert!(page.data.is_empty());
    }

    // ── Stats ──────────────────────────────────────────────────────────────────

    #[test]
    fn category_counts_empty_store() {
        assert!(ProductStore::new().category_counts().is_empty());
    }

    #[test]
    fn category_counts_in_first_seen_order() {
        let mut store = ProductStore::new();
        for (name, category) in [
            ("a", "Books"),
            ("b", "Toys"),
            ("c", "Books"),
            ("d", "Toys"),
            ("e", "Books"),
        ] {
            store.insert(fields(name, category));
        }
        let counts = store.category_counts();
        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            vec![("Books".to_string(), 3), ("Toys".to_string(), 2)]
        );
    }
}

//! # Barcode & Search
//!
//! The POS search box serves two kinds of input: a salesman typing a name,
//! and a hardware scanner that "types" a code followed by Enter.
//!
//! ## Enter Key Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Enter pressed with input + current suggestions                        │
//! │       │                                                                 │
//! │       ├── suggestion highlighted?             → UseSuggestion           │
//! │       ├── input equals a suggestion's         → UseSuggestion           │
//! │       │   barcode or SKU                                                │
//! │       ├── input looks like a barcode?         → LookupBarcode           │
//! │       │   (server lookup, then "no results")                            │
//! │       ├── exactly one suggestion              → UseSuggestion           │
//! │       ├── several suggestions                 → KeepSuggestions         │
//! │       └── nothing                             → NoResults               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;

/// Shortest code treated as a scanned barcode.
pub const MIN_BARCODE_LEN: usize = 6;

/// Decides whether typed text is probably a scanned code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeClassifier {
    prefix: String,
}

impl Default for BarcodeClassifier {
    fn default() -> Self {
        BarcodeClassifier::new("MW-")
    }
}

impl BarcodeClassifier {
    /// `prefix` is the store's own label prefix, matched case-insensitively.
    pub fn new(prefix: impl Into<String>) -> Self {
        BarcodeClassifier {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True for the store prefix or for ≥ 6 ASCII letters/digits with no spaces.
    ///
    /// ## Example
    /// ```rust
    /// use medwear_core::barcode::BarcodeClassifier;
    ///
    /// let classifier = BarcodeClassifier::new("MW-");
    /// assert!(classifier.is_probable_barcode("MW-0042"));
    /// assert!(classifier.is_probable_barcode("8901234567890"));
    /// assert!(!classifier.is_probable_barcode("scrub top"));
    /// assert!(!classifier.is_probable_barcode("A12"));
    /// ```
    pub fn is_probable_barcode(&self, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() {
            return false;
        }

        let prefix_len = self.prefix.len();
        if prefix_len > 0
            && input.len() > prefix_len
            && input.is_char_boundary(prefix_len)
            && input[..prefix_len].eq_ignore_ascii_case(&self.prefix)
        {
            return true;
        }

        input.len() >= MIN_BARCODE_LEN && input.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

/// What the POS does when Enter is pressed in the search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum EnterAction {
    /// Add this product (id) to the cart.
    UseSuggestion(String),
    /// Look the code up on the server.
    LookupBarcode(String),
    /// Several matches; let the salesman pick.
    KeepSuggestions,
    NoResults,
}

/// Applies the Enter key protocol.
pub fn resolve_enter(
    classifier: &BarcodeClassifier,
    input: &str,
    suggestions: &[Product],
    selected: Option<usize>,
) -> EnterAction {
    let input = input.trim();

    if let Some(product) = selected.and_then(|i| suggestions.get(i)) {
        return EnterAction::UseSuggestion(product.id.clone());
    }
    if input.is_empty() {
        return EnterAction::NoResults;
    }

    if let Some(product) = suggestions.iter().find(|p| exact_code_match(p, input)) {
        return EnterAction::UseSuggestion(product.id.clone());
    }

    if classifier.is_probable_barcode(input) {
        return EnterAction::LookupBarcode(input.to_string());
    }

    match suggestions {
        [] => EnterAction::NoResults,
        [only] => EnterAction::UseSuggestion(only.id.clone()),
        _ => EnterAction::KeepSuggestions,
    }
}

fn exact_code_match(product: &Product, code: &str) -> bool {
    product
        .barcode
        .as_deref()
        .is_some_and(|b| b.eq_ignore_ascii_case(code))
        || product
            .sku
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(code))
}

/// Case-insensitive search over active products.
///
/// Matches name, SKU, barcode and company. Exact barcode/SKU hits come
/// first, then name prefix matches, then the rest in catalog order. An
/// empty query returns the first `limit` active products.
pub fn search_catalog<'a>(catalog: &'a [Product], query: &str, limit: usize) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    let active = catalog.iter().filter(|p| p.is_active);

    if needle.is_empty() {
        return active.take(limit).collect();
    }

    let mut hits: Vec<(u8, usize, &Product)> = active
        .enumerate()
        .filter_map(|(pos, p)| rank(p, &needle).map(|r| (r, pos, p)))
        .collect();
    hits.sort_by_key(|(r, pos, _)| (*r, *pos));
    hits.into_iter().take(limit).map(|(_, _, p)| p).collect()
}

fn rank(product: &Product, needle: &str) -> Option<u8> {
    if exact_code_match(product, needle) {
        return Some(0);
    }
    let name = product.name.to_lowercase();
    if name.starts_with(needle) {
        return Some(1);
    }
    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(needle));
    if name.contains(needle)
        || contains(product.sku.as_deref())
        || contains(product.barcode.as_deref())
        || contains(product.company.as_deref())
    {
        return Some(2);
    }
    None
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(id: &str, name: &str, barcode: Option<&str>) -> Product {
        let mut p = Product::new(id, name, Money::from_major(1000));
        p.barcode = barcode.map(str::to_string);
        p
    }

    fn catalog() -> Vec<Product> {
        let mut coat = product("coat", "Lab Coat", Some("MW-0001"));
        coat.company = Some("Cherokee".to_string());
        let mut hidden = product("old", "Scrub Cap", None);
        hidden.is_active = false;
        vec![
            coat,
            product("top", "Classic Scrub Top", Some("8901234567890")),
            product("pants", "Scrub Pants", None),
            hidden,
        ]
    }

    #[test]
    fn test_classifier_prefix_and_length() {
        let c = BarcodeClassifier::default();
        assert!(c.is_probable_barcode("mw-12"));
        assert!(c.is_probable_barcode("ABC123"));
        assert!(!c.is_probable_barcode("ABC12"));
        assert!(!c.is_probable_barcode("lab coat"));
        assert!(!c.is_probable_barcode("MW-"));
        assert!(!c.is_probable_barcode(""));
    }

    #[test]
    fn test_search_ranks_exact_code_first() {
        let catalog = catalog();
        let hits = search_catalog(&catalog, "scrub", 10);
        let ids: Vec<&str> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["pants", "top"]);

        let hits = search_catalog(&catalog, "8901234567890", 10);
        assert_eq!(hits[0].id, "top");

        let hits = search_catalog(&catalog, "cherokee", 10);
        assert_eq!(hits[0].id, "coat");
    }

    #[test]
    fn test_search_empty_query_lists_active() {
        let catalog = catalog();
        assert_eq!(search_catalog(&catalog, "", 10).len(), 3);
        assert_eq!(search_catalog(&catalog, "  ", 2).len(), 2);
    }

    #[test]
    fn test_resolve_enter() {
        let c = BarcodeClassifier::default();
        let catalog = catalog();

        // highlighted suggestion wins
        assert_eq!(
            resolve_enter(&c, "scrub", &catalog[1..3], Some(1)),
            EnterAction::UseSuggestion("pants".to_string())
        );
        // exact barcode in the list
        assert_eq!(
            resolve_enter(&c, "MW-0001", &catalog, None),
            EnterAction::UseSuggestion("coat".to_string())
        );
        // scanner input with nothing local
        assert_eq!(
            resolve_enter(&c, "MW-7777", &[], None),
            EnterAction::LookupBarcode("MW-7777".to_string())
        );
        assert_eq!(resolve_enter(&c, "scrub", &catalog[1..3], None), EnterAction::KeepSuggestions);
        assert_eq!(resolve_enter(&c, "cap", &[], None), EnterAction::NoResults);
    }
}

//! # Editor State
//!
//! The product open in the admin variant-stock editor. Edits stay local
//! until `save_product` sends the whole product back.

use std::sync::{Mutex, PoisonError};

use medwear_core::Product;

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct EditorState {
    product: Mutex<Option<Product>>,
}

impl EditorState {
    pub fn new() -> Self {
        EditorState::default()
    }

    /// Replaces whatever was open.
    pub fn open(&self, product: Product) {
        *self.product.lock().unwrap_or_else(PoisonError::into_inner) = Some(product);
    }

    pub fn close(&self) {
        *self.product.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// A copy of the product being edited.
    pub fn current(&self) -> Option<Product> {
        self.product
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies an edit to a scratch copy and keeps it only if `f` succeeds,
    /// so a rejected edit leaves the open product untouched.
    pub fn edit<F, E>(&self, f: F) -> Result<Product, ApiError>
    where
        F: FnOnce(&mut Product) -> Result<(), E>,
        ApiError: From<E>,
    {
        let mut guard = self.product.lock().unwrap_or_else(PoisonError::into_inner);
        let current = guard.as_ref().ok_or_else(no_product_open)?;

        let mut draft = current.clone();
        f(&mut draft)?;
        *guard = Some(draft.clone());
        Ok(draft)
    }
}

pub(crate) fn no_product_open() -> ApiError {
    ApiError::business("No product is open for editing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use medwear_core::{CoreError, Dimension, Money};

    #[test]
    fn test_failed_edit_keeps_previous_product() {
        let editor = EditorState::new();
        let mut product = Product::new("p1", "Scrub Top", Money::from_major(2500));
        product.add_dimension_value(Dimension::Color, "Black").unwrap();
        product.add_dimension_value(Dimension::Size, "M").unwrap();
        editor.open(product);

        editor
            .edit(|p| p.set_cell("Black", "M", 4))
            .unwrap();
        let err = editor.edit(|p| p.set_cell("Black", "M", -1));

        assert!(err.is_err());
        assert_eq!(editor.current().unwrap().cell_stock("Black", "M"), 4);
    }

    #[test]
    fn test_edit_without_open_product() {
        let editor = EditorState::new();
        let err = editor
            .edit(|_| Ok::<(), CoreError>(()))
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_close_discards_unsaved_edits() {
        let editor = EditorState::new();
        editor.open(Product::new("p1", "Lab Coat", Money::from_major(1000)));
        editor.edit(|p| p.set_scalar_stock(3)).unwrap();

        editor.close();
        assert!(editor.current().is_none());
    }
}

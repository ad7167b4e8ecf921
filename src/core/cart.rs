use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::model::{find_product, Product, PRODUCTS};
use crate::utils::error::{BookingError, Result};

/// Shop state: quantities, wishlist and the chosen color per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    quantities: BTreeMap<&'static str, u32>,
    wishlist: BTreeSet<&'static str>,
    colors: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product: &'static Product,
    pub quantity: u32,
    pub line_total_kes: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit, returns the new quantity.
    pub fn add(&mut self, product_id: &str) -> Result<u32> {
        let product = find_product(product_id)?;
        let quantity = self.quantities.entry(product.id).or_insert(0);
        *quantity += 1;
        Ok(*quantity)
    }

    pub fn quantity(&self, product_id: &str) -> u32 {
        self.quantities.get(product_id).copied().unwrap_or(0)
    }

    pub fn item_count(&self) -> u32 {
        self.quantities.values().sum()
    }

    pub fn lines(&self) -> Vec<CartLine> {
        PRODUCTS
            .iter()
            .filter_map(|product| {
                let quantity = self.quantity(product.id);
                (quantity > 0).then(|| CartLine {
                    product,
                    quantity,
                    line_total_kes: u64::from(product.price_kes) * u64::from(quantity),
                })
            })
            .collect()
    }

    pub fn subtotal_kes(&self) -> u64 {
        self.lines().iter().map(|line| line.line_total_kes).sum()
    }

    /// Returns `true` when the product is now on the wishlist.
    pub fn toggle_wishlist(&mut self, product_id: &str) -> Result<bool> {
        let product = find_product(product_id)?;
        if self.wishlist.remove(product.id) {
            Ok(false)
        } else {
            self.wishlist.insert(product.id);
            Ok(true)
        }
    }

    pub fn is_wishlisted(&self, product_id: &str) -> bool {
        self.wishlist.contains(product_id)
    }

    pub fn select_color(&mut self, product_id: &str, color: &str) -> Result<()> {
        let product = find_product(product_id)?;
        let color = product
            .colors
            .iter()
            .find(|c| **c == color)
            .ok_or_else(|| BookingError::NotFound {
                kind: "color",
                id: format!("{} for {}", color, product.name),
            })?;
        self.colors.insert(product.id, color);
        Ok(())
    }

    /// `None` until the shopper picks a color.
    pub fn color(&self, product_id: &str) -> Option<&'static str> {
        self.colors.get(product_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_increments_quantity() {
        let mut cart = Cart::new();
        assert_eq!(cart.add("1").unwrap(), 1);
        assert_eq!(cart.add("1").unwrap(), 2);
        assert_eq!(cart.add("5").unwrap(), 1);
        assert_eq!(cart.quantity("1"), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal_kes(), 2 * 4499 + 3749);
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let mut cart = Cart::new();
        assert!(cart.add("42").is_err());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_wishlist_toggles() {
        let mut cart = Cart::new();
        assert!(cart.toggle_wishlist("2").unwrap());
        assert!(cart.is_wishlisted("2"));
        assert!(!cart.toggle_wishlist("2").unwrap());
        assert!(!cart.is_wishlisted("2"));
    }

    #[test]
    fn test_color_selection() {
        let mut cart = Cart::new();
        assert_eq!(cart.color("4"), None);
        cart.select_color("4", "Olive").unwrap();
        assert_eq!(cart.color("4"), Some("Olive"));
        assert!(cart.select_color("4", "Mustard").is_err());
        assert_eq!(cart.color("4"), Some("Olive"));
    }
}

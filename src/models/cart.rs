//! Cart line types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payload of an add-to-cart intent: a cart line without its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

impl NewCartItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

/// One line of the shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique within the cart
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    /// Image URL
    pub image: String,
}

impl CartItem {
    /// Price times quantity, saturating at the `Decimal` range.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

impl From<NewCartItem> for CartItem {
    /// First add of an id starts at quantity 1.
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: 1,
            image: item.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_starts_at_one() {
        let item: CartItem = NewCartItem::new("a", "Mug", Decimal::new(1250, 2), "mug.png").into();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.line_total(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_line_total() {
        let item = CartItem {
            id: "a".to_string(),
            name: "Mug".to_string(),
            price: Decimal::new(199, 2),
            quantity: 3,
            image: String::new(),
        };
        assert_eq!(item.line_total(), Decimal::new(597, 2));
    }

    #[test]
    fn test_line_total_saturates() {
        let item = CartItem {
            id: "a".to_string(),
            name: "Yacht".to_string(),
            price: Decimal::MAX / Decimal::from(2),
            quantity: 3,
            image: String::new(),
        };
        assert_eq!(item.line_total(), Decimal::MAX);
    }

    #[test]
    fn test_deserialize_numeric_price() {
        let item: CartItem = serde_json::from_str(
            r#"{"id":"a","name":"Mug","price":10.5,"quantity":2,"image":"x"}"#,
        )
        .unwrap();
        assert_eq!(item.price, Decimal::new(105, 1));
    }
}

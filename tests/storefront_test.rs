use iron_nation::core::cart::Cart;
use iron_nation::core::contact::{ContactDesk, ContactForm, ContactSubject};
use iron_nation::domain::model::{find_product, PRODUCTS};
use iron_nation::{AppConfig, BookingError, NoLatency};
use std::sync::Arc;

#[test]
fn test_catalog_savings() {
    assert_eq!(PRODUCTS.len(), 6);
    assert_eq!(find_product("1").unwrap().savings_kes(), Some(1500));
    assert_eq!(find_product("4").unwrap().savings_kes(), Some(1500));
    assert_eq!(find_product("2").unwrap().savings_kes(), None);
}

#[test]
fn test_cart_session() {
    let mut cart = Cart::new();
    cart.add("2").unwrap();
    cart.add("6").unwrap();
    cart.add("6").unwrap();
    cart.select_color("6", "Royal Blue").unwrap();
    cart.toggle_wishlist("3").unwrap();

    let lines = cart.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].product.name, "Performance Shorts");
    assert_eq!(lines[1].line_total_kes, 11998);
    assert_eq!(cart.subtotal_kes(), 11999 + 11998);
    assert_eq!(cart.color("6"), Some("Royal Blue"));
    assert!(cart.is_wishlisted("3"));

    let err = cart.toggle_wishlist("99").unwrap_err();
    assert!(matches!(err, BookingError::NotFound { kind: "product", .. }));
}

#[tokio::test]
async fn test_contact_form_submission() {
    let config = AppConfig::instant();
    let desk = ContactDesk::from_config(&config, Arc::new(NoLatency));
    let mut form = ContactForm {
        name: "Sarah Johnson".to_string(),
        email: "sarah@example.com".to_string(),
        phone: "+1 (555) 987-6543".to_string(),
        subject: Some("nutrition".parse().unwrap()),
        message: "I'd like a meal plan.".to_string(),
    };

    let receipt = desk.submit(&mut form).await.unwrap();
    assert_eq!(receipt.subject, ContactSubject::Nutrition);
    assert_eq!(receipt.subject.label(), "Nutrition Coaching");
    assert!(form.name.is_empty());

    form.email = "not-an-email".to_string();
    assert!(desk.submit(&mut form).await.is_err());
}

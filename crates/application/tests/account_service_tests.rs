//! Tests for customer and delivery accounts
//!
//! Sign-up, login, profile edits and availability.

mod common;

use common::harness;
use foodhub_application::services::NewAccount;
use foodhub_domain::{CustomerId, DeliveryPersonId, PersonProfilePatch, Role};
use foodhub_testing::fixtures::*;

fn account(email: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        password: "password123".to_string(),
        phone: "9000000000".to_string(),
    }
}

#[tokio::test]
async fn test_customer_signup_then_login() {
    // Arrange
    let h = harness();

    // Act
    let signup = h.customers.signup(account("eat@example.com")).await.unwrap();
    let login = h.customers.login("eat@example.com", "password123").await.unwrap();

    // Assert
    let a = h.tokens.verify(&signup).unwrap();
    let b = h.tokens.verify(&login).unwrap();
    assert_eq!(a.sub, b.sub);
    assert_eq!(a.role, Role::Customer);
    assert_eq!(h.stores.customers.count(), 1);
}

#[tokio::test]
async fn test_customer_duplicate_email_conflicts() {
    let h = harness();
    h.customers.signup(account("eat@example.com")).await.unwrap();
    let err = h
        .customers
        .signup(account("eat@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 409);
}

#[tokio::test]
async fn test_customer_wrong_password_is_rejected() {
    let h = harness();
    h.customers.signup(account("eat@example.com")).await.unwrap();
    let err = h
        .customers
        .login("eat@example.com", "password124")
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 401);
}

#[tokio::test]
async fn test_customer_profile_patch() {
    let h = harness();
    let token = h.customers.signup(account("eat@example.com")).await.unwrap();
    let id: CustomerId = h.tokens.verify(&token).unwrap().sub.parse().unwrap();

    let updated = h
        .customers
        .update_profile(
            id,
            PersonProfilePatch {
                first_name: Some("Meera".to_string()),
                address: Some("4 Lake View".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Meera");
    assert_eq!(updated.last_name, "");
    assert_eq!(updated.address, "4 Lake View");
    assert_eq!(h.customers.profile(id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_delivery_signup_is_unverified_and_offline() {
    let h = harness();
    let token = h
        .delivery
        .signup(account("ride@example.com"), "560001".to_string())
        .await
        .unwrap();
    let claims = h.tokens.verify(&token).unwrap();
    assert_eq!(claims.role, Role::Delivery);

    let id: DeliveryPersonId = claims.sub.parse().unwrap();
    let person = h.delivery.profile(id).await.unwrap();
    assert!(!person.verified);
    assert!(!person.is_available);
    assert_eq!(person.pincode, "560001");
}

#[tokio::test]
async fn test_delivery_login_uses_generic_rejection() {
    let h = harness();
    h.stores.delivery.seed(create_test_delivery_person());
    let err = h
        .delivery
        .login("nobody@example.com", "password123")
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 401);
}

#[tokio::test]
async fn test_delivery_status_toggle_follows_coordinate_rule() {
    let h = harness();
    let person = create_test_delivery_person();
    h.stores.delivery.seed(person.clone());

    let on = h
        .delivery
        .toggle_status(person.id, Some(19.07), Some(72.87))
        .await
        .unwrap();
    assert!(on.is_available);
    assert_eq!(on.lat, Some(19.07));

    let off = h.delivery.toggle_status(person.id, None, Some(1.0)).await.unwrap();
    assert!(!off.is_available);
    assert_eq!(off.lng, Some(72.87));
}

#[tokio::test]
async fn test_admin_verifies_delivery_person() {
    let h = harness();
    let person = create_test_delivery_person();
    h.stores.delivery.seed(person.clone());
    h.stores.delivery.seed(create_test_delivery_person());

    let verified = h.delivery.set_verified(person.id, true).await.unwrap();
    assert!(verified.verified);
    assert_eq!(h.delivery.list_all().await.unwrap().len(), 2);

    let err = h
        .delivery
        .set_verified(DeliveryPersonId::new(), true)
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 404);
}

//! Delivery Service
//!
//! Sign-up, login and availability for delivery personnel, plus the admin
//! view used to verify them.

use bson::DateTime;
use foodhub_common::Identity;
use foodhub_domain::{Coordinates, DeliveryPerson, DeliveryPersonId, PersonProfilePatch, Role};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{found, Authenticator, NewAccount};
use crate::ports::DeliveryRepositoryPort;
use crate::{ApplicationError, ApplicationResult};

const DELIVERY_NOT_FOUND: &str = "Delivery user not found";

/// Delivery service implementation
#[derive(Clone)]
pub struct DeliveryService {
    people: Arc<dyn DeliveryRepositoryPort>,
    auth: Authenticator,
}

impl DeliveryService {
    pub fn new(people: Arc<dyn DeliveryRepositoryPort>, auth: Authenticator) -> Self {
        Self { people, auth }
    }

    fn token_for(&self, person: &DeliveryPerson) -> ApplicationResult<String> {
        self.auth.issue(&Identity {
            id: person.id.to_string(),
            email: person.email.clone(),
            name: person.display_name(),
            role: Role::Delivery,
        })
    }

    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn signup(&self, account: NewAccount, pincode: String) -> ApplicationResult<String> {
        if self.people.find_by_email(&account.email).await?.is_some() {
            return Err(ApplicationError::Conflict(
                "A delivery user is already registered with this email".to_string(),
            ));
        }

        let now = DateTime::now();
        let person = DeliveryPerson {
            id: DeliveryPersonId::new(),
            email: account.email,
            password_hash: self.auth.hash(&account.password).await?,
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            phone: account.phone,
            pincode,
            verified: false,
            lat: None,
            lng: None,
            is_available: false,
            created_at: now,
            updated_at: now,
        };
        self.people.insert(&person).await?;
        info!(delivery_id = %person.id, "delivery user registered");

        self.token_for(&person)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ApplicationResult<String> {
        let person = self.people.find_by_email(email).await?;
        self.auth
            .check(password, person.as_ref().map(|p| p.password_hash.as_str()))
            .await?;
        let person = found(person, DELIVERY_NOT_FOUND)?;
        self.token_for(&person)
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, id: DeliveryPersonId) -> ApplicationResult<DeliveryPerson> {
        found(self.people.find_by_id(id).await?, DELIVERY_NOT_FOUND)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_profile(
        &self,
        id: DeliveryPersonId,
        patch: PersonProfilePatch,
    ) -> ApplicationResult<DeliveryPerson> {
        if patch.is_empty() {
            return self.profile(id).await;
        }
        found(
            self.people.update_profile(id, &patch).await?,
            DELIVERY_NOT_FOUND,
        )
    }

    /// Flip availability; the position moves only when both coordinates are given
    #[instrument(skip(self))]
    pub async fn toggle_status(
        &self,
        id: DeliveryPersonId,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> ApplicationResult<DeliveryPerson> {
        let coordinates = Coordinates::from_parts(lat, lng)?;
        found(
            self.people.toggle_availability(id, coordinates).await?,
            DELIVERY_NOT_FOUND,
        )
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ApplicationResult<Vec<DeliveryPerson>> {
        self.people.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn set_verified(
        &self,
        id: DeliveryPersonId,
        verified: bool,
    ) -> ApplicationResult<DeliveryPerson> {
        let person = found(
            self.people.set_verified(id, verified).await?,
            DELIVERY_NOT_FOUND,
        )?;
        info!(delivery_id = %id, verified, "delivery user verification changed");
        Ok(person)
    }
}

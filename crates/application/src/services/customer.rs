//! Customer Service

use bson::DateTime;
use foodhub_common::Identity;
use foodhub_domain::{Customer, CustomerId, PersonProfilePatch, Role};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{found, Authenticator};
use crate::ports::CustomerRepositoryPort;
use crate::{ApplicationError, ApplicationResult};

const CUSTOMER_NOT_FOUND: &str = "Customer not found";

/// Sign-up data shared by customers and delivery personnel
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Customer service implementation
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepositoryPort>,
    auth: Authenticator,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepositoryPort>, auth: Authenticator) -> Self {
        Self { customers, auth }
    }

    fn token_for(&self, customer: &Customer) -> ApplicationResult<String> {
        self.auth.issue(&Identity {
            id: customer.id.to_string(),
            email: customer.email.clone(),
            name: customer.display_name(),
            role: Role::Customer,
        })
    }

    /// Register a customer and sign them in
    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn signup(&self, account: NewAccount) -> ApplicationResult<String> {
        if self.customers.find_by_email(&account.email).await?.is_some() {
            return Err(ApplicationError::Conflict(
                "A customer is already registered with this email".to_string(),
            ));
        }

        let now = DateTime::now();
        let customer = Customer {
            id: CustomerId::new(),
            email: account.email,
            password_hash: self.auth.hash(&account.password).await?,
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            phone: account.phone,
            verified: false,
            lat: None,
            lng: None,
            orders: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.customers.insert(&customer).await?;
        info!(customer_id = %customer.id, "customer registered");

        self.token_for(&customer)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ApplicationResult<String> {
        let customer = self.customers.find_by_email(email).await?;
        self.auth
            .check(password, customer.as_ref().map(|c| c.password_hash.as_str()))
            .await?;
        let customer = found(customer, CUSTOMER_NOT_FOUND)?;
        self.token_for(&customer)
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, id: CustomerId) -> ApplicationResult<Customer> {
        found(self.customers.find_by_id(id).await?, CUSTOMER_NOT_FOUND)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_profile(
        &self,
        id: CustomerId,
        patch: PersonProfilePatch,
    ) -> ApplicationResult<Customer> {
        if patch.is_empty() {
            return self.profile(id).await;
        }
        found(
            self.customers.update_profile(id, &patch).await?,
            CUSTOMER_NOT_FOUND,
        )
    }
}

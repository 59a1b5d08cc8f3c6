//! Vendor Service
//!
//! Vendor accounts: admin onboarding, login, listing and self-service
//! profile, cover image and availability updates.

use bson::DateTime;
use foodhub_common::{Identity, PaginatedResult, PaginationParams};
use foodhub_domain::{Coordinates, Role, Vendor, VendorId, VendorProfilePatch};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{found, Authenticator, ImageService};
use crate::ports::{ImageUpload, VendorRepositoryPort};
use crate::{ApplicationError, ApplicationResult};

const VENDOR_NOT_FOUND: &str = "Vendor not found";

/// Data for onboarding a vendor
#[derive(Debug, Clone)]
pub struct NewVendor {
    pub name: String,
    pub owner_name: String,
    pub food_type: Vec<String>,
    pub pincode: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Vendor service implementation
#[derive(Clone)]
pub struct VendorService {
    vendors: Arc<dyn VendorRepositoryPort>,
    auth: Authenticator,
    cover_images: ImageService,
}

impl VendorService {
    pub fn new(
        vendors: Arc<dyn VendorRepositoryPort>,
        auth: Authenticator,
        cover_images: ImageService,
    ) -> Self {
        Self {
            vendors,
            auth,
            cover_images,
        }
    }

    /// Exchange email and password for a signed token
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ApplicationResult<String> {
        let vendor = self.vendors.find_by_email(email).await?;
        self.auth
            .check(password, vendor.as_ref().map(|v| v.password_hash.as_str()))
            .await?;

        // check() only succeeds when a vendor was found
        let vendor = found(vendor, VENDOR_NOT_FOUND)?;
        info!(vendor_id = %vendor.id, "vendor logged in");
        self.auth.issue(&Identity {
            id: vendor.id.to_string(),
            email: vendor.email,
            name: vendor.name,
            role: Role::Vendor,
        })
    }

    /// Onboard a vendor. Emails are unique.
    #[instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create_vendor(&self, new: NewVendor) -> ApplicationResult<Vendor> {
        if self.vendors.find_by_email(&new.email).await?.is_some() {
            return Err(ApplicationError::Conflict(
                "A vendor is already registered with this email".to_string(),
            ));
        }

        let now = DateTime::now();
        let vendor = Vendor {
            id: VendorId::new(),
            name: new.name,
            owner_name: new.owner_name,
            food_type: new.food_type,
            pincode: new.pincode,
            address: new.address,
            phone: new.phone,
            email: new.email,
            password_hash: self.auth.hash(&new.password).await?,
            service_available: false,
            cover_images: Vec::new(),
            rating: 0.0,
            foods: Vec::new(),
            lat: None,
            lng: None,
            created_at: now,
            updated_at: now,
        };

        self.vendors.insert(&vendor).await?;
        info!(vendor_id = %vendor.id, "vendor created");
        Ok(vendor)
    }

    #[instrument(skip(self))]
    pub async fn list_vendors(
        &self,
        name_filter: Option<&str>,
        page: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Vendor>> {
        let name_filter = name_filter.map(str::trim).filter(|s| !s.is_empty());
        self.vendors.list(name_filter, page).await
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, id: VendorId) -> ApplicationResult<Vendor> {
        found(self.vendors.find_by_id(id).await?, VENDOR_NOT_FOUND)
    }

    /// Update the provided profile fields and return the stored vendor
    #[instrument(skip(self, patch))]
    pub async fn update_profile(
        &self,
        id: VendorId,
        patch: VendorProfilePatch,
    ) -> ApplicationResult<Vendor> {
        if patch.is_empty() {
            return self.get_vendor(id).await;
        }
        found(
            self.vendors.update_profile(id, &patch).await?,
            VENDOR_NOT_FOUND,
        )
    }

    /// Store the uploaded files locally and append them to the cover images
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub async fn add_cover_images(
        &self,
        id: VendorId,
        images: Vec<ImageUpload>,
    ) -> ApplicationResult<Vendor> {
        // Nothing is written for an unknown vendor
        self.get_vendor(id).await?;

        let stored = self.cover_images.upload_many(&images).await?;
        let references: Vec<String> = stored.into_iter().map(|s| s.reference).collect();

        found(
            self.vendors.append_cover_images(id, &references).await?,
            VENDOR_NOT_FOUND,
        )
    }

    /// Flip service availability; the location moves only when both coordinates are given
    #[instrument(skip(self))]
    pub async fn toggle_service(
        &self,
        id: VendorId,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> ApplicationResult<Vendor> {
        let coordinates = Coordinates::from_parts(lat, lng)?;
        let vendor = found(
            self.vendors.toggle_service(id, coordinates).await?,
            VENDOR_NOT_FOUND,
        )?;
        info!(vendor_id = %id, available = vendor.service_available, "service toggled");
        Ok(vendor)
    }
}

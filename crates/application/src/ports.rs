//! Ports
//!
//! Traits the services need from storage. Implementations live in the
//! infrastructure crate (MongoDB, local disk, S3) and in the testing crate
//! (in-memory).

use async_trait::async_trait;
use bytes::Bytes;
use foodhub_common::{PaginatedResult, PaginationParams};
use foodhub_domain::{
    Coordinates, Customer, CustomerId, DeliveryPerson, DeliveryPersonId, Food, FoodId, Offer,
    OfferId, Order, OrderId, OrderStatus, PersonProfilePatch, Vendor, VendorId,
    VendorProfilePatch,
};
use std::sync::Arc;

use crate::services::OfferFields;
use crate::ApplicationResult;

/// Vendor storage.
///
/// Mutations return the document as stored after the update, or `None` when
/// no vendor has the given id.
#[async_trait]
pub trait VendorRepositoryPort: Send + Sync {
    async fn insert(&self, vendor: &Vendor) -> ApplicationResult<()>;
    async fn find_by_id(&self, id: VendorId) -> ApplicationResult<Option<Vendor>>;
    /// Exact, case-sensitive match
    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<Vendor>>;
    /// Page through vendors in insertion order, optionally filtered by a
    /// case-insensitive substring of the name
    async fn list(
        &self,
        name_filter: Option<&str>,
        page: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Vendor>>;
    async fn update_profile(
        &self,
        id: VendorId,
        patch: &VendorProfilePatch,
    ) -> ApplicationResult<Option<Vendor>>;
    async fn append_cover_images(
        &self,
        id: VendorId,
        images: &[String],
    ) -> ApplicationResult<Option<Vendor>>;
    async fn toggle_service(
        &self,
        id: VendorId,
        coordinates: Option<Coordinates>,
    ) -> ApplicationResult<Option<Vendor>>;
    /// Idempotent: ids already listed are not added twice
    async fn append_foods(&self, id: VendorId, foods: &[FoodId])
        -> ApplicationResult<Option<Vendor>>;
    /// Vendors serving `pincode` with service switched on, best rated first
    async fn find_available(&self, pincode: &str, limit: Option<u32>)
        -> ApplicationResult<Vec<Vendor>>;
}

/// Food storage
#[async_trait]
pub trait FoodRepositoryPort: Send + Sync {
    async fn insert_many(&self, foods: &[Food]) -> ApplicationResult<()>;
    async fn delete_many(&self, ids: &[FoodId]) -> ApplicationResult<u64>;
    async fn find_by_id(&self, id: FoodId) -> ApplicationResult<Option<Food>>;
    async fn find_by_ids(&self, ids: &[FoodId]) -> ApplicationResult<Vec<Food>>;
    /// Foods of one vendor; `text` matches name or description, case-insensitive
    async fn list_for_vendor(
        &self,
        vendor: VendorId,
        text: Option<&str>,
        page: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Food>>;
    async fn find_by_vendors(
        &self,
        vendors: &[VendorId],
        max_ready_time: Option<u32>,
    ) -> ApplicationResult<Vec<Food>>;
}

/// Order storage. Orders are created by checkout, which lives elsewhere.
#[async_trait]
pub trait OrderRepositoryPort: Send + Sync {
    async fn find_by_id(&self, id: OrderId) -> ApplicationResult<Option<Order>>;
    async fn find_by_vendor(&self, vendor: VendorId) -> ApplicationResult<Vec<Order>>;
    async fn find_by_customer(&self, customer: CustomerId) -> ApplicationResult<Vec<Order>>;
    async fn update_processing(
        &self,
        id: OrderId,
        status: &OrderStatus,
        remarks: &str,
        ready_time: Option<u32>,
    ) -> ApplicationResult<Option<Order>>;
}

/// Offer storage
#[async_trait]
pub trait OfferRepositoryPort: Send + Sync {
    async fn insert(&self, offer: &Offer) -> ApplicationResult<()>;
    async fn find_by_id(&self, id: OfferId) -> ApplicationResult<Option<Offer>>;
    async fn find_all(&self) -> ApplicationResult<Vec<Offer>>;
    async fn find_active_by_pincode(&self, pincode: &str) -> ApplicationResult<Vec<Offer>>;
    /// Overwrite the editable fields, leaving the vendor association alone
    async fn update_fields(
        &self,
        id: OfferId,
        fields: &OfferFields,
    ) -> ApplicationResult<Option<Offer>>;
}

/// Customer storage
#[async_trait]
pub trait CustomerRepositoryPort: Send + Sync {
    async fn insert(&self, customer: &Customer) -> ApplicationResult<()>;
    async fn find_by_id(&self, id: CustomerId) -> ApplicationResult<Option<Customer>>;
    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<Customer>>;
    async fn update_profile(
        &self,
        id: CustomerId,
        patch: &PersonProfilePatch,
    ) -> ApplicationResult<Option<Customer>>;
}

/// Delivery personnel storage
#[async_trait]
pub trait DeliveryRepositoryPort: Send + Sync {
    async fn insert(&self, person: &DeliveryPerson) -> ApplicationResult<()>;
    async fn find_by_id(&self, id: DeliveryPersonId) -> ApplicationResult<Option<DeliveryPerson>>;
    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<DeliveryPerson>>;
    async fn find_all(&self) -> ApplicationResult<Vec<DeliveryPerson>>;
    async fn update_profile(
        &self,
        id: DeliveryPersonId,
        patch: &PersonProfilePatch,
    ) -> ApplicationResult<Option<DeliveryPerson>>;
    async fn toggle_availability(
        &self,
        id: DeliveryPersonId,
        coordinates: Option<Coordinates>,
    ) -> ApplicationResult<Option<DeliveryPerson>>;
    async fn set_verified(
        &self,
        id: DeliveryPersonId,
        verified: bool,
    ) -> ApplicationResult<Option<DeliveryPerson>>;
}

/// An uploaded file, fully buffered
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Name supplied by the client
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Final path component of the client-supplied name
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file_name.as_str())
    }

    /// Lowercase extension without the dot
    pub fn extension(&self) -> Option<String> {
        let name = self.base_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Where a stored image can be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// File name for local images, absolute URL for remote ones
    pub reference: String,
}

/// Image storage backend
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Short backend name for logs
    fn backend(&self) -> &'static str;

    async fn store(&self, image: &ImageUpload) -> ApplicationResult<StoredImage>;
}

/// Backend liveness check for readiness probes
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> ApplicationResult<()>;
}

/// Every repository the services need, as shared trait objects
#[derive(Clone)]
pub struct Repositories {
    pub vendors: Arc<dyn VendorRepositoryPort>,
    pub foods: Arc<dyn FoodRepositoryPort>,
    pub orders: Arc<dyn OrderRepositoryPort>,
    pub offers: Arc<dyn OfferRepositoryPort>,
    pub customers: Arc<dyn CustomerRepositoryPort>,
    pub delivery: Arc<dyn DeliveryRepositoryPort>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> ImageUpload {
        ImageUpload::new(name, None, Bytes::from_static(b"x"))
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(upload("Photo.JPG").extension().as_deref(), Some("jpg"));
        assert_eq!(upload("archive.tar.gz").extension().as_deref(), Some("gz"));
    }

    #[test]
    fn test_missing_extension() {
        assert_eq!(upload("README").extension(), None);
        assert_eq!(upload(".png").extension(), None);
        assert_eq!(upload("trailing.").extension(), None);
    }

    #[test]
    fn test_base_name_strips_directories() {
        assert_eq!(upload("../../etc/passwd.png").base_name(), "passwd.png");
        assert_eq!(upload("C:\\Users\\me\\cat.gif").base_name(), "cat.gif");
    }
}

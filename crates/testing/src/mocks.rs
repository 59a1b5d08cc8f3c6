//! In-memory implementations of the application ports.
//!
//! Every store keeps documents in insertion order behind a `parking_lot`
//! lock, which mirrors the `_id` ordering the MongoDB repositories page by.

use async_trait::async_trait;
use bson::DateTime;
use foodhub_application::{
    services::{OfferFields, PasswordHasher},
    ApplicationError, ApplicationResult, CustomerRepositoryPort, DeliveryRepositoryPort,
    FoodRepositoryPort, HealthProbe, ImageStore, ImageUpload, OfferRepositoryPort,
    OrderRepositoryPort, Repositories, StoredImage, VendorRepositoryPort,
};
use foodhub_common::{pagination::paginate_slice, PaginatedResult, PaginationParams};
use foodhub_domain::{
    Coordinates, Customer, CustomerId, DeliveryPerson, DeliveryPersonId, Food, FoodId, Offer,
    OfferId, Order, OrderId, OrderStatus, PersonProfilePatch, Vendor, VendorId,
    VendorProfilePatch,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn duplicate_email() -> ApplicationError {
    ApplicationError::Conflict("duplicate key: email".to_string())
}

/// Mock vendor repository
#[derive(Clone, Default)]
pub struct MockVendorRepository {
    vendors: Arc<RwLock<Vec<Vendor>>>,
    fail_next_append: Arc<AtomicBool>,
}

impl MockVendorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `append_foods` call fail as if the database went away
    pub fn fail_next_append(&self) {
        self.fail_next_append.store(true, Ordering::SeqCst);
    }

    pub fn seed(&self, vendor: Vendor) {
        self.vendors.write().push(vendor);
    }

    pub fn get(&self, id: VendorId) -> Option<Vendor> {
        self.vendors.read().iter().find(|v| v.id == id).cloned()
    }

    pub fn count(&self) -> usize {
        self.vendors.read().len()
    }

    fn modify<F>(&self, id: VendorId, f: F) -> Option<Vendor>
    where
        F: FnOnce(&mut Vendor),
    {
        let mut vendors = self.vendors.write();
        let vendor = vendors.iter_mut().find(|v| v.id == id)?;
        f(vendor);
        vendor.updated_at = DateTime::now();
        Some(vendor.clone())
    }
}

#[async_trait]
impl VendorRepositoryPort for MockVendorRepository {
    async fn insert(&self, vendor: &Vendor) -> ApplicationResult<()> {
        let mut vendors = self.vendors.write();
        if vendors.iter().any(|v| v.email == vendor.email) {
            return Err(duplicate_email());
        }
        vendors.push(vendor.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: VendorId) -> ApplicationResult<Option<Vendor>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<Vendor>> {
        Ok(self.vendors.read().iter().find(|v| v.email == email).cloned())
    }

    async fn list(
        &self,
        name_filter: Option<&str>,
        page: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Vendor>> {
        let needle = name_filter.map(str::to_lowercase);
        let matching: Vec<Vendor> = self
            .vendors
            .read()
            .iter()
            .filter(|v| match &needle {
                Some(n) => v.name.to_lowercase().contains(n),
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate_slice(&matching, page))
    }

    async fn update_profile(
        &self,
        id: VendorId,
        patch: &VendorProfilePatch,
    ) -> ApplicationResult<Option<Vendor>> {
        Ok(self.modify(id, |v| patch.apply(v)))
    }

    async fn append_cover_images(
        &self,
        id: VendorId,
        images: &[String],
    ) -> ApplicationResult<Option<Vendor>> {
        Ok(self.modify(id, |v| v.append_cover_images(images.iter().cloned())))
    }

    async fn toggle_service(
        &self,
        id: VendorId,
        coordinates: Option<Coordinates>,
    ) -> ApplicationResult<Option<Vendor>> {
        Ok(self.modify(id, |v| v.toggle_service(coordinates)))
    }

    async fn append_foods(
        &self,
        id: VendorId,
        foods: &[FoodId],
    ) -> ApplicationResult<Option<Vendor>> {
        if self.fail_next_append.swap(false, Ordering::SeqCst) {
            return Err(ApplicationError::ServiceUnavailable(
                "connection reset".to_string(),
            ));
        }
        Ok(self.modify(id, |v| {
            v.append_foods(foods);
        }))
    }

    async fn find_available(
        &self,
        pincode: &str,
        limit: Option<u32>,
    ) -> ApplicationResult<Vec<Vendor>> {
        let mut vendors: Vec<Vendor> = self
            .vendors
            .read()
            .iter()
            .filter(|v| v.pincode == pincode && v.service_available)
            .cloned()
            .collect();
        vendors.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        if let Some(limit) = limit {
            vendors.truncate(limit as usize);
        }
        Ok(vendors)
    }
}

/// Mock food repository
#[derive(Clone, Default)]
pub struct MockFoodRepository {
    foods: Arc<RwLock<Vec<Food>>>,
}

impl MockFoodRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, food: Food) {
        self.foods.write().push(food);
    }

    pub fn count(&self) -> usize {
        self.foods.read().len()
    }
}

#[async_trait]
impl FoodRepositoryPort for MockFoodRepository {
    async fn insert_many(&self, foods: &[Food]) -> ApplicationResult<()> {
        self.foods.write().extend(foods.iter().cloned());
        Ok(())
    }

    async fn delete_many(&self, ids: &[FoodId]) -> ApplicationResult<u64> {
        let mut foods = self.foods.write();
        let before = foods.len();
        foods.retain(|f| !ids.contains(&f.id));
        Ok((before - foods.len()) as u64)
    }

    async fn find_by_id(&self, id: FoodId) -> ApplicationResult<Option<Food>> {
        Ok(self.foods.read().iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[FoodId]) -> ApplicationResult<Vec<Food>> {
        Ok(self
            .foods
            .read()
            .iter()
            .filter(|f| ids.contains(&f.id))
            .cloned()
            .collect())
    }

    async fn list_for_vendor(
        &self,
        vendor: VendorId,
        text: Option<&str>,
        page: PaginationParams,
    ) -> ApplicationResult<PaginatedResult<Food>> {
        let matching: Vec<Food> = self
            .foods
            .read()
            .iter()
            .filter(|f| f.vendor_id == vendor && text.map_or(true, |t| f.matches_text(t)))
            .cloned()
            .collect();
        Ok(paginate_slice(&matching, page))
    }

    async fn find_by_vendors(
        &self,
        vendors: &[VendorId],
        max_ready_time: Option<u32>,
    ) -> ApplicationResult<Vec<Food>> {
        Ok(self
            .foods
            .read()
            .iter()
            .filter(|f| vendors.contains(&f.vendor_id))
            .filter(|f| max_ready_time.map_or(true, |max| f.ready_time <= max))
            .cloned()
            .collect())
    }
}

/// Mock order repository. Orders are only ever seeded.
#[derive(Clone, Default)]
pub struct MockOrderRepository {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, order: Order) {
        self.orders.write().push(order);
    }

    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.read().iter().find(|o| o.id == id).cloned()
    }
}

#[async_trait]
impl OrderRepositoryPort for MockOrderRepository {
    async fn find_by_id(&self, id: OrderId) -> ApplicationResult<Option<Order>> {
        Ok(self.get(id))
    }

    async fn find_by_vendor(&self, vendor: VendorId) -> ApplicationResult<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .iter()
            .filter(|o| o.vendor_id == vendor)
            .cloned()
            .collect())
    }

    async fn find_by_customer(&self, customer: CustomerId) -> ApplicationResult<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .iter()
            .filter(|o| o.customer_id == Some(customer))
            .cloned()
            .collect())
    }

    async fn update_processing(
        &self,
        id: OrderId,
        status: &OrderStatus,
        remarks: &str,
        ready_time: Option<u32>,
    ) -> ApplicationResult<Option<Order>> {
        let mut orders = self.orders.write();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.process(status.clone(), remarks.to_string(), ready_time);
        Ok(Some(order.clone()))
    }
}

/// Mock offer repository
#[derive(Clone, Default)]
pub struct MockOfferRepository {
    offers: Arc<RwLock<Vec<Offer>>>,
}

impl MockOfferRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, offer: Offer) {
        self.offers.write().push(offer);
    }

    pub fn count(&self) -> usize {
        self.offers.read().len()
    }
}

#[async_trait]
impl OfferRepositoryPort for MockOfferRepository {
    async fn insert(&self, offer: &Offer) -> ApplicationResult<()> {
        self.offers.write().push(offer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OfferId) -> ApplicationResult<Option<Offer>> {
        Ok(self.offers.read().iter().find(|o| o.id == id).cloned())
    }

    async fn find_all(&self) -> ApplicationResult<Vec<Offer>> {
        Ok(self.offers.read().clone())
    }

    async fn find_active_by_pincode(&self, pincode: &str) -> ApplicationResult<Vec<Offer>> {
        Ok(self
            .offers
            .read()
            .iter()
            .filter(|o| o.is_active && o.pincode == pincode)
            .cloned()
            .collect())
    }

    async fn update_fields(
        &self,
        id: OfferId,
        fields: &OfferFields,
    ) -> ApplicationResult<Option<Offer>> {
        let mut offers = self.offers.write();
        let Some(offer) = offers.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        fields.apply(offer);
        Ok(Some(offer.clone()))
    }
}

/// Mock customer repository
#[derive(Clone, Default)]
pub struct MockCustomerRepository {
    customers: Arc<RwLock<Vec<Customer>>>,
}

impl MockCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.customers.read().len()
    }
}

#[async_trait]
impl CustomerRepositoryPort for MockCustomerRepository {
    async fn insert(&self, customer: &Customer) -> ApplicationResult<()> {
        let mut customers = self.customers.write();
        if customers.iter().any(|c| c.email == customer.email) {
            return Err(duplicate_email());
        }
        customers.push(customer.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CustomerId) -> ApplicationResult<Option<Customer>> {
        Ok(self.customers.read().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<Customer>> {
        Ok(self
            .customers
            .read()
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: CustomerId,
        patch: &PersonProfilePatch,
    ) -> ApplicationResult<Option<Customer>> {
        let mut customers = self.customers.write();
        let Some(customer) = customers.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        patch.apply_to_customer(customer);
        customer.updated_at = DateTime::now();
        Ok(Some(customer.clone()))
    }
}

/// Mock delivery personnel repository
#[derive(Clone, Default)]
pub struct MockDeliveryRepository {
    people: Arc<RwLock<Vec<DeliveryPerson>>>,
}

impl MockDeliveryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, person: DeliveryPerson) {
        self.people.write().push(person);
    }

    fn modify<F>(&self, id: DeliveryPersonId, f: F) -> Option<DeliveryPerson>
    where
        F: FnOnce(&mut DeliveryPerson),
    {
        let mut people = self.people.write();
        let person = people.iter_mut().find(|p| p.id == id)?;
        f(person);
        person.updated_at = DateTime::now();
        Some(person.clone())
    }
}

#[async_trait]
impl DeliveryRepositoryPort for MockDeliveryRepository {
    async fn insert(&self, person: &DeliveryPerson) -> ApplicationResult<()> {
        let mut people = self.people.write();
        if people.iter().any(|p| p.email == person.email) {
            return Err(duplicate_email());
        }
        people.push(person.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: DeliveryPersonId) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self.people.read().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self.people.read().iter().find(|p| p.email == email).cloned())
    }

    async fn find_all(&self) -> ApplicationResult<Vec<DeliveryPerson>> {
        Ok(self.people.read().clone())
    }

    async fn update_profile(
        &self,
        id: DeliveryPersonId,
        patch: &PersonProfilePatch,
    ) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self.modify(id, |p| patch.apply_to_delivery(p)))
    }

    async fn toggle_availability(
        &self,
        id: DeliveryPersonId,
        coordinates: Option<Coordinates>,
    ) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self.modify(id, |p| p.toggle_availability(coordinates)))
    }

    async fn set_verified(
        &self,
        id: DeliveryPersonId,
        verified: bool,
    ) -> ApplicationResult<Option<DeliveryPerson>> {
        Ok(self.modify(id, |p| p.verified = verified))
    }
}

/// Image store that keeps uploads in memory and names them `mem_<n>_<name>`
#[derive(Clone, Default)]
pub struct MockImageStore {
    stored: Arc<RwLock<Vec<(String, usize)>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following store call with `ServiceUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn stored_names(&self) -> Vec<String> {
        self.stored.read().iter().map(|(name, _)| name.clone()).collect()
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn store(&self, image: &ImageUpload) -> ApplicationResult<StoredImage> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ApplicationError::ServiceUnavailable(
                "image store offline".to_string(),
            ));
        }
        let mut stored = self.stored.write();
        let reference = format!("mem_{}_{}", stored.len(), image.base_name());
        stored.push((reference.clone(), image.bytes.len()));
        Ok(StoredImage { reference })
    }
}

/// Reversible "hash" so service tests avoid argon2's cost in debug builds
#[derive(Clone, Copy, Default)]
pub struct PlainPasswordHasher;

const PLAIN_PREFIX: &str = "plain$";

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("{PLAIN_PREFIX}{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> ApplicationResult<bool> {
        Ok(hash.strip_prefix(PLAIN_PREFIX) == Some(password))
    }
}

/// Health probe with a switchable outcome
#[derive(Clone, Default)]
pub struct MockHealthProbe {
    down: Arc<AtomicBool>,
}

impl MockHealthProbe {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthProbe for MockHealthProbe {
    async fn ping(&self) -> ApplicationResult<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(ApplicationError::ServiceUnavailable(
                "database unreachable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Concrete handles to every in-memory store, for seeding and inspection
#[derive(Clone, Default)]
pub struct MockStores {
    pub vendors: MockVendorRepository,
    pub foods: MockFoodRepository,
    pub orders: MockOrderRepository,
    pub offers: MockOfferRepository,
    pub customers: MockCustomerRepository,
    pub delivery: MockDeliveryRepository,
}

impl MockStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same stores as port trait objects
    pub fn repositories(&self) -> Repositories {
        Repositories {
            vendors: Arc::new(self.vendors.clone()),
            foods: Arc::new(self.foods.clone()),
            orders: Arc::new(self.orders.clone()),
            offers: Arc::new(self.offers.clone()),
            customers: Arc::new(self.customers.clone()),
            delivery: Arc::new(self.delivery.clone()),
        }
    }
}

//! In-memory store used by the test suite in place of Postgres.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    catalog::{
        repo::ServiceRepo,
        repo_types::{CategoryRef, NewService, Service, ServiceChanges, ServiceDetails},
    },
    categories::{
        repo::CategoryRepo,
        repo_types::{Category, CategoryChanges, NewCategory},
    },
    error::{StoreError, StoreResult},
    providers::{
        repo::ProviderRepo,
        repo_types::{NewProvider, Provider, ProviderChanges, VerificationStatus},
    },
    users::{
        repo::UserRepo,
        repo_types::{NewUser, Role, User},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    services: Vec<Service>,
    providers: Vec<Provider>,
}

impl Tables {
    fn details(&self, s: &Service) -> ServiceDetails {
        let name = self
            .categories
            .iter()
            .find(|c| c.id == s.category_id)
            .map(|c| c.name.clone());
        ServiceDetails {
            id: s.id,
            title: s.title.clone(),
            description: s.description.clone(),
            price: s.price,
            category: CategoryRef {
                id: s.category_id,
                name,
            },
            duration: s.duration,
            is_active: s.is_active,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Rows are kept in insertion order; listings walk them newest first.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("memory store poisoned")))
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.lock()?;
        if t.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            role: new.role,
            is_blocked: false,
            created_at: now(),
            updated_at: now(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock()?.users.iter().rev().cloned().collect())
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut t = self.lock()?;
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_string();
        user.updated_at = now();
        Ok(true)
    }

    async fn set_blocked(&self, id: Uuid, blocked: bool) -> StoreResult<Option<User>> {
        let mut t = self.lock()?;
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.is_blocked = blocked;
        user.updated_at = now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock()?;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        let removed = t.users.len() != before;
        if removed {
            t.providers.retain(|p| p.user_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn create(&self, new: NewCategory) -> StoreResult<Category> {
        let mut t = self.lock()?;
        if t.categories.iter().any(|c| c.name == new.name) {
            return Err(StoreError::Duplicate);
        }
        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            created_at: now(),
            updated_at: now(),
        };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(self.lock()?.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        Ok(self.lock()?.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Category>> {
        Ok(self.lock()?.categories.iter().rev().cloned().collect())
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> StoreResult<Option<Category>> {
        let mut t = self.lock()?;
        if let Some(name) = &changes.name {
            if t.categories.iter().any(|c| &c.name == name && c.id != id) {
                return Err(StoreError::Duplicate);
            }
        }
        let Some(category) = t.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(description) = changes.description {
            category.description = Some(description);
        }
        category.updated_at = now();
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock()?;
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        Ok(t.categories.len() != before)
    }
}

#[async_trait]
impl ServiceRepo for MemoryStore {
    async fn create(&self, new: NewService) -> StoreResult<Service> {
        let service = Service {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            price: new.price,
            category_id: new.category_id,
            duration: new.duration,
            is_active: true,
            created_at: now(),
            updated_at: now(),
        };
        self.lock()?.services.push(service.clone());
        Ok(service)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Service>> {
        Ok(self.lock()?.services.iter().find(|s| s.id == id).cloned())
    }

    async fn find_details(&self, id: Uuid) -> StoreResult<Option<ServiceDetails>> {
        let t = self.lock()?;
        Ok(t.services.iter().find(|s| s.id == id).map(|s| t.details(s)))
    }

    async fn list_details(&self) -> StoreResult<Vec<ServiceDetails>> {
        let t = self.lock()?;
        Ok(t.services.iter().rev().map(|s| t.details(s)).collect())
    }

    async fn update(&self, id: Uuid, changes: ServiceChanges) -> StoreResult<Option<Service>> {
        let mut t = self.lock()?;
        let Some(service) = t.services.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            service.title = title;
        }
        if let Some(description) = changes.description {
            service.description = Some(description);
        }
        if let Some(price) = changes.price {
            service.price = price;
        }
        if let Some(category_id) = changes.category_id {
            service.category_id = category_id;
        }
        if let Some(duration) = changes.duration {
            service.duration = duration;
        }
        if let Some(is_active) = changes.is_active {
            service.is_active = is_active;
        }
        service.updated_at = now();
        Ok(Some(service.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock()?;
        let before = t.services.len();
        t.services.retain(|s| s.id != id);
        Ok(t.services.len() != before)
    }
}

#[async_trait]
impl ProviderRepo for MemoryStore {
    async fn create_if_absent(&self, new: NewProvider) -> StoreResult<Option<Provider>> {
        let mut t = self.lock()?;
        if t.providers.iter().any(|p| p.user_id == new.user_id) {
            return Ok(None);
        }
        let provider = Provider {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            profession: new.profession,
            experience: new.experience,
            bio: new.bio,
            location: new.location,
            services_offered: new.services_offered,
            available_slots: new.available_slots,
            verification_status: VerificationStatus::Pending,
            is_approved: false,
            created_at: now(),
            updated_at: now(),
        };
        t.providers.push(provider.clone());
        Ok(Some(provider))
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Provider>> {
        Ok(self.lock()?.providers.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<Provider>> {
        Ok(self.lock()?.providers.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn update_profile(&self, user_id: Uuid, changes: ProviderChanges) -> StoreResult<Option<Provider>> {
        let mut t = self.lock()?;
        let Some(provider) = t.providers.iter_mut().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(profession) = changes.profession {
            provider.profession = profession;
        }
        if let Some(experience) = changes.experience {
            provider.experience = experience;
        }
        if let Some(bio) = changes.bio {
            provider.bio = Some(bio);
        }
        if let Some(location) = changes.location {
            provider.location = Some(location);
        }
        if let Some(slots) = changes.available_slots {
            provider.available_slots = slots;
        }
        provider.updated_at = now();
        Ok(Some(provider.clone()))
    }

    async fn set_services(&self, id: Uuid, services: &[Uuid]) -> StoreResult<Option<Provider>> {
        let mut t = self.lock()?;
        let Some(provider) = t.providers.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        provider.services_offered = services.to_vec();
        provider.updated_at = now();
        Ok(Some(provider.clone()))
    }

    async fn set_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        owner_role: Role,
    ) -> StoreResult<Option<Provider>> {
        let mut t = self.lock()?;
        let Some(provider) = t.providers.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        provider.verification_status = status;
        provider.is_approved = status == VerificationStatus::Approved;
        provider.updated_at = now();
        let provider = provider.clone();
        if let Some(owner) = t.users.iter_mut().find(|u| u.id == provider.user_id) {
            owner.role = owner_role;
            owner.updated_at = now();
        }
        Ok(Some(provider))
    }
}

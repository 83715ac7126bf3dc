//! Provider application and approval workflow.
//!
//! A user applies once (`pending`). An admin then approves or rejects the
//! application, which also moves the owner's role to `provider` or back to
//! `user`. Only approved providers may bind the services they offer.

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{ApplyProviderRequest, SelectServicesRequest, SlotInput, UpdateProviderRequest, VerificationRequest},
    repo_types::{NewProvider, Provider, ProviderChanges, Slot, VerificationStatus},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::repo_types::Role,
    validation::{is_valid, parse_id},
};

/// Decision taken by an admin on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationAction {
    Approve,
    Reject,
}

impl VerificationAction {
    fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            Some("approve") => Ok(Self::Approve),
            Some("reject") => Ok(Self::Reject),
            _ => Err(AppError::bad_request("Action must be either approve or reject")),
        }
    }

    fn outcome(self) -> (VerificationStatus, Role) {
        match self {
            Self::Approve => (VerificationStatus::Approved, Role::Provider),
            Self::Reject => (VerificationStatus::Rejected, Role::User),
        }
    }
}

fn already_applied() -> AppError {
    AppError::conflict("Provider Application Already Submitted")
}

fn checked_experience(experience: f64) -> AppResult<f64> {
    if !experience.is_finite() || experience < 0.0 {
        return Err(AppError::validation("Invalid Experience"));
    }
    Ok(experience)
}

fn checked_slots(slots: Vec<SlotInput>) -> AppResult<Vec<Slot>> {
    if slots.is_empty() {
        return Err(AppError::validation("Available Slots must be a non-empty array"));
    }
    slots
        .into_iter()
        .map(|s| match (s.date, s.time) {
            (Some(date), Some(time)) if is_valid(Some(&date)) && is_valid(Some(&time)) => Ok(Slot {
                date: date.trim().to_string(),
                time: time.trim().to_string(),
            }),
            _ => Err(AppError::validation("Each Slot must contain date and time")),
        })
        .collect()
}

pub async fn apply_as_provider(st: &AppState, user_id: Uuid, req: ApplyProviderRequest) -> AppResult<Provider> {
    let user = st
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User Not Found"))?;

    if user.role == Role::Provider {
        return Err(AppError::conflict("User is Already registered as provider"));
    }
    if st.providers.find_by_user(user_id).await?.is_some() {
        return Err(already_applied());
    }

    let profession = req
        .profession
        .filter(|p| is_valid(Some(p)))
        .ok_or_else(|| AppError::validation("Profession is Required"))?;
    let experience = req
        .experience
        .ok_or_else(|| AppError::validation("Experience is Required"))
        .and_then(checked_experience)?;

    let services = req
        .services_offered
        .ok_or_else(|| AppError::validation("Services Offered is Required"))?;
    if services.is_empty() {
        return Err(AppError::validation("At least One Service must be selected"));
    }
    let services_offered = services
        .iter()
        .map(|raw| parse_id(raw, "Service"))
        .collect::<AppResult<Vec<_>>>()?;

    let available_slots = match req.available_slots {
        Some(slots) => checked_slots(slots)?,
        None => Vec::new(),
    };

    let provider = st
        .providers
        .create_if_absent(NewProvider {
            user_id,
            profession: profession.trim().to_string(),
            experience,
            bio: req.bio.filter(|b| is_valid(Some(b))),
            location: req.location.filter(|l| is_valid(Some(l))),
            services_offered,
            available_slots,
        })
        .await?
        .ok_or_else(already_applied)?;

    info!(provider_id = %provider.id, %user_id, "provider application submitted");
    Ok(provider)
}

pub async fn get_my_provider_profile(st: &AppState, user_id: Uuid) -> AppResult<Provider> {
    let user = st
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User Not Found"))?;

    if user.role != Role::Provider {
        return Err(AppError::forbidden("Access Denied !!! User is not a Provider"));
    }

    st.providers
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Provider Profile Not Found"))
}

pub async fn update_provider_profile(
    st: &AppState,
    user_id: Uuid,
    req: UpdateProviderRequest,
) -> AppResult<Provider> {
    if st.providers.find_by_user(user_id).await?.is_none() {
        return Err(AppError::not_found("Provider Profile Not Found"));
    }

    let changes = ProviderChanges {
        profession: req
            .profession
            .filter(|p| is_valid(Some(p)))
            .map(|p| p.trim().to_string()),
        experience: req.experience.map(checked_experience).transpose()?,
        bio: req.bio.filter(|b| is_valid(Some(b))),
        location: req.location.filter(|l| is_valid(Some(l))),
        available_slots: req.available_slots.map(checked_slots).transpose()?,
    };

    let provider = st
        .providers
        .update_profile(user_id, changes)
        .await?
        .ok_or_else(|| AppError::not_found("Provider Profile Not Found"))?;
    info!(provider_id = %provider.id, "provider profile updated");
    Ok(provider)
}

/// Parses the admin decision; runs before the provider id is looked at.
pub fn verification_action(req: &VerificationRequest) -> AppResult<VerificationAction> {
    VerificationAction::parse(req.action.as_deref())
}

pub async fn approve_provider(
    st: &AppState,
    provider_id: Uuid,
    action: VerificationAction,
) -> AppResult<VerificationStatus> {
    let previous = st
        .providers
        .find_by_id(provider_id)
        .await?
        .ok_or_else(|| AppError::not_found("Provider Not Found"))?
        .verification_status;

    let (status, role) = action.outcome();
    let provider = st
        .providers
        .set_verification(provider_id, status, role)
        .await?
        .ok_or_else(|| AppError::not_found("Provider Not Found"))?;
    info!(
        %provider_id,
        user_id = %provider.user_id,
        from = %previous,
        to = %status,
        "provider verification changed"
    );
    Ok(status)
}

pub async fn select_provider_services(
    st: &AppState,
    user_id: Uuid,
    req: SelectServicesRequest,
) -> AppResult<Provider> {
    let requested = match req.services_offered {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => {
            return Err(AppError::bad_request(
                "Services Offered Must be an array with atleast one service",
            ))
        }
    };

    let provider = st
        .providers
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Provider Not Found"))?;

    if !provider.is_approved {
        warn!(provider_id = %provider.id, "unapproved provider tried to bind services");
        return Err(AppError::forbidden("Provider Not Approved Yet."));
    }

    let mut services = Vec::with_capacity(requested.len());
    for item in &requested {
        let raw = item.as_str().unwrap_or_default();
        let id = parse_id(raw, "Service")?;
        if st.services.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(format!("Service Not found: {raw}")));
        }
        services.push(id);
    }

    let provider = st
        .providers
        .set_services(provider.id, &services)
        .await?
        .ok_or_else(|| AppError::not_found("Provider Not Found"))?;
    info!(provider_id = %provider.id, count = services.len(), "provider services selected");
    Ok(provider)
}

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// One availability window offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => anyhow::bail!("unknown verification status {other:?}"),
        }
    }
}

/// Row as stored in `providers`.
#[derive(Debug, FromRow)]
pub struct ProviderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profession: String,
    pub experience: f64,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub services_offered: Vec<Uuid>,
    pub available_slots: Json<Vec<Slot>>,
    pub verification_status: String,
    pub is_approved: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub profession: String,
    pub experience: f64, // years
    pub bio: Option<String>,
    pub location: Option<String>,
    pub services_offered: Vec<Uuid>,
    pub available_slots: Vec<Slot>,
    pub verification_status: VerificationStatus,
    pub is_approved: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TryFrom<ProviderRow> for Provider {
    type Error = anyhow::Error;

    fn try_from(r: ProviderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            profession: r.profession,
            experience: r.experience,
            bio: r.bio,
            location: r.location,
            services_offered: r.services_offered,
            available_slots: r.available_slots.0,
            verification_status: r.verification_status.parse()?,
            is_approved: r.is_approved,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewProvider {
    pub user_id: Uuid,
    pub profession: String,
    pub experience: f64,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub services_offered: Vec<Uuid>,
    pub available_slots: Vec<Slot>,
}

/// Profile fields to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProviderChanges {
    pub profession: Option<String>,
    pub experience: Option<f64>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub available_slots: Option<Vec<Slot>>,
}

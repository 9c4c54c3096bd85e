//! Core data type definitions

use crate::error::VoluntreeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The resolved identity of the current actor, decoded from a verified
/// session token. `full_name` is a denormalized copy of the profile name
/// captured at login; the profile row remains the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

/// Volunteer profile, one per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Host organization profile, at most one per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostOrganization {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Publication state of an opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityStatus {
    Active,
    Draft,
    Closed,
}

impl OpportunityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityStatus {
    type Err = VoluntreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "draft" => Ok(Self::Draft),
            "closed" => Ok(Self::Closed),
            other => Err(VoluntreeError::Validation(format!(
                "invalid opportunity status: {other}"
            ))),
        }
    }
}

/// A volunteering/internship opportunity posted by a host organization.
/// The owning organization is fixed at creation and never transferred.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub host_organization_id: String,
    pub title: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub applicant_types: Vec<String>,
    pub min_duration_weeks: Option<i64>,
    pub max_duration_weeks: Option<i64>,
    pub images: Vec<String>,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub status: OpportunityStatus,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An opportunity joined with its host organization summary, as shown on the
/// public browse pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityListing {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub host_name: String,
    pub host_location: Option<String>,
    pub host_logo: Option<String>,
}

/// Review state of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = VoluntreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "withdrawn" => Ok(Self::Withdrawn),
            other => Err(VoluntreeError::Validation(format!(
                "invalid application status: {other}"
            ))),
        }
    }
}

/// An application submitted by a user against an opportunity. The form data
/// is kept as a JSON document in `details`; the columns the system acts on
/// (ownership, status, uniqueness) are first-class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub user_id: String,
    pub opportunity_id: String,
    pub status: ApplicationStatus,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An application joined with the context an organization reviewer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub opportunity_title: String,
    pub opportunity_location: Option<String>,
    pub opportunity_theme: Option<String>,
    pub applicant_email: String,
    pub applicant_name: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::policy::CapabilitySet;

// --- Persisted Records (snake_case columns, camelCase JSON) ---

/// Profile
///
/// One row per identity in `public.profiles`. The `role` column is kept as raw
/// text here; it is only trusted after `Role::parse` accepts it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Profile {
    // Same value as the auth identity id.
    pub id: Uuid,
    pub name: String,
    pub role: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Service
///
/// A government service from the public catalog (`public.services`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub requirements: String,
    pub procedure: String,
    // Owning department, shown on the service card.
    pub department: String,
    pub cost: String,
    // Drives the "popular services" ordering.
    pub views: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// NewsItem
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewsItem {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub image_url: Option<String>,
    #[ts(type = "string")]
    pub published_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// JobPosting
///
/// A vacancy in `public.jobs`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary: String,

    // `type` is a reserved keyword in Rust; the column and the JSON key keep the short name.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub job_type: String,

    #[ts(type = "string")]
    pub deadline: DateTime<Utc>,
    pub contact_email: String,
    pub contact_phone: String,
    #[ts(type = "string")]
    pub published_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// AdminAction
///
/// Audit row appended to `public.admin_actions` after every back-office mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminAction {
    pub user_id: Uuid,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub details: Option<serde_json::Value>,
}

// --- Request Payloads ---

/// ServiceInput
///
/// Body for `POST /admin/services` and `PUT /admin/services/{id}`. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceInput {
    pub title: String,
    pub description: String,
    pub duration: String,
    pub requirements: String,
    pub procedure: String,
    pub department: String,
    pub cost: String,
}

/// NewsInput
///
/// `imageUrl` is the only optional field; an empty string is stored as null.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewsInput {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewsInput {
    pub fn normalized_image_url(&self) -> Option<String> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JobInput {
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary: String,
    #[serde(rename = "type")]
    pub job_type: String,
    #[ts(type = "string")]
    pub deadline: DateTime<Utc>,
    pub contact_email: String,
    pub contact_phone: String,
}

/// CreateUserRequest
///
/// Owner-only. The password goes straight to the auth collaborator and is
/// never persisted or logged here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

/// UpdateUserRequest
///
/// Partial update of another user's profile; omitted fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// NewProfile
///
/// Internal insert shape used after the auth collaborator has issued an id.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// SessionTokens
///
/// What the auth collaborator hands back on a successful password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

// --- Output Schemas ---

/// UserSummary
///
/// Row in the owner's user list. `role` is `None` when the stored value is not
/// a recognized role, so the UI never displays a guessed default.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub role: Option<crate::roles::Role>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for UserSummary {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            role: crate::roles::Role::parse(&profile.role),
            name: profile.name,
            created_at: profile.created_at,
        }
    }
}

/// MeResponse
///
/// The signed-in back-office user plus the affordances they may see.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub role: crate::roles::Role,
    pub capabilities: CapabilitySet,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_services: i64,
    pub total_news: i64,
    pub total_jobs: i64,
    pub total_users: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardResponse {
    pub user: MeResponse,
    pub stats: AdminDashboardStats,
}

/// group_jobs_by_department
///
/// Buckets postings for the public vacancies page. Departments come out in
/// alphabetical order; postings keep their incoming order inside a bucket.
pub fn group_jobs_by_department(jobs: Vec<JobPosting>) -> BTreeMap<String, Vec<JobPosting>> {
    let mut grouped: BTreeMap<String, Vec<JobPosting>> = BTreeMap::new();
    for job in jobs {
        grouped.entry(job.department.clone()).or_default().push(job);
    }
    grouped
}

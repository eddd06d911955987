use crate::models::{
    AdminAction, AdminDashboardStats, JobInput, JobPosting, NewProfile, NewsInput, NewsItem,
    Profile, Service, ServiceInput, UpdateUserRequest,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use uuid::Uuid;

/// RepositoryError
///
/// Write-path failures. Read paths log and degrade instead (empty list / `None`).
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Repository Trait
///
/// Persistence contract for the portal. Handlers only see this trait, so the
/// Postgres store and the in-memory store are interchangeable.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Services ---
    // Public catalog, alphabetical by title.
    async fn list_services(&self) -> Vec<Service>;
    // Most viewed first.
    async fn popular_services(&self, limit: i64) -> Vec<Service>;
    async fn get_service(&self, id: Uuid) -> Option<Service>;
    async fn create_service(&self, input: ServiceInput) -> Result<Service, RepositoryError>;
    async fn update_service(
        &self,
        id: Uuid,
        input: ServiceInput,
    ) -> Result<Option<Service>, RepositoryError>;
    // True if a row was removed.
    async fn delete_service(&self, id: Uuid) -> Result<bool, RepositoryError>;

    // --- News ---
    // Newest first; `limit` of `None` returns everything.
    async fn list_news(&self, limit: Option<i64>) -> Vec<NewsItem>;
    async fn get_news(&self, id: Uuid) -> Option<NewsItem>;
    async fn create_news(&self, input: NewsInput) -> Result<NewsItem, RepositoryError>;
    async fn update_news(
        &self,
        id: Uuid,
        input: NewsInput,
    ) -> Result<Option<NewsItem>, RepositoryError>;
    async fn delete_news(&self, id: Uuid) -> Result<bool, RepositoryError>;

    // --- Jobs ---
    async fn list_jobs(&self, limit: Option<i64>) -> Vec<JobPosting>;
    async fn get_job(&self, id: Uuid) -> Option<JobPosting>;
    async fn create_job(&self, input: JobInput) -> Result<JobPosting, RepositoryError>;
    async fn update_job(
        &self,
        id: Uuid,
        input: JobInput,
    ) -> Result<Option<JobPosting>, RepositoryError>;
    async fn delete_job(&self, id: Uuid) -> Result<bool, RepositoryError>;

    // --- Profiles ---
    // `None` for both "no such profile" and "lookup failed".
    async fn get_profile(&self, id: Uuid) -> Option<Profile>;
    async fn list_profiles(&self) -> Vec<Profile>;
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, RepositoryError>;
    // COALESCE-style partial update of name and role.
    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<Option<Profile>, RepositoryError>;

    // --- Audit & Dashboard ---
    async fn log_admin_action(&self, action: AdminAction) -> Result<(), RepositoryError>;
    async fn get_stats(&self) -> AdminDashboardStats;
}

/// RepositoryState
///
/// The shared handle stored in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;

const SERVICE_COLUMNS: &str = "id, title, description, duration, requirements, procedure, department, cost, views, created_at, updated_at";
const NEWS_COLUMNS: &str =
    "id, title, summary, content, author, category, image_url, published_at, updated_at";
const JOB_COLUMNS: &str = "id, title, department, location, description, requirements, salary, type, deadline, contact_email, contact_phone, published_at, updated_at";
const PROFILE_COLUMNS: &str = "id, name, role, created_at, updated_at";

/// PostgresRepository
///
/// `Repository` backed by the hosted Postgres database. Connects with the
/// server's own credentials; the row-level security policies in
/// `migrations/` guard the same tables for clients that go around this API.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("count {} error: {:?}", table, e);
                0
            })
    }

    async fn delete_from(&self, table: &str, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn list_services(&self) -> Vec<Service> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY title ASC");
        sqlx::query_as::<_, Service>(&query)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_services error: {:?}", e);
                vec![]
            })
    }

    async fn popular_services(&self, limit: i64) -> Vec<Service> {
        let query =
            format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY views DESC LIMIT $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("popular_services error: {:?}", e);
                vec![]
            })
    }

    async fn get_service(&self, id: Uuid) -> Option<Service> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_service error: {:?}", e);
                None
            })
    }

    /// create_service
    ///
    /// New services start with zero views.
    async fn create_service(&self, input: ServiceInput) -> Result<Service, RepositoryError> {
        let query = format!(
            "INSERT INTO services (id, title, description, duration, requirements, procedure, department, cost, views, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, NOW(), NOW()) RETURNING {SERVICE_COLUMNS}"
        );
        let service = sqlx::query_as::<_, Service>(&query)
            .bind(Uuid::new_v4())
            .bind(input.title)
            .bind(input.description)
            .bind(input.duration)
            .bind(input.requirements)
            .bind(input.procedure)
            .bind(input.department)
            .bind(input.cost)
            .fetch_one(&self.pool)
            .await?;
        Ok(service)
    }

    async fn update_service(
        &self,
        id: Uuid,
        input: ServiceInput,
    ) -> Result<Option<Service>, RepositoryError> {
        let query = format!(
            "UPDATE services SET title = $2, description = $3, duration = $4, requirements = $5, \
             procedure = $6, department = $7, cost = $8, updated_at = NOW() \
             WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
        );
        let service = sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(input.title)
            .bind(input.description)
            .bind(input.duration)
            .bind(input.requirements)
            .bind(input.procedure)
            .bind(input.department)
            .bind(input.cost)
            .fetch_optional(&self.pool)
            .await?;
        Ok(service)
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.delete_from("services", id).await
    }

    async fn list_news(&self, limit: Option<i64>) -> Vec<NewsItem> {
        // LIMIT NULL means no limit in Postgres.
        let query =
            format!("SELECT {NEWS_COLUMNS} FROM news ORDER BY published_at DESC LIMIT $1");
        sqlx::query_as::<_, NewsItem>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_news error: {:?}", e);
                vec![]
            })
    }

    async fn get_news(&self, id: Uuid) -> Option<NewsItem> {
        let query = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");
        sqlx::query_as::<_, NewsItem>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_news error: {:?}", e);
                None
            })
    }

    async fn create_news(&self, input: NewsInput) -> Result<NewsItem, RepositoryError> {
        let image_url = input.normalized_image_url();
        let query = format!(
            "INSERT INTO news (id, title, summary, content, author, category, image_url, published_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW()) RETURNING {NEWS_COLUMNS}"
        );
        let item = sqlx::query_as::<_, NewsItem>(&query)
            .bind(Uuid::new_v4())
            .bind(input.title)
            .bind(input.summary)
            .bind(input.content)
            .bind(input.author)
            .bind(input.category)
            .bind(image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(item)
    }

    async fn update_news(
        &self,
        id: Uuid,
        input: NewsInput,
    ) -> Result<Option<NewsItem>, RepositoryError> {
        let image_url = input.normalized_image_url();
        let query = format!(
            "UPDATE news SET title = $2, summary = $3, content = $4, author = $5, category = $6, \
             image_url = $7, updated_at = NOW() WHERE id = $1 RETURNING {NEWS_COLUMNS}"
        );
        let item = sqlx::query_as::<_, NewsItem>(&query)
            .bind(id)
            .bind(input.title)
            .bind(input.summary)
            .bind(input.content)
            .bind(input.author)
            .bind(input.category)
            .bind(image_url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn delete_news(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.delete_from("news", id).await
    }

    async fn list_jobs(&self, limit: Option<i64>) -> Vec<JobPosting> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY published_at DESC LIMIT $1");
        sqlx::query_as::<_, JobPosting>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_jobs error: {:?}", e);
                vec![]
            })
    }

    async fn get_job(&self, id: Uuid) -> Option<JobPosting> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_job error: {:?}", e);
                None
            })
    }

    async fn create_job(&self, input: JobInput) -> Result<JobPosting, RepositoryError> {
        let query = format!(
            "INSERT INTO jobs (id, title, department, location, description, requirements, salary, type, deadline, contact_email, contact_phone, published_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW()) RETURNING {JOB_COLUMNS}"
        );
        let job = sqlx::query_as::<_, JobPosting>(&query)
            .bind(Uuid::new_v4())
            .bind(input.title)
            .bind(input.department)
            .bind(input.location)
            .bind(input.description)
            .bind(input.requirements)
            .bind(input.salary)
            .bind(input.job_type)
            .bind(input.deadline)
            .bind(input.contact_email)
            .bind(input.contact_phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(job)
    }

    async fn update_job(
        &self,
        id: Uuid,
        input: JobInput,
    ) -> Result<Option<JobPosting>, RepositoryError> {
        let query = format!(
            "UPDATE jobs SET title = $2, department = $3, location = $4, description = $5, \
             requirements = $6, salary = $7, type = $8, deadline = $9, contact_email = $10, \
             contact_phone = $11, updated_at = NOW() WHERE id = $1 RETURNING {JOB_COLUMNS}"
        );
        let job = sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .bind(input.title)
            .bind(input.department)
            .bind(input.location)
            .bind(input.description)
            .bind(input.requirements)
            .bind(input.salary)
            .bind(input.job_type)
            .bind(input.deadline)
            .bind(input.contact_email)
            .bind(input.contact_phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.delete_from("jobs", id).await
    }

    /// get_profile
    ///
    /// Role lookup for the guard. Errors are logged and reported as "no profile".
    async fn get_profile(&self, id: Uuid) -> Option<Profile> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_profile error: {:?}", e);
                None
            })
    }

    async fn list_profiles(&self) -> Vec<Profile> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY role DESC, name ASC");
        sqlx::query_as::<_, Profile>(&query)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_profiles error: {:?}", e);
                vec![]
            })
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, RepositoryError> {
        let query = format!(
            "INSERT INTO profiles (id, name, role, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) RETURNING {PROFILE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Profile>(&query)
            .bind(profile.id)
            .bind(profile.name)
            .bind(profile.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<Option<Profile>, RepositoryError> {
        let query = format!(
            "UPDATE profiles SET name = COALESCE($2, name), role = COALESCE($3, role), updated_at = NOW() \
             WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(req.name)
            .bind(req.role)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn log_admin_action(&self, action: AdminAction) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO admin_actions (user_id, action_type, entity_type, entity_id, details, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW())",
        )
        .bind(action.user_id)
        .bind(action.action_type)
        .bind(action.entity_type)
        .bind(action.entity_id)
        .bind(action.details)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// get_stats
    ///
    /// Dashboard counters in one call.
    async fn get_stats(&self) -> AdminDashboardStats {
        AdminDashboardStats {
            total_services: self.count("services").await,
            total_news: self.count("news").await,
            total_jobs: self.count("jobs").await,
            total_users: self.count("profiles").await,
        }
    }
}

// --- In-memory implementation ---

#[derive(Default)]
struct Tables {
    services: Vec<Service>,
    news: Vec<NewsItem>,
    jobs: Vec<JobPosting>,
    profiles: Vec<Profile>,
    admin_actions: Vec<AdminAction>,
}

/// InMemoryRepository
///
/// `Repository` held in process memory. Used by the test suites and for
/// running the API without a database.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
    /// When true, the store behaves like an unreachable database: writes
    /// return `Err`, reads degrade to empty or `None`.
    pub should_fail: bool,
    /// When true, only `log_admin_action` fails.
    pub fail_audit: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Content and profile writes succeed but every audit append fails.
    pub fn new_with_failing_audit() -> Self {
        Self {
            fail_audit: true,
            ..Self::default()
        }
    }

    /// Inserts (or replaces) a profile row with an arbitrary role string.
    pub async fn seed_profile(&self, id: Uuid, name: &str, role: &str) -> Profile {
        let now = Utc::now();
        let profile = Profile {
            id,
            name: name.to_string(),
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        };
        let mut tables = self.tables.write().await;
        tables.profiles.retain(|p| p.id != id);
        tables.profiles.push(profile.clone());
        profile
    }

    pub async fn seed_service(&self, service: Service) {
        self.tables.write().await.services.push(service);
    }

    pub async fn seed_news(&self, item: NewsItem) {
        self.tables.write().await.news.push(item);
    }

    pub async fn seed_job(&self, job: JobPosting) {
        self.tables.write().await.jobs.push(job);
    }

    pub async fn admin_actions(&self) -> Vec<AdminAction> {
        self.tables.read().await.admin_actions.clone()
    }

    /// Read access, or `None` after logging when the store is failing.
    async fn read(&self, what: &str) -> Option<RwLockReadGuard<'_, Tables>> {
        if self.should_fail {
            tracing::error!("failed to read {}: in-memory store configured to fail", what);
            return None;
        }
        Some(self.tables.read().await)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.should_fail {
            return Err(RepositoryError::Unavailable(
                "in-memory store configured to fail".to_string(),
            ));
        }
        Ok(())
    }
}

fn take_limit<T>(items: Vec<T>, limit: Option<i64>) -> Vec<T> {
    match limit {
        Some(n) => items.into_iter().take(n.max(0) as usize).collect(),
        None => items,
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_services(&self) -> Vec<Service> {
        let Some(tables) = self.read("services").await else {
            return vec![];
        };
        let mut services = tables.services.clone();
        services.sort_by(|a, b| a.title.cmp(&b.title));
        services
    }

    async fn popular_services(&self, limit: i64) -> Vec<Service> {
        let Some(tables) = self.read("services").await else {
            return vec![];
        };
        let mut services = tables.services.clone();
        services.sort_by(|a, b| b.views.cmp(&a.views));
        take_limit(services, Some(limit))
    }

    async fn get_service(&self, id: Uuid) -> Option<Service> {
        let tables = self.read("service").await?;
        tables.services.iter().find(|s| s.id == id).cloned()
    }

    async fn create_service(&self, input: ServiceInput) -> Result<Service, RepositoryError> {
        self.check()?;
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            duration: input.duration,
            requirements: input.requirements,
            procedure: input.procedure,
            department: input.department,
            cost: input.cost,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.services.push(service.clone());
        Ok(service)
    }

    async fn update_service(
        &self,
        id: Uuid,
        input: ServiceInput,
    ) -> Result<Option<Service>, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let Some(service) = tables.services.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        service.title = input.title;
        service.description = input.description;
        service.duration = input.duration;
        service.requirements = input.requirements;
        service.procedure = input.procedure;
        service.department = input.department;
        service.cost = input.cost;
        service.updated_at = Utc::now();
        Ok(Some(service.clone()))
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let before = tables.services.len();
        tables.services.retain(|s| s.id != id);
        Ok(tables.services.len() < before)
    }

    async fn list_news(&self, limit: Option<i64>) -> Vec<NewsItem> {
        let Some(tables) = self.read("news").await else {
            return vec![];
        };
        let mut news = tables.news.clone();
        news.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        take_limit(news, limit)
    }

    async fn get_news(&self, id: Uuid) -> Option<NewsItem> {
        let tables = self.read("news item").await?;
        tables.news.iter().find(|n| n.id == id).cloned()
    }

    async fn create_news(&self, input: NewsInput) -> Result<NewsItem, RepositoryError> {
        self.check()?;
        let now = Utc::now();
        let item = NewsItem {
            id: Uuid::new_v4(),
            image_url: input.normalized_image_url(),
            title: input.title,
            summary: input.summary,
            content: input.content,
            author: input.author,
            category: input.category,
            published_at: now,
            updated_at: now,
        };
        self.tables.write().await.news.push(item.clone());
        Ok(item)
    }

    async fn update_news(
        &self,
        id: Uuid,
        input: NewsInput,
    ) -> Result<Option<NewsItem>, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let Some(item) = tables.news.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        item.image_url = input.normalized_image_url();
        item.title = input.title;
        item.summary = input.summary;
        item.content = input.content;
        item.author = input.author;
        item.category = input.category;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_news(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let before = tables.news.len();
        tables.news.retain(|n| n.id != id);
        Ok(tables.news.len() < before)
    }

    async fn list_jobs(&self, limit: Option<i64>) -> Vec<JobPosting> {
        let Some(tables) = self.read("jobs").await else {
            return vec![];
        };
        let mut jobs = tables.jobs.clone();
        jobs.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        take_limit(jobs, limit)
    }

    async fn get_job(&self, id: Uuid) -> Option<JobPosting> {
        let tables = self.read("job").await?;
        tables.jobs.iter().find(|j| j.id == id).cloned()
    }

    async fn create_job(&self, input: JobInput) -> Result<JobPosting, RepositoryError> {
        self.check()?;
        let now = Utc::now();
        let job = JobPosting {
            id: Uuid::new_v4(),
            title: input.title,
            department: input.department,
            location: input.location,
            description: input.description,
            requirements: input.requirements,
            salary: input.salary,
            job_type: input.job_type,
            deadline: input.deadline,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            published_at: now,
            updated_at: now,
        };
        self.tables.write().await.jobs.push(job.clone());
        Ok(job)
    }

    async fn update_job(
        &self,
        id: Uuid,
        input: JobInput,
    ) -> Result<Option<JobPosting>, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let Some(job) = tables.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        job.title = input.title;
        job.department = input.department;
        job.location = input.location;
        job.description = input.description;
        job.requirements = input.requirements;
        job.salary = input.salary;
        job.job_type = input.job_type;
        job.deadline = input.deadline;
        job.contact_email = input.contact_email;
        job.contact_phone = input.contact_phone;
        job.updated_at = Utc::now();
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        Ok(tables.jobs.len() < before)
    }

    async fn get_profile(&self, id: Uuid) -> Option<Profile> {
        let tables = self.read("profile").await?;
        tables.profiles.iter().find(|p| p.id == id).cloned()
    }

    async fn list_profiles(&self) -> Vec<Profile> {
        let Some(tables) = self.read("profiles").await else {
            return vec![];
        };
        let mut profiles = tables.profiles.clone();
        profiles.sort_by(|a, b| b.role.cmp(&a.role).then_with(|| a.name.cmp(&b.name)));
        profiles
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, RepositoryError> {
        self.check()?;
        Ok(self
            .seed_profile(profile.id, &profile.name, &profile.role)
            .await)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateUserRequest,
    ) -> Result<Option<Profile>, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let Some(profile) = tables.profiles.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = req.name {
            profile.name = name;
        }
        if let Some(role) = req.role {
            profile.role = role;
        }
        profile.updated_at = Utc::now();
        Ok(Some(profile.clone()))
    }

    async fn log_admin_action(&self, action: AdminAction) -> Result<(), RepositoryError> {
        self.check()?;
        if self.fail_audit {
            return Err(RepositoryError::Unavailable(
                "audit log configured to fail".to_string(),
            ));
        }
        self.tables.write().await.admin_actions.push(action);
        Ok(())
    }

    async fn get_stats(&self) -> AdminDashboardStats {
        let Some(tables) = self.read("stats").await else {
            return AdminDashboardStats::default();
        };
        AdminDashboardStats {
            total_services: tables.services.len() as i64,
            total_news: tables.news.len() as i64,
            total_jobs: tables.jobs.len() as i64,
            total_users: tables.profiles.len() as i64,
        }
    }
}

//! SQLite storage for the marketplace
//!
//! Ids are UUID strings, timestamps are RFC 3339 text, list-valued fields are
//! JSON text columns. The `UNIQUE(user_id, opportunity_id)` index on
//! applications closes the duplicate-application race window at the store
//! level; the pre-check in `insert_application` exists only to produce the
//! friendlier conflict signal without relying on driver error details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use tracing::{debug, error, info};
use uuid::Uuid;
use voluntree_core::{
    Application, ApplicationDetail, ApplicationStatus, HostOrganization, Opportunity,
    OpportunityListing, OpportunityStatus, Profile, VoluntreeError, VoluntreeResult,
};

/// Credentials row; display data lives in `profiles`.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Profile fields a user may update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub bio: Option<String>,
}

/// Host organization fields for create and full-replace update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationInput {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<String>,
    pub cover_image: Option<String>,
}

/// Opportunity fields for create and full-replace update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityInput {
    pub title: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub applicant_types: Vec<String>,
    pub min_duration_weeks: Option<i64>,
    pub max_duration_weeks: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub status: Option<OpportunityStatus>,
}

/// Shared database service
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run table creation.
    pub async fn connect(database_url: &str) -> VoluntreeResult<Self> {
        info!("Connecting to database: {}", database_url);

        // In-memory SQLite gives every pooled connection its own database;
        // pin the pool to a single connection so tables survive checkout.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(database_url)
                .await
        } else {
            SqlitePool::connect(database_url).await
        }
        .map_err(|e| {
            error!("Database connection failed: {}", e);
            VoluntreeError::Database(format!("Failed to connect to database: {}", e))
        })?;

        Self::create_tables(&pool).await?;
        info!("Database ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_tables(pool: &SqlitePool) -> VoluntreeResult<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                user_id TEXT UNIQUE NOT NULL REFERENCES users(id),
                full_name TEXT,
                phone TEXT,
                country TEXT,
                bio TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS host_organizations (
                id TEXT PRIMARY KEY,
                user_id TEXT UNIQUE NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                description TEXT,
                location TEXT,
                country TEXT,
                website TEXT,
                phone TEXT,
                logo TEXT,
                cover_image TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS opportunities (
                id TEXT PRIMARY KEY,
                host_organization_id TEXT NOT NULL REFERENCES host_organizations(id),
                title TEXT NOT NULL,
                description TEXT,
                theme TEXT,
                location TEXT,
                country TEXT,
                applicant_types TEXT NOT NULL DEFAULT '[]',
                min_duration_weeks INTEGER,
                max_duration_weeks INTEGER,
                images TEXT NOT NULL DEFAULT '[]',
                requirements TEXT NOT NULL DEFAULT '[]',
                benefits TEXT NOT NULL DEFAULT '[]',
                status TEXT NOT NULL DEFAULT 'active',
                featured INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS applications (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                opportunity_id TEXT NOT NULL REFERENCES opportunities(id),
                status TEXT NOT NULL DEFAULT 'pending',
                details TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(user_id, opportunity_id)
            );

            CREATE INDEX IF NOT EXISTS idx_opportunities_org
                ON opportunities(host_organization_id);
            CREATE INDEX IF NOT EXISTS idx_applications_opportunity
                ON applications(opportunity_id);
        "#;

        sqlx::query(query).execute(pool).await.map_err(|e| {
            error!("Failed to create tables: {}", e);
            VoluntreeError::database(e)
        })?;

        Ok(())
    }

    // ----- users -----

    pub async fn insert_user(&self, email: &str, password_hash: &str) -> VoluntreeResult<UserRecord> {
        if self.user_by_email(email).await?.is_some() {
            return Err(VoluntreeError::EmailTaken);
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(email)
        .bind(password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                VoluntreeError::EmailTaken
            } else {
                error!("Failed to insert user: {}", e);
                VoluntreeError::database(e)
            }
        })?;

        debug!("User inserted: {}", id);

        Ok(UserRecord {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    pub async fn user_by_email(&self, email: &str) -> VoluntreeResult<Option<UserRecord>> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to query user by email: {}", e);
                VoluntreeError::database(e)
            })?;

        row.map(|row| {
            Ok(UserRecord {
                id: row.get("id"),
                email: row.get("email"),
                password_hash: row.get("password_hash"),
                created_at: parse_ts(&row.get::<String, _>("created_at"))?,
            })
        })
        .transpose()
    }

    // ----- profiles -----

    /// Create the profile row at signup, or update just the display name.
    pub async fn upsert_profile_name(
        &self,
        user_id: &str,
        full_name: Option<&str>,
    ) -> VoluntreeResult<()> {
        self.upsert_profile(
            user_id,
            ProfileUpdate {
                full_name: full_name.map(str::to_string),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn upsert_profile(&self, user_id: &str, update: ProfileUpdate) -> VoluntreeResult<()> {
        let now = Utc::now().to_rfc3339();

        let existing = sqlx::query("SELECT id FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(VoluntreeError::database)?;

        if existing.is_some() {
            sqlx::query(
                "UPDATE profiles
                 SET full_name = ?, phone = ?, country = ?, bio = ?, updated_at = ?
                 WHERE user_id = ?",
            )
            .bind(&update.full_name)
            .bind(&update.phone)
            .bind(&update.country)
            .bind(&update.bio)
            .bind(&now)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to update profile: {}", e);
                VoluntreeError::database(e)
            })?;
        } else {
            sqlx::query(
                "INSERT INTO profiles (id, user_id, full_name, phone, country, bio, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(&update.full_name)
            .bind(&update.phone)
            .bind(&update.country)
            .bind(&update.bio)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to insert profile: {}", e);
                VoluntreeError::database(e)
            })?;
        }

        Ok(())
    }

    pub async fn profile_for_user(&self, user_id: &str) -> VoluntreeResult<Option<Profile>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(VoluntreeError::database)?;

        row.map(|row| {
            Ok(Profile {
                id: row.get("id"),
                user_id: row.get("user_id"),
                full_name: row.get("full_name"),
                phone: row.get("phone"),
                country: row.get("country"),
                bio: row.get("bio"),
                created_at: parse_ts(&row.get::<String, _>("created_at"))?,
                updated_at: parse_ts(&row.get::<String, _>("updated_at"))?,
            })
        })
        .transpose()
    }

    // ----- host organizations -----

    /// Create the caller's organization. Fails if one already exists for this
    /// user; the unique index backs the pre-check under races.
    pub async fn insert_organization(
        &self,
        user_id: &str,
        input: OrganizationInput,
    ) -> VoluntreeResult<HostOrganization> {
        if self.organization_id_for_user(user_id).await?.is_some() {
            return Err(VoluntreeError::OrganizationExists);
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO host_organizations
                 (id, user_id, name, description, location, country, website, phone,
                  logo, cover_image, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.country)
        .bind(&input.website)
        .bind(&input.phone)
        .bind(&input.logo)
        .bind(&input.cover_image)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                VoluntreeError::OrganizationExists
            } else {
                error!("Failed to insert organization: {}", e);
                VoluntreeError::database(e)
            }
        })?;

        info!("Organization created: {} (owner {})", id, user_id);

        Ok(HostOrganization {
            id,
            user_id: user_id.to_string(),
            name: input.name,
            description: input.description,
            location: input.location,
            country: input.country,
            website: input.website,
            phone: input.phone,
            logo: input.logo,
            cover_image: input.cover_image,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn organization_for_user(
        &self,
        user_id: &str,
    ) -> VoluntreeResult<Option<HostOrganization>> {
        let row = sqlx::query("SELECT * FROM host_organizations WHERE user_id = ? LIMIT 1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(VoluntreeError::database)?;

        row.map(|row| row_to_organization(&row)).transpose()
    }

    /// Ownership-chain lookup: the organization this actor administers.
    pub async fn organization_id_for_user(&self, user_id: &str) -> VoluntreeResult<Option<String>> {
        let row = sqlx::query("SELECT id FROM host_organizations WHERE user_id = ? LIMIT 1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(VoluntreeError::database)?;

        Ok(row.map(|row| row.get("id")))
    }

    pub async fn update_organization(
        &self,
        user_id: &str,
        input: OrganizationInput,
    ) -> VoluntreeResult<Option<HostOrganization>> {
        let result = sqlx::query(
            "UPDATE host_organizations
             SET name = ?, description = ?, location = ?, country = ?, website = ?,
                 phone = ?, logo = ?, cover_image = ?, updated_at = ?
             WHERE user_id = ?",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.country)
        .bind(&input.website)
        .bind(&input.phone)
        .bind(&input.logo)
        .bind(&input.cover_image)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to update organization: {}", e);
            VoluntreeError::database(e)
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.organization_for_user(user_id).await
    }

    // ----- opportunities -----

    pub async fn insert_opportunity(
        &self,
        organization_id: &str,
        input: OpportunityInput,
    ) -> VoluntreeResult<Opportunity> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let status = input.status.unwrap_or(OpportunityStatus::Active);

        sqlx::query(
            "INSERT INTO opportunities
                 (id, host_organization_id, title, description, theme, location, country,
                  applicant_types, min_duration_weeks, max_duration_weeks, images,
                  requirements, benefits, status, featured, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&id)
        .bind(organization_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.theme)
        .bind(&input.location)
        .bind(&input.country)
        .bind(to_json_list(&input.applicant_types))
        .bind(input.min_duration_weeks)
        .bind(input.max_duration_weeks)
        .bind(to_json_list(&input.images))
        .bind(to_json_list(&input.requirements))
        .bind(to_json_list(&input.benefits))
        .bind(status.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert opportunity: {}", e);
            VoluntreeError::database(e)
        })?;

        info!("Opportunity created: {} (org {})", id, organization_id);

        self.opportunity_by_id(&id)
            .await?
            .ok_or_else(|| VoluntreeError::not_found("Opportunity"))
    }

    /// Public browse: active opportunities joined with their host summary.
    pub async fn list_active_opportunities(&self) -> VoluntreeResult<Vec<OpportunityListing>> {
        let rows = sqlx::query(
            "SELECT o.*, h.name AS host_name, h.location AS host_location, h.logo AS host_logo
             FROM opportunities o
             JOIN host_organizations h ON o.host_organization_id = h.id
             WHERE o.status = 'active'
             ORDER BY o.featured DESC, o.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(VoluntreeError::database)?;

        rows.iter().map(row_to_listing).collect()
    }

    pub async fn list_opportunities_for_organization(
        &self,
        organization_id: &str,
    ) -> VoluntreeResult<Vec<Opportunity>> {
        let rows = sqlx::query(
            "SELECT * FROM opportunities
             WHERE host_organization_id = ?
             ORDER BY created_at DESC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(VoluntreeError::database)?;

        rows.iter().map(row_to_opportunity).collect()
    }

    pub async fn opportunity(&self, id: &str) -> VoluntreeResult<Option<OpportunityListing>> {
        let row = sqlx::query(
            "SELECT o.*, h.name AS host_name, h.location AS host_location, h.logo AS host_logo
             FROM opportunities o
             JOIN host_organizations h ON o.host_organization_id = h.id
             WHERE o.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(VoluntreeError::database)?;

        row.map(|row| row_to_listing(&row)).transpose()
    }

    async fn opportunity_by_id(&self, id: &str) -> VoluntreeResult<Option<Opportunity>> {
        let row = sqlx::query("SELECT * FROM opportunities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(VoluntreeError::database)?;

        row.map(|row| row_to_opportunity(&row)).transpose()
    }

    /// Ownership-chain lookup: the organization that owns this opportunity.
    pub async fn organization_id_for_opportunity(
        &self,
        opportunity_id: &str,
    ) -> VoluntreeResult<Option<String>> {
        let row = sqlx::query("SELECT host_organization_id FROM opportunities WHERE id = ?")
            .bind(opportunity_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(VoluntreeError::database)?;

        Ok(row.map(|row| row.get("host_organization_id")))
    }

    /// Full-replace update, scoped to the owning organization.
    pub async fn update_opportunity(
        &self,
        id: &str,
        organization_id: &str,
        input: OpportunityInput,
    ) -> VoluntreeResult<Option<Opportunity>> {
        let status = input.status.unwrap_or(OpportunityStatus::Active);

        let result = sqlx::query(
            "UPDATE opportunities
             SET title = ?, description = ?, theme = ?, location = ?, country = ?,
                 applicant_types = ?, min_duration_weeks = ?, max_duration_weeks = ?,
                 images = ?, requirements = ?, benefits = ?, status = ?, updated_at = ?
             WHERE id = ? AND host_organization_id = ?",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.theme)
        .bind(&input.location)
        .bind(&input.country)
        .bind(to_json_list(&input.applicant_types))
        .bind(input.min_duration_weeks)
        .bind(input.max_duration_weeks)
        .bind(to_json_list(&input.images))
        .bind(to_json_list(&input.requirements))
        .bind(to_json_list(&input.benefits))
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(organization_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to update opportunity: {}", e);
            VoluntreeError::database(e)
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.opportunity_by_id(id).await
    }

    pub async fn delete_opportunity(&self, id: &str, organization_id: &str) -> VoluntreeResult<bool> {
        let result =
            sqlx::query("DELETE FROM opportunities WHERE id = ? AND host_organization_id = ?")
                .bind(id)
                .bind(organization_id)
                .execute(&self.pool)
                .await
                .map_err(VoluntreeError::database)?;

        Ok(result.rows_affected() > 0)
    }

    // ----- applications -----

    /// Submit an application. One application per (user, opportunity) pair.
    pub async fn insert_application(
        &self,
        user_id: &str,
        opportunity_id: &str,
        details: &serde_json::Value,
    ) -> VoluntreeResult<Application> {
        let existing = sqlx::query(
            "SELECT id FROM applications WHERE user_id = ? AND opportunity_id = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(opportunity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(VoluntreeError::database)?;

        if existing.is_some() {
            return Err(VoluntreeError::DuplicateApplication);
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let details_json =
            serde_json::to_string(details).map_err(|e| VoluntreeError::database(e))?;

        sqlx::query(
            "INSERT INTO applications
                 (id, user_id, opportunity_id, status, details, created_at, updated_at)
             VALUES (?, ?, ?, 'pending', ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(opportunity_id)
        .bind(&details_json)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                VoluntreeError::DuplicateApplication
            } else {
                error!("Failed to insert application: {}", e);
                VoluntreeError::database(e)
            }
        })?;

        info!("Application created: {} (user {})", id, user_id);

        Ok(Application {
            id,
            user_id: user_id.to_string(),
            opportunity_id: opportunity_id.to_string(),
            status: ApplicationStatus::Pending,
            details: details.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn applications_for_user(&self, user_id: &str) -> VoluntreeResult<Vec<Application>> {
        let rows = sqlx::query(
            "SELECT * FROM applications WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(VoluntreeError::database)?;

        rows.iter().map(row_to_application).collect()
    }

    /// Fetch one application with review context (opportunity summary,
    /// applicant email and profile name).
    pub async fn application_detail(&self, id: &str) -> VoluntreeResult<Option<ApplicationDetail>> {
        let row = sqlx::query(
            "SELECT a.*,
                    o.title AS opportunity_title,
                    o.location AS opportunity_location,
                    o.theme AS opportunity_theme,
                    u.email AS applicant_email,
                    p.full_name AS applicant_name
             FROM applications a
             JOIN opportunities o ON a.opportunity_id = o.id
             JOIN users u ON a.user_id = u.id
             LEFT JOIN profiles p ON a.user_id = p.user_id
             WHERE a.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(VoluntreeError::database)?;

        row.map(|row| {
            Ok(ApplicationDetail {
                application: row_to_application(&row)?,
                opportunity_title: row.get("opportunity_title"),
                opportunity_location: row.get("opportunity_location"),
                opportunity_theme: row.get("opportunity_theme"),
                applicant_email: row.get("applicant_email"),
                applicant_name: row.get("applicant_name"),
            })
        })
        .transpose()
    }

    /// Ownership-chain lookup for applications: the applicant and the
    /// organization owning the target opportunity, in one join.
    pub async fn application_refs(&self, id: &str) -> VoluntreeResult<Option<(String, String)>> {
        let row = sqlx::query(
            "SELECT a.user_id, o.host_organization_id
             FROM applications a
             JOIN opportunities o ON a.opportunity_id = o.id
             WHERE a.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(VoluntreeError::database)?;

        Ok(row.map(|row| (row.get("user_id"), row.get("host_organization_id"))))
    }

    pub async fn update_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> VoluntreeResult<Option<Application>> {
        let result = sqlx::query("UPDATE applications SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to update application status: {}", e);
                VoluntreeError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(VoluntreeError::database)?;

        row.map(|row| row_to_application(&row)).transpose()
    }
}

// ----- row mapping -----

fn row_to_organization(row: &sqlx::sqlite::SqliteRow) -> VoluntreeResult<HostOrganization> {
    Ok(HostOrganization {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        location: row.get("location"),
        country: row.get("country"),
        website: row.get("website"),
        phone: row.get("phone"),
        logo: row.get("logo"),
        cover_image: row.get("cover_image"),
        created_at: parse_ts(&row.get::<String, _>("created_at"))?,
        updated_at: parse_ts(&row.get::<String, _>("updated_at"))?,
    })
}

fn row_to_opportunity(row: &sqlx::sqlite::SqliteRow) -> VoluntreeResult<Opportunity> {
    Ok(Opportunity {
        id: row.get("id"),
        host_organization_id: row.get("host_organization_id"),
        title: row.get("title"),
        description: row.get("description"),
        theme: row.get("theme"),
        location: row.get("location"),
        country: row.get("country"),
        applicant_types: from_json_list(&row.get::<String, _>("applicant_types")),
        min_duration_weeks: row.get("min_duration_weeks"),
        max_duration_weeks: row.get("max_duration_weeks"),
        images: from_json_list(&row.get::<String, _>("images")),
        requirements: from_json_list(&row.get::<String, _>("requirements")),
        benefits: from_json_list(&row.get::<String, _>("benefits")),
        status: row.get::<String, _>("status").parse()?,
        featured: row.get::<i64, _>("featured") != 0,
        created_at: parse_ts(&row.get::<String, _>("created_at"))?,
        updated_at: parse_ts(&row.get::<String, _>("updated_at"))?,
    })
}

fn row_to_listing(row: &sqlx::sqlite::SqliteRow) -> VoluntreeResult<OpportunityListing> {
    Ok(OpportunityListing {
        opportunity: row_to_opportunity(row)?,
        host_name: row.get("host_name"),
        host_location: row.get("host_location"),
        host_logo: row.get("host_logo"),
    })
}

fn row_to_application(row: &sqlx::sqlite::SqliteRow) -> VoluntreeResult<Application> {
    Ok(Application {
        id: row.get("id"),
        user_id: row.get("user_id"),
        opportunity_id: row.get("opportunity_id"),
        status: row.get::<String, _>("status").parse()?,
        details: serde_json::from_str(&row.get::<String, _>("details"))
            .unwrap_or(serde_json::Value::Null),
        created_at: parse_ts(&row.get::<String, _>("created_at"))?,
        updated_at: parse_ts(&row.get::<String, _>("updated_at"))?,
    })
}

fn parse_ts(s: &str) -> VoluntreeResult<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>()
        .map_err(|e| VoluntreeError::Database(format!("invalid timestamp '{}': {}", s, e)))
}

fn to_json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn from_json_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

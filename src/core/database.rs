// src/core/database.rs
//! Sqlite persistence for candidate profiles and vacancies

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use uuid::Uuid;

use crate::app_log;
use crate::core::FsOps;
use crate::types::{CandidateProfile, ProfileUpdate, Vacancy};

// ===== Core Database Connection Management =====

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create new database connection with automatic setup
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        app_log!(
            info,
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Private in-memory database on a single connection
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;
        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes when missing
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY NOT NULL,
                first_name TEXT NOT NULL
                    CHECK (trim(first_name) <> '' AND length(first_name) <= 50),
                last_name TEXT NOT NULL
                    CHECK (trim(last_name) <> '' AND length(last_name) <= 50),
                sex TEXT NOT NULL CHECK (sex IN ('male', 'female')),
                birth_date TEXT NOT NULL,
                current_position TEXT NOT NULL CHECK (trim(current_position) <> ''),
                education TEXT,
                experience_years INTEGER NOT NULL DEFAULT 0
                    CHECK (experience_years BETWEEN 0 AND 80),
                experience_months INTEGER NOT NULL DEFAULT 0
                    CHECK (experience_months BETWEEN 0 AND 11),
                experience_total_months INTEGER
                    GENERATED ALWAYS AS (experience_years * 12 + experience_months) STORED,
                experience_description TEXT,
                hard_skills TEXT NOT NULL DEFAULT '[]',
                career_expectations TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create users table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vacancies (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL CHECK (trim(name) <> ''),
                description TEXT NOT NULL,
                min_exp_months INTEGER CHECK (min_exp_months IS NULL OR min_exp_months BETWEEN 0 AND 960),
                max_exp_months INTEGER CHECK (max_exp_months IS NULL OR max_exp_months BETWEEN 0 AND 960),
                must_have TEXT NOT NULL DEFAULT '[]',
                nice_to_have TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CONSTRAINT vacancy_min_max_check CHECK (
                    min_exp_months IS NULL OR max_exp_months IS NULL
                    OR min_exp_months <= max_exp_months
                )
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create vacancies table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_last_name ON users(last_name);")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_vacancies_created_at ON vacancies(created_at);",
        )
        .execute(&self.pool)
        .await?;

        app_log!(info, "Database schema ready");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

fn skills_to_json(skills: &[String]) -> Result<String> {
    serde_json::to_string(skills).context("Failed to encode skill list")
}

fn skills_from_json(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("Malformed skill list: {}", raw))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("Malformed record id: {}", raw))
}

// ===== Users =====

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    sex: String,
    birth_date: NaiveDate,
    current_position: String,
    education: Option<String>,
    experience_years: i64,
    experience_months: i64,
    experience_total_months: Option<i64>,
    experience_description: Option<String>,
    hard_skills: String,
    career_expectations: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for CandidateProfile {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            first_name: row.first_name,
            last_name: row.last_name,
            sex: row.sex.parse()?,
            birth_date: row.birth_date,
            current_position: row.current_position,
            education: row.education,
            experience_years: i32::try_from(row.experience_years)
                .context("experience_years out of range")?,
            experience_months: i32::try_from(row.experience_months)
                .context("experience_months out of range")?,
            experience_total_months: row.experience_total_months,
            experience_description: row.experience_description,
            hard_skills: skills_from_json(&row.hard_skills)?,
            career_expectations: row.career_expectations,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str = "id, first_name, last_name, sex, birth_date, current_position, \
     education, experience_years, experience_months, experience_total_months, \
     experience_description, hard_skills, career_expectations, created_at, updated_at";

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, profile: &CandidateProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, sex, birth_date, current_position,
                education, experience_years, experience_months,
                experience_description, hard_skills, career_expectations,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(profile.id.to_string())
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.sex.as_str())
        .bind(profile.birth_date)
        .bind(&profile.current_position)
        .bind(&profile.education)
        .bind(profile.experience_years)
        .bind(profile.experience_months)
        .bind(&profile.experience_description)
        .bind(skills_to_json(&profile.hard_skills)?)
        .bind(&profile.career_expectations)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert user {}", profile.id))?;

        app_log!(info, "Created user {} ({})", profile.id, profile.full_name());
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<CandidateProfile>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .with_context(|| format!("Failed to load user {}", id))?;

        row.map(CandidateProfile::try_from).transpose()
    }

    /// Writes only the provided fields. Returns the updated record, or `None`
    /// when the user does not exist.
    pub async fn update_info(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<CandidateProfile>> {
        let hard_skills = update
            .hard_skills
            .as_deref()
            .map(skills_to_json)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                current_position = COALESCE(?, current_position),
                education = COALESCE(?, education),
                experience_years = COALESCE(?, experience_years),
                experience_months = COALESCE(?, experience_months),
                experience_description = COALESCE(?, experience_description),
                hard_skills = COALESCE(?, hard_skills),
                career_expectations = COALESCE(?, career_expectations),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.current_position)
        .bind(&update.education)
        .bind(update.experience_years)
        .bind(update.experience_months)
        .bind(&update.experience_description)
        .bind(hard_skills)
        .bind(&update.career_expectations)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to update user {}", id))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        app_log!(info, "Updated user {}", id);
        self.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<CandidateProfile>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY last_name ASC, first_name ASC",
            USER_COLUMNS
        ))
        .fetch_all(self.pool)
        .await
        .context("Failed to list users")?;

        rows.into_iter().map(CandidateProfile::try_from).collect()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .with_context(|| format!("Failed to delete user {}", id))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            app_log!(info, "Deleted user {}", id);
        }
        Ok(deleted)
    }
}

// ===== Vacancies =====

#[derive(Debug, sqlx::FromRow)]
struct VacancyRow {
    id: String,
    name: String,
    description: String,
    min_exp_months: Option<i64>,
    max_exp_months: Option<i64>,
    must_have: String,
    nice_to_have: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VacancyRow> for Vacancy {
    type Error = anyhow::Error;

    fn try_from(row: VacancyRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            name: row.name,
            description: row.description,
            min_exp_months: row.min_exp_months,
            max_exp_months: row.max_exp_months,
            must_have: skills_from_json(&row.must_have)?,
            nice_to_have: skills_from_json(&row.nice_to_have)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const VACANCY_COLUMNS: &str = "id, name, description, min_exp_months, max_exp_months, \
     must_have, nice_to_have, created_at, updated_at";

pub struct VacancyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VacancyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, vacancy: &Vacancy) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO vacancies (
                id, name, description, min_exp_months, max_exp_months,
                must_have, nice_to_have, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(vacancy.id.to_string())
        .bind(&vacancy.name)
        .bind(&vacancy.description)
        .bind(vacancy.min_exp_months)
        .bind(vacancy.max_exp_months)
        .bind(skills_to_json(&vacancy.must_have)?)
        .bind(skills_to_json(&vacancy.nice_to_have)?)
        .bind(vacancy.created_at)
        .bind(vacancy.updated_at)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert vacancy {}", vacancy.id))?;

        app_log!(info, "Created vacancy {} ({})", vacancy.id, vacancy.name);
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Vacancy>> {
        let row = sqlx::query_as::<_, VacancyRow>(&format!(
            "SELECT {} FROM vacancies WHERE id = ?",
            VACANCY_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .with_context(|| format!("Failed to load vacancy {}", id))?;

        row.map(Vacancy::try_from).transpose()
    }

    /// Newest first
    pub async fn list(&self) -> Result<Vec<Vacancy>> {
        let rows = sqlx::query_as::<_, VacancyRow>(&format!(
            "SELECT {} FROM vacancies ORDER BY created_at DESC, rowid DESC",
            VACANCY_COLUMNS
        ))
        .fetch_all(self.pool)
        .await
        .context("Failed to list vacancies")?;

        rows.into_iter().map(Vacancy::try_from).collect()
    }

    /// Returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vacancies WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .with_context(|| format!("Failed to delete vacancy {}", id))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            app_log!(info, "Deleted vacancy {}", id);
        }
        Ok(deleted)
    }
}

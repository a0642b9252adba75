// src/services/matching_service.rs
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_log;
use crate::core::{Database, UserRepository, VacancyRepository};
use crate::matcher::scorer::{Breakdown, MatchDetails};
use crate::matcher::{compute_match, MatchResult, MatcherConfig, SkillIndex};
use crate::types::{CandidateProfile, Vacancy};

/// A vacancy scored for one candidate
#[derive(Debug, Clone, Serialize)]
pub struct VacancyMatch {
    pub vacancy_id: Uuid,
    pub vacancy_name: String,
    pub total: f64,
    pub decision: bool,
    pub breakdown: Breakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<MatchDetails>,
}

/// A candidate scored for one vacancy
#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatch {
    pub user_id: Uuid,
    pub full_name: String,
    pub total: f64,
    pub decision: bool,
    pub breakdown: Breakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<MatchDetails>,
}

impl VacancyMatch {
    fn new(vacancy: &Vacancy, result: MatchResult, config: &MatcherConfig) -> Self {
        Self {
            vacancy_id: vacancy.id,
            vacancy_name: vacancy.name.clone(),
            total: result.total,
            decision: config.is_positive(result.total),
            breakdown: result.breakdown,
            details: Some(result.details),
        }
    }

    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }
}

impl CandidateMatch {
    fn new(profile: &CandidateProfile, result: MatchResult, config: &MatcherConfig) -> Self {
        Self {
            user_id: profile.id,
            full_name: profile.full_name(),
            total: result.total,
            decision: config.is_positive(result.total),
            breakdown: result.breakdown,
            details: Some(result.details),
        }
    }

    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }
}

/// Scores one candidate against every vacancy, best first
pub fn score_vacancies(
    profile: &CandidateProfile,
    vacancies: &[Vacancy],
    config: &MatcherConfig,
    index: &SkillIndex,
) -> Vec<VacancyMatch> {
    let mut matches: Vec<VacancyMatch> = vacancies
        .iter()
        .map(|vacancy| {
            let result = compute_match(profile, vacancy, config, index);
            VacancyMatch::new(vacancy, result, config)
        })
        .collect();
    matches.sort_by(|a, b| b.total.total_cmp(&a.total));
    matches
}

/// Scores every candidate against one vacancy, best first
pub fn score_candidates(
    profiles: &[CandidateProfile],
    vacancy: &Vacancy,
    config: &MatcherConfig,
    index: &SkillIndex,
) -> Vec<CandidateMatch> {
    let mut matches: Vec<CandidateMatch> = profiles
        .iter()
        .map(|profile| {
            let result = compute_match(profile, vacancy, config, index);
            CandidateMatch::new(profile, result, config)
        })
        .collect();
    matches.sort_by(|a, b| b.total.total_cmp(&a.total));
    matches
}

pub struct MatchingService<'a> {
    users: UserRepository<'a>,
    vacancies: VacancyRepository<'a>,
    config: Arc<MatcherConfig>,
    index: Arc<SkillIndex>,
}

impl<'a> MatchingService<'a> {
    pub fn new(db: &'a Database, config: Arc<MatcherConfig>, index: Arc<SkillIndex>) -> Self {
        Self {
            users: UserRepository::new(db.pool()),
            vacancies: VacancyRepository::new(db.pool()),
            config,
            index,
        }
    }

    async fn load_user(&self, user_id: Uuid) -> Result<CandidateProfile> {
        let profile = self
            .users
            .get(user_id)
            .await?
            .with_context(|| format!("User not found: {}", user_id))?;
        profile.validate(Utc::now().date_naive())?;
        Ok(profile)
    }

    async fn load_vacancy(&self, vacancy_id: Uuid) -> Result<Vacancy> {
        self.vacancies
            .get(vacancy_id)
            .await?
            .with_context(|| format!("Vacancy not found: {}", vacancy_id))
    }

    pub async fn match_user(&self, user_id: Uuid) -> Result<Vec<VacancyMatch>> {
        let profile = self.load_user(user_id).await?;
        let vacancies = self.vacancies.list().await?;
        app_log!(
            info,
            "Matching user {} against {} vacancies",
            user_id,
            vacancies.len()
        );

        let config = Arc::clone(&self.config);
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || score_vacancies(&profile, &vacancies, &config, &index))
            .await
            .context("Matching task failed")
    }

    pub async fn match_vacancy(&self, vacancy_id: Uuid) -> Result<Vec<CandidateMatch>> {
        let vacancy = self.load_vacancy(vacancy_id).await?;
        let today = Utc::now().date_naive();
        let profiles: Vec<CandidateProfile> = self
            .users
            .list()
            .await?
            .into_iter()
            .filter(|profile| match profile.validate(today) {
                Ok(()) => true,
                Err(e) => {
                    app_log!(warn, "Skipping invalid profile {}: {}", profile.id, e);
                    false
                }
            })
            .collect();
        app_log!(
            info,
            "Matching vacancy {} against {} candidates",
            vacancy_id,
            profiles.len()
        );

        let config = Arc::clone(&self.config);
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || score_candidates(&profiles, &vacancy, &config, &index))
            .await
            .context("Matching task failed")
    }

    /// Scores a single pair; the records are returned for further analysis
    pub async fn match_pair(
        &self,
        user_id: Uuid,
        vacancy_id: Uuid,
    ) -> Result<(CandidateProfile, Vacancy, MatchResult)> {
        let profile = self.load_user(user_id).await?;
        let vacancy = self.load_vacancy(vacancy_id).await?;
        let config = Arc::clone(&self.config);
        let index = Arc::clone(&self.index);
        tokio::task::spawn_blocking(move || {
            let result = compute_match(&profile, &vacancy, &config, &index);
            (profile, vacancy, result)
        })
        .await
        .context("Matching task failed")
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }
}

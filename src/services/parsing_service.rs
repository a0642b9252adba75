// src/services/parsing_service.rs
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_log;
use crate::core::{Database, ExtractionClient, VacancyRepository};
use crate::matcher::SkillIndex;
use crate::parsing::parse_vacancy_text;
use crate::types::{NewVacancy, Vacancy};
use crate::utils::preview;

pub struct ParsingService<'a> {
    vacancies: VacancyRepository<'a>,
    index: Arc<SkillIndex>,
}

impl<'a> ParsingService<'a> {
    pub fn new(db: &'a Database, index: Arc<SkillIndex>) -> Self {
        Self {
            vacancies: VacancyRepository::new(db.pool()),
            index,
        }
    }

    /// Extracts the document text, then stores the parsed vacancy
    pub async fn add_vacancy(
        &self,
        extractor: &ExtractionClient,
        content: Vec<u8>,
        file_name: &str,
        name: &str,
    ) -> Result<Vacancy> {
        let text = extractor
            .extract_text(content, file_name)
            .await
            .with_context(|| format!("Failed to extract text from {}", file_name))?;
        self.add_vacancy_from_text(name, text).await
    }

    pub async fn add_vacancy_from_text(&self, name: &str, text: String) -> Result<Vacancy> {
        if text.trim().is_empty() {
            anyhow::bail!("Vacancy text is empty");
        }
        app_log!(debug, "Parsing vacancy text: {}", preview(&text, 80));

        let parsed = parse_vacancy_text(&text, &self.index);
        app_log!(
            info,
            "Parsed vacancy '{}': years {:?}-{:?}, {} must-have, {} nice-to-have",
            name.trim(),
            parsed.years_min,
            parsed.years_max,
            parsed.must_have.len(),
            parsed.nice_to_have.len()
        );

        let new_vacancy = NewVacancy::from_parsed(name, text, parsed);
        new_vacancy.validate()?;

        let vacancy = new_vacancy.into_vacancy(Uuid::new_v4(), Utc::now());
        self.vacancies.insert(&vacancy).await?;
        Ok(vacancy)
    }

    pub async fn get(&self, id: Uuid) -> Result<Vacancy> {
        self.vacancies
            .get(id)
            .await?
            .with_context(|| format!("Vacancy not found: {}", id))
    }

    pub async fn list(&self) -> Result<Vec<Vacancy>> {
        self.vacancies.list().await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.vacancies.delete(id).await
    }
}

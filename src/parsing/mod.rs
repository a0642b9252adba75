// src/parsing/mod.rs
//! Turning extracted document text into structured vacancy data.

pub mod clean;
pub mod vacancy_text;

pub use clean::clean_text;
pub use vacancy_text::{extract_years, parse_vacancy_text, split_sections, Sections};

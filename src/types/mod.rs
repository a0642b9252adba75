// src/types/mod.rs
//! Records shared by persistence, services and the matcher.

pub mod profile;
pub mod response;
pub mod vacancy;
pub mod validation;

pub use profile::{CandidateProfile, NewProfile, ProfileUpdate, Sex};
pub use vacancy::{NewVacancy, ParsedVacancy, Vacancy};
pub use validation::ValidationError;

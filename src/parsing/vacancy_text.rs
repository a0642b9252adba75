// src/parsing/vacancy_text.rs
//! Heuristic extraction of experience bounds and skill lists from the plain
//! text of a job posting (English or Russian).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::matcher::fuzzy::{extract_one, weighted_ratio};
use crate::matcher::SkillIndex;
use crate::types::ParsedVacancy;

/// Lines scanned after a section heading.
const SECTION_SPAN: usize = 40;
/// Lines used as the must-have section when no heading is found.
const FALLBACK_LINES: usize = 60;
/// Lines up to this many words are treated as skill items even without a bullet.
const MAX_ITEM_WORDS: usize = 20;
pub const SKILL_MATCH_CUTOFF: f64 = 88.0;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("vacancy parser pattern is a valid regex")
}

static SPACES_RE: Lazy<Regex> = Lazy::new(|| regex(r"[ \t]+"));

static MUST_HINTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bтребовани[ея]\b",
        r"(?i)\bqualifications?\b",
        r"(?i)\brequirements?\b",
    ]
    .iter()
    .map(|p| regex(p))
    .collect()
});

static SKILLS_HINT: Lazy<Regex> = Lazy::new(|| regex(r"(?i)\bskills?\b"));
static SKILLS_QUALIFIER: Lazy<Regex> = Lazy::new(|| regex(r"(?i)^\s*(?:preferred|nice|optional)"));

static NICE_HINTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bбудет\s+плюсом\b",
        r"(?i)\bжелательно\b",
        r"(?i)\boptional\b",
        r"(?i)\bnice to have\b",
        r"(?i)\bpreferred\b",
        r"(?i)\bwould be a plus\b",
    ]
    .iter()
    .map(|p| regex(p))
    .collect()
});

static HEADING_RE: Lazy<Regex> = Lazy::new(|| regex(r"^\s*[A-ZА-Я].{0,30}:\s*$"));

static BULLET_RE: Lazy<Regex> = Lazy::new(|| regex(r"^\s*(?:[-*•▪●]|\d+\.)\s+"));

static PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    regex(
        r"(?i)(?:опыт|знание|владение|experience|proficiency|knowledge)\s*(?:работы\s*)?(?:с|в|of|in|with)\s+(.+)",
    )
});

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| regex(r"(?i)[,/;]|\s+и\s+|\s+and\s+|\s+or\s+"));

const YEARS_UNIT: &str = r"(?:год(?:а|ов)?|лет|years?)";

static MIN_YEARS_RE: Lazy<Regex> = Lazy::new(|| {
    regex(&format!(
        r"(?i)(?:от|не менее|минимум|min(?:imum)?)\s*(\d+)\s*{}",
        YEARS_UNIT
    ))
});
static RANGE_YEARS_RE: Lazy<Regex> =
    Lazy::new(|| regex(&format!(r"(?i)(\d+)\s*[–\-]\s*(\d+)\s*{}", YEARS_UNIT)));
static PLUS_YEARS_RE: Lazy<Regex> = Lazy::new(|| regex(r"(?i)(\d+)\s*\+\s*years?"));
static PLAIN_YEARS_RE: Lazy<Regex> = Lazy::new(|| regex(&format!(r"(?i)(\d+)\s*{}", YEARS_UNIT)));

/// Must-have and nice-to-have text blocks of a posting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub must: String,
    pub nice: String,
}

fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    SPACES_RE.replace_all(&text, " ").into_owned()
}

fn is_must_heading(line: &str) -> bool {
    MUST_HINTS.iter().any(|re| re.is_match(line))
        || SKILLS_HINT
            .find_iter(line)
            .any(|m| !SKILLS_QUALIFIER.is_match(&line[m.end()..]))
}

fn is_nice_heading(line: &str) -> bool {
    NICE_HINTS.iter().any(|re| re.is_match(line))
}

/// Lines following `start` up to the next `Heading:` line.
fn collect_section(lines: &[&str], start: usize) -> String {
    let end = (start + SECTION_SPAN).min(lines.len());
    lines
        .get(start + 1..end)
        .unwrap_or_default()
        .iter()
        .take_while(|line| !HEADING_RE.is_match(line))
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Splits a posting into must-have and nice-to-have blocks by heading hints.
/// Without any must-have heading the first lines of the posting stand in.
pub fn split_sections(text: &str) -> Sections {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut sections = Sections::default();
    let mut must_found = false;

    for (i, line) in lines.iter().enumerate() {
        if is_must_heading(line) {
            must_found = true;
            sections.must.push('\n');
            sections.must.push_str(&collect_section(&lines, i));
        }
        if is_nice_heading(line) {
            sections.nice.push('\n');
            sections.nice.push_str(&collect_section(&lines, i));
        }
    }

    if !must_found {
        sections.must = lines
            .iter()
            .take(FALLBACK_LINES)
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
    }
    sections
}

fn parse_number(s: &str) -> Option<i64> {
    s.parse().ok()
}

/// Smallest year count mentioned, and the largest upper bound of a range.
pub fn extract_years(text: &str) -> (Option<i64>, Option<i64>) {
    let mut mins = Vec::new();
    let mut maxs = Vec::new();

    for re in [&*MIN_YEARS_RE, &*PLUS_YEARS_RE, &*PLAIN_YEARS_RE] {
        for caps in re.captures_iter(text) {
            if let Some(value) = caps.get(1).and_then(|m| parse_number(m.as_str())) {
                mins.push(value);
            }
        }
    }

    for caps in RANGE_YEARS_RE.captures_iter(text) {
        let a = caps.get(1).and_then(|m| parse_number(m.as_str()));
        let b = caps.get(2).and_then(|m| parse_number(m.as_str()));
        if let (Some(a), Some(b)) = (a, b) {
            mins.push(a.min(b));
            maxs.push(a.max(b));
        }
    }

    (mins.into_iter().min(), maxs.into_iter().max())
}

/// Canonical display name for a text fragment, trying canonical names first
/// and aliases second.
fn best_skill_match(fragment: &str, index: &SkillIndex) -> Option<String> {
    let fragment = fragment.trim().to_lowercase();
    if fragment.is_empty() {
        return None;
    }

    let keys = index.canonical_keys().iter().map(String::as_str);
    if let Some((key, _)) = extract_one(&fragment, keys, weighted_ratio, SKILL_MATCH_CUTOFF) {
        return index.display_for(key).map(str::to_string);
    }

    let aliases = index.aliases().iter().map(String::as_str);
    let (alias, _) = extract_one(&fragment, aliases, weighted_ratio, SKILL_MATCH_CUTOFF)?;
    index.resolve(alias).map(str::to_string)
}

fn extract_skills_block(text: &str, index: &SkillIndex) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();

    for line in text.split('\n') {
        let is_bullet = BULLET_RE.is_match(line);
        if !is_bullet && line.split_whitespace().count() > MAX_ITEM_WORDS {
            continue;
        }
        let item = BULLET_RE.replace(line, "");
        let item = item.trim();
        if item.is_empty() {
            continue;
        }

        let body = PHRASE_RE
            .captures(item)
            .and_then(|caps| caps.get(1))
            .map_or(item, |m| m.as_str());

        for fragment in SEPARATOR_RE.split(body) {
            if let Some(skill) = best_skill_match(fragment, index) {
                skills.insert(skill);
            }
        }
    }

    skills
}

/// Parses posting text into experience bounds (years) and canonical skill
/// lists. Nice-to-have skills already required are dropped.
pub fn parse_vacancy_text(text: &str, index: &SkillIndex) -> ParsedVacancy {
    let text = normalize(text);
    let sections = split_sections(&text);

    let years_source = if sections.must.trim().is_empty() {
        text.as_str()
    } else {
        sections.must.as_str()
    };
    let (years_min, years_max) = extract_years(years_source);

    let must = extract_skills_block(&sections.must, index);
    let nice = if sections.nice.trim().is_empty() {
        BTreeSet::new()
    } else {
        extract_skills_block(&sections.nice, index)
    };

    ParsedVacancy {
        years_min,
        years_max,
        nice_to_have: nice.difference(&must).cloned().collect(),
        must_have: must.into_iter().collect(),
    }
}

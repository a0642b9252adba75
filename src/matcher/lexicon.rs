// src/matcher/lexicon.rs
//! Canonical skill dictionary and the lookup index derived from it.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Canonical display name -> known aliases (spellings, abbreviations,
/// translations). Keep aliases unique across entries.
const BUILTIN_LEXICON: &[(&str, &[&str])] = &[
    // Languages
    ("Python", &["python3", "python 3", "py", "питон", "пайтон"]),
    ("Java", &["java se", "java ee", "джава", "java 8", "java 11", "java 17"]),
    ("JavaScript", &["js", "java script", "ecmascript", "es6", "джаваскрипт"]),
    ("TypeScript", &["ts", "type script"]),
    ("Go", &["golang", "go lang"]),
    ("Rust", &["rust lang", "rustlang"]),
    ("C++", &["cpp", "c plus plus", "с++"]),
    ("C#", &["csharp", "c sharp", "с#"]),
    ("Kotlin", &["котлин"]),
    ("Swift", &["swift ui", "swiftui"]),
    ("PHP", &["php7", "php 8", "пхп"]),
    ("Ruby", &["ruby on rails", "rails", "ror"]),
    ("Scala", &["scala 2", "scala 3"]),
    ("R", &["r language", "rstats"]),
    ("Bash", &["shell", "shell scripting", "bash scripting", "sh"]),
    // Data & ML
    ("SQL", &["sql queries", "ansi sql", "скуль"]),
    ("PostgreSQL", &["postgres", "postgre", "psql", "постгрес"]),
    ("MySQL", &["my sql", "mariadb"]),
    ("MongoDB", &["mongo", "монго"]),
    ("Redis", &["редис"]),
    ("ClickHouse", &["click house", "клик хаус"]),
    ("Elasticsearch", &["elastic", "elastic search", "opensearch"]),
    ("Kafka", &["apache kafka", "кафка"]),
    ("RabbitMQ", &["rabbit mq", "rabbit"]),
    ("Spark", &["apache spark", "pyspark"]),
    ("Airflow", &["apache airflow"]),
    ("Pandas", &["pandas dataframe"]),
    ("NumPy", &["numpy arrays"]),
    ("scikit-learn", &["sklearn", "scikit learn"]),
    ("PyTorch", &["torch"]),
    ("TensorFlow", &["tensor flow", "tf2", "keras"]),
    ("Machine Learning", &["ml", "машинное обучение"]),
    ("Deep Learning", &["dl", "глубокое обучение", "neural networks", "нейронные сети"]),
    ("NLP", &["natural language processing", "обработка естественного языка"]),
    ("Computer Vision", &["cv", "компьютерное зрение"]),
    ("Data Analysis", &["data analytics", "анализ данных"]),
    ("Statistics", &["статистика", "mathematical statistics", "математическая статистика"]),
    // Web frameworks
    ("Django", &["django rest framework", "drf", "джанго"]),
    ("FastAPI", &["fast api", "fastapi framework"]),
    ("Flask", &["фласк"]),
    ("Spring", &["spring boot", "spring framework", "спринг"]),
    ("React", &["reactjs", "react.js", "react js"]),
    ("Vue", &["vuejs", "vue.js", "vue js"]),
    ("Angular", &["angularjs", "angular.js"]),
    ("Node.js", &["nodejs", "node js", "node"]),
    (".NET", &["dotnet", "dot net", "asp.net", ".net core"]),
    ("HTML", &["html5"]),
    ("CSS", &["css3", "scss", "sass"]),
    ("GraphQL", &["graph ql"]),
    ("REST API", &["rest", "restful", "restful api", "rest apis"]),
    ("gRPC", &["grpc api"]),
    // Infrastructure
    ("Docker", &["докер", "docker compose", "docker-compose", "containers"]),
    ("Kubernetes", &["k8s", "кубернетес", "kubectl"]),
    ("Linux", &["линукс", "unix", "ubuntu", "debian", "centos"]),
    ("Git", &["github", "gitlab", "гит", "version control"]),
    ("CI/CD", &["ci cd", "continuous integration", "github actions", "gitlab ci", "jenkins"]),
    ("Terraform", &["терраформ", "infrastructure as code", "iac"]),
    ("Ansible", &["ансибл"]),
    ("AWS", &["amazon web services", "amazon aws"]),
    ("GCP", &["google cloud", "google cloud platform"]),
    ("Azure", &["microsoft azure"]),
    ("Nginx", &["нджинкс", "engine x"]),
    ("Prometheus", &["prometheus monitoring"]),
    ("Grafana", &["графана"]),
    // Practices
    ("Microservices", &["microservice architecture", "микросервисы"]),
    ("OOP", &["object oriented programming", "объектно-ориентированное программирование", "ооп"]),
    ("Algorithms", &["algorithms and data structures", "алгоритмы", "data structures"]),
    ("Unit Testing", &["unit tests", "pytest", "junit", "юнит тесты"]),
    ("Agile", &["scrum", "kanban", "аджайл"]),
    ("English", &["английский", "английский язык", "english language"]),
];

/// Collapses whitespace runs, trims and lowercases.
///
/// Every skill string goes through this before it is indexed or looked up.
pub fn normalize_skill(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Static mapping from canonical display name to alias strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillLexicon {
    entries: Vec<(String, Vec<String>)>,
}

impl SkillLexicon {
    /// The lexicon compiled into the binary.
    pub fn builtin() -> Self {
        let entries = BUILTIN_LEXICON
            .iter()
            .map(|(canonical, aliases)| {
                (
                    canonical.to_string(),
                    aliases.iter().map(|a| a.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn from_entries(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Parses a TOML table of `"Canonical" = ["alias", ...]` pairs.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: BTreeMap<String, Vec<String>> =
            toml::from_str(content).context("Failed to parse skill lexicon TOML")?;
        Ok(Self {
            entries: table.into_iter().collect(),
        })
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = crate::core::FsOps::read_file_safe(path).await?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid skill lexicon: {}", path.display()))
    }

    /// Same layout `from_toml_str` reads: display name = [aliases]
    pub fn to_toml_string(&self) -> Result<String> {
        let table: BTreeMap<&str, &[String]> = self
            .entries
            .iter()
            .map(|(name, aliases)| (name.as_str(), aliases.as_slice()))
            .collect();
        toml::to_string(&table).context("Failed to serialize skill lexicon")
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lookup structure derived from a [`SkillLexicon`]. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SkillIndex {
    alias_to_canonical: HashMap<String, String>,
    canonical_to_display: HashMap<String, String>,
    aliases: Vec<String>,
    canonical_keys: Vec<String>,
}

impl SkillIndex {
    /// Every canonical name is registered as an alias of itself. When two
    /// entries claim the same alias the later one wins, keeping the alias at
    /// its first position in the search list.
    pub fn build(lexicon: &SkillLexicon) -> Self {
        let mut index = Self::default();

        for (display, aliases) in lexicon.entries() {
            let canonical = normalize_skill(display);
            if canonical.is_empty() {
                continue;
            }
            if index
                .canonical_to_display
                .insert(canonical.clone(), display.trim().to_string())
                .is_none()
            {
                index.canonical_keys.push(canonical.clone());
            }
            index.register(canonical.clone(), canonical.clone());

            for alias in aliases {
                let alias = normalize_skill(alias);
                if !alias.is_empty() {
                    index.register(alias, canonical.clone());
                }
            }
        }

        index
    }

    fn register(&mut self, alias: String, canonical: String) {
        if self
            .alias_to_canonical
            .insert(alias.clone(), canonical)
            .is_none()
        {
            self.aliases.push(alias);
        }
    }

    /// Canonical key for an already normalized alias.
    pub fn canonical_for(&self, normalized_alias: &str) -> Option<&str> {
        self.alias_to_canonical
            .get(normalized_alias)
            .map(String::as_str)
    }

    pub fn display_for(&self, canonical_key: &str) -> Option<&str> {
        self.canonical_to_display
            .get(canonical_key)
            .map(String::as_str)
    }

    /// Display form reached from a normalized alias, if it is known.
    pub fn resolve(&self, normalized_alias: &str) -> Option<&str> {
        self.canonical_for(normalized_alias)
            .and_then(|canonical| self.display_for(canonical))
    }

    /// All normalized aliases, canonical keys included, in insertion order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn canonical_keys(&self) -> &[String] {
        &self.canonical_keys
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

static DEFAULT_INDEX: Lazy<Arc<SkillIndex>> =
    Lazy::new(|| Arc::new(SkillIndex::build(&SkillLexicon::builtin())));

/// Index over the built-in lexicon, built on first use and shared for the
/// process lifetime.
pub fn default_index() -> Arc<SkillIndex> {
    Arc::clone(&DEFAULT_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_skill() {
        assert_eq!(normalize_skill("  Spring   Boot "), "spring boot");
        assert_eq!(normalize_skill("PYTHON"), "python");
        assert_eq!(normalize_skill("Машинное\tОбучение"), "машинное обучение");
        assert_eq!(normalize_skill("   "), "");
    }

    #[test]
    fn test_canonical_registered_as_its_own_alias() {
        let index = SkillIndex::build(&SkillLexicon::builtin());
        assert_eq!(index.canonical_for("python"), Some("python"));
        assert_eq!(index.resolve("python"), Some("Python"));
        assert_eq!(index.resolve("питон"), Some("Python"));
        assert_eq!(index.resolve("k8s"), Some("Kubernetes"));
        assert_eq!(index.resolve("cobol"), None);
    }

    #[test]
    fn test_builtin_aliases_are_unique() {
        let lexicon = SkillLexicon::builtin();
        let mut seen = std::collections::HashSet::new();
        for (canonical, aliases) in lexicon.entries() {
            assert!(seen.insert(normalize_skill(canonical)), "duplicate {}", canonical);
            for alias in aliases {
                assert!(seen.insert(normalize_skill(alias)), "duplicate alias {}", alias);
            }
        }
        let index = SkillIndex::build(&lexicon);
        assert_eq!(index.len(), seen.len());
        assert_eq!(index.canonical_keys().len(), lexicon.len());
    }

    #[test]
    fn test_build_is_deterministic() {
        let lexicon = SkillLexicon::builtin();
        let a = SkillIndex::build(&lexicon);
        let b = SkillIndex::build(&lexicon);
        assert_eq!(a.aliases(), b.aliases());
        assert_eq!(a.canonical_keys(), b.canonical_keys());
    }

    #[test]
    fn test_later_entry_wins_shared_alias() {
        let lexicon = SkillLexicon::from_entries(vec![
            ("Postgres".to_string(), vec!["pg".to_string()]),
            ("PostgreSQL".to_string(), vec!["pg".to_string()]),
        ]);
        let index = SkillIndex::build(&lexicon);
        assert_eq!(index.resolve("pg"), Some("PostgreSQL"));
        assert_eq!(index.aliases(), &["postgres", "pg", "postgresql"]);
    }

    #[test]
    fn test_lexicon_from_toml() {
        let lexicon = SkillLexicon::from_toml_str(
            r#"
            "Python" = ["py", "python3"]
            "Rust" = []
            "#,
        )
        .unwrap();
        let index = SkillIndex::build(&lexicon);
        assert_eq!(index.resolve("py"), Some("Python"));
        assert_eq!(index.resolve("rust"), Some("Rust"));
        assert!(SkillLexicon::from_toml_str("Python = 3").is_err());
    }

    #[test]
    fn test_default_index_is_shared() {
        let a = default_index();
        let b = default_index();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_builtin_lexicon_exports_loadable_toml() {
        let builtin = SkillLexicon::builtin();
        let written = builtin.to_toml_string().unwrap();
        let loaded = SkillLexicon::from_toml_str(&written).unwrap();
        assert_eq!(loaded.len(), builtin.len());
        let index = SkillIndex::build(&loaded);
        assert_eq!(index.resolve("k8s"), Some("Kubernetes"));
    }
}

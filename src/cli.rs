// src/cli.rs
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

use crate::app_log;
use crate::core::{ConfigManager, Database, ExtractionClient, FsOps};
use crate::llm::{
    CareerChat, ChatMessage, DialogAnalyzer, LlmClient, MatchAnalyzer, MatchAssessment,
    DEFAULT_MAX_HISTORY,
};
use crate::matcher::{MatchResult, MatcherConfig, SkillIndex, SkillLexicon};
use crate::services::{MatchingService, ParsingService, UserService};
use crate::types::{NewProfile, ProfileUpdate, Sex};

#[derive(Parser)]
#[command(name = "career-match")]
#[command(about = "Match candidates with vacancies and get LLM career guidance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Overrides the database file from config.yaml
    #[arg(long, global = true)]
    pub database_path: Option<PathBuf>,

    /// Overrides the skill lexicon file
    #[arg(long, global = true)]
    pub lexicon: Option<PathBuf>,

    /// Overrides the matcher configuration file
    #[arg(long, global = true)]
    pub matcher_config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage candidate profiles
    #[command(subcommand)]
    User(UserCommand),
    /// Manage vacancies
    #[command(subcommand)]
    Vacancy(VacancyCommand),
    /// Score candidates against vacancies
    #[command(subcommand)]
    Match(MatchCommand),
    /// Interactive career chat; `--apply` stores what the dialog revealed
    Chat {
        user_id: Uuid,
        #[arg(long)]
        apply: bool,
    },
    /// Analyze a saved dialog (JSON array of {role, content}) and update the profile
    AnalyzeDialog {
        user_id: Uuid,
        transcript: PathBuf,
        /// Print the analysis without updating the profile
        #[arg(long)]
        dry_run: bool,
    },
    /// Create directories, the database and default configuration files
    Init,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Add a new candidate profile
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        sex: Sex,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: NaiveDate,
        #[arg(long)]
        position: String,
        #[arg(long)]
        education: Option<String>,
        #[arg(long, default_value_t = 0)]
        years: i32,
        #[arg(long, default_value_t = 0)]
        months: i32,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
        #[arg(long)]
        expectations: Option<String>,
    },
    /// Update selected fields of a profile
    Update {
        id: Uuid,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        education: Option<String>,
        #[arg(long)]
        years: Option<i32>,
        #[arg(long)]
        months: Option<i32>,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated; replaces the stored list
        #[arg(long, value_delimiter = ',')]
        skills: Option<Vec<String>>,
        #[arg(long)]
        expectations: Option<String>,
    },
    /// Show one profile
    Show { id: Uuid },
    /// List all profiles
    List,
    /// Delete a profile
    Delete { id: Uuid },
    /// Import profiles from a CSV file
    Import { csv_file: PathBuf },
}

#[derive(Subcommand)]
pub enum VacancyCommand {
    /// Upload a PDF/DOCX posting through the extraction service
    Add {
        file: PathBuf,
        #[arg(long)]
        name: String,
    },
    /// Add a posting from a plain text file
    AddText {
        file: PathBuf,
        #[arg(long)]
        name: String,
    },
    /// Show one vacancy
    Show { id: Uuid },
    /// List vacancies, newest first
    List,
    /// Delete a vacancy
    Delete { id: Uuid },
}

#[derive(Subcommand)]
pub enum MatchCommand {
    /// Score one candidate against every vacancy
    User {
        id: Uuid,
        #[arg(long)]
        explain: bool,
    },
    /// Score every candidate against one vacancy
    Vacancy {
        id: Uuid,
        #[arg(long)]
        explain: bool,
    },
    /// Score one pair, optionally with an LLM second opinion
    Pair {
        user_id: Uuid,
        vacancy_id: Uuid,
        #[arg(long)]
        llm: bool,
    },
}

#[derive(Serialize)]
struct PairReport {
    user_id: Uuid,
    vacancy_id: Uuid,
    decision: bool,
    result: MatchResult,
    llm_assessment: Option<MatchAssessment>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}

struct AppContext {
    config: ConfigManager,
    db: Database,
    matcher: Arc<MatcherConfig>,
    index: Arc<SkillIndex>,
}

impl AppContext {
    async fn load(cli: &Cli) -> Result<Self> {
        let mut config = ConfigManager::load()?;
        if let Some(path) = &cli.database_path {
            config.environment.database_path = path.clone();
        }
        if let Some(path) = &cli.lexicon {
            config.environment.lexicon_path = Some(path.clone());
        }
        if let Some(path) = &cli.matcher_config {
            config.environment.matcher_config_path = Some(path.clone());
        }
        config.ensure_directories().await?;

        let db = Database::new(&config.environment.database_path).await?;
        let matcher = Arc::new(config.load_matcher_config().await?);
        let index = config.load_skill_index().await?;

        Ok(Self {
            config,
            db,
            matcher,
            index,
        })
    }

    fn llm_client(&self) -> Result<LlmClient> {
        LlmClient::new(&self.config.service)
    }
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let ctx = AppContext::load(&cli).await?;

    match cli.command {
        Command::User(command) => handle_user_command(&ctx, command).await,
        Command::Vacancy(command) => handle_vacancy_command(&ctx, command).await,
        Command::Match(command) => handle_match_command(&ctx, command).await,
        Command::Chat { user_id, apply } => run_chat(&ctx, user_id, apply).await,
        Command::AnalyzeDialog {
            user_id,
            transcript,
            dry_run,
        } => analyze_transcript(&ctx, user_id, &transcript, dry_run).await,
        Command::Init => init(&ctx).await,
    }
}

async fn handle_user_command(ctx: &AppContext, command: UserCommand) -> Result<()> {
    let users = UserService::new(&ctx.db);

    match command {
        UserCommand::Add {
            first_name,
            last_name,
            sex,
            birth_date,
            position,
            education,
            years,
            months,
            description,
            skills,
            expectations,
        } => {
            let profile = users
                .create(NewProfile {
                    first_name,
                    last_name,
                    sex,
                    birth_date,
                    current_position: position,
                    education,
                    experience_years: years,
                    experience_months: months,
                    experience_description: description,
                    hard_skills: skills,
                    career_expectations: expectations,
                })
                .await?;
            app_log!(info, "✅ User created: {}", profile.id);
            print_json(&profile)
        }

        UserCommand::Update {
            id,
            position,
            education,
            years,
            months,
            description,
            skills,
            expectations,
        } => {
            let update = ProfileUpdate {
                current_position: position,
                education,
                experience_years: years,
                experience_months: months,
                experience_description: description,
                hard_skills: skills,
                career_expectations: expectations,
            };
            if update.is_empty() {
                app_log!(warn, "Nothing to update for {}", id);
            }
            let profile = users.update(id, &update).await?;
            print_json(&profile)
        }

        UserCommand::Show { id } => print_json(&users.get(id).await?),

        UserCommand::List => {
            let profiles = users.list().await?;
            app_log!(info, "📋 {} profiles", profiles.len());
            print_json(&profiles)
        }

        UserCommand::Delete { id } => {
            users.delete(id).await?;
            app_log!(info, "✅ User deleted: {}", id);
            Ok(())
        }

        UserCommand::Import { csv_file } => {
            let content = FsOps::read_file_safe(&csv_file).await?;
            let report = users.import_csv(&content).await?;
            app_log!(info, "📊 Import complete:");
            app_log!(info, "   Imported: {}", report.imported.len());
            app_log!(info, "   Rejected: {}", report.rejected.len());
            for (row, reason) in &report.rejected {
                app_log!(warn, "   Row {}: {}", row, reason);
            }
            Ok(())
        }
    }
}

async fn handle_vacancy_command(ctx: &AppContext, command: VacancyCommand) -> Result<()> {
    let parsing = ParsingService::new(&ctx.db, Arc::clone(&ctx.index));

    match command {
        VacancyCommand::Add { file, name } => {
            let extractor = ExtractionClient::new(
                &ctx.config.service.extraction_url,
                ctx.config.service.timeout_seconds,
            )?;
            let file_name = FsOps::file_name(&file)?;
            let content = FsOps::read_bytes(&file).await?;
            let vacancy = parsing
                .add_vacancy(&extractor, content, &file_name, &name)
                .await?;
            app_log!(info, "✅ Vacancy created: {}", vacancy.id);
            print_json(&vacancy)
        }

        VacancyCommand::AddText { file, name } => {
            let text = FsOps::read_file_safe(&file).await?;
            let vacancy = parsing.add_vacancy_from_text(&name, text).await?;
            app_log!(info, "✅ Vacancy created: {}", vacancy.id);
            print_json(&vacancy)
        }

        VacancyCommand::Show { id } => print_json(&parsing.get(id).await?),

        VacancyCommand::List => {
            let vacancies = parsing.list().await?;
            app_log!(info, "📋 {} vacancies", vacancies.len());
            print_json(&vacancies)
        }

        VacancyCommand::Delete { id } => {
            if !parsing.delete(id).await? {
                anyhow::bail!("Vacancy not found: {}", id);
            }
            app_log!(info, "✅ Vacancy deleted: {}", id);
            Ok(())
        }
    }
}

async fn handle_match_command(ctx: &AppContext, command: MatchCommand) -> Result<()> {
    let matching = MatchingService::new(&ctx.db, Arc::clone(&ctx.matcher), Arc::clone(&ctx.index));

    match command {
        MatchCommand::User { id, explain } => {
            let mut matches = matching.match_user(id).await?;
            if !explain {
                matches = matches.into_iter().map(|m| m.without_details()).collect();
            }
            print_json(&matches)
        }

        MatchCommand::Vacancy { id, explain } => {
            let mut matches = matching.match_vacancy(id).await?;
            if !explain {
                matches = matches.into_iter().map(|m| m.without_details()).collect();
            }
            print_json(&matches)
        }

        MatchCommand::Pair {
            user_id,
            vacancy_id,
            llm,
        } => {
            let (profile, vacancy, result) = matching.match_pair(user_id, vacancy_id).await?;
            let decision = matching.config().is_positive(result.total);

            let assessment = if llm {
                MatchAnalyzer::new(ctx.llm_client()?)
                    .assess(&profile, &vacancy)
                    .await
            } else {
                None
            };
            if llm && assessment.is_none() {
                app_log!(warn, "LLM assessment unavailable");
            }

            print_json(&PairReport {
                user_id: profile.id,
                vacancy_id: vacancy.id,
                decision,
                result,
                llm_assessment: assessment,
            })
        }
    }
}

async fn run_chat(ctx: &AppContext, user_id: Uuid, apply: bool) -> Result<()> {
    let users = UserService::new(&ctx.db);
    let profile = users.get(user_id).await?;
    let client = ctx.llm_client()?;
    let chat = CareerChat::new(client.clone(), DEFAULT_MAX_HISTORY);

    app_log!(info, "💬 Career chat with {} (empty line to finish)", profile.full_name());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            break;
        }

        match chat.process_message(user_id, message).await {
            Ok(reply) => {
                stdout.write_all(format!("{}\n", reply).as_bytes()).await?;
            }
            Err(e) => app_log!(error, "Chat request failed: {:#}", e),
        }
    }

    if apply {
        let history = chat.history(user_id).await;
        apply_analysis(&users, &DialogAnalyzer::new(client), user_id, &history, false).await?;
    }
    chat.clear_history(user_id).await;
    Ok(())
}

async fn analyze_transcript(
    ctx: &AppContext,
    user_id: Uuid,
    transcript: &Path,
    dry_run: bool,
) -> Result<()> {
    let content = FsOps::read_file_safe(transcript).await?;
    let history: Vec<ChatMessage> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid transcript: {}", transcript.display()))?;

    let users = UserService::new(&ctx.db);
    let analyzer = DialogAnalyzer::new(ctx.llm_client()?);
    apply_analysis(&users, &analyzer, user_id, &history, dry_run).await
}

async fn apply_analysis(
    users: &UserService<'_>,
    analyzer: &DialogAnalyzer,
    user_id: Uuid,
    history: &[ChatMessage],
    dry_run: bool,
) -> Result<()> {
    let profile = users.get(user_id).await?;
    let analysis = analyzer
        .analyze(
            history,
            &profile.hard_skills,
            profile.experience_description.as_deref().unwrap_or_default(),
            profile.career_expectations.as_deref().unwrap_or_default(),
        )
        .await;

    let Some(analysis) = analysis else {
        app_log!(warn, "Dialog analysis returned nothing; profile unchanged");
        return Ok(());
    };
    print_json(&analysis)?;

    if dry_run {
        return Ok(());
    }
    let updated = users.apply_dialog_analysis(user_id, &analysis).await?;
    app_log!(info, "✅ Profile updated from dialog: {}", updated.id);
    print_json(&updated)
}

async fn init(ctx: &AppContext) -> Result<()> {
    ctx.db.health_check().await?;
    app_log!(
        info,
        "✅ Database ready: {}",
        ctx.config.environment.database_path.display()
    );

    if let Some(path) = &ctx.config.environment.matcher_config_path {
        write_if_missing(path, &MatcherConfig::default().to_toml_string()?).await?;
    }
    if let Some(path) = &ctx.config.environment.lexicon_path {
        write_if_missing(path, &SkillLexicon::builtin().to_toml_string()?).await?;
    }
    Ok(())
}

async fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        app_log!(info, "Keeping existing {}", path.display());
        return Ok(());
    }
    FsOps::write_file_safe(path, content).await
}

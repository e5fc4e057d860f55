//! Operator CLI over the folio resource store.
//!
//! # Responsibility
//! - Map subcommands onto `folio_core` API calls.
//! - Print records as pretty JSON on stdout; errors go to stderr.
//! - Experience output carries `period` and `duration`; listings carry a
//!   `count` heading.
//!
//! Exit codes: `0` success, `1` storage or setup failure, `2` invalid input,
//! `3` unknown id.

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use folio_core::client::load_dashboard_stats;
use folio_core::{
    init_logging, listing_count, ApiError, AppConfig, EditSession, Experience, ExperienceForm,
    ExperienceSummary, Portfolio, PortfolioForm, RefetchCoordinator, ResourceApi, ResourceForm,
    ResourceId, StoreApi, StoreHandle, SubmitError,
};
use log::info;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Manage portfolio projects and work experience")]
struct Cli {
    /// SQLite file, or `:memory:`; overrides FOLIO_DB_PATH.
    #[arg(long, global = true)]
    db_path: Option<String>,
    /// Overrides FOLIO_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute log directory; overrides FOLIO_LOG_DIR.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Portfolio projects.
    Portfolio {
        #[command(subcommand)]
        command: PortfolioCommand,
    },
    /// Work experience entries.
    Experience {
        #[command(subcommand)]
        command: ExperienceCommand,
    },
    /// Dashboard counts across both collections.
    Stats,
}

#[derive(Subcommand)]
enum PortfolioCommand {
    List,
    Get {
        id: ResourceId,
    },
    Create {
        #[command(flatten)]
        fields: PortfolioFields,
    },
    /// Replaces the record; omitted flags keep their current value.
    Update {
        id: ResourceId,
        #[command(flatten)]
        fields: PortfolioFields,
    },
    Delete {
        id: ResourceId,
    },
}

#[derive(Subcommand)]
enum ExperienceCommand {
    List,
    Get {
        id: ResourceId,
    },
    Create {
        #[command(flatten)]
        fields: ExperienceFields,
    },
    /// Replaces the record; omitted flags keep their current value.
    Update {
        id: ResourceId,
        #[command(flatten)]
        fields: ExperienceFields,
    },
    Delete {
        id: ResourceId,
    },
}

/// One resource operation with kind-specific field flags.
enum Action<Fields> {
    List,
    Get(ResourceId),
    Create(Fields),
    Update(ResourceId, Fields),
    Delete(ResourceId),
}

impl From<PortfolioCommand> for Action<PortfolioFields> {
    fn from(value: PortfolioCommand) -> Self {
        match value {
            PortfolioCommand::List => Self::List,
            PortfolioCommand::Get { id } => Self::Get(id),
            PortfolioCommand::Create { fields } => Self::Create(fields),
            PortfolioCommand::Update { id, fields } => Self::Update(id, fields),
            PortfolioCommand::Delete { id } => Self::Delete(id),
        }
    }
}

impl From<ExperienceCommand> for Action<ExperienceFields> {
    fn from(value: ExperienceCommand) -> Self {
        match value {
            ExperienceCommand::List => Self::List,
            ExperienceCommand::Get { id } => Self::Get(id),
            ExperienceCommand::Create { fields } => Self::Create(fields),
            ExperienceCommand::Update { id, fields } => Self::Update(id, fields),
            ExperienceCommand::Delete { id } => Self::Delete(id),
        }
    }
}

#[derive(Args)]
struct PortfolioFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    project_url: Option<String>,
    #[arg(long)]
    github_url: Option<String>,
    /// Comma-separated, e.g. "Rust, SQLite".
    #[arg(long)]
    technologies: Option<String>,
    #[arg(long)]
    featured: Option<bool>,
}

#[derive(Args)]
struct ExperienceFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// YYYY-MM-DD.
    #[arg(long)]
    start_date: Option<String>,
    /// YYYY-MM-DD; pass an empty string to clear.
    #[arg(long)]
    end_date: Option<String>,
    #[arg(long)]
    current: Option<bool>,
    #[arg(long)]
    description: Option<String>,
    /// Comma-separated, e.g. "Go, TypeScript".
    #[arg(long)]
    technologies: Option<String>,
}

/// Applies the flags that were given on top of existing form values.
trait ApplyFields<F> {
    fn apply(self, form: &mut F);
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl ApplyFields<PortfolioForm> for PortfolioFields {
    fn apply(self, form: &mut PortfolioForm) {
        set(&mut form.title, self.title);
        set(&mut form.description, self.description);
        set(&mut form.image_url, self.image_url);
        set(&mut form.project_url, self.project_url);
        set(&mut form.github_url, self.github_url);
        set(&mut form.technologies, self.technologies);
        set(&mut form.featured, self.featured);
    }
}

impl ApplyFields<ExperienceForm> for ExperienceFields {
    fn apply(self, form: &mut ExperienceForm) {
        set(&mut form.title, self.title);
        set(&mut form.company, self.company);
        set(&mut form.location, self.location);
        set(&mut form.start_date, self.start_date);
        set(&mut form.end_date, self.end_date);
        set(&mut form.current, self.current);
        set(&mut form.description, self.description);
        set(&mut form.technologies, self.technologies);
    }
}

/// JSON shape printed for one record.
trait Render {
    fn render(&self, today: NaiveDate) -> serde_json::Result<Value>;
}

impl Render for Portfolio {
    fn render(&self, _today: NaiveDate) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl Render for Experience {
    fn render(&self, today: NaiveDate) -> serde_json::Result<Value> {
        serde_json::to_value(ExperienceSummary::at(self, today))
    }
}

/// Listing with its heading count, e.g. `"3 positions"`.
fn render_listing<A>(records: &[A::Record], today: NaiveDate) -> serde_json::Result<Value>
where
    A: ResourceApi,
    A::Record: Render,
{
    let items = records
        .iter()
        .map(|record| record.render(today))
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(json!({
        "count": listing_count(A::KIND, records.len()),
        "items": items,
    }))
}

#[derive(Debug)]
enum CliError {
    Setup(String),
    Api(ApiError),
    Submit(SubmitError),
    Output(serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Api(ApiError::Validation(_)) | Self::Submit(SubmitError::Validation(_)) => {
                ExitCode::from(2)
            }
            Self::Api(ApiError::NotFound { .. })
            | Self::Submit(SubmitError::Api(ApiError::NotFound { .. })) => ExitCode::from(3),
            _ => ExitCode::from(1),
        }
    }

    fn report(&self) -> serde_json::Value {
        match self {
            Self::Setup(message) => json!({ "error": message }),
            Self::Api(err) | Self::Submit(SubmitError::Api(err)) => api_error_report(err),
            Self::Submit(SubmitError::Validation(err)) => {
                json!({ "error": "Invalid input", "fields": err.fields() })
            }
            Self::Output(err) => json!({ "error": format!("failed to encode output: {err}") }),
        }
    }
}

fn api_error_report(err: &ApiError) -> serde_json::Value {
    match err.validation() {
        Some(fields) => json!({ "error": "Invalid input", "fields": fields.fields() }),
        None => json!({ "error": err.message() }),
    }
}

impl From<ApiError> for CliError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<SubmitError> for CliError {
    fn from(value: SubmitError) -> Self {
        Self::Submit(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&err.report())
                    .unwrap_or_else(|_| "{\"error\":\"unknown\"}".to_string())
            );
            err.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(&cli)?;
    if let Some(log_config) = config.log_config() {
        init_logging(&log_config).map_err(|err| CliError::Setup(err.to_string()))?;
    }
    info!(
        "event=cli_start module=cli status=ok db_mode={}",
        config.db_target.mode()
    );

    let store = StoreApi::new(Arc::new(StoreHandle::new(config.db_target)));
    match cli.command {
        Command::Portfolio { command } => {
            run_resource::<_, PortfolioForm, PortfolioFields>(store.portfolios(), command.into())
        }
        Command::Experience { command } => {
            run_resource::<_, ExperienceForm, ExperienceFields>(store.experiences(), command.into())
        }
        Command::Stats => print_json(&load_dashboard_stats(
            &store.portfolios(),
            &store.experiences(),
        )),
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let mut config = AppConfig::from_env().map_err(|err| CliError::Setup(err.to_string()))?;
    if let Some(path) = &cli.db_path {
        config = config.with_db_path(path);
    }
    if let Some(level) = &cli.log_level {
        config = config
            .with_log_level(level)
            .map_err(|err| CliError::Setup(err.to_string()))?;
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

fn run_resource<A, F, Fields>(api: A, action: Action<Fields>) -> Result<(), CliError>
where
    A: ResourceApi<Input = F::Input, Record = F::Record>,
    A::Record: Render,
    F: ResourceForm,
    Fields: ApplyFields<F>,
{
    let today = Utc::now().date_naive();
    match action {
        Action::List => print_json(&render_listing::<A>(&api.list()?, today)?),
        Action::Get(id) => print_json(&api.get(id)?.render(today)?),
        Action::Create(fields) => {
            let mut session: EditSession<F> = EditSession::new();
            fields.apply(session.form_mut());
            let saved = session.submit(&mut RefetchCoordinator::new(api))?;
            print_json(&saved.render(today)?)
        }
        Action::Update(id, fields) => {
            let current = api.get(id)?;
            let mut session: EditSession<F> = EditSession::new();
            session.select_for_edit(&current);
            fields.apply(session.form_mut());
            let saved = session.submit(&mut RefetchCoordinator::new(api))?;
            print_json(&saved.render(today)?)
        }
        Action::Delete(id) => {
            let deleted = api.delete(id)?;
            print_json(&json!({ "id": id, "deleted": deleted }))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

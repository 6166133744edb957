// gx-core/src/application/datasource.rs
//
// "Add a datasource" step of the init wizard.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::application::context::DataContext;
use crate::domain::error::DomainError;
use crate::domain::project::{DatasourceConfig, validate_datasource_name};
use crate::error::GxError;
use crate::infrastructure::adapters::connect_url;
use crate::ports::console::Console;

pub const DATA_KIND_PROMPT: &str = "What data would you like Great Expectations to connect to?";
pub const BACKEND_PROMPT: &str = "Which database backend are you using?";
pub const NAME_PROMPT: &str = "Give your new data source a short name.";
pub const URL_PROMPT: &str = "What is the url/connection string for the sqlalchemy connection?";
pub const DIRECTORY_PROMPT: &str =
    "Enter the path (relative or absolute) of the root directory where the data files are stored.";
pub const CONNECTING: &str = "Attempting to connect to your database. This may take a moment...";
pub const CONNECTED: &str = "Great Expectations connected to your database!";
pub const CANNOT_CONNECT: &str = "Cannot connect to the database.";

const DATA_KINDS: [&str; 2] = [
    "Files on a filesystem (for processing with Pandas or Spark)",
    "Relational database (SQL)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Postgres,
    Redshift,
    Snowflake,
    Other,
}

/// One credential prompt: key in config_variables.yml, label, default.
struct Field {
    key: &'static str,
    label: &'static str,
    default: Option<&'static str>,
}

const fn field(key: &'static str, label: &'static str, default: Option<&'static str>) -> Field {
    Field {
        key,
        label,
        default,
    }
}

impl Backend {
    pub const ALL: [Backend; 5] = [
        Backend::MySql,
        Backend::Postgres,
        Backend::Redshift,
        Backend::Snowflake,
        Backend::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Postgres => "Postgres",
            Self::Redshift => "Redshift",
            Self::Snowflake => "Snowflake",
            Self::Other => "other - Do you have a working SQLAlchemy connection string?",
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            Self::MySql => "my_mysql_db",
            Self::Postgres => "my_postgres_db",
            Self::Redshift => "my_redshift_db",
            Self::Snowflake => "my_snowflake_db",
            Self::Other => "my_database",
        }
    }

    fn drivername(&self) -> Option<&'static str> {
        match self {
            Self::MySql => Some("mysql+pymysql"),
            Self::Postgres => Some("postgresql"),
            Self::Redshift => Some("postgresql+psycopg2"),
            Self::Snowflake => Some("snowflake"),
            Self::Other => None,
        }
    }

    fn fields(&self) -> Vec<Field> {
        match self {
            Self::MySql => vec![
                field("host", "What is the host for the MySQL connection?", Some("localhost")),
                field("port", "What is the port for the MySQL connection?", Some("3306")),
                field("username", "What is the username for the MySQL connection?", None),
                field("password", "What is the password for the MySQL connection?", Some("")),
                field("database", "What is the database name for the MySQL connection?", None),
            ],
            Self::Postgres => vec![
                field("host", "What is the host for the postgres connection?", Some("localhost")),
                field("port", "What is the port for the postgres connection?", Some("5432")),
                field("username", "What is the username for the postgres connection?", Some("postgres")),
                field("password", "What is the password for the postgres connection?", Some("")),
                field("database", "What is the database name for the postgres connection?", Some("postgres")),
            ],
            Self::Redshift => vec![
                field("host", "What is the host for the Redshift connection?", None),
                field("port", "What is the port for the Redshift connection?", Some("5439")),
                field("username", "What is the username for the Redshift connection?", None),
                field("password", "What is the password for the Redshift connection?", Some("")),
                field("database", "What is the database name for the Redshift connection?", None),
                field("sslmode", "What is sslmode name for the Redshift connection?", Some("prefer")),
            ],
            Self::Snowflake => vec![
                field("account", "What is the account name for the Snowflake connection?", None),
                field("username", "What is the user login name for the Snowflake connection?", None),
                field("password", "What is the password for the Snowflake connection?", Some("")),
                field("database", "What is database name for the Snowflake connection?", None),
                field("schema", "What is schema name for the Snowflake connection?", None),
                field("warehouse", "What is warehouse name for the Snowflake connection?", None),
            ],
            Self::Other => vec![field("url", URL_PROMPT, None)],
        }
    }
}

fn text_of<'m>(credentials: &'m Mapping, key: &str) -> &'m str {
    credentials.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Connection string from a credentials mapping: either `url`, or
/// `drivername` + the connection fields.
pub fn credentials_to_url(credentials: &Mapping) -> Result<String, GxError> {
    if let Some(url) = credentials.get("url").and_then(Value::as_str) {
        return Ok(url.trim().to_string());
    }
    let drivername = credentials
        .get("drivername")
        .and_then(Value::as_str)
        .ok_or_else(|| DomainError::DatasourceConfig("credentials need a url or a drivername".into()))?;

    let username = text_of(credentials, "username");
    let password = text_of(credentials, "password");
    let auth = match (username.is_empty(), password.is_empty()) {
        (true, _) => String::new(),
        (false, true) => format!("{}@", username),
        (false, false) => format!("{}:{}@", username, password),
    };

    if drivername == "snowflake" {
        let mut url = format!(
            "snowflake://{}{}/{}/{}",
            auth,
            text_of(credentials, "account"),
            text_of(credentials, "database"),
            text_of(credentials, "schema")
        );
        let warehouse = text_of(credentials, "warehouse");
        if !warehouse.is_empty() {
            url.push_str(&format!("?warehouse={}", warehouse));
        }
        return Ok(url);
    }

    let port = match credentials.get("port") {
        Some(Value::Number(n)) => format!(":{}", n),
        Some(Value::String(s)) if !s.is_empty() => format!(":{}", s),
        _ => String::new(),
    };
    let mut url = format!(
        "{}://{}{}{}/{}",
        drivername,
        auth,
        text_of(credentials, "host"),
        port,
        text_of(credentials, "database")
    );
    let sslmode = text_of(credentials, "sslmode");
    if !sslmode.is_empty() {
        url.push_str(&format!("?sslmode={}", sslmode));
    }
    Ok(url)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasourceOutcome {
    Added(String),
    ConnectionFailed,
}

/// Prints the targeted connection failure message.
pub fn report_connection_failure(console: &mut dyn Console, err: &GxError) -> Result<(), GxError> {
    debug!(error = %err, "Connection failed");
    console.say(CANNOT_CONNECT)?;
    console.say(&format!(
        "  - Please check your environment and the configuration you provided.\n  - Database Error: {}",
        err
    ))
}

fn prompt_name(
    context: &DataContext,
    console: &mut dyn Console,
    default: &str,
) -> Result<String, GxError> {
    loop {
        let name = console.text(NAME_PROMPT, Some(default))?;
        let check = validate_datasource_name(&name).and_then(|_| {
            if context.config().datasources.contains_key(&name) {
                Err(DomainError::DuplicateDatasource(name.clone()))
            } else {
                Ok(())
            }
        });
        match check {
            Ok(()) => return Ok(name),
            Err(e) => console.say(&format!("Error: {}", e))?,
        }
    }
}

/// Asks for the kind of data and walks the matching branch.
#[instrument(skip(context, console))]
pub async fn add_datasource(
    context: &mut DataContext,
    console: &mut dyn Console,
) -> Result<DatasourceOutcome, GxError> {
    match console.select(DATA_KIND_PROMPT, &DATA_KINDS)? {
        0 => add_files_datasource(context, console).await,
        _ => add_sql_datasource(context, console).await,
    }
}

async fn add_sql_datasource(
    context: &mut DataContext,
    console: &mut dyn Console,
) -> Result<DatasourceOutcome, GxError> {
    let labels: Vec<&str> = Backend::ALL.iter().map(|b| b.label()).collect();
    let backend = Backend::ALL[console.select(BACKEND_PROMPT, &labels)?];

    let name = prompt_name(context, console, backend.default_name())?;
    console.say(&format!(
        "Next, we will configure database credentials and store them in the `{}` section of this config file: {}:",
        name,
        context.config_variables_display_path()
    ))?;

    let mut credentials = Mapping::new();
    if let Some(driver) = backend.drivername() {
        credentials.insert("drivername".into(), driver.into());
    }
    for field in backend.fields() {
        let answer = if field.key == "password" {
            console.secret(field.label)?
        } else {
            console.text(field.label, field.default)?
        };
        credentials.insert(field.key.into(), answer.into());
    }
    let url = credentials_to_url(&credentials)?;

    console.say(CONNECTING)?;
    let connected = match connect_url(&url) {
        Ok(connector) => connector.ping().await,
        Err(e) => Err(e),
    };
    match connected {
        Ok(()) => {}
        Err(e) if e.is_connection_failure() => {
            report_connection_failure(console, &e)?;
            return Ok(DatasourceOutcome::ConnectionFailed);
        }
        Err(e) => return Err(e),
    }
    console.say(CONNECTED)?;

    let mut stored = Mapping::new();
    stored.insert("url".into(), url.into());
    context.add_datasource(&name, DatasourceConfig::sql(&name), Some(stored))?;
    Ok(DatasourceOutcome::Added(name))
}

async fn add_files_datasource(
    context: &mut DataContext,
    console: &mut dyn Console,
) -> Result<DatasourceOutcome, GxError> {
    let project_dir = context.project_dir();
    let directory = loop {
        let answer = console.text(DIRECTORY_PROMPT, None)?;
        let candidate = resolve_dir(&project_dir, &answer)?;
        if candidate.is_dir() {
            break candidate;
        }
        console.say(&format!("The directory '{}' does not exist.", answer))?;
    };

    let dir_name = directory
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "data".to_string());
    let name = prompt_name(context, console, &format!("{}__dir", dir_name))?;

    let base_directory = context.layout().relative_to_project(&directory);
    context.add_datasource(&name, DatasourceConfig::files(&base_directory), None)?;
    Ok(DatasourceOutcome::Added(name))
}

fn resolve_dir(project_dir: &Path, answer: &str) -> Result<PathBuf, GxError> {
    let path = Path::new(answer);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    };
    Ok(std::path::absolute(joined)?)
}

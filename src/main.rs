//! Command-line front end for the failover dispatcher.
//!
//! Issues one request against the configured API endpoints and prints the
//! JSON response. Credentials are kept in a local JSON file between runs.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use api_dispatcher::config::{self, validation::validate_config, ConfigError, DispatcherConfig};
use api_dispatcher::endpoint::EndpointRegistry;
use api_dispatcher::observability::logging;
use api_dispatcher::{
    ApiResponse, CredentialStore, Credentials, DispatchError, DispatchResult, FailoverDispatcher,
    FileCredentialStore, Method, RequestOptions,
};

#[derive(Parser)]
#[command(name = "api-dispatcher")]
#[command(about = "Send requests to the admin API with endpoint failover", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Primary API base URL.
    #[arg(long)]
    primary: Option<String>,

    /// Secondary API base URL (repeatable, tried in order).
    #[arg(long = "secondary")]
    secondaries: Vec<String>,

    /// Per-endpoint timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum endpoints tried per request.
    #[arg(long)]
    max_attempts: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReadArgs {
    /// Path relative to the API base URL.
    path: String,

    /// Query parameter as key=value (repeatable).
    #[arg(short, long = "query", value_parser = parse_key_val)]
    query: Vec<(String, String)>,
}

#[derive(Args)]
struct WriteArgs {
    /// Path relative to the API base URL.
    path: String,

    /// JSON request body.
    #[arg(short, long)]
    data: Option<String>,

    /// Query parameter as key=value (repeatable).
    #[arg(short, long = "query", value_parser = parse_key_val)]
    query: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a resource
    Get(ReadArgs),
    /// DELETE a resource
    Delete(ReadArgs),
    /// POST a JSON body
    Post(WriteArgs),
    /// PUT a JSON body
    Put(WriteArgs),
    /// PATCH a JSON body
    Patch(WriteArgs),
    /// Store a bearer token (and optional user record)
    Login {
        #[arg(long)]
        token: String,
        /// User record as JSON.
        #[arg(long)]
        user: Option<String>,
    },
    /// Remove stored credentials
    Logout,
    /// Show the stored user record
    Whoami,
    /// List endpoints in the order they are tried
    Endpoints,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = resolve_config(&cli)?;
    logging::init(&config.observability)?;

    let store: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::new(&config.credentials.store_path));

    let descriptor = match cli.command {
        Commands::Login { token, user } => {
            login(store.as_ref(), &config, token, user)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Logout => {
            store.clear()?;
            println!("Credentials cleared");
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Whoami => {
            whoami(store.as_ref())?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Endpoints => {
            list_endpoints(&config);
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Get(args) => query_options(args.query).into_descriptor(Method::Get, args.path),
        Commands::Delete(args) => {
            query_options(args.query).into_descriptor(Method::Delete, args.path)
        }
        Commands::Post(args) => write_options(&args)?.into_descriptor(Method::Post, args.path),
        Commands::Put(args) => write_options(&args)?.into_descriptor(Method::Put, args.path),
        Commands::Patch(args) => write_options(&args)?.into_descriptor(Method::Patch, args.path),
    };

    let dispatcher = FailoverDispatcher::from_config(&config, store)?;

    report(dispatcher.request(descriptor).await)
}

/// Print the outcome of a dispatched call. A failed call is reported here
/// and only here.
fn report(result: DispatchResult<ApiResponse>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match result {
        Ok(response) => {
            print_response(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn login(
    store: &dyn CredentialStore,
    config: &DispatcherConfig,
    token: String,
    user: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut credentials = Credentials::new(token);
    if let Some(user) = user {
        credentials = credentials.with_user(parse_json("--user", &user)?);
    }
    store.set(credentials)?;
    println!("Credentials stored in {}", config.credentials.store_path);
    Ok(())
}

fn whoami(store: &dyn CredentialStore) -> Result<(), Box<dyn std::error::Error>> {
    match store.get()? {
        Some(credentials) => {
            let user = credentials.user.unwrap_or(Value::Null);
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

fn list_endpoints(config: &DispatcherConfig) {
    let registry = EndpointRegistry::from_config(&config.endpoints);
    for (i, endpoint) in registry.iter().enumerate() {
        let role = if i == 0 { "primary" } else { "secondary" };
        println!("{}\t{}\t{}", i + 1, role, endpoint.base_url());
    }
}

/// Defaults < config file < environment < command-line flags.
fn resolve_config(cli: &Cli) -> Result<DispatcherConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::from_env()?,
    };

    if let Some(primary) = &cli.primary {
        config.endpoints.primary = primary.clone();
    }
    if !cli.secondaries.is_empty() {
        config.endpoints.secondaries = cli.secondaries.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeouts.request_secs = timeout;
    }
    if cli.max_attempts.is_some() {
        config.dispatch.max_attempts = cli.max_attempts;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn query_options(query: Vec<(String, String)>) -> RequestOptions {
    query
        .into_iter()
        .fold(RequestOptions::new(), |opts, (k, v)| opts.query(k, v))
}

fn write_options(args: &WriteArgs) -> Result<RequestOptions, Box<dyn std::error::Error>> {
    let mut options = query_options(args.query.clone());
    if let Some(raw) = &args.data {
        options = options.data(parse_json("--data", raw)?);
    }
    Ok(options)
}

fn parse_json(flag: &str, raw: &str) -> Result<Value, Box<dyn std::error::Error>> {
    serde_json::from_str(raw).map_err(|e| format!("{} is not valid JSON: {}", flag, e).into())
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

fn print_response(response: &ApiResponse) -> Result<(), Box<dyn std::error::Error>> {
    match response.data() {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", response.text()),
    }
    Ok(())
}

fn print_error(error: &DispatchError) {
    eprintln!("{}", error.user_message());
    if let DispatchError::Http { body, .. } = error {
        if !body.trim().is_empty() {
            eprintln!("Response: {}", body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_failure_is_reported_not_propagated() {
        let err = DispatchError::Http {
            status: 500,
            base_url: "http://b".into(),
            url: "/jobs".into(),
            message: None,
            body: String::new(),
        };
        let code = report(Err(err)).unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn test_success_exit_code() {
        let response = ApiResponse::new(200, br#"{"id":1}"#.to_vec(), "http://a");
        let code = report(Ok(response)).unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::SUCCESS));
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("status=pending").unwrap(),
            ("status".to_string(), "pending".to_string())
        );
        assert!(parse_key_val("status").is_err());
    }
}

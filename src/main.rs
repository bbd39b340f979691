//! Command-line front end for the patta client.
//!
//! Loads configuration, sets up logging and a headless page host, then runs
//! one of: print a session token, validate document files, submit an
//! application, or list verification requests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use patta_client::config::validation::validate_config;
use patta_client::config::{load_config, ClientConfig, ConfigError};
use patta_client::observability::logging;
use patta_client::page::{check_file_input, HeadlessHost, PageHost};
use patta_client::upload::{DocumentField, DocumentFile, FormAccessor, StaticBoundary};
use patta_client::{submit_patta, FileValidator, PattaApi, Session, Uploader};

#[derive(Parser)]
#[command(name = "patta-client")]
#[command(about = "Submit and inspect patta applications", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend origin, overrides `api.base_url`.
    #[arg(short, long)]
    url: Option<String>,

    /// Cookie string for the session (e.g. "csrf_token=...; session=...").
    #[arg(long, env = "PATTA_COOKIES")]
    cookies: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the session token that would be sent
    Token,
    /// Check documents against the upload rules
    Validate {
        files: Vec<PathBuf>,
    },
    /// Submit a land record application
    Submit(SubmitArgs),
    /// List verification requests
    Requests,
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long)]
    district: String,
    #[arg(long)]
    taluk: String,
    #[arg(long)]
    village: String,
    #[arg(long, allow_hyphen_values = true)]
    lat: String,
    #[arg(long, allow_hyphen_values = true)]
    lng: String,
    #[arg(long)]
    survey_no: String,
    #[arg(long)]
    subdiv_no: String,

    /// JSON file holding `[[[lat, lng], ...], ...]`.
    #[arg(long)]
    boundary: PathBuf,

    #[arg(long)]
    parent_doc: Option<PathBuf>,
    #[arg(long)]
    sale_deed: Option<PathBuf>,
    #[arg(long)]
    aadhar_card: Option<PathBuf>,
    #[arg(long)]
    encumb_cert: Option<PathBuf>,
    #[arg(long)]
    layout_scan: Option<PathBuf>,
}

/// Form backed by command-line arguments and files on disk.
struct ArgsForm {
    fields: HashMap<&'static str, String>,
    documents: HashMap<DocumentField, DocumentFile>,
}

impl ArgsForm {
    fn load(args: &SubmitArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let fields = HashMap::from([
            ("district", args.district.clone()),
            ("taluk", args.taluk.clone()),
            ("village", args.village.clone()),
            ("lat", args.lat.clone()),
            ("lng", args.lng.clone()),
            ("surveyNo", args.survey_no.clone()),
            ("subdivNo", args.subdiv_no.clone()),
        ]);

        let mut documents = HashMap::new();
        for (field, path) in [
            (DocumentField::ParentDoc, &args.parent_doc),
            (DocumentField::SaleDeed, &args.sale_deed),
            (DocumentField::AadharCard, &args.aadhar_card),
            (DocumentField::EncumbCert, &args.encumb_cert),
            (DocumentField::LayoutScan, &args.layout_scan),
        ] {
            if let Some(path) = path {
                documents.insert(field, DocumentFile::from_path(path)?);
            }
        }

        Ok(Self { fields, documents })
    }
}

impl FormAccessor for ArgsForm {
    fn text(&self, field: &str) -> Option<String> {
        self.fields.get(field).cloned()
    }

    fn document(&self, field: DocumentField) -> Option<DocumentFile> {
        self.documents.get(&field).cloned()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.api.base_url = url.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability);
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    let session = Arc::new(Session::new(config.session.clone(), cli.cookies.clone()));
    let host: Arc<dyn PageHost> = Arc::new(HeadlessHost);

    match cli.command {
        Commands::Token => {
            println!("{}", session.token().as_str());
        }
        Commands::Validate { files } => {
            let validator = FileValidator::new(&config.validation);
            let mut failed = 0;
            for path in &files {
                if !validate_file(&validator, host.as_ref(), path)? {
                    failed += 1;
                }
            }
            if failed > 0 {
                return Err(format!("{failed} of {} files rejected", files.len()).into());
            }
        }
        Commands::Submit(args) => {
            let form = ArgsForm::load(&args)?;
            let boundary = StaticBoundary::from_json(&std::fs::read_to_string(&args.boundary)?)?;
            let validator = FileValidator::new(&config.validation);
            let uploader = Uploader::from_config(&config, session, host)?;

            let result = submit_patta(&form, &boundary, &validator, &uploader, &config.api.apply_path).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Requests => {
            let api = PattaApi::new(patta_client::SecureClient::new(&config, session, host)?);
            let list = api.list_requests().await?;
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }

    Ok(())
}

fn validate_file(validator: &FileValidator, host: &dyn PageHost, path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let document = DocumentFile::from_path(path)?;
    let accepted = check_file_input(validator, host, &path.display().to_string(), &document.descriptor);
    println!("{}\t{}", if accepted { "ok" } else { "rejected" }, path.display());
    Ok(accepted)
}

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use env_logger::Env;
use eventiq_certificates::service::RenderedCertificate;
use eventiq_certificates::builder::LazyRenderer;
use eventiq_certificates::{BulkMode, CertificateService, Config};
use log::info;
use serde::Serialize;

/// Generates EventIQ volunteer certificates from the command line.
///
/// Fonts are looked up under `--fonts-dir`, `EVENTIQ_FONTS_DIR` or `assets/fonts` when the first
/// certificate is rendered; when none of them hold the Roboto family a system family is used
/// instead.  Without `--roster` the sample volunteers are used.
#[derive(Parser)]
#[command(author, version, about = "EventIQ volunteer certificates")]
struct Cli {
    /// JSON array of volunteer records.
    #[arg(long, global = true)]
    roster: Option<PathBuf>,

    /// Directory containing the certificate fonts.
    #[arg(long, global = true)]
    fonts_dir: Option<PathBuf>,

    /// Event name printed on certificates.
    #[arg(long, global = true)]
    event_name: Option<String>,

    /// Issuing organization printed on certificates.
    #[arg(long, global = true)]
    organization: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List certificates for every volunteer with logged hours.
    #[command(name = "list", alias = "ls")]
    List,

    /// Show a volunteer's certificate eligibility.
    Info { id: u32 },

    /// Render the certificate of one volunteer.
    Generate {
        id: u32,
        /// Output file; defaults to `<Full_Name>_Certificate.pdf`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Render a certificate by its identifier, e.g. `CERT-1-202503`.
    Download {
        certificate_id: String,
        /// Output file; defaults to `<certificate-id>.pdf`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Report, and optionally render, certificates for all active volunteers.
    Bulk {
        /// Render every eligible certificate instead of only reporting them.
        #[arg(long)]
        render: bool,
        /// Directory for rendered certificates.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Print roster statistics.
    Stats,
}

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = Config::from_env();
    if cli.roster.is_some() {
        config.roster = cli.roster;
    }
    if cli.fonts_dir.is_some() {
        config.fonts_dir = cli.fonts_dir;
    }
    if let Some(event_name) = cli.event_name {
        config.request.event_name = event_name;
    }
    if let Some(organization) = cli.organization {
        config.request.organization = organization;
    }

    let roster = config.load_roster()?;
    let renderer = LazyRenderer::new(config.renderer());
    let service = CertificateService::new(roster, renderer).with_request(config.request.clone());

    match cli.command {
        Commands::List => print_json(&service.certificates())?,
        Commands::Info { id } => print_json(&service.volunteer_info(id)?)?,
        Commands::Generate { id, output } => {
            let certificate = service.generate(id)?;
            write_certificate(&certificate, output.as_deref())?;
        }
        Commands::Download {
            certificate_id,
            output,
        } => {
            let certificate = service.download(&certificate_id)?;
            write_certificate(&certificate, output.as_deref())?;
        }
        Commands::Bulk { render, output_dir } => {
            let mode = if render {
                BulkMode::Render
            } else {
                BulkMode::StatsOnly
            };
            let report = service.bulk_generate(mode)?;
            if !report.documents.is_empty() {
                fs::create_dir_all(&output_dir)?;
            }
            for certificate in &report.documents {
                let path = output_dir.join(&certificate.file_name);
                write_certificate(certificate, Some(path.as_path()))?;
            }
            print_json(&report)?;
        }
        Commands::Stats => print_json(&service.stats())?,
    }

    Ok(())
}

fn write_certificate(
    certificate: &RenderedCertificate,
    output: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&certificate.file_name));
    fs::write(&path, &certificate.bytes)?;
    info!(
        "Wrote certificate {} to {}",
        certificate.certificate_id,
        path.display()
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

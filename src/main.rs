//! # Folio CLI
//!
//! Command-line interface for the print layout designer.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the designer API
//! folio serve --listen 0.0.0.0:8080 --data fixture.json --templates ./templates
//!
//! # Print a saved template against fixture data, one page per record
//! folio print --template invoice.json --data fixture.json --out invoice.html
//! ```
//!
//! Set `RUST_LOG=folio=debug` for gesture and fetch logging.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use folio::{
    FolioError,
    config::{CanvasConfig, PrintConfig},
    host::{self, MemoryHost},
    print,
    server::{self, ServerConfig},
    store::Template,
    value::RecordView,
};

/// Folio - print layout designer
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the designer HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Host fixture file with tables, fields and records
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Directory templates are saved in
        #[arg(long, value_name = "DIR", default_value = "templates")]
        templates: PathBuf,
    },

    /// Print a template to HTML
    Print {
        /// Template file: one template object, or a saved template list
        #[arg(long, value_name = "FILE")]
        template: PathBuf,

        /// Host fixture file with the template's table
        #[arg(long, value_name = "FILE")]
        data: PathBuf,

        /// Template to pick by name when the file holds a list
        #[arg(long)]
        name: Option<String>,

        /// Only print these record ids (repeatable)
        #[arg(long = "record", value_name = "ID")]
        records: Vec<String>,

        /// Output file (defaults to stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), FolioError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            data,
            templates,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(ServerConfig {
                listen_addr: listen,
                data_path: data,
                templates_dir: templates,
            }))
        }
        Commands::Print {
            template,
            data,
            name,
            records,
            out,
        } => {
            let template = read_template(&template, name.as_deref())?;
            let host = MemoryHost::load(&data)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let html = runtime.block_on(print_template(&template, &host, &records));

            match out {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => println!("{}", html),
            }
            Ok(())
        }
    }
}

/// Read a template file holding either one template or a saved list.
fn read_template(path: &Path, name: Option<&str>) -> Result<Template, FolioError> {
    let data = std::fs::read_to_string(path)?;
    if let Ok(template) = serde_json::from_str::<Template>(&data) {
        return Ok(template);
    }
    let templates: Vec<Template> = serde_json::from_str(&data)?;
    let found = match name {
        Some(name) => templates.into_iter().find(|t| t.name == name),
        None => templates.into_iter().next(),
    };
    found.ok_or_else(|| {
        FolioError::NotFound(format!(
            "template {} in {}",
            name.unwrap_or("(first)"),
            path.display()
        ))
    })
}

/// Compile a template to HTML with one page per record of its table.
async fn print_template(template: &Template, host: &MemoryHost, only: &[String]) -> String {
    let print_config = PrintConfig::DEFAULT;
    let fields = host::fields_or_empty(host, &template.table_id).await;
    let records =
        host::records_or_empty(host, &template.table_id, print_config.record_page_size).await;
    let data = print::gather(&template.components, host, &print_config).await;

    let mut views: Vec<RecordView<'_>> = records
        .iter()
        .filter(|r| only.is_empty() || only.contains(&r.id))
        .map(|r| RecordView::new(&fields, Some(r)))
        .collect();
    if views.is_empty() {
        views.push(RecordView::new(&fields, None));
    }

    print::compile(
        &template.components,
        &data,
        &views,
        &CanvasConfig::DEFAULT,
        &print_config,
    )
    .to_html()
}

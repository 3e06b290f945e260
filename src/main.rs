use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use outline_report::{Report, ReportConfig};
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Outline workbook
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,

    /// Directory holding the markdown and DOCX text assets
    #[arg(long, global = true)]
    text_dir: Option<PathBuf>,

    /// Template to use instead of the built-in one
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// Where the rendered page is written
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the page once and exit
    Render,
    /// Serve the page, re-rendering it on every request
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: String,
    },
}

impl Cli {
    fn config(&self) -> ReportConfig {
        let defaults = ReportConfig::default();
        ReportConfig {
            workbook: self.workbook.clone().unwrap_or(defaults.workbook),
            text_dir: self.text_dir.clone().unwrap_or(defaults.text_dir),
            template: self.template.clone().or(defaults.template),
            output: self.output.clone().unwrap_or(defaults.output),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.config();

    let result = match cli.command.unwrap_or(Command::Render) {
        Command::Render => outline_report::build_report(&config).map_err(|e| e.to_string()),
        Command::Serve { addr } => serve(&config, &addr),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn serve(config: &ReportConfig, addr: &str) -> Result<(), String> {
    let report = Report::load(config).map_err(|e| e.to_string())?;
    let server = Server::http(addr).map_err(|e| format!("cannot listen on {addr}: {e}"))?;
    let html_type: Header = "Content-Type: text/html; charset=utf-8"
        .parse()
        .map_err(|_| "invalid content type header".to_string())?;

    log::info!("Serving on http://{addr}/");

    for request in server.incoming_requests() {
        let path = request.url().split('?').next().unwrap_or("").to_string();
        log::info!("{} {}", request.method(), request.url());

        let outcome = if request.method() != &Method::Get {
            respond(request, Response::from_string("Method Not Allowed").with_status_code(405))
        } else if path != "/" {
            respond(request, Response::from_string("Not Found").with_status_code(404))
        } else {
            match report.publish() {
                Ok(html) => respond(request, Response::from_string(html).with_header(html_type.clone())),
                Err(e) => {
                    log::error!("Rendering failed: {e}");
                    respond(
                        request,
                        Response::from_string(format!("Rendering failed: {e}")).with_status_code(500),
                    )
                }
            }
        };

        if let Err(e) = outcome {
            log::warn!("Failed to send response: {e}");
        }
    }

    Ok(())
}

fn respond<R: std::io::Read>(request: Request, response: Response<R>) -> std::io::Result<()> {
    request.respond(response)
}

mod build;
mod logging;
mod preview;
mod server;
mod server_utils;

use std::{path::PathBuf, process::ExitCode, time::Duration};

use build::start_build;
use clap::{Args, Parser, Subcommand};
use gazette::{
    GazetteOptions, api::StaticSource, errors::GazetteError, new_store, sitemap::SitemapOptions, store::BlogStore,
};
use logging::init_logging;
use preview::start_preview_web_server;
use server::{AppState, start_server};
use tracing::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Do not print any log
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Base URL of the blog API [default: $GAZETTE_API_URL, or http://localhost:8080/api/blogs/v1]
    #[arg(long)]
    api: Option<String>,

    /// Read blogs from a JSON file instead of the API
    #[arg(long, conflicts_with = "api")]
    fixtures: Option<PathBuf>,

    /// API request timeout, in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Articles per listing page
    #[arg(long)]
    per_page: Option<usize>,

    /// Public URL of the site, used in share links and sitemaps
    #[arg(long)]
    base_url: Option<String>,
}

impl SourceArgs {
    fn options(&self) -> GazetteOptions {
        let mut options = GazetteOptions::default();

        if let Some(api) = &self.api {
            options.api_base_url = api.clone();
        }
        if let Some(per_page) = self.per_page.filter(|per_page| *per_page > 0) {
            options.items_per_page = per_page;
        }
        options.request_timeout = Duration::from_secs(self.timeout);
        options.base_url = self.base_url.clone();

        options
    }

    fn open_store(&self, options: &GazetteOptions) -> Result<BlogStore, GazetteError> {
        match &self.fixtures {
            Some(path) => Ok(BlogStore::new(StaticSource::from_json_file(path)?)),
            None => Ok(new_store(options)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the reader, fetching blogs on demand
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Listen on every interface instead of localhost only
        #[arg(long)]
        host: bool,

        /// First port to try, the next free one is used if it is taken
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Export the reader as a static site
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory
        #[arg(long, default_value = "dist")]
        out: PathBuf,

        /// Keep the existing content of the output directory
        #[arg(long)]
        no_clean: bool,
    },
    /// Serve a static export
    Preview {
        /// Directory written by `gazette build`
        #[arg(long, default_value = "dist")]
        dir: PathBuf,

        #[arg(long)]
        host: bool,

        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.quiet);

    let result = match cli.command {
        Commands::Serve { source, host, port } => {
            let options = source.options();
            match source.open_store(&options) {
                Ok(store) => start_server(AppState::new(store, options), host, port)
                    .await
                    .map_err(GazetteError::from),
                Err(err) => Err(err),
            }
        }
        Commands::Build {
            source,
            out,
            no_clean,
        } => {
            let mut options = source.options();
            options.output_dir = out;
            options.clean_output_dir = !no_clean;
            options.sitemap = SitemapOptions {
                enabled: options.base_url.is_some(),
                ..Default::default()
            };

            match source.open_store(&options) {
                Ok(store) => tokio::task::spawn_blocking(move || start_build(store, &options))
                    .await
                    .unwrap_or_else(|err| Err(std::io::Error::other(err).into())),
                Err(err) => Err(err),
            }
        }
        Commands::Preview { dir, host, port } => {
            if !dir.exists() {
                error!(name: "preview", "{} does not exist. Please run `gazette build` first.", dir.display());
                return ExitCode::FAILURE;
            }

            start_preview_web_server(&dir, host, port)
                .await
                .map_err(GazetteError::from)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(name: "gazette", "{}", err);
            ExitCode::FAILURE
        }
    }
}

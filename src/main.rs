//! CLI entry point for btf-content

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use btf_content::commands::new::NewArticle;
use btf_content::commands::show::ShowOptions;

#[derive(Parser)]
#[command(name = "btf-content")]
#[command(version)]
#[command(about = "Article library tooling for the Better than Freehold site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List articles, categories or audiences
    List {
        /// Type of content to list (post, featured, category, audience)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only show articles visible to this role
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Show a single article
    Show {
        /// Article slug (file name without extension)
        slug: String,

        /// View the article as this role
        #[arg(short, long)]
        role: Option<String>,

        /// Print the table of contents and FAQ
        #[arg(long)]
        toc: bool,

        /// Print the body rendered to HTML
        #[arg(long)]
        html: bool,
    },

    /// Create a new article
    New {
        /// Title of the new article
        title: String,

        /// Short description
        #[arg(long)]
        description: Option<String>,

        /// Target audience (BUYER, ACCOUNTANT, DEVELOPER, LAWYER, EXISTING_PROPERTY_OWNER, GENERAL)
        #[arg(short, long)]
        audience: Option<String>,

        /// Comma-separated categories
        #[arg(short = 'C', long)]
        categories: Option<String>,
    },

    /// Generate sitemap, robots.txt and JSON indexes
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Serve the JSON API and generated files
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Normalize article front-matter and separators
    Fix {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove generated files
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "btf_content=debug,info"
    } else {
        "btf_content=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let site = btf_content::Site::new(&base_dir)?;

    match cli.command {
        Commands::List { r#type, role } => {
            btf_content::commands::list::run(&site, &r#type, role.as_deref())?;
        }

        Commands::Show {
            slug,
            role,
            toc,
            html,
        } => {
            let options = ShowOptions { toc, html };
            btf_content::commands::show::run(&site, &slug, role.as_deref(), options)?;
        }

        Commands::New {
            title,
            description,
            audience,
            categories,
        } => {
            let article = NewArticle {
                title: &title,
                description: description.as_deref(),
                audience: audience.as_deref(),
                categories: categories.as_deref(),
            };
            let path = btf_content::commands::new::create_post(&site, &article)?;
            println!("Created: {:?}", path);
        }

        Commands::Generate { watch } => {
            tracing::info!("Generating outputs...");
            site.generate()?;
            println!("Generated successfully!");

            if watch {
                btf_content::commands::generate::watch(&site).await?;
            }
        }

        Commands::Serve { port, ip } => {
            tracing::info!("Starting server at http://{}:{}", ip, port);
            btf_content::server::start(&site, &ip, port).await?;
        }

        Commands::Fix { dry_run } => {
            let report = btf_content::commands::fix::run(&site, dry_run)?;
            let verb = if dry_run { "Would fix" } else { "Fixed" };
            println!(
                "{} {} file(s), {} already clean, {} failed",
                verb,
                report.changed.len(),
                report.unchanged,
                report.failed.len()
            );
            for (path, reason) in &report.failed {
                println!("  {:?}: {}", path, reason);
            }
        }

        Commands::Clean => {
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}

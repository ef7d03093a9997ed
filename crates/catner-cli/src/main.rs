//! catner CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::edit::{Edit, EditTarget};

#[derive(Parser)]
#[command(name = "catner")]
#[command(version)]
#[command(about = "Build, inspect and edit BMEcat product catalogs", long_about = None)]
struct Cli {
    /// TOML file overriding the catalog defaults (units, MIME type, indent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Catalog file to edit, and where to write the result.
#[derive(Args)]
struct Target {
    /// Catalog file
    file: PathBuf,

    /// Write the result to FILE instead of back to the input ('-' for stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl From<Target> for EditTarget {
    fn from(target: Target) -> Self {
        EditTarget {
            file: target.file,
            output: target.output,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the sample catalog
    Demo {
        /// Write the catalog to FILE (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Summarize the articles of a catalog
    Inspect {
        /// Catalog file
        file: PathBuf,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a catalog, creating missing mandatory elements, and save it
    Amend {
        #[command(flatten)]
        target: Target,
    },

    /// Set the catalog language (two characters)
    SetLocale {
        #[command(flatten)]
        target: Target,
        locale: String,
    },

    /// Add a territory code (two characters)
    AddTerritory {
        #[command(flatten)]
        target: Target,
        territory: String,
    },

    /// Add an article
    AddArticle {
        #[command(flatten)]
        target: Target,
        aid: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        descr: Option<String>,
    },

    /// Attach an image to an article
    AddImage {
        #[command(flatten)]
        target: Target,
        aid: String,
        path: String,
        #[arg(long)]
        mime: Option<String>,
    },

    /// Associate an article with a category
    AddCategory {
        #[command(flatten)]
        target: Target,
        aid: String,
        category: String,
    },

    /// Add or update an order unit
    AddUnit {
        #[command(flatten)]
        target: Target,
        aid: String,
        code: Option<String>,
        #[arg(long)]
        factor: Option<String>,
        /// Make this the article's main unit
        #[arg(long)]
        main: bool,
    },

    /// Add a feature to an article
    AddFeature {
        #[command(flatten)]
        target: Target,
        aid: String,
        fid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        descr: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        value: Option<String>,
    },

    /// Add a variant to a feature
    AddVariant {
        #[command(flatten)]
        target: Target,
        aid: String,
        fid: String,
        vid: String,
        value: String,
    },

    /// Delete an article
    DeleteArticle {
        #[command(flatten)]
        target: Target,
        aid: String,
    },

    /// Delete a feature and renumber the remaining ones
    DeleteFeature {
        #[command(flatten)]
        target: Target,
        aid: String,
        fid: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for catalog output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let defaults = commands::load_defaults(cli.config.as_deref())?;

    let (target, edit) = match cli.command {
        Commands::Demo { output } => return commands::demo::execute(output.as_deref(), defaults),
        Commands::Inspect { file, json } => return commands::inspect::execute(&file, json),
        Commands::Amend { target } => return commands::amend::execute(target.into(), defaults),
        Commands::SetLocale { target, locale } => (target, Edit::SetLocale { locale }),
        Commands::AddTerritory { target, territory } => (target, Edit::AddTerritory { territory }),
        Commands::AddArticle {
            target,
            aid,
            title,
            descr,
        } => (target, Edit::AddArticle { aid, title, descr }),
        Commands::AddImage {
            target,
            aid,
            path,
            mime,
        } => (target, Edit::AddImage { aid, path, mime }),
        Commands::AddCategory {
            target,
            aid,
            category,
        } => (target, Edit::AddCategory { aid, category }),
        Commands::AddUnit {
            target,
            aid,
            code,
            factor,
            main,
        } => (
            target,
            Edit::AddUnit {
                aid,
                code,
                factor,
                main,
            },
        ),
        Commands::AddFeature {
            target,
            aid,
            fid,
            name,
            descr,
            unit,
            value,
        } => {
            let spec = catner::FeatureSpec {
                fid,
                name,
                descr,
                unit,
                value,
            };
            (target, Edit::AddFeature { aid, spec })
        }
        Commands::AddVariant {
            target,
            aid,
            fid,
            vid,
            value,
        } => (
            target,
            Edit::AddVariant {
                aid,
                fid,
                vid,
                value,
            },
        ),
        Commands::DeleteArticle { target, aid } => (target, Edit::DeleteArticle { aid }),
        Commands::DeleteFeature { target, aid, fid } => (target, Edit::DeleteFeature { aid, fid }),
    };

    commands::edit::execute(target.into(), &edit, defaults)
}

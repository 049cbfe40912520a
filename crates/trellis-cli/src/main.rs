use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use trellis_core::share::DEFAULT_PARAM;
use trellis_core::{
    CategoryFilter, Document, ShareError, export_file, parse_standalone, share, templates,
};

#[derive(Parser)]
#[command(version, about = "Trellis - HTML/CSS/JS playground tools", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the template gallery
    Templates {
        /// Category to show (`all`, `components`, `business`, `landing`, `portfolio`)
        #[arg(long, default_value = "all")]
        category: String,

        /// Case-insensitive text to find in names and descriptions
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Write a document as a standalone index.html
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file
        #[arg(short, long, default_value = "index.html")]
        output: PathBuf,
    },
    /// Split an exported index.html back into its three buffers
    Unpack {
        /// File produced by `trellis export` or the playground's download
        input: PathBuf,

        /// Directory for index.html / style.css / script.js; prints JSON when omitted
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Build or read share links
    Share {
        #[command(subcommand)]
        command: ShareCommand,
    },
}

#[derive(Subcommand)]
enum ShareCommand {
    /// Print a share link for a document
    Encode {
        #[command(flatten)]
        source: SourceArgs,

        /// Page address the link points at
        #[arg(long, env = "TRELLIS_PAGE_URL", default_value = "http://localhost:8080/")]
        page_url: String,

        /// Query parameter carrying the payload
        #[arg(long, default_value = DEFAULT_PARAM)]
        param: String,
    },
    /// Print the document carried by a share link (or a bare payload) as JSON
    Decode {
        link: String,

        #[arg(long, default_value = DEFAULT_PARAM)]
        param: String,
    },
}

/// Where a document comes from: a gallery template, or up to three files.
#[derive(Args)]
struct SourceArgs {
    /// Template key, e.g. `card`
    #[arg(long, conflicts_with_all = ["html", "css", "js"])]
    template: Option<String>,

    #[arg(long)]
    html: Option<PathBuf>,

    #[arg(long)]
    css: Option<PathBuf>,

    #[arg(long)]
    js: Option<PathBuf>,
}

impl SourceArgs {
    fn load(&self) -> Result<Document> {
        if let Some(key) = &self.template {
            let template = templates::find(key).ok_or_else(|| {
                miette::miette!(
                    help = "run `trellis templates` to see the keys",
                    "unknown template `{key}`"
                )
            })?;
            return Ok(template.document());
        }
        if self.html.is_none() && self.css.is_none() && self.js.is_none() {
            return Ok(Document::starter());
        }
        Ok(Document::new(
            read_optional(self.html.as_deref())?,
            read_optional(self.css.as_deref())?,
            read_optional(self.js.as_deref())?,
        ))
    }
}

fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading {}", path.display())),
        None => Ok(String::new()),
    }
}

fn main() -> Result<()> {
    init_miette();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Templates { category, search } => list_templates(&category, &search)?,
        Commands::Export { source, output } => {
            let doc = source.load()?;
            let file = export_file(&doc);
            std::fs::write(&output, &file.contents)
                .into_diagnostic()
                .wrap_err_with(|| format!("writing {}", output.display()))?;
            tracing::info!(bytes = file.contents.len(), "exported");
            println!("✓ Output: {}", output.display());
        }
        Commands::Unpack { input, out_dir } => unpack(&input, out_dir.as_deref())?,
        Commands::Share { command } => match command {
            ShareCommand::Encode {
                source,
                page_url,
                param,
            } => {
                let doc = source.load()?;
                println!("{}", share::share_url_with(&page_url, &param, &doc)?);
            }
            ShareCommand::Decode { link, param } => {
                let doc = decode_link(&link, &param)?;
                println!("{}", serde_json::to_string_pretty(&doc).into_diagnostic()?);
            }
        },
    }

    Ok(())
}

fn list_templates(category: &str, search: &str) -> Result<()> {
    let filter = CategoryFilter::from_name(category)
        .ok_or_else(|| miette::miette!("unknown category `{category}`"))?;
    let found = templates::filter(filter, search);
    if found.is_empty() {
        println!("No templates found.");
        return Ok(());
    }
    let width = found.iter().map(|t| t.key.len()).max().unwrap_or(0);
    for t in found {
        println!(
            "{:<width$}  {:<10}  {} - {}",
            t.key,
            t.category.as_str(),
            t.name,
            t.description
        );
    }
    Ok(())
}

fn unpack(input: &Path, out_dir: Option<&Path>) -> Result<()> {
    let html = std::fs::read_to_string(input)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", input.display()))?;
    let doc = parse_standalone(&html)?;

    let Some(dir) = out_dir else {
        println!("{}", serde_json::to_string_pretty(&doc).into_diagnostic()?);
        return Ok(());
    };
    std::fs::create_dir_all(dir).into_diagnostic()?;
    for (name, text) in [
        ("index.html", &doc.markup),
        ("style.css", &doc.styling),
        ("script.js", &doc.scripting),
    ] {
        let path = dir.join(name);
        std::fs::write(&path, text)
            .into_diagnostic()
            .wrap_err_with(|| format!("writing {}", path.display()))?;
    }
    println!("✓ Output: {}", dir.display());
    Ok(())
}

/// Accept a full link, or the payload alone.
fn decode_link(link: &str, param: &str) -> trellis_core::Result<Document> {
    if link.contains("://") {
        let (decoded, _) = share::take_shared_with(link, param)
            .ok_or_else(|| ShareError::MissingParam(param.to_string()))?;
        return Ok(decoded?);
    }
    Ok(share::decode(link.trim())?)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn init_miette() {
    let hooked = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }));
    if hooked.is_ok() {
        miette::set_panic_hook();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_template_source() {
        let source = SourceArgs {
            template: Some("card".into()),
            html: None,
            css: None,
            js: None,
        };
        let doc = source.load().unwrap();
        assert_eq!(doc, templates::find("card").unwrap().document());
    }

    #[test]
    fn test_empty_source_is_starter() {
        let source = SourceArgs {
            template: None,
            html: None,
            css: None,
            js: None,
        };
        assert_eq!(source.load().unwrap(), Document::starter());
    }

    #[test]
    fn test_decode_link_and_payload() {
        let doc = Document::new("<p>x</p>", "p{}", "go()");
        let link = share::share_url("https://play.example/", &doc).unwrap();
        assert_eq!(decode_link(&link, "code").unwrap(), doc);
        assert_eq!(decode_link(&share::encode(&doc), "code").unwrap(), doc);
        assert!(matches!(
            decode_link("https://play.example/?other=1", "code"),
            Err(trellis_core::TrellisError::Share(ShareError::MissingParam(_)))
        ));
    }
}

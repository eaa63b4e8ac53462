//! Command-line access to the site's content.
//!
//! Reads go straight to the configured record store; `contact` goes through
//! the running server's `/api/contact` like the site's own form does.
//!
//! ## Usage
//!
//! ```bash
//! folio-cli list projects --category Academic
//! folio-cli upload ~/Pictures/site-visits
//! folio-cli avatar me.png
//! folio-cli contact --name Jane --email jane@example.com --subject Hi --message Hello
//! ```

use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};

use folio::config::Config;
use folio::db::{self, Store};
use folio::ingest::discovery::discover_images;
use folio::ingest::DroppedFile;
use folio::listing::{CategoryFilter, Listing, BLOG_CATEGORIES, PORTFOLIO_CATEGORIES};
use folio::logging;
use folio::pages::{
    AvatarUpdate, BlogPage, ContactClient, ContactField, ContactForm, GalleryPage, HomePage, NoticeKind,
    PortfolioPage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListTarget {
    Projects,
    Gallery,
    Blog,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List {
        target: ListTarget,
        category: Option<String>,
    },
    Upload {
        paths: Vec<PathBuf>,
    },
    Avatar {
        path: PathBuf,
    },
    Contact {
        name: String,
        email: String,
        subject: String,
        message: String,
    },
}

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    config_path: Option<PathBuf>,
    command: Command,
}

#[derive(Debug, PartialEq, Eq)]
enum Parsed {
    Run(CliArgs),
    Help,
    Version,
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_args(args: &[String]) -> Result<Parsed, String> {
    let mut config_path = None;
    let mut category = None;
    let mut contact = [None, None, None, None];
    let mut positional = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(Parsed::Help),
            "--version" | "-V" => return Ok(Parsed::Version),
            "--config" | "-c" => config_path = Some(PathBuf::from(take_value(args, &mut i, "--config")?)),
            "--category" => category = Some(take_value(args, &mut i, "--category")?),
            "--name" => contact[0] = Some(take_value(args, &mut i, "--name")?),
            "--email" => contact[1] = Some(take_value(args, &mut i, "--email")?),
            "--subject" => contact[2] = Some(take_value(args, &mut i, "--subject")?),
            "--message" => contact[3] = Some(take_value(args, &mut i, "--message")?),
            other if other.starts_with('-') => return Err(format!("Unknown argument: {}", other)),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let Some((name, rest)) = positional.split_first() else {
        return Err("Missing command".to_string());
    };

    let command = match name.as_str() {
        "list" => {
            let target = match rest {
                [t] if t == "projects" => ListTarget::Projects,
                [t] if t == "gallery" => ListTarget::Gallery,
                [t] if t == "blog" => ListTarget::Blog,
                _ => return Err("list expects one of: projects, gallery, blog".to_string()),
            };
            Command::List { target, category }
        }
        "upload" => {
            if rest.is_empty() {
                return Err("upload expects at least one file or directory".to_string());
            }
            Command::Upload {
                paths: rest.iter().map(PathBuf::from).collect(),
            }
        }
        "avatar" => match rest {
            [path] => Command::Avatar {
                path: PathBuf::from(path),
            },
            _ => return Err("avatar expects exactly one file".to_string()),
        },
        "contact" => {
            let [name, email, subject, message] = contact;
            Command::Contact {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                subject: subject.unwrap_or_default(),
                message: message.unwrap_or_default(),
            }
        }
        other => return Err(format!("Unknown command: {}", other)),
    };

    Ok(Parsed::Run(CliArgs { config_path, command }))
}

fn print_help() {
    println!(
        r#"folio-cli - Manage portfolio content from the command line

USAGE:
    folio-cli [OPTIONS] <COMMAND>

COMMANDS:
    list projects|gallery|blog [--category C]   List content, optionally filtered
                                                ("All" lists every project or post)
    upload <FILES or DIRECTORIES>...            Add images to the gallery
    avatar <FILE>                               Replace the profile picture
    contact --name N --email E --subject S --message M
                                                Send a message through the site's contact form

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    FOLIO_CONFIG        Path to config file (overrides default location)
    FOLIO_STORE_URL     Hosted store base URL
    FOLIO_STORE_KEY     Hosted store API key
    FOLIO_LOG           Log level (trace, debug, info, warn, error)
"#
    );
}

fn print_listing<T>(listing: Listing<T>, line: impl Fn(&T) -> String) {
    match listing {
        Listing::Items { items } => items.iter().for_each(|item| println!("{}", line(item))),
        Listing::Empty { message } => println!("{}", message),
    }
}

async fn list(store: &Store, target: ListTarget, category: Option<String>) -> Result<()> {
    match target {
        ListTarget::Projects => {
            let filter = CategoryFilter::from_fixed_query(category, PORTFOLIO_CATEGORIES);
            let mut page = PortfolioPage::new();
            page.load(store).await;
            if !page.select(filter.clone()) {
                bail!("Unknown project category: {}", filter);
            }
            print_listing(page.view().projects, |card| {
                format!("{:<32} {:<20} {}", card.slug, card.category, card.duration)
            });
        }
        ListTarget::Blog => {
            let filter = CategoryFilter::from_fixed_query(category, BLOG_CATEGORIES);
            let mut page = BlogPage::new();
            page.load(store).await;
            if !page.select(filter.clone()) {
                bail!("Unknown blog category: {}", filter);
            }
            print_listing(page.view().posts, |card| {
                format!(
                    "{:<14} {:<40} {:<18} {}",
                    card.date.as_deref().unwrap_or("-"),
                    card.title,
                    card.category,
                    card.read_time
                )
            });
        }
        ListTarget::Gallery => {
            let filter = CategoryFilter::from_query(category);
            let mut page = GalleryPage::new();
            page.load(store).await;
            if !page.select(filter.clone()) {
                bail!("No gallery images in category: {}", filter);
            }
            print_listing(page.view().images, |image| {
                format!(
                    "{:>4} {:<40} {}",
                    image.order,
                    image.title.as_deref().unwrap_or("(untitled)"),
                    image.effective_category()
                )
            });
        }
    }

    Ok(())
}

async fn upload(store: &Store, paths: &[PathBuf]) -> Result<()> {
    let files: Vec<DroppedFile> = discover_images(paths)
        .iter()
        .map(|path| DroppedFile::from_path(path))
        .collect();
    if files.is_empty() {
        bail!("No images found");
    }

    let mut page = GalleryPage::new();
    page.load(store).await;
    let report = page.ingest(store, files).await;

    for name in &report.inserted {
        println!("added    {}", name);
    }
    for (name, reason) in &report.rejected {
        println!("skipped  {} ({})", name, reason);
    }
    for (name, error) in &report.failed {
        println!("failed   {} ({})", name, error);
    }

    if report.inserted.is_empty() {
        bail!("No images were added");
    }
    println!("Gallery now holds {} images", page.images().len());
    Ok(())
}

async fn avatar(store: &Store, config: &Config, path: &Path) -> Result<()> {
    let mut page = HomePage::new(config.site.clone());
    page.load(store).await;

    match page.upload_avatar(store, vec![DroppedFile::from_path(path)]).await? {
        AvatarUpdate::Updated => {
            println!("Avatar updated");
            Ok(())
        }
        AvatarUpdate::NoProfile => bail!("No profile to update"),
        AvatarUpdate::Rejected(rejected) => {
            let reasons: Vec<String> = rejected.iter().map(|r| format!("{}: {}", r.name(), r.reason())).collect();
            Err(anyhow!("Avatar rejected ({})", reasons.join(", ")))
        }
    }
}

async fn contact(config: &Config, fields: [(ContactField, String); 4]) -> Result<()> {
    let mut form = ContactForm::new();
    for (field, value) in &fields {
        form.set(*field, value);
    }

    let client = ContactClient::from_config(&config.contact);
    let notice = form.submit(&client).await.map_err(|blocked| anyhow!("Not sent: {}", blocked))?;

    println!("{}: {}", notice.title, notice.description);
    if notice.kind == NoticeKind::Error {
        bail!("Contact message was not delivered");
    }
    Ok(())
}

fn open_store(config: &Config) -> Result<Store> {
    let backend = db::open_backend(&config.store).context("Failed to open record store")?;
    Ok(Store::new(backend, config.store.timeout()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(Parsed::Run(cli)) => cli,
        Ok(Parsed::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Parsed::Version) => {
            println!("folio-cli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            print_help();
            std::process::exit(1);
        }
    };

    logging::init_stderr()?;

    let config = match &cli.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::List { target, category } => list(&open_store(&config)?, target, category).await,
        Command::Upload { paths } => upload(&open_store(&config)?, &paths).await,
        Command::Avatar { path } => avatar(&open_store(&config)?, &config, &path).await,
        Command::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let fields = [
                (ContactField::Name, name),
                (ContactField::Email, email),
                (ContactField::Subject, subject),
                (ContactField::Message, message),
            ];
            contact(&config, fields).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        std::iter::once("folio-cli")
            .chain(line.split_whitespace())
            .map(String::from)
            .collect()
    }

    fn command(line: &str) -> Command {
        match parse_args(&args(line)) {
            Ok(Parsed::Run(cli)) => cli.command,
            other => panic!("unexpected parse result {:?}", other),
        }
    }

    #[test]
    fn test_list_with_category() {
        assert_eq!(
            command("list projects --category Academic"),
            Command::List {
                target: ListTarget::Projects,
                category: Some("Academic".to_string())
            }
        );
        assert_eq!(
            command("list gallery"),
            Command::List {
                target: ListTarget::Gallery,
                category: None
            }
        );
        assert!(parse_args(&args("list photos")).is_err());
    }

    #[test]
    fn test_upload_and_avatar() {
        assert_eq!(
            command("upload a.png pics"),
            Command::Upload {
                paths: vec![PathBuf::from("a.png"), PathBuf::from("pics")]
            }
        );
        assert!(parse_args(&args("upload")).is_err());
        assert!(parse_args(&args("avatar a.png b.png")).is_err());
    }

    #[test]
    fn test_contact_fields() {
        assert_eq!(
            command("contact --name Jane --email jane@x.com --subject Hi --message Hello"),
            Command::Contact {
                name: "Jane".to_string(),
                email: "jane@x.com".to_string(),
                subject: "Hi".to_string(),
                message: "Hello".to_string(),
            }
        );
        assert!(parse_args(&args("contact --name")).is_err());
    }

    #[test]
    fn test_global_flags() {
        assert_eq!(parse_args(&args("--help")), Ok(Parsed::Help));
        assert_eq!(parse_args(&args("-V list blog")), Ok(Parsed::Version));

        let Ok(Parsed::Run(cli)) = parse_args(&args("-c /tmp/folio.toml list blog")) else {
            panic!("expected a command");
        };
        assert_eq!(cli.config_path, Some(PathBuf::from("/tmp/folio.toml")));
        assert!(parse_args(&args("--bogus list blog")).is_err());
        assert!(parse_args(&args("")).is_err());
    }
}

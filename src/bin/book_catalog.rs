//! `book-catalog` - command-line front end for the catalog editor.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use book_catalog::{telemetry, Book, BookForm, BookId, CatalogEditor, Config, HttpGateway};

#[derive(Parser, Debug)]
#[command(name = "book-catalog", version, about = "Edit a remote book catalog")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Book service base URL (overrides config and BOOK_CATALOG_URL).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every book.
    List,
    /// List books whose title contains TERM (case-insensitive).
    Search { term: String },
    /// Create a book.
    Add(BookArgs),
    /// Change fields of an existing book.
    Edit {
        id: BookId,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete a book.
    Delete { id: BookId },
    /// Run the in-memory reference book service.
    #[cfg(feature = "server")]
    Serve {
        /// Address to bind (overrides config and BOOK_CATALOG_LISTEN).
        #[arg(long)]
        listen: Option<String>,
    },
}

#[derive(Args, Debug)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long)]
    year: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    year: Option<String>,
}

impl EditArgs {
    fn apply(self, form: &mut BookForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(author) = self.author {
            form.author = author;
        }
        if let Some(year) = self.year {
            form.year = year;
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(url) = &cli.url {
        config.gateway.base_url = url.clone();
    }
    if let Some(ms) = cli.timeout_ms {
        config.gateway.timeout_ms = Some(ms);
    }
    Ok(config)
}

fn print_book(position: usize, book: &Book) {
    let id = book
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("{position:>3}  #{id:<5} {} ({}) by {}", book.title, book.year, book.author);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let config = load_config(&cli)?;
    debug!(?config, "configuration");

    match cli.command {
        #[cfg(feature = "server")]
        Command::Serve { listen } => {
            let addr = listen.unwrap_or(config.server.listen_addr);
            let backend = std::sync::Arc::new(book_catalog::InMemoryGateway::new());
            book_catalog::server::serve(backend, &addr)
                .await
                .with_context(|| format!("serving on {addr}"))
        }
        command => run_client(&config, command).await,
    }
}

async fn run_client(config: &Config, command: Command) -> Result<()> {
    let gateway = HttpGateway::new(&config.gateway).context("building HTTP client")?;
    let editor = CatalogEditor::new(gateway);
    editor
        .refresh()
        .await
        .with_context(|| format!("listing books from {}", config.gateway.base_url))?;

    match command {
        Command::List => {
            for (position, book) in editor.books()?.iter().enumerate() {
                print_book(position, book);
            }
        }
        Command::Search { term } => {
            editor.set_search(term)?;
            for entry in editor.visible()? {
                print_book(entry.position, &entry.book);
            }
        }
        Command::Add(args) => {
            let outcome = editor
                .submit_form(BookForm::new(args.title, args.author, args.year))
                .await?;
            let book = outcome.book();
            println!("created #{}", book.id.unwrap_or_default());
        }
        Command::Edit { id, fields } => {
            editor.begin_edit_id(id)?;
            let mut form = editor.form()?;
            fields.apply(&mut form);
            let outcome = editor.submit_form(form).await?;
            println!("updated #{}", outcome.book().id.unwrap_or(id));
        }
        Command::Delete { id } => {
            editor.delete_id(id).await?;
            println!("deleted #{id}");
        }
        #[cfg(feature = "server")]
        Command::Serve { .. } => {
            anyhow::bail!("serve does not talk to a remote service");
        }
    }

    Ok(())
}

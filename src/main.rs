use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kit::areas::repository::Repository;
use kit::artifacts::core::{PagerWriter, should_colorize, should_page};
use kit::artifacts::objects::object_type::ObjectType;
use kit::commands::plumbing::cat_file::CatFileMode;
use kit::commands::porcelain::tag::TagKind;
use minus::Pager;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "KIT_LOG";

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small git-compatible repository toolkit",
    long_about = "kit reads and writes git repositories: loose objects, refs, the index \
    and the working tree. It implements a subset of git's plumbing and porcelain commands.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints an object's raw payload (peeled to the requested kind), \
        its kind, its size or a human readable rendering."
    )]
    CatFile {
        #[arg(index = 1, value_enum, help = "What to print")]
        mode: CatFileMode,
        #[arg(index = 2, help = "The object to print")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes a file as an object of the given kind and can write it \
        to the object database. Trees, commits and tags must be well formed."
    )]
    HashObject {
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object kind")]
        object_type: ObjectType,
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "ls-tree", about = "List the contents of a tree object")]
    LsTree {
        #[arg(short, long, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "A tree, or a commit or tag leading to one")]
        tree: String,
    },
    #[command(
        name = "checkout",
        about = "Write a commit or tree into an empty directory",
        long_about = "This command writes every file of a commit's tree (or of a tree) into a \
        directory, which is created when missing and must otherwise be empty."
    )]
    Checkout {
        #[arg(index = 1, help = "The commit or tree to check out")]
        commit: String,
        #[arg(index = 2, help = "The empty directory to write into")]
        path: PathBuf,
    },
    #[command(name = "show-ref", about = "List references")]
    ShowRef,
    #[command(
        name = "tag",
        about = "List or create tags",
        long_about = "Without a name this command lists tags. With a name it creates a \
        lightweight tag, or an annotated tag object with -a."
    )]
    Tag {
        #[arg(short, long = "annotate", help = "Create an annotated tag object")]
        annotate: bool,
        #[arg(short, long, help = "The message of an annotated tag")]
        message: Option<String>,
        #[arg(index = 1, help = "The tag name")]
        name: Option<String>,
        #[arg(index = 2, default_value = "HEAD", help = "The object the tag points at")]
        object: String,
    },
    #[command(name = "rev-parse", about = "Resolve a name to an object id")]
    RevParse {
        #[arg(long = "type", help = "Peel the object to this kind")]
        object_type: Option<ObjectType>,
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "ls-files", about = "List the index")]
    LsFiles {
        #[arg(short, long, help = "Show mode, object id and stage of every entry")]
        stage: bool,
    },
    #[command(name = "status", about = "Show how the worktree differs from the index")]
    Status,
    #[command(name = "diff", about = "Show changes between the index and the worktree")]
    Diff,
    #[command(name = "log", about = "Print the commit graph in Graphviz format")]
    Log {
        #[arg(index = 1, default_value = "HEAD", help = "The commit to start at")]
        commit: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn open(pwd: &Path) -> Result<Repository> {
    Ok(Repository::find(pwd, Box::new(std::io::stdout()))?)
}

/// Run a command whose output may be long through the pager
fn run_paged(pwd: &Path, command: impl FnOnce(&Repository) -> Result<()>) -> Result<()> {
    if !should_page() {
        return command(&open(pwd)?);
    }

    let pager = Pager::new();
    let repository = Repository::find(pwd, Box::new(PagerWriter::new(pager.clone())))?;
    command(&repository)?;
    minus::page_all(pager)?;

    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    colored::control::set_override(should_colorize());

    let cli = Cli::parse();
    let pwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { path } => {
            let path = path.unwrap_or(pwd);
            let repository = Repository::init(&path, Box::new(std::io::stdout()))
                .with_context(|| format!("unable to initialize {}", path.display()))?;

            repository.announce_init()?
        }
        Commands::CatFile { mode, object } => open(&pwd)?.cat_file(mode, &object)?,
        Commands::HashObject {
            object_type,
            write,
            file,
        } => open(&pwd)?.hash_object(&file, object_type, write)?,
        Commands::LsTree { recursive, tree } => open(&pwd)?.ls_tree(&tree, recursive)?,
        Commands::Checkout { commit, path } => open(&pwd)?
            .checkout(&commit, &path)
            .with_context(|| format!("unable to check out {commit} into {}", path.display()))?,
        Commands::ShowRef => open(&pwd)?.show_ref()?,
        Commands::Tag {
            annotate,
            message,
            name,
            object,
        } => {
            let repository = open(&pwd)?;

            match name {
                None => repository.list_tags()?,
                Some(name) => {
                    let kind = match (annotate, message) {
                        (_, Some(message)) => TagKind::Annotated { message },
                        (true, None) => anyhow::bail!("annotated tags need a message (-m)"),
                        (false, None) => TagKind::Lightweight,
                    };
                    repository.tag(&name, &object, kind)?
                }
            }
        }
        Commands::RevParse { object_type, name } => open(&pwd)?.rev_parse(&name, object_type)?,
        Commands::LsFiles { stage } => open(&pwd)?.ls_files(stage)?,
        Commands::Status => open(&pwd)?.status()?,
        Commands::Diff => run_paged(&pwd, |repository| repository.diff())?,
        Commands::Log { commit } => run_paged(&pwd, |repository| repository.log(&commit))?,
    }

    Ok(())
}

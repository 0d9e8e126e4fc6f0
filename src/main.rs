use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tbx::config::{discover, load_from_path};
use tbx::{apply, apply_to_file, CommandError, Engine, Modification, Pick};

#[derive(Parser)]
#[command(name = "tbx")]
#[command(about = "Cursor-driven syntax queries for JavaScript, TypeScript and JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML file with extra language prefixes (defaults to the nearest
    /// tbx.toml or .tbx.toml in the working directory or above)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log dispatch and query decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Source file, or `-` to read stdin
    file: PathBuf,

    /// Language identifier (inferred from the file extension if omitted)
    #[arg(short, long)]
    language: Option<String>,
}

#[derive(Args)]
struct Target {
    #[command(flatten)]
    source: Source,

    /// Cursor position in UTF-16 code units
    #[arg(short, long, default_value_t = 0)]
    offset: usize,
}

#[derive(Args)]
struct EditTarget {
    #[command(flatten)]
    source: Source,

    /// Cursor position in UTF-16 code units; repeat for multiple cursors
    #[arg(short = 'o', long = "offset", default_value = "0")]
    offsets: Vec<usize>,
}

#[derive(Args)]
struct ApplyArgs {
    /// Write the result back to the file
    #[arg(short, long)]
    write: bool,

    /// Show unified diff of the change
    #[arg(short, long)]
    diff: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the boundary of the string enclosing the cursor
    #[command(name = "string")]
    EnclosingString {
        #[command(flatten)]
        target: Target,

        /// Exclude the quotes
        #[arg(long)]
        contents: bool,
    },

    /// Print the boundary of the block enclosing the cursor
    #[command(name = "block")]
    EnclosingBlock {
        #[command(flatten)]
        target: Target,

        /// Exclude the braces
        #[arg(long)]
        contents: bool,

        /// Pick the innermost block instead of the outermost
        #[arg(long)]
        innermost: bool,
    },

    /// List every node touching the cursor, outermost first
    Nodes {
        #[command(flatten)]
        target: Target,
    },

    /// Print the normalized tree as JSON
    Tree {
        #[command(flatten)]
        source: Source,
    },

    /// Empty the string under each cursor
    DeleteString {
        #[command(flatten)]
        target: EditTarget,

        #[command(flatten)]
        apply: ApplyArgs,
    },

    /// Replace the contents of the string under each cursor
    ReplaceString {
        #[command(flatten)]
        target: EditTarget,

        /// New string contents
        value: String,

        #[command(flatten)]
        apply: ApplyArgs,
    },

    /// Delete the block enclosing each cursor
    DeleteBlock {
        #[command(flatten)]
        target: EditTarget,

        /// Keep the braces and delete only what is between them
        #[arg(long)]
        contents: bool,

        /// Pick the innermost block instead of the outermost
        #[arg(long)]
        innermost: bool,

        #[command(flatten)]
        apply: ApplyArgs,
    },
}

/// Source text and language resolved from the command line.
struct Input {
    path: Option<PathBuf>,
    text: String,
    language: String,
}

impl Source {
    fn read(&self) -> Result<Input> {
        let path = (self.file.as_os_str() != "-").then(|| self.file.clone());

        let text = match &path {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                text
            }
        };

        let language = match (&self.language, &path) {
            (Some(language), _) => language.clone(),
            (None, Some(path)) => match infer_language(path) {
                Some(language) => language.to_string(),
                None => bail!(
                    "cannot infer language for {}; pass --language",
                    path.display()
                ),
            },
            (None, None) => bail!("reading stdin needs --language"),
        };

        Ok(Input {
            path,
            text,
            language,
        })
    }
}

fn pick(innermost: bool) -> Pick {
    if innermost {
        Pick::Innermost
    } else {
        Pick::Outermost
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(error) = run(cli) {
        notify(&error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().or_else(|| {
        let found = std::env::current_dir().ok().and_then(|cwd| discover(&cwd));
        if let Some(path) = &found {
            log::debug!("using config {}", path.display());
        }
        found
    });
    let engine = match &config_path {
        Some(path) => Engine::from_config(&load_from_path(path)?),
        None => Engine::default(),
    };

    match cli.command {
        Commands::EnclosingString { target, contents } => {
            let input = target.source.read()?;
            let boundary = if contents {
                engine.string_contents(&input.text, &input.language, target.offset)?
            } else {
                engine.string_boundary(&input.text, &input.language, target.offset)?
            };
            print_json(&boundary)
        }

        Commands::EnclosingBlock {
            target,
            contents,
            innermost,
        } => {
            let input = target.source.read()?;
            let pick = pick(innermost);
            let boundary = if contents {
                engine.block_contents(&input.text, &input.language, target.offset, pick)?
            } else {
                engine.block_boundary(&input.text, &input.language, target.offset, pick)?
            };
            print_json(&boundary)
        }

        Commands::Nodes { target } => {
            let input = target.source.read()?;
            print_json(&engine.nodes_at(&input.text, &input.language, target.offset)?)
        }

        Commands::Tree { source } => {
            let input = source.read()?;
            print_json(&engine.parse(&input.text, &input.language)?)
        }

        Commands::DeleteString { target, apply } => cmd_edit(&target, &apply, |input| {
            engine.delete_string_contents_at(&input.text, &input.language, &target.offsets)
        }),

        Commands::ReplaceString {
            target,
            value,
            apply,
        } => cmd_edit(&target, &apply, |input| {
            engine.replace_string_contents_at(&input.text, &input.language, &target.offsets, &value)
        }),

        Commands::DeleteBlock {
            target,
            contents,
            innermost,
            apply,
        } => cmd_edit(&target, &apply, |input| {
            let pick = pick(innermost);
            if contents {
                engine.delete_block_contents_at(&input.text, &input.language, &target.offsets, pick)
            } else {
                engine.delete_block_at(&input.text, &input.language, &target.offsets, pick)
            }
        }),
    }
}

/// Build a modification batch, then print, diff or write it.
fn cmd_edit<F>(target: &EditTarget, args: &ApplyArgs, build: F) -> Result<()>
where
    F: FnOnce(&Input) -> Result<Vec<Modification>, CommandError>,
{
    let input = target.source.read()?;
    let modifications = build(&input)?;

    if modifications.is_empty() {
        eprintln!("{}", "[tbx] nothing to edit at the cursor".yellow());
    } else if modifications.len() < target.offsets.len() {
        eprintln!(
            "{}",
            format!(
                "[tbx] {} cursor(s) produced {} edit(s)",
                target.offsets.len(),
                modifications.len()
            )
            .dimmed()
        );
    }

    if !args.write && !args.diff {
        return print_json(&modifications);
    }

    let updated = match (&input.path, args.write) {
        (Some(path), true) => apply_to_file(path, &modifications)?,
        (None, true) => bail!("--write needs a file, not stdin"),
        (_, false) => apply(&input.text, &modifications)?,
    };

    if args.diff && updated != input.text {
        let label = input.path.as_deref().unwrap_or(Path::new("<stdin>"));
        display_diff(label, &input.text, &updated);
    }

    Ok(())
}

fn infer_language(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match extension.as_str() {
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "json" => "json",
        "jsonc" => "jsonc",
        _ => return None,
    };
    Some(language)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report a failure the way the editor integration shows it: one line,
/// prefixed, on stderr.
fn notify(error: &anyhow::Error) {
    eprintln!("{} {:#}", "[tbx]".red().bold(), error);
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (edited)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use jot::areas::repository::Repository;
use jot::artifacts::errors::JotError;
use jot::config::Config;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "jot",
    version = "0.1.0",
    about = "A local, single-user version-control system",
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
    #[command(name = "init", about = "Initialize a new repository in the current directory")]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "rm", about = "Unstage a file, or stage its removal and delete it")]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "commit", about = "Record the staged changes as a new commit")]
    Commit {
        #[arg(index = 1)]
        message: Option<String>,
    },
    #[command(name = "log", about = "Show the current branch's history")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of all commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes, and untracked files")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file from a commit, or switch to a branch",
        long_about = "Three forms: `checkout -- <file>` restores a file from the head commit, \
        `checkout <commit-id> -- <file>` restores it from the addressed commit, \
        and `checkout <branch>` switches to the branch."
    )]
    Checkout {
        #[arg(index = 1)]
        target: Option<String>,
        #[arg(index = 2, last = true)]
        file: Vec<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current head commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch head to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge the given branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        // logical refusals report on stdout and exit cleanly; only
        // environmental failures are real errors
        Err(error) => match error.downcast_ref::<JotError>() {
            Some(report) => {
                println!("{report}");
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("{error:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return report_usage_error(error),
    };

    let pwd = std::env::current_dir()?;
    let mut repository = Repository::new(
        &pwd.to_string_lossy(),
        Config::default(),
        Box::new(std::io::stdout()),
    )?;

    if !matches!(cli.command, Commands::Init) && !repository.is_initialized() {
        anyhow::bail!(JotError::NotInitialized);
    }

    match &cli.command {
        Commands::Init => repository.init()?,
        Commands::Add { file } => repository.add(file)?,
        Commands::Rm { file } => repository.rm(file)?,
        Commands::Commit { message } => repository.commit(message.as_deref().unwrap_or_default())?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(message)?,
        Commands::Status => repository.status()?,
        Commands::Checkout { target, file } => match (target, file.as_slice()) {
            (None, [file]) => repository.checkout_file_from_head(file)?,
            (Some(prefix), [file]) => repository.checkout_file_from_commit(prefix, file)?,
            (Some(branch), []) => repository.checkout_branch(branch)?,
            _ => println!("Incorrect operands."),
        },
        Commands::Branch { name } => repository.branch(name)?,
        Commands::RmBranch { name } => repository.rm_branch(name)?,
        Commands::Reset { commit } => repository.reset(commit)?,
        Commands::Merge { branch } => repository.merge(branch)?,
    }

    Ok(())
}

/// The driver owns the usage-failure reports; none of them are command
/// failures, so all of them exit cleanly.
fn report_usage_error(error: clap::Error) -> Result<()> {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => print!("{error}"),
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            println!("Please enter a command.")
        }
        ErrorKind::InvalidSubcommand => println!("No command with that name exists."),
        _ => println!("Incorrect operands."),
    }

    Ok(())
}

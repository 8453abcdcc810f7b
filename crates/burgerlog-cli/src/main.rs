use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod tui;

use commands::entry::{parse_date_arg, parse_ratings, Ratings};

#[derive(Parser, Debug)]
#[command(
    name = "burgerlog",
    version,
    about = "Burger journal for two reviewers"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Score a venue and append the record
    Add {
        #[arg(long)]
        venue: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<time::Date>,
        #[arg(long)]
        photo: Option<PathBuf>,
        #[arg(long)]
        would_return: bool,
        /// Six ratings 0-10: bread, patty, sauce, side, ambience, value
        #[arg(long, value_parser = parse_ratings)]
        baba: Option<Ratings>,
        #[arg(long, default_value = "")]
        baba_comment: String,
        #[arg(long, value_parser = parse_ratings)]
        gokce: Option<Ratings>,
        #[arg(long, default_value = "")]
        gokce_comment: String,
        /// Print the averages without saving
        #[arg(long)]
        dry_run: bool,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    Remove {
        id: String,
    },
    /// Replace the ledger with the records of a CSV file
    Import {
        file: PathBuf,
    },
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Delete every record
    Clear {
        #[arg(long)]
        yes: bool,
    },
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// List records whose stored averages differ from their scores
    Check,
    Photos {
        #[command(subcommand)]
        action: PhotosCommand,
    },
    Config {
        #[arg(long)]
        print: bool,
    },
    /// Browse the ledger in the terminal
    Browse,
}

#[derive(Subcommand, Debug)]
enum PhotosCommand {
    /// Photos no record points to
    Orphans {
        #[arg(long)]
        prune: bool,
    },
    /// Records whose photo file is gone
    Missing,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { path, force } = &cli.command {
        logging::init("info");
        return commands::config::init_config(path.clone(), *force);
    }

    let session = commands::Session::load(cli.config)?;
    logging::init(&session.config.logging.level);

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Add {
            venue,
            date,
            photo,
            would_return,
            baba,
            baba_comment,
            gokce,
            gokce_comment,
            dry_run,
        } => commands::entry::execute(
            &session,
            commands::entry::EntryInputs {
                venue,
                date,
                photo,
                would_return,
                baba: baba.unwrap_or_default(),
                baba_comment,
                gokce: gokce.unwrap_or_default(),
                gokce_comment,
                dry_run,
            },
        ),
        Commands::List { json } => commands::records::list(&session, json),
        Commands::Show { id, json } => commands::records::show(&session, &id, json),
        Commands::Remove { id } => commands::records::remove(&session, &id),
        Commands::Import { file } => commands::transfer::import(&session, &file),
        Commands::Export { output, json } => commands::transfer::export(&session, output, json),
        Commands::Clear { yes } => commands::transfer::clear(&session, yes),
        Commands::Stats { json } => commands::records::stats(&session, json),
        Commands::Check => commands::records::check(&session),
        Commands::Photos { action } => {
            let action = match action {
                PhotosCommand::Orphans { prune } => commands::photos::PhotosAction::Orphans { prune },
                PhotosCommand::Missing => commands::photos::PhotosAction::Missing,
            };
            commands::photos::execute(&session, action)
        }
        Commands::Config { print } => {
            if print {
                commands::config::print_effective(&session)
            } else {
                println!("{}", session.config_path.display());
                Ok(())
            }
        }
        Commands::Browse => tui::run_tui(&session),
    }
}

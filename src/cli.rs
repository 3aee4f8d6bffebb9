use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Backend of the CultureFinder app
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the daily import of events (default)
    Run,
    /// Import the upcoming events from the agenda once
    Import,
    /// Import events from a JSON file of the agenda
    ImportFile {
        file: PathBuf,
    },
    /// Notify attendees of the events that start on the next day
    Notify {
        /// The current day as DD-MM-YYYY
        #[arg(long)]
        today: Option<String>,
    },
    /// Open a session for a registered user and print its token
    Login {
        user_id: String,
        /// Receiver of push notifications
        #[arg(long)]
        device_token: Option<String>,
    },
    /// Close the session of the given token
    Logout { token: String },
    /// Delete an event including its ratings, assistances and incidents
    DeleteEvent { id: i64 },
}

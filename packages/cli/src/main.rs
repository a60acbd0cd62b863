use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod create_user;
mod import;

#[derive(Parser)]
#[command(
    name = "recruitment",
    about = "Administrative tools for the recruitment tracking service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import candidates from a GBK-encoded, semicolon-separated CSV file.
    ///
    /// Column layout: name; city; phone; bachelor school; major; degree;
    /// general ability score; paper score. Rows are inserted one at a time,
    /// so rows before a failing one stay imported.
    ImportCandidates {
        /// Path to the CSV file.
        #[arg(long)]
        path: PathBuf,

        /// PostgreSQL connection string.
        #[arg(long, env = "RECRUITMENT__DATABASE__URL")]
        database_url: String,
    },

    /// Create a staff account, optionally with group memberships.
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// Grant the superuser flag.
        #[arg(long)]
        superuser: bool,

        /// Group to add the user to ("hr" or "interviewer"); repeatable.
        #[arg(long = "group")]
        groups: Vec<String>,

        /// PostgreSQL connection string.
        #[arg(long, env = "RECRUITMENT__DATABASE__URL")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ImportCandidates { path, database_url } => {
            import::run(&path, &database_url).await
        }
        Commands::CreateUser {
            username,
            password,
            superuser,
            groups,
            database_url,
        } => create_user::run(&username, &password, superuser, &groups, &database_url).await,
    }
}

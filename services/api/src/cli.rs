use crate::commands::{run_derive, run_import, DeriveArgs, ImportArgs};
use crate::server;
use cabinet_clients::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Cabinet Clients",
    about = "Serve and inspect accounting-firm client records from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the derived attributes of a client document
    Derive(DeriveArgs),
    /// Preview a client CSV export and the records it maps to
    Import(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Derive(args) => run_derive(args),
        Command::Import(args) => run_import(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["cabinet-clients-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn import_takes_preview_rows() {
        let cli = Cli::try_parse_from([
            "cabinet-clients-api",
            "import",
            "--csv",
            "clients.csv",
            "--preview-rows",
            "3",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Import(args)) => {
                assert_eq!(args.preview_rows, 3);
                assert_eq!(args.csv.to_str(), Some("clients.csv"));
            }
            other => panic!("expected import command, got {other:?}"),
        }
    }

    #[test]
    fn derive_requires_a_file() {
        assert!(Cli::try_parse_from(["cabinet-clients-api", "derive"]).is_err());
    }
}

use clap::Parser;
use pwvault::cli::{init_logging, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Init => pwvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref site,
            ref username,
            ref secret,
            ref notes,
            ref tags,
        } => pwvault::cli::commands::add::execute(
            &cli,
            site,
            username,
            secret.as_deref(),
            notes,
            tags,
        ),
        Commands::Remove {
            ref site,
            ref username,
        } => pwvault::cli::commands::remove::execute(&cli, site, username),
        Commands::List => pwvault::cli::commands::list::execute(&cli),
        Commands::Get {
            ref site,
            ref username,
        } => pwvault::cli::commands::get::execute(&cli, site, username.as_deref()),
        Commands::Export { ref output } => {
            pwvault::cli::commands::export::execute(&cli, output.as_deref())
        }
    };

    if let Err(e) = result {
        pwvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

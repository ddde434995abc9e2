mod cli;
mod commands;
mod tui;

use clap::Parser;
use cli::{Cli, Commands};
use console::style;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let ctx = commands::Context::from_cli(&cli);

    let result = match &cli.command {
        Commands::Init {
            bare,
            initial_branch,
        } => commands::init::handle_init(&ctx, *bare, initial_branch.as_deref()),
        Commands::Clone { url } => commands::init::handle_clone(&ctx, url),
        Commands::Status {} => commands::status::handle_status(&ctx),
        Commands::Add { paths } => commands::stage::handle_add(&ctx, paths),
        Commands::Rm { paths } => commands::stage::handle_rm(&ctx, paths),
        Commands::Commit { message, all } => commands::commit::handle_commit(&ctx, message, *all),
        Commands::Checkout { branch, create } => {
            commands::branch::handle_checkout(&ctx, branch, *create)
        }
        Commands::Branch {
            list,
            delete,
            force,
        } => commands::branch::handle_branch(&ctx, *list, delete.as_deref(), *force),
        Commands::Log { branch, max_count } => {
            commands::log::handle_log(&ctx, branch.as_deref(), *max_count)
        }
        Commands::Tag { command } => commands::tag::handle_tag(&ctx, command),
        Commands::Remote { command } => commands::remote::handle_remote(&ctx, command),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gitmodel=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

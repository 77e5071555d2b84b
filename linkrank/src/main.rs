use commands::command_argument_builder;
use linkrank::handlers;
use linkrank_core::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    if !quiet {
        print_banner();
    }

    // No subcommand: the banner is all there is to show
    if chosen_command.subcommand().is_none() {
        return;
    }

    match chosen_command.subcommand() {
        Some(("run", primary_command)) => handlers::handle_run(primary_command).await,
        Some(("score", primary_command)) => handlers::handle_score(primary_command).await,
        Some(("probe", primary_command)) => handlers::handle_probe(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

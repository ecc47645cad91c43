use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::error;

mod commands;
mod utils;

use commands::*;

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run_command(&matches).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

fn sample_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("server")
                .short('s')
                .long("server")
                .value_name("HOST")
                .help("Collector host name or IP address"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Collector UDP port (default: 25826)")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_name("SECONDS")
                .help("Reporting interval (default: 30)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("NAME")
                .help("Reported host name (default: local host name)"),
        )
        .arg(
            Arg::new("plugin")
                .long("plugin")
                .value_name("NAME")
                .help("Plugin name"),
        )
        .arg(
            Arg::new("plugin-instance")
                .long("plugin-instance")
                .value_name("NAME")
                .help("Plugin instance"),
        )
        .arg(
            Arg::new("type")
                .short('t')
                .long("type")
                .value_name("TYPE")
                .help("Type name, e.g. gauge or load")
                .required(true),
        )
        .arg(
            Arg::new("type-instance")
                .long("type-instance")
                .value_name("NAME")
                .help("Type instance"),
        )
        .arg(
            Arg::new("time")
                .long("time")
                .value_name("EPOCH")
                .help("Sample time in seconds since the epoch (default: now)")
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new("values")
                .value_name("VALUES")
                .help("One or more gauge values")
                .num_args(1..)
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64)),
        )
}

fn build_cli() -> Command {
    Command::new("collectd-send")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Send samples to a collectd server using the binary network protocol")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(sample_args(
            Command::new("send").about("Send one sample as a single UDP datagram"),
        ))
        .subcommand(sample_args(
            Command::new("encode").about("Print the datagram for a sample without sending it"),
        ))
        .subcommand(Command::new("config").about("Show the effective configuration"))
}

async fn run_command(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("send", sub_matches)) => handle_send_command(matches, sub_matches).await,
        Some(("encode", sub_matches)) => handle_encode_command(matches, sub_matches),
        Some(("config", sub_matches)) => handle_config_command(matches, sub_matches),
        _ => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}

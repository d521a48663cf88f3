// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod network;
pub mod tui;

mod client_main;
mod http_server_state;
mod server_config;
mod server_main;

use clap::{Command, arg, value_parser};
use server_config::ServerConfig;


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Chess relay")
        .version(clap::crate_version!())
        .about("Two-player chess server and console client")
        .subcommand_required(true)
        .subcommand(
            Command::new("server")
                .about("Run as server")
                .arg(
                    arg!(--"config" <config_file> "Path to the configuration file: yaml-serialized ServerConfig.")
                        .required(false),
                )
                .arg(
                    arg!(--"port" <port> "Port to listen on. Overrides the config file.")
                        .required(false)
                        .env("PORT")
                        .value_parser(value_parser!(u16)),
                ),
        )
        .subcommand(
            Command::new("client")
                .about("Run as client")
                .arg(arg!(<server_address> "Server address, e.g. localhost:3000")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            let mut config = match sub_matches.get_one::<String>("config") {
                Some(filename) => ServerConfig::read_file(filename)?,
                None => ServerConfig::default(),
            };
            if let Some(&port) = sub_matches.get_one::<u16>("port") {
                config.port = port;
            }
            server_main::run(config)
        }
        Some(("client", sub_matches)) => client_main::run(client_main::ClientConfig {
            server_address: sub_matches.get_one::<String>("server_address").unwrap().clone(),
        }),
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

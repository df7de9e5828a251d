use anyhow::{anyhow, Result};
use clap::{App as ClapApp, AppSettings, Arg, ArgMatches, SubCommand};
use log::LevelFilter;
use vendor_portal::app::{App, Command};
use vendor_portal::config::{Config, ConfigUpdate};
use vendor_portal::logger::CustomLogger;
use vendor_portal::screens::parse_month;

fn main() -> Result<()> {
    let matches = ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Custom configuration directory")
                .global(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("vendor")
                .long("vendor")
                .value_name("ID")
                .help("Vendor id to use instead of the cached session")
                .global(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log debug output to stderr")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("login")
                .about("Log in with vendor credentials")
                .arg(Arg::with_name("email").long("email").takes_value(true).required(true))
                .arg(
                    Arg::with_name("password")
                        .long("password")
                        .takes_value(true)
                        .required(true),
                ),
        )
        .subcommand(SubCommand::with_name("logout").about("Clear the cached vendor session"))
        .subcommand(SubCommand::with_name("whoami").about("Show the resolved vendor identity"))
        .subcommand(SubCommand::with_name("dashboard").about("Show booking and view analytics"))
        .subcommand(
            SubCommand::with_name("reservations")
                .about("List reservations for a month")
                .arg(
                    Arg::with_name("month")
                        .long("month")
                        .value_name("YYYY-MM")
                        .takes_value(true),
                ),
        )
        .subcommand(SubCommand::with_name("packages").about("List offered packages"))
        .subcommand(SubCommand::with_name("profile").about("Show the vendor profile"))
        .subcommand(
            SubCommand::with_name("config")
                .about("Write settings to the configuration file")
                .arg(setting("api-url", "URL", "REST base URL of the backend"))
                .arg(setting("graphql-url", "URL", "GraphQL endpoint, empty to derive it"))
                .arg(setting("default-vendor", "ID", "Fallback vendor id, empty to clear"))
                .arg(setting("cookie", "HEADER", "Cookie header value, empty to clear"))
                .arg(setting("log-level", "LEVEL", "Log level (error, warn, info, debug, trace)")),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(global_value(&matches, "config"))?;

    let level = if global_present(&matches, "verbose") {
        LevelFilter::Debug
    } else {
        config.log_level_filter()?
    };
    CustomLogger::new(level).init()?;

    // Persist file settings only; environment overrides stay out of the file
    if let ("config", Some(sub)) = matches.subcommand() {
        config.update(ConfigUpdate {
            api_base_url: sub.value_of("api-url").map(str::to_owned),
            graphql_url: sub.value_of("graphql-url").map(str::to_owned),
            default_vendor_id: sub.value_of("default-vendor").map(str::to_owned),
            cookie: sub.value_of("cookie").map(str::to_owned),
            log_level: sub.value_of("log-level").map(str::to_owned),
        })?;
        if let Some(path) = config.file_path() {
            println!("Saved configuration to {}", path.display());
        }
        return Ok(());
    }
    config.apply_env();

    let command = command_from(&matches)?;
    let route_vendor_id = global_value(&matches, "vendor").map(str::to_owned);

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(App::run(config, route_vendor_id, command))
}

fn setting<'a>(name: &'a str, value_name: &'a str, help: &'a str) -> Arg<'a, 'a> {
    Arg::with_name(name)
        .long(name)
        .value_name(value_name)
        .help(help)
        .takes_value(true)
        .empty_values(true)
}

// Global flags may be given before or after the subcommand.
fn global_value<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches
        .value_of(name)
        .or_else(|| matches.subcommand().1.and_then(|sub| sub.value_of(name)))
}

fn global_present(matches: &ArgMatches, name: &str) -> bool {
    matches.is_present(name)
        || matches
            .subcommand()
            .1
            .map_or(false, |sub| sub.is_present(name))
}

fn command_from(matches: &ArgMatches) -> Result<Command> {
    match matches.subcommand() {
        ("login", Some(sub)) => Ok(Command::Login {
            email: sub.value_of("email").unwrap_or_default().to_string(),
            password: sub.value_of("password").unwrap_or_default().to_string(),
        }),
        ("logout", _) => Ok(Command::Logout),
        ("whoami", _) => Ok(Command::WhoAmI),
        ("dashboard", _) => Ok(Command::Dashboard),
        ("reservations", Some(sub)) => {
            let month = match sub.value_of("month") {
                Some(raw) => Some(
                    parse_month(raw)
                        .ok_or_else(|| anyhow!("invalid month '{}', expected YYYY-MM", raw))?,
                ),
                None => None,
            };
            Ok(Command::Reservations { month })
        }
        ("packages", _) => Ok(Command::Packages),
        ("profile", _) => Ok(Command::Profile),
        (other, _) => Err(anyhow!("unknown command '{}'", other)),
    }
}

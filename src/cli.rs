use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::str::FromStr;

fn out_arg() -> Arg {
    Arg::new("out")
        .short('o')
        .long("out")
        .num_args(1)
        .required(true)
        .help("File to write the returned image to")
}

fn alpha_arg() -> Arg {
    Arg::new("alpha")
        .long("alpha")
        .num_args(1)
        .value_parser(value_parser!(f64))
        .help("Effect opacity; 0 means the service default")
}

fn image_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("image")
            .required(true)
            .help("Local image path, or an http(s) url to download first"),
    )
    .arg(Arg::new("flag").required(true).help("Flag id, e.g. trans"))
}

pub fn build_cli() -> Command {
    Command::new("pfp")
        .about("Demo client for the pfp.lgbt pride-flag image API")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .global(true)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("flags").about("Print flag metadata as JSON"))
        .subcommand(
            Command::new("icon")
                .about("Download a flag icon")
                .arg(Arg::new("flag").default_value("pride").help("Flag id"))
                .arg(out_arg()),
        )
        .subcommand(
            image_args(Command::new("static").about("Render a static effect"))
                .arg(Arg::new("effect").long("effect").default_value("circle"))
                .arg(Arg::new("style").long("style").default_value("solid"))
                .arg(Arg::new("format").long("format").default_value("png"))
                .arg(alpha_arg())
                .arg(out_arg()),
        )
        .subcommand(
            image_args(Command::new("animated").about("Render an animated effect"))
                .arg(Arg::new("effect").long("effect").default_value("circle"))
                .arg(alpha_arg())
                .arg(out_arg()),
        )
}

/// Parse a string argument into one of the API enums.
pub fn parsed<T: FromStr<Err = String>>(m: &ArgMatches, name: &str) -> anyhow::Result<T> {
    let raw = m
        .get_one::<String>(name)
        .ok_or_else(|| anyhow::anyhow!("missing argument: {}", name))?;
    raw.parse::<T>().map_err(anyhow::Error::msg)
}

pub fn init_logging(level: Option<&str>) {
    // Respect explicit level, else default to info, allow env override via RUST_LOG
    if let Some(lvl) = level {
        std::env::set_var("RUST_LOG", lvl);
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

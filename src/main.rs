mod cli;

use anyhow::Context;
use clap::ArgMatches;
use log::info;
use pfp_client::{
    AnimatedEffect, AnimatedOptions, Config, EffectStyle, FlagId, ImageSource, OutputFormat,
    PfpClient, StaticEffect, StaticOptions,
};

fn image_source(m: &ArgMatches) -> anyhow::Result<ImageSource> {
    let raw = m
        .get_one::<String>("image")
        .context("missing image argument")?;
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Ok(ImageSource::Url(raw.clone()));
    }
    let bytes = std::fs::read(raw).with_context(|| format!("reading {}", raw))?;
    Ok(ImageSource::Bytes(bytes))
}

fn write_output(m: &ArgMatches, bytes: &[u8]) -> anyhow::Result<()> {
    let out = m.get_one::<String>("out").context("missing --out")?;
    std::fs::write(out, bytes).with_context(|| format!("writing {}", out))?;
    info!("wrote {} bytes to {}", bytes.len(), out);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    let version_flag = matches.get_flag("version");

    cli::init_logging(log_level.as_deref());

    if version_flag {
        println!("pfp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let client = PfpClient::with_config(&Config::from_env())?;

    match matches.subcommand() {
        Some(("flags", _)) => {
            let flags = client.get_flags().await?;
            println!("{}", serde_json::to_string_pretty(&flags)?);
        }
        Some(("icon", m)) => {
            let flag: FlagId = cli::parsed(m, "flag")?;
            let icon = client.get_flag_icon(flag).await?;
            write_output(m, &icon)?;
        }
        Some(("static", m)) => {
            let flag: FlagId = cli::parsed(m, "flag")?;
            let opts = StaticOptions {
                effect: cli::parsed::<StaticEffect>(m, "effect")?,
                style: cli::parsed::<EffectStyle>(m, "style")?,
                format: cli::parsed::<OutputFormat>(m, "format")?,
                alpha: m.get_one::<f64>("alpha").copied(),
            };
            let image = client
                .create_static_effect(image_source(m)?, flag, opts)
                .await?;
            write_output(m, &image)?;
        }
        Some(("animated", m)) => {
            let flag: FlagId = cli::parsed(m, "flag")?;
            let opts = AnimatedOptions {
                effect: cli::parsed::<AnimatedEffect>(m, "effect")?,
                alpha: m.get_one::<f64>("alpha").copied(),
            };
            let image = client
                .create_animated_effect(image_source(m)?, flag, opts)
                .await?;
            write_output(m, &image)?;
        }
        _ => {
            cli::build_cli().print_help()?;
        }
    }
    Ok(())
}

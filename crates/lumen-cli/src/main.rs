//! `lumen-cli` – command-line shell for the Lumen light gateway.
//!
//! One-shot commands against the device configured in
//! `~/.lumen/config.toml`:
//!
//! ```text
//! lumen status                 read all four color channels
//! lumen get <channel>          read one channel (hue/saturation/brightness/power)
//! lumen set <channel> <value>  write one channel
//! lumen temp                   read the temperature sensor
//! ```
//!
//! On first run a config template is written for the user to edit.

mod config;
mod telemetry;

use std::sync::Arc;

use colored::Colorize;

use lumen_device::Light;
use lumen_transport::HttpTransport;
use lumen_types::Channel;

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Status,
    Get(Channel),
    Set(Channel, f64),
    Temp,
    Help,
}

fn main() {
    let _guard = telemetry::init_telemetry("lumen");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(reason) => {
            eprintln!("{}: {}", "error".red().bold(), reason);
            print_usage();
            std::process::exit(2);
        }
    };

    if command == Command::Help {
        print_usage();
        return;
    }

    let cfg = match config::load() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => {
            let path = config::config_path();
            match config::save(&config::CliConfig::default()) {
                Ok(()) => println!(
                    "  No configuration found. A template has been written to {} — edit it and re-run.",
                    path.display().to_string().bold()
                ),
                Err(e) => eprintln!("{}: {}", "error".red().bold(), e),
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    };

    let transport = match HttpTransport::new(cfg.device.credentials()) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    };
    let light = Light::new(&cfg.device, transport);

    // The runtime is created only after telemetry init; see telemetry.rs.
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}: failed to start runtime: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(&light, command)) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(light: &Light, command: Command) -> Result<(), lumen_types::LumenError> {
    match command {
        Command::Status => {
            println!("  {} ({})", light.name().bold(), "color state".dimmed());
            // The first read triggers the fetch; the rest are served from
            // the still-fresh cache without further device calls.
            for channel in Channel::ALL {
                let value = light.get_channel(channel).await?;
                println!("    {:<12} {}", channel.to_string(), format_value(value));
            }
        }
        Command::Get(channel) => {
            let value = light.get_channel(channel).await?;
            println!("  {} = {}", channel.to_string().bold(), format_value(value));
        }
        Command::Set(channel, value) => {
            light.set_channel(channel, value).await?;
            println!(
                "  {} {} = {}",
                "✓".green().bold(),
                channel.to_string().bold(),
                format_value(value)
            );
        }
        Command::Temp => {
            let celsius = light.temperature().await?;
            println!("  {} {:.1} °C", "temperature".bold(), celsius);
        }
        Command::Help => unreachable!("handled before the runtime starts"),
    }
    Ok(())
}

fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let mut words = args.iter().map(String::as_str);
    let command = match words.next() {
        None | Some("help") | Some("--help") | Some("-h") => Command::Help,
        Some("status") => Command::Status,
        Some("temp") => Command::Temp,
        Some("get") => {
            let channel = parse_channel(words.next())?;
            Command::Get(channel)
        }
        Some("set") => {
            let channel = parse_channel(words.next())?;
            let raw = words.next().ok_or("missing value for 'set'")?;
            let value: f64 = raw
                .parse()
                .map_err(|_| format!("'{raw}' is not a numeric value"))?;
            Command::Set(channel, value)
        }
        Some(other) => return Err(format!("unknown command '{other}'")),
    };
    if words.next().is_some() {
        return Err("too many arguments".to_string());
    }
    Ok(command)
}

fn parse_channel(word: Option<&str>) -> Result<Channel, String> {
    let name = word.ok_or("missing channel name")?;
    Channel::from_name(name)
        .ok_or_else(|| format!("unknown channel '{name}' (expected hue/saturation/brightness/power)"))
}

fn print_usage() {
    println!();
    println!("  {} {}", "lumen".bold(), format!("v{}", env!("CARGO_PKG_VERSION")).dimmed());
    println!("  HTTP light gateway");
    println!();
    println!("  Usage:");
    println!("    lumen status                 read all color channels");
    println!("    lumen get <channel>          read one channel");
    println!("    lumen set <channel> <value>  write one channel");
    println!("    lumen temp                   read the temperature sensor");
    println!();
    println!("  Channels: hue, saturation, brightness, power");
    println!("  Config:   {}", config::config_path().display());
    println!();
}

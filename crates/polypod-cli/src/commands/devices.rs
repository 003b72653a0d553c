//! Audio output device listing.

use clap::Args;
use polypod_io::list_devices;

#[derive(Args)]
pub struct DevicesArgs {
    /// Print only the device names, one per line
    #[arg(long)]
    names: bool,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    let devices = list_devices()?;

    if args.names {
        for device in &devices {
            println!("{}", device.name);
        }
        return Ok(());
    }

    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    println!("Output Devices");
    println!("==============\n");
    for (idx, device) in devices.iter().enumerate() {
        let marker = if device.is_default { " (default)" } else { "" };
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            idx, device.name, device.default_sample_rate, device.channels, marker
        );
    }
    println!();
    println!("Tip: Use device index or partial name with --device:");
    println!("  polypod play score.toml --device 0");
    println!("  polypod play score.toml --device \"USB\"");

    Ok(())
}

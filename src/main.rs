use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use madb::device::{select_device, DeviceSelection};
use madb::utils::config::{DEFAULT_RECORD_FILE, DEFAULT_SCREENSHOT_FILE};
use madb::{commands, get_devices};

#[derive(Parser)]
#[command(name = "madb")]
#[command(version)]
#[command(about = "A wrapper for adb on multiple devices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stop a package on all or a single device
    Stop {
        /// The name of the package to stop
        package_name: String,
    },

    /// Start a package on all or a single device
    Start {
        /// The name of the package to start
        package_name: String,
    },

    /// Clear a package's storage on all or a single device
    Clear {
        /// The name of the package to clear
        package_name: String,
    },

    /// Install an APK on all or a single device
    Install {
        /// The path to the APK to install
        apk: String,
    },

    /// Uninstall a package on all or a single device
    Uninstall {
        /// The name of the package to uninstall
        package_name: String,
    },

    /// Start scrcpy on a device
    Scrcpy,

    /// Get the selected device's IP address
    Ip,

    /// Take a screenshot of a device
    Screenshot {
        /// The file to save the screenshot as
        #[arg(short, long, default_value = DEFAULT_SCREENSHOT_FILE)]
        filename: String,
    },

    /// Record the screen of a device (Press CTRL-C to stop recording)
    Record {
        /// The file to save the screen recording as
        #[arg(short, long, default_value = DEFAULT_RECORD_FILE)]
        filename: String,
    },

    /// Connect to a device via WiFi
    Wifi,

    /// Search for an installed package on a device
    Search {
        /// The term to look for in the package list
        search_term: String,
    },

    /// Run a raw adb command on a device
    R {
        /// Arguments passed through to adb verbatim
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// Fan a single-device operation out over the selection, in list order. One
/// device failing does not stop the rest.
async fn for_each_device<F, Fut>(selection: DeviceSelection, op: F)
where
    F: Fn(String) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<()>>,
{
    for device in selection.into_devices() {
        if let Err(e) = op(device.clone()).await {
            eprintln!("{} {}: {}", "✗".red(), device, e);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // One Ctrl-C handler for the whole program: while a recording is live it
    // requests a graceful stop, anywhere else it just says goodbye.
    let recording = Arc::new(AtomicBool::new(false));
    let stop = Arc::new(AtomicBool::new(false));
    {
        let recording = recording.clone();
        let stop = stop.clone();
        ctrlc::set_handler(move || {
            if recording.load(Ordering::SeqCst) {
                stop.store(true, Ordering::SeqCst);
            } else {
                println!("\nExiting...");
                std::process::exit(0);
            }
        })?;
    }

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let devices = get_devices().await?;

    match command {
        Commands::Stop { package_name } => {
            if let Some(selection) = select_device(&devices, true)? {
                for_each_device(selection, |d| {
                    let package_name = package_name.clone();
                    async move { commands::stop_package(&d, &package_name).await }
                })
                .await;
            }
        }

        Commands::Start { package_name } => {
            if let Some(selection) = select_device(&devices, true)? {
                for_each_device(selection, |d| {
                    let package_name = package_name.clone();
                    async move { commands::start_package(&d, &package_name).await }
                })
                .await;
            }
        }

        Commands::Clear { package_name } => {
            if let Some(selection) = select_device(&devices, true)? {
                for_each_device(selection, |d| {
                    let package_name = package_name.clone();
                    async move { commands::clear_package(&d, &package_name).await }
                })
                .await;
            }
        }

        Commands::Install { apk } => {
            if let Some(selection) = select_device(&devices, true)? {
                for_each_device(selection, |d| {
                    let apk = apk.clone();
                    async move { commands::install_apk(&d, &apk).await }
                })
                .await;
            }
        }

        Commands::Uninstall { package_name } => {
            if let Some(selection) = select_device(&devices, true)? {
                for_each_device(selection, |d| {
                    let package_name = package_name.clone();
                    async move { commands::uninstall_package(&d, &package_name).await }
                })
                .await;
            }
        }

        Commands::Scrcpy => {
            if let Some(DeviceSelection::Single(device)) = select_device(&devices, false)? {
                commands::run_scrcpy(&device).await?;
            }
        }

        Commands::Ip => {
            if let Some(DeviceSelection::Single(device)) = select_device(&devices, false)? {
                commands::get_device_ip(&device).await?;
            }
        }

        Commands::Screenshot { filename } => {
            if let Some(DeviceSelection::Single(device)) = select_device(&devices, false)? {
                commands::take_screenshot(&device, &filename).await?;
            }
        }

        Commands::Record { filename } => {
            if let Some(DeviceSelection::Single(device)) = select_device(&devices, false)? {
                recording.store(true, Ordering::SeqCst);
                commands::record_screen(&device, &filename, &stop).await?;
                recording.store(false, Ordering::SeqCst);
            }
        }

        Commands::Wifi => {
            if let Some(DeviceSelection::Single(device)) = select_device(&devices, false)? {
                commands::connect_wifi(&device).await?;
            }
        }

        Commands::Search { search_term } => {
            if let Some(DeviceSelection::Single(device)) = select_device(&devices, false)? {
                commands::search_packages(&device, &search_term).await?;
            }
        }

        Commands::R { args } => {
            if let Some(DeviceSelection::Single(device)) = select_device(&devices, false)? {
                commands::run_raw(&device, &args).await?;
            }
        }
    }

    Ok(())
}

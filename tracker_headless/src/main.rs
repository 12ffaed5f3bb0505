use aspicore::AspicoreModule;
use clap::Parser;
use common::device::Device;
use directory::StaticDirectory;
use dirs::data_local_dir;
use module_core::{Event, EventBus, EventKind, Module};
use recorder::Recorder;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address the server accepts device connections on
    #[arg(short, long, default_value = "0.0.0.0:5007")]
    listen: String,
    /// CSV file with the registered devices, one uid,id,name row per device
    #[arg(short, long)]
    devices: String,
    /// File the decoded records are appended to
    #[arg(short, long)]
    output: Option<String>,
}

fn read_devices_from_file(file_path: &str) -> Result<Vec<Device>, ()> {
    let mut rdr = csv::Reader::from_path(file_path).map_err(|e| {
        error!("Failed to open device file {}. Error: {}", file_path, e);
    })?;
    let mut devices = Vec::new();

    for result in rdr.records() {
        let record = result.unwrap();
        let uid = record.get(0).unwrap();
        let id = i64::from_str(record.get(1).unwrap()).unwrap();
        let name = record.get(2).filter(|name| !name.is_empty());
        devices.push(Device::new(id, uid, name));
    }
    debug!("number of registered devices: {}", devices.len());
    Ok(devices)
}

fn get_output_file(cli: &Cli) -> Result<std::path::PathBuf, ()> {
    if let Some(output) = &cli.output {
        return Ok(std::path::PathBuf::from(output));
    }
    let mut output = data_local_dir().ok_or_else(|| {
        error!("Could not determine local data directory");
    })?;
    output.push("tracker");
    if let Err(e) = std::fs::DirBuilder::new().recursive(true).create(&output) {
        error!(
            "Failed to create record folder {}. Error: {}",
            output.to_string_lossy(),
            e
        );
        return Err(());
    }
    output.push("positions.jsonl");
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let devices = read_devices_from_file(&cli.devices)?;
    let output = get_output_file(&cli)?;
    let eb = EventBus::default();
    let directory = Arc::new(StaticDirectory::new(devices));
    let mut server = match AspicoreModule::new(eb.context(), &cli.listen, directory).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to bind {}. Error: {}", cli.listen, e);
            return Err(());
        }
    };
    let mut recorder = Recorder::new(&output, eb.context());

    let quit_sender = eb.context().sender;
    ctrlc::set_handler(move || {
        let _ = quit_sender.send(Event {
            kind: EventKind::QuitEvent,
        });
    })
    .unwrap();

    info!("Starting modules...");
    tokio::join!(server.run(), recorder.run()).0
}

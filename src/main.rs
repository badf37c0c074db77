use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use voxdrive_core::{AppConfig, ConfigError, DeviceFault};

const DEFAULT_CONFIG: &str = "voxdrive.toml";

#[derive(Parser)]
#[command(name = "voxdrive", about = "Voice-commanded rover control")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Show the list of input devices and exit
    #[arg(short, long)]
    list_devices: bool,

    /// Input device: "default", a numeric index, or (part of) a device name
    #[arg(short, long)]
    device: Option<String>,

    /// Sample rate in Hz; defaults to the device's own rate
    #[arg(short = 'r', long)]
    samplerate: Option<u32>,

    /// Path to the speech model
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Also write the raw audio to this file
    #[arg(short, long)]
    filename: Option<PathBuf>,
}

fn load_config(path: &Path) -> Result<AppConfig> {
    match AppConfig::load_from_file(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileRead(e))
            if e.kind() == std::io::ErrorKind::NotFound && path == Path::new(DEFAULT_CONFIG) =>
        {
            Ok(AppConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("failed to load config from {path:?}")),
    }
}

fn list_devices(manager: &voxdrive_audio::DeviceManager) -> Result<()> {
    let devices = manager
        .list_input_devices()
        .context("failed to enumerate input devices")?;
    for (index, (name, _)) in devices.iter().enumerate() {
        println!("{index}: {name}");
    }
    Ok(())
}

/// Wait for Ctrl+C or a fault that ends acquisition.
async fn wait_for_shutdown(faults: &mut mpsc::UnboundedReceiver<DeviceFault>) -> Result<()> {
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl+C")?;
                tracing::info!("interrupted");
                return Ok(());
            }
            fault = faults.recv() => match fault {
                Some(fault) if fault.fatal => {
                    anyhow::bail!("audio input lost: {}", fault.message);
                }
                Some(_) => continue,
                None => anyhow::bail!("audio input stream ended"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let device_manager = voxdrive_audio::DeviceManager::new();

    if cli.list_devices {
        return list_devices(&device_manager);
    }

    let config = load_config(&cli.config)?;

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("voxdrive starting");

    // Audio input
    let selector = cli
        .device
        .clone()
        .unwrap_or_else(|| config.input.device_name.clone());
    let device = device_manager
        .get_input_device(&selector)
        .with_context(|| format!("failed to get input device '{selector}'"))?;
    let sample_rate = match cli.samplerate.or(config.general.sample_rate) {
        Some(rate) => rate,
        None => device_manager
            .default_sample_rate(&device)
            .context("failed to query the device's default sample rate")?,
    };
    tracing::info!(device = %selector, sample_rate, "using input device");

    // Recognizer
    let mut engine_settings = config.asr.settings.clone();
    if let Some(model) = &cli.model {
        engine_settings.insert(
            "model_path".to_string(),
            toml::Value::String(model.to_string_lossy().into_owned()),
        );
    }
    let engine = voxdrive_engine::EngineRegistry::new()
        .create_initialized(
            &config.asr.engine,
            toml::Value::Table(engine_settings),
            sample_rate,
        )
        .with_context(|| format!("failed to initialize ASR engine '{}'", config.asr.engine))?;
    let session = voxdrive_engine::RecognizerSession::new(engine);
    let interpreter =
        voxdrive_command::CommandInterpreter::with_extra_rewrites(&config.command.extra_rewrites);

    // Sinks
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let mut sink_host = voxdrive_sink::SinkHost::new(command_rx);
    if config.sink.is_empty() {
        sink_host
            .add_sink("log", toml::Value::Table(Default::default()))
            .await
            .context("failed to add default log sink")?;
    }
    for sink in &config.sink {
        sink_host
            .add_sink(&sink.kind, sink.extra.clone())
            .await
            .with_context(|| format!("failed to add sink '{}'", sink.kind))?;
    }
    sink_host.start();

    // Processing loop
    let (producer, consumer) = voxdrive_audio::block_queue(config.general.queue_capacity);
    let mut command_loop =
        voxdrive_router::CommandLoop::new(consumer, session, interpreter, command_tx);
    let archive_path = cli
        .filename
        .clone()
        .or_else(|| config.archive.as_ref().map(|a| PathBuf::from(&a.path)));
    if let Some(path) = archive_path {
        let archive = voxdrive_sink::AudioArchive::create(&path)
            .with_context(|| format!("failed to open audio archive {path:?}"))?;
        command_loop = command_loop.with_archive(archive);
    }
    let loop_handle = command_loop
        .start()
        .context("failed to spawn command loop thread")?;

    let (fault_tx, mut fault_rx) = mpsc::unbounded_channel();
    let capture = voxdrive_audio::CaptureNode::new(
        &device,
        producer,
        sample_rate,
        config.general.block_size,
        fault_tx,
    )
    .context("failed to start audio capture")?;
    tracing::info!(sample_rate = capture.sample_rate(), "listening");

    println!("{}", "#".repeat(80));
    println!("Press Ctrl+C to stop");
    println!("{}", "#".repeat(80));

    let outcome = wait_for_shutdown(&mut fault_rx).await;

    tracing::info!("shutting down");
    let queue = loop_handle.queue().clone();
    let report = tokio::task::spawn_blocking(move || loop_handle.stop())
        .await
        .context("command loop join failed")?;
    drop(capture);

    let stats = queue.stats();
    tracing::info!(
        pushed = stats.pushed,
        dropped = stats.dropped,
        blocks = report.blocks,
        commands = report.dispatched,
        "audio queue closed"
    );

    let delivered = sink_host.shutdown().await;
    tracing::debug!(delivered, "sinks shut down");

    tracing::info!("Done");
    outcome
}

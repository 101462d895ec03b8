//! sysmon - Linux system monitor.
//!
//! Interactive dashboard by default; `--once` and `--watch` print plain text
//! (or JSON) summaries instead.

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use sysmon::collector::{Collector, CollectorConfig, MemorySource, RealFs, RealHost};
use sysmon::fmt::{format_bytes, format_bytes_rate, format_percent};
use sysmon::model::SystemSnapshot;
use sysmon::tui::App;

#[derive(Parser, Debug)]
#[command(name = "sysmon")]
#[command(about = "Linux system monitor with a terminal dashboard")]
#[command(version)]
struct Args {
    /// Path to proc filesystem.
    #[arg(long, default_value = "/proc")]
    proc_path: PathBuf,

    /// Path to sysfs.
    #[arg(long, default_value = "/sys")]
    sys_path: PathBuf,

    /// Directory holding os-release and mtab.
    #[arg(long, default_value = "/etc")]
    etc_path: PathBuf,

    /// Read RAM usage from /proc/meminfo (excludes buffers and cache)
    /// instead of sysinfo(2).
    #[arg(long)]
    meminfo: bool,

    /// Refresh interval in seconds.
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Print one snapshot and exit.
    #[arg(long, conflicts_with = "watch")]
    once: bool,

    /// Print a summary every interval until interrupted.
    #[arg(long)]
    watch: bool,

    /// Emit JSON instead of text (with --once or --watch).
    #[arg(long)]
    json: bool,

    /// Write logs to this file. The dashboard logs nowhere without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            proc_path: self.proc_path.clone(),
            sys_path: self.sys_path.clone(),
            etc_path: self.etc_path.clone(),
            memory_source: if self.meminfo {
                MemorySource::MemInfo
            } else {
                MemorySource::SysInfo
            },
            ..CollectorConfig::default()
        }
    }

    fn dashboard(&self) -> bool {
        !self.once && !self.watch
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Logs go to `log_file` when given, otherwise to stderr unless the
/// dashboard owns the terminal.
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(format!("sysmon={}", level).parse()?);

    match &args.log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if args.dashboard() => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, snapshot: &SystemSnapshot) -> io::Result<()> {
    let system = &snapshot.system;
    writeln!(out, "{}  {}@{}", snapshot.timestamp, system.user, system.hostname)?;
    writeln!(out, "OS:     {}", system.os_name)?;
    writeln!(
        out,
        "CPU:    {} ({} logical) {}",
        system.cpu.model,
        system.logical_cpus,
        format_percent(snapshot.cpu.usage_percent)
    )?;

    let memory = &snapshot.memory;
    writeln!(
        out,
        "RAM:    {} / {} ({})",
        format_bytes(memory.used_ram),
        format_bytes(memory.total_ram),
        format_percent(memory.ram_usage_percent())
    )?;
    writeln!(
        out,
        "Swap:   {} / {} ({})",
        format_bytes(memory.used_swap),
        format_bytes(memory.total_swap),
        format_percent(memory.swap_usage_percent())
    )?;

    for disk in &snapshot.disks {
        writeln!(
            out,
            "Disk:   {} {} / {} ({})",
            disk.mount_point,
            format_bytes(disk.used_space),
            format_bytes(disk.total_space),
            format_percent(disk.usage_percent())
        )?;
    }
    for net in &snapshot.networks {
        writeln!(
            out,
            "Net:    {} rx {} tx {}",
            net.interface,
            format_bytes_rate(net.rx_bytes_per_sec),
            format_bytes_rate(net.tx_bytes_per_sec)
        )?;
    }

    let tasks = &snapshot.tasks;
    writeln!(
        out,
        "Tasks:  {} total, {} running, {} sleeping, {} uninterruptible, {} zombie, {} traced",
        tasks.total, tasks.running, tasks.sleeping, tasks.uninterruptible, tasks.zombie, tasks.traced
    )?;
    writeln!(
        out,
        "Sensor: fan {} RPM, {:.1} °C",
        snapshot.sensors.fan_rpm, snapshot.sensors.temperature_celsius
    )?;
    Ok(())
}

fn print_snapshot(snapshot: &SystemSnapshot, json: bool) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, snapshot)?;
        writeln!(out)?;
    } else {
        write_summary(&mut out, snapshot)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let interval = Duration::from_secs(args.interval);
    let config = args.collector_config();
    info!(
        "sysmon {} starting: interval={}s, proc={}, sys={}",
        env!("CARGO_PKG_VERSION"),
        args.interval,
        config.proc_path.display(),
        config.sys_path.display()
    );

    let mut collector = Collector::new(RealFs::new(), RealHost::new(), config);
    let system = collector.system_info();
    info!(
        "Monitoring {} ({}, {} logical CPUs)",
        system.hostname, system.os_name, system.logical_cpus
    );

    if args.dashboard() {
        App::new(collector)
            .run(interval)
            .context("dashboard terminated with an error")?;
        return Ok(());
    }

    if args.once {
        // Rates need two observations one interval apart.
        collector.snapshot();
        std::thread::sleep(interval);
        return print_snapshot(&collector.snapshot(), args.json);
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    while running.load(Ordering::SeqCst) {
        print_snapshot(&collector.snapshot(), args.json)?;
        if !args.json {
            println!();
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Shutting down...");
    Ok(())
}

// Sat Oct 17 2026 - Alex

use super::args::{Args, Command, ConnectArgs, ProcessesArgs, ReadArgs, TrackArgs};
use crate::config::Config;
use crate::emulator::{profiles, Attachment, EmulatorId, GuestMemory, HostOs, ModuleBase};
use crate::memory::process::find_processes;
use crate::memory::{host_backend, list_processes, MemoryError};
use crate::session::Session;
use crate::tracker::{validate_connection, ConnectionCheck, Poller, PollerEvent, Snapshot, CATALOG};
use crate::ui::table::{Alignment, BorderStyle, TableBuilder};
use crate::ui::{print_error, print_info, print_success, print_warning, Spinner};
use crate::utils::{format_duration, measure_time, parse_hex_u32, LoggingUtils};
use anyhow::{anyhow, Context};
use colored::Colorize;
use itertools::Itertools;
use std::env;

pub struct CommandHandler {
    use_color: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { use_color: true }
    }

    pub fn execute(&mut self, args: Args) -> anyhow::Result<()> {
        let config = self.load_config(&args)?;
        self.use_color = config.use_color;
        if !self.use_color {
            colored::control::set_override(false);
        }
        self.setup_logging(&config)?;

        match args.command {
            Command::Processes(a) => self.handle_processes(a),
            Command::Profiles => self.handle_profiles(),
            Command::Connect(a) => self.handle_connect(&config, a),
            Command::Read(a) => self.handle_read(&config, a),
            Command::Track(a) => self.handle_track(&config, a),
        }
    }

    fn load_config(&self, args: &Args) -> anyhow::Result<Config> {
        let mut config = match &args.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(level) = &args.log_level {
            config = config.with_log_level(level);
        }
        if args.no_color {
            config = config.with_color(false);
        }
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }

    fn setup_logging(&self, config: &Config) -> anyhow::Result<()> {
        let level = LoggingUtils::level_from_str(&config.log_level)
            .ok_or_else(|| anyhow!("Unknown log level '{}'", config.log_level))?;

        if env::var_os("RUST_LOG").is_some() {
            LoggingUtils::init_from_env(level);
        } else {
            LoggingUtils::init_logger(level, config.use_color);
        }
        Ok(())
    }

    fn table(&self) -> TableBuilder {
        let border = if self.use_color { BorderStyle::Unicode } else { BorderStyle::Ascii };
        TableBuilder::new().with_color(self.use_color).with_border_style(border)
    }

    fn handle_processes(&self, args: ProcessesArgs) -> anyhow::Result<()> {
        let processes: Vec<_> = match args.filter.as_deref() {
            Some(prefix) => find_processes(host_backend().as_ref(), prefix),
            None => list_processes(),
        }
        .into_iter()
        .sorted_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then(a.pid.cmp(&b.pid)))
        .collect();

        if processes.is_empty() {
            print_warning("No matching processes");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = processes
            .iter()
            .map(|p| vec![p.pid.to_string(), p.name.clone()])
            .collect();
        println!(
            "{}",
            self.table()
                .with_headers(&["PID", "Name"])
                .with_rows(&rows)
                .with_alignment(0, Alignment::Right)
                .build()
        );
        print_info(&format!("{} processes", processes.len()));
        Ok(())
    }

    fn handle_profiles(&self) -> anyhow::Result<()> {
        let host = HostOs::current();
        let rows: Vec<Vec<String>> = profiles()
            .map(|p| {
                vec![
                    p.id.key().to_string(),
                    p.display_name.to_string(),
                    p.process_prefix.to_string(),
                    p.module_candidates(host).join(", "),
                    format!("0x{:X}-0x{:X}/{}", p.scan_low, p.scan_high, p.scan_step),
                    if p.uses_indirect_pointer { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();

        println!(
            "{}",
            self.table()
                .with_headers(&["Key", "Emulator", "Process", "Modules", "Scan", "Indirect"])
                .with_rows(&rows)
                .build()
        );
        Ok(())
    }

    fn session(&self, config: &Config, emulator: Option<&str>) -> anyhow::Result<(Session, Option<EmulatorId>)> {
        let only = emulator
            .map(|key| EmulatorId::from_key(key).ok_or_else(|| MemoryError::UnknownEmulator(key.to_string())))
            .transpose()?;
        let session = match only {
            Some(id) => Session::from_config(&config.clone().with_only(id)),
            None => Session::from_config(config),
        };
        Ok((session, only))
    }

    fn connect<'s>(&self, session: &'s mut Session, only: Option<EmulatorId>) -> anyhow::Result<&'s Attachment> {
        let spinner = Spinner::new("Searching for a running emulator...");
        let (result, elapsed) = measure_time(|| match only {
            Some(id) => session.connect_to(id).map(|a| a.handle_id()),
            None => session.connect().map(|a| a.handle_id()),
        });
        spinner.clear();

        match result {
            Ok(_) => {
                let attachment = session.attachment().ok_or(MemoryError::NotConnected)?;
                print_success(&format!(
                    "Connected to {} in {}",
                    attachment.profile().display_name.bold(),
                    format_duration(elapsed)
                ));
                Ok(attachment)
            }
            Err(e) => {
                print_error(&e.to_string());
                Err(e.into())
            }
        }
    }

    fn handle_connect(&self, config: &Config, args: ConnectArgs) -> anyhow::Result<()> {
        let (mut session, only) = self.session(config, args.emulator.as_deref())?;
        let attachment = self.connect(&mut session, only)?;

        let module = match attachment.module_base() {
            ModuleBase::Absolute => "none (absolute scan)".to_string(),
            ModuleBase::Found(base) => format!("0x{:X}", base),
            ModuleBase::Fallback(base) => format!("0x{:X} (fallback)", base),
        };
        let check = validate_connection(attachment);
        let check_detail = match check {
            ConnectionCheck::MemoryPointer(p) => format!("memory pointer 0x{:08X}", p),
            ConnectionCheck::MapIndex(m) => format!("map index {}", m),
            ConnectionCheck::Partial => "no test read succeeded".to_string(),
        };

        let rows = vec![
            vec!["Process".to_string(), format!("{} (pid {})", attachment.process().name, attachment.process().pid)],
            vec!["Module base".to_string(), module],
            vec!["Guest RAM base".to_string(), format!("0x{:X}", attachment.guest_ram_base())],
            vec!["Connection".to_string(), format!("{} ({})", check.label(), check_detail)],
        ];
        println!("{}", self.table().with_border_style(BorderStyle::None).with_rows(&rows).build());

        session.disconnect();
        Ok(())
    }

    fn handle_read(&self, config: &Config, args: ReadArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow!(e))?;
        let address = parse_hex_u32(&args.address)
            .with_context(|| format!("Invalid guest address '{}'", args.address))?;

        let (mut session, only) = self.session(config, args.emulator.as_deref())?;
        self.connect(&mut session, only)?;

        if args.float {
            let value = session.read_f32(address)?;
            println!("0x{:08X}: {}", address, value);
        } else {
            let value = session.read_width(address, args.width)?;
            let digits = args.width * 2;
            println!("0x{:08X}: 0x{:0digits$X} ({})", address, value, value, digits = digits);
        }
        Ok(())
    }

    fn handle_track(&self, config: &Config, args: TrackArgs) -> anyhow::Result<()> {
        let (session, _) = self.session(config, args.emulator.as_deref())?;
        let mut poller = Poller::new(session, config.tick_interval())
            .with_reconnect_ticks(config.reconnect_ticks);
        let show_all = args.all || !config.only_changes;

        print_info(&format!(
            "Tracking {} items at {} Hz",
            CATALOG.len(),
            config.poll_rate_hz
        ));

        poller.run(args.ticks, |event| match event {
            PollerEvent::Connecting => print_info("Attempting connection..."),
            PollerEvent::Connected { emulator, check } => {
                print_success(&format!("Connected to {} ({})", emulator, check.label()))
            }
            PollerEvent::ConnectFailed => print_warning("No emulator found, retrying"),
            PollerEvent::Lost => print_warning("Emulator closed"),
            PollerEvent::Paused { game_mode } => {
                print_info(&format!("Waiting for gameplay (mode {})", game_mode))
            }
            PollerEvent::ReadFailed(reason) => print_warning(reason),
            PollerEvent::Changes(changes) => {
                for change in changes {
                    println!("  {} {}", "~".cyan(), change);
                }
            }
        });

        if show_all {
            self.print_snapshot(poller.tracker().snapshot());
        }
        Ok(())
    }

    fn print_snapshot(&self, snapshot: &Snapshot) {
        if snapshot.is_empty() {
            print_warning("No item values were read");
            return;
        }
        let rows: Vec<Vec<String>> = CATALOG
            .iter()
            .filter_map(|item| {
                snapshot
                    .get(item.name)
                    .map(|value| {
                        let shown = match (item.is_toggle(), value) {
                            (true, 0) => "no".to_string(),
                            (true, _) => "yes".to_string(),
                            (false, n) => n.to_string(),
                        };
                        vec![item.category.to_string(), item.name.to_string(), shown]
                    })
            })
            .collect();
        println!(
            "{}",
            self.table()
                .with_headers(&["Category", "Item", "Value"])
                .with_rows(&rows)
                .with_alignment(2, Alignment::Right)
                .build()
        );
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

//! `vgtimer run`: the polling loop.
//!
//! Trigger identifiers arrive one per line on stdin and are queued on a
//! channel; the loop applies them between ticks, so a tick never observes a
//! half-applied trigger.
//!
//! Stdin is read on a plain thread. A blocked read cannot be cancelled, and
//! a detached thread does not hold the process open after Ctrl-C.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Args;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use vgtimer_core::{Bindings, Clock, Config, Event, SystemClock, TimerGroup};

use crate::display;

const TRIGGER_QUEUE: usize = 32;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Config file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Polling interval in milliseconds (overrides the config file)
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// Print JSON events and snapshots instead of the text display
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Owns the group and everything needed to react to triggers and ticks.
pub struct Driver<C: Clock> {
    group: TimerGroup,
    bindings: Bindings,
    clock: C,
    mode: OutputMode,
}

impl<C: Clock> Driver<C> {
    pub fn new(bindings: Bindings, clock: C, mode: OutputMode) -> Self {
        Self {
            group: TimerGroup::new(),
            bindings,
            clock,
            mode,
        }
    }

    pub fn group(&self) -> &TimerGroup {
        &self.group
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Dispatch one identifier. Unbound identifiers are ignored.
    pub fn on_trigger(&mut self, identifier: &str, out: &mut impl Write) -> io::Result<Vec<Event>> {
        let now = self.clock.now();
        let mut events = Vec::new();
        for trigger in self.bindings.dispatch_str(identifier.trim()) {
            info!(%trigger, identifier = identifier.trim(), "trigger received");
            if let Some(event) = self.group.apply(trigger, now) {
                if self.mode == OutputMode::Json {
                    writeln!(out, "{}", serde_json::to_string(&event)?)?;
                }
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Roll timers forward and redraw. Nothing is drawn while stopped.
    pub fn on_tick(&mut self, out: &mut impl Write) -> io::Result<()> {
        let now = self.clock.now();
        for event in self.group.update(now) {
            debug!(?event, "timer event");
        }
        if !self.group.is_running() {
            return Ok(());
        }

        match self.mode {
            OutputMode::Text => {
                let line = display::render_status_line(&self.group.readings(now));
                write!(out, "\r{line}\x1b[K")?;
            }
            OutputMode::Json => {
                writeln!(out, "{}", serde_json::to_string(&self.group.snapshot(now))?)?;
            }
        }
        out.flush()
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default(args.config.as_deref());
    let bindings = Bindings::from_config(&config.bindings);
    let period = match args.interval_ms {
        Some(ms) => Duration::from_millis(ms.max(1)),
        None => config.update_interval(),
    };
    let mode = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    info!(period_ms = period.as_millis() as u64, ?mode, "starting timers");
    for (action, stroke) in bindings.iter() {
        debug!(%action, %stroke, "binding");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let (tx, rx) = mpsc::channel(TRIGGER_QUEUE);
    thread::Builder::new()
        .name("vgtimer-stdin".into())
        .spawn(move || read_identifiers(io::stdin().lock(), tx))?;

    runtime.block_on(async move {
        let driver = Driver::new(bindings, SystemClock, mode);
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "unable to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        };
        drive(driver, rx, period, &mut io::stdout(), shutdown).await
    })?;
    runtime.shutdown_background();

    println!();
    info!("timers stopped");
    Ok(())
}

/// Forward lines to the trigger queue until EOF or until the loop is gone.
fn read_identifiers(input: impl BufRead, tx: mpsc::Sender<String>) {
    for line in input.lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(line).is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read trigger");
                return;
            }
        }
    }
    debug!("stdin closed, no more triggers");
}

/// Run until `shutdown` resolves. Closing the trigger queue does not stop
/// the loop.
pub async fn drive<C, W, S>(
    mut driver: Driver<C>,
    mut triggers: mpsc::Receiver<String>,
    period: Duration,
    out: &mut W,
    shutdown: S,
) -> io::Result<Driver<C>>
where
    C: Clock,
    W: Write,
    S: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);
    let mut queue_open = true;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            identifier = triggers.recv(), if queue_open => match identifier {
                Some(identifier) => {
                    driver.on_trigger(&identifier, out)?;
                }
                None => queue_open = false,
            },
            _ = ticker.tick() => driver.on_tick(out)?,
        }
    }
    Ok(driver)
}

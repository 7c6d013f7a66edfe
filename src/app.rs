use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use fastdraw_core::{Host, RoundResult, SessionSummary, TargetChange};
use fastdraw_drill::{DrillConfig, RoundController};
use fastdraw_timing::{MonotonicClock, PoolConfig, WorkerPool};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::host::ConsoleHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
    Hit,
    Miss,
    Remove,
    Status,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        Some(match line.trim().to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "p" | "pause" => Command::Pause,
            "r" | "resume" => Command::Resume,
            "reset" => Command::Reset,
            "h" | "hit" => Command::Hit,
            "m" | "miss" => Command::Miss,
            "remove" => Command::Remove,
            "s" | "status" => Command::Status,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return None,
        })
    }
}

#[derive(Debug, Serialize)]
struct SessionReport {
    summary: Option<SessionSummary>,
    results: Vec<RoundResult>,
}

pub struct App {
    drill: RoundController<MonotonicClock, StdRng>,
    host: Arc<ConsoleHost>,
    // dropped last so no callback outlives its runtime
    _pool: WorkerPool,
}

impl App {
    pub fn new(config_path: Option<PathBuf>, seed: Option<u64>, pool: PoolConfig) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                DrillConfig::from_json(&raw).with_context(|| format!("parsing {}", path.display()))?
            }
            None => DrillConfig::default(),
        };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let pool = WorkerPool::new(pool)?;
        tracing::info!(workers = pool.config().worker_threads, "scheduler pool ready");
        let host = Arc::new(ConsoleHost::new());
        let drill = RoundController::new(
            config,
            Host::from_shared(host.clone()),
            pool.scheduler(),
            MonotonicClock::new(),
            rng,
        )?;

        Ok(Self {
            drill,
            host,
            _pool: pool,
        })
    }

    pub fn run(self) -> Result<()> {
        println!("=== COWBOY FAST DRAW ===");
        println!("Commands: h(it) m(iss) p(ause) r(esume) reset remove s(tatus) q(uit)\n");
        self.drill.start();

        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("reading stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Some(Command::Quit) => break,
                Some(cmd) => self.dispatch(cmd),
                None => println!("unknown command: {}", line.trim()),
            }
        }

        self.finish()
    }

    fn dispatch(&self, cmd: Command) {
        let handled = match cmd {
            Command::Start => self.drill.start(),
            Command::Pause => self.drill.pause(),
            Command::Resume => self.drill.resume(),
            Command::Reset => self.drill.reset(),
            Command::Hit | Command::Miss if !self.host.detection_enabled() => {
                tracing::debug!("shot while detection paused");
                false
            }
            Command::Hit => self.drill.report_hit(true),
            Command::Miss => self.drill.report_hit(false),
            Command::Remove => match self.host.remove_latest() {
                Some(key) => self.drill.target_update(key, TargetChange::Removed),
                None => false,
            },
            Command::Status => {
                println!("{:?}", self.drill.snapshot());
                true
            }
            Command::Quit => false,
        };
        if !handled {
            tracing::debug!(?cmd, "command had no effect");
        }
    }

    fn finish(self) -> Result<()> {
        self.drill.destroy();
        let report = SessionReport {
            summary: self.drill.summary(),
            results: self.drill.results(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(" H "), Some(Command::Hit));
        assert_eq!(Command::parse("pause"), Some(Command::Pause));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("reload"), None);
    }
}

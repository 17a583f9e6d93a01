use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .ok();
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: u128,
    pub actor: String,
    pub action: String,
}

impl LogEntry {
    fn new(actor: &str, action: &str) -> Self {
        Self { timestamp: now_millis(), actor: actor.to_string(), action: action.to_string() }
    }
}

/// Intents recorded during one shuffle generation.
#[derive(Debug, Default)]
pub struct DealLog {
    pub generation: u64,
    pub events: Vec<LogEntry>,
}

/// Journal of everything the players did this session, one block per deal.
#[derive(Debug)]
pub struct SessionLog {
    pub session_name: String,
    pub deals: Vec<DealLog>,
    setup: Vec<LogEntry>,
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLog {
    pub fn new() -> Self {
        Self { session_name: format!("session-{}", now_millis() / 1000), deals: Vec::new(), setup: Vec::new() }
    }

    pub fn start_deal(&mut self, generation: u64) {
        self.deals.push(DealLog { generation, events: Vec::new() });
    }

    /// Before the first deal, entries land in the setup block.
    pub fn record(&mut self, actor: &str, action: &str) {
        let entry = LogEntry::new(actor, action);
        match self.deals.last_mut() {
            Some(deal) => deal.events.push(entry),
            None => self.setup.push(entry),
        }
    }

    pub fn setup_events(&self) -> &[LogEntry] {
        &self.setup
    }

    pub fn render(&self) -> String {
        let mut out = format!("=== Session Log: {} ===\n", self.session_name);
        let line = |e: &LogEntry| format!("[{}] {}: {}\n", e.timestamp, e.actor, e.action);
        if !self.setup.is_empty() {
            out.push_str("-- Setup --\n");
            self.setup.iter().for_each(|e| out.push_str(&line(e)));
        }
        for deal in &self.deals {
            out.push_str(&format!("-- Deal {} --\n", deal.generation));
            deal.events.iter().for_each(|e| out.push_str(&line(e)));
        }
        out
    }
}

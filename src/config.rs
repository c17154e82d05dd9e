use configparser::ini::Ini;
use log::{info, warn};
use std::path::Path;
use std::sync::{LazyLock, Mutex};

const CONFIG_PATH: &str = "ringrush.ini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub audio_enabled: bool,
    /// Master volume, 0.0 to 2.0.
    pub volume: f32,
    pub log_level: LogLevel,
    /// Seat keys for players 1..3, stored as uppercase ASCII.
    pub seat_keys: [char; 3],
}

impl Default for Config {
    fn default() -> Self {
        Config {
            audio_enabled: true,
            volume: 0.8,
            log_level: LogLevel::Warn,
            seat_keys: ['Z', 'B', 'M'],
        }
    }
}

// Global, mutable configuration instance.
static CONFIG: LazyLock<Mutex<Config>> = LazyLock::new(|| Mutex::new(Config::default()));

fn create_default_config_file() -> Result<(), std::io::Error> {
    info!("'{CONFIG_PATH}' not found, creating with default values.");
    let default = Config::default();

    let mut content = String::new();
    content.push_str("[Options]\n");
    content.push_str(&format!(
        "Audio={}\n",
        if default.audio_enabled { "1" } else { "0" }
    ));
    content.push_str(&format!("LogLevel={}\n", default.log_level.as_str()));
    content.push_str(&format!("Volume={}\n", default.volume));
    content.push_str("\n[Keys]\n");
    content.push_str(&format!("Player1={}\n", default.seat_keys[0]));
    content.push_str(&format!("Player2={}\n", default.seat_keys[1]));
    content.push_str(&format!("Player3={}\n", default.seat_keys[2]));

    std::fs::write(CONFIG_PATH, content)
}

// Seat bindings are single printable ASCII characters, matched
// case-insensitively against the pressed key.
fn parse_seat_key(raw: &str) -> Option<char> {
    let mut chars = raw.trim().chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_ascii_graphic() {
        return None;
    }
    Some(c.to_ascii_uppercase())
}

pub fn load() {
    if !Path::new(CONFIG_PATH).exists()
        && let Err(e) = create_default_config_file()
    {
        warn!("Failed to create default config file: {e}");
    }

    let mut ini = Ini::new();
    match ini.load(CONFIG_PATH) {
        Ok(_) => {
            let mut cfg = CONFIG.lock().unwrap();
            let default = Config::default();

            cfg.audio_enabled = ini
                .get("options", "audio")
                .and_then(|v| v.parse::<u8>().ok())
                .map_or(default.audio_enabled, |v| v != 0);
            cfg.volume = ini
                .get("options", "volume")
                .and_then(|v| v.parse::<f32>().ok())
                .map_or(default.volume, |v| v.clamp(0.0, 2.0));
            cfg.log_level = ini
                .get("options", "loglevel")
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(default.log_level);

            for (seat, key) in ["player1", "player2", "player3"].iter().enumerate() {
                if let Some(raw) = ini.get("keys", key) {
                    match parse_seat_key(&raw) {
                        Some(c) => cfg.seat_keys[seat] = c,
                        None => warn!("Ignoring invalid {key} binding {raw:?}"),
                    }
                }
            }
            let [a, b, c] = cfg.seat_keys;
            if a == b || a == c || b == c {
                warn!("Seat keys must be distinct; reverting to defaults");
                cfg.seat_keys = default.seat_keys;
            }
        }
        Err(e) => warn!("Failed to read '{CONFIG_PATH}': {e}; using defaults"),
    }

    info!("Config loaded: {:?}", get());
}

pub fn get() -> Config {
    *CONFIG.lock().unwrap()
}

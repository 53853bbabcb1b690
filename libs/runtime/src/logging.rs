use crate::config::{LoggingConfig, Section};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 5;

// -------- level helpers --------
fn parse_tracing_level(s: &str) -> Option<tracing::Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

fn level_filter(s: &str) -> LevelFilter {
    parse_tracing_level(s).map_or(LevelFilter::OFF, LevelFilter::from_level)
}

/// Returns true if target == crate_name or target starts with "crate_name::"
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || (target.starts_with(crate_name) && target[crate_name.len()..].starts_with("::"))
}

// -------- rotating writer for files --------
#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

// A writer handle that may be None (drops writes)
struct RoutedWriter(Option<RotWriter>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Route log records to different files by target prefix, e.g. "odata_client".
#[derive(Default)]
struct MultiFileRouter {
    default: Option<RotWriter>,
    by_prefix: HashMap<String, RotWriter>,
}

impl MultiFileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_crate_prefix(target, prefix))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for MultiFileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.resolve_for(meta.target()))
    }
}

// -------- path resolution helpers --------

/// Resolve a log file path against `base_dir`.
/// Absolute paths are kept as-is; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn file_limit(section: &Section) -> FileLimit {
    match section.max_age_days {
        Some(days) => FileLimit::Age(chrono::Duration::days(i64::from(days))),
        None => FileLimit::MaxFiles(section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS)),
    }
}

/// Create a rotating writer for log files, ensuring the parent directory exists.
fn create_rotating_writer_at_path(
    log_path: &Path,
    max_bytes: usize,
    limit: FileLimit,
) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None, // file permissions (Unix only)
    );

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn create_file_writer(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let max_mb = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB);
    let max_bytes = usize::try_from(max_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX);
    let log_path = resolve_log_path(&section.file, base_dir);

    match create_rotating_writer_at_path(&log_path, max_bytes, file_limit(section)) {
        Ok(writer) => Some(writer),
        Err(e) => {
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                log_path.to_string_lossy(),
                e
            );
            None
        }
    }
}

// -------- filters --------

fn build_console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .map_or(LevelFilter::OFF, |s| level_filter(&s.console_level));

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |targets, (name, section)| {
            targets.with_target(name.clone(), level_filter(&section.console_level))
        })
}

/// Subsystems without their own file inherit the default file level, since
/// their records are routed to the default file.
fn build_file_targets(cfg: &LoggingConfig, router: &MultiFileRouter) -> Targets {
    let default = match (cfg.get(DEFAULT_SECTION), &router.default) {
        (Some(section), Some(_)) => level_filter(&section.file_level),
        _ => LevelFilter::OFF,
    };

    cfg.iter()
        .filter(|(name, _)| router.by_prefix.contains_key(name.as_str()))
        .fold(Targets::new().with_default(default), |targets, (name, section)| {
            targets.with_target(name.clone(), level_filter(&section.file_level))
        })
}

fn build_file_router(cfg: &LoggingConfig, base_dir: &Path) -> MultiFileRouter {
    let mut router = MultiFileRouter::default();
    for (name, section) in cfg {
        let Some(writer) = create_file_writer(name, section, base_dir) else {
            continue;
        };
        if name == DEFAULT_SECTION {
            router.default = Some(writer);
        } else {
            router.by_prefix.insert(name.clone(), writer);
        }
    }
    router
}

// -------- public init --------

/// Initialize logging from a configuration.
/// - `cfg`: LoggingConfig containing the logging sections
/// - `base_dir`: base directory used to resolve relative log file paths
///
/// Console output is human-readable; files get one JSON object per line.
/// Calling this more than once is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` → `tracing` *before* installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let ansi = std::io::stdout().is_terminal();
    let console_layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(build_console_targets(cfg));

    let router = build_file_router(cfg, base_dir);
    let file_layer = if router.is_empty() {
        None
    } else {
        let targets = build_file_targets(cfg, &router);
        Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router)
                .with_filter(targets),
        )
    };

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

// =================== tests ===================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_logging_config, AppConfig};
    use std::fs;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_age_days: None,
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Info"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("ERROR"), Some(Level::ERROR));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("invalid"), Some(Level::INFO)); // defaults to INFO
        assert_eq!(level_filter(""), LevelFilter::INFO);
        assert_eq!(level_filter("off"), LevelFilter::OFF);
    }

    #[test]
    fn test_crate_prefix_matching() {
        assert!(matches_crate_prefix("odata_client", "odata_client"));
        assert!(matches_crate_prefix("odata_client::client", "odata_client"));
        assert!(!matches_crate_prefix("odata_client_ext", "odata_client"));
        assert!(!matches_crate_prefix("table_query", "odata_client"));
    }

    #[test]
    fn test_file_paths_resolved_against_base_dir() {
        let tmp = tempdir().unwrap();
        let base_dir = tmp.path();

        let resolved = resolve_log_path("logs/test.log", base_dir);
        assert!(resolved.starts_with(base_dir));
        assert!(resolved.ends_with("logs/test.log"));

        let abs = base_dir.join("abs.log");
        assert_eq!(resolve_log_path(abs.to_str().unwrap(), Path::new("/elsewhere")), abs);
    }

    #[test]
    fn test_create_rotating_writer_at_path_creates_parent() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nested/dir/app.log");

        let res = create_rotating_writer_at_path(&p, 128 * 1024, FileLimit::MaxFiles(2));
        assert!(res.is_ok(), "writer should be created");
        assert!(p.parent().unwrap().exists(), "parent dir must be created");
    }

    #[test]
    fn test_router_prefers_subsystem_file() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert(DEFAULT_SECTION.into(), section("info", "logs/all.log", "debug"));
        cfg.insert("odata_client".into(), section("debug", "logs/http.log", "trace"));
        cfg.insert("table_query".into(), section("warn", "", ""));

        let router = build_file_router(&cfg, tmp.path());
        assert!(router.default.is_some());
        assert_eq!(router.by_prefix.len(), 1);
        assert!(router.by_prefix.contains_key("odata_client"));

        let mut w = RoutedWriter(router.resolve_for("odata_client::client"));
        w.write_all(b"{\"msg\":\"http\"}\n").unwrap();
        w.flush().unwrap();
        let mut w = RoutedWriter(router.resolve_for("table_query::translate"));
        w.write_all(b"{\"msg\":\"translate\"}\n").unwrap();
        w.flush().unwrap();

        let http = fs::read_to_string(tmp.path().join("logs/http.log")).unwrap();
        let all = fs::read_to_string(tmp.path().join("logs/all.log")).unwrap();
        assert!(http.contains("http"));
        assert!(!http.contains("translate"));
        assert!(all.contains("translate"));
    }

    #[test]
    fn test_writer_without_file_drops_records() {
        let mut w = RoutedWriter(None);
        assert_eq!(w.write(b"lost").unwrap(), 4);
        assert!(w.flush().is_ok());
    }

    #[test]
    fn test_targets_follow_sections() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert("odata_client".into(), section("debug", "", "off"));

        let console = build_console_targets(&cfg);
        assert!(console.would_enable("odata_client::client", &Level::DEBUG));
        assert!(!console.would_enable("table_query", &Level::DEBUG));
        assert!(console.would_enable("table_query", &Level::INFO));

        let router = build_file_router(&cfg, tmp.path());
        let files = build_file_targets(&cfg, &router);
        // no file of its own: routed to the default file at its level
        assert!(files.would_enable("odata_client", &Level::DEBUG));
        assert!(!files.would_enable("odata_client", &Level::TRACE));
    }

    #[test]
    fn test_age_limit_takes_precedence() {
        let mut s = section("info", "x.log", "info");
        assert!(matches!(file_limit(&s), FileLimit::MaxFiles(2)));
        s.max_age_days = Some(7);
        assert!(matches!(file_limit(&s), FileLimit::Age(_)));
    }

    #[test]
    fn test_config_logging_integration_with_base_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.yaml");
        let log_dir = temp_dir.path().to_string_lossy().replace('\\', "/");

        let yaml_content = format!(
            r#"
log_dir: "{log_dir}"

logging:
  default:
    console_level: info
    file: ""
    file_level: debug
  odata_client:
    console_level: debug
    file: "logs/http_test.log"
    file_level: warn
    max_size_mb: 5
    max_backups: 2
"#
        );

        fs::write(&config_path, yaml_content).unwrap();

        let config = AppConfig::load_layered_with_prefix(&config_path, "TQ_TEST_LOG__").unwrap();

        let abs = resolve_log_path("logs/http_test.log", &config.log_base_dir());
        assert!(abs.starts_with(temp_dir.path()));
        assert!(abs.ends_with("logs/http_test.log"));
        let section = &config.logging.as_ref().unwrap()["odata_client"];
        assert_eq!(section.max_size_mb, Some(5));
        // not calling init to avoid side effects in tests
    }
}

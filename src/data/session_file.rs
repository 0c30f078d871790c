use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::{SESSION_PATH, SESSION_VERSION, session_filename};
use crate::engine::ChartSession;

/// Serialized session wrapper.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionFile {
    pub version: f64,
    pub timestamp_ms: i64,
    pub session: ChartSession,
}

impl SessionFile {
    pub fn new(session: ChartSession) -> Self {
        Self {
            version: SESSION_VERSION,
            timestamp_ms: Utc::now().timestamp_millis(),
            session,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open session file: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let loaded: SessionFile = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize session: {:?}", path))?;

        if loaded.version != SESSION_VERSION {
            bail!(
                "Session file {:?} has version {}, expected {}",
                path,
                loaded.version,
                SESSION_VERSION
            );
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_session_serde {
            log::debug!(
                "Loaded session '{}' ({} securities) from {:?}",
                loaded.session.title,
                loaded.session.securities.len(),
                path
            );
        }
        Ok(loaded)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize session to: {}", path.display()))
    }

    pub fn default_session_path(name: &str) -> PathBuf {
        PathBuf::from(SESSION_PATH).join(session_filename(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Chart, MemoryChart};
    use crate::data::demo::DemoDataSource;
    use crate::domain::{Attribute, CustomBenchmark, MarketIndex, Security, SecurityId};
    use crate::engine::ChartEngine;

    fn demo_engine() -> ChartEngine<MemoryChart> {
        ChartEngine::new(
            MemoryChart::new(),
            Box::new(DemoDataSource::new(false)),
            Attribute::new("price", "Price").with_unit("USD"),
        )
    }

    #[test]
    fn session_round_trips_through_a_file() {
        let mut engine = demo_engine();
        engine.set_title("Telecoms");
        engine.change_date_range("2024-01-01", "2024-03-01").unwrap();
        engine.add_security(Security::new("1", "T")).unwrap();
        engine
            .add_attr(
                Attribute::new("volume", "Volume").with_unit("Shares"),
                &SecurityId::from("1"),
            )
            .unwrap();
        engine
            .add_market_indicator(MarketIndex::new("SPX", "S&P 500"))
            .unwrap();
        engine
            .add_custom_benchmark(CustomBenchmark {
                sector: Some("Telecom".into()),
                wal: Some("7".into()),
                rating: Some("BBB".into()),
                analytic: Some(Attribute::new("oas", "OAS").with_unit("bp")),
            })
            .unwrap();

        let path = std::env::temp_dir()
            .join(format!("decorated_chart_session_{}", std::process::id()))
            .join(session_filename("roundtrip"));
        SessionFile::new(engine.snapshot()).save_to_path(&path).unwrap();
        let loaded = SessionFile::load_from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.session, engine.snapshot());

        let mut restored = demo_engine();
        let errors = restored.restore(loaded.session);
        assert!(errors.is_empty(), "{:?}", errors);

        assert_eq!(restored.chart().title(), "Telecoms");
        assert_eq!(restored.snapshot(), engine.snapshot());
        assert_eq!(restored.export_table(), engine.export_table());
    }

    #[test]
    fn missing_file_is_an_error_with_context() {
        let err = SessionFile::load_from_path(Path::new("/nonexistent/session.bin")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open session file"));
    }

    #[test]
    fn default_path_uses_session_dir() {
        let path = SessionFile::default_session_path("rates");
        assert_eq!(path, PathBuf::from("chart_sessions").join("session_rates_v1.bin"));
    }
}

use minijinja::context;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::MapConfig;
use crate::core::error::{AppError, Result};
use crate::features::locator::models::{GpsCoordinate, MapArtifact, ResolvedAddress};
use crate::shared::templates::render_template;

const POPUP_MAX_WIDTH: u32 = 300;

/// Renders single-marker Leaflet maps and stores them per request.
///
/// Documents are named by a UUIDv7, so their age is read from the id and
/// anything past `MapConfig::retention` is swept when a new map is written.
pub struct MapService {
    map_dir: PathBuf,
    config: MapConfig,
}

impl MapService {
    pub fn new(map_dir: impl Into<PathBuf>, config: MapConfig) -> Self {
        Self {
            map_dir: map_dir.into(),
            config,
        }
    }

    /// Build the map document for a located photo
    pub fn render(&self, coordinate: GpsCoordinate, address: &ResolvedAddress) -> Result<String> {
        let popup_html = render_template(
            "map/popup.html",
            context! {
                street => &address.street,
                city => &address.city,
                country => &address.country,
                coordinates => coordinate.display(),
            },
        )?;

        // Leaflet inserts tooltip text as HTML, same as the popup
        let tooltip = render_template(
            "map/tooltip.html",
            context! {
                street => &address.street,
                city => &address.city,
                country => &address.country,
            },
        )?;

        Ok(render_template(
            "map/document.html",
            context! {
                lat => coordinate.lat,
                lon => coordinate.lon,
                zoom => self.config.zoom,
                tile_url => &self.config.tile_url,
                tile_attribution => &self.config.tile_attribution,
                tooltip => tooltip,
                popup_html => popup_html,
                popup_max_width => POPUP_MAX_WIDTH,
            },
        )?)
    }

    /// Render and write a new map document
    pub async fn create(
        &self,
        coordinate: GpsCoordinate,
        address: &ResolvedAddress,
    ) -> Result<MapArtifact> {
        let document = self.render(coordinate, address)?;
        self.sweep_expired().await;

        let id = Uuid::now_v7();
        let path = self.path_for(id);
        tokio::fs::write(&path, document).await.map_err(|e| {
            AppError::Internal(format!("Failed to write map {}: {}", path.display(), e))
        })?;

        info!("Map saved: id={}, path={}", id, path.display());

        Ok(MapArtifact { id, path })
    }

    /// Read a stored map document
    pub async fn load(&self, id: &str) -> Result<String> {
        let id = Uuid::parse_str(id)
            .map_err(|_| AppError::NotFound(format!("Invalid map id: {}", id)))?;

        let path = self.path_for(id);
        match tokio::fs::read_to_string(&path).await {
            Ok(document) => Ok(document),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("Map {} not found", id)))
            }
            Err(e) => Err(AppError::Internal(format!(
                "Failed to read map {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.map_dir.join(format!("{}.html", id))
    }

    /// Remove stored documents older than the retention window (best-effort)
    async fn sweep_expired(&self) {
        let Some(cutoff) = SystemTime::now().checked_sub(self.config.retention) else {
            return;
        };

        let mut entries = match tokio::fs::read_dir(&self.map_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list maps in {}: {}", self.map_dir.display(), e);
                return;
            }
        };

        let mut removed = 0usize;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read map entry: {}", e);
                    break;
                }
            };

            let path = entry.path();
            match document_created_at(&path) {
                Some(created) if created < cutoff => {}
                _ => continue,
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove expired map {}: {}", path.display(), e),
            }
        }

        if removed > 0 {
            debug!("Swept {} expired maps", removed);
        }
    }
}

/// Creation time encoded in a `<uuid>.html` document name
fn document_created_at(path: &Path) -> Option<SystemTime> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
        return None;
    }
    let id = Uuid::parse_str(path.file_stem()?.to_str()?).ok()?;
    let (secs, nanos) = id.get_timestamp()?.to_unix();
    Some(UNIX_EPOCH + Duration::new(secs, nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::{NoContext, Timestamp};

    /// Decoded string argument of the first `.bindTooltip(...)` call
    fn tooltip_argument(html: &str) -> String {
        let start = html.find(".bindTooltip(").unwrap() + ".bindTooltip(".len();
        let end = start + html[start..].find(")\n").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    fn id_aged(age: Duration) -> Uuid {
        let created = SystemTime::now() - age;
        let since_epoch = created.duration_since(UNIX_EPOCH).unwrap();
        Uuid::new_v7(Timestamp::from_unix(
            NoContext,
            since_epoch.as_secs(),
            since_epoch.subsec_nanos(),
        ))
    }

    fn address() -> ResolvedAddress {
        ResolvedAddress {
            street: "Galata Kulesi Sokağı".to_string(),
            city: "İstanbul".to_string(),
            country: "Türkiye".to_string(),
        }
    }

    fn service(dir: &std::path::Path) -> MapService {
        MapService::new(dir, MapConfig::default())
    }

    #[test]
    fn test_render_single_marker_with_popup() {
        let dir = tempfile::tempdir().unwrap();
        let html = service(dir.path())
            .render(GpsCoordinate::new(41.025631, 28.974298), &address())
            .unwrap();

        assert_eq!(html.matches("L.marker(").count(), 1);
        assert!(html.contains("L.marker([41.025631, 28.974298]"));
        assert!(html.contains("zoom: 15"));
        assert!(html.contains("Galata Kulesi Sokağı"));
        assert!(html.contains("İstanbul"));
        assert!(html.contains("Türkiye"));
        assert!(html.contains("41.025631, 28.974298"));
        assert!(html.contains("\"camera\""));
        assert!(html.contains("maxWidth: 300"));
    }

    #[test]
    fn test_render_escapes_address_markup() {
        let dir = tempfile::tempdir().unwrap();
        let mut addr = address();
        addr.street = "</script><script>alert(1)</script>".to_string();

        let html = service(dir.path())
            .render(GpsCoordinate::new(1.0, 2.0), &addr)
            .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert_eq!(html.matches("</script>").count(), 3);
    }

    #[test]
    fn test_tooltip_is_html_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let mut addr = address();
        addr.street = "<img src=x onerror=alert(1)>".to_string();
        addr.city = "Tom & Jerry".to_string();

        let html = service(dir.path())
            .render(GpsCoordinate::new(1.0, 2.0), &addr)
            .unwrap();

        let tooltip = tooltip_argument(&html);
        assert!(!tooltip.contains('<'), "{}", tooltip);
        assert!(tooltip.starts_with("📍 Fotoğraf konumu: &lt;img"));
        assert!(tooltip.contains("Tom &amp; Jerry"));
        assert!(tooltip.ends_with(", Türkiye"));
    }

    #[tokio::test]
    async fn test_create_sweeps_expired_documents() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let expired = dir.path().join(format!("{}.html", id_aged(Duration::from_secs(7200))));
        let fresh = dir.path().join(format!("{}.html", id_aged(Duration::from_secs(60))));
        let unrelated = dir.path().join("notes.html");
        for path in [&expired, &fresh, &unrelated] {
            std::fs::write(path, "<html></html>").unwrap();
        }

        let artifact = service
            .create(GpsCoordinate::new(41.0, 29.0), &address())
            .await
            .unwrap();

        assert!(!expired.exists());
        assert!(fresh.exists());
        assert!(unrelated.exists());
        assert!(artifact.path.exists());
    }

    #[tokio::test]
    async fn test_zero_retention_keeps_only_latest() {
        let dir = tempfile::tempdir().unwrap();
        let config = MapConfig {
            retention: Duration::ZERO,
            ..MapConfig::default()
        };
        let service = MapService::new(dir.path(), config);
        let coordinate = GpsCoordinate::new(41.0, 29.0);

        let first = service.create(coordinate, &address()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = service.create(coordinate, &address()).await.unwrap();

        assert!(!first.path.exists());
        assert!(second.path.exists());
    }

    #[tokio::test]
    async fn test_create_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let artifact = service
            .create(GpsCoordinate::new(41.0, 29.0), &address())
            .await
            .unwrap();

        assert!(artifact.path.starts_with(dir.path()));
        assert_eq!(artifact.url(), format!("/maps/{}", artifact.id));
        let stored = service.load(&artifact.id.to_string()).await.unwrap();
        assert!(stored.contains("L.marker([41.0, 29.0]"));
    }

    #[tokio::test]
    async fn test_same_input_gives_identical_documents() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let coordinate = GpsCoordinate::new(41.026, 28.974333);

        let first = service.create(coordinate, &address()).await.unwrap();
        let second = service.create(coordinate, &address()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(
            std::fs::read_to_string(&first.path).unwrap(),
            std::fs::read_to_string(&second.path).unwrap()
        );
    }

    #[tokio::test]
    async fn test_load_unknown_or_invalid_id() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        assert!(matches!(
            service.load("../../etc/passwd").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.load(&Uuid::now_v7().to_string()).await,
            Err(AppError::NotFound(_))
        ));
    }
}

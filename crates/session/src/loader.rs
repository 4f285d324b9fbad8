//! One-shot point data loading for native hosts.
//!
//! The document is fetched once and parsed in full; there is no streaming
//! and no automatic retry.

use crate::error::{Result, SessionError};
use pointradius_core::config::DataConfig;
use pointradius_geo::PointSet;
use pointradius_telemetry::{names, Timer};
use std::path::PathBuf;

/// Where the point document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointSource {
    Http(String),
    File(PathBuf),
}

impl PointSource {
    /// Interprets `http://` and `https://` sources as URLs, anything else as a path.
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl From<&DataConfig> for PointSource {
    fn from(config: &DataConfig) -> Self {
        Self::parse(&config.source)
    }
}

/// Loads and parses the point document.
///
/// # Errors
/// Returns [`SessionError::Http`] for a non-success response,
/// [`SessionError::DataLoad`] when the request itself fails,
/// [`SessionError::Io`] for unreadable files and [`SessionError::Geo`] when
/// the body is not JSON.
pub async fn load_points(source: &PointSource) -> Result<PointSet> {
    let timer = Timer::start(names::LOAD_DURATION_MS);

    let body = match source {
        PointSource::Http(url) => fetch(url).await?,
        PointSource::File(path) => tokio::fs::read_to_string(path).await?,
    };
    let points = PointSet::from_json_str(&body)?;

    let elapsed = timer.stop();
    tracing::info!(
        ?source,
        points = points.len(),
        elapsed_ms = elapsed.as_millis(),
        "Point data loaded"
    );
    Ok(points)
}

async fn fetch(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| SessionError::DataLoad(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SessionError::Http {
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| SessionError::DataLoad(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointradius_core::ErrorCode;
    use pointradius_geo::GeoPoint;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/deflockPoints.json", addr)
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            PointSource::parse("https://example.org/points.json"),
            PointSource::Http("https://example.org/points.json".to_string())
        );
        assert_eq!(
            PointSource::parse("./deflockPoints.json"),
            PointSource::File(PathBuf::from("./deflockPoints.json"))
        );
        assert!(matches!(PointSource::from(&DataConfig::default()), PointSource::File(_)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"elements":[{{"lat":"x","lon":5}},{{"lat":1,"lon":2}}]}}"#
        )
        .unwrap();

        let points = load_points(&PointSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(points.as_slice(), &[GeoPoint::new(1.0, 2.0)]);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_points(&PointSource::File(PathBuf::from("/nonexistent/points.json")))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileNotFound);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"elements\": [").unwrap();

        let err = load_points(&PointSource::File(file.path().to_path_buf()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataParseError);
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let url = serve_once("200 OK", r#"{"elements":[{"lat":45,"lon":-93},{"lat":46,"lon":-94}]}"#).await;

        let points = load_points(&PointSource::Http(url)).await.unwrap();
        assert_eq!(points.len(), 2);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let url = serve_once("404 Not Found", "").await;

        let err = load_points(&PointSource::Http(url)).await.unwrap_err();
        assert!(matches!(err, SessionError::Http { status: 404 }));
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // bind then drop to get a port with nothing listening
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let err = load_points(&PointSource::Http(format!("http://{}/points.json", addr)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataLoadFailed);
    }
}

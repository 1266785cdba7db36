// src/infrastructure/export/mod.rs
// Delivery-export download pipeline: CORS relay strategies, status mapping,
// spreadsheet decoder seam.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::errors::{AppError, AppResult, ExportError, ExportResult};

/// Hard timeout on one export download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

const SPREADSHEET_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Intermediary HTTP endpoint used to bypass cross-origin restrictions on the
/// portal export. One strategy per relay provider, selected by configuration.
pub trait CorsRelay: Send + Sync {
    /// Wrap the upstream URL into the URL actually requested.
    fn proxy_url(&self, upstream: &str) -> String;

    /// Extra request headers the relay expects.
    fn headers(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

pub struct AllOriginsRelay;

impl CorsRelay for AllOriginsRelay {
    fn proxy_url(&self, upstream: &str) -> String {
        format!("https://api.allorigins.win/raw?url={}", encode(upstream))
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        vec![("Accept", SPREADSHEET_MIME.to_string())]
    }
}

pub struct CorsProxyRelay;

impl CorsRelay for CorsProxyRelay {
    fn proxy_url(&self, upstream: &str) -> String {
        format!("https://corsproxy.io/?{}", encode(upstream))
    }
}

/// Resolve the relay named in the settings.
pub fn relay_for(name: &str) -> AppResult<Box<dyn CorsRelay>> {
    match name.to_lowercase().as_str() {
        "allorigins" => Ok(Box::new(AllOriginsRelay)),
        "corsproxy" => Ok(Box::new(CorsProxyRelay)),
        other => Err(AppError::Config(format!("Unsupported relay: {}", other))),
    }
}

fn encode(upstream: &str) -> String {
    url::form_urlencoded::byte_serialize(upstream.as_bytes()).collect()
}

/// Upstream seam for the import use case.
#[async_trait]
pub trait ExportSource: Send + Sync {
    /// Download the raw export for one technician (empty id = all).
    async fn download(&self, technician: &str) -> ExportResult<Vec<u8>>;
}

/// Downloads the spreadsheet export through the configured relay.
pub struct ExportDownloader {
    client: reqwest::Client,
    relay: Box<dyn CorsRelay>,
    export_url: String,
}

impl ExportDownloader {
    pub fn new(client: reqwest::Client, relay: Box<dyn CorsRelay>, export_url: String) -> Self {
        Self {
            client,
            relay,
            export_url,
        }
    }
}

#[async_trait]
impl ExportSource for ExportDownloader {
    async fn download(&self, technician: &str) -> ExportResult<Vec<u8>> {
        let upstream = format!("{}?statut=&technicien={}", self.export_url, technician);
        let url = self.relay.proxy_url(&upstream);

        let mut request = self.client.get(&url).timeout(DOWNLOAD_TIMEOUT);
        for (name, value) in self.relay.headers() {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Export download failed with status {}", status);
            return Err(status_error(status.as_u16()));
        }

        let body = response.bytes().await.map_err(classify_transport_error)?;
        Ok(body.to_vec())
    }
}

fn classify_transport_error(e: reqwest::Error) -> ExportError {
    if e.is_timeout() {
        ExportError::Timeout
    } else {
        log::warn!("Export download transport error: {}", e);
        ExportError::Network
    }
}

/// Map a non-2xx status to its user-facing error.
pub fn status_error(status: u16) -> ExportError {
    match status {
        401 => ExportError::NotAuthenticated,
        403 => ExportError::Forbidden,
        404 => ExportError::NotFound,
        500 | 502 | 503 | 504 => ExportError::Unavailable,
        other => ExportError::Download(other),
    }
}

/// A decoded sheet: its name plus rows of cell strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// External spreadsheet decoder collaborator. Implementations wrap whatever
/// binary decoding backend the embedding application ships; the pipeline only
/// relies on the tabular result.
pub trait SpreadsheetDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Sheet>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Run the decoder and keep the first sheet. Decoder failures collapse into
/// the single user-facing format message, with the underlying error logged; a
/// sheet without rows is reported as missing data.
pub fn decode_rows(decoder: &dyn SpreadsheetDecoder, bytes: &[u8]) -> ExportResult<Sheet> {
    let sheets = match decoder.decode(bytes) {
        Ok(sheets) => sheets,
        Err(e) => {
            log::error!("Erreur lors de l'analyse du fichier : {}", e);
            return Err(ExportError::InvalidFormat);
        }
    };

    sheets
        .into_iter()
        .next()
        .filter(|sheet| !sheet.rows.is_empty())
        .ok_or(ExportError::NoData)
}

/// Shape a sheet into header-keyed records: the first row names the columns,
/// every following row becomes one record. Short rows yield empty cells.
pub fn to_records(sheet: &Sheet) -> Vec<HashMap<String, String>> {
    let mut rows = sheet.rows.iter();
    let Some(headers) = rows.next() else {
        return Vec::new();
    };

    rows.map(|row| {
        headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect()
    })
    .collect()
}

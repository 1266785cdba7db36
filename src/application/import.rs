// src/application/import.rs
// Delivery-export import use case

use std::collections::HashMap;

use crate::domain::errors::{ExportError, ExportResult};
use crate::infrastructure::export::{decode_rows, to_records, ExportSource, SpreadsheetDecoder};

/// Failed attempts tolerated before the pipeline refuses to try again.
pub const MAX_ATTEMPTS: u32 = 3;

/// One delivery row of the export, keyed by its column header.
pub type DeliveryRecord = HashMap<String, String>;

/// Downloads, decodes and shapes the delivery export. Exclusive access
/// (`&mut self`) guarantees a single import in flight.
pub struct DeliveryImporter {
    source: Box<dyn ExportSource>,
    decoder: Box<dyn SpreadsheetDecoder>,
    failed_attempts: u32,
}

impl DeliveryImporter {
    pub fn new(source: Box<dyn ExportSource>, decoder: Box<dyn SpreadsheetDecoder>) -> Self {
        Self {
            source,
            decoder,
            failed_attempts: 0,
        }
    }

    /// Import the export for one technician (empty id = all technicians).
    /// Each failure consumes one attempt of the budget; a success resets it.
    pub async fn import(&mut self, technician: &str) -> ExportResult<Vec<DeliveryRecord>> {
        if self.failed_attempts >= MAX_ATTEMPTS {
            return Err(ExportError::MaxAttempts);
        }

        match self.run(technician).await {
            Ok(records) => {
                self.failed_attempts = 0;
                Ok(records)
            }
            Err(e) => {
                self.failed_attempts += 1;
                Err(e)
            }
        }
    }

    async fn run(&self, technician: &str) -> ExportResult<Vec<DeliveryRecord>> {
        let bytes = self.source.download(technician).await?;

        // An empty body never reaches the decoder.
        if bytes.is_empty() {
            return Err(ExportError::EmptyFile);
        }

        let sheet = decode_rows(self.decoder.as_ref(), &bytes)?;
        Ok(to_records(&sheet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::export::Sheet;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Scripted {
        Bytes(Vec<u8>),
        Failure(fn() -> ExportError),
    }

    struct FakeSource {
        script: Scripted,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn bytes(bytes: Vec<u8>) -> Self {
            Self {
                script: Scripted::Bytes(bytes),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(make: fn() -> ExportError) -> Self {
            Self {
                script: Scripted::Failure(make),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ExportSource for FakeSource {
        async fn download(&self, _technician: &str) -> ExportResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Scripted::Bytes(bytes) => Ok(bytes.clone()),
                Scripted::Failure(make) => Err(make()),
            }
        }
    }

    struct CountingDecoder {
        calls: Arc<AtomicUsize>,
        sheets: Vec<Sheet>,
    }

    impl CountingDecoder {
        fn returning(sheets: Vec<Sheet>) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                sheets,
            }
        }
    }

    impl SpreadsheetDecoder for CountingDecoder {
        fn decode(
            &self,
            _bytes: &[u8],
        ) -> Result<Vec<Sheet>, Box<dyn std::error::Error + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.sheets.clone())
        }
    }

    fn delivery_sheet() -> Sheet {
        Sheet {
            name: "Livraisons".to_string(),
            rows: vec![
                vec!["Client".to_string(), "Technicien".to_string()],
                vec!["Dupont".to_string(), "42".to_string()],
            ],
        }
    }

    #[tokio::test]
    async fn export_is_shaped_into_records() {
        let mut importer = DeliveryImporter::new(
            Box::new(FakeSource::bytes(vec![1, 2, 3])),
            Box::new(CountingDecoder::returning(vec![delivery_sheet()])),
        );

        let records = importer.import("42").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Client"], "Dupont");
    }

    #[tokio::test]
    async fn empty_body_never_reaches_the_decoder() {
        let decoder = CountingDecoder::returning(vec![delivery_sheet()]);
        let decoder_calls = decoder.calls.clone();
        let mut importer =
            DeliveryImporter::new(Box::new(FakeSource::bytes(Vec::new())), Box::new(decoder));

        let err = importer.import("").await.unwrap_err();
        assert!(matches!(err, ExportError::EmptyFile));
        assert_eq!(decoder_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn attempt_budget_exhausts_after_three_failures() {
        let source = FakeSource::failing(|| ExportError::Network);
        let source_calls = source.calls.clone();
        let mut importer = DeliveryImporter::new(
            Box::new(source),
            Box::new(CountingDecoder::returning(vec![delivery_sheet()])),
        );

        for _ in 0..MAX_ATTEMPTS {
            let err = importer.import("42").await.unwrap_err();
            assert!(matches!(err, ExportError::Network));
        }

        let err = importer.import("42").await.unwrap_err();
        assert!(matches!(err, ExportError::MaxAttempts));
        assert_eq!(source_calls.load(Ordering::SeqCst), MAX_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn a_success_resets_the_attempt_budget() {
        let mut importer = DeliveryImporter::new(
            Box::new(FakeSource::bytes(vec![1])),
            Box::new(CountingDecoder::returning(vec![delivery_sheet()])),
        );

        importer.failed_attempts = MAX_ATTEMPTS - 1;
        importer.import("").await.unwrap();
        assert_eq!(importer.failed_attempts, 0);
    }
}

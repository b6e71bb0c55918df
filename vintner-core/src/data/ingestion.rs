//! Data ingestion — fetch the raw dataset archive and unpack it.

use crate::artifacts::file_size_kb;
use crate::config::DataIngestionConfig;
use crate::error::PipelineError;
use std::fs::File;

/// Downloads the dataset archive and extracts it into the ingestion root.
pub struct DataIngestion {
    config: DataIngestionConfig,
}

impl DataIngestion {
    pub fn new(config: DataIngestionConfig) -> Self {
        Self { config }
    }

    /// Download the archive unless a local copy already exists.
    pub async fn download(&self) -> Result<(), PipelineError> {
        if self.config.local_data_file.exists() {
            let kb = file_size_kb(&self.config.local_data_file)?;
            tracing::info!(
                file = %self.config.local_data_file.display(),
                size_kb = kb,
                "Archive already present, skipping download"
            );
            return Ok(());
        }

        std::fs::create_dir_all(&self.config.root_dir)?;
        let response = reqwest::get(&self.config.source_url).await?;
        let response = response.error_for_status().map_err(|e| {
            PipelineError::ingestion(format!(
                "Download of {} failed: {e}",
                self.config.source_url
            ))
        })?;
        let bytes = response.bytes().await?;
        std::fs::write(&self.config.local_data_file, &bytes)?;

        let kb = file_size_kb(&self.config.local_data_file)?;
        tracing::info!(
            url = %self.config.source_url,
            file = %self.config.local_data_file.display(),
            size_kb = kb,
            "Dataset archive downloaded"
        );
        Ok(())
    }

    /// Extract every member of the archive into the configured directory.
    pub fn extract(&self) -> Result<(), PipelineError> {
        std::fs::create_dir_all(&self.config.unzip_dir)?;
        let file = File::open(&self.config.local_data_file)?;
        let mut archive = zip::ZipArchive::new(file)?;
        archive.extract(&self.config.unzip_dir)?;
        tracing::info!(
            files = archive.len(),
            dir = %self.config.unzip_dir.display(),
            "Dataset archive extracted"
        );
        Ok(())
    }

    /// Run the full ingestion stage.
    pub async fn run(&self) -> Result<(), PipelineError> {
        self.download().await?;
        self.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_zip(path: &std::path::Path, name: &str, content: &[u8]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
        writer.finish().unwrap();
    }

    #[tokio::test]
    async fn test_existing_archive_skips_download() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("data.zip");
        write_zip(&archive, "winequality-red.csv", b"alcohol,quality\n9.4,5\n");

        let ingestion = DataIngestion::new(DataIngestionConfig {
            root_dir: dir.path().to_path_buf(),
            // Unreachable on purpose; the local file must short-circuit it.
            source_url: "http://127.0.0.1:1/never".into(),
            local_data_file: archive,
            unzip_dir: dir.path().join("unzipped"),
        });

        ingestion.run().await.unwrap();
        let extracted = dir.path().join("unzipped").join("winequality-red.csv");
        assert!(extracted.exists());
        assert_eq!(
            std::fs::read_to_string(extracted).unwrap(),
            "alcohol,quality\n9.4,5\n"
        );
    }

    #[tokio::test]
    async fn test_corrupt_archive_is_error() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("data.zip");
        std::fs::write(&archive, b"not a zip archive").unwrap();

        let ingestion = DataIngestion::new(DataIngestionConfig {
            root_dir: dir.path().to_path_buf(),
            source_url: "http://127.0.0.1:1/never".into(),
            local_data_file: archive,
            unzip_dir: dir.path().join("unzipped"),
        });

        assert!(ingestion.run().await.is_err());
    }
}

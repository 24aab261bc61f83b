//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the operations the pipeline needs:
//! identify, convert, thumbnail, fit, and rasterize.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the
//! recording `MockBackend` below.

use super::params::{ConvertParams, FitParams, RasterizeParams, ThumbnailParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Read image dimensions. Fails for unreadable or undecodable files.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Re-encode at original dimensions.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;

    /// Square cover-fit thumbnail (resize + center crop).
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;

    /// Contain-fit into a box with transparent padding.
    fn fit(&self, params: &FitParams) -> Result<(), BackendError>;

    /// Render an SVG to a square PNG.
    fn rasterize(&self, params: &RasterizeParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{OutputFormat, Quality};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    ///
    /// Dimensions are looked up by source file name; operations whose output
    /// file name contains a registered failure pattern return an error.
    #[derive(Default)]
    pub struct MockBackend {
        pub dimensions: Mutex<HashMap<String, Dimensions>>,
        pub failing_outputs: Mutex<Vec<String>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Convert {
            source: String,
            output: String,
            format: OutputFormat,
        },
        Thumbnail {
            source: String,
            output: String,
            size: u32,
            quality: u32,
        },
        Fit {
            source: String,
            output: String,
            width: u32,
            height: u32,
        },
        Rasterize {
            source: String,
            output: String,
            size: u32,
        },
    }

    impl RecordedOp {
        pub fn output(&self) -> Option<&str> {
            match self {
                RecordedOp::Identify(_) => None,
                RecordedOp::Convert { output, .. }
                | RecordedOp::Thumbnail { output, .. }
                | RecordedOp::Fit { output, .. }
                | RecordedOp::Rasterize { output, .. } => Some(output),
            }
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register dimensions for a source file name (e.g. `"banner.jpg"`).
        pub fn with_image(self, file_name: &str, width: u32, height: u32) -> Self {
            self.dimensions
                .lock()
                .unwrap()
                .insert(file_name.to_string(), Dimensions { width, height });
            self
        }

        /// Fail every operation whose output path contains `pattern`.
        pub fn failing_output(self, pattern: &str) -> Self {
            self.failing_outputs.lock().unwrap().push(pattern.to_string());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Output paths of all recorded write operations.
        pub fn outputs(&self) -> Vec<String> {
            self.get_operations()
                .iter()
                .filter_map(|op| op.output().map(str::to_string))
                .collect()
        }

        fn record(&self, op: RecordedOp) -> Result<(), BackendError> {
            let output = op.output().map(str::to_string);
            self.operations.lock().unwrap().push(op);
            if let Some(output) = output {
                let failing = self.failing_outputs.lock().unwrap();
                if failing.iter().any(|p| output.contains(p.as_str())) {
                    return Err(BackendError::ProcessingFailed(format!(
                        "mock failure for {output}"
                    )));
                }
                // Real encoders leave a file behind; the pipeline checks for it.
                if let Some(parent) = Path::new(&output).parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&output, b"mock")?;
            }
            Ok(())
        }
    }

    fn lossy(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(lossy(path)));

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.dimensions
                .lock()
                .unwrap()
                .get(&file_name)
                .copied()
                .ok_or_else(|| {
                    BackendError::ProcessingFailed(format!("No mock dimensions for {file_name}"))
                })
        }

        fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
            self.record(RecordedOp::Convert {
                source: lossy(&params.source),
                output: lossy(&params.output),
                format: params.format,
            })
        }

        fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
            self.record(RecordedOp::Thumbnail {
                source: lossy(&params.source),
                output: lossy(&params.output),
                size: params.size,
                quality: params.quality.value(),
            })
        }

        fn fit(&self, params: &FitParams) -> Result<(), BackendError> {
            self.record(RecordedOp::Fit {
                source: lossy(&params.source),
                output: lossy(&params.output),
                width: params.width,
                height: params.height,
            })
        }

        fn rasterize(&self, params: &RasterizeParams) -> Result<(), BackendError> {
            self.record(RecordedOp::Rasterize {
                source: lossy(&params.source),
                output: lossy(&params.output),
                size: params.size,
            })
        }
    }

    #[test]
    fn mock_identify_by_file_name() {
        let backend = MockBackend::new().with_image("banner.jpg", 800, 600);

        let dims = backend.identify(Path::new("/src/hero/banner.jpg")).unwrap();
        assert_eq!(dims, Dimensions { width: 800, height: 600 });

        let ops = backend.get_operations();
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/src/hero/banner.jpg"));
    }

    #[test]
    fn mock_identify_unknown_errors() {
        let backend = MockBackend::new();
        assert!(backend.identify(Path::new("/missing.png")).is_err());
    }

    #[test]
    fn mock_records_convert_and_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("webp/logo.webp");
        let backend = MockBackend::new();

        backend
            .convert(&ConvertParams {
                source: "/logo.png".into(),
                output: output.clone(),
                format: OutputFormat::WebpLossy(Quality::new(85)),
            })
            .unwrap();

        assert!(output.exists());
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Convert {
                format: OutputFormat::WebpLossy(Quality(85)),
                ..
            }
        ));
    }

    #[test]
    fn mock_failure_pattern_returns_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new().failing_output("600x600");

        let result = backend.thumbnail(&ThumbnailParams {
            source: "/logo.png".into(),
            output: tmp.path().join("thumbnails/600x600/logo.webp"),
            size: 600,
            quality: Quality::new(80),
        });
        assert!(result.is_err());
        assert!(!tmp.path().join("thumbnails/600x600/logo.webp").exists());
    }
}

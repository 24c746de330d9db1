use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const MIN_DPI: u32 = 1;
const MAX_DPI: u32 = 2400;

/// Which text-recognition backend the OCR run initializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// The `tesseract` executable on PATH
    TesseractCli,
    /// In-process Tesseract (requires the `leptess` feature)
    Leptess,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::TesseractCli => write!(f, "tesseract-cli"),
            EngineKind::Leptess => write!(f, "leptess"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Extension (without dot) that marks a container file
    pub container_extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("books"),
            output_root: PathBuf::from("book_images"),
            container_extension: "epub".to_string(),
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<()> {
        validate_extension("container_extension", &self.container_extension)
    }
}

impl fmt::Display for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input={:?}, output={:?}, extension={}",
            self.input_root, self.output_root, self.container_extension
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Render resolution in dots per inch
    pub dpi: u32,
    /// Poppler's `pdftoppm` executable
    pub program: String,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("books"),
            output_root: PathBuf::from("book_images"),
            dpi: 300,
            program: "pdftoppm".to_string(),
        }
    }
}

impl RasterConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DPI..=MAX_DPI).contains(&self.dpi) {
            anyhow::bail!("dpi must be between {} and {}, got {}", MIN_DPI, MAX_DPI, self.dpi);
        }
        if self.program.trim().is_empty() {
            anyhow::bail!("program must name the pdftoppm executable");
        }
        Ok(())
    }
}

impl fmt::Display for RasterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input={:?}, output={:?}, dpi={}",
            self.input_root, self.output_root, self.dpi
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Extension (without dot) given to every text artifact
    pub text_extension: String,
    /// Tesseract language codes, joined with `+` when the engine starts
    pub languages: Vec<String>,
    pub engine: EngineKind,
    /// Directory receiving the timestamped run log
    pub log_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("book_images"),
            output_root: PathBuf::from("text_output"),
            text_extension: "txt".to_string(),
            languages: vec!["chi_sim".to_string(), "eng".to_string()],
            engine: EngineKind::TesseractCli,
            log_dir: PathBuf::from("."),
        }
    }
}

impl OcrConfig {
    pub fn validate(&self) -> Result<()> {
        validate_extension("text_extension", &self.text_extension)?;
        if self.languages.iter().all(|l| l.trim().is_empty()) {
            anyhow::bail!("languages must name at least one language");
        }
        if self.input_root == self.output_root {
            anyhow::bail!(
                "input_root and output_root must differ (both are {:?})",
                self.input_root
            );
        }
        Ok(())
    }

    pub fn language_spec(&self) -> String {
        self.languages
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl fmt::Display for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input={:?}, output={:?}, engine={}, languages={}",
            self.input_root,
            self.output_root,
            self.engine,
            self.language_spec()
        )
    }
}

/// Read a JSON config file, or fall back to defaults when no path is given.
pub fn load_config<T>(path: Option<&Path>) -> Result<T>
where
    T: Default + for<'de> Deserialize<'de>,
{
    let Some(path) = path else {
        return Ok(T::default());
    };

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    serde_json::from_str(&config_str)
        .with_context(|| format!("Failed to parse config JSON: {:?}", path))
}

fn validate_extension(field: &str, ext: &str) -> Result<()> {
    if ext.is_empty() || ext.contains('.') || ext.contains('/') {
        anyhow::bail!("{} must be a bare extension, got {:?}", field, ext);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        ExtractConfig::default().validate().unwrap();
        RasterConfig::default().validate().unwrap();
        OcrConfig::default().validate().unwrap();
        assert_eq!(RasterConfig::default().dpi, 300);
        assert_eq!(OcrConfig::default().language_spec(), "chi_sim+eng");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"output_root": "out", "engine": "leptess"}}"#).unwrap();

        let config: OcrConfig = load_config(Some(file.path())).unwrap();
        assert_eq!(config.output_root, PathBuf::from("out"));
        assert_eq!(config.engine, EngineKind::Leptess);
        assert_eq!(config.text_extension, "txt");
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = OcrConfig {
            languages: vec![" ".to_string()],
            ..OcrConfig::default()
        };
        assert!(config.validate().is_err());

        let config = OcrConfig {
            text_extension: ".txt".to_string(),
            ..OcrConfig::default()
        };
        assert!(config.validate().is_err());

        let config = OcrConfig {
            output_root: PathBuf::from("book_images"),
            ..OcrConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ExtractConfig {
            container_extension: String::new(),
            ..ExtractConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RasterConfig {
            dpi: 0,
            ..RasterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result: Result<ExtractConfig> =
            load_config(Some(Path::new("/nonexistent/config.json")));
        assert!(result.is_err());
    }
}

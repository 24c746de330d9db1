use std::path::Path;
use std::process::Command;
use tracing::info;

use crate::config::{EngineKind, OcrConfig};
use crate::error::{PipelineError, PipelineResult};

/// A text-recognition backend, initialized once per run.
pub trait TextRecognizer {
    /// Recognized lines of `image`, in the order the engine reports them.
    fn recognize(&mut self, image: &Path) -> PipelineResult<Vec<String>>;

    fn name(&self) -> &str;
}

/// Start the engine selected by `config`.
///
/// This is the only place an engine is created; the pipeline receives the
/// returned handle and never initializes anything on first use.
pub fn init_engine(config: &OcrConfig) -> PipelineResult<Box<dyn TextRecognizer>> {
    let languages = config.language_spec();
    info!("Initializing {} engine with languages {}", config.engine, languages);

    match config.engine {
        EngineKind::TesseractCli => Ok(Box::new(TesseractCli::new(&languages)?)),
        #[cfg(feature = "leptess")]
        EngineKind::Leptess => Ok(Box::new(LeptessEngine::new(&languages)?)),
        #[cfg(not(feature = "leptess"))]
        EngineKind::Leptess => Err(PipelineError::Config(
            "the leptess engine needs the `leptess` cargo feature".to_string(),
        )),
    }
}

/// Split raw engine output into lines, dropping blank ones.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs the `tesseract` executable once per image.
///
/// Requires Tesseract on PATH with the configured language data installed.
/// - Linux: sudo apt-get install tesseract-ocr tesseract-ocr-chi-sim
/// - Mac: brew install tesseract tesseract-lang
/// - Windows: https://github.com/UB-Mannheim/tesseract/wiki
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: String,
    languages: String,
}

impl TesseractCli {
    pub fn new(languages: &str) -> PipelineResult<Self> {
        Self::with_program("tesseract", languages)
    }

    /// Probe `program` and make sure every language in `languages` (a
    /// `+`-joined list of Tesseract codes) has its data installed.
    pub fn with_program(program: &str, languages: &str) -> PipelineResult<Self> {
        let check = Command::new(program).arg("--version").output();
        if !matches!(check, Ok(ref output) if output.status.success()) {
            return Err(PipelineError::Config(format!(
                "{program} is not installed or not in PATH. \
                 Please install Tesseract: https://github.com/tesseract-ocr/tesseract"
            )));
        }

        let installed = installed_languages(program)?;
        let missing = missing_languages(languages, &installed);
        if !missing.is_empty() {
            return Err(PipelineError::Config(format!(
                "tesseract language data not installed: {} (available: {})",
                missing.join(", "),
                installed.join(", ")
            )));
        }

        Ok(Self {
            program: program.to_string(),
            languages: languages.to_string(),
        })
    }
}

fn installed_languages(program: &str) -> PipelineResult<Vec<String>> {
    let output = Command::new(program)
        .arg("--list-langs")
        .output()
        .map_err(|e| PipelineError::Config(format!("failed to run {program} --list-langs: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::Config(format!(
            "{program} --list-langs failed: {}",
            stderr.trim()
        )));
    }

    // Tesseract 3 prints the list on stderr, later releases on stdout.
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(parse_language_list(&text))
}

/// Language codes from `tesseract --list-langs` output.
pub fn parse_language_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}

/// Codes of a `+`-joined language list that are not in `installed`.
pub fn missing_languages(requested: &str, installed: &[String]) -> Vec<String> {
    requested
        .split('+')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .filter(|code| !installed.iter().any(|have| have.as_str() == *code))
        .map(str::to_string)
        .collect()
}

impl TextRecognizer for TesseractCli {
    fn recognize(&mut self, image: &Path) -> PipelineResult<Vec<String>> {
        let output = Command::new(&self.program)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .output()
            .map_err(|e| PipelineError::recognition(image, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::recognition(image, stderr.trim()));
        }

        Ok(split_lines(&String::from_utf8_lossy(&output.stdout)))
    }

    fn name(&self) -> &str {
        "tesseract-cli"
    }
}

/// In-process Tesseract through `leptess`
#[cfg(feature = "leptess")]
pub struct LeptessEngine {
    tess: leptess::LepTess,
}

#[cfg(feature = "leptess")]
impl LeptessEngine {
    pub fn new(languages: &str) -> PipelineResult<Self> {
        let tess = leptess::LepTess::new(None, languages)
            .map_err(|e| PipelineError::Config(format!("failed to start tesseract: {e}")))?;
        Ok(Self { tess })
    }
}

#[cfg(feature = "leptess")]
impl TextRecognizer for LeptessEngine {
    fn recognize(&mut self, image: &Path) -> PipelineResult<Vec<String>> {
        self.tess
            .set_image(image)
            .map_err(|e| PipelineError::recognition(image, e))?;
        let text = self
            .tess
            .get_utf8_text()
            .map_err(|e| PipelineError::recognition(image, e))?;
        Ok(split_lines(&text))
    }

    fn name(&self) -> &str {
        "leptess"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_keeps_order_and_drops_blanks() {
        let raw = "Hello  \n\n   \nWorld\nHello\n\x0c";
        assert_eq!(split_lines(raw), vec!["Hello", "World", "Hello"]);
    }

    #[test]
    fn test_missing_program_fails_at_init() {
        let err = TesseractCli::with_program("definitely-not-a-real-ocr-binary", "eng")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_parse_language_list() {
        let raw = "List of available languages in \"/usr/share/tessdata/\" (3):\n\
                   chi_sim\neng\nosd\n";
        assert_eq!(parse_language_list(raw), vec!["chi_sim", "eng", "osd"]);

        let installed = parse_language_list(raw);
        assert!(missing_languages("chi_sim+eng", &installed).is_empty());
        assert_eq!(missing_languages("chi_tra+eng+jpn", &installed), vec!["chi_tra", "jpn"]);
    }

    #[cfg(unix)]
    mod with_fake_tesseract {
        use super::*;
        use crate::utils::fake_program::write_fake_program;
        use std::path::PathBuf;
        use tempfile::TempDir;

        /// Tesseract stand-in with only `eng` installed. Images whose path
        /// contains "broken" fail like an unreadable file.
        fn fake_tesseract(dir: &Path) -> String {
            let path = write_fake_program(
                dir,
                "tesseract",
                r#"case "$1" in
  --version) echo "tesseract 5.3.0"; exit 0 ;;
  --list-langs)
    echo 'List of available languages in "/usr/share/tessdata/" (2):'
    printf 'eng\nosd\n'
    exit 0 ;;
  *broken*) echo "Error in pixReadStream: Unknown format" >&2; exit 1 ;;
esac
printf 'Hello  \n\n   \nWorld\n\f'
"#,
            );
            path.to_string_lossy().into_owned()
        }

        #[test]
        fn test_missing_language_fails_at_init() {
            let temp_dir = TempDir::new().unwrap();
            let program = fake_tesseract(temp_dir.path());

            let err = TesseractCli::with_program(&program, "chi_sim+eng").unwrap_err();

            match err {
                PipelineError::Config(message) => {
                    assert!(message.contains("chi_sim"), "{message}");
                    assert!(!message.contains("not installed or not in PATH"));
                }
                other => panic!("expected a configuration error, got {other:?}"),
            }
        }

        #[test]
        fn test_recognize_splits_stdout() {
            let temp_dir = TempDir::new().unwrap();
            let program = fake_tesseract(temp_dir.path());
            let mut engine = TesseractCli::with_program(&program, "eng").unwrap();

            let lines = engine.recognize(Path::new("page1.png")).unwrap();

            assert_eq!(lines, vec!["Hello", "World"]);
        }

        #[test]
        fn test_recognize_reports_nonzero_exit() {
            let temp_dir = TempDir::new().unwrap();
            let program = fake_tesseract(temp_dir.path());
            let mut engine = TesseractCli::with_program(&program, "eng").unwrap();

            let err = engine.recognize(Path::new("broken.png")).unwrap_err();

            match err {
                PipelineError::Recognition { path, reason } => {
                    assert_eq!(path, PathBuf::from("broken.png"));
                    assert!(reason.contains("Unknown format"), "{reason}");
                }
                other => panic!("expected a recognition error, got {other:?}"),
            }
        }
    }

    #[cfg(not(feature = "leptess"))]
    #[test]
    fn test_leptess_engine_requires_feature() {
        let config = OcrConfig {
            engine: EngineKind::Leptess,
            ..OcrConfig::default()
        };
        assert!(init_engine(&config).is_err());
    }
}

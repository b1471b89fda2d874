use crate::compiler::{CompiledFile, Dictionary, DictionaryCompiler};
use crate::config::CompilerConfig;
use crate::error::{DictError, DictResult};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

fn io_error(path: &Path, err: std::io::Error) -> DictError {
    DictError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Load a compiler configuration from a JSON file
///
/// # Errors
/// - File read errors
/// - Invalid JSON or unknown enum values
pub fn load_config_from_file(path: &Path) -> DictResult<CompilerConfig> {
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| DictError::Config(format!("'{}': {}", path.display(), e)))
}

/// Read and compile a single dictionary file
///
/// # Errors
/// - `NotFound` if the file does not exist
/// - `Empty` if the file has no content
/// - `Io` for any other read failure
pub fn load_dictionary_file(path: &Path, config: &CompilerConfig) -> DictResult<CompiledFile> {
    if !path.exists() {
        return Err(DictError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    if content.is_empty() {
        return Err(DictError::Empty(path.to_path_buf()));
    }

    let file = DictionaryCompiler::new(config).compile(&content);
    info!(
        path = %path.display(),
        entries = file.entries.len(),
        skipped = file.diagnostics.len(),
        "compiled dictionary"
    );
    Ok(file)
}

/// Build a dictionary from several files, in priority order
///
/// Files that are missing or empty are skipped with a warning, matching
/// how a series without its own dictionary still gets the common one.
pub fn load_dictionaries(paths: &[&Path], config: &CompilerConfig) -> DictResult<Dictionary> {
    let mut files = Vec::new();
    for path in paths {
        match load_dictionary_file(path, config) {
            Ok(file) => files.push(file),
            Err(err @ (DictError::NotFound(_) | DictError::Empty(_))) => {
                warn!("{}", err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(Dictionary::build(files, config))
}

/// Write a dictionary file unless one already exists
///
/// Returns `true` when a new file was written.
pub fn create_dictionary_file(path: &Path, contents: &str) -> DictResult<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, contents).map_err(|e| io_error(path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::default_dictionary;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wn-dict-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/definitely/not/here.dict");
        assert_eq!(
            load_dictionary_file(path, &CompilerConfig::default()),
            Err(DictError::NotFound(path.to_path_buf()))
        );
    }

    #[test]
    fn test_empty_file_is_skipped() {
        let dir = scratch_dir("empty");
        let empty = dir.join("empty.dict");
        fs::write(&empty, "").unwrap();
        let series = dir.join("series.dict");
        fs::write(&series, "pen --> fountain pen\n").unwrap();

        let config = CompilerConfig::default();
        assert!(matches!(
            load_dictionary_file(&empty, &config),
            Err(DictError::Empty(_))
        ));
        let dictionary = load_dictionaries(&[&empty, &series], &config).unwrap();
        assert_eq!(dictionary.len(), 1);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_create_dictionary_file_once() {
        let dir = scratch_dir("create");
        let path = dir.join("NRT_syosetu_n1.dict");
        let contents = default_dictionary("Naruto", "NRT", "link");
        assert!(create_dictionary_file(&path, &contents).unwrap());
        assert!(!create_dictionary_file(&path, "other").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_config() {
        let dir = scratch_dir("config");
        let path = dir.join("config.json");
        fs::write(&path, r#"{ "comment_max_len": 20 }"#).unwrap();
        assert_eq!(load_config_from_file(&path).unwrap().comment_max_len, 20);

        fs::write(&path, r#"{ "language": "xx" }"#).unwrap();
        assert!(matches!(load_config_from_file(&path), Err(DictError::Config(_))));
        fs::remove_dir_all(dir).unwrap();
    }
}

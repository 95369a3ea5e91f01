// File content endpoint
// Returns the full text of one file named by the `path` query parameter

use std::path::Path;
use tokio::fs;

use super::error::ApiError;
use super::types::FileContent;
use crate::config::AppState;
use crate::http::query::first_param;
use crate::logger;

/// Read the file named by `path=` in `query`
///
/// Relative paths resolve against the root directory. Unless
/// `api.restrict_to_data_dir` is set, any readable path is served.
pub async fn read_file_content(
    state: &AppState,
    query: Option<&str>,
) -> Result<FileContent, ApiError> {
    let requested = first_param(query, "path").ok_or(ApiError::FileNotFound)?;
    let path = state.resolve(&requested);

    if !fs::try_exists(&path).await.unwrap_or(false) {
        return Err(ApiError::FileNotFound);
    }

    if state.config.api.restrict_to_data_dir && !is_within(&path, &state.data_dir).await {
        logger::log_warning(&format!(
            "Blocked read outside data directory: {requested}"
        ));
        return Err(ApiError::FileNotFound);
    }

    let content = fs::read_to_string(&path).await.map_err(ApiError::ReadFile)?;

    Ok(FileContent {
        content,
        filename: base_name(&requested).to_string(),
    })
}

/// Final component after the last `/` (empty for a trailing slash)
fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether `path` lies inside `dir` once symlinks and `..` are resolved
async fn is_within(path: &Path, dir: &Path) -> bool {
    match (fs::canonicalize(path).await, fs::canonicalize(dir).await) {
        (Ok(path), Ok(dir)) => path.starts_with(dir),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::state_in;
    use std::fs as std_fs;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("August/done_processed_US_data.csv"), "done_processed_US_data.csv");
        assert_eq!(base_name("notes.txt"), "notes.txt");
        assert_eq!(base_name("August/"), "");
    }

    #[tokio::test]
    async fn test_reads_exact_content() {
        let tmp = tempfile::tempdir().unwrap();
        std_fs::create_dir(tmp.path().join("August")).unwrap();
        let text = "id,value\r\n1,\u{e9}t\u{e9}\n";
        std_fs::write(tmp.path().join("August/done_processed_US_data.csv"), text).unwrap();
        let state = state_in(tmp.path());

        let result = read_file_content(&state, Some("path=August/done_processed_US_data.csv"))
            .await
            .unwrap();
        assert_eq!(result.content, text);
        assert_eq!(result.filename, "done_processed_US_data.csv");
    }

    #[tokio::test]
    async fn test_absolute_path_and_unlisted_file() {
        let tmp = tempfile::tempdir().unwrap();
        let notes = tmp.path().join("notes.md");
        std_fs::write(&notes, "# notes").unwrap();
        let state = state_in(tmp.path());

        let query = format!("path={}", urlencoding::encode(&notes.to_string_lossy()));
        let result = read_file_content(&state, Some(&query)).await.unwrap();
        assert_eq!(result.content, "# notes");
        assert_eq!(result.filename, "notes.md");
    }

    #[tokio::test]
    async fn test_missing_file_and_missing_param() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_in(tmp.path());

        for query in [None, Some(""), Some("path="), Some("path=August/nope.csv")] {
            let err = read_file_content(&state, query).await.unwrap_err();
            assert!(matches!(err, ApiError::FileNotFound), "query {query:?}");
        }
    }

    #[tokio::test]
    async fn test_directory_and_binary_are_read_errors() {
        let tmp = tempfile::tempdir().unwrap();
        std_fs::create_dir(tmp.path().join("August")).unwrap();
        std_fs::write(tmp.path().join("blob.bin"), [0xc3, 0x28]).unwrap();
        let state = state_in(tmp.path());

        let err = read_file_content(&state, Some("path=August")).await.unwrap_err();
        assert!(matches!(err, ApiError::ReadFile(_)));

        let err = read_file_content(&state, Some("path=blob.bin")).await.unwrap_err();
        assert!(matches!(err, ApiError::ReadFile(_)));
    }

    #[tokio::test]
    async fn test_restricted_mode_confines_to_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        std_fs::create_dir(tmp.path().join("August")).unwrap();
        std_fs::write(tmp.path().join("August/done_processed_US_data.csv"), "h\n").unwrap();
        std_fs::write(tmp.path().join("secret.txt"), "s3cret").unwrap();
        let mut state = state_in(tmp.path());
        state.config.api.restrict_to_data_dir = true;

        assert!(read_file_content(&state, Some("path=August/done_processed_US_data.csv"))
            .await
            .is_ok());

        for query in ["path=secret.txt", "path=August/../secret.txt"] {
            let err = read_file_content(&state, Some(query)).await.unwrap_err();
            assert!(matches!(err, ApiError::FileNotFound), "query {query}");
        }
    }
}

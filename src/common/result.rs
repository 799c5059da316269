use crate::common::error::StageError;

/// srcstage全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use srcstage::common::result::StageResult;
/// use srcstage::common::error::StageError;
///
/// fn example_with_error() -> StageResult<()> {
///     Err(StageError::config_error("working_dir is required", None))
/// }
///
/// assert!(example_with_error().is_err());
/// ```
pub type StageResult<T> = Result<T, StageError>;

/// Resultのエラー変換ヘルパー
///
/// io::Errorを特定のパスに紐付いた抽出エラーへ変換する
pub trait IoResultExt<T> {
    /// io::ErrorをExtractionFailureに変換する
    ///
    /// # Arguments
    ///
    /// * `path` - 失敗した操作の対象パス
    fn extraction_context(self, path: impl Into<std::path::PathBuf>) -> StageResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn extraction_context(self, path: impl Into<std::path::PathBuf>) -> StageResult<T> {
        self.map_err(|e| StageError::extraction_failure(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorKind;
    use std::io;

    #[test]
    fn test_extraction_context() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = result.extraction_context("/tmp/x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtractionFailure);
        assert!(err.to_string().contains("/tmp/x"));
    }

    #[test]
    fn test_extraction_context_ok_passthrough() {
        let result: io::Result<u8> = Ok(7);
        assert_eq!(result.extraction_context("/tmp/x").unwrap(), 7);
    }
}

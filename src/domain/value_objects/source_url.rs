use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

/// SourceURL関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum SourceUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Relative paths are not valid sources: {0}")]
    RelativePath(String),
}

/// サポートされるスキーム
const SUPPORTED_SCHEMES: [&str; 5] = ["svn", "svn+ssh", "http", "https", "file"];

fn drive_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]:[\\/]").expect("valid drive path regex"))
}

/// チェックアウト元の値オブジェクト
///
/// URL形式（`https://...`、`svn://...`、`file://...`）またはローカルの絶対パスを受け付ける。
/// `#`以降のフラグメントは保持するが、表示では取り除く。
/// URL形式で与えられた場所は、正規化せず入力どおりの文字列を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceUrl {
    url: Url,
    /// フラグメントを除いた入力文字列（URL形式の入力のみ）
    verbatim: Option<String>,
}

impl SourceUrl {
    /// 新しいSourceUrlインスタンスを作成
    pub fn new(location: &str) -> Result<Self, SourceUrlError> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(SourceUrlError::InvalidFormat("Empty URL".to_string()));
        }

        if Self::looks_like_path(trimmed) {
            return Ok(Self {
                url: Self::file_url_from_path(trimmed)?,
                verbatim: None,
            });
        }

        let url = Self::parse_url(trimmed)?;
        let verbatim = trimmed.split('#').next().map(str::to_string);
        Ok(Self { url, verbatim })
    }

    /// ローカルパスとして扱うべき入力かどうか
    fn looks_like_path(input: &str) -> bool {
        input.starts_with('/') || input.starts_with("\\\\") || drive_path_regex().is_match(input)
    }

    /// ローカルパスをfile:// URLに変換
    fn file_url_from_path(path: &str) -> Result<Url, SourceUrlError> {
        let slashed = path.replace('\\', "/");
        let candidate = if let Some(unc) = slashed.strip_prefix("//") {
            format!("file://{}", unc)
        } else if slashed.starts_with('/') {
            format!("file://{}", slashed)
        } else {
            format!("file:///{}", slashed)
        };

        Url::parse(&candidate).map_err(|_| SourceUrlError::InvalidFormat(path.to_string()))
    }

    /// URLを解析してスキームを検証
    fn parse_url(input: &str) -> Result<Url, SourceUrlError> {
        let parsed = Url::parse(input).map_err(|e| match e {
            url::ParseError::RelativeUrlWithoutBase => {
                SourceUrlError::RelativePath(input.to_string())
            }
            _ => SourceUrlError::InvalidFormat(input.to_string()),
        })?;

        let scheme = parsed.scheme();
        if !SUPPORTED_SCHEMES.contains(&scheme) {
            return Err(SourceUrlError::UnsupportedScheme(scheme.to_string()));
        }

        if scheme != "file" && parsed.host_str().map_or(true, str::is_empty) {
            return Err(SourceUrlError::MissingHost);
        }

        Ok(parsed)
    }

    /// フラグメントを取得
    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    /// ローカルファイルシステム上のリポジトリかどうか
    pub fn is_local(&self) -> bool {
        self.url.scheme() == "file"
    }

    /// ローカルリポジトリのパスを取得
    ///
    /// `file:///C:/repo` のようなドライブ付きURLは `C:/repo` を返す。
    pub fn local_path(&self) -> Option<PathBuf> {
        if !self.is_local() {
            return None;
        }

        let raw = self
            .url
            .to_file_path()
            .ok()
            .and_then(|p| p.to_str().map(str::to_string))
            .unwrap_or_else(|| self.url.path().to_string());

        let trimmed = match raw.strip_prefix('/') {
            Some(rest) if drive_path_regex().is_match(rest) => rest.to_string(),
            _ => raw,
        };

        Some(PathBuf::from(trimmed))
    }

    /// パス部分を置き換えたコピーを作成
    pub fn with_local_path(&self, path: &str) -> Self {
        let mut url = self.url.clone();
        url.set_path(path);
        Self {
            url,
            verbatim: None,
        }
    }

    /// フラグメントを除いたURL文字列
    ///
    /// URL形式の入力はホスト名の大小文字やポートも含めて入力どおりに返す。
    /// ローカルパスから作られた場合は`file://` URLを返す。
    pub fn string_no_fragment(&self) -> String {
        match &self.verbatim {
            Some(verbatim) => verbatim.clone(),
            None => {
                let mut url = self.url.clone();
                url.set_fragment(None);
                url.to_string()
            }
        }
    }

    /// 元のURL文字列を取得
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl TryFrom<&str> for SourceUrl {
    type Error = SourceUrlError;

    fn try_from(location: &str) -> Result<Self, Self::Error> {
        SourceUrl::new(location)
    }
}

impl TryFrom<String> for SourceUrl {
    type Error = SourceUrlError;

    fn try_from(location: String) -> Result<Self, Self::Error> {
        SourceUrl::new(&location)
    }
}

impl From<SourceUrl> for String {
    fn from(source: SourceUrl) -> Self {
        source.url.to_string()
    }
}

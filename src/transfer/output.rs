//! Output destination resolution for the response body.
//!
//! `-o FILE` names the file directly. `-O` derives a name from the response's
//! `Content-Disposition` header, falling back to the last URL path segment.
//! Derived names are sanitized so they always land in the working directory.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use reqwest::header::{CONTENT_DISPOSITION, HeaderMap};
use tokio::fs::File;
use tokio::io::{AsyncWrite, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::DEFAULT_REMOTE_NAME;
use super::error::TransferError;
use crate::config::OutputTarget;

/// Writer the response body is copied into.
pub type OutputWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// Concrete destination, known once response headers have arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output.
    Stdout,
    /// A file, created or truncated.
    File(PathBuf),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Destination {
    /// Picks the destination for `target`, consulting the response headers for `-O`.
    #[must_use]
    #[instrument(skip(headers), fields(url = %url))]
    pub fn resolve(target: &OutputTarget, headers: &HeaderMap, url: &Url) -> Self {
        match target {
            OutputTarget::Stdout => Self::Stdout,
            OutputTarget::File(path) => Self::File(path.clone()),
            OutputTarget::RemoteName => {
                let disposition = headers
                    .get(CONTENT_DISPOSITION)
                    .and_then(|value| value.to_str().ok());
                let name = remote_name(disposition, url);
                debug!(filename = %name, "derived remote filename");
                Self::File(PathBuf::from(name))
            }
        }
    }

    /// Opens the destination for writing.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::OutputOpen`] when the file cannot be created.
    pub async fn open(&self) -> Result<OutputWriter, TransferError> {
        match self {
            Self::Stdout => Ok(Box::new(tokio::io::stdout())),
            Self::File(path) => {
                let file = File::create(path)
                    .await
                    .map_err(|e| TransferError::output_open(path.clone(), e))?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Derives the `-O` filename from a `Content-Disposition` value or the URL.
///
/// Falls back to [`DEFAULT_REMOTE_NAME`] when the URL path has no final
/// segment or the segment sanitizes to nothing.
#[must_use]
pub fn remote_name(content_disposition: Option<&str>, url: &Url) -> String {
    if let Some(name) = content_disposition
        .and_then(parse_content_disposition)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
    {
        return name;
    }

    if let Some(mut segments) = url.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let decoded = urlencoding::decode(last).unwrap_or_else(|e| {
            debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
            last.into()
        });
        let name = sanitize_filename(&decoded);
        if !name.is_empty() {
            return name;
        }
        debug!(segment = %last, "URL segment is blank after sanitizing");
    }

    DEFAULT_REMOTE_NAME.to_string()
}

/// Parses a `Content-Disposition` header value to extract the filename.
///
/// Handles:
/// - `attachment; filename="example.pdf"`
/// - `attachment; filename=example.pdf`
/// - `attachment; filename*=UTF-8''example.pdf` (RFC 5987, preferred when present)
///
/// Parameter names are matched case-insensitively.
#[must_use]
pub fn parse_content_disposition(header: &str) -> Option<String> {
    let lowered = header.to_ascii_lowercase();

    if let Some(pos) = lowered.find("filename*=") {
        let value = header[pos + "filename*=".len()..].trim();
        // charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            if let Ok(decoded) = urlencoding::decode(encoded[..end].trim()) {
                return Some(decoded.into_owned());
            }
        }
    }

    let pos = lowered.find("filename=")?;
    let value = header[pos + "filename=".len()..].trim();

    if let Some(stripped) = value.strip_prefix('"') {
        // Unterminated quotes run to the next parameter.
        let end = stripped
            .find('"')
            .or_else(|| stripped.find(';'))
            .unwrap_or(stripped.len());
        let name = stripped[..end].trim();
        return (!name.is_empty()).then(|| name.to_string());
    }

    let end = value.find(';').unwrap_or(value.len());
    let name = value[..end].trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Sanitizes a filename so it names a file in the current directory.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters) and rewrites `.`/`..`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_parse_content_disposition_quoted() {
        let header = r#"attachment; filename="report.csv""#;
        assert_eq!(
            parse_content_disposition(header),
            Some("report.csv".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_unquoted() {
        let header = "attachment; filename=report.csv";
        assert_eq!(
            parse_content_disposition(header),
            Some("report.csv".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_with_trailing_params() {
        let header = r#"attachment; filename="report.csv"; size=1234"#;
        assert_eq!(
            parse_content_disposition(header),
            Some("report.csv".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_rfc5987() {
        let header = "attachment; filename*=UTF-8''quarterly%20report.csv";
        assert_eq!(
            parse_content_disposition(header),
            Some("quarterly report.csv".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_prefers_rfc5987() {
        let header = r#"attachment; filename="plain.txt"; filename*=UTF-8''fancy%C3%A9.txt"#;
        assert_eq!(
            parse_content_disposition(header),
            Some("fancyé.txt".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_case_insensitive() {
        let header = r#"Attachment; FileName="Data.JSON""#;
        assert_eq!(
            parse_content_disposition(header),
            Some("Data.JSON".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_unterminated_quote() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="report.csv"#),
            Some("report.csv".to_string())
        );
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="report.csv; size=10"#),
            Some("report.csv".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_missing() {
        assert_eq!(parse_content_disposition("attachment"), None);
        assert_eq!(parse_content_disposition(r#"inline; filename="""#), None);
    }

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("a/b.txt"), "a_b.txt");
        assert_eq!(sanitize_filename("a\\b.txt"), "a_b.txt");
        assert_eq!(sanitize_filename("a:b*c?.txt"), "a_b_c_.txt");
        assert_eq!(sanitize_filename("<a|b>.txt"), "_a_b_.txt");
    }

    #[test]
    fn test_sanitize_filename_rewrites_dot_segments() {
        assert_eq!(sanitize_filename("."), "_");
        assert_eq!(sanitize_filename(".."), "__");
    }

    #[test]
    fn test_sanitize_filename_traversal_stays_local() {
        let name = sanitize_filename("../../etc/passwd");
        assert!(!name.contains('/'));
        assert_eq!(Path::new(&name).components().count(), 1);
    }

    #[test]
    fn test_remote_name_prefers_content_disposition() {
        let name = remote_name(
            Some(r#"attachment; filename="report.csv""#),
            &url("http://example.com/download?id=7"),
        );
        assert_eq!(name, "report.csv");
    }

    #[test]
    fn test_remote_name_falls_back_to_url_segment() {
        let name = remote_name(None, &url("http://example.com/files/data%20set.tar.gz"));
        assert_eq!(name, "data set.tar.gz");
    }

    #[test]
    fn test_remote_name_disposition_without_filename_falls_back() {
        let name = remote_name(Some("inline"), &url("http://example.com/page.html"));
        assert_eq!(name, "page.html");
    }

    #[test]
    fn test_remote_name_root_path_uses_default() {
        let name = remote_name(None, &url("http://example.com/"));
        assert_eq!(name, DEFAULT_REMOTE_NAME);
        let name = remote_name(None, &url("http://example.com/dir/"));
        assert_eq!(name, DEFAULT_REMOTE_NAME);
    }

    #[test]
    fn test_remote_name_blank_segment_uses_default() {
        let name = remote_name(None, &url("http://example.com/files/%20"));
        assert_eq!(name, DEFAULT_REMOTE_NAME);
        let name = remote_name(None, &url("http://example.com/files/%20%20%09"));
        assert_eq!(name, DEFAULT_REMOTE_NAME);
    }

    #[tokio::test]
    async fn test_destination_blank_segment_opens_default_name() {
        let temp_dir = TempDir::new().unwrap();
        let headers = HeaderMap::new();
        let destination = Destination::resolve(
            &OutputTarget::RemoteName,
            &headers,
            &url("http://example.com/files/%20"),
        );
        assert_eq!(destination, Destination::File(PathBuf::from(DEFAULT_REMOTE_NAME)));

        // Open under a temp dir rather than the working directory.
        let Destination::File(name) = destination else {
            unreachable!()
        };
        let writer = Destination::File(temp_dir.path().join(name)).open().await;
        assert!(writer.is_ok());
    }

    #[test]
    fn test_destination_resolve_targets() {
        let headers = HeaderMap::new();
        let target_url = url("http://example.com/a.bin");

        assert_eq!(
            Destination::resolve(&OutputTarget::Stdout, &headers, &target_url),
            Destination::Stdout
        );
        assert_eq!(
            Destination::resolve(
                &OutputTarget::File(PathBuf::from("x.out")),
                &headers,
                &target_url
            ),
            Destination::File(PathBuf::from("x.out"))
        );
        assert_eq!(
            Destination::resolve(&OutputTarget::RemoteName, &headers, &target_url),
            Destination::File(PathBuf::from("a.bin"))
        );
    }

    #[test]
    fn test_destination_resolve_uses_disposition_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static(r#"attachment; filename="report.csv""#),
        );
        assert_eq!(
            Destination::resolve(
                &OutputTarget::RemoteName,
                &headers,
                &url("http://example.com/export")
            ),
            Destination::File(PathBuf::from("report.csv"))
        );
    }

    #[test]
    fn test_destination_display() {
        assert_eq!(Destination::Stdout.to_string(), "stdout");
        assert_eq!(
            Destination::File(PathBuf::from("out.txt")).to_string(),
            "out.txt"
        );
    }

    #[tokio::test]
    async fn test_destination_open_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");
        std::fs::write(&path, b"old contents that are long").unwrap();

        let mut writer = Destination::File(path.clone()).open().await.unwrap();
        writer.write_all(b"new").await.unwrap();
        writer.flush().await.unwrap();
        drop(writer);

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_destination_open_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("out.txt");

        let result = Destination::File(path).open().await;
        assert!(matches!(result, Err(TransferError::OutputOpen { .. })));
    }
}

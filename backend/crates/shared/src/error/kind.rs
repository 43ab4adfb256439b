//! Error Kind
//!
//! The closed set of failure classes a request can end in.

use serde::Serialize;

/// エラー種別
///
/// 各種別は HTTP ステータスと、時間をおいて再送すれば通りうるかを決めます。
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::TooManyRequests.status_code(), 429);
/// assert!(ErrorKind::TooManyRequests.is_retryable());
/// assert!(!ErrorKind::Forbidden.is_retryable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// 入力不正。修正すれば通る
    BadRequest,
    /// トークンなし・不正・期限切れ・主体不明
    Unauthorized,
    /// ロールが許可集合に含まれない
    Forbidden,
    NotFound,
    /// ボディが上限を超えた
    PayloadTooLarge,
    /// レート制限または重複リクエスト
    TooManyRequests,
    /// 詳細はログのみ
    InternalServerError,
}

impl ErrorKind {
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::InternalServerError => 500,
        }
    }

    /// Reason phrase, used as the problem `title`
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::PayloadTooLarge => "Payload Too Large",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
        }
    }

    pub const fn is_server_error(&self) -> bool {
        matches!(self, ErrorKind::InternalServerError)
    }

    /// The same request may succeed later without changes
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::TooManyRequests)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorKind; 7] = [
        ErrorKind::BadRequest,
        ErrorKind::Unauthorized,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::PayloadTooLarge,
        ErrorKind::TooManyRequests,
        ErrorKind::InternalServerError,
    ];

    #[test]
    fn test_status_codes() {
        let codes: Vec<u16> = ALL.iter().map(ErrorKind::status_code).collect();
        assert_eq!(codes, vec![400, 401, 403, 404, 413, 429, 500]);
    }

    #[test]
    fn test_only_internal_is_server_error() {
        for kind in ALL {
            assert_eq!(
                kind.is_server_error(),
                kind == ErrorKind::InternalServerError
            );
        }
    }

    #[test]
    fn test_only_throttling_is_retryable() {
        for kind in ALL {
            assert_eq!(kind.is_retryable(), kind == ErrorKind::TooManyRequests);
        }
    }

    #[test]
    fn test_serializes_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::TooManyRequests).unwrap(),
            "\"TOO_MANY_REQUESTS\""
        );
    }
}

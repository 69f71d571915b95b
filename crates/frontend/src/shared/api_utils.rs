//! API utilities for frontend-backend communication

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Join the API base with a path prefix such as "/api"
pub fn join_api_url(base: &str, prefix: &str) -> String {
    let base = base.trim_end_matches('/');
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, prefix)
    }
}

/// Full URL of the reports API for the current page
pub fn api_url(prefix: &str) -> String {
    join_api_url(&api_base(), prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_api_url() {
        assert_eq!(
            join_api_url("http://localhost:3000", "/api"),
            "http://localhost:3000/api"
        );
        assert_eq!(
            join_api_url("http://localhost:3000/", "api/"),
            "http://localhost:3000/api"
        );
        assert_eq!(join_api_url("http://h:3000", ""), "http://h:3000");
    }
}

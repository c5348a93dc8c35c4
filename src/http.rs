//! Request-context helpers that don't need a web framework.
//!
//! `RequestContext` holds the handful of request facts these helpers look at;
//! the caller fills it from whatever server it runs in.
use indexmap::IndexMap;

/// Expiry attributes for a cookie deletion: a date in the past plus `Max-Age=0`.
const EXPIRED: &str = "expires=Thu, 01 Jan 1970 00:00:01 GMT; Max-Age=0";

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub auth_user: Option<String>,
    pub auth_password: Option<String>,
    /// Raw `Cookie:` request header.
    pub cookie_header: Option<String>,
    /// Cookie names already set on the outgoing response.
    pub response_cookies: Vec<String>,
    /// Raw `X-Requested-With:` request header.
    pub requested_with: Option<String>,
}

impl RequestContext {
    /// True iff the request carries a user/password pair that matches an
    /// entry of `credentials` exactly.
    pub fn check_basic_auth(&self, credentials: &IndexMap<String, String>) -> bool {
        let (Some(user), Some(password)) = (&self.auth_user, &self.auth_password) else {
            return false;
        };
        credentials.get(user).is_some_and(|expected| expected == password)
    }

    /// `Set-Cookie` values that expire every cookie the request sent and every
    /// cookie set on the response so far. `None` when there are none.
    pub fn expire_all_cookies(&self) -> Option<Vec<String>> {
        let mut names: Vec<&str> = self
            .cookie_header
            .as_deref()
            .map(cookie_names)
            .unwrap_or_default();
        for name in &self.response_cookies {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        if names.is_empty() {
            return None;
        }
        Some(
            names
                .into_iter()
                .flat_map(|name| {
                    // once with the root path, once without, to reach both scopes
                    [format!("{name}=; {EXPIRED}"), format!("{name}=; {EXPIRED}; path=/")]
                })
                .collect(),
        )
    }

    pub fn is_ajax(&self) -> bool {
        self.requested_with
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("XMLHttpRequest"))
    }
}

fn cookie_names(header: &str) -> Vec<&str> {
    let mut names = Vec::new();
    for pair in header.split(';') {
        let name = pair.split_once('=').map_or(pair, |(name, _)| name).trim();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Value of header `name` among raw `Name: value` response lines;
/// the name match is case-insensitive and the value is trimmed.
pub fn response_header<S: AsRef<str>>(name: &str, headers: &[S]) -> Option<String> {
    headers.iter().find_map(|line| {
        let (key, value) = line.as_ref().split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs.iter().map(|(u, p)| (u.to_string(), p.to_string())).collect()
    }

    fn with_auth(user: &str, password: &str) -> RequestContext {
        RequestContext {
            auth_user: Some(user.into()),
            auth_password: Some(password.into()),
            ..RequestContext::default()
        }
    }

    #[test]
    fn basic_auth() {
        assert!(!RequestContext::default().check_basic_auth(&creds(&[])));

        let req = with_auth("hello", "world");
        assert!(!req.check_basic_auth(&creds(&[])));
        assert!(!req.check_basic_auth(&creds(&[("root", "toor")])));

        let req = with_auth("root", "toor");
        assert!(!req.check_basic_auth(&creds(&[])));
        assert!(req.check_basic_auth(&creds(&[("root", "toor")])));
        assert!(!req.check_basic_auth(&creds(&[("root", "Toor")])));
    }

    #[test]
    fn expire_cookies() {
        assert_eq!(RequestContext::default().expire_all_cookies(), None);

        let req = RequestContext {
            cookie_header: Some("first=one; second=two".into()),
            ..RequestContext::default()
        };
        let headers = req.expire_all_cookies().unwrap();
        assert_eq!(headers.len(), 4);
        assert!(headers[0].starts_with("first=; expires=Thu, 01 Jan 1970"));
        assert!(headers[3].starts_with("second=;"));
        assert!(headers[3].ends_with("path=/"));

        let req = RequestContext {
            cookie_header: Some("first=one".into()),
            response_cookies: vec!["111".into(), "first".into()],
            ..RequestContext::default()
        };
        let headers = req.expire_all_cookies().unwrap();
        assert_eq!(headers.len(), 4);
        assert!(headers[2].starts_with("111=;"));
    }

    #[test]
    fn ajax_detection() {
        assert!(!RequestContext::default().is_ajax());
        let req = RequestContext {
            requested_with: Some("XMLHttpRequest".into()),
            ..RequestContext::default()
        };
        assert!(req.is_ajax());
    }

    #[test]
    fn header_lookup() {
        let want = Some("text/html; charset=utf-8".to_string());
        assert_eq!(response_header("content-type", &["content-type:text/html; charset=utf-8"]), want);
        assert_eq!(response_header("content-type", &["Content-Type:text/html; charset=utf-8"]), want);
        assert_eq!(response_header("content-type", &["content-type: text/html; charset=utf-8 "]), want);
        assert_eq!(response_header("x-missing", &["content-type: a"]), None);
    }
}

//! Cookie jar for the vendor token cookies.
//!
//! Request-side `Cookie` headers come from configuration; response-side
//! `Set-Cookie` headers come from the login endpoint. Both are parsed with
//! the `cookie` crate.

use cookie::Cookie;
use log::*;
use std::collections::HashMap;

/// Cookie holding the vendor access token.
pub const ACCESS_TOKEN_COOKIE: &str = "vendor_access_token";

/// Cookie holding the vendor session token.
pub const SESSION_COOKIE: &str = "vendor_session";

/// Cookies available to the current execution context.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    /// Parse a `Cookie` header value of `name=value; other=value` pairs.
    /// Malformed pairs are skipped; on repeated names the first one wins.
    ///
    pub fn parse(header: &str) -> Self {
        let mut cookies = HashMap::new();
        for cookie in Cookie::split_parse(header) {
            match cookie {
                Ok(cookie) => {
                    cookies
                        .entry(cookie.name().to_string())
                        .or_insert_with(|| unquote(cookie.value()).to_string());
                }
                Err(e) => trace!("Skipping malformed cookie pair: {}", e),
            }
        }
        CookieJar { cookies }
    }

    /// Collect the cookies set by a response's `Set-Cookie` headers. Later
    /// headers replace earlier ones for the same name.
    ///
    pub fn from_set_cookie<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut jar = CookieJar::default();
        for header in headers {
            match Cookie::parse(header) {
                Ok(cookie) => jar.insert(cookie.name(), unquote(cookie.value())),
                Err(e) => warn!("Ignoring unparseable Set-Cookie header: {}", e),
            }
        }
        jar
    }

    /// Returns the non-empty value of the named cookie.
    ///
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    /// Overlay another jar; its values replace ours.
    ///
    pub fn merge(&mut self, other: CookieJar) {
        self.cookies.extend(other.cookies);
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

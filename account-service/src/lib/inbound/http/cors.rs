use std::time::Duration;

use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use thiserror::Error;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;

use crate::config::CorsConfig;

const WILDCARD: &str = "*";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CorsConfigError {
    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("Invalid CORS method: {0}")]
    InvalidMethod(String),

    #[error("Invalid CORS header: {0}")]
    InvalidHeader(String),
}

/// Build the CORS layer from configuration.
///
/// `*` origins allow any origin without credentials. An explicit origin list
/// enables credentials; wildcard methods/headers then mirror the request.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, CorsConfigError> {
    let layer = CorsLayer::new().max_age(Duration::from_secs(config.max_age_secs));
    let any_origin = config.allowed_origins.trim() == WILDCARD;

    let layer = if any_origin {
        layer.allow_origin(Any)
    } else {
        layer
            .allow_origin(AllowOrigin::list(parse_list(
                &config.allowed_origins,
                |origin| {
                    HeaderValue::from_str(origin)
                        .map_err(|_| CorsConfigError::InvalidOrigin(origin.to_string()))
                },
            )?))
            .allow_credentials(true)
    };

    let methods = if config.allowed_methods.trim() == WILDCARD {
        if any_origin {
            AllowMethods::any()
        } else {
            AllowMethods::mirror_request()
        }
    } else {
        AllowMethods::list(parse_list(&config.allowed_methods, |method| {
            Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| CorsConfigError::InvalidMethod(method.to_string()))
        })?)
    };

    let headers = if config.allowed_headers.trim() == WILDCARD {
        if any_origin {
            AllowHeaders::any()
        } else {
            AllowHeaders::mirror_request()
        }
    } else {
        AllowHeaders::list(parse_list(&config.allowed_headers, |header| {
            HeaderName::from_bytes(header.as_bytes())
                .map_err(|_| CorsConfigError::InvalidHeader(header.to_string()))
        })?)
    };

    Ok(layer.allow_methods(methods).allow_headers(headers))
}

fn parse_list<T>(
    raw: &str,
    parse: impl Fn(&str) -> Result<T, CorsConfigError>,
) -> Result<Vec<T>, CorsConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(origins: &str, methods: &str, headers: &str) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.to_string(),
            allowed_methods: methods.to_string(),
            allowed_headers: headers.to_string(),
            max_age_secs: 86400,
        }
    }

    #[test]
    fn test_default_config_builds() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn test_explicit_origins_with_wildcards_build() {
        let config = config("https://app.example.com, http://localhost:3000", "*", "*");
        assert!(cors_layer(&config).is_ok());
    }

    #[test]
    fn test_invalid_entries_are_rejected() {
        assert!(matches!(
            cors_layer(&config("*", "GET,NOT A METHOD", "Content-Type")),
            Err(CorsConfigError::InvalidMethod(_))
        ));
        assert!(matches!(
            cors_layer(&config("*", "GET", "Bad Header")),
            Err(CorsConfigError::InvalidHeader(_))
        ));
        assert!(matches!(
            cors_layer(&config("https://ok.example.com,bad\norigin", "GET", "Content-Type")),
            Err(CorsConfigError::InvalidOrigin(_))
        ));
    }
}

//! High-level document loading for Kestrel.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read a file or fetch over HTTP/1.1
//! - **HTML Parsing** - build the DOM tree from the response body
//! - **Style Collection** - rules from every `<style>` element
//!
//! # Not Implemented
//!
//! - External stylesheets (`<link rel="stylesheet">`)
//! - Style computation, layout and rendering
//! - Redirects and TLS

pub use kestrel_css as css;
pub use kestrel_dom as dom;
pub use kestrel_html as html;
pub use kestrel_http as http;

use std::fs;
use std::io::{Read, Write};

use kestrel_css::Rule;
use kestrel_dom::DomTree;
use kestrel_html::{HtmlError, ParseIssue};
use kestrel_http::{HttpError, Request, ResponseRecord, TransportConfig};
use thiserror::Error;

/// A fully loaded and parsed document.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Source path or `host:port/path`
    pub source_path: String,

    /// The response the document came from, if it was fetched
    pub response: Option<ResponseRecord>,

    /// The HTML source text that was parsed
    pub html_source: String,

    /// Parsed DOM tree
    pub dom: DomTree,

    /// Rules from `<style>` elements, in document order
    pub rules: Vec<Rule>,

    /// Tolerated markup problems
    pub parse_issues: Vec<ParseIssue>,
}

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a file
    #[error("File error: failed to read '{path}': {source}")]
    File {
        /// Path that could not be read
        path: String,
        /// Underlying error
        source: std::io::Error,
    },
    /// Failed to fetch or parse the response
    #[error("Network error: {0}")]
    Http(#[from] HttpError),
    /// The markup could not be parsed
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),
}

/// Parse an HTML string into a [`LoadedDocument`].
///
/// # Errors
///
/// Returns [`LoadError::Html`] for a mismatched end tag.
pub fn parse_document(html: &str) -> Result<LoadedDocument, LoadError> {
    let parsed = kestrel_html::parse_document(html)?;
    Ok(LoadedDocument {
        source_path: String::new(),
        response: None,
        html_source: html.to_string(),
        dom: parsed.tree,
        rules: parsed.rules,
        parse_issues: parsed.issues,
    })
}

/// Read and parse an HTML file.
///
/// # Errors
///
/// Returns [`LoadError::File`] if the file cannot be read, or any error
/// from [`parse_document`].
pub fn load_document(path: &str) -> Result<LoadedDocument, LoadError> {
    let html = fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_string(),
        source,
    })?;
    let mut doc = parse_document(&html)?;
    doc.source_path = path.to_string();
    Ok(doc)
}

/// Parse the body of a received response as HTML.
///
/// The status code is not checked; error pages are documents too.
///
/// # Errors
///
/// Returns any error from [`parse_document`].
pub fn load_response(response: ResponseRecord) -> Result<LoadedDocument, LoadError> {
    let mut doc = parse_document(&response.body_text())?;
    doc.response = Some(response);
    Ok(doc)
}

/// Send `request` over TCP and parse the response body.
///
/// # Errors
///
/// Returns [`LoadError::Http`] if the request fails and
/// [`LoadError::Html`] if the body cannot be parsed.
pub fn fetch_document(request: &Request, config: &TransportConfig) -> Result<LoadedDocument, LoadError> {
    let response = kestrel_http::send_tcp(request, config)?;
    finish_fetch(request, response)
}

/// Like [`fetch_document`], over an already open stream.
///
/// # Errors
///
/// Same as [`fetch_document`].
pub fn fetch_document_over<S: Read + Write>(
    request: &Request,
    stream: &mut S,
    config: &TransportConfig,
) -> Result<LoadedDocument, LoadError> {
    let response = kestrel_http::send(request, stream, config)?;
    finish_fetch(request, response)
}

fn finish_fetch(request: &Request, response: ResponseRecord) -> Result<LoadedDocument, LoadError> {
    let mut doc = load_response(response)?;
    doc.source_path = format!("{}:{}{}", request.host, request.port, request.path);
    Ok(doc)
}

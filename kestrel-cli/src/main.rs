//! Kestrel CLI
//!
//! Fetch a page over HTTP/1.1, parse captured responses, or parse HTML and
//! print the resulting tree and style rules.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use kestrel_browser::{LoadedDocument, fetch_document, load_document, load_response, parse_document};
use kestrel_dom::NodeId;
use kestrel_html::format_tree;
use kestrel_http::{Request, ResponseParser, ResponseRecord, TransportConfig};
use owo_colors::OwoColorize;

/// Kestrel: incremental HTTP/1.1 response and HTML parsing
#[derive(Parser, Debug)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Fetch a page and print its DOM tree and style rules
    kestrel fetch example.com --path /index.html

    # POST form fields as JSON
    kestrel fetch 127.0.0.1 -p 8088 -X POST -F name=Li --json-body

    # Parse a local file or an inline string
    kestrel html ./index.html
    kestrel html --inline '<p>Hello</p>'

    # Replay a captured response in 7-byte fragments
    kestrel response capture.bin --fragment-size 7 --html

    # Any command can print JSON
    kestrel --json html --inline '<style>p{color:red}</style>'
"#)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a request and parse the response body as HTML
    Fetch {
        /// Host to connect to
        host: String,

        /// TCP port
        #[arg(short, long, default_value_t = 80)]
        port: u16,

        /// Request path
        #[arg(long, default_value = "/")]
        path: String,

        /// Request method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Extra header (repeatable)
        #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Body field (repeatable)
        #[arg(short = 'F', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Encode fields as JSON instead of a form
        #[arg(long)]
        json_body: bool,

        /// Connect and read timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Read buffer size in bytes
        #[arg(long, default_value_t = 4096)]
        buffer_size: usize,
    },

    /// Parse HTML from a file or an inline string
    Html {
        /// Path to an HTML file
        #[arg(value_name = "FILE", required_unless_present = "inline")]
        file: Option<String>,

        /// Parse this HTML string instead of a file
        #[arg(long, value_name = "HTML", conflicts_with = "file")]
        inline: Option<String>,
    },

    /// Parse a captured raw HTTP response
    Response {
        /// File holding the raw response bytes
        file: PathBuf,

        /// Feed the parser in fragments of this many bytes
        #[arg(long, value_name = "BYTES")]
        fragment_size: Option<usize>,

        /// Also parse the body as HTML
        #[arg(long)]
        html: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch {
            host,
            port,
            path,
            method,
            headers,
            fields,
            json_body,
            timeout,
            buffer_size,
        } => {
            let mut request = Request::new(host).port(port).path(path).method(method);
            if json_body {
                request = request.header("Content-Type", "application/json");
            }
            for (name, value) in headers {
                request = request.header(name, value);
            }
            for (key, value) in fields {
                request = request.field(key, value);
            }
            let config = TransportConfig {
                timeout: Duration::from_secs(timeout),
                buffer_size,
            };

            let doc = fetch_document(&request, &config)
                .with_context(|| format!("fetching {}:{}{}", request.host, request.port, request.path))?;
            print_document(&doc, cli.json)
        }
        Command::Html { file, inline } => {
            let doc = match (inline, file) {
                (Some(html), _) => parse_document(&html)?,
                (None, Some(path)) => load_document(&path)?,
                (None, None) => bail!("html requires a FILE or --inline"),
            };
            print_document(&doc, cli.json)
        }
        Command::Response {
            file,
            fragment_size,
            html,
        } => {
            let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let record = parse_response(&bytes, fragment_size)?;
            if html {
                let doc = load_response(record)?;
                print_document(&doc, cli.json)
            } else {
                print_response(&record, cli.json)
            }
        }
    }
}

/// Feed captured bytes to a fresh parser, then signal end of stream.
fn parse_response(bytes: &[u8], fragment_size: Option<usize>) -> Result<ResponseRecord> {
    let size = fragment_size.unwrap_or(bytes.len()).max(1);
    let mut parser = ResponseParser::new();
    for fragment in bytes.chunks(size) {
        parser.feed(fragment)?;
    }
    parser.finish();
    parser
        .result()
        .with_context(|| format!("parser stopped in state {}", parser.state()))
}

fn print_response(record: &ResponseRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    println!("{}", "=== Status ===".bold());
    println!("{} {}", record.status_code, record.status_text);

    println!("\n{}", "=== Headers ===".bold());
    for (name, value) in record.headers.iter() {
        println!("{}: {value}", name.cyan());
    }

    println!("\n{}", "=== Body ===".bold());
    println!("{}", record.body_text());
    Ok(())
}

/// Print document information to stdout
fn print_document(doc: &LoadedDocument, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "source": doc.source_path,
            "response": doc.response,
            "tree": doc.dom.view(NodeId::ROOT),
            "rules": doc.rules,
            "issues": doc.parse_issues,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if let Some(response) = &doc.response {
        println!("{}", "=== Response ===".bold());
        println!("{} {}", response.status_code, response.status_text);
        println!();
    }

    println!("{}", "=== DOM Tree ===".bold());
    print!("{}", format_tree(&doc.dom, NodeId::ROOT));

    println!("\n{}", "=== Style Rules ===".bold());
    println!("{} rules", doc.rules.len());
    for rule in &doc.rules {
        println!("  {rule}");
    }

    if !doc.parse_issues.is_empty() {
        println!("\n{}", "=== Parse Issues ===".bold());
        for issue in &doc.parse_issues {
            println!(
                "  - {} (at {}, {})",
                issue.message.yellow(),
                issue.position,
                issue.state
            );
        }
    }
    Ok(())
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    s.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected NAME:VALUE, got '{s}'"))
}

//! Manual-page retrieval.
//!
//! Sources are tried in order and the first non-empty page wins:
//!
//! - [`LocalManSource`] runs the system `man` viewer with a plain pager
//! - [`WebManSource`] fetches the page from a remote man-page site (feature
//!   `web`)
//!
//! "Not found" is `Ok(None)`; only real failures (I/O, transport) are errors.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::debug;
use wait_timeout::ChildExt;

use crate::config::RetrievalConfig;
use crate::error::{DiscoveryError, Result};
use crate::parser::normalize::normalize_man_text;

/// A place manual pages can be fetched from.
pub trait ManPageSource: Send + Sync {
    /// Short label used in logs.
    fn label(&self) -> &'static str;

    /// Fetches the rendered page for `command`, or `None` when this source
    /// has no page for it.
    fn fetch(&self, command: &str) -> Result<Option<String>>;
}

/// Checks that `command` is a plain command name.
///
/// Names are passed to `man` and interpolated into URLs, so only
/// `[A-Za-z0-9._+-]` is accepted and a leading `-` is refused.
pub fn validate_command_name(command: &str) -> Result<()> {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static COMMAND_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._+-]+$").expect("static regex must compile"));

    if COMMAND_RE.is_match(command) && !command.starts_with('-') {
        Ok(())
    } else {
        Err(DiscoveryError::InvalidCommand(command.to_string()))
    }
}

/// Builds the enabled sources in retrieval order.
pub fn sources_for(config: &RetrievalConfig) -> Vec<Box<dyn ManPageSource>> {
    let mut sources: Vec<Box<dyn ManPageSource>> = Vec::new();
    if config.local {
        sources.push(Box::new(LocalManSource::from_config(config)));
    }
    if config.web {
        #[cfg(feature = "web")]
        sources.push(Box::new(WebManSource::from_config(config)));
        #[cfg(not(feature = "web"))]
        debug!("Web retrieval requested but the `web` feature is disabled");
    }
    sources
}

/// Runs `man <command>` with paging disabled.
#[derive(Debug, Clone)]
pub struct LocalManSource {
    program: String,
    timeout: Duration,
    man_width: u16,
}

impl LocalManSource {
    pub fn new(timeout: Duration, man_width: u16) -> Self {
        Self {
            program: "man".to_string(),
            timeout,
            man_width,
        }
    }

    /// Replaces the viewer binary (`man` by default).
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(Duration::from_millis(config.timeout_ms), config.man_width)
    }
}

impl ManPageSource for LocalManSource {
    fn label(&self) -> &'static str {
        "local"
    }

    fn fetch(&self, command: &str) -> Result<Option<String>> {
        validate_command_name(command)?;

        let spawned = Command::new(&self.program)
            .arg(command)
            .env("MANPAGER", "cat")
            .env("PAGER", "cat")
            .env("MANWIDTH", self.man_width.to_string())
            .env("TERM", "dumb")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(program = %self.program, "Man viewer is not installed");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        // Drain stdout in the background so a full pipe cannot stall the child.
        let stdout_thread = child.stdout.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let result = pipe.read_to_end(&mut buf);
                (buf, result)
            })
        });

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                debug!(
                    command,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "man timed out, killing process"
                );
                let _ = child.kill();
                let _ = child.wait();
                // Pipeline helpers of `man` may still hold the pipe; the reader
                // ends on their EOF and is not joined here.
                drop(stdout_thread);
                return Ok(None);
            }
        };

        let stdout = match stdout_thread.and_then(|thread| thread.join().ok()) {
            Some((buf, Ok(_))) => buf,
            Some((_, Err(e))) => return Err(e.into()),
            None => Vec::new(),
        };

        if !status.success() {
            debug!(command, code = ?status.code(), "man exited unsuccessfully");
            return Ok(None);
        }

        let text = normalize_man_text(&String::from_utf8_lossy(&stdout));
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }
}

/// Fetches `{base_url}/{command}` and converts the page body to text.
#[cfg(feature = "web")]
#[derive(Debug, Clone)]
pub struct WebManSource {
    agent: ureq::Agent,
    base_url: String,
}

#[cfg(feature = "web")]
impl WebManSource {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(
            &config.web_base_url,
            Duration::from_millis(config.timeout_ms),
        )
    }

    /// URL of the page for `command`.
    pub fn page_url(&self, command: &str) -> String {
        format!("{}/{}", self.base_url, command)
    }
}

#[cfg(feature = "web")]
impl ManPageSource for WebManSource {
    fn label(&self) -> &'static str {
        "web"
    }

    fn fetch(&self, command: &str) -> Result<Option<String>> {
        validate_command_name(command)?;
        let url = self.page_url(command);

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                debug!(url = %url, code, "Remote man page not available");
                return Ok(None);
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(DiscoveryError::Http(format!("{url}: {transport}")));
            }
        };

        let html = response.into_string()?;
        let text = html_to_text(&html);
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }
}

/// Converts a man-page HTML document into text laid out like `man` output.
///
/// Only the `<div id="content">` body is kept when present. `h2` headings
/// become upper-case column-0 lines, `h3` subsection titles are indented
/// shallower than body text, and `dd` bodies are indented deeper than their
/// `dt` terms.
pub fn html_to_text(html: &str) -> String {
    static CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(?is)<div[^>]*\bid\s*=\s*["']?content["']?[^>]*>(.*)</div>"#)
            .expect("static regex must compile")
    });
    static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>")
            .expect("static regex must compile")
    });
    static WHITESPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));
    static H2_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<h[12][^>]*>(.*?)</h[12]>").expect("static regex must compile")
    });
    static H3_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<h[3-6][^>]*>(.*?)</h[3-6]>").expect("static regex must compile")
    });
    static DT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<dt[^>]*>").expect("static regex must compile"));
    static DD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<dd[^>]*>").expect("static regex must compile"));
    static P_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<p[^>]*>").expect("static regex must compile"));
    static BR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("static regex must compile"));
    static BLOCK_END_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)</(p|dl|pre|div)>").expect("static regex must compile")
    });
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex must compile"));
    static TRAILING_SPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("static regex must compile"));

    let body = CONTENT_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map_or(html, |m| m.as_str());
    let body = SCRIPT_RE.replace_all(body, "");
    let body = WHITESPACE_RE.replace_all(&body, " ");

    let body = H2_RE.replace_all(&body, |caps: &regex::Captures<'_>| {
        let title = TAG_RE.replace_all(&caps[1], "");
        format!("\n{}\n", title.trim().to_uppercase())
    });
    let body = H3_RE.replace_all(&body, |caps: &regex::Captures<'_>| {
        let title = TAG_RE.replace_all(&caps[1], "");
        format!("\n   {}\n", title.trim())
    });
    let body = DT_RE.replace_all(&body, "\n       ");
    let body = DD_RE.replace_all(&body, "\n              ");
    let body = P_RE.replace_all(&body, "\n\n       ");
    let body = BR_RE.replace_all(&body, "\n       ");
    let body = BLOCK_END_RE.replace_all(&body, "\n");
    let body = TAG_RE.replace_all(&body, "");
    let text = decode_entities(&body);
    let text = TRAILING_SPACE_RE.replace_all(&text, "");

    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim_matches('\n').to_string()
}

fn decode_entities(text: &str) -> String {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").expect("static regex must compile")
    });

    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

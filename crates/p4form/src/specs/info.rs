//! Server and client descriptions from `info` tagged output.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{Spec, impl_spec, parse_date};
use crate::error::{FormError, Result};
use crate::record::FormRecord;
use crate::schema::{FieldType, SpecField, SpecSchema};

static SERVER_SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    let schema = [
        ("serverName", FieldType::Word),
        ("serverAddress", FieldType::Word),
        ("serverRoot", FieldType::Line),
        ("serverDate", FieldType::Line),
        ("serverUptime", FieldType::Word),
        ("serverVersion", FieldType::Line),
        ("serverServices", FieldType::Word),
        ("serverLicense", FieldType::Line),
        ("serverLicense-ip", FieldType::Word),
        ("caseHandling", FieldType::Word),
        ("unicode", FieldType::Word),
    ]
    .into_iter()
    .fold(SpecSchema::new("serverinfo"), |schema, (name, t)| {
        schema.with_field(SpecField::new(name, t))
    });
    Arc::new(schema)
});

static CLIENT_SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    let schema = [
        ("clientName", FieldType::Word),
        ("clientHost", FieldType::Word),
        ("clientCwd", FieldType::Line),
        ("clientAddress", FieldType::Word),
        ("clientRoot", FieldType::Line),
    ]
    .into_iter()
    .fold(SpecSchema::new("clientinfo"), |schema, (name, t)| {
        schema.with_field(SpecField::new(name, t))
    });
    Arc::new(schema)
});

/// A parsed server version string such as
/// `P4D/LINUX26X86_64/2013.2/661283 (2013/07/10)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerVersion {
    pub product: String,
    pub platform: String,
    pub major: u32,
    pub minor: u32,
    /// Change number or other build suffix, verbatim.
    pub build: String,
    pub date: Option<NaiveDate>,
}

impl ServerVersion {
    /// True if this release is `major.minor` or newer.
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl FromStr for ServerVersion {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || FormError::MalformedEntry {
            kind: "server version",
            line: s.to_string(),
        };
        let s = s.trim();
        let (ident, date) = match s.split_once(char::is_whitespace) {
            Some((ident, rest)) => (ident, rest.trim().trim_matches(|c: char| c == '(' || c == ')')),
            None => (s, ""),
        };

        let parts: Vec<&str> = ident.split('/').collect();
        let [product, platform, release, build @ ..] = parts.as_slice() else {
            return Err(malformed());
        };
        if build.is_empty() {
            return Err(malformed());
        }
        let (major, minor) = release.split_once('.').ok_or_else(malformed)?;
        let minor: String = minor.chars().take_while(char::is_ascii_digit).collect();

        Ok(Self {
            product: product.to_string(),
            platform: platform.to_string(),
            major: major.parse().map_err(|_| malformed())?,
            minor: minor.parse().map_err(|_| malformed())?,
            build: build.join("/"),
            date: NaiveDate::parse_from_str(date, "%Y/%m/%d").ok(),
        })
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}.{}/{}",
            self.product, self.platform, self.major, self.minor, self.build
        )?;
        if let Some(date) = self.date {
            write!(f, " ({})", date.format("%Y/%m/%d"))?;
        }
        Ok(())
    }
}

/// What a server reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerMetaData {
    record: FormRecord,
}

impl_spec!(ServerMetaData, SERVER_SCHEMA);

impl ServerMetaData {
    pub fn name(&self) -> String {
        self.record.get("serverName")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record.set("serverName", name);
    }

    pub fn address(&self) -> String {
        self.record.get("serverAddress")
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.record.set("serverAddress", address);
    }

    pub fn root(&self) -> String {
        self.record.get("serverRoot")
    }

    pub fn set_root(&mut self, root: impl Into<String>) {
        self.record.set("serverRoot", root);
    }

    /// Server-local time; the offset and zone name are dropped.
    pub fn date(&self) -> Option<NaiveDateTime> {
        let raw = self.record.get("serverDate");
        let mut words = raw.split_whitespace();
        let day = words.next()?;
        match words.next() {
            Some(time) => parse_date(&format!("{} {}", day, time)),
            None => parse_date(day),
        }
    }

    /// `HH:MM:SS`, where hours may exceed 24.
    pub fn uptime(&self) -> Option<Duration> {
        let raw = self.record.get("serverUptime");
        let parts = raw
            .trim()
            .split(':')
            .map(|p| p.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        let [h, m, s] = parts.as_slice() else {
            return None;
        };
        let secs = h
            .checked_mul(3600)?
            .checked_add(m.checked_mul(60)?)?
            .checked_add(*s)?;
        Some(Duration::from_secs(secs))
    }

    pub fn version_string(&self) -> String {
        self.record.get("serverVersion")
    }

    pub fn version(&self) -> Option<ServerVersion> {
        self.version_string().parse().ok()
    }

    pub fn set_version(&mut self, version: &ServerVersion) {
        self.record.set("serverVersion", version.to_string());
    }

    pub fn license(&self) -> String {
        self.record.get("serverLicense")
    }

    pub fn license_ip(&self) -> String {
        self.record.get("serverLicense-ip")
    }

    pub fn services(&self) -> String {
        self.record.get("serverServices")
    }

    pub fn case_sensitive(&self) -> bool {
        self.record.get("caseHandling") == "sensitive"
    }

    pub fn set_case_sensitive(&mut self, sensitive: bool) {
        let value = if sensitive { "sensitive" } else { "insensitive" };
        self.record.set("caseHandling", value);
    }

    pub fn unicode_enabled(&self) -> bool {
        self.record.get("unicode") == "enabled"
    }

    pub fn set_unicode_enabled(&mut self, enabled: bool) {
        let value = if enabled { "enabled" } else { "disabled" };
        self.record.set("unicode", value);
    }
}

/// What a server reports about the connected client workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMetadata {
    record: FormRecord,
}

impl_spec!(ClientMetadata, CLIENT_SCHEMA);

impl ClientMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let mut client = Self::empty();
        client.set_name(name);
        client
    }

    pub fn name(&self) -> String {
        self.record.get("clientName")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record.set("clientName", name);
    }

    pub fn host_name(&self) -> String {
        self.record.get("clientHost")
    }

    pub fn set_host_name(&mut self, host: impl Into<String>) {
        self.record.set("clientHost", host);
    }

    pub fn current_directory(&self) -> String {
        self.record.get("clientCwd")
    }

    pub fn set_current_directory(&mut self, cwd: impl Into<String>) {
        self.record.set("clientCwd", cwd);
    }

    pub fn address(&self) -> String {
        self.record.get("clientAddress")
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.record.set("clientAddress", address);
    }

    pub fn root(&self) -> String {
        self.record.get("clientRoot")
    }

    pub fn set_root(&mut self, root: impl Into<String>) {
        self.record.set("clientRoot", root);
    }
}

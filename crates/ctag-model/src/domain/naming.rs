use std::fmt;

use crate::SlotIndex;

/// TTL in seconds of the A record published for a machine.
pub const DNS_RECORD_TTL: u32 = 300;

/// Fully qualified DNS zone, always ending with `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsZone(String);

impl DnsZone {
    /// Normalize a zone name. Returns `None` for an empty zone (DNS publishing disabled).
    pub fn parse(raw: &str) -> Option<Self> {
        let zone = raw.trim();
        if zone.is_empty() {
            return None;
        }
        if zone.ends_with('.') {
            Some(Self(zone.to_string()))
        } else {
            Some(Self(format!("{zone}.")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DnsZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable names derived from an allocated index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingScheme {
    pub tag_prefix: String,
    pub stack_name: String,
}

impl NamingScheme {
    pub fn new(tag_prefix: impl Into<String>, stack_name: impl Into<String>) -> Self {
        Self {
            tag_prefix: tag_prefix.into(),
            stack_name: stack_name.into(),
        }
    }

    /// Instance tag value: `{stack-}{prefix}{index}`.
    pub fn display_name(&self, index: SlotIndex) -> String {
        if self.stack_name.is_empty() {
            format!("{}{}", self.tag_prefix, index)
        } else {
            format!("{}-{}{}", self.stack_name, self.tag_prefix, index)
        }
    }

    /// A record name: `{prefix}{index}{.stack}.{zone}`.
    pub fn record_name(&self, index: SlotIndex, zone: &DnsZone) -> String {
        if self.stack_name.is_empty() {
            format!("{}{}.{}", self.tag_prefix, index, zone)
        } else {
            format!("{}{}.{}.{}", self.tag_prefix, index, self.stack_name, zone)
        }
    }
}

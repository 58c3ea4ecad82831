//! View mappings: ordered include/exclude/overlay rules between two path
//! namespaces.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};
use crate::format::FormatOptions;
use crate::lex::{quote, tokenize};

/// How a mapping line affects the paths it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    /// No prefix.
    #[default]
    Include,
    /// `-` prefix.
    Exclude,
    /// `+` prefix.
    Overlay,
}

impl MapType {
    pub fn prefix(self) -> &'static str {
        match self {
            MapType::Include => "",
            MapType::Exclude => "-",
            MapType::Overlay => "+",
        }
    }

    fn strip(token: &str) -> (MapType, &str) {
        if let Some(rest) = token.strip_prefix('-') {
            (MapType::Exclude, rest)
        } else if let Some(rest) = token.strip_prefix('+') {
            (MapType::Overlay, rest)
        } else {
            (MapType::Include, token)
        }
    }
}

/// Split one mapping line into its type and two paths.
///
/// Tokens are whitespace-separated; double quotes group a path containing
/// spaces. A leading `-` or `+` on the left token (inside or outside its
/// quotes, or standing alone) sets the type and is not part of the returned
/// path. Anything other than exactly two paths is an error.
///
/// ```
/// use p4form::v1::{MapType, split_view_line};
///
/// let (t, left, right) = split_view_line(r#""-//usr space/..." //ws/usr/..."#).unwrap();
/// assert_eq!(t, MapType::Exclude);
/// assert_eq!(left, "//usr space/...");
/// assert_eq!(right, "//ws/usr/...");
/// ```
pub fn split_view_line(line: &str) -> Result<(MapType, String, String)> {
    let mut tokens = tokenize(line)?;

    let mut map_type = MapType::Include;
    if let Some(first) = tokens.first()
        && (first == "-" || first == "+")
    {
        map_type = MapType::strip(first).0;
        tokens.remove(0);
    }

    let (left, right) = match <[String; 2]>::try_from(tokens) {
        Ok([left, right]) => (left, right),
        Err(tokens) => {
            return Err(FormError::MalformedViewLine {
                line: line.to_string(),
                tokens: tokens.len(),
            });
        }
    };

    if map_type == MapType::Include {
        let (t, path) = MapType::strip(&left);
        Ok((t, path.to_string(), right))
    } else {
        Ok((map_type, left, right))
    }
}

/// A single mapping rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewEntry {
    #[serde(rename = "type")]
    pub map_type: MapType,
    pub left: String,
    pub right: String,
}

impl ViewEntry {
    pub fn new(map_type: MapType, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            map_type,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn include(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(MapType::Include, left, right)
    }

    pub fn exclude(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(MapType::Exclude, left, right)
    }

    pub fn overlay(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(MapType::Overlay, left, right)
    }
}

impl FromStr for ViewEntry {
    type Err = FormError;

    fn from_str(line: &str) -> Result<Self> {
        let (map_type, left, right) = split_view_line(line)?;
        Ok(Self {
            map_type,
            left,
            right,
        })
    }
}

/// The line form, with the type prefix and quotes where a path needs them.
impl fmt::Display for ViewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            quote(self.map_type.prefix(), &self.left),
            quote("", &self.right)
        )
    }
}

/// Ordered sequence of [`ViewEntry`] rules.
///
/// Order is significant and preserved exactly; nothing is de-duplicated.
/// Two maps are equal only if they hold the same entries in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewMap {
    entries: Vec<ViewEntry>,
}

impl ViewMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw mapping lines. Blank lines are skipped; the first
    /// malformed line fails the whole map.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            map.add_line(line)?;
        }
        Ok(map)
    }

    pub fn from_entries(entries: Vec<ViewEntry>) -> Self {
        Self { entries }
    }

    /// Parse and append one mapping line.
    pub fn add_line(&mut self, line: &str) -> Result<()> {
        self.entries.push(line.parse()?);
        Ok(())
    }

    pub fn push(&mut self, entry: ViewEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ViewEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ViewEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ViewEntry> {
        self.entries.iter()
    }

    /// One formatted line per entry, without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Every line followed by the configured terminator.
    pub fn to_text_with(&self, options: &FormatOptions) -> String {
        let eol = options.line_ending.as_str();
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push_str(eol);
        }
        out
    }
}

/// CRLF-terminated lines, including after the last entry.
impl fmt::Display for ViewMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text_with(&FormatOptions::crlf()))
    }
}

impl Index<usize> for ViewMap {
    type Output = ViewEntry;

    fn index(&self, index: usize) -> &ViewEntry {
        &self.entries[index]
    }
}

impl FromIterator<ViewEntry> for ViewMap {
    fn from_iter<T: IntoIterator<Item = ViewEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ViewMap {
    type Item = &'a ViewEntry;
    type IntoIter = std::slice::Iter<'a, ViewEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ViewMap {
    type Item = ViewEntry;
    type IntoIter = std::vec::IntoIter<ViewEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── split_view_line ────────────────────────────────────────────────

    #[test]
    fn test_split_include() {
        let (t, l, r) = split_view_line("//depot/... //ws/...").unwrap();
        assert_eq!(t, MapType::Include);
        assert_eq!(l, "//depot/...");
        assert_eq!(r, "//ws/...");
    }

    #[test]
    fn test_split_exclude() {
        let (t, l, r) = split_view_line("-//usr/... //user/usr/...").unwrap();
        assert_eq!(t, MapType::Exclude);
        assert_eq!(l, "//usr/...");
        assert_eq!(r, "//user/usr/...");
    }

    #[test]
    fn test_split_overlay() {
        let (t, l, _) = split_view_line("+//spec/... //user/spec/...").unwrap();
        assert_eq!(t, MapType::Overlay);
        assert_eq!(l, "//spec/...");
    }

    #[test]
    fn test_split_prefix_inside_quotes() {
        let (t, l, r) =
            split_view_line(r#""-//usr space/..." "//user_win-user/usr space/...""#).unwrap();
        assert_eq!(t, MapType::Exclude);
        assert_eq!(l, "//usr space/...");
        assert_eq!(r, "//user_win-user/usr space/...");
    }

    #[test]
    fn test_split_detached_prefix() {
        let (t, l, r) = split_view_line("- //a/... //b/...").unwrap();
        assert_eq!(t, MapType::Exclude);
        assert_eq!(l, "//a/...");
        assert_eq!(r, "//b/...");
    }

    #[test]
    fn test_split_wrong_token_count() {
        let err = split_view_line("//only/one/...").unwrap_err();
        assert_eq!(
            err,
            FormError::MalformedViewLine {
                line: "//only/one/...".into(),
                tokens: 1
            }
        );
        assert!(split_view_line("//a/... //b/... //c/...").is_err());
        assert!(split_view_line("").is_err());
        assert!(split_view_line("- //a/...").is_err());
    }

    #[test]
    fn test_split_unterminated_quote() {
        assert!(matches!(
            split_view_line(r#""//a b/... //c/..."#),
            Err(FormError::UnterminatedQuote(_))
        ));
    }

    #[test]
    fn test_wildcards_are_opaque() {
        let (_, l, r) = split_view_line("//depot/....c //ws/%%1.c").unwrap();
        assert_eq!(l, "//depot/....c");
        assert_eq!(r, "//ws/%%1.c");
    }

    // ── ViewEntry ──────────────────────────────────────────────────────

    #[test]
    fn test_entry_display_requotes() {
        let line = r#""-//usr space/..." "//user_win-user/usr space/...""#;
        let entry: ViewEntry = line.parse().unwrap();
        assert_eq!(entry.to_string(), line);
    }

    #[test]
    fn test_entry_display_plain() {
        let entry = ViewEntry::overlay("//spec/...", "//user/spec/...");
        assert_eq!(entry.to_string(), "+//spec/... //user/spec/...");
    }

    #[test]
    fn test_entry_serde() {
        let entry = ViewEntry::exclude("//a/...", "//b/...");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"type":"exclude","left":"//a/...","right":"//b/..."}"#);
        let back: ViewEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    // ── ViewMap ────────────────────────────────────────────────────────

    fn sample_lines() -> Vec<&'static str> {
        vec![
            "//depot/... //user/...",
            "-//usr/... //user/usr/...",
            "+//spec/... //user/spec/...",
            r#""-//usr space/..." "//user_win-user/usr space/...""#,
        ]
    }

    #[test]
    fn test_from_lines_preserves_order_and_types() {
        let map = ViewMap::from_lines(sample_lines()).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map[0].map_type, MapType::Include);
        assert_eq!(map[1].map_type, MapType::Exclude);
        assert_eq!(map[2].map_type, MapType::Overlay);
        assert_eq!(map[3].left, "//usr space/...");
    }

    #[test]
    fn test_from_lines_skips_blank_and_fails_on_bad() {
        let map = ViewMap::from_lines(["", "//a/... //b/...", "   "]).unwrap();
        assert_eq!(map.len(), 1);
        assert!(ViewMap::from_lines(["//a/... //b/...", "bad"]).is_err());
    }

    #[test]
    fn test_display_crlf_with_trailing_terminator() {
        let map = ViewMap::from_lines(sample_lines()).unwrap();
        let expected = sample_lines().join("\r\n") + "\r\n";
        assert_eq!(map.to_string(), expected);
    }

    #[test]
    fn test_empty_map_displays_empty() {
        assert_eq!(ViewMap::new().to_string(), "");
    }

    #[test]
    fn test_add_no_dedup() {
        let mut map = ViewMap::new();
        map.add_line("//a/... //b/...").unwrap();
        map.add_line("//a/... //b/...").unwrap();
        map.push(ViewEntry::include("//a/...", "//b/..."));
        assert_eq!(map.len(), 3);
        assert!(map.add_line("nope").is_err());
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a: ViewMap = vec![
            ViewEntry::include("//a/...", "//x/a/..."),
            ViewEntry::exclude("//a/b/...", "//x/a/b/..."),
        ]
        .into_iter()
        .collect();
        let mut b = a.clone();
        assert_eq!(a, b);
        b = b.into_iter().rev().collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_lines_roundtrip() {
        let map = ViewMap::from_lines(sample_lines()).unwrap();
        let again = ViewMap::from_lines(map.lines()).unwrap();
        assert_eq!(map, again);
    }
}

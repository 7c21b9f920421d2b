//! Aggregation of mixing violations into one changeset-wide message.
//!
//! The message layout is consumed verbatim by review tooling, so the dump
//! reproduces the legacy pretty-JSON style exactly: two-space indentation,
//! `", "` between items (which leaves a trailing space before each line
//! break), and non-ASCII characters escaped as `\uXXXX`.

use super::classifier::ViolationRecord;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::collections::BTreeMap;
use std::io;

/// Fixed explanation that opens the message.
pub const PREAMBLE: &str = "GN targets cannot mix .c, .cc and .m (or .mm) source files.\n\
                            Please create a separate target for each collection of sources.\n";

/// `(target, sources)` pairs, kept sorted.
type TargetEntries = Vec<(String, Vec<String>)>;

/// Mixing violations across a changeset, keyed by GN file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixingReport {
    entries: BTreeMap<String, TargetEntries>,
}

impl MixingReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one violation record.
    ///
    /// Entries are kept sorted by file, then target, then sources, so the
    /// order records arrive in never shows up in the output.
    pub fn add(&mut self, record: ViolationRecord) {
        let entry = (record.target, record.sources);
        let targets = self.entries.entry(record.file).or_default();
        let at = targets.partition_point(|existing| existing <= &entry);
        targets.insert(at, entry);
    }

    /// Returns true if no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of violating targets across all files.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Violating GN files in sorted order.
    pub fn violating_files(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Renders the full diagnostic message.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        let mut message = String::from(PREAMBLE);
        message.push_str("Mixed sources: \n");
        message.push_str(&self.dump()?);
        message.push_str("\nViolating GN files:\n");
        for file in self.violating_files() {
            message.push_str(file);
            message.push('\n');
        }
        Ok(message)
    }

    fn dump(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, LegacyPrettyFormatter::new());
        self.entries.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| serde_json::Error::io(io::Error::other(e)))
    }
}

impl Extend<ViolationRecord> for MixingReport {
    fn extend<I: IntoIterator<Item = ViolationRecord>>(&mut self, records: I) {
        for record in records {
            self.add(record);
        }
    }
}

/// Pretty printer matching the legacy `indent=2` JSON layout.
#[derive(Debug, Default)]
struct LegacyPrettyFormatter {
    current_indent: usize,
    has_value: bool,
}

impl LegacyPrettyFormatter {
    const INDENT: &'static [u8] = b"  ";

    fn new() -> Self {
        Self::default()
    }

    fn indent<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for _ in 0..self.current_indent {
            writer.write_all(Self::INDENT)?;
        }
        Ok(())
    }

    fn begin_value<W: ?Sized + io::Write>(&self, writer: &mut W, first: bool) -> io::Result<()> {
        writer.write_all(if first { b"\n" } else { b", \n" })?;
        self.indent(writer)
    }

    fn end_container<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        close: &[u8],
    ) -> io::Result<()> {
        self.current_indent -= 1;
        if self.has_value {
            writer.write_all(b"\n")?;
            self.indent(writer)?;
        }
        writer.write_all(close)
    }
}

impl Formatter for LegacyPrettyFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.end_container(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.begin_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.end_container(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.begin_value(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file: &str, target: &str, sources: &[&str]) -> ViolationRecord {
        ViolationRecord {
            file: file.to_string(),
            target: target.to_string(),
            sources: sources.iter().map(ToString::to_string).collect(),
            classes: Vec::new(),
        }
    }

    #[test]
    fn empty_report() {
        let report = MixingReport::new();
        assert!(report.is_empty());
        assert_eq!(report.target_count(), 0);
    }

    #[test]
    fn renders_the_exact_legacy_layout() {
        let mut report = MixingReport::new();
        report.add(record("/tmp/x/BUILD.gn", "foo_bar", &["bar.mm", "foo.cc"]));

        let expected = "GN targets cannot mix .c, .cc and .m (or .mm) source files.\n\
                        Please create a separate target for each collection of sources.\n\
                        Mixed sources: \n\
                        {\n  \"/tmp/x/BUILD.gn\": [\n    [\n      \"foo_bar\", \n      [\n        \
                        \"bar.mm\", \n        \"foo.cc\"\n      ]\n    ]\n  ]\n}\n\
                        Violating GN files:\n\
                        /tmp/x/BUILD.gn\n";
        assert_eq!(report.render().unwrap(), expected);
    }

    #[test]
    fn multiple_files_and_targets_are_sorted() {
        let mut report = MixingReport::new();
        report.add(record("b/BUILD.gn", "zeta", &["a.c", "b.cc"]));
        report.add(record("a/BUILD.gn", "one", &["x.c", "y.m"]));
        report.add(record("b/BUILD.gn", "alpha", &["c.cc", "d.mm"]));

        let message = report.render().unwrap();
        let a = message.find("\"a/BUILD.gn\"").unwrap();
        let b = message.find("\"b/BUILD.gn\"").unwrap();
        let alpha = message.find("\"alpha\"").unwrap();
        let zeta = message.find("\"zeta\"").unwrap();
        assert!(a < b);
        assert!(alpha < zeta);
        assert!(message.ends_with("Violating GN files:\na/BUILD.gn\nb/BUILD.gn\n"));
        assert_eq!(report.target_count(), 3);
        assert!(message.contains("  ], \n  \"b/BUILD.gn\": [\n"));
        assert!(message.contains("    ], \n    [\n      \"zeta\", \n"));
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let records = vec![
            record("b/BUILD.gn", "t2", &["a.c", "b.cc"]),
            record("a/BUILD.gn", "t1", &["a.c", "b.cc"]),
            record("b/BUILD.gn", "t1", &["a.c", "b.m"]),
        ];
        let mut forward = MixingReport::new();
        forward.extend(records.clone());
        let mut backward = MixingReport::new();
        backward.extend(records.into_iter().rev());

        assert_eq!(forward, backward);
        assert_eq!(forward.render().unwrap(), backward.render().unwrap());
    }

    #[test]
    fn non_ascii_is_escaped() {
        let mut report = MixingReport::new();
        report.add(record("BUILD.gn", "caf\u{e9}", &["a.c", "\u{1f600}.cc"]));
        let message = report.render().unwrap();
        assert!(message.contains("\"caf\\u00e9\""));
        assert!(message.contains("\"\\ud83d\\ude00.cc\""));
    }

    #[test]
    fn quotes_and_backslashes_are_json_escaped() {
        let mut report = MixingReport::new();
        report.add(record("BUILD.gn", "t", &["a\\\"b.c", "c.cc"]));
        let message = report.render().unwrap();
        assert!(message.contains("\"a\\\\\\\"b.c\""));
    }
}

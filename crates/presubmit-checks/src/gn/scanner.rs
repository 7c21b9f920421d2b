//! Heuristic scanner for GN build files.
//!
//! This is not a GN parser. It tokenises just enough of the language to find
//! `kind("name") { ... }` target blocks and the string literals assigned to
//! `sources` inside them. Constructs it cannot interpret are skipped; it never
//! fails.

use tracing::debug;

/// Calls that open a block but never declare a target.
const NON_TARGET_CALLS: &[&str] = &["if", "foreach", "template", "declare_args"];

/// A target block found in a GN file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDeclaration {
    /// Target function (e.g., `rtc_library`, `source_set`).
    pub kind: String,
    /// Target name as written between the quotes.
    pub name: String,
    /// Source lists in file order.
    ///
    /// A plain `sources = [...]` starts a new group; `+=` extends the current
    /// group and `-=` removes from it. GN targets commonly assign `sources`
    /// separately in `if`/`else` branches, and each branch is its own group.
    pub source_groups: Vec<Vec<String>>,
}

impl TargetDeclaration {
    fn new(kind: &str, name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            source_groups: Vec::new(),
        }
    }

    /// Iterates over every declared source in file order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.source_groups.iter().flatten().map(String::as_str)
    }

    fn apply(&mut self, op: Token<'_>, list: Option<Vec<&str>>) {
        match (op, list) {
            (Token::Assign, list) => {
                let group = list
                    .unwrap_or_default()
                    .into_iter()
                    .map(String::from)
                    .collect();
                self.source_groups.push(group);
            }
            (Token::AddAssign, Some(list)) => {
                let items = list.into_iter().map(String::from);
                match self.source_groups.last_mut() {
                    Some(group) => group.extend(items),
                    None => self.source_groups.push(items.collect()),
                }
            }
            (Token::SubAssign, Some(list)) => {
                if let Some(group) = self.source_groups.last_mut() {
                    group.retain(|s| !list.contains(&s.as_str()));
                }
            }
            _ => debug!("Skipping non-literal sources update in {}", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Str(&'a str),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dot,
    Assign,
    AddAssign,
    SubAssign,
    Other,
}

/// Tokenises GN text.
///
/// An unterminated string literal ends tokenisation; whatever was read
/// before it is returned.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let next_is_eq = bytes.get(i + 1) == Some(&b'=');
        match bytes[i] {
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'"' => {
                let start = i + 1;
                let mut end = start;
                let mut closed = false;
                while end < bytes.len() {
                    match bytes[end] {
                        b'\\' => end += 2,
                        b'"' => {
                            closed = true;
                            break;
                        }
                        _ => end += 1,
                    }
                }
                if !closed {
                    debug!("Unterminated string literal at byte {i}, stopping");
                    break;
                }
                tokens.push(Token::Str(&text[start..end]));
                i = end + 1;
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push(Token::Ident(&text[start..i]));
            }
            b if b.is_ascii_whitespace() => i += 1,
            b'+' if next_is_eq => {
                tokens.push(Token::AddAssign);
                i += 2;
            }
            b'-' if next_is_eq => {
                tokens.push(Token::SubAssign);
                i += 2;
            }
            b'=' | b'!' | b'<' | b'>' if next_is_eq => {
                tokens.push(Token::Other);
                i += 2;
            }
            single => {
                tokens.push(match single {
                    b'(' => Token::LParen,
                    b')' => Token::RParen,
                    b'{' => Token::LBrace,
                    b'}' => Token::RBrace,
                    b'[' => Token::LBracket,
                    b']' => Token::RBracket,
                    b'.' => Token::Dot,
                    b'=' => Token::Assign,
                    _ => Token::Other,
                });
                i += 1;
            }
        }
    }

    tokens
}

/// An open `{` on the block stack.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Body of the target at this index.
    Target(usize),
    /// Any other block (`if`, `foreach`, `template`, scopes).
    Block,
}

/// Finds every target block in `text` together with its source lists.
///
/// Targets are returned in the order their declarations appear. A `sources`
/// assignment belongs to the innermost enclosing target, however deeply it
/// sits inside conditional blocks. Unterminated blocks keep whatever was
/// captured before the end of the text.
#[must_use]
pub fn scan_targets(text: &str) -> Vec<TargetDeclaration> {
    let tokens = tokenize(text);
    let mut targets: Vec<TargetDeclaration> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut pos = 0;

    while pos < tokens.len() {
        match &tokens[pos..] {
            [Token::Ident(kind), Token::LParen, Token::Str(name), Token::RParen, Token::LBrace, ..]
                if !NON_TARGET_CALLS.contains(kind) =>
            {
                debug!("Found target {kind}(\"{name}\")");
                stack.push(Frame::Target(targets.len()));
                targets.push(TargetDeclaration::new(kind, name));
                pos += 5;
            }
            [Token::LBrace, ..] => {
                stack.push(Frame::Block);
                pos += 1;
            }
            [Token::RBrace, ..] => {
                if stack.pop().is_none() {
                    debug!("Skipping unmatched closing brace");
                }
                pos += 1;
            }
            [Token::Ident("sources"), op @ (Token::Assign | Token::AddAssign | Token::SubAssign), ..]
                if pos == 0 || tokens[pos - 1] != Token::Dot =>
            {
                let (list, next) = read_list(&tokens, pos + 2);
                match innermost_target(&stack) {
                    Some(index) => targets[index].apply(*op, list),
                    None => debug!("Skipping sources assignment outside any target"),
                }
                pos = next;
            }
            _ => pos += 1,
        }
    }

    if !stack.is_empty() {
        debug!("{} block(s) left open at end of file", stack.len());
    }

    targets
}

fn innermost_target(stack: &[Frame]) -> Option<usize> {
    stack.iter().rev().find_map(|frame| match frame {
        Frame::Target(index) => Some(*index),
        Frame::Block => None,
    })
}

/// Reads a `[ ... ]` literal starting at `start`.
///
/// Returns the string literals inside it and the position just past the
/// closing bracket. Returns `None` when no list literal starts there. A list
/// cut off by the end of the text yields what was read so far.
fn read_list<'a>(tokens: &[Token<'a>], start: usize) -> (Option<Vec<&'a str>>, usize) {
    if tokens.get(start) != Some(&Token::LBracket) {
        return (None, start);
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    for (offset, token) in tokens[start..].iter().enumerate() {
        match token {
            Token::LBracket => depth += 1,
            Token::RBracket => {
                depth -= 1;
                if depth == 0 {
                    return (Some(items), start + offset + 1);
                }
            }
            Token::Str(s) => items.push(*s),
            _ => {}
        }
    }

    debug!("Unterminated list literal, keeping {} item(s)", items.len());
    (Some(items), tokens.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(targets: &[TargetDeclaration]) -> Vec<&str> {
        targets.iter().map(|t| t.name.as_str()).collect()
    }

    fn sources(target: &TargetDeclaration) -> Vec<&str> {
        target.sources().collect()
    }

    #[test]
    fn finds_simple_target() {
        let targets = scan_targets(
            r#"
rtc_source_set("foo_bar") {
  sources = [
    "foo.c",
    "bar.cc",
    "bar.h",
  ],
}
"#,
        );
        assert_eq!(names(&targets), vec!["foo_bar"]);
        assert_eq!(targets[0].kind, "rtc_source_set");
        assert_eq!(sources(&targets[0]), vec!["foo.c", "bar.cc", "bar.h"]);
    }

    #[test]
    fn sources_inside_conditionals_attach_to_enclosing_target() {
        let targets = scan_targets(
            r#"
rtc_library("video") {
  if (is_ios) {
    if (use_metal) {
      sources += [ "metal.mm" ]
    }
  }
  deps = [ ":base" ]
}
"#,
        );
        assert_eq!(names(&targets), vec!["video"]);
        assert_eq!(sources(&targets[0]), vec!["metal.mm"]);
    }

    #[test]
    fn targets_nested_in_conditionals_are_found() {
        let targets = scan_targets(
            r#"
if (is_android) {
  rtc_library("android") {
    sources = [ "jni.cc" ]
  }
} else {
  rtc_library("desktop") {
    sources = [ "desktop.cc" ]
  }
}
"#,
        );
        assert_eq!(names(&targets), vec!["android", "desktop"]);
        assert_eq!(sources(&targets[1]), vec!["desktop.cc"]);
    }

    #[test]
    fn innermost_target_wins() {
        let targets = scan_targets(
            r#"
group("outer") {
  rtc_library("inner") {
    sources = [ "inner.cc" ]
  }
  sources = [ "outer.c" ]
}
"#,
        );
        assert_eq!(names(&targets), vec!["outer", "inner"]);
        assert_eq!(sources(&targets[0]), vec!["outer.c"]);
        assert_eq!(sources(&targets[1]), vec!["inner.cc"]);
    }

    #[test]
    fn reassignment_starts_a_new_group() {
        let targets = scan_targets(
            r#"
rtc_library("foo") {
  if (is_win) {
    sources = [ "foo.cc" ]
  } else {
    sources = [ "foo.mm" ]
    sources += [ "bar.mm" ]
    sources -= [ "foo.mm" ]
  }
}
"#,
        );
        assert_eq!(
            targets[0].source_groups,
            vec![vec!["foo.cc".to_string()], vec!["bar.mm".to_string()]]
        );
    }

    #[test]
    fn non_target_calls_are_plain_blocks() {
        let targets = scan_targets(
            r#"
template("my_template") {
  sources = invoker.sources
}
declare_args() {
  use_foo = true
}
foreach(name, names) {
}
"#,
        );
        assert!(targets.is_empty());
    }

    #[test]
    fn member_access_is_not_a_sources_assignment() {
        let targets = scan_targets(
            r#"
rtc_library("foo") {
  sources = [ "a.cc" ]
  invoker.sources = [ "b.c" ]
}
"#,
        );
        assert_eq!(sources(&targets[0]), vec!["a.cc"]);
    }

    #[test]
    fn non_literal_values_are_skipped() {
        let targets = scan_targets(
            r#"
rtc_library("foo") {
  sources = common_sources + [ "extra.c" ]
  sources += rebase_path(list)
}
"#,
        );
        assert_eq!(targets[0].source_groups, vec![Vec::<String>::new()]);
    }

    #[test]
    fn comments_and_escapes_do_not_confuse_the_lexer() {
        let targets = scan_targets(
            r#"
# rtc_library("commented") {
rtc_library("real") {  # trailing } comment
  defines = [ "NAME=\"x}\"" ]
  sources = [ "a.cc" ]  # "b.c"
}
"#,
        );
        assert_eq!(names(&targets), vec!["real"]);
        assert_eq!(sources(&targets[0]), vec!["a.cc"]);
    }

    #[test]
    fn unterminated_block_keeps_captured_sources() {
        let targets = scan_targets("rtc_library(\"foo\") {\n  sources = [ \"a.c\", \"b.cc\"\n");
        assert_eq!(names(&targets), vec!["foo"]);
        assert_eq!(sources(&targets[0]), vec!["a.c", "b.cc"]);
    }

    #[test]
    fn unterminated_string_stops_scanning() {
        let targets = scan_targets("rtc_library(\"foo\") {\n  sources = [ \"a.c\", \"b.cc\n");
        assert_eq!(sources(&targets[0]), vec!["a.c"]);
    }

    #[test]
    fn stray_closing_brace_is_ignored() {
        let targets = scan_targets("}\nrtc_library(\"foo\") {\n  sources = [ \"a.c\" ]\n}\n");
        assert_eq!(sources(&targets[0]), vec!["a.c"]);
    }

    #[test]
    fn empty_and_garbage_input() {
        assert!(scan_targets("").is_empty());
        assert!(scan_targets("((( ]]] \"").is_empty());
        assert!(scan_targets("sources = [ \"a.c\" ]").is_empty());
    }
}

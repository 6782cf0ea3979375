/*!
 * Static import extraction for TypeScript/JavaScript sources
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Strings, template literals, regex literals, line comments and block
/// comments. Strings and regex literals are captured so they survive
/// comment stripping; a regex literal is only recognized after an operator
/// or opening bracket, where `/` cannot be division.
static COMMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?m)("(?:\\(?s:.)|[^"\\\n])*"|'(?:\\(?s:.)|[^'\\\n])*'|`(?:\\(?s:.)|[^`\\])*`"#,
        r#"|(?:^|[=(,:!&|?{};\[])[ \t]*/(?:[^*/\\\n\[]|\\.|\[(?:\\.|[^\]\\\n])*\])"#,
        r#"(?:[^/\\\n\[]|\\.|\[(?:\\.|[^\]\\\n])*\])*/[A-Za-z]*)"#,
        r#"|//[^\n]*|/\*(?s:.*?)\*/"#,
    ))
    .expect("comment pattern is valid")
});

/// `import x from "m"`, `import type {x} from "m"`, `import * as x from "m"`
/// and side-effect `import "m"`
static IMPORT_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(?:[\w*{}\s,$]+?\s+from\s*)?["']([^"'\n]+)["']"#)
        .expect("import pattern is valid")
});

/// Module specifiers of the static import declarations in `source`, in
/// declaration order. Dynamic `import()` and `require()` calls are not
/// declarations and are not returned.
pub fn import_specifiers(source: &str) -> Vec<String> {
    let stripped = COMMENTS.replace_all(source, |caps: &Captures| {
        caps.get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    });

    IMPORT_DECLARATION
        .captures_iter(&stripped)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

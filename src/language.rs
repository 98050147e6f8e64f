//! 源文件语言检测
//!
//! 先查扩展名表，查不到时再用内容启发式。

use std::path::Path;

/// Tag returned when nothing matches.
pub const FALLBACK_LANGUAGE: &str = "text";

const EXTENSIONS: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("c", "c"),
    ("cs", "csharp"),
    ("php", "php"),
    ("rb", "ruby"),
    ("go", "go"),
    ("rs", "rust"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("scala", "scala"),
    ("sh", "bash"),
    ("sql", "sql"),
    ("html", "html"),
    ("css", "css"),
    ("json", "json"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
];

/// Language tag for a file.
///
/// The extension decides when it is known (case-insensitive). Otherwise the
/// content is checked against a few ordered heuristics and the first match wins.
///
/// # Example
/// ```
/// use codelens::language::detect;
///
/// assert_eq!(detect("sample.py", ""), "python");
/// assert_eq!(detect("sample.txt", "def run():\n    import os"), "python");
/// assert_eq!(detect("sample.unknownext", ""), "text");
/// ```
pub fn detect(filename: &str, content: &str) -> &'static str {
    let by_extension = by_extension(filename);
    if by_extension != FALLBACK_LANGUAGE || content.is_empty() {
        return by_extension;
    }
    by_content(content).unwrap_or(FALLBACK_LANGUAGE)
}

fn by_extension(filename: &str) -> &'static str {
    let Some(ext) = Path::new(filename).extension().and_then(|e| e.to_str()) else {
        return FALLBACK_LANGUAGE;
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, tag)| *tag)
        .unwrap_or(FALLBACK_LANGUAGE)
}

fn by_content(content: &str) -> Option<&'static str> {
    let has = |needle: &str| content.contains(needle);

    if has("def ") && has("import ") {
        Some("python")
    } else if has("function ") && (has("var ") || has("let ")) {
        Some("javascript")
    } else if has("public class ") && has("public static void main") {
        Some("java")
    } else {
        None
    }
}

use crate::error::Result;
use crate::language;

/// 打印文件的语言标签
///
/// 文件不可读时只按文件名判断。
pub fn run(file: &str) -> Result<()> {
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("Could not read {}: {}, using the file name only", file, e);
            String::new()
        }
    };
    println!("{}", language::detect(file, &content));
    Ok(())
}

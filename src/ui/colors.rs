use colored::Colorize;

use crate::llm::Level;

/// 显示成功消息（绿色 ✓）
pub fn success(msg: &str, colored: bool) {
    if colored {
        println!("{} {}", "✓".green().bold(), msg.green());
    } else {
        println!("✓ {}", msg);
    }
}

/// 显示错误消息（红色 ✗）
pub fn error(msg: &str, colored: bool) {
    if colored {
        eprintln!("{} {}", "✗".red().bold(), msg.red());
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// 显示警告消息（黄色 ⚠）
pub fn warning(msg: &str, colored: bool) {
    if colored {
        println!("{} {}", "⚠".yellow().bold(), msg.yellow());
    } else {
        println!("⚠ {}", msg);
    }
}

/// 显示信息消息（蓝色 ℹ）
pub fn info(msg: &str, colored: bool) -> String {
    if colored {
        format!("{} {}", "ℹ".blue().bold(), msg.blue())
    } else {
        format!("ℹ {}", msg)
    }
}

/// 显示步骤提示（灰色）
pub fn step(step: &str, msg: &str, colored: bool) {
    if colored {
        println!(
            "{} {}",
            format!("[{}]", step).bright_black().bold(),
            msg.bright_black()
        );
    } else {
        println!("[{}] {}", step, msg);
    }
}

/// 按等级着色的标签（high 红 / medium 黄 / low 绿）
pub fn level_label(level: Level, colored: bool) -> String {
    let label = format!("[{}]", level.as_str());
    if !colored {
        return label;
    }
    match level {
        Level::High => label.red().bold().to_string(),
        Level::Medium => label.yellow().bold().to_string(),
        Level::Low => label.green().to_string(),
    }
}

/// 0-100 分数，低于 50 红色，低于 75 黄色
pub fn score(value: f64, colored: bool) -> String {
    let text = format!("{:.0}/100", value);
    if !colored {
        return text;
    }
    if value < 50.0 {
        text.red().bold().to_string()
    } else if value < 75.0 {
        text.yellow().bold().to_string()
    } else {
        text.green().bold().to_string()
    }
}

/// 小节标题
pub fn heading(title: &str, colored: bool) -> String {
    if colored {
        title.bold().underline().to_string()
    } else {
        title.to_string()
    }
}

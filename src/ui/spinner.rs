use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// 进度指示器（旋转动画），等待网络响应时显示
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// 创建新的 spinner
    ///
    /// `enabled` 为 false 时（例如 JSON 输出）不绘制任何内容。
    pub fn new(message: &str, enabled: bool) -> Self {
        if !enabled {
            return Self {
                pb: ProgressBar::hidden(),
            };
        }

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self { pb }
    }

    /// 更新 spinner 消息
    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// 完成并清除
    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.pb.finish_and_clear();
    }
}

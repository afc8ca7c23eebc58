//! User-visible response formatting.
//!
//! Failures surface as short, prefixed, human-readable strings; the raw
//! error chain stays in the logs. Markup is the transport's chat markdown
//! (*bold*, _italic_, `code`).

/// ✅ prefix for confirmations.
pub fn success(message: &str) -> String {
    format!("✅ {message}")
}

/// ❌ prefix for recovered errors shown to the user.
pub fn error(message: &str) -> String {
    format!("❌ {message}")
}

/// ⚠️ prefix for warnings and rejections.
pub fn warning(message: &str) -> String {
    format!("⚠️ {message}")
}

/// ℹ️ prefix for informational replies.
pub fn info(message: &str) -> String {
    format!("ℹ️ {message}")
}

/// ⏳ prefix for in-progress status messages.
pub fn processing(message: &str) -> String {
    format!("⏳ {message}")
}

/// Line-oriented builder for multi-part responses (help, language lists).
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    parts: Vec<String>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(&mut self, text: impl Into<String>) -> &mut Self {
        self.parts.push(text.into());
        self
    }

    pub fn add_empty_line(&mut self) -> &mut Self {
        self.parts.push(String::new());
        self
    }

    pub fn add_bold(&mut self, text: &str) -> &mut Self {
        self.parts.push(format!("*{text}*"));
        self
    }

    pub fn add_italic(&mut self, text: &str) -> &mut Self {
        self.parts.push(format!("_{text}_"));
        self
    }

    pub fn add_code(&mut self, text: &str) -> &mut Self {
        self.parts.push(format!("`{text}`"));
        self
    }

    pub fn add_code_block(&mut self, text: &str) -> &mut Self {
        self.parts.push(format!("```\n{text}\n```"));
        self
    }

    pub fn add_list<I, S>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.parts.push(format!("• {}", item.as_ref()));
        }
        self
    }

    pub fn add_heading(&mut self, text: &str) -> &mut Self {
        self.add_bold(text).add_empty_line()
    }

    pub fn build(&self) -> String {
        self.parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(error("boom"), "❌ boom");
        assert_eq!(warning("slow down"), "⚠️ slow down");
        assert_eq!(processing("working"), "⏳ working");
    }

    #[test]
    fn builder_joins_lines() {
        let mut b = ResponseBuilder::new();
        b.add_heading("Title").add_list(["one", "two"]).add_italic("tip");
        assert_eq!(b.build(), "*Title*\n\n• one\n• two\n_tip_");
    }
}

use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConsoleRole {
    Header,
    Banner,
    Success,
    Error,
    Warning,
    Info,
    Item,
    Emphasis,
}

impl ConsoleRole {
    fn color_code(self) -> &'static str {
        match self {
            ConsoleRole::Header => "1;94",
            ConsoleRole::Banner => "1;95",
            ConsoleRole::Success => "92",
            ConsoleRole::Error => "91",
            ConsoleRole::Warning => "93",
            ConsoleRole::Info | ConsoleRole::Item => "96",
            ConsoleRole::Emphasis => "1",
        }
    }
}

/// Line-oriented writer for the human-readable report.
pub(crate) struct Console<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Console<W> {
    pub(crate) fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub(crate) fn paint(&self, role: ConsoleRole, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let color = role.color_code();
        format!("\x1b[{color}m{text}\x1b[0m")
    }

    pub(crate) fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub(crate) fn painted(&mut self, role: ConsoleRole, text: &str) -> io::Result<()> {
        let painted = self.paint(role, text);
        self.line(&painted)
    }

    pub(crate) fn blank(&mut self) -> io::Result<()> {
        self.line("")
    }

    pub(crate) fn header(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        self.blank()?;
        self.painted(ConsoleRole::Header, &rule)?;
        self.painted(ConsoleRole::Header, title)?;
        self.painted(ConsoleRole::Header, &rule)?;
        self.blank()
    }

    pub(crate) fn success(&mut self, text: &str) -> io::Result<()> {
        self.painted(ConsoleRole::Success, &format!("✅ {text}"))
    }

    pub(crate) fn error(&mut self, text: &str) -> io::Result<()> {
        self.painted(ConsoleRole::Error, &format!("❌ {text}"))
    }

    pub(crate) fn warning(&mut self, text: &str) -> io::Result<()> {
        self.painted(ConsoleRole::Warning, &format!("⚠️  {text}"))
    }

    pub(crate) fn info(&mut self, text: &str) -> io::Result<()> {
        self.painted(ConsoleRole::Info, &format!("ℹ️  {text}"))
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::{Console, ConsoleRole};

    #[test]
    fn unit_paint_wraps_text_only_when_color_is_enabled() {
        let colored = Console::new(Vec::new(), true);
        assert_eq!(
            colored.paint(ConsoleRole::Error, "boom"),
            "\x1b[91mboom\x1b[0m"
        );
        let plain = Console::new(Vec::new(), false);
        assert_eq!(plain.paint(ConsoleRole::Error, "boom"), "boom");
    }

    #[test]
    fn functional_header_frames_title_between_rules() {
        let mut console = Console::new(Vec::new(), false);
        console.header("1️⃣  Title").expect("header");
        console.warning("careful").expect("warning");
        let output = String::from_utf8(console.into_inner()).expect("utf8");
        let rule = "=".repeat(60);
        assert_eq!(
            output,
            format!("\n{rule}\n1️⃣  Title\n{rule}\n\n⚠️  careful\n")
        );
    }
}

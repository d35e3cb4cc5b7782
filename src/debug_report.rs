use durfmt::{FormatDetails, UnitSummary};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, details: &FormatDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Formatting: \"{}\"", input), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Settings ━━━", ansi::GRAY));
    println!("  {} {}", palette.dim("template:"), palette.paint(format!("{:?}", details.template), ansi::BLUE));
    println!("  {} {}", palette.dim("trim:    "), palette.paint(trim_label(details), ansi::BLUE));
    println!("  {} {}", palette.dim("numerals:"), palette.paint(details.numerals, ansi::BLUE));

    println!("\n{}", palette.paint("━━━ Units ━━━", ansi::GRAY));
    if details.units.is_empty() {
        println!("{}", palette.dim("  Template has no unit tokens"));
    } else {
        for unit in &details.units {
            println!("  {}", fmt_unit(unit, &palette));
        }
        if details.bubbled {
            println!("  {}", palette.paint("↑ rounding carried into a larger unit", ansi::YELLOW));
        }
    }

    println!("\n{}", palette.paint("━━━ Output ━━━", ansi::GRAY));
    if details.output.is_empty() {
        println!("  {}", palette.dim("(empty: every unit was trimmed)"));
    } else {
        println!("  {}", palette.bold(palette.paint(&details.output, ansi::GREEN)));
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", details.elapsed), ansi::GREEN));
    println!();
}

fn trim_label(details: &FormatDetails) -> String {
    if details.trim.is_empty() {
        return "none".to_string();
    }
    let names: Vec<&str> = details.trim.iter_names().map(|(name, _)| name).collect();
    names.join(" | ").to_ascii_lowercase()
}

fn fmt_unit(unit: &UnitSummary, palette: &ansi::Palette) -> String {
    let marker = if unit.kept { palette.paint("✓", ansi::GREEN) } else { palette.dim("✗") };
    format!(
        "{} {:<12} {} {}  {} {}  {} {}",
        marker,
        palette.paint(unit.unit.name(), ansi::BLUE),
        palette.dim("raw:"),
        palette.paint(format!("{}", unit.raw_value), ansi::YELLOW),
        palette.dim("rendered:"),
        palette.paint(format!("{}", unit.rendered_value), ansi::YELLOW),
        palette.dim("text:"),
        palette.paint(format!("{:?}", unit.text), ansi::CYAN),
    )
}

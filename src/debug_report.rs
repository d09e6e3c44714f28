use affixlint::{Flag, ReduceError, Reduction};

mod ansi {
    /// What a painted span is, rather than which color it gets.
    #[derive(Debug, Clone, Copy)]
    pub enum Tone {
        Heading,
        RuleLine,
        Count,
        Gain,
        Warning,
        Failure,
        Muted,
    }

    impl Tone {
        fn sgr(self) -> &'static str {
            match self {
                Tone::Heading => "1;36",
                Tone::RuleLine => "34",
                Tone::Count | Tone::Warning => "33",
                Tone::Gain => "32",
                Tone::Failure => "31",
                Tone::Muted => "2",
            }
        }
    }

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, tone: Tone) -> String {
            if self.enabled { format!("\x1b[{}m{}\x1b[0m", tone.sgr(), s.as_ref()) } else { s.as_ref().to_string() }
        }
    }
}

use ansi::{Palette, Tone};

pub fn print_run(results: &[(Flag, Result<Reduction, ReduceError>)], verified: bool, color: bool) {
    let palette = Palette::new(color);

    if results.is_empty() {
        println!("{}", palette.paint("No flag is carried by any dictionary word.", Tone::Muted));
        return;
    }

    for (flag, result) in results {
        println!("\n{}", palette.paint(format!("⚙  Flag {flag}"), Tone::Heading));
        match result {
            Ok(reduction) => print_reduction(reduction, verified, &palette),
            Err(err) => print_failure(err, &palette),
        }
    }

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    let saved: isize = results.iter().filter_map(|(_, r)| r.as_ref().ok()).map(|r| r.metrics.saved()).sum();
    println!("\n{}", palette.paint("━━━ Summary ━━━", Tone::Muted));
    println!(
        "  Flags: {}  │  Failed: {}  │  Lines saved: {}",
        palette.paint(results.len().to_string(), Tone::Count),
        palette.paint(failed.to_string(), if failed == 0 { Tone::Muted } else { Tone::Failure }),
        palette.paint(saved.to_string(), Tone::Gain),
    );
    println!();
}

fn print_reduction(reduction: &Reduction, verified: bool, palette: &Palette) {
    let m = &reduction.metrics;

    println!(
        "  {} {}  {} {}  {} {}",
        palette.paint("instances:", Tone::Muted),
        palette.paint(m.instances.to_string(), Tone::Count),
        palette.paint("literal lines:", Tone::Muted),
        palette.paint(m.grouped.to_string(), Tone::Count),
        palette.paint("reduced lines:", Tone::Muted),
        palette.paint(m.lines.to_string(), Tone::Gain),
    );
    if m.minimality_guard {
        println!("  {}", palette.paint("generalization did not pay off, literal conditions kept", Tone::Warning));
    }
    if m.fallbacks > 0 {
        println!("  {}", palette.paint(format!("{} ambiguous node(s) kept literal", m.fallbacks), Tone::Warning));
    }

    for line in &reduction.lines {
        println!("    {}", palette.paint(line, Tone::RuleLine));
    }

    let t = &m.timings;
    let verify = if verified { format!("{:?} ✓", t.verify) } else { "skipped".to_string() };
    println!(
        "  {}",
        palette.paint(format!("Total: {:?}  │  Generalize: {:?}  │  Verify: {verify}", t.total, t.generalize), Tone::Muted)
    );
}

fn print_failure(err: &ReduceError, palette: &Palette) {
    println!("  {}", palette.paint(format!("✗ {err}"), Tone::Failure));
    if let ReduceError::MalformedFragment { source, .. } = err {
        println!("    {}", palette.paint(source.to_string(), Tone::Muted));
    }
}

use eliza::{Attempt, AttemptOutcome, Eliza, ResponseSource, TurnDetails};

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";

/// Report styling by role. Plain text when color is off.
struct Style {
    color: bool,
}

impl Style {
    fn apply(&self, code: &str, text: impl AsRef<str>) -> String {
        if self.color { format!("{code}{}{RESET}", text.as_ref()) } else { text.as_ref().to_string() }
    }

    fn heading(&self, title: &str) -> String {
        self.apply(GRAY, format!("━━━ {title} ━━━"))
    }

    fn keyword(&self, text: impl AsRef<str>) -> String {
        self.apply(BLUE, text)
    }

    fn count(&self, text: impl AsRef<str>) -> String {
        self.apply(CYAN, text)
    }

    fn good(&self, text: impl AsRef<str>) -> String {
        self.apply(GREEN, text)
    }

    fn warn(&self, text: impl AsRef<str>) -> String {
        self.apply(YELLOW, text)
    }

    fn muted(&self, text: impl AsRef<str>) -> String {
        self.apply(DIM, text)
    }

    fn strong(&self, text: impl AsRef<str>) -> String {
        self.apply(BOLD, text)
    }
}

pub fn print_stats(eliza: &Eliza, color: bool) {
    let style = Style { color };
    let stats = eliza.statistics();

    println!("{}", style.heading("Script"));
    println!(
        "  Entries: {}  │  Rules: {}  │  Reassemblies: {}",
        style.good(eliza.entry_count().to_string()),
        style.count(stats.rules.to_string()),
        style.count(stats.reassemblies.to_string()),
    );

    let categories = eliza.categories();
    if categories.is_empty() {
        println!("  {}", style.muted("No categories"));
    } else {
        println!("\n{}", style.heading("Categories"));
        for (tag, members) in categories.iter() {
            println!("  {} {}", style.keyword(format!("{tag}:")), members.join(" "));
        }
    }
    println!();
}

pub fn print_turn(details: &TurnDetails, color: bool) {
    let style = Style { color };
    println!("\n{}", style.strong(style.count(format!("⚙  Input: \"{}\"", details.input))));
    println!("  {} {}", style.muted("reflected:"), details.reflected);

    println!("\n{}", style.heading("Keystack"));
    if details.keystack.is_empty() {
        println!("  {}", style.muted("No keywords found"));
    } else {
        let stacked: Vec<String> = details
            .keystack
            .iter()
            .map(|(keyword, rank)| format!("{} {}", style.keyword(keyword), style.muted(format!("({rank})"))))
            .collect();
        println!("  {}", stacked.join(style.muted(" › ").as_str()));
    }

    println!("\n{}", style.heading("Attempts"));
    if details.attempts.is_empty() {
        println!("  {}", style.muted("Nothing dispatched"));
    }
    for (idx, attempt) in details.attempts.iter().enumerate() {
        println!("  {} {}", style.apply(GRAY, format!("[{idx}]")), fmt_attempt(attempt, &style));
    }

    println!("\n{}", style.heading("Response"));
    let source = details.source.to_string();
    let source = match details.source {
        ResponseSource::Rule => style.good(source),
        ResponseSource::Memory | ResponseSource::Fallback => style.warn(source),
        ResponseSource::Default => style.muted(source),
    };
    println!("  {} {} {}", style.strong(&details.response), style.muted("│ from"), source);
    println!("  {} {}", style.muted("Total:"), style.good(format!("{:?}", details.elapsed)));
    println!();
}

fn fmt_attempt(attempt: &Attempt, style: &Style) -> String {
    let outcome = match attempt.outcome {
        AttemptOutcome::Answered => style.good("✓ answered"),
        AttemptOutcome::NoMatch => style.muted("✗ no match"),
        AttemptOutcome::NewKey => style.warn("↷ newkey"),
        AttemptOutcome::Skipped => style.muted("· memory only"),
    };
    let chain =
        if attempt.chain.len() > 1 { style.muted(format!(" via {}", attempt.chain.join(" → "))) } else { String::new() };
    let memorized = if attempt.memorized { style.count(" +memory") } else { String::new() };

    format!("{} {}{}{}", style.keyword(&attempt.keyword), outcome, chain, memorized)
}

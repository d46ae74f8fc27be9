//! Colored terminal rendering of a [`Dashboard`].

use colored::Colorize;

use super::{Dashboard, MetricView, NOT_AVAILABLE, Tab, format_number};
use crate::model::Provenance;

/// Print the selected tab, or every tab the dashboard offers.
pub fn print_dashboard(dash: &Dashboard, tab: Option<Tab>) {
    println!("{}", "SEO Research Pro".bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  {} {}", "URL:  ".bold(), dash.url);
    println!("  {} {}", "Mode: ".bold(), dash.mode);
    println!();

    let tabs: Vec<Tab> = match tab {
        Some(t) if dash.tabs.contains(&t) => vec![t],
        Some(t) => {
            println!(
                "{}",
                format!("The {t} tab is only available in analyze mode.").yellow()
            );
            return;
        }
        None => dash.tabs.clone(),
    };

    for tab in tabs {
        match tab {
            Tab::Overview => print_overview(dash),
            Tab::Keywords => print_keywords(dash),
            Tab::Content => print_content(dash),
            Tab::Technical => print_technical(dash),
            Tab::Competitor => print_competitor(dash),
        }
        println!();
    }
}

fn section(tab: Tab) {
    println!("{}", tab.title().bold().cyan());
    println!("  {}", "-".repeat(58));
}

fn print_overview(dash: &Dashboard) {
    section(Tab::Overview);
    let s = &dash.summary;
    println!("  {} {}", "Title:          ".bold(), dash.title);
    println!(
        "  {} {}",
        "Description:    ".bold(),
        truncate(&dash.meta_description, 70)
    );
    println!(
        "  {} {}",
        "Word count:     ".bold(),
        format_number(s.word_count)
    );
    println!(
        "  {} {} merged · {} AI · {} on-page",
        "Keywords:       ".bold(),
        s.merged_keywords,
        s.gemini_keywords,
        s.onpage_keywords
    );
    if dash.tabs.contains(&Tab::Technical) {
        println!(
            "  {} {} H1 · {} H2",
            "Headings:       ".bold(),
            s.h1_count,
            s.h2_count
        );
        println!(
            "  {} {}/{} passed",
            "Technical SEO:  ".bold(),
            s.technical_passed,
            s.technical_total
        );
    }
}

fn print_keywords(dash: &Dashboard) {
    section(Tab::Keywords);
    for group in &dash.keywords {
        println!(
            "  {} {}",
            group.label.bold(),
            format!("({})", group.count).dimmed()
        );
        if group.keywords.is_empty() {
            println!("    {}", "no keywords".dimmed());
            continue;
        }
        let badges: Vec<String> = group
            .keywords
            .iter()
            .map(|k| badge(k, group.provenance))
            .collect();
        for line in wrap_badges(&badges, 76) {
            println!("    {line}");
        }
    }
}

fn print_content(dash: &Dashboard) {
    section(Tab::Content);
    if dash.headings.is_empty() {
        println!("  {}", "No headings returned.".dimmed());
    }
    for group in &dash.headings {
        println!(
            "  {} {}",
            group.tag.to_uppercase().bold(),
            format!("({})", group.texts.len()).dimmed()
        );
        for text in group.texts.iter().take(15) {
            println!("    · {}", truncate(text, 70));
        }
        if group.texts.len() > 15 {
            println!(
                "    {}",
                format!("… {} more", group.texts.len() - 15).dimmed()
            );
        }
    }

    if !dash.content_metrics.is_empty() {
        println!();
        for metric in &dash.content_metrics {
            print_metric(metric);
        }
    }
}

fn print_technical(dash: &Dashboard) {
    section(Tab::Technical);
    if dash.technical.is_empty() {
        println!("  {}", "No technical checks returned.".dimmed());
    }
    for check in &dash.technical {
        let status = if check.passed {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };
        println!("  {} {}", status, check.label);
    }
}

fn print_competitor(dash: &Dashboard) {
    section(Tab::Competitor);
    for metric in &dash.competitor {
        print_metric(metric);
    }
    if dash.competitor.iter().any(|m| m.derived) {
        println!();
        println!(
            "  {}",
            "est. = display estimate derived from a related metric".dimmed()
        );
    }
}

fn print_metric(metric: &MetricView) {
    let value = if metric.display == NOT_AVAILABLE {
        metric.display.dimmed()
    } else {
        metric.display.normal()
    };
    let marker = if metric.derived { " est.".yellow() } else { "".normal() };
    println!("  {:<22} {}{}", metric.label, value, marker);
}

fn badge(keyword: &str, provenance: Provenance) -> String {
    let text = format!("[{keyword}]");
    match provenance {
        Provenance::Merged => text.green().to_string(),
        Provenance::Gemini => text.purple().to_string(),
        Provenance::Onpage => text.blue().to_string(),
    }
}

/// Pack badges into lines of at most `width` visible characters.
fn wrap_badges(badges: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut visible = 0;

    for badge in badges {
        let len = visible_len(badge);
        if visible > 0 && visible + 1 + len > width {
            lines.push(std::mem::take(&mut line));
            visible = 0;
        }
        if visible > 0 {
            line.push(' ');
            visible += 1;
        }
        line.push_str(badge);
        visible += len;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Character count ignoring ANSI escape sequences.
fn visible_len(s: &str) -> usize {
    let mut count = 0;
    let mut in_escape = false;
    for ch in s.chars() {
        match (in_escape, ch) {
            (false, '\u{1b}') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => count += 1,
        }
    }
    count
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ünïcödé", 4), "ünï…");
    }

    #[test]
    fn visible_len_skips_ansi() {
        assert_eq!(visible_len("\u{1b}[32m[seo]\u{1b}[0m"), 5);
        assert_eq!(visible_len("[seo]"), 5);
    }

    #[test]
    fn wrap_badges_respects_width() {
        let badges: Vec<String> = ["[aaaa]", "[bbbb]", "[cccc]"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let lines = wrap_badges(&badges, 13);
        assert_eq!(lines, vec!["[aaaa] [bbbb]", "[cccc]"]);
        assert!(wrap_badges(&[], 10).is_empty());
    }
}

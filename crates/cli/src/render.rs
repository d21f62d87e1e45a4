// Plain-text tier report.
// Sections in bucket order, entries grouped under sort-category headings.

use std::fmt::Write as _;

use tiershift_recon::model::{ClassifiedEntry, ReportSection, StatisticsBlock, TierReport};
use tiershift_recon::report::{by_category, migrations_only};

/// Snapshot names shown in the report header.
pub struct ReportHeader<'a> {
    pub baseline: &'a str,
    pub current: &'a str,
}

/// `$1,234.56`, `-$0.25`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", abs % 100)
}

/// Like `format_cents` but always signed: `+$8.00`, `-$3.00`, `$0.00`.
pub fn format_change(cents: i64) -> String {
    if cents > 0 {
        format!("+{}", format_cents(cents))
    } else {
        format_cents(cents)
    }
}

fn format_count_change(n: i64) -> String {
    if n > 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

pub fn statistics_line(s: &StatisticsBlock) -> String {
    format!(
        "{} items, count {}, net {} ({} up {} / {} down {}), value {}",
        s.count,
        format_count_change(s.net_count_change),
        format_change(s.net_value_change_cents),
        s.positive_count,
        format_change(s.gross_positive_cents),
        s.negative_count,
        format_change(s.gross_negative_cents),
        format_cents(s.total_value_cents),
    )
}

fn entry_line(c: &ClassifiedEntry) -> String {
    let e = &c.entry;
    let id = &e.identity;
    let mut detail = format!("{} #{}, {}", id.edition, id.card_number, id.condition);
    if id.foil {
        detail.push_str(", foil");
    }

    let counts = if e.old_count == e.new_count {
        format!("x{}", e.new_count)
    } else {
        format!("x{}→{}", e.old_count, e.new_count)
    };

    let prices = if e.is_new {
        format_cents(e.new_price_cents)
    } else if e.is_gone {
        format_cents(e.old_price_cents)
    } else {
        format!("{} → {}", format_cents(e.old_price_cents), format_cents(e.new_price_cents))
    };

    format!(
        "    {:<36} [{}]  {}  {}  {}",
        id.name,
        detail,
        counts,
        prices,
        format_change(e.total_change_cents)
    )
}

fn render_section(out: &mut String, section: &ReportSection) {
    let _ = writeln!(out, "== {} ==", section.bucket.label());
    let _ = writeln!(out, "  {}", statistics_line(&section.statistics));
    for (category, entries) in by_category(section) {
        let _ = writeln!(out, "  {category}");
        for entry in entries {
            let _ = writeln!(out, "{}", entry_line(entry));
        }
    }
    let _ = writeln!(out);
}

/// Render the report. Without `all`, only the six tier-change sections are shown.
pub fn render_text(report: &TierReport, header: &ReportHeader<'_>, all: bool) -> String {
    let mut out = String::new();
    let meta = &report.meta;

    let _ = writeln!(out, "tiershift report: {}", meta.config_name);
    let _ = writeln!(out, "baseline: {}", header.baseline);
    let _ = writeln!(out, "current:  {}", header.current);
    let _ = writeln!(
        out,
        "tiers:    bulk < {} <= dollar < {} <= trade",
        format_cents(meta.bulk_ceiling_cents),
        format_cents(meta.trade_floor_cents),
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "overall: {}", statistics_line(&report.statistics.overall));
    let _ = writeln!(out);

    let sections = if all {
        report.sections.clone()
    } else {
        migrations_only(report.sections.clone())
    };

    for section in sections.iter().filter(|s| !s.entries.is_empty()) {
        render_section(&mut out, section);
    }

    out
}

//! Report presentation: text tables, JSON and CSV
//!
//! All rounding happens here. Report values stay at full precision until
//! they are formatted for output.

use serde::Serialize;
use std::io::Write;

use crate::types::{
    GrandTotals, JobRecord, PayrollReport, Result, TechnicianSummary, TechpayError,
};

const EMPTY_MESSAGE: &str = "No completed jobs in range";

fn to_cents(value: f64) -> i64 {
    // f64::round rounds half away from zero
    (value * 100.0).round() as i64
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

/// Format an amount as currency, e.g. `-$1,234.50`
pub fn format_currency(value: f64, symbol: &str) -> String {
    let cents = to_cents(value);
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!(
        "{}{}{}.{:02}",
        sign,
        symbol,
        group_thousands(abs / 100),
        abs % 100
    )
}

/// Plain two-decimal amount for machine-readable output, e.g. `-1234.50`
pub fn format_plain(value: f64) -> String {
    let cents = to_cents(value);
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

struct Row {
    label: String,
    jobs: String,
    revenue: String,
    tips: String,
    fees: String,
    net: String,
}

impl Row {
    fn summary(s: &TechnicianSummary, symbol: &str) -> Self {
        Self {
            label: s.technician_name.clone(),
            jobs: s.job_count.to_string(),
            revenue: format_currency(s.total_revenue, symbol),
            tips: format_currency(s.total_tips, symbol),
            fees: format_currency(s.total_cc_fees, symbol),
            net: format_currency(s.net_revenue, symbol),
        }
    }

    fn totals(t: &GrandTotals, symbol: &str) -> Self {
        Self {
            label: "TOTAL".to_string(),
            jobs: t.job_count.to_string(),
            revenue: format_currency(t.total_revenue, symbol),
            tips: format_currency(t.total_tips, symbol),
            fees: format_currency(t.total_cc_fees, symbol),
            net: format_currency(t.net_revenue, symbol),
        }
    }

    fn header() -> Self {
        Self {
            label: "Technician".to_string(),
            jobs: "Jobs".to_string(),
            revenue: "Revenue".to_string(),
            tips: "Tips".to_string(),
            fees: "CC Fees".to_string(),
            net: "Net".to_string(),
        }
    }

    fn cells(&self) -> [&str; 6] {
        [
            self.label.as_str(),
            self.jobs.as_str(),
            self.revenue.as_str(),
            self.tips.as_str(),
            self.fees.as_str(),
            self.net.as_str(),
        ]
    }
}

/// Render the report as an aligned text table with a totals row
pub fn render_table(report: &PayrollReport, symbol: &str) -> String {
    let header = Row::header();
    let body: Vec<Row> = report
        .summaries
        .iter()
        .map(|s| Row::summary(s, symbol))
        .collect();
    let totals = Row::totals(&report.grand_totals, symbol);

    let mut widths = [0usize; 6];
    for row in std::iter::once(&header)
        .chain(body.iter())
        .chain(std::iter::once(&totals))
    {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |row: &Row| -> String {
        let cells = row.cells();
        let mut line = format!("{:<w$}", cells[0], w = widths[0]);
        for (cell, width) in cells.iter().zip(widths.iter()).skip(1) {
            line.push_str(&format!("  {:>w$}", cell, w = *width));
        }
        line
    };
    let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1));

    let mut out = Vec::new();
    out.push(format_row(&header));
    out.push(rule.clone());
    if body.is_empty() {
        out.push(EMPTY_MESSAGE.to_string());
    }
    out.extend(body.iter().map(&format_row));
    out.push(rule);
    out.push(format_row(&totals));

    out.join("\n") + "\n"
}

/// Render one technician's jobs for drill-down
pub fn render_detail(summary: &TechnicianSummary, symbol: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} [{}]: {} job{}\n",
        summary.technician_name,
        summary.technician_key,
        summary.job_count,
        if summary.job_count == 1 { "" } else { "s" }
    ));

    let customer_width = summary
        .jobs
        .iter()
        .map(|j| j.customer_name.as_deref().unwrap_or("-").chars().count())
        .max()
        .unwrap_or(0)
        .max("Customer".len());
    let id_width = summary
        .jobs
        .iter()
        .map(|j| j.id.chars().count())
        .max()
        .unwrap_or(0)
        .max("Job".len());

    out.push_str(&format!(
        "{:<10}  {:<iw$}  {:<cw$}  {:>12}  {:>10}  {:>10}\n",
        "Date",
        "Job",
        "Customer",
        "Amount",
        "Tip",
        "CC Fee",
        iw = id_width,
        cw = customer_width
    ));
    for job in &summary.jobs {
        out.push_str(&format!(
            "{:<10}  {:<iw$}  {:<cw$}  {:>12}  {:>10}  {:>10}\n",
            job.scheduled_date.format("%Y-%m-%d").to_string(),
            job.id,
            job.customer_name.as_deref().unwrap_or("-"),
            format_currency(job.gross(), symbol),
            format_currency(job.tips(), symbol),
            format_currency(job.fees(), symbol),
            iw = id_width,
            cw = customer_width
        ));
    }

    out.push_str(&format!(
        "Revenue {}  Tips {}  CC Fees {}  Net {}\n",
        format_currency(summary.total_revenue, symbol),
        format_currency(summary.total_tips, symbol),
        format_currency(summary.total_cc_fees, symbol),
        format_currency(summary.net_revenue, symbol)
    ));
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryView<'a> {
    technician_key: &'a str,
    technician_name: &'a str,
    job_count: u64,
    total_revenue: f64,
    total_tips: f64,
    total_cc_fees: f64,
    net_revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    jobs: Option<&'a [JobRecord]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportView<'a> {
    summaries: Vec<SummaryView<'a>>,
    grand_totals: &'a GrandTotals,
}

/// Serialize the report as pretty JSON; job lists only when `include_jobs`
pub fn to_json(report: &PayrollReport, include_jobs: bool) -> Result<String> {
    let view = ReportView {
        summaries: report
            .summaries
            .iter()
            .map(|s| SummaryView {
                technician_key: &s.technician_key,
                technician_name: &s.technician_name,
                job_count: s.job_count,
                total_revenue: s.total_revenue,
                total_tips: s.total_tips,
                total_cc_fees: s.total_cc_fees,
                net_revenue: s.net_revenue,
                jobs: include_jobs.then_some(s.jobs.as_slice()),
            })
            .collect(),
        grand_totals: &report.grand_totals,
    };

    serde_json::to_string_pretty(&view).map_err(|e| TechpayError::Export(e.to_string()))
}

/// Write one CSV row per technician plus a TOTAL row
pub fn write_csv<W: Write>(report: &PayrollReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let export_err = |e: csv::Error| TechpayError::Export(e.to_string());

    wtr.write_record(["technician", "jobs", "revenue", "tips", "cc_fees", "net"])
        .map_err(export_err)?;

    for s in &report.summaries {
        wtr.write_record([
            s.technician_name.clone(),
            s.job_count.to_string(),
            format_plain(s.total_revenue),
            format_plain(s.total_tips),
            format_plain(s.total_cc_fees),
            format_plain(s.net_revenue),
        ])
        .map_err(export_err)?;
    }

    let t = &report.grand_totals;
    wtr.write_record([
        "TOTAL".to_string(),
        t.job_count.to_string(),
        format_plain(t.total_revenue),
        format_plain(t.total_tips),
        format_plain(t.total_cc_fees),
        format_plain(t.net_revenue),
    ])
    .map_err(export_err)?;

    wtr.flush()?;
    Ok(())
}

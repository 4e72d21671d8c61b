//! Benchmarks for unfiling segmentation performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks segment synthetic text and HTML filings.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic text filing with the given number of pages, each
/// carrying one fixed-width table.
fn create_text_filing(page_count: usize) -> Vec<u8> {
    let mut content = String::from("ITEM 8. FINANCIAL STATEMENTS AND SUPPLEMENTARY DATA\n");

    for page in 0..page_count {
        content.push_str("<PAGE>\n");
        content.push_str("CONSOLIDATED BALANCE SHEETS\n");
        content.push_str("<TABLE>\n");
        content.push_str(&format!("{:<40}{:<14}{}\n", "", "1999", "1998"));
        content.push_str(&format!("{:<40}{:<14}{}\n", "<S>", "<C>", "<C>"));
        for row in 0..20 {
            content.push_str(&format!(
                "{:<40}{:<14}{}\n",
                format!("Account {}-{}", page, row),
                format!("${},{:03}", row + 1, page),
                format!("${},{:03}", row + 2, page)
            ));
        }
        content.push_str("</TABLE>\n");
        content.push_str("See accompanying notes.\n");
    }

    content.into_bytes()
}

/// Creates a synthetic HTML filing with the given number of pages.
fn create_html_filing(page_count: usize) -> Vec<u8> {
    let mut content = String::from("<html><body><p><b>ITEM 8.</b> FINANCIAL STATEMENTS</p>");

    for page in 0..page_count {
        content.push_str("<p>CONSOLIDATED STATEMENTS OF INCOME</p><table>");
        content.push_str("<tr><td></td><td colspan=\"2\">Year ended</td></tr>");
        for row in 0..20 {
            content.push_str(&format!(
                "<tr><td>Line {}-{}</td><td>${}</td><td>({})</td></tr>",
                page, row, row * 10, row
            ));
        }
        content.push_str("</table><hr/>");
    }

    content.push_str("</body></html>");
    content.into_bytes()
}

/// Benchmark format detection.
fn bench_detection(c: &mut Criterion) {
    let text = create_text_filing(1);
    let html = create_html_filing(1);

    c.bench_function("detect_text_filing", |b| {
        b.iter(|| unfiling::is_text_document(None, black_box(&text)));
    });

    c.bench_function("detect_html_filing", |b| {
        b.iter(|| unfiling::is_text_document(None, black_box(&html)));
    });
}

/// Benchmark segmentation at various sizes.
fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");

    for page_count in [1, 10, 50].iter() {
        let text = create_text_filing(*page_count);
        let html = create_html_filing(*page_count);

        group.bench_function(format!("text_{}_pages", page_count), |b| {
            b.iter(|| unfiling::segment(black_box(&text), true).unwrap());
        });

        group.bench_function(format!("html_{}_pages", page_count), |b| {
            b.iter(|| unfiling::segment(black_box(&html), false).unwrap());
        });
    }

    group.finish();
}

/// Benchmark statement lookup over a parsed document.
fn bench_statement_search(c: &mut Criterion) {
    let data = create_text_filing(50);
    let content = unfiling::build_document_content(&data, true).unwrap();

    c.bench_function("balance_sheet_lookup", |b| {
        b.iter(|| {
            content
                .financial_statements(black_box(unfiling::StatementKind::BalanceSheet))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_detection,
    bench_segmentation,
    bench_statement_search,
);
criterion_main!(benches);

//! Plausibilization regression test
//!
//! Tests deletion of contained and duplicated regions regardless of input
//! order, merging of nearly nested regions, plausibilization of nested
//! levels, merging of contained regions that carry lines, and that a
//! second run over the result changes nothing.

use layoutfix_layout::{
    Change, ContainmentPolicy, Diagnostics, Page, Parent, ReadingOrderNode, ReadingOrderTree,
    ReconcileOptions, plan_level, reconcile_page,
};
use layoutfix_test::{RegParams, line, text_region};

fn ids(page: &Page) -> Vec<String> {
    page.regions().iter().map(|r| r.id.clone()).collect()
}

#[test]
fn plausibilize_reg() {
    let mut rp = RegParams::new("plausibilize");
    let opts = ReconcileOptions::default();

    // --- Test 1: a contained region is deleted whatever the input order ---
    for big_first in [true, false] {
        let big = text_region("r1", 0.0, 0.0, 10.0, 10.0).unwrap();
        let small = text_region("r2", 2.0, 2.0, 4.0, 5.0).unwrap();
        let mut page = Page::new("p", 100, 100);
        if big_first {
            page.add_region(big).unwrap();
            page.add_region(small).unwrap();
        } else {
            page.add_region(small).unwrap();
            page.add_region(big).unwrap();
        }
        let mut diag = Diagnostics::new();
        let plan = plan_level(&page, &Parent::Page, &opts, &mut diag);
        rp.compare_strings(&["r2"], &plan.removed_ids());
        rp.compare_values(0.0, plan.merges.len() as f64, 0.0);

        reconcile_page(&mut page, &opts, &mut diag).unwrap();
        rp.compare_strings(&["r1"], &ids(&page));
    }

    // --- Test 2: duplicates keep the first region ---
    let mut page = Page::new("p", 100, 100);
    page.add_region(text_region("a", 10.0, 10.0, 50.0, 20.0).unwrap())
        .unwrap();
    page.add_region(text_region("b", 10.2, 10.0, 50.0, 20.0).unwrap())
        .unwrap();
    let mut diag = Diagnostics::new();
    reconcile_page(&mut page, &opts, &mut diag).unwrap();
    rp.compare_strings(&["a"], &ids(&page));

    // --- Test 3: nearly nested regions merge, and a rerun is a no-op ---
    let mut page = Page::new("p", 300, 300).with_reading_order(ReadingOrderTree::new(
        ReadingOrderNode::ordered("ro")
            .with_region("a")
            .with_region("b")
            .with_region("c"),
    ));
    page.add_region(text_region("a", 0.0, 0.0, 100.0, 100.0).unwrap())
        .unwrap();
    page.add_region(text_region("b", 5.0, 5.0, 100.0, 100.0).unwrap())
        .unwrap();
    page.add_region(text_region("c", 200.0, 200.0, 50.0, 50.0).unwrap())
        .unwrap();
    let mut diag = Diagnostics::new();
    reconcile_page(&mut page, &opts, &mut diag).unwrap();
    rp.compare_strings(&["a", "c"], &ids(&page));
    rp.compare_strings(&["a", "c"], &page.reading_order.region_ids_in_order());
    let merged = diag
        .changes()
        .iter()
        .any(|c| matches!(c, Change::Merged { loser, survivor } if loser == "b" && survivor == "a"));
    rp.check(merged, "b merged into a");
    let (x0, y0, x1, y1) = page.region("a").unwrap().coords.bounds();
    rp.compare_values(0.0, x0, 1e-6);
    rp.compare_values(0.0, y0, 1e-6);
    rp.compare_values(105.0, x1, 1e-6);
    rp.compare_values(105.0, y1, 1e-6);

    let mut again = Diagnostics::new();
    reconcile_page(&mut page, &opts, &mut again).unwrap();
    rp.check(!again.has_changes(), "second run changes nothing");

    // --- Test 4: nested levels are plausibilized on their own ---
    let mut page = Page::new("p", 300, 300);
    page.add_region(text_region("outer", 0.0, 0.0, 200.0, 200.0).unwrap())
        .unwrap();
    page.add_region(
        text_region("n1", 10.0, 10.0, 80.0, 80.0)
            .unwrap()
            .with_parent("outer"),
    )
    .unwrap();
    page.add_region(
        text_region("n2", 20.0, 20.0, 10.0, 10.0)
            .unwrap()
            .with_parent("outer"),
    )
    .unwrap();
    let mut diag = Diagnostics::new();
    reconcile_page(&mut page, &opts, &mut diag).unwrap();
    // n1 is not compared with outer, which sits one level up
    rp.compare_strings(&["outer", "n1"], &ids(&page));

    // --- Test 5: contained regions with lines merge under MergeIfContent ---
    let mut page = Page::new("p", 300, 300);
    page.add_region(
        text_region("big", 0.0, 0.0, 200.0, 100.0)
            .unwrap()
            .with_line(line("big_l1", 10.0, 10.0, 150.0, 15.0, None).unwrap()),
    )
    .unwrap();
    page.add_region(
        text_region("small", 10.0, 50.0, 100.0, 30.0)
            .unwrap()
            .with_line(line("small_l1", 15.0, 55.0, 80.0, 15.0, None).unwrap()),
    )
    .unwrap();
    let merge_opts = opts
        .clone()
        .with_containment_policy(ContainmentPolicy::MergeIfContent);
    let mut diag = Diagnostics::new();
    reconcile_page(&mut page, &merge_opts, &mut diag).unwrap();
    rp.compare_strings(&["big"], &ids(&page));
    let line_ids: Vec<String> = page.region("big").unwrap().lines.iter().map(|l| l.id.clone()).collect();
    rp.compare_strings(&["big_l1", "small_l1"], &line_ids);

    // --- Test 6: report-only mode leaves the page alone ---
    let mut page = Page::new("p", 100, 100);
    page.add_region(text_region("r1", 0.0, 0.0, 10.0, 10.0).unwrap())
        .unwrap();
    page.add_region(text_region("r2", 2.0, 2.0, 4.0, 5.0).unwrap())
        .unwrap();
    let before = page.clone();
    let mut diag = Diagnostics::new();
    reconcile_page(&mut page, &opts.clone().with_plausibilize(false), &mut diag).unwrap();
    rp.check(page == before, "page unchanged");
    rp.check(!diag.has_changes(), "no changes recorded");

    assert!(rp.cleanup());
}

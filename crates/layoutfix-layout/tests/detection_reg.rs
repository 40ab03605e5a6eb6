//! Detection regression test
//!
//! Tests deduplication of detector output (singleton classes, overlapping
//! masks, confidence threshold, broken class tables), insertion of
//! detected regions that take over the lines of the regions they replace,
//! rejection of ghost detections, and option deserialization.

use layoutfix_layout::{
    ContainmentPolicy, Detection, DiagnosticKind, Diagnostics, LayoutError, Page,
    ReadingOrderNode, ReadingOrderTree, ReconcileOptions, deduplicate, reconcile_with_detections,
};
use layoutfix_test::{RegParams, line, mask_with_rects, text_region};

const WIDTH: u32 = 400;
const HEIGHT: u32 = 300;

fn detection(class_id: u32, score: f64, rect: (i32, i32, i32, i32)) -> Detection {
    Detection::new(class_id, score, mask_with_rects(WIDTH, HEIGHT, &[rect]).unwrap())
}

fn page() -> Page {
    let mut page = Page::new("p", WIDTH, HEIGHT).with_reading_order(ReadingOrderTree::new(
        ReadingOrderNode::ordered("ro")
            .with_region("r1")
            .with_region("r2")
            .with_region("r3"),
    ));
    page.add_region(
        text_region("r1", 40.0, 40.0, 120.0, 50.0)
            .unwrap()
            .with_line(
                line("r1_l1", 45.0, 45.0, 100.0, 15.0, Some("ADDRESS_FULL"))
                    .unwrap()
                    .with_text("Erika Mustermann"),
            )
            .with_line(
                line("r1_l2", 45.0, 65.0, 100.0, 15.0, Some("ADDRESS_ZIP_CITY"))
                    .unwrap()
                    .with_text("12345 Berlin"),
            ),
    )
    .unwrap();
    page.add_region(
        text_region("r2", 250.0, 200.0, 100.0, 50.0)
            .unwrap()
            .with_line(line("r2_l1", 255.0, 205.0, 80.0, 15.0, None).unwrap()),
    )
    .unwrap();
    page.add_region(
        text_region("r3", 40.0, 120.0, 100.0, 40.0)
            .unwrap()
            .with_line(line("r3_l1", 45.0, 125.0, 90.0, 12.0, Some("ADDRESS_CONTACT")).unwrap()),
    )
    .unwrap();
    page
}

#[test]
fn detection_reg() {
    let mut rp = RegParams::new("detection");
    let opts = ReconcileOptions::default();

    // --- Test 1: only the best detection of a singleton class is kept ---
    let batch = vec![
        detection(1, 0.9, (10, 10, 50, 30)),
        detection(1, 0.6, (200, 10, 50, 30)),
    ];
    let mut diag = Diagnostics::new();
    let kept = deduplicate(&batch, &opts, &mut diag).unwrap();
    rp.compare_values(1.0, kept.len() as f64, 0.0);
    rp.compare_values(0.0, kept[0].index as f64, 0.0);
    rp.check(kept[0].best_of_class, "winner is best of class");

    // --- Test 2: overlapping masks keep the better detection ---
    let batch = vec![
        detection(3, 0.8, (10, 10, 50, 30)),
        detection(3, 0.95, (40, 20, 50, 30)),
        detection(3, 0.5, (300, 200, 20, 20)),
    ];
    let kept = deduplicate(&batch, &opts, &mut diag).unwrap();
    let indices: Vec<f64> = kept.iter().map(|k| k.index as f64).collect();
    rp.compare_values(1.0, indices.len() as f64, 0.0);
    rp.compare_values(1.0, indices[0], 0.0);
    rp.check(
        diag.count(DiagnosticKind::NoSingletonDetection) == 1,
        "missing singleton classes reported",
    );

    // --- Test 3: a background detection breaks the whole page ---
    let batch = vec![detection(1, 0.9, (10, 10, 5, 5)), detection(0, 0.9, (50, 50, 5, 5))];
    let fatal = matches!(
        deduplicate(&batch, &opts, &mut diag),
        Err(LayoutError::InvalidDetectorOutput { index: 1, class_id: 0 })
    );
    rp.check(fatal, "background class is fatal");

    // --- Test 4: detected regions replace existing ones ---
    let mut page = page();
    let batch = vec![
        detection(1, 0.9, (36, 36, 128, 58)),
        detection(1, 0.6, (300, 20, 50, 30)),
        detection(2, 0.85, (246, 196, 108, 58)),
        detection(3, 0.5, (10, 250, 20, 20)),
        detection(3, 0.8, (40, 118, 80, 44)),
    ];
    let mut diag = Diagnostics::new();
    let inserted = reconcile_with_detections(&mut page, &batch, &opts, &mut diag).unwrap();
    rp.compare_strings(&["addressregion01", "addressregion05"], &inserted);
    let ids: Vec<String> = page.regions().iter().map(|r| r.id.clone()).collect();
    rp.compare_strings(&["r2", "addressregion01", "addressregion05"], &ids);
    rp.compare_strings(
        &["addressregion01", "r2", "addressregion05"],
        &page.reading_order.region_ids_in_order(),
    );
    rp.compare_values(1.0, diag.count(DiagnosticKind::GhostDetection) as f64, 0.0);

    let rcpt = page.region("addressregion01").unwrap();
    rp.check(
        rcpt.text.as_deref() == Some("Erika Mustermann\n12345 Berlin"),
        "recipient text joined from its lines",
    );
    rp.check(
        rcpt.custom.as_deref() == Some("subtype:address-rcpt"),
        "recipient class recorded",
    );

    // The contact line sticks out of the mask and grows the new region
    let contact = page.region("addressregion05").unwrap();
    let line_ids: Vec<String> = contact.lines.iter().map(|l| l.id.clone()).collect();
    rp.compare_strings(&["addressregion05_line00"], &line_ids);
    let (_, _, x1, _) = contact.coords.bounds();
    rp.compare_values(135.0, x1, 1e-6);
    rp.check(contact.coords.is_valid(), "grown region is valid");

    // --- Test 5: options from JSON fill in defaults ---
    let parsed: ReconcileOptions = serde_json::from_str(
        r#"{"plausibilize": false, "singleton_classes": [1], "containment_policy": "MergeIfContent"}"#,
    )
    .unwrap();
    rp.check(!parsed.plausibilize, "plausibilize parsed");
    rp.check(parsed.singleton_classes == vec![1], "singleton classes parsed");
    rp.check(
        parsed.containment_policy == ContainmentPolicy::MergeIfContent,
        "containment policy parsed",
    );
    rp.compare_values(0.9, parsed.plausibilize_merge_min_overlap, 0.0);
    rp.check(parsed.validate().is_ok(), "parsed options are valid");

    assert!(rp.cleanup());
}

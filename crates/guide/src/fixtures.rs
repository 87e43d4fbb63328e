//! Factory functions for creating test data.
//!
//! Provides products and catalogs of known shape for unit tests, integration
//! tests and scripted console sessions.

use shared::*;

// ── Product factories ───────────────────────────────────────────

/// The product shipped in the built-in catalog.
pub fn sample_product() -> Product {
    sample_catalog().product().clone()
}

/// The built-in catalog.
pub fn sample_catalog() -> Catalog {
    match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => panic!("built-in catalog is invalid: {e}"),
    }
}

/// Create a bare step: no tips, safety notes, media or highlighted parts.
pub fn bare_step(step: StepNumber, title: &str) -> Step {
    Step {
        step,
        title: title.to_string(),
        instruction: format!("Do {}.", title.to_lowercase()),
        tips: None,
        safety: None,
        image: None,
        video: None,
        three_d: ThreeDView::default(),
    }
}

/// A product with `steps` bare steps and no care tips, parts or upsell items.
pub fn product_without_extras(steps: StepNumber) -> Product {
    Product {
        id: "TST-BARE-001".to_string(),
        name: "Bare Product".to_string(),
        estimated_time_min: 10 * steps,
        complexity: "Easy".to_string(),
        people_needed: 1,
        tools: vec!["Screwdriver".to_string()],
        steps: (1..=steps)
            .map(|n| bare_step(n, &format!("Step {n}")))
            .collect(),
        care_tips: vec![],
        replacement_parts: vec![],
        upsell: vec![],
    }
}

/// A two-step shelf with one tool, one care tip and one replacement part.
pub fn tiny_product() -> Product {
    Product {
        id: "TST-SHLF-001".to_string(),
        name: "Test Shelf".to_string(),
        estimated_time_min: 20,
        complexity: "Easy".to_string(),
        people_needed: 1,
        tools: vec!["Screwdriver".to_string()],
        steps: vec![
            Step {
                tips: Some(vec!["Keep the screws in a cup".to_string()]),
                image: Some("/images/test-shelf-1.jpg".to_string()),
                three_d: ThreeDView {
                    highlight: vec!["left_side".to_string(), "right_side".to_string()],
                    exploded: true,
                },
                ..bare_step(1, "Attach the sides")
            },
            Step {
                safety: Some(vec!["Do not stand on the shelf".to_string()]),
                ..bare_step(2, "Fix the top")
            },
        ],
        care_tips: vec!["Dust weekly".to_string()],
        replacement_parts: vec![ReplacementPart {
            sku: "TST-P-1".to_string(),
            name: "Screw pack".to_string(),
        }],
        upsell: vec![],
    }
}

/// A catalog wrapping [`tiny_product`].
pub fn tiny_catalog() -> Catalog {
    match Catalog::new(tiny_product()) {
        Ok(catalog) => catalog,
        Err(e) => panic!("tiny product is invalid: {e}"),
    }
}

//! Synthetic pages for pipeline tests

use crate::snapshot::{BoundingBox, PageSnapshot, SnapshotElement};

pub(crate) fn element(tag: &str, classes: &[&str], styles: &[(&str, &str)]) -> SnapshotElement {
    SnapshotElement {
        tag: tag.to_string(),
        classes: classes.iter().map(|c| c.to_string()).collect(),
        styles: styles
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        rect: Some(BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 120.0,
            height: 32.0,
        }),
        ..Default::default()
    }
}

pub(crate) fn page(elements: Vec<SnapshotElement>) -> PageSnapshot {
    PageSnapshot {
        url: "fixture://page".to_string(),
        title: Some("Fixture".to_string()),
        elements,
    }
}

/// One primary button with white text, nothing else
pub(crate) fn single_button_page() -> PageSnapshot {
    page(vec![element(
        "button",
        &[],
        &[
            ("background-color", "rgb(0, 100, 250)"),
            ("color", "rgb(255, 255, 255)"),
        ],
    )])
}

/// A small but complete marketing page
pub(crate) fn landing_page() -> PageSnapshot {
    let text = ("color", "rgb(28, 31, 35)");
    let family = ("font-family", "Inter, sans-serif");

    let mut elements = vec![
        element(
            "body",
            &[],
            &[
                ("background-color", "rgb(255, 255, 255)"),
                text,
                family,
                ("font-size", "14px"),
                ("font-weight", "400"),
                ("line-height", "20px"),
            ],
        ),
        element(
            "h1",
            &[],
            &[text, family, ("font-size", "32px"), ("font-weight", "700")],
        ),
        element(
            "h2",
            &[],
            &[text, family, ("font-size", "24px"), ("font-weight", "600")],
        ),
    ];

    for _ in 0..3 {
        elements.push(element(
            "button",
            &["btn", "btn-primary"],
            &[
                ("background-color", "rgb(0, 100, 250)"),
                ("color", "rgb(255, 255, 255)"),
                ("padding", "8px 16px"),
                ("border-radius", "4px"),
                family,
                ("font-size", "14px"),
            ],
        ));
    }
    for _ in 0..2 {
        elements.push(element(
            "button",
            &["btn", "btn-outline"],
            &[
                ("background-color", "rgba(0, 0, 0, 0)"),
                ("color", "rgb(0, 100, 250)"),
                ("border-top-width", "1px"),
                ("border-top-style", "solid"),
                ("border-top-color", "rgb(0, 100, 250)"),
                ("padding", "8px 16px"),
                ("border-radius", "4px"),
            ],
        ));
    }
    for _ in 0..2 {
        elements.push(element(
            "div",
            &["card"],
            &[
                ("background-color", "rgb(249, 249, 249)"),
                ("padding", "24px"),
                ("border-radius", "12px"),
                ("box-shadow", "0px 4px 14px rgba(0, 0, 0, 0.1)"),
                ("border-top-width", "1px"),
                ("border-top-style", "solid"),
                ("border-top-color", "rgb(230, 232, 234)"),
            ],
        ));
    }
    for _ in 0..2 {
        elements.push(element(
            "a",
            &[],
            &[("color", "rgb(0, 100, 250)"), ("margin-right", "12px")],
        ));
    }
    for _ in 0..2 {
        elements.push(element(
            "span",
            &["tag", "tag-success"],
            &[
                ("background-color", "rgb(236, 247, 236)"),
                ("color", "rgb(59, 179, 70)"),
                ("border-radius", "9999px"),
                ("padding", "2px 8px"),
            ],
        ));
    }
    for _ in 0..2 {
        elements.push(element(
            "p",
            &[],
            &[
                ("color", "rgb(136, 141, 146)"),
                ("margin-bottom", "16px"),
                ("font-size", "12px"),
            ],
        ));
    }
    elements.push(element(
        "div",
        &["alert", "alert-danger"],
        &[
            ("background-color", "rgb(254, 242, 237)"),
            ("color", "rgb(249, 57, 32)"),
            ("padding", "12px 16px"),
        ],
    ));
    elements.push(element(
        "div",
        &["alert", "alert-danger"],
        &[("color", "rgb(249, 57, 32)"), ("padding", "12px 16px")],
    ));

    page(elements)
}

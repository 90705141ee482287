//! Styled element trees as the style resolver would hand them over.

use serde_json::{json, Value};

pub fn bounds(x: f32, y: f32, width: f32, height: f32) -> Value {
    json!({ "x": x, "y": y, "width": width, "height": height })
}

/// Three inline spans side by side on one line.
pub fn inline_row() -> Value {
    json!({
        "tag": "div",
        "display": "block",
        "bounds": bounds(0.0, 0.0, 300.0, 100.0),
        "children": [
            { "tag": "span", "bounds": bounds(0.0, 0.0, 50.0, 20.0), "text": "one" },
            { "tag": "span", "bounds": bounds(50.0, 0.0, 50.0, 20.0), "text": "two" },
            { "tag": "span", "bounds": bounds(100.0, 0.0, 50.0, 20.0), "text": "three" }
        ]
    })
}

/// A block, a left float below it and a line of text below the float.
pub fn block_float_text() -> Value {
    json!({
        "tag": "div",
        "display": "block",
        "bounds": bounds(0.0, 0.0, 200.0, 200.0),
        "children": [
            { "tag": "p", "display": "block", "bounds": bounds(0.0, 0.0, 200.0, 50.0) },
            { "tag": "aside", "display": "block", "float": "left", "bounds": bounds(0.0, 50.0, 60.0, 60.0) },
            { "tag": "#text", "text": "after", "bounds": bounds(0.0, 120.0, 200.0, 20.0) }
        ]
    })
}

/// Two paragraphs whose facing margins are 20 and 10.
pub fn adjacent_paragraphs() -> Value {
    json!({
        "tag": "div",
        "display": "block",
        "bounds": bounds(0.0, 0.0, 200.0, 200.0),
        "children": [
            { "tag": "h1", "display": "block", "margin": [0, 0, 20, 0], "bounds": bounds(0.0, 0.0, 200.0, 40.0) },
            { "tag": "p", "display": "block", "margin": "10px 0 0 0", "bounds": bounds(0.0, 60.0, 200.0, 40.0) }
        ]
    })
}

/// A paragraph's top margin nested two blocks deep.
pub fn nested_first_child() -> Value {
    json!({
        "tag": "body",
        "display": "block",
        "bounds": bounds(0.0, 0.0, 200.0, 200.0),
        "children": [{
            "tag": "section",
            "display": "block",
            "bounds": bounds(0.0, 30.0, 200.0, 20.0),
            "children": [{
                "tag": "div",
                "display": "block",
                "bounds": bounds(0.0, 30.0, 200.0, 0.0),
                "children": [
                    { "tag": "p", "display": "block", "margin": [30, 0, 0, 0], "bounds": bounds(0.0, 30.0, 200.0, 20.0) }
                ]
            }]
        }]
    })
}

/// A page of `sections` blocks, each holding an inline row and a float beside some text.
pub fn generated_page(sections: usize) -> Value {
    let children: Vec<Value> = (0..sections)
        .map(|i| {
            let y = i as f32 * 120.0;
            json!({
                "tag": "section",
                "display": "block",
                "margin": [10, 0, 10, 0],
                "bounds": bounds(0.0, y, 600.0, 110.0),
                "children": [
                    { "tag": "span", "bounds": bounds(0.0, y, 100.0, 20.0), "text": "a" },
                    { "tag": "span", "bounds": bounds(100.0, y, 100.0, 20.0), "text": "b" },
                    { "tag": "br", "bounds": bounds(200.0, y, 0.0, 20.0) },
                    { "tag": "img", "display": "block", "float": "left", "bounds": bounds(0.0, y + 20.0, 80.0, 80.0) },
                    { "tag": "#text", "text": "caption", "bounds": bounds(90.0, y + 20.0, 510.0, 40.0), "lines": 2 }
                ]
            })
        })
        .collect();
    json!({
        "tag": "body",
        "display": "block",
        "bounds": bounds(0.0, 0.0, 600.0, sections as f32 * 120.0),
        "children": children
    })
}

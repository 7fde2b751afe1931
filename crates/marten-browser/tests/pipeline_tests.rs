//! Integration tests for the whole document pipeline.

use marten_browser::css::style::Colour;
use marten_browser::form::{FormId, Submission};
use marten_browser::layout::BoxType;
use marten_browser::{LayoutOptions, parse_html_string};

fn load(html: &str, width: i32) -> marten_browser::LoadedDocument {
    parse_html_string(
        html,
        LayoutOptions {
            viewport_width: width,
        },
    )
    .unwrap()
}

#[test]
fn test_text_field_submission() {
    let doc = load(
        "<html><body><form action=\"/search\"><input type=\"text\" name=\"q\" value=\"hello world\"/>\
         <input type=\"submit\" name=\"go\" value=\"Go\"/></form></body></html>",
        800,
    );
    assert_eq!(
        doc.submit(FormId(0), None).unwrap(),
        Submission::Get {
            url: "/search?q=hello+world".into()
        }
    );
}

#[test]
fn test_post_form_includes_submitter() {
    let doc = load(
        "<html><body><form action=\"/save\" method=\"post\">\
         <input type=\"hidden\" name=\"id\" value=\"7\"/>\
         <input type=\"submit\" name=\"go\" value=\"Save\"/></form></body></html>",
        800,
    );
    let submitter = doc.forms.find("go");
    assert_eq!(
        doc.submit(FormId(0), submitter).unwrap(),
        Submission::Post {
            url: "/save".into(),
            body: "id=7&go=Save".into()
        }
    );
}

#[test]
fn test_textarea_submits_wrapped_lines() {
    let mut doc = load(
        "<html><body><form action=\"/t\"><textarea name=\"t\" cols=\"10\" rows=\"2\">hello world foo</textarea></form></body></html>",
        800,
    );
    assert_eq!(
        doc.submit(FormId(0), None).unwrap(),
        Submission::Get {
            url: "/t?t=hello%0D%0Aworld+foo%0D%0A".into()
        }
    );

    // Wrapping follows the layout, so it survives a relayout unchanged.
    doc.relayout(300).unwrap();
    assert_eq!(doc.submit_all().unwrap().len(), 1);
}

#[test]
fn test_higher_specificity_wins_regardless_of_order() {
    let doc = load(
        "<html><head><style>p.foo { color: blue } p { color: red }</style></head>\
         <body><p class=\"foo\">x</p></body></html>",
        800,
    );
    let p = doc.style_dump().into_iter().find(|e| e.tag == "p").unwrap();
    assert_eq!(p.style.color, Colour(0x00_00ff));
}

#[test]
fn test_json_dump_has_laid_out_text() {
    let doc = load("<html><body><p>hello</p></body></html>", 400);
    let json = doc.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["width"], 400);
    assert!(json.contains("\"hello\""));

    let dump = doc.box_dump();
    let text = dump
        .flatten()
        .into_iter()
        .find(|b| b.text.as_deref() == Some("hello"))
        .unwrap();
    assert_eq!(text.box_type, BoxType::Inline);
    // body margin plus the paragraph's 1em top margin
    assert_eq!((text.absolute_x, text.absolute_y), (8, 24));
}

#[test]
fn test_malformed_markup_is_an_error() {
    assert!(parse_html_string("<html><body><div", LayoutOptions::default()).is_err());
}

#[test]
fn test_relayout_of_a_table_is_repeatable() {
    let mut doc = load(
        "<html><body><table><tr><td style=\"width:50%\">a</td><td>b b b</td></tr></table></body></html>",
        400,
    );
    let columns = |doc: &marten_browser::LoadedDocument| -> (Vec<i32>, i32) {
        let table = doc
            .boxes
            .ids()
            .find(|&id| doc.boxes[id].box_type == BoxType::Table)
            .unwrap();
        let used = doc.boxes[table].col.iter().map(|c| c.used).collect();
        (used, doc.boxes[table].width)
    };
    let (first, width) = columns(&doc);
    assert_eq!(first.iter().sum::<i32>(), width);

    doc.relayout(800).unwrap();
    doc.relayout(400).unwrap();
    assert_eq!(columns(&doc), (first, width));
}

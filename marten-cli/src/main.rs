//! Marten CLI - box tree layout and debugging tool
//!
//! Usage:
//!   marten <file>                 Lay out and print the box tree
//!   marten <file> --json          Print the box tree as JSON
//!   marten <file> --styles        Print every element's computed style
//!   marten <file> --forms         Print forms and their controls
//!   marten <file> --submit        Print what submitting each form sends
//!   marten --html '<p>Hi</p>'     Lay out markup given on the command line

use anyhow::{Result, bail};
use clap::Parser;
use marten_browser::{
    DEFAULT_VIEWPORT_WIDTH, LayoutOptions, LoadedDocument, load_document, parse_html_string,
};
use marten_form::Submission;
use marten_layout::{BoxDump, BoxId};
use owo_colors::OwoColorize;

/// Marten: lay out an HTML document and inspect the box tree
#[derive(Parser, Debug)]
#[command(name = "marten")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the laid-out box tree
    marten ./index.html

    # Narrow viewport, JSON output
    marten --width 320 --json ./index.html

    # Inline markup
    marten --html '<html><body><p>Hello</p></body></html>'

    # What would the forms submit?
    marten --submit ./form.html
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<String>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Viewport width in pixels
    #[arg(short, long, default_value_t = DEFAULT_VIEWPORT_WIDTH)]
    width: i32,

    /// Print JSON instead of an indented tree
    #[arg(short, long)]
    json: bool,

    /// Print computed styles instead of boxes
    #[arg(long)]
    styles: bool,

    /// Print forms and controls
    #[arg(long)]
    forms: bool,

    /// Print the submission of every form
    #[arg(long)]
    submit: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = LayoutOptions {
        viewport_width: cli.width,
    };
    let doc = match (&cli.html, &cli.path) {
        (Some(html), _) => parse_html_string(html, options)?,
        (None, Some(path)) => load_document(path, options)?,
        (None, None) => bail!("no input: give a FILE or --html"),
    };

    if cli.styles {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&doc.style_dump())?);
        } else {
            print_styles(&doc);
        }
    }
    if cli.forms {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&doc.forms)?);
        } else {
            print_forms(&doc);
        }
    }
    if cli.submit {
        let submissions = doc.submit_all()?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&submissions)?);
        } else {
            print_submissions(&submissions);
        }
    }
    if !(cli.styles || cli.forms || cli.submit) {
        if cli.json {
            println!("{}", doc.to_json()?);
        } else {
            println!(
                "{}",
                format!("=== Box Tree (viewport width {}) ===", doc.options.viewport_width).bold()
            );
            print_box(&doc, &doc.box_dump(), 0);
        }
    }
    Ok(())
}

/// Recursively print a box with its geometry.
fn print_box(doc: &LoadedDocument, dump: &BoxDump, depth: usize) {
    let indent = "  ".repeat(depth);
    let element = doc
        .boxes
        .get(BoxId(dump.id))
        .and_then(|b| b.node)
        .and_then(|node| doc.dom.as_element(node))
        .map(|e| format!(" <{}>", e.tag_name))
        .unwrap_or_default();

    let mut line = format!("{indent}{}{element}", format!("{:?}", dump.box_type).cyan());
    if let Some(text) = &dump.text {
        let preview: String = text.chars().take(30).collect();
        let suffix = if text.chars().count() > 30 { "..." } else { "" };
        line.push_str(&format!(" {}", format!("\"{preview}{suffix}\"").green()));
    }
    if let Some(href) = &dump.href {
        line.push_str(&format!(" {}", format!("-> {href}").blue()));
    }
    if let Some(gadget) = dump.gadget {
        line.push_str(&format!(" {}", format!("[control {}]", gadget.0).magenta()));
    }
    println!("{line}");
    println!(
        "{indent}  {}",
        format!(
            "x={} y={} w={} h={} (at {},{})",
            dump.x, dump.y, dump.width, dump.height, dump.absolute_x, dump.absolute_y
        )
        .dimmed()
    );

    for child in &dump.children {
        print_box(doc, child, depth + 1);
    }
}

fn print_styles(doc: &LoadedDocument) {
    println!("{}", format!("=== Computed Styles ({}) ===", doc.styles.len()).bold());
    for element in doc.style_dump() {
        let s = &element.style;
        println!(
            "{} display={:?} float={:?} font-size={} color={:?} background={:?}",
            format!("<{}>", element.tag).cyan(),
            s.display,
            s.float,
            s.font_size,
            s.color,
            s.background_color
        );
    }
}

fn print_forms(doc: &LoadedDocument) {
    println!("{}", format!("=== Forms ({}) ===", doc.forms.forms().len()).bold());
    for (index, form) in doc.forms.forms().iter().enumerate() {
        println!(
            "{} {} {}",
            format!("form {index}").cyan(),
            form.method,
            form.action
        );
        for id in &form.controls {
            let Some(control) = doc.forms.controls().get(id.0) else {
                continue;
            };
            println!(
                "  {:?} name={} value={:?}",
                control.kind,
                control.name.as_deref().unwrap_or("-").green(),
                control.value
            );
        }
    }
}

fn print_submissions(submissions: &[Submission]) {
    for submission in submissions {
        match submission {
            Submission::Get { url } => println!("{} {url}", "GET".yellow()),
            Submission::Post { url, body } => {
                println!("{} {url}", "POST".yellow());
                println!("  {}", body.dimmed());
            }
        }
    }
}

//! Element tree to box tree conversion.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The builder walks the element tree once. Block-level elements become
//! boxes under the current block; inline-level content is gathered into an
//! anonymous [`BoxType::InlineContainer`] which a block-level sibling ends.
//! Plain inline elements such as `span` produce no box of their own: their
//! text joins the running container with the element's style.
//!
//! The output is not yet normalized. Table parts appear wherever the markup
//! put them and [`crate::normalize`] supplies the missing levels.

use marten_common::YieldPoint;
use marten_common::warning::warn_once;
use marten_css::style::{DisplayType, FloatType, Height, Length, LengthUnit, Size, WhiteSpace};
use marten_css::{ComputedStyle, StyleMap};
use marten_dom::{DomTree, ElementData, NodeId, NodeType};
use marten_form::{ControlId, ControlType, FormControl, FormId, FormSet, Method};

use crate::box_tree::{BoxId, BoxTree, BoxTreeError, BoxType, LayoutBox, Object, StyleId, TextRun};

/// Size of an image with no dimensions in its attributes or style.
const DEFAULT_IMAGE_SIZE: i32 = 24;

/// Size of checkbox and radio gadgets.
const TOGGLE_SIZE: i32 = 12;

/// Horizontal room around a button label or select text.
const GADGET_CHROME: i32 = 8;

/// Largest `colspan` honoured, as in HTML.
const MAX_COLSPAN: usize = 1000;

/// Largest `rowspan` honoured, as in HTML.
const MAX_ROWSPAN: usize = 65534;

/// Build the box tree for `dom` from its resolved `styles`.
///
/// Form controls are registered in `forms` as they are met; each gadget box
/// and its control point at each other.
///
/// # Errors
/// A failed control registration aborts the whole build.
pub fn build_box_tree(
    dom: &DomTree,
    styles: &StyleMap,
    forms: &mut FormSet,
    yield_point: &mut YieldPoint<'_>,
) -> Result<BoxTree, BoxTreeError> {
    let mut builder = BoxBuilder {
        dom,
        styles,
        forms,
        yield_point,
        tree: BoxTree::new(ComputedStyle::default()),
        current_form: None,
    };
    let scope = Scope {
        parent: builder.tree.root(),
        style: builder.tree[builder.tree.root()].style,
        href: None,
    };
    let mut container = None;
    builder.convert(dom.root(), scope, &mut container)?;
    Ok(builder.tree)
}

/// Where converted content goes.
#[derive(Debug, Clone, Copy)]
struct Scope<'d> {
    /// Block-level box receiving block children and inline containers.
    parent: BoxId,
    /// Style for text met in this scope.
    style: StyleId,
    /// Link target of the nearest enclosing anchor.
    href: Option<&'d str>,
}

struct BoxBuilder<'d, 'y, 'a> {
    dom: &'d DomTree,
    styles: &'d StyleMap,
    forms: &'d mut FormSet,
    yield_point: &'y mut YieldPoint<'a>,
    tree: BoxTree,
    current_form: Option<FormId>,
}

impl<'d> BoxBuilder<'d, '_, '_> {
    fn convert(
        &mut self,
        node: NodeId,
        scope: Scope<'d>,
        container: &mut Option<BoxId>,
    ) -> Result<(), BoxTreeError> {
        self.yield_point.tick();
        let dom = self.dom;
        let Some(n) = dom.get(node) else {
            return Ok(());
        };
        match &n.node_type {
            NodeType::Document => self.convert_children(node, scope, container),
            NodeType::Element(element) => self.convert_element(node, element, scope, container),
            NodeType::Text(text) => {
                self.add_text(text, scope, container);
                Ok(())
            }
            NodeType::Comment(_) => Ok(()),
        }
    }

    fn convert_children(
        &mut self,
        node: NodeId,
        scope: Scope<'d>,
        container: &mut Option<BoxId>,
    ) -> Result<(), BoxTreeError> {
        let dom = self.dom;
        for &child in dom.children(node) {
            self.convert(child, scope, container)?;
        }
        Ok(())
    }

    fn convert_element(
        &mut self,
        node: NodeId,
        element: &'d ElementData,
        scope: Scope<'d>,
        container: &mut Option<BoxId>,
    ) -> Result<(), BoxTreeError> {
        let computed = self.styles.get(&node).cloned().unwrap_or_else(|| {
            ComputedStyle::inherit_from(self.tree.style(scope.style))
        });
        if computed.display == DisplayType::None {
            return Ok(());
        }

        let tag = element.tag_name.as_str();
        let scope = Scope {
            href: if tag == "a" {
                element.attr("href").or(scope.href)
            } else {
                scope.href
            },
            ..scope
        };

        // [§ 17.3 The FORM element](https://www.w3.org/TR/html401/interact/forms.html#h-17.3)
        let enclosing_form = self.current_form;
        if tag == "form" {
            let method = element
                .attr("method")
                .and_then(|m| m.trim().parse::<Method>().ok())
                .unwrap_or_default();
            let action = element.attr("action").unwrap_or_default();
            self.current_form = Some(self.forms.add_form(action, method));
        }

        let result = match tag {
            "img" => {
                self.add_image(node, element, computed, scope, container);
                Ok(())
            }
            "input" => self.add_input(node, element, computed, scope, container),
            "select" => self.add_select(node, element, computed, scope, container),
            "textarea" => self.add_textarea(node, element, computed, scope, container),
            "br" => {
                *container = None;
                Ok(())
            }
            "object" | "embed" | "applet" | "iframe" => {
                warn_once(
                    "Layout",
                    &format!("<{tag}> is not supported; rendering its fallback content"),
                );
                self.add_element(node, computed, scope, container)
            }
            _ => self.add_element(node, computed, scope, container),
        };

        if tag == "form" {
            self.current_form = enclosing_form;
        }
        result
    }

    /// Boxes for an element with no intrinsic semantics, by display type.
    fn add_element(
        &mut self,
        node: NodeId,
        computed: ComputedStyle,
        scope: Scope<'d>,
        container: &mut Option<BoxId>,
    ) -> Result<(), BoxTreeError> {
        if computed.is_floated() {
            let inner = self.float_wrapper(node, &computed, scope.parent, container);
            let inner_scope = Scope {
                parent: inner,
                style: self.tree[inner].style,
                ..scope
            };
            return self.convert_children(node, inner_scope, &mut None);
        }

        let box_type = match computed.display {
            DisplayType::Inline | DisplayType::None => {
                let style = self.tree.add_style(computed);
                return self.convert_children(node, Scope { style, ..scope }, container);
            }
            DisplayType::InlineBlock => {
                let style = self.tree.add_style(computed);
                let mut b = LayoutBox::new(BoxType::InlineBlock, style);
                b.node = Some(node);
                let id = self.append_inline(b, scope.parent, container);
                return self.convert_children(
                    node,
                    Scope {
                        parent: id,
                        style,
                        ..scope
                    },
                    &mut None,
                );
            }
            DisplayType::Block | DisplayType::ListItem => BoxType::Block,
            DisplayType::Table => BoxType::Table,
            DisplayType::TableRowGroup
            | DisplayType::TableHeaderGroup
            | DisplayType::TableFooterGroup => BoxType::TableRowGroup,
            DisplayType::TableRow => BoxType::TableRow,
            DisplayType::TableCell => BoxType::TableCell,
        };

        let style = self.tree.add_style(computed);
        let mut b = LayoutBox::new(box_type, style);
        b.node = Some(node);
        if box_type == BoxType::TableCell
            && let Some(element) = self.dom.as_element(node)
        {
            // [§ 11.2.6 Table cells](https://www.w3.org/TR/html401/struct/tables.html#h-11.2.6)
            b.columns = span_attr(element, "colspan").min(MAX_COLSPAN);
            b.rows = span_attr(element, "rowspan").min(MAX_ROWSPAN);
        }
        let id = self.tree.append_new(scope.parent, b);
        *container = None;
        self.convert_children(
            node,
            Scope {
                parent: id,
                style,
                ..scope
            },
            &mut None,
        )?;
        *container = None;
        Ok(())
    }

    /// [§ 16.6.1 The 'white-space' processing model](https://www.w3.org/TR/CSS2/text.html#white-space-model)
    fn add_text(&mut self, text: &str, scope: Scope<'d>, container: &mut Option<BoxId>) {
        if self.tree.style(scope.style).white_space == WhiteSpace::Pre {
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    *container = None;
                } else if line.is_empty() {
                    continue;
                }
                let line = line.trim_end_matches('\r').replace('\t', "        ");
                let mut b = LayoutBox::new(BoxType::Inline, scope.style);
                b.text = Some(TextRun::new(line));
                b.href = scope.href.map(str::to_string);
                let _ = self.append_inline(b, scope.parent, container);
            }
            return;
        }

        // "If a space (U+0020) at the beginning of a line has 'white-space'
        // set to 'normal', 'nowrap', or 'pre-line', it is removed."
        if text.starts_with(char::is_whitespace)
            && let Some(c) = *container
            && let Some(&last) = self.tree.children(c).last()
            && self.tree[last].box_type == BoxType::Inline
            && let Some(run) = self.tree[last].text.as_mut()
        {
            run.space = true;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return;
        }
        let mut b = LayoutBox::new(BoxType::Inline, scope.style);
        b.text = Some(TextRun {
            text: words.join(" "),
            space: text.ends_with(char::is_whitespace),
        });
        b.href = scope.href.map(str::to_string);
        let _ = self.append_inline(b, scope.parent, container);
    }

    /// [§ 13.2 Including an image](https://www.w3.org/TR/html401/struct/objects.html#h-13.2)
    fn add_image(
        &mut self,
        node: NodeId,
        element: &ElementData,
        computed: ComputedStyle,
        scope: Scope<'d>,
        container: &mut Option<BoxId>,
    ) {
        let (width, height) = replaced_size(&computed, DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE);
        let floated = computed.is_floated().then(|| computed.clone());
        let style = self.tree.add_style(computed);
        let mut b = LayoutBox::new(BoxType::Inline, style);
        b.node = Some(node);
        b.width = width;
        b.height = height;
        b.object = Some(Object {
            src: element.attr("src").unwrap_or_default().to_string(),
        });
        b.text = element.attr("alt").map(TextRun::new);
        b.href = scope.href.map(str::to_string);
        let _ = self.place_replaced(b, floated.as_ref(), node, scope.parent, container);
    }

    /// [§ 17.4 The INPUT element](https://www.w3.org/TR/html401/interact/forms.html#h-17.4)
    fn add_input(
        &mut self,
        node: NodeId,
        element: &ElementData,
        computed: ComputedStyle,
        scope: Scope<'d>,
        container: &mut Option<BoxId>,
    ) -> Result<(), BoxTreeError> {
        let kind = ControlType::from_input_type(element.attr("type"));
        let mut control = control_from_attrs(FormControl::new(kind), element);
        if matches!(kind, ControlType::Checkbox | ControlType::Radio) {
            control = control.checked(element.has_attr("checked"));
        }
        if let Some(maxlength) = element.attr("maxlength").and_then(|v| v.trim().parse().ok()) {
            control.maxlength = maxlength;
        }
        if let Some(size) = element.attr("size").and_then(|v| v.trim().parse().ok()) {
            control.size = size;
        }
        control.clamp_to_maxlength();
        control.initial_value.clone_from(&control.value);

        let size = control.size;
        let label = match (kind, control.value.as_str()) {
            (ControlType::Submit, "") => "Submit".to_string(),
            (ControlType::Reset, "") => "Reset".to_string(),
            (_, value) => value.to_string(),
        };
        let id = self.forms.add_control(control, self.current_form)?;
        if kind == ControlType::Hidden {
            return Ok(());
        }

        let ex = Length {
            value: 1.0,
            unit: LengthUnit::Ex,
        }
        .to_px(computed.font_size);
        let line = computed.line_height_px();
        let (width, height) = match kind {
            ControlType::Checkbox | ControlType::Radio => {
                replaced_size(&computed, TOGGLE_SIZE, TOGGLE_SIZE)
            }
            ControlType::Image => replaced_size(&computed, DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE),
            ControlType::Submit | ControlType::Reset | ControlType::Button => {
                let label_width = (label.chars().count() as f32 * ex).ceil() as i32;
                replaced_size(&computed, label_width + GADGET_CHROME, line)
            }
            _ => replaced_size(&computed, (size as f32 * ex).ceil() as i32, line),
        };

        let floated = computed.is_floated().then(|| computed.clone());
        let style = self.tree.add_style(computed);
        let mut b = LayoutBox::new(BoxType::Inline, style);
        b.node = Some(node);
        b.width = width;
        b.height = height;
        b.gadget = Some(id);
        b.href = scope.href.map(str::to_string);
        match kind {
            ControlType::Image => {
                b.object = Some(Object {
                    src: element.attr("src").unwrap_or_default().to_string(),
                });
                b.text = element.attr("alt").map(TextRun::new);
            }
            ControlType::Password => {
                b.text = Some(TextRun::new("*".repeat(label.chars().count())));
            }
            ControlType::Checkbox | ControlType::Radio => {}
            _ => b.text = Some(TextRun::new(label)),
        }
        let box_id = self.place_replaced(b, floated.as_ref(), node, scope.parent, container);
        self.link_gadget(id, box_id)
    }

    /// [§ 17.6 The SELECT, OPTGROUP, and OPTION elements](https://www.w3.org/TR/html401/interact/forms.html#h-17.6)
    fn add_select(
        &mut self,
        node: NodeId,
        element: &ElementData,
        computed: ComputedStyle,
        scope: Scope<'d>,
        container: &mut Option<BoxId>,
    ) -> Result<(), BoxTreeError> {
        let mut control = control_from_attrs(FormControl::new(ControlType::Select), element);
        control.multiple = element.has_attr("multiple");
        for option in self.dom.descendants(node) {
            let Some(data) = self.dom.as_element(option) else {
                continue;
            };
            if data.tag_name != "option" {
                continue;
            }
            let text = self
                .dom
                .text_content(option)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            control.add_option(
                text,
                data.attr("value").map(str::to_string),
                data.has_attr("selected"),
            );
        }
        control.normalize_selection();

        let visible_rows = if control.multiple {
            element
                .attr("size")
                .and_then(|v| v.trim().parse::<i32>().ok())
                .unwrap_or(4)
                .max(1)
        } else {
            1
        };
        if let Some(size) = element.attr("size").and_then(|v| v.trim().parse().ok()) {
            control.size = size;
        }
        let widest = control
            .options
            .iter()
            .map(|o| o.text.chars().count())
            .max()
            .unwrap_or(0);
        let shown = control
            .options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.text.clone());
        let id = self.forms.add_control(control, self.current_form)?;

        let ex = computed.font_size * 0.5;
        let (width, height) = replaced_size(
            &computed,
            (widest as f32 * ex).ceil() as i32 + 2 * GADGET_CHROME,
            computed.line_height_px() * visible_rows,
        );
        let floated = computed.is_floated().then(|| computed.clone());
        let style = self.tree.add_style(computed);
        let mut b = LayoutBox::new(BoxType::Inline, style);
        b.node = Some(node);
        b.width = width;
        b.height = height;
        b.gadget = Some(id);
        b.text = shown.map(TextRun::new);
        let box_id = self.place_replaced(b, floated.as_ref(), node, scope.parent, container);
        self.link_gadget(id, box_id)
    }

    /// [§ 17.7 The TEXTAREA element](https://www.w3.org/TR/html401/interact/forms.html#h-17.7)
    ///
    /// An inline block holding one inline container per line of the
    /// initial value, so the lines wrap like any other text.
    fn add_textarea(
        &mut self,
        node: NodeId,
        element: &ElementData,
        mut computed: ComputedStyle,
        scope: Scope<'d>,
        container: &mut Option<BoxId>,
    ) -> Result<(), BoxTreeError> {
        let value = self.dom.text_content(node);
        let value = value.strip_prefix('\n').unwrap_or(&value).to_string();
        let control = control_from_attrs(FormControl::new(ControlType::Textarea), element)
            .with_value(value.clone());
        let id = self.forms.add_control(control, self.current_form)?;

        let cols = element
            .attr("cols")
            .and_then(|v| v.trim().parse::<f32>().ok())
            .unwrap_or(20.0);
        let rows = element
            .attr("rows")
            .and_then(|v| v.trim().parse::<f32>().ok())
            .unwrap_or(2.0);
        if computed.width == Size::Auto {
            computed.width = Size::Length(Length {
                value: cols,
                unit: LengthUnit::Ex,
            });
        }
        if computed.height == Height::Auto {
            computed.height = Height::Length(Length::px(rows * computed.line_height_px() as f32));
        }
        computed.white_space = WhiteSpace::Normal;
        computed.display = DisplayType::InlineBlock;

        let floated = computed.is_floated();
        let style = self.tree.add_style(computed.clone());
        let mut b = LayoutBox::new(BoxType::InlineBlock, style);
        b.gadget = Some(id);
        b.node = Some(node);
        let gadget = if floated {
            let inner = self.float_wrapper(node, &computed, scope.parent, container);
            let mut inner_container = None;
            self.append_inline(b, inner, &mut inner_container)
        } else {
            self.append_inline(b, scope.parent, container)
        };

        for line in value.split('\n') {
            let words: Vec<&str> = line.split_whitespace().collect();
            let line_box = self
                .tree
                .append_new(gadget, LayoutBox::new(BoxType::InlineContainer, style));
            let mut text = LayoutBox::new(BoxType::Inline, style);
            text.text = Some(TextRun::new(words.join(" ")));
            let _ = self.tree.append_new(line_box, text);
        }
        self.link_gadget(id, gadget)
    }

    fn link_gadget(&mut self, control: ControlId, layout_box: BoxId) -> Result<(), BoxTreeError> {
        self.forms.control_mut(control)?.layout_box = Some(layout_box.0);
        Ok(())
    }

    /// Put an inline-level box on the running line of `parent`, or in a
    /// float of its own when its element is floated.
    fn place_replaced(
        &mut self,
        b: LayoutBox,
        floated: Option<&ComputedStyle>,
        node: NodeId,
        parent: BoxId,
        container: &mut Option<BoxId>,
    ) -> BoxId {
        match floated {
            Some(style) => {
                let inner = self.float_wrapper(node, style, parent, container);
                self.append_inline(b, inner, &mut None)
            }
            None => self.append_inline(b, parent, container),
        }
    }

    /// Append an inline-level box to the running inline container of
    /// `parent`, opening one if needed.
    fn append_inline(
        &mut self,
        b: LayoutBox,
        parent: BoxId,
        container: &mut Option<BoxId>,
    ) -> BoxId {
        let c = match *container {
            Some(c) => c,
            None => {
                let style = self.tree[parent].style;
                let c = self
                    .tree
                    .append_new(parent, LayoutBox::new(BoxType::InlineContainer, style));
                *container = Some(c);
                c
            }
        };
        self.tree.append_new(c, b)
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// A float wrapper on the running line holding a single block (or
    /// table) with the element's style, minus the float. "if 'float' has a
    /// value other than 'none', the box is floated and 'display' is set
    /// according to the table below": inline becomes block.
    ///
    /// Returns the inner box.
    fn float_wrapper(
        &mut self,
        node: NodeId,
        computed: &ComputedStyle,
        parent: BoxId,
        container: &mut Option<BoxId>,
    ) -> BoxId {
        let mut wrapper_style = ComputedStyle::inherit_from(computed);
        wrapper_style.display = DisplayType::Block;
        wrapper_style.float = computed.float;
        let kind = if computed.float == FloatType::Right {
            BoxType::FloatRight
        } else {
            BoxType::FloatLeft
        };
        let wrapper_style = self.tree.add_style(wrapper_style);
        let wrapper = self.append_inline(LayoutBox::new(kind, wrapper_style), parent, container);

        let mut inner_style = computed.clone();
        inner_style.float = FloatType::None;
        let inner_type = match inner_style.display {
            DisplayType::Table => BoxType::Table,
            DisplayType::Inline | DisplayType::InlineBlock => {
                inner_style.display = DisplayType::Block;
                BoxType::Block
            }
            _ => BoxType::Block,
        };
        let inner_style = self.tree.add_style(inner_style);
        let mut inner = LayoutBox::new(inner_type, inner_style);
        inner.node = Some(node);
        self.tree.append_new(wrapper, inner)
    }
}

/// Name, value and disabled state shared by every control.
fn control_from_attrs(mut control: FormControl, element: &ElementData) -> FormControl {
    if let Some(name) = element.attr("name") {
        control = control.named(name);
    }
    if let Some(value) = element.attr("value") {
        control = control.with_value(value);
    }
    control.disabled = element.has_attr("disabled");
    control
}

/// `colspan` / `rowspan`: a positive integer, `1` when absent or invalid.
fn span_attr(element: &ElementData, name: &str) -> usize {
    element
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// Width and height from fixed style lengths, else the defaults.
fn replaced_size(style: &ComputedStyle, width: i32, height: i32) -> (i32, i32) {
    let width = match style.width {
        Size::Length(l) => l.to_px(style.font_size) as i32,
        Size::Auto | Size::Percent(_) => width,
    };
    let height = match style.height {
        Height::Length(l) => l.to_px(style.font_size) as i32,
        Height::Auto => height,
    };
    (width, height)
}

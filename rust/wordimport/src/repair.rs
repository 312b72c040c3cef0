use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use quick_xml::escape::{escape, partial_escape};

// Full markup repair: parse as a browser would, keep the body, and write it
// back out as well-formed XHTML without Word-specific markup.

fn parse_html(input: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(input)
}

fn children_of(h: &Handle) -> Vec<Handle> {
    h.children.borrow().clone()
}

fn attr_value(h: &Handle, key: &str) -> Option<String> {
    match &h.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| (*a.name.local).eq_ignore_ascii_case(key))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn safe_href(href: &str) -> Option<String> {
    let h = href.trim();
    if h.is_empty() {
        return None;
    }
    let scheme = h.to_ascii_lowercase();
    if ["javascript:", "vbscript:", "data:"].iter().any(|p| scheme.starts_with(p)) {
        return None;
    }
    Some(h.to_string())
}

fn is_allowed(lower: &str) -> bool {
    matches!(
        lower,
        "p" | "br"
            | "hr"
            | "b"
            | "strong"
            | "i"
            | "em"
            | "u"
            | "s"
            | "sub"
            | "sup"
            | "pre"
            | "code"
            | "blockquote"
            | "ul"
            | "ol"
            | "li"
            | "table"
            | "thead"
            | "tbody"
            | "tfoot"
            | "tr"
            | "th"
            | "td"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "a"
            | "img"
            | "math"
    )
}

fn drops_content(lower: &str) -> bool {
    matches!(
        lower,
        "script" | "style" | "noscript" | "template" | "iframe" | "object" | "embed" | "xml" | "head"
    )
}

enum OutNode {
    Element {
        tag: String,
        attrs: Vec<(&'static str, String)>,
        children: Vec<OutNode>,
    },
    Text(String),
}

fn keep_attrs(tag: &str, node: &Handle) -> Vec<(&'static str, String)> {
    let keys: &[&'static str] = match tag {
        "a" => &["href", "title", "name"],
        "img" => &["src", "alt", "title", "width", "height"],
        "td" | "th" => &["colspan", "rowspan"],
        "ol" => &["start"],
        "math" => &["display"],
        _ => &[],
    };
    let mut out = Vec::new();
    for key in keys {
        let Some(value) = attr_value(node, key) else {
            continue;
        };
        if *key == "href" {
            if let Some(h) = safe_href(&value) {
                out.push(("href", h));
            }
        } else {
            out.push((*key, value));
        }
    }
    out
}

fn repair_children(children: &[Handle], in_math: bool) -> Vec<OutNode> {
    children.iter().flat_map(|c| repair_node(c, in_math)).collect()
}

fn repair_node(node: &Handle, in_math: bool) -> Vec<OutNode> {
    match &node.data {
        NodeData::Text { contents } => vec![OutNode::Text(contents.borrow().to_string())],
        NodeData::Document => repair_children(&children_of(node), in_math),
        NodeData::Comment { .. }
        | NodeData::Doctype { .. }
        | NodeData::ProcessingInstruction { .. } => Vec::new(),
        NodeData::Element { name, .. } => {
            let local = name.local.to_string();
            let lower = local.to_ascii_lowercase();

            if in_math {
                return vec![OutNode::Element {
                    tag: local,
                    attrs: Vec::new(),
                    children: repair_children(&children_of(node), true),
                }];
            }

            if drops_content(&lower) {
                return Vec::new();
            }
            // Office namespace elements such as <o:p> carry no content worth keeping.
            if lower.contains(':') {
                return Vec::new();
            }

            if lower == "math" {
                let mut attrs = vec![("xmlns", crate::output::MATHML_NS.to_string())];
                attrs.extend(keep_attrs("math", node));
                return vec![OutNode::Element {
                    tag: "math".to_string(),
                    attrs,
                    children: repair_children(&children_of(node), true),
                }];
            }

            // font, span, div and unknown wrappers are unwrapped.
            if !is_allowed(&lower) {
                return repair_children(&children_of(node), false);
            }

            vec![OutNode::Element {
                attrs: keep_attrs(&lower, node),
                children: repair_children(&children_of(node), false),
                tag: lower,
            }]
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img")
}

fn write_node(out: &mut String, n: &OutNode) {
    match n {
        OutNode::Text(t) => out.push_str(&partial_escape(t.as_str())),
        OutNode::Element {
            tag,
            attrs,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            for (k, v) in attrs {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(&escape(v.as_str()));
                out.push('"');
            }
            if is_void(tag) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for c in children {
                write_node(out, c);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn body_children(dom: &RcDom) -> Option<Vec<Handle>> {
    fn find_elem(node: &Handle, name: &str) -> Option<Handle> {
        if let NodeData::Element { name: q, .. } = &node.data {
            if (*q.local).eq_ignore_ascii_case(name) {
                return Some(node.clone());
            }
        }
        node.children.borrow().iter().find_map(|c| find_elem(c, name))
    }

    let body = find_elem(&dom.document, "body")?;
    let out = body.children.borrow().clone();
    Some(out)
}

/// Repairs arbitrary HTML into a well-formed XHTML body fragment.
pub fn repair_markup(input: &str) -> String {
    let dom = parse_html(input);
    let children = body_children(&dom).unwrap_or_else(|| children_of(&dom.document));
    let mut out = String::with_capacity(input.len());
    for n in repair_children(&children, false) {
        write_node(&mut out, &n);
    }
    out
}

//! Receipt markup schema.
//!
//! The vocabulary is a static table of [`ElementRule`]s. [`validate`] walks
//! the whole tree and reports every violation at once so a document is either
//! accepted in full or rejected before any bytes are emitted.

use super::node::{Content, Element};
use crate::error::{ReciboError, Result};

/// What an element may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentModel {
    /// No children at all.
    Empty,
    /// Text runs only.
    Text,
    /// Any mix of text and vocabulary elements.
    Mixed,
}

/// Allowed shape of an attribute value.
#[derive(Debug, Clone, Copy)]
pub enum AttrKind {
    /// Free text (possibly containing `${...}` tokens).
    Any,
    /// Integer within an inclusive range.
    Range(i64, i64),
    /// One of a fixed set of values, case-sensitive.
    OneOf(&'static [&'static str]),
    /// One of a fixed set of values, ignoring ASCII case.
    OneOfIgnoreCase(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct AttrRule {
    pub name: &'static str,
    pub kind: AttrKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ElementRule {
    pub name: &'static str,
    pub content: ContentModel,
    pub attributes: &'static [AttrRule],
}

impl ElementRule {
    fn attribute(&self, name: &str) -> Option<&AttrRule> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

const fn opt(name: &'static str, kind: AttrKind) -> AttrRule {
    AttrRule {
        name,
        kind,
        required: false,
    }
}

const fn req(name: &'static str, kind: AttrKind) -> AttrRule {
    AttrRule {
        name,
        kind,
        required: true,
    }
}

const BYTE: AttrKind = AttrKind::Range(0, 255);
const ENCODING: AttrRule = opt("encoding", AttrKind::Any);

pub const BARCODE_TYPES: &[&str] = &[
    "upca", "upce", "ean13", "ean8", "code39", "itf", "codabar", "code93", "code128",
];

/// The full receipt vocabulary.
pub static ELEMENTS: &[ElementRule] = &[
    ElementRule {
        name: "receipt",
        content: ContentModel::Mixed,
        attributes: &[ENCODING],
    },
    ElementRule {
        name: "initialize",
        content: ContentModel::Empty,
        attributes: &[],
    },
    ElementRule {
        name: "text",
        content: ContentModel::Text,
        attributes: &[ENCODING],
    },
    ElementRule {
        name: "line",
        content: ContentModel::Text,
        attributes: &[ENCODING],
    },
    ElementRule {
        name: "bold",
        content: ContentModel::Mixed,
        attributes: &[ENCODING],
    },
    ElementRule {
        name: "underline",
        content: ContentModel::Mixed,
        attributes: &[opt("mode", BYTE), ENCODING],
    },
    ElementRule {
        name: "invert",
        content: ContentModel::Mixed,
        attributes: &[ENCODING],
    },
    ElementRule {
        name: "size",
        content: ContentModel::Mixed,
        attributes: &[
            opt("width", AttrKind::Range(1, 8)),
            opt("height", AttrKind::Range(1, 8)),
            ENCODING,
        ],
    },
    ElementRule {
        name: "align",
        content: ContentModel::Mixed,
        attributes: &[
            opt("value", AttrKind::OneOf(&["left", "center", "right"])),
            ENCODING,
        ],
    },
    ElementRule {
        name: "font",
        content: ContentModel::Mixed,
        attributes: &[opt("name", AttrKind::OneOf(&["A", "B"])), ENCODING],
    },
    ElementRule {
        name: "rotate90",
        content: ContentModel::Mixed,
        attributes: &[ENCODING],
    },
    ElementRule {
        name: "qrcode",
        content: ContentModel::Empty,
        attributes: &[
            req("data", AttrKind::Any),
            opt("size", AttrKind::Range(1, 16)),
            opt("errorLevel", AttrKind::OneOf(&["L", "M", "Q", "H"])),
        ],
    },
    ElementRule {
        name: "barcode",
        content: ContentModel::Empty,
        attributes: &[
            opt("type", AttrKind::OneOfIgnoreCase(BARCODE_TYPES)),
            req("data", AttrKind::Any),
            opt("height", BYTE),
            opt("width", BYTE),
            opt("hri", AttrKind::OneOf(&["none", "above", "below", "both"])),
        ],
    },
    ElementRule {
        name: "image",
        content: ContentModel::Empty,
        attributes: &[req("path", AttrKind::Any), opt("fn", AttrKind::OneOf(&["2", "50"]))],
    },
    ElementRule {
        name: "feed",
        content: ContentModel::Empty,
        attributes: &[opt("lines", BYTE), opt("dots", BYTE)],
    },
    ElementRule {
        name: "cut",
        content: ContentModel::Empty,
        attributes: &[
            opt("type", AttrKind::OneOf(&["full", "partial"])),
            opt("feed", BYTE),
        ],
    },
    ElementRule {
        name: "drawer",
        content: ContentModel::Empty,
        attributes: &[
            opt("pin", AttrKind::OneOf(&["2", "5"])),
            opt("onTime", BYTE),
            opt("offTime", BYTE),
        ],
    },
    ElementRule {
        name: "beep",
        content: ContentModel::Empty,
        attributes: &[opt("times", BYTE), opt("duration", BYTE)],
    },
    ElementRule {
        name: "spacing",
        content: ContentModel::Empty,
        attributes: &[opt("character", BYTE), opt("line", BYTE)],
    },
    ElementRule {
        name: "margin",
        content: ContentModel::Empty,
        attributes: &[opt("left", AttrKind::Range(0, 65535))],
    },
    ElementRule {
        name: "codepage",
        content: ContentModel::Empty,
        attributes: &[opt("value", BYTE)],
    },
    ElementRule {
        name: "for",
        content: ContentModel::Mixed,
        attributes: &[req("var", AttrKind::Any), req("in", AttrKind::Any), ENCODING],
    },
    ElementRule {
        name: "if",
        content: ContentModel::Mixed,
        attributes: &[req("condition", AttrKind::Any), ENCODING],
    },
];

/// Look up the rule for an element name.
pub fn rule(name: &str) -> Option<&'static ElementRule> {
    ELEMENTS.iter().find(|r| r.name == name)
}

/// Validate a whole document, failing with every violation found.
pub fn validate(root: &Element) -> Result<()> {
    let found = violations(root);
    if found.is_empty() {
        Ok(())
    } else {
        Err(ReciboError::Validation(found))
    }
}

/// Collect every schema violation in the tree, in document order.
pub fn violations(root: &Element) -> Vec<String> {
    let mut found = Vec::new();
    if root.name != "receipt" {
        found.push(format!(
            "/{}: root element must be <receipt>",
            root.name
        ));
    }
    check_element(root, &format!("/{}", root.name), &mut found);
    found
}

fn check_element(element: &Element, path: &str, found: &mut Vec<String>) {
    let Some(rule) = rule(&element.name) else {
        found.push(format!("{path}: unknown element <{}>", element.name));
        return;
    };

    for (name, value) in &element.attributes {
        match rule.attribute(name) {
            Some(attr) => check_value(attr, value, path, found),
            None => found.push(format!(
                "{path}: attribute '{name}' is not allowed on <{}>",
                element.name
            )),
        }
    }
    for attr in rule.attributes.iter().filter(|a| a.required) {
        if element.attr_non_empty(attr.name).is_none() {
            found.push(format!(
                "{path}: missing required attribute '{}'",
                attr.name
            ));
        }
    }

    for child in &element.children {
        match (rule.content, child) {
            (ContentModel::Empty, Content::Text(_)) => {
                found.push(format!("{path}: <{}> must be empty", element.name))
            }
            (ContentModel::Empty | ContentModel::Text, Content::Element(e)) => found.push(format!(
                "{path}: <{}> is not allowed inside <{}>",
                e.name, element.name
            )),
            (ContentModel::Mixed, Content::Element(e)) if e.name == "receipt" => {
                found.push(format!("{path}: <receipt> cannot be nested"))
            }
            _ => {}
        }
    }

    let mut index = 0;
    for child in element.elements() {
        index += 1;
        // leaf and empty elements already reported their children
        if rule.content == ContentModel::Mixed {
            check_element(child, &format!("{path}/{}[{index}]", child.name), found);
        }
    }
}

fn check_value(attr: &AttrRule, value: &str, path: &str, found: &mut Vec<String>) {
    match attr.kind {
        AttrKind::Any => {}
        AttrKind::Range(min, max) => match value.trim().parse::<i64>() {
            Ok(n) if (min..=max).contains(&n) => {}
            Ok(n) => found.push(format!(
                "{path}: attribute '{}' = {n} is outside {min}..={max}",
                attr.name
            )),
            Err(_) => found.push(format!(
                "{path}: attribute '{}' = '{value}' is not an integer",
                attr.name
            )),
        },
        AttrKind::OneOf(allowed) => {
            if !allowed.contains(&value) {
                found.push(enum_violation(attr.name, value, allowed, path));
            }
        }
        AttrKind::OneOfIgnoreCase(allowed) => {
            if !allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
                found.push(enum_violation(attr.name, value, allowed, path));
            }
        }
    }
}

fn enum_violation(name: &str, value: &str, allowed: &[&str], path: &str) -> String {
    format!(
        "{path}: attribute '{name}' = '{value}' must be one of {}",
        allowed.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;

    fn check(xml: &str) -> Vec<String> {
        violations(&parse(xml).unwrap())
    }

    #[test]
    fn test_valid_document() {
        let found = check(
            r#"<receipt encoding="utf-8">
                <initialize/>
                <align value="center"><bold><line>Title</line></bold></align>
                <size width="2" height="2">Big <text>text</text></size>
                <for var="item" in="Items"><if condition="item.Show"><line>${item.Name}</line></if></for>
                <qrcode data="https://example.com" size="6" errorLevel="H"/>
                <barcode type="EAN13" data="123456789012" hri="below"/>
                <image path="logo.bmp" fn="2"/>
                <feed lines="3"/><cut type="full" feed="2"/>
                <drawer pin="5" onTime="50" offTime="100"/>
                <beep times="2" duration="3"/>
                <spacing character="1" line="30"/><margin left="300"/><codepage value="16"/>
            </receipt>"#,
        );
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn test_root_must_be_receipt() {
        let found = check("<ticket/>");
        assert_eq!(found.len(), 2);
        assert!(found[0].contains("root element must be <receipt>"));
        assert!(found[1].contains("unknown element <ticket>"));
    }

    #[test]
    fn test_collects_all_violations() {
        let found = check(
            r#"<receipt>
                <size width="9"/>
                <align value="middle"/>
                <qrcode/>
                <blink/>
                <cut feed="300" style="x"/>
            </receipt>"#,
        );
        assert_eq!(found.len(), 6, "{found:?}");
        assert!(found[0].contains("'width' = 9 is outside 1..=8"));
        assert!(found[1].contains("'value' = 'middle' must be one of left, center, right"));
        assert!(found[2].contains("missing required attribute 'data'"));
        assert!(found[3].contains("unknown element <blink>"));
        assert!(found[4].contains("'feed' = 300 is outside 0..=255"));
        assert!(found[5].contains("'style' is not allowed on <cut>"));
    }

    #[test]
    fn test_content_model() {
        let found = check(
            r#"<receipt>
                <line>a<bold>b</bold></line>
                <feed lines="1">x</feed>
                <bold><receipt/></bold>
            </receipt>"#,
        );
        assert_eq!(found.len(), 3, "{found:?}");
        assert!(found[0].contains("<bold> is not allowed inside <line>"));
        assert!(found[1].contains("<feed> must be empty"));
        assert!(found[2].contains("<receipt> cannot be nested"));
    }

    #[test]
    fn test_paths_name_position() {
        let found = check(r#"<receipt><bold/><bold><size height="0"/></bold></receipt>"#);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("/receipt/bold[2]/size[1]:"), "{}", found[0]);
    }

    #[test]
    fn test_barcode_type_ignores_case() {
        assert!(check(r#"<receipt><barcode type="Code128" data="x"/></receipt>"#).is_empty());
        let found = check(r#"<receipt><barcode type="qr" data="x"/></receipt>"#);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_non_numeric_range() {
        let found = check(r#"<receipt><margin left="wide"/></receipt>"#);
        assert!(found[0].contains("'left' = 'wide' is not an integer"));
    }

    #[test]
    fn test_validate_error() {
        let err = validate(&parse("<receipt><nope/></receipt>").unwrap()).unwrap_err();
        match err {
            ReciboError::Validation(v) => assert_eq!(v.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }
}

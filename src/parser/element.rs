//! Partially materialized elements and alias-based field lookup.

/// An element harvested from the event stream: local name, attributes,
/// direct text and the children that were kept for it.
///
/// Only the subtree of the innermost open record is ever materialized;
/// everything else is released at its end-event.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

fn matches(name: &str, alias: &str) -> bool {
    name.eq_ignore_ascii_case(alias)
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Trimmed direct text, `None` when empty.
    pub fn text(&self) -> Option<&str> {
        let t = self.text.trim();
        (!t.is_empty()).then_some(t)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| matches(k, name))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn children_named<'a>(&'a self, alias: &str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| matches(&c.name, alias))
    }

    /// True when a direct child is named `alias`.
    pub fn has_child(&self, alias: &str) -> bool {
        self.children_named(alias).next().is_some()
    }

    /// Outermost descendants named `alias`, in document order.
    pub fn descendants(&self, alias: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut pending: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(el) = pending.pop() {
            if matches(&el.name, alias) {
                found.push(el);
            } else {
                pending.extend(el.children.iter().rev());
            }
        }
        found
    }

    /// Value of a container wrapping an amount: `<X><Amount>1</Amount></X>`
    /// or `<X Amount="1"/>`.
    fn wrapped_amount(&self) -> Option<&str> {
        self.children_named("Amount")
            .find_map(Element::text)
            .or_else(|| self.attr("Amount"))
    }

    /// Direct text, else a wrapped amount.
    fn value(&self) -> Option<&str> {
        self.text().or_else(|| self.wrapped_amount())
    }

    /// Resolve a field by its ordered aliases.
    ///
    /// Tried in order, each step over all aliases before the next step:
    /// 1. a direct child with non-empty text;
    /// 2. an attribute of this element;
    /// 3. a direct child wrapping the value as an `Amount` child or attribute;
    /// 4. one level deeper: a grandchild under any container, text or wrapped amount.
    ///
    /// A miss is `None`.
    pub fn resolve(&self, aliases: &[&str]) -> Option<&str> {
        for alias in aliases {
            if let Some(t) = self.children_named(alias).find_map(Element::text) {
                return Some(t);
            }
        }
        for alias in aliases {
            if let Some(v) = self.attr(alias) {
                return Some(v);
            }
        }
        for alias in aliases {
            if let Some(v) = self.children_named(alias).find_map(Element::wrapped_amount) {
                return Some(v);
            }
        }
        for alias in aliases {
            let found = self
                .children
                .iter()
                .flat_map(|c| c.children_named(alias))
                .find_map(Element::value);
            if found.is_some() {
                return found;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, text: &str) -> Element {
        Element {
            text: text.into(),
            ..Element::new(name)
        }
    }

    fn node(name: &str, children: Vec<Element>) -> Element {
        Element {
            children,
            ..Element::new(name)
        }
    }

    #[test]
    fn child_text_wins_over_attribute() {
        let mut el = node("Account", vec![leaf("AccountID", "1920")]);
        el.attrs.push(("AccountID".into(), "9999".into()));
        assert_eq!(el.resolve(&["AccountID"]), Some("1920"));
    }

    #[test]
    fn attribute_fallback() {
        let mut el = Element::new("Journal");
        el.attrs.push(("JournalID".into(), "GL".into()));
        assert_eq!(el.resolve(&["JournalID"]), Some("GL"));
    }

    #[test]
    fn alias_order_and_case() {
        let el = node("Account", vec![leaf("description", "Bank"), leaf("Name", "Konto")]);
        assert_eq!(el.resolve(&["Name", "Description"]), Some("Konto"));
        assert_eq!(el.resolve(&["Description"]), Some("Bank"));
    }

    #[test]
    fn empty_child_text_is_a_miss() {
        let el = node("Line", vec![leaf("Description", "  ")]);
        assert_eq!(el.resolve(&["Description"]), None);
    }

    #[test]
    fn wrapped_amount_variants() {
        let nested = node("Line", vec![node("DebitAmount", vec![leaf("Amount", "100.00")])]);
        assert_eq!(nested.resolve(&["DebitAmount"]), Some("100.00"));

        let mut container = Element::new("CreditAmount");
        container.attrs.push(("Amount".into(), "5,50".into()));
        let attr = node("Line", vec![container]);
        assert_eq!(attr.resolve(&["CreditAmount"]), Some("5,50"));
    }

    #[test]
    fn one_level_deeper() {
        let el = node(
            "Line",
            vec![
                node(
                    "DebitAmount",
                    vec![leaf("Amount", "10"), leaf("CurrencyCode", "EUR")],
                ),
                node(
                    "TaxInformation",
                    vec![
                        leaf("TaxCode", "3"),
                        node("DebitTaxAmount", vec![leaf("Amount", "2.50")]),
                    ],
                ),
            ],
        );
        assert_eq!(el.resolve(&["CurrencyCode"]), Some("EUR"));
        assert_eq!(el.resolve(&["VatCode", "TaxCode"]), Some("3"));
        assert_eq!(el.resolve(&["DebitTaxAmount"]), Some("2.50"));
        assert_eq!(el.resolve(&["Missing"]), None);
    }

    #[test]
    fn descendants_in_document_order() {
        let el = node(
            "Supplier",
            vec![
                node("BalanceAccountStructure", vec![leaf("AccountID", "2400")]),
                leaf("Name", "Leverandør"),
                node(
                    "Extra",
                    vec![node("balanceaccountstructure", vec![leaf("AccountID", "2410")])],
                ),
            ],
        );
        let ids: Vec<Option<&str>> = el
            .descendants("BalanceAccountStructure")
            .into_iter()
            .map(|s| s.resolve(&["AccountID"]))
            .collect();
        assert_eq!(ids, vec![Some("2400"), Some("2410")]);
        assert!(el.has_child("name"));
        assert!(!el.has_child("AccountID"));
    }
}

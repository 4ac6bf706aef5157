//! Arena-backed XML element tree.
//!
//! Every node records its parent, so structural lookups (parent, position, reachability)
//! never need to rescan the document. Removed nodes stay in the arena but are detached
//! from the tree and therefore never serialized.

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesStart, Event};

/// Handle to a node inside one [`XmlDocument`]. Only meaningful for the document that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("XML syntax error at byte {position}: {message}")]
pub struct XmlError {
    pub position: u64,
    pub message: String,
}

/// An element: tag name, ordered attribute bag and (trimmed) text content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeData {
    Element(Element),
    /// Processing instruction body, e.g. `xml-stylesheet href="a.xsl"`.
    Instruction(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<Node>,
    root: NodeId,
    prolog: Vec<String>,
    epilog: Vec<String>,
}

impl XmlDocument {
    /// A document consisting of a single empty root element.
    pub fn new(root_name: &str) -> Self {
        let root = Node {
            data: NodeData::Element(Element {
                name: root_name.to_string(),
                ..Default::default()
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            prolog: Vec::new(),
            epilog: Vec::new(),
        }
    }

    /// Parse a document. Comments, the XML declaration and DOCTYPE are dropped;
    /// processing instructions are kept. Whitespace-only text is discarded and text is trimmed.
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut nodes: Vec<Node> = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut stack: Vec<NodeId> = Vec::new();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();

        let fail = |reader: &Reader<&[u8]>, message: String| XmlError {
            position: reader.buffer_position() as u64,
            message,
        };

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(fail(&reader, e.to_string())),
            };

            match event {
                Event::Start(ref start) | Event::Empty(ref start) => {
                    let element = element_from_start(start).map_err(|m| fail(&reader, m))?;
                    let id = push_element(&mut nodes, element, stack.last().copied());
                    if stack.is_empty() {
                        if root.is_some() {
                            return Err(fail(&reader, "multiple root elements".to_string()));
                        }
                        root = Some(id);
                    }
                    if matches!(event, Event::Start(_)) {
                        stack.push(id);
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(t) => {
                    let Some(&top) = stack.last() else {
                        continue;
                    };
                    let value = t.unescape().map_err(|e| fail(&reader, e.to_string()))?;
                    append_text(&mut nodes, top, &value);
                }
                Event::CData(c) => {
                    let Some(&top) = stack.last() else {
                        continue;
                    };
                    let value = std::str::from_utf8(&c)
                        .map_err(|e| fail(&reader, e.to_string()))?
                        .trim()
                        .to_string();
                    append_text(&mut nodes, top, &value);
                }
                Event::PI(pi) => {
                    let body = String::from_utf8_lossy(&pi).into_owned();
                    match (stack.last().copied(), root) {
                        (Some(parent), _) => {
                            let id = NodeId(nodes.len());
                            nodes.push(Node {
                                data: NodeData::Instruction(body),
                                parent: Some(parent),
                                children: Vec::new(),
                            });
                            nodes[parent.0].children.push(id);
                        }
                        (None, None) => prolog.push(body),
                        (None, Some(_)) => epilog.push(body),
                    }
                }
                Event::Decl(_) | Event::Comment(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if !stack.is_empty() {
            return Err(fail(&reader, "unexpected end of document".to_string()));
        }
        let Some(root) = root else {
            return Err(fail(&reader, "no root element".to_string()));
        };

        Ok(Self {
            nodes,
            root,
            prolog,
            epilog,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots, detached nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(e) => Some(e),
            NodeData::Instruction(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(e) => Some(e),
            NodeData::Instruction(_) => None,
        }
    }

    pub fn instruction(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Instruction(body) => Some(body),
            NodeData::Element(_) => None,
        }
    }

    pub fn prolog(&self) -> &[String] {
        &self.prolog
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.element(id)?.attributes.get(key).map(String::as_str)
    }

    /// Returns `true` if the stored value changed.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: &str) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        if element.attributes.get(key).map(String::as_str) == Some(value) {
            return false;
        }
        element
            .attributes
            .insert(key.to_string(), value.to_string());
        true
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.element(id)?.text.as_deref()
    }

    /// Empty text is stored as no text. Returns `true` if the content changed.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        let new = (!text.is_empty()).then(|| text.to_string());
        if element.text == new {
            return false;
        }
        element.text = new;
        true
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    /// All child nodes (elements and processing instructions) in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
    }

    /// First direct child element with the given tag.
    pub fn find_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.child_elements(id)
            .find(|c| self.name(*c) == Some(name))
    }

    /// All direct child elements with the given tag.
    pub fn find_children<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.child_elements(id)
            .filter(move |c| self.name(*c) == Some(name))
    }

    /// Elements strictly below `id`, in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_elements(id).collect();
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut children: Vec<NodeId> = self.child_elements(next).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    pub fn find_descendant(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|d| self.name(*d) == Some(name))
    }

    pub fn find_descendants(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|d| self.name(*d) == Some(name))
            .collect()
    }

    pub fn position_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Whether `id` is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if id.0 >= self.nodes.len() {
            return false;
        }
        let mut cur = id;
        loop {
            if cur == self.root {
                return true;
            }
            match self.parent(cur) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        push_element(
            &mut self.nodes,
            Element {
                name: name.to_string(),
                ..Default::default()
            },
            None,
        )
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        true
    }

    /// Insert a detached node right after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, child: NodeId) -> bool {
        let (Some(parent), Some(pos)) = (self.parent(sibling), self.position_in_parent(sibling))
        else {
            return false;
        };
        if !self.can_adopt(parent, child) {
            return false;
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(pos + 1, child);
        true
    }

    fn can_adopt(&self, parent: NodeId, child: NodeId) -> bool {
        parent.0 < self.nodes.len()
            && child.0 < self.nodes.len()
            && child != self.root
            && self.nodes[child.0].parent.is_none()
            && self.element(parent).is_some()
            && !self.is_ancestor_or_self(child, parent)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(p) => node = p,
                None => return false,
            }
        }
    }

    /// Detach `child` only if it currently is a direct child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child).is_some()
    }

    /// Detach a node from its parent; returns the former parent.
    pub fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.nodes[parent.0].children.retain(|c| *c != id);
        self.nodes[id.0].parent = None;
        Some(parent)
    }

    /// Copy a subtree into fresh, detached nodes.
    pub fn deep_copy(&mut self, id: NodeId) -> Option<NodeId> {
        let data = self.nodes.get(id.0)?.data.clone();
        let copy = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        let children = self.nodes[id.0].children.clone();
        for child in children {
            if let Some(child_copy) = self.deep_copy(child) {
                self.nodes[child_copy.0].parent = Some(copy);
                self.nodes[copy.0].children.push(child_copy);
            }
        }
        Some(copy)
    }

    /// Whole document, declaration included.
    pub fn to_xml_string(&self, declaration: &str, newline: &str, indent: &str) -> String {
        let mut out = String::new();
        out.push_str(declaration);
        out.push_str(newline);
        for pi in &self.prolog {
            write_instruction(&mut out, pi);
            out.push_str(newline);
        }
        self.write_node(&mut out, self.root, 0, newline, indent);
        out.push_str(newline);
        for pi in &self.epilog {
            write_instruction(&mut out, pi);
            out.push_str(newline);
        }
        out
    }

    /// One subtree, LF newlines and two-space indentation, no declaration.
    pub fn subtree_to_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, 0, "\n", "  ");
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, depth: usize, newline: &str, indent: &str) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        out.push_str(&indent.repeat(depth));
        let element = match &node.data {
            NodeData::Instruction(body) => {
                write_instruction(out, body);
                return;
            }
            NodeData::Element(e) => e,
        };

        out.push('<');
        out.push_str(&element.name);
        for (k, v) in &element.attributes {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&partial_escape(v.as_str()).replace('"', "&quot;"));
            out.push('"');
        }

        let text = element.text.as_deref().filter(|t| !t.is_empty());
        if node.children.is_empty() {
            match text {
                None => out.push_str("/>"),
                Some(t) => {
                    out.push('>');
                    out.push_str(&partial_escape(t));
                    out.push_str("</");
                    out.push_str(&element.name);
                    out.push('>');
                }
            }
            return;
        }

        out.push('>');
        if let Some(t) = text {
            out.push_str(&partial_escape(t));
        }
        out.push_str(newline);
        for child in &node.children {
            self.write_node(out, *child, depth + 1, newline, indent);
            out.push_str(newline);
        }
        out.push_str(&indent.repeat(depth));
        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
    }
}

fn write_instruction(out: &mut String, body: &str) {
    out.push_str("<?");
    out.push_str(body);
    out.push_str("?>");
}

fn push_element(nodes: &mut Vec<Node>, element: Element, parent: Option<NodeId>) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(Node {
        data: NodeData::Element(element),
        parent,
        children: Vec::new(),
    });
    if let Some(parent) = parent {
        nodes[parent.0].children.push(id);
    }
    id
}

fn append_text(nodes: &mut [Node], id: NodeId, value: &str) {
    if value.is_empty() {
        return;
    }
    if let NodeData::Element(e) = &mut nodes[id.0].data {
        match &mut e.text {
            Some(existing) => existing.push_str(value),
            None => e.text = Some(value.to_string()),
        }
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = IndexMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        attributes.insert(key, value.into_owned());
    }
    Ok(Element {
        name,
        attributes,
        text: None,
    })
}

#[cfg(test)]
mod tests {
    use super::XmlDocument;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-16"?>
<?editor keep-me?>
<redxml>
  <!-- dropped -->
  <definitions>
    <items>
      <item name="Steel_Sword" category="sword">
        <tags>melee, weapon</tags>
        <recycling_parts>
          <parts count="2">Iron ore</parts>
        </recycling_parts>
      </item>
    </items>
  </definitions>
</redxml>
"#;

    #[test]
    fn parse_drops_comments_and_keeps_instructions() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.prolog(), &["editor keep-me".to_string()]);

        let out = doc.to_xml_string("<?xml version=\"1.0\" encoding=\"UTF-16\"?>", "\n", "  ");
        assert!(!out.contains("dropped"));
        assert!(out.contains("<?editor keep-me?>"));
    }

    #[test]
    fn find_queries_follow_element_tree() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let root = doc.root();
        assert_eq!(doc.name(root), Some("redxml"));

        let items = doc.find_descendant(root, "items").unwrap();
        let item = doc.find_child(items, "item").unwrap();
        assert_eq!(doc.attribute(item, "category"), Some("sword"));
        assert_eq!(doc.parent(item), Some(items));

        let tags = doc.find_child(item, "tags").unwrap();
        assert_eq!(doc.text(tags), Some("melee, weapon"));

        let parts: Vec<_> = doc
            .find_children(doc.find_child(item, "recycling_parts").unwrap(), "parts")
            .collect();
        assert_eq!(parts.len(), 1);
        assert_eq!(doc.attribute(parts[0], "count"), Some("2"));
        assert_eq!(doc.text(parts[0]), Some("Iron ore"));
    }

    #[test]
    fn serialize_is_stable_after_reparse() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let decl = "<?xml version=\"1.0\" encoding=\"UTF-16\"?>";
        let first = doc.to_xml_string(decl, "\n", "  ");
        let second = XmlDocument::parse(&first)
            .unwrap()
            .to_xml_string(decl, "\n", "  ");
        assert_eq!(first, second);
    }

    #[test]
    fn serialize_escapes_and_self_closes() {
        let mut doc = XmlDocument::new("root");
        let root = doc.root();
        let child = doc.create_element("a");
        doc.set_attribute(child, "q", "say \"hi\" & <bye>");
        assert!(doc.append_child(root, child));
        let empty = doc.create_element("tags");
        assert!(doc.append_child(root, empty));

        assert_eq!(
            doc.subtree_to_string(root),
            "<root>\n  <a q=\"say &quot;hi&quot; &amp; &lt;bye&gt;\"/>\n  <tags/>\n</root>"
        );
    }

    #[test]
    fn unescapes_entities_in_text_and_attributes() {
        let doc = XmlDocument::parse(r#"<r a="x &amp; y">1 &lt; 2</r>"#).unwrap();
        assert_eq!(doc.attribute(doc.root(), "a"), Some("x & y"));
        assert_eq!(doc.text(doc.root()), Some("1 < 2"));
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(XmlDocument::parse("<a><b></a>").is_err());
        assert!(XmlDocument::parse("<a>").is_err());
        assert!(XmlDocument::parse("").is_err());
        assert!(XmlDocument::parse("<a/><b/>").is_err());
    }

    #[test]
    fn remove_child_requires_actual_parent() {
        let mut doc = XmlDocument::parse("<r><a/><b><c/></b></r>").unwrap();
        let root = doc.root();
        let a = doc.find_child(root, "a").unwrap();
        let b = doc.find_child(root, "b").unwrap();
        let c = doc.find_child(b, "c").unwrap();

        assert!(!doc.remove_child(root, c));
        assert!(doc.is_attached(c));

        assert!(doc.remove_child(b, c));
        assert!(!doc.is_attached(c));
        assert_eq!(doc.children(b).len(), 0);

        // Detaching an ancestor detaches the whole subtree.
        assert!(doc.remove_child(root, a));
        assert!(!doc.is_attached(a));
    }

    #[test]
    fn deep_copy_is_independent_and_inserts_after_original() {
        let mut doc = XmlDocument::parse(r#"<r><x n="1"><y v="a"/></x><z/></r>"#).unwrap();
        let root = doc.root();
        let x = doc.find_child(root, "x").unwrap();

        let copy = doc.deep_copy(x).unwrap();
        assert!(doc.insert_after(x, copy));
        assert_eq!(doc.position_in_parent(copy), Some(1));

        let y_copy = doc.find_child(copy, "y").unwrap();
        doc.set_attribute(y_copy, "v", "b");

        let y = doc.find_child(x, "y").unwrap();
        assert_eq!(doc.attribute(y, "v"), Some("a"));
        assert_eq!(doc.attribute(y_copy, "v"), Some("b"));
    }

    #[test]
    fn append_refuses_cycles_and_attached_nodes() {
        let mut doc = XmlDocument::parse("<r><a><b/></a></r>").unwrap();
        let root = doc.root();
        let a = doc.find_child(root, "a").unwrap();
        let b = doc.find_child(a, "b").unwrap();

        assert!(!doc.append_child(b, a));
        doc.detach(a);
        assert!(!doc.append_child(b, a));
        assert!(doc.append_child(root, a));
    }
}

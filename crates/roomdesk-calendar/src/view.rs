//! Declarative view tree for the tray and the page controls.
//!
//! Views are plain values: build a [`ViewNode`] tree, then [`render`] it to
//! HTML. Text and attribute values are escaped on render.
//!
//! [`render`]: ViewNode::render

use roomdesk_core::{ExternalSource, RoomFilter};

use crate::notify::Notification;
use crate::page::RoomOption;

/// A node of the view tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Element(Element),
    Text(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<ViewNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<ViewNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ViewNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Looks up an attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for ViewNode {
    fn from(element: Element) -> Self {
        ViewNode::Element(element)
    }
}

impl ViewNode {
    pub fn element(tag: impl Into<String>) -> Element {
        Element::new(tag)
    }

    pub fn text(content: impl Into<String>) -> Self {
        ViewNode::Text(content.into())
    }

    /// Renders the tree to HTML.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            ViewNode::Text(text) => out.push_str(&html_escape(text)),
            ViewNode::Element(element) => {
                out.push_str(&format!("<{}", element.tag));
                for (name, value) in &element.attrs {
                    out.push_str(&format!(" {}=\"{}\"", name, html_escape(value)));
                }
                out.push('>');
                for child in &element.children {
                    child.render_into(out);
                }
                out.push_str(&format!("</{}>", element.tag));
            }
        }
    }

    /// Concatenated text content of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            ViewNode::Text(text) => text.clone(),
            ViewNode::Element(element) => element
                .children
                .iter()
                .map(ViewNode::text_content)
                .collect(),
        }
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn button(class: &str, action: &str) -> Element {
    Element::new("button")
        .attr("type", "button")
        .attr("class", class)
        .attr("data-action", action)
}

fn icon(class: &str) -> Element {
    Element::new("i").attr("class", class)
}

/// One notification: the text, then the undo and close buttons.
pub fn notification_view(notification: &Notification) -> ViewNode {
    let mut nav = Element::new("ul").attr("class", "nav justify-content-end");
    if notification.has_undo {
        let undo = button("btn btn-outline-light justify-content-end mr-2", "undo")
            .child(icon("fas fa-undo-alt"))
            .child(ViewNode::text(" UNDO"));
        nav = nav.child(Element::new("li").attr("class", "nav-item").child(undo));
    }
    let close = button("btn btn-outline-light justify-content-end", "close")
        .child(icon("fas fa-times"));
    nav = nav.child(Element::new("li").attr("class", "nav-item").child(close));

    Element::new("div")
        .attr("class", notification.phase.class_name())
        .attr("data-notification-id", notification.id.to_string())
        .child(Element::new("p").child(ViewNode::text(notification.text.clone())))
        .child(nav)
        .into()
}

/// The tray, newest notification first.
pub fn tray_view(notifications: &[Notification]) -> ViewNode {
    Element::new("div")
        .attr("id", "notifications")
        .children(notifications.iter().map(notification_view))
        .into()
}

/// The draggable external events list. Sources the room filter excludes
/// lose their `draggable` class.
pub fn external_sources_view(sources: &[ExternalSource]) -> ViewNode {
    let items = sources.iter().map(|source| {
        let class = if source.draggable {
            "fc-event draggable"
        } else {
            "fc-event"
        };
        let data = serde_json::json!({
            "title": source.title,
            "extendedProps": { "room": source.room },
        });
        Element::new("div")
            .attr("class", class)
            .attr("data-event", data.to_string())
            .child(ViewNode::text(source.title.clone()))
    });
    Element::new("div")
        .attr("id", "external-events-list")
        .children(items)
        .into()
}

/// The room filter select with the current selection marked.
pub fn room_filter_view(rooms: &[RoomOption], selection: RoomFilter) -> ViewNode {
    let option = |value: i64, label: &str| {
        let mut option = Element::new("option").attr("value", value.to_string());
        if value == selection.to_raw() {
            option = option.attr("selected", "selected");
        }
        option.child(ViewNode::text(label))
    };

    Element::new("select")
        .attr("id", "room-filter")
        .attr("class", "form-control")
        .child(option(RoomFilter::ALL_RAW, "All rooms"))
        .children(rooms.iter().map(|room| option(room.id.0, &room.name)))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationId, NotificationPhase};
    use roomdesk_core::RoomId;

    fn notification(has_undo: bool, phase: NotificationPhase) -> Notification {
        Notification {
            id: NotificationId::from_raw(1),
            text: "Deleted Alice's reservation from May 6".to_string(),
            phase,
            has_undo,
        }
    }

    #[test]
    fn notification_with_undo() {
        let html = notification_view(&notification(true, NotificationPhase::Expanded)).render();
        insta::assert_snapshot!(html, @r#"<div class="notification" data-notification-id="1"><p>Deleted Alice&#x27;s reservation from May 6</p><ul class="nav justify-content-end"><li class="nav-item"><button type="button" class="btn btn-outline-light justify-content-end mr-2" data-action="undo"><i class="fas fa-undo-alt"></i> UNDO</button></li><li class="nav-item"><button type="button" class="btn btn-outline-light justify-content-end" data-action="close"><i class="fas fa-times"></i></button></li></ul></div>"#);
    }

    #[test]
    fn notification_without_undo_has_only_close() {
        let view = notification_view(&notification(false, NotificationPhase::Collapsed));
        let html = view.render();
        assert!(html.starts_with(r#"<div class="notification-collapsed""#));
        assert!(!html.contains("data-action=\"undo\""));
        assert!(html.contains("data-action=\"close\""));
        assert_eq!(view.text_content(), "Deleted Alice's reservation from May 6");
    }

    #[test]
    fn tray_keeps_order() {
        let mut second = notification(false, NotificationPhase::Expanded);
        second.id = NotificationId::from_raw(2);
        let view = tray_view(&[second, notification(true, NotificationPhase::Expanded)]);

        let ViewNode::Element(tray) = view else {
            panic!("tray is an element");
        };
        assert_eq!(tray.get_attr("id"), Some("notifications"));
        let ids: Vec<_> = tray
            .children
            .iter()
            .filter_map(|c| match c {
                ViewNode::Element(e) => e.get_attr("data-notification-id"),
                ViewNode::Text(_) => None,
            })
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn renders_nested_elements_in_order() {
        let node: ViewNode = Element::new("ul")
            .attr("class", "nav")
            .attr("id", "n")
            .child(Element::new("li").child(ViewNode::text("a")))
            .child(Element::new("li"))
            .into();
        assert_eq!(
            node.render(),
            r#"<ul class="nav" id="n"><li>a</li><li></li></ul>"#
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let node: ViewNode = Element::new("p")
            .attr("title", "a \"b\" & <c>")
            .child(ViewNode::text("<script>"))
            .into();
        assert_eq!(
            node.render(),
            "<p title=\"a &quot;b&quot; &amp; &lt;c&gt;\">&lt;script&gt;</p>"
        );
    }

    #[test]
    fn external_sources_drop_draggable_class() {
        let mut open = ExternalSource::new("Room 3", RoomId(3));
        let mut closed = ExternalSource::new("Room 5", RoomId(5));
        open.draggable = true;
        closed.draggable = false;

        let html = external_sources_view(&[open, closed]).render();
        assert!(html.contains(r#"<div class="fc-event draggable" data-event="#));
        assert!(html.contains(r#"&quot;extendedProps&quot;:{&quot;room&quot;:3}"#));
        assert!(html.contains(r#"<div class="fc-event" data-event="#));
        assert!(html.contains(">Room 5</div>"));
    }

    #[test]
    fn room_filter_marks_selection() {
        let rooms = vec![
            RoomOption::new(RoomId(3), "Blue"),
            RoomOption::new(RoomId(5), "Red"),
        ];
        let html = room_filter_view(&rooms, RoomFilter::Room(RoomId(5))).render();
        assert!(html.contains(r#"<option value="-1">All rooms</option>"#));
        assert!(html.contains(r#"<option value="5" selected="selected">Red</option>"#));

        let html = room_filter_view(&rooms, RoomFilter::All).render();
        assert!(html.contains(r#"<option value="-1" selected="selected">All rooms</option>"#));
    }
}

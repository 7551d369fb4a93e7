//! End-to-end component lifecycle against a fake host element.
//!
//! The fake host keeps attributes in a map and its children as rendered
//! markup strings, one per child. "Clicking" a child evaluates the body of
//! its onclick attribute through the registry, the way a text-evaluating
//! host would.
//!
//! Run with: cargo test --test component_lifecycle

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use reactive_elements::{
    Component, ComponentRegistry, Element, Error, Event, Hooks, MarkupTarget, RegistryConfig,
    Result, State, escape_html, extend, param,
};
use serde_json::{Value, json};

// =============================================================================
// FAKE HOST
// =============================================================================

#[derive(Default)]
struct TodoList {
    attributes: RefCell<HashMap<String, String>>,
    children: RefCell<Vec<String>>,
    updates: Cell<usize>,
    titles: RefCell<Vec<(Value, Value)>>,
}

impl TodoList {
    fn onclick(&self, child: usize) -> String {
        let children = self.children.borrow();
        let markup = &children[child];
        let start = markup.find("onclick=\"").expect("child has onclick") + "onclick=\"".len();
        let end = start + markup[start..].find('"').expect("onclick is closed");
        markup[start..end].to_string()
    }
}

impl Element for TodoList {
    fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn hooks(&self) -> Hooks {
        Hooks::RENDER | Hooks::PROPERTY_CHANGED | Hooks::DID_UPDATE
    }

    fn render(&self, component: &Component<Self>) -> Result<()> {
        let items = component
            .state_value("items")
            .and_then(|items| items.as_array().cloned())
            .unwrap_or_default();

        let mut markup = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let label = item.as_str().unwrap_or_default();
            let onclick = component.get_handler_ref("onRemove", [param(index)])?;
            markup.push(format!(
                "<button onclick=\"{onclick}\">{}</button>",
                escape_html(label)
            ));
        }
        component.html(&markup.join("\n"))
    }

    fn property_changed(&self, _component: &Component<Self>, name: &str, old: &Value, new: &Value) {
        if name == "title" {
            self.titles.borrow_mut().push((old.clone(), new.clone()));
        }
    }

    fn component_did_update(&self, _component: &Component<Self>) {
        self.updates.set(self.updates.get() + 1);
    }
}

impl MarkupTarget for TodoList {
    type Fragment = Vec<String>;

    fn parse_fragment(&self, markup: &str) -> Result<Self::Fragment> {
        if markup.is_empty() {
            return Ok(Vec::new());
        }
        Ok(markup.lines().map(str::to_string).collect())
    }

    fn morph_children(&self, fragment: Self::Fragment) -> Result<()> {
        *self.children.borrow_mut() = fragment;
        Ok(())
    }
}

fn state(value: Value) -> State {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn todo_list(registry: ComponentRegistry) -> Component<TodoList> {
    let component = extend::<TodoList>(&["title", "limit"]).instantiate_in(TodoList::default(), registry);
    component.register_component();
    component
        .define_handler("onRemove", |c, _event, args| {
            let index = *args[0].downcast_ref::<usize>().ok_or_else(|| Error::Handler {
                handler: "onRemove".into(),
                message: "expected an index".into(),
            })?;
            let mut items = c
                .state_value("items")
                .and_then(|items| items.as_array().cloned())
                .unwrap_or_default();
            items.remove(index);
            c.set_state(state(json!({ "items": items })))
        })
        .unwrap();
    component
}

// =============================================================================
// TESTS
// =============================================================================

#[test]
fn test_render_and_click_through_markup() {
    let list = todo_list(ComponentRegistry::new());
    list.set_state(state(json!({"items": ["milk", "<eggs>", "bread"]})))
        .unwrap();

    let children = list.host().children.borrow().clone();
    assert_eq!(children.len(), 3);
    assert!(children[1].ends_with(">&lt;eggs&gt;</button>"));

    let onclick = list.host().onclick(1);
    list.registry()
        .dispatch_expression(&onclick, &Event::new("click"))
        .unwrap();

    assert_eq!(list.state_value("items"), Some(json!(["milk", "bread"])));
    assert_eq!(list.host().children.borrow().len(), 2);
    assert_eq!(list.host().updates.get(), 2);
}

#[test]
fn test_each_render_allocates_fresh_slots() {
    let list = todo_list(ComponentRegistry::new());
    list.set_state(state(json!({"items": ["a", "b"]}))).unwrap();
    let first = list.host().onclick(0);

    list.render().unwrap();
    let second = list.host().onclick(0);

    assert_ne!(first, second);
    // Slots are retained, so the earlier reference still resolves
    assert_eq!(list.slot_count(), 4);
    list.registry()
        .dispatch_expression(&first, &Event::new("click"))
        .unwrap();
    assert_eq!(list.state_value("items"), Some(json!(["b"])));
}

#[test]
fn test_release_slots_on_render() {
    let config = RegistryConfig::from_json(r#"{"release_slots_on_render": true}"#).unwrap();
    let list = todo_list(ComponentRegistry::with_config(config).unwrap());
    list.set_state(state(json!({"items": ["a", "b"]}))).unwrap();
    let stale = list.host().onclick(0);

    list.render().unwrap();
    assert_eq!(list.slot_count(), 2);
    assert!(matches!(
        list.registry().dispatch_expression(&stale, &Event::new("click")),
        Err(Error::MissingSlot { .. })
    ));
}

#[test]
fn test_properties_follow_attributes() {
    let list = todo_list(ComponentRegistry::new());

    list.set_property("limit", &json!(2)).unwrap();
    assert_eq!(list.host().get_attribute("limit").as_deref(), Some("2"));
    assert_eq!(list.property("limit").unwrap(), json!(2));

    list.set_property("title", &json!({"text": "Groceries"})).unwrap();
    assert_eq!(
        list.host().get_attribute("title").as_deref(),
        Some(r#"{"text":"Groceries"}"#)
    );
    assert_eq!(list.property("title").unwrap(), json!({"text": "Groceries"}));

    // Host reports the change with raw attribute strings
    list.attribute_changed_callback("title", None, Some(r#"{"text":"Groceries"}"#));
    assert_eq!(
        *list.host().titles.borrow(),
        vec![(Value::Null, json!({"text": "Groceries"}))]
    );
}

#[test]
fn test_disconnect_makes_markup_handlers_stale() {
    let list = todo_list(ComponentRegistry::new());
    list.set_state(state(json!({"items": ["a"]}))).unwrap();
    let onclick = list.host().onclick(0);
    let id = list.id().unwrap();

    list.disconnected_callback();
    assert!(!list.registry().contains(id));
    assert!(matches!(
        list.registry().dispatch_expression(&onclick, &Event::new("click")),
        Err(Error::UnknownComponent(_))
    ));
}

#[test]
fn test_global_registry_wiring() {
    let registry = ComponentRegistry::global();
    let a = todo_list(registry.clone());
    let b = todo_list(ComponentRegistry::global());

    let id_a = a.id().unwrap();
    let id_b = b.id().unwrap();
    assert_ne!(id_a, id_b);

    let resolved = Component::<TodoList>::resolve(&registry, id_b).unwrap();
    assert_eq!(resolved, b);

    a.unregister_component();
    b.unregister_component();
    assert!(!registry.contains(id_a));
    assert!(!registry.contains(id_b));
}

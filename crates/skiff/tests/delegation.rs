//! End-to-end delegation over a page-shaped tree.
//!
//! Builds the kind of tree a small multi-page application renders (header,
//! nav list, main content, footer) and drives it through one shared
//! delegator, the way an application would.

use std::cell::RefCell;
use std::rc::Rc;

use skiff::prelude::*;

struct Page {
    root: Node,
    nav: Node,
    nav_items: Vec<Node>,
    form: Node,
    submit: Node,
}

fn render_page() -> Page {
    let root = Node::new("div");
    let header = Node::new("header");
    let nav = Node::new("nav");
    let main = Node::new("main");
    let footer = Node::new("footer");
    for section in [&header, &nav, &main, &footer] {
        root.append_child(section).unwrap();
    }

    let list = Node::new("ul");
    nav.append_child(&list).unwrap();
    let nav_items: Vec<Node> = ["home", "profile", "login"]
        .iter()
        .map(|_| {
            let item = Node::new("li");
            list.append_child(&item).unwrap();
            item
        })
        .collect();

    let form = Node::new("form");
    let submit = Node::new("button");
    main.append_child(&form).unwrap();
    form.append_child(&submit).unwrap();

    Page {
        root,
        nav,
        nav_items,
        form,
        submit,
    }
}

#[test]
fn one_nav_handler_serves_every_item() {
    let page = render_page();
    let delegator = EventDelegator::new();
    delegator.bind_root(&page.root);

    let clicked = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&clicked);
    delegator
        .register("click", &page.nav, move |event| {
            log.borrow_mut().push(event.target().clone());
        })
        .unwrap();

    for item in &page.nav_items {
        item.fire("click");
    }

    assert_eq!(*clicked.borrow(), page.nav_items);
    // The root carries exactly one native listener for the whole nav.
    assert_eq!(page.root.listener_count(), 1);
}

#[test]
fn form_submit_and_nav_clicks_do_not_cross() {
    let page = render_page();
    let delegator = EventDelegator::new();
    delegator.bind_root(&page.root);

    let submits = Rc::new(RefCell::new(0));
    let nav_clicks = Rc::new(RefCell::new(0));

    let s = Rc::clone(&submits);
    delegator
        .register("submit", &page.form, move |event| {
            event.prevent_default();
            *s.borrow_mut() += 1;
        })
        .unwrap();
    let n = Rc::clone(&nav_clicks);
    delegator
        .register("click", &page.nav, move |_| *n.borrow_mut() += 1)
        .unwrap();

    let event = page.submit.fire("submit");
    assert!(event.default_prevented());
    page.submit.fire("click");

    assert_eq!(*submits.borrow(), 1);
    // The click on the submit button bubbles no further than the form's
    // subtree; the nav handler must stay silent.
    assert_eq!(*nav_clicks.borrow(), 0);
}

#[test]
fn rerender_rebinds_without_leaking_listeners() {
    let first = render_page();
    let delegator = EventDelegator::new();
    delegator.bind_root(&first.root);

    let count = Rc::new(RefCell::new(0));
    let c = Rc::clone(&count);
    delegator
        .register("click", &first.nav, move |_| *c.borrow_mut() += 1)
        .unwrap();

    // A re-render produces a fresh tree; handlers for it are registered
    // anew and the old ones dropped, then the root is re-bound.
    let second = render_page();
    delegator.unregister(&first.nav, "click");
    let c = Rc::clone(&count);
    delegator
        .register("click", &second.nav, move |_| *c.borrow_mut() += 1)
        .unwrap();
    delegator.bind_root(&second.root);

    assert_eq!(first.root.listener_count(), 0);
    assert_eq!(second.root.listener_count(), 1);

    first.nav_items[0].fire("click");
    assert_eq!(*count.borrow(), 0);
    second.nav_items[0].fire("click");
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn shared_delegator_clones_see_one_registry() {
    let page = render_page();
    let delegator = EventDelegator::new();
    delegator.bind_root(&page.root);

    let wiring_copy = delegator.clone();
    wiring_copy
        .register("click", &page.nav, |_| {})
        .unwrap();

    assert_eq!(delegator.handler_count(), 1);
    assert!(delegator.has_type("click"));

    delegator.unregister(&page.nav, "click");
    assert_eq!(wiring_copy.handler_count(), 0);
}
